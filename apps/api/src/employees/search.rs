//! In-memory employee search: case-insensitive text match, department and
//! status filters, then 1-based paging.

use serde::{Deserialize, Serialize};

use super::view::EmployeeView;

pub const DEFAULT_PAGE_SIZE: usize = 20;

fn first_page() -> usize {
    1
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default = "first_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: None,
            department: None,
            status: None,
            page: first_page(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub success: bool,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub data: Vec<EmployeeView>,
}

/// Lower-cased, non-blank filter text.
fn needle(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn matches_query(view: &EmployeeView, query: &str) -> bool {
    let e = &view.employee;
    [&e.name, &e.surname, &e.document, &e.email]
        .iter()
        .any(|field| field.to_lowercase().contains(query))
}

fn matches_status(view: &EmployeeView, status: &str) -> bool {
    view.employee.status.as_str().to_lowercase().contains(status)
        || view.status_label.to_lowercase().contains(status)
}

pub fn search(views: Vec<EmployeeView>, params: &SearchParams) -> SearchPage {
    let query = needle(&params.query);
    let department = needle(&params.department);
    let status = needle(&params.status);

    let filtered: Vec<EmployeeView> = views
        .into_iter()
        .filter(|v| query.as_deref().map_or(true, |q| matches_query(v, q)))
        .filter(|v| {
            department
                .as_deref()
                .map_or(true, |d| v.department_name.to_lowercase().contains(d))
        })
        .filter(|v| status.as_deref().map_or(true, |s| matches_status(v, s)))
        .collect();

    let page = params.page.max(1);
    let page_size = params.page_size.max(1);
    let total = filtered.len();
    let data = filtered
        .into_iter()
        .skip((page - 1).saturating_mul(page_size))
        .take(page_size)
        .collect();

    SearchPage {
        success: true,
        total,
        page,
        page_size,
        data,
    }
}
