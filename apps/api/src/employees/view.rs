use std::collections::HashMap;

use anyhow::Result;
use serde::Serialize;

use crate::models::{Employee, ReferenceKind};
use crate::references::name_index;
use crate::store::ReferenceStore;

/// An employee with its reference ids resolved to names.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    #[serde(flatten)]
    pub employee: Employee,
    pub department_name: String,
    pub job_title_name: String,
    pub education_level_name: String,
    pub status_label: &'static str,
}

pub struct ReferenceNames {
    departments: HashMap<i32, String>,
    job_titles: HashMap<i32, String>,
    education_levels: HashMap<i32, String>,
}

impl ReferenceNames {
    pub async fn load(store: &dyn ReferenceStore) -> Result<Self> {
        Ok(Self {
            departments: name_index(store, ReferenceKind::Department).await?,
            job_titles: name_index(store, ReferenceKind::JobTitle).await?,
            education_levels: name_index(store, ReferenceKind::EducationLevel).await?,
        })
    }

    pub fn department(&self, id: i32) -> String {
        self.departments.get(&id).cloned().unwrap_or_default()
    }

    pub fn job_title(&self, id: i32) -> String {
        self.job_titles.get(&id).cloned().unwrap_or_default()
    }

    pub fn education_level(&self, id: i32) -> String {
        self.education_levels.get(&id).cloned().unwrap_or_default()
    }

    pub fn view(&self, employee: Employee) -> EmployeeView {
        EmployeeView {
            department_name: self.department(employee.department_id),
            job_title_name: self.job_title(employee.job_title_id),
            education_level_name: self.education_level(employee.education_level_id),
            status_label: employee.status.label(),
            employee,
        }
    }

    pub fn views(&self, employees: Vec<Employee>) -> Vec<EmployeeView> {
        employees.into_iter().map(|e| self.view(e)).collect()
    }
}
