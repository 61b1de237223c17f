//! Aggregate figures over the employee table. Pure functions; the handlers
//! load the rows and hand them in.

pub mod handlers;

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::employees::ReferenceNames;
use crate::models::{Employee, EmployeeStatus};

const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_employees: usize,
    pub active_employees: usize,
    pub employees_on_vacation: usize,
    pub employees_by_department: BTreeMap<String, usize>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicStatistics {
    pub total_employees: usize,
    pub active_employees: usize,
    pub total_departments: usize,
    pub average_tenure: f64,
}

fn count_status(employees: &[Employee], status: EmployeeStatus) -> usize {
    employees.iter().filter(|e| e.status == status).count()
}

pub fn summarize(employees: &[Employee], names: &ReferenceNames, now: DateTime<Utc>) -> DashboardSummary {
    let mut by_department = BTreeMap::new();
    for employee in employees {
        let mut name = names.department(employee.department_id);
        if name.is_empty() {
            name = format!("Departamento {}", employee.department_id);
        }
        *by_department.entry(name).or_insert(0) += 1;
    }

    DashboardSummary {
        total_employees: employees.len(),
        active_employees: count_status(employees, EmployeeStatus::Active),
        employees_on_vacation: count_status(employees, EmployeeStatus::OnVacation),
        employees_by_department: by_department,
        last_updated: now,
    }
}

/// Mean years since hire over active employees, rounded to two decimals.
/// Zero when nobody is active.
pub fn average_tenure_years(employees: &[Employee], today: NaiveDate) -> f64 {
    let days: Vec<i64> = employees
        .iter()
        .filter(|e| e.status == EmployeeStatus::Active)
        .map(|e| (today - e.hire_date).num_days())
        .collect();
    if days.is_empty() {
        return 0.0;
    }
    let years = days.iter().sum::<i64>() as f64 / days.len() as f64 / DAYS_PER_YEAR;
    (years * 100.0).round() / 100.0
}

pub fn statistics(employees: &[Employee], total_departments: usize, today: NaiveDate) -> PublicStatistics {
    PublicStatistics {
        total_employees: employees.len(),
        active_employees: count_status(employees, EmployeeStatus::Active),
        total_departments,
        average_tenure: average_tenure_years(employees, today),
    }
}
