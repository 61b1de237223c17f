use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{require_email, require_text, DomainError};

const ADULT_AGE_MONTHS: u32 = 18 * 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_status", rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    OnVacation,
}

impl EmployeeStatus {
    /// Maps the free-text status column of an import sheet. Unknown text means Active.
    pub fn from_import_text(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "activo" => EmployeeStatus::Active,
            "inactivo" => EmployeeStatus::Inactive,
            "vacaciones" => EmployeeStatus::OnVacation,
            _ => EmployeeStatus::Active,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Active",
            EmployeeStatus::Inactive => "Inactive",
            EmployeeStatus::OnVacation => "OnVacation",
        }
    }

    /// Spanish label used in generated documents.
    pub fn label(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Activo",
            EmployeeStatus::Inactive => "Inactivo",
            EmployeeStatus::OnVacation => "Vacaciones",
        }
    }
}

/// Personal fields, replaced as a unit by `update_personal_info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub surname: String,
    pub birth_date: NaiveDate,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl PersonalInfo {
    fn validate(&self, today: NaiveDate) -> Result<(), DomainError> {
        require_text("nombres", &self.name)?;
        require_text("apellidos", &self.surname)?;
        let adult_cutoff = today
            .checked_sub_months(Months::new(ADULT_AGE_MONTHS))
            .unwrap_or(NaiveDate::MIN);
        if self.birth_date > adult_cutoff {
            return Err(DomainError::Underage);
        }
        require_email(&self.email)
    }
}

/// Employment fields, replaced as a unit by `update_job_info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    pub salary: Decimal,
    pub department_id: i32,
    pub job_title_id: i32,
    pub education_level_id: i32,
    pub professional_profile: String,
}

impl JobInfo {
    fn validate(&self) -> Result<(), DomainError> {
        if self.salary < Decimal::ZERO {
            return Err(DomainError::NegativeSalary);
        }
        Ok(())
    }
}

fn validate_hire_date(hire_date: NaiveDate, today: NaiveDate) -> Result<(), DomainError> {
    if hire_date > today {
        return Err(DomainError::FutureHireDate);
    }
    Ok(())
}

/// A validated employee that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub document: String,
    pub personal: PersonalInfo,
    pub job: JobInfo,
    pub hire_date: NaiveDate,
    pub status: EmployeeStatus,
}

impl NewEmployee {
    pub fn new(
        document: &str,
        personal: PersonalInfo,
        job: JobInfo,
        hire_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        let today = Utc::now().date_naive();
        require_text("documento", document)?;
        personal.validate(today)?;
        job.validate()?;
        validate_hire_date(hire_date, today)?;

        Ok(Self {
            document: document.trim().to_string(),
            personal,
            job,
            hire_date,
            status: EmployeeStatus::Active,
        })
    }

    pub fn with_status(mut self, status: EmployeeStatus) -> Self {
        self.status = status;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i32,
    pub document: String,
    pub name: String,
    pub surname: String,
    pub birth_date: NaiveDate,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub salary: Decimal,
    pub hire_date: NaiveDate,
    pub status: EmployeeStatus,
    pub department_id: i32,
    pub job_title_id: i32,
    pub education_level_id: i32,
    pub professional_profile: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Employee {
    /// Materialises a persisted employee from a draft and its generated identity.
    pub fn from_new(id: i32, new: NewEmployee, created_at: DateTime<Utc>) -> Self {
        let NewEmployee {
            document,
            personal,
            job,
            hire_date,
            status,
        } = new;
        Self {
            id,
            document,
            name: personal.name,
            surname: personal.surname,
            birth_date: personal.birth_date,
            address: personal.address,
            phone: personal.phone,
            email: personal.email,
            salary: job.salary,
            hire_date,
            status,
            department_id: job.department_id,
            job_title_id: job.job_title_id,
            education_level_id: job.education_level_id,
            professional_profile: job.professional_profile,
            created_at,
            modified_at: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    pub fn update_personal_info(&mut self, info: PersonalInfo) -> Result<(), DomainError> {
        info.validate(Utc::now().date_naive())?;
        self.name = info.name;
        self.surname = info.surname;
        self.birth_date = info.birth_date;
        self.address = info.address;
        self.phone = info.phone;
        self.email = info.email;
        self.touch();
        Ok(())
    }

    pub fn update_job_info(&mut self, info: JobInfo) -> Result<(), DomainError> {
        info.validate()?;
        self.salary = info.salary;
        self.department_id = info.department_id;
        self.job_title_id = info.job_title_id;
        self.education_level_id = info.education_level_id;
        self.professional_profile = info.professional_profile;
        self.touch();
        Ok(())
    }

    pub fn change_hire_date(&mut self, hire_date: NaiveDate) -> Result<(), DomainError> {
        validate_hire_date(hire_date, Utc::now().date_naive())?;
        self.hire_date = hire_date;
        self.touch();
        Ok(())
    }

    pub fn change_status(&mut self, status: EmployeeStatus) {
        self.status = status;
        self.touch();
    }

    pub fn change_document(&mut self, document: &str) -> Result<(), DomainError> {
        require_text("documento", document)?;
        self.document = document.trim().to_string();
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.modified_at = Some(Utc::now());
    }
}
