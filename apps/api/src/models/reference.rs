use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The small lookup tables an employee points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Department,
    JobTitle,
    EducationLevel,
}

impl ReferenceKind {
    pub fn table(&self) -> &'static str {
        match self {
            ReferenceKind::Department => "departments",
            ReferenceKind::JobTitle => "job_titles",
            ReferenceKind::EducationLevel => "education_levels",
        }
    }

    /// Spanish singular used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            ReferenceKind::Department => "Departamento",
            ReferenceKind::JobTitle => "Cargo",
            ReferenceKind::EducationLevel => "Nivel educativo",
        }
    }
}

/// A named reference row. `sort_order` is only meaningful for education levels
/// and reads as 0 for the other kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntity {
    pub id: i32,
    pub name: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl ReferenceEntity {
    /// Case-insensitive exact match on the name.
    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}
