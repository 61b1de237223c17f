pub mod email;
pub mod employee;
pub mod reference;

use thiserror::Error;

pub use email::{EmailMessage, EmailStatus};
pub use employee::{Employee, EmployeeStatus, JobInfo, NewEmployee, PersonalInfo};
pub use reference::{ReferenceEntity, ReferenceKind};

/// Invariant violations raised by the employee and email aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("El campo '{0}' es requerido")]
    Blank(&'static str),

    #[error("El empleado debe ser mayor de edad")]
    Underage,

    #[error("El email '{0}' no es válido")]
    InvalidEmail(String),

    #[error("El salario no puede ser negativo")]
    NegativeSalary,

    #[error("La fecha de ingreso no puede ser posterior a hoy")]
    FutureHireDate,

    #[error("Debe haber al menos un destinatario")]
    NoRecipients,
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Blank(field));
    }
    Ok(())
}

pub(crate) fn require_email(value: &str) -> Result<(), DomainError> {
    use validator::ValidateEmail;

    if value.trim() != value || !value.validate_email() {
        return Err(DomainError::InvalidEmail(value.to_string()));
    }
    Ok(())
}
