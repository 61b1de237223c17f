//! Resume ("hoja de vida") PDF generation.

pub mod handlers;
pub mod layout;
pub mod metrics;
pub mod render;

use chrono::NaiveDateTime;

use crate::employees::EmployeeView;
pub use render::PdfError;

pub fn employee_resume(view: &EmployeeView, generated_at: NaiveDateTime) -> Result<Vec<u8>, PdfError> {
    render::render(&layout::layout_resume(view, generated_at))
}
