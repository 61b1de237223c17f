pub mod handlers;
pub mod search;
pub mod view;

pub use view::{EmployeeView, ReferenceNames};
