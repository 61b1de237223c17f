pub mod dispatcher;
pub mod handlers;
pub mod templates;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use transport::{MailTransport, SmtpTransport};
