use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::notify::{Dispatcher, MailTransport};
use crate::store::{EmailStore, EmployeeStore, ReferenceStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub employees: Arc<dyn EmployeeStore>,
    pub references: Arc<dyn ReferenceStore>,
    pub emails: Arc<dyn EmailStore>,
    /// SMTP in production. Swapped for a recording fake in tests.
    pub mailer: Arc<dyn MailTransport>,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(
            self.emails.as_ref(),
            self.mailer.as_ref(),
            &self.config.smtp.from_address,
        )
    }
}

impl FromRef<AppState> for TokenIssuer {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
