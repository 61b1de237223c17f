//! Notification Dispatcher: persists every outbound email, attempts delivery,
//! and records the outcome on the stored message.
//!
//! A transport failure is data, not an error: the message is saved as Failed
//! with the transport's text and the caller still gets the message back.
//! Only persistence failures propagate.

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::templates::welcome_body;
use super::transport::MailTransport;
use crate::models::{EmailMessage, EmailStatus};
use crate::store::EmailStore;

pub const WELCOME_SUBJECT: &str = "¡Bienvenido a TalentoPlus!";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    #[serde(default = "default_is_html")]
    pub is_html: bool,
    #[serde(default)]
    pub cc: Option<Vec<String>>,
    #[serde(default)]
    pub bcc: Option<Vec<String>>,
}

fn default_is_html() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    pub email_id: Uuid,
    pub status: String,
    pub message: String,
}

impl SendEmailResponse {
    pub const ERROR_STATUS: &'static str = "Error";

    fn rejected(reason: impl std::fmt::Display) -> Self {
        Self {
            email_id: Uuid::nil(),
            status: Self::ERROR_STATUS.to_string(),
            message: format!("Error al procesar el email: {reason}"),
        }
    }
}

pub struct Dispatcher<'a> {
    store: &'a dyn EmailStore,
    transport: &'a dyn MailTransport,
    from_address: &'a str,
}

impl<'a> Dispatcher<'a> {
    pub fn new(store: &'a dyn EmailStore, transport: &'a dyn MailTransport, from_address: &'a str) -> Self {
        Self {
            store,
            transport,
            from_address,
        }
    }

    /// Stores `email` as Pending, attempts delivery, then stores the final state.
    pub async fn send(&self, mut email: EmailMessage) -> Result<EmailMessage> {
        self.store.add(&email).await?;

        email.mark_sending();
        match self.transport.send(&email).await {
            Ok(()) => {
                email.mark_sent();
                info!("Email {} sent to {}", email.id, email.to_addresses.join(", "));
            }
            Err(e) => {
                error!("Email {} to {} failed: {e}", email.id, email.to_addresses.join(", "));
                email.mark_failed(&e.to_string());
            }
        }

        self.store.update(&email).await?;
        Ok(email)
    }

    /// Builds a message from an API request and sends it. Construction and
    /// persistence failures come back as an `Error` status.
    pub async fn send_request(&self, request: SendEmailRequest) -> SendEmailResponse {
        let email = match build_message(request) {
            Ok(email) => email,
            Err(e) => return SendEmailResponse::rejected(e),
        };

        match self.send(email).await {
            Ok(sent) => SendEmailResponse {
                email_id: sent.id,
                status: sent.status.as_str().to_string(),
                message: if sent.status == EmailStatus::Sent {
                    "Email enviado exitosamente".to_string()
                } else {
                    "Email falló al enviar".to_string()
                },
            },
            Err(e) => SendEmailResponse::rejected(e),
        }
    }

    /// Sends the welcome message. `false` only when the message could not be
    /// built or stored; a delivery failure still counts as handled.
    pub async fn send_welcome(&self, to: &str, full_name: &str, hire_date: NaiveDate) -> bool {
        let email = match EmailMessage::new(
            self.from_address,
            vec![to.to_string()],
            WELCOME_SUBJECT,
            &welcome_body(full_name, hire_date),
            true,
        ) {
            Ok(email) => email,
            Err(e) => {
                warn!("Welcome email for {to} could not be built: {e}");
                return false;
            }
        };

        match self.send(email).await {
            Ok(_) => true,
            Err(e) => {
                error!("Welcome email for {to} could not be stored: {e:#}");
                false
            }
        }
    }
}

fn build_message(request: SendEmailRequest) -> Result<EmailMessage, crate::models::DomainError> {
    let mut email = EmailMessage::new(
        &request.from,
        request.to,
        &request.subject,
        &request.body,
        request.is_html,
    )?;
    for cc in request.cc.unwrap_or_default() {
        email.add_cc(&cc)?;
    }
    for bcc in request.bcc.unwrap_or_default() {
        email.add_bcc(&bcc)?;
    }
    Ok(email)
}
