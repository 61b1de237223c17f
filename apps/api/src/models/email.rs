use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{require_text, DomainError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "email_status", rename_all = "snake_case")]
pub enum EmailStatus {
    Pending,
    Sending,
    Sent,
    Failed,
    Retrying,
}

impl EmailStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailStatus::Pending => "Pending",
            EmailStatus::Sending => "Sending",
            EmailStatus::Sent => "Sent",
            EmailStatus::Failed => "Failed",
            EmailStatus::Retrying => "Retrying",
        }
    }
}

/// One outbound email and its delivery state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub id: Uuid,
    pub from_address: String,
    pub to_addresses: Vec<String>,
    pub cc_addresses: Vec<String>,
    pub bcc_addresses: Vec<String>,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
    pub status: EmailStatus,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub retry_count: i32,
}

impl EmailMessage {
    pub fn new(
        from: &str,
        to: Vec<String>,
        subject: &str,
        body: &str,
        is_html: bool,
    ) -> Result<Self, DomainError> {
        if to.is_empty() {
            return Err(DomainError::NoRecipients);
        }
        require_text("remitente", from)?;
        require_text("asunto", subject)?;

        Ok(Self {
            id: Uuid::new_v4(),
            from_address: from.to_string(),
            to_addresses: to,
            cc_addresses: Vec::new(),
            bcc_addresses: Vec::new(),
            subject: subject.to_string(),
            body: body.to_string(),
            is_html,
            status: EmailStatus::Pending,
            created_at: Utc::now(),
            sent_at: None,
            error_message: None,
            retry_count: 0,
        })
    }

    pub fn add_cc(&mut self, address: &str) -> Result<(), DomainError> {
        require_text("cc", address)?;
        self.cc_addresses.push(address.to_string());
        Ok(())
    }

    pub fn add_bcc(&mut self, address: &str) -> Result<(), DomainError> {
        require_text("bcc", address)?;
        self.bcc_addresses.push(address.to_string());
        Ok(())
    }

    pub fn mark_sending(&mut self) {
        self.status = EmailStatus::Sending;
    }

    pub fn mark_sent(&mut self) {
        self.status = EmailStatus::Sent;
        self.sent_at = Some(Utc::now());
        self.error_message = None;
    }

    /// Records a transport failure. Only failures bump the retry counter.
    pub fn mark_failed(&mut self, error: &str) {
        self.status = EmailStatus::Failed;
        self.error_message = Some(error.to_string());
        self.retry_count += 1;
    }

    pub fn mark_retrying(&mut self) {
        self.status = EmailStatus::Retrying;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> EmailMessage {
        EmailMessage::new("rh@talento.com", vec!["x@y.com".to_string()], "Hola", "<p>hola</p>", true)
            .unwrap()
    }

    #[test]
    fn test_new_message_is_pending() {
        let m = message();
        assert_eq!(m.status, EmailStatus::Pending);
        assert_eq!(m.retry_count, 0);
        assert!(m.sent_at.is_none());
    }

    #[test]
    fn test_requires_recipient_sender_and_subject() {
        assert_eq!(
            EmailMessage::new("a@b.com", vec![], "s", "b", true).unwrap_err(),
            DomainError::NoRecipients
        );
        assert_eq!(
            EmailMessage::new(" ", vec!["x@y.com".into()], "s", "b", true).unwrap_err(),
            DomainError::Blank("remitente")
        );
        assert_eq!(
            EmailMessage::new("a@b.com", vec!["x@y.com".into()], "", "b", true).unwrap_err(),
            DomainError::Blank("asunto")
        );
    }

    #[test]
    fn test_blank_cc_rejected() {
        let mut m = message();
        assert!(m.add_cc("").is_err());
        assert!(m.add_bcc("  ").is_err());
        m.add_cc("c@d.com").unwrap();
        assert_eq!(m.cc_addresses, vec!["c@d.com".to_string()]);
    }

    #[test]
    fn test_failure_then_success() {
        let mut m = message();
        m.mark_failed("connection refused");
        assert_eq!(m.status, EmailStatus::Failed);
        assert_eq!(m.retry_count, 1);
        m.mark_retrying();
        m.mark_sent();
        assert_eq!(m.status, EmailStatus::Sent);
        assert!(m.sent_at.is_some());
        assert!(m.error_message.is_none());
        assert_eq!(m.retry_count, 1);
    }
}
