use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox, MessageBuilder};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::info;

use crate::config::SmtpConfig;
use crate::models::EmailMessage;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Dirección de correo inválida '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("No se pudo construir el mensaje: {0}")]
    Build(String),

    #[error("Error SMTP: {0}")]
    Smtp(String),
}

/// Outbound mail delivery. `AppState` carries an `Arc<dyn MailTransport>`.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &EmailMessage) -> Result<(), TransportError>;
}

pub struct SmtpTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_name: String,
}

impl SmtpTransport {
    pub fn new(config: &SmtpConfig) -> Result<Self, TransportError> {
        let mut builder = if config.tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .map_err(|e| TransportError::Smtp(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };
        builder = builder.port(config.port);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        info!(
            "SMTP transport configured for {}:{} (tls: {})",
            config.host, config.port, config.tls
        );
        Ok(Self {
            mailer: builder.build(),
            from_name: config.from_name.clone(),
        })
    }

    fn build_message(&self, email: &EmailMessage) -> Result<Message, TransportError> {
        let from = Mailbox::new(Some(self.from_name.clone()), parse_address(&email.from_address)?.email);
        let mut builder: MessageBuilder = Message::builder().from(from).subject(email.subject.as_str());

        for address in &email.to_addresses {
            builder = builder.to(parse_address(address)?);
        }
        for address in &email.cc_addresses {
            builder = builder.cc(parse_address(address)?);
        }
        for address in &email.bcc_addresses {
            builder = builder.bcc(parse_address(address)?);
        }

        let content_type = if email.is_html {
            ContentType::TEXT_HTML
        } else {
            ContentType::TEXT_PLAIN
        };
        builder
            .header(content_type)
            .body(email.body.clone())
            .map_err(|e| TransportError::Build(e.to_string()))
    }
}

fn parse_address(address: &str) -> Result<Mailbox, TransportError> {
    address.parse::<Mailbox>().map_err(|e| TransportError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, email: &EmailMessage) -> Result<(), TransportError> {
        let message = self.build_message(email)?;
        self.mailer
            .send(message)
            .await
            .map_err(|e| TransportError::Smtp(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use super::*;

    /// Records deliveries instead of talking to a server.
    #[derive(Default)]
    pub struct FakeTransport {
        pub fail: AtomicBool,
        pub sent: AtomicUsize,
    }

    #[async_trait]
    impl MailTransport for FakeTransport {
        async fn send(&self, _email: &EmailMessage) -> Result<(), TransportError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(TransportError::Smtp("connection refused".to_string()));
            }
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> SmtpTransport {
        SmtpTransport::new(&SmtpConfig {
            host: "localhost".to_string(),
            port: 2525,
            username: String::new(),
            password: String::new(),
            tls: false,
            from_address: "rh@talento.com".to_string(),
            from_name: "TalentoPlus".to_string(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_builds_message_with_all_recipients() {
        let mut email =
            EmailMessage::new("rh@talento.com", vec!["x@y.com".into()], "Hola", "<p>hola</p>", true).unwrap();
        email.add_cc("c@d.com").unwrap();
        email.add_bcc("e@f.com").unwrap();

        let message = transport().build_message(&email).unwrap();
        let envelope = message.envelope();
        assert_eq!(envelope.to().len(), 3);
        assert_eq!(envelope.from().map(|a| a.to_string()), Some("rh@talento.com".to_string()));
    }

    #[tokio::test]
    async fn test_rejects_unparseable_recipient() {
        let email = EmailMessage::new("rh@talento.com", vec!["not an address".into()], "Hola", "x", false).unwrap();
        let err = transport().build_message(&email).unwrap_err();
        assert!(matches!(err, TransportError::Address { .. }));
    }
}
