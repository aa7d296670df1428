// ============================================================================
// Society Infrastructure - SMTP Credential Notifier
// File: crates/society-infrastructure/src/mail/smtp.rs
// ============================================================================

use async_trait::async_trait;
use handlebars::Handlebars;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::json;

use society_core::notification::{CredentialNotice, CredentialNotifier, NotificationError};
use society_shared::config::MailSettings;

const CREDENTIALS_TEMPLATE: &str = "credentials";

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    templates: Handlebars<'static>,
}

impl SmtpNotifier {
    /// STARTTLS relay when credentials are configured, plain SMTP otherwise
    /// (local relays such as MailHog).
    pub fn new(settings: &MailSettings) -> Result<Self, NotificationError> {
        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|e| NotificationError::InvalidAddress(format!("{}: {}", settings.from, e)))?;

        let transport = match (&settings.username, &settings.password) {
            (Some(username), Some(password)) => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
                .map_err(|e| NotificationError::TransportError(e.to_string()))?
                .port(settings.smtp_port)
                .credentials(Credentials::new(username.clone(), password.clone()))
                .build(),
            _ => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.smtp_host)
                .port(settings.smtp_port)
                .build(),
        };

        Ok(Self {
            transport,
            from,
            templates: templates()?,
        })
    }

    fn build_message(&self, notice: &CredentialNotice) -> Result<Message, NotificationError> {
        let to: Mailbox = notice
            .recipient
            .parse()
            .map_err(|e| NotificationError::InvalidAddress(format!("{}: {}", notice.recipient, e)))?;
        let body = render_body(&self.templates, notice)?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(notice.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| NotificationError::BuildError(e.to_string()))
    }
}

fn templates() -> Result<Handlebars<'static>, NotificationError> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
        .register_template_string(CREDENTIALS_TEMPLATE, include_str!("../../templates/credentials.hbs"))
        .map_err(|e| NotificationError::TemplateError(e.to_string()))?;
    Ok(handlebars)
}

fn render_body(templates: &Handlebars<'static>, notice: &CredentialNotice) -> Result<String, NotificationError> {
    let data = json!({
        "first_name": notice.first_name,
        "last_name": notice.last_name,
        "sender_title": notice.sender_title(),
        "recipient": notice.recipient,
        "password": notice.password,
    });
    templates
        .render(CREDENTIALS_TEMPLATE, &data)
        .map_err(|e| NotificationError::TemplateError(e.to_string()))
}

#[async_trait]
impl CredentialNotifier for SmtpNotifier {
    async fn send_credentials(&self, notice: &CredentialNotice) -> Result<(), NotificationError> {
        let message = self.build_message(notice)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::TransportError(e.to_string()))?;
        Ok(())
    }
}
