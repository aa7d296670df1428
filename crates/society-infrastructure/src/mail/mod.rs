//! Credential mail adapters

pub mod log;
pub mod smtp;

use std::sync::Arc;

use society_core::notification::{CredentialNotifier, NotificationError};
use society_shared::config::MailSettings;

pub use log::LogNotifier;
pub use smtp::SmtpNotifier;

/// SMTP when mail is enabled, otherwise the log-only notifier.
pub fn notifier_from_settings(settings: &MailSettings) -> Result<Arc<dyn CredentialNotifier>, NotificationError> {
    if settings.enabled {
        Ok(Arc::new(SmtpNotifier::new(settings)?))
    } else {
        Ok(Arc::new(LogNotifier))
    }
}
