//! Notifier used when SMTP delivery is disabled

use async_trait::async_trait;
use tracing::info;

use society_core::notification::{CredentialNotice, CredentialNotifier, NotificationError};
use society_shared::utils::mask_email;

/// Records the notice in the log instead of sending it. The password is never logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl CredentialNotifier for LogNotifier {
    async fn send_credentials(&self, notice: &CredentialNotice) -> Result<(), NotificationError> {
        info!(
            recipient = %mask_email(&notice.recipient),
            role = notice.role.as_str(),
            "Mail disabled, skipping: {}",
            notice.subject()
        );
        Ok(())
    }
}
