//! Invitation email delivery.
//!
//! The services render an [`InviteEmail`] and hand it to an [`InviteMailer`].
//! Delivery is attempted once; a failed hand-off is reported to the caller
//! and leaves the stored invitation as it is.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docshare_org::{Invitation, OrgError, OrgResult, Organization};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// A rendered invitation email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteEmail {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Plain-text body
    pub body: String,
    /// Link that accepts the invitation in one click
    pub magic_link: String,
}

impl InviteEmail {
    /// Recipient address safe for logs: the first character of the local
    /// part and the domain, `a***@example.com`.
    pub fn redacted_recipient(&self) -> String {
        match self.to.rsplit_once('@') {
            Some((local, domain)) => {
                let first: String = local.chars().take(1).collect();
                format!("{}***@{}", first, domain)
            }
            None => "***".to_string(),
        }
    }

    /// Render the email for an email-type invitation.
    ///
    /// # Arguments
    ///
    /// * `app_name` - Product name shown in the subject and body
    /// * `origin` - Front-end origin the magic link points at
    /// * `organization` - The inviting organization
    /// * `inviter_name` - Display name of the user who sent the invite
    /// * `invitation` - The invitation being delivered
    ///
    /// # Errors
    ///
    /// [`OrgError::NotEmailType`] for code invitations.
    pub fn render(
        app_name: &str,
        origin: &str,
        organization: &Organization,
        inviter_name: &str,
        invitation: &Invitation,
    ) -> OrgResult<Self> {
        let to = invitation.email.clone().ok_or(OrgError::NotEmailType)?;
        let code = &invitation.invite_code;
        let magic_link = code.accept_link(origin);
        let expiry = format_expiry(invitation.expires_at);

        let subject = format!("Join {} on {}", organization.name, app_name);
        let body = format!(
            "{inviter} has invited you to join {org} on {app}.\n\
             \n\
             Accept the invitation: {link}\n\
             \n\
             Or enter this invite code after signing in: {code}\n\
             \n\
             This invitation expires: {expiry}\n",
            inviter = inviter_name,
            org = organization.name,
            app = app_name,
            link = magic_link,
            code = code,
            expiry = expiry,
        );

        Ok(Self {
            to,
            subject,
            body,
            magic_link,
        })
    }
}

/// Human-readable expiry date, e.g. "January 15, 2025", or "never".
pub fn format_expiry(expires_at: Option<DateTime<Utc>>) -> String {
    match expires_at {
        Some(at) => at.format("%B %-d, %Y").to_string(),
        None => "never".to_string(),
    }
}

/// Hands invitation emails to a delivery channel.
#[async_trait]
pub trait InviteMailer: Send + Sync {
    /// Deliver one email.
    ///
    /// Implementations must not retry; report failures as
    /// [`OrgError::DeliveryFailed`].
    async fn send(&self, email: &InviteEmail) -> OrgResult<()>;
}

/// Mailer that only logs. Used when no delivery channel is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl InviteMailer for LogMailer {
    async fn send(&self, email: &InviteEmail) -> OrgResult<()> {
        info!(
            to = %email.redacted_recipient(),
            subject = %email.subject,
            "Invitation email not sent: no mailer configured"
        );
        Ok(())
    }
}

/// Mailer that keeps sent emails in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<InviteEmail>>>,
    failing: Arc<Mutex<Option<String>>>,
}

impl MemoryMailer {
    /// Create an empty mailer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emails delivered so far.
    pub async fn sent(&self) -> Vec<InviteEmail> {
        self.sent.lock().await.clone()
    }

    /// Make every following send fail with `reason`, or succeed again with `None`.
    pub async fn set_failure(&self, reason: Option<&str>) {
        *self.failing.lock().await = reason.map(str::to_string);
    }
}

#[async_trait]
impl InviteMailer for MemoryMailer {
    async fn send(&self, email: &InviteEmail) -> OrgResult<()> {
        if let Some(reason) = self.failing.lock().await.clone() {
            return Err(OrgError::DeliveryFailed(reason));
        }
        self.sent.lock().await.push(email.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use docshare_org::{EntityId, InviteOptions};

    fn email_invitation(expires_at: Option<DateTime<Utc>>) -> (Organization, Invitation) {
        let org = Organization::new("Acme", EntityId::generate());
        let mut options = InviteOptions::default().max_uses(1);
        options.expires_at = expires_at;
        let invitation = Invitation::email(org.id, org.created_by_id(), "x@example.com", options);
        (org, invitation)
    }

    #[test]
    fn test_redacted_recipient() {
        let (org, invitation) = email_invitation(None);
        let mut email =
            InviteEmail::render("Docshare", "https://docs.example.com", &org, "Alice", &invitation)
                .unwrap();
        assert_eq!(email.redacted_recipient(), "x***@example.com");

        email.to = "alice.smith@corp.example".to_string();
        let redacted = email.redacted_recipient();
        assert_eq!(redacted, "a***@corp.example");
        assert!(!redacted.contains("alice.smith"));

        email.to = "not-an-address".to_string();
        assert_eq!(email.redacted_recipient(), "***");
    }

    #[test]
    fn test_render() {
        let expires = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let (org, invitation) = email_invitation(Some(expires));

        let email = InviteEmail::render(
            "Docshare",
            "https://docs.example.com",
            &org,
            "Alice Smith",
            &invitation,
        )
        .unwrap();

        assert_eq!(email.to, "x@example.com");
        assert_eq!(email.subject, "Join Acme on Docshare");
        assert_eq!(
            email.magic_link,
            format!(
                "https://docs.example.com/accept-invite?code={}",
                invitation.invite_code
            )
        );
        assert!(email.body.contains("Alice Smith has invited you"));
        assert!(email.body.contains(invitation.invite_code.as_str()));
        assert!(email.body.contains("January 15, 2025"));
    }

    #[test]
    fn test_render_rejects_code_invitation() {
        let org = Organization::new("Acme", EntityId::generate());
        let invitation = Invitation::code(org.id, org.created_by_id(), InviteOptions::default());
        assert_eq!(
            InviteEmail::render("Docshare", "http://localhost", &org, "A", &invitation),
            Err(OrgError::NotEmailType)
        );
    }

    #[test]
    fn test_format_expiry() {
        let date = Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(format_expiry(Some(date)), "March 5, 2025");
        assert_eq!(format_expiry(None), "never");
    }

    #[tokio::test]
    async fn test_memory_mailer_failure_switch() {
        let (org, invitation) = email_invitation(None);
        let email = InviteEmail::render("Docshare", "http://localhost", &org, "A", &invitation)
            .unwrap();
        let mailer = MemoryMailer::new();

        mailer.set_failure(Some("smtp down")).await;
        assert_eq!(
            mailer.send(&email).await,
            Err(OrgError::DeliveryFailed("smtp down".to_string()))
        );
        assert!(mailer.sent().await.is_empty());

        mailer.set_failure(None).await;
        mailer.send(&email).await.unwrap();
        assert_eq!(mailer.sent().await.len(), 1);
    }
}
