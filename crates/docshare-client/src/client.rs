//! Organization API client.
//!
//! HTTP client for the invitation and membership endpoints. Inputs that can
//! be checked locally (invite code format, email syntax, invite options) are
//! rejected before any request is sent. Nothing is retried.

use chrono::Utc;
use docshare_org::{
    validate_email, EntityId, Invitation, InviteCode, InviteFilter, InviteOptions, MemberSummary,
    Organization, OrganizationMembership, OrganizationRole, Page, PageRequest,
};
use docshare_rbac::{can_perform, Action};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::config::ClientConfig;
use crate::envelope::{classify, RequestKind};
use crate::error::{ClientError, ClientResult};
use crate::session::SessionStore;
use crate::types::{
    EmailInviteRequest, InviteListQuery, JoinResponse, MemberListQuery, RoleUpdateRequest,
};

/// Organization API client.
#[derive(Debug, Clone)]
pub struct OrgClient {
    /// HTTP client instance.
    client: Client,

    /// Endpoint configuration.
    config: ClientConfig,

    /// Current session, shared with the rest of the application.
    session: SessionStore,
}

impl OrgClient {
    /// Create a new client using the configured timeout.
    pub fn new(config: ClientConfig, session: SessionStore) -> Self {
        let timeout = config.timeout();
        Self::with_timeout(config, session, timeout)
    }

    /// Create a new client with an explicit request timeout.
    pub fn with_timeout(config: ClientConfig, session: SessionStore, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            config,
            session,
        }
    }

    /// The client's configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The session store this client reads its token from.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Shareable link for an invitation, `{origin}/join/{code}`.
    pub fn invite_link(&self, invitation: &Invitation) -> String {
        invitation.invite_code.join_link(self.config.origin())
    }

    /// Whether the cached actor may perform `action`.
    ///
    /// Advisory only: use it to decide what to offer, never as the final
    /// check. Signed-out callers may do nothing.
    pub async fn can(
        &self,
        action: Action,
        organization: Option<&Organization>,
        target: Option<&OrganizationMembership>,
    ) -> bool {
        match self.session.actor().await {
            Some(actor) => can_perform(action, &actor, organization, target),
            None => false,
        }
    }

    /// Generate a code invitation.
    ///
    /// Options are validated locally first; an expiry in the past or a usage
    /// limit below one never reaches the backend.
    #[instrument(skip(self, options), fields(org_id = %organization_id))]
    pub async fn generate_code(
        &self,
        organization_id: EntityId,
        options: InviteOptions,
    ) -> ClientResult<Invitation> {
        debug!("Generating invite code");
        options.validate(Utc::now())?;

        let path = format!("organizations/{}/invites/generate-code", organization_id);
        let request = self.request(Method::POST, &path).await.json(&options);
        let invitation: Invitation = self.send(request, RequestKind::Other).await?;

        info!(invite_id = %invitation.id, "Invite code generated");
        Ok(invitation)
    }

    /// Send an email invitation.
    #[instrument(skip(self, email), fields(org_id = %organization_id))]
    pub async fn send_email_invite(
        &self,
        organization_id: EntityId,
        email: &str,
    ) -> ClientResult<Invitation> {
        debug!("Sending email invite");
        let email = validate_email(email)?;

        let path = format!("organizations/{}/invites/email", organization_id);
        let request = self
            .request(Method::POST, &path)
            .await
            .json(&EmailInviteRequest { email });
        let invitation: Invitation = self.send(request, RequestKind::Other).await?;

        info!(invite_id = %invitation.id, "Email invite sent");
        Ok(invitation)
    }

    /// Join an organization with an invite code.
    ///
    /// A malformed code fails with `InvalidCode` without a request. On
    /// success the cached actor becomes a member of the joined organization.
    #[instrument(skip(self, code))]
    pub async fn join(&self, code: &str) -> ClientResult<Organization> {
        let code = InviteCode::parse(code)?;
        debug!(code = %code.redacted(), "Joining with invite code");

        let path = format!("organizations/join/{}", code.as_str());
        let request = self.request(Method::POST, &path).await;
        let response: JoinResponse = self.send(request, RequestKind::Join).await?;
        let organization = response.organization;

        let organization_id = organization.id;
        self.session
            .update_actor(|actor| {
                actor.organization_id = Some(organization_id);
                actor.role = Some(OrganizationRole::Member);
            })
            .await;

        info!(org_id = %organization_id, "Joined organization");
        Ok(organization)
    }

    /// Join using a shared link; identical to [`OrgClient::join`] with the
    /// extracted code.
    pub async fn join_link(&self, link: &str) -> ClientResult<Organization> {
        let code = InviteCode::from_link(link)?;
        self.join(code.as_str()).await
    }

    /// List an organization's invitations.
    #[instrument(skip(self), fields(org_id = %organization_id))]
    pub async fn list_invites(
        &self,
        organization_id: EntityId,
        filter: InviteFilter,
        page: PageRequest,
    ) -> ClientResult<Page<Invitation>> {
        debug!("Listing invites");
        let path = format!("organizations/{}/invites", organization_id);
        let request = self
            .request(Method::GET, &path)
            .await
            .query(&InviteListQuery::new(filter, page));
        self.send(request, RequestKind::Other).await
    }

    /// Revoke an invitation. Revoking an already revoked invitation succeeds.
    #[instrument(skip(self), fields(org_id = %organization_id, invite_id = %invitation_id))]
    pub async fn revoke_invite(&self, organization_id: EntityId, invitation_id: EntityId) -> ClientResult<()> {
        debug!("Revoking invite");
        let path = format!("organizations/{}/invites/{}", organization_id, invitation_id);
        let request = self.request(Method::DELETE, &path).await;
        self.send_empty(request).await?;

        info!("Invite revoked");
        Ok(())
    }

    /// Deliver an email invitation again.
    #[instrument(skip(self), fields(org_id = %organization_id, invite_id = %invitation_id))]
    pub async fn resend_invite(&self, organization_id: EntityId, invitation_id: EntityId) -> ClientResult<()> {
        debug!("Resending invite");
        let path = format!(
            "organizations/{}/invites/{}/resend",
            organization_id, invitation_id
        );
        let request = self.request(Method::POST, &path).await;
        self.send_empty(request).await?;

        info!("Invite resent");
        Ok(())
    }

    /// List members, optionally filtered by a search query.
    #[instrument(skip(self, search), fields(org_id = %organization_id))]
    pub async fn list_members(
        &self,
        organization_id: EntityId,
        search: &str,
        page: PageRequest,
    ) -> ClientResult<Page<MemberSummary>> {
        debug!("Listing members");
        let path = format!("organizations/{}/members", organization_id);
        let request = self
            .request(Method::GET, &path)
            .await
            .query(&MemberListQuery::new(search, page));
        self.send(request, RequestKind::Other).await
    }

    /// Change a member's role.
    #[instrument(skip(self), fields(org_id = %organization_id, user_id = %user_id))]
    pub async fn update_member_role(
        &self,
        organization_id: EntityId,
        user_id: EntityId,
        role: OrganizationRole,
    ) -> ClientResult<OrganizationMembership> {
        debug!(role = %role, "Updating member role");
        let path = format!("organizations/{}/members/{}/role", organization_id, user_id);
        let request = self
            .request(Method::PUT, &path)
            .await
            .json(&RoleUpdateRequest { role });
        let membership: OrganizationMembership = self.send(request, RequestKind::Other).await?;

        info!(role = %membership.role, "Member role updated");
        Ok(membership)
    }

    /// Remove a member from the organization.
    #[instrument(skip(self), fields(org_id = %organization_id, user_id = %user_id))]
    pub async fn remove_member(&self, organization_id: EntityId, user_id: EntityId) -> ClientResult<()> {
        debug!("Removing member");
        let path = format!("organizations/{}/members/{}", organization_id, user_id);
        let request = self.request(Method::DELETE, &path).await;
        self.send_empty(request).await?;

        info!("Member removed");
        Ok(())
    }

    /// Start a request, attaching the bearer token when signed in.
    async fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.client.request(method, self.config.url(path));
        match self.session.token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T>(&self, request: RequestBuilder, kind: RequestKind) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.check(request.send().await?, kind).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn send_empty(&self, request: RequestBuilder) -> ClientResult<()> {
        self.check(request.send().await?, RequestKind::Other).await?;
        Ok(())
    }

    /// Turn error statuses into [`ClientError`]s.
    async fn check(&self, response: Response, kind: RequestKind) -> ClientResult<Response> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            error!("Session rejected by the API; clearing local session");
            self.session.clear().await;
            return Err(ClientError::SessionExpired);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = classify(status.as_u16(), &body, kind);
            warn!(status = status.as_u16(), error = %error, "API error");
            return Err(error);
        }

        Ok(response)
    }
}
