//! Invitation lifecycle service.
//!
//! Every operation rebuilds the actor from the store, re-runs the
//! authorization policy against fresh state, performs the transition through
//! the store and then publishes a lifecycle event. Nothing is retried.

use chrono::Utc;
use docshare_events::{EventBus, InvitationEvent, MembershipEvent};
use docshare_org::{
    validate_email, Actor, EntityId, Invitation, InvitationStatus, InviteCode, InviteFilter,
    InviteOptions, OrgError, OrgResult, Organization, Page, PageRequest,
};
use docshare_rbac::{authorize, can_perform, Action};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::DirectoryConfig;
use crate::delivery::{InviteEmail, InviteMailer};
use crate::store::{DirectoryStore, JoinOutcome};

/// Issues, consumes, revokes and re-delivers invitations.
#[derive(Clone)]
pub struct InvitationService {
    store: Arc<dyn DirectoryStore>,
    bus: Arc<dyn EventBus>,
    mailer: Arc<dyn InviteMailer>,
    config: DirectoryConfig,
}

impl std::fmt::Debug for InvitationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvitationService")
            .field("config", &self.config)
            .finish()
    }
}

impl InvitationService {
    /// Create a new invitation service.
    pub fn new(
        store: Arc<dyn DirectoryStore>,
        bus: Arc<dyn EventBus>,
        mailer: Arc<dyn InviteMailer>,
        config: DirectoryConfig,
    ) -> Self {
        Self {
            store,
            bus,
            mailer,
            config,
        }
    }

    /// Load the organization and a fresh actor, then check `action`.
    async fn authorized(
        &self,
        action: Action,
        organization_id: EntityId,
        actor_id: EntityId,
    ) -> OrgResult<(Organization, Actor)> {
        let organization = self.store.get_organization(organization_id).await?;
        let actor = self.store.actor(actor_id).await?;
        authorize(action, &actor, Some(&organization), None).map_err(|e| {
            warn!(action = %action, "Authorization denied");
            e
        })?;
        Ok((organization, actor))
    }

    /// Generate a code invitation.
    ///
    /// # Errors
    ///
    /// * [`OrgError::Forbidden`] - the actor may not invite members
    /// * [`OrgError::InvalidExpiry`] / [`OrgError::InvalidMaxUses`] - bad options
    #[instrument(skip(self, options), fields(org_id = %organization_id, actor_id = %actor_id))]
    pub async fn generate(
        &self,
        organization_id: EntityId,
        actor_id: EntityId,
        options: InviteOptions,
    ) -> OrgResult<Invitation> {
        debug!("Generating invite code");
        let now = Utc::now();
        self.authorized(Action::InviteMembers, organization_id, actor_id)
            .await?;
        options.validate(now)?;

        let invitation = Invitation::code(organization_id, actor_id, options);
        self.store.insert_invitation(invitation.clone()).await?;

        info!(
            invite_id = %invitation.id,
            code = %invitation.invite_code.redacted(),
            "Invite code generated"
        );
        self.emit(InvitationEvent::Generated {
            invitation_id: invitation.id,
            organization_id,
            created_by_id: actor_id,
            expires_at: invitation.expires_at,
            max_uses: invitation.max_uses,
        })
        .await;

        Ok(invitation)
    }

    /// Create an email invitation and deliver it.
    ///
    /// The invitation is stored before delivery. If delivery fails the
    /// invitation remains and [`OrgError::DeliveryFailed`] is returned; it can
    /// be delivered again with [`InvitationService::resend`]. Misconfigured
    /// email defaults (see [`DirectoryConfig::validate`]) are reported before
    /// anything is stored.
    #[instrument(skip(self, email), fields(org_id = %organization_id, actor_id = %actor_id))]
    pub async fn send_email(
        &self,
        organization_id: EntityId,
        actor_id: EntityId,
        email: &str,
    ) -> OrgResult<Invitation> {
        debug!("Sending email invite");
        let now = Utc::now();
        let (organization, _) = self
            .authorized(Action::InviteMembers, organization_id, actor_id)
            .await?;
        let email = validate_email(email)?;

        self.config.validate()?;
        let mut options = InviteOptions::default().expires_in(now, self.config.email_invite_ttl());
        options.max_uses = self.config.email_invite_max_uses;
        options.validate(now)?;

        let invitation = Invitation::email(organization_id, actor_id, email.clone(), options);
        self.store.insert_invitation(invitation.clone()).await?;

        info!(invite_id = %invitation.id, "Email invite created");
        self.emit(InvitationEvent::Emailed {
            invitation_id: invitation.id,
            organization_id,
            created_by_id: actor_id,
            email,
        })
        .await;

        self.deliver(&organization, actor_id, &invitation).await?;
        Ok(invitation)
    }

    /// Join the organization an invite code belongs to.
    ///
    /// The code's format is checked before any lookup, so a malformed code
    /// fails with [`OrgError::InvalidCode`] without touching the store.
    ///
    /// # Errors
    ///
    /// * [`OrgError::InvalidCode`] - malformed, unknown or revoked code
    /// * [`OrgError::AlreadyInOrganization`] - the actor already has an organization
    /// * [`OrgError::NotVerified`] - the actor's email is unverified
    /// * [`OrgError::Expired`] - the invitation has expired
    /// * [`OrgError::UsageLimitReached`] - the invitation has no uses left
    #[instrument(skip(self, code), fields(actor_id = %actor_id))]
    pub async fn join(&self, code: &str, actor_id: EntityId) -> OrgResult<JoinOutcome> {
        let code = InviteCode::parse(code).map_err(|e| {
            debug!("Rejected malformed invite code");
            e
        })?;
        debug!(code = %code.redacted(), "Joining with invite code");

        let actor = self.store.actor(actor_id).await?;
        if !can_perform(Action::JoinOrganization, &actor, None, None) {
            let error = if actor.has_organization() {
                OrgError::AlreadyInOrganization
            } else if !actor.email_verified {
                OrgError::NotVerified
            } else {
                OrgError::Forbidden
            };
            warn!(error = %error, "Join denied");
            return Err(error);
        }

        let outcome = self
            .store
            .consume_invitation(&code, actor_id, Utc::now())
            .await
            .map_err(|e| {
                warn!(error = %e, "Join failed");
                e
            })?;

        info!(
            org_id = %outcome.organization.id,
            invite_id = %outcome.invitation.id,
            used_count = outcome.invitation.used_count,
            "Joined organization"
        );
        self.emit(InvitationEvent::Consumed {
            invitation_id: outcome.invitation.id,
            organization_id: outcome.organization.id,
            user_id: actor_id,
            used_count: outcome.invitation.used_count,
        })
        .await;
        self.publish(
            MembershipEvent::Joined {
                organization_id: outcome.organization.id,
                user_id: actor_id,
                invitation_id: outcome.invitation.id,
            }
            .to_event(),
        )
        .await;

        Ok(outcome)
    }

    /// Join using a shared invite link.
    ///
    /// Accepts `{origin}/join/{code}` and `{origin}/accept-invite?code={code}`
    /// and behaves exactly like [`InvitationService::join`] with the code.
    pub async fn join_link(&self, link: &str, actor_id: EntityId) -> OrgResult<JoinOutcome> {
        let code = InviteCode::from_link(link)?;
        self.join(code.as_str(), actor_id).await
    }

    /// Revoke an invitation. Revoking twice is a no-op success.
    #[instrument(skip(self), fields(org_id = %organization_id, invite_id = %invitation_id))]
    pub async fn revoke(
        &self,
        organization_id: EntityId,
        actor_id: EntityId,
        invitation_id: EntityId,
    ) -> OrgResult<Invitation> {
        self.authorized(Action::RevokeInvite, organization_id, actor_id)
            .await?;

        let (invitation, changed) = self
            .store
            .revoke_invitation(organization_id, invitation_id)
            .await?;

        if changed {
            info!("Invitation revoked");
            self.emit(InvitationEvent::Revoked {
                invitation_id,
                organization_id,
                revoked_by_id: actor_id,
            })
            .await;
        } else {
            debug!("Invitation already revoked");
        }

        Ok(invitation)
    }

    /// Deliver an email invitation again. No state changes.
    ///
    /// # Errors
    ///
    /// * [`OrgError::Forbidden`] - the actor is not an admin
    /// * [`OrgError::NotEmailType`] - the invitation is a code invitation
    /// * [`OrgError::Inactive`] - the invitation was revoked
    #[instrument(skip(self), fields(org_id = %organization_id, invite_id = %invitation_id))]
    pub async fn resend(
        &self,
        organization_id: EntityId,
        actor_id: EntityId,
        invitation_id: EntityId,
    ) -> OrgResult<()> {
        let (organization, _) = self
            .authorized(Action::ResendInvite, organization_id, actor_id)
            .await?;

        let invitation = self
            .store
            .get_invitation(organization_id, invitation_id)
            .await?;
        invitation.check_resendable()?;

        self.deliver(&organization, actor_id, &invitation).await?;

        info!("Invitation resent");
        self.emit(InvitationEvent::Resent {
            invitation_id,
            organization_id,
            resent_by_id: actor_id,
        })
        .await;

        Ok(())
    }

    /// List an organization's invitations, newest first.
    #[instrument(skip(self), fields(org_id = %organization_id))]
    pub async fn list_invites(
        &self,
        organization_id: EntityId,
        actor_id: EntityId,
        filter: InviteFilter,
        page: PageRequest,
    ) -> OrgResult<Page<Invitation>> {
        self.authorized(Action::ViewInvites, organization_id, actor_id)
            .await?;

        let now = Utc::now();
        let mut invitations: Vec<Invitation> = self
            .store
            .list_invitations(organization_id)
            .await?
            .into_iter()
            .filter(|i| filter.accepts(i, now))
            .collect();
        invitations.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(Page::from_vec(invitations, page))
    }

    /// Derived status of an invitation as of now.
    pub async fn status(
        &self,
        organization_id: EntityId,
        invitation_id: EntityId,
    ) -> OrgResult<InvitationStatus> {
        Ok(self
            .store
            .get_invitation(organization_id, invitation_id)
            .await?
            .status())
    }

    async fn deliver(
        &self,
        organization: &Organization,
        inviter_id: EntityId,
        invitation: &Invitation,
    ) -> OrgResult<()> {
        let inviter = self.store.get_user(inviter_id).await?;
        let inviter_name = inviter.full_name.as_deref().unwrap_or(&inviter.username);

        let email = InviteEmail::render(
            &self.config.app_name,
            &self.config.app_origin,
            organization,
            inviter_name,
            invitation,
        )?;

        self.mailer.send(&email).await.map_err(|e| {
            warn!(invite_id = %invitation.id, error = %e, "Invitation delivery failed");
            match e {
                OrgError::DeliveryFailed(_) => e,
                other => OrgError::DeliveryFailed(other.to_string()),
            }
        })
    }

    async fn emit(&self, event: InvitationEvent) {
        self.publish(event.to_event()).await;
    }

    async fn publish(&self, event: docshare_events::Event) {
        // The transition is already committed; a bus failure is only logged.
        if let Err(e) = self.bus.publish(event).await {
            warn!(error = %e, "Failed to publish lifecycle event");
        }
    }
}
