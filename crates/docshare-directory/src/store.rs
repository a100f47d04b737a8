//! System-of-record contract.
//!
//! The services never mutate entities directly; every write goes through a
//! [`DirectoryStore`] so the store can enforce the invariants that must hold
//! under concurrency: one organization per user and `used_count` never
//! exceeding `max_uses`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docshare_org::{
    Actor, EntityId, Invitation, InviteCode, OrgError, OrgResult, Organization,
    OrganizationMembership, OrganizationRole, UserAccount,
};

/// Result of a successful join.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// The organization joined
    pub organization: Organization,
    /// The new membership
    pub membership: OrganizationMembership,
    /// The invitation after its use was recorded
    pub invitation: Invitation,
}

/// Rows affected by deleting an organization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionSummary {
    /// Memberships removed
    pub members_removed: usize,
    /// Invitations that were still active and have been deactivated
    pub invites_deactivated: usize,
}

/// Storage for users, organizations, memberships and invitations.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Register a user account.
    async fn insert_user(&self, account: UserAccount) -> OrgResult<()>;

    /// Get a user account.
    async fn get_user(&self, user_id: EntityId) -> OrgResult<UserAccount>;

    /// Get the user's current membership, if any.
    async fn membership_of(&self, user_id: EntityId) -> OrgResult<Option<OrganizationMembership>>;

    /// Store a new organization together with its creator's membership.
    ///
    /// Fails with [`OrgError::AlreadyInOrganization`] if the creator already
    /// belongs to an organization.
    async fn create_organization(
        &self,
        organization: Organization,
        creator: OrganizationMembership,
    ) -> OrgResult<()>;

    /// Get an organization.
    async fn get_organization(&self, organization_id: EntityId) -> OrgResult<Organization>;

    /// Replace an organization's stored fields.
    async fn save_organization(&self, organization: Organization) -> OrgResult<()>;

    /// Delete an organization, its memberships, and deactivate its invitations.
    async fn delete_organization(&self, organization_id: EntityId) -> OrgResult<DeletionSummary>;

    /// All memberships of an organization.
    async fn list_memberships(&self, organization_id: EntityId)
        -> OrgResult<Vec<OrganizationMembership>>;

    /// Set a member's role.
    async fn update_role(
        &self,
        organization_id: EntityId,
        user_id: EntityId,
        role: OrganizationRole,
    ) -> OrgResult<OrganizationMembership>;

    /// Remove a membership.
    ///
    /// The creator's membership can never be removed.
    async fn remove_membership(
        &self,
        organization_id: EntityId,
        user_id: EntityId,
    ) -> OrgResult<OrganizationMembership>;

    /// Store a new invitation.
    async fn insert_invitation(&self, invitation: Invitation) -> OrgResult<()>;

    /// Get an invitation belonging to `organization_id`.
    async fn get_invitation(&self, organization_id: EntityId, invitation_id: EntityId)
        -> OrgResult<Invitation>;

    /// All invitations of an organization, in any state.
    async fn list_invitations(&self, organization_id: EntityId) -> OrgResult<Vec<Invitation>>;

    /// Mark an invitation inactive.
    ///
    /// # Returns
    ///
    /// The invitation and whether this call changed it
    async fn revoke_invitation(
        &self,
        organization_id: EntityId,
        invitation_id: EntityId,
    ) -> OrgResult<(Invitation, bool)>;

    /// Consume one use of the invitation identified by `code` and add
    /// `user_id` to its organization as a member.
    ///
    /// The lookup, status checks, increment and membership insert happen as
    /// one atomic step, so concurrent calls against an invitation with `k`
    /// uses left produce exactly `k` successes.
    ///
    /// # Errors
    ///
    /// * [`OrgError::InvalidCode`] - no invitation has this code, or it was revoked
    /// * [`OrgError::Expired`] - the invitation expired at or before `now`
    /// * [`OrgError::UsageLimitReached`] - no uses left
    /// * [`OrgError::AlreadyInOrganization`] - the user already has a membership
    async fn consume_invitation(
        &self,
        code: &InviteCode,
        user_id: EntityId,
        now: DateTime<Utc>,
    ) -> OrgResult<JoinOutcome>;

    /// Resolve a fresh actor snapshot for `user_id`.
    ///
    /// Deactivated accounts resolve to [`OrgError::Forbidden`].
    async fn actor(&self, user_id: EntityId) -> OrgResult<Actor> {
        let account = self.get_user(user_id).await?;
        if !account.is_active {
            return Err(OrgError::Forbidden);
        }
        let membership = self.membership_of(user_id).await?;
        Ok(Actor::from_account(&account, membership.as_ref()))
    }
}
