//! In-memory directory store.
//!
//! All state lives behind one lock, which makes every trait method a single
//! atomic step. Suitable for a single process and for tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docshare_org::{
    EntityId, Invitation, InviteCode, OrgError, OrgResult, Organization, OrganizationMembership,
    OrganizationRole, UserAccount,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::store::{DeletionSummary, DirectoryStore, JoinOutcome};

#[derive(Debug, Default)]
struct State {
    users: HashMap<EntityId, UserAccount>,
    organizations: HashMap<EntityId, Organization>,
    /// Keyed by user: a user has at most one membership
    memberships: HashMap<EntityId, OrganizationMembership>,
    invitations: HashMap<EntityId, Invitation>,
    /// Invite code to invitation ID
    codes: HashMap<String, EntityId>,
}

impl State {
    fn organization(&self, organization_id: EntityId) -> OrgResult<&Organization> {
        self.organizations
            .get(&organization_id)
            .ok_or(OrgError::OrganizationNotFound(organization_id))
    }

    fn member_mut(
        &mut self,
        organization_id: EntityId,
        user_id: EntityId,
    ) -> OrgResult<&mut OrganizationMembership> {
        self.memberships
            .get_mut(&user_id)
            .filter(|m| m.organization_id == organization_id)
            .ok_or(OrgError::MemberNotFound(user_id))
    }

    fn invitation_mut(
        &mut self,
        organization_id: EntityId,
        invitation_id: EntityId,
    ) -> OrgResult<&mut Invitation> {
        self.invitations
            .get_mut(&invitation_id)
            .filter(|i| i.organization_id == organization_id)
            .ok_or(OrgError::InvitationNotFound(invitation_id))
    }
}

/// In-memory [`DirectoryStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    state: Arc<RwLock<State>>,
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DirectoryStore for MemoryDirectory {
    async fn insert_user(&self, account: UserAccount) -> OrgResult<()> {
        let mut state = self.state.write().await;
        if state.users.contains_key(&account.id) {
            return Err(OrgError::Internal(format!("duplicate user {}", account.id)));
        }
        state.users.insert(account.id, account);
        Ok(())
    }

    async fn get_user(&self, user_id: EntityId) -> OrgResult<UserAccount> {
        self.state
            .read()
            .await
            .users
            .get(&user_id)
            .cloned()
            .ok_or(OrgError::UserNotFound(user_id))
    }

    async fn membership_of(&self, user_id: EntityId) -> OrgResult<Option<OrganizationMembership>> {
        Ok(self.state.read().await.memberships.get(&user_id).cloned())
    }

    async fn create_organization(
        &self,
        organization: Organization,
        creator: OrganizationMembership,
    ) -> OrgResult<()> {
        let mut state = self.state.write().await;
        if creator.organization_id != organization.id
            || !organization.is_creator(creator.user_id)
            || creator.role != OrganizationRole::Admin
        {
            return Err(OrgError::Internal(
                "creator membership does not match organization".to_string(),
            ));
        }
        if state.memberships.contains_key(&creator.user_id) {
            return Err(OrgError::AlreadyInOrganization);
        }
        state.memberships.insert(creator.user_id, creator);
        state.organizations.insert(organization.id, organization);
        Ok(())
    }

    async fn get_organization(&self, organization_id: EntityId) -> OrgResult<Organization> {
        self.state.read().await.organization(organization_id).cloned()
    }

    async fn save_organization(&self, organization: Organization) -> OrgResult<()> {
        let mut state = self.state.write().await;
        let stored = state
            .organizations
            .get_mut(&organization.id)
            .ok_or(OrgError::OrganizationNotFound(organization.id))?;
        if stored.created_by_id() != organization.created_by_id() {
            return Err(OrgError::Internal("organization creator cannot change".to_string()));
        }
        *stored = organization;
        Ok(())
    }

    async fn delete_organization(&self, organization_id: EntityId) -> OrgResult<DeletionSummary> {
        let mut state = self.state.write().await;
        state.organization(organization_id)?;

        let before = state.memberships.len();
        state
            .memberships
            .retain(|_, m| m.organization_id != organization_id);
        let members_removed = before - state.memberships.len();

        let mut invites_deactivated = 0;
        for invitation in state
            .invitations
            .values_mut()
            .filter(|i| i.organization_id == organization_id)
        {
            if invitation.revoke() {
                invites_deactivated += 1;
            }
        }

        state.organizations.remove(&organization_id);

        Ok(DeletionSummary {
            members_removed,
            invites_deactivated,
        })
    }

    async fn list_memberships(
        &self,
        organization_id: EntityId,
    ) -> OrgResult<Vec<OrganizationMembership>> {
        let state = self.state.read().await;
        state.organization(organization_id)?;
        Ok(state
            .memberships
            .values()
            .filter(|m| m.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn update_role(
        &self,
        organization_id: EntityId,
        user_id: EntityId,
        role: OrganizationRole,
    ) -> OrgResult<OrganizationMembership> {
        let mut state = self.state.write().await;
        if state.organization(organization_id)?.is_creator(user_id) && !role.is_admin() {
            return Err(OrgError::Forbidden);
        }
        let membership = state.member_mut(organization_id, user_id)?;
        membership.role = role;
        Ok(membership.clone())
    }

    async fn remove_membership(
        &self,
        organization_id: EntityId,
        user_id: EntityId,
    ) -> OrgResult<OrganizationMembership> {
        let mut state = self.state.write().await;
        if state.organization(organization_id)?.is_creator(user_id) {
            return Err(OrgError::Forbidden);
        }
        state.member_mut(organization_id, user_id)?;
        state
            .memberships
            .remove(&user_id)
            .ok_or(OrgError::MemberNotFound(user_id))
    }

    async fn insert_invitation(&self, invitation: Invitation) -> OrgResult<()> {
        let mut state = self.state.write().await;
        state.organization(invitation.organization_id)?;
        if state.codes.contains_key(invitation.invite_code.as_str()) {
            return Err(OrgError::Internal("invite code collision".to_string()));
        }
        state
            .codes
            .insert(invitation.invite_code.as_str().to_string(), invitation.id);
        state.invitations.insert(invitation.id, invitation);
        Ok(())
    }

    async fn get_invitation(
        &self,
        organization_id: EntityId,
        invitation_id: EntityId,
    ) -> OrgResult<Invitation> {
        self.state
            .read()
            .await
            .invitations
            .get(&invitation_id)
            .filter(|i| i.organization_id == organization_id)
            .cloned()
            .ok_or(OrgError::InvitationNotFound(invitation_id))
    }

    async fn list_invitations(&self, organization_id: EntityId) -> OrgResult<Vec<Invitation>> {
        let state = self.state.read().await;
        state.organization(organization_id)?;
        Ok(state
            .invitations
            .values()
            .filter(|i| i.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn revoke_invitation(
        &self,
        organization_id: EntityId,
        invitation_id: EntityId,
    ) -> OrgResult<(Invitation, bool)> {
        let mut state = self.state.write().await;
        let invitation = state.invitation_mut(organization_id, invitation_id)?;
        let changed = invitation.revoke();
        Ok((invitation.clone(), changed))
    }

    async fn consume_invitation(
        &self,
        code: &InviteCode,
        user_id: EntityId,
        now: DateTime<Utc>,
    ) -> OrgResult<JoinOutcome> {
        let mut state = self.state.write().await;

        let invitation_id = *state
            .codes
            .get(code.as_str())
            .ok_or(OrgError::InvalidCode)?;
        let invitation = state
            .invitations
            .get(&invitation_id)
            .ok_or(OrgError::InvalidCode)?;
        invitation.check_joinable(now)?;

        if state.memberships.contains_key(&user_id) {
            return Err(OrgError::AlreadyInOrganization);
        }
        let organization = state.organization(invitation.organization_id)?.clone();

        let invitation = state
            .invitations
            .get_mut(&invitation_id)
            .ok_or(OrgError::InvalidCode)?;
        invitation.consume(now)?;
        let invitation = invitation.clone();

        let membership = OrganizationMembership::new(
            organization.id,
            user_id,
            OrganizationRole::Member,
        )
        .with_invitation(invitation.id, invitation.created_by_id);
        state.memberships.insert(user_id, membership.clone());

        Ok(JoinOutcome {
            organization,
            membership,
            invitation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use docshare_org::InviteOptions;

    async fn seeded() -> (MemoryDirectory, Organization) {
        let store = MemoryDirectory::new();
        let creator = UserAccount::new("alice", "alice@example.com").verified();
        let org = Organization::new("Acme", creator.id);
        store.insert_user(creator).await.unwrap();
        store
            .create_organization(org.clone(), OrganizationMembership::creator(&org))
            .await
            .unwrap();
        (store, org)
    }

    #[tokio::test]
    async fn test_consume_increments_and_adds_member() {
        let (store, org) = seeded().await;
        let invitation = Invitation::code(
            org.id,
            org.created_by_id(),
            InviteOptions::default().max_uses(2),
        );
        let code = invitation.invite_code.clone();
        store.insert_invitation(invitation).await.unwrap();

        let user_id = EntityId::generate();
        let outcome = store
            .consume_invitation(&code, user_id, Utc::now())
            .await
            .unwrap();

        assert_eq!(outcome.invitation.used_count, 1);
        assert_eq!(outcome.membership.role, OrganizationRole::Member);
        assert_eq!(outcome.membership.invited_by, Some(org.created_by_id()));
        assert_eq!(
            store.membership_of(user_id).await.unwrap().unwrap().organization_id,
            org.id
        );
    }

    #[tokio::test]
    async fn test_consume_failures_leave_state_untouched() {
        let (store, org) = seeded().await;
        let now = Utc::now();
        let invitation = Invitation::code(
            org.id,
            org.created_by_id(),
            InviteOptions::default().expires_in(now, Duration::hours(1)),
        );
        let code = invitation.invite_code.clone();
        let invitation_id = invitation.id;
        store.insert_invitation(invitation).await.unwrap();

        let result = store
            .consume_invitation(&code, EntityId::generate(), now + Duration::hours(1))
            .await;
        assert_eq!(result.unwrap_err(), OrgError::Expired);

        // Creator already has a membership
        let result = store.consume_invitation(&code, org.created_by_id(), now).await;
        assert_eq!(result.unwrap_err(), OrgError::AlreadyInOrganization);

        let stored = store.get_invitation(org.id, invitation_id).await.unwrap();
        assert_eq!(stored.used_count, 0);
    }

    #[tokio::test]
    async fn test_unknown_code() {
        let (store, _) = seeded().await;
        let result = store
            .consume_invitation(&InviteCode::generate(), EntityId::generate(), Utc::now())
            .await;
        assert_eq!(result.unwrap_err(), OrgError::InvalidCode);
    }

    #[tokio::test]
    async fn test_creator_membership_is_protected() {
        let (store, org) = seeded().await;
        let creator_id = org.created_by_id();

        assert_eq!(
            store.remove_membership(org.id, creator_id).await.unwrap_err(),
            OrgError::Forbidden
        );
        assert_eq!(
            store
                .update_role(org.id, creator_id, OrganizationRole::Member)
                .await
                .unwrap_err(),
            OrgError::Forbidden
        );
    }

    #[tokio::test]
    async fn test_creator_cannot_create_second_organization() {
        let (store, org) = seeded().await;
        let second = Organization::new("Second", org.created_by_id());
        let result = store
            .create_organization(second.clone(), OrganizationMembership::creator(&second))
            .await;
        assert_eq!(result.unwrap_err(), OrgError::AlreadyInOrganization);
    }

    #[tokio::test]
    async fn test_delete_removes_members_and_deactivates_invites() {
        let (store, org) = seeded().await;
        let open = Invitation::code(org.id, org.created_by_id(), InviteOptions::default());
        let mut revoked = Invitation::code(org.id, org.created_by_id(), InviteOptions::default());
        revoked.revoke();
        let open_id = open.id;
        store.insert_invitation(open).await.unwrap();
        store.insert_invitation(revoked).await.unwrap();

        let summary = store.delete_organization(org.id).await.unwrap();
        assert_eq!(
            summary,
            DeletionSummary {
                members_removed: 1,
                invites_deactivated: 1
            }
        );
        assert!(store.membership_of(org.created_by_id()).await.unwrap().is_none());
        assert_eq!(
            store.get_organization(org.id).await.unwrap_err(),
            OrgError::OrganizationNotFound(org.id)
        );
        // History is retained
        let state = store.state.read().await;
        assert!(!state.invitations[&open_id].is_active);
    }

    #[tokio::test]
    async fn test_invitation_scoped_to_organization() {
        let (store, org) = seeded().await;
        let invitation = Invitation::code(org.id, org.created_by_id(), InviteOptions::default());
        let invitation_id = invitation.id;
        store.insert_invitation(invitation).await.unwrap();

        let other = EntityId::generate();
        assert_eq!(
            store.revoke_invitation(other, invitation_id).await.unwrap_err(),
            OrgError::InvitationNotFound(invitation_id)
        );
    }
}
