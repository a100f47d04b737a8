//! Organization and membership service.

use docshare_events::{EventBus, MembershipEvent, OrganizationEvent};
use docshare_org::{
    validate_name, Actor, EntityId, MemberSummary, OrgError, OrgResult, Organization,
    OrganizationMembership, OrganizationRole, OrganizationUpdate, Page, PageRequest,
};
use docshare_rbac::{authorize, can_perform, Action};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::store::DirectoryStore;

/// Creates, edits and deletes organizations and manages their members.
#[derive(Clone)]
pub struct MembershipService {
    store: Arc<dyn DirectoryStore>,
    bus: Arc<dyn EventBus>,
}

impl std::fmt::Debug for MembershipService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MembershipService").finish_non_exhaustive()
    }
}

impl MembershipService {
    /// Create a new membership service.
    pub fn new(store: Arc<dyn DirectoryStore>, bus: Arc<dyn EventBus>) -> Self {
        Self { store, bus }
    }

    /// Create an organization. The creator becomes its first admin.
    ///
    /// # Errors
    ///
    /// * [`OrgError::AlreadyInOrganization`] - the actor already has an organization
    /// * [`OrgError::NotVerified`] - the actor's email is unverified
    /// * [`OrgError::InvalidName`] - blank or overlong name
    #[instrument(skip(self, description), fields(actor_id = %actor_id))]
    pub async fn create_organization(
        &self,
        actor_id: EntityId,
        name: &str,
        description: Option<&str>,
    ) -> OrgResult<Organization> {
        let actor = self.store.actor(actor_id).await?;
        if !can_perform(Action::CreateOrganization, &actor, None, None) {
            let error = if actor.has_organization() {
                OrgError::AlreadyInOrganization
            } else if !actor.email_verified {
                OrgError::NotVerified
            } else {
                OrgError::Forbidden
            };
            warn!(error = %error, "Organization creation denied");
            return Err(error);
        }

        let mut organization = Organization::new(validate_name(name)?, actor_id);
        if let Some(description) = description.map(str::trim).filter(|d| !d.is_empty()) {
            organization = organization.with_description(description);
        }

        self.store
            .create_organization(
                organization.clone(),
                OrganizationMembership::creator(&organization),
            )
            .await?;

        info!(org_id = %organization.id, "Organization created");
        self.publish(
            OrganizationEvent::Created {
                organization_id: organization.id,
                name: organization.name.clone(),
                created_by_id: actor_id,
            }
            .to_event(),
        )
        .await;

        Ok(organization)
    }

    /// Edit name, description or settings. Admins only.
    #[instrument(skip(self, update), fields(org_id = %organization_id, actor_id = %actor_id))]
    pub async fn update_organization(
        &self,
        organization_id: EntityId,
        actor_id: EntityId,
        mut update: OrganizationUpdate,
    ) -> OrgResult<Organization> {
        let (mut organization, _) = self
            .authorized(Action::UpdateOrganization, organization_id, actor_id, None)
            .await?;

        if let Some(name) = update.name.take() {
            update.name = Some(validate_name(&name)?);
        }

        if organization.apply(update) {
            self.store.save_organization(organization.clone()).await?;
            info!("Organization updated");
            self.publish(
                OrganizationEvent::Updated {
                    organization_id,
                    updated_by_id: actor_id,
                }
                .to_event(),
            )
            .await;
        } else {
            debug!("Organization update changed nothing");
        }

        Ok(organization)
    }

    /// Delete an organization. Creator only.
    ///
    /// Memberships are removed and outstanding invitations deactivated; the
    /// invitations themselves are kept.
    #[instrument(skip(self), fields(org_id = %organization_id, actor_id = %actor_id))]
    pub async fn delete_organization(&self, organization_id: EntityId, actor_id: EntityId) -> OrgResult<()> {
        self.authorized(Action::DeleteOrganization, organization_id, actor_id, None)
            .await?;

        let summary = self.store.delete_organization(organization_id).await?;

        info!(
            members_removed = summary.members_removed,
            invites_deactivated = summary.invites_deactivated,
            "Organization deleted"
        );
        self.publish(
            OrganizationEvent::Deleted {
                organization_id,
                deleted_by_id: actor_id,
                members_removed: summary.members_removed,
                invites_deactivated: summary.invites_deactivated,
            }
            .to_event(),
        )
        .await;

        Ok(())
    }

    /// List members, filtered by a case-insensitive search over username,
    /// email and full name. The creator comes first, then members by join date.
    #[instrument(skip(self, search), fields(org_id = %organization_id))]
    pub async fn list_members(
        &self,
        organization_id: EntityId,
        actor_id: EntityId,
        search: &str,
        page: PageRequest,
    ) -> OrgResult<Page<MemberSummary>> {
        let (organization, _) = self
            .authorized(Action::ViewMembers, organization_id, actor_id, None)
            .await?;

        let mut members = Vec::new();
        for membership in self.store.list_memberships(organization_id).await? {
            let account = self.store.get_user(membership.user_id).await?;
            let summary = MemberSummary {
                user_id: membership.user_id,
                username: account.username,
                email: account.email,
                full_name: account.full_name,
                role: membership.role,
                joined_at: membership.joined_at,
                is_creator: organization.is_creator(membership.user_id),
            };
            if summary.matches(search) {
                members.push(summary);
            }
        }
        members.sort_by(|a, b| {
            b.is_creator
                .cmp(&a.is_creator)
                .then(a.joined_at.cmp(&b.joined_at))
                .then(a.user_id.cmp(&b.user_id))
        });

        Ok(Page::from_vec(members, page))
    }

    /// Promote a member to admin or demote an admin to member.
    ///
    /// The creator's role can never change.
    #[instrument(skip(self), fields(org_id = %organization_id, actor_id = %actor_id))]
    pub async fn change_role(
        &self,
        organization_id: EntityId,
        actor_id: EntityId,
        user_id: EntityId,
        role: OrganizationRole,
    ) -> OrgResult<OrganizationMembership> {
        let target = self.member(organization_id, user_id).await?;
        let action = if role.is_admin() {
            Action::PromoteMember
        } else {
            Action::DemoteMember
        };
        self.authorized(action, organization_id, actor_id, Some(&target))
            .await?;

        if target.role == role {
            debug!("Role unchanged");
            return Ok(target);
        }

        let membership = self.store.update_role(organization_id, user_id, role).await?;

        info!(user_id = %user_id, role = %role, "Member role changed");
        self.publish(
            MembershipEvent::RoleChanged {
                organization_id,
                user_id,
                old_role: target.role,
                new_role: role,
                changed_by_id: actor_id,
            }
            .to_event(),
        )
        .await;

        Ok(membership)
    }

    /// Remove a member. Admins may remove anyone but the creator; members
    /// may only remove themselves.
    #[instrument(skip(self), fields(org_id = %organization_id, actor_id = %actor_id))]
    pub async fn remove_member(
        &self,
        organization_id: EntityId,
        actor_id: EntityId,
        user_id: EntityId,
    ) -> OrgResult<()> {
        let target = self.member(organization_id, user_id).await?;
        self.authorized(Action::RemoveMember, organization_id, actor_id, Some(&target))
            .await?;

        self.store.remove_membership(organization_id, user_id).await?;

        let event = if user_id == actor_id {
            info!("Member left");
            MembershipEvent::Left {
                organization_id,
                user_id,
            }
        } else {
            info!(user_id = %user_id, "Member removed");
            MembershipEvent::Removed {
                organization_id,
                user_id,
                removed_by_id: actor_id,
            }
        };
        self.publish(event.to_event()).await;

        Ok(())
    }

    /// Leave the actor's current organization. The creator cannot leave.
    #[instrument(skip(self), fields(actor_id = %actor_id))]
    pub async fn leave_organization(&self, actor_id: EntityId) -> OrgResult<()> {
        let actor = self.store.actor(actor_id).await?;
        let organization_id = actor.organization_id.ok_or(OrgError::Forbidden)?;
        let organization = self.store.get_organization(organization_id).await?;
        authorize(Action::LeaveOrganization, &actor, Some(&organization), None)?;

        self.store.remove_membership(organization_id, actor_id).await?;

        info!(org_id = %organization_id, "Left organization");
        self.publish(
            MembershipEvent::Left {
                organization_id,
                user_id: actor_id,
            }
            .to_event(),
        )
        .await;

        Ok(())
    }

    async fn member(&self, organization_id: EntityId, user_id: EntityId) -> OrgResult<OrganizationMembership> {
        self.store
            .membership_of(user_id)
            .await?
            .filter(|m| m.organization_id == organization_id)
            .ok_or(OrgError::MemberNotFound(user_id))
    }

    async fn authorized(
        &self,
        action: Action,
        organization_id: EntityId,
        actor_id: EntityId,
        target: Option<&OrganizationMembership>,
    ) -> OrgResult<(Organization, Actor)> {
        let organization = self.store.get_organization(organization_id).await?;
        let actor = self.store.actor(actor_id).await?;
        authorize(action, &actor, Some(&organization), target).map_err(|e| {
            warn!(action = %action, "Authorization denied");
            e
        })?;
        Ok((organization, actor))
    }

    async fn publish(&self, event: docshare_events::Event) {
        if let Err(e) = self.bus.publish(event).await {
            warn!(error = %e, "Failed to publish lifecycle event");
        }
    }
}
