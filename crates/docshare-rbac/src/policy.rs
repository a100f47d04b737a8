//! # Authorization policy
//!
//! A pure function from (action, actor, organization, target) to allow/deny.
//!
//! | action | rule |
//! |---|---|
//! | create_organization, join_organization | actor has no organization and a verified email |
//! | leave_organization | actor in org and not the creator |
//! | delete_organization | actor is the creator |
//! | update_organization | actor is an admin of the org |
//! | invite_members | actor is an admin, or a member while `allow_member_invites` is on |
//! | promote_member, demote_member | actor is an admin and the target is not the creator |
//! | remove_member | target is not the creator, and actor is an admin or is the target |
//! | view_invites, revoke_invite, resend_invite | actor is an admin |
//! | view_members | actor in org |
//!
//! A super-admin passes every rule. Organization-scoped actions deny when no
//! organization is given, target actions deny when no target is given, and
//! unknown action names deny.

use docshare_org::{Actor, OrgError, OrgResult, Organization, OrganizationMembership};

use crate::actions::Action;

/// Decide whether `actor` may perform `action`.
///
/// # Arguments
///
/// * `action` - The action being attempted
/// * `actor` - Snapshot of the acting user
/// * `organization` - The organization the action applies to, if any
/// * `target` - The membership the action applies to, if any
///
/// # Example
///
/// ```
/// use docshare_org::{Actor, EntityId, Organization, OrganizationMembership, OrganizationRole};
/// use docshare_rbac::{can_perform, Action};
///
/// let creator_id = EntityId::generate();
/// let org = Organization::new("Acme", creator_id);
/// let creator = OrganizationMembership::creator(&org);
///
/// let admin = Actor::new(EntityId::generate(), true).in_organization(org.id, OrganizationRole::Admin);
/// assert!(!can_perform(Action::RemoveMember, &admin, Some(&org), Some(&creator)));
/// ```
pub fn can_perform(
    action: Action,
    actor: &Actor,
    organization: Option<&Organization>,
    target: Option<&OrganizationMembership>,
) -> bool {
    if actor.is_super_admin() {
        return true;
    }

    match action {
        Action::CreateOrganization | Action::JoinOrganization => {
            !actor.has_organization() && actor.email_verified
        }
        _ => match organization {
            Some(org) => can_perform_in(action, actor, org, target),
            None => false,
        },
    }
}

fn can_perform_in(
    action: Action,
    actor: &Actor,
    org: &Organization,
    target: Option<&OrganizationMembership>,
) -> bool {
    match action {
        Action::CreateOrganization | Action::JoinOrganization => false,

        Action::LeaveOrganization => actor.belongs_to(org) && !actor.is_creator_of(org),

        Action::DeleteOrganization => actor.is_creator_of(org),

        Action::UpdateOrganization
        | Action::ViewInvites
        | Action::RevokeInvite
        | Action::ResendInvite => actor.is_admin_of(org),

        Action::InviteMembers => {
            actor.is_admin_of(org) || (actor.belongs_to(org) && org.allows_member_invites())
        }

        Action::PromoteMember | Action::DemoteMember => match target_in(org, target) {
            Some(target) => actor.is_admin_of(org) && !org.is_creator(target.user_id),
            None => false,
        },

        Action::RemoveMember => match target_in(org, target) {
            Some(target) => {
                !org.is_creator(target.user_id)
                    && (actor.is_admin_of(org)
                        || (actor.belongs_to(org) && target.user_id == actor.user_id))
            }
            None => false,
        },

        Action::ViewMembers => actor.belongs_to(org),
    }
}

/// The target, if it is a membership of `org`.
fn target_in<'a>(
    org: &Organization,
    target: Option<&'a OrganizationMembership>,
) -> Option<&'a OrganizationMembership> {
    target.filter(|t| t.organization_id == org.id)
}

/// Decide by action name. Unknown names deny.
pub fn can_perform_named(
    action: &str,
    actor: &Actor,
    organization: Option<&Organization>,
    target: Option<&OrganizationMembership>,
) -> bool {
    Action::parse(action)
        .map(|action| can_perform(action, actor, organization, target))
        .unwrap_or(false)
}

/// Like [`can_perform`], but returns [`OrgError::Forbidden`] on deny.
pub fn authorize(
    action: Action,
    actor: &Actor,
    organization: Option<&Organization>,
    target: Option<&OrganizationMembership>,
) -> OrgResult<()> {
    if can_perform(action, actor, organization, target) {
        Ok(())
    } else {
        Err(OrgError::Forbidden)
    }
}

/// Every action the actor may take, for deciding what to render.
///
/// Target actions are evaluated against `target`; pass `None` to leave them
/// out.
pub fn allowed_actions(
    actor: &Actor,
    organization: Option<&Organization>,
    target: Option<&OrganizationMembership>,
) -> Vec<Action> {
    Action::all()
        .into_iter()
        .filter(|action| can_perform(*action, actor, organization, target))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use docshare_org::{EntityId, OrganizationRole, OrganizationSettings, SystemRole};

    struct Fixture {
        org: Organization,
        creator: Actor,
        creator_membership: OrganizationMembership,
        admin: Actor,
        admin_membership: OrganizationMembership,
        member: Actor,
        member_membership: OrganizationMembership,
        outsider: Actor,
    }

    fn fixture() -> Fixture {
        let creator_id = EntityId::generate();
        let org = Organization::new("Acme", creator_id);
        let creator_membership = OrganizationMembership::creator(&org);
        let creator = Actor::new(creator_id, true).in_organization(org.id, OrganizationRole::Admin);

        let admin_id = EntityId::generate();
        let admin_membership = OrganizationMembership::new(org.id, admin_id, OrganizationRole::Admin);
        let admin = Actor::new(admin_id, true).in_organization(org.id, OrganizationRole::Admin);

        let member_id = EntityId::generate();
        let member_membership =
            OrganizationMembership::new(org.id, member_id, OrganizationRole::Member);
        let member = Actor::new(member_id, true).in_organization(org.id, OrganizationRole::Member);

        let outsider = Actor::new(EntityId::generate(), true);

        Fixture {
            org,
            creator,
            creator_membership,
            admin,
            admin_membership,
            member,
            member_membership,
            outsider,
        }
    }

    #[test]
    fn test_create_and_join_require_no_org_and_verified_email() {
        let f = fixture();
        for action in [Action::CreateOrganization, Action::JoinOrganization] {
            assert!(can_perform(action, &f.outsider, None, None));
            assert!(!can_perform(action, &f.member, None, None));
            assert!(!can_perform(action, &f.admin, Some(&f.org), None));

            let unverified = Actor::new(EntityId::generate(), false);
            assert!(!can_perform(action, &unverified, None, None));
        }
    }

    #[test]
    fn test_creator_cannot_leave() {
        let f = fixture();
        assert!(!can_perform(Action::LeaveOrganization, &f.creator, Some(&f.org), None));
        assert!(can_perform(Action::LeaveOrganization, &f.admin, Some(&f.org), None));
        assert!(can_perform(Action::LeaveOrganization, &f.member, Some(&f.org), None));
        assert!(!can_perform(Action::LeaveOrganization, &f.outsider, Some(&f.org), None));
    }

    #[test]
    fn test_only_creator_deletes() {
        let f = fixture();
        assert!(can_perform(Action::DeleteOrganization, &f.creator, Some(&f.org), None));
        assert!(!can_perform(Action::DeleteOrganization, &f.admin, Some(&f.org), None));
        assert!(!can_perform(Action::DeleteOrganization, &f.member, Some(&f.org), None));
    }

    #[test]
    fn test_admin_only_actions() {
        let f = fixture();
        for action in [
            Action::UpdateOrganization,
            Action::ViewInvites,
            Action::RevokeInvite,
            Action::ResendInvite,
        ] {
            assert!(can_perform(action, &f.creator, Some(&f.org), None));
            assert!(can_perform(action, &f.admin, Some(&f.org), None));
            assert!(!can_perform(action, &f.member, Some(&f.org), None));
            assert!(!can_perform(action, &f.outsider, Some(&f.org), None));
        }
    }

    #[test]
    fn test_admin_of_another_org_is_denied() {
        let f = fixture();
        let other = Organization::new("Other", EntityId::generate());
        let foreign_admin =
            Actor::new(EntityId::generate(), true).in_organization(other.id, OrganizationRole::Admin);

        assert!(!can_perform(Action::ViewInvites, &foreign_admin, Some(&f.org), None));
        assert!(!can_perform(Action::InviteMembers, &foreign_admin, Some(&f.org), None));
    }

    #[test]
    fn test_member_invites_follow_setting() {
        let mut f = fixture();
        assert!(can_perform(Action::InviteMembers, &f.admin, Some(&f.org), None));
        assert!(!can_perform(Action::InviteMembers, &f.member, Some(&f.org), None));

        f.org.settings = OrganizationSettings::default().with_member_invites(true);
        assert!(can_perform(Action::InviteMembers, &f.member, Some(&f.org), None));
        assert!(!can_perform(Action::InviteMembers, &f.outsider, Some(&f.org), None));
    }

    #[test]
    fn test_creator_cannot_be_promoted_demoted_or_removed() {
        let f = fixture();
        for action in [Action::PromoteMember, Action::DemoteMember, Action::RemoveMember] {
            assert!(!can_perform(action, &f.admin, Some(&f.org), Some(&f.creator_membership)));
            assert!(!can_perform(action, &f.creator, Some(&f.org), Some(&f.creator_membership)));
        }
    }

    #[test]
    fn test_role_changes() {
        let f = fixture();
        assert!(can_perform(Action::PromoteMember, &f.admin, Some(&f.org), Some(&f.member_membership)));
        assert!(can_perform(Action::DemoteMember, &f.creator, Some(&f.org), Some(&f.admin_membership)));
        assert!(!can_perform(Action::PromoteMember, &f.member, Some(&f.org), Some(&f.member_membership)));
        assert!(!can_perform(Action::DemoteMember, &f.admin, Some(&f.org), None));
    }

    #[test]
    fn test_remove_member() {
        let f = fixture();
        assert!(can_perform(Action::RemoveMember, &f.admin, Some(&f.org), Some(&f.member_membership)));
        assert!(can_perform(Action::RemoveMember, &f.admin, Some(&f.org), Some(&f.admin_membership)));

        // Members may only remove themselves
        assert!(can_perform(Action::RemoveMember, &f.member, Some(&f.org), Some(&f.member_membership)));
        assert!(!can_perform(Action::RemoveMember, &f.member, Some(&f.org), Some(&f.admin_membership)));
    }

    #[test]
    fn test_target_from_another_org_is_denied() {
        let f = fixture();
        let stranger =
            OrganizationMembership::new(EntityId::generate(), EntityId::generate(), OrganizationRole::Member);
        assert!(!can_perform(Action::RemoveMember, &f.admin, Some(&f.org), Some(&stranger)));
        assert!(!can_perform(Action::PromoteMember, &f.admin, Some(&f.org), Some(&stranger)));
    }

    #[test]
    fn test_view_members() {
        let f = fixture();
        assert!(can_perform(Action::ViewMembers, &f.member, Some(&f.org), None));
        assert!(!can_perform(Action::ViewMembers, &f.outsider, Some(&f.org), None));
    }

    #[test]
    fn test_org_scoped_actions_deny_without_org() {
        let f = fixture();
        for action in Action::all().into_iter().filter(|a| a.is_organization_scoped()) {
            assert!(!can_perform(action, &f.creator, None, None), "{}", action);
        }
    }

    #[test]
    fn test_super_admin_bypasses_everything() {
        let f = fixture();
        let root = Actor::new(EntityId::generate(), false).with_system_role(SystemRole::SuperAdmin);
        for action in Action::all() {
            assert!(can_perform(action, &root, None, None));
            assert!(can_perform(action, &root, Some(&f.org), Some(&f.creator_membership)));
        }
    }

    #[test]
    fn test_unknown_actions_deny() {
        let f = fixture();
        assert!(!can_perform_named("transfer_ownership", &f.creator, Some(&f.org), None));
        assert!(can_perform_named("view_members", &f.member, Some(&f.org), None));
    }

    #[test]
    fn test_authorize() {
        let f = fixture();
        assert_eq!(
            authorize(Action::RevokeInvite, &f.member, Some(&f.org), None),
            Err(OrgError::Forbidden)
        );
        assert!(authorize(Action::RevokeInvite, &f.admin, Some(&f.org), None).is_ok());
    }

    #[test]
    fn test_allowed_actions_for_member() {
        let f = fixture();
        let actions = allowed_actions(&f.member, Some(&f.org), None);
        assert_eq!(actions, vec![Action::LeaveOrganization, Action::ViewMembers]);
    }
}
