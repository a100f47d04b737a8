//! # Actions
//!
//! Defines every action the authorization policy knows about. Anything that
//! does not parse into an [`Action`] is denied.

use serde::{Deserialize, Serialize};

/// Actions that can be performed on organizations, members and invitations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create a new organization.
    CreateOrganization,

    /// Join an organization with an invitation.
    JoinOrganization,

    /// Leave the current organization.
    LeaveOrganization,

    /// Delete an organization.
    DeleteOrganization,

    /// Edit an organization's name, description or settings.
    UpdateOrganization,

    /// Issue code or email invitations.
    InviteMembers,

    /// Give a member the admin role.
    PromoteMember,

    /// Take the admin role away from a member.
    DemoteMember,

    /// Remove a member from the organization.
    RemoveMember,

    /// List the organization's invitations.
    ViewInvites,

    /// Revoke an invitation.
    RevokeInvite,

    /// Re-deliver an email invitation.
    ResendInvite,

    /// List the organization's members.
    ViewMembers,
}

impl Action {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateOrganization => "create_organization",
            Action::JoinOrganization => "join_organization",
            Action::LeaveOrganization => "leave_organization",
            Action::DeleteOrganization => "delete_organization",
            Action::UpdateOrganization => "update_organization",
            Action::InviteMembers => "invite_members",
            Action::PromoteMember => "promote_member",
            Action::DemoteMember => "demote_member",
            Action::RemoveMember => "remove_member",
            Action::ViewInvites => "view_invites",
            Action::RevokeInvite => "revoke_invite",
            Action::ResendInvite => "resend_invite",
            Action::ViewMembers => "view_members",
        }
    }

    /// Parse action from string representation.
    ///
    /// Accepts the snake_case name in any case, with `-` or `_` separators.
    ///
    /// # Example
    ///
    /// ```
    /// use docshare_rbac::actions::Action;
    ///
    /// assert_eq!(Action::parse("invite_members"), Some(Action::InviteMembers));
    /// assert_eq!(Action::parse("Revoke-Invite"), Some(Action::RevokeInvite));
    /// assert_eq!(Action::parse("drop_database"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Action::all()
            .into_iter()
            .find(|action| action.as_str() == normalized)
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        vec![
            Action::CreateOrganization,
            Action::JoinOrganization,
            Action::LeaveOrganization,
            Action::DeleteOrganization,
            Action::UpdateOrganization,
            Action::InviteMembers,
            Action::PromoteMember,
            Action::DemoteMember,
            Action::RemoveMember,
            Action::ViewInvites,
            Action::RevokeInvite,
            Action::ResendInvite,
            Action::ViewMembers,
        ]
    }

    /// Whether the action is evaluated against an organization.
    ///
    /// Creating and joining are the only actions a user without an
    /// organization can take.
    pub fn is_organization_scoped(&self) -> bool {
        !matches!(self, Action::CreateOrganization | Action::JoinOrganization)
    }

    /// Whether the action is evaluated against a target membership.
    pub fn requires_target(&self) -> bool {
        matches!(
            self,
            Action::PromoteMember | Action::DemoteMember | Action::RemoveMember
        )
    }

    /// Check if this is a destructive action.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Action::DeleteOrganization | Action::RemoveMember | Action::RevokeInvite
        )
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse_round_trip() {
        for action in Action::all() {
            assert_eq!(Action::parse(action.as_str()), Some(action));
        }
    }

    #[test]
    fn test_action_parse_unknown() {
        assert_eq!(Action::parse(""), None);
        assert_eq!(Action::parse("manage"), None);
        assert_eq!(Action::parse("invite"), None);
    }

    #[test]
    fn test_serde_matches_as_str() {
        for action in Action::all() {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
        }
    }

    #[test]
    fn test_scoping() {
        assert!(!Action::CreateOrganization.is_organization_scoped());
        assert!(!Action::JoinOrganization.is_organization_scoped());
        assert!(Action::ViewMembers.is_organization_scoped());

        assert!(Action::RemoveMember.requires_target());
        assert!(!Action::RevokeInvite.requires_target());
    }

    #[test]
    fn test_is_destructive() {
        assert!(Action::DeleteOrganization.is_destructive());
        assert!(Action::RevokeInvite.is_destructive());
        assert!(!Action::ViewInvites.is_destructive());
    }

    #[test]
    fn test_all_actions_count() {
        assert_eq!(Action::all().len(), 13);
    }
}
