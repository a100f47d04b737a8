//! Request and response bodies for the organization API.

use docshare_org::{
    InviteFilter, InviteType, Organization, OrganizationRole, PageRequest, PageSize,
};
use serde::{Deserialize, Serialize};

/// Body of `POST /organizations/{id}/invites/email`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailInviteRequest {
    /// Recipient address
    pub email: String,
}

/// Body of `PUT /organizations/{id}/members/{userId}/role`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleUpdateRequest {
    /// New role
    pub role: OrganizationRole,
}

/// Response of `POST /organizations/join/{code}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JoinResponse {
    /// The organization that was joined
    pub organization: Organization,
}

/// Query of `GET /organizations/{id}/invites`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct InviteListQuery {
    /// Only pending or active invitations
    pub active_only: bool,

    /// 1-based page
    pub page: u32,

    /// Rows per page
    pub page_size: PageSize,

    /// Restrict to code or email invitations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_type: Option<InviteType>,
}

impl InviteListQuery {
    /// Combine a filter with a page request.
    pub fn new(filter: InviteFilter, page: PageRequest) -> Self {
        Self {
            active_only: filter.active_only,
            page: page.page,
            page_size: page.page_size,
            invite_type: filter.invite_type,
        }
    }
}

/// Query of `GET /organizations/{id}/members`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MemberListQuery {
    /// 1-based page
    pub page: u32,

    /// Rows per page
    pub page_size: PageSize,

    /// Case-insensitive search over username, email and full name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl MemberListQuery {
    /// Build the query; a blank search is omitted.
    pub fn new(search: &str, page: PageRequest) -> Self {
        let search = search.trim();
        Self {
            page: page.page,
            page_size: page.page_size,
            search: (!search.is_empty()).then(|| search.to_string()),
        }
    }
}
