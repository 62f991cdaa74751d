use crate::models::user::Role;

/// Identity resolved from a request's bearer token.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub user_id: i32,
    pub role: Role,
}

/// Access tier an endpoint requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessTier {
    Public,
    Authenticated,
    Admin,
}

/// Outcome of the capability check, evaluated once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Forbidden,
    Unauthenticated,
}

pub fn check_access(identity: Option<&Identity>, required: AccessTier) -> AccessDecision {
    match (required, identity) {
        (AccessTier::Public, _) => AccessDecision::Allow,
        (_, None) => AccessDecision::Unauthenticated,
        (AccessTier::Authenticated, Some(_)) => AccessDecision::Allow,
        (AccessTier::Admin, Some(identity)) if identity.role == Role::Admin => {
            AccessDecision::Allow
        }
        (AccessTier::Admin, Some(_)) => AccessDecision::Forbidden,
    }
}
