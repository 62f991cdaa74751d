use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use rocket_okapi::request::OpenApiFromRequest;

use crate::models::user::Role;
use crate::utils::access::{check_access, AccessDecision, AccessTier, Identity};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user_id
    pub role: String,
    pub exp: usize,
}

/// Guard for endpoints open to any authenticated user.
#[derive(Debug, OpenApiFromRequest)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub role: Role,
}

/// Guard for admin-only endpoints. A valid token without the ADMIN role
/// fails with 403, a missing or invalid token with 401.
#[derive(Debug, OpenApiFromRequest)]
pub struct AdminUser {
    pub user_id: i32,
}

pub fn generate_token(user_id: i32, role: Role) -> Result<String, jsonwebtoken::errors::Error> {
    let expiration = chrono::Utc::now()
        // Set expiration time to 24 hours
        .checked_add_signed(chrono::Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: expiration,
    };

    let secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

// Resolve the request to an identity. A missing, malformed or expired
// token resolves to None; tier checks turn that into a 401.
fn identity_from_request(request: &Request<'_>) -> Option<Identity> {
    let token = match request.headers().get_one("Authorization") {
        Some(token) if token.starts_with("Bearer ") => token[7..].to_string(),
        _ => return None,
    };

    let secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;

    let role = Role::from_str(&token_data.claims.role).ok()?;
    Some(Identity {
        user_id: token_data.claims.sub,
        role,
    })
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let identity = identity_from_request(request);
        match (check_access(identity.as_ref(), AccessTier::Authenticated), identity) {
            (AccessDecision::Allow, Some(identity)) => Outcome::Success(AuthenticatedUser {
                user_id: identity.user_id,
                role: identity.role,
            }),
            _ => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let identity = identity_from_request(request);
        match (check_access(identity.as_ref(), AccessTier::Admin), identity) {
            (AccessDecision::Allow, Some(identity)) => {
                Outcome::Success(AdminUser { user_id: identity.user_id })
            }
            (AccessDecision::Forbidden, _) => Outcome::Error((Status::Forbidden, ())),
            _ => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}
