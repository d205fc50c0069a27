use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap, HeaderValue,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::access::Role;
use crate::config::SessionSettings;

/// Claims of a session token issued by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    #[serde(default)]
    pub email: String,
    /// Role from the user's profile, if the provider sets one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub profile_role: Option<Role>,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        // Super-admin comes from the super_admins table or tenant ownership, never from a claim
        let profile_role = claims.profile_role.as_deref().and_then(|raw| match raw.parse::<Role>() {
            Ok(role) if role.is_membership_role() => Some(role),
            _ => {
                tracing::debug!("Ignoring profile role '{}' for user {}", raw, claims.sub);
                None
            }
        });
        Self {
            user_id: claims.sub,
            email: claims.email,
            profile_role,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Session secret not configured")]
    SecretMissing,

    #[error("Invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Session lifetime out of range")]
    InvalidTtl,
}

/// Verify a session token and return the identity it carries.
pub fn decode_session_token(token: &str, settings: &SessionSettings) -> Result<Identity, AuthError> {
    if settings.jwt_secret.is_empty() {
        return Err(AuthError::SecretMissing);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    match &settings.jwt_audience {
        Some(audience) => {
            validation.set_audience(&[audience.as_str()]);
            // set_audience alone accepts tokens that omit the claim
            validation.set_required_spec_claims(&["exp", "aud"]);
        }
        None => validation.validate_aud = false,
    }

    let key = DecodingKey::from_secret(settings.jwt_secret.as_bytes());
    let data = decode::<Claims>(token, &key, &validation)?;
    Ok(Identity::from(data.claims))
}

/// Sign a session token for an identity. Used by the developer CLI and tests;
/// in production the auth provider issues tokens.
pub fn issue_session_token(
    identity: &Identity,
    settings: &SessionSettings,
    ttl: Duration,
) -> Result<String, AuthError> {
    if settings.jwt_secret.is_empty() {
        return Err(AuthError::SecretMissing);
    }

    let now = Utc::now();
    let expires = now.checked_add_signed(ttl).ok_or(AuthError::InvalidTtl)?;
    let claims = Claims {
        sub: identity.user_id,
        email: identity.email.clone(),
        profile_role: identity.profile_role.map(|r| r.as_str().to_string()),
        aud: settings.jwt_audience.clone(),
        iat: now.timestamp(),
        exp: expires.timestamp(),
    };

    let key = EncodingKey::from_secret(settings.jwt_secret.as_bytes());
    Ok(encode(&Header::new(Algorithm::HS256), &claims, &key)?)
}

/// Session token from `Authorization: Bearer` or, failing that, the session cookie.
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let value = headers.get(COOKIE)?.to_str().ok()?;
    value.split(';').find_map(|pair| {
        let (key, val) = pair.trim().split_once('=')?;
        (key.trim() == cookie_name && !val.trim().is_empty()).then(|| val.trim().to_string())
    })
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// `Set-Cookie` value carrying the session token.
pub fn session_cookie(token: &str, settings: &SessionSettings) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        settings.cookie_name, token, settings.ttl_secs
    );
    if settings.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(settings: &SessionSettings) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", settings.cookie_name);
    if settings.cookie_secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}
