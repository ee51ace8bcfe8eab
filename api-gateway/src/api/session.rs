//! Session cookie handling
//!
//! The browser only ever holds the opaque token, signed so it cannot be
//! forged. Identity and role are resolved server-side on every request.

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use common::error::Result;
use common::model::session::Session;
use sha2::{Digest, Sha512};

use crate::AppState;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "azar_session";

/// Derive the cookie signing key from the configured secret
pub fn signing_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

/// Build the session cookie for a freshly issued token
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Cookie matching the session cookie's path, for removal
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Token carried by the request, if the signature checks out
pub fn session_token(jar: &SignedCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string())
}

/// Resolve the request's cookie to a live session
pub async fn current_session(state: &AppState, jar: &SignedCookieJar) -> Result<Option<Session>> {
    match session_token(jar) {
        Some(token) => state.account_service.resolve_session(&token).await,
        None => Ok(None),
    }
}
