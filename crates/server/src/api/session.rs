//! Session cookie plumbing for the handlers.

use axum::http::header::{HeaderMap, COOKIE};
use pharmstock_domain::{PharmacyId, Role, SessionToken};

use super::ApiError;
use crate::app::App;
use crate::infrastructure::session::Session;

pub const SESSION_COOKIE: &str = "pharmstock_session";

/// Pull the session token out of the Cookie header, if any.
pub fn token_from_headers(headers: &HeaderMap) -> Option<SessionToken> {
    let cookies = headers.get(COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            SessionToken::parse(value.trim()).ok()
        } else {
            None
        }
    })
}

/// Set-Cookie value for a fresh session. Expiry is enforced server-side.
pub fn session_cookie(token: SessionToken) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax")
}

/// Set-Cookie value that clears the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}

fn resolve(app: &App, headers: &HeaderMap) -> Option<(SessionToken, Session)> {
    let token = token_from_headers(headers)?;
    let session = app.sessions.resolve(token, app.clock.now())?;
    Some((token, session))
}

pub fn current_session(app: &App, headers: &HeaderMap) -> Result<Session, ApiError> {
    resolve(app, headers)
        .map(|(_, session)| session)
        .ok_or_else(|| ApiError::Unauthorized("Not logged in".into()))
}

pub fn require_admin(app: &App, headers: &HeaderMap) -> Result<Session, ApiError> {
    let session = current_session(app, headers)?;
    if session.role != Role::Admin {
        return Err(ApiError::Forbidden("Admin access required".into()));
    }
    Ok(session)
}

/// Resolve the calling pharmacy's session and its pharmacy id.
pub fn require_pharmacy(app: &App, headers: &HeaderMap) -> Result<(Session, PharmacyId), ApiError> {
    let session = current_session(app, headers)?;
    if session.role != Role::Pharmacy {
        return Err(ApiError::Forbidden("Pharmacy access required".into()));
    }
    let pharmacy_id = session
        .pharmacy_id
        .ok_or_else(|| ApiError::Internal("Pharmacy session without pharmacy id".into()))?;
    Ok((session, pharmacy_id))
}

/// Revoke whatever session the request carries; logout never fails.
pub fn revoke(app: &App, headers: &HeaderMap) {
    if let Some(token) = token_from_headers(headers) {
        app.sessions.revoke(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_token_among_other_cookies() {
        let token = SessionToken::new();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={token}; lang=en"))
                .expect("header"),
        );
        assert_eq!(token_from_headers(&headers), Some(token));
    }

    #[test]
    fn garbage_token_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{SESSION_COOKIE}=not-a-uuid")).expect("header"),
        );
        assert_eq!(token_from_headers(&headers), None);
    }

    #[test]
    fn missing_cookie_header_is_none() {
        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }
}
