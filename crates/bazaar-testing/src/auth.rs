//! Session helpers for router tests.
//!
//! Mints a real signed session token so requests pass the same path through
//! the gate as a browser carrying the session cookie.

use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION, header::COOKIE};
use uuid::Uuid;

use bazaar_domain::user::UserRole;
use bazaar_session::cookie::SESSION_COOKIE;
use bazaar_session::token::{SESSION_TTL_SECS, issue_session_token};

/// Secret shared by test states and [`MockSession`].
pub const TEST_JWT_SECRET: &str = "bazaar-test-secret";

/// Identity to present in a test request.
pub struct MockSession {
    pub user_id: Uuid,
    pub role: UserRole,
    pub secret: String,
}

impl MockSession {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            secret: TEST_JWT_SECRET.to_owned(),
        }
    }

    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = secret.to_owned();
        self
    }

    /// A freshly signed session token.
    pub fn token(&self) -> String {
        issue_session_token(self.user_id, self.role, &self.secret, SESSION_TTL_SECS)
            .map(|(token, _)| token)
            .unwrap()
    }

    /// `Cookie` header carrying the session token.
    pub fn cookie_header(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("{SESSION_COOKIE}={}", self.token())).unwrap()
    }

    /// `Authorization: Bearer` header carrying the session token.
    pub fn bearer_header(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {}", self.token())).unwrap()
    }

    /// Headers as a browser would send them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(COOKIE, self.cookie_header());
        map
    }

    /// Headers as an API client would send them.
    pub fn bearer_headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, self.bearer_header());
        map
    }
}
