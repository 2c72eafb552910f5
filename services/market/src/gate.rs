//! Session gate: the one check every protected handler runs first.
//!
//! `Session<A>` is an axum extractor. It resolves the session token (cookie
//! or bearer header), loads the live account, and admits it only if the
//! account exists, is not suspended, and holds the access `A` requires.
//!
//! | outcome | status |
//! |---------|--------|
//! | no token, bad token, unknown user | 401 |
//! | suspended account | 403 |
//! | role lacks required access | 403 |

use std::future::Future;
use std::marker::PhantomData;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use uuid::Uuid;

use bazaar_domain::user::{SellerStatus, UserRole};
use bazaar_session::cookie::session_token_from_headers;
use bazaar_session::token::validate_session_token;

use crate::domain::repository::UserRepository;
use crate::error::MarketError;
use crate::state::AppState;

/// Access level a route requires.
pub trait Access: Send + Sync + 'static {
    fn permits(role: UserRole) -> bool;
}

/// Any signed-in, non-suspended account.
#[derive(Debug)]
pub struct Authenticated;

impl Access for Authenticated {
    fn permits(_role: UserRole) -> bool {
        true
    }
}

/// Admin surfaces.
#[derive(Debug)]
pub struct AdminOnly;

impl Access for AdminOnly {
    fn permits(role: UserRole) -> bool {
        role.is_admin()
    }
}

/// An admitted caller. The role and flags are read from the database on
/// every request, not from the token.
#[derive(Debug)]
pub struct Session<A: Access = Authenticated> {
    pub user_id: Uuid,
    pub role: UserRole,
    pub is_verified: bool,
    pub seller_status: Option<SellerStatus>,
    access: PhantomData<fn() -> A>,
}

/// Load the account behind a validated token and apply the access rules.
pub async fn admit<U, A>(users: &U, user_id: Uuid) -> Result<Session<A>, MarketError>
where
    U: UserRepository,
    A: Access,
{
    let user = users
        .find_by_id(user_id)
        .await?
        .ok_or(MarketError::Unauthenticated)?;
    if user.is_suspended {
        return Err(MarketError::AccountSuspended);
    }
    if !A::permits(user.role) {
        return Err(MarketError::Forbidden);
    }
    Ok(Session {
        user_id: user.id,
        role: user.role,
        is_verified: user.is_verified,
        seller_status: user.seller_status,
        access: PhantomData,
    })
}

impl<A: Access> FromRequestParts<AppState> for Session<A> {
    type Rejection = MarketError;

    // Read the headers synchronously and return a 'static future; an
    // `async fn` here would capture the `parts` borrow.
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = session_token_from_headers(&parts.headers);
        let state = state.clone();
        async move {
            let token = token.ok_or(MarketError::Unauthenticated)?;
            let info = validate_session_token(&token, &state.jwt_secret).map_err(|e| {
                tracing::debug!(error = %e, "session token rejected");
                MarketError::Unauthenticated
            })?;
            admit::<_, A>(&state.user_repo(), info.user_id).await
        }
    }
}

/// `Option<Session>` for public routes that show more to a signed-in caller.
/// Any rejection other than an internal failure reads as anonymous.
impl OptionalFromRequestParts<AppState> for Session<Authenticated> {
    type Rejection = MarketError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let token = session_token_from_headers(&parts.headers);
        let state = state.clone();
        async move {
            let Some(token) = token else {
                return Ok(None);
            };
            let Ok(info) = validate_session_token(&token, &state.jwt_secret) else {
                return Ok(None);
            };
            match admit::<_, Authenticated>(&state.user_repo(), info.user_id).await {
                Ok(session) => Ok(Some(session)),
                Err(MarketError::Internal(e)) => Err(MarketError::Internal(e)),
                Err(_) => Ok(None),
            }
        }
    }
}
