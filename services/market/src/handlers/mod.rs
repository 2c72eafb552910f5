pub mod admin;
pub mod auth;
pub mod chat;
pub mod health;
pub mod product;
pub mod ticket;
pub mod user;

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::MarketError;

/// `Json<T>` whose rejection renders as the service's error envelope (400)
/// instead of axum's plain-text 415/422.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = MarketError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "request body rejected");
                Err(MarketError::Validation("invalid request body"))
            }
        }
    }
}
