use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use bazaar_core::error::error_response;

/// Marketplace service error variants.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("invalid phone number")]
    InvalidPhone,
    #[error("missing data")]
    MissingData,
    #[error("OTP not found")]
    OtpNotFound,
    #[error("OTP expired")]
    OtpExpired,
    #[error("Invalid OTP")]
    OtpInvalid,
    #[error("invalid batch")]
    InvalidBatch,
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
    #[error("account suspended")]
    AccountSuspended,
    #[error("seller not approved")]
    SellerNotApproved,
    #[error("user not found")]
    UserNotFound,
    #[error("product not found")]
    ProductNotFound,
    #[error("chat not found")]
    ChatNotFound,
    #[error("ticket not found")]
    TicketNotFound,
    #[error("phone already in use")]
    PhoneTaken,
    #[error("too many requests")]
    RateLimited,
    #[error("failed to send OTP")]
    Delivery(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl MarketError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::InvalidPhone => "INVALID_PHONE",
            Self::MissingData => "MISSING_DATA",
            Self::OtpNotFound => "OTP_NOT_FOUND",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::OtpInvalid => "OTP_INVALID",
            Self::InvalidBatch => "INVALID_BATCH",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::AccountSuspended => "ACCOUNT_SUSPENDED",
            Self::SellerNotApproved => "SELLER_NOT_APPROVED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::ChatNotFound => "CHAT_NOT_FOUND",
            Self::TicketNotFound => "TICKET_NOT_FOUND",
            Self::PhoneTaken => "PHONE_TAKEN",
            Self::RateLimited => "RATE_LIMITED",
            Self::Delivery(_) => "DELIVERY",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidPhone
            | Self::MissingData
            | Self::OtpNotFound
            | Self::OtpExpired
            | Self::OtpInvalid
            | Self::InvalidBatch => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::AccountSuspended | Self::SellerNotApproved => {
                StatusCode::FORBIDDEN
            }
            Self::UserNotFound
            | Self::ProductNotFound
            | Self::ChatNotFound
            | Self::TicketNotFound => StatusCode::NOT_FOUND,
            Self::PhoneTaken => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Delivery(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
            }
            Self::Delivery(e) => {
                tracing::error!(error = %format!("{e:#}"), kind = "DELIVERY", "sms delivery failed");
            }
            _ => {}
        }
        error_response(self.status(), self.kind(), &self.to_string())
    }
}
