use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use bazaar_domain::pagination::PageRequest;
use bazaar_domain::user::{SellerStatus, UserRole};
use bazaar_session::cookie::clear_session_cookie;

use crate::domain::types::{Payment, User};
use crate::error::MarketError;
use crate::gate::Session;
use crate::handlers::JsonBody;
use crate::handlers::auth::MessageResponse;
use crate::handlers::product::ProductResponse;
use crate::state::AppState;
use crate::usecase::favorite::ListFavoritesUseCase;
use crate::usecase::otp::{SendOtpUseCase, VerifyOtpUseCase};
use crate::usecase::payment::ListPaymentsUseCase;
use crate::usecase::user::{
    ChangePhoneInput, ChangePhoneUseCase, DeleteAccountUseCase, GetUserUseCase,
    RequestPhoneChangeUseCase, UpdateProfileInput, UpdateProfileUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub phone: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub seller_status: Option<SellerStatus>,
    pub is_verified: bool,
    pub is_suspended: bool,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id.to_string(),
            phone: u.phone,
            name: u.name,
            role: u.role,
            seller_status: u.seller_status,
            is_verified: u.is_verified,
            is_suspended: u.is_suspended,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_me(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, MarketError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(session.user_id).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/@me ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub become_seller: Option<bool>,
}

pub async fn update_me(
    session: Session,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UpdateMeRequest>,
) -> Result<StatusCode, MarketError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(
            session.user_id,
            session.role,
            UpdateProfileInput {
                name: body.name,
                become_seller: body.become_seller,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /users/@me/phone/otp ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PhoneOtpRequest {
    pub phone: Option<String>,
}

pub async fn request_phone_change(
    session: Session,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<PhoneOtpRequest>,
) -> Result<Json<MessageResponse>, MarketError> {
    let phone = body.phone.ok_or(MarketError::Validation("phone is required"))?;
    let usecase = RequestPhoneChangeUseCase {
        users: state.user_repo(),
        send: SendOtpUseCase {
            codes: state.code_repo(),
            sms: state.sms.clone(),
            limiter: state.rate_limiter.clone(),
            limit: state.otp_rate_limit,
        },
    };
    usecase.execute(session.user_id, &phone).await?;
    Ok(Json(MessageResponse {
        message: "OTP sent successfully",
    }))
}

// ── POST /users/@me/phone ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChangePhoneRequest {
    pub phone: Option<String>,
    pub code: Option<String>,
}

pub async fn change_phone(
    session: Session,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ChangePhoneRequest>,
) -> Result<StatusCode, MarketError> {
    let (Some(phone), Some(code)) = (body.phone, body.code) else {
        return Err(MarketError::Validation("phone and code are required"));
    };
    let usecase = ChangePhoneUseCase {
        users: state.user_repo(),
        verify: VerifyOtpUseCase {
            codes: state.code_repo(),
        },
    };
    usecase
        .execute(session.user_id, ChangePhoneInput { phone, code })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /users/@me ────────────────────────────────────────────────────────

pub async fn delete_me(
    session: Session,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, MarketError> {
    let usecase = DeleteAccountUseCase {
        accounts: state.account_repo(),
    };
    usecase.execute(session.user_id).await?;
    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    Ok((jar, StatusCode::NO_CONTENT))
}

// ── GET /users/@me/favorites ─────────────────────────────────────────────────

pub async fn list_favorites(
    session: Session,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<ProductResponse>>, MarketError> {
    let usecase = ListFavoritesUseCase {
        favorites: state.favorite_repo(),
    };
    let products = usecase.execute(session.user_id, page).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

// ── GET /users/@me/payments ──────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: String,
    pub product_id: Option<String>,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub provider_ref: Option<String>,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id.to_string(),
            product_id: p.product_id.map(|id| id.to_string()),
            amount_cents: p.amount_cents,
            currency: p.currency,
            status: p.status,
            provider_ref: p.provider_ref,
            created_at: p.created_at,
        }
    }
}

pub async fn list_payments(
    session: Session,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<PaymentResponse>>, MarketError> {
    let usecase = ListPaymentsUseCase {
        payments: state.payment_repo(),
    };
    let payments = usecase.execute(session.user_id, page).await?;
    Ok(Json(payments.into_iter().map(Into::into).collect()))
}
