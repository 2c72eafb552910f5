use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use bazaar_domain::user::UserRole;
use bazaar_session::cookie::{clear_session_cookie, set_session_cookie};

use crate::domain::types::OtpPurpose;
use crate::error::MarketError;
use crate::gate::Session;
use crate::handlers::JsonBody;
use crate::state::AppState;
use crate::usecase::identity::ResolveIdentityUseCase;
use crate::usecase::otp::{SendOtpInput, SendOtpUseCase, VerifyOtpUseCase};
use crate::usecase::session::{LoginInput, LoginUseCase};

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── POST /auth/otp ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub phone: Option<String>,
}

pub async fn send_otp(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SendOtpRequest>,
) -> Result<Json<MessageResponse>, MarketError> {
    let phone = body
        .phone
        .filter(|p| !p.trim().is_empty())
        .ok_or(MarketError::Validation("phone is required"))?;
    let usecase = SendOtpUseCase {
        codes: state.code_repo(),
        sms: state.sms.clone(),
        limiter: state.rate_limiter.clone(),
        limit: state.otp_rate_limit,
    };
    usecase
        .execute(SendOtpInput {
            phone,
            purpose: OtpPurpose::Login,
        })
        .await?;
    Ok(Json(MessageResponse {
        message: "OTP sent successfully",
    }))
}

// ── POST /auth/otp/verify ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedUser {
    pub id: String,
    pub phone: String,
    pub role: UserRole,
    pub is_verified: bool,
}

#[derive(Serialize)]
pub struct VerifyOtpResponse {
    pub message: &'static str,
    pub user: VerifiedUser,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody<VerifyOtpRequest>,
) -> Result<impl IntoResponse, MarketError> {
    let (Some(phone), Some(code)) = (body.phone, body.code) else {
        return Err(MarketError::Validation("phone and code are required"));
    };
    let usecase = LoginUseCase {
        verify: VerifyOtpUseCase {
            codes: state.code_repo(),
        },
        resolve: ResolveIdentityUseCase {
            users: state.user_repo(),
        },
        jwt_secret: state.jwt_secret.clone(),
    };
    let login = usecase.execute(LoginInput { phone, code }).await?;

    let jar = set_session_cookie(jar, login.token, state.cookie_domain.clone());
    let body = VerifyOtpResponse {
        message: "OTP verified successfully",
        user: VerifiedUser {
            id: login.user.id.to_string(),
            phone: login.user.phone,
            role: login.user.role,
            is_verified: login.user.is_verified,
        },
    };
    Ok((jar, Json(body)))
}

// ── DELETE /auth/session ─────────────────────────────────────────────────────

pub async fn sign_out(
    session: Session,
    State(state): State<AppState>,
    jar: CookieJar,
) -> impl IntoResponse {
    tracing::info!(user_id = %session.user_id, "signed out");
    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    (jar, StatusCode::NO_CONTENT)
}
