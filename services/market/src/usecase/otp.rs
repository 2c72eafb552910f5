use chrono::{Duration, Utc};
use rand::RngExt;

use bazaar_domain::phone::{mask_phone, normalize_phone};

use crate::domain::repository::{RateLimiter, SmsSender, VerificationCodeRepository};
use crate::domain::types::{OTP_TTL_SECS, OtpPurpose, RateLimit, VerificationCode};
use crate::error::MarketError;

fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(100_000..=999_999u32).to_string()
}

fn otp_message(code: &str) -> String {
    format!(
        "Your Bazaar verification code is {code}. It expires in {} minutes.",
        OTP_TTL_SECS / 60
    )
}

// ── SendOtp ──────────────────────────────────────────────────────────────────

pub struct SendOtpInput {
    pub phone: String,
    pub purpose: OtpPurpose,
}

pub struct SendOtpUseCase<C, S, L>
where
    C: VerificationCodeRepository,
    S: SmsSender,
    L: RateLimiter,
{
    pub codes: C,
    pub sms: S,
    pub limiter: L,
    pub limit: RateLimit,
}

impl<C, S, L> SendOtpUseCase<C, S, L>
where
    C: VerificationCodeRepository,
    S: SmsSender,
    L: RateLimiter,
{
    /// Issue a fresh code for the phone, replacing any live one, and send it.
    ///
    /// The stored code is kept when delivery fails; it stays valid for a retry
    /// until it expires or is superseded.
    pub async fn execute(&self, input: SendOtpInput) -> Result<(), MarketError> {
        let phone = normalize_phone(&input.phone).ok_or(MarketError::InvalidPhone)?;

        if !self.limiter.hit(&format!("otp:{phone}"), self.limit).await? {
            return Err(MarketError::RateLimited);
        }

        let now = Utc::now();
        let code = VerificationCode {
            phone: phone.clone(),
            code: generate_code(),
            purpose: input.purpose,
            expires_at: now + Duration::seconds(OTP_TTL_SECS),
            created_at: now,
        };
        self.codes.upsert(&code).await?;

        self.sms.send(&phone, &otp_message(&code.code)).await?;
        tracing::info!(
            phone = %mask_phone(&phone),
            purpose = input.purpose.as_str(),
            "otp issued"
        );
        Ok(())
    }
}

// ── VerifyOtp ────────────────────────────────────────────────────────────────

pub struct VerifyOtpInput {
    pub phone: String,
    pub code: String,
    pub purpose: OtpPurpose,
}

pub struct VerifyOtpUseCase<C: VerificationCodeRepository> {
    pub codes: C,
}

impl<C: VerificationCodeRepository> VerifyOtpUseCase<C> {
    /// Check a submitted code and consume it. Returns the normalized phone.
    ///
    /// Does not establish a session.
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<String, MarketError> {
        let phone = normalize_phone(&input.phone).ok_or(MarketError::InvalidPhone)?;
        let submitted = input.code.trim();
        if submitted.is_empty() {
            return Err(MarketError::Validation("code is required"));
        }

        let stored = self
            .codes
            .find(&phone)
            .await?
            .filter(|c| c.purpose == input.purpose)
            .ok_or(MarketError::OtpNotFound)?;

        if stored.is_expired_at(Utc::now()) {
            self.codes.delete(&phone).await?;
            return Err(MarketError::OtpExpired);
        }

        if stored.code != submitted {
            return Err(MarketError::OtpInvalid);
        }

        // A concurrent verification may have consumed the code since `find`.
        if !self.codes.delete(&phone).await? {
            return Err(MarketError::OtpNotFound);
        }
        Ok(phone)
    }
}
