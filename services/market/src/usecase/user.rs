use uuid::Uuid;

use bazaar_domain::phone::normalize_phone;
use bazaar_domain::user::UserRole;

use crate::domain::repository::{
    AccountRepository, RateLimiter, SmsSender, UserRepository, VerificationCodeRepository,
};
use crate::domain::types::{MAX_NAME_LEN, OtpPurpose, User, within_len};
use crate::error::MarketError;
use crate::usecase::otp::{SendOtpInput, SendOtpUseCase, VerifyOtpInput, VerifyOtpUseCase};

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUserUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, MarketError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(MarketError::UserNotFound)
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub become_seller: Option<bool>,
}

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        role: UserRole,
        input: UpdateProfileInput,
    ) -> Result<(), MarketError> {
        let become_seller = input.become_seller.unwrap_or(false);
        if input.name.is_none() && !become_seller {
            return Err(MarketError::MissingData);
        }
        if let Some(ref name) = input.name {
            if !within_len(name, MAX_NAME_LEN) {
                return Err(MarketError::Validation("name must be 1-80 characters"));
            }
        }
        if become_seller && role == UserRole::Admin {
            return Err(MarketError::Forbidden);
        }

        if let Some(name) = input.name {
            self.users.update_name(user_id, name.trim()).await?;
        }
        if become_seller && role == UserRole::Buyer {
            self.users.promote_to_seller(user_id).await?;
            tracing::info!(user_id = %user_id, "seller application submitted");
        }
        Ok(())
    }
}

// ── RequestPhoneChange ───────────────────────────────────────────────────────

pub struct RequestPhoneChangeUseCase<U, C, S, L>
where
    U: UserRepository,
    C: VerificationCodeRepository,
    S: SmsSender,
    L: RateLimiter,
{
    pub users: U,
    pub send: SendOtpUseCase<C, S, L>,
}

impl<U, C, S, L> RequestPhoneChangeUseCase<U, C, S, L>
where
    U: UserRepository,
    C: VerificationCodeRepository,
    S: SmsSender,
    L: RateLimiter,
{
    /// Send a change-phone code to the new number.
    pub async fn execute(&self, user_id: Uuid, new_phone: &str) -> Result<(), MarketError> {
        let phone = normalize_phone(new_phone).ok_or(MarketError::InvalidPhone)?;
        if let Some(owner) = self.users.find_by_phone(&phone).await? {
            if owner.id != user_id {
                return Err(MarketError::PhoneTaken);
            }
            return Err(MarketError::Validation("phone is unchanged"));
        }
        self.send
            .execute(SendOtpInput {
                phone,
                purpose: OtpPurpose::ChangePhone,
            })
            .await
    }
}

// ── ChangePhone ──────────────────────────────────────────────────────────────

pub struct ChangePhoneInput {
    pub phone: String,
    pub code: String,
}

pub struct ChangePhoneUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub users: U,
    pub verify: VerifyOtpUseCase<C>,
}

impl<U, C> ChangePhoneUseCase<U, C>
where
    U: UserRepository,
    C: VerificationCodeRepository,
{
    pub async fn execute(&self, user_id: Uuid, input: ChangePhoneInput) -> Result<(), MarketError> {
        let phone = self
            .verify
            .execute(VerifyOtpInput {
                phone: input.phone,
                code: input.code,
                purpose: OtpPurpose::ChangePhone,
            })
            .await?;
        self.users.update_phone(user_id, &phone).await?;
        tracing::info!(user_id = %user_id, "phone changed");
        Ok(())
    }
}

// ── DeleteAccount ────────────────────────────────────────────────────────────

pub struct DeleteAccountUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> DeleteAccountUseCase<A> {
    pub async fn execute(&self, user_id: Uuid) -> Result<(), MarketError> {
        let deleted = self.accounts.delete_accounts(&[user_id]).await?;
        if deleted == 0 {
            return Err(MarketError::UserNotFound);
        }
        tracing::info!(user_id = %user_id, "account deleted");
        Ok(())
    }
}
