use bazaar_session::token::{SESSION_TTL_SECS, issue_session_token};

use crate::domain::repository::{UserRepository, VerificationCodeRepository};
use crate::domain::types::{OtpPurpose, User};
use crate::error::MarketError;
use crate::usecase::identity::ResolveIdentityUseCase;
use crate::usecase::otp::{VerifyOtpInput, VerifyOtpUseCase};

pub struct LoginInput {
    pub phone: String,
    pub code: String,
}

/// A signed session for a freshly verified user.
pub struct Login {
    pub user: User,
    pub token: String,
    pub expires_at: u64,
}

pub struct LoginUseCase<C, U>
where
    C: VerificationCodeRepository,
    U: UserRepository,
{
    pub verify: VerifyOtpUseCase<C>,
    pub resolve: ResolveIdentityUseCase<U>,
    pub jwt_secret: String,
}

impl<C, U> LoginUseCase<C, U>
where
    C: VerificationCodeRepository,
    U: UserRepository,
{
    /// Verify the login code, resolve the account and sign a session token.
    pub async fn execute(&self, input: LoginInput) -> Result<Login, MarketError> {
        let phone = self
            .verify
            .execute(VerifyOtpInput {
                phone: input.phone,
                code: input.code,
                purpose: OtpPurpose::Login,
            })
            .await?;
        let user = self.resolve.execute(&phone).await?;
        if user.is_suspended {
            return Err(MarketError::AccountSuspended);
        }

        let (token, expires_at) =
            issue_session_token(user.id, user.role, &self.jwt_secret, SESSION_TTL_SECS)
                .map_err(|e| MarketError::Internal(e.into()))?;
        tracing::info!(user_id = %user.id, role = user.role.as_str(), "session issued");
        Ok(Login {
            user,
            token,
            expires_at,
        })
    }
}
