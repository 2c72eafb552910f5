use bazaar_domain::phone::mask_phone;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::MarketError;

pub struct ResolveIdentityUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ResolveIdentityUseCase<U> {
    /// Find or create the account for a verified phone.
    ///
    /// New accounts start as verified buyers. Existing accounts are marked
    /// verified; running this twice for one phone yields the same account.
    pub async fn execute(&self, phone: &str) -> Result<User, MarketError> {
        let user = self.users.upsert_verified(phone).await?;
        tracing::debug!(user_id = %user.id, phone = %mask_phone(phone), "identity resolved");
        Ok(user)
    }
}
