use uuid::Uuid;

use bazaar_domain::listing::ListingStatus;
use bazaar_domain::pagination::PageRequest;
use bazaar_domain::phone::mask_phone;
use bazaar_domain::user::{SellerStatus, UserRole};

use crate::domain::repository::{AccountRepository, ProductRepository, SmsSender, UserRepository};
use crate::domain::types::{BulkAction, MAX_BULK_IDS, Product, User, dedupe_ids};
use crate::error::MarketError;

/// Send a notice without letting a provider failure surface to the caller.
async fn notify_best_effort<S: SmsSender>(sms: &S, user: &User, body: &str) {
    if let Err(e) = sms.send(&user.phone, body).await {
        tracing::warn!(
            user_id = %user.id,
            phone = %mask_phone(&user.phone),
            error = %e,
            "moderation notice not delivered"
        );
    }
}

fn checked_batch(ids: &[Uuid]) -> Result<Vec<Uuid>, MarketError> {
    let ids = dedupe_ids(ids);
    if ids.is_empty() || ids.len() > MAX_BULK_IDS {
        return Err(MarketError::InvalidBatch);
    }
    Ok(ids)
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(
        &self,
        role: Option<UserRole>,
        page: PageRequest,
    ) -> Result<Vec<User>, MarketError> {
        self.users.list(role, page.clamped()).await
    }
}

// ── BulkUserAction ───────────────────────────────────────────────────────────

pub struct BulkUserActionInput {
    pub ids: Vec<Uuid>,
    pub action: BulkAction,
    pub user_type: Option<UserRole>,
}

pub struct BulkUserActionUseCase<A, U, S>
where
    A: AccountRepository,
    U: UserRepository,
    S: SmsSender,
{
    pub accounts: A,
    pub users: U,
    pub sms: S,
}

impl<A, U, S> BulkUserActionUseCase<A, U, S>
where
    A: AccountRepository,
    U: UserRepository,
    S: SmsSender,
{
    /// Apply the action to every account in the batch or to none.
    /// Returns the number of accounts changed.
    pub async fn execute(
        &self,
        admin_id: Uuid,
        input: BulkUserActionInput,
    ) -> Result<u64, MarketError> {
        if input.user_type == Some(UserRole::Admin) {
            return Err(MarketError::InvalidBatch);
        }
        let ids = checked_batch(&input.ids)?;

        let affected = self
            .accounts
            .bulk_apply(&ids, input.action, input.user_type)
            .await?;
        tracing::info!(
            admin_id = %admin_id,
            action = ?input.action,
            affected,
            "bulk user action applied"
        );

        if input.action == BulkAction::Suspend {
            match self.users.find_by_ids(&ids).await {
                Ok(users) => {
                    for user in &users {
                        notify_best_effort(
                            &self.sms,
                            user,
                            "Your Bazaar account has been suspended. Contact support for details.",
                        )
                        .await;
                    }
                }
                Err(e) => tracing::warn!(error = %e, "suspension notices skipped"),
            }
        }
        Ok(affected)
    }
}

// ── ReviewSeller ─────────────────────────────────────────────────────────────

pub struct ReviewSellerUseCase<U, S>
where
    U: UserRepository,
    S: SmsSender,
{
    pub users: U,
    pub sms: S,
}

impl<U, S> ReviewSellerUseCase<U, S>
where
    U: UserRepository,
    S: SmsSender,
{
    pub async fn execute(&self, seller_id: Uuid, status: SellerStatus) -> Result<(), MarketError> {
        if status == SellerStatus::Pending {
            return Err(MarketError::Validation("status must be APPROVED or REJECTED"));
        }
        let seller = self
            .users
            .find_by_id(seller_id)
            .await?
            .ok_or(MarketError::UserNotFound)?;
        if seller.role != UserRole::Seller {
            return Err(MarketError::Validation("user is not a seller"));
        }

        self.users.set_seller_status(seller_id, status).await?;
        tracing::info!(seller_id = %seller_id, status = status.as_str(), "seller reviewed");

        let notice = match status {
            SellerStatus::Approved => "Your Bazaar seller account has been approved.",
            _ => "Your Bazaar seller application was not approved.",
        };
        notify_best_effort(&self.sms, &seller, notice).await;
        Ok(())
    }
}

// ── ListProductsAdmin ────────────────────────────────────────────────────────

pub struct ListProductsAdminUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> ListProductsAdminUseCase<P> {
    pub async fn execute(
        &self,
        status: Option<ListingStatus>,
        page: PageRequest,
    ) -> Result<Vec<Product>, MarketError> {
        self.products.list(status, page.clamped()).await
    }
}

// ── BulkProductAction ────────────────────────────────────────────────────────

pub struct BulkProductActionUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> BulkProductActionUseCase<P> {
    pub async fn execute(
        &self,
        admin_id: Uuid,
        ids: &[Uuid],
        action: BulkAction,
    ) -> Result<u64, MarketError> {
        let ids = checked_batch(ids)?;
        let affected = self.products.bulk_apply(&ids, action).await?;
        tracing::info!(
            admin_id = %admin_id,
            action = ?action,
            affected,
            "bulk product action applied"
        );
        Ok(affected)
    }
}
