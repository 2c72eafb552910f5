#![allow(async_fn_in_trait)]

use uuid::Uuid;

use bazaar_domain::listing::ListingStatus;
use bazaar_domain::pagination::PageRequest;
use bazaar_domain::ticket::TicketStatus;
use bazaar_domain::user::{SellerStatus, UserRole};

use crate::domain::types::{
    BulkAction, Chat, ChatMessage, Payment, Product, ProductPatch, RateLimit, Report, Ticket,
    TicketReply, User, VerificationCode,
};
use crate::error::MarketError;

/// Store of one live verification code per phone.
pub trait VerificationCodeRepository: Send + Sync {
    /// Insert or overwrite the code for `code.phone`.
    async fn upsert(&self, code: &VerificationCode) -> Result<(), MarketError>;

    async fn find(&self, phone: &str) -> Result<Option<VerificationCode>, MarketError>;

    /// Delete the code for `phone`. Returns `true` if a row was deleted, so
    /// two concurrent verifications of the same code cannot both succeed.
    async fn delete(&self, phone: &str) -> Result<bool, MarketError>;
}

/// Outbound SMS provider.
pub trait SmsSender: Send + Sync {
    /// Fails with [`MarketError::Delivery`] when the provider rejects the message.
    async fn send(&self, to: &str, body: &str) -> Result<(), MarketError>;
}

/// Keyed fixed-window counter.
pub trait RateLimiter: Send + Sync {
    /// Count one hit against `key`. Returns `false` once the window is full.
    async fn hit(&self, key: &str, limit: RateLimit) -> Result<bool, MarketError>;
}

/// Repository for accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, MarketError>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, MarketError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, MarketError>;

    /// Find-or-create by phone in a single statement, marking the account verified.
    async fn upsert_verified(&self, phone: &str) -> Result<User, MarketError>;

    async fn list(
        &self,
        role: Option<UserRole>,
        page: PageRequest,
    ) -> Result<Vec<User>, MarketError>;

    async fn update_name(&self, id: Uuid, name: &str) -> Result<(), MarketError>;

    /// Switch a buyer to the seller role with a pending review.
    async fn promote_to_seller(&self, id: Uuid) -> Result<(), MarketError>;

    async fn set_seller_status(&self, id: Uuid, status: SellerStatus) -> Result<(), MarketError>;

    /// Fails with [`MarketError::PhoneTaken`] on a unique violation.
    async fn update_phone(&self, id: Uuid, phone: &str) -> Result<(), MarketError>;
}

/// Account removal and batch moderation. Each call is one transaction.
pub trait AccountRepository: Send + Sync {
    /// Delete the accounts and everything that references them.
    /// Returns the number of user rows removed.
    async fn delete_accounts(&self, ids: &[Uuid]) -> Result<u64, MarketError>;

    /// Apply `action` to every id, or to none of them.
    ///
    /// The batch is rejected with [`MarketError::InvalidBatch`] when any id
    /// does not exist, belongs to an admin, or does not match `user_type`.
    async fn bulk_apply(
        &self,
        ids: &[Uuid],
        action: BulkAction,
        user_type: Option<UserRole>,
    ) -> Result<u64, MarketError>;
}

/// Repository for listings.
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> Result<(), MarketError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, MarketError>;

    /// Newest first. `status = None` lists every listing.
    async fn list(
        &self,
        status: Option<ListingStatus>,
        page: PageRequest,
    ) -> Result<Vec<Product>, MarketError>;

    async fn update(&self, id: Uuid, patch: &ProductPatch) -> Result<(), MarketError>;

    /// Delete the listing with its favorites, reports and chats.
    async fn delete(&self, id: Uuid) -> Result<(), MarketError>;

    /// Apply `action` to every listing, or to none when any id is unknown.
    async fn bulk_apply(&self, ids: &[Uuid], action: BulkAction) -> Result<u64, MarketError>;
}

/// Repository for favorites.
pub trait FavoriteRepository: Send + Sync {
    /// Flip the favorite. Returns `true` when the listing is now favorited.
    async fn toggle(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, MarketError>;

    async fn list_products(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Product>, MarketError>;
}

/// Repository for listing reports.
pub trait ReportRepository: Send + Sync {
    async fn create(&self, report: &Report) -> Result<(), MarketError>;

    async fn list(&self, page: PageRequest) -> Result<Vec<Report>, MarketError>;
}

/// Repository for buyer/seller conversations.
pub trait ChatRepository: Send + Sync {
    /// Return the conversation for `(product, buyer)`, creating it if needed.
    async fn find_or_create(&self, chat: &Chat) -> Result<Chat, MarketError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chat>, MarketError>;

    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Chat>, MarketError>;

    /// Oldest first.
    async fn list_messages(
        &self,
        chat_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<ChatMessage>, MarketError>;

    async fn create_message(&self, message: &ChatMessage) -> Result<(), MarketError>;
}

/// Repository for support tickets and their replies.
pub trait TicketRepository: Send + Sync {
    async fn create(&self, ticket: &Ticket) -> Result<(), MarketError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>, MarketError>;

    /// `user_id = None` lists every ticket. Newest first.
    async fn list(
        &self,
        user_id: Option<Uuid>,
        status: Option<TicketStatus>,
        page: PageRequest,
    ) -> Result<Vec<Ticket>, MarketError>;

    /// Ordered by `created_at`.
    async fn list_replies(&self, ticket_id: Uuid) -> Result<Vec<TicketReply>, MarketError>;

    async fn create_reply(&self, reply: &TicketReply) -> Result<(), MarketError>;

    /// Returns `true` if the ticket existed.
    async fn set_status(&self, id: Uuid, status: TicketStatus) -> Result<bool, MarketError>;
}

/// Read side of payment records written by the payment gateway integration.
pub trait PaymentRepository: Send + Sync {
    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Payment>, MarketError>;
}
