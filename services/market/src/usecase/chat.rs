use chrono::Utc;
use uuid::Uuid;

use bazaar_domain::listing::ListingStatus;
use bazaar_domain::pagination::PageRequest;

use crate::domain::repository::{ChatRepository, ProductRepository, RateLimiter};
use crate::domain::types::{Chat, ChatMessage, MAX_CHAT_MESSAGE_LEN, RateLimit, within_len};
use crate::error::MarketError;

async fn participant_chat<C: ChatRepository>(
    chats: &C,
    chat_id: Uuid,
    user_id: Uuid,
) -> Result<Chat, MarketError> {
    chats
        .find_by_id(chat_id)
        .await?
        .filter(|c| c.has_participant(user_id))
        .ok_or(MarketError::ChatNotFound)
}

// ── OpenChat ─────────────────────────────────────────────────────────────────

pub struct OpenChatUseCase<P, C>
where
    P: ProductRepository,
    C: ChatRepository,
{
    pub products: P,
    pub chats: C,
}

impl<P, C> OpenChatUseCase<P, C>
where
    P: ProductRepository,
    C: ChatRepository,
{
    /// Open the caller's conversation about a listing, or return the existing one.
    pub async fn execute(&self, buyer_id: Uuid, product_id: Uuid) -> Result<Chat, MarketError> {
        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .filter(|p| p.status == ListingStatus::Active)
            .ok_or(MarketError::ProductNotFound)?;
        if product.seller_id == buyer_id {
            return Err(MarketError::Validation("cannot chat about your own listing"));
        }
        self.chats
            .find_or_create(&Chat {
                id: Uuid::now_v7(),
                product_id,
                buyer_id,
                seller_id: product.seller_id,
                created_at: Utc::now(),
            })
            .await
    }
}

// ── ListChats ────────────────────────────────────────────────────────────────

pub struct ListChatsUseCase<C: ChatRepository> {
    pub chats: C,
}

impl<C: ChatRepository> ListChatsUseCase<C> {
    pub async fn execute(&self, user_id: Uuid, page: PageRequest) -> Result<Vec<Chat>, MarketError> {
        self.chats.list_for_user(user_id, page.clamped()).await
    }
}

// ── ListMessages ─────────────────────────────────────────────────────────────

pub struct ListMessagesUseCase<C: ChatRepository> {
    pub chats: C,
}

impl<C: ChatRepository> ListMessagesUseCase<C> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        chat_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<ChatMessage>, MarketError> {
        participant_chat(&self.chats, chat_id, user_id).await?;
        self.chats.list_messages(chat_id, page.clamped()).await
    }
}

// ── SendMessage ──────────────────────────────────────────────────────────────

pub struct SendMessageUseCase<C, L>
where
    C: ChatRepository,
    L: RateLimiter,
{
    pub chats: C,
    pub limiter: L,
    pub limit: RateLimit,
}

impl<C, L> SendMessageUseCase<C, L>
where
    C: ChatRepository,
    L: RateLimiter,
{
    pub async fn execute(
        &self,
        sender_id: Uuid,
        chat_id: Uuid,
        body: String,
    ) -> Result<ChatMessage, MarketError> {
        if !within_len(&body, MAX_CHAT_MESSAGE_LEN) {
            return Err(MarketError::Validation("message must be 1-2000 characters"));
        }
        participant_chat(&self.chats, chat_id, sender_id).await?;

        if !self
            .limiter
            .hit(&format!("chat:{sender_id}"), self.limit)
            .await?
        {
            return Err(MarketError::RateLimited);
        }

        let message = ChatMessage {
            id: Uuid::now_v7(),
            chat_id,
            sender_id,
            body: body.trim().to_owned(),
            created_at: Utc::now(),
        };
        self.chats.create_message(&message).await?;
        Ok(message)
    }
}
