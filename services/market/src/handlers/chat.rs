use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_domain::pagination::PageRequest;

use crate::domain::types::ChatMessage;
use crate::error::MarketError;
use crate::gate::Session;
use crate::handlers::JsonBody;
use crate::handlers::product::ChatResponse;
use crate::state::AppState;
use crate::usecase::chat::{ListChatsUseCase, ListMessagesUseCase, SendMessageUseCase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub body: String,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ChatMessage> for ChatMessageResponse {
    fn from(m: ChatMessage) -> Self {
        Self {
            id: m.id.to_string(),
            chat_id: m.chat_id.to_string(),
            sender_id: m.sender_id.to_string(),
            body: m.body,
            created_at: m.created_at,
        }
    }
}

// ── GET /chats ───────────────────────────────────────────────────────────────

pub async fn list_chats(
    session: Session,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<ChatResponse>>, MarketError> {
    let usecase = ListChatsUseCase {
        chats: state.chat_repo(),
    };
    let chats = usecase.execute(session.user_id, page).await?;
    Ok(Json(chats.into_iter().map(Into::into).collect()))
}

// ── GET /chats/{id}/messages ─────────────────────────────────────────────────

pub async fn list_messages(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<ChatMessageResponse>>, MarketError> {
    let usecase = ListMessagesUseCase {
        chats: state.chat_repo(),
    };
    let messages = usecase.execute(session.user_id, id, page).await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

// ── POST /chats/{id}/messages ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
}

pub async fn send_message(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<SendMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessageResponse>), MarketError> {
    let usecase = SendMessageUseCase {
        chats: state.chat_repo(),
        limiter: state.rate_limiter.clone(),
        limit: state.chat_rate_limit,
    };
    let message = usecase.execute(session.user_id, id, body.body).await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}
