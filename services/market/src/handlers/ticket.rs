use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_domain::pagination::PageRequest;
use bazaar_domain::ticket::TicketStatus;

use crate::domain::types::{Ticket, TicketReply};
use crate::error::MarketError;
use crate::gate::Session;
use crate::handlers::JsonBody;
use crate::state::AppState;
use crate::usecase::ticket::{
    CreateTicketInput, CreateTicketUseCase, GetTicketUseCase, ListTicketsUseCase,
    ReplyTicketUseCase,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketResponse {
    pub id: String,
    pub user_id: String,
    pub subject: String,
    pub body: String,
    pub status: TicketStatus,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Ticket> for TicketResponse {
    fn from(t: Ticket) -> Self {
        Self {
            id: t.id.to_string(),
            user_id: t.user_id.to_string(),
            subject: t.subject,
            body: t.body,
            status: t.status,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub id: String,
    pub author_id: String,
    pub is_staff: bool,
    pub body: String,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<TicketReply> for ReplyResponse {
    fn from(r: TicketReply) -> Self {
        Self {
            id: r.id.to_string(),
            author_id: r.author_id.to_string(),
            is_staff: r.is_staff,
            body: r.body,
            created_at: r.created_at,
        }
    }
}

/// Optional `?status=OPEN|CLOSED` filter shared with the admin listing.
#[derive(Deserialize)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
}

// ── POST /tickets ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTicketRequest {
    pub subject: String,
    pub body: String,
}

pub async fn create_ticket(
    session: Session,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateTicketRequest>,
) -> Result<(StatusCode, Json<TicketResponse>), MarketError> {
    let usecase = CreateTicketUseCase {
        tickets: state.ticket_repo(),
    };
    let ticket = usecase
        .execute(CreateTicketInput {
            user_id: session.user_id,
            subject: body.subject,
            body: body.body,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ticket.into())))
}

// ── GET /tickets ─────────────────────────────────────────────────────────────

pub async fn list_my_tickets(
    session: Session,
    State(state): State<AppState>,
    Query(filter): Query<TicketFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<TicketResponse>>, MarketError> {
    let usecase = ListTicketsUseCase {
        tickets: state.ticket_repo(),
    };
    let tickets = usecase
        .execute(Some(session.user_id), filter.status, page)
        .await?;
    Ok(Json(tickets.into_iter().map(Into::into).collect()))
}

// ── GET /tickets/{id} ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct TicketDetailResponse {
    #[serde(flatten)]
    pub ticket: TicketResponse,
    pub replies: Vec<ReplyResponse>,
}

pub async fn get_ticket(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TicketDetailResponse>, MarketError> {
    let usecase = GetTicketUseCase {
        tickets: state.ticket_repo(),
    };
    let (ticket, replies) = usecase.execute(id, session.user_id, session.role).await?;
    Ok(Json(TicketDetailResponse {
        ticket: ticket.into(),
        replies: replies.into_iter().map(Into::into).collect(),
    }))
}

// ── POST /tickets/{id}/replies ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ReplyRequest {
    pub body: String,
}

pub async fn reply_ticket(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<ReplyRequest>,
) -> Result<(StatusCode, Json<ReplyResponse>), MarketError> {
    let usecase = ReplyTicketUseCase {
        tickets: state.ticket_repo(),
    };
    let reply = usecase
        .execute(id, session.user_id, session.role, body.body)
        .await?;
    Ok((StatusCode::CREATED, Json(reply.into())))
}
