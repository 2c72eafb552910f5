use chrono::Utc;
use uuid::Uuid;

use bazaar_domain::pagination::PageRequest;
use bazaar_domain::ticket::TicketStatus;
use bazaar_domain::user::UserRole;

use crate::domain::repository::TicketRepository;
use crate::domain::types::{
    MAX_TICKET_BODY_LEN, MAX_TICKET_SUBJECT_LEN, Ticket, TicketReply, within_len,
};
use crate::error::MarketError;

const INVALID_BODY: &str = "body must be 1-5000 characters";

/// Owners see their own tickets; admins see all of them.
async fn visible_ticket<T: TicketRepository>(
    tickets: &T,
    id: Uuid,
    user_id: Uuid,
    role: UserRole,
) -> Result<Ticket, MarketError> {
    tickets
        .find_by_id(id)
        .await?
        .filter(|t| t.user_id == user_id || role.is_admin())
        .ok_or(MarketError::TicketNotFound)
}

// ── CreateTicket ─────────────────────────────────────────────────────────────

pub struct CreateTicketInput {
    pub user_id: Uuid,
    pub subject: String,
    pub body: String,
}

pub struct CreateTicketUseCase<T: TicketRepository> {
    pub tickets: T,
}

impl<T: TicketRepository> CreateTicketUseCase<T> {
    pub async fn execute(&self, input: CreateTicketInput) -> Result<Ticket, MarketError> {
        if !within_len(&input.subject, MAX_TICKET_SUBJECT_LEN) {
            return Err(MarketError::Validation("subject must be 1-200 characters"));
        }
        if !within_len(&input.body, MAX_TICKET_BODY_LEN) {
            return Err(MarketError::Validation(INVALID_BODY));
        }
        let now = Utc::now();
        let ticket = Ticket {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            subject: input.subject.trim().to_owned(),
            body: input.body.trim().to_owned(),
            status: TicketStatus::Open,
            created_at: now,
            updated_at: now,
        };
        self.tickets.create(&ticket).await?;
        Ok(ticket)
    }
}

// ── ListTickets ──────────────────────────────────────────────────────────────

pub struct ListTicketsUseCase<T: TicketRepository> {
    pub tickets: T,
}

impl<T: TicketRepository> ListTicketsUseCase<T> {
    /// `owner = None` lists every ticket (admin surface).
    pub async fn execute(
        &self,
        owner: Option<Uuid>,
        status: Option<TicketStatus>,
        page: PageRequest,
    ) -> Result<Vec<Ticket>, MarketError> {
        self.tickets.list(owner, status, page.clamped()).await
    }
}

// ── GetTicket ────────────────────────────────────────────────────────────────

pub struct GetTicketUseCase<T: TicketRepository> {
    pub tickets: T,
}

impl<T: TicketRepository> GetTicketUseCase<T> {
    pub async fn execute(
        &self,
        id: Uuid,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<(Ticket, Vec<TicketReply>), MarketError> {
        let ticket = visible_ticket(&self.tickets, id, user_id, role).await?;
        let replies = self.tickets.list_replies(id).await?;
        Ok((ticket, replies))
    }
}

// ── ReplyTicket ──────────────────────────────────────────────────────────────

pub struct ReplyTicketUseCase<T: TicketRepository> {
    pub tickets: T,
}

impl<T: TicketRepository> ReplyTicketUseCase<T> {
    pub async fn execute(
        &self,
        id: Uuid,
        author_id: Uuid,
        role: UserRole,
        body: String,
    ) -> Result<TicketReply, MarketError> {
        if !within_len(&body, MAX_TICKET_BODY_LEN) {
            return Err(MarketError::Validation(INVALID_BODY));
        }
        let ticket = visible_ticket(&self.tickets, id, author_id, role).await?;
        if ticket.status == TicketStatus::Closed {
            return Err(MarketError::Validation("ticket is closed"));
        }
        let reply = TicketReply {
            id: Uuid::now_v7(),
            ticket_id: id,
            author_id,
            is_staff: role.is_admin(),
            body: body.trim().to_owned(),
            created_at: Utc::now(),
        };
        self.tickets.create_reply(&reply).await?;
        Ok(reply)
    }
}

// ── SetTicketStatus ──────────────────────────────────────────────────────────

pub struct SetTicketStatusUseCase<T: TicketRepository> {
    pub tickets: T,
}

impl<T: TicketRepository> SetTicketStatusUseCase<T> {
    pub async fn execute(&self, id: Uuid, status: TicketStatus) -> Result<(), MarketError> {
        if !self.tickets.set_status(id, status).await? {
            return Err(MarketError::TicketNotFound);
        }
        tracing::info!(ticket_id = %id, status = status.as_str(), "ticket status changed");
        Ok(())
    }
}
