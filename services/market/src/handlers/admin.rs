use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_domain::listing::ListingStatus;
use bazaar_domain::pagination::PageRequest;
use bazaar_domain::ticket::TicketStatus;
use bazaar_domain::user::{SellerStatus, UserRole};

use crate::domain::types::BulkAction;
use crate::error::MarketError;
use crate::gate::{AdminOnly, Session};
use crate::handlers::JsonBody;
use crate::handlers::product::{ProductResponse, ReportResponse};
use crate::handlers::ticket::{TicketFilter, TicketResponse};
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::admin::{
    BulkProductActionUseCase, BulkUserActionInput, BulkUserActionUseCase,
    ListProductsAdminUseCase, ListUsersUseCase, ReviewSellerUseCase,
};
use crate::usecase::report::ListReportsUseCase;
use crate::usecase::ticket::{ListTicketsUseCase, SetTicketStatusUseCase};

type Admin = Session<AdminOnly>;

fn parse_action(action: &str) -> Result<BulkAction, MarketError> {
    BulkAction::parse(action).ok_or(MarketError::Validation("unknown bulk action"))
}

#[derive(Serialize)]
pub struct AffectedResponse {
    pub affected: u64,
}

// ── GET /admin/users ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UserFilter {
    pub role: Option<UserRole>,
}

pub async fn list_users(
    _admin: Admin,
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<UserResponse>>, MarketError> {
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let users = usecase.execute(filter.role, page).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

// ── POST /admin/users/bulk ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUsersRequest {
    pub ids: Vec<Uuid>,
    pub action: String,
    pub user_type: Option<UserRole>,
}

pub async fn bulk_users(
    admin: Admin,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<BulkUsersRequest>,
) -> Result<Json<AffectedResponse>, MarketError> {
    let action = parse_action(&body.action)?;
    let usecase = BulkUserActionUseCase {
        accounts: state.account_repo(),
        users: state.user_repo(),
        sms: state.sms.clone(),
    };
    let affected = usecase
        .execute(
            admin.user_id,
            BulkUserActionInput {
                ids: body.ids,
                action,
                user_type: body.user_type,
            },
        )
        .await?;
    Ok(Json(AffectedResponse { affected }))
}

// ── POST /admin/sellers/{id}/review ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct ReviewSellerRequest {
    pub status: SellerStatus,
}

pub async fn review_seller(
    _admin: Admin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<ReviewSellerRequest>,
) -> Result<StatusCode, MarketError> {
    let usecase = ReviewSellerUseCase {
        users: state.user_repo(),
        sms: state.sms.clone(),
    };
    usecase.execute(id, body.status).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /admin/products ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ProductFilter {
    pub status: Option<ListingStatus>,
}

pub async fn list_products(
    _admin: Admin,
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<ProductResponse>>, MarketError> {
    let usecase = ListProductsAdminUseCase {
        products: state.product_repo(),
    };
    let products = usecase.execute(filter.status, page).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

// ── POST /admin/products/bulk ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BulkProductsRequest {
    pub ids: Vec<Uuid>,
    pub action: String,
}

pub async fn bulk_products(
    admin: Admin,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<BulkProductsRequest>,
) -> Result<Json<AffectedResponse>, MarketError> {
    let action = parse_action(&body.action)?;
    let usecase = BulkProductActionUseCase {
        products: state.product_repo(),
    };
    let affected = usecase.execute(admin.user_id, &body.ids, action).await?;
    Ok(Json(AffectedResponse { affected }))
}

// ── GET /admin/reports ───────────────────────────────────────────────────────

pub async fn list_reports(
    _admin: Admin,
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<ReportResponse>>, MarketError> {
    let usecase = ListReportsUseCase {
        reports: state.report_repo(),
    };
    let reports = usecase.execute(page).await?;
    Ok(Json(reports.into_iter().map(Into::into).collect()))
}

// ── GET /admin/tickets ───────────────────────────────────────────────────────

pub async fn list_tickets(
    _admin: Admin,
    State(state): State<AppState>,
    Query(filter): Query<TicketFilter>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<TicketResponse>>, MarketError> {
    let usecase = ListTicketsUseCase {
        tickets: state.ticket_repo(),
    };
    let tickets = usecase.execute(None, filter.status, page).await?;
    Ok(Json(tickets.into_iter().map(Into::into).collect()))
}

// ── PATCH /admin/tickets/{id} ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct TicketStatusRequest {
    pub status: TicketStatus,
}

pub async fn set_ticket_status(
    _admin: Admin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<TicketStatusRequest>,
) -> Result<StatusCode, MarketError> {
    let usecase = SetTicketStatusUseCase {
        tickets: state.ticket_repo(),
    };
    usecase.execute(id, body.status).await?;
    Ok(StatusCode::NO_CONTENT)
}
