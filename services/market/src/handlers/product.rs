use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bazaar_domain::listing::ListingStatus;
use bazaar_domain::pagination::PageRequest;

use crate::domain::types::{Chat, Product, ProductPatch, Report};
use crate::error::MarketError;
use crate::gate::Session;
use crate::handlers::JsonBody;
use crate::state::AppState;
use crate::usecase::chat::OpenChatUseCase;
use crate::usecase::favorite::ToggleFavoriteUseCase;
use crate::usecase::product::{
    CreateProductInput, CreateProductUseCase, DeleteProductUseCase, GetProductUseCase,
    ListProductsUseCase, UpdateProductUseCase,
};
use crate::usecase::report::{CreateReportInput, CreateReportUseCase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub seller_id: String,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub status: ListingStatus,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id.to_string(),
            seller_id: p.seller_id.to_string(),
            title: p.title,
            description: p.description,
            price_cents: p.price_cents,
            status: p.status,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// ── POST /products ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
}

pub async fn create_product(
    session: Session,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), MarketError> {
    let usecase = CreateProductUseCase {
        products: state.product_repo(),
    };
    let product = usecase
        .execute(CreateProductInput {
            seller_id: session.user_id,
            role: session.role,
            seller_status: session.seller_status,
            title: body.title,
            description: body.description,
            price_cents: body.price_cents,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

// ── GET /products ────────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<Vec<ProductResponse>>, MarketError> {
    let usecase = ListProductsUseCase {
        products: state.product_repo(),
    };
    let products = usecase.execute(page).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

// ── GET /products/{id} ───────────────────────────────────────────────────────

pub async fn get_product(
    session: Option<Session>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, MarketError> {
    let usecase = GetProductUseCase {
        products: state.product_repo(),
    };
    let product = usecase.execute(id, session.map(|s| s.user_id)).await?;
    Ok(Json(product.into()))
}

// ── PATCH /products/{id} ─────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
}

pub async fn update_product(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<UpdateProductRequest>,
) -> Result<StatusCode, MarketError> {
    let usecase = UpdateProductUseCase {
        products: state.product_repo(),
    };
    usecase
        .execute(
            session.user_id,
            id,
            ProductPatch {
                title: body.title,
                description: body.description,
                price_cents: body.price_cents,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /products/{id} ────────────────────────────────────────────────────

pub async fn delete_product(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, MarketError> {
    let usecase = DeleteProductUseCase {
        products: state.product_repo(),
    };
    usecase.execute(session.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /products/{id}/favorite ─────────────────────────────────────────────

#[derive(Serialize)]
pub struct FavoriteResponse {
    pub favorited: bool,
}

pub async fn toggle_favorite(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FavoriteResponse>, MarketError> {
    let usecase = ToggleFavoriteUseCase {
        products: state.product_repo(),
        favorites: state.favorite_repo(),
    };
    let favorited = usecase.execute(session.user_id, id).await?;
    Ok(Json(FavoriteResponse { favorited }))
}

// ── POST /products/{id}/reports ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateReportRequest {
    pub reason: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub id: String,
    pub reporter_id: String,
    pub product_id: String,
    pub reason: String,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Report> for ReportResponse {
    fn from(r: Report) -> Self {
        Self {
            id: r.id.to_string(),
            reporter_id: r.reporter_id.to_string(),
            product_id: r.product_id.to_string(),
            reason: r.reason,
            created_at: r.created_at,
        }
    }
}

pub async fn report_product(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<CreateReportRequest>,
) -> Result<(StatusCode, Json<ReportResponse>), MarketError> {
    let usecase = CreateReportUseCase {
        products: state.product_repo(),
        reports: state.report_repo(),
    };
    let report = usecase
        .execute(CreateReportInput {
            reporter_id: session.user_id,
            product_id: id,
            reason: body.reason,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(report.into())))
}

// ── POST /products/{id}/chats ────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub id: String,
    pub product_id: String,
    pub buyer_id: String,
    pub seller_id: String,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Chat> for ChatResponse {
    fn from(c: Chat) -> Self {
        Self {
            id: c.id.to_string(),
            product_id: c.product_id.to_string(),
            buyer_id: c.buyer_id.to_string(),
            seller_id: c.seller_id.to_string(),
            created_at: c.created_at,
        }
    }
}

pub async fn open_chat(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatResponse>, MarketError> {
    let usecase = OpenChatUseCase {
        products: state.product_repo(),
        chats: state.chat_repo(),
    };
    let chat = usecase.execute(session.user_id, id).await?;
    Ok(Json(chat.into()))
}
