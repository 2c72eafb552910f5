use chrono::Utc;
use uuid::Uuid;

use bazaar_domain::listing::{ListingStatus, validate_description, validate_title};
use bazaar_domain::pagination::PageRequest;
use bazaar_domain::user::{SellerStatus, UserRole};

use crate::domain::repository::ProductRepository;
use crate::domain::types::{Product, ProductPatch};
use crate::error::MarketError;

const INVALID_TITLE: &str = "title must be 1-120 characters";
const INVALID_DESCRIPTION: &str = "description must be at most 5000 characters";
const INVALID_PRICE: &str = "price must not be negative";

fn validate_patch(patch: &ProductPatch) -> Result<(), MarketError> {
    if let Some(ref title) = patch.title {
        if !validate_title(title) {
            return Err(MarketError::Validation(INVALID_TITLE));
        }
    }
    if let Some(ref description) = patch.description {
        if !validate_description(description) {
            return Err(MarketError::Validation(INVALID_DESCRIPTION));
        }
    }
    if patch.price_cents.is_some_and(|p| p < 0) {
        return Err(MarketError::Validation(INVALID_PRICE));
    }
    Ok(())
}

// ── CreateProduct ────────────────────────────────────────────────────────────

pub struct CreateProductInput {
    pub seller_id: Uuid,
    pub role: UserRole,
    pub seller_status: Option<SellerStatus>,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
}

pub struct CreateProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> CreateProductUseCase<P> {
    pub async fn execute(&self, input: CreateProductInput) -> Result<Product, MarketError> {
        if input.role != UserRole::Seller || input.seller_status != Some(SellerStatus::Approved) {
            return Err(MarketError::SellerNotApproved);
        }
        validate_patch(&ProductPatch {
            title: Some(input.title.clone()),
            description: Some(input.description.clone()),
            price_cents: Some(input.price_cents),
        })?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::now_v7(),
            seller_id: input.seller_id,
            title: input.title.trim().to_owned(),
            description: input.description,
            price_cents: input.price_cents,
            status: ListingStatus::Active,
            created_at: now,
            updated_at: now,
        };
        self.products.create(&product).await?;
        Ok(product)
    }
}

// ── ListProducts ─────────────────────────────────────────────────────────────

pub struct ListProductsUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> ListProductsUseCase<P> {
    /// Public catalogue: active listings only.
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<Product>, MarketError> {
        self.products
            .list(Some(ListingStatus::Active), page.clamped())
            .await
    }
}

// ── GetProduct ───────────────────────────────────────────────────────────────

pub struct GetProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> GetProductUseCase<P> {
    /// Suspended listings are visible to their seller only.
    pub async fn execute(&self, id: Uuid, viewer: Option<Uuid>) -> Result<Product, MarketError> {
        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(MarketError::ProductNotFound)?;
        if product.status == ListingStatus::Suspended && viewer != Some(product.seller_id) {
            return Err(MarketError::ProductNotFound);
        }
        Ok(product)
    }
}

// ── UpdateProduct ────────────────────────────────────────────────────────────

pub struct UpdateProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> UpdateProductUseCase<P> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<(), MarketError> {
        if patch.is_empty() {
            return Err(MarketError::MissingData);
        }
        validate_patch(&patch)?;
        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(MarketError::ProductNotFound)?;
        if product.seller_id != user_id {
            return Err(MarketError::Forbidden);
        }
        let patch = ProductPatch {
            title: patch.title.map(|t| t.trim().to_owned()),
            ..patch
        };
        self.products.update(id, &patch).await
    }
}

// ── DeleteProduct ────────────────────────────────────────────────────────────

pub struct DeleteProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> DeleteProductUseCase<P> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<(), MarketError> {
        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(MarketError::ProductNotFound)?;
        if product.seller_id != user_id {
            return Err(MarketError::Forbidden);
        }
        self.products.delete(id).await
    }
}
