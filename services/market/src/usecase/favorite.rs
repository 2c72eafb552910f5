use uuid::Uuid;

use bazaar_domain::listing::ListingStatus;
use bazaar_domain::pagination::PageRequest;

use crate::domain::repository::{FavoriteRepository, ProductRepository};
use crate::domain::types::Product;
use crate::error::MarketError;

// ── ToggleFavorite ───────────────────────────────────────────────────────────

pub struct ToggleFavoriteUseCase<P, F>
where
    P: ProductRepository,
    F: FavoriteRepository,
{
    pub products: P,
    pub favorites: F,
}

impl<P, F> ToggleFavoriteUseCase<P, F>
where
    P: ProductRepository,
    F: FavoriteRepository,
{
    /// Returns `true` when the listing is favorited after the call.
    pub async fn execute(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, MarketError> {
        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or(MarketError::ProductNotFound)?;
        if product.status == ListingStatus::Suspended && product.seller_id != user_id {
            return Err(MarketError::ProductNotFound);
        }
        self.favorites.toggle(user_id, product_id).await
    }
}

// ── ListFavorites ────────────────────────────────────────────────────────────

pub struct ListFavoritesUseCase<F: FavoriteRepository> {
    pub favorites: F,
}

impl<F: FavoriteRepository> ListFavoritesUseCase<F> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Product>, MarketError> {
        self.favorites.list_products(user_id, page.clamped()).await
    }
}
