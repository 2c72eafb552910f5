use uuid::Uuid;

use bazaar_domain::listing::ListingStatus;
use bazaar_domain::pagination::PageRequest;
use bazaar_domain::user::{SellerStatus, UserRole};
use bazaar_market::domain::types::ProductPatch;
use bazaar_market::error::MarketError;
use bazaar_market::usecase::favorite::ToggleFavoriteUseCase;
use bazaar_market::usecase::product::{
    CreateProductInput, CreateProductUseCase, DeleteProductUseCase, GetProductUseCase,
    ListProductsUseCase, UpdateProductUseCase,
};
use bazaar_market::usecase::report::{CreateReportInput, CreateReportUseCase};

use crate::helpers::{MockFavoriteRepo, MockProductRepo, test_product};

fn create_input(role: UserRole, seller_status: Option<SellerStatus>) -> CreateProductInput {
    CreateProductInput {
        seller_id: Uuid::new_v4(),
        role,
        seller_status,
        title: "  Road bike ".to_owned(),
        description: "Lightly used".to_owned(),
        price_cents: 25_000,
    }
}

#[tokio::test]
async fn should_let_approved_seller_list_product() {
    let products = MockProductRepo::empty();
    let products_handle = products.products_handle();

    let product = CreateProductUseCase { products }
        .execute(create_input(UserRole::Seller, Some(SellerStatus::Approved)))
        .await
        .unwrap();

    assert_eq!(product.title, "Road bike");
    assert_eq!(product.status, ListingStatus::Active);
    assert_eq!(products_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_refuse_listing_from_unapproved_sellers_and_buyers() {
    let usecase = CreateProductUseCase {
        products: MockProductRepo::empty(),
    };
    for (role, status) in [
        (UserRole::Seller, Some(SellerStatus::Pending)),
        (UserRole::Seller, Some(SellerStatus::Rejected)),
        (UserRole::Buyer, None),
        (UserRole::Admin, None),
    ] {
        let result = usecase.execute(create_input(role, status)).await;
        assert!(
            matches!(result, Err(MarketError::SellerNotApproved)),
            "expected SellerNotApproved for {role:?}, got {result:?}"
        );
    }
}

#[tokio::test]
async fn should_hide_suspended_listing_from_everyone_but_seller() {
    let seller = Uuid::new_v4();
    let mut active = test_product(seller);
    active.title = "Active".to_owned();
    let mut suspended = test_product(seller);
    suspended.status = ListingStatus::Suspended;
    let repo = MockProductRepo::new(vec![active.clone(), suspended.clone()]);
    let products = repo.products_handle();

    let listed = ListProductsUseCase { products: repo }
        .execute(PageRequest::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, active.id);

    let get = GetProductUseCase {
        products: MockProductRepo { products },
    };
    let anonymous = get.execute(suspended.id, None).await;
    assert!(
        matches!(anonymous, Err(MarketError::ProductNotFound)),
        "expected ProductNotFound, got {anonymous:?}"
    );
    let stranger = get.execute(suspended.id, Some(Uuid::new_v4())).await;
    assert!(matches!(stranger, Err(MarketError::ProductNotFound)));
    assert!(get.execute(suspended.id, Some(seller)).await.is_ok());
}

#[tokio::test]
async fn should_only_let_owner_edit_or_delete() {
    let seller = Uuid::new_v4();
    let product = test_product(seller);
    let repo = MockProductRepo::new(vec![product.clone()]);
    let products = repo.products_handle();

    let update = UpdateProductUseCase { products: repo };
    let patch = ProductPatch {
        price_cents: Some(20_000),
        ..Default::default()
    };
    let result = update.execute(Uuid::new_v4(), product.id, patch.clone()).await;
    assert!(
        matches!(result, Err(MarketError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );

    let empty = update
        .execute(seller, product.id, ProductPatch::default())
        .await;
    assert!(
        matches!(empty, Err(MarketError::MissingData)),
        "expected MissingData, got {empty:?}"
    );

    update.execute(seller, product.id, patch).await.unwrap();
    assert_eq!(products.lock().unwrap()[0].price_cents, 20_000);

    let delete = DeleteProductUseCase {
        products: MockProductRepo {
            products: products.clone(),
        },
    };
    let result = delete.execute(Uuid::new_v4(), product.id).await;
    assert!(matches!(result, Err(MarketError::Forbidden)));
    delete.execute(seller, product.id).await.unwrap();
    assert!(products.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_toggle_favorite() {
    let product = test_product(Uuid::new_v4());
    let usecase = ToggleFavoriteUseCase {
        products: MockProductRepo::new(vec![product.clone()]),
        favorites: MockFavoriteRepo::default(),
    };
    let buyer = Uuid::new_v4();

    assert!(usecase.execute(buyer, product.id).await.unwrap());
    assert!(!usecase.execute(buyer, product.id).await.unwrap());
    assert!(usecase.execute(buyer, product.id).await.unwrap());

    let missing = usecase.execute(buyer, Uuid::new_v4()).await;
    assert!(
        matches!(missing, Err(MarketError::ProductNotFound)),
        "expected ProductNotFound, got {missing:?}"
    );
}

#[tokio::test]
async fn should_validate_report_reason_and_product() {
    let product = test_product(Uuid::new_v4());
    let usecase = CreateReportUseCase {
        products: MockProductRepo::new(vec![product.clone()]),
        reports: crate::helpers::MockReportRepo::default(),
    };

    let blank = usecase
        .execute(CreateReportInput {
            reporter_id: Uuid::new_v4(),
            product_id: product.id,
            reason: "  ".to_owned(),
        })
        .await;
    assert!(
        matches!(blank, Err(MarketError::Validation(_))),
        "expected Validation, got {blank:?}"
    );

    let unknown = usecase
        .execute(CreateReportInput {
            reporter_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            reason: "Counterfeit".to_owned(),
        })
        .await;
    assert!(
        matches!(unknown, Err(MarketError::ProductNotFound)),
        "expected ProductNotFound, got {unknown:?}"
    );

    let report = usecase
        .execute(CreateReportInput {
            reporter_id: Uuid::new_v4(),
            product_id: product.id,
            reason: " Counterfeit ".to_owned(),
        })
        .await
        .unwrap();
    assert_eq!(report.reason, "Counterfeit");
}
