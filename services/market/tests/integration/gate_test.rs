use uuid::Uuid;

use bazaar_domain::user::UserRole;
use bazaar_market::error::MarketError;
use bazaar_market::gate::{AdminOnly, Authenticated, Session, admit};

use crate::helpers::{MockUserRepo, test_user};

#[tokio::test]
async fn should_admit_live_account_with_current_role() {
    let user = test_user(UserRole::Seller);
    let users = MockUserRepo::new(vec![user.clone()]);

    let session: Session<Authenticated> = admit(&users, user.id).await.unwrap();

    assert_eq!(session.user_id, user.id);
    assert_eq!(session.role, UserRole::Seller);
    assert_eq!(session.seller_status, user.seller_status);
}

#[tokio::test]
async fn should_reject_unknown_account_as_unauthenticated() {
    let result = admit::<_, Authenticated>(&MockUserRepo::empty(), Uuid::new_v4()).await;
    assert!(
        matches!(result, Err(MarketError::Unauthenticated)),
        "expected Unauthenticated, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_suspended_account() {
    let mut user = test_user(UserRole::Buyer);
    user.is_suspended = true;
    let users = MockUserRepo::new(vec![user.clone()]);

    let result = admit::<_, Authenticated>(&users, user.id).await;
    assert!(
        matches!(result, Err(MarketError::AccountSuspended)),
        "expected AccountSuspended, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_non_admin_on_admin_surface() {
    let user = test_user(UserRole::Seller);
    let users = MockUserRepo::new(vec![user.clone()]);

    let result = admit::<_, AdminOnly>(&users, user.id).await;
    assert!(
        matches!(result, Err(MarketError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_read_role_from_store_not_token() {
    // Demoted since the token was minted: the stored role wins.
    let user = test_user(UserRole::Buyer);
    let users = MockUserRepo::new(vec![user.clone()]);
    assert!(admit::<_, AdminOnly>(&users, user.id).await.is_err());

    let admin = test_user(UserRole::Admin);
    let users = MockUserRepo::new(vec![admin.clone()]);
    let session = admit::<_, AdminOnly>(&users, admin.id).await.unwrap();
    assert_eq!(session.role, UserRole::Admin);
}
