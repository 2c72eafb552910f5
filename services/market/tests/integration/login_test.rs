use bazaar_domain::user::UserRole;
use bazaar_market::domain::types::OtpPurpose;
use bazaar_market::error::MarketError;
use bazaar_market::usecase::identity::ResolveIdentityUseCase;
use bazaar_market::usecase::otp::VerifyOtpUseCase;
use bazaar_market::usecase::session::{LoginInput, LoginUseCase};
use bazaar_session::token::validate_session_token;
use bazaar_testing::auth::TEST_JWT_SECRET;

use crate::helpers::{MockCodeRepo, MockUserRepo, TEST_PHONE, test_code, test_user};

fn login_usecase(codes: MockCodeRepo, users: MockUserRepo) -> LoginUseCase<MockCodeRepo, MockUserRepo> {
    LoginUseCase {
        verify: VerifyOtpUseCase { codes },
        resolve: ResolveIdentityUseCase { users },
        jwt_secret: TEST_JWT_SECRET.to_owned(),
    }
}

#[tokio::test]
async fn should_create_verified_buyer_on_first_login() {
    let users = MockUserRepo::empty();
    let users_handle = users.users_handle();
    let codes = MockCodeRepo::new(vec![test_code(TEST_PHONE, "123456", OtpPurpose::Login)]);

    let login = login_usecase(codes, users)
        .execute(LoginInput {
            phone: TEST_PHONE.to_owned(),
            code: "123456".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(login.user.phone, TEST_PHONE);
    assert_eq!(login.user.role, UserRole::Buyer);
    assert!(login.user.is_verified);
    assert_eq!(users_handle.lock().unwrap().len(), 1);

    let info = validate_session_token(&login.token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.user_id, login.user.id);
}

#[tokio::test]
async fn should_resolve_same_account_for_same_phone() {
    let users = MockUserRepo::empty();
    let users_handle = users.users_handle();
    let resolve = ResolveIdentityUseCase { users };

    let first = resolve.execute(TEST_PHONE).await.unwrap();
    let second = resolve.execute(TEST_PHONE).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(users_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_keep_role_of_existing_account() {
    let seller = test_user(UserRole::Seller);
    let codes = MockCodeRepo::new(vec![test_code(TEST_PHONE, "123456", OtpPurpose::Login)]);

    let login = login_usecase(codes, MockUserRepo::new(vec![seller.clone()]))
        .execute(LoginInput {
            phone: TEST_PHONE.to_owned(),
            code: "123456".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(login.user.id, seller.id);
    assert_eq!(login.user.role, UserRole::Seller);
}

#[tokio::test]
async fn should_refuse_session_for_suspended_account() {
    let mut user = test_user(UserRole::Buyer);
    user.is_suspended = true;
    let codes = MockCodeRepo::new(vec![test_code(TEST_PHONE, "123456", OtpPurpose::Login)]);

    let result = login_usecase(codes, MockUserRepo::new(vec![user]))
        .execute(LoginInput {
            phone: TEST_PHONE.to_owned(),
            code: "123456".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(MarketError::AccountSuspended)),
        "expected AccountSuspended, got {result:?}"
    );
}

#[tokio::test]
async fn should_not_create_account_when_code_is_wrong() {
    let users = MockUserRepo::empty();
    let users_handle = users.users_handle();
    let codes = MockCodeRepo::new(vec![test_code(TEST_PHONE, "123456", OtpPurpose::Login)]);

    let result = login_usecase(codes, users)
        .execute(LoginInput {
            phone: TEST_PHONE.to_owned(),
            code: "111111".to_owned(),
        })
        .await;

    assert!(
        matches!(result, Err(MarketError::OtpInvalid)),
        "expected OtpInvalid, got {result:?}"
    );
    assert!(users_handle.lock().unwrap().is_empty());
}
