use uuid::Uuid;

use bazaar_domain::user::{SellerStatus, UserRole};
use bazaar_market::error::MarketError;
use bazaar_market::infra::rate_limit::InMemoryRateLimiter;
use bazaar_market::usecase::otp::{SendOtpUseCase, VerifyOtpUseCase};
use bazaar_market::usecase::user::{
    ChangePhoneInput, ChangePhoneUseCase, DeleteAccountUseCase, RequestPhoneChangeUseCase,
    UpdateProfileInput, UpdateProfileUseCase,
};

use crate::helpers::{
    GENEROUS_LIMIT, MockCodeRepo, MockUserRepo, RecordingSms, TEST_PHONE, code_from_message,
    test_user, test_user_with_phone,
};

const NEW_PHONE: &str = "+442079460958";

#[tokio::test]
async fn should_apply_for_seller_role() {
    let buyer = test_user(UserRole::Buyer);
    let users = MockUserRepo::new(vec![buyer.clone()]);
    let users_handle = users.users_handle();

    UpdateProfileUseCase { users }
        .execute(
            buyer.id,
            buyer.role,
            UpdateProfileInput {
                name: Some("  Asha  ".to_owned()),
                become_seller: Some(true),
            },
        )
        .await
        .unwrap();

    let stored = &users_handle.lock().unwrap()[0];
    assert_eq!(stored.name.as_deref(), Some("Asha"));
    assert_eq!(stored.role, UserRole::Seller);
    assert_eq!(stored.seller_status, Some(SellerStatus::Pending));
}

#[tokio::test]
async fn should_reject_empty_profile_update() {
    let buyer = test_user(UserRole::Buyer);
    let result = UpdateProfileUseCase {
        users: MockUserRepo::new(vec![buyer.clone()]),
    }
    .execute(
        buyer.id,
        buyer.role,
        UpdateProfileInput {
            name: None,
            become_seller: Some(false),
        },
    )
    .await;

    assert!(
        matches!(result, Err(MarketError::MissingData)),
        "expected MissingData, got {result:?}"
    );
}

#[tokio::test]
async fn should_forbid_admin_from_becoming_seller() {
    let admin = test_user(UserRole::Admin);
    let result = UpdateProfileUseCase {
        users: MockUserRepo::new(vec![admin.clone()]),
    }
    .execute(
        admin.id,
        admin.role,
        UpdateProfileInput {
            name: None,
            become_seller: Some(true),
        },
    )
    .await;

    assert!(
        matches!(result, Err(MarketError::Forbidden)),
        "expected Forbidden, got {result:?}"
    );
}

#[tokio::test]
async fn should_change_phone_with_code_sent_to_new_number() {
    let user = test_user(UserRole::Buyer);
    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();
    let codes = MockCodeRepo::empty();
    let codes_handle = codes.codes_handle();
    let sms = RecordingSms::new();
    let sent_handle = sms.sent_handle();

    RequestPhoneChangeUseCase {
        users: MockUserRepo {
            users: users.users_handle(),
        },
        send: SendOtpUseCase {
            codes,
            sms,
            limiter: InMemoryRateLimiter::new(),
            limit: GENEROUS_LIMIT,
        },
    }
    .execute(user.id, NEW_PHONE)
    .await
    .unwrap();

    let code = {
        let sent = sent_handle.lock().unwrap();
        assert_eq!(sent[0].0, NEW_PHONE);
        code_from_message(&sent[0].1)
    };

    ChangePhoneUseCase {
        users,
        verify: VerifyOtpUseCase {
            codes: MockCodeRepo {
                codes: codes_handle,
            },
        },
    }
    .execute(
        user.id,
        ChangePhoneInput {
            phone: NEW_PHONE.to_owned(),
            code,
        },
    )
    .await
    .unwrap();

    assert_eq!(users_handle.lock().unwrap()[0].phone, NEW_PHONE);
}

#[tokio::test]
async fn should_refuse_phone_owned_by_another_account() {
    let user = test_user_with_phone(UserRole::Buyer, 1);
    let other = test_user(UserRole::Buyer);
    let sms = RecordingSms::new();
    let sent_handle = sms.sent_handle();

    let result = RequestPhoneChangeUseCase {
        users: MockUserRepo::new(vec![user.clone(), other]),
        send: SendOtpUseCase {
            codes: MockCodeRepo::empty(),
            sms,
            limiter: InMemoryRateLimiter::new(),
            limit: GENEROUS_LIMIT,
        },
    }
    .execute(user.id, TEST_PHONE)
    .await;

    assert!(
        matches!(result, Err(MarketError::PhoneTaken)),
        "expected PhoneTaken, got {result:?}"
    );
    assert!(sent_handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_not_accept_login_code_for_phone_change() {
    let user = test_user(UserRole::Buyer);
    let codes = MockCodeRepo::new(vec![crate::helpers::test_code(
        NEW_PHONE,
        "123456",
        bazaar_market::domain::types::OtpPurpose::Login,
    )]);

    let result = ChangePhoneUseCase {
        users: MockUserRepo::new(vec![user.clone()]),
        verify: VerifyOtpUseCase { codes },
    }
    .execute(
        user.id,
        ChangePhoneInput {
            phone: NEW_PHONE.to_owned(),
            code: "123456".to_owned(),
        },
    )
    .await;

    assert!(
        matches!(result, Err(MarketError::OtpNotFound)),
        "expected OtpNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_delete_own_account_once() {
    let user = test_user(UserRole::Buyer);
    let users = MockUserRepo::new(vec![user.clone()]);
    let users_handle = users.users_handle();
    let usecase = DeleteAccountUseCase {
        accounts: users.accounts(),
    };

    usecase.execute(user.id).await.unwrap();
    assert!(users_handle.lock().unwrap().is_empty());

    let result = usecase.execute(user.id).await;
    assert!(
        matches!(result, Err(MarketError::UserNotFound)),
        "expected UserNotFound, got {result:?}"
    );

    let result = usecase.execute(Uuid::new_v4()).await;
    assert!(matches!(result, Err(MarketError::UserNotFound)));
}
