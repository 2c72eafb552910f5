use bazaar_market::domain::types::{OtpPurpose, RateLimit};
use bazaar_market::error::MarketError;
use bazaar_market::infra::rate_limit::InMemoryRateLimiter;
use bazaar_market::usecase::otp::{SendOtpInput, SendOtpUseCase, VerifyOtpInput, VerifyOtpUseCase};

use crate::helpers::{
    GENEROUS_LIMIT, MockCodeRepo, RecordingSms, TEST_PHONE, code_from_message, expired_code,
    test_code,
};

fn send_usecase(
    codes: MockCodeRepo,
    sms: RecordingSms,
    limit: RateLimit,
) -> SendOtpUseCase<MockCodeRepo, RecordingSms, InMemoryRateLimiter> {
    SendOtpUseCase {
        codes,
        sms,
        limiter: InMemoryRateLimiter::new(),
        limit,
    }
}

fn login_input(code: &str) -> VerifyOtpInput {
    VerifyOtpInput {
        phone: TEST_PHONE.to_owned(),
        code: code.to_owned(),
        purpose: OtpPurpose::Login,
    }
}

#[tokio::test]
async fn should_store_code_and_send_it_to_normalized_phone() {
    let codes = MockCodeRepo::empty();
    let codes_handle = codes.codes_handle();
    let sms = RecordingSms::new();
    let sent_handle = sms.sent_handle();

    send_usecase(codes, sms, GENEROUS_LIMIT)
        .execute(SendOtpInput {
            phone: "+91 12345-67890".to_owned(),
            purpose: OtpPurpose::Login,
        })
        .await
        .unwrap();

    let codes = codes_handle.lock().unwrap();
    assert_eq!(codes.len(), 1);
    assert_eq!(codes[0].phone, TEST_PHONE);
    assert_eq!(codes[0].code.len(), 6);
    assert!(codes[0].expires_at > chrono::Utc::now());

    let sent = sent_handle.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, TEST_PHONE);
    assert_eq!(code_from_message(&sent[0].1), codes[0].code);
}

#[tokio::test]
async fn should_reject_invalid_phone_without_storing() {
    let codes = MockCodeRepo::empty();
    let codes_handle = codes.codes_handle();

    let result = send_usecase(codes, RecordingSms::new(), GENEROUS_LIMIT)
        .execute(SendOtpInput {
            phone: "12345".to_owned(),
            purpose: OtpPurpose::Login,
        })
        .await;

    assert!(
        matches!(result, Err(MarketError::InvalidPhone)),
        "expected InvalidPhone, got {result:?}"
    );
    assert!(codes_handle.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_invalidate_previous_code_when_reissued() {
    // "000000" is outside the generator's range, so the reissued code differs.
    let codes = MockCodeRepo::new(vec![test_code(TEST_PHONE, "000000", OtpPurpose::Login)]);
    let codes_handle = codes.codes_handle();

    send_usecase(codes, RecordingSms::new(), GENEROUS_LIMIT)
        .execute(SendOtpInput {
            phone: TEST_PHONE.to_owned(),
            purpose: OtpPurpose::Login,
        })
        .await
        .unwrap();
    assert_eq!(codes_handle.lock().unwrap().len(), 1);

    let verify = VerifyOtpUseCase {
        codes: MockCodeRepo {
            codes: codes_handle,
        },
    };
    let result = verify.execute(login_input("000000")).await;
    assert!(
        matches!(result, Err(MarketError::OtpInvalid)),
        "expected OtpInvalid, got {result:?}"
    );
}

#[tokio::test]
async fn should_consume_code_on_success() {
    let verify = VerifyOtpUseCase {
        codes: MockCodeRepo::new(vec![test_code(TEST_PHONE, "123456", OtpPurpose::Login)]),
    };

    let phone = verify.execute(login_input("123456")).await.unwrap();
    assert_eq!(phone, TEST_PHONE);

    let result = verify.execute(login_input("123456")).await;
    assert!(
        matches!(result, Err(MarketError::OtpNotFound)),
        "expected OtpNotFound on reuse, got {result:?}"
    );
}

#[tokio::test]
async fn should_remove_expired_code() {
    let codes = MockCodeRepo::new(vec![expired_code(TEST_PHONE, "123456", OtpPurpose::Login)]);
    let codes_handle = codes.codes_handle();
    let verify = VerifyOtpUseCase { codes };

    let result = verify.execute(login_input("123456")).await;
    assert!(
        matches!(result, Err(MarketError::OtpExpired)),
        "expected OtpExpired, got {result:?}"
    );
    assert!(codes_handle.lock().unwrap().is_empty());

    let result = verify.execute(login_input("123456")).await;
    assert!(
        matches!(result, Err(MarketError::OtpNotFound)),
        "expected OtpNotFound after expiry, got {result:?}"
    );
}

#[tokio::test]
async fn should_keep_code_after_wrong_guess() {
    let verify = VerifyOtpUseCase {
        codes: MockCodeRepo::new(vec![test_code(TEST_PHONE, "123456", OtpPurpose::Login)]),
    };

    let result = verify.execute(login_input("654321")).await;
    assert!(
        matches!(result, Err(MarketError::OtpInvalid)),
        "expected OtpInvalid, got {result:?}"
    );
    assert!(verify.execute(login_input("123456")).await.is_ok());
}

#[tokio::test]
async fn should_not_verify_code_issued_for_another_purpose() {
    let verify = VerifyOtpUseCase {
        codes: MockCodeRepo::new(vec![test_code(
            TEST_PHONE,
            "123456",
            OtpPurpose::ChangePhone,
        )]),
    };

    let result = verify.execute(login_input("123456")).await;
    assert!(
        matches!(result, Err(MarketError::OtpNotFound)),
        "expected OtpNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_require_code() {
    let verify = VerifyOtpUseCase {
        codes: MockCodeRepo::empty(),
    };
    let result = verify.execute(login_input("   ")).await;
    assert!(
        matches!(result, Err(MarketError::Validation(_))),
        "expected Validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_keep_code_when_delivery_fails() {
    let codes = MockCodeRepo::empty();
    let codes_handle = codes.codes_handle();

    let result = send_usecase(codes, RecordingSms::failing(), GENEROUS_LIMIT)
        .execute(SendOtpInput {
            phone: TEST_PHONE.to_owned(),
            purpose: OtpPurpose::Login,
        })
        .await;

    assert!(
        matches!(result, Err(MarketError::Delivery(_))),
        "expected Delivery, got {result:?}"
    );
    assert_eq!(codes_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_rate_limit_issuance_per_phone() {
    let sms = RecordingSms::new();
    let sent_handle = sms.sent_handle();
    let usecase = send_usecase(
        MockCodeRepo::empty(),
        sms,
        RateLimit {
            max: 2,
            window_secs: 600,
        },
    );
    let input = || SendOtpInput {
        phone: TEST_PHONE.to_owned(),
        purpose: OtpPurpose::Login,
    };

    usecase.execute(input()).await.unwrap();
    usecase.execute(input()).await.unwrap();
    let result = usecase.execute(input()).await;

    assert!(
        matches!(result, Err(MarketError::RateLimited)),
        "expected RateLimited, got {result:?}"
    );
    assert_eq!(sent_handle.lock().unwrap().len(), 2);

    // Other phones have their own window.
    usecase
        .execute(SendOtpInput {
            phone: "+442079460958".to_owned(),
            purpose: OtpPurpose::Login,
        })
        .await
        .unwrap();
}
