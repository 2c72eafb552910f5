use uuid::Uuid;

use bazaar_domain::listing::ListingStatus;
use bazaar_domain::pagination::PageRequest;
use bazaar_market::domain::types::RateLimit;
use bazaar_market::error::MarketError;
use bazaar_market::infra::rate_limit::InMemoryRateLimiter;
use bazaar_market::usecase::chat::{ListMessagesUseCase, OpenChatUseCase, SendMessageUseCase};

use crate::helpers::{GENEROUS_LIMIT, MockChatRepo, MockProductRepo, test_product};

#[tokio::test]
async fn should_open_one_chat_per_buyer_and_listing() {
    let seller = Uuid::new_v4();
    let buyer = Uuid::new_v4();
    let product = test_product(seller);
    let chats = MockChatRepo::empty();
    let chats_handle = chats.chats_handle();
    let usecase = OpenChatUseCase {
        products: MockProductRepo::new(vec![product.clone()]),
        chats,
    };

    let first = usecase.execute(buyer, product.id).await.unwrap();
    let second = usecase.execute(buyer, product.id).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.seller_id, seller);
    assert_eq!(chats_handle.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_refuse_chat_on_own_or_suspended_listing() {
    let seller = Uuid::new_v4();
    let product = test_product(seller);
    let mut suspended = test_product(seller);
    suspended.status = ListingStatus::Suspended;
    let usecase = OpenChatUseCase {
        products: MockProductRepo::new(vec![product.clone(), suspended.clone()]),
        chats: MockChatRepo::empty(),
    };

    let own = usecase.execute(seller, product.id).await;
    assert!(
        matches!(own, Err(MarketError::Validation(_))),
        "expected Validation, got {own:?}"
    );

    let hidden = usecase.execute(Uuid::new_v4(), suspended.id).await;
    assert!(
        matches!(hidden, Err(MarketError::ProductNotFound)),
        "expected ProductNotFound, got {hidden:?}"
    );
}

#[tokio::test]
async fn should_keep_messages_private_to_participants() {
    let seller = Uuid::new_v4();
    let buyer = Uuid::new_v4();
    let product = test_product(seller);
    let chats = MockChatRepo::empty();
    let chats_handle = chats.chats_handle();
    let chat = OpenChatUseCase {
        products: MockProductRepo::new(vec![product.clone()]),
        chats,
    }
    .execute(buyer, product.id)
    .await
    .unwrap();

    let chats = MockChatRepo {
        chats: chats_handle,
        ..MockChatRepo::default()
    };
    let messages_handle = chats.messages_handle();
    let send = SendMessageUseCase {
        chats,
        limiter: InMemoryRateLimiter::new(),
        limit: GENEROUS_LIMIT,
    };

    send.execute(buyer, chat.id, "Is it still available?".to_owned())
        .await
        .unwrap();
    send.execute(seller, chat.id, "Yes".to_owned()).await.unwrap();

    let intruder = send
        .execute(Uuid::new_v4(), chat.id, "hello".to_owned())
        .await;
    assert!(
        matches!(intruder, Err(MarketError::ChatNotFound)),
        "expected ChatNotFound, got {intruder:?}"
    );

    let list = ListMessagesUseCase {
        chats: MockChatRepo {
            chats: send.chats.chats_handle(),
            messages: messages_handle,
        },
    };
    let messages = list
        .execute(buyer, chat.id, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].body, "Is it still available?");

    let outsider = list
        .execute(Uuid::new_v4(), chat.id, PageRequest::default())
        .await;
    assert!(matches!(outsider, Err(MarketError::ChatNotFound)));
}

#[tokio::test]
async fn should_rate_limit_messages_per_sender() {
    let seller = Uuid::new_v4();
    let buyer = Uuid::new_v4();
    let product = test_product(seller);
    let chats = MockChatRepo::empty();
    let chats_handle = chats.chats_handle();
    let chat = OpenChatUseCase {
        products: MockProductRepo::new(vec![product.clone()]),
        chats,
    }
    .execute(buyer, product.id)
    .await
    .unwrap();

    let send = SendMessageUseCase {
        chats: MockChatRepo::new(chats_handle.lock().unwrap().clone()),
        limiter: InMemoryRateLimiter::new(),
        limit: RateLimit {
            max: 2,
            window_secs: 60,
        },
    };

    send.execute(buyer, chat.id, "one".to_owned()).await.unwrap();
    send.execute(buyer, chat.id, "two".to_owned()).await.unwrap();
    let result = send.execute(buyer, chat.id, "three".to_owned()).await;
    assert!(
        matches!(result, Err(MarketError::RateLimited)),
        "expected RateLimited, got {result:?}"
    );

    // The other participant is counted separately.
    send.execute(seller, chat.id, "reply".to_owned())
        .await
        .unwrap();
}

#[tokio::test]
async fn should_reject_blank_or_oversized_message() {
    let seller = Uuid::new_v4();
    let buyer = Uuid::new_v4();
    let product = test_product(seller);
    let chats = MockChatRepo::empty();
    let chats_handle = chats.chats_handle();
    let chat = OpenChatUseCase {
        products: MockProductRepo::new(vec![product.clone()]),
        chats,
    }
    .execute(buyer, product.id)
    .await
    .unwrap();

    let send = SendMessageUseCase {
        chats: MockChatRepo::new(chats_handle.lock().unwrap().clone()),
        limiter: InMemoryRateLimiter::new(),
        limit: GENEROUS_LIMIT,
    };

    for body in ["   ".to_owned(), "x".repeat(2001)] {
        let result = send.execute(buyer, chat.id, body).await;
        assert!(
            matches!(result, Err(MarketError::Validation(_))),
            "expected Validation, got {result:?}"
        );
    }
}
