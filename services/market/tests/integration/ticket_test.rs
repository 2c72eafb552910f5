use uuid::Uuid;

use bazaar_domain::pagination::PageRequest;
use bazaar_domain::ticket::TicketStatus;
use bazaar_domain::user::UserRole;
use bazaar_market::error::MarketError;
use bazaar_market::usecase::ticket::{
    CreateTicketInput, CreateTicketUseCase, GetTicketUseCase, ListTicketsUseCase,
    ReplyTicketUseCase, SetTicketStatusUseCase,
};

use crate::helpers::{MockTicketRepo, test_ticket};

#[tokio::test]
async fn should_open_ticket_for_caller() {
    let tickets = MockTicketRepo::empty();
    let tickets_handle = tickets.tickets_handle();
    let user = Uuid::new_v4();

    let ticket = CreateTicketUseCase { tickets }
        .execute(CreateTicketInput {
            user_id: user,
            subject: " Refund ".to_owned(),
            body: "Item never arrived".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(ticket.status, TicketStatus::Open);
    assert_eq!(ticket.subject, "Refund");
    assert_eq!(tickets_handle.lock().unwrap()[0].user_id, user);
}

#[tokio::test]
async fn should_flag_admin_replies_as_staff() {
    let owner = Uuid::new_v4();
    let admin = Uuid::new_v4();
    let ticket = test_ticket(owner, TicketStatus::Open);
    let tickets = MockTicketRepo::empty();
    tickets.tickets.lock().unwrap().push(ticket.clone());
    let reply = ReplyTicketUseCase { tickets };

    let from_owner = reply
        .execute(ticket.id, owner, UserRole::Buyer, "Any update?".to_owned())
        .await
        .unwrap();
    let from_admin = reply
        .execute(ticket.id, admin, UserRole::Admin, "Refund issued".to_owned())
        .await
        .unwrap();

    assert!(!from_owner.is_staff);
    assert!(from_admin.is_staff);

    let (_, replies) = GetTicketUseCase {
        tickets: MockTicketRepo {
            tickets: reply.tickets.tickets_handle(),
            replies: reply.tickets.replies.clone(),
        },
    }
    .execute(ticket.id, owner, UserRole::Buyer)
    .await
    .unwrap();
    assert_eq!(replies.len(), 2);
}

#[tokio::test]
async fn should_hide_ticket_from_other_users() {
    let ticket = test_ticket(Uuid::new_v4(), TicketStatus::Open);
    let tickets = MockTicketRepo::empty();
    tickets.tickets.lock().unwrap().push(ticket.clone());
    let get = GetTicketUseCase { tickets };

    let result = get.execute(ticket.id, Uuid::new_v4(), UserRole::Seller).await;
    assert!(
        matches!(result, Err(MarketError::TicketNotFound)),
        "expected TicketNotFound, got {result:?}"
    );
    assert!(
        get.execute(ticket.id, Uuid::new_v4(), UserRole::Admin)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn should_refuse_replies_on_closed_ticket() {
    let owner = Uuid::new_v4();
    let ticket = test_ticket(owner, TicketStatus::Open);
    let tickets = MockTicketRepo::empty();
    tickets.tickets.lock().unwrap().push(ticket.clone());
    let tickets_handle = tickets.tickets_handle();

    SetTicketStatusUseCase { tickets }
        .execute(ticket.id, TicketStatus::Closed)
        .await
        .unwrap();

    let reply = ReplyTicketUseCase {
        tickets: MockTicketRepo {
            tickets: tickets_handle,
            ..MockTicketRepo::default()
        },
    };
    let result = reply
        .execute(ticket.id, owner, UserRole::Buyer, "Hello?".to_owned())
        .await;
    assert!(
        matches!(result, Err(MarketError::Validation("ticket is closed"))),
        "expected closed-ticket Validation, got {result:?}"
    );
}

#[tokio::test]
async fn should_report_missing_ticket_on_status_change() {
    let result = SetTicketStatusUseCase {
        tickets: MockTicketRepo::empty(),
    }
    .execute(Uuid::new_v4(), TicketStatus::Closed)
    .await;
    assert!(
        matches!(result, Err(MarketError::TicketNotFound)),
        "expected TicketNotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_filter_tickets_by_owner_and_status() {
    let owner = Uuid::new_v4();
    let tickets = MockTicketRepo::empty();
    {
        let mut rows = tickets.tickets.lock().unwrap();
        rows.push(test_ticket(owner, TicketStatus::Open));
        rows.push(test_ticket(owner, TicketStatus::Closed));
        rows.push(test_ticket(Uuid::new_v4(), TicketStatus::Open));
    }
    let list = ListTicketsUseCase { tickets };

    let mine = list
        .execute(Some(owner), None, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(mine.len(), 2);

    let open = list
        .execute(None, Some(TicketStatus::Open), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(open.len(), 2);
}
