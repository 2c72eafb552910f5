//! sea-orm entities for the marketplace database.

pub mod chat_messages;
pub mod chats;
pub mod favorites;
pub mod payments;
pub mod products;
pub mod reports;
pub mod ticket_replies;
pub mod tickets;
pub mod users;
pub mod verification_codes;
