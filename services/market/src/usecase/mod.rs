pub mod admin;
pub mod chat;
pub mod favorite;
pub mod identity;
pub mod otp;
pub mod payment;
pub mod product;
pub mod report;
pub mod session;
pub mod ticket;
pub mod user;
