use chrono::{DateTime, Utc};
use uuid::Uuid;

use bazaar_domain::listing::ListingStatus;
use bazaar_domain::ticket::TicketStatus;
use bazaar_domain::user::{SellerStatus, UserRole};

/// Number of digits in a one-time code.
pub const OTP_LEN: usize = 6;

/// One-time code lifetime in seconds (5 minutes).
pub const OTP_TTL_SECS: i64 = 300;

pub const MAX_CHAT_MESSAGE_LEN: usize = 2000;
pub const MAX_REPORT_REASON_LEN: usize = 500;
pub const MAX_TICKET_SUBJECT_LEN: usize = 200;
pub const MAX_TICKET_BODY_LEN: usize = 5000;
pub const MAX_NAME_LEN: usize = 80;

/// Largest batch accepted by the bulk moderation endpoints.
pub const MAX_BULK_IDS: usize = 500;

/// What a verification code may be used for. A code issued for one purpose
/// never verifies for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPurpose {
    Login,
    ChangePhone,
}

impl OtpPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::ChangePhone => "CHANGE_PHONE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "LOGIN" => Some(Self::Login),
            "CHANGE_PHONE" => Some(Self::ChangePhone),
            _ => None,
        }
    }
}

/// The single live code for a phone.
#[derive(Debug, Clone)]
pub struct VerificationCode {
    pub phone: String,
    pub code: String,
    pub purpose: OtpPurpose,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl VerificationCode {
    /// A code is dead from `expires_at` onward.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Fixed-window limit: at most `max` hits per `window_secs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub max: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub phone: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub seller_status: Option<SellerStatus>,
    pub is_verified: bool,
    pub is_suspended: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_approved_seller(&self) -> bool {
        self.role == UserRole::Seller && self.seller_status == Some(SellerStatus::Approved)
    }
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub status: ListingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial listing update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.price_cents.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct Report {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub product_id: Uuid,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Conversation between a buyer and the seller of one listing.
#[derive(Debug, Clone)]
pub struct Chat {
    pub id: Uuid,
    pub product_id: Uuid,
    pub buyer_id: Uuid,
    pub seller_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Chat {
    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.buyer_id == user_id || self.seller_id == user_id
    }
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject: String,
    pub body: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct TicketReply {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub author_id: Uuid,
    pub is_staff: bool,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Option<Uuid>,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub provider_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Moderation action applied to a batch of accounts or listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Suspend,
    Activate,
    Delete,
}

impl BulkAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "suspend" => Some(Self::Suspend),
            "activate" => Some(Self::Activate),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Deduplicate ids, keeping first-seen order.
pub fn dedupe_ids(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Length check on the trimmed value, counted in characters.
pub fn within_len(value: &str, max: usize) -> bool {
    let len = value.trim().chars().count();
    len >= 1 && len <= max
}
