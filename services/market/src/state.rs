use sea_orm::DatabaseConnection;

use crate::domain::types::RateLimit;
use crate::infra::db::{
    DbAccountRepository, DbChatRepository, DbFavoriteRepository, DbPaymentRepository,
    DbProductRepository, DbReportRepository, DbTicketRepository, DbUserRepository,
    DbVerificationCodeRepository,
};
use crate::infra::rate_limit::RateLimiterBackend;
use crate::infra::sms::SmsGateway;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub sms: SmsGateway,
    pub rate_limiter: RateLimiterBackend,
    pub jwt_secret: String,
    pub cookie_domain: String,
    pub otp_rate_limit: RateLimit,
    pub chat_rate_limit: RateLimit,
}

impl AppState {
    pub fn code_repo(&self) -> DbVerificationCodeRepository {
        DbVerificationCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn product_repo(&self) -> DbProductRepository {
        DbProductRepository {
            db: self.db.clone(),
        }
    }

    pub fn favorite_repo(&self) -> DbFavoriteRepository {
        DbFavoriteRepository {
            db: self.db.clone(),
        }
    }

    pub fn report_repo(&self) -> DbReportRepository {
        DbReportRepository {
            db: self.db.clone(),
        }
    }

    pub fn chat_repo(&self) -> DbChatRepository {
        DbChatRepository {
            db: self.db.clone(),
        }
    }

    pub fn ticket_repo(&self) -> DbTicketRepository {
        DbTicketRepository {
            db: self.db.clone(),
        }
    }

    pub fn payment_repo(&self) -> DbPaymentRepository {
        DbPaymentRepository {
            db: self.db.clone(),
        }
    }
}
