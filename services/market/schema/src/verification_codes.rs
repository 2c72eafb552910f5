use sea_orm::entity::prelude::*;

/// One-time code sent by SMS. Keyed by phone: issuing again overwrites the row.
/// Expires after 5 minutes; deleted on successful or expired verification.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "verification_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub phone: String,
    pub code: String,
    /// `LOGIN` | `CHANGE_PHONE`
    pub purpose: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
