use sea_orm_migration::prelude::*;

mod m20261001_000001_create_users;
mod m20261001_000002_create_verification_codes;
mod m20261001_000003_create_products;
mod m20261001_000004_create_favorites;
mod m20261001_000005_create_reports;
mod m20261001_000006_create_tickets;
mod m20261001_000007_create_chats;
mod m20261001_000008_create_payments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_users::Migration),
            Box::new(m20261001_000002_create_verification_codes::Migration),
            Box::new(m20261001_000003_create_products::Migration),
            Box::new(m20261001_000004_create_favorites::Migration),
            Box::new(m20261001_000005_create_reports::Migration),
            Box::new(m20261001_000006_create_tickets::Migration),
            Box::new(m20261001_000007_create_chats::Migration),
            Box::new(m20261001_000008_create_payments::Migration),
        ]
    }
}
