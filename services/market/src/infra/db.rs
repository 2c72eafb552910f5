use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    TransactionTrait,
    sea_query::{ConditionalStatement, Expr, OnConflict, Query, SelectStatement},
};
use uuid::Uuid;

use bazaar_domain::listing::ListingStatus;
use bazaar_domain::pagination::PageRequest;
use bazaar_domain::ticket::TicketStatus;
use bazaar_domain::user::{SellerStatus, UserRole};
use bazaar_market_schema::{
    chat_messages, chats, favorites, payments, products, reports, ticket_replies, tickets, users,
    verification_codes,
};

use crate::domain::repository::{
    AccountRepository, ChatRepository, FavoriteRepository, PaymentRepository, ProductRepository,
    ReportRepository, TicketRepository, UserRepository, VerificationCodeRepository,
};
use crate::domain::types::{
    BulkAction, Chat, ChatMessage, OtpPurpose, Payment, Product, ProductPatch, Report, Ticket,
    TicketReply, User, VerificationCode,
};
use crate::error::MarketError;

// ── Verification code repository ─────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVerificationCodeRepository {
    pub db: DatabaseConnection,
}

impl VerificationCodeRepository for DbVerificationCodeRepository {
    async fn upsert(&self, code: &VerificationCode) -> Result<(), MarketError> {
        let model = verification_codes::ActiveModel {
            phone: Set(code.phone.clone()),
            code: Set(code.code.clone()),
            purpose: Set(code.purpose.as_str().to_owned()),
            expires_at: Set(code.expires_at),
            created_at: Set(code.created_at),
        };
        verification_codes::Entity::insert(model)
            .on_conflict(
                OnConflict::column(verification_codes::Column::Phone)
                    .update_columns([
                        verification_codes::Column::Code,
                        verification_codes::Column::Purpose,
                        verification_codes::Column::ExpiresAt,
                        verification_codes::Column::CreatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("upsert verification code")?;
        Ok(())
    }

    async fn find(&self, phone: &str) -> Result<Option<VerificationCode>, MarketError> {
        let model = verification_codes::Entity::find_by_id(phone.to_owned())
            .one(&self.db)
            .await
            .context("find verification code")?;
        model.map(code_from_model).transpose()
    }

    async fn delete(&self, phone: &str) -> Result<bool, MarketError> {
        let result = verification_codes::Entity::delete_many()
            .filter(verification_codes::Column::Phone.eq(phone))
            .exec(&self.db)
            .await
            .context("delete verification code")?;
        Ok(result.rows_affected > 0)
    }
}

fn code_from_model(model: verification_codes::Model) -> Result<VerificationCode, MarketError> {
    let purpose = OtpPurpose::parse(&model.purpose)
        .with_context(|| format!("unknown otp purpose {:?}", model.purpose))?;
    Ok(VerificationCode {
        phone: model.phone,
        code: model.code,
        purpose,
        expires_at: model.expires_at,
        created_at: model.created_at,
    })
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, MarketError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, MarketError> {
        let model = users::Entity::find()
            .filter(users::Column::Phone.eq(phone))
            .one(&self.db)
            .await
            .context("find user by phone")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, MarketError> {
        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .context("find users by ids")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn upsert_verified(&self, phone: &str) -> Result<User, MarketError> {
        let now = Utc::now();
        let model = users::ActiveModel {
            id: Set(Uuid::now_v7()),
            phone: Set(phone.to_owned()),
            name: Set(None),
            role: Set(UserRole::Buyer.as_str().to_owned()),
            seller_status: Set(None),
            is_verified: Set(true),
            is_suspended: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };
        // INSERT .. ON CONFLICT (phone) DO UPDATE .. RETURNING *: the unique
        // constraint decides between create and update.
        let model = users::Entity::insert(model)
            .on_conflict(
                OnConflict::column(users::Column::Phone)
                    .update_columns([users::Column::IsVerified, users::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .context("upsert verified user")?;
        user_from_model(model)
    }

    async fn list(
        &self,
        role: Option<UserRole>,
        page: PageRequest,
    ) -> Result<Vec<User>, MarketError> {
        let mut query = users::Entity::find();
        if let Some(role) = role {
            query = query.filter(users::Column::Role.eq(role.as_str()));
        }
        let models = query
            .order_by_desc(users::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list users")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn update_name(&self, id: Uuid, name: &str) -> Result<(), MarketError> {
        users::ActiveModel {
            id: Set(id),
            name: Set(Some(name.to_owned())),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update user name")?;
        Ok(())
    }

    async fn promote_to_seller(&self, id: Uuid) -> Result<(), MarketError> {
        users::Entity::update_many()
            .col_expr(users::Column::Role, Expr::value(UserRole::Seller.as_str()))
            .col_expr(
                users::Column::SellerStatus,
                Expr::value(SellerStatus::Pending.as_str()),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::Role.eq(UserRole::Buyer.as_str()))
            .exec(&self.db)
            .await
            .context("promote user to seller")?;
        Ok(())
    }

    async fn set_seller_status(&self, id: Uuid, status: SellerStatus) -> Result<(), MarketError> {
        users::Entity::update_many()
            .col_expr(users::Column::SellerStatus, Expr::value(status.as_str()))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set seller status")?;
        Ok(())
    }

    async fn update_phone(&self, id: Uuid, phone: &str) -> Result<(), MarketError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Phone, Expr::value(phone))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await;
        match result {
            Ok(r) if r.rows_affected == 0 => Err(MarketError::UserNotFound),
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(MarketError::PhoneTaken)
            }
            Err(e) => Err(anyhow::Error::new(e).context("update user phone").into()),
        }
    }
}

fn user_from_model(model: users::Model) -> Result<User, MarketError> {
    let role = UserRole::parse(&model.role)
        .with_context(|| format!("unknown user role {:?}", model.role))?;
    let seller_status = match model.seller_status.as_deref() {
        Some(s) => Some(
            SellerStatus::parse(s).with_context(|| format!("unknown seller status {s:?}"))?,
        ),
        None => None,
    };
    Ok(User {
        id: model.id,
        phone: model.phone,
        name: model.name,
        role,
        seller_status,
        is_verified: model.is_verified,
        is_suspended: model.is_suspended,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Account repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAccountRepository {
    pub db: DatabaseConnection,
}

fn products_of(seller_ids: &[Uuid]) -> SelectStatement {
    Query::select()
        .column(products::Column::Id)
        .from(products::Entity)
        .and_where(products::Column::SellerId.is_in(seller_ids.to_vec()))
        .to_owned()
}

fn chats_touching(user_ids: &[Uuid]) -> SelectStatement {
    Query::select()
        .column(chats::Column::Id)
        .from(chats::Entity)
        .cond_where(
            Condition::any()
                .add(chats::Column::BuyerId.is_in(user_ids.to_vec()))
                .add(chats::Column::SellerId.is_in(user_ids.to_vec()))
                .add(chats::Column::ProductId.in_subquery(products_of(user_ids))),
        )
        .to_owned()
}

/// Remove the accounts and every row that references them or their listings.
/// Runs on the caller's connection; wrap in a transaction.
async fn delete_accounts_on<C: ConnectionTrait>(conn: &C, ids: &[Uuid]) -> Result<u64, DbErr> {
    favorites::Entity::delete_many()
        .filter(
            Condition::any()
                .add(favorites::Column::UserId.is_in(ids.to_vec()))
                .add(favorites::Column::ProductId.in_subquery(products_of(ids))),
        )
        .exec(conn)
        .await?;

    reports::Entity::delete_many()
        .filter(
            Condition::any()
                .add(reports::Column::ReporterId.is_in(ids.to_vec()))
                .add(reports::Column::ProductId.in_subquery(products_of(ids))),
        )
        .exec(conn)
        .await?;

    ticket_replies::Entity::delete_many()
        .filter(
            Condition::any()
                .add(ticket_replies::Column::AuthorId.is_in(ids.to_vec()))
                .add(
                    ticket_replies::Column::TicketId.in_subquery(
                        Query::select()
                            .column(tickets::Column::Id)
                            .from(tickets::Entity)
                            .and_where(tickets::Column::UserId.is_in(ids.to_vec()))
                            .to_owned(),
                    ),
                ),
        )
        .exec(conn)
        .await?;
    tickets::Entity::delete_many()
        .filter(tickets::Column::UserId.is_in(ids.to_vec()))
        .exec(conn)
        .await?;

    chat_messages::Entity::delete_many()
        .filter(
            Condition::any()
                .add(chat_messages::Column::SenderId.is_in(ids.to_vec()))
                .add(chat_messages::Column::ChatId.in_subquery(chats_touching(ids))),
        )
        .exec(conn)
        .await?;
    chats::Entity::delete_many()
        .filter(chats::Column::Id.in_subquery(chats_touching(ids)))
        .exec(conn)
        .await?;

    payments::Entity::delete_many()
        .filter(payments::Column::UserId.is_in(ids.to_vec()))
        .exec(conn)
        .await?;
    // Other buyers' payment records outlive the listing.
    payments::Entity::update_many()
        .col_expr(payments::Column::ProductId, Expr::value(Option::<Uuid>::None))
        .filter(payments::Column::ProductId.in_subquery(products_of(ids)))
        .exec(conn)
        .await?;

    products::Entity::delete_many()
        .filter(products::Column::SellerId.is_in(ids.to_vec()))
        .exec(conn)
        .await?;

    let result = users::Entity::delete_many()
        .filter(users::Column::Id.is_in(ids.to_vec()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

impl AccountRepository for DbAccountRepository {
    async fn delete_accounts(&self, ids: &[Uuid]) -> Result<u64, MarketError> {
        let ids = ids.to_vec();
        let deleted = self
            .db
            .transaction::<_, u64, DbErr>(|txn| {
                Box::pin(async move { delete_accounts_on(txn, &ids).await })
            })
            .await
            .context("delete accounts")?;
        Ok(deleted)
    }

    async fn bulk_apply(
        &self,
        ids: &[Uuid],
        action: BulkAction,
        user_type: Option<UserRole>,
    ) -> Result<u64, MarketError> {
        let txn = self.db.begin().await.context("begin bulk user action")?;

        let targets = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.to_vec()))
            .lock_exclusive()
            .all(&txn)
            .await
            .context("lock bulk user targets")?;
        let eligible = targets
            .iter()
            .filter(|u| u.role != UserRole::Admin.as_str())
            .filter(|u| user_type.is_none_or(|t| u.role == t.as_str()))
            .count();
        if targets.len() != ids.len() || eligible != ids.len() {
            // Dropping `txn` rolls back and releases the row locks.
            return Err(MarketError::InvalidBatch);
        }

        let affected = match action {
            BulkAction::Suspend | BulkAction::Activate => {
                users::Entity::update_many()
                    .col_expr(
                        users::Column::IsSuspended,
                        Expr::value(action == BulkAction::Suspend),
                    )
                    .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
                    .filter(users::Column::Id.is_in(ids.to_vec()))
                    .exec(&txn)
                    .await
                    .context("bulk update users")?
                    .rows_affected
            }
            BulkAction::Delete => delete_accounts_on(&txn, ids)
                .await
                .context("bulk delete users")?,
        };

        txn.commit().await.context("commit bulk user action")?;
        Ok(affected)
    }
}

// ── Product repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

/// Remove listings with their favorites, reports and chats.
async fn delete_products_on<C: ConnectionTrait>(conn: &C, ids: &[Uuid]) -> Result<u64, DbErr> {
    favorites::Entity::delete_many()
        .filter(favorites::Column::ProductId.is_in(ids.to_vec()))
        .exec(conn)
        .await?;
    reports::Entity::delete_many()
        .filter(reports::Column::ProductId.is_in(ids.to_vec()))
        .exec(conn)
        .await?;
    chat_messages::Entity::delete_many()
        .filter(
            chat_messages::Column::ChatId.in_subquery(
                Query::select()
                    .column(chats::Column::Id)
                    .from(chats::Entity)
                    .and_where(chats::Column::ProductId.is_in(ids.to_vec()))
                    .to_owned(),
            ),
        )
        .exec(conn)
        .await?;
    chats::Entity::delete_many()
        .filter(chats::Column::ProductId.is_in(ids.to_vec()))
        .exec(conn)
        .await?;
    payments::Entity::update_many()
        .col_expr(payments::Column::ProductId, Expr::value(Option::<Uuid>::None))
        .filter(payments::Column::ProductId.is_in(ids.to_vec()))
        .exec(conn)
        .await?;
    let result = products::Entity::delete_many()
        .filter(products::Column::Id.is_in(ids.to_vec()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

impl ProductRepository for DbProductRepository {
    async fn create(&self, product: &Product) -> Result<(), MarketError> {
        products::ActiveModel {
            id: Set(product.id),
            seller_id: Set(product.seller_id),
            title: Set(product.title.clone()),
            description: Set(product.description.clone()),
            price_cents: Set(product.price_cents),
            status: Set(product.status.as_str().to_owned()),
            created_at: Set(product.created_at),
            updated_at: Set(product.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create product")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, MarketError> {
        let model = products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find product by id")?;
        model.map(product_from_model).transpose()
    }

    async fn list(
        &self,
        status: Option<ListingStatus>,
        page: PageRequest,
    ) -> Result<Vec<Product>, MarketError> {
        let mut query = products::Entity::find();
        if let Some(status) = status {
            query = query.filter(products::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_desc(products::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list products")?;
        models.into_iter().map(product_from_model).collect()
    }

    async fn update(&self, id: Uuid, patch: &ProductPatch) -> Result<(), MarketError> {
        let mut am = products::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(ref title) = patch.title {
            am.title = Set(title.clone());
        }
        if let Some(ref description) = patch.description {
            am.description = Set(description.clone());
        }
        if let Some(price_cents) = patch.price_cents {
            am.price_cents = Set(price_cents);
        }
        am.updated_at = Set(Utc::now());
        am.update(&self.db).await.context("update product")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), MarketError> {
        self.db
            .transaction::<_, u64, DbErr>(|txn| {
                Box::pin(async move { delete_products_on(txn, &[id]).await })
            })
            .await
            .context("delete product")?;
        Ok(())
    }

    async fn bulk_apply(&self, ids: &[Uuid], action: BulkAction) -> Result<u64, MarketError> {
        let txn = self.db.begin().await.context("begin bulk product action")?;

        let found = products::Entity::find()
            .filter(products::Column::Id.is_in(ids.to_vec()))
            .lock_exclusive()
            .all(&txn)
            .await
            .context("lock bulk product targets")?;
        if found.len() != ids.len() {
            return Err(MarketError::InvalidBatch);
        }

        let affected = match action {
            BulkAction::Suspend | BulkAction::Activate => {
                let status = if action == BulkAction::Suspend {
                    ListingStatus::Suspended
                } else {
                    ListingStatus::Active
                };
                products::Entity::update_many()
                    .col_expr(products::Column::Status, Expr::value(status.as_str()))
                    .col_expr(products::Column::UpdatedAt, Expr::value(Utc::now()))
                    .filter(products::Column::Id.is_in(ids.to_vec()))
                    .exec(&txn)
                    .await
                    .context("bulk update products")?
                    .rows_affected
            }
            BulkAction::Delete => delete_products_on(&txn, ids)
                .await
                .context("bulk delete products")?,
        };

        txn.commit().await.context("commit bulk product action")?;
        Ok(affected)
    }
}

fn product_from_model(model: products::Model) -> Result<Product, MarketError> {
    let status = ListingStatus::parse(&model.status)
        .with_context(|| format!("unknown listing status {:?}", model.status))?;
    Ok(Product {
        id: model.id,
        seller_id: model.seller_id,
        title: model.title,
        description: model.description,
        price_cents: model.price_cents,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Favorite repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbFavoriteRepository {
    pub db: DatabaseConnection,
}

impl FavoriteRepository for DbFavoriteRepository {
    async fn toggle(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, MarketError> {
        let removed = favorites::Entity::delete_many()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::ProductId.eq(product_id))
            .exec(&self.db)
            .await
            .context("remove favorite")?;
        if removed.rows_affected > 0 {
            return Ok(false);
        }

        favorites::Entity::insert(favorites::ActiveModel {
            user_id: Set(user_id),
            product_id: Set(product_id),
            created_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::columns([favorites::Column::UserId, favorites::Column::ProductId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("add favorite")?;
        Ok(true)
    }

    async fn list_products(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Product>, MarketError> {
        let models = products::Entity::find()
            .filter(
                products::Column::Id.in_subquery(
                    Query::select()
                        .column(favorites::Column::ProductId)
                        .from(favorites::Entity)
                        .and_where(favorites::Column::UserId.eq(user_id))
                        .to_owned(),
                ),
            )
            .filter(products::Column::Status.eq(ListingStatus::Active.as_str()))
            .order_by_desc(products::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list favorite products")?;
        models.into_iter().map(product_from_model).collect()
    }
}

// ── Report repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReportRepository {
    pub db: DatabaseConnection,
}

impl ReportRepository for DbReportRepository {
    async fn create(&self, report: &Report) -> Result<(), MarketError> {
        reports::ActiveModel {
            id: Set(report.id),
            reporter_id: Set(report.reporter_id),
            product_id: Set(report.product_id),
            reason: Set(report.reason.clone()),
            created_at: Set(report.created_at),
        }
        .insert(&self.db)
        .await
        .context("create report")?;
        Ok(())
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<Report>, MarketError> {
        let models = reports::Entity::find()
            .order_by_desc(reports::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list reports")?;
        Ok(models
            .into_iter()
            .map(|m| Report {
                id: m.id,
                reporter_id: m.reporter_id,
                product_id: m.product_id,
                reason: m.reason,
                created_at: m.created_at,
            })
            .collect())
    }
}

// ── Chat repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbChatRepository {
    pub db: DatabaseConnection,
}

impl ChatRepository for DbChatRepository {
    async fn find_or_create(&self, chat: &Chat) -> Result<Chat, MarketError> {
        chats::Entity::insert(chats::ActiveModel {
            id: Set(chat.id),
            product_id: Set(chat.product_id),
            buyer_id: Set(chat.buyer_id),
            seller_id: Set(chat.seller_id),
            created_at: Set(chat.created_at),
        })
        .on_conflict(
            OnConflict::columns([chats::Column::ProductId, chats::Column::BuyerId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("insert chat")?;

        let model = chats::Entity::find()
            .filter(chats::Column::ProductId.eq(chat.product_id))
            .filter(chats::Column::BuyerId.eq(chat.buyer_id))
            .one(&self.db)
            .await
            .context("find chat by product and buyer")?
            .context("chat missing after insert")?;
        Ok(chat_from_model(model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chat>, MarketError> {
        let model = chats::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find chat by id")?;
        Ok(model.map(chat_from_model))
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Chat>, MarketError> {
        let models = chats::Entity::find()
            .filter(
                Condition::any()
                    .add(chats::Column::BuyerId.eq(user_id))
                    .add(chats::Column::SellerId.eq(user_id)),
            )
            .order_by_desc(chats::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list chats for user")?;
        Ok(models.into_iter().map(chat_from_model).collect())
    }

    async fn list_messages(
        &self,
        chat_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<ChatMessage>, MarketError> {
        let models = chat_messages::Entity::find()
            .filter(chat_messages::Column::ChatId.eq(chat_id))
            .order_by_asc(chat_messages::Column::CreatedAt)
            .order_by_asc(chat_messages::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list chat messages")?;
        Ok(models
            .into_iter()
            .map(|m| ChatMessage {
                id: m.id,
                chat_id: m.chat_id,
                sender_id: m.sender_id,
                body: m.body,
                created_at: m.created_at,
            })
            .collect())
    }

    async fn create_message(&self, message: &ChatMessage) -> Result<(), MarketError> {
        chat_messages::ActiveModel {
            id: Set(message.id),
            chat_id: Set(message.chat_id),
            sender_id: Set(message.sender_id),
            body: Set(message.body.clone()),
            created_at: Set(message.created_at),
        }
        .insert(&self.db)
        .await
        .context("create chat message")?;
        Ok(())
    }
}

fn chat_from_model(model: chats::Model) -> Chat {
    Chat {
        id: model.id,
        product_id: model.product_id,
        buyer_id: model.buyer_id,
        seller_id: model.seller_id,
        created_at: model.created_at,
    }
}

// ── Ticket repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTicketRepository {
    pub db: DatabaseConnection,
}

impl TicketRepository for DbTicketRepository {
    async fn create(&self, ticket: &Ticket) -> Result<(), MarketError> {
        tickets::ActiveModel {
            id: Set(ticket.id),
            user_id: Set(ticket.user_id),
            subject: Set(ticket.subject.clone()),
            body: Set(ticket.body.clone()),
            status: Set(ticket.status.as_str().to_owned()),
            created_at: Set(ticket.created_at),
            updated_at: Set(ticket.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create ticket")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Ticket>, MarketError> {
        let model = tickets::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ticket by id")?;
        model.map(ticket_from_model).transpose()
    }

    async fn list(
        &self,
        user_id: Option<Uuid>,
        status: Option<TicketStatus>,
        page: PageRequest,
    ) -> Result<Vec<Ticket>, MarketError> {
        let mut query = tickets::Entity::find();
        if let Some(user_id) = user_id {
            query = query.filter(tickets::Column::UserId.eq(user_id));
        }
        if let Some(status) = status {
            query = query.filter(tickets::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_desc(tickets::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list tickets")?;
        models.into_iter().map(ticket_from_model).collect()
    }

    async fn list_replies(&self, ticket_id: Uuid) -> Result<Vec<TicketReply>, MarketError> {
        let models = ticket_replies::Entity::find()
            .filter(ticket_replies::Column::TicketId.eq(ticket_id))
            .order_by_asc(ticket_replies::Column::CreatedAt)
            .order_by_asc(ticket_replies::Column::Id)
            .all(&self.db)
            .await
            .context("list ticket replies")?;
        Ok(models
            .into_iter()
            .map(|m| TicketReply {
                id: m.id,
                ticket_id: m.ticket_id,
                author_id: m.author_id,
                is_staff: m.is_staff,
                body: m.body,
                created_at: m.created_at,
            })
            .collect())
    }

    async fn create_reply(&self, reply: &TicketReply) -> Result<(), MarketError> {
        let reply = reply.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    ticket_replies::ActiveModel {
                        id: Set(reply.id),
                        ticket_id: Set(reply.ticket_id),
                        author_id: Set(reply.author_id),
                        is_staff: Set(reply.is_staff),
                        body: Set(reply.body),
                        created_at: Set(reply.created_at),
                    }
                    .insert(txn)
                    .await?;
                    tickets::Entity::update_many()
                        .col_expr(tickets::Column::UpdatedAt, Expr::value(reply.created_at))
                        .filter(tickets::Column::Id.eq(reply.ticket_id))
                        .exec(txn)
                        .await?;
                    Ok(())
                })
            })
            .await
            .context("create ticket reply")?;
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: TicketStatus) -> Result<bool, MarketError> {
        let result = tickets::Entity::update_many()
            .col_expr(tickets::Column::Status, Expr::value(status.as_str()))
            .col_expr(tickets::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(tickets::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set ticket status")?;
        Ok(result.rows_affected > 0)
    }
}

fn ticket_from_model(model: tickets::Model) -> Result<Ticket, MarketError> {
    let status = TicketStatus::parse(&model.status)
        .with_context(|| format!("unknown ticket status {:?}", model.status))?;
    Ok(Ticket {
        id: model.id,
        user_id: model.user_id,
        subject: model.subject,
        body: model.body,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Payment repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPaymentRepository {
    pub db: DatabaseConnection,
}

impl PaymentRepository for DbPaymentRepository {
    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Payment>, MarketError> {
        let models = payments::Entity::find()
            .filter(payments::Column::UserId.eq(user_id))
            .order_by_desc(payments::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list payments")?;
        Ok(models
            .into_iter()
            .map(|m| Payment {
                id: m.id,
                user_id: m.user_id,
                product_id: m.product_id,
                amount_cents: m.amount_cents,
                currency: m.currency,
                status: m.status,
                provider_ref: m.provider_ref,
                created_at: m.created_at,
            })
            .collect())
    }
}
