// region:    --- Imports
use super::AuctionStore;
use crate::auction::model::{
    Bid, Category, Comment, Listing, NewComment, NewListing, NewUser, User,
};
use crate::bidding::model::evaluate_bid;
use crate::database::DatabaseManager;
use crate::error::AuctionError;
use crate::query::queries;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

/// 유니크 제약 위반 여부
fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

// region:    --- Postgres Store
/// PostgreSQL 저장소 구현체
pub struct PostgresStore {
    db: Arc<DatabaseManager>,
}

impl PostgresStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }

    /// 상품이 없으면 ListingNotFound
    async fn ensure_listing(&self, listing_id: i64) -> Result<(), AuctionError> {
        let exists = sqlx::query_scalar::<_, bool>(queries::LISTING_EXISTS)
            .bind(listing_id)
            .fetch_one(self.db.pool())
            .await?;
        if exists {
            Ok(())
        } else {
            Err(AuctionError::ListingNotFound(listing_id))
        }
    }
}

#[async_trait]
impl AuctionStore for PostgresStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AuctionError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING id, username, email, password_hash, created_at",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(self.db.pool())
        .await;

        match result {
            Ok(user) => {
                info!("{:<12} --> 사용자 생성: {}", "Store", user.username);
                Ok(user)
            }
            Err(e) if is_unique_violation(&e) => Err(AuctionError::UsernameTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AuctionError> {
        Ok(sqlx::query_as::<_, User>(queries::GET_USER_BY_USERNAME)
            .bind(username)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn create_session(&self, user_id: i64, token: &str) -> Result<(), AuctionError> {
        sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
            .bind(token)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn get_session_user(
        &self,
        token: &str,
        issued_after: DateTime<Utc>,
    ) -> Result<Option<User>, AuctionError> {
        Ok(sqlx::query_as::<_, User>(queries::GET_SESSION_USER)
            .bind(token)
            .bind(issued_after)
            .fetch_optional(self.db.pool())
            .await?)
    }

    async fn delete_session(&self, token: &str) -> Result<(), AuctionError> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn delete_expired_sessions(
        &self,
        issued_before: DateTime<Utc>,
    ) -> Result<u64, AuctionError> {
        let result = sqlx::query("DELETE FROM sessions WHERE created_at <= $1")
            .bind(issued_before)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected())
    }

    async fn create_category(&self, name: &str) -> Result<Category, AuctionError> {
        let result = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(self.db.pool())
        .await;

        match result {
            Ok(category) => Ok(category),
            Err(e) if is_unique_violation(&e) => {
                Err(AuctionError::CategoryExists(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_all_categories(&self) -> Result<Vec<Category>, AuctionError> {
        Ok(sqlx::query_as::<_, Category>(queries::GET_ALL_CATEGORIES)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn get_category_by_name(&self, name: &str) -> Result<Category, AuctionError> {
        sqlx::query_as::<_, Category>(queries::GET_CATEGORY_BY_NAME)
            .bind(name)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AuctionError::CategoryNotFound(name.to_string()))
    }

    async fn create_listing(&self, listing: NewListing) -> Result<Listing, AuctionError> {
        let NewListing {
            title,
            description,
            image_url,
            starting_price,
            category,
            owner_id,
        } = listing;

        // 상품과 시작 가격 입찰을 하나의 트랜잭션으로 기록
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let category_id = sqlx::query_as::<_, Category>(queries::GET_CATEGORY_BY_NAME)
                        .bind(&category)
                        .fetch_optional(&mut **tx)
                        .await?
                        .map(|c| c.id)
                        .ok_or_else(|| AuctionError::CategoryNotFound(category.clone()))?;

                    let listing_id = sqlx::query_scalar::<_, i64>(
                        "INSERT INTO listings (title, description, image_url, owner_id, category_id)
                         VALUES ($1, $2, $3, $4, $5)
                         RETURNING id",
                    )
                    .bind(title)
                    .bind(description)
                    .bind(image_url)
                    .bind(owner_id)
                    .bind(category_id)
                    .fetch_one(&mut **tx)
                    .await?;

                    sqlx::query(
                        "INSERT INTO bids (listing_id, bidder_id, amount) VALUES ($1, $2, $3)",
                    )
                    .bind(listing_id)
                    .bind(owner_id)
                    .bind(starting_price)
                    .execute(&mut **tx)
                    .await?;

                    let listing = sqlx::query_as::<_, Listing>(queries::GET_LISTING)
                        .bind(listing_id)
                        .fetch_one(&mut **tx)
                        .await?;

                    Ok::<_, AuctionError>(listing)
                })
            })
            .await
    }

    async fn get_listing(&self, listing_id: i64) -> Result<Listing, AuctionError> {
        sqlx::query_as::<_, Listing>(queries::GET_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or(AuctionError::ListingNotFound(listing_id))
    }

    async fn get_active_listings(
        &self,
        category_id: Option<i64>,
    ) -> Result<Vec<Listing>, AuctionError> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_ACTIVE_LISTINGS)
            .bind(category_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn close_listing(&self, listing_id: i64) -> Result<Listing, AuctionError> {
        let result = sqlx::query("UPDATE listings SET is_active = FALSE WHERE id = $1")
            .bind(listing_id)
            .execute(self.db.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(AuctionError::ListingNotFound(listing_id));
        }
        self.get_listing(listing_id).await
    }

    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: f64,
    ) -> Result<Bid, AuctionError> {
        // 상품 행을 잠근 뒤 현재 가격 확인 및 입찰 기록 추가
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let is_active = sqlx::query_scalar::<_, bool>(queries::LOCK_LISTING)
                        .bind(listing_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or(AuctionError::ListingNotFound(listing_id))?;

                    let current_price =
                        sqlx::query_scalar::<_, f64>(queries::GET_LISTING_CURRENT_PRICE)
                            .bind(listing_id)
                            .fetch_one(&mut **tx)
                            .await?;

                    evaluate_bid(listing_id, is_active, current_price, amount)?;

                    let bid_id = sqlx::query_scalar::<_, i64>(
                        "INSERT INTO bids (listing_id, bidder_id, amount)
                         VALUES ($1, $2, $3)
                         RETURNING id",
                    )
                    .bind(listing_id)
                    .bind(bidder_id)
                    .bind(amount)
                    .fetch_one(&mut **tx)
                    .await?;

                    let bid = sqlx::query_as::<_, Bid>(queries::GET_BID)
                        .bind(bid_id)
                        .fetch_one(&mut **tx)
                        .await?;

                    Ok::<_, AuctionError>(bid)
                })
            })
            .await
    }

    async fn get_bid_history(&self, listing_id: i64) -> Result<Vec<Bid>, AuctionError> {
        self.ensure_listing(listing_id).await?;
        Ok(sqlx::query_as::<_, Bid>(queries::GET_BID_HISTORY)
            .bind(listing_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn add_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), AuctionError> {
        self.ensure_listing(listing_id).await?;
        sqlx::query(
            "INSERT INTO watchlist (listing_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(listing_id)
        .bind(user_id)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn remove_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), AuctionError> {
        self.ensure_listing(listing_id).await?;
        sqlx::query("DELETE FROM watchlist WHERE listing_id = $1 AND user_id = $2")
            .bind(listing_id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    async fn is_watching(&self, listing_id: i64, user_id: i64) -> Result<bool, AuctionError> {
        Ok(sqlx::query_scalar::<_, bool>(queries::IS_WATCHING)
            .bind(listing_id)
            .bind(user_id)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn get_watchlist(&self, user_id: i64) -> Result<Vec<Listing>, AuctionError> {
        Ok(sqlx::query_as::<_, Listing>(queries::GET_WATCHLIST)
            .bind(user_id)
            .fetch_all(self.db.pool())
            .await?)
    }

    async fn add_comment(&self, comment: NewComment) -> Result<Comment, AuctionError> {
        self.ensure_listing(comment.listing_id).await?;
        let comment_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO comments (listing_id, author_id, message)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(comment.listing_id)
        .bind(comment.author_id)
        .bind(&comment.message)
        .fetch_one(self.db.pool())
        .await?;

        Ok(sqlx::query_as::<_, Comment>(queries::GET_COMMENT)
            .bind(comment_id)
            .fetch_one(self.db.pool())
            .await?)
    }

    async fn get_comments(&self, listing_id: i64) -> Result<Vec<Comment>, AuctionError> {
        Ok(sqlx::query_as::<_, Comment>(queries::GET_COMMENTS)
            .bind(listing_id)
            .fetch_all(self.db.pool())
            .await?)
    }
}
// endregion: --- Postgres Store
