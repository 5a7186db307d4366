// region:    --- Imports
use crate::auction::model::{
    Bid, Category, Comment, Listing, NewComment, NewListing, NewUser, User,
};
use crate::error::AuctionError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

// endregion: --- Imports

// region:    --- Modules
pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
// endregion: --- Modules

/// 핸들러 간에 공유되는 저장소
pub type SharedStore = Arc<dyn AuctionStore>;

// region:    --- Auction Store Trait
/// 경매 저장소 트레이트
#[async_trait]
pub trait AuctionStore: Send + Sync {
    // -- 사용자 / 세션
    async fn create_user(&self, user: NewUser) -> Result<User, AuctionError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AuctionError>;
    async fn create_session(&self, user_id: i64, token: &str) -> Result<(), AuctionError>;
    /// `issued_after` 이전에 발급된 세션은 무시한다
    async fn get_session_user(
        &self,
        token: &str,
        issued_after: DateTime<Utc>,
    ) -> Result<Option<User>, AuctionError>;
    async fn delete_session(&self, token: &str) -> Result<(), AuctionError>;
    /// 만료된 세션 삭제, 삭제된 개수 반환
    async fn delete_expired_sessions(&self, issued_before: DateTime<Utc>)
        -> Result<u64, AuctionError>;

    // -- 카테고리
    async fn create_category(&self, name: &str) -> Result<Category, AuctionError>;
    async fn get_all_categories(&self) -> Result<Vec<Category>, AuctionError>;
    async fn get_category_by_name(&self, name: &str) -> Result<Category, AuctionError>;

    // -- 상품
    /// 상품과 시작 가격 입찰을 함께 생성한다
    async fn create_listing(&self, listing: NewListing) -> Result<Listing, AuctionError>;
    async fn get_listing(&self, listing_id: i64) -> Result<Listing, AuctionError>;
    /// 진행 중인 상품 조회 (카테고리 지정 시 해당 카테고리만)
    async fn get_active_listings(
        &self,
        category_id: Option<i64>,
    ) -> Result<Vec<Listing>, AuctionError>;
    async fn close_listing(&self, listing_id: i64) -> Result<Listing, AuctionError>;

    // -- 입찰
    /// 현재 가격 확인과 입찰 기록 추가를 원자적으로 수행한다
    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: f64,
    ) -> Result<Bid, AuctionError>;
    async fn get_bid_history(&self, listing_id: i64) -> Result<Vec<Bid>, AuctionError>;

    // -- 관심 목록
    async fn add_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), AuctionError>;
    async fn remove_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), AuctionError>;
    async fn is_watching(&self, listing_id: i64, user_id: i64) -> Result<bool, AuctionError>;
    async fn get_watchlist(&self, user_id: i64) -> Result<Vec<Listing>, AuctionError>;

    // -- 댓글
    async fn add_comment(&self, comment: NewComment) -> Result<Comment, AuctionError>;
    async fn get_comments(&self, listing_id: i64) -> Result<Vec<Comment>, AuctionError>;
}
// endregion: --- Auction Store Trait
