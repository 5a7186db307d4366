// region:    --- Imports
use crate::auction::model::{Bid, Category, Comment, Listing, User};
use crate::error::AuctionError;
use crate::store::AuctionStore;
use serde::Serialize;
use tracing::info;

// endregion: --- Imports

// region:    --- Views
/// 목록 화면: 진행 중인 상품과 전체 카테고리
#[derive(Debug, Serialize)]
pub struct IndexPage {
    pub listings: Vec<Listing>,
    pub categories: Vec<Category>,
}

/// 상품 상세 화면
#[derive(Debug, Serialize)]
pub struct ListingPage {
    pub listing: Listing,
    pub is_listing_in_watchlist: bool,
    pub all_comments: Vec<Comment>,
    pub is_owner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<bool>,
}

impl ListingPage {
    /// 처리 결과 메시지 추가
    pub fn with_message(mut self, message: &str, update: bool) -> Self {
        self.message = Some(message.to_string());
        self.update = Some(update);
        self
    }
}
// endregion: --- Views

// region:    --- Query Handlers

/// 진행 중인 상품 목록 조회
pub async fn get_index(store: &dyn AuctionStore) -> Result<IndexPage, AuctionError> {
    info!("{:<12} --> 진행 중인 상품 목록 조회", "Query");
    Ok(IndexPage {
        listings: store.get_active_listings(None).await?,
        categories: store.get_all_categories().await?,
    })
}

/// 카테고리별 진행 중인 상품 조회
pub async fn get_listings_by_category(
    store: &dyn AuctionStore,
    category_name: &str,
) -> Result<IndexPage, AuctionError> {
    info!("{:<12} --> 카테고리별 상품 조회: {}", "Query", category_name);
    let category = store.get_category_by_name(category_name.trim()).await?;
    Ok(IndexPage {
        listings: store.get_active_listings(Some(category.id)).await?,
        categories: store.get_all_categories().await?,
    })
}

/// 전체 카테고리 조회
pub async fn get_categories(store: &dyn AuctionStore) -> Result<Vec<Category>, AuctionError> {
    info!("{:<12} --> 카테고리 조회", "Query");
    store.get_all_categories().await
}

/// 상품 상세 조회
/// 요청한 사용자의 관심 목록 포함 여부와 소유 여부를 함께 돌려준다.
pub async fn get_listing_page(
    store: &dyn AuctionStore,
    listing_id: i64,
    viewer: Option<&User>,
) -> Result<ListingPage, AuctionError> {
    info!("{:<12} --> 상품 상세 조회 id: {}", "Query", listing_id);
    let listing = store.get_listing(listing_id).await?;

    let is_listing_in_watchlist = match viewer {
        Some(user) => store.is_watching(listing_id, user.id).await?,
        None => false,
    };
    let is_owner = viewer.map_or(false, |user| user.id == listing.owner_id);
    let all_comments = store.get_comments(listing_id).await?;

    Ok(ListingPage {
        listing,
        is_listing_in_watchlist,
        all_comments,
        is_owner,
        message: None,
        update: None,
    })
}

/// 입찰 이력 조회
pub async fn get_bid_history(
    store: &dyn AuctionStore,
    listing_id: i64,
) -> Result<Vec<Bid>, AuctionError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "Query", listing_id);
    store.get_bid_history(listing_id).await
}

/// 관심 목록 조회
pub async fn get_watchlist(
    store: &dyn AuctionStore,
    user: &User,
) -> Result<Vec<Listing>, AuctionError> {
    info!("{:<12} --> 관심 목록 조회: {}", "Query", user.username);
    store.get_watchlist(user.id).await
}

// endregion: --- Query Handlers
