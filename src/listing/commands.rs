/// 상품 관련 커맨드 처리
/// 1. 상품 등록
/// 2. 경매 종료
/// 3. 카테고리 등록
// region:    --- Imports
use crate::auction::model::{
    check_length, Category, Listing, NewListing, User, MAX_CATEGORY_LEN, MAX_TEXT_LEN,
    MAX_TITLE_LEN,
};
use crate::bidding::model::validate_amount;
use crate::error::AuctionError;
use crate::query::handlers::{get_listing_page, ListingPage};
use crate::store::AuctionStore;
use serde::{Deserialize, Serialize};
use tracing::info;
// endregion: --- Imports

// region:    --- Commands
/// 상품 등록 명령 (폼 필드명 그대로)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateListingCommand {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub imageurl: String,
    pub category: String,
}

/// 카테고리 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CategoryCommand {
    pub category: String,
}

/// 1. 상품 등록
/// 시작 가격은 소유자의 첫 입찰로 저장된다.
pub async fn handle_create_listing(
    cmd: CreateListingCommand,
    owner: &User,
    store: &dyn AuctionStore,
) -> Result<Listing, AuctionError> {
    info!("{:<12} --> 상품 등록 요청 처리 시작: {:?}", "Command", cmd);

    check_length("title", &cmd.title, MAX_TITLE_LEN)?;
    check_length("description", &cmd.description, MAX_TEXT_LEN)?;
    check_length("imageurl", &cmd.imageurl, MAX_TEXT_LEN)?;
    let starting_price = validate_amount(cmd.price)?;

    let listing = store
        .create_listing(NewListing {
            title: cmd.title,
            description: cmd.description,
            image_url: cmd.imageurl,
            starting_price,
            category: cmd.category.trim().to_string(),
            owner_id: owner.id,
        })
        .await?;

    info!(
        "{:<12} --> 상품 등록 성공 id: {}, 시작 가격: {}",
        "Command", listing.id, listing.current_price
    );
    Ok(listing)
}

/// 2. 경매 종료
/// 소유자 확인 없이 누구나 종료할 수 있으며, 종료된 상품은 다시 열리지 않는다.
pub async fn handle_close_listing(
    listing_id: i64,
    viewer: Option<&User>,
    store: &dyn AuctionStore,
) -> Result<ListingPage, AuctionError> {
    info!("{:<12} --> 경매 종료 요청 id: {}", "Command", listing_id);
    store.close_listing(listing_id).await?;

    Ok(get_listing_page(store, listing_id, viewer)
        .await?
        .with_message("Auction closed", true))
}

/// 3. 카테고리 등록
pub async fn handle_create_category(
    cmd: CategoryCommand,
    store: &dyn AuctionStore,
) -> Result<Category, AuctionError> {
    info!("{:<12} --> 카테고리 등록 요청: {}", "Command", cmd.category);

    let name = cmd.category.trim();
    if name.is_empty() {
        return Err(AuctionError::BadParameters(
            "category must not be empty".to_string(),
        ));
    }
    check_length("category", name, MAX_CATEGORY_LEN)?;

    store.create_category(name).await
}
// endregion: --- Commands
