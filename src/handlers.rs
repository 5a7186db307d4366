// region:    --- Imports
use crate::auction::model::{Bid, Category, Comment, Listing};
use crate::auth::commands::{
    handle_login as command_handle_login, handle_logout as command_handle_logout,
    handle_register as command_handle_register, LoginCommand, RegisterCommand, SessionResponse,
};
use crate::auth::extract::{AuthUser, BearerToken, MaybeUser};
use crate::bidding::commands::handle_place_bid;
use crate::bidding::model::PlaceBidCommand;
use crate::comment::commands::{handle_add_comment, AddCommentCommand};
use crate::error::AuctionError;
use crate::listing::commands::{
    handle_close_listing, handle_create_category, handle_create_listing, CategoryCommand,
    CreateListingCommand,
};
use crate::query;
use crate::query::handlers::{IndexPage, ListingPage};
use crate::store::SharedStore;
use crate::watchlist::commands::{handle_add_watchlist, handle_remove_watchlist, WatchlistStatus};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

// endregion: --- Imports

// region:    --- Forms
/// 입찰 폼
#[derive(Debug, Deserialize)]
pub struct BidForm {
    pub new_bid: f64,
}
// endregion: --- Forms

// region:    --- Routes
/// 라우터 설정
pub fn routes(store: SharedStore) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/live", get(handle_live))
        .route(
            "/categories",
            get(handle_get_categories).post(handle_post_category),
        )
        .route("/category", post(handle_display_category))
        .route("/create", get(handle_create_form).post(handle_create))
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route("/register", post(handle_register))
        .route("/listing/:id", get(handle_get_listing))
        .route("/listing/:id/bids", get(handle_get_bid_history))
        .route("/listing/:id/close", post(handle_close_auction))
        .route(
            "/listing/:id/watchlist",
            post(handle_add_to_watchlist).delete(handle_remove_from_watchlist),
        )
        .route("/watchlist", get(handle_display_watchlist))
        .route("/listing/:id/comment", post(handle_comment))
        .route("/listing/:id/bid", post(handle_bid))
        .with_state(store)
}
// endregion: --- Routes

// region:    --- Command Handlers

/// 상품 등록
pub async fn handle_create(
    State(store): State<SharedStore>,
    AuthUser(user): AuthUser,
    Form(cmd): Form<CreateListingCommand>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 상품 등록 요청: {}", "Handler", user.username);
    let listing = handle_create_listing(cmd, &user, store.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// 카테고리 등록
pub async fn handle_post_category(
    State(store): State<SharedStore>,
    AuthUser(user): AuthUser,
    Form(cmd): Form<CategoryCommand>,
) -> Result<impl IntoResponse, AuctionError> {
    info!("{:<12} --> 카테고리 등록 요청: {}", "Handler", user.username);
    let category = handle_create_category(cmd, store.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// 경매 종료
pub async fn handle_close_auction(
    State(store): State<SharedStore>,
    MaybeUser(viewer): MaybeUser,
    Path(listing_id): Path<i64>,
) -> Result<Json<ListingPage>, AuctionError> {
    info!("{:<12} --> 경매 종료 요청 id: {}", "Handler", listing_id);
    let page = handle_close_listing(listing_id, viewer.as_ref(), store.as_ref()).await?;
    Ok(Json(page))
}

/// 입찰
pub async fn handle_bid(
    State(store): State<SharedStore>,
    AuthUser(user): AuthUser,
    Path(listing_id): Path<i64>,
    Form(form): Form<BidForm>,
) -> Result<Json<ListingPage>, AuctionError> {
    info!("{:<12} --> 입찰 요청 id: {}", "Handler", listing_id);
    let cmd = PlaceBidCommand {
        listing_id,
        bid_amount: form.new_bid,
    };
    let page = handle_place_bid(cmd, &user, store.as_ref()).await?;
    Ok(Json(page))
}

/// 관심 목록 추가
pub async fn handle_add_to_watchlist(
    State(store): State<SharedStore>,
    AuthUser(user): AuthUser,
    Path(listing_id): Path<i64>,
) -> Result<Json<WatchlistStatus>, AuctionError> {
    Ok(Json(
        handle_add_watchlist(listing_id, &user, store.as_ref()).await?,
    ))
}

/// 관심 목록 삭제
pub async fn handle_remove_from_watchlist(
    State(store): State<SharedStore>,
    AuthUser(user): AuthUser,
    Path(listing_id): Path<i64>,
) -> Result<Json<WatchlistStatus>, AuctionError> {
    Ok(Json(
        handle_remove_watchlist(listing_id, &user, store.as_ref()).await?,
    ))
}

/// 댓글 작성
pub async fn handle_comment(
    State(store): State<SharedStore>,
    AuthUser(user): AuthUser,
    Path(listing_id): Path<i64>,
    Form(cmd): Form<AddCommentCommand>,
) -> Result<impl IntoResponse, AuctionError> {
    let comment: Comment = handle_add_comment(listing_id, cmd, &user, store.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// 회원 가입
pub async fn handle_register(
    State(store): State<SharedStore>,
    Form(cmd): Form<RegisterCommand>,
) -> Result<impl IntoResponse, AuctionError> {
    let session = command_handle_register(cmd, store.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// 로그인
pub async fn handle_login(
    State(store): State<SharedStore>,
    Form(cmd): Form<LoginCommand>,
) -> Result<Json<SessionResponse>, AuctionError> {
    Ok(Json(command_handle_login(cmd, store.as_ref()).await?))
}

/// 로그아웃
pub async fn handle_logout(
    State(store): State<SharedStore>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, AuctionError> {
    command_handle_logout(token.as_deref(), store.as_ref()).await?;
    Ok(Json(json!({ "message": "Logged out" })))
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 헬스 체크
pub async fn handle_live() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// 진행 중인 상품 목록
pub async fn handle_index(
    State(store): State<SharedStore>,
) -> Result<Json<IndexPage>, AuctionError> {
    info!("{:<12} --> 상품 목록 조회", "HandlerQuery");
    Ok(Json(query::handlers::get_index(store.as_ref()).await?))
}

/// 카테고리별 상품 목록
pub async fn handle_display_category(
    State(store): State<SharedStore>,
    Form(cmd): Form<CategoryCommand>,
) -> Result<Json<IndexPage>, AuctionError> {
    info!(
        "{:<12} --> 카테고리별 상품 조회: {}",
        "HandlerQuery", cmd.category
    );
    Ok(Json(
        query::handlers::get_listings_by_category(store.as_ref(), &cmd.category).await?,
    ))
}

/// 전체 카테고리
pub async fn handle_get_categories(
    State(store): State<SharedStore>,
) -> Result<Json<Vec<Category>>, AuctionError> {
    Ok(Json(query::handlers::get_categories(store.as_ref()).await?))
}

/// 상품 등록 폼에 필요한 카테고리 목록
pub async fn handle_create_form(
    State(store): State<SharedStore>,
) -> Result<impl IntoResponse, AuctionError> {
    let categories = query::handlers::get_categories(store.as_ref()).await?;
    Ok(Json(json!({ "categories": categories })))
}

/// 상품 상세
pub async fn handle_get_listing(
    State(store): State<SharedStore>,
    MaybeUser(viewer): MaybeUser,
    Path(listing_id): Path<i64>,
) -> Result<Json<ListingPage>, AuctionError> {
    info!("{:<12} --> 상품 조회 id: {}", "HandlerQuery", listing_id);
    Ok(Json(
        query::handlers::get_listing_page(store.as_ref(), listing_id, viewer.as_ref()).await?,
    ))
}

/// 입찰 이력
pub async fn handle_get_bid_history(
    State(store): State<SharedStore>,
    Path(listing_id): Path<i64>,
) -> Result<Json<Vec<Bid>>, AuctionError> {
    info!("{:<12} --> 입찰 이력 조회 id: {}", "HandlerQuery", listing_id);
    Ok(Json(
        query::handlers::get_bid_history(store.as_ref(), listing_id).await?,
    ))
}

/// 관심 목록
pub async fn handle_display_watchlist(
    State(store): State<SharedStore>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Listing>>, AuctionError> {
    Ok(Json(
        query::handlers::get_watchlist(store.as_ref(), &user).await?,
    ))
}

// endregion: --- Query Handlers
