/// 관심 목록 커맨드 처리
/// 추가/삭제 모두 멱등이다.
// region:    --- Imports
use crate::auction::model::User;
use crate::error::AuctionError;
use crate::store::AuctionStore;
use serde::Serialize;
use tracing::info;
// endregion: --- Imports

/// 관심 목록 변경 결과
#[derive(Debug, Serialize)]
pub struct WatchlistStatus {
    pub listing_id: i64,
    pub is_listing_in_watchlist: bool,
}

// region:    --- Commands
/// 관심 목록에 추가
pub async fn handle_add_watchlist(
    listing_id: i64,
    user: &User,
    store: &dyn AuctionStore,
) -> Result<WatchlistStatus, AuctionError> {
    info!(
        "{:<12} --> 관심 목록 추가 id: {}, user: {}",
        "Command", listing_id, user.username
    );
    store.add_watcher(listing_id, user.id).await?;
    Ok(WatchlistStatus {
        listing_id,
        is_listing_in_watchlist: true,
    })
}

/// 관심 목록에서 삭제
pub async fn handle_remove_watchlist(
    listing_id: i64,
    user: &User,
    store: &dyn AuctionStore,
) -> Result<WatchlistStatus, AuctionError> {
    info!(
        "{:<12} --> 관심 목록 삭제 id: {}, user: {}",
        "Command", listing_id, user.username
    );
    store.remove_watcher(listing_id, user.id).await?;
    Ok(WatchlistStatus {
        listing_id,
        is_listing_in_watchlist: false,
    })
}
// endregion: --- Commands
