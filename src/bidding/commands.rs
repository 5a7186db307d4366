/// 입찰 커맨드 처리
// region:    --- Imports
use super::model::{validate_amount, PlaceBidCommand};
use crate::auction::model::User;
use crate::error::AuctionError;
use crate::query::handlers::{get_listing_page, ListingPage};
use crate::store::AuctionStore;
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 입찰
/// 현재 가격(최고 입찰가)보다 엄격하게 높은 금액만 받아들인다.
/// 거절된 경우 상태는 바뀌지 않는다.
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    bidder: &User,
    store: &dyn AuctionStore,
) -> Result<ListingPage, AuctionError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);
    let bid_amount = validate_amount(cmd.bid_amount)?;

    match store
        .place_bid(cmd.listing_id, bidder.id, bid_amount)
        .await
    {
        Ok(bid) => {
            info!(
                "{:<12} --> 입찰 성공: listing={}, 현재 가격 {}",
                "Command", bid.listing_id, bid.amount
            );
        }
        Err(e @ AuctionError::BidTooLow { .. }) | Err(e @ AuctionError::ListingClosed(_)) => {
            warn!("{:<12} --> 입찰 거절: {}", "Command", e);
            return Err(e);
        }
        Err(e) => return Err(e),
    }

    Ok(get_listing_page(store, cmd.listing_id, Some(bidder))
        .await?
        .with_message("Bid successfully added", true))
}
// endregion: --- Commands
