use crate::error::AuctionError;
use serde::{Deserialize, Serialize};

// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: i64,
    pub bid_amount: f64,
}

/// 금액 검증: 유한한 값이며 0 이상이어야 한다
pub fn validate_amount(amount: f64) -> Result<f64, AuctionError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AuctionError::BadParameters(format!(
            "amount must be a non-negative number, got {}",
            amount
        )));
    }
    Ok(amount)
}

/// 입찰 가능 여부 판단
/// 진행 중인 경매이고 입찰 금액이 현재 가격보다 엄격하게 커야 한다.
pub fn evaluate_bid(
    listing_id: i64,
    is_active: bool,
    current_price: f64,
    bid_amount: f64,
) -> Result<(), AuctionError> {
    if !is_active {
        return Err(AuctionError::ListingClosed(listing_id));
    }
    if bid_amount > current_price {
        Ok(())
    } else {
        Err(AuctionError::BidTooLow { current_price })
    }
}
