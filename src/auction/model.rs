use crate::error::AuctionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// 저장소 필드 길이 제한
pub const MAX_TITLE_LEN: usize = 64;
pub const MAX_CATEGORY_LEN: usize = 64;
pub const MAX_TEXT_LEN: usize = 1000;
pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_EMAIL_LEN: usize = 254;

// 사용자 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.username)
    }
}

// 카테고리 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// 상품(경매) 모델
// current_price 는 입찰 이력의 최댓값으로 계산된다
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub current_price: f64,
    pub is_active: bool,
    pub owner_id: i64,
    pub owner_username: String,
    pub category_id: i64,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

// 입찰 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub bidder_id: i64,
    pub bidder_username: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Bid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.amount)
    }
}

// 댓글 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub listing_id: i64,
    pub listing_title: String,
    pub author_id: i64,
    pub author_username: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} commented on {}",
            self.author_username, self.listing_title
        )
    }
}

/// 신규 사용자 (비밀번호는 이미 해시된 상태)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// 신규 상품. 시작 가격은 소유자의 첫 입찰로 기록된다.
#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub starting_price: f64,
    pub category: String,
    pub owner_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub listing_id: i64,
    pub author_id: i64,
    pub message: String,
}

/// 필드 길이 검증 (문자 수 기준)
pub fn check_length(field: &str, value: &str, max: usize) -> Result<(), AuctionError> {
    if value.chars().count() > max {
        return Err(AuctionError::BadParameters(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}
