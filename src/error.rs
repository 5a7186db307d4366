// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

// endregion: --- Imports

// region:    --- Auction Error
/// 서비스 전역 에러
#[derive(Debug, Error)]
pub enum AuctionError {
    #[error("Listing {0} not found")]
    ListingNotFound(i64),

    #[error("Category '{0}' not found")]
    CategoryNotFound(String),

    #[error("Category '{0}' already exists")]
    CategoryExists(String),

    #[error("Bid must be greater than the current bid")]
    BidTooLow { current_price: f64 },

    #[error("Auction {0} is closed")]
    ListingClosed(i64),

    #[error("Passwords must match.")]
    PasswordMismatch,

    #[error("Username already taken.")]
    UsernameTaken,

    #[error("Invalid username and/or password.")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Bad parameters: {0}")]
    BadParameters(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl AuctionError {
    /// 응답 바디에 실리는 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            AuctionError::ListingNotFound(_) => "NOT_FOUND",
            AuctionError::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            AuctionError::CategoryExists(_) => "CATEGORY_EXISTS",
            AuctionError::BidTooLow { .. } => "LOW_BID",
            AuctionError::ListingClosed(_) => "ALREADY_ENDED",
            AuctionError::PasswordMismatch => "PASSWORD_MISMATCH",
            AuctionError::UsernameTaken => "USERNAME_TAKEN",
            AuctionError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuctionError::Unauthorized => "UNAUTHORIZED",
            AuctionError::BadParameters(_) => "BAD_PARAMETERS",
            AuctionError::Database(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuctionError::ListingNotFound(_) | AuctionError::CategoryNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AuctionError::CategoryExists(_) | AuctionError::UsernameTaken => StatusCode::CONFLICT,
            AuctionError::BidTooLow { .. }
            | AuctionError::ListingClosed(_)
            | AuctionError::PasswordMismatch
            | AuctionError::BadParameters(_) => StatusCode::BAD_REQUEST,
            AuctionError::InvalidCredentials | AuctionError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            AuctionError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuctionError {
    fn into_response(self) -> Response {
        let body = match &self {
            AuctionError::BidTooLow { current_price } => json!({
                "error": self.to_string(),
                "code": self.code(),
                "current_price": current_price,
            }),
            AuctionError::Database(e) => {
                // 내부 에러 내용은 로그에만 남긴다
                error!("{:<12} --> 데이터베이스 오류: {:?}", "Handler", e);
                json!({
                    "error": "Internal server error",
                    "code": self.code(),
                })
            }
            _ => json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };

        (self.status(), Json(body)).into_response()
    }
}
// endregion: --- Auction Error
