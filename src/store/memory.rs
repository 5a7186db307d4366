/// 메모리 저장소
/// DATABASE_URL 이 없는 개발 환경과 테스트에서 사용한다.
/// 모든 상태는 하나의 RwLock 으로 보호되므로 입찰 검증과 기록이 직렬화된다.
// region:    --- Imports
use super::AuctionStore;
use crate::auction::model::{
    Bid, Category, Comment, Listing, NewComment, NewListing, NewUser, User,
};
use crate::bidding::model::evaluate_bid;
use crate::error::AuctionError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

// endregion: --- Imports

// region:    --- Rows
struct ListingRow {
    id: i64,
    title: String,
    description: String,
    image_url: String,
    is_active: bool,
    owner_id: i64,
    category_id: i64,
    created_at: DateTime<Utc>,
}

struct BidRow {
    id: i64,
    listing_id: i64,
    bidder_id: i64,
    amount: f64,
    created_at: DateTime<Utc>,
}

struct SessionRow {
    user_id: i64,
    created_at: DateTime<Utc>,
}

struct CommentRow {
    id: i64,
    listing_id: i64,
    author_id: i64,
    message: String,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Sequences {
    user: i64,
    category: i64,
    listing: i64,
    bid: i64,
    comment: i64,
}

fn next_id(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}
// endregion: --- Rows

// region:    --- Memory State
#[derive(Default)]
struct MemoryState {
    seq: Sequences,
    users: BTreeMap<i64, User>,
    sessions: HashMap<String, SessionRow>,
    categories: BTreeMap<i64, Category>,
    listings: BTreeMap<i64, ListingRow>,
    bids: Vec<BidRow>,
    // (listing_id, user_id)
    watchers: BTreeSet<(i64, i64)>,
    comments: Vec<CommentRow>,
}

impl MemoryState {
    fn username(&self, user_id: i64) -> String {
        self.users
            .get(&user_id)
            .map(|u| u.username.clone())
            .unwrap_or_default()
    }

    fn current_price(&self, listing_id: i64) -> f64 {
        self.bids
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .map(|b| b.amount)
            .fold(0.0, f64::max)
    }

    fn listing_row(&self, listing_id: i64) -> Result<&ListingRow, AuctionError> {
        self.listings
            .get(&listing_id)
            .ok_or(AuctionError::ListingNotFound(listing_id))
    }

    fn to_listing(&self, row: &ListingRow) -> Listing {
        Listing {
            id: row.id,
            title: row.title.clone(),
            description: row.description.clone(),
            image_url: row.image_url.clone(),
            current_price: self.current_price(row.id),
            is_active: row.is_active,
            owner_id: row.owner_id,
            owner_username: self.username(row.owner_id),
            category_id: row.category_id,
            category_name: self
                .categories
                .get(&row.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            created_at: row.created_at,
        }
    }

    fn to_bid(&self, row: &BidRow) -> Bid {
        Bid {
            id: row.id,
            listing_id: row.listing_id,
            bidder_id: row.bidder_id,
            bidder_username: self.username(row.bidder_id),
            amount: row.amount,
            created_at: row.created_at,
        }
    }

    fn to_comment(&self, row: &CommentRow) -> Comment {
        Comment {
            id: row.id,
            listing_id: row.listing_id,
            listing_title: self
                .listings
                .get(&row.listing_id)
                .map(|l| l.title.clone())
                .unwrap_or_default(),
            author_id: row.author_id,
            author_username: self.username(row.author_id),
            message: row.message.clone(),
            created_at: row.created_at,
        }
    }

    fn append_bid(&mut self, listing_id: i64, bidder_id: i64, amount: f64) -> Bid {
        let row = BidRow {
            id: next_id(&mut self.seq.bid),
            listing_id,
            bidder_id,
            amount,
            created_at: Utc::now(),
        };
        let bid = self.to_bid(&row);
        self.bids.push(row);
        bid
    }
}
// endregion: --- Memory State

// region:    --- Memory Store
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuctionStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AuctionError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(AuctionError::UsernameTaken);
        }
        let user = User {
            id: next_id(&mut state.seq.user),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        debug!("{:<12} --> 사용자 생성: {}", "Store", user.username);
        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AuctionError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_session(&self, user_id: i64, token: &str) -> Result<(), AuctionError> {
        let mut state = self.state.write().await;
        state.sessions.insert(
            token.to_string(),
            SessionRow {
                user_id,
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn get_session_user(
        &self,
        token: &str,
        issued_after: DateTime<Utc>,
    ) -> Result<Option<User>, AuctionError> {
        let state = self.state.read().await;
        Ok(state
            .sessions
            .get(token)
            .filter(|session| session.created_at > issued_after)
            .and_then(|session| state.users.get(&session.user_id))
            .cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<(), AuctionError> {
        let mut state = self.state.write().await;
        state.sessions.remove(token);
        Ok(())
    }

    async fn delete_expired_sessions(
        &self,
        issued_before: DateTime<Utc>,
    ) -> Result<u64, AuctionError> {
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state
            .sessions
            .retain(|_, session| session.created_at > issued_before);
        Ok((before - state.sessions.len()) as u64)
    }

    async fn create_category(&self, name: &str) -> Result<Category, AuctionError> {
        let mut state = self.state.write().await;
        if state.categories.values().any(|c| c.name == name) {
            return Err(AuctionError::CategoryExists(name.to_string()));
        }
        let category = Category {
            id: next_id(&mut state.seq.category),
            name: name.to_string(),
        };
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn get_all_categories(&self) -> Result<Vec<Category>, AuctionError> {
        let state = self.state.read().await;
        let mut categories: Vec<Category> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category_by_name(&self, name: &str) -> Result<Category, AuctionError> {
        let state = self.state.read().await;
        state
            .categories
            .values()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| AuctionError::CategoryNotFound(name.to_string()))
    }

    async fn create_listing(&self, listing: NewListing) -> Result<Listing, AuctionError> {
        let mut state = self.state.write().await;
        let category_id = state
            .categories
            .values()
            .find(|c| c.name == listing.category)
            .map(|c| c.id)
            .ok_or_else(|| AuctionError::CategoryNotFound(listing.category.clone()))?;

        let row = ListingRow {
            id: next_id(&mut state.seq.listing),
            title: listing.title,
            description: listing.description,
            image_url: listing.image_url,
            is_active: true,
            owner_id: listing.owner_id,
            category_id,
            created_at: Utc::now(),
        };
        let listing_id = row.id;
        state.listings.insert(listing_id, row);

        // 시작 가격은 소유자의 첫 입찰로 기록
        state.append_bid(listing_id, listing.owner_id, listing.starting_price);

        let row = state.listing_row(listing_id)?;
        Ok(state.to_listing(row))
    }

    async fn get_listing(&self, listing_id: i64) -> Result<Listing, AuctionError> {
        let state = self.state.read().await;
        let row = state.listing_row(listing_id)?;
        Ok(state.to_listing(row))
    }

    async fn get_active_listings(
        &self,
        category_id: Option<i64>,
    ) -> Result<Vec<Listing>, AuctionError> {
        let state = self.state.read().await;
        Ok(state
            .listings
            .values()
            .rev()
            .filter(|row| row.is_active)
            .filter(|row| category_id.map_or(true, |id| row.category_id == id))
            .map(|row| state.to_listing(row))
            .collect())
    }

    async fn close_listing(&self, listing_id: i64) -> Result<Listing, AuctionError> {
        let mut state = self.state.write().await;
        let row = state
            .listings
            .get_mut(&listing_id)
            .ok_or(AuctionError::ListingNotFound(listing_id))?;
        row.is_active = false;

        let row = state.listing_row(listing_id)?;
        Ok(state.to_listing(row))
    }

    async fn place_bid(
        &self,
        listing_id: i64,
        bidder_id: i64,
        amount: f64,
    ) -> Result<Bid, AuctionError> {
        let mut state = self.state.write().await;
        let is_active = state.listing_row(listing_id)?.is_active;
        let current_price = state.current_price(listing_id);

        evaluate_bid(listing_id, is_active, current_price, amount)?;

        Ok(state.append_bid(listing_id, bidder_id, amount))
    }

    async fn get_bid_history(&self, listing_id: i64) -> Result<Vec<Bid>, AuctionError> {
        let state = self.state.read().await;
        state.listing_row(listing_id)?;
        let mut bids: Vec<Bid> = state
            .bids
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .map(|b| state.to_bid(b))
            .collect();
        bids.sort_by(|a, b| b.amount.total_cmp(&a.amount).then(b.id.cmp(&a.id)));
        Ok(bids)
    }

    async fn add_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), AuctionError> {
        let mut state = self.state.write().await;
        state.listing_row(listing_id)?;
        state.watchers.insert((listing_id, user_id));
        Ok(())
    }

    async fn remove_watcher(&self, listing_id: i64, user_id: i64) -> Result<(), AuctionError> {
        let mut state = self.state.write().await;
        state.listing_row(listing_id)?;
        state.watchers.remove(&(listing_id, user_id));
        Ok(())
    }

    async fn is_watching(&self, listing_id: i64, user_id: i64) -> Result<bool, AuctionError> {
        let state = self.state.read().await;
        Ok(state.watchers.contains(&(listing_id, user_id)))
    }

    async fn get_watchlist(&self, user_id: i64) -> Result<Vec<Listing>, AuctionError> {
        let state = self.state.read().await;
        Ok(state
            .listings
            .values()
            .rev()
            .filter(|row| state.watchers.contains(&(row.id, user_id)))
            .map(|row| state.to_listing(row))
            .collect())
    }

    async fn add_comment(&self, comment: NewComment) -> Result<Comment, AuctionError> {
        let mut state = self.state.write().await;
        state.listing_row(comment.listing_id)?;
        let row = CommentRow {
            id: next_id(&mut state.seq.comment),
            listing_id: comment.listing_id,
            author_id: comment.author_id,
            message: comment.message,
            created_at: Utc::now(),
        };
        let comment = state.to_comment(&row);
        state.comments.push(row);
        Ok(comment)
    }

    async fn get_comments(&self, listing_id: i64) -> Result<Vec<Comment>, AuctionError> {
        let state = self.state.read().await;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.listing_id == listing_id)
            .map(|c| state.to_comment(c))
            .collect())
    }
}
// endregion: --- Memory Store
