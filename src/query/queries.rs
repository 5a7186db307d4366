/// 사용자명으로 사용자 조회
pub const GET_USER_BY_USERNAME: &str =
    "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1";

/// 세션 토큰으로 사용자 조회
pub const GET_SESSION_USER: &str = r#"
    SELECT u.id, u.username, u.email, u.password_hash, u.created_at
    FROM sessions s
    JOIN users u ON u.id = s.user_id
    WHERE s.token = $1 AND s.created_at > $2
"#;

/// 모든 카테고리 조회
pub const GET_ALL_CATEGORIES: &str = "SELECT id, name FROM categories ORDER BY name";

/// 카테고리명으로 조회
pub const GET_CATEGORY_BY_NAME: &str = "SELECT id, name FROM categories WHERE name = $1";

/// 상품 조회 (현재 가격 = 최고 입찰가)
pub const GET_LISTING: &str = r#"
    SELECT l.id, l.title, l.description, l.image_url,
           COALESCE((SELECT MAX(b.amount) FROM bids b WHERE b.listing_id = l.id), 0) AS current_price,
           l.is_active, l.owner_id, u.username AS owner_username,
           l.category_id, c.name AS category_name, l.created_at
    FROM listings l
    JOIN users u ON u.id = l.owner_id
    JOIN categories c ON c.id = l.category_id
    WHERE l.id = $1
"#;

/// 진행 중인 상품 조회 ($1 이 NULL 이면 전체 카테고리)
pub const GET_ACTIVE_LISTINGS: &str = r#"
    SELECT l.id, l.title, l.description, l.image_url,
           COALESCE((SELECT MAX(b.amount) FROM bids b WHERE b.listing_id = l.id), 0) AS current_price,
           l.is_active, l.owner_id, u.username AS owner_username,
           l.category_id, c.name AS category_name, l.created_at
    FROM listings l
    JOIN users u ON u.id = l.owner_id
    JOIN categories c ON c.id = l.category_id
    WHERE l.is_active AND ($1::BIGINT IS NULL OR l.category_id = $1)
    ORDER BY l.created_at DESC, l.id DESC
"#;

/// 사용자의 관심 목록 조회
pub const GET_WATCHLIST: &str = r#"
    SELECT l.id, l.title, l.description, l.image_url,
           COALESCE((SELECT MAX(b.amount) FROM bids b WHERE b.listing_id = l.id), 0) AS current_price,
           l.is_active, l.owner_id, u.username AS owner_username,
           l.category_id, c.name AS category_name, l.created_at
    FROM watchlist w
    JOIN listings l ON l.id = w.listing_id
    JOIN users u ON u.id = l.owner_id
    JOIN categories c ON c.id = l.category_id
    WHERE w.user_id = $1
    ORDER BY l.created_at DESC, l.id DESC
"#;

/// 입찰 잠금용 상품 상태 조회
pub const LOCK_LISTING: &str = "SELECT is_active FROM listings WHERE id = $1 FOR UPDATE";

/// 상품 현재 가격 조회
pub const GET_LISTING_CURRENT_PRICE: &str =
    "SELECT COALESCE(MAX(amount), 0) AS current_price FROM bids WHERE listing_id = $1";

/// 단일 입찰 조회
pub const GET_BID: &str = r#"
    SELECT b.id, b.listing_id, b.bidder_id, u.username AS bidder_username, b.amount, b.created_at
    FROM bids b
    JOIN users u ON u.id = b.bidder_id
    WHERE b.id = $1
"#;

/// 입찰 이력 조회 (높은 금액 순)
pub const GET_BID_HISTORY: &str = r#"
    SELECT b.id, b.listing_id, b.bidder_id, u.username AS bidder_username, b.amount, b.created_at
    FROM bids b
    JOIN users u ON u.id = b.bidder_id
    WHERE b.listing_id = $1
    ORDER BY b.amount DESC, b.id DESC
"#;

/// 관심 목록 포함 여부
pub const IS_WATCHING: &str =
    "SELECT EXISTS (SELECT 1 FROM watchlist WHERE listing_id = $1 AND user_id = $2)";

/// 단일 댓글 조회
pub const GET_COMMENT: &str = r#"
    SELECT c.id, c.listing_id, l.title AS listing_title, c.author_id,
           u.username AS author_username, c.message, c.created_at
    FROM comments c
    JOIN listings l ON l.id = c.listing_id
    JOIN users u ON u.id = c.author_id
    WHERE c.id = $1
"#;

/// 상품 댓글 조회 (작성 순)
pub const GET_COMMENTS: &str = r#"
    SELECT c.id, c.listing_id, l.title AS listing_title, c.author_id,
           u.username AS author_username, c.message, c.created_at
    FROM comments c
    JOIN listings l ON l.id = c.listing_id
    JOIN users u ON u.id = c.author_id
    WHERE c.listing_id = $1
    ORDER BY c.id
"#;

/// 상품 존재 여부
pub const LISTING_EXISTS: &str = "SELECT EXISTS (SELECT 1 FROM listings WHERE id = $1)";
