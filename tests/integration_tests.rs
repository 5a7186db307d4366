use commerce::handlers;
use commerce::store::{MemoryStore, SharedStore};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// 트레이싱 초기화
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// 메모리 저장소로 서버를 띄우고 주소를 돌려준다
async fn spawn_app() -> String {
    init_tracing();
    let store: SharedStore = Arc::new(MemoryStore::new());
    let app = handlers::routes(store);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    format!("http://{}", addr)
}

/// 회원 가입 후 세션 토큰 반환
async fn register(client: &Client, base: &str, username: &str) -> String {
    let response = client
        .post(format!("{}/register", base))
        .form(&[
            ("username", username),
            ("email", "user@example.com"),
            ("password", "pw"),
            ("confirmation", "pw"),
        ])
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

async fn create_category(client: &Client, base: &str, token: &str, name: &str) {
    let response = client
        .post(format!("{}/categories", base))
        .bearer_auth(token)
        .form(&[("category", name)])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// 테스트용 상품 생성 후 id 반환
async fn create_listing(
    client: &Client,
    base: &str,
    token: &str,
    title: &str,
    price: &str,
    category: &str,
) -> i64 {
    let response = client
        .post(format!("{}/create", base))
        .bearer_auth(token)
        .form(&[
            ("title", title),
            ("description", "테스트 상품입니다."),
            ("price", price),
            ("imageurl", "https://example.com/item.png"),
            ("category", category),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    body["id"].as_i64().unwrap()
}

async fn bid(
    client: &Client,
    base: &str,
    token: &str,
    listing_id: i64,
    amount: &str,
) -> reqwest::Response {
    client
        .post(format!("{}/listing/{}/bid", base, listing_id))
        .bearer_auth(token)
        .form(&[("new_bid", amount)])
        .send()
        .await
        .unwrap()
}

async fn get_listing(
    client: &Client,
    base: &str,
    token: Option<&str>,
    listing_id: i64,
) -> Value {
    let mut request = client.get(format!("{}/listing/{}", base, listing_id));
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    let response = request.send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response.json().await.unwrap()
}

/// 등록 - 입찰 - 종료 시나리오
#[tokio::test]
async fn test_auction_lifecycle() {
    let base = spawn_app().await;
    let client = Client::new();

    let seller = register(&client, &base, "seller").await;
    create_category(&client, &base, &seller, "Furniture").await;
    let listing_id = create_listing(&client, &base, &seller, "Chair", "10.0", "Furniture").await;

    // 등록 직후 상태
    let page = get_listing(&client, &base, Some(&seller), listing_id).await;
    assert_eq!(page["listing"]["current_price"], 10.0);
    assert_eq!(page["listing"]["is_active"], true);
    assert_eq!(page["listing"]["category_name"], "Furniture");
    assert_eq!(page["is_owner"], true);

    let bidder = register(&client, &base, "bidder").await;

    // 현재 가격보다 낮은 입찰은 거절
    let response = bid(&client, &base, &bidder, listing_id, "8.0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["code"], "LOW_BID");
    assert_eq!(error["error"], "Bid must be greater than the current bid");
    assert_eq!(error["current_price"], 10.0);

    let page = get_listing(&client, &base, None, listing_id).await;
    assert_eq!(page["listing"]["current_price"], 10.0);

    // 높은 입찰은 성공
    let response = bid(&client, &base, &bidder, listing_id, "15.0").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page: Value = response.json().await.unwrap();
    assert_eq!(page["listing"]["current_price"], 15.0);
    assert_eq!(page["message"], "Bid successfully added");
    assert_eq!(page["update"], true);
    assert_eq!(page["is_owner"], false);

    // 경매 종료
    let response = client
        .post(format!("{}/listing/{}/close", base, listing_id))
        .bearer_auth(&seller)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page: Value = response.json().await.unwrap();
    assert_eq!(page["listing"]["is_active"], false);
    assert_eq!(page["message"], "Auction closed");

    // 종료 후 입찰은 거절되고 가격은 그대로
    let response = bid(&client, &base, &bidder, listing_id, "20.0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["code"], "ALREADY_ENDED");

    let page = get_listing(&client, &base, None, listing_id).await;
    assert_eq!(page["listing"]["current_price"], 15.0);
    assert_eq!(page["listing"]["is_active"], false);

    // 종료된 상품은 목록에서 빠진다
    let index: Value = client
        .get(format!("{}/", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(index["listings"].as_array().unwrap().is_empty());

    // 입찰 이력: 높은 금액 순
    let history: Value = client
        .get(format!("{}/listing/{}/bids", base, listing_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let amounts: Vec<f64> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["amount"].as_f64().unwrap())
        .collect();
    assert_eq!(amounts, vec![15.0, 10.0]);
}

/// 비로그인 사용자 및 잘못된 입력
#[tokio::test]
async fn test_anonymous_and_malformed_requests() {
    let base = spawn_app().await;
    let client = Client::new();

    let seller = register(&client, &base, "seller").await;
    create_category(&client, &base, &seller, "Books").await;
    let listing_id = create_listing(&client, &base, &seller, "Novel", "3.5", "Books").await;

    // 토큰 없이 입찰
    let response = client
        .post(format!("{}/listing/{}/bid", base, listing_id))
        .form(&[("new_bid", "100")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // 존재하지 않는 세션 토큰
    let response = bid(&client, &base, "not-a-session", listing_id, "100").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // 숫자가 아닌 입찰가
    let response = bid(&client, &base, &seller, listing_id, "lots").await;
    assert!(response.status().is_client_error());

    // 음수 입찰가
    let response = bid(&client, &base, &seller, listing_id, "-5").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["code"], "BAD_PARAMETERS");

    // 없는 상품
    let response = client
        .get(format!("{}/listing/9999", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // 없는 카테고리로 등록
    let response = client
        .post(format!("{}/create", base))
        .bearer_auth(&seller)
        .form(&[
            ("title", "Lamp"),
            ("description", "desk lamp"),
            ("price", "12"),
            ("imageurl", ""),
            ("category", "Lighting"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["code"], "CATEGORY_NOT_FOUND");

    // 비로그인 상태의 관심 목록
    let response = client
        .get(format!("{}/watchlist", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// 회원 가입 검증
#[tokio::test]
async fn test_register_validation() {
    let base = spawn_app().await;
    let client = Client::new();

    // 비밀번호 불일치
    let response = client
        .post(format!("{}/register", base))
        .form(&[
            ("username", "alice"),
            ("email", "alice@example.com"),
            ("password", "one"),
            ("confirmation", "two"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], "Passwords must match.");

    // 사용자가 생성되지 않았으므로 로그인 불가
    let response = client
        .post(format!("{}/login", base))
        .form(&[("username", "alice"), ("password", "one")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // 중복 사용자명
    register(&client, &base, "alice").await;
    let response = client
        .post(format!("{}/register", base))
        .form(&[
            ("username", "alice"),
            ("email", "other@example.com"),
            ("password", "other"),
            ("confirmation", "other"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], "Username already taken.");

    // 기존 비밀번호는 그대로 유효
    let response = client
        .post(format!("{}/login", base))
        .form(&[("username", "alice"), ("password", "other")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], "Invalid username and/or password.");

    let response = client
        .post(format!("{}/login", base))
        .form(&[("username", "alice"), ("password", "pw")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 이메일 길이 초과는 400
    let long_email = format!("{}@example.com", "e".repeat(300));
    let response = client
        .post(format!("{}/register", base))
        .form(&[
            ("username", "dave"),
            ("email", long_email.as_str()),
            ("password", "pw"),
            ("confirmation", "pw"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["code"], "BAD_PARAMETERS");
}

/// 로그아웃 후 세션 토큰은 더 이상 유효하지 않다
#[tokio::test]
async fn test_logout_invalidates_session() {
    let base = spawn_app().await;
    let client = Client::new();

    let token = register(&client, &base, "bob").await;
    let response = client
        .get(format!("{}/watchlist", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .post(format!("{}/logout", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/watchlist", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // 토큰 없는 로그아웃도 성공
    let response = client
        .post(format!("{}/logout", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

/// 관심 목록 추가/삭제는 멱등
#[tokio::test]
async fn test_watchlist_toggle() {
    let base = spawn_app().await;
    let client = Client::new();

    let seller = register(&client, &base, "seller").await;
    let watcher = register(&client, &base, "watcher").await;
    create_category(&client, &base, &seller, "Toys").await;
    let listing_id = create_listing(&client, &base, &seller, "Robot", "20", "Toys").await;
    let watchlist_url = format!("{}/listing/{}/watchlist", base, listing_id);

    for _ in 0..2 {
        let response = client
            .post(&watchlist_url)
            .bearer_auth(&watcher)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let watchlist: Value = client
        .get(format!("{}/watchlist", base))
        .bearer_auth(&watcher)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(watchlist.as_array().unwrap().len(), 1);
    assert_eq!(watchlist[0]["title"], "Robot");

    let page = get_listing(&client, &base, Some(&watcher), listing_id).await;
    assert_eq!(page["is_listing_in_watchlist"], true);
    let page = get_listing(&client, &base, Some(&seller), listing_id).await;
    assert_eq!(page["is_listing_in_watchlist"], false);

    for _ in 0..2 {
        let response = client
            .delete(&watchlist_url)
            .bearer_auth(&watcher)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let watchlist: Value = client
        .get(format!("{}/watchlist", base))
        .bearer_auth(&watcher)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(watchlist.as_array().unwrap().is_empty());

    // 없는 상품
    let response = client
        .post(format!("{}/listing/424242/watchlist", base))
        .bearer_auth(&watcher)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// 댓글 작성
#[tokio::test]
async fn test_comments() {
    let base = spawn_app().await;
    let client = Client::new();

    let seller = register(&client, &base, "seller").await;
    let reader = register(&client, &base, "reader").await;
    create_category(&client, &base, &seller, "Art").await;
    let listing_id = create_listing(&client, &base, &seller, "Painting", "500", "Art").await;

    for (token, message) in [(&reader, "Nice colors"), (&seller, "Thanks!")] {
        let response = client
            .post(format!("{}/listing/{}/comment", base, listing_id))
            .bearer_auth(token)
            .form(&[("new_comment", message)])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let page = get_listing(&client, &base, None, listing_id).await;
    let comments = page["all_comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["author_username"], "reader");
    assert_eq!(comments[0]["message"], "Nice colors");
    assert_eq!(comments[1]["author_username"], "seller");

    // 길이 제한 초과
    let long_message = "x".repeat(1001);
    let response = client
        .post(format!("{}/listing/{}/comment", base, listing_id))
        .bearer_auth(&reader)
        .form(&[("new_comment", long_message.as_str())])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// 카테고리별 조회
#[tokio::test]
async fn test_display_category() {
    let base = spawn_app().await;
    let client = Client::new();

    let seller = register(&client, &base, "seller").await;
    create_category(&client, &base, &seller, "Furniture").await;
    create_category(&client, &base, &seller, "Garden").await;
    create_listing(&client, &base, &seller, "Chair", "10", "Furniture").await;
    create_listing(&client, &base, &seller, "Table", "40", "Furniture").await;
    create_listing(&client, &base, &seller, "Rake", "5", "Garden").await;

    // 중복 카테고리
    let response = client
        .post(format!("{}/categories", base))
        .bearer_auth(&seller)
        .form(&[("category", "Garden")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let page: Value = client
        .post(format!("{}/category", base))
        .form(&[("category", "Furniture")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let titles: Vec<&str> = page["listings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Table", "Chair"]);
    assert_eq!(page["categories"].as_array().unwrap().len(), 2);

    let response = client
        .post(format!("{}/category", base))
        .form(&[("category", "Electronics")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let form: Value = client
        .get(format!("{}/create", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(form["categories"][0]["name"], "Furniture");
}

/// 동시성 입찰 테스트
#[tokio::test]
async fn test_concurrent_bidding() {
    let base = spawn_app().await;
    let client = Client::new();

    let seller = register(&client, &base, "seller").await;
    create_category(&client, &base, &seller, "Collectibles").await;
    let listing_id =
        create_listing(&client, &base, &seller, "Coin", "10", "Collectibles").await;

    let mut bidders = Vec::new();
    for i in 1..=10 {
        bidders.push(register(&client, &base, &format!("bidder{}", i)).await);
    }

    // 50개의 동시 입찰 생성
    let mut handles = vec![];
    for i in 1..=50 {
        let client = client.clone();
        let base = base.clone();
        let token = bidders[i % bidders.len()].clone();
        let amount = (10 + i).to_string();
        handles.push(tokio::spawn(async move {
            bid(&client, &base, &token, listing_id, &amount)
                .await
                .status()
        }));
    }

    let mut successful_bids = 0;
    let mut failed_bids = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => successful_bids += 1,
            StatusCode::BAD_REQUEST => failed_bids += 1,
            other => panic!("unexpected status {}", other),
        }
    }
    info!(
        "성공한 입찰 수: {}, 실패한 입찰 수: {}",
        successful_bids, failed_bids
    );
    assert!(successful_bids >= 1);
    assert_eq!(successful_bids + failed_bids, 50);

    // 최종 가격은 최고 입찰가
    let page = get_listing(&client, &base, None, listing_id).await;
    assert_eq!(page["listing"]["current_price"], 60.0);

    // 입찰 이력 = 시작 가격 + 성공한 입찰
    let history: Value = client
        .get(format!("{}/listing/{}/bids", base, listing_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), successful_bids + 1);

    // 이력은 엄격하게 감소해야 한다
    let amounts: Vec<f64> = history
        .iter()
        .map(|b| b["amount"].as_f64().unwrap())
        .collect();
    assert!(amounts.windows(2).all(|w| w[0] > w[1]));
}
