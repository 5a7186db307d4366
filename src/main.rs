// region:    --- Imports
use axum::extract::DefaultBodyLimit;
use clap::Parser;
use commerce::config::RunOptions;
use commerce::database::DatabaseManager;
use commerce::handlers;
use commerce::store::{MemoryStore, PostgresStore, SharedStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let run_options = RunOptions::parse();

    // 저장소 선택: DATABASE_URL 이 있으면 PostgreSQL, 없으면 메모리
    let store: SharedStore = match &run_options.database_url {
        Some(database_url) => {
            let db_manager =
                Arc::new(DatabaseManager::new(database_url, run_options.max_connections).await?);

            // 데이터베이스 초기화
            if let Err(e) = db_manager
                .initialize_database(run_options.reset_database)
                .await
            {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
            Arc::new(PostgresStore::new(db_manager))
        }
        None => {
            warn!(
                "{:<12} --> DATABASE_URL 이 없어 메모리 저장소를 사용합니다",
                "Main"
            );
            Arc::new(MemoryStore::new())
        }
    };

    // cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 라우터 설정
    let routes_all = handlers::routes(store)
        .layer(cors)
        .layer(DefaultBodyLimit::max(run_options.body_limit));

    let listener = TcpListener::bind(run_options.listen_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
