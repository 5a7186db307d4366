use clap::Parser;
use std::net::SocketAddr;

/// 서버 실행 옵션
/// 모든 값은 환경 변수로도 지정할 수 있다.
#[derive(Parser, Debug, Clone)]
#[command(name = "commerce", about = "Online auction service")]
pub struct RunOptions {
    /// PostgreSQL 접속 주소. 지정하지 않으면 메모리 저장소를 사용한다.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen_addr: SocketAddr,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// 기동 시 기존 테이블을 모두 삭제하고 다시 만든다
    #[arg(long, env = "RESET_DATABASE", default_value_t = false)]
    pub reset_database: bool,

    /// 요청 바디 최대 크기(bytes)
    #[arg(long, env = "BODY_LIMIT", default_value_t = 1024 * 1024)]
    pub body_limit: usize,
}
