/// 인증 관련 커맨드 처리
/// 1. 회원 가입
/// 2. 로그인
/// 3. 로그아웃
// region:    --- Imports
use super::password::{generate_session_token, hash_password, verify_password};
use crate::auction::model::{check_length, NewUser, User, MAX_EMAIL_LEN, MAX_USERNAME_LEN};
use crate::error::AuctionError;
use crate::store::AuctionStore;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 회원 가입 명령
#[derive(Deserialize)]
pub struct RegisterCommand {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

/// 로그인 명령
#[derive(Deserialize)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

/// 로그인 성공 응답
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

/// 세션 유효 기간
pub const SESSION_TTL_DAYS: i64 = 14;

/// 이 시각 이전에 발급된 세션은 만료된 것으로 본다
pub fn session_cutoff() -> DateTime<Utc> {
    Utc::now() - Duration::days(SESSION_TTL_DAYS)
}

async fn open_session(
    store: &dyn AuctionStore,
    user: User,
) -> Result<SessionResponse, AuctionError> {
    let purged = store.delete_expired_sessions(session_cutoff()).await?;
    if purged > 0 {
        info!("{:<12} --> 만료 세션 삭제: {}", "Auth", purged);
    }

    let token = generate_session_token();
    store.create_session(user.id, &token).await?;
    Ok(SessionResponse { token, user })
}

/// 1. 회원 가입
/// 성공 시 바로 로그인 처리한다.
pub async fn handle_register(
    cmd: RegisterCommand,
    store: &dyn AuctionStore,
) -> Result<SessionResponse, AuctionError> {
    info!("{:<12} --> 회원 가입 요청: {}", "Auth", cmd.username);

    // 비밀번호 확인
    if cmd.password != cmd.confirmation {
        return Err(AuctionError::PasswordMismatch);
    }

    let username = cmd.username.trim();
    if username.is_empty() || username.chars().count() > MAX_USERNAME_LEN {
        return Err(AuctionError::BadParameters(format!(
            "username must be 1 to {} characters",
            MAX_USERNAME_LEN
        )));
    }
    let email = cmd.email.trim();
    check_length("email", email, MAX_EMAIL_LEN)?;

    let user = store
        .create_user(NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash_password(&cmd.password),
        })
        .await?;

    open_session(store, user).await
}

/// 2. 로그인
pub async fn handle_login(
    cmd: LoginCommand,
    store: &dyn AuctionStore,
) -> Result<SessionResponse, AuctionError> {
    info!("{:<12} --> 로그인 요청: {}", "Auth", cmd.username);

    // 가입 시와 같은 방식으로 정규화
    match store.get_user_by_username(cmd.username.trim()).await? {
        Some(user) if verify_password(&cmd.password, &user.password_hash) => {
            open_session(store, user).await
        }
        _ => {
            warn!("{:<12} --> 로그인 실패: {}", "Auth", cmd.username);
            Err(AuctionError::InvalidCredentials)
        }
    }
}

/// 3. 로그아웃
/// 토큰이 없거나 이미 만료된 경우에도 성공으로 처리한다.
pub async fn handle_logout(
    token: Option<&str>,
    store: &dyn AuctionStore,
) -> Result<(), AuctionError> {
    if let Some(token) = token {
        store.delete_session(token).await?;
        info!("{:<12} --> 로그아웃", "Auth");
    }
    Ok(())
}
// endregion: --- Commands
