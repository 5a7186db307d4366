use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::distributions::Alphanumeric;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SALT_LEN: usize = 16;
const SESSION_TOKEN_LEN: usize = 48;

fn digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

/// 비밀번호 해시 생성 (`salt$digest`, base64)
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    format!(
        "{}${}",
        STANDARD.encode(salt),
        STANDARD.encode(digest(&salt, password))
    )
}

/// 저장된 해시와 비밀번호 비교
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };
    match (STANDARD.decode(salt), STANDARD.decode(expected)) {
        (Ok(salt), Ok(expected)) => digest(&salt, password).ct_eq(&expected).into(),
        _ => false,
    }
}

/// 세션 토큰 생성
pub fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}
