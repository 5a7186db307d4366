// region:    --- Imports
use super::commands::session_cutoff;
use crate::auction::model::User;
use crate::error::AuctionError;
use crate::store::SharedStore;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use std::convert::Infallible;

// endregion: --- Imports

async fn bearer_token<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<String> {
    TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
        .await
        .ok()
        .map(|TypedHeader(auth)| auth.token().to_string())
}

// region:    --- Extractors
/// `Authorization: Bearer` 헤더의 세션 토큰
pub struct BearerToken(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(BearerToken(bearer_token(parts, state).await))
    }
}

/// 요청한 사용자 (익명 허용)
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<SharedStore> for MaybeUser {
    type Rejection = AuctionError;

    async fn from_request_parts(
        parts: &mut Parts,
        store: &SharedStore,
    ) -> Result<Self, Self::Rejection> {
        let user = match bearer_token(parts, store).await {
            Some(token) => store.get_session_user(&token, session_cutoff()).await?,
            None => None,
        };
        Ok(MaybeUser(user))
    }
}

/// 로그인한 사용자 (익명이면 401)
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<SharedStore> for AuthUser {
    type Rejection = AuctionError;

    async fn from_request_parts(
        parts: &mut Parts,
        store: &SharedStore,
    ) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, store).await?;
        user.map(AuthUser).ok_or(AuctionError::Unauthorized)
    }
}
// endregion: --- Extractors
