use std::convert::Infallible;

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;

use crate::error::{AppError, AuthFailure};

use super::Identity;

/// Handler で Identity を受け取るための extractor
/// route guard が Identity を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す (guard が掛かっていない・public route)
///
/// public route で「認証されていないこと」を見たい場合は `Option<CurrentUser>` を使う
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthorized(AuthFailure::AuthenticationFailed))
    }
}

impl<S> OptionalFromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Identity>().cloned().map(CurrentUser))
    }
}
