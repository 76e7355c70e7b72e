use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};
use serde_json::Value;

use crate::services::auth::RequestAttributes;

/// Handler で、gate が検証した user-info を受け取るための extractor
/// middleware が RequestAttributes に `user` を格納済みである前提
/// 見つからない場合は 401 を返す（skip された route・ミドルウェア未設定）
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Value);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestAttributes>()
            .and_then(RequestAttributes::user)
            .cloned()
            .map(CurrentUser)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
