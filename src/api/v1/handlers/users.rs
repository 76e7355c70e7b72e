/*
 * Responsibility
 * - GET /api/v1/me
 * - gate が付けた user-info をそのまま返す
 */
use axum::Json;
use serde_json::Value;

use crate::api::v1::extractors::CurrentUser;

pub async fn me(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(user)
}
