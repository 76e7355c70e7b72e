/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - gate の rejection は常に 401 + {"message": "Token not found"}
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::services::auth::GateRejection;

/// 401 body の message。rejection の理由に関わらず固定 (理由は log にだけ出る)
pub const UNAUTHORIZED_MESSAGE: &str = "Token not found";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] GateRejection),
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
}

impl AppError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized(_) => {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "message": UNAUTHORIZED_MESSAGE })),
                )
                    .into_response();
            }
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{resource} not found."),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::header;
    use serde_json::Value;

    use super::*;

    async fn body_json(res: Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn both_rejections_render_the_same_401() {
        for reason in [GateRejection::MissingToken, GateRejection::InvalidToken] {
            let res = AppError::from(reason).into_response();

            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                res.headers().get(header::CONTENT_TYPE).unwrap(),
                "application/json"
            );
            assert_eq!(body_json(res).await, json!({"message": "Token not found"}));
        }
    }

    #[tokio::test]
    async fn not_found_uses_error_envelope() {
        let res = AppError::not_found("order").into_response();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(res).await,
            json!({"error": {"code": "not_found", "message": "order not found."}})
        );
    }
}
