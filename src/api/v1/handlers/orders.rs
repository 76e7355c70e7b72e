/*
 * Responsibility
 * - GET /api/v1/orders/{order_id}
 * - 認証済み user (CurrentUser) を受け取り、固定の注文データを返す
 */
use axum::{Json, extract::Path};

use crate::{
    api::v1::{dto::orders::OrderResponse, extractors::CurrentUser},
    error::AppError,
};

const ORDERS: &[(u64, &str, u32)] = &[(1, "keyboard", 1), (2, "monitor", 2), (3, "cable", 5)];

pub async fn show_order(
    CurrentUser(user): CurrentUser,
    Path(order_id): Path<u64>,
) -> Result<Json<OrderResponse>, AppError> {
    let (id, item, quantity) = ORDERS
        .iter()
        .copied()
        .find(|(id, _, _)| *id == order_id)
        .ok_or(AppError::not_found("order"))?;

    Ok(Json(OrderResponse {
        id,
        item,
        quantity,
        requested_by: user,
    }))
}
