/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - route 名 / handler 参照 / exclusion marker を RouteCatalog に登録する
 * - token 検証を掛ける範囲は app 側 (route_layer) で決める
 */
use axum::{Router, routing::get};

use crate::api::catalog::{Handler, RouteCatalog, RouteDef};
use crate::state::AppState;

use crate::api::v1::handlers::{orders::show_order, users::me};

pub const PREFIX: &str = "/api/v1";

pub fn routes(catalog: &mut RouteCatalog) -> Router<AppState> {
    catalog
        .registrar(PREFIX)
        .route(
            "/me",
            get(me),
            RouteDef::get(Handler::Named("UserController::me")).named("users.me"),
        )
        .route(
            "/orders/{order_id}",
            get(show_order),
            RouteDef::get(Handler::Pair("OrderController", "show")).named("orders.show"),
        )
        // closure handler: marker を付けられないので検証対象外
        .route(
            "/ping",
            get(|| async { "pong" }),
            RouteDef::get(Handler::Closure),
        )
        .finish()
}
