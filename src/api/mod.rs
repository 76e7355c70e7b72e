/*
 * Responsibility
 * - API 全体の route 組み立て (/health, /api/doc.json, /api/v1/...)
 * - 登録した route はすべて RouteCatalog に記録される
 */
use axum::Router;
use axum::routing::get;

use crate::services::auth::skip::DEFAULT_EXCLUSION_MARKER;
use crate::state::AppState;

pub mod catalog;
pub mod v1;

use catalog::{Handler, RouteCatalog, RouteDef};
use v1::handlers::{docs::api_doc, health::health};

pub fn routes(catalog: &mut RouteCatalog) -> Router<AppState> {
    let root = catalog
        .registrar::<AppState>("")
        .route(
            "/health",
            get(health),
            RouteDef::get(Handler::Named("HealthController::health"))
                .named("app.health")
                .marked(DEFAULT_EXCLUSION_MARKER),
        )
        .route(
            "/api/doc.json",
            get(api_doc),
            RouteDef::get(Handler::Named("DocsController::index")).named("app.swagger"),
        )
        .finish();

    root.nest(v1::PREFIX, v1::routes(catalog))
}
