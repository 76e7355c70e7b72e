/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - gate: RequestGate (skip 設定 + IAM client)
 *   - routes: RouteCatalog (route 名 / handler 参照)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::api::catalog::RouteCatalog;
use crate::services::auth::RequestGate;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<RequestGate>,
    pub routes: Arc<RouteCatalog>,
}

impl AppState {
    pub fn new(gate: Arc<RequestGate>, routes: Arc<RouteCatalog>) -> Self {
        Self { gate, routes }
    }
}
