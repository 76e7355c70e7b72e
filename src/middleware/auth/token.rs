/*
 * Responsibility
 * - X-Auth-Token の検証 (skip 判定 → ヘッダ抽出 → IAM で検証 → 拒否)
 * - 成功時に、user-info を request attributes の `user` に載せる
 * - 判定ロジックは RequestGate 側。ここは axum request → GateRequest の変換だけ
 */
//! RequestGate の axum adapter
//!
//! - route 名 / handler 参照は `MatchedPath` で RouteCatalog を引いて解決する
//!   (そのため `route_layer` で掛ける必要がある)
//! - `SubRequest` extension が付いた request は内部 forward とみなし検証しない
//! - ヘッダ値は "Bearer " 等を剥がさずそのまま使う

use axum::{
    Router,
    body::Body,
    extract::{MatchedPath, State},
    http::{HeaderName, Request},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{GateOutcome, GateRequest, RequestAttributes, USER_ATTRIBUTE};
use crate::state::AppState;

pub const AUTH_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-auth-token");

/// 内部で forward された request に付ける marker (top-level ではない)
#[derive(Debug, Clone, Copy, Default)]
pub struct SubRequest;

/// 登録済みの全 route に token 検証を掛ける。
///
/// 例：
/// ```ignore
/// let router = api::routes(&mut catalog);
/// let router = middleware::auth::apply(router, state.clone());
/// let app = router.with_state(state);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer でないと MatchedPath が入らない
    router.route_layer(middleware::from_fn_with_state(state, token_middleware))
}

async fn token_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let meta = req
        .extensions()
        .get::<MatchedPath>()
        .and_then(|path| state.routes.lookup(req.method(), path.as_str()));

    let gate_req = GateRequest {
        top_level: req.extensions().get::<SubRequest>().is_none(),
        route: meta.and_then(|m| m.name.as_deref()),
        handler: meta.map(|m| &m.handler),
        // 非 ASCII などで文字列にできない値は「ヘッダなし」と同じ扱い
        token: req
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok()),
    };

    let outcome = state.gate.intercept(&gate_req).await;

    match outcome {
        GateOutcome::Continue(None) => {}
        GateOutcome::Continue(Some(identity)) => {
            // middleware → extractor への受け渡し
            let mut attrs = req
                .extensions_mut()
                .remove::<RequestAttributes>()
                .unwrap_or_default();
            attrs.set(USER_ATTRIBUTE, identity.into_payload());
            req.extensions_mut().insert(attrs);
        }
        GateOutcome::Rejected(reason) => return Err(reason.into()),
    }

    Ok(next.run(req).await)
}
