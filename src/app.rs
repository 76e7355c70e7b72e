/*
 * Responsibility
 * - Config読み込み → 依存生成 (IAM client / RequestGate) → Router 組み立て
 * - Middleware の適用 (X-Auth-Token 検証 / HTTP 共通)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{self, catalog::RouteCatalog};
use crate::config::Config;
use crate::middleware;
use crate::services::auth::RequestGate;
use crate::services::iam::{IamClient, KeycloakClient};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,token_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panic via tracing so they don't get "lost"
        tracing::error!(?info, "panic");

        // development では即落として気付けるようにする
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let iam = KeycloakClient::new(&config.iam_base_url, &config.iam_realm, config.iam_timeout)?;
    tracing::info!(userinfo = %iam.userinfo_url(), "identity provider configured");

    let app = build_router(&config, Arc::new(iam));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(config: &Config, iam: Arc<dyn IamClient>) -> Router {
    let mut catalog = RouteCatalog::new();
    let routes = api::routes(&mut catalog);

    // marker は route 登録時に集めたものを gate に渡す
    let gate = RequestGate::new(config.skip_rules(), catalog.markers().clone(), iam);
    let state = AppState::new(Arc::new(gate), Arc::new(catalog));

    let router = middleware::auth::apply(routes, state.clone()).with_state(state);
    middleware::http::apply(router, config.request_timeout)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use httpmock::prelude::*;
    use serde_json::json;
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::config::AppEnv;
    use crate::middleware::auth::token::AUTH_TOKEN_HEADER;
    use crate::services::auth::skip::{
        DEFAULT_EXCLUDED_ROUTE_PREFIXES, DEFAULT_EXCLUDED_ROUTES, DEFAULT_EXCLUSION_MARKER,
    };

    fn config(base_url: &str) -> Config {
        Config {
            addr: "127.0.0.1:0".parse().unwrap(),
            app_env: AppEnv::Development,
            request_timeout: Duration::from_secs(5),
            iam_base_url: Url::parse(base_url).unwrap(),
            iam_realm: "demo".into(),
            iam_timeout: Duration::from_secs(5),
            excluded_routes: DEFAULT_EXCLUDED_ROUTES.iter().map(|s| s.to_string()).collect(),
            excluded_route_prefixes: DEFAULT_EXCLUDED_ROUTE_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclusion_marker: DEFAULT_EXCLUSION_MARKER.into(),
        }
    }

    fn app(config: &Config) -> Router {
        let iam =
            KeycloakClient::new(&config.iam_base_url, &config.iam_realm, config.iam_timeout)
                .unwrap();
        build_router(config, Arc::new(iam))
    }

    #[tokio::test]
    async fn end_to_end_with_keycloak_userinfo() {
        let server = MockServer::start_async().await;
        let valid = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/realms/demo/protocol/openid-connect/userinfo")
                    .header("authorization", "Bearer abc123");
                then.status(200).json_body(json!({"id": 1, "name": "Alice"}));
            })
            .await;

        let res = app(&config(&server.base_url()))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/me")
                    .header(AUTH_TOKEN_HEADER, "abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        valid.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn provider_outage_is_rejected_as_401() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(502);
            })
            .await;

        let res = app(&config(&server.base_url()))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/orders/1")
                    .header(AUTH_TOKEN_HEADER, "abc123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn renamed_marker_stops_skipping_health() {
        let server = MockServer::start_async().await;
        let mut config = config(&server.base_url());
        config.exclusion_marker = "SomethingElse".into();

        let res = app(&config)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
