/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, IAM 接続先, token 検証の除外設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::services::auth::skip::{
    DEFAULT_EXCLUDED_ROUTE_PREFIXES, DEFAULT_EXCLUDED_ROUTES, DEFAULT_EXCLUSION_MARKER, SkipRules,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub request_timeout: Duration,

    // Identity provider (Keycloak)
    pub iam_base_url: Url,
    pub iam_realm: String,
    pub iam_timeout: Duration,

    // Token validation exclusions
    pub excluded_routes: Vec<String>,
    pub excluded_route_prefixes: Vec<String>,
    pub exclusion_marker: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let request_timeout = std::env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let iam_base_url =
            std::env::var("IAM_BASE_URL").map_err(|_| ConfigError::Missing("IAM_BASE_URL"))?;
        let iam_base_url =
            Url::parse(&iam_base_url).map_err(|_| ConfigError::Invalid("IAM_BASE_URL"))?;

        let iam_realm = std::env::var("IAM_REALM")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("IAM_REALM"))?;

        let iam_timeout = std::env::var("IAM_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        let excluded_routes = list_var("EXCLUDED_ROUTES", DEFAULT_EXCLUDED_ROUTES);
        let excluded_route_prefixes =
            list_var("EXCLUDED_ROUTE_PREFIXES", DEFAULT_EXCLUDED_ROUTE_PREFIXES);

        let exclusion_marker = std::env::var("TOKEN_EXCLUSION_MARKER")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_EXCLUSION_MARKER.to_string());

        Ok(Self {
            addr,
            app_env,
            request_timeout,
            iam_base_url,
            iam_realm,
            iam_timeout,
            excluded_routes,
            excluded_route_prefixes,
            exclusion_marker,
        })
    }

    pub fn skip_rules(&self) -> SkipRules {
        SkipRules::new(
            self.excluded_routes.iter().cloned(),
            self.excluded_route_prefixes.iter().cloned(),
            self.exclusion_marker.clone(),
        )
    }
}

/// 未設定なら default、設定済みならカンマ区切り (空要素は捨てる)
fn list_var(key: &str, default: &[&str]) -> Vec<String> {
    match std::env::var(key) {
        Ok(raw) => split_list(&raw),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
