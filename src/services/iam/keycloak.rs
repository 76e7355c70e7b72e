//! Keycloak-style userinfo client.
//!
//! `GET {base_url}/realms/{realm}/protocol/openid-connect/userinfo` に
//! `Authorization: Bearer <token>` を付けて問い合わせる。
//!
//! - 200 + 空でない JSON => identity
//! - 401 / 403           => identity なし
//! - それ以外             => `IamError::Status`
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use crate::services::auth::{identity::Identity, token::AccessToken};
use crate::services::iam::client::{IamClient, IamError};

#[derive(Clone, Debug)]
pub struct KeycloakClient {
    http: reqwest::Client,
    userinfo_url: Url,
}

impl KeycloakClient {
    pub fn new(base_url: &Url, realm: &str, timeout: Duration) -> Result<Self, IamError> {
        // timeout は gate ではなく client 側の責務
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            userinfo_url: userinfo_url(base_url, realm)?,
        })
    }

    pub fn userinfo_url(&self) -> &Url {
        &self.userinfo_url
    }
}

fn userinfo_url(base_url: &Url, realm: &str) -> Result<Url, url::ParseError> {
    let base = base_url.as_str().trim_end_matches('/');
    Url::parse(&format!(
        "{base}/realms/{realm}/protocol/openid-connect/userinfo"
    ))
}

#[async_trait]
impl IamClient for KeycloakClient {
    fn backend_name(&self) -> &'static str {
        "keycloak"
    }

    async fn user_info(&self, token: &AccessToken) -> Result<Option<Identity>, IamError> {
        if token.has_expired() {
            tracing::debug!("access token already expired; skipping userinfo call");
            return Ok(None);
        }

        let res = self
            .http
            .get(self.userinfo_url.clone())
            .bearer_auth(&token.token)
            .send()
            .await?;

        match res.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Ok(None),
            status => {
                return Err(IamError::Status {
                    status: status.as_u16(),
                });
            }
        }

        let payload = res
            .json::<Value>()
            .await
            .map_err(|e| IamError::Decode(e.to_string()))?;

        Ok(Identity::from_payload(payload))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, Utc};
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    const USERINFO_PATH: &str = "/realms/demo/protocol/openid-connect/userinfo";

    fn client(server: &MockServer) -> KeycloakClient {
        let base = Url::parse(&server.base_url()).unwrap();
        KeycloakClient::new(&base, "demo", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn userinfo_url_ignores_trailing_slash() {
        let base = Url::parse("https://iam.example.com/auth/").unwrap();
        let url = userinfo_url(&base, "demo").unwrap();
        assert_eq!(
            url.as_str(),
            "https://iam.example.com/auth/realms/demo/protocol/openid-connect/userinfo"
        );
    }

    #[tokio::test]
    async fn valid_token_returns_identity() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path(USERINFO_PATH)
                    .header("authorization", "Bearer abc123");
                then.status(200)
                    .json_body(json!({"sub": "42", "preferred_username": "alice"}));
            })
            .await;

        let identity = client(&server)
            .user_info(&AccessToken::for_validation("abc123"))
            .await
            .unwrap()
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            identity.into_payload(),
            json!({"sub": "42", "preferred_username": "alice"})
        );
    }

    #[tokio::test]
    async fn rejected_token_returns_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(USERINFO_PATH);
                then.status(401).json_body(json!({"error": "invalid_token"}));
            })
            .await;

        let result = client(&server)
            .user_info(&AccessToken::for_validation("bad"))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn empty_payload_returns_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(USERINFO_PATH);
                then.status(200).json_body(json!({}));
            })
            .await;

        let result = client(&server)
            .user_info(&AccessToken::for_validation("abc"))
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(USERINFO_PATH);
                then.status(503);
            })
            .await;

        let err = client(&server)
            .user_info(&AccessToken::for_validation("abc"))
            .await
            .unwrap_err();

        assert!(matches!(err, IamError::Status { status: 503 }));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(USERINFO_PATH);
                then.status(200).body("not json");
            })
            .await;

        let err = client(&server)
            .user_info(&AccessToken::for_validation("abc"))
            .await
            .unwrap_err();

        assert!(matches!(err, IamError::Decode(_)));
    }

    #[tokio::test]
    async fn expired_token_is_not_sent() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(USERINFO_PATH);
                then.status(200).json_body(json!({"sub": "42"}));
            })
            .await;

        let expired = AccessToken::new("abc", "", Utc::now() - ChronoDuration::seconds(1));
        let result = client(&server).user_info(&expired).await.unwrap();

        assert!(result.is_none());
        mock.assert_calls_async(0).await;
    }
}
