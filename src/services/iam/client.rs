//! Identity provider interface used by the request gate.
use async_trait::async_trait;
use thiserror::Error;

use crate::services::auth::{identity::Identity, token::AccessToken};

/// IAM-layer errors (transport/status/decode).
///
/// Note:
/// - Gate はこれを「identity なし」と区別しない (fail-closed で 401)。
/// - ログに残すために型としては分けておく。
#[derive(Debug, Error)]
pub enum IamError {
    #[error("iam transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("iam responded with unexpected status {status}")]
    Status { status: u16 },
    #[error("iam response could not be decoded: {0}")]
    Decode(String),
    #[error("invalid iam url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// User-info lookup against the identity provider.
///
/// Returns:
/// - `Ok(Some(identity))` token is valid
/// - `Ok(None)`           provider rejected the token or returned an empty payload
/// - `Err(_)`             provider failure
///
/// Implementations must be safe to share across in-flight requests.
#[async_trait]
pub trait IamClient: Send + Sync + 'static {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn user_info(&self, token: &AccessToken) -> Result<Option<Identity>, IamError>;
}
