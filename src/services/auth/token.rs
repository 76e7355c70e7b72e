/*
 * Responsibility
 * - IAM の userinfo 呼び出しに渡す access token の DTO
 * - JWT の decode はしない (exp は固定の寿命を付与するだけ)
 */
use chrono::{DateTime, Duration, Utc};

/// Gate が組み立てる token の寿命 (秒)
pub const VALIDATION_TOKEN_TTL_SECONDS: i64 = 3600;

/// Bearer credential handed to the identity provider.
///
/// `refresh_token` is always empty here; expiry is assigned, not read from the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(
        token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token: token.into(),
            refresh_token: refresh_token.into(),
            expires_at,
        }
    }

    /// Header 値から validation 用の token を作る (refresh なし, now + 3600s)
    pub fn for_validation(raw: &str) -> Self {
        Self::new(
            raw,
            String::new(),
            Utc::now() + Duration::seconds(VALIDATION_TOKEN_TTL_SECONDS),
        )
    }

    pub fn has_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_token_has_no_refresh_and_one_hour_lifetime() {
        let before = Utc::now();
        let token = AccessToken::for_validation("abc123");
        let after = Utc::now();

        assert_eq!(token.token, "abc123");
        assert!(token.refresh_token.is_empty());
        assert!(token.expires_at >= before + Duration::seconds(3600));
        assert!(token.expires_at <= after + Duration::seconds(3600));
        assert!(!token.has_expired());
    }

    #[test]
    fn token_in_the_past_has_expired() {
        let token = AccessToken::new("abc", "", Utc::now() - Duration::seconds(1));
        assert!(token.has_expired());
    }
}
