//! Request gate: skip 判定 → token 抽出 → IAM で検証 → identity 付与 / 401
//!
//! - axum には依存しない (boundary の adapter が `GateRequest` を組み立てる)
//! - 状態は immutable な設定と IAM client のみ。request 間で共有して良い
//! - 失敗はすべて `Continue` か `Rejected` に落ちる (panic / 5xx にはしない)
use std::sync::Arc;

use thiserror::Error;

use crate::services::auth::{
    identity::Identity,
    skip::{HandlerMarkers, HandlerRef, SkipRules},
    token::AccessToken,
};
use crate::services::iam::IamClient;

/// Rejection reason. Display は log に出す文言そのもの。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateRejection {
    #[error("Token not found")]
    MissingToken,
    #[error("Token not valid")]
    InvalidToken,
}

/// What the boundary adapter knows about an inbound request.
#[derive(Debug, Clone, Copy)]
pub struct GateRequest<'a> {
    pub top_level: bool,
    pub route: Option<&'a str>,
    pub handler: Option<&'a HandlerRef>,
    pub token: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Proceed; `Some` when a token was validated and the identity must be attached.
    Continue(Option<Identity>),
    Rejected(GateRejection),
}

pub struct RequestGate {
    rules: SkipRules,
    markers: HandlerMarkers,
    iam: Arc<dyn IamClient>,
}

impl RequestGate {
    pub fn new(rules: SkipRules, markers: HandlerMarkers, iam: Arc<dyn IamClient>) -> Self {
        Self {
            rules,
            markers,
            iam,
        }
    }

    pub async fn intercept(&self, req: &GateRequest<'_>) -> GateOutcome {
        // sub-request (内部 forward) は外側の request で検証済み
        if !req.top_level {
            return GateOutcome::Continue(None);
        }

        if self.should_skip(req.route, req.handler) {
            return GateOutcome::Continue(None);
        }

        // 空文字と "0" は header なしと同じ扱い
        let Some(raw) = req.token.filter(|t| !t.is_empty() && *t != "0") else {
            return self.reject(GateRejection::MissingToken);
        };

        match self.validate(raw).await {
            Some(identity) => GateOutcome::Continue(Some(identity)),
            None => self.reject(GateRejection::InvalidToken),
        }
    }

    /// Route 名 → handler marker の順に判定する。IAM には触れない。
    pub fn should_skip(&self, route: Option<&str>, handler: Option<&HandlerRef>) -> bool {
        if self.rules.skips_route(route) {
            tracing::debug!(route = ?route, "token validation skipped by route");
            return true;
        }

        self.skips_handler(handler)
    }

    fn skips_handler(&self, handler: Option<&HandlerRef>) -> bool {
        match handler {
            None | Some(HandlerRef::Unresolvable) => false,
            // closure handler には marker を付けられないため常に skip
            Some(HandlerRef::Anonymous) => true,
            Some(HandlerRef::ClassMethod { class, method }) => {
                match self.markers.lookup(class, method, self.rules.marker()) {
                    Ok(excluded) => excluded,
                    Err(err) => {
                        tracing::debug!(error = %err, "handler marker lookup failed");
                        false
                    }
                }
            }
        }
    }

    /// Provider の失敗は「identity なし」と同じ扱い
    pub async fn validate(&self, raw: &str) -> Option<Identity> {
        let token = AccessToken::for_validation(raw);

        match self.iam.user_info(&token).await {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(
                    backend = self.iam.backend_name(),
                    error = ?err,
                    "userinfo lookup failed"
                );
                None
            }
        }
    }

    fn reject(&self, reason: GateRejection) -> GateOutcome {
        tracing::error!("{reason}");
        GateOutcome::Rejected(reason)
    }
}
