/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: X-Auth-Token の検証 (RequestGate の axum adapter)
 * - http: request id / body limit / timeout / access log
 */
pub mod auth;
pub mod http;
