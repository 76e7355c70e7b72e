pub mod auth;
pub mod iam;
