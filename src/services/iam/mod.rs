pub mod client;
pub mod keycloak;

pub use client::IamClient;
pub use keycloak::KeycloakClient;
