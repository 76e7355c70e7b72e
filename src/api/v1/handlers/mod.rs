pub mod docs;
pub mod health;
pub mod orders;
pub mod users;
