use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: u64,
    pub item: &'static str,
    pub quantity: u32,
    pub requested_by: Value,
}
