pub mod gate;
pub mod identity;
pub mod skip;
pub mod token;

pub use gate::{GateOutcome, GateRejection, GateRequest, RequestGate};
pub use identity::{RequestAttributes, USER_ATTRIBUTE};
pub use skip::{HandlerMarkers, HandlerRef};
