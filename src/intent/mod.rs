pub mod extract;
pub mod fallback;
pub mod service;
pub mod types;

pub use fallback::classify;
pub use service::{IntentService, NEUTRAL_REPLY};
pub use types::{IntentKind, IntentParameters, StructuredIntent};
