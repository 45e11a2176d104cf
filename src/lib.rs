pub mod capabilities;
pub mod config;
pub mod conversation;
pub mod dispatch;
pub mod error;
pub mod intent;
pub mod outputs;
pub mod services;
pub mod session;

// Re-export specific items if needed for convenient access
pub use conversation::Conversation;
pub use dispatch::{Collaborators, Dispatcher};
pub use error::{CapabilityError, CapabilityResult};
pub use intent::{IntentKind, IntentService, StructuredIntent};
pub use outputs::{ChatMessage, MessageSink, Role};
pub use session::SessionState;
