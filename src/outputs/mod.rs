pub mod message;

pub use message::{ChatMessage, MessageSink, RecordingSink, Role};
