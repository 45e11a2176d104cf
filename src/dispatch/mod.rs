pub mod dispatcher;
pub mod render;
pub mod resolve;

pub use dispatcher::{Collaborators, Dispatcher};
pub use resolve::{parse_ordinal, resolve_target};
