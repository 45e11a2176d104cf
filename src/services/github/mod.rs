pub mod client;
pub mod query;

pub use client::GitHubClient;
pub use query::to_search_query;
