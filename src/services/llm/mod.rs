pub mod client;

pub use client::DeepSeekClient;
