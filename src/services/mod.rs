pub mod code;
pub mod download;
pub mod editor;
pub mod github;
pub mod llm;
pub mod projects;

pub use code::AiCodeModifier;
pub use download::GitCloner;
pub use editor::TerminalEditor;
pub use github::GitHubClient;
pub use llm::DeepSeekClient;
pub use projects::JsonProjectStore;
