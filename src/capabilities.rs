//! Collaborator seams. The pipeline only talks to these traits; concrete
//! network, git and file-system implementations live under `services`.

use crate::error::CapabilityResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryOwner {
    pub login: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub clone_url: String,
    pub ssh_url: String,
    pub stars: u64,
    pub forks: u64,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub pushed_at: String,
    pub owner: RepositoryOwner,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub repositories: Vec<RepositorySummary>,
    pub total_count: u64,
    /// The GitHub search expression actually sent.
    pub query: String,
}

/// One entry of the persisted downloaded-projects list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadedProjectRecord {
    pub id: String,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub local_path: PathBuf,
    pub clone_url: String,
    pub downloaded_at: String,
    pub language: Option<String>,
    pub stars: u64,
}

impl DownloadedProjectRecord {
    pub fn from_repository(repo: &RepositorySummary, local_path: PathBuf) -> Self {
        Self {
            id: repo.id.to_string(),
            name: repo.name.clone(),
            full_name: repo.full_name.clone(),
            description: repo.description.clone(),
            local_path,
            clone_url: repo.clone_url.clone(),
            downloaded_at: chrono::Utc::now().to_rfc3339(),
            language: repo.language.clone(),
            stars: repo.stars,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Single non-streaming completion for a system + user message pair.
    async fn complete(&self, system: &str, user: &str, options: &SamplingOptions) -> CapabilityResult<String>;
}

#[async_trait]
pub trait RepositorySearch: Send + Sync {
    async fn search(&self, query: &str) -> CapabilityResult<SearchResult>;
}

#[async_trait]
pub trait RepositoryDownload: Send + Sync {
    async fn clone_repository(&self, source_url: &str, destination: &Path) -> CapabilityResult<()>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list_all(&self) -> CapabilityResult<Vec<DownloadedProjectRecord>>;
    async fn upsert(&self, record: DownloadedProjectRecord) -> CapabilityResult<()>;
}

#[async_trait]
pub trait CodeEdit: Send + Sync {
    /// Returns the full replacement text for the file.
    async fn modify(&self, file_path: &Path, instruction: &str) -> CapabilityResult<String>;
    async fn explain(&self, file_path: &Path) -> CapabilityResult<String>;
}

/// The host editor: which file is focused, writing it back, opening folders.
#[async_trait]
pub trait EditorSurface: Send + Sync {
    fn active_file(&self) -> Option<PathBuf>;
    async fn replace_contents(&self, file_path: &Path, contents: &str) -> CapabilityResult<()>;
    async fn open_project(&self, project_path: &Path) -> CapabilityResult<()>;
}
