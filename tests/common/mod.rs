#![allow(dead_code)]

use async_trait::async_trait;
use gitpilot::capabilities::{
    CodeEdit, DownloadedProjectRecord, EditorSurface, ProjectStore, RepositoryDownload, RepositoryOwner,
    RepositorySearch, RepositorySummary, SamplingOptions, SearchResult, TextCompletion,
};
use gitpilot::config::{Settings, StaticConfig};
use gitpilot::{CapabilityError, CapabilityResult, Collaborators, Dispatcher, IntentService};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn repo(full_name: &str) -> RepositorySummary {
    let (owner, name) = full_name.split_once('/').unwrap_or(("someone", full_name));
    RepositorySummary {
        id: full_name.bytes().fold(7u64, |h, b| h.wrapping_mul(31).wrapping_add(b as u64)),
        name: name.to_string(),
        full_name: full_name.to_string(),
        description: Some(format!("{} description", name)),
        html_url: format!("https://github.com/{}", full_name),
        clone_url: format!("https://github.com/{}.git", full_name),
        ssh_url: format!("git@github.com:{}.git", full_name),
        stars: 100,
        forks: 10,
        language: Some("Rust".to_string()),
        topics: vec![],
        created_at: "2024-01-01T00:00:00Z".to_string(),
        updated_at: "2024-06-01T00:00:00Z".to_string(),
        pushed_at: "2024-06-01T00:00:00Z".to_string(),
        owner: RepositoryOwner {
            login: owner.to_string(),
            avatar_url: String::new(),
        },
    }
}

pub fn record(full_name: &str, local_path: &str) -> DownloadedProjectRecord {
    DownloadedProjectRecord::from_repository(&repo(full_name), PathBuf::from(local_path))
}

/// Replays canned completions in order; an exhausted script fails with `Timeout`.
#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<Vec<CapabilityResult<String>>>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<CapabilityResult<String>>) -> Self {
        let mut replies = replies;
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextCompletion for ScriptedCompletion {
    async fn complete(&self, _system: &str, user: &str, _options: &SamplingOptions) -> CapabilityResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(user.to_string());
        self.replies.lock().unwrap().pop().unwrap_or(Err(CapabilityError::Timeout))
    }
}

/// Always answers with the same text.
pub struct FixedCompletion(pub String);

#[async_trait]
impl TextCompletion for FixedCompletion {
    async fn complete(&self, _system: &str, _user: &str, _options: &SamplingOptions) -> CapabilityResult<String> {
        Ok(self.0.clone())
    }
}

/// Answers with each scripted result in turn, repeating the last one.
pub struct StubSearch {
    pub script: Mutex<Vec<CapabilityResult<Vec<RepositorySummary>>>>,
    pub queries: Mutex<Vec<String>>,
}

impl StubSearch {
    pub fn returning(repos: Vec<RepositorySummary>) -> Self {
        Self::sequence(vec![Ok(repos)])
    }

    pub fn failing(err: CapabilityError) -> Self {
        Self::sequence(vec![Err(err)])
    }

    pub fn sequence(script: Vec<CapabilityResult<Vec<RepositorySummary>>>) -> Self {
        Self { script: Mutex::new(script), queries: Mutex::new(vec![]) }
    }
}

#[async_trait]
impl RepositorySearch for StubSearch {
    async fn search(&self, query: &str) -> CapabilityResult<SearchResult> {
        self.queries.lock().unwrap().push(query.to_string());
        let next = {
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.remove(0)
            } else {
                script.first().cloned().unwrap_or(Ok(vec![]))
            }
        };
        let repositories = next?;
        Ok(SearchResult {
            total_count: repositories.len() as u64 * 10,
            repositories,
            query: query.to_string(),
        })
    }
}

#[derive(Default)]
pub struct StubDownload {
    pub error: Option<CapabilityError>,
    pub clones: Mutex<Vec<(String, PathBuf)>>,
}

#[async_trait]
impl RepositoryDownload for StubDownload {
    async fn clone_repository(&self, source_url: &str, destination: &Path) -> CapabilityResult<()> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        self.clones.lock().unwrap().push((source_url.to_string(), destination.to_path_buf()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryProjectStore {
    pub projects: Mutex<Vec<DownloadedProjectRecord>>,
}

impl MemoryProjectStore {
    pub fn with(projects: Vec<DownloadedProjectRecord>) -> Self {
        Self { projects: Mutex::new(projects) }
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn list_all(&self) -> CapabilityResult<Vec<DownloadedProjectRecord>> {
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn upsert(&self, record: DownloadedProjectRecord) -> CapabilityResult<()> {
        let mut projects = self.projects.lock().unwrap();
        projects.retain(|p| p.id != record.id);
        projects.push(record);
        Ok(())
    }
}

pub struct StubCodeEdit {
    pub result: CapabilityResult<String>,
    pub calls: AtomicUsize,
    pub instructions: Mutex<Vec<String>>,
}

impl StubCodeEdit {
    pub fn returning(result: CapabilityResult<String>) -> Self {
        Self { result, calls: AtomicUsize::new(0), instructions: Mutex::new(vec![]) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CodeEdit for StubCodeEdit {
    async fn modify(&self, _file_path: &Path, instruction: &str) -> CapabilityResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.instructions.lock().unwrap().push(instruction.to_string());
        self.result.clone()
    }

    async fn explain(&self, _file_path: &Path) -> CapabilityResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

#[derive(Default)]
pub struct StubEditor {
    pub active: Option<PathBuf>,
    pub written: Mutex<Vec<(PathBuf, String)>>,
    pub opened: Mutex<Vec<PathBuf>>,
}

impl StubEditor {
    pub fn with_file(path: &str) -> Self {
        Self { active: Some(PathBuf::from(path)), ..Default::default() }
    }
}

#[async_trait]
impl EditorSurface for StubEditor {
    fn active_file(&self) -> Option<PathBuf> {
        self.active.clone()
    }

    async fn replace_contents(&self, file_path: &Path, contents: &str) -> CapabilityResult<()> {
        self.written.lock().unwrap().push((file_path.to_path_buf(), contents.to_string()));
        Ok(())
    }

    async fn open_project(&self, project_path: &Path) -> CapabilityResult<()> {
        self.opened.lock().unwrap().push(project_path.to_path_buf());
        Ok(())
    }
}

/// All collaborators as concrete stubs so tests can inspect them afterwards.
pub struct Harness {
    pub completion: Arc<ScriptedCompletion>,
    pub search: Arc<StubSearch>,
    pub download: Arc<StubDownload>,
    pub projects: Arc<MemoryProjectStore>,
    pub code: Arc<StubCodeEdit>,
    pub editor: Arc<StubEditor>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            completion: Arc::new(ScriptedCompletion::default()),
            search: Arc::new(StubSearch::returning(vec![])),
            download: Arc::new(StubDownload::default()),
            projects: Arc::new(MemoryProjectStore::default()),
            code: Arc::new(StubCodeEdit::returning(Ok("fn main() {}".to_string()))),
            editor: Arc::new(StubEditor::default()),
        }
    }

    pub fn settings() -> Settings {
        Settings {
            download_path: Some(PathBuf::from("/downloads")),
            ..Settings::default()
        }
    }

    pub fn intents(&self) -> IntentService {
        IntentService::new(self.completion.clone())
    }

    pub fn dispatcher(&self) -> Dispatcher {
        let collaborators = Collaborators {
            search: self.search.clone(),
            download: self.download.clone(),
            projects: self.projects.clone(),
            code: self.code.clone(),
            editor: self.editor.clone(),
        };
        Dispatcher::new(collaborators, self.intents(), Arc::new(StaticConfig(Self::settings())))
    }
}
