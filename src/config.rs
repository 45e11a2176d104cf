use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_COMPLETION_URL: &str = "https://api.deepseek.com/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_MAX_SEARCH_RESULTS: u32 = 20;

const APP_DIR: &str = "gitpilot";

/// User settings. Keys are camelCase in `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub deepseek_api_key: Option<String>,
    pub github_token: Option<String>,
    pub max_search_results: u32,
    pub download_path: Option<PathBuf>,
    pub projects_file: Option<PathBuf>,
    pub completion_url: String,
    pub model: String,
    pub github_api_url: String,
    pub editor_command: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            deepseek_api_key: None,
            github_token: None,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            download_path: None,
            projects_file: None,
            completion_url: DEFAULT_COMPLETION_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            editor_command: None,
        }
    }
}

impl Settings {
    /// API key for the completion endpoint, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.deepseek_api_key.as_deref())
    }

    pub fn token(&self) -> Option<&str> {
        non_blank(self.github_token.as_deref())
    }

    /// Directory that receives cloned repositories.
    pub fn download_dir(&self) -> PathBuf {
        match &self.download_path {
            Some(path) => path.clone(),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("github-projects"),
        }
    }

    pub fn projects_path(&self) -> PathBuf {
        match &self.projects_file {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("downloaded-projects.json"),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Source of settings. Implementations are read on every call so credential
/// changes apply to the next request without a restart.
pub trait ConfigProvider: Send + Sync {
    fn settings(&self) -> Settings;
}

/// Fixed settings.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig(pub Settings);

impl ConfigProvider for StaticConfig {
    fn settings(&self) -> Settings {
        self.0.clone()
    }
}

/// Reads `config.toml` and then applies environment overrides.
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    path: Option<PathBuf>,
}

impl FileConfigProvider {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// `<config dir>/gitpilot/config.toml`
    pub fn default_location() -> Self {
        Self::new(dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml")))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ConfigProvider for FileConfigProvider {
    fn settings(&self) -> Settings {
        let mut settings = match self.path.as_deref() {
            Some(path) => load_file(path).unwrap_or_else(|e| {
                warn!("{}; using defaults", e);
                Settings::default()
            }),
            None => Settings::default(),
        };
        apply_env(&mut settings, |key| std::env::var(key).ok());
        settings
    }
}

/// Missing file is not an error, it just means defaults.
pub fn load_file(path: &Path) -> Result<Settings, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str(&text).map_err(|source| ConfigError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let first = |keys: &[&str]| keys.iter().find_map(|k| lookup(k).filter(|v| !v.trim().is_empty()));

    if let Some(key) = first(&["GITPILOT_DEEPSEEK_API_KEY", "DEEPSEEK_API_KEY"]) {
        settings.deepseek_api_key = Some(key);
    }
    if let Some(token) = first(&["GITPILOT_GITHUB_TOKEN", "GITHUB_TOKEN"]) {
        settings.github_token = Some(token);
    }
    if let Some(path) = first(&["GITPILOT_DOWNLOAD_PATH"]) {
        settings.download_path = Some(PathBuf::from(path));
    }
    if let Some(cmd) = first(&["GITPILOT_EDITOR"]) {
        settings.editor_command = Some(cmd);
    }
}
