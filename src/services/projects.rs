use crate::capabilities::{DownloadedProjectRecord, ProjectStore};
use crate::config::ConfigProvider;
use crate::error::{CapabilityError, CapabilityResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

#[derive(Clone)]
enum Location {
    Fixed(PathBuf),
    /// `projectsFile` from the settings, looked up on every call.
    Configured(Arc<dyn ConfigProvider>),
}

/// Downloaded-project list kept as one pretty-printed JSON array.
///
/// Every call reads the file again; there is no in-memory cache to go stale.
/// Reads for display are lenient, but read-modify-write refuses to touch a
/// file it cannot parse.
#[derive(Clone)]
pub struct JsonProjectStore {
    location: Location,
}

impl JsonProjectStore {
    pub fn new(path: PathBuf) -> Self {
        Self { location: Location::Fixed(path) }
    }

    /// Follows the configured `projectsFile`, so a changed setting applies to
    /// the next call.
    pub fn from_config(config: Arc<dyn ConfigProvider>) -> Self {
        Self { location: Location::Configured(config) }
    }

    pub fn path(&self) -> PathBuf {
        match &self.location {
            Location::Fixed(path) => path.clone(),
            Location::Configured(config) => config.settings().projects_path(),
        }
    }

    /// Missing file is an empty list; anything else unreadable is an error.
    async fn load_strict(&self, path: &Path) -> CapabilityResult<Vec<DownloadedProjectRecord>> {
        let text = match fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&text)?)
    }

    async fn load(&self) -> Vec<DownloadedProjectRecord> {
        let path = self.path();
        self.load_strict(&path).await.unwrap_or_else(|e| {
            warn!("Unusable project list {}: {}", path.display(), e);
            Vec::new()
        })
    }

    async fn save(&self, path: &Path, projects: &[DownloadedProjectRecord]) -> CapabilityResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }
        let json = serde_json::to_string_pretty(projects)?;
        fs::write(path, json).await?;
        Ok(())
    }

    /// Removes the local checkout and the list entry.
    pub async fn delete(&self, project_id: &str) -> CapabilityResult<()> {
        let path = self.path();
        let mut projects = self.load_strict(&path).await?;
        let index = projects
            .iter()
            .position(|p| p.id == project_id)
            .ok_or_else(|| CapabilityError::NotFound(format!("project {}", project_id)))?;
        let project = projects.remove(index);

        if fs::try_exists(&project.local_path).await? {
            fs::remove_dir_all(&project.local_path).await?;
        }
        info!("Deleted project {} ({})", project.full_name, project.local_path.display());
        self.save(&path, &projects).await
    }

    /// Whether the checkout is still on disk.
    pub async fn validate(&self, project: &DownloadedProjectRecord) -> bool {
        fs::try_exists(&project.local_path).await.unwrap_or(false)
    }

    pub async fn valid_projects(&self) -> Vec<DownloadedProjectRecord> {
        let mut valid = Vec::new();
        for project in self.load().await {
            if self.validate(&project).await {
                valid.push(project);
            }
        }
        valid
    }
}

#[async_trait]
impl ProjectStore for JsonProjectStore {
    async fn list_all(&self) -> CapabilityResult<Vec<DownloadedProjectRecord>> {
        Ok(self.load().await)
    }

    async fn upsert(&self, record: DownloadedProjectRecord) -> CapabilityResult<()> {
        let path = self.path();
        let mut projects = self.load_strict(&path).await?;
        match projects.iter_mut().find(|p| p.id == record.id) {
            Some(existing) => *existing = record,
            None => projects.push(record),
        }
        self.save(&path, &projects).await
    }
}
