use crate::capabilities::EditorSurface;
use crate::config::ConfigProvider;
use crate::error::CapabilityResult;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::info;

/// Editor stand-in for the terminal front end. The focused file is whatever
/// the user last selected with `:file`.
pub struct TerminalEditor {
    active: RwLock<Option<PathBuf>>,
    config: Arc<dyn ConfigProvider>,
}

impl TerminalEditor {
    pub fn new(config: Arc<dyn ConfigProvider>) -> Self {
        Self {
            active: RwLock::new(None),
            config,
        }
    }

    pub fn set_active_file(&self, path: Option<PathBuf>) {
        if let Ok(mut active) = self.active.write() {
            *active = path;
        }
    }
}

#[async_trait]
impl EditorSurface for TerminalEditor {
    fn active_file(&self) -> Option<PathBuf> {
        self.active.read().ok().and_then(|a| a.clone())
    }

    async fn replace_contents(&self, file_path: &Path, contents: &str) -> CapabilityResult<()> {
        tokio::fs::write(file_path, contents).await?;
        Ok(())
    }

    async fn open_project(&self, project_path: &Path) -> CapabilityResult<()> {
        let Some(command) = self.config.settings().editor_command else {
            info!("No editor command configured, project is at {}", project_path.display());
            return Ok(());
        };

        info!("Opening {} with {}", project_path.display(), command);
        // Detached: the editor outlives the turn.
        tokio::process::Command::new(&command).arg(project_path).spawn()?;
        Ok(())
    }
}
