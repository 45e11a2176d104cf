use crate::capabilities::RepositoryDownload;
use crate::error::{CapabilityError, CapabilityResult};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::info;

/// Clones with the system `git` binary.
#[derive(Debug, Clone)]
pub struct GitCloner {
    program: String,
}

impl Default for GitCloner {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCloner {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

#[async_trait]
impl RepositoryDownload for GitCloner {
    async fn clone_repository(&self, source_url: &str, destination: &Path) -> CapabilityResult<()> {
        if tokio::fs::try_exists(destination).await? {
            return Err(CapabilityError::AlreadyExists(destination.to_path_buf()));
        }
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        info!("Cloning {} into {}", source_url, destination.display());
        let output = Command::new(&self.program)
            .arg("clone")
            .arg(source_url)
            .arg(destination)
            .kill_on_drop(true)
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(CapabilityError::Network(format!("git clone failed: {}", stderr.trim())))
        }
    }
}
