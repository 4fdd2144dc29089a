//! Service store for loading and saving service files.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::paths::{DEFAULT_SERVICE_FILES, ServiceFormat, discover_service_file};
use super::{ServiceConfig, parser};

#[derive(Debug, Clone)]
pub struct ServiceStore {
    path: PathBuf,
    format: ServiceFormat,
}

impl ServiceStore {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = ServiceFormat::from_path(&path);
        Self { path, format }
    }

    /// Locate the service file in `project_root`.
    pub fn discover(project_root: &Path) -> anyhow::Result<Self> {
        discover_service_file(project_root)
            .map(Self::from_path)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No service file found in {} (looked for {})",
                    project_root.display(),
                    DEFAULT_SERVICE_FILES.join(", ")
                )
            })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ServiceFormat {
        self.format
    }

    pub fn load(&self) -> anyhow::Result<ServiceConfig> {
        if !self.path.exists() {
            anyhow::bail!("Service file not found: {}", self.path.display());
        }
        parser::parse_service_file(&self.path)
    }

    pub fn save(&self, config: &ServiceConfig) -> anyhow::Result<()> {
        let content = match self.format {
            ServiceFormat::Toml => parser::to_toml(config),
            ServiceFormat::Json => parser::to_json(config),
        }
        .context("Failed to serialize service")?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create service directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.path, content).with_context(|| {
            format!("Failed to write service file: {}", self.path.display())
        })?;
        Ok(())
    }
}
