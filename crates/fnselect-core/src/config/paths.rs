//! Service file path resolution helpers.

use std::path::{Path, PathBuf};

/// File names tried, in order, when no explicit service file is given.
pub const DEFAULT_SERVICE_FILES: [&str; 2] = ["service.toml", "service.json"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFormat {
    Toml,
    Json,
}

impl ServiceFormat {
    /// Format implied by the file extension. Anything but `.json` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ServiceFormat::Json,
            _ => ServiceFormat::Toml,
        }
    }
}

pub fn discover_service_file(project_root: &Path) -> Option<PathBuf> {
    DEFAULT_SERVICE_FILES
        .iter()
        .map(|name| project_root.join(name))
        .find(|path| path.is_file())
}
