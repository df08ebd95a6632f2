/// Preview surface that writes the markup to a file and opens it in the browser.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use markpad_core::PreviewSurface;

/// File name of the rendered preview inside the data directory.
const PREVIEW_FILE: &str = "preview.html";

#[derive(Debug, Clone)]
pub struct BrowserPreview {
    path: PathBuf,
}

impl BrowserPreview {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(PREVIEW_FILE),
        }
    }
}

impl PreviewSurface for BrowserPreview {
    fn open_preview(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        opener::open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        tracing::debug!("Opened preview at {}", self.path.display());
        Ok(())
    }
}
