//! Preview surface for generated markup.
//!
//! The surface is a standalone document. Isolation comes from the host that opens it
//! (the system browser); nothing here parses or executes the content.

use std::path::{Path, PathBuf};

pub const PREVIEW_FILE_NAME: &str = "prototype.html";

/// Replaces the surface content with a new document on every render. Never reports errors.
pub trait PreviewRenderer: Send {
    fn render(&mut self, document: &str);

    /// Where the surface can be opened from, if it lives outside the process.
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// One document per render at `<dir>/prototype.html`, truncated on each render.
#[derive(Debug, Clone)]
pub struct FilePreview {
    path: PathBuf,
}

impl FilePreview {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(PREVIEW_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, document: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, document)
    }
}

impl PreviewRenderer for FilePreview {
    fn render(&mut self, document: &str) {
        match self.write(document) {
            Ok(()) => tracing::debug!(path = %self.path.display(), bytes = document.len(), "preview rendered"),
            Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "preview render failed"),
        }
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// In-memory surface: keeps the current document and counts renders.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreview {
    document: Option<String>,
    renders: usize,
}

impl MemoryPreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn render_count(&self) -> usize {
        self.renders
    }
}

impl PreviewRenderer for MemoryPreview {
    fn render(&mut self, document: &str) {
        self.document = Some(document.to_string());
        self.renders += 1;
    }
}
