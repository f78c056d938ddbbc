use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::CardResult;

/// An encoded export ready to be saved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Filesystem-safe file name, `{slug}-{size}.png`.
    pub file_name: String,
    /// Pixel width of the encoded image.
    pub width: u32,
    /// Pixel height of the encoded image.
    pub height: u32,
    /// PNG bytes.
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Write the artifact into `dir` (created if missing) and return the full path.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> CardResult<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create export dir '{}'", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("write export '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = self.bytes.len(), "export written");
        Ok(path)
    }
}
