use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{CardError, CardResult};

/// Resolves stable logical asset paths to raw bytes.
pub trait AssetSource: Send + Sync {
    /// Fetch the bytes stored under `logical_path`.
    fn fetch(&self, logical_path: &str) -> CardResult<Vec<u8>>;
}

/// Filesystem-backed source rooted at a directory.
#[derive(Clone, Debug)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    /// Source resolving logical paths under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory used when resolving relative asset paths.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FsAssetSource {
    fn fetch(&self, logical_path: &str) -> CardResult<Vec<u8>> {
        let norm = normalize_rel_path(logical_path)?;
        let path = self.root.join(Path::new(&norm));
        std::fs::read(&path)
            .with_context(|| format!("read asset bytes from '{}'", path.display()))
            .map_err(CardError::from)
    }
}

/// In-memory source keyed by normalized logical path.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssetSource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under `logical_path`.
    pub fn insert(&mut self, logical_path: &str, bytes: Vec<u8>) -> CardResult<()> {
        self.files.insert(normalize_rel_path(logical_path)?, bytes);
        Ok(())
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch(&self, logical_path: &str) -> CardResult<Vec<u8>> {
        let norm = normalize_rel_path(logical_path)?;
        self.files
            .get(&norm)
            .cloned()
            .ok_or_else(|| CardError::validation(format!("no asset stored at '{norm}'")))
    }
}

/// Normalize and validate logical asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> CardResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(CardError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(CardError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CardError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CardError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
