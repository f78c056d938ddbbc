use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::assets::loader::{AssetManifest, SDG_ICON_COUNT};
use crate::assets::source::{AssetSource, FsAssetSource, normalize_rel_path};
use crate::foundation::error::{CardError, CardResult};
use crate::text::font::{FontWeight, TextEngine};

/// Environment variable that replaces [`CardConfig::assets_root`].
pub const ASSETS_DIR_ENV: &str = "STORYCARD_ASSETS_DIR";

/// Default footer URL.
pub const DEFAULT_SITE_URL: &str = "plantforthegoals.org";

/// Default live-preview width in pixels.
pub const DEFAULT_PREVIEW_WIDTH: u32 = 540;

/// Largest accepted preview width.
pub const MAX_PREVIEW_WIDTH: u32 = 4096;

/// Engine configuration: where assets live and how the footer and preview look.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardConfig {
    /// Directory logical asset paths resolve against.
    pub assets_root: PathBuf,
    /// Site logo.
    pub logo: String,
    /// SDG icon row, left to right; exactly seven entries.
    pub sdg_icons: Vec<String>,
    /// Optional UN-logo badge.
    pub un_badge: Option<String>,
    /// Regular-weight font file.
    pub font_regular: Option<String>,
    /// Bold-weight font file.
    pub font_bold: Option<String>,
    /// URL printed in the footer.
    pub site_url: String,
    /// Live preview surface width.
    pub preview_width: u32,
    /// Default directory for exported files.
    pub export_dir: PathBuf,
}

impl Default for CardConfig {
    fn default() -> Self {
        let manifest = AssetManifest::default();
        Self {
            assets_root: PathBuf::from("assets"),
            logo: manifest.logo,
            sdg_icons: manifest.sdg_icons,
            un_badge: manifest.un_badge,
            font_regular: None,
            font_bold: None,
            site_url: DEFAULT_SITE_URL.to_string(),
            preview_width: DEFAULT_PREVIEW_WIDTH,
            export_dir: PathBuf::from("exports"),
        }
    }
}

impl CardConfig {
    /// Load a JSON config, apply environment overrides and validate.
    ///
    /// A relative `assets_root` resolves against the config file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> CardResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg: CardConfig =
            serde_json::from_slice(&bytes).map_err(|e| CardError::serde(e.to_string()))?;
        if cfg.assets_root.is_relative()
            && let Some(dir) = path.parent()
        {
            cfg.assets_root = dir.join(&cfg.assets_root);
        }
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Replace `assets_root` from [`ASSETS_DIR_ENV`] when set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Some(dir) = std::env::var_os(ASSETS_DIR_ENV).filter(|v| !v.is_empty()) {
            tracing::debug!(dir = ?dir, "assets root overridden from environment");
            self.assets_root = PathBuf::from(dir);
        }
    }

    /// Check icon count, preview width and the shape of every logical path.
    pub fn validate(&self) -> CardResult<()> {
        if self.sdg_icons.len() != SDG_ICON_COUNT {
            return Err(CardError::validation(format!(
                "sdg_icons must list exactly {SDG_ICON_COUNT} paths, got {}",
                self.sdg_icons.len()
            )));
        }
        if !(1..=MAX_PREVIEW_WIDTH).contains(&self.preview_width) {
            return Err(CardError::validation(format!(
                "preview_width must be in 1..={MAX_PREVIEW_WIDTH}, got {}",
                self.preview_width
            )));
        }
        let paths = std::iter::once(&self.logo)
            .chain(&self.sdg_icons)
            .chain(&self.un_badge)
            .chain(&self.font_regular)
            .chain(&self.font_bold);
        for p in paths {
            normalize_rel_path(p)?;
        }
        Ok(())
    }

    /// Fixed asset paths for the loader.
    pub fn manifest(&self) -> AssetManifest {
        AssetManifest {
            logo: self.logo.clone(),
            sdg_icons: self.sdg_icons.clone(),
            un_badge: self.un_badge.clone(),
        }
    }

    /// Filesystem source rooted at `assets_root`.
    pub fn asset_source(&self) -> Arc<dyn AssetSource> {
        Arc::new(FsAssetSource::new(self.assets_root.clone()))
    }

    /// Text engine with the configured fonts, falling back to system faces for missing weights.
    pub fn text_engine(&self, source: &dyn AssetSource) -> TextEngine {
        let mut engine = TextEngine::new();
        let wanted = [
            (FontWeight::Regular, self.font_regular.as_deref()),
            (FontWeight::Bold, self.font_bold.as_deref()),
        ];
        for (weight, path) in wanted {
            let Some(path) = path else { continue };
            let res = source
                .fetch(path)
                .and_then(|bytes| engine.register_font(bytes, weight));
            match res {
                Ok(family) => tracing::debug!(?weight, %family, "font registered"),
                Err(err) => tracing::warn!(?weight, path, %err, "configured font unavailable"),
            }
        }
        engine.load_system_fallback();
        if !engine.has_fonts() {
            tracing::warn!("no font available, text will be skipped");
        }
        engine
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
