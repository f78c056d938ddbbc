use std::sync::{Arc, OnceLock};

use rayon::prelude::*;

use crate::assets::decode::{AssetImage, PreparedImage, decode_asset};
use crate::assets::photo::PhotoAsset;
use crate::assets::source::AssetSource;
use crate::foundation::error::CardResult;

/// Number of icons in the SDG row.
pub const SDG_ICON_COUNT: usize = 7;

/// Logical paths of the fixed decorative assets.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssetManifest {
    /// Site logo.
    pub logo: String,
    /// SDG icon row, left to right.
    pub sdg_icons: Vec<String>,
    /// Optional UN-logo badge.
    #[serde(default)]
    pub un_badge: Option<String>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            logo: "logo.png".to_string(),
            sdg_icons: [2, 6, 7, 11, 13, 15, 17]
                .iter()
                .map(|goal| format!("sdg/goal-{goal:02}.png"))
                .collect(),
            un_badge: Some("un-logo.png".to_string()),
        }
    }
}

/// Addressable fixed asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FixedSlot {
    /// Site logo.
    Logo,
    /// SDG icon at row position.
    Icon(usize),
    /// UN-logo badge.
    UnBadge,
}

/// Decoded fixed assets; every slot may be absent.
#[derive(Clone, Debug)]
pub struct FixedAssets {
    /// Site logo.
    pub logo: Option<AssetImage>,
    /// SDG icons, always [`SDG_ICON_COUNT`] slots.
    pub icons: Vec<Option<AssetImage>>,
    /// UN-logo badge.
    pub un_badge: Option<AssetImage>,
}

impl FixedAssets {
    /// No decorative assets at all.
    pub fn empty() -> Self {
        Self {
            logo: None,
            icons: vec![None; SDG_ICON_COUNT],
            un_badge: None,
        }
    }

    /// Lookup one slot.
    pub fn get(&self, slot: FixedSlot) -> Option<&AssetImage> {
        match slot {
            FixedSlot::Logo => self.logo.as_ref(),
            FixedSlot::Icon(i) => self.icons.get(i).and_then(Option::as_ref),
            FixedSlot::UnBadge => self.un_badge.as_ref(),
        }
    }

    /// Number of icons that decoded.
    pub fn icons_present(&self) -> usize {
        self.icons.iter().filter(|i| i.is_some()).count()
    }
}

/// Everything one render pass may draw.
#[derive(Clone, Debug)]
pub struct LoadedAssets {
    /// Shared decorative assets.
    pub fixed: Arc<FixedAssets>,
    /// The user's photo, fully decoded.
    pub photo: Option<Arc<PreparedImage>>,
}

impl LoadedAssets {
    /// Assets with only a photo (or nothing).
    pub fn photo_only(photo: Option<Arc<PreparedImage>>) -> Self {
        Self {
            fixed: Arc::new(FixedAssets::empty()),
            photo,
        }
    }
}

/// Resolves and decodes the fixed asset set once, then pairs it with the current photo.
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    manifest: AssetManifest,
    fixed: OnceLock<Arc<FixedAssets>>,
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("manifest", &self.manifest)
            .field("loaded", &self.fixed.get().is_some())
            .finish()
    }
}

impl AssetLoader {
    /// Loader for `manifest` entries fetched through `source`.
    pub fn new(source: Arc<dyn AssetSource>, manifest: AssetManifest) -> Self {
        Self {
            source,
            manifest,
            fixed: OnceLock::new(),
        }
    }

    /// Decode every fixed asset concurrently and join.
    ///
    /// Failures degrade to an absent slot; nothing here can fail the pass.
    #[tracing::instrument(skip(self))]
    pub fn load_fixed(&self) -> FixedAssets {
        let mut jobs: Vec<(FixedSlot, &str)> = vec![(FixedSlot::Logo, self.manifest.logo.as_str())];
        for (i, path) in self.manifest.sdg_icons.iter().take(SDG_ICON_COUNT).enumerate() {
            jobs.push((FixedSlot::Icon(i), path.as_str()));
        }
        if let Some(path) = &self.manifest.un_badge {
            jobs.push((FixedSlot::UnBadge, path.as_str()));
        }

        let decoded: Vec<(FixedSlot, Option<AssetImage>)> = jobs
            .par_iter()
            .map(|(slot, path)| (*slot, self.load_optional(*slot, path)))
            .collect();

        let mut out = FixedAssets::empty();
        for (slot, img) in decoded {
            match slot {
                FixedSlot::Logo => out.logo = img,
                FixedSlot::Icon(i) => out.icons[i] = img,
                FixedSlot::UnBadge => out.un_badge = img,
            }
        }
        tracing::debug!(
            logo = out.logo.is_some(),
            icons = out.icons_present(),
            un_badge = out.un_badge.is_some(),
            "fixed assets ready"
        );
        out
    }

    fn load_optional(&self, slot: FixedSlot, path: &str) -> Option<AssetImage> {
        let res: CardResult<AssetImage> = self
            .source
            .fetch(path)
            .and_then(|bytes| decode_asset(path, &bytes));
        match res {
            Ok(img) => Some(img),
            Err(err) => {
                tracing::warn!(?slot, path, %err, "decorative asset unavailable, omitting");
                None
            }
        }
    }

    /// Assets for one pass: cached fixed set plus the (already decoded) photo.
    pub fn load(&self, photo: Option<&PhotoAsset>) -> LoadedAssets {
        let fixed = self
            .fixed
            .get_or_init(|| Arc::new(self.load_fixed()))
            .clone();
        LoadedAssets {
            fixed,
            photo: photo.map(PhotoAsset::image),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
