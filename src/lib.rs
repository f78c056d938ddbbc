//! Storycard is a deterministic story-card and poster compositing engine.
//!
//! One layout description, expressed against a 1080 px wide reference design, serves a live
//! preview at any width and three pixel-exact canonical export sizes:
//!
//! - Describe a card as a [`PosterState`] (one tagged variant per template)
//! - Drive a [`PreviewController`]: mutate inputs, [`pump`](PreviewController::pump) redraws
//! - [`export`](PreviewController::export) a PNG [`ExportArtifact`] once name and photo are set
//!
//! The lower layers are public too: [`compose`] turns state into a [`FramePlan`] and
//! [`CpuRasterizer`] turns a plan into a [`FrameRGBA`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compose;
mod config;
mod export;
mod foundation;
mod layout;
mod model;
mod render;
mod session;
mod text;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{CardError, CardResult};

pub use crate::assets::decode::{
    AssetImage, PreparedImage, PreparedSvg, crop_and_resample, decode_asset, decode_image,
    parse_svg, resample,
};
pub use crate::assets::loader::{
    AssetLoader, AssetManifest, FixedAssets, FixedSlot, LoadedAssets, SDG_ICON_COUNT,
};
pub use crate::assets::photo::{PhotoAsset, PhotoSlot};
pub use crate::assets::source::{
    AssetSource, FsAssetSource, MemoryAssetSource, normalize_rel_path,
};
pub use crate::compose::compositor::{ATTRIBUTION_LABEL, PLEDGE_DEFAULT_TITLE, compose};
pub use crate::compose::cover::{CoverFit, cover_fit};
pub use crate::compose::leaf::leaf_path;
pub use crate::compose::plan::{DrawOp, FramePlan, GradientAxis, Layer, PlannedOp};
pub use crate::config::{
    ASSETS_DIR_ENV, CardConfig, DEFAULT_PREVIEW_WIDTH, DEFAULT_SITE_URL, MAX_PREVIEW_WIDTH,
};
pub use crate::export::artifact::ExportArtifact;
pub use crate::export::naming::{FALLBACK_SLUG, SLUG_MAX_CHARS, file_name_for, slugify};
pub use crate::export::png::{encode_png, encoded_dimensions};
pub use crate::layout::table::{
    LayoutScale, LayoutTable, Metrics, PosterSize, REFERENCE_WIDTH, TemplateBlocks, TemplateKind,
    TemplateStyle, TextBlockSpec,
};
pub use crate::model::form::{
    EXPORT_BLOCKED_MESSAGE, ExportGate, NAME_MAX_CHARS, NameError, clamp_name_input,
    validate_name,
};
pub use crate::model::state::{
    BackgroundKind, CallToAction, CampaignContent, EventContent, ImpactContent, PledgeContent,
    PosterState, QuoteContent, TemplateContent,
};
pub use crate::render::backend::Rasterizer;
pub use crate::render::cpu::CpuRasterizer;
pub use crate::render::frame::FrameRGBA;
pub use crate::session::controller::{PassOutcome, PreviewController, RenderTicket};
pub use crate::text::font::{FontSpec, FontWeight, ShapedLine, TextBrushRgba8, TextEngine};
pub use crate::text::wrap::{
    ELLIPSIS, TextBlock, TextMeasure, clamp_lines, layout_block, wrap_to_width,
};
