use crate::assets::loader::LoadedAssets;
use crate::compose::plan::FramePlan;
use crate::foundation::error::CardResult;
use crate::render::frame::FrameRGBA;
use crate::text::font::TextEngine;

/// Executes a [`FramePlan`] into pixels.
pub trait Rasterizer {
    /// Render every op of `plan` onto a fresh surface of `plan.canvas`.
    fn render(
        &mut self,
        plan: &FramePlan,
        assets: &LoadedAssets,
        text: &mut TextEngine,
    ) -> CardResult<FrameRGBA>;
}
