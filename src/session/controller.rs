use std::sync::Arc;

use crate::assets::loader::{AssetLoader, LoadedAssets};
use crate::assets::photo::{PhotoAsset, PhotoSlot};
use crate::compose::compositor::compose;
use crate::config::CardConfig;
use crate::export::artifact::ExportArtifact;
use crate::export::naming::file_name_for;
use crate::export::png::{encode_png, encoded_dimensions};
use crate::foundation::core::Canvas;
use crate::foundation::error::{CardError, CardResult};
use crate::layout::table::{LayoutTable, PosterSize, TemplateKind};
use crate::model::form::{ExportGate, clamp_name_input};
use crate::model::state::{BackgroundKind, PosterState, TemplateContent};
use crate::render::backend::Rasterizer;
use crate::render::cpu::CpuRasterizer;
use crate::render::frame::FrameRGBA;
use crate::text::font::TextEngine;

/// Snapshot of everything one preview pass draws.
#[derive(Clone, Debug)]
pub struct RenderTicket {
    generation: u64,
    state: PosterState,
    canvas: Canvas,
    assets: LoadedAssets,
}

impl RenderTicket {
    /// Input generation this pass was scheduled for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Surface size of the pass.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// State captured when the pass began.
    pub fn state(&self) -> &PosterState {
        &self.state
    }
}

/// Result of handing a finished pass back to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    /// The frame is now the visible preview.
    Committed,
    /// Newest pass, but pixel-identical to the visible preview.
    Unchanged,
    /// Superseded by a newer input; the frame is dropped.
    Discarded,
}

#[derive(Debug)]
struct Committed {
    generation: u64,
    fingerprint: u64,
    frame: FrameRGBA,
}

/// Owns the poster state and photo, schedules preview redraws and produces exports.
///
/// Every mutation bumps a generation counter and marks the preview dirty; a pass only commits
/// if no newer mutation happened since it began.
pub struct PreviewController {
    state: PosterState,
    photo: PhotoSlot,
    table: Arc<LayoutTable>,
    loader: AssetLoader,
    text: TextEngine,
    rasterizer: Box<dyn Rasterizer>,
    site_url: String,
    surface_width: Option<u32>,
    generation: u64,
    dirty: bool,
    committed: Option<Committed>,
}

impl std::fmt::Debug for PreviewController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewController")
            .field("state", &self.state)
            .field("photo", &self.photo.is_set())
            .field("surface_width", &self.surface_width)
            .field("generation", &self.generation)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl PreviewController {
    /// Controller over injected collaborators, using the CPU rasterizer.
    pub fn new(
        table: Arc<LayoutTable>,
        loader: AssetLoader,
        text: TextEngine,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            state: PosterState::default(),
            photo: PhotoSlot::new(),
            table,
            loader,
            text,
            rasterizer: Box::new(CpuRasterizer::new()),
            site_url: site_url.into(),
            surface_width: None,
            generation: 1,
            dirty: true,
            committed: None,
        }
    }

    /// Controller wired from a validated config (filesystem assets, configured fonts).
    pub fn from_config(config: &CardConfig) -> CardResult<Self> {
        config.validate()?;
        let source = config.asset_source();
        let text = config.text_engine(source.as_ref());
        let loader = AssetLoader::new(source, config.manifest());
        Ok(Self::new(
            Arc::new(LayoutTable::standard()),
            loader,
            text,
            config.site_url.clone(),
        ))
    }

    /// Swap the rasterizer.
    pub fn with_rasterizer(mut self, rasterizer: Box<dyn Rasterizer>) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    /// Current state.
    pub fn state(&self) -> &PosterState {
        &self.state
    }

    /// Whether a photo is selected.
    pub fn has_photo(&self) -> bool {
        self.photo.is_set()
    }

    /// Monotonic input generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a redraw is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Last committed preview frame.
    pub fn preview(&self) -> Option<&FrameRGBA> {
        self.committed.as_ref().map(|c| &c.frame)
    }

    fn schedule(&mut self, reason: &'static str) {
        self.generation += 1;
        self.dirty = true;
        tracing::debug!(generation = self.generation, reason, "re-render scheduled");
    }

    /// Replace the whole state.
    pub fn set_state(&mut self, state: PosterState) {
        self.state = PosterState {
            name: clamp_name_input(&state.name),
            ..state
        };
        self.schedule("state");
    }

    /// Set the display name (form `maxlength` applied).
    pub fn set_name(&mut self, raw: &str) {
        self.state.name = clamp_name_input(raw);
        self.schedule("name");
    }

    /// Select the canonical output size.
    pub fn set_size(&mut self, size: PosterSize) {
        self.state.size = size;
        self.schedule("size");
    }

    /// Switch template; fields reset to the new template's empty content.
    pub fn set_template(&mut self, kind: TemplateKind) {
        if self.state.template() != kind {
            self.state.content = TemplateContent::empty(kind);
        }
        self.schedule("template");
    }

    /// Override the background, or `None` for the template default.
    pub fn set_background(&mut self, background: Option<BackgroundKind>) {
        self.state.background = background;
        self.schedule("background");
    }

    /// Replace every template field (may also switch template).
    pub fn update_content(&mut self, content: TemplateContent) {
        self.state.content = content;
        self.schedule("content");
    }

    /// Decode and install a new photo, releasing the previous one.
    ///
    /// On a decode error the current photo is kept and nothing is scheduled.
    pub fn select_photo(&mut self, bytes: &[u8]) -> CardResult<()> {
        let photo = PhotoAsset::decode(bytes)?;
        self.install_photo(photo);
        Ok(())
    }

    /// Install an already decoded photo, releasing the previous one.
    pub fn install_photo(&mut self, photo: PhotoAsset) {
        self.photo.replace(photo);
        self.schedule("photo");
    }

    /// Release the photo.
    pub fn clear_photo(&mut self) {
        self.photo.clear();
        self.schedule("photo cleared");
    }

    /// Attach a preview surface `width_px` wide; its height follows the selected size.
    pub fn attach_surface(&mut self, width_px: u32) -> CardResult<()> {
        self.preview_canvas_for(width_px, self.state.size)?;
        self.surface_width = Some(width_px);
        self.dirty = true;
        Ok(())
    }

    /// Drop the preview surface; passes become no-ops until re-attached.
    pub fn detach_surface(&mut self) {
        self.surface_width = None;
        self.committed = None;
    }

    fn preview_canvas_for(&self, width: u32, size: PosterSize) -> CardResult<Canvas> {
        let full = self.table.canvas(size);
        let height = (f64::from(width) * f64::from(full.height) / f64::from(full.width)).round();
        Canvas::new(width, height.max(1.0) as u32)
    }

    /// Start a pass if one is pending and a surface exists.
    ///
    /// Without a surface the request stays pending for the next attempt.
    pub fn begin_pass(&mut self) -> Option<RenderTicket> {
        if !self.dirty {
            return None;
        }
        let Some(width) = self.surface_width else {
            tracing::debug!("surface unavailable, pass skipped");
            return None;
        };
        let canvas = match self.preview_canvas_for(width, self.state.size) {
            Ok(c) => c,
            Err(err) => {
                tracing::warn!(%err, "preview surface rejected");
                return None;
            }
        };
        self.dirty = false;
        Some(RenderTicket {
            generation: self.generation,
            state: self.state.clone(),
            canvas,
            assets: self.loader.load(self.photo.get()),
        })
    }

    /// Draw the ticket's snapshot onto a fresh surface.
    pub fn run_pass(&mut self, ticket: &RenderTicket) -> CardResult<FrameRGBA> {
        self.draw(&ticket.state, &ticket.assets, ticket.canvas)
    }

    /// Commit `frame` unless a newer input superseded the ticket.
    pub fn complete_pass(&mut self, ticket: RenderTicket, frame: FrameRGBA) -> PassOutcome {
        let newest_committed = self.committed.as_ref().map_or(0, |c| c.generation);
        if ticket.generation < self.generation || ticket.generation < newest_committed {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "stale pass discarded"
            );
            return PassOutcome::Discarded;
        }

        let fingerprint = frame.fingerprint();
        if let Some(c) = self.committed.as_mut()
            && c.fingerprint == fingerprint
        {
            c.generation = ticket.generation;
            return PassOutcome::Unchanged;
        }
        self.committed = Some(Committed {
            generation: ticket.generation,
            fingerprint,
            frame,
        });
        tracing::debug!(generation = ticket.generation, "preview committed");
        PassOutcome::Committed
    }

    /// Run at most one full pass; `None` when nothing was pending or no surface is attached.
    pub fn pump(&mut self) -> CardResult<Option<PassOutcome>> {
        let Some(ticket) = self.begin_pass() else {
            return Ok(None);
        };
        let frame = match self.run_pass(&ticket) {
            Ok(frame) => frame,
            Err(err) => {
                self.dirty = true;
                return Err(err);
            }
        };
        Ok(Some(self.complete_pass(ticket, frame)))
    }

    /// Whether export is currently allowed.
    pub fn export_gate(&self) -> ExportGate {
        ExportGate::evaluate(&self.state.name, self.photo.is_set())
    }

    /// Render the canonical-size artifact for the current state.
    ///
    /// Always draws into a fresh surface at the exact published dimensions, independent of the
    /// preview surface.
    #[tracing::instrument(level = "debug", skip(self), fields(size = self.state.size.as_str()))]
    pub fn export(&mut self) -> CardResult<ExportArtifact> {
        if let Some(reason) = self.export_gate().message() {
            return Err(CardError::validation(reason));
        }
        let state = self.state.clone();
        let canvas = self.table.canvas(state.size);
        let assets = self.loader.load(self.photo.get());
        let frame = self.draw(&state, &assets, canvas)?;
        if (frame.width, frame.height) != (canvas.width, canvas.height) {
            return Err(CardError::render(format!(
                "rendered {}x{}, expected {}x{}",
                frame.width, frame.height, canvas.width, canvas.height
            )));
        }

        let bytes = encode_png(&frame)?;
        let (width, height) = encoded_dimensions(&bytes)?;
        if (width, height) != (canvas.width, canvas.height) {
            return Err(CardError::export(format!(
                "encoded {width}x{height}, expected {}x{}",
                canvas.width, canvas.height
            )));
        }

        let label = state
            .content
            .title()
            .map(str::to_string)
            .unwrap_or_else(|| state.name.trim().to_string());
        let artifact = ExportArtifact {
            file_name: file_name_for(&label, state.size),
            width,
            height,
            bytes,
        };
        tracing::debug!(file = %artifact.file_name, bytes = artifact.bytes.len(), "export ready");
        Ok(artifact)
    }

    /// Render the current state at an arbitrary width, bypassing the export gate.
    pub fn render_at_width(&mut self, width_px: u32) -> CardResult<FrameRGBA> {
        let state = self.state.clone();
        let canvas = self.preview_canvas_for(width_px, state.size)?;
        let assets = self.loader.load(self.photo.get());
        self.draw(&state, &assets, canvas)
    }

    fn draw(
        &mut self,
        state: &PosterState,
        assets: &LoadedAssets,
        canvas: Canvas,
    ) -> CardResult<FrameRGBA> {
        let plan = compose(
            state,
            assets,
            &self.table,
            &self.site_url,
            &mut self.text,
            canvas,
        );
        self.rasterizer.render(&plan, assets, &mut self.text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;
