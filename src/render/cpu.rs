use std::collections::HashMap;
use std::sync::Arc;

use kurbo::Shape;

use crate::assets::decode::{PreparedImage, crop_and_resample};
use crate::assets::loader::{FixedAssets, FixedSlot, LoadedAssets};
use crate::compose::cover::CoverFit;
use crate::compose::plan::{DrawOp, FramePlan, GradientAxis};
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{CardError, CardResult};
use crate::render::backend::Rasterizer;
use crate::render::frame::FrameRGBA;
use crate::render::paint::{image_paint, linear_gradient_pixels, radial_glow_pixels};
use crate::text::font::{FontSpec, TextEngine};

const PATH_TOLERANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    from: [u8; 4],
    to: [u8; 4],
    axis: GradientAxis,
    w: u32,
    h: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GlowKey {
    color: [u8; 4],
    radius_bits: u64,
}

struct CoverCache {
    photo: Arc<PreparedImage>,
    canvas: Canvas,
    paint: vello_cpu::Image,
}

/// Software rasterizer backed by `vello_cpu`.
///
/// Each render draws into a fresh pixmap; decoded paints are cached across renders and keyed by
/// the exact draw size so repeated previews only pay for geometry.
#[derive(Default)]
pub struct CpuRasterizer {
    ctx: Option<vello_cpu::RenderContext>,
    fixed_for: Option<Arc<FixedAssets>>,
    image_cache: HashMap<(FixedSlot, u32, u32), vello_cpu::Image>,
    cover_cache: Option<CoverCache>,
    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
    glow_cache: HashMap<GlowKey, (u32, vello_cpu::Image)>,
    font_cache: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl std::fmt::Debug for CpuRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRasterizer")
            .field("images", &self.image_cache.len())
            .field("gradients", &self.gradient_cache.len())
            .field("fonts", &self.font_cache.len())
            .finish()
    }
}

impl CpuRasterizer {
    /// Rasterizer with empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> CardResult<R>,
    ) -> CardResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn sync_fixed(&mut self, fixed: &Arc<FixedAssets>) {
        if self.fixed_for.as_ref().is_some_and(|f| Arc::ptr_eq(f, fixed)) {
            return;
        }
        self.image_cache.clear();
        self.fixed_for = Some(fixed.clone());
    }

    /// Drop the cached cover paint unless it belongs to the photo of this pass.
    fn sync_photo(&mut self, photo: Option<&Arc<PreparedImage>>) {
        let keep = match (&self.cover_cache, photo) {
            (Some(hit), Some(photo)) => Arc::ptr_eq(&hit.photo, photo),
            _ => false,
        };
        if !keep {
            self.cover_cache = None;
        }
    }

    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
        canvas: Canvas,
        assets: &LoadedAssets,
        text: &mut TextEngine,
    ) -> CardResult<()> {
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::Clear(color) => {
                if color.a > 0 {
                    ctx.set_paint(solid(*color));
                    ctx.fill_rect(&rect_to_cpu(canvas.rect()));
                }
            }
            DrawOp::FillRect { rect, color } => {
                ctx.set_paint(solid(*color));
                ctx.fill_rect(&rect_to_cpu(*rect));
            }
            DrawOp::LinearGradient {
                rect,
                axis,
                from,
                to,
            } => {
                let (w, h) = pixel_size(*rect);
                let paint = self.gradient_paint(*axis, *from, *to, w, h)?;
                fill_image(ctx, paint, (w, h), *rect);
            }
            DrawOp::CoverPhoto { fit } => {
                let Some(photo) = assets.photo.as_ref() else {
                    tracing::warn!("cover photo planned without a photo");
                    return Ok(());
                };
                let paint = self.cover_paint(photo, fit, canvas)?;
                ctx.set_paint(paint);
                ctx.fill_rect(&rect_to_cpu(canvas.rect()));
            }
            DrawOp::RadialGlow {
                center,
                radius,
                color,
                opacity,
            } => {
                let (side, paint) = self.glow_paint(*radius, *color)?;
                let half = f64::from(side) / 2.0;
                let rect = Rect::new(
                    center.x - half,
                    center.y - half,
                    center.x + half,
                    center.y + half,
                );
                if *opacity < 1.0 {
                    ctx.push_opacity_layer(*opacity);
                }
                fill_image(ctx, paint, (side, side), rect);
                if *opacity < 1.0 {
                    ctx.pop_layer();
                }
            }
            DrawOp::RoundedRect {
                rect,
                radius,
                color,
            } => {
                let path = kurbo::RoundedRect::from_rect(*rect, *radius).to_path(PATH_TOLERANCE);
                ctx.set_paint(solid(*color));
                ctx.fill_path(&bezpath_to_cpu(&path));
            }
            DrawOp::Image { slot, rect } => {
                let (w, h) = pixel_size(*rect);
                match self.image_paint_for(&assets.fixed, *slot, w, h) {
                    Ok(Some(paint)) => fill_image(ctx, paint, (w, h), *rect),
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(?slot, %err, "decorative asset failed to rasterize, omitting");
                    }
                }
            }
            DrawOp::Text {
                text: content,
                origin,
                font,
                color,
                height,
                ..
            } => self.draw_text(ctx, text, content, *origin, *font, *color, *height),
            DrawOp::Path { path, color } => {
                ctx.set_paint(solid(*color));
                ctx.fill_path(&bezpath_to_cpu(path));
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        engine: &mut TextEngine,
        content: &str,
        origin: Point,
        font: FontSpec,
        color: Rgba8,
        box_height: f64,
    ) {
        let Some(shaped) = engine.shape_line(content, &font, color) else {
            tracing::trace!(text = content, "no font available, text skipped");
            return;
        };
        let top = origin.y + (box_height - f64::from(shaped.layout.height())) / 2.0;
        ctx.set_transform(affine_to_cpu(Affine::translate((origin.x, top))));

        for line in shaped.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let face = run.run().font();
                let font_data = self.font_data(face.data.id(), face.data.data(), face.index);
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let mut x = run.offset();
                let baseline = run.baseline();
                let glyphs = run.glyphs().map(|g| {
                    let glyph = vello_cpu::Glyph {
                        id: g.id,
                        x: x + g.x,
                        y: baseline - g.y,
                    };
                    x += g.advance;
                    glyph
                });
                ctx.glyph_run(&font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Face `index` of the blob `blob_id`, copied into a raster font once.
    fn font_data(&mut self, blob_id: u64, bytes: &[u8], index: u32) -> vello_cpu::peniko::FontData {
        self.font_cache
            .entry((blob_id, index))
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(bytes.to_vec()),
                    index,
                )
            })
            .clone()
    }

    fn gradient_paint(
        &mut self,
        axis: GradientAxis,
        from: Rgba8,
        to: Rgba8,
        w: u32,
        h: u32,
    ) -> CardResult<vello_cpu::Image> {
        let key = GradientKey {
            from: [from.r, from.g, from.b, from.a],
            to: [to.r, to.g, to.b, to.a],
            axis,
            w,
            h,
        };
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok(img);
        }
        let bytes = linear_gradient_pixels(w, h, axis, from, to);
        let img = image_paint(&bytes, w, h)?;
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }

    fn glow_paint(&mut self, radius: f64, color: Rgba8) -> CardResult<(u32, vello_cpu::Image)> {
        let key = GlowKey {
            color: [color.r, color.g, color.b, color.a],
            radius_bits: radius.to_bits(),
        };
        if let Some(hit) = self.glow_cache.get(&key).cloned() {
            return Ok(hit);
        }
        let (side, bytes) = radial_glow_pixels(radius, color);
        let img = image_paint(&bytes, side, side)?;
        self.glow_cache.insert(key, (side, img.clone()));
        Ok((side, img))
    }

    fn cover_paint(
        &mut self,
        photo: &Arc<PreparedImage>,
        fit: &CoverFit,
        canvas: Canvas,
    ) -> CardResult<vello_cpu::Image> {
        if let Some(hit) = &self.cover_cache
            && Arc::ptr_eq(&hit.photo, photo)
            && hit.canvas == canvas
        {
            return Ok(hit.paint.clone());
        }
        let crop = fit.crop_px(photo.width, photo.height);
        let scaled = crop_and_resample(photo, crop, canvas)?;
        let paint = image_paint(&scaled.rgba8_premul, scaled.width, scaled.height)?;
        self.cover_cache = Some(CoverCache {
            photo: photo.clone(),
            canvas,
            paint: paint.clone(),
        });
        Ok(paint)
    }

    fn image_paint_for(
        &mut self,
        fixed: &FixedAssets,
        slot: FixedSlot,
        w: u32,
        h: u32,
    ) -> CardResult<Option<vello_cpu::Image>> {
        if let Some(img) = self.image_cache.get(&(slot, w, h)) {
            return Ok(Some(img.clone()));
        }
        let Some(asset) = fixed.get(slot) else {
            return Ok(None);
        };
        let bitmap = asset.bitmap(w, h)?;
        let img = image_paint(&bitmap.rgba8_premul, bitmap.width, bitmap.height)?;
        self.image_cache.insert((slot, w, h), img.clone());
        Ok(Some(img))
    }
}

impl Rasterizer for CpuRasterizer {
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(w = plan.canvas.width, h = plan.canvas.height, ops = plan.ops.len())
    )]
    fn render(
        &mut self,
        plan: &FramePlan,
        assets: &LoadedAssets,
        text: &mut TextEngine,
    ) -> CardResult<FrameRGBA> {
        let canvas = plan.canvas;
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| CardError::render("surface width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| CardError::render("surface height exceeds u16"))?;
        self.sync_fixed(&assets.fixed);
        self.sync_photo(assets.photo.as_ref());

        let pixmap = self.with_ctx_mut(width, height, |this, ctx| {
            for planned in &plan.ops {
                this.draw_op(ctx, &planned.op, canvas, assets, text)?;
            }
            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(width, height);
            ctx.render_to_pixmap(&mut pixmap);
            Ok(pixmap)
        })?;

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn solid(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

/// Integer bitmap size for a target rectangle.
fn pixel_size(rect: Rect) -> (u32, u32) {
    (
        rect.width().round().max(1.0) as u32,
        rect.height().round().max(1.0) as u32,
    )
}

/// Fill `rect` with an image paint of `size` pixels stretched to fit.
fn fill_image(
    ctx: &mut vello_cpu::RenderContext,
    paint: vello_cpu::Image,
    size: (u32, u32),
    rect: Rect,
) {
    let (w, h) = (f64::from(size.0), f64::from(size.1));
    let xf = Affine::translate((rect.x0, rect.y0))
        * Affine::scale_non_uniform(rect.width() / w, rect.height() / h);
    ctx.set_transform(affine_to_cpu(xf));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
