use crate::assets::loader::FixedSlot;
use crate::compose::cover::CoverFit;
use crate::foundation::core::{BezPath, Canvas, Point, Rect, Rgba8};
use crate::layout::table::LayoutScale;
use crate::text::font::FontSpec;

/// Compositing step an op belongs to, in draw order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Surface clear.
    Clear,
    /// Photo, gradient or solid fill.
    Background,
    /// Dark legibility gradient.
    Overlay,
    /// Decorative radial glow.
    Glow,
    /// Translucent logo chip and logo.
    LogoBadge,
    /// Location/date chips.
    MetaChips,
    /// Headline block.
    Title,
    /// Secondary block.
    Subtitle,
    /// Body copy block.
    Description,
    /// Pledge name attribution chip.
    NameChip,
    /// Pledge SDG icon row.
    IconRow,
    /// Pledge UN attribution row.
    Attribution,
    /// Call-to-action pill.
    Cta,
    /// Leaf glyph plus site URL.
    Footer,
}

/// Direction of a two-stop linear gradient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GradientAxis {
    /// Top edge to bottom edge.
    Vertical,
    /// Top-left corner to bottom-right corner.
    Diagonal,
}

/// One draw operation in surface pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Reset every pixel to `color`.
    Clear(Rgba8),
    /// Flat rectangle.
    FillRect {
        /// Target rectangle.
        rect: Rect,
        /// Fill color.
        color: Rgba8,
    },
    /// Two-stop linear gradient over `rect`.
    LinearGradient {
        /// Target rectangle.
        rect: Rect,
        /// Gradient direction.
        axis: GradientAxis,
        /// Start color.
        from: Rgba8,
        /// End color.
        to: Rgba8,
    },
    /// User photo, cover-fit to the whole surface.
    CoverPhoto {
        /// Placement of the photo.
        fit: CoverFit,
    },
    /// Soft radial blob.
    RadialGlow {
        /// Blob center.
        center: Point,
        /// Falloff radius.
        radius: f64,
        /// Color at the center.
        color: Rgba8,
        /// Layer opacity.
        opacity: f32,
    },
    /// Filled rounded rectangle.
    RoundedRect {
        /// Target rectangle.
        rect: Rect,
        /// Corner radius.
        radius: f64,
        /// Fill color.
        color: Rgba8,
    },
    /// Fixed asset drawn into `rect` (already aspect-fitted).
    Image {
        /// Which asset.
        slot: FixedSlot,
        /// Destination rectangle.
        rect: Rect,
    },
    /// One line of text; `origin` is the top-left of its line box.
    Text {
        /// Line content.
        text: String,
        /// Top-left of the line box.
        origin: Point,
        /// Font at surface scale.
        font: FontSpec,
        /// Fill color.
        color: Rgba8,
        /// Measured advance width.
        width: f64,
        /// Line box height.
        height: f64,
    },
    /// Filled vector path in surface coordinates.
    Path {
        /// Path geometry.
        path: BezPath,
        /// Fill color.
        color: Rgba8,
    },
}

impl DrawOp {
    /// Area the op may touch, when it is bounded.
    pub fn bounds(&self) -> Option<Rect> {
        use kurbo::Shape;

        match self {
            DrawOp::Clear(_) | DrawOp::CoverPhoto { .. } => None,
            DrawOp::FillRect { rect, .. }
            | DrawOp::LinearGradient { rect, .. }
            | DrawOp::RoundedRect { rect, .. }
            | DrawOp::Image { rect, .. } => Some(*rect),
            DrawOp::RadialGlow { center, radius, .. } => Some(Rect::new(
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            )),
            DrawOp::Text {
                origin,
                width,
                height,
                ..
            } => Some(Rect::new(
                origin.x,
                origin.y,
                origin.x + width,
                origin.y + height,
            )),
            DrawOp::Path { path, .. } => Some(path.bounding_box()),
        }
    }
}

/// A draw op tagged with its compositing step.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedOp {
    /// Compositing step.
    pub layer: Layer,
    /// Operation.
    pub op: DrawOp,
}

/// Ordered draw list for one frame; later ops paint over earlier ones.
#[derive(Clone, Debug, PartialEq)]
pub struct FramePlan {
    /// Target surface size.
    pub canvas: Canvas,
    /// Scale the plan was laid out with.
    pub scale: LayoutScale,
    /// Ops in draw order.
    pub ops: Vec<PlannedOp>,
}

impl FramePlan {
    /// Ops belonging to `layer`, in draw order.
    pub fn layer_ops(&self, layer: Layer) -> impl Iterator<Item = &DrawOp> {
        self.ops
            .iter()
            .filter(move |p| p.layer == layer)
            .map(|p| &p.op)
    }

    /// Whether any op was planned for `layer`.
    pub fn has_layer(&self, layer: Layer) -> bool {
        self.layer_ops(layer).next().is_some()
    }

    /// Union of the bounds of every bounded op in `layer`.
    pub fn layer_bounds(&self, layer: Layer) -> Option<Rect> {
        self.layer_ops(layer)
            .filter_map(DrawOp::bounds)
            .reduce(|a, b| a.union(b))
    }

    /// Layers in the order they first appear.
    pub fn layer_sequence(&self) -> Vec<Layer> {
        let mut out: Vec<Layer> = Vec::new();
        for p in &self.ops {
            if out.last() != Some(&p.layer) {
                out.push(p.layer);
            }
        }
        out
    }
}
