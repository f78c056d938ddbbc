use std::str::FromStr;

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{CardError, CardResult};
use crate::text::font::{FontSpec, FontWeight};

/// Width of the reference design every layout constant is expressed against.
pub const REFERENCE_WIDTH: f64 = 1080.0;

/// Canonical output sizes.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PosterSize {
    /// 1080x1080.
    Square,
    /// 1080x1350.
    #[default]
    Portrait,
    /// 1080x1920.
    Story,
}

impl PosterSize {
    /// All canonical sizes, in table order.
    pub const ALL: [PosterSize; 3] = [PosterSize::Square, PosterSize::Portrait, PosterSize::Story];

    /// Stable lowercase name used in file names and the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            PosterSize::Square => "square",
            PosterSize::Portrait => "portrait",
            PosterSize::Story => "story",
        }
    }
}

impl FromStr for PosterSize {
    type Err = CardError;

    fn from_str(s: &str) -> CardResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "portrait" => Ok(Self::Portrait),
            "story" => Ok(Self::Story),
            other => Err(CardError::validation(format!(
                "unknown poster size '{other}' (expected square|portrait|story)"
            ))),
        }
    }
}

/// The five named template styles.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Story/pledge card: name chip, SDG icon row and attribution.
    #[default]
    Pledge,
    /// Event announcement with location/date chips.
    Event,
    /// Campaign call-out with description and call to action.
    Campaign,
    /// Impact report over a photo.
    Impact,
    /// Pull quote with attribution.
    Quote,
}

impl TemplateKind {
    /// All template kinds.
    pub const ALL: [TemplateKind; 5] = [
        TemplateKind::Pledge,
        TemplateKind::Event,
        TemplateKind::Campaign,
        TemplateKind::Impact,
        TemplateKind::Quote,
    ];

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::Pledge => "pledge",
            TemplateKind::Event => "event",
            TemplateKind::Campaign => "campaign",
            TemplateKind::Impact => "impact",
            TemplateKind::Quote => "quote",
        }
    }
}

impl FromStr for TemplateKind {
    type Err = CardError;

    fn from_str(s: &str) -> CardResult<Self> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == needle)
            .ok_or_else(|| CardError::validation(format!("unknown template '{needle}'")))
    }
}

/// Immutable per-template colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TemplateStyle {
    /// Chip and glyph accent.
    pub accent: Rgba8,
    /// Two-stop background gradient, top-left to bottom-right.
    pub gradient: [Rgba8; 2],
    /// Decorative glow color.
    pub glow: Rgba8,
}

/// One variable-length text block (title, subtitle, description).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBlockSpec {
    /// Font at reference scale.
    pub font: FontSpec,
    /// Line advance as a multiple of the font size.
    pub line_height: f32,
    /// Wrap width at reference scale.
    pub max_width: f64,
    /// Line clamp for square and portrait output.
    pub max_lines: usize,
    /// Line clamp for story output.
    pub story_max_lines: usize,
}

impl TextBlockSpec {
    const fn new(size_px: f32, weight: FontWeight, line_height: f32, lines: (usize, usize)) -> Self {
        Self {
            font: FontSpec { size_px, weight },
            line_height,
            max_width: REFERENCE_WIDTH - 2.0 * Metrics::STANDARD.padding,
            max_lines: lines.0,
            story_max_lines: lines.1,
        }
    }

    /// Clamp count for the given output size.
    pub fn max_lines_for(&self, size: PosterSize) -> usize {
        match size {
            PosterSize::Story => self.story_max_lines,
            PosterSize::Square | PosterSize::Portrait => self.max_lines,
        }
    }
}

/// Text blocks used by one template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemplateBlocks {
    /// Headline.
    pub title: TextBlockSpec,
    /// Secondary line (event subtitle, quote attribution).
    pub subtitle: TextBlockSpec,
    /// Body copy.
    pub description: TextBlockSpec,
}

/// Reference-design geometry, in pixels at 1080 wide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    /// Outer margin on every edge.
    pub padding: f64,
    /// Logo chip width.
    pub badge_width: f64,
    /// Logo chip height.
    pub badge_height: f64,
    /// Logo chip corner radius.
    pub badge_radius: f64,
    /// Inset of the logo bitmap inside its chip.
    pub badge_inset: f64,
    /// Logo chip fill.
    pub badge_fill: Rgba8,
    /// Legibility overlay color at the top edge.
    pub overlay_top: Rgba8,
    /// Legibility overlay color at the bottom edge.
    pub overlay_bottom: Rgba8,
    /// Glow center distance from the right edge.
    pub glow_right: f64,
    /// Glow center distance from the top edge.
    pub glow_top: f64,
    /// Glow radius.
    pub glow_radius: f64,
    /// Glow layer opacity.
    pub glow_opacity: f32,
    /// Meta chip height.
    pub chip_height: f64,
    /// Meta chip horizontal text padding.
    pub chip_pad_x: f64,
    /// Gap between neighbouring chips.
    pub chip_gap: f64,
    /// Meta chip fill.
    pub chip_fill: Rgba8,
    /// Meta chip label font.
    pub chip_font: FontSpec,
    /// Vertical gap between content rows.
    pub block_gap: f64,
    /// Gap between the content block and the call to action / footer.
    pub section_gap: f64,
    /// Name attribution chip height.
    pub name_chip_height: f64,
    /// Name attribution chip font.
    pub name_chip_font: FontSpec,
    /// SDG icon edge length.
    pub icon_size: f64,
    /// Gap between SDG icons.
    pub icon_gap: f64,
    /// UN badge edge length in the attribution row.
    pub attribution_badge: f64,
    /// Attribution label font.
    pub attribution_font: FontSpec,
    /// Call-to-action pill height.
    pub cta_height: f64,
    /// Call-to-action horizontal text padding.
    pub cta_pad_x: f64,
    /// Call-to-action label font.
    pub cta_font: FontSpec,
    /// Call-to-action secondary link font.
    pub cta_link_font: FontSpec,
    /// Footer leaf glyph edge length.
    pub footer_glyph: f64,
    /// Gap between the leaf glyph and the URL.
    pub footer_gap: f64,
    /// Footer URL font.
    pub footer_font: FontSpec,
    /// Line advance for single-line labels, as a multiple of the font size.
    pub label_line_height: f32,
}

impl Metrics {
    /// Reference geometry shared by every template.
    pub const STANDARD: Metrics = Metrics {
        padding: 72.0,
        badge_width: 232.0,
        badge_height: 96.0,
        badge_radius: 28.0,
        badge_inset: 18.0,
        badge_fill: Rgba8::rgba(255, 255, 255, 36),
        overlay_top: Rgba8::rgba(8, 12, 20, 64),
        overlay_bottom: Rgba8::rgba(8, 12, 20, 224),
        glow_right: 150.0,
        glow_top: 230.0,
        glow_radius: 460.0,
        glow_opacity: 0.55,
        chip_height: 56.0,
        chip_pad_x: 24.0,
        chip_gap: 14.0,
        chip_fill: Rgba8::rgba(255, 255, 255, 40),
        chip_font: FontSpec::new(26.0, FontWeight::Bold),
        block_gap: 28.0,
        section_gap: 40.0,
        name_chip_height: 72.0,
        name_chip_font: FontSpec::new(34.0, FontWeight::Bold),
        icon_size: 104.0,
        icon_gap: 16.0,
        attribution_badge: 56.0,
        attribution_font: FontSpec::new(22.0, FontWeight::Regular),
        cta_height: 84.0,
        cta_pad_x: 40.0,
        cta_font: FontSpec::new(30.0, FontWeight::Bold),
        cta_link_font: FontSpec::new(24.0, FontWeight::Regular),
        footer_glyph: 34.0,
        footer_gap: 12.0,
        footer_font: FontSpec::new(26.0, FontWeight::Regular),
        label_line_height: 1.2,
    };

    /// Radius that turns a chip of `height` into a pill.
    pub fn pill_radius(height: f64) -> f64 {
        height / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SizeTable {
    square: Canvas,
    portrait: Canvas,
    story: Canvas,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StyleTable {
    pledge: TemplateStyle,
    event: TemplateStyle,
    campaign: TemplateStyle,
    impact: TemplateStyle,
    quote: TemplateStyle,
}

/// Statically initialized layout configuration injected into the compositor.
///
/// Lookups are exhaustive matches over the key enums, so every [`PosterSize`] and
/// [`TemplateKind`] always resolves.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutTable {
    sizes: SizeTable,
    styles: StyleTable,
    metrics: Metrics,
    headline: TemplateBlocks,
    quote: TemplateBlocks,
}

impl Default for LayoutTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl LayoutTable {
    /// The published size table and template styles.
    pub fn standard() -> Self {
        const fn style(accent: Rgba8, a: Rgba8, b: Rgba8, glow: Rgba8) -> TemplateStyle {
            TemplateStyle {
                accent,
                gradient: [a, b],
                glow,
            }
        }

        Self {
            sizes: SizeTable {
                square: Canvas {
                    width: 1080,
                    height: 1080,
                },
                portrait: Canvas {
                    width: 1080,
                    height: 1350,
                },
                story: Canvas {
                    width: 1080,
                    height: 1920,
                },
            },
            styles: StyleTable {
                pledge: style(
                    Rgba8::rgb(34, 197, 94),
                    Rgba8::rgb(6, 78, 59),
                    Rgba8::rgb(16, 185, 129),
                    Rgba8::rgb(167, 243, 208),
                ),
                event: style(
                    Rgba8::rgb(245, 158, 11),
                    Rgba8::rgb(30, 27, 75),
                    Rgba8::rgb(124, 58, 237),
                    Rgba8::rgb(251, 191, 36),
                ),
                campaign: style(
                    Rgba8::rgb(14, 165, 233),
                    Rgba8::rgb(12, 74, 110),
                    Rgba8::rgb(8, 145, 178),
                    Rgba8::rgb(103, 232, 249),
                ),
                impact: style(
                    Rgba8::rgb(132, 204, 22),
                    Rgba8::rgb(20, 83, 45),
                    Rgba8::rgb(101, 163, 13),
                    Rgba8::rgb(217, 249, 157),
                ),
                quote: style(
                    Rgba8::rgb(244, 114, 182),
                    Rgba8::rgb(59, 7, 100),
                    Rgba8::rgb(190, 24, 93),
                    Rgba8::rgb(249, 168, 212),
                ),
            },
            metrics: Metrics::STANDARD,
            headline: TemplateBlocks {
                title: TextBlockSpec::new(76.0, FontWeight::Bold, 1.1, (3, 4)),
                subtitle: TextBlockSpec::new(40.0, FontWeight::Regular, 1.25, (2, 2)),
                description: TextBlockSpec::new(34.0, FontWeight::Regular, 1.35, (4, 5)),
            },
            quote: TemplateBlocks {
                title: TextBlockSpec::new(64.0, FontWeight::Bold, 1.15, (5, 7)),
                subtitle: TextBlockSpec::new(34.0, FontWeight::Bold, 1.25, (1, 1)),
                description: TextBlockSpec::new(60.0, FontWeight::Regular, 1.25, (5, 7)),
            },
        }
    }

    /// Canonical pixel size for `size`.
    pub fn canvas(&self, size: PosterSize) -> Canvas {
        match size {
            PosterSize::Square => self.sizes.square,
            PosterSize::Portrait => self.sizes.portrait,
            PosterSize::Story => self.sizes.story,
        }
    }

    /// Colors for `kind`.
    pub fn style(&self, kind: TemplateKind) -> TemplateStyle {
        match kind {
            TemplateKind::Pledge => self.styles.pledge,
            TemplateKind::Event => self.styles.event,
            TemplateKind::Campaign => self.styles.campaign,
            TemplateKind::Impact => self.styles.impact,
            TemplateKind::Quote => self.styles.quote,
        }
    }

    /// Text block specs for `kind`.
    pub fn blocks(&self, kind: TemplateKind) -> &TemplateBlocks {
        match kind {
            TemplateKind::Quote => &self.quote,
            TemplateKind::Pledge
            | TemplateKind::Event
            | TemplateKind::Campaign
            | TemplateKind::Impact => &self.headline,
        }
    }

    /// Reference geometry.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// `surface_width / 1080`, applied uniformly to every reference constant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutScale(f64);

impl LayoutScale {
    /// Identity scale of the reference design.
    pub const REFERENCE: LayoutScale = LayoutScale(1.0);

    /// Scale for a surface of the given canvas.
    pub fn for_canvas(canvas: Canvas) -> Self {
        Self(f64::from(canvas.width) / REFERENCE_WIDTH)
    }

    /// Raw scale factor.
    pub fn factor(self) -> f64 {
        self.0
    }

    /// Convert a reference length to surface pixels.
    pub fn px(self, reference: f64) -> f64 {
        reference * self.0
    }

    /// Scale a reference font to surface pixels.
    pub fn font(self, font: FontSpec) -> FontSpec {
        FontSpec {
            size_px: font.size_px * self.0 as f32,
            ..font
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/table.rs"]
mod tests;
