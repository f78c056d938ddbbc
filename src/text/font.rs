use crate::foundation::core::Rgba8;
use crate::foundation::error::{CardError, CardResult};
use crate::text::wrap::TextMeasure;

/// Advance estimate per character, as a fraction of the font size, used when no font resolves.
const FALLBACK_ADVANCE_EM: f32 = 0.55;

/// Font weight selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontWeight {
    /// 400.
    #[default]
    Regular,
    /// 700.
    Bold,
}

impl FontWeight {
    fn css_weight(self) -> u16 {
        match self {
            FontWeight::Regular => 400,
            FontWeight::Bold => 700,
        }
    }
}

/// Font request: pixel size plus weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    /// Em size in pixels.
    pub size_px: f32,
    /// Weight.
    pub weight: FontWeight,
}

impl FontSpec {
    /// Build a font request.
    pub const fn new(size_px: f32, weight: FontWeight) -> Self {
        Self { size_px, weight }
    }
}

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

#[derive(Clone)]
struct LoadedFont {
    family: String,
}

/// A single shaped line ready for glyph rasterization.
///
/// Each glyph run carries the face it was shaped with (`run.run().font()`), which may be a
/// fallback face rather than the registered one.
pub struct ShapedLine {
    /// Parley layout holding one line of positioned glyph runs.
    pub layout: parley::Layout<TextBrushRgba8>,
}

impl std::fmt::Debug for ShapedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedLine")
            .field("width", &self.layout.width())
            .field("lines", &self.layout.len())
            .finish()
    }
}

/// Stateful helper for measuring and shaping text with Parley.
///
/// With no registered font the engine still measures (fixed per-character estimate) but cannot
/// shape, so text draws are skipped.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    regular: Option<LoadedFont>,
    bold: Option<LoadedFont>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    /// Construct an engine with no fonts registered.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            regular: None,
            bold: None,
        }
    }

    /// Register font bytes for `weight`, returning the detected family name.
    pub fn register_font(&mut self, font_bytes: Vec<u8>, weight: FontWeight) -> CardResult<String> {
        self.register_font_face(font_bytes, 0, weight)
    }

    /// Register face `index` of a font file or collection for `weight`.
    pub fn register_font_face(
        &mut self,
        font_bytes: Vec<u8>,
        index: u32,
        weight: FontWeight,
    ) -> CardResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes), None);
        let family_id = families
            .iter()
            .find(|(_, faces)| faces.iter().any(|face| face.index() == index))
            .or_else(|| families.first())
            .map(|(id, _)| *id)
            .ok_or_else(|| CardError::validation("no font families registered from font bytes"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::validation("registered font family has no name"))?
            .to_string();

        let loaded = LoadedFont {
            family: family.clone(),
        };
        match weight {
            FontWeight::Regular => self.regular = Some(loaded),
            FontWeight::Bold => self.bold = Some(loaded),
        }
        Ok(family)
    }

    /// Resolve a sans-serif face from the system font database for every unregistered weight.
    pub fn load_system_fallback(&mut self) {
        for weight in [FontWeight::Regular, FontWeight::Bold] {
            let missing = match weight {
                FontWeight::Regular => self.regular.is_none(),
                FontWeight::Bold => self.bold.is_none(),
            };
            if !missing {
                continue;
            }
            let Some((bytes, index)) = system_sans_face(weight) else {
                tracing::warn!(?weight, "no system sans-serif font found");
                continue;
            };
            if let Err(err) = self.register_font_face(bytes, index, weight) {
                tracing::warn!(?weight, %err, "system font could not be registered");
            }
        }
    }

    /// Whether any font is available for shaping.
    pub fn has_fonts(&self) -> bool {
        self.regular.is_some() || self.bold.is_some()
    }

    fn font_for(&self, weight: FontWeight) -> Option<(&LoadedFont, FontWeight)> {
        match weight {
            FontWeight::Bold => match &self.bold {
                Some(f) => Some((f, FontWeight::Bold)),
                None => self.regular.as_ref().map(|f| (f, FontWeight::Regular)),
            },
            FontWeight::Regular => match &self.regular {
                Some(f) => Some((f, FontWeight::Regular)),
                None => self.bold.as_ref().map(|f| (f, FontWeight::Bold)),
            },
        }
    }

    fn build_layout(
        &mut self,
        text: &str,
        font: &FontSpec,
        brush: TextBrushRgba8,
    ) -> Option<parley::Layout<TextBrushRgba8>> {
        let (loaded, face_weight) = self.font_for(font.weight)?;
        let family = loaded.family.clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(face_weight.css_weight())),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Some(layout)
    }

    /// Shape `text` on one line, or `None` when no font is available.
    pub fn shape_line(&mut self, text: &str, font: &FontSpec, color: Rgba8) -> Option<ShapedLine> {
        if text.is_empty() || !font.size_px.is_finite() || font.size_px <= 0.0 {
            return None;
        }
        let layout = self.build_layout(text, font, color.into())?;
        Some(ShapedLine { layout })
    }
}

impl TextMeasure for TextEngine {
    fn measure(&mut self, text: &str, font: &FontSpec) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        match self.build_layout(text, font, TextBrushRgba8::default()) {
            Some(layout) => layout.width(),
            None => text.chars().count() as f32 * font.size_px * FALLBACK_ADVANCE_EM,
        }
    }
}

/// Bytes and collection index of the best system sans-serif face for `weight`.
fn system_sans_face(weight: FontWeight) -> Option<(Vec<u8>, u32)> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    let families = [usvg::fontdb::Family::SansSerif];
    let query = usvg::fontdb::Query {
        families: &families,
        weight: usvg::fontdb::Weight(weight.css_weight()),
        stretch: usvg::fontdb::Stretch::Normal,
        style: usvg::fontdb::Style::Normal,
    };
    let id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;
    db.with_face_data(id, |data, index| (data.to_vec(), index))
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
