use crate::assets::decode::AssetImage;
use crate::assets::loader::{FixedSlot, LoadedAssets, SDG_ICON_COUNT};
use crate::compose::cover::cover_fit;
use crate::compose::leaf::leaf_path;
use crate::compose::plan::{DrawOp, FramePlan, GradientAxis, Layer, PlannedOp};
use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::layout::table::{
    LayoutScale, LayoutTable, Metrics, PosterSize, REFERENCE_WIDTH, TemplateBlocks, TemplateStyle,
    TextBlockSpec,
};
use crate::model::state::{BackgroundKind, CallToAction, PosterState, TemplateContent};
use crate::text::font::FontSpec;
use crate::text::wrap::{TextBlock, TextMeasure, clamp_lines, layout_block, wrap_to_width};

/// Headline used by the pledge template when the user leaves the title blank.
pub const PLEDGE_DEFAULT_TITLE: &str = "I pledge to act for the Global Goals";

/// Label next to the UN badge on pledge cards.
pub const ATTRIBUTION_LABEL: &str = "Supporting the UN Sustainable Development Goals";

const TEXT_PRIMARY: Rgba8 = Rgba8::WHITE;
const TEXT_SECONDARY: Rgba8 = Rgba8::rgba(255, 255, 255, 230);
const TEXT_BODY: Rgba8 = Rgba8::rgba(255, 255, 255, 215);
const TEXT_MUTED: Rgba8 = Rgba8::rgba(255, 255, 255, 200);
const CLEAR_COLOR: Rgba8 = Rgba8::rgb(0, 0, 0);

/// Lay out one frame of `state` on `canvas`.
///
/// Pure: the same inputs always yield the same plan. Every reference constant is multiplied by
/// `canvas.width / 1080`, so the preview is an exact miniature of the export.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(template = state.template().as_str(), w = canvas.width, h = canvas.height)
)]
pub fn compose(
    state: &PosterState,
    assets: &LoadedAssets,
    table: &LayoutTable,
    site_url: &str,
    measure: &mut dyn TextMeasure,
    canvas: Canvas,
) -> FramePlan {
    let kind = state.template();
    let mut c = Composer {
        m: table.metrics(),
        blocks: table.blocks(kind),
        style: table.style(kind),
        size: state.size,
        scale: LayoutScale::for_canvas(canvas),
        canvas,
        measure,
        ops: Vec::new(),
    };

    c.push(Layer::Clear, DrawOp::Clear(CLEAR_COLOR));
    c.background(state.background(), assets);
    c.overlay();
    c.glow();
    c.logo_badge(assets);

    let footer_top = c.footer_top();
    let cta_bottom = footer_top - c.m.section_gap;
    let cta = state
        .content
        .cta()
        .filter(|cta| !cta.text.trim().is_empty());
    let content_bottom = match cta {
        Some(_) => cta_bottom - c.m.cta_height - c.m.section_gap,
        None => cta_bottom,
    };

    let rows = c.content_rows(state);
    c.place_rows(&rows, content_bottom, assets);
    if let Some(cta) = cta {
        c.cta(cta, cta_bottom);
    }
    c.footer(site_url, footer_top);

    tracing::debug!(ops = c.ops.len(), "frame planned");
    FramePlan {
        canvas,
        scale: c.scale,
        ops: c.ops,
    }
}

/// One vertically stacked element of the content block.
enum Row {
    Chips(Vec<String>),
    Block {
        layer: Layer,
        block: TextBlock,
        color: Rgba8,
    },
    NameChip(String),
    Icons,
    Attribution,
}

/// Layout cursor. Every `f64` argument is in reference units; conversion to surface pixels
/// happens only when an op is pushed.
struct Composer<'a> {
    m: &'a Metrics,
    blocks: &'a TemplateBlocks,
    style: TemplateStyle,
    size: PosterSize,
    scale: LayoutScale,
    canvas: Canvas,
    measure: &'a mut dyn TextMeasure,
    ops: Vec<PlannedOp>,
}

impl Composer<'_> {
    fn push(&mut self, layer: Layer, op: DrawOp) {
        self.ops.push(PlannedOp { layer, op });
    }

    fn ref_height(&self) -> f64 {
        f64::from(self.canvas.height) / self.scale.factor()
    }

    fn content_width(&self) -> f64 {
        REFERENCE_WIDTH - 2.0 * self.m.padding
    }

    fn rect(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        let s = self.scale.factor();
        Rect::new(x0 * s, y0 * s, x1 * s, y1 * s)
    }

    fn label_height(&self, font: FontSpec) -> f64 {
        f64::from(font.size_px * self.m.label_line_height)
    }

    fn width_of(&mut self, text: &str, font: FontSpec) -> f64 {
        f64::from(self.measure.measure(text, &font))
    }

    /// First line of `text` wrapped to `max_width`, ellipsized when more would follow.
    fn single_line(&mut self, text: &str, font: FontSpec, max_width: f64) -> Option<String> {
        let lines = wrap_to_width(&mut *self.measure, text, &font, max_width as f32);
        clamp_lines(lines, 1).into_iter().next()
    }

    fn text(
        &mut self,
        layer: Layer,
        text: &str,
        at: (f64, f64),
        font: FontSpec,
        color: Rgba8,
        line_height: f64,
    ) {
        let width = self.width_of(text, font);
        let s = self.scale.factor();
        let op = DrawOp::Text {
            text: text.to_string(),
            origin: Point::new(at.0 * s, at.1 * s),
            font: self.scale.font(font),
            color,
            width: width * s,
            height: line_height * s,
        };
        self.push(layer, op);
    }

    /// Single label at `x`, vertically centered in the `(top, height)` band.
    fn centered_label(
        &mut self,
        layer: Layer,
        text: &str,
        x: f64,
        band: (f64, f64),
        font: FontSpec,
        color: Rgba8,
    ) {
        let h = self.label_height(font);
        self.text(layer, text, (x, band.0 + (band.1 - h) / 2.0), font, color, h);
    }

    /// Aspect-preserving fit of `image` centered in the reference box.
    fn contain(&self, image: &AssetImage, x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        let (iw, ih) = image.intrinsic_size();
        let (bw, bh) = (x1 - x0, y1 - y0);
        if iw <= 0.0 || ih <= 0.0 {
            return self.rect(x0, y0, x1, y1);
        }
        let k = (bw / iw).min(bh / ih);
        let (dw, dh) = (iw * k, ih * k);
        let x = x0 + (bw - dw) / 2.0;
        let y = y0 + (bh - dh) / 2.0;
        self.rect(x, y, x + dw, y + dh)
    }

    fn background(&mut self, kind: BackgroundKind, assets: &LoadedAssets) {
        let full = self.canvas.rect();
        let [from, to] = self.style.gradient;
        let op = match (kind, assets.photo.as_ref()) {
            (BackgroundKind::Photo, Some(photo)) => DrawOp::CoverPhoto {
                fit: cover_fit(photo.width, photo.height, self.canvas),
            },
            (BackgroundKind::Solid, _) => DrawOp::FillRect {
                rect: full,
                color: from,
            },
            (BackgroundKind::Photo, None) | (BackgroundKind::Gradient, _) => {
                DrawOp::LinearGradient {
                    rect: full,
                    axis: GradientAxis::Diagonal,
                    from,
                    to,
                }
            }
        };
        self.push(Layer::Background, op);
    }

    fn overlay(&mut self) {
        let op = DrawOp::LinearGradient {
            rect: self.canvas.rect(),
            axis: GradientAxis::Vertical,
            from: self.m.overlay_top,
            to: self.m.overlay_bottom,
        };
        self.push(Layer::Overlay, op);
    }

    fn glow(&mut self) {
        let op = DrawOp::RadialGlow {
            center: Point::new(
                self.scale.px(REFERENCE_WIDTH - self.m.glow_right),
                self.scale.px(self.m.glow_top),
            ),
            radius: self.scale.px(self.m.glow_radius),
            color: self.style.glow,
            opacity: self.m.glow_opacity,
        };
        self.push(Layer::Glow, op);
    }

    fn logo_badge(&mut self, assets: &LoadedAssets) {
        let m = self.m;
        let (x0, y0) = (m.padding, m.padding);
        let (x1, y1) = (x0 + m.badge_width, y0 + m.badge_height);
        let op = DrawOp::RoundedRect {
            rect: self.rect(x0, y0, x1, y1),
            radius: self.scale.px(m.badge_radius),
            color: m.badge_fill,
        };
        self.push(Layer::LogoBadge, op);

        if let Some(logo) = assets.fixed.get(FixedSlot::Logo) {
            let i = m.badge_inset;
            let rect = self.contain(logo, x0 + i, y0 + i, x1 - i, y1 - i);
            self.push(
                Layer::LogoBadge,
                DrawOp::Image {
                    slot: FixedSlot::Logo,
                    rect,
                },
            );
        }
    }

    fn footer_top(&self) -> f64 {
        self.ref_height() - self.m.padding - self.m.footer_glyph
    }

    /// Leaf glyph and site URL on the band starting at `top`.
    fn footer(&mut self, site_url: &str, top: f64) {
        let m = self.m;
        let glyph = self.rect(m.padding, top, m.padding + m.footer_glyph, top + m.footer_glyph);
        let op = DrawOp::Path {
            path: leaf_path(glyph),
            color: self.style.accent,
        };
        self.push(Layer::Footer, op);

        let url = site_url.trim();
        if !url.is_empty() {
            let x = m.padding + m.footer_glyph + m.footer_gap;
            self.centered_label(
                Layer::Footer,
                url,
                x,
                (top, m.footer_glyph),
                m.footer_font,
                TEXT_MUTED,
            );
        }
    }

    /// Pill whose bottom edge sits at `bottom`; nothing for a blank label.
    fn cta(&mut self, cta: &CallToAction, bottom: f64) {
        let m = self.m;
        let top = bottom - m.cta_height;
        let max_label = self.content_width() - 2.0 * m.cta_pad_x;
        let Some(label) = self.single_line(cta.text.trim(), m.cta_font, max_label) else {
            return;
        };
        let pill_w = self.width_of(&label, m.cta_font).min(max_label) + 2.0 * m.cta_pad_x;
        let op = DrawOp::RoundedRect {
            rect: self.rect(m.padding, top, m.padding + pill_w, top + m.cta_height),
            radius: self.scale.px(Metrics::pill_radius(m.cta_height)),
            color: self.style.accent,
        };
        self.push(Layer::Cta, op);
        self.centered_label(
            Layer::Cta,
            &label,
            m.padding + m.cta_pad_x,
            (top, m.cta_height),
            m.cta_font,
            TEXT_PRIMARY,
        );

        let link = cta.link.as_deref().map(str::trim).unwrap_or_default();
        if !link.is_empty() {
            let x = m.padding + pill_w + m.chip_gap;
            let avail = REFERENCE_WIDTH - m.padding - x;
            if let Some(line) = self.single_line(link, m.cta_link_font, avail)
                && self.width_of(&line, m.cta_link_font) <= avail
            {
                self.centered_label(
                    Layer::Cta,
                    &line,
                    x,
                    (top, m.cta_height),
                    m.cta_link_font,
                    TEXT_MUTED,
                );
            }
        }
    }

    fn block(&mut self, layer: Layer, text: &str, spec: TextBlockSpec, color: Rgba8) -> Option<Row> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let block = layout_block(&mut *self.measure, text, &spec, self.size);
        (!block.is_empty()).then_some(Row::Block {
            layer,
            block,
            color,
        })
    }

    fn content_rows(&mut self, state: &PosterState) -> Vec<Row> {
        fn chips(values: [Option<&String>; 2]) -> Option<Row> {
            let labels: Vec<String> = values
                .into_iter()
                .flatten()
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            (!labels.is_empty()).then_some(Row::Chips(labels))
        }

        let b = *self.blocks;
        let rows = match &state.content {
            TemplateContent::Pledge(c) => {
                let title = c
                    .title
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or(PLEDGE_DEFAULT_TITLE);
                let name = state.name.trim();
                vec![
                    self.block(Layer::Title, title, b.title, TEXT_PRIMARY),
                    (!name.is_empty()).then(|| Row::NameChip(format!("Pledged by {name}"))),
                    Some(Row::Icons),
                    Some(Row::Attribution),
                ]
            }
            TemplateContent::Event(c) => vec![
                chips([c.city.as_ref(), c.date.as_ref()]),
                self.block(Layer::Title, &c.title, b.title, TEXT_PRIMARY),
                c.subtitle
                    .as_deref()
                    .and_then(|t| self.block(Layer::Subtitle, t, b.subtitle, TEXT_SECONDARY)),
            ],
            TemplateContent::Campaign(c) => vec![
                self.block(Layer::Title, &c.title, b.title, TEXT_PRIMARY),
                c.description
                    .as_deref()
                    .and_then(|t| self.block(Layer::Description, t, b.description, TEXT_BODY)),
            ],
            TemplateContent::Impact(c) => vec![
                chips([c.city.as_ref(), c.date.as_ref()]),
                self.block(Layer::Title, &c.title, b.title, TEXT_PRIMARY),
                c.description
                    .as_deref()
                    .and_then(|t| self.block(Layer::Description, t, b.description, TEXT_BODY)),
            ],
            TemplateContent::Quote(c) => {
                let quote = c.quote.trim();
                let quoted = (!quote.is_empty()).then(|| format!("\u{201C}{quote}\u{201D}"));
                let by = c
                    .attribution
                    .as_deref()
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(|a| format!("\u{2014} {a}"));
                vec![
                    quoted.and_then(|q| self.block(Layer::Title, &q, b.title, TEXT_PRIMARY)),
                    by.and_then(|a| self.block(Layer::Subtitle, &a, b.subtitle, TEXT_SECONDARY)),
                ]
            }
        };
        rows.into_iter().flatten().collect()
    }

    fn row_height(&self, row: &Row) -> f64 {
        match row {
            Row::Chips(_) => self.m.chip_height,
            Row::Block { block, .. } => block.height(),
            Row::NameChip(_) => self.m.name_chip_height,
            Row::Icons => self.m.icon_size,
            Row::Attribution => self.m.attribution_badge,
        }
    }

    /// Stack rows upward from `bottom`, never above the logo badge.
    fn place_rows(&mut self, rows: &[Row], bottom: f64, assets: &LoadedAssets) {
        if rows.is_empty() {
            return;
        }
        let m = self.m;
        let gaps = m.block_gap * (rows.len() - 1) as f64;
        let total: f64 = rows.iter().map(|r| self.row_height(r)).sum::<f64>() + gaps;
        let ceiling = m.padding + m.badge_height + m.block_gap;
        let mut y = (bottom - total).max(ceiling);

        for row in rows {
            match row {
                Row::Chips(labels) => self.chips(labels, y),
                Row::Block {
                    layer,
                    block,
                    color,
                } => {
                    for (i, line) in block.lines.iter().enumerate() {
                        let line_top = y + block.line_advance * i as f64;
                        self.text(
                            *layer,
                            line,
                            (m.padding, line_top),
                            block.font,
                            *color,
                            block.line_advance,
                        );
                    }
                }
                Row::NameChip(label) => self.name_chip(label, y),
                Row::Icons => self.icon_row(assets, y),
                Row::Attribution => self.attribution(assets, y),
            }
            y += self.row_height(row) + m.block_gap;
        }
    }

    fn chips(&mut self, labels: &[String], top: f64) {
        let m = self.m;
        let right = REFERENCE_WIDTH - m.padding;
        let mut x = m.padding;
        for label in labels {
            let w = self.width_of(label, m.chip_font) + 2.0 * m.chip_pad_x;
            if x + w > right {
                break;
            }
            let op = DrawOp::RoundedRect {
                rect: self.rect(x, top, x + w, top + m.chip_height),
                radius: self.scale.px(Metrics::pill_radius(m.chip_height)),
                color: m.chip_fill,
            };
            self.push(Layer::MetaChips, op);
            self.centered_label(
                Layer::MetaChips,
                label,
                x + m.chip_pad_x,
                (top, m.chip_height),
                m.chip_font,
                TEXT_PRIMARY,
            );
            x += w + m.chip_gap;
        }
    }

    fn name_chip(&mut self, label: &str, top: f64) {
        let m = self.m;
        let max_text = self.content_width() - 2.0 * m.chip_pad_x;
        let Some(line) = self.single_line(label, m.name_chip_font, max_text) else {
            return;
        };
        let w = self.width_of(&line, m.name_chip_font).min(max_text) + 2.0 * m.chip_pad_x;
        let op = DrawOp::RoundedRect {
            rect: self.rect(m.padding, top, m.padding + w, top + m.name_chip_height),
            radius: self.scale.px(Metrics::pill_radius(m.name_chip_height)),
            color: self.style.accent,
        };
        self.push(Layer::NameChip, op);
        self.centered_label(
            Layer::NameChip,
            &line,
            m.padding + m.chip_pad_x,
            (top, m.name_chip_height),
            m.name_chip_font,
            TEXT_PRIMARY,
        );
    }

    /// Fixed cells for every icon; a missing icon leaves its cell empty.
    fn icon_row(&mut self, assets: &LoadedAssets, top: f64) {
        let m = self.m;
        let n = SDG_ICON_COUNT as f64;
        let group = n * m.icon_size + (n - 1.0) * m.icon_gap;
        let left = (REFERENCE_WIDTH - group) / 2.0;
        for i in 0..SDG_ICON_COUNT {
            let slot = FixedSlot::Icon(i);
            let Some(icon) = assets.fixed.get(slot) else {
                continue;
            };
            let x = left + i as f64 * (m.icon_size + m.icon_gap);
            let rect = self.contain(icon, x, top, x + m.icon_size, top + m.icon_size);
            self.push(Layer::IconRow, DrawOp::Image { slot, rect });
        }
    }

    fn attribution(&mut self, assets: &LoadedAssets, top: f64) {
        let m = self.m;
        let mut x = m.padding;
        if let Some(badge) = assets.fixed.get(FixedSlot::UnBadge) {
            let b = m.attribution_badge;
            let rect = self.contain(badge, x, top, x + b, top + b);
            self.push(
                Layer::Attribution,
                DrawOp::Image {
                    slot: FixedSlot::UnBadge,
                    rect,
                },
            );
            x += b + m.footer_gap;
        }
        self.centered_label(
            Layer::Attribution,
            ATTRIBUTION_LABEL,
            x,
            (top, m.attribution_badge),
            m.attribution_font,
            TEXT_MUTED,
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
