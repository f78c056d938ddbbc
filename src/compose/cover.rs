use crate::foundation::core::{Canvas, Rect, Vec2};

/// Uniform scale that fully covers a surface, cropping overflow symmetrically.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    /// `max(surface_w / photo_w, surface_h / photo_h)`.
    pub scale: f64,
    /// Photo width after scaling.
    pub drawn_width: f64,
    /// Photo height after scaling.
    pub drawn_height: f64,
    /// Top-left of the scaled photo in surface coordinates (never positive).
    pub offset: Vec2,
    /// Visible region in photo pixel coordinates.
    pub source_crop: Rect,
}

/// Cover-fit a `photo_w x photo_h` image onto `surface`.
pub fn cover_fit(photo_w: u32, photo_h: u32, surface: Canvas) -> CoverFit {
    let pw = f64::from(photo_w.max(1));
    let ph = f64::from(photo_h.max(1));
    let sw = f64::from(surface.width);
    let sh = f64::from(surface.height);

    let scale = (sw / pw).max(sh / ph);
    let drawn_width = pw * scale;
    let drawn_height = ph * scale;
    let offset = Vec2::new((sw - drawn_width) / 2.0, (sh - drawn_height) / 2.0);
    let source_crop = Rect::new(
        -offset.x / scale,
        -offset.y / scale,
        (sw - offset.x) / scale,
        (sh - offset.y) / scale,
    );

    CoverFit {
        scale,
        drawn_width,
        drawn_height,
        offset,
        source_crop,
    }
}

impl CoverFit {
    /// Integer crop `(x, y, w, h)` inside a `photo_w x photo_h` image.
    pub fn crop_px(&self, photo_w: u32, photo_h: u32) -> (u32, u32, u32, u32) {
        fn axis(start: f64, len: f64, limit: u32) -> (u32, u32) {
            let len = (len.round() as u32).clamp(1, limit.max(1));
            let start = (start.round().max(0.0) as u32).min(limit.saturating_sub(len));
            (start, len)
        }

        let (x, w) = axis(self.source_crop.x0, self.source_crop.width(), photo_w);
        let (y, h) = axis(self.source_crop.y0, self.source_crop.height(), photo_h);
        (x, y, w, h)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/cover.rs"]
mod tests;
