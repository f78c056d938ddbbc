use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::Canvas;
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::{clamp_premul_in_place, premultiply_rgba8_in_place};

/// Prepared raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Prepared SVG asset represented as a parsed `usvg` tree.
#[derive(Clone, Debug)]
pub struct PreparedSvg {
    /// Parsed SVG tree.
    pub tree: Arc<usvg::Tree>,
}

/// A decoded drawable: raster bitmaps are resampled, vectors are rasterized at draw size.
#[derive(Clone, Debug)]
pub enum AssetImage {
    /// Decoded bitmap.
    Raster(PreparedImage),
    /// Parsed vector image.
    Svg(PreparedSvg),
}

impl AssetImage {
    /// Intrinsic size in pixels (SVG size rounded up).
    pub fn intrinsic_size(&self) -> (f64, f64) {
        match self {
            AssetImage::Raster(img) => (f64::from(img.width), f64::from(img.height)),
            AssetImage::Svg(svg) => {
                let s = svg.tree.size();
                (f64::from(s.width()), f64::from(s.height()))
            }
        }
    }

    /// Bitmap of exactly `width x height` pixels.
    pub fn bitmap(&self, width: u32, height: u32) -> CardResult<PreparedImage> {
        match self {
            AssetImage::Raster(img) => resample(img, width, height),
            AssetImage::Svg(svg) => rasterize_svg(&svg.tree, width, height),
        }
    }
}

/// Decode a raster image into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> CardResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Parse SVG bytes into a `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> CardResult<PreparedSvg> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(PreparedSvg {
        tree: Arc::new(tree),
    })
}

/// Decode by extension, falling back to sniffing for an SVG root element.
pub fn decode_asset(logical_path: &str, bytes: &[u8]) -> CardResult<AssetImage> {
    let is_svg = logical_path.to_ascii_lowercase().ends_with(".svg") || looks_like_svg(bytes);
    if is_svg {
        parse_svg(bytes).map(AssetImage::Svg)
    } else {
        decode_image(bytes).map(AssetImage::Raster)
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

/// High-quality resample of premultiplied pixels to an exact size.
pub fn resample(img: &PreparedImage, width: u32, height: u32) -> CardResult<PreparedImage> {
    let width = width.max(1);
    let height = height.max(1);
    if img.width == width && img.height == height {
        return Ok(img.clone());
    }
    let src = to_rgba_image(img)?;
    let out = image::imageops::resize(&src, width, height, image::imageops::FilterType::CatmullRom);
    Ok(from_rgba_image(out))
}

/// Crop `(x, y, w, h)` out of `img` then resample the crop to `canvas`.
pub fn crop_and_resample(
    img: &PreparedImage,
    crop: (u32, u32, u32, u32),
    canvas: Canvas,
) -> CardResult<PreparedImage> {
    let (x, y, w, h) = crop;
    if w == 0 || h == 0 || x.saturating_add(w) > img.width || y.saturating_add(h) > img.height {
        return Err(CardError::render(format!(
            "crop {w}x{h}+{x}+{y} outside {}x{} image",
            img.width, img.height
        )));
    }
    let src = to_rgba_image(img)?;
    let cropped = image::imageops::crop_imm(&src, x, y, w, h).to_image();
    let out = image::imageops::resize(
        &cropped,
        canvas.width,
        canvas.height,
        image::imageops::FilterType::CatmullRom,
    );
    Ok(from_rgba_image(out))
}

fn to_rgba_image(img: &PreparedImage) -> CardResult<image::RgbaImage> {
    image::RgbaImage::from_raw(img.width, img.height, img.rgba8_premul.as_ref().clone())
        .ok_or_else(|| CardError::render("prepared image byte len mismatch"))
}

fn from_rgba_image(img: image::RgbaImage) -> PreparedImage {
    let (width, height) = img.dimensions();
    let mut rgba8_premul = img.into_raw();
    clamp_premul_in_place(&mut rgba8_premul);
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    }
}

fn rasterize_svg(tree: &usvg::Tree, width: u32, height: u32) -> CardResult<PreparedImage> {
    let width = width.max(1);
    let height = height.max(1);
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CardError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
