use std::sync::Arc;

use crate::compose::plan::GradientAxis;
use crate::foundation::core::Rgba8;
use crate::foundation::error::{CardError, CardResult};

/// Premultiplied RGBA8 bytes wrapped as a `vello_cpu` pixmap.
pub(crate) fn pixmap_from_premul_bytes(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> CardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(CardError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

/// Image paint over premultiplied bytes.
pub(crate) fn image_paint(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> CardResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(rgba8_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Two-stop gradient rasterized to premultiplied bytes.
///
/// Stops are interpolated in straight alpha and premultiplied per pixel.
pub(crate) fn linear_gradient_pixels(
    width: u32,
    height: u32,
    axis: GradientAxis,
    from: Rgba8,
    to: Rgba8,
) -> Vec<u8> {
    let (w, h) = (width.max(1), height.max(1));
    let wx = (w - 1).max(1) as f32;
    let hy = (h - 1).max(1) as f32;
    let mut bytes = vec![0u8; w as usize * h as usize * 4];

    for y in 0..h {
        let ty = y as f32 / hy;
        let row = &mut bytes[(y * w) as usize * 4..((y + 1) * w) as usize * 4];
        match axis {
            GradientAxis::Vertical => {
                let c = from.lerp(to, ty).to_premul();
                for px in row.chunks_exact_mut(4) {
                    px.copy_from_slice(&c);
                }
            }
            GradientAxis::Diagonal => {
                for (x, px) in row.chunks_exact_mut(4).enumerate() {
                    let t = (x as f32 / wx + ty) * 0.5;
                    px.copy_from_slice(&from.lerp(to, t).to_premul());
                }
            }
        }
    }
    bytes
}

/// Square tile of side `2 * radius` holding a smooth radial falloff of `color`.
pub(crate) fn radial_glow_pixels(radius: f64, color: Rgba8) -> (u32, Vec<u8>) {
    let side = (radius * 2.0).ceil().max(1.0) as u32;
    let c = f64::from(side) / 2.0;
    let r = radius.max(1.0);
    let mut bytes = vec![0u8; side as usize * side as usize * 4];

    for (i, px) in bytes.chunks_exact_mut(4).enumerate() {
        let x = (i as u32 % side) as f64 + 0.5 - c;
        let y = (i as u32 / side) as f64 + 0.5 - c;
        let f = (1.0 - (x * x + y * y).sqrt() / r).clamp(0.0, 1.0);
        let falloff = f * f * (3.0 - 2.0 * f);
        let a = (f64::from(color.a) * falloff).round() as u8;
        px.copy_from_slice(&Rgba8 { a, ..color }.to_premul());
    }
    (side, bytes)
}
