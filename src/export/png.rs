use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::{CardError, CardResult};
use crate::render::frame::FrameRGBA;

/// Lossless PNG of `frame`, straight alpha.
pub fn encode_png(frame: &FrameRGBA) -> CardResult<Vec<u8>> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(CardError::export(format!(
            "frame buffer is {} bytes, expected {expected} for {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.to_straight_alpha())
        .ok_or_else(|| CardError::export("frame buffer does not match its dimensions"))?;

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| CardError::export(format!("encode png: {e}")))?;
    Ok(out.into_inner())
}

/// Pixel dimensions stored in an encoded image header.
pub fn encoded_dimensions(bytes: &[u8]) -> CardResult<(u32, u32)> {
    let dims = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("sniff encoded image format")?
        .into_dimensions()
        .context("read encoded image dimensions")?;
    Ok(dims)
}
