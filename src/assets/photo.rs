use std::sync::Arc;

use crate::assets::decode::{PreparedImage, decode_image};
use crate::foundation::core::Canvas;
use crate::foundation::error::{CardError, CardResult};

/// Ownership handle to the user's decoded photograph.
#[derive(Debug)]
pub struct PhotoAsset {
    image: Arc<PreparedImage>,
}

impl PhotoAsset {
    /// Decode user-supplied bytes. The photo is essential, so failure is an error.
    pub fn decode(bytes: &[u8]) -> CardResult<Self> {
        let image = decode_image(bytes).map_err(|e| CardError::asset(format!("photo: {e}")))?;
        Self::from_image(image)
    }

    /// Wrap an already decoded image.
    pub fn from_image(image: PreparedImage) -> CardResult<Self> {
        if image.width > Canvas::MAX_EDGE || image.height > Canvas::MAX_EDGE {
            return Err(CardError::validation(format!(
                "photo {}x{} exceeds max edge {}",
                image.width,
                image.height,
                Canvas::MAX_EDGE
            )));
        }
        Ok(Self {
            image: Arc::new(image),
        })
    }

    /// Shared decoded pixels.
    pub fn image(&self) -> Arc<PreparedImage> {
        self.image.clone()
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width, self.image.height)
    }
}

impl Drop for PhotoAsset {
    fn drop(&mut self) {
        tracing::debug!(
            width = self.image.width,
            height = self.image.height,
            "photo released"
        );
    }
}

/// Holder of at most one live [`PhotoAsset`].
#[derive(Debug, Default)]
pub struct PhotoSlot {
    current: Option<PhotoAsset>,
}

impl PhotoSlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Release the previous photo, then install `next`.
    pub fn replace(&mut self, next: PhotoAsset) {
        drop(self.current.take());
        self.current = Some(next);
    }

    /// Release the current photo, if any.
    pub fn clear(&mut self) {
        drop(self.current.take());
    }

    /// Current photo.
    pub fn get(&self) -> Option<&PhotoAsset> {
        self.current.as_ref()
    }

    /// Whether a photo is installed.
    pub fn is_set(&self) -> bool {
        self.current.is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/photo.rs"]
mod tests;
