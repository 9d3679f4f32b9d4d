use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TraceError};

use super::options::TraceOptions;

/// Raw RGBA8 pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps a raw RGBA8 buffer.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::EmptyImage`] for a zero-sized image, or
    /// [`TraceError::BufferSize`] if `data` does not hold exactly
    /// `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let buffer = Self { width, height, data };
        buffer.validate()?;
        Ok(buffer)
    }

    /// Copies the pixels out of a decoded image.
    #[must_use]
    pub fn from_image(image: &RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            data: image.as_raw().clone(),
        }
    }

    /// Checks that the buffer matches its dimensions. Buffers that arrive
    /// through deserialization are not checked on construction.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PixelBuffer::new`].
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TraceError::EmptyImage.into());
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.data.len() != expected {
            return Err(TraceError::BufferSize {
                expected,
                actual: self.data.len(),
            }
            .into());
        }
        Ok(())
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA of pixel `(x, y)`. Callers stay inside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

/// Size of the image before preparation downscaled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceMeta {
    pub original_width: u32,
    pub original_height: u32,
}

/// Everything the classification and boundary stages need. Plain data, so
/// it can be moved to a worker thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRequest {
    #[serde(rename = "imageData")]
    pub image: PixelBuffer,
    pub options: TraceOptions,
    pub meta: TraceMeta,
}

/// Downscales the image to the resolution cap and applies the pre-blur.
///
/// # Errors
///
/// Returns [`TraceError::EmptyImage`] if the image has no pixels.
pub fn prepare(image: &RgbaImage, options: &TraceOptions) -> Result<TraceRequest> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(TraceError::EmptyImage.into());
    }

    let (target_w, target_h) = capped_size(width, height, options.max_dimension());
    let mut working = if (target_w, target_h) == (width, height) {
        image.clone()
    } else {
        debug!(width, height, target_w, target_h, "downscaling for trace");
        imageops::resize(image, target_w, target_h, FilterType::Triangle)
    };

    let sigma = options.blur_sigma();
    if sigma > 0.0 {
        working = imageops::blur(&working, sigma);
    }

    Ok(TraceRequest {
        image: PixelBuffer::from_image(&working),
        options: *options,
        meta: TraceMeta {
            original_width: width,
            original_height: height,
        },
    })
}

/// Fits `width x height` inside `max_dim` keeping the aspect ratio.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn capped_size(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    let largest = width.max(height);
    if largest <= max_dim {
        return (width, height);
    }
    let scale = f64::from(max_dim) / f64::from(largest);
    let w = (f64::from(width) * scale).round().max(1.0) as u32;
    let h = (f64::from(height) * scale).round().max(1.0) as u32;
    (w, h)
}
