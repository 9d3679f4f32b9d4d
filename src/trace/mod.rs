mod boundary;
mod morphology;
mod options;
mod prepare;
mod threshold;
mod worker;

pub use boundary::{trace_boundaries, MIN_BOUNDARY_POINTS};
pub use morphology::close;
pub use options::{TraceMode, TraceOptions, HIGH_RES_MAX_DIMENSION, MAX_BLUR, STANDARD_MAX_DIMENSION};
pub use prepare::{prepare, PixelBuffer, TraceMeta, TraceRequest};
pub use threshold::{classify, luma, InkMask, ADAPTIVE_SENSITIVITY, ALPHA_CUTOFF};
pub use worker::{Ticket, TraceResponse, TraceWorker};

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::geometry::Contour;
use crate::math::{Pixel, Point2};
use crate::operations::simplify::DouglasPeucker;

/// Contours in original-image pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    pub contours: Vec<Contour<Pixel>>,
    pub width: u32,
    pub height: u32,
}

impl TraceResult {
    /// Returns `true` if no shapes were detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }
}

/// Traces a decoded image synchronously.
///
/// Runs [`prepare`] (downscale and blur) and then [`trace_request`]
/// (classify, follow boundaries, simplify, rescale to the original size) in
/// place. [`TraceWorker`] runs the second stage on a background thread.
pub struct TraceImage<'a> {
    image: &'a RgbaImage,
    options: TraceOptions,
}

impl<'a> TraceImage<'a> {
    /// Creates a new `TraceImage` operation.
    #[must_use]
    pub fn new(image: &'a RgbaImage, options: TraceOptions) -> Self {
        Self { image, options }
    }

    /// Executes the trace.
    ///
    /// An image without any detectable shape yields an empty result, not
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::EmptyImage`](crate::error::TraceError::EmptyImage)
    /// if the image has no pixels.
    pub fn execute(&self) -> Result<TraceResult> {
        let request = prepare(self.image, &self.options)?;
        trace_request(&request)
    }
}

/// Runs classification, boundary extraction, simplification and rescaling
/// on a prepared request.
///
/// # Errors
///
/// Returns a trace error if the pixel buffer does not match its size.
pub fn trace_request(request: &TraceRequest) -> Result<TraceResult> {
    request.image.validate()?;
    let options = &request.options;

    let mut mask = classify(&request.image, options);
    if options.morphology {
        mask = close(&mask);
    }
    debug!(
        width = mask.width(),
        height = mask.height(),
        ink = mask.count(),
        "classified pixels"
    );

    let raw = trace_boundaries(&mask);
    let scale_x = f64::from(request.meta.original_width) / f64::from(request.image.width());
    let scale_y = f64::from(request.meta.original_height) / f64::from(request.image.height());
    let rescale = (scale_x - 1.0).abs() > f64::EPSILON || (scale_y - 1.0).abs() > f64::EPSILON;

    let contours: Vec<Contour<Pixel>> = raw
        .iter()
        .map(|c| {
            let simplified = DouglasPeucker::adaptive(c).execute();
            if rescale {
                simplified.map_into(|p| Point2::new(p.x * scale_x, p.y * scale_y))
            } else {
                simplified
            }
        })
        .filter(|c| c.len() >= 3)
        .collect();

    if contours.is_empty() {
        warn!("no shapes detected; try another threshold or mode");
    } else {
        info!(contours = contours.len(), "traced image");
    }

    Ok(TraceResult {
        contours,
        width: request.meta.original_width,
        height: request.meta.original_height,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::Rgba;

    fn circle_logo(size: u32, radius: f64) -> RgbaImage {
        let c = f64::from(size) / 2.0;
        RgbaImage::from_fn(size, size, |x, y| {
            if (f64::from(x) - c).hypot(f64::from(y) - c) <= radius {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    // ── Scenarios ──────────────────────────────────────────────

    #[test]
    fn circle_logo_gives_one_round_contour() {
        let img = circle_logo(512, 150.0);
        let result = TraceImage::new(&img, TraceOptions::default()).execute().unwrap();
        assert_eq!(result.contours.len(), 1);
        assert_eq!((result.width, result.height), (512, 512));

        let c = &result.contours[0];
        let center = crate::math::polygon_2d::centroid(&c.points);
        let dists: Vec<f64> = c.points.iter().map(|p| (p - center).norm()).collect();
        #[allow(clippy::cast_precision_loss)]
        let n = dists.len() as f64;
        let mean = dists.iter().sum::<f64>() / n;
        let variance = dists.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
        assert!(variance < 0.05 * 150.0, "variance {variance}");
        assert!((mean - 150.0).abs() < 2.0, "mean {mean}");
    }

    #[test]
    fn blank_image_is_empty_not_error() {
        let img = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255]));
        let result = TraceImage::new(&img, TraceOptions::default()).execute().unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn downscaled_trace_maps_back_to_original_size() {
        let img = circle_logo(2048, 600.0);
        let result = TraceImage::new(&img, TraceOptions::default()).execute().unwrap();
        assert_eq!(result.contours.len(), 1);
        assert_eq!(result.width, 2048);
        let bounds = result.contours[0].bounds().unwrap();
        assert!((bounds.width() - 1200.0).abs() < 10.0, "width {}", bounds.width());
        assert!((bounds.center().x - 1024.0).abs() < 10.0);
    }

    #[test]
    fn inverted_trace_finds_light_shape() {
        let img = RgbaImage::from_fn(100, 100, |x, y| {
            if (30..70).contains(&x) && (30..70).contains(&y) {
                Rgba([250, 250, 250, 255])
            } else {
                Rgba([10, 10, 10, 255])
            }
        });
        let opts = TraceOptions {
            invert: true,
            ..TraceOptions::default()
        };
        let result = TraceImage::new(&img, opts).execute().unwrap();
        assert_eq!(result.contours.len(), 1);
        assert!((result.contours[0].area() - 39.0 * 39.0).abs() < 1.0);
    }

    #[test]
    fn morphology_joins_blocks_split_by_one_pixel() {
        let img = RgbaImage::from_fn(60, 40, |x, y| {
            let ink = (10..30).contains(&y) && ((9..29).contains(&x) || (30..50).contains(&x));
            if ink {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let plain = TraceImage::new(&img, TraceOptions::default()).execute().unwrap();
        assert_eq!(plain.contours.len(), 2);

        let opts = TraceOptions {
            morphology: true,
            ..TraceOptions::default()
        };
        let closed = TraceImage::new(&img, opts).execute().unwrap();
        assert_eq!(closed.contours.len(), 1);
        let bounds = closed.contours[0].bounds().unwrap();
        assert!((bounds.width() - 40.0).abs() < 1.5, "width {}", bounds.width());
    }

    // Background fades from 230 on the left to 90 on the right, with one
    // small dark square on each side.
    fn gradient_with_squares() -> RgbaImage {
        RgbaImage::from_fn(200, 60, |x, y| {
            let bg = 230 - x * 7 / 10;
            let in_square = (26..34).contains(&y) && ((36..44).contains(&x) || (156..164).contains(&x));
            let v = u8::try_from(if in_square { bg / 4 } else { bg }).unwrap();
            Rgba([v, v, v, 255])
        })
    }

    #[test]
    fn adaptive_keeps_shapes_on_gradient_background() {
        let img = gradient_with_squares();
        let opts = TraceOptions {
            adaptive: true,
            ..TraceOptions::default()
        };
        let result = TraceImage::new(&img, opts).execute().unwrap();
        assert_eq!(result.contours.len(), 2);
        let mut centers: Vec<f64> = result
            .contours
            .iter()
            .map(|c| {
                let b = c.bounds().unwrap();
                assert!(b.width() < 10.0 && b.height() < 10.0, "{b:?}");
                b.center().x
            })
            .collect();
        centers.sort_by(f64::total_cmp);
        assert!((centers[0] - 39.5).abs() < 1.0);
        assert!((centers[1] - 159.5).abs() < 1.0);
    }

    #[test]
    fn global_threshold_floods_dark_side_of_gradient() {
        let img = gradient_with_squares();
        let result = TraceImage::new(&img, TraceOptions::default()).execute().unwrap();
        assert!(result
            .contours
            .iter()
            .any(|c| c.bounds().unwrap().width() > 40.0));
    }

    #[test]
    fn mismatched_request_buffer_is_rejected() {
        let json = r#"{
            "imageData": {"width": 4, "height": 4, "data": [0, 0, 0, 255]},
            "options": {},
            "meta": {"originalWidth": 4, "originalHeight": 4}
        }"#;
        let request: TraceRequest = serde_json::from_str(json).unwrap();
        assert!(trace_request(&request).is_err());
    }
}
