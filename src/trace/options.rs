use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Resolution cap for standard tracing.
pub const STANDARD_MAX_DIMENSION: u32 = 1024;

/// Resolution cap for high-resolution tracing.
pub const HIGH_RES_MAX_DIMENSION: u32 = 2500;

/// Largest accepted pre-blur, in pixels.
pub const MAX_BLUR: f32 = 10.0;

/// Pixel classification strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    /// Dark pixels are ink.
    #[default]
    Luminance,
    /// Strong gradients are ink; produces outline-only regions.
    Edges,
}

/// Options for turning an image into contours.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TraceOptions {
    /// Gaussian pre-blur sigma in pixels, `0..=10`.
    pub blur: f32,
    /// Luminance cutoff, or gradient cutoff in [`TraceMode::Edges`].
    pub threshold: u8,
    /// Treat light pixels as ink.
    pub invert: bool,
    pub mode: TraceMode,
    /// Trace at up to [`HIGH_RES_MAX_DIMENSION`] instead of
    /// [`STANDARD_MAX_DIMENSION`].
    pub high_res: bool,
    /// Compare against the local mean instead of a fixed threshold.
    pub adaptive: bool,
    /// Close small gaps in thin strokes before tracing.
    pub morphology: bool,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            blur: 0.0,
            threshold: 128,
            invert: false,
            mode: TraceMode::Luminance,
            high_res: false,
            adaptive: false,
            morphology: false,
        }
    }
}

impl TraceOptions {
    /// Parses options from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CutterError::Settings`](crate::error::CutterError::Settings)
    /// if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Largest image side the tracer works at.
    #[must_use]
    pub fn max_dimension(&self) -> u32 {
        if self.high_res {
            HIGH_RES_MAX_DIMENSION
        } else {
            STANDARD_MAX_DIMENSION
        }
    }

    /// Blur sigma clamped to the accepted range; NaN counts as no blur.
    #[must_use]
    pub fn blur_sigma(&self) -> f32 {
        if self.blur.is_nan() {
            0.0
        } else {
            self.blur.clamp(0.0, MAX_BLUR)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_missing_fields() {
        let opts = TraceOptions::from_json(r#"{"threshold": 90, "highRes": true, "mode": "edges"}"#).unwrap();
        assert_eq!(opts.threshold, 90);
        assert!(opts.high_res);
        assert_eq!(opts.mode, TraceMode::Edges);
        assert!(!opts.invert);
        assert_eq!(opts.max_dimension(), HIGH_RES_MAX_DIMENSION);
    }

    #[test]
    fn malformed_json_is_error() {
        assert!(TraceOptions::from_json(r#"{"threshold": 900}"#).is_err());
    }

    #[test]
    fn blur_is_clamped() {
        let mut opts = TraceOptions::default();
        opts.blur = 42.0;
        assert!((opts.blur_sigma() - MAX_BLUR).abs() < f32::EPSILON);
        opts.blur = -1.0;
        assert!(opts.blur_sigma().abs() < f32::EPSILON);
        opts.blur = f32::NAN;
        assert!(opts.blur_sigma().abs() < f32::EPSILON);
    }
}
