use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Smallest thickness or height the generator will build, in mm.
pub const MIN_DIMENSION: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputType {
    #[default]
    Cutter,
    Keychain,
}

/// Whether a cutter comes alone or with a matching stamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GenerationMode {
    #[default]
    Single,
    Dual,
}

/// Cross-section of the cutting wall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BladeProfile {
    /// Uniform thickness from base to tip.
    #[default]
    Standard,
    /// Full thickness at the base narrowing to a thin tip.
    Stepped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BaseStyle {
    /// A flange following the outline.
    #[default]
    Outline,
    /// The whole shape filled.
    Solid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BackerShape {
    /// Follows the artwork outline.
    #[default]
    Silhouette,
    Circle,
    RoundedRectangle,
    Hexagon,
    Heart,
}

/// Everything the generator needs besides the contours. Lengths in mm.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CutterSettings {
    pub output_type: OutputType,
    pub generation_mode: GenerationMode,
    /// Length the larger image side maps to.
    pub size: f64,

    pub cutter_thickness: f64,
    pub cutter_height: f64,
    pub marker_thickness: f64,
    pub marker_height: f64,
    pub blade_profile: BladeProfile,

    pub base_enabled: bool,
    pub base_style: BaseStyle,
    pub base_thickness: f64,
    pub base_height: f64,

    pub grid_infill: bool,
    pub grid_spacing: f64,
    pub grid_strut_width: f64,
    pub grid_rim_width: f64,

    /// Clearance between the stamp plate and the cutter wall.
    pub stamp_tolerance: f64,
    pub stamp_plate_height: f64,
    pub handle_height: f64,
    pub handle_thickness: f64,

    pub auto_bridge: bool,
    pub bridge_width: f64,
    /// Mirror keychains too; cutters are always mirrored.
    pub mirror: bool,

    pub backer_shape: BackerShape,
    pub backer_thickness: f64,
    pub backer_padding: f64,
    pub corner_radius: f64,
    pub ring_hole_diameter: f64,
    pub ring_wall: f64,
    pub ring_offset_x: f64,
    pub ring_offset_y: f64,
    pub bevel_size: f64,
    pub bevel_segments: u32,
}

impl Default for CutterSettings {
    fn default() -> Self {
        Self {
            output_type: OutputType::Cutter,
            generation_mode: GenerationMode::Single,
            size: 80.0,
            cutter_thickness: 1.2,
            cutter_height: 15.0,
            marker_thickness: 0.8,
            marker_height: 8.0,
            blade_profile: BladeProfile::Standard,
            base_enabled: true,
            base_style: BaseStyle::Outline,
            base_thickness: 4.0,
            base_height: 2.0,
            grid_infill: false,
            grid_spacing: 6.0,
            grid_strut_width: 1.2,
            grid_rim_width: 2.0,
            stamp_tolerance: 0.3,
            stamp_plate_height: 3.0,
            handle_height: 12.0,
            handle_thickness: 5.0,
            auto_bridge: false,
            bridge_width: 3.0,
            mirror: false,
            backer_shape: BackerShape::Silhouette,
            backer_thickness: 3.0,
            backer_padding: 3.0,
            corner_radius: 4.0,
            ring_hole_diameter: 5.0,
            ring_wall: 2.0,
            ring_offset_x: 0.0,
            ring_offset_y: 0.0,
            bevel_size: 0.0,
            bevel_segments: 3,
        }
    }
}

impl CutterSettings {
    /// Parses settings from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CutterError::Settings`](crate::error::CutterError::Settings)
    /// if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns a copy safe to build from: physical dimensions are raised to
    /// at least [`MIN_DIMENSION`], tolerances and offsets made finite.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        let dim = |v: f64| if v.is_finite() { v.max(MIN_DIMENSION) } else { MIN_DIMENSION };
        let non_negative = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            size: dim(self.size),
            cutter_thickness: dim(self.cutter_thickness),
            cutter_height: dim(self.cutter_height),
            marker_thickness: dim(self.marker_thickness),
            marker_height: dim(self.marker_height),
            base_thickness: dim(self.base_thickness),
            base_height: dim(self.base_height),
            grid_spacing: dim(self.grid_spacing),
            grid_strut_width: dim(self.grid_strut_width),
            grid_rim_width: dim(self.grid_rim_width),
            stamp_tolerance: non_negative(self.stamp_tolerance),
            stamp_plate_height: dim(self.stamp_plate_height),
            handle_height: dim(self.handle_height),
            handle_thickness: dim(self.handle_thickness),
            bridge_width: dim(self.bridge_width),
            backer_thickness: dim(self.backer_thickness),
            backer_padding: non_negative(self.backer_padding),
            corner_radius: non_negative(self.corner_radius),
            ring_hole_diameter: dim(self.ring_hole_diameter),
            ring_wall: dim(self.ring_wall),
            ring_offset_x: finite(self.ring_offset_x),
            ring_offset_y: finite(self.ring_offset_y),
            bevel_size: non_negative(self.bevel_size),
            bevel_segments: self.bevel_segments.max(1),
            ..self.clone()
        }
    }

    /// Whether a built cutter is mirrored: cutters are used face-down.
    #[must_use]
    pub fn mirrored(&self) -> bool {
        self.output_type == OutputType::Cutter || self.mirror
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default() {
        assert_eq!(CutterSettings::from_json("{}").unwrap(), CutterSettings::default());
    }

    #[test]
    fn camel_case_fields() {
        let s = CutterSettings::from_json(
            r#"{"outputType": "keychain", "backerShape": "roundedRectangle", "cutterHeight": 20, "autoBridge": true}"#,
        )
        .unwrap();
        assert_eq!(s.output_type, OutputType::Keychain);
        assert_eq!(s.backer_shape, BackerShape::RoundedRectangle);
        assert!((s.cutter_height - 20.0).abs() < f64::EPSILON);
        assert!(s.auto_bridge);
        assert!((s.size - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_enum_value_is_error() {
        assert!(CutterSettings::from_json(r#"{"outputType": "lamp"}"#).is_err());
    }

    #[test]
    fn sanitized_clamps_dimensions() {
        let s = CutterSettings {
            cutter_thickness: -1.0,
            cutter_height: f64::NAN,
            stamp_tolerance: -0.5,
            bevel_segments: 0,
            ..CutterSettings::default()
        }
        .sanitized();
        assert!((s.cutter_thickness - MIN_DIMENSION).abs() < f64::EPSILON);
        assert!((s.cutter_height - MIN_DIMENSION).abs() < f64::EPSILON);
        assert!(s.stamp_tolerance.abs() < f64::EPSILON);
        assert_eq!(s.bevel_segments, 1);
    }

    #[test]
    fn only_cutters_mirror_by_default() {
        let cutter = CutterSettings::default();
        assert!(cutter.mirrored());
        let keychain = CutterSettings {
            output_type: OutputType::Keychain,
            ..CutterSettings::default()
        };
        assert!(!keychain.mirrored());
        assert!(CutterSettings { mirror: true, ..keychain }.mirrored());
    }
}
