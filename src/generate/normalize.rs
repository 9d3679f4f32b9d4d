use crate::geometry::Contour;
use crate::math::{Millimeter, Pixel, Point2};

/// Maps image pixels to millimetres centred on the image.
///
/// The larger image side becomes `size` mm, y points up, and x is
/// optionally mirrored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    scale: f64,
    center: Point2,
    mirror: bool,
}

impl Normalization {
    /// Creates the mapping for a `width x height` image.
    #[must_use]
    pub fn new(width: u32, height: u32, size: f64, mirror: bool) -> Self {
        let largest = f64::from(width.max(height).max(1));
        Self {
            scale: size / largest,
            center: Point2::new(f64::from(width) / 2.0, f64::from(height) / 2.0),
            mirror,
        }
    }

    /// Millimetres per pixel.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Maps one contour.
    #[must_use]
    pub fn apply(&self, contour: &Contour<Pixel>) -> Contour<Millimeter> {
        let sx = if self.mirror { -self.scale } else { self.scale };
        contour.map_into(|p| {
            Point2::new((p.x - self.center.x) * sx, (self.center.y - p.y) * self.scale)
        })
    }
}
