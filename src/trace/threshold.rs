use super::options::{TraceMode, TraceOptions};
use super::prepare::PixelBuffer;

/// Pixels with alpha below this are background in every strategy.
pub const ALPHA_CUTOFF: u8 = 10;

/// Local-mean multiplier of the adaptive strategy.
pub const ADAPTIVE_SENSITIVITY: f64 = 0.85;

/// Binary ink/background grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InkMask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl InkMask {
    /// Creates an all-background mask.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether `(x, y)` is ink. Anything outside the grid is background.
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> bool {
        self.index(x, y).is_some_and(|i| self.cells[i])
    }

    pub fn set(&mut self, x: u32, y: u32, ink: bool) {
        let i = y as usize * self.width as usize + x as usize;
        self.cells[i] = ink;
    }

    /// Number of ink pixels.
    #[must_use]
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Row-major index of `(x, y)` if it is inside the grid.
    #[must_use]
    pub fn index(&self, x: i64, y: i64) -> Option<usize> {
        let (w, h) = (i64::from(self.width), i64::from(self.height));
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        ((0..w).contains(&x) && (0..h).contains(&y)).then(|| (y * w + x) as usize)
    }
}

/// Perceived brightness of an RGB triple.
#[must_use]
pub fn luma(r: u8, g: u8, b: u8) -> f64 {
    0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)
}

/// Classifies every pixel with the strategy the options select.
#[must_use]
pub fn classify(image: &PixelBuffer, options: &TraceOptions) -> InkMask {
    match options.mode {
        TraceMode::Edges => edge_threshold(image, options.threshold),
        TraceMode::Luminance if options.adaptive => adaptive_threshold(image, options.invert),
        TraceMode::Luminance => global_threshold(image, options.threshold, options.invert),
    }
}

/// Ink where luma is below `threshold` (above it when `invert`).
#[must_use]
pub fn global_threshold(image: &PixelBuffer, threshold: u8, invert: bool) -> InkMask {
    let cutoff = f64::from(threshold);
    let mut mask = InkMask::new(image.width(), image.height());
    for y in 0..image.height() {
        for x in 0..image.width() {
            let [r, g, b, a] = image.pixel(x, y);
            if a < ALPHA_CUTOFF {
                continue;
            }
            let dark = luma(r, g, b) < cutoff;
            mask.set(x, y, dark != invert);
        }
    }
    mask
}

/// Ink where luma is below [`ADAPTIVE_SENSITIVITY`] times the mean of a
/// centred window about `width / 20` pixels wide.
#[must_use]
pub fn adaptive_threshold(image: &PixelBuffer, invert: bool) -> InkMask {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let lumas = luma_grid(image);

    // Summed-area table with a zero row and column in front.
    let mut sat = vec![0.0_f64; (w + 1) * (h + 1)];
    for y in 0..h {
        let mut row = 0.0;
        for x in 0..w {
            row += lumas[y * w + x];
            sat[(y + 1) * (w + 1) + x + 1] = sat[y * (w + 1) + x + 1] + row;
        }
    }

    let window = (w / 20).max(3) | 1;
    let half = window / 2;
    let mut mask = InkMask::new(image.width(), image.height());
    for (y, py) in (0..image.height()).enumerate() {
        let (y0, y1) = (y.saturating_sub(half), (y + half + 1).min(h));
        for (x, px) in (0..image.width()).enumerate() {
            let [.., a] = image.pixel(px, py);
            if a < ALPHA_CUTOFF {
                continue;
            }
            let (x0, x1) = (x.saturating_sub(half), (x + half + 1).min(w));
            let sum = sat[y1 * (w + 1) + x1] - sat[y0 * (w + 1) + x1] - sat[y1 * (w + 1) + x0]
                + sat[y0 * (w + 1) + x0];
            #[allow(clippy::cast_precision_loss)]
            let mean = sum / ((x1 - x0) * (y1 - y0)) as f64;
            let dark = lumas[y * w + x] < mean * ADAPTIVE_SENSITIVITY;
            mask.set(px, py, dark != invert);
        }
    }
    mask
}

/// Ink where the Sobel gradient magnitude of luma exceeds `threshold`.
#[must_use]
pub fn edge_threshold(image: &PixelBuffer, threshold: u8) -> InkMask {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let lumas = luma_grid(image);
    let at = |x: usize, y: usize, dx: isize, dy: isize| {
        let xx = x.saturating_add_signed(dx).min(w - 1);
        let yy = y.saturating_add_signed(dy).min(h - 1);
        lumas[yy * w + xx]
    };

    let cutoff = f64::from(threshold);
    let mut mask = InkMask::new(image.width(), image.height());
    for (y, py) in (0..image.height()).enumerate() {
        for (x, px) in (0..image.width()).enumerate() {
            let [.., a] = image.pixel(px, py);
            if a < ALPHA_CUTOFF {
                continue;
            }
            let gx = (at(x, y, 1, -1) + 2.0 * at(x, y, 1, 0) + at(x, y, 1, 1))
                - (at(x, y, -1, -1) + 2.0 * at(x, y, -1, 0) + at(x, y, -1, 1));
            let gy = (at(x, y, -1, 1) + 2.0 * at(x, y, 0, 1) + at(x, y, 1, 1))
                - (at(x, y, -1, -1) + 2.0 * at(x, y, 0, -1) + at(x, y, 1, -1));
            mask.set(px, py, gx.hypot(gy) > cutoff);
        }
    }
    mask
}

/// Luma per pixel; transparent pixels read as white.
fn luma_grid(image: &PixelBuffer) -> Vec<f64> {
    let mut out = Vec::with_capacity(image.width() as usize * image.height() as usize);
    for y in 0..image.height() {
        for x in 0..image.width() {
            let [r, g, b, a] = image.pixel(x, y);
            out.push(if a < ALPHA_CUTOFF { 255.0 } else { luma(r, g, b) });
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn buffer(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 4]) -> PixelBuffer {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend(f(x, y));
            }
        }
        PixelBuffer::new(width, height, data).unwrap()
    }

    // ── Global ─────────────────────────────────────────────────

    #[test]
    fn dark_pixels_are_ink() {
        let img = buffer(4, 1, |x, _| if x < 2 { [0, 0, 0, 255] } else { [255, 255, 255, 255] });
        let mask = global_threshold(&img, 128, false);
        assert!(mask.get(0, 0) && mask.get(1, 0));
        assert!(!mask.get(2, 0) && !mask.get(3, 0));

        let inverted = global_threshold(&img, 128, true);
        assert!(!inverted.get(0, 0) && inverted.get(3, 0));
    }

    #[test]
    fn transparent_pixels_are_background_even_inverted() {
        let img = buffer(2, 1, |x, _| if x == 0 { [0, 0, 0, 0] } else { [255, 255, 255, 255] });
        assert!(!global_threshold(&img, 128, false).get(0, 0));
        let inverted = global_threshold(&img, 128, true);
        assert!(!inverted.get(0, 0));
        assert!(inverted.get(1, 0));
    }

    #[test]
    fn luma_weights() {
        assert!((luma(255, 255, 255) - 255.0).abs() < 1e-9);
        assert!(luma(0, 255, 0) > luma(255, 0, 0));
        assert!(luma(255, 0, 0) > luma(0, 0, 255));
    }

    // ── Adaptive ───────────────────────────────────────────────

    #[test]
    fn adaptive_handles_uneven_lighting() {
        // Left-to-right gradient background with a darker stripe on each
        // half; a fixed threshold would miss the right stripe.
        let img = buffer(100, 20, |x, _| {
            let base = u8::try_from(80 + x * 17 / 10).unwrap();
            let v = if x == 20 || x == 80 { base / 2 } else { base };
            [v, v, v, 255]
        });
        let mask = adaptive_threshold(&img, false);
        assert!(mask.get(20, 10));
        assert!(mask.get(80, 10));
        assert!(!mask.get(50, 10));
        assert!(!global_threshold(&img, 100, false).get(80, 10));
    }

    // ── Edges ──────────────────────────────────────────────────

    #[test]
    fn edges_mark_only_the_boundary() {
        let img = buffer(20, 20, |x, _| if x < 10 { [0, 0, 0, 255] } else { [255, 255, 255, 255] });
        let mask = edge_threshold(&img, 100);
        assert!(mask.get(9, 10) && mask.get(10, 10));
        assert!(!mask.get(2, 10) && !mask.get(17, 10));
    }

    #[test]
    fn classify_dispatches_on_mode() {
        let img = buffer(20, 20, |x, _| if x < 10 { [0, 0, 0, 255] } else { [255, 255, 255, 255] });
        let edges = TraceOptions {
            mode: TraceMode::Edges,
            ..TraceOptions::default()
        };
        assert!(!classify(&img, &edges).get(2, 10));
        assert!(classify(&img, &TraceOptions::default()).get(2, 10));
    }

    #[test]
    fn out_of_bounds_is_background() {
        let mut mask = InkMask::new(2, 2);
        mask.set(0, 0, true);
        assert!(mask.get(0, 0));
        assert!(!mask.get(-1, 0));
        assert!(!mask.get(0, 2));
        assert_eq!(mask.count(), 1);
    }
}
