use super::threshold::InkMask;

const NEIGHBORS_4: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Morphological closing: one 4-neighbour dilation then one erosion.
///
/// Bridges one-pixel gaps in thin strokes without growing solid regions.
#[must_use]
pub fn close(mask: &InkMask) -> InkMask {
    erode(&dilate(mask))
}

/// A pixel becomes ink if it or any 4-neighbour is ink.
#[must_use]
pub fn dilate(mask: &InkMask) -> InkMask {
    apply(mask, |x, y| {
        mask.get(x, y) || NEIGHBORS_4.iter().any(|(dx, dy)| mask.get(x + dx, y + dy))
    })
}

/// A pixel stays ink only if every in-image 4-neighbour is ink.
#[must_use]
pub fn erode(mask: &InkMask) -> InkMask {
    apply(mask, |x, y| {
        mask.get(x, y)
            && NEIGHBORS_4.iter().all(|(dx, dy)| {
                mask.index(x + dx, y + dy).is_none() || mask.get(x + dx, y + dy)
            })
    })
}

fn apply(mask: &InkMask, f: impl Fn(i64, i64) -> bool) -> InkMask {
    let mut out = InkMask::new(mask.width(), mask.height());
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            out.set(x, y, f(i64::from(x), i64::from(y)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(rows: &[&str]) -> InkMask {
        let h = u32::try_from(rows.len()).unwrap_or(0);
        let w = u32::try_from(rows[0].len()).unwrap_or(0);
        let mut mask = InkMask::new(w, h);
        for (y, row) in (0..).zip(rows) {
            for (x, c) in (0..).zip(row.chars()) {
                mask.set(x, y, c == '#');
            }
        }
        mask
    }

    #[test]
    fn closing_bridges_single_gap() {
        let mask = mask_from(&[".....", "##.##", "##.##", "##.##", "....."]);
        let closed = close(&mask);
        assert!(closed.get(2, 2));
        assert!(!closed.get(2, 1));
        assert!(!closed.get(2, 0));
    }

    #[test]
    fn closing_keeps_solid_block() {
        let mask = mask_from(&[
            ".......",
            ".......",
            "..###..",
            "..###..",
            "..###..",
            ".......",
            ".......",
        ]);
        assert_eq!(close(&mask), mask);
    }

    #[test]
    fn dilate_then_erode_counts() {
        let mask = mask_from(&["...", ".#.", "..."]);
        assert_eq!(dilate(&mask).count(), 5);
        assert_eq!(erode(&mask).count(), 0);
    }
}
