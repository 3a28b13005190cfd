//! Scanline arithmetic: vertex ordering, edge slopes and span clipping

use std::ops::Range;

use super::types::Vertex;

/// Order three vertices by ascending y.
///
/// Fixed compare-and-swap network: (v1, v0), (v2, v0), (v2, v1). Equal y values
/// are never swapped, so the sort is stable.
pub fn sort_by_y(mut v0: Vertex, mut v1: Vertex, mut v2: Vertex) -> (Vertex, Vertex, Vertex) {
    if v1.y < v0.y {
        std::mem::swap(&mut v1, &mut v0);
    }
    if v2.y < v0.y {
        std::mem::swap(&mut v2, &mut v0);
    }
    if v2.y < v1.y {
        std::mem::swap(&mut v2, &mut v1);
    }
    (v0, v1, v2)
}

/// Horizontal advance per unit of vertical advance along `start -> end`.
/// Returns `None` for a level edge, where the slope is undefined.
pub fn edge_step(start: Vertex, end: Vertex) -> Option<f32> {
    let dy = end.y - start.y;
    if dy == 0.0 {
        return None;
    }
    let step = (end.x - start.x) / dy;
    step.is_finite().then_some(step)
}

/// Row offsets `row` of a span starting at `y0` and `span` rows tall that land on
/// the framebuffer.
///
/// Offsets satisfy `row < span` and the pixel row `floor(y0 + row)` lies in
/// `0..height`. Anything outside is clipped here so the fill loop never sees it.
pub fn clip_rows(y0: f32, span: f32, height: usize) -> Range<i64> {
    if !(span > 0.0) || height == 0 {
        return 0..0;
    }
    let first = (-y0).ceil().max(0.0);
    let last = span.ceil().min((height as f32 - y0).ceil());
    if last <= first {
        return 0..0;
    }
    first as i64..last as i64
}

/// Inclusive column range `floor(left)..=floor(right)`, clipped to `0..width`.
/// `None` when the span misses the framebuffer entirely.
pub fn clip_columns(left: f32, right: f32, width: usize) -> Option<(usize, usize)> {
    if width == 0 || left.is_nan() || right.is_nan() {
        return None;
    }
    let start = left.floor();
    let end = right.floor();
    if end < 0.0 || start >= width as f32 || end < start {
        return None;
    }
    Some((start.max(0.0) as usize, end.min(width as f32 - 1.0) as usize))
}

/// Pixel row for a row offset from `y0`, or `None` if it falls off the buffer
/// (only possible once f32 precision runs out on very large coordinates).
pub fn pixel_row(y0: f32, row: i64, height: usize) -> Option<usize> {
    let y = (y0 + row as f32).floor();
    (y >= 0.0 && y < height as f32).then_some(y as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vertex {
        Vertex::new(x, y)
    }

    #[test]
    fn test_sort_by_y_all_orders() {
        let a = v(1.0, 0.0);
        let b = v(2.0, 5.0);
        let c = v(3.0, 9.0);
        let orders = [(a, b, c), (a, c, b), (b, a, c), (b, c, a), (c, a, b), (c, b, a)];
        for (p, q, r) in orders {
            let (s0, s1, s2) = sort_by_y(p, q, r);
            assert_eq!((s0, s1, s2), (a, b, c));
        }
    }

    #[test]
    fn test_sort_by_y_is_stable_for_ties() {
        let a = v(1.0, 3.0);
        let b = v(2.0, 3.0);
        let c = v(3.0, 0.0);
        let (s0, s1, s2) = sort_by_y(a, b, c);
        assert_eq!(s0, c);
        assert_eq!(s1, a);
        assert_eq!(s2, b);
    }

    #[test]
    fn test_edge_step() {
        assert_eq!(edge_step(v(0.0, 0.0), v(100.0, 100.0)), Some(1.0));
        assert_eq!(edge_step(v(0.0, 0.0), v(400.0, 100.0)), Some(4.0));
        assert_eq!(edge_step(v(5.0, 2.0), v(9.0, 2.0)), None);
    }

    #[test]
    fn test_clip_rows() {
        assert_eq!(clip_rows(0.0, 100.0, 480), 0..100);
        assert_eq!(clip_rows(0.0, 0.0, 480), 0..0);
        // Starts above the buffer
        assert_eq!(clip_rows(-10.0, 20.0, 480), 10..20);
        // Runs past the bottom
        assert_eq!(clip_rows(470.0, 100.0, 480), 0..10);
        // Fractional span still covers the partial last row
        assert_eq!(clip_rows(0.0, 2.5, 480), 0..3);
        // Entirely below
        assert_eq!(clip_rows(500.0, 10.0, 480), 0..0);
    }

    #[test]
    fn test_clip_rows_huge_span_is_bounded() {
        assert_eq!(clip_rows(0.0, 1.0e30, 8), 0..8);
        assert_eq!(clip_rows(2.0, f32::INFINITY, 8), 0..6);
    }

    #[test]
    fn test_pixel_row() {
        assert_eq!(pixel_row(10.5, 3, 480), Some(13));
        assert_eq!(pixel_row(-10.5, 10, 480), None);
        assert_eq!(pixel_row(-10.5, 11, 480), Some(0));
        assert_eq!(pixel_row(479.0, 1, 480), None);
    }

    #[test]
    fn test_clip_columns() {
        assert_eq!(clip_columns(50.0, 200.0, 640), Some((50, 200)));
        assert_eq!(clip_columns(-5.0, 3.0, 640), Some((0, 3)));
        assert_eq!(clip_columns(630.0, 700.0, 640), Some((630, 639)));
        assert_eq!(clip_columns(-10.0, -1.0, 640), None);
        assert_eq!(clip_columns(640.0, 650.0, 640), None);
        assert_eq!(clip_columns(2.7, 2.9, 640), Some((2, 2)));
        assert_eq!(clip_columns(f32::NAN, 3.0, 640), None);
    }
}
