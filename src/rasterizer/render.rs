//! Triangle scan-fill
//! Flat color, no depth test: triangles are painted in mesh order, last write wins

use serde::{Deserialize, Serialize};

use super::buffer::ImageBuffer;
use super::math::{clip_columns, clip_rows, edge_step, pixel_row, sort_by_y};
use super::types::{Color, Mesh, Triangle, Vertex};

/// Which spans of each triangle get filled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillMode {
    /// Upper span (top vertex to middle vertex) and lower span (middle to bottom)
    #[default]
    Full,
    /// Upper span only, with columns measured from x = 0 and the long edge stepped
    /// over the upper span's height. Reproduces the legacy half-triangle output.
    UpperSpan,
}

/// Counters from one [`render_mesh`] pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles: usize,
    /// Triangles that wrote no rows (non-finite, zero height or fully clipped)
    pub skipped: usize,
    /// Pixel rows written, each counted once per triangle
    pub rows: usize,
}

/// One straight run of scanlines between two edges.
/// Rows start at `y0`; row `r` covers `origin_a.x + (r + skip_a) * step_a` to
/// `origin_b.x + (r + skip_b) * step_b`.
struct Span {
    y0: f32,
    height: f32,
    origin_a: f32,
    step_a: f32,
    skip_a: f32,
    origin_b: f32,
    step_b: f32,
    skip_b: f32,
}

/// Fill every triangle of `mesh` into `fb`
pub fn render_mesh(fb: &mut ImageBuffer, mesh: &Mesh, fill: Color, mode: FillMode) -> RenderStats {
    let mut stats = RenderStats::default();

    for (idx, tri) in mesh.triangles().enumerate() {
        stats.triangles += 1;
        let rows = rasterize_triangle(fb, &tri, fill, mode);
        if rows == 0 {
            log::trace!("Triangle {} produced no rows: {:?}", idx, tri);
            stats.skipped += 1;
        }
        stats.rows += rows;
    }

    log::debug!(
        "Rendered {} triangles ({} skipped, {} rows) into {}x{}",
        stats.triangles,
        stats.skipped,
        stats.rows,
        fb.width(),
        fb.height()
    );
    stats
}

/// Rasterize a single triangle. Returns the number of rows written.
pub fn rasterize_triangle(fb: &mut ImageBuffer, tri: &Triangle, fill: Color, mode: FillMode) -> usize {
    if !tri.is_finite() {
        return 0;
    }

    let (v0, v1, v2) = sort_by_y(tri.v0, tri.v1, tri.v2);

    match mode {
        FillMode::UpperSpan => upper_span_origin_zero(v0, v1, v2)
            .map(|span| fill_span(fb, &span, fill))
            .unwrap_or(0),
        FillMode::Full => {
            let upper = upper_span(v0, v1, v2).map(|span| fill_span(fb, &span, fill));
            let lower = lower_span(v0, v1, v2).map(|span| fill_span(fb, &span, fill));
            upper.unwrap_or(0) + lower.unwrap_or(0)
        }
    }
}

/// Legacy upper span: both steps are taken over the v0->v1 height, including the
/// long edge's, and x is relative to column 0.
fn upper_span_origin_zero(v0: Vertex, v1: Vertex, v2: Vertex) -> Option<Span> {
    let height = v1.y - v0.y;
    if height == 0.0 {
        return None;
    }
    let step_a = (v1.x - v0.x) / height;
    let step_b = (v2.x - v0.x) / height;
    if !step_a.is_finite() || !step_b.is_finite() {
        return None;
    }
    Some(Span {
        y0: v0.y,
        height,
        origin_a: 0.0,
        step_a,
        skip_a: 0.0,
        origin_b: 0.0,
        step_b,
        skip_b: 0.0,
    })
}

fn upper_span(v0: Vertex, v1: Vertex, v2: Vertex) -> Option<Span> {
    let step_a = edge_step(v0, v1)?;
    let step_b = edge_step(v0, v2)?;
    Some(Span {
        y0: v0.y,
        height: v1.y - v0.y,
        origin_a: v0.x,
        step_a,
        skip_a: 0.0,
        origin_b: v0.x,
        step_b,
        skip_b: 0.0,
    })
}

/// Edges v1->v2 and the long edge v0->v2, picking the long edge up part way down.
/// Starts on the first row offset past the upper span, so a fractional `v1.y`
/// does not put both spans on the same pixel row.
fn lower_span(v0: Vertex, v1: Vertex, v2: Vertex) -> Option<Span> {
    let step_a = edge_step(v1, v2)?;
    let step_b = edge_step(v0, v2)?;
    let skip_b = (v1.y - v0.y).ceil();
    let y0 = v0.y + skip_b;
    Some(Span {
        y0,
        height: v2.y - y0,
        origin_a: v1.x,
        step_a,
        skip_a: y0 - v1.y,
        origin_b: v0.x,
        step_b,
        skip_b,
    })
}

fn fill_span(fb: &mut ImageBuffer, span: &Span, fill: Color) -> usize {
    let width = fb.width();
    let height = fb.height();
    let mut written = 0;

    for row in clip_rows(span.y0, span.height, height) {
        let Some(y) = pixel_row(span.y0, row, height) else {
            continue;
        };
        let r = row as f32;
        let mut x_left = span.origin_a + (r + span.skip_a) * span.step_a;
        let mut x_right = span.origin_b + (r + span.skip_b) * span.step_b;
        if x_left > x_right {
            std::mem::swap(&mut x_left, &mut x_right);
        }

        let Some((start, end)) = clip_columns(x_left, x_right, width) else {
            continue;
        };
        if let Some(pixels) = fb.row_mut(y) {
            pixels[start..=end].fill(fill);
            written += 1;
        }
    }

    written
}
