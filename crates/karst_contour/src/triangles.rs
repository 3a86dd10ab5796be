//! # Filled-Quad Expansion
//!
//! The shared-memory runner's intermediate visualization: every wall cell
//! becomes a filled quad, expressed as two triangles (six vertices). This
//! is a direct, lossless per-cell expansion with no relation to the contour
//! algorithm; the renderer draws the vertex list as-is.

use karst_core::Grid;

use crate::geom::Point2;

/// Expands every wall cell into two world-space triangles.
///
/// Output is a flat vertex list, three vertices per triangle, six per wall
/// cell, in row-major cell order.
#[must_use]
pub fn wall_triangles(grid: &Grid, tile_size: f32) -> Vec<Point2> {
    let mut vertices = Vec::with_capacity(grid.wall_count() * 6);

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if !grid.get(x, y).is_wall() {
                continue;
            }
            let x0 = x as f32 * tile_size;
            let y0 = y as f32 * tile_size;
            let x1 = x0 + tile_size;
            let y1 = y0 + tile_size;

            let tl = Point2::new(x0, y0);
            let tr = Point2::new(x1, y0);
            let br = Point2::new(x1, y1);
            let bl = Point2::new(x0, y1);

            vertices.extend_from_slice(&[tl, tr, br, tl, br, bl]);
        }
    }
    vertices
}
