//! Marching-cubes isosurface extraction with gradient normals.
//!
//! Each lattice cell is classified by which corners lie below the signed
//! threshold; the case tables then give the crossed edges and the emitted
//! triangles. Intersection points are linearly interpolated along edges and
//! vertex normals come from the central-difference gradient of the field,
//! negated so they point out of the enclosed (above-threshold) region. The
//! result is Phong-shadeable geometry rather than faceted per-face normals.
//!
//! Extraction is a pure function of its inputs: no shared state, safe to
//! run concurrently for different fields or thresholds. Cells are processed
//! in independent z-slabs in parallel and concatenated in slab order, so
//! the output is deterministic.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};

/// Length below which an interpolated gradient is considered degenerate and
/// replaced by an arbitrary unit normal.
const DEGENERATE_GRADIENT: f64 = 1e-12;

/// An unindexed triangle list with per-vertex normals.
///
/// `positions` and `normals` are parallel arrays: every 9 consecutive
/// floats describe one triangle's three vertices. Both are sized exactly to
/// the emitted triangles; an empty mesh is the valid "no surface at this
/// threshold" result, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriangleMesh {
    /// Vertex positions, 3 floats per vertex.
    pub positions: Vec<f32>,
    /// Outward unit vertex normals, 3 floats per vertex.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Number of triangles in the buffer.
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 9
    }

    /// True when no surface was emitted.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Reverse the facing of every triangle: negate each normal component
    /// and swap each triangle's second and third vertices in both arrays.
    ///
    /// A negative-threshold extraction is inside-out relative to the sign
    /// convention used for shading; applying this flip makes the
    /// negative-lobe sheet outward-facing again.
    pub fn flip_orientation(&mut self) {
        for component in &mut self.normals {
            *component = -*component;
        }
        for triangle in 0..self.triangle_count() {
            let base = triangle * 9;
            for axis in 0..3 {
                self.positions.swap(base + 3 + axis, base + 6 + axis);
                self.normals.swap(base + 3 + axis, base + 6 + axis);
            }
        }
    }

    fn append(&mut self, mut other: TriangleMesh) {
        self.positions.append(&mut other.positions);
        self.normals.append(&mut other.normals);
    }
}

/// Errors raised by the extractor's preconditions.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("Grid resolution must be at least 2 to form cells, got {0}")]
    ResolutionTooSmall(usize),

    #[error("Field length {actual} does not match grid size {grid_size}³ = {expected}")]
    FieldSizeMismatch {
        grid_size: usize,
        expected: usize,
        actual: usize,
    },
}

/// Extract the isosurface `{p : field(p) = isovalue}` as a triangle mesh.
///
/// `values` holds `grid_size³` samples in (z, y, x)-major order over the
/// cubic box `[bounds[0], bounds[1]]³`.
///
/// Edge semantics:
/// - an isovalue of exactly 0, or a field entirely above or below the
///   threshold, yields an empty mesh (valid, not an error);
/// - a resolution below 2 has no cells and fails fast.
///
/// # Arguments
/// * `values` - Flat field samples, (z, y, x)-major.
/// * `grid_size` - Lattice points per axis.
/// * `bounds` - Cubic bounds `[min, max]` shared by all axes.
/// * `isovalue` - Signed extraction threshold.
pub fn marching_cubes(
    values: &[f64],
    grid_size: usize,
    bounds: [f64; 2],
    isovalue: f64,
) -> Result<TriangleMesh, MeshError> {
    if grid_size < 2 {
        return Err(MeshError::ResolutionTooSmall(grid_size));
    }
    let expected = grid_size * grid_size * grid_size;
    if values.len() != expected {
        return Err(MeshError::FieldSizeMismatch {
            grid_size,
            expected,
            actual: values.len(),
        });
    }
    // At threshold 0 the positive and negative sheets coincide on the nodal
    // surface; there is nothing renderable.
    if isovalue == 0.0 {
        return Ok(TriangleMesh::default());
    }

    let cells = grid_size - 1;
    let slabs: Vec<TriangleMesh> = (0..cells)
        .into_par_iter()
        .map(|iz| march_slab(values, grid_size, bounds, isovalue, iz))
        .collect();

    let mut mesh = TriangleMesh::default();
    for slab in slabs {
        mesh.append(slab);
    }
    Ok(mesh)
}

/// Extract both lobes of a signed field: the positive sheet at `+|isovalue|`
/// and the negative sheet at `−|isovalue|`, with the negative sheet's
/// orientation flipped so both face outward.
///
/// Returns `(positive, negative)`. Either sheet may be empty.
pub fn extract_lobes(
    values: &[f64],
    grid_size: usize,
    bounds: [f64; 2],
    isovalue: f64,
) -> Result<(TriangleMesh, TriangleMesh), MeshError> {
    let magnitude = isovalue.abs();
    let positive = marching_cubes(values, grid_size, bounds, magnitude)?;
    let mut negative = marching_cubes(values, grid_size, bounds, -magnitude)?;
    negative.flip_orientation();
    Ok((positive, negative))
}

/// March all cells of one z-slab.
fn march_slab(
    values: &[f64],
    grid_size: usize,
    bounds: [f64; 2],
    isovalue: f64,
    iz: usize,
) -> TriangleMesh {
    let step = (bounds[1] - bounds[0]) / (grid_size - 1) as f64;
    let sample = |ix: usize, iy: usize, iz: usize| values[(iz * grid_size + iy) * grid_size + ix];

    let mut mesh = TriangleMesh::default();
    let mut corner_values = [0.0f64; 8];

    for iy in 0..grid_size - 1 {
        for ix in 0..grid_size - 1 {
            for (corner, &(dx, dy, dz)) in CORNER_OFFSETS.iter().enumerate() {
                corner_values[corner] = sample(ix + dx, iy + dy, iz + dz);
            }

            let mut case_index = 0usize;
            for (corner, &value) in corner_values.iter().enumerate() {
                if value < isovalue {
                    case_index |= 1 << corner;
                }
            }

            // Fast reject: cells entirely above or below the threshold.
            let crossed = EDGE_TABLE[case_index];
            if crossed == 0 {
                continue;
            }

            // Intersection point and normal per crossed edge.
            let mut edge_points = [[0.0f64; 3]; 12];
            let mut edge_normals = [[0.0f64; 3]; 12];
            for edge in 0..12 {
                if crossed & (1 << edge) == 0 {
                    continue;
                }
                let (a, b) = EDGE_CORNERS[edge];
                let va = corner_values[a];
                let vb = corner_values[b];
                let denom = vb - va;
                let t = if denom.abs() < f64::EPSILON {
                    0.5
                } else {
                    ((isovalue - va) / denom).clamp(0.0, 1.0)
                };

                let (ax, ay, az) = CORNER_OFFSETS[a];
                let (bx, by, bz) = CORNER_OFFSETS[b];
                let (ax, ay, az) = (ix + ax, iy + ay, iz + az);
                let (bx, by, bz) = (ix + bx, iy + by, iz + bz);

                edge_points[edge] = [
                    bounds[0] + lerp(ax as f64, bx as f64, t) * step,
                    bounds[0] + lerp(ay as f64, by as f64, t) * step,
                    bounds[0] + lerp(az as f64, bz as f64, t) * step,
                ];

                let ga = lattice_gradient(values, grid_size, step, ax, ay, az);
                let gb = lattice_gradient(values, grid_size, step, bx, by, bz);
                // Negated gradient: out of the above-threshold region.
                edge_normals[edge] = normalise_or_fallback([
                    -lerp(ga[0], gb[0], t),
                    -lerp(ga[1], gb[1], t),
                    -lerp(ga[2], gb[2], t),
                ]);
            }

            for triple in TRI_TABLE[case_index].chunks(3) {
                if triple[0] == -1 {
                    break;
                }
                for &edge in triple {
                    let p = edge_points[edge as usize];
                    let n = edge_normals[edge as usize];
                    mesh.positions
                        .extend_from_slice(&[p[0] as f32, p[1] as f32, p[2] as f32]);
                    mesh.normals
                        .extend_from_slice(&[n[0] as f32, n[1] as f32, n[2] as f32]);
                }
            }
        }
    }

    mesh
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Central-difference gradient at a lattice node, one-sided at the boundary.
fn lattice_gradient(
    values: &[f64],
    grid_size: usize,
    step: f64,
    ix: usize,
    iy: usize,
    iz: usize,
) -> [f64; 3] {
    let sample = |ix: usize, iy: usize, iz: usize| values[(iz * grid_size + iy) * grid_size + ix];
    let max = grid_size - 1;

    let axis = |lo: f64, hi: f64, lo_i: usize, hi_i: usize| {
        // The denominator spans one lattice step at a face, two inside.
        (hi - lo) / ((hi_i - lo_i) as f64 * step)
    };

    let (xm, xp) = (ix.saturating_sub(1), (ix + 1).min(max));
    let (ym, yp) = (iy.saturating_sub(1), (iy + 1).min(max));
    let (zm, zp) = (iz.saturating_sub(1), (iz + 1).min(max));

    [
        axis(sample(xm, iy, iz), sample(xp, iy, iz), xm, xp),
        axis(sample(ix, ym, iz), sample(ix, yp, iz), ym, yp),
        axis(sample(ix, iy, zm), sample(ix, iy, zp), zm, zp),
    ]
}

/// Normalise a vector, falling back to +z when the length is degenerate.
fn normalise_or_fallback(v: [f64; 3]) -> [f64; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len < DEGENERATE_GRADIENT {
        return [0.0, 0.0, 1.0];
    }
    [v[0] / len, v[1] / len, v[2] / len]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// A radial field `R − |p|`: positive inside radius R, crossing zero on
    /// the sphere |p| = R.
    fn sphere_field(grid_size: usize, bounds: [f64; 2], radius: f64) -> Vec<f64> {
        let step = (bounds[1] - bounds[0]) / (grid_size - 1) as f64;
        let mut values = Vec::with_capacity(grid_size * grid_size * grid_size);
        for iz in 0..grid_size {
            for iy in 0..grid_size {
                for ix in 0..grid_size {
                    let x = bounds[0] + ix as f64 * step;
                    let y = bounds[0] + iy as f64 * step;
                    let z = bounds[0] + iz as f64 * step;
                    values.push(radius - (x * x + y * y + z * z).sqrt());
                }
            }
        }
        values
    }

    #[test]
    fn test_resolution_below_two_is_rejected() {
        for bad in [0, 1] {
            let values = vec![0.0; bad * bad * bad];
            let result = marching_cubes(&values, bad, [-1.0, 1.0], 0.5);
            assert!(matches!(result, Err(MeshError::ResolutionTooSmall(_))));
        }
    }

    #[test]
    fn test_field_size_mismatch_is_rejected() {
        let values = vec![0.0; 7];
        let result = marching_cubes(&values, 2, [-1.0, 1.0], 0.5);
        assert!(matches!(
            result,
            Err(MeshError::FieldSizeMismatch { expected: 8, actual: 7, .. })
        ));
    }

    #[test]
    fn test_zero_isovalue_yields_empty_mesh() {
        let values = sphere_field(8, [-1.0, 1.0], 0.6);
        let mesh = marching_cubes(&values, 8, [-1.0, 1.0], 0.0).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_uniform_field_yields_empty_mesh() {
        let values = vec![0.0; 16 * 16 * 16];
        let mesh = marching_cubes(&values, 16, [-1.0, 1.0], 0.02).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_threshold_outside_field_range_yields_empty_mesh() {
        let values = sphere_field(12, [-1.0, 1.0], 0.6);
        // Global max is 0.6 at the centre; min is 0.6 − √3.
        let above = marching_cubes(&values, 12, [-1.0, 1.0], 1.5).unwrap();
        assert!(above.is_empty());
        let below = marching_cubes(&values, 12, [-1.0, 1.0], -2.0).unwrap();
        assert!(below.is_empty());
    }

    #[test]
    fn test_sphere_surface_properties() {
        let grid_size = 24;
        let bounds = [-1.0, 1.0];
        let radius = 0.6;
        let values = sphere_field(grid_size, bounds, radius);
        let mesh = marching_cubes(&values, grid_size, bounds, 0.1).unwrap();

        assert!(!mesh.is_empty(), "sphere extraction must emit triangles");
        assert_eq!(mesh.positions.len(), mesh.normals.len());
        assert_eq!(mesh.positions.len() % 9, 0);

        // The isosurface of R − |p| at 0.1 is the sphere |p| = 0.5; every
        // vertex should sit near it, well within a lattice step.
        let step = (bounds[1] - bounds[0]) / (grid_size - 1) as f64;
        for vertex in mesh.positions.chunks(3) {
            let r = vertex
                .iter()
                .map(|&c| (c as f64) * (c as f64))
                .sum::<f64>()
                .sqrt();
            assert!(
                (r - 0.5).abs() < step,
                "vertex at radius {r} strays from the isosurface"
            );
        }

        // Normals are unit length and point outward (away from the centre
        // for this field).
        for (vertex, normal) in mesh.positions.chunks(3).zip(mesh.normals.chunks(3)) {
            let len: f64 = normal.iter().map(|&n| (n as f64) * (n as f64)).sum::<f64>().sqrt();
            assert_relative_eq!(len, 1.0, epsilon = 1e-6);
            let dot: f64 = vertex
                .iter()
                .zip(normal.iter())
                .map(|(&p, &n)| p as f64 * n as f64)
                .sum();
            assert!(dot > 0.0, "normal points inward at {vertex:?}");
        }
    }

    #[test]
    fn test_winding_matches_vertex_normals() {
        let grid_size = 20;
        let bounds = [-1.0, 1.0];
        let values = sphere_field(grid_size, bounds, 0.7);
        let mesh = marching_cubes(&values, grid_size, bounds, 0.2).unwrap();
        assert!(!mesh.is_empty());
        assert_no_inverted_faces(&mesh);
    }

    #[test]
    fn test_flip_orientation_swaps_winding_and_normals() {
        let mut mesh = TriangleMesh {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normals: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        };
        mesh.flip_orientation();
        // Second and third vertices exchanged.
        assert_eq!(&mesh.positions[3..6], &[0.0, 1.0, 0.0]);
        assert_eq!(&mesh.positions[6..9], &[1.0, 0.0, 0.0]);
        // Normals negated.
        assert!(mesh.normals.iter().skip(2).step_by(3).all(|&z| z == -1.0));
        // Flipping twice restores the original.
        mesh.flip_orientation();
        assert_eq!(&mesh.positions[3..6], &[1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_negative_lobe_of_signed_field() {
        // A signed field with one positive and one negative blob along x.
        let grid_size = 24;
        let bounds = [-2.0, 2.0];
        let step = (bounds[1] - bounds[0]) / (grid_size - 1) as f64;
        let mut values = Vec::with_capacity(grid_size * grid_size * grid_size);
        for iz in 0..grid_size {
            for iy in 0..grid_size {
                for ix in 0..grid_size {
                    let x = bounds[0] + ix as f64 * step;
                    let y = bounds[0] + iy as f64 * step;
                    let z = bounds[0] + iz as f64 * step;
                    let plus = 0.8 - ((x - 1.0).powi(2) + y * y + z * z).sqrt();
                    let minus = 0.8 - ((x + 1.0).powi(2) + y * y + z * z).sqrt();
                    values.push(plus.max(0.0) - minus.max(0.0));
                }
            }
        }

        let (positive, negative) = extract_lobes(&values, grid_size, bounds, 0.3).unwrap();
        assert!(!positive.is_empty());
        assert!(!negative.is_empty());

        // Each sheet sits on its own side of the yz-plane.
        assert!(positive.positions.chunks(3).all(|v| v[0] > 0.0));
        assert!(negative.positions.chunks(3).all(|v| v[0] < 0.0));

        // After the orientation flip both sheets satisfy the winding
        // invariant.
        assert_no_inverted_faces(&positive);
        assert_no_inverted_faces(&negative);
    }

    /// Winding invariant: each triangle's geometric normal agrees with its
    /// averaged vertex normals. Degenerate slivers are skipped.
    fn assert_no_inverted_faces(mesh: &TriangleMesh) {
        for (tri_pos, tri_norm) in mesh.positions.chunks(9).zip(mesh.normals.chunks(9)) {
            let a = [tri_pos[0] as f64, tri_pos[1] as f64, tri_pos[2] as f64];
            let b = [tri_pos[3] as f64, tri_pos[4] as f64, tri_pos[5] as f64];
            let c = [tri_pos[6] as f64, tri_pos[7] as f64, tri_pos[8] as f64];
            let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let cross = [
                u[1] * v[2] - u[2] * v[1],
                u[2] * v[0] - u[0] * v[2],
                u[0] * v[1] - u[1] * v[0],
            ];
            let area = (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt();
            if area < 1e-12 {
                continue;
            }

            let avg = [
                (tri_norm[0] + tri_norm[3] + tri_norm[6]) as f64,
                (tri_norm[1] + tri_norm[4] + tri_norm[7]) as f64,
                (tri_norm[2] + tri_norm[5] + tri_norm[8]) as f64,
            ];
            let dot = cross[0] * avg[0] + cross[1] * avg[1] + cross[2] * avg[2];
            assert!(dot > 0.0, "inverted face: winding disagrees with normals");
        }
    }
}
