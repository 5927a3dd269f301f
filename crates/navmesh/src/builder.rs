//! Geometry-to-graph builder
//!
//! Turns a flat triangle mesh into a [`NavPolygon`] graph: duplicate
//! vertices are merged at a fixed decimal precision so adjacency detection
//! is robust to floating-point divergence between coincident vertices,
//! then per-triangle polygons are linked to every polygon they share an
//! edge with.

use glam::Vec3;
use navmesh_common::{vec3_at, TriMesh};

use crate::navigation::NavigationConfig;
use crate::polygon::{NavPolygon, NavigationMesh};

use std::collections::HashMap;

/// Merges positionally-duplicate vertices and remaps the index buffer.
///
/// Each vertex is quantized to `precision_decimals` decimal digits; vertices
/// with the same quantized position collapse to a single entry. Triangles
/// that become degenerate after remapping (two or more corners on the same
/// vertex) are dropped from the index list entirely.
///
/// Returns the number of vertices removed. Running the merge on its own
/// output is a no-op.
pub fn merge_vertices(
    vertices: &mut Vec<f32>,
    indices: &mut Vec<u32>,
    precision_decimals: u32,
) -> usize {
    let precision = 10f32.powi(precision_decimals as i32);

    let mut seen: HashMap<(i64, i64, i64), u32> = HashMap::new();
    let mut unique: Vec<f32> = Vec::new();
    // Old vertex index -> index into the deduplicated list
    let mut changes: Vec<u32> = Vec::with_capacity(vertices.len() / 3);

    for v in vertices.chunks_exact(3) {
        let key = (
            (v[0] * precision).round() as i64,
            (v[1] * precision).round() as i64,
            (v[2] * precision).round() as i64,
        );
        match seen.get(&key) {
            Some(&id) => changes.push(id),
            None => {
                let id = (unique.len() / 3) as u32;
                unique.extend_from_slice(v);
                seen.insert(key, id);
                changes.push(id);
            }
        }
    }

    let mut remapped = Vec::with_capacity(indices.len());
    for tri in indices.chunks_exact(3) {
        let a = changes[tri[0] as usize];
        let b = changes[tri[1] as usize];
        let c = changes[tri[2] as usize];

        // A face with duplicate corners is degenerate; nothing can be saved
        if a != b && b != c && c != a {
            remapped.extend_from_slice(&[a, b, c]);
        }
    }

    let removed = vertices.len() / 3 - unique.len() / 3;
    *vertices = unique;
    *indices = remapped;

    removed
}

/// Computes per-triangle centroids, stride 3 over the index buffer.
///
/// Degenerate (zero-area) triangles are not special-cased; callers must
/// tolerate their entries if any survived the merge.
pub fn compute_centroids(vertices: &[f32], indices: &[u32]) -> Vec<Vec3> {
    indices
        .chunks_exact(3)
        .map(|tri| {
            let p1 = vec3_at(vertices, tri[0]);
            let p2 = vec3_at(vertices, tri[1]);
            let p3 = vec3_at(vertices, tri[2]);
            (p1 + p2 + p3) / 3.0
        })
        .collect()
}

/// Constructs one polygon per triangle with sequential ids starting at 1.
///
/// The face normal is `(v1-v0) × (v1-v2)` normalized, matching the source
/// engine's winding convention; it is zero for degenerate input.
pub fn build_polygons(vertices: &[f32], indices: &[u32], centroids: &[Vec3]) -> Vec<NavPolygon> {
    let mut polygons = Vec::with_capacity(indices.len() / 3);
    let mut polygon_id = 1u32;

    for (tri, centroid) in indices.chunks_exact(3).zip(centroids) {
        let a = vec3_at(vertices, tri[0]);
        let b = vec3_at(vertices, tri[1]);
        let c = vec3_at(vertices, tri[2]);
        let normal = (b - a).cross(b - c).normalize_or_zero();

        polygons.push(NavPolygon {
            id: polygon_id,
            vertex_ids: tri.to_vec(),
            centroid: *centroid,
            normal,
            neighbours: Vec::new(),
            group: None,
        });
        polygon_id += 1;
    }

    polygons
}

/// Intersection of two small vertex-id lists, preserving `a`'s order.
///
/// Order preservation matters for portals: the pair must come out in the
/// owning polygon's winding order, not sorted by id.
pub(crate) fn array_intersect(a: &[u32], b: &[u32]) -> Vec<u32> {
    a.iter().filter(|v| b.contains(v)).copied().collect()
}

/// Links every polygon to all polygons it shares an edge (two or more
/// vertex ids) with.
///
/// Polygons whose centroids are farther apart than `search_radius` are
/// skipped without an intersection test. The radius is a scene-scale
/// heuristic: adjacency between polygons farther apart than that is
/// silently dropped.
pub fn build_neighbours(polygons: &mut [NavPolygon], search_radius: f32) {
    let radius_sq = search_radius * search_radius;

    for i in 0..polygons.len() {
        let mut neighbours = Vec::new();

        for j in 0..polygons.len() {
            if i == j {
                continue;
            }
            if polygons[i].centroid.distance_squared(polygons[j].centroid) > radius_sq {
                continue;
            }

            let matches = array_intersect(&polygons[i].vertex_ids, &polygons[j].vertex_ids);
            if matches.len() >= 2 {
                neighbours.push(polygons[j].id);
            }
        }

        polygons[i].neighbours = neighbours;
    }
}

/// Extracts the shared-edge vertex pair of two adjacent polygons, ordered
/// by `a`'s winding.
///
/// When the shared pair spans the wrap-around of a vertex list (first and
/// last entry both shared) that list is cyclically rotated left by one
/// before re-intersecting, so the returned pair is never given in a
/// degenerate order. The rotation persists on the polygon.
///
/// Returns an empty list when the polygons share fewer than 2 vertices.
pub fn shared_vertices_in_order(a_ids: &mut Vec<u32>, b_ids: &mut Vec<u32>) -> Vec<u32> {
    let shared = array_intersect(a_ids, b_ids);
    if shared.len() < 2 {
        return Vec::new();
    }

    for ids in [&mut *a_ids, &mut *b_ids] {
        if let (Some(first), Some(last)) = (ids.first(), ids.last()) {
            if shared.contains(first) && shared.contains(last) {
                ids.rotate_left(1);
            }
        }
    }

    array_intersect(a_ids, b_ids)
}

/// Runs the full geometry-to-graph pass: merge, centroids, polygons,
/// adjacency.
pub fn build_navigation_mesh(mesh: &TriMesh, config: &NavigationConfig) -> NavigationMesh {
    let mut vertices = mesh.vertices.clone();
    let mut indices = mesh.indices.clone();

    let removed = merge_vertices(&mut vertices, &mut indices, config.merge_precision_decimals);
    log::debug!(
        "merged {} duplicate vertices, {} triangles remain",
        removed,
        indices.len() / 3
    );

    let centroids = compute_centroids(&vertices, &indices);
    let mut polygons = build_polygons(&vertices, &indices, &centroids);
    build_neighbours(&mut polygons, config.neighbour_search_radius);

    NavigationMesh { polygons, vertices }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Two triangles sharing an edge, stored as 6 separate vertices so the
    // merge has duplicates to collapse
    fn quad_soup() -> (Vec<f32>, Vec<u32>) {
        let vertices = vec![
            0.0, 0.0, 0.0, // 0
            1.0, 0.0, 0.0, // 1
            1.0, 0.0, 1.0, // 2
            0.0, 0.0, 0.0, // 3 (dup of 0)
            1.0, 0.0, 1.0, // 4 (dup of 2)
            0.0, 0.0, 1.0, // 5
        ];
        let indices = vec![0, 1, 2, 3, 4, 5];
        (vertices, indices)
    }

    #[test]
    fn test_merge_vertices_collapses_duplicates() {
        let (mut vertices, mut indices) = quad_soup();
        let removed = merge_vertices(&mut vertices, &mut indices, 4);

        assert_eq!(removed, 2);
        assert_eq!(vertices.len() / 3, 4);
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_merge_vertices_is_idempotent() {
        let (mut vertices, mut indices) = quad_soup();
        merge_vertices(&mut vertices, &mut indices, 4);

        let (v2, i2) = (vertices.clone(), indices.clone());
        let removed = merge_vertices(&mut vertices, &mut indices, 4);

        assert_eq!(removed, 0);
        assert_eq!(vertices, v2);
        assert_eq!(indices, i2);
    }

    #[test]
    fn test_merge_vertices_drops_degenerate_triangle() {
        // All three corners quantize to the same vertex at 4 decimals
        let mut vertices = vec![
            0.0, 0.0, 0.0, //
            0.00001, 0.0, 0.0, //
            0.0, 0.0, 0.00001, //
            5.0, 0.0, 0.0, //
            6.0, 0.0, 0.0, //
            5.5, 0.0, 1.0, //
        ];
        let mut indices = vec![0, 1, 2, 3, 4, 5];
        merge_vertices(&mut vertices, &mut indices, 4);

        // Only the non-degenerate triangle survives
        assert_eq!(indices.len(), 3);
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_compute_centroids() {
        let vertices = vec![0.0, 0.0, 0.0, 3.0, 0.0, 0.0, 0.0, 3.0, 3.0];
        let centroids = compute_centroids(&vertices, &[0, 1, 2]);
        assert_eq!(centroids, vec![Vec3::new(1.0, 1.0, 1.0)]);
    }

    #[test]
    fn test_build_polygons_ids_start_at_one() {
        let (mut vertices, mut indices) = quad_soup();
        merge_vertices(&mut vertices, &mut indices, 4);
        let centroids = compute_centroids(&vertices, &indices);
        let polygons = build_polygons(&vertices, &indices, &centroids);

        assert_eq!(polygons.len(), 2);
        assert_eq!(polygons[0].id, 1);
        assert_eq!(polygons[1].id, 2);
        assert_eq!(polygons[0].vertex_ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_build_neighbours_symmetry() {
        let (mut vertices, mut indices) = quad_soup();
        merge_vertices(&mut vertices, &mut indices, 4);
        let centroids = compute_centroids(&vertices, &indices);
        let mut polygons = build_polygons(&vertices, &indices, &centroids);
        build_neighbours(&mut polygons, 100.0);

        assert_eq!(polygons[0].neighbours, vec![2]);
        assert_eq!(polygons[1].neighbours, vec![1]);
    }

    #[test]
    fn test_build_neighbours_prune_radius_drops_far_pairs() {
        let (mut vertices, mut indices) = quad_soup();
        merge_vertices(&mut vertices, &mut indices, 4);
        let centroids = compute_centroids(&vertices, &indices);
        let mut polygons = build_polygons(&vertices, &indices, &centroids);

        // A radius smaller than the centroid spacing suppresses adjacency
        build_neighbours(&mut polygons, 0.1);
        assert!(polygons[0].neighbours.is_empty());
        assert!(polygons[1].neighbours.is_empty());
    }

    #[test]
    fn test_shared_vertices_requires_two_matches() {
        let mut a = vec![0, 1, 2];
        let mut b = vec![2, 5, 6];
        assert!(shared_vertices_in_order(&mut a, &mut b).is_empty());
    }

    #[test]
    fn test_shared_vertices_wrap_around_rotation() {
        // The shared pair {0, 2} spans a's first and last entry
        let mut a = vec![0, 1, 2];
        let mut b = vec![0, 2, 3];
        let portal = shared_vertices_in_order(&mut a, &mut b);

        // a was rotated so the pair comes out in winding order
        assert_eq!(a, vec![1, 2, 0]);
        assert_eq!(portal, vec![2, 0]);
    }

    #[test]
    fn test_shared_vertices_plain_edge() {
        let mut a = vec![4, 1, 2];
        let mut b = vec![1, 2, 7];
        let portal = shared_vertices_in_order(&mut a, &mut b);

        assert_eq!(a, vec![4, 1, 2]);
        assert_eq!(portal, vec![1, 2]);
    }
}
