//! Data model for navigation mesh polygons and their grouped form
//!
//! A build pass turns raw triangle geometry into [`NavPolygon`]s with
//! adjacency information, then partitions them into connected groups of
//! [`GroupNode`]s that the query side searches over.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One triangle face of the walkable mesh, with adjacency information.
///
/// Created once during mesh import and immutable after the build step;
/// dynamic mesh modification is not supported.
#[derive(Debug, Clone)]
pub struct NavPolygon {
    /// Unique identifier, sequential from 1 and stable within a build
    pub id: u32,
    /// Ordered indices into the shared (deduplicated) vertex buffer
    pub vertex_ids: Vec<u32>,
    /// Arithmetic mean of the polygon's vertices
    pub centroid: Vec3,
    /// Face normal; follows the source winding, not necessarily outward
    pub normal: Vec3,
    /// Ids of polygons sharing at least one edge (two vertex ids)
    pub neighbours: Vec<u32>,
    /// Connected-component id, assigned once during partitioning
    pub group: Option<usize>,
}

/// Intermediate build product: all polygons plus the vertex buffer they index
#[derive(Debug, Clone, Default)]
pub struct NavigationMesh {
    pub polygons: Vec<NavPolygon>,
    /// Deduplicated vertex positions as flat [x, y, z] triples
    pub vertices: Vec<f32>,
}

/// A polygon scoped to one connected component, renumbered for search.
///
/// `neighbours[i]` is a valid index into the same group's node list and
/// `portals[i]` holds the ordered pair of shared vertex ids crossed when
/// stepping to that neighbour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupNode {
    /// Index within the group (not the original polygon id)
    pub id: usize,
    /// Indices of adjacent nodes within the same group
    pub neighbours: Vec<usize>,
    /// Ordered indices into the zone's shared vertex buffer
    pub vertex_ids: Vec<u32>,
    /// Polygon centroid, rounded to 2 decimals
    pub centroid: Vec3,
    /// Shared-edge vertex ids per neighbour, index-aligned with `neighbours`
    pub portals: Vec<Vec<u32>>,
    /// Uniform edge traversal cost
    pub cost: f32,
}

/// A zone's worth of navigation data: disjoint groups plus the vertex
/// buffer they reference. Plain data; serializable for save/load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupedNavMesh {
    /// Connected components, each independently searchable
    pub groups: Vec<Vec<GroupNode>>,
    /// Deduplicated vertex positions, rounded to 2 decimals
    pub vertices: Vec<f32>,
}

impl GroupedNavMesh {
    /// Total polygon count across all groups
    pub fn polygon_count(&self) -> usize {
        self.groups.iter().map(|g| g.len()).sum()
    }
}
