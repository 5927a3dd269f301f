//! Query façade: zone registry plus the public pathfinding entry points
//!
//! A [`Navigation`] owns every zone registered on it. Builds are pure
//! transforms and zones are replaced wholesale; queries borrow zone data
//! for the duration of the call only. Nothing here is synchronized:
//! rebuilding a zone while serving queries elsewhere needs external
//! locking.

use glam::Vec3;
use navmesh_common::{vec3_at, TriMesh};

use crate::astar::a_star_search;
use crate::builder::build_navigation_mesh;
use crate::channel::Channel;
use crate::groups::{group_nav_mesh, GroupGraph};
use crate::polygon::{GroupNode, GroupedNavMesh};

use std::collections::HashMap;

/// Tunables for the build pass
#[derive(Debug, Clone, Copy)]
pub struct NavigationConfig {
    /// Decimal digits used when quantizing vertices for the merge
    pub merge_precision_decimals: u32,
    /// Centroid-distance prune radius for the adjacency pass. A fixed
    /// scene-scale heuristic; adjacency between polygons farther apart is
    /// silently dropped, so very large or very small scale meshes may
    /// need a different value.
    pub neighbour_search_radius: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            merge_precision_decimals: 4,
            neighbour_search_radius: 100.0,
        }
    }
}

/// Navigation mesh builder and query entry point
#[derive(Debug, Default)]
pub struct Navigation {
    zone_nodes: HashMap<String, GroupedNavMesh>,
    config: NavigationConfig,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NavigationConfig) -> Self {
        Self {
            zone_nodes: HashMap::new(),
            config,
        }
    }

    /// Builds the grouped polygon graph for a mesh's geometry.
    ///
    /// Pure transform; nothing is registered until
    /// [`set_zone_data`](Navigation::set_zone_data) is called.
    pub fn build_nodes(&self, mesh: &TriMesh) -> GroupedNavMesh {
        let nav_mesh = build_navigation_mesh(mesh, &self.config);
        group_nav_mesh(nav_mesh)
    }

    /// Registers (or wholesale replaces) a zone under a name
    pub fn set_zone_data(&mut self, zone: &str, data: GroupedNavMesh) {
        self.zone_nodes.insert(zone.to_string(), data);
    }

    /// Read access to a registered zone
    pub fn zone(&self, zone: &str) -> Option<&GroupedNavMesh> {
        self.zone_nodes.get(zone)
    }

    /// Finds the group whose closest polygon centroid is nearest to
    /// `position`.
    ///
    /// Linear scan over every centroid in the zone; `None` for an unknown
    /// zone or one with no polygons.
    pub fn get_group(&self, zone: &str, position: Vec3) -> Option<usize> {
        let zone_data = self.zone_nodes.get(zone)?;

        let mut closest_group = None;
        let mut distance = f32::INFINITY;
        for (index, group) in zone_data.groups.iter().enumerate() {
            for node in group {
                let measured = node.centroid.distance_squared(position);
                if measured < distance {
                    closest_group = Some(index);
                    distance = measured;
                }
            }
        }

        closest_group
    }

    /// Finds a walkable path between two world points within one group of
    /// a zone.
    ///
    /// The endpoints snap to the nearest polygon centroid in the group, A*
    /// produces the polygon corridor, and the funnel pass pulls it taut.
    /// The returned waypoints exclude the first (the caller already knows
    /// their own position). Empty means "could not path": unknown zone,
    /// group index out of range, or no route.
    pub fn find_path(&self, start: Vec3, target: Vec3, zone: &str, group: usize) -> Vec<Vec3> {
        let Some(zone_data) = self.zone_nodes.get(zone) else {
            return Vec::new();
        };
        let Some(nodes) = zone_data.groups.get(group) else {
            return Vec::new();
        };
        let vertices = &zone_data.vertices;

        let (Some(closest), Some(farthest)) =
            (nearest_node(nodes, start), nearest_node(nodes, target))
        else {
            return Vec::new();
        };

        let path_ids = a_star_search(&GroupGraph::new(nodes), closest, farthest);
        if path_ids.is_empty() {
            return Vec::new();
        }

        // Pull the rope through the corridor's portal edges
        let mut channel = Channel::new();
        channel.push(start);
        for pair in path_ids.windows(2) {
            let polygon = &nodes[pair[0]];
            let next = &nodes[pair[1]];
            if let Some(portal) = portal_from_to(polygon, next) {
                if portal.len() >= 2 {
                    channel.push_portal(vec3_at(vertices, portal[0]), vec3_at(vertices, portal[1]));
                }
            }
        }
        channel.push(target);
        channel.string_pull();

        channel.path.iter().skip(1).copied().collect()
    }
}

/// Index of the node whose centroid is closest to `position`
fn nearest_node(nodes: &[GroupNode], position: Vec3) -> Option<usize> {
    let mut best = None;
    let mut distance = f32::INFINITY;
    for (index, node) in nodes.iter().enumerate() {
        let measured = node.centroid.distance_squared(position);
        if measured < distance {
            best = Some(index);
            distance = measured;
        }
    }
    best
}

/// The portal crossed when stepping from `a` to its neighbour `b`
fn portal_from_to<'a>(a: &'a GroupNode, b: &GroupNode) -> Option<&'a [u32]> {
    a.neighbours
        .iter()
        .position(|&n| n == b.id)
        .map(|i| a.portals[i].as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_group_unknown_zone() {
        let nav = Navigation::new();
        assert_eq!(nav.get_group("nowhere", Vec3::ZERO), None);
    }

    #[test]
    fn test_find_path_unknown_zone_is_empty() {
        let nav = Navigation::new();
        assert!(nav.find_path(Vec3::ZERO, Vec3::ONE, "nowhere", 0).is_empty());
    }

    #[test]
    fn test_find_path_group_out_of_range_is_empty() {
        let mut nav = Navigation::new();
        nav.set_zone_data("level", GroupedNavMesh::default());
        assert!(nav.find_path(Vec3::ZERO, Vec3::ONE, "level", 3).is_empty());
    }

    #[test]
    fn test_set_zone_data_replaces_wholesale() {
        let mut nav = Navigation::new();
        nav.set_zone_data("level", GroupedNavMesh::default());
        let replacement = GroupedNavMesh {
            groups: vec![Vec::new()],
            vertices: Vec::new(),
        };
        nav.set_zone_data("level", replacement);
        assert_eq!(nav.zone("level").map(|z| z.groups.len()), Some(1));
    }
}
