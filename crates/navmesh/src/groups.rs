//! Group partitioner
//!
//! Flood-fills the polygon graph into disconnected navigability groups and
//! converts each group into the renumbered [`GroupNode`] form the search
//! side consumes.

use navmesh_common::round_to;

use crate::astar::Graph;
use crate::builder::shared_vertices_in_order;
use crate::polygon::{GroupNode, GroupedNavMesh, NavPolygon, NavigationMesh};

use std::mem;

/// Partitions polygons into connected components over the neighbour
/// relation.
///
/// Group ids count up from 0. Uses an explicit worklist rather than
/// recursion so the traversal depth is independent of mesh size. A polygon
/// with no neighbours becomes a singleton group; that is not an error, it
/// just means no path can reach or leave it.
///
/// Returns the member polygon indices per group, in polygon order.
pub fn build_polygon_groups(polygons: &mut [NavPolygon]) -> Vec<Vec<usize>> {
    let mut group_count = 0usize;

    for start in 0..polygons.len() {
        if polygons[start].group.is_some() {
            continue;
        }

        let group_id = group_count;
        group_count += 1;
        polygons[start].group = Some(group_id);

        let mut worklist = vec![start];
        while let Some(index) = worklist.pop() {
            // Ids are sequential from 1, so id - 1 is the polygon index
            let neighbours = polygons[index].neighbours.clone();
            for id in neighbours {
                let n = (id - 1) as usize;
                if polygons[n].group.is_none() {
                    polygons[n].group = Some(group_id);
                    worklist.push(n);
                }
            }
        }
    }

    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); group_count];
    for (index, polygon) in polygons.iter().enumerate() {
        if let Some(group_id) = polygon.group {
            groups[group_id].push(index);
        }
    }

    groups
}

/// Converts a polygon graph into its grouped, locally-renumbered form.
///
/// Vertex positions and centroids are rounded to 2 decimal places to shed
/// floating noise introduced by prior transforms. Within each group,
/// polygon ids become local indices and neighbour lists are remapped
/// positionally; each neighbour gets its ordered portal pair attached.
pub fn group_nav_mesh(mut mesh: NavigationMesh) -> GroupedNavMesh {
    for v in &mut mesh.vertices {
        *v = round_to(*v, 2);
    }

    let member_lists = build_polygon_groups(&mut mesh.polygons);
    log::debug!(
        "partitioned {} polygons into {} groups",
        mesh.polygons.len(),
        member_lists.len()
    );

    let polygons = &mut mesh.polygons;
    let mut grouped = GroupedNavMesh {
        groups: Vec::with_capacity(member_lists.len()),
        vertices: mesh.vertices,
    };

    for members in &member_lists {
        let mut nodes = Vec::with_capacity(members.len());

        for (local_id, &pi) in members.iter().enumerate() {
            let neighbour_ids = polygons[pi].neighbours.clone();

            // Flood fill keeps neighbours inside the group, so the
            // positional lookup always succeeds
            let neighbours: Vec<usize> = neighbour_ids
                .iter()
                .filter_map(|id| members.iter().position(|&m| m == (id - 1) as usize))
                .collect();

            let mut portals = Vec::with_capacity(neighbour_ids.len());
            for id in &neighbour_ids {
                let ni = (id - 1) as usize;
                // The wrap-around rotation inside shared_vertices_in_order
                // mutates both polygons' vertex lists and must persist
                let mut a_ids = mem::take(&mut polygons[pi].vertex_ids);
                let mut b_ids = mem::take(&mut polygons[ni].vertex_ids);
                portals.push(shared_vertices_in_order(&mut a_ids, &mut b_ids));
                polygons[pi].vertex_ids = a_ids;
                polygons[ni].vertex_ids = b_ids;
            }

            let c = polygons[pi].centroid;
            nodes.push(GroupNode {
                id: local_id,
                neighbours,
                vertex_ids: polygons[pi].vertex_ids.clone(),
                centroid: glam::Vec3::new(
                    round_to(c.x, 2),
                    round_to(c.y, 2),
                    round_to(c.z, 2),
                ),
                portals,
                cost: 1.0,
            });
        }

        grouped.groups.push(nodes);
    }

    grouped
}

/// Graph view over one group's node list for A* search.
///
/// The heuristic is Euclidean distance between centroids; edge cost is the
/// destination node's uniform cost.
pub struct GroupGraph<'a> {
    nodes: &'a [GroupNode],
}

impl<'a> GroupGraph<'a> {
    pub fn new(nodes: &'a [GroupNode]) -> Self {
        Self { nodes }
    }
}

impl Graph for GroupGraph<'_> {
    type NodeId = usize;

    fn neighbors(&self, node: usize) -> Vec<usize> {
        self.nodes[node].neighbours.clone()
    }

    fn cost(&self, _from: usize, to: usize) -> f32 {
        self.nodes[to].cost
    }

    fn heuristic(&self, a: usize, b: usize) -> f32 {
        self.nodes[a].centroid.distance(self.nodes[b].centroid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_navigation_mesh;
    use crate::navigation::NavigationConfig;
    use navmesh_common::TriMesh;

    fn two_islands() -> TriMesh {
        // Two triangles with no shared vertices
        TriMesh::from_buffers(
            vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.5, 0.0, 1.0, //
                5.0, 0.0, 0.0, //
                6.0, 0.0, 0.0, //
                5.5, 0.0, 1.0, //
            ],
            vec![0, 1, 2, 3, 4, 5],
        )
    }

    fn quad() -> TriMesh {
        TriMesh::from_buffers(
            vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                1.0, 0.0, 1.0, //
                0.0, 0.0, 1.0, //
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn test_partition_is_total_and_disjoint() {
        let mut mesh = build_navigation_mesh(&two_islands(), &NavigationConfig::default());
        let groups = build_polygon_groups(&mut mesh.polygons);

        let mut seen = vec![0usize; mesh.polygons.len()];
        for group in &groups {
            for &pi in group {
                seen[pi] += 1;
            }
        }
        // Every polygon in exactly one group
        assert!(seen.iter().all(|&count| count == 1));
        assert!(mesh.polygons.iter().all(|p| p.group.is_some()));
    }

    #[test]
    fn test_disconnected_triangles_form_two_groups() {
        let mesh = build_navigation_mesh(&two_islands(), &NavigationConfig::default());
        let grouped = group_nav_mesh(mesh);

        assert_eq!(grouped.groups.len(), 2);
        assert_eq!(grouped.groups[0].len(), 1);
        assert_eq!(grouped.groups[1].len(), 1);
        // Singleton nodes have no neighbours and no portals
        assert!(grouped.groups[0][0].neighbours.is_empty());
        assert!(grouped.groups[0][0].portals.is_empty());
    }

    #[test]
    fn test_connected_quad_forms_one_group() {
        let mesh = build_navigation_mesh(&quad(), &NavigationConfig::default());
        let grouped = group_nav_mesh(mesh);

        assert_eq!(grouped.groups.len(), 1);
        let nodes = &grouped.groups[0];
        assert_eq!(nodes.len(), 2);

        // Mutual sole neighbours, renumbered locally
        assert_eq!(nodes[0].neighbours, vec![1]);
        assert_eq!(nodes[1].neighbours, vec![0]);
        assert_eq!(nodes[0].id, 0);
        assert_eq!(nodes[1].id, 1);
    }

    #[test]
    fn test_portals_reference_the_same_edge() {
        let mesh = build_navigation_mesh(&quad(), &NavigationConfig::default());
        let grouped = group_nav_mesh(mesh);
        let nodes = &grouped.groups[0];

        let mut forward = nodes[0].portals[0].clone();
        let mut backward = nodes[1].portals[0].clone();
        assert_eq!(forward.len(), 2);
        forward.sort_unstable();
        backward.sort_unstable();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_neighbours_and_portals_stay_aligned() {
        let mesh = build_navigation_mesh(&quad(), &NavigationConfig::default());
        let grouped = group_nav_mesh(mesh);

        for group in &grouped.groups {
            for node in group {
                assert_eq!(node.neighbours.len(), node.portals.len());
                for (n, portal) in node.neighbours.iter().zip(&node.portals) {
                    assert!(*n < group.len());
                    assert!(!portal.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_vertices_rounded_to_two_decimals() {
        let mesh = TriMesh::from_buffers(
            vec![0.00123, 0.0, 0.0, 1.0071, 0.0, 0.0, 0.5, 0.0, 1.004],
            vec![0, 1, 2],
        );
        let nav_mesh = build_navigation_mesh(&mesh, &NavigationConfig::default());
        let grouped = group_nav_mesh(nav_mesh);

        assert_eq!(grouped.vertices[0], 0.0);
        assert_eq!(grouped.vertices[3], 1.01);
        assert_eq!(grouped.vertices[8], 1.0);
    }
}
