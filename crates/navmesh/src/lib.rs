//! Navigation-mesh pathfinding over triangle geometry
//!
//! A mesh's vertex and index buffers go through the geometry-to-graph
//! builder (duplicate-vertex merge, adjacency detection), get partitioned
//! into connected groups, and are then queried through the [`Navigation`]
//! facade: A* finds a polygon corridor inside one group and the funnel
//! pass pulls it into a taut sequence of waypoints.
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use navmesh::Navigation;
//! use navmesh_common::TriMesh;
//!
//! // Two triangles sharing an edge
//! let mesh = TriMesh::from_buffers(
//!     vec![
//!         0.0, 0.0, 0.0, //
//!         1.0, 0.0, 0.0, //
//!         1.0, 0.0, 1.0, //
//!         0.0, 0.0, 1.0, //
//!     ],
//!     vec![0, 1, 2, 0, 2, 3],
//! );
//!
//! let mut nav = Navigation::new();
//! let zone = nav.build_nodes(&mesh);
//! nav.set_zone_data("level", zone);
//!
//! let start = Vec3::new(0.7, 0.0, 0.3);
//! let target = Vec3::new(0.3, 0.0, 0.7);
//! let group = nav.get_group("level", start).unwrap();
//! let waypoints = nav.find_path(start, target, "level", group);
//! assert!(!waypoints.is_empty());
//! ```

mod astar;
mod builder;
mod channel;
mod groups;
mod maze;
mod navigation;
mod polygon;

pub use astar::{a_star_search, Graph};
pub use builder::{
    build_navigation_mesh, build_neighbours, build_polygons, compute_centroids, merge_vertices,
    shared_vertices_in_order,
};
pub use channel::{Channel, Portal};
pub use groups::{build_polygon_groups, group_nav_mesh, GroupGraph};
pub use maze::{Cell, Location, RectangularMaze};
pub use navigation::{Navigation, NavigationConfig};
pub use polygon::{GroupNode, GroupedNavMesh, NavPolygon, NavigationMesh};
