//! Funnel / string-puller
//!
//! Converts a corridor of portal edges into the taut shortest path that
//! stays inside the corridor ("simple stupid funnel algorithm"). A
//! [`Channel`] is transient per-query state: portals are pushed for the
//! start point, each crossing edge, and the end point, then the string is
//! pulled once.

use glam::Vec3;
use navmesh_common::{points_equal, tri_area_2d};

/// A left/right point pair the path must pass between
#[derive(Debug, Clone, Copy)]
pub struct Portal {
    pub left: Vec3,
    pub right: Vec3,
}

/// Portal corridor plus the pulled path
#[derive(Debug, Clone, Default)]
pub struct Channel {
    portals: Vec<Portal>,
    /// Waypoints produced by [`string_pull`](Channel::string_pull)
    pub path: Vec<Vec3>,
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a degenerate (left == right) portal; used for the explicit
    /// start and end points
    pub fn push(&mut self, point: Vec3) {
        self.portals.push(Portal {
            left: point,
            right: point,
        });
    }

    /// Adds a real portal between two polygons
    pub fn push_portal(&mut self, left: Vec3, right: Vec3) {
        self.portals.push(Portal { left, right });
    }

    /// Runs the funnel pass and returns the waypoint list.
    ///
    /// The output always starts with the pushed start point, ends with the
    /// pushed end point, and contains one interior waypoint per corner
    /// actually needed to stay taut; its length never exceeds the number
    /// of pushed portals.
    pub fn string_pull(&mut self) -> &[Vec3] {
        self.path.clear();

        let portals = &self.portals;
        let Some(first) = portals.first() else {
            return &self.path;
        };

        let mut pts: Vec<Vec3> = Vec::new();

        let mut apex = first.left;
        let mut left = first.left;
        let mut right = first.right;
        let mut apex_index = 0usize;
        let mut left_index = 0usize;
        let mut right_index = 0usize;

        pts.push(apex);

        let mut i = 1;
        while i < portals.len() {
            let portal_left = portals[i].left;
            let portal_right = portals[i].right;

            // Update right vertex
            if tri_area_2d(&apex, &right, &portal_right) <= 0.0 {
                if points_equal(&apex, &right) || tri_area_2d(&apex, &left, &portal_right) > 0.0 {
                    // Tighten the funnel
                    right = portal_right;
                    right_index = i;
                } else {
                    // Right crossed over left; the left vertex becomes a
                    // waypoint and the new apex, restart the scan from there
                    pts.push(left);
                    apex = left;
                    apex_index = left_index;
                    left = apex;
                    right = apex;
                    left_index = apex_index;
                    right_index = apex_index;
                    i = apex_index + 1;
                    continue;
                }
            }

            // Update left vertex
            if tri_area_2d(&apex, &left, &portal_left) >= 0.0 {
                if points_equal(&apex, &left) || tri_area_2d(&apex, &right, &portal_left) < 0.0 {
                    left = portal_left;
                    left_index = i;
                } else {
                    pts.push(right);
                    apex = right;
                    apex_index = right_index;
                    left = apex;
                    right = apex;
                    left_index = apex_index;
                    right_index = apex_index;
                    i = apex_index + 1;
                    continue;
                }
            }

            i += 1;
        }

        // The end point was pushed as a degenerate portal, so its left
        // vertex is the end itself
        if let Some(last) = portals.last() {
            if pts.last().map_or(true, |p| !points_equal(p, &last.left)) {
                pts.push(last.left);
            }
        }

        self.path = pts;
        &self.path
    }
}
