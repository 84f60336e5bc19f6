mod node;

pub use node::{PathId, PathLinks, PathNode};

use crate::error::GraphError;
use slotmap::SlotMap;

/// Central arena that owns every path of a level.
///
/// Paths reference each other through [`PathId`] handles (generational
/// indices), so the cyclic next/previous and left/right links never form
/// ownership cycles.
#[derive(Debug, Default)]
pub struct PathGraph {
    paths: SlotMap<PathId, PathNode>,
}

impl PathGraph {
    /// Creates a new, empty path graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a path and returns its ID.
    pub fn add_path(&mut self, node: PathNode) -> PathId {
        self.paths.insert(node)
    }

    /// Removes a path and clears every link pointing at it.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not in the graph.
    pub fn remove_path(&mut self, id: PathId) -> Result<PathNode, GraphError> {
        let node = self.paths.remove(id).ok_or(GraphError::PathNotFound)?;
        for other in self.paths.values_mut() {
            let links = &mut other.links;
            for link in [
                &mut links.next,
                &mut links.previous,
                &mut links.left_lane,
                &mut links.right_lane,
            ] {
                if *link == Some(id) {
                    *link = None;
                }
            }
        }
        Ok(node)
    }

    /// Returns a reference to the path, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not in the graph.
    pub fn path(&self, id: PathId) -> Result<&PathNode, GraphError> {
        self.paths.get(id).ok_or(GraphError::PathNotFound)
    }

    /// Returns a mutable reference to the path, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not in the graph.
    pub fn path_mut(&mut self, id: PathId) -> Result<&mut PathNode, GraphError> {
        self.paths.get_mut(id).ok_or(GraphError::PathNotFound)
    }

    /// Returns `true` if `id` refers to a path in this graph.
    #[must_use]
    pub fn contains(&self, id: PathId) -> bool {
        self.paths.contains_key(id)
    }

    // --- Link traversal ---

    /// Same-lane continuation after `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not in the graph.
    pub fn next(&self, id: PathId) -> Result<Option<PathId>, GraphError> {
        Ok(self.path(id)?.links.next)
    }

    /// Same-lane continuation before `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not in the graph.
    pub fn previous(&self, id: PathId) -> Result<Option<PathId>, GraphError> {
        Ok(self.path(id)?.links.previous)
    }

    /// Parallel lane to the left of `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not in the graph.
    pub fn left_lane(&self, id: PathId) -> Result<Option<PathId>, GraphError> {
        Ok(self.path(id)?.links.left_lane)
    }

    /// Parallel lane to the right of `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not in the graph.
    pub fn right_lane(&self, id: PathId) -> Result<Option<PathId>, GraphError> {
        Ok(self.path(id)?.links.right_lane)
    }

    // --- Link editing ---

    /// Chains `to` after `from` in the same lane.
    ///
    /// # Errors
    ///
    /// Returns an error if either path is missing or `from == to`.
    pub fn connect(&mut self, from: PathId, to: PathId) -> Result<(), GraphError> {
        self.check_pair(from, to)?;
        self.path_mut(from)?.links.next = Some(to);
        self.path_mut(to)?.links.previous = Some(from);
        Ok(())
    }

    /// Marks `left` and `right` as side-by-side lanes.
    ///
    /// # Errors
    ///
    /// Returns an error if either path is missing or `left == right`.
    pub fn link_lanes(&mut self, left: PathId, right: PathId) -> Result<(), GraphError> {
        self.check_pair(left, right)?;
        self.path_mut(left)?.links.right_lane = Some(right);
        self.path_mut(right)?.links.left_lane = Some(left);
        Ok(())
    }

    fn check_pair(&self, a: PathId, b: PathId) -> Result<(), GraphError> {
        if a == b {
            return Err(GraphError::SelfLink);
        }
        self.path(a)?;
        self.path(b)?;
        Ok(())
    }

    // --- Lookups ---

    /// First path carrying the given lane index.
    #[must_use]
    pub fn path_by_lane_index(&self, lane_index: i32) -> Option<PathId> {
        self.paths
            .iter()
            .find(|(_, node)| node.lane_index == lane_index)
            .map(|(id, _)| id)
    }

    /// Paths at least `distance` long.
    #[must_use]
    pub fn paths_covering(&self, distance: f64) -> Vec<PathId> {
        self.paths
            .iter()
            .filter(|(_, node)| distance <= node.total_length())
            .map(|(id, _)| id)
            .collect()
    }

    /// All path IDs, in arena order.
    pub fn ids(&self) -> impl Iterator<Item = PathId> + '_ {
        self.paths.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
