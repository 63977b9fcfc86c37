//! Session-scoped overlay that hides blocked nodes from a base space.

use std::collections::HashSet;

use crate::core::{Edge, Node, NodeId};

use super::NavigableSpace;

/// Base space minus a set of blocked node ids.
///
/// Blocked nodes disappear from lookups, iteration and adjacency, and every
/// edge pointing at one is dropped. The base space is only borrowed, so many
/// views can share one graph concurrently.
pub struct FilteredView<'a, S: NavigableSpace + ?Sized> {
    base: &'a S,
    blocked: HashSet<NodeId>,
}

impl<'a, S: NavigableSpace + ?Sized> FilteredView<'a, S> {
    pub fn new(base: &'a S, blocked: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            base,
            blocked: blocked.into_iter().collect(),
        }
    }

    /// Ids hidden by this view
    pub fn blocked(&self) -> &HashSet<NodeId> {
        &self.blocked
    }

    #[inline]
    fn is_hidden(&self, id: NodeId) -> bool {
        self.blocked.contains(&id)
    }
}

impl<S: NavigableSpace + ?Sized> NavigableSpace for FilteredView<'_, S> {
    fn node_count(&self) -> usize {
        self.base
            .nodes()
            .filter(|n| !self.is_hidden(n.id))
            .count()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        if self.is_hidden(id) {
            None
        } else {
            self.base.node(id)
        }
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        Box::new(self.base.nodes().filter(move |n| !self.is_hidden(n.id)))
    }

    fn neighbors(&self, id: NodeId) -> Vec<Edge> {
        if self.is_hidden(id) {
            return Vec::new();
        }
        let mut edges = self.base.neighbors(id);
        edges.retain(|e| !self.is_hidden(e.to));
        edges
    }

    fn heuristic(&self, from: &Node, to: &Node) -> f64 {
        self.base.heuristic(from, to)
    }
}
