//! Per-axis dependency graph over a container's children
//!
//! One [`LayoutNode`] exists per (child, axis) for the duration of a
//! single solve pass; nodes are never cached across passes. Dependency
//! edges are stored twice, as `incoming` on the dependent and `outgoing`
//! on the dependency, and the two lists are kept exact transposes of
//! each other by [`DependencyGraph::add_dependency`] and
//! [`DependencyGraph::remove_dependency`].

use crate::constraint::{Axis, Constraint};

/// Solve-scoped aggregate of one child's constraints on one axis
#[derive(Debug)]
pub(crate) struct LayoutNode {
    /// Index of the owning child within the container's child list
    pub layer: usize,
    pub axis: Axis,
    /// Axis-filtered constraints, at most one per target attribute,
    /// in declaration order
    pub constraints: Vec<Constraint>,
    /// Indices of nodes that must be solved before this one
    pub incoming: Vec<usize>,
    /// Indices of nodes waiting on this one
    pub outgoing: Vec<usize>,
}

impl LayoutNode {
    fn new(layer: usize, axis: Axis) -> Self {
        Self {
            layer,
            axis,
            constraints: Vec::new(),
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    /// Add a constraint unless its target attribute is already defined.
    /// Returns `false` for the rejected duplicate.
    pub fn add_constraint(&mut self, constraint: Constraint) -> bool {
        debug_assert_eq!(constraint.axis(), self.axis);
        if self
            .constraints
            .iter()
            .any(|held| held.attribute == constraint.attribute)
        {
            return false;
        }
        self.constraints.push(constraint);
        true
    }
}

/// Arena of [`LayoutNode`]s for one axis; node index == child index
#[derive(Debug)]
pub(crate) struct DependencyGraph {
    nodes: Vec<LayoutNode>,
}

impl DependencyGraph {
    pub fn new(axis: Axis, layer_count: usize) -> Self {
        Self {
            nodes: (0..layer_count)
                .map(|layer| LayoutNode::new(layer, axis))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, index: usize) -> &LayoutNode {
        &self.nodes[index]
    }

    pub fn node_mut(&mut self, index: usize) -> &mut LayoutNode {
        &mut self.nodes[index]
    }

    /// Whether `from` already depends on `to`
    pub fn has_dependency(&self, from: usize, to: usize) -> bool {
        self.nodes[from].incoming.contains(&to)
    }

    /// Register that `from` must be solved after `to`
    pub fn add_dependency(&mut self, from: usize, to: usize) {
        debug_assert_ne!(from, to, "self-dependencies are never edges");
        if self.has_dependency(from, to) {
            return;
        }
        self.nodes[from].incoming.push(to);
        self.nodes[to].outgoing.push(from);
    }

    /// Remove the `from` -> `to` dependency, symmetrically
    pub fn remove_dependency(&mut self, from: usize, to: usize) {
        self.nodes[from].incoming.retain(|&n| n != to);
        self.nodes[to].outgoing.retain(|&n| n != from);
    }

    /// Indices whose nodes have no unresolved incoming edges
    pub fn ready(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.incoming.is_empty())
            .map(|(index, _)| index)
            .collect()
    }

    /// Indices of nodes lying on a dependency cycle: those that can
    /// reach themselves by following the remaining outgoing edges. A
    /// node that merely depends on a cycle is not among them.
    pub fn cyclic_nodes(&self) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&start| {
                let mut seen = vec![false; self.nodes.len()];
                let mut stack = self.nodes[start].outgoing.clone();
                while let Some(next) = stack.pop() {
                    if next == start {
                        return true;
                    }
                    if !seen[next] {
                        seen[next] = true;
                        stack.extend(&self.nodes[next].outgoing);
                    }
                }
                false
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::constraint::{Attribute, Constraint};

    fn transpose_holds(graph: &DependencyGraph) -> bool {
        (0..graph.len()).all(|i| {
            graph.node(i).incoming.iter().all(|&j| graph.node(j).outgoing.contains(&i))
                && graph.node(i).outgoing.iter().all(|&j| graph.node(j).incoming.contains(&i))
        })
    }

    #[test]
    fn test_edges_are_transposed() {
        let mut graph = DependencyGraph::new(Axis::X, 3);
        graph.add_dependency(0, 1);
        graph.add_dependency(0, 2);
        graph.add_dependency(1, 2);

        assert_eq!(graph.node(0).incoming, vec![1, 2]);
        assert_eq!(graph.node(2).outgoing, vec![0, 1]);
        assert!(transpose_holds(&graph));

        graph.remove_dependency(0, 2);
        assert_eq!(graph.node(0).incoming, vec![1]);
        assert_eq!(graph.node(2).outgoing, vec![1]);
        assert!(transpose_holds(&graph));
    }

    #[test]
    fn test_parallel_edges_collapse() {
        let mut graph = DependencyGraph::new(Axis::Y, 2);
        graph.add_dependency(0, 1);
        graph.add_dependency(0, 1);
        assert_eq!(graph.node(0).incoming, vec![1]);
        assert_eq!(graph.node(1).outgoing, vec![0]);
    }

    #[test]
    fn test_ready_set() {
        let mut graph = DependencyGraph::new(Axis::X, 3);
        graph.add_dependency(1, 0);
        graph.add_dependency(2, 1);
        assert_eq!(graph.ready(), vec![0]);

        graph.remove_dependency(1, 0);
        assert_eq!(graph.ready(), vec![0, 1]);
    }

    #[test]
    fn test_cyclic_nodes_exclude_dependents_of_a_cycle() {
        let mut graph = DependencyGraph::new(Axis::X, 4);
        // 0 and 1 form a cycle; 2 depends on 1 without being in one;
        // 3 is independent.
        graph.add_dependency(0, 1);
        graph.add_dependency(1, 0);
        graph.add_dependency(2, 1);

        assert_eq!(graph.cyclic_nodes(), vec![0, 1]);
    }

    #[test]
    fn test_duplicate_target_rejected() {
        let mut node = LayoutNode::new(0, Axis::X);
        let first = Constraint::new(Attribute::Width, "a", Attribute::Width);
        let duplicate =
            Constraint::new(Attribute::Width, "b", Attribute::Width).with_scale(2.0);

        assert!(node.add_constraint(first.clone()));
        assert!(!node.add_constraint(duplicate));
        assert_eq!(node.constraints, vec![first]);
    }
}
