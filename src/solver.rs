//! Dependency-ordered constraint solver
//!
//! One solve pass covers the direct children of a single container. The
//! two axes are solved independently: for each axis a fresh
//! [`DependencyGraph`] is built from the children's constraints, sibling
//! sources are wired as edges, and the graph is evaluated in topological
//! order with a ready queue. The container itself acts as a pseudo-source
//! that is always ready; its attribute values are read from its local
//! bounds. Cyclic or unsatisfiable subsets degrade to the layer's prior
//! frame instead of failing the pass, and every degradation is recorded
//! as a structured [`Diagnostic`].

use std::collections::{HashMap, VecDeque};

use crate::constraint::{Axis, AxisAttribute, Constraint};
use crate::diagnostics::{self, Diagnostic};
use crate::geometry::{Rect, Size};
use crate::host::ConstraintTable;
use crate::layer::{LayerId, LayerTree};
use crate::node::DependencyGraph;

/// Resolved origin of a constraint's source value
#[derive(Debug, Clone, Copy, PartialEq)]
enum Source {
    /// The container pseudo-source; always ready, needs no edge
    Superlayer,
    /// A direct child of the container, by child index
    Child(usize),
}

/// Per-axis value slots accumulated while evaluating one node
#[derive(Debug, Clone, Copy, Default)]
struct AxisValues {
    slots: [Option<f64>; 4],
}

impl AxisValues {
    fn get(&self, attribute: AxisAttribute) -> Option<f64> {
        self.slots[attribute.index()]
    }

    fn set(&mut self, attribute: AxisAttribute, value: f64) {
        self.slots[attribute.index()] = Some(value);
    }
}

/// A fully determined axis span, the form frames are written back in
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisSpan {
    min: f64,
    size: f64,
}

impl AxisSpan {
    fn of(rect: &Rect, axis: Axis) -> Self {
        Self {
            min: rect.min(axis),
            size: rect.extent(axis),
        }
    }
}

/// Derive a full axis span from whichever attributes the constraints
/// determined, by fixed pair priority. The chosen authoritative pair
/// defines the span; the remaining attributes follow from the identities
/// `size = max - min` and `mid = (min + max) / 2`, never from averaging.
///
/// Returns the span and whether the node was under-determined (fewer
/// than two attributes known), in which case the prior frame filled the
/// gap.
fn complete_span(values: AxisValues, prior: AxisSpan) -> (AxisSpan, bool) {
    use AxisAttribute::{Max, Mid, Min, Size};

    // The first three pairs are the canonical combinations; the rest
    // complete the two-known matrix at lower priority.
    const PAIRS: [(AxisAttribute, AxisAttribute); 6] = [
        (Min, Size),
        (Min, Max),
        (Mid, Size),
        (Min, Mid),
        (Mid, Max),
        (Max, Size),
    ];

    for (a, b) in PAIRS {
        if let (Some(va), Some(vb)) = (values.get(a), values.get(b)) {
            let span = match (a, b) {
                (Min, Size) => AxisSpan { min: va, size: vb },
                (Min, Max) => AxisSpan {
                    min: va,
                    size: vb - va,
                },
                (Mid, Size) => AxisSpan {
                    min: va - vb / 2.0,
                    size: vb,
                },
                (Min, Mid) => AxisSpan {
                    min: va,
                    size: 2.0 * (vb - va),
                },
                (Mid, Max) => AxisSpan {
                    min: 2.0 * va - vb,
                    size: 2.0 * (vb - va),
                },
                (Max, Size) => AxisSpan {
                    min: va - vb,
                    size: vb,
                },
                _ => unreachable!("pair list only holds the six combinations above"),
            };
            return (span, false);
        }
    }

    // At most one attribute known: pair it with the prior frame rather
    // than inventing values from nothing.
    let span = if let Some(min) = values.get(Min) {
        AxisSpan {
            min,
            size: prior.size,
        }
    } else if let Some(mid) = values.get(Mid) {
        AxisSpan {
            min: mid - prior.size / 2.0,
            size: prior.size,
        }
    } else if let Some(max) = values.get(Max) {
        AxisSpan {
            min: max - prior.size,
            size: prior.size,
        }
    } else if let Some(size) = values.get(Size) {
        AxisSpan {
            min: prior.min,
            size,
        }
    } else {
        prior
    };
    (span, true)
}

/// Scratch state for solving one container's children
pub(crate) struct Solver<'a> {
    tree: &'a LayerTree,
    container: LayerId,
    container_bounds: Rect,
    children: Vec<LayerId>,
    /// Sibling name index, built once per solve; first name wins
    names: HashMap<&'a str, usize>,
}

impl<'a> Solver<'a> {
    pub fn new(tree: &'a LayerTree, container: LayerId) -> Self {
        let children = tree.children(container).to_vec();
        let mut names = HashMap::new();
        for (index, &child) in children.iter().enumerate() {
            if let Some(name) = tree.name(child) {
                names.entry(name).or_insert(index);
            }
        }
        Self {
            tree,
            container,
            container_bounds: tree.bounds(container),
            children,
            names,
        }
    }

    pub fn is_childless(&self) -> bool {
        self.children.is_empty()
    }

    /// Solve both axes and return the would-be frame for each direct
    /// child, in child order. Does not touch the tree.
    pub fn solve_frames(
        &self,
        constraints: &ConstraintTable,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<Rect> {
        log::debug!(
            "solving {} ({} children)",
            self.tree.display_name(self.container),
            self.children.len()
        );
        let mut frames: Vec<Rect> = self
            .children
            .iter()
            .map(|&child| self.tree.frame(child))
            .collect();
        for axis in [Axis::X, Axis::Y] {
            self.solve_axis(axis, constraints, &mut frames, diagnostics);
        }
        frames
    }

    fn resolve_source(&self, constraint: &Constraint) -> Option<Source> {
        if constraint.sources_superlayer() {
            return Some(Source::Superlayer);
        }
        self.names
            .get(constraint.source_name.as_str())
            .map(|&index| Source::Child(index))
    }

    /// Build the per-axis graph: one node per child, the child's
    /// axis-filtered constraints on it, and a dependency edge per
    /// resolved sibling source. Unresolvable and duplicate-target
    /// constraints are dropped here, each with a diagnostic.
    fn build_graph(
        &self,
        axis: Axis,
        constraints: &ConstraintTable,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> DependencyGraph {
        let mut graph = DependencyGraph::new(axis, self.children.len());
        for (index, &child) in self.children.iter().enumerate() {
            for constraint in constraints.constraints(child) {
                if constraint.axis() != axis {
                    continue;
                }
                let source = match self.resolve_source(constraint) {
                    Some(source) => source,
                    None => {
                        diagnostics::record(
                            diagnostics,
                            Diagnostic::MissingSource {
                                container: self.tree.display_name(self.container),
                                layer: self.tree.display_name(child),
                                source_name: constraint.source_name.clone(),
                                attribute: constraint.attribute,
                            },
                        );
                        continue;
                    }
                };
                if !graph.node_mut(index).add_constraint(constraint.clone()) {
                    diagnostics::record(
                        diagnostics,
                        Diagnostic::DuplicateTarget {
                            layer: self.tree.display_name(child),
                            attribute: constraint.attribute,
                        },
                    );
                    continue;
                }
                // The container pseudo-source is always ready and needs
                // no edge; same-node sources are a 1-cycle, not an edge;
                // cross-axis sources are read from the scratch frames.
                if let Source::Child(source_index) = source {
                    if source_index != index && constraint.source_attribute.axis() == axis {
                        graph.add_dependency(index, source_index);
                    }
                }
            }
        }
        graph
    }

    fn solve_axis(
        &self,
        axis: Axis,
        constraints: &ConstraintTable,
        frames: &mut [Rect],
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let mut graph = self.build_graph(axis, constraints, diagnostics);
        let count = graph.len();
        let mut solved = vec![false; count];
        let mut queue: VecDeque<usize> = graph.ready().into();

        while let Some(index) = queue.pop_front() {
            if solved[index] {
                continue;
            }
            self.evaluate_node(index, axis, &graph, frames, &solved, None, diagnostics);
            solved[index] = true;
            let dependents = graph.node(index).outgoing.clone();
            for dependent in dependents {
                graph.remove_dependency(dependent, index);
                if graph.node(dependent).incoming.is_empty() && !solved[dependent] {
                    queue.push_back(dependent);
                }
            }
        }

        // Whatever remains is deadlocked on at least one cycle. The
        // diagnostic names the actual cycle members; nodes that merely
        // depend on one are degraded the same way but not reported as
        // part of the cycle. Deadlocked nodes are evaluated with the
        // sources they can reach on their own and never observe each
        // other's degraded values.
        let deadlocked: Vec<usize> = (0..count).filter(|&index| !solved[index]).collect();
        if deadlocked.is_empty() {
            return;
        }
        diagnostics::record(
            diagnostics,
            Diagnostic::Cycle {
                axis,
                layers: graph
                    .cyclic_nodes()
                    .iter()
                    .map(|&index| self.tree.display_name(self.children[index]))
                    .collect(),
            },
        );
        for &index in &deadlocked {
            self.evaluate_node(
                index,
                axis,
                &graph,
                frames,
                &solved,
                Some(&deadlocked),
                diagnostics,
            );
            solved[index] = true;
        }
    }

    /// Evaluate one node's constraints, complete the axis span, and
    /// write it into the scratch frame.
    #[allow(clippy::too_many_arguments)]
    fn evaluate_node(
        &self,
        index: usize,
        axis: Axis,
        graph: &DependencyGraph,
        frames: &mut [Rect],
        solved: &[bool],
        blocked: Option<&[usize]>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let node = graph.node(index);
        let mut values = AxisValues::default();
        for constraint in &node.constraints {
            let source_value = match self.resolve_source(constraint) {
                Some(Source::Superlayer) => {
                    Some(self.container_bounds.attribute_value(constraint.source_attribute))
                }
                Some(Source::Child(source_index)) => self.source_value(
                    source_index,
                    index,
                    constraint,
                    axis,
                    frames,
                    solved,
                    blocked,
                    &values,
                ),
                // Unresolvable constraints never made it into the node.
                None => None,
            };
            if let Some(value) = source_value {
                values.set(
                    constraint.attribute.axis_attribute(),
                    value * constraint.scale + constraint.offset,
                );
            }
        }

        // Prior values come from the real tree, not the scratch frames:
        // degraded attributes must land on the pre-solve frame.
        let prior = AxisSpan::of(&self.tree.frame(self.children[node.layer]), axis);
        let (span, underdetermined) = complete_span(values, prior);
        if underdetermined && !node.constraints.is_empty() {
            diagnostics::record(
                diagnostics,
                Diagnostic::Underdetermined {
                    layer: self.tree.display_name(self.children[node.layer]),
                    axis,
                },
            );
        }
        frames[node.layer].set_axis_span(axis, span.min, span.size);
    }

    /// Value of a sibling-sourced (or self-sourced) attribute, if it is
    /// available at this point of the pass.
    #[allow(clippy::too_many_arguments)]
    fn source_value(
        &self,
        source: usize,
        target: usize,
        constraint: &Constraint,
        axis: Axis,
        frames: &[Rect],
        solved: &[bool],
        blocked: Option<&[usize]>,
        own: &AxisValues,
    ) -> Option<f64> {
        let source_axis = constraint.source_attribute.axis();
        if source == target {
            // Self-referential: only values already produced by an
            // earlier constraint of this same node.
            return if source_axis == axis {
                own.get(constraint.source_attribute.axis_attribute())
            } else {
                Some(frames[source].attribute_value(constraint.source_attribute))
            };
        }
        if source_axis != axis {
            // Other-axis attributes are not part of this graph; read
            // them as currently known (final when that axis ran first).
            return Some(frames[source].attribute_value(constraint.source_attribute));
        }
        if let Some(blocked) = blocked {
            if blocked.contains(&source) {
                return None;
            }
        }
        if !solved[source] {
            return None;
        }
        Some(frames[source].attribute_value(constraint.source_attribute))
    }
}

/// Solve the container's children and commit the resulting frames.
/// Never fails; defects degrade per the diagnostics recorded.
pub(crate) fn solve(
    tree: &mut LayerTree,
    constraints: &ConstraintTable,
    container: LayerId,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let children: Vec<LayerId> = tree.children(container).to_vec();
    let frames = Solver::new(tree, container).solve_frames(constraints, diagnostics);
    for (child, frame) in children.into_iter().zip(frames) {
        tree.set_frame(child, frame);
    }
}

/// Read-only solve variant: the container size that would enclose the
/// solved children, as the union bounding box of their would-be frames.
/// A childless container reports its current size.
pub(crate) fn preferred_size(
    tree: &LayerTree,
    constraints: &ConstraintTable,
    container: LayerId,
    diagnostics: &mut Vec<Diagnostic>,
) -> Size {
    let solver = Solver::new(tree, container);
    if solver.is_childless() {
        return tree.size(container);
    }
    let frames = solver.solve_frames(constraints, diagnostics);
    let mut union = frames[0];
    for frame in &frames[1..] {
        union = union.union(frame);
    }
    Size::new(union.right().max(0.0), union.bottom().max(0.0))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn values(entries: &[(AxisAttribute, f64)]) -> AxisValues {
        let mut values = AxisValues::default();
        for &(attribute, value) in entries {
            values.set(attribute, value);
        }
        values
    }

    const PRIOR: AxisSpan = AxisSpan {
        min: 7.0,
        size: 21.0,
    };

    fn identities_hold(span: AxisSpan, min: f64, mid: f64, max: f64, size: f64) {
        assert!((span.min - min).abs() < 1e-9);
        assert!((span.size - size).abs() < 1e-9);
        assert!(((span.min + span.size) - max).abs() < 1e-9);
        assert!(((span.min + span.size / 2.0) - mid).abs() < 1e-9);
    }

    #[test]
    fn test_completion_min_size() {
        let (span, degraded) =
            complete_span(values(&[(AxisAttribute::Min, 10.0), (AxisAttribute::Size, 40.0)]), PRIOR);
        assert!(!degraded);
        identities_hold(span, 10.0, 30.0, 50.0, 40.0);
    }

    #[test]
    fn test_completion_min_max() {
        let (span, degraded) =
            complete_span(values(&[(AxisAttribute::Min, 10.0), (AxisAttribute::Max, 50.0)]), PRIOR);
        assert!(!degraded);
        identities_hold(span, 10.0, 30.0, 50.0, 40.0);
    }

    #[test]
    fn test_completion_mid_size() {
        let (span, degraded) =
            complete_span(values(&[(AxisAttribute::Mid, 30.0), (AxisAttribute::Size, 40.0)]), PRIOR);
        assert!(!degraded);
        identities_hold(span, 10.0, 30.0, 50.0, 40.0);
    }

    #[test]
    fn test_completion_min_mid() {
        let (span, degraded) =
            complete_span(values(&[(AxisAttribute::Min, 10.0), (AxisAttribute::Mid, 30.0)]), PRIOR);
        assert!(!degraded);
        identities_hold(span, 10.0, 30.0, 50.0, 40.0);
    }

    #[test]
    fn test_completion_mid_max() {
        let (span, degraded) =
            complete_span(values(&[(AxisAttribute::Mid, 30.0), (AxisAttribute::Max, 50.0)]), PRIOR);
        assert!(!degraded);
        identities_hold(span, 10.0, 30.0, 50.0, 40.0);
    }

    #[test]
    fn test_completion_max_size() {
        let (span, degraded) =
            complete_span(values(&[(AxisAttribute::Max, 50.0), (AxisAttribute::Size, 40.0)]), PRIOR);
        assert!(!degraded);
        identities_hold(span, 10.0, 30.0, 50.0, 40.0);
    }

    #[test]
    fn test_completion_priority_never_averages() {
        // min, mid and max all set but inconsistent: (min, max) outranks
        // (min, mid), so mid is overwritten, not averaged in.
        let (span, degraded) = complete_span(
            values(&[
                (AxisAttribute::Min, 0.0),
                (AxisAttribute::Mid, 999.0),
                (AxisAttribute::Max, 100.0),
            ]),
            PRIOR,
        );
        assert!(!degraded);
        assert_eq!(
            span,
            AxisSpan {
                min: 0.0,
                size: 100.0
            }
        );
    }

    #[test]
    fn test_completion_lone_min_uses_prior_size() {
        let (span, degraded) = complete_span(values(&[(AxisAttribute::Min, 100.0)]), PRIOR);
        assert!(degraded);
        assert_eq!(
            span,
            AxisSpan {
                min: 100.0,
                size: 21.0
            }
        );
    }

    #[test]
    fn test_completion_lone_size_uses_prior_min() {
        let (span, degraded) = complete_span(values(&[(AxisAttribute::Size, 64.0)]), PRIOR);
        assert!(degraded);
        assert_eq!(
            span,
            AxisSpan {
                min: 7.0,
                size: 64.0
            }
        );
    }

    #[test]
    fn test_completion_lone_max_uses_prior_size() {
        let (span, degraded) = complete_span(values(&[(AxisAttribute::Max, 30.0)]), PRIOR);
        assert!(degraded);
        assert_eq!(
            span,
            AxisSpan {
                min: 9.0,
                size: 21.0
            }
        );
    }

    #[test]
    fn test_completion_nothing_known_keeps_prior() {
        let (span, degraded) = complete_span(AxisValues::default(), PRIOR);
        assert!(degraded);
        assert_eq!(span, PRIOR);
    }
}
