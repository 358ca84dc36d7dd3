//! Host integration shim
//!
//! Ties the pieces together the way a host scene graph would: a
//! [`ConstraintTable`] side table keyed by layer id holds each layer's
//! constraints (instead of injecting storage into the layer type), a
//! set of containers have a layout manager attached, and the host's
//! layout and size-query callbacks are forwarded into the
//! [`LayoutManager`]. Layout entry points on a container without an
//! attached manager are no-ops.

use std::collections::{HashMap, HashSet};

use crate::constraint::Constraint;
use crate::diagnostics::Diagnostic;
use crate::geometry::{Rect, Size};
use crate::layer::{LayerId, LayerTree};
use crate::manager::LayoutManager;

/// Per-layer constraint collections, keyed by layer id
///
/// Constraints are kept in declaration order with set semantics:
/// structural duplicates are dropped on insert. Declaration order is
/// what makes the duplicate-target tie-break ("first applied wins")
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct ConstraintTable {
    by_layer: HashMap<LayerId, Vec<Constraint>>,
}

impl ConstraintTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The layer's constraints, in declaration order
    pub fn constraints(&self, layer: LayerId) -> &[Constraint] {
        self.by_layer.get(&layer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append a constraint unless a structurally equal one is already
    /// held. Returns whether it was added.
    pub fn add(&mut self, layer: LayerId, constraint: Constraint) -> bool {
        let held = self.by_layer.entry(layer).or_default();
        if held.contains(&constraint) {
            return false;
        }
        held.push(constraint);
        true
    }

    /// Replace the layer's constraints, deduplicating while keeping the
    /// first occurrence of each
    pub fn set(&mut self, layer: LayerId, constraints: Vec<Constraint>) {
        let mut deduped: Vec<Constraint> = Vec::with_capacity(constraints.len());
        for constraint in constraints {
            if !deduped.contains(&constraint) {
                deduped.push(constraint);
            }
        }
        self.by_layer.insert(layer, deduped);
    }

    /// Drop all constraints held for a layer
    pub fn clear(&mut self, layer: LayerId) {
        self.by_layer.remove(&layer);
    }
}

/// Facade owning the layer tree, the constraint side table, and the
/// layout manager
///
/// # Example
///
/// ```rust
/// use constraint_layout::{Attribute, Constraint, ConstraintLayout, Rect};
///
/// let mut layout = ConstraintLayout::new();
/// let root = layout.add_layer(None);
/// layout.set_frame(root, Rect::new(0.0, 0.0, 200.0, 100.0));
/// layout.attach_layout_manager(root);
///
/// let child = layout.add_named_layer(Some(root), "child");
/// layout.set_frame(child, Rect::new(0.0, 0.0, 50.0, 20.0));
/// layout.add_constraint(
///     child,
///     Constraint::new(Attribute::MidX, Constraint::SUPERLAYER, Attribute::MidX),
/// );
///
/// layout.layout_sublayers(root);
/// assert_eq!(layout.frame(child).x, 75.0);
/// ```
#[derive(Debug, Default)]
pub struct ConstraintLayout {
    tree: LayerTree,
    constraints: ConstraintTable,
    manager: LayoutManager,
    managed: HashSet<LayerId>,
}

impl ConstraintLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an anonymous layer
    pub fn add_layer(&mut self, parent: Option<LayerId>) -> LayerId {
        self.tree.add_layer(parent)
    }

    /// Add a layer addressable by name from sibling constraints
    pub fn add_named_layer(&mut self, parent: Option<LayerId>, name: impl Into<String>) -> LayerId {
        self.tree.add_named_layer(parent, name)
    }

    pub fn frame(&self, layer: LayerId) -> Rect {
        self.tree.frame(layer)
    }

    /// Set a layer's frame. Geometry changes invalidate the layer's own
    /// layout (its children are laid out against its size) and its
    /// parent's (siblings may constrain against it).
    pub fn set_frame(&mut self, layer: LayerId, frame: Rect) {
        self.tree.set_frame(layer, frame);
        self.invalidate_layout(layer);
        if let Some(parent) = self.tree.parent(layer) {
            self.invalidate_layout(parent);
        }
    }

    /// Read access to the layer tree
    pub fn tree(&self) -> &LayerTree {
        &self.tree
    }

    /// The layer's constraints, in declaration order
    pub fn constraints(&self, layer: LayerId) -> &[Constraint] {
        self.constraints.constraints(layer)
    }

    /// Attach a constraint to a layer; structural duplicates are
    /// dropped. Invalidates the parent container's layout.
    pub fn add_constraint(&mut self, layer: LayerId, constraint: Constraint) {
        self.constraints.add(layer, constraint);
        if let Some(parent) = self.tree.parent(layer) {
            self.invalidate_layout(parent);
        }
    }

    /// Replace a layer's constraints. Invalidates the parent container.
    pub fn set_constraints(&mut self, layer: LayerId, constraints: Vec<Constraint>) {
        self.constraints.set(layer, constraints);
        if let Some(parent) = self.tree.parent(layer) {
            self.invalidate_layout(parent);
        }
    }

    /// Give a container a layout manager. Idempotent; without one, all
    /// layout entry points on the container are no-ops.
    pub fn attach_layout_manager(&mut self, container: LayerId) {
        if self.managed.insert(container) {
            self.manager.invalidate_layout(container);
        }
    }

    pub fn has_layout_manager(&self, container: LayerId) -> bool {
        self.managed.contains(&container)
    }

    /// Mark a managed container as needing layout
    pub fn invalidate_layout(&mut self, container: LayerId) {
        if self.managed.contains(&container) {
            self.manager.invalidate_layout(container);
        }
    }

    /// Forward the host's layout callback: solve if invalidated
    pub fn layout_sublayers(&mut self, container: LayerId) {
        if self.managed.contains(&container) {
            self.manager
                .layout_sublayers(&mut self.tree, &self.constraints, container);
        }
    }

    /// Invalidate and immediately lay out a container
    pub fn layout_if_needed(&mut self, container: LayerId) {
        self.invalidate_layout(container);
        self.layout_sublayers(container);
    }

    /// Forward the host's size query. Pure: no layer frame and no
    /// manager state changes. Unmanaged containers report their current
    /// size.
    pub fn preferred_size(&self, container: LayerId) -> Size {
        if self.managed.contains(&container) {
            self.manager
                .preferred_size(&self.tree, &self.constraints, container)
        } else {
            self.tree.size(container)
        }
    }

    /// Diagnostics accumulated by committed solves, oldest first
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.manager.diagnostics()
    }

    /// Drain the accumulated diagnostics
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.manager.take_diagnostics()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::constraint::Attribute;

    #[test]
    fn test_table_set_semantics() {
        let mut tree = LayerTree::new();
        let layer = tree.add_layer(None);
        let mut table = ConstraintTable::new();

        let c = Constraint::new(Attribute::MinX, "a", Attribute::MaxX).with_offset(8.0);
        assert!(table.add(layer, c.clone()));
        assert!(!table.add(layer, c.clone()));
        assert_eq!(table.constraints(layer), &[c]);
    }

    #[test]
    fn test_table_set_replaces_and_dedupes() {
        let mut tree = LayerTree::new();
        let layer = tree.add_layer(None);
        let mut table = ConstraintTable::new();

        let first = Constraint::new(Attribute::Width, "a", Attribute::Width);
        let second = Constraint::new(Attribute::MinY, "a", Attribute::MinY);
        table.set(layer, vec![first.clone(), second.clone(), first.clone()]);
        assert_eq!(table.constraints(layer), &[first, second]);

        table.clear(layer);
        assert!(table.constraints(layer).is_empty());
    }

    #[test]
    fn test_layout_noop_without_manager() {
        let mut layout = ConstraintLayout::new();
        let root = layout.add_layer(None);
        layout.set_frame(root, Rect::new(0.0, 0.0, 100.0, 100.0));
        let child = layout.add_named_layer(Some(root), "child");
        layout.set_frame(child, Rect::new(0.0, 0.0, 10.0, 10.0));
        layout.add_constraint(
            child,
            Constraint::new(Attribute::MinX, Constraint::SUPERLAYER, Attribute::MinX)
                .with_offset(30.0),
        );

        // No manager attached: nothing moves, queries report raw size.
        layout.layout_if_needed(root);
        assert_eq!(layout.frame(child).x, 0.0);
        assert_eq!(layout.preferred_size(root), Size::new(100.0, 100.0));
    }

    #[test]
    fn test_mutations_invalidate_managed_parent() {
        let mut layout = ConstraintLayout::new();
        let root = layout.add_layer(None);
        layout.set_frame(root, Rect::new(0.0, 0.0, 100.0, 100.0));
        layout.attach_layout_manager(root);
        let child = layout.add_named_layer(Some(root), "child");
        layout.set_frame(child, Rect::new(0.0, 0.0, 10.0, 10.0));
        layout.add_constraint(
            child,
            Constraint::new(Attribute::MinX, Constraint::SUPERLAYER, Attribute::MaxX)
                .with_scale(0.5),
        );
        layout.layout_sublayers(root);
        assert_eq!(layout.frame(child).x, 50.0);

        // Growing the container re-invalidates it.
        layout.set_frame(root, Rect::new(0.0, 0.0, 200.0, 100.0));
        layout.layout_sublayers(root);
        assert_eq!(layout.frame(child).x, 100.0);
    }
}
