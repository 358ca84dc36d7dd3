//! Constraint-based layout for trees of rectangular layers
//!
//! Each child of a container layer can describe its position and size
//! per axis as linear relations against the container or against named
//! siblings: "my left edge = your right edge * 1.0 + 8". The solver
//! builds one dependency graph per axis over the container's children,
//! evaluates it in topological order in a single pass, completes
//! partially determined axes through the geometric identities
//! `size = max - min` and `mid = (min + max) / 2`, and writes the
//! resulting frames back.
//!
//! Malformed constraint sets never fail a layout pass: unresolvable
//! sources, duplicate targets, dependency cycles, and under-determined
//! layers all degrade to the affected layer's prior frame and are
//! surfaced as structured [`Diagnostic`]s.
//!
//! # Example
//!
//! ```rust
//! use constraint_layout::{Attribute, Constraint, ConstraintLayout, Rect};
//!
//! let mut layout = ConstraintLayout::new();
//! let root = layout.add_layer(None);
//! layout.set_frame(root, Rect::new(0.0, 0.0, 300.0, 100.0));
//! layout.attach_layout_manager(root);
//!
//! let left = layout.add_named_layer(Some(root), "left");
//! layout.set_frame(left, Rect::new(0.0, 0.0, 80.0, 40.0));
//!
//! // right's left edge sits 8 points after left's right edge
//! let right = layout.add_named_layer(Some(root), "right");
//! layout.set_frame(right, Rect::new(0.0, 0.0, 80.0, 40.0));
//! layout.add_constraint(
//!     right,
//!     Constraint::new(Attribute::MinX, "left", Attribute::MaxX).with_offset(8.0),
//! );
//!
//! layout.layout_sublayers(root);
//! assert_eq!(layout.frame(right).x, 88.0);
//! ```

pub mod constraint;
pub mod diagnostics;
pub mod geometry;
pub mod host;
pub mod layer;
pub mod manager;

mod node;
mod solver;

pub use constraint::{Attribute, Axis, AxisAttribute, Constraint};
pub use diagnostics::Diagnostic;
pub use geometry::{Point, Rect, Size};
pub use host::{ConstraintLayout, ConstraintTable};
pub use layer::{LayerId, LayerTree};
pub use manager::{LayoutManager, LayoutState};
