//! Layout manager state machine
//!
//! The manager tracks, per container, whether a solve is pending and
//! runs the solver when the host asks for layout. It is single-threaded
//! and non-reentrant: a solve runs to completion before anything else
//! touches the container's subtree.

use std::collections::HashMap;

use crate::diagnostics::Diagnostic;
use crate::geometry::Size;
use crate::host::ConstraintTable;
use crate::layer::{LayerId, LayerTree};
use crate::solver;

/// Per-container layout state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutState {
    /// No pending solve
    #[default]
    Idle,
    /// Constraints or geometry changed; a solve is pending
    Invalidated,
    /// Graph build and evaluation in progress
    Solving,
}

/// Orchestrates solver invocation per container layer
#[derive(Debug, Default)]
pub struct LayoutManager {
    states: HashMap<LayerId, LayoutState>,
    diagnostics: Vec<Diagnostic>,
}

impl LayoutManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for a container; containers the manager has never
    /// seen are Idle.
    pub fn state(&self, container: LayerId) -> LayoutState {
        self.states.get(&container).copied().unwrap_or_default()
    }

    /// Mark a container as needing layout. Idempotent.
    pub fn invalidate_layout(&mut self, container: LayerId) {
        self.states.insert(container, LayoutState::Invalidated);
    }

    /// Run the pending solve for a container, committing solved frames
    /// to its direct children. No-op unless the container is
    /// Invalidated. Never fails; defects are recorded as diagnostics.
    pub fn layout_sublayers(
        &mut self,
        tree: &mut LayerTree,
        constraints: &ConstraintTable,
        container: LayerId,
    ) {
        if self.state(container) != LayoutState::Invalidated {
            return;
        }
        self.states.insert(container, LayoutState::Solving);
        solver::solve(tree, constraints, container, &mut self.diagnostics);
        self.states.insert(container, LayoutState::Idle);
    }

    /// The container size that would enclose the solved children.
    ///
    /// Runs the solver against scratch frames: no layer is mutated and
    /// the manager's state is untouched, so back-to-back calls return
    /// identical results. Defects found along the way are logged but not
    /// added to [`Self::diagnostics`].
    pub fn preferred_size(
        &self,
        tree: &LayerTree,
        constraints: &ConstraintTable,
        container: LayerId,
    ) -> Size {
        let mut scratch = Vec::new();
        solver::preferred_size(tree, constraints, container, &mut scratch)
    }

    /// Diagnostics accumulated by committed solves, oldest first
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain the accumulated diagnostics
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}
