//! Structured diagnostics for non-fatal solve defects
//!
//! None of these abort a solve: the container always receives a complete
//! (possibly partially stale) layout, and the defects are recorded so
//! hosts and tests can assert on them. Every recorded diagnostic is also
//! emitted through `log` at warning level.

use thiserror::Error;

use crate::constraint::{Attribute, Axis};

/// A recoverable defect observed during one solve pass
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Diagnostic {
    /// A constraint names a source layer that is neither the container
    /// nor a sibling; the target attribute is left unconstrained.
    #[error(
        "layer {layer} in container {container} references unknown source \
         layer '{source_name}' for {attribute:?}; attribute left unconstrained"
    )]
    MissingSource {
        container: String,
        layer: String,
        source_name: String,
        attribute: Attribute,
    },

    /// Two constraints on one layer target the same attribute; the first
    /// applied (in declaration order) wins and the duplicate is ignored.
    #[error("layer {layer} holds more than one constraint targeting {attribute:?}; keeping the first")]
    DuplicateTarget { layer: String, attribute: Attribute },

    /// A dependency cycle among the listed layers on one axis; each
    /// member degrades to the attribute values it can compute on its
    /// own, falling back to its prior frame for the rest. Layers that
    /// depend on a cycle without being in one degrade the same way but
    /// are not listed.
    #[error("constraint cycle on {axis:?} axis among {}; members fall back to prior frames", layers.join(", "))]
    Cycle { axis: Axis, layers: Vec<String> },

    /// Fewer than two axis-attributes were determined by constraints;
    /// the missing ones were taken from the layer's prior frame.
    #[error("layer {layer} is under-determined on the {axis:?} axis; missing attributes taken from prior frame")]
    Underdetermined { layer: String, axis: Axis },
}

impl Diagnostic {
    /// Whether this diagnostic reports a dependency cycle
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::Cycle { .. })
    }
}

/// Record a diagnostic into the sink and mirror it to the log
pub(crate) fn record(sink: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    log::warn!("{diagnostic}");
    sink.push(diagnostic);
}
