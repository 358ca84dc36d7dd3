//! The host-side layer tree
//!
//! A minimal scene-graph surface for the solver to read and write: each
//! layer has an optional name (used for sibling constraint sources), a
//! frame in its parent's coordinate space, and an ordered child list.
//! Layers are stored in an arena and addressed by [`LayerId`] handles,
//! so constraint metadata can live in a side table keyed by id instead
//! of being injected into the layer type itself.

use crate::geometry::{Rect, Size};

/// Handle to a layer in a [`LayerTree`]
///
/// Ids are only minted by the tree that owns the layer; indexing a tree
/// with an id from another tree is a caller bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(usize);

#[derive(Debug, Clone)]
struct LayerData {
    name: Option<String>,
    frame: Rect,
    parent: Option<LayerId>,
    children: Vec<LayerId>,
}

/// Arena of layers forming a tree
#[derive(Debug, Clone, Default)]
pub struct LayerTree {
    layers: Vec<LayerData>,
}

impl LayerTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an anonymous layer with a zero frame
    pub fn add_layer(&mut self, parent: Option<LayerId>) -> LayerId {
        self.insert(parent, None)
    }

    /// Add a layer addressable by name from sibling constraints
    pub fn add_named_layer(&mut self, parent: Option<LayerId>, name: impl Into<String>) -> LayerId {
        self.insert(parent, Some(name.into()))
    }

    fn insert(&mut self, parent: Option<LayerId>, name: Option<String>) -> LayerId {
        let id = LayerId(self.layers.len());
        self.layers.push(LayerData {
            name,
            frame: Rect::zero(),
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.layers[parent.0].children.push(id);
        }
        id
    }

    /// The layer's assigned name, if any
    pub fn name(&self, layer: LayerId) -> Option<&str> {
        self.layers[layer.0].name.as_deref()
    }

    /// The layer's frame in its parent's coordinate space
    pub fn frame(&self, layer: LayerId) -> Rect {
        self.layers[layer.0].frame
    }

    /// Replace the layer's frame
    pub fn set_frame(&mut self, layer: LayerId, frame: Rect) {
        self.layers[layer.0].frame = frame;
    }

    /// The layer's local coordinate space: origin zero, current extent.
    /// Children are laid out in this space, so container-sourced
    /// constraint values are read from here rather than from the frame.
    pub fn bounds(&self, layer: LayerId) -> Rect {
        let frame = self.layers[layer.0].frame;
        Rect::new(0.0, 0.0, frame.width, frame.height)
    }

    /// The layer's extent
    pub fn size(&self, layer: LayerId) -> Size {
        self.layers[layer.0].frame.size()
    }

    /// Direct children, in insertion order
    pub fn children(&self, layer: LayerId) -> &[LayerId] {
        &self.layers[layer.0].children
    }

    /// The layer's parent, if it is not a root
    pub fn parent(&self, layer: LayerId) -> Option<LayerId> {
        self.layers[layer.0].parent
    }

    /// Number of layers in the tree
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the tree holds no layers
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Display name for diagnostics: the assigned name, or a positional
    /// placeholder for anonymous layers.
    pub(crate) fn display_name(&self, layer: LayerId) -> String {
        match &self.layers[layer.0].name {
            Some(name) => format!("\"{}\"", name),
            None => match self.parent(layer) {
                Some(parent) => {
                    let index = self
                        .children(parent)
                        .iter()
                        .position(|&c| c == layer)
                        .unwrap_or(0);
                    format!("<child #{} of {}>", index + 1, self.display_name(parent))
                }
                None => format!("<layer #{}>", layer.0),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_tree_construction() {
        let mut tree = LayerTree::new();
        let root = tree.add_layer(None);
        let a = tree.add_named_layer(Some(root), "a");
        let b = tree.add_named_layer(Some(root), "b");

        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.name(a), Some("a"));
        assert_eq!(tree.name(root), None);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_frames_and_bounds() {
        let mut tree = LayerTree::new();
        let root = tree.add_layer(None);
        tree.set_frame(root, Rect::new(30.0, 40.0, 100.0, 50.0));

        assert_eq!(tree.frame(root), Rect::new(30.0, 40.0, 100.0, 50.0));
        // Bounds drop the origin: children live in local coordinates.
        assert_eq!(tree.bounds(root), Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(tree.size(root), Size::new(100.0, 50.0));
    }

    #[test]
    fn test_display_names() {
        let mut tree = LayerTree::new();
        let root = tree.add_named_layer(None, "root");
        let named = tree.add_named_layer(Some(root), "header");
        let anon = tree.add_layer(Some(root));

        assert_eq!(tree.display_name(named), "\"header\"");
        assert_eq!(tree.display_name(anon), "<child #2 of \"root\">");
    }
}
