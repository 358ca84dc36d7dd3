//! The constraint and attribute model
//!
//! A [`Constraint`] describes one linear relation between a geometric
//! attribute of the layer it is attached to and an attribute of another
//! layer: `target = source * scale + offset`. The source layer is named,
//! with the reserved name [`Constraint::SUPERLAYER`] standing for the
//! containing layer itself.

use serde::{Deserialize, Serialize};

/// The two layout axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// The four per-axis attributes a rectangle span decomposes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisAttribute {
    Min,
    Mid,
    Max,
    Size,
}

impl AxisAttribute {
    /// Stable slot index, used by the solver's value tables
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Min => 0,
            Self::Mid => 1,
            Self::Max => 2,
            Self::Size => 3,
        }
    }
}

/// One of the 8 geometric attributes of a layer
///
/// Every attribute decomposes into an axis and an axis-attribute via a
/// fixed total mapping: `MinX -> (X, Min)`, `Height -> (Y, Size)`, and
/// so on. The mapping is never configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    MinX,
    MidX,
    MaxX,
    Width,
    MinY,
    MidY,
    MaxY,
    Height,
}

impl Attribute {
    /// The axis this attribute lives on
    pub fn axis(self) -> Axis {
        match self {
            Self::MinX | Self::MidX | Self::MaxX | Self::Width => Axis::X,
            Self::MinY | Self::MidY | Self::MaxY | Self::Height => Axis::Y,
        }
    }

    /// The per-axis attribute this attribute maps to
    pub fn axis_attribute(self) -> AxisAttribute {
        match self {
            Self::MinX | Self::MinY => AxisAttribute::Min,
            Self::MidX | Self::MidY => AxisAttribute::Mid,
            Self::MaxX | Self::MaxY => AxisAttribute::Max,
            Self::Width | Self::Height => AxisAttribute::Size,
        }
    }

    /// Decompose into (axis, axis-attribute)
    pub fn decompose(self) -> (Axis, AxisAttribute) {
        (self.axis(), self.axis_attribute())
    }

    /// All 8 attributes, in declaration order
    pub fn all() -> &'static [Attribute] {
        &[
            Self::MinX,
            Self::MidX,
            Self::MaxX,
            Self::Width,
            Self::MinY,
            Self::MidY,
            Self::MaxY,
            Self::Height,
        ]
    }
}

/// An immutable linear relation between two layer attributes
///
/// Constructed once by the owning layer's author and never mutated.
/// Equality is structural over all five fields, which is what the
/// constraint table's set semantics deduplicate on.
///
/// # Example
///
/// ```rust
/// use constraint_layout::{Attribute, Constraint};
///
/// // my left edge = container's left edge + 10
/// let c = Constraint::new(Attribute::MinX, Constraint::SUPERLAYER, Attribute::MinX)
///     .with_offset(10.0);
/// assert_eq!(c.scale, 1.0);
/// assert_eq!(c.offset, 10.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// The attribute of the owning layer this constraint defines
    pub attribute: Attribute,
    /// Name of the source layer; [`Constraint::SUPERLAYER`] means the container
    pub source_name: String,
    /// The attribute of the source layer the target is derived from
    pub source_attribute: Attribute,
    /// Multiplier applied to the source value
    pub scale: f64,
    /// Constant added after scaling
    pub offset: f64,
}

impl Constraint {
    /// Reserved source name identifying the containing layer
    pub const SUPERLAYER: &'static str = "superlayer";

    /// Create a constraint with scale 1.0 and offset 0.0
    pub fn new(
        attribute: Attribute,
        source_name: impl Into<String>,
        source_attribute: Attribute,
    ) -> Self {
        Self {
            attribute,
            source_name: source_name.into(),
            source_attribute,
            scale: 1.0,
            offset: 0.0,
        }
    }

    /// Set the scale factor
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the constant offset
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// The axis of the target attribute; decides which per-axis graph
    /// the constraint belongs to
    pub fn axis(&self) -> Axis {
        self.attribute.axis()
    }

    /// Whether the source is the containing layer
    pub fn sources_superlayer(&self) -> bool {
        self.source_name == Self::SUPERLAYER
    }
}
