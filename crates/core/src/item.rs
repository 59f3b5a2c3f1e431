//! Items to be packed.

use crate::placement::PackedItem;
use crate::{Error, Result};
use nalgebra::Vector3;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rotation policy for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    /// Original orientation only.
    Never,
    /// The item must stay the right way up, but may turn on the vertical axis.
    KeepFlat,
    /// Any of the 6 axis-aligned orientations.
    #[default]
    Any,
}

impl Rotation {
    /// Returns the dimension permutations this policy allows, as
    /// (width, length, depth) index triples into the item's dimensions.
    pub fn permutations(&self) -> &'static [[usize; 3]] {
        match self {
            Rotation::Never => &[[0, 1, 2]],
            Rotation::KeepFlat => &[[0, 1, 2], [1, 0, 2]],
            Rotation::Any => &[
                [0, 1, 2],
                [0, 2, 1],
                [1, 0, 2],
                [1, 2, 0],
                [2, 0, 1],
                [2, 1, 0],
            ],
        }
    }
}

/// Placement predicate attached to an item.
///
/// Constraints are data carried by the item, not a property of the packing
/// engine: the engine calls the predicate with the items already packed into
/// the candidate box and the proposed minimum-corner position, and discards
/// placements the predicate rejects.
pub trait PackingConstraint: Send + Sync {
    /// Returns true if the item may be placed at (x, y, z) given the
    /// already-packed contents of the box.
    fn can_be_packed(&self, already_packed: &[PackedItem], x: u32, y: u32, z: u32) -> bool;
}

impl<F> PackingConstraint for F
where
    F: Fn(&[PackedItem], u32, u32, u32) -> bool + Send + Sync,
{
    fn can_be_packed(&self, already_packed: &[PackedItem], x: u32, y: u32, z: u32) -> bool {
        self(already_packed, x, y, z)
    }
}

/// An item to be packed into a box.
///
/// Dimensions are positive integers in a caller-defined unit (typically
/// millimetres); the weight is a non-negative integer in a caller-defined
/// unit (typically grams). Units must be consistent across a packing call.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    /// Stable identifier, used as the final ordering tie-break.
    id: String,

    /// Dimensions (width, length, depth).
    dimensions: Vector3<u32>,

    /// Weight of the item.
    weight: u32,

    /// Rotation policy.
    rotation: Rotation,

    /// Optional placement predicate.
    #[cfg_attr(feature = "serde", serde(skip))]
    constraint: Option<Arc<dyn PackingConstraint>>,
}

impl Item {
    /// Creates a new item with the given identifier and dimensions
    /// (width, length, depth).
    pub fn new(id: impl Into<String>, width: u32, length: u32, depth: u32) -> Self {
        Self {
            id: id.into(),
            dimensions: Vector3::new(width, length, depth),
            weight: 0,
            rotation: Rotation::default(),
            constraint: None,
        }
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the rotation policy.
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Attaches a placement predicate.
    pub fn with_constraint(mut self, constraint: impl PackingConstraint + 'static) -> Self {
        self.constraint = Some(Arc::new(constraint));
        self
    }

    /// Returns the identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the dimensions (width, length, depth).
    pub fn dimensions(&self) -> &Vector3<u32> {
        &self.dimensions
    }

    /// Returns the width.
    pub fn width(&self) -> u32 {
        self.dimensions.x
    }

    /// Returns the length.
    pub fn length(&self) -> u32 {
        self.dimensions.y
    }

    /// Returns the depth.
    pub fn depth(&self) -> u32 {
        self.dimensions.z
    }

    /// Returns the weight.
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Returns the volume.
    pub fn volume(&self) -> u64 {
        u64::from(self.dimensions.x) * u64::from(self.dimensions.y) * u64::from(self.dimensions.z)
    }

    /// Returns the rotation policy.
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Returns the placement predicate, if any.
    pub fn constraint(&self) -> Option<&Arc<dyn PackingConstraint>> {
        self.constraint.as_ref()
    }

    /// Returns the item's dimensions permuted by the given index triple.
    pub fn dimensions_for_permutation(&self, permutation: [usize; 3]) -> Vector3<u32> {
        Vector3::new(
            self.dimensions[permutation[0]],
            self.dimensions[permutation[1]],
            self.dimensions[permutation[2]],
        )
    }

    /// Validates the item and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions.x == 0 || self.dimensions.y == 0 || self.dimensions.z == 0 {
            return Err(Error::InvalidInput(format!(
                "all dimensions for item '{}' must be positive",
                self.id
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.id)
            .field("dimensions", &self.dimensions)
            .field("weight", &self.weight)
            .field("rotation", &self.rotation)
            .field("constrained", &self.constraint.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_volume() {
        let item = Item::new("I1", 10, 20, 30);
        assert_eq!(item.volume(), 6000);
    }

    #[test]
    fn test_rotation_permutations() {
        assert_eq!(Rotation::Never.permutations().len(), 1);
        assert_eq!(Rotation::KeepFlat.permutations().len(), 2);
        assert_eq!(Rotation::Any.permutations().len(), 6);
    }

    #[test]
    fn test_dimensions_for_permutation() {
        let item = Item::new("I1", 10, 20, 30);
        let dims = item.dimensions_for_permutation([2, 0, 1]);
        assert_eq!((dims.x, dims.y, dims.z), (30, 10, 20));
    }

    #[test]
    fn test_validation() {
        assert!(Item::new("I1", 10, 20, 30).validate().is_ok());
        assert!(Item::new("I2", 0, 20, 30).validate().is_err());
    }

    #[test]
    fn test_closure_constraint() {
        let item = Item::new("I1", 10, 10, 10)
            .with_constraint(|_packed: &[PackedItem], _x: u32, _y: u32, z: u32| z == 0);

        let constraint = item.constraint().unwrap();
        assert!(constraint.can_be_packed(&[], 0, 0, 0));
        assert!(!constraint.can_be_packed(&[], 0, 0, 5));
    }
}
