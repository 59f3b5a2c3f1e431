//! Orientated and positioned items.

use crate::item::Item;
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box with integer corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner (x, y, z).
    pub min: [u64; 3],
    /// Maximum corner (x, y, z).
    pub max: [u64; 3],
}

impl Aabb {
    /// Creates a new AABB.
    pub fn new(min: [u64; 3], max: [u64; 3]) -> Self {
        Self { min, max }
    }

    /// Checks if this AABB intersects another (touching faces do not count).
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min[0] < other.max[0]
            && self.max[0] > other.min[0]
            && self.min[1] < other.max[1]
            && self.max[1] > other.min[1]
            && self.min[2] < other.max[2]
            && self.max[2] > other.min[2]
    }

    /// Checks if this AABB is fully contained within another.
    pub fn is_within(&self, other: &Aabb) -> bool {
        self.min[0] >= other.min[0]
            && self.min[1] >= other.min[1]
            && self.min[2] >= other.min[2]
            && self.max[0] <= other.max[0]
            && self.max[1] <= other.max[1]
            && self.max[2] <= other.max[2]
    }

    /// Returns the volume of this AABB.
    pub fn volume(&self) -> u64 {
        (self.max[0] - self.min[0]) * (self.max[1] - self.min[1]) * (self.max[2] - self.min[2])
    }
}

/// An item paired with one of its legal (width, length, depth) rotations.
///
/// The dimension triple is always a permutation of the item's own dimensions.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientatedItem {
    item: Item,
    dimensions: Vector3<u32>,
}

impl OrientatedItem {
    /// Creates a new orientated item.
    pub fn new(item: Item, width: u32, length: u32, depth: u32) -> Self {
        Self {
            item,
            dimensions: Vector3::new(width, length, depth),
        }
    }

    /// Returns the underlying item.
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Returns the orientated width.
    pub fn width(&self) -> u32 {
        self.dimensions.x
    }

    /// Returns the orientated length.
    pub fn length(&self) -> u32 {
        self.dimensions.y
    }

    /// Returns the orientated depth.
    pub fn depth(&self) -> u32 {
        self.dimensions.z
    }

    /// Returns the footprint area (width x length).
    pub fn footprint_area(&self) -> u64 {
        u64::from(self.dimensions.x) * u64::from(self.dimensions.y)
    }

    /// Returns the volume.
    pub fn volume(&self) -> u64 {
        u64::from(self.dimensions.x) * u64::from(self.dimensions.y) * u64::from(self.dimensions.z)
    }

    /// Splits into the item and its orientated dimensions.
    pub fn into_parts(self) -> (Item, Vector3<u32>) {
        (self.item, self.dimensions)
    }
}

/// An orientated item positioned inside a box.
///
/// The position is the item's minimum corner relative to the box's inner
/// cavity, in the box's natural frame.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackedItem {
    item: Item,
    position: Vector3<u32>,
    dimensions: Vector3<u32>,
}

impl PackedItem {
    /// Places an orientated item at the given minimum corner.
    pub fn new(orientated: OrientatedItem, x: u32, y: u32, z: u32) -> Self {
        let (item, dimensions) = orientated.into_parts();
        Self {
            item,
            position: Vector3::new(x, y, z),
            dimensions,
        }
    }

    /// Returns the underlying item.
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Returns the x coordinate of the minimum corner.
    pub fn x(&self) -> u32 {
        self.position.x
    }

    /// Returns the y coordinate of the minimum corner.
    pub fn y(&self) -> u32 {
        self.position.y
    }

    /// Returns the z coordinate of the minimum corner.
    pub fn z(&self) -> u32 {
        self.position.z
    }

    /// Returns the orientated width.
    pub fn width(&self) -> u32 {
        self.dimensions.x
    }

    /// Returns the orientated length.
    pub fn length(&self) -> u32 {
        self.dimensions.y
    }

    /// Returns the orientated depth.
    pub fn depth(&self) -> u32 {
        self.dimensions.z
    }

    /// Returns the weight of the underlying item.
    pub fn weight(&self) -> u32 {
        self.item.weight()
    }

    /// Returns the volume of the placed item.
    pub fn volume(&self) -> u64 {
        u64::from(self.dimensions.x) * u64::from(self.dimensions.y) * u64::from(self.dimensions.z)
    }

    /// Returns the occupied bounding volume.
    pub fn aabb(&self) -> Aabb {
        let min = [
            u64::from(self.position.x),
            u64::from(self.position.y),
            u64::from(self.position.z),
        ];
        Aabb::new(
            min,
            [
                min[0] + u64::from(self.dimensions.x),
                min[1] + u64::from(self.dimensions.y),
                min[2] + u64::from(self.dimensions.z),
            ],
        )
    }

    /// Swaps the x and y axes of both position and footprint.
    ///
    /// Used to map a placement produced in a rotated box frame back into the
    /// box's natural frame.
    pub fn swap_axes(&mut self) {
        self.position = Vector3::new(self.position.y, self.position.x, self.position.z);
        self.dimensions = Vector3::new(self.dimensions.y, self.dimensions.x, self.dimensions.z);
    }

    /// Shifts the z coordinate to the given value.
    pub fn shift_z_to(&mut self, z: u32) {
        self.position.z = z;
    }
}
