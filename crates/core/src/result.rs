//! Packed boxes and the packing result.

use crate::box_type::BoxType;
use crate::placement::PackedItem;
use std::ops::Index;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A box together with the items packed into it.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackedBox {
    box_type: Arc<BoxType>,
    box_index: usize,
    items: Vec<PackedItem>,
}

impl PackedBox {
    /// Creates a packed box from a catalog handle and its placed items.
    pub fn new(box_type: Arc<BoxType>, box_index: usize, items: Vec<PackedItem>) -> Self {
        Self {
            box_type,
            box_index,
            items,
        }
    }

    /// Returns the box type.
    pub fn box_type(&self) -> &BoxType {
        &self.box_type
    }

    /// Returns a shared handle to the box type.
    pub fn box_arc(&self) -> Arc<BoxType> {
        Arc::clone(&self.box_type)
    }

    /// Returns the catalog index identifying the box type.
    pub fn box_index(&self) -> usize {
        self.box_index
    }

    /// Returns the packed items.
    pub fn items(&self) -> &[PackedItem] {
        &self.items
    }

    /// Returns the number of packed items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the combined weight of the packed items.
    pub fn items_weight(&self) -> u64 {
        self.items.iter().map(|p| u64::from(p.weight())).sum()
    }

    /// Returns the total weight: empty box plus items.
    pub fn total_weight(&self) -> u64 {
        u64::from(self.box_type.empty_weight()) + self.items_weight()
    }

    /// Returns the combined volume of the packed items.
    pub fn items_volume(&self) -> u64 {
        self.items.iter().map(|p| p.volume()).sum()
    }

    /// Returns the ratio of packed item volume to inner box volume.
    pub fn volume_utilisation(&self) -> f64 {
        self.items_volume() as f64 / self.box_type.inner_volume() as f64
    }
}

/// The boxes produced by a packing call.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackedBoxList {
    boxes: Vec<PackedBox>,
}

impl PackedBoxList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a packed box.
    pub fn push(&mut self, packed: PackedBox) {
        self.boxes.push(packed);
    }

    /// Returns the number of boxes.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Returns true if no boxes were produced.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Iterates over the boxes.
    pub fn iter(&self) -> std::slice::Iter<'_, PackedBox> {
        self.boxes.iter()
    }

    /// Returns the total weight across all boxes (empty boxes included).
    pub fn total_weight(&self) -> u64 {
        self.boxes.iter().map(|b| b.total_weight()).sum()
    }

    /// Returns the mean item payload per box.
    pub fn mean_items_weight(&self) -> f64 {
        if self.boxes.is_empty() {
            return 0.0;
        }
        let items: u64 = self.boxes.iter().map(|b| b.items_weight()).sum();
        items as f64 / self.boxes.len() as f64
    }

    /// Returns the population variance of per-box total weights.
    pub fn weight_variance(&self) -> f64 {
        if self.boxes.is_empty() {
            return 0.0;
        }
        let n = self.boxes.len() as f64;
        let mean = self.total_weight() as f64 / n;
        self.boxes
            .iter()
            .map(|b| {
                let d = b.total_weight() as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n
    }

    /// Consumes the list, returning the underlying vector.
    pub fn into_vec(self) -> Vec<PackedBox> {
        self.boxes
    }
}

impl From<Vec<PackedBox>> for PackedBoxList {
    fn from(boxes: Vec<PackedBox>) -> Self {
        Self { boxes }
    }
}

impl Index<usize> for PackedBoxList {
    type Output = PackedBox;

    fn index(&self, index: usize) -> &PackedBox {
        &self.boxes[index]
    }
}

impl<'a> IntoIterator for &'a PackedBoxList {
    type Item = &'a PackedBox;
    type IntoIter = std::slice::Iter<'a, PackedBox>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}

impl IntoIterator for PackedBoxList {
    type Item = PackedBox;
    type IntoIter = std::vec::IntoIter<PackedBox>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.into_iter()
    }
}
