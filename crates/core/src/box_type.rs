//! Box types and the box catalog.

use crate::{Error, Result};
use nalgebra::Vector3;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A type of box available for packing.
///
/// Outer dimensions describe the box as shipped; inner dimensions describe
/// the usable cavity. Two box types with identical dimensions are still
/// distinct stock entries: identity is the position in the [`BoxCatalog`],
/// never value equality.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxType {
    /// Reference label, used in logs and error messages.
    id: String,

    /// Outer dimensions (width, length, depth).
    outer: Vector3<u32>,

    /// Inner dimensions (width, length, depth).
    inner: Vector3<u32>,

    /// Weight of the empty box.
    empty_weight: u32,

    /// Maximum weight of items the box may hold.
    max_payload: u32,
}

impl BoxType {
    /// Creates a new box type with the given outer dimensions
    /// (width, length, depth). Inner dimensions default to the outer ones.
    pub fn new(id: impl Into<String>, width: u32, length: u32, depth: u32) -> Self {
        let outer = Vector3::new(width, length, depth);
        Self {
            id: id.into(),
            outer,
            inner: outer,
            empty_weight: 0,
            max_payload: u32::MAX,
        }
    }

    /// Sets the inner dimensions (width, length, depth).
    pub fn with_inner(mut self, width: u32, length: u32, depth: u32) -> Self {
        self.inner = Vector3::new(width, length, depth);
        self
    }

    /// Sets the weight of the empty box.
    pub fn with_empty_weight(mut self, weight: u32) -> Self {
        self.empty_weight = weight;
        self
    }

    /// Sets the maximum payload weight.
    pub fn with_max_payload(mut self, weight: u32) -> Self {
        self.max_payload = weight;
        self
    }

    /// Returns the reference label.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the outer dimensions (width, length, depth).
    pub fn outer(&self) -> &Vector3<u32> {
        &self.outer
    }

    /// Returns the inner dimensions (width, length, depth).
    pub fn inner(&self) -> &Vector3<u32> {
        &self.inner
    }

    /// Returns the inner width.
    pub fn inner_width(&self) -> u32 {
        self.inner.x
    }

    /// Returns the inner length.
    pub fn inner_length(&self) -> u32 {
        self.inner.y
    }

    /// Returns the inner depth.
    pub fn inner_depth(&self) -> u32 {
        self.inner.z
    }

    /// Returns the inner volume.
    pub fn inner_volume(&self) -> u64 {
        u64::from(self.inner.x) * u64::from(self.inner.y) * u64::from(self.inner.z)
    }

    /// Returns the outer volume.
    pub fn outer_volume(&self) -> u64 {
        u64::from(self.outer.x) * u64::from(self.outer.y) * u64::from(self.outer.z)
    }

    /// Returns the weight of the empty box.
    pub fn empty_weight(&self) -> u32 {
        self.empty_weight
    }

    /// Returns the maximum payload weight.
    pub fn max_payload(&self) -> u32 {
        self.max_payload
    }

    /// Validates the box type and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.outer.x == 0 || self.outer.y == 0 || self.outer.z == 0 {
            return Err(Error::InvalidInput(format!(
                "all outer dimensions for box '{}' must be positive",
                self.id
            )));
        }
        if self.inner.x == 0 || self.inner.y == 0 || self.inner.z == 0 {
            return Err(Error::InvalidInput(format!(
                "all inner dimensions for box '{}' must be positive",
                self.id
            )));
        }
        if self.inner.x > self.outer.x || self.inner.y > self.outer.y || self.inner.z > self.outer.z
        {
            return Err(Error::InvalidInput(format!(
                "inner dimensions for box '{}' exceed the outer dimensions",
                self.id
            )));
        }
        Ok(())
    }
}

/// A stock entry in a [`BoxCatalog`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CatalogEntry {
    box_type: Arc<BoxType>,
    quantity: usize,
}

impl CatalogEntry {
    /// Returns the box type.
    pub fn box_type(&self) -> &BoxType {
        &self.box_type
    }

    /// Returns the available quantity.
    pub fn quantity(&self) -> usize {
        self.quantity
    }
}

/// The boxes available to a packing call, with per-entry stock quantities.
///
/// Entries are keyed by position; the engine never mutates the catalog and
/// clones the quantity vector at entry.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxCatalog {
    entries: Vec<CatalogEntry>,
}

impl BoxCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a box type with the given stock quantity.
    pub fn add(&mut self, box_type: BoxType, quantity: usize) {
        self.entries.push(CatalogEntry {
            box_type: Arc::new(box_type),
            quantity,
        });
    }

    /// Builder-style variant of [`add`](Self::add).
    pub fn with_box(mut self, box_type: BoxType, quantity: usize) -> Self {
        self.add(box_type, quantity);
        self
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at the given index.
    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    /// Returns the box type at the given index.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    pub fn box_type(&self, index: usize) -> &BoxType {
        &self.entries[index].box_type
    }

    /// Returns a shared handle to the box type at the given index.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    pub fn box_arc(&self, index: usize) -> Arc<BoxType> {
        Arc::clone(&self.entries[index].box_type)
    }

    /// Returns the stock quantities as a vector indexed like the entries.
    pub fn quantities(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.quantity).collect()
    }

    /// Iterates over the entries.
    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a BoxCatalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
