//! # Cartonize Core
//!
//! Value types shared by the cartonize 3D bin packing engine.
//!
//! This crate defines the vocabulary of a packing call and carries no
//! algorithmic code:
//!
//! - **Items**: [`Item`], [`Rotation`], [`PackingConstraint`]
//! - **Boxes**: [`BoxType`], [`BoxCatalog`]
//! - **Placements**: [`OrientatedItem`], [`PackedItem`], [`Aabb`]
//! - **Results**: [`PackedBox`], [`PackedBoxList`]
//! - **Errors**: [`Error`], [`Result`]
//!
//! All dimensions and weights are integers in caller-defined units; units
//! must be consistent across a packing call.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod box_type;
pub mod error;
pub mod item;
pub mod placement;
pub mod result;

// Re-exports
pub use box_type::{BoxCatalog, BoxType, CatalogEntry};
pub use error::{Error, Result};
pub use item::{Item, PackingConstraint, Rotation};
pub use placement::{Aabb, OrientatedItem, PackedItem};
pub use result::{PackedBox, PackedBoxList};
