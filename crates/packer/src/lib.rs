//! # Cartonize
//!
//! Layer-based 3D bin packing: choose boxes from a catalog, place every item
//! with explicit coordinates and orientations, and optionally rebalance
//! weight across the chosen boxes.
//!
//! The engine is a deterministic greedy heuristic. Items are placed in
//! horizontal layers inside each box; boxes are chosen in decreasing volume
//! order with a shrink step for the last box of a pass; weight balancing is
//! a local search that migrates items between box pairs and re-packs both
//! sides.
//!
//! ## Quick Start
//!
//! ```rust
//! use cartonize::{pack, BoxCatalog, BoxType, Item};
//!
//! let catalog = BoxCatalog::new().with_box(
//!     BoxType::new("small crate", 260, 360, 110)
//!         .with_inner(250, 350, 100)
//!         .with_empty_weight(300)
//!         .with_max_payload(10_000),
//!     5,
//! );
//!
//! let items = vec![
//!     Item::new("widget", 100, 100, 50).with_weight(250),
//!     Item::new("gadget", 100, 100, 50).with_weight(150),
//! ];
//!
//! let packed = pack(&items, &catalog)?;
//! println!(
//!     "{} box(es), utilisation {:.1}%",
//!     packed.len(),
//!     packed[0].volume_utilisation() * 100.0
//! );
//! # Ok::<(), cartonize::Error>(())
//! ```
//!
//! ## Constraints
//!
//! Items may carry a [`PackingConstraint`] predicate vetoing placements:
//!
//! ```rust
//! use cartonize::{Item, PackedItem};
//!
//! // Must sit on the box floor.
//! let fragile = Item::new("fragile", 200, 200, 100)
//!     .with_weight(500)
//!     .with_constraint(|_packed: &[PackedItem], _x: u32, _y: u32, z: u32| z == 0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod layer;
pub mod orientation;
pub mod packer;
mod redistributor;
mod stabiliser;
mod volume;

// Re-exports
pub use cartonize_core::{
    Aabb, BoxCatalog, BoxType, CatalogEntry, Error, Item, OrientatedItem, PackedBox,
    PackedBoxList, PackedItem, PackingConstraint, Result, Rotation,
};
pub use layer::PackedLayer;
pub use orientation::OrientatedItemFactory;
pub use packer::{PackConfig, PackMode, Packer};

/// Packs the items into boxes from the catalog, minimising box count.
pub fn pack(items: &[Item], catalog: &BoxCatalog) -> Result<PackedBoxList> {
    Packer::default_config().pack(items, catalog)
}

/// Packs the items into boxes from the catalog, then rebalances weight
/// across the chosen boxes.
pub fn pack_with_weight_balance(items: &[Item], catalog: &BoxCatalog) -> Result<PackedBoxList> {
    Packer::new(PackConfig::new().with_mode(PackMode::WeightBalanced)).pack(items, catalog)
}
