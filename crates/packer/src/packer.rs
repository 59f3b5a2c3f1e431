//! Multi-box packing loop.

use crate::orientation::OrientatedItemFactory;
use crate::redistributor::WeightRedistributor;
use crate::volume::{VolumePacker, VolumeResult};
use cartonize_core::{BoxCatalog, Error, Item, PackedBox, PackedBoxList, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Packing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PackMode {
    /// Minimise box count only.
    #[default]
    Volume,
    /// Minimise box count, then rebalance weight across the boxes.
    WeightBalanced,
}

/// Configuration for a [`Packer`].
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackConfig {
    /// Packing mode.
    pub mode: PackMode,

    /// Pack each box in a single deterministic pass: no rotated box frame,
    /// no layer stabilisation. Faster, usually lower utilisation.
    pub single_pass: bool,
}

impl PackConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the packing mode.
    pub fn with_mode(mut self, mode: PackMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets single-pass packing.
    pub fn with_single_pass(mut self, single_pass: bool) -> Self {
        self.single_pass = single_pass;
        self
    }
}

/// The top-level bin packing engine.
///
/// Chooses box types in decreasing volume order, packs what fits, iterates
/// on the remainder, and tries to shrink the last chosen box to a smaller
/// one that still holds the same items.
#[derive(Debug, Clone, Default)]
pub struct Packer {
    config: PackConfig,
    cancelled: Arc<AtomicBool>,
}

impl Packer {
    /// Creates a packer with the given configuration.
    pub fn new(config: PackConfig) -> Self {
        Self {
            config,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a packer with default configuration.
    pub fn default_config() -> Self {
        Self::new(PackConfig::default())
    }

    /// Packs the items into boxes drawn from the catalog.
    ///
    /// On success every input item appears in exactly one returned box; no
    /// partial result is ever returned.
    pub fn pack(&self, items: &[Item], catalog: &BoxCatalog) -> Result<PackedBoxList> {
        validate_inputs(items, catalog)?;

        // Reset cancellation flag
        self.cancelled.store(false, Ordering::Relaxed);

        let mut quantities = catalog.quantities();
        let packed = pack_by_volume(
            catalog,
            &mut quantities,
            items.to_vec(),
            self.config.single_pass,
            &self.cancelled,
        )?;
        let list = PackedBoxList::from(packed);

        match self.config.mode {
            PackMode::Volume => Ok(list),
            PackMode::WeightBalanced => Ok(WeightRedistributor::new(
                catalog,
                quantities,
                self.config.single_pass,
                &self.cancelled,
            )
            .redistribute(list)),
        }
    }

    /// Cancels an ongoing packing operation.
    ///
    /// Cancellation is cooperative and coarse-grained: it takes effect
    /// between boxes, never mid-layer. A cancelled [`pack`](Self::pack)
    /// returns [`Error::Cancelled`]; a cancelled rebalance keeps the valid
    /// packing it has reached.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

/// Sorts items by the canonical packing order: volume descending, weight
/// descending, identifier ascending.
pub(crate) fn sort_canonical(items: &mut [Item]) {
    items.sort_by(|a, b| {
        b.volume()
            .cmp(&a.volume())
            .then(b.weight().cmp(&a.weight()))
            .then_with(|| a.id().cmp(b.id()))
    });
}

/// Runs the multi-box volume loop over the catalog, decrementing
/// `quantities` for every committed box.
pub(crate) fn pack_by_volume(
    catalog: &BoxCatalog,
    quantities: &mut [usize],
    mut remaining: Vec<Item>,
    single_pass: bool,
    cancelled: &AtomicBool,
) -> Result<Vec<PackedBox>> {
    sort_canonical(&mut remaining);

    let mut result = Vec::new();
    while !remaining.is_empty() {
        if cancelled.load(Ordering::Relaxed) {
            return Err(Error::Cancelled);
        }

        let lightest = remaining
            .iter()
            .map(|i| i.weight())
            .min()
            .unwrap_or_default();

        let mut candidates: Vec<usize> = (0..catalog.len())
            .filter(|&i| quantities[i] > 0 && catalog.box_type(i).max_payload() >= lightest)
            .collect();
        candidates.sort_by(|&a, &b| {
            catalog
                .box_type(b)
                .inner_volume()
                .cmp(&catalog.box_type(a).inner_volume())
        });
        if candidates.is_empty() {
            return Err(failure_for(&remaining, catalog, quantities));
        }

        let queue: VecDeque<Item> = remaining.iter().cloned().collect();
        let mut best: Option<(usize, VolumeResult)> = None;
        for &index in &candidates {
            let trial = VolumePacker::new(catalog.box_type(index), single_pass).pack(&queue);
            let better = match &best {
                None => true,
                Some((best_index, best_trial)) => {
                    is_improvement(catalog, index, &trial, *best_index, best_trial)
                }
            };
            if better {
                best = Some((index, trial));
            }
        }

        let Some((mut chosen_index, mut chosen)) = best else {
            return Err(failure_for(&remaining, catalog, quantities));
        };
        if chosen.packed.is_empty() {
            return Err(failure_for(&remaining, catalog, quantities));
        }

        // Shrink: the chosen box may be larger than the items it actually
        // holds require. Re-pack the committed item set into the smallest
        // candidate that still takes all of it.
        if !chosen.is_complete() {
            let chosen_volume = catalog.box_type(chosen_index).inner_volume();
            let mut smaller: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&i| {
                    i != chosen_index && catalog.box_type(i).inner_volume() < chosen_volume
                })
                .collect();
            smaller.sort_by(|&a, &b| {
                catalog
                    .box_type(a)
                    .inner_volume()
                    .cmp(&catalog.box_type(b).inner_volume())
            });

            let mut committed: Vec<Item> =
                chosen.packed.iter().map(|p| p.item().clone()).collect();
            sort_canonical(&mut committed);
            let committed: VecDeque<Item> = committed.into_iter().collect();
            for &index in &smaller {
                let trial =
                    VolumePacker::new(catalog.box_type(index), single_pass).pack(&committed);
                if trial.is_complete() {
                    log::debug!(
                        "shrunk box '{}' to '{}' for {} item(s)",
                        catalog.box_type(chosen_index).id(),
                        catalog.box_type(index).id(),
                        trial.packed.len()
                    );
                    chosen_index = index;
                    // The unpacked remainder stays with the outer loop; only
                    // the placements move to the smaller box.
                    chosen.packed = trial.packed;
                    break;
                }
            }
        }

        log::debug!(
            "packed {} item(s) into box '{}' ({} remaining)",
            chosen.packed.len(),
            catalog.box_type(chosen_index).id(),
            chosen.leftover.len()
        );

        quantities[chosen_index] -= 1;
        remaining = chosen.leftover.into_iter().collect();
        result.push(PackedBox::new(
            catalog.box_arc(chosen_index),
            chosen_index,
            chosen.packed,
        ));
    }

    Ok(result)
}

/// Candidate comparison: most items packed, then highest utilisation, then
/// lightest empty box. Ties keep the earlier candidate.
fn is_improvement(
    catalog: &BoxCatalog,
    index: usize,
    trial: &VolumeResult,
    best_index: usize,
    best: &VolumeResult,
) -> bool {
    if trial.packed.len() != best.packed.len() {
        return trial.packed.len() > best.packed.len();
    }

    // Utilisation compared exactly: packed_volume / inner_volume as a
    // cross-multiplication.
    let lhs = u128::from(trial.packed_volume()) * u128::from(catalog.box_type(best_index).inner_volume());
    let rhs = u128::from(best.packed_volume()) * u128::from(catalog.box_type(index).inner_volume());
    if lhs != rhs {
        return lhs > rhs;
    }

    catalog.box_type(index).empty_weight() < catalog.box_type(best_index).empty_weight()
}

/// Classifies a stalled pass: a constrained head item that would still fit
/// a box in stock geometrically failed because of its predicate. An
/// unconstrained head, or one whose stock ran out, is a shortage.
fn failure_for(remaining: &[Item], catalog: &BoxCatalog, quantities: &[usize]) -> Error {
    let head = &remaining[0];
    if head.constraint().is_some() && fits_any_box(head, catalog, quantities) {
        Error::ConstraintViolation {
            item: head.id().to_string(),
        }
    } else {
        Error::InsufficientBoxes {
            remaining: remaining.len(),
        }
    }
}

/// Geometric check against every box with stock remaining, ignoring
/// constraints. `quantities` is the live stock, not the catalog's starting
/// counts.
fn fits_any_box(item: &Item, catalog: &BoxCatalog, quantities: &[usize]) -> bool {
    (0..catalog.len()).any(|index| {
        quantities[index] > 0
            && OrientatedItemFactory::fits(
                item,
                catalog.box_type(index).inner_width(),
                catalog.box_type(index).inner_length(),
                catalog.box_type(index).inner_depth(),
            )
    })
}

/// Validates items and boxes at entry.
fn validate_inputs(items: &[Item], catalog: &BoxCatalog) -> Result<()> {
    if catalog.is_empty() {
        return Err(Error::InvalidInput("box catalog is empty".to_string()));
    }
    for entry in catalog {
        entry.box_type().validate()?;
    }

    // At entry the live stock is the catalog's starting quantities.
    let quantities = catalog.quantities();
    for item in items {
        item.validate()?;

        if !fits_any_box(item, catalog, &quantities) {
            return Err(Error::ItemTooLarge {
                item: item.id().to_string(),
            });
        }

        let payload_ok = (0..catalog.len())
            .any(|i| quantities[i] > 0 && catalog.box_type(i).max_payload() >= item.weight());
        if !payload_ok {
            return Err(Error::InvalidInput(format!(
                "item '{}' is heavier than every box payload",
                item.id()
            )));
        }
    }

    Ok(())
}
