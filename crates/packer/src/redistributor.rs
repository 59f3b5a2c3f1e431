//! Weight rebalancing across an already-valid packing.

use crate::packer::pack_by_volume;
use cartonize_core::{BoxCatalog, Item, PackedBox, PackedBoxList};
use std::sync::atomic::{AtomicBool, Ordering};

/// Quantity granted for the box type a re-packed subset already occupies.
/// The slot being vacated is returnable, so the type is offered as
/// effectively unlimited.
const HELD_TYPE_QUANTITY: usize = usize::MAX / 2;

/// Upper bound on rebalancing passes. Each kept swap strictly decreases the
/// squared weight difference of the pair it touched, so the loop converges
/// long before this; the cap only guards against pathological inputs.
const MAX_PASSES: usize = 500;

/// Reduces the weight variance of a packing by migrating items between box
/// pairs, re-packing both sides locally. The item set is preserved and the
/// box count never increases.
///
/// Rebalancing cannot fail: a local re-pack that does not come back as a
/// single box simply aborts that swap.
pub(crate) struct WeightRedistributor<'a> {
    catalog: &'a BoxCatalog,
    /// Stock left over after the initial packing, indexed like the catalog.
    quantities: Vec<usize>,
    single_pass: bool,
    cancelled: &'a AtomicBool,
}

impl<'a> WeightRedistributor<'a> {
    pub fn new(
        catalog: &'a BoxCatalog,
        quantities: Vec<usize>,
        single_pass: bool,
        cancelled: &'a AtomicBool,
    ) -> Self {
        Self {
            catalog,
            quantities,
            single_pass,
            cancelled,
        }
    }

    pub fn redistribute(mut self, list: PackedBoxList) -> PackedBoxList {
        let mut boxes = list.into_vec();
        if boxes.len() < 2 {
            return PackedBoxList::from(boxes);
        }

        let mut passes = 0;
        while passes < MAX_PASSES {
            // A cancelled rebalance keeps the valid packing reached so far.
            if self.cancelled.load(Ordering::Relaxed) {
                break;
            }
            passes += 1;
            boxes.sort_by(|a, b| b.total_weight().cmp(&a.total_weight()));
            if !self.try_one_swap(&mut boxes) {
                break;
            }
        }

        PackedBoxList::from(boxes)
    }

    /// Attempts every pair in weight order and applies the first acceptable
    /// migration. Returns true if anything changed.
    fn try_one_swap(&mut self, boxes: &mut Vec<PackedBox>) -> bool {
        let total_items_weight: u64 = boxes.iter().map(|b| b.items_weight()).sum();
        let count = boxes.len() as u64;

        for heavy in 0..boxes.len() {
            for light in (heavy + 1)..boxes.len() {
                if boxes[heavy].total_weight() == boxes[light].total_weight() {
                    continue;
                }

                let eliminating = boxes[heavy].item_count() == 1;
                for index in 0..boxes[heavy].items().len() {
                    let weight = u64::from(boxes[heavy].items()[index].weight());

                    // A migration may not push the receiver past the mean
                    // item payload, except when it empties the donor: one
                    // box fewer always wins.
                    if !eliminating
                        && (boxes[light].items_weight() + weight) * count > total_items_weight
                    {
                        continue;
                    }

                    let mut receiver_items = items_of(&boxes[light]);
                    receiver_items.push(boxes[heavy].items()[index].item().clone());
                    let Some(new_light) =
                        self.repack_single(receiver_items, boxes[light].box_index())
                    else {
                        continue;
                    };

                    if eliminating {
                        log::debug!(
                            "rebalance eliminated box '{}'",
                            boxes[heavy].box_type().id()
                        );
                        self.quantities[boxes[heavy].box_index()] += 1;
                        self.quantities[boxes[light].box_index()] += 1;
                        self.quantities[new_light.box_index()] =
                            self.quantities[new_light.box_index()].saturating_sub(1);
                        boxes[light] = new_light;
                        boxes.remove(heavy);
                        return true;
                    }

                    let mut donor_items = items_of(&boxes[heavy]);
                    donor_items.remove(index);
                    let Some(new_heavy) =
                        self.repack_single(donor_items, boxes[heavy].box_index())
                    else {
                        continue;
                    };

                    // Keep the swap only if the pair's spread of total
                    // weights strictly shrinks; total weight includes the
                    // empty box, which may change with the box type.
                    let old_spread =
                        squared_difference(boxes[heavy].total_weight(), boxes[light].total_weight());
                    let new_spread =
                        squared_difference(new_heavy.total_weight(), new_light.total_weight());
                    if new_spread >= old_spread {
                        continue;
                    }

                    log::debug!(
                        "rebalance moved '{}' from box '{}' to box '{}'",
                        boxes[heavy].items()[index].item().id(),
                        boxes[heavy].box_type().id(),
                        boxes[light].box_type().id()
                    );
                    self.quantities[boxes[heavy].box_index()] += 1;
                    self.quantities[boxes[light].box_index()] += 1;
                    self.quantities[new_heavy.box_index()] =
                        self.quantities[new_heavy.box_index()].saturating_sub(1);
                    self.quantities[new_light.box_index()] =
                        self.quantities[new_light.box_index()].saturating_sub(1);
                    boxes[heavy] = new_heavy;
                    boxes[light] = new_light;
                    return true;
                }
            }
        }

        false
    }

    /// Re-packs an item subset that currently occupies a box of the given
    /// type. The whole catalog is available, so the subset may land in a
    /// different box type; only single-box outcomes are accepted.
    fn repack_single(&self, items: Vec<Item>, held_index: usize) -> Option<PackedBox> {
        let mut quantities = self.quantities.clone();
        quantities[held_index] = HELD_TYPE_QUANTITY;

        let mut packed = pack_by_volume(
            self.catalog,
            &mut quantities,
            items,
            self.single_pass,
            self.cancelled,
        )
        .ok()?;
        if packed.len() == 1 {
            packed.pop()
        } else {
            None
        }
    }
}

fn items_of(packed: &PackedBox) -> Vec<Item> {
    packed.items().iter().map(|p| p.item().clone()).collect()
}

fn squared_difference(a: u64, b: u64) -> u128 {
    let d = a.abs_diff(b);
    u128::from(d) * u128::from(d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packer::{PackConfig, PackMode, Packer};
    use approx::assert_relative_eq;
    use cartonize_core::BoxType;

    fn balanced_packer() -> Packer {
        Packer::new(PackConfig::new().with_mode(PackMode::WeightBalanced))
    }

    /// Two 100-cube types: a tall box taking two items and a snug single.
    fn two_tier_catalog() -> BoxCatalog {
        BoxCatalog::new()
            .with_box(BoxType::new("duo", 100, 100, 200).with_empty_weight(10), 2)
            .with_box(BoxType::new("solo", 100, 100, 100).with_empty_weight(5), 3)
    }

    fn two_tier_items() -> Vec<Item> {
        vec![
            Item::new("h1", 100, 100, 100).with_weight(100),
            Item::new("h2", 100, 100, 100).with_weight(90),
            Item::new("l1", 100, 100, 100).with_weight(10),
        ]
    }

    #[test]
    fn test_swap_reduces_spread() {
        let catalog = two_tier_catalog();
        let items = two_tier_items();

        // Volume packing stacks both heavy items together.
        let plain = Packer::default_config().pack(&items, &catalog).unwrap();
        assert_eq!(plain.len(), 2);
        assert_eq!(plain[0].items_weight(), 190);

        // Rebalancing migrates h2 next to the light item and re-homes h1,
        // swapping box types in the process.
        let balanced = balanced_packer().pack(&items, &catalog).unwrap();
        assert_eq!(balanced.len(), 2);
        let mut item_weights: Vec<u64> =
            balanced.iter().map(|b| b.items_weight()).collect();
        item_weights.sort_unstable();
        assert_eq!(item_weights, vec![100, 100]);

        assert!(balanced.weight_variance() < plain.weight_variance());
        assert_relative_eq!(balanced.weight_variance(), 6.25, epsilon = 1e-9);
    }

    #[test]
    fn test_single_box_is_untouched() {
        let catalog = two_tier_catalog();
        let items = vec![Item::new("only", 100, 100, 100).with_weight(40)];

        let balanced = balanced_packer().pack(&items, &catalog).unwrap();
        assert_eq!(balanced.len(), 1);
        assert_eq!(balanced[0].items_weight(), 40);
    }

    #[test]
    fn test_idempotent() {
        let catalog = two_tier_catalog();
        let items = two_tier_items();

        let once = balanced_packer().pack(&items, &catalog).unwrap();

        // Stock left after rebalancing: one duo and two solos.
        let cancelled = AtomicBool::new(false);
        let again = WeightRedistributor::new(&catalog, vec![1, 2], false, &cancelled)
            .redistribute(once.clone());

        assert_eq!(once.len(), again.len());
        assert_relative_eq!(
            once.weight_variance(),
            again.weight_variance(),
            epsilon = 1e-12
        );
    }
}
