//! Packing all items destined for one chosen box.

use crate::layer::{LayerPacker, PackedLayer};
use crate::stabiliser::LayerStabiliser;
use cartonize_core::{BoxType, Item, PackedItem};
use std::collections::VecDeque;

/// Outcome of a single-box packing attempt.
#[derive(Debug, Clone)]
pub(crate) struct VolumeResult {
    /// Items placed, in the box's natural frame.
    pub packed: Vec<PackedItem>,
    /// Items that did not fit, in their original order.
    pub leftover: VecDeque<Item>,
}

impl VolumeResult {
    pub fn packed_volume(&self) -> u64 {
        self.packed.iter().map(|p| p.volume()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.leftover.is_empty()
    }
}

/// Packs a queue of items into one fixed box by stacking layers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VolumePacker<'a> {
    box_type: &'a BoxType,
    single_pass: bool,
}

impl<'a> VolumePacker<'a> {
    pub fn new(box_type: &'a BoxType, single_pass: bool) -> Self {
        Self {
            box_type,
            single_pass,
        }
    }

    /// Packs as many items as possible, trying the natural box frame and,
    /// unless in single-pass mode, the rotated frame (inner width and length
    /// swapped). A complete pack returns immediately; otherwise the frame
    /// with the higher utilisation wins, the natural frame on a tie.
    pub fn pack(&self, items: &VecDeque<Item>) -> VolumeResult {
        let natural = self.pack_frame(items, false);
        if natural.is_complete() || self.single_pass {
            return natural;
        }

        let rotated = self.pack_frame(items, true);
        if rotated.is_complete() || rotated.packed_volume() > natural.packed_volume() {
            rotated
        } else {
            natural
        }
    }

    /// Packs layer by layer in one box frame.
    ///
    /// Each layer is discovered twice: a discarded learning pass with an
    /// unconstrained height, then the real pass with the learned height
    /// frozen so shorter items can share the layer.
    fn pack_frame(&self, items: &VecDeque<Item>, swap: bool) -> VolumeResult {
        let (box_width, box_length) = if swap {
            (self.box_type.inner_length(), self.box_type.inner_width())
        } else {
            (self.box_type.inner_width(), self.box_type.inner_length())
        };
        let box_depth = self.box_type.inner_depth();
        let layer_packer = LayerPacker::new(box_width, box_length, box_depth);

        let has_constraints = items.iter().any(|i| i.constraint().is_some());

        let mut queue = items.clone();
        let mut packed: Vec<PackedItem> = Vec::new();
        let mut layers = Vec::new();
        let mut z = 0u32;

        while !queue.is_empty() && z < box_depth {
            let weight_left = u64::from(self.box_type.max_payload())
                - packed.iter().map(|p| u64::from(p.weight())).sum::<u64>();

            let mut trial_queue = queue.clone();
            let trial = layer_packer.pack_layer(&mut trial_queue, &packed, z, 0, weight_left);
            if trial.is_empty() {
                break;
            }

            let layer = layer_packer.pack_layer(
                &mut queue,
                &packed,
                z,
                trial.depth(),
                weight_left,
            );
            if layer.is_empty() {
                break;
            }

            z += layer.depth();
            packed.extend(layer.items().iter().cloned());
            layers.push(layer);
        }

        if swap {
            for layer in &mut layers {
                layer.swap_axes();
            }
        }

        if !self.single_pass && !has_constraints {
            layers = LayerStabiliser::new().stabilise(layers);
        }

        VolumeResult {
            packed: layers.into_iter().flat_map(PackedLayer::into_items).collect(),
            leftover: queue,
        }
    }
}
