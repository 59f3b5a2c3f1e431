//! Filling a single horizontal layer of a box.

use crate::orientation::OrientatedItemFactory;
use cartonize_core::{Item, PackedItem};
use std::collections::VecDeque;

/// A horizontal slab of packed items sharing the same z-range.
#[derive(Debug, Clone)]
pub struct PackedLayer {
    start_depth: u32,
    items: Vec<PackedItem>,
}

impl PackedLayer {
    pub(crate) fn new(start_depth: u32, items: Vec<PackedItem>) -> Self {
        Self { start_depth, items }
    }

    /// Returns the z coordinate the layer starts at.
    pub fn start_depth(&self) -> u32 {
        self.start_depth
    }

    /// Returns the layer depth: the tallest item it contains.
    pub fn depth(&self) -> u32 {
        self.items.iter().map(|p| p.depth()).max().unwrap_or(0)
    }

    /// Returns the packed items.
    pub fn items(&self) -> &[PackedItem] {
        &self.items
    }

    /// Returns true if nothing was placed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the area of the minimum x-y rectangle covering the layer.
    pub fn footprint_area(&self) -> u64 {
        if self.items.is_empty() {
            return 0;
        }
        let min_x = self.items.iter().map(|p| p.x()).min().unwrap_or(0);
        let min_y = self.items.iter().map(|p| p.y()).min().unwrap_or(0);
        let max_x = self.items.iter().map(|p| p.x() + p.width()).max().unwrap_or(0);
        let max_y = self.items.iter().map(|p| p.y() + p.length()).max().unwrap_or(0);
        u64::from(max_x - min_x) * u64::from(max_y - min_y)
    }

    /// Moves the layer so it starts at the given depth, shifting every item.
    pub(crate) fn shift_to(&mut self, start_depth: u32) {
        let old = self.start_depth;
        for item in &mut self.items {
            let offset = item.z() - old;
            item.shift_z_to(start_depth + offset);
        }
        self.start_depth = start_depth;
    }

    /// Swaps the x and y axes of every item in the layer.
    pub(crate) fn swap_axes(&mut self) {
        for item in &mut self.items {
            item.swap_axes();
        }
    }

    pub(crate) fn into_items(self) -> Vec<PackedItem> {
        self.items
    }
}

/// Fills one layer of a box, row by row.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LayerPacker {
    box_width: u32,
    box_length: u32,
    box_depth: u32,
}

impl LayerPacker {
    /// Creates a layer packer for a box cavity of the given dimensions.
    /// The dimensions are those of the frame being packed, so a rotated box
    /// passes its width and length pre-swapped.
    pub fn new(box_width: u32, box_length: u32, box_depth: u32) -> Self {
        Self {
            box_width,
            box_length,
            box_depth,
        }
    }

    /// Packs one layer starting at depth `z0`, consuming items from the front
    /// of the queue.
    ///
    /// With `target_depth == 0` the layer height is learned from the first
    /// placed item; otherwise placements are ranked against the fixed height.
    /// `weight_left` is the box payload still available; an empty layer is a
    /// normal terminator, not an error.
    pub fn pack_layer(
        &self,
        items: &mut VecDeque<Item>,
        prior: &[PackedItem],
        z0: u32,
        target_depth: u32,
        weight_left: u64,
    ) -> PackedLayer {
        let factory = OrientatedItemFactory::new();

        // Constraint predicates see everything packed so far, including the
        // layer under construction.
        let mut context: Vec<PackedItem> = prior.to_vec();
        let prior_len = context.len();

        let mut layer_depth = target_depth;
        let mut weight_left = weight_left;
        let (mut x, mut y, mut row_length) = (0u32, 0u32, 0u32);

        loop {
            let Some(head) = items.front() else { break };
            if u64::from(head.weight()) > weight_left {
                break;
            }

            let width_left = self.box_width - x;
            let length_left = self.box_length - y;
            let depth_left = if layer_depth > 0 {
                layer_depth
            } else {
                self.box_depth - z0
            };

            let hint = items.get(1);
            let best = factory.best_orientation(
                head,
                width_left,
                length_left,
                depth_left,
                &context,
                hint,
                x,
                y,
                z0,
            );

            match best {
                Some(orientated) => {
                    let placed = PackedItem::new(orientated, x, y, z0);
                    x += placed.width();
                    row_length = row_length.max(placed.length());
                    if layer_depth == 0 {
                        layer_depth = placed.depth();
                    }
                    weight_left -= u64::from(placed.weight());
                    context.push(placed);
                    items.pop_front();
                }
                None => {
                    // Start a new row, unless it would overflow the layer.
                    if row_length > 0 && y + row_length < self.box_length {
                        x = 0;
                        y += row_length;
                        row_length = 0;
                    } else {
                        break;
                    }
                }
            }
        }

        PackedLayer::new(z0, context.split_off(prior_len))
    }
}
