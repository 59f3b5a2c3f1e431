//! Orientation selection for a single placement.

use cartonize_core::{Item, OrientatedItem, PackedItem};

/// Chooses how an item should be rotated to best fill a residual cuboid.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrientatedItemFactory;

impl OrientatedItemFactory {
    /// Creates a new factory.
    pub fn new() -> Self {
        Self
    }

    /// Enumerates the orientations allowed by the item's rotation policy that
    /// fit the residual cuboid. Duplicate dimension triples are collapsed so
    /// the choice does not depend on how the caller labelled equal axes.
    pub fn possible_orientations(
        item: &Item,
        width_left: u32,
        length_left: u32,
        depth_left: u32,
    ) -> Vec<OrientatedItem> {
        let mut seen: Vec<(u32, u32, u32)> = Vec::new();
        let mut orientations = Vec::new();

        for &permutation in item.rotation().permutations() {
            let dims = item.dimensions_for_permutation(permutation);
            let triple = (dims.x, dims.y, dims.z);
            if seen.contains(&triple) {
                continue;
            }
            seen.push(triple);

            if dims.x <= width_left && dims.y <= length_left && dims.z <= depth_left {
                orientations.push(OrientatedItem::new(item.clone(), dims.x, dims.y, dims.z));
            }
        }

        orientations
    }

    /// Returns true if the item fits the cuboid in at least one allowed
    /// orientation, ignoring any packing constraint.
    pub fn fits(item: &Item, width: u32, length: u32, depth: u32) -> bool {
        !Self::possible_orientations(item, width, length, depth).is_empty()
    }

    /// Returns the preferred orientation of `item` inside the residual cuboid
    /// at the proposed position, or `None` if no orientation fits.
    ///
    /// Preference order: smallest surplus along the layer depth, then least
    /// wasted footprint area, then orientations after which the hinted next
    /// item still fits, then the lexicographically smallest dimension triple.
    #[allow(clippy::too_many_arguments)]
    pub fn best_orientation(
        &self,
        item: &Item,
        width_left: u32,
        length_left: u32,
        depth_left: u32,
        already_packed: &[PackedItem],
        hint: Option<&Item>,
        x: u32,
        y: u32,
        z: u32,
    ) -> Option<OrientatedItem> {
        if let Some(constraint) = item.constraint() {
            if !constraint.can_be_packed(already_packed, x, y, z) {
                return None;
            }
        }

        let residual_area = u64::from(width_left) * u64::from(length_left);
        Self::possible_orientations(item, width_left, length_left, depth_left)
            .into_iter()
            .min_by_key(|o| {
                let surplus = depth_left - o.depth();
                let wasted_area = residual_area - o.footprint_area();
                let hint_miss = match hint {
                    Some(next) => {
                        u8::from(!Self::hint_fits_after(next, o, width_left, length_left, depth_left))
                    }
                    None => 0,
                };
                (surplus, wasted_area, hint_miss, o.width(), o.length(), o.depth())
            })
    }

    /// Checks whether `hint` fits in either remainder of the residual cuboid
    /// once `placed` occupies its corner: to the right of it, or ahead of it.
    fn hint_fits_after(
        hint: &Item,
        placed: &OrientatedItem,
        width_left: u32,
        length_left: u32,
        depth_left: u32,
    ) -> bool {
        Self::fits(hint, width_left - placed.width(), length_left, depth_left)
            || Self::fits(hint, width_left, length_left - placed.length(), depth_left)
    }
}
