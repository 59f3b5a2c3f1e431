//! Integration tests for the cartonize packing engine.

use cartonize::{
    pack, pack_with_weight_balance, Aabb, BoxCatalog, BoxType, Error, Item, PackedBoxList,
    PackedItem, Rotation,
};
use std::collections::BTreeMap;

/// Multiset of item ids across all boxes.
fn item_ids(packed: &PackedBoxList) -> BTreeMap<String, usize> {
    let mut ids = BTreeMap::new();
    for b in packed {
        for p in b.items() {
            *ids.entry(p.item().id().to_string()).or_insert(0) += 1;
        }
    }
    ids
}

/// Checks the structural invariants every successful packing must satisfy.
fn assert_packing_valid(packed: &PackedBoxList, items: &[Item], catalog: &BoxCatalog) {
    // Conservation: every input item appears exactly once.
    let mut expected = BTreeMap::new();
    for item in items {
        *expected.entry(item.id().to_string()).or_insert(0) += 1;
    }
    assert_eq!(item_ids(packed), expected);

    let mut uses = vec![0usize; catalog.len()];
    for b in packed {
        uses[b.box_index()] += 1;

        // Weight feasibility.
        assert!(b.items_weight() <= u64::from(b.box_type().max_payload()));

        // Containment and pairwise disjointness.
        let cavity = Aabb::new(
            [0, 0, 0],
            [
                u64::from(b.box_type().inner_width()),
                u64::from(b.box_type().inner_length()),
                u64::from(b.box_type().inner_depth()),
            ],
        );
        for (i, p) in b.items().iter().enumerate() {
            assert!(
                p.aabb().is_within(&cavity),
                "item '{}' leaves the box cavity",
                p.item().id()
            );
            for q in &b.items()[i + 1..] {
                assert!(
                    !p.aabb().intersects(&q.aabb()),
                    "items '{}' and '{}' overlap",
                    p.item().id(),
                    q.item().id()
                );
            }
        }
    }

    // Quantity feasibility.
    for (index, entry) in catalog.iter().enumerate() {
        assert!(uses[index] <= entry.quantity());
    }
}

fn positions(packed: &PackedBoxList) -> Vec<(String, u32, u32, u32, u32, u32, u32)> {
    packed
        .iter()
        .flat_map(|b| b.items())
        .map(|p: &PackedItem| {
            (
                p.item().id().to_string(),
                p.x(),
                p.y(),
                p.z(),
                p.width(),
                p.length(),
                p.depth(),
            )
        })
        .collect()
}

mod volume_packing {
    use super::*;

    #[test]
    fn test_single_item_exact_fit() {
        let catalog = BoxCatalog::new().with_box(
            BoxType::new("snug", 310, 210, 110)
                .with_inner(300, 200, 100)
                .with_empty_weight(50)
                .with_max_payload(1000),
            1,
        );
        let items = vec![Item::new("brick", 300, 200, 100).with_weight(100)];

        let packed = pack(&items, &catalog).unwrap();

        assert_eq!(packed.len(), 1);
        assert_packing_valid(&packed, &items, &catalog);

        let b = &packed[0];
        assert_eq!(b.total_weight(), 150);
        assert!((b.volume_utilisation() - 1.0).abs() < 1e-12);

        let p = &b.items()[0];
        assert_eq!((p.x(), p.y(), p.z()), (0, 0, 0));
    }

    #[test]
    fn test_two_items_stack_through_layers() {
        let catalog = BoxCatalog::new()
            .with_box(BoxType::new("deep", 300, 200, 100).with_empty_weight(10), 1);
        let items = vec![
            Item::new("a", 300, 200, 50).with_weight(10),
            Item::new("b", 300, 200, 50).with_weight(10),
        ];

        let packed = pack(&items, &catalog).unwrap();

        assert_eq!(packed.len(), 1);
        assert_packing_valid(&packed, &items, &catalog);

        let mut depths: Vec<u32> = packed[0].items().iter().map(|p| p.z()).collect();
        depths.sort_unstable();
        assert_eq!(depths, vec![0, 50]);
    }

    #[test]
    fn test_smaller_box_commits_when_it_suffices() {
        // 1.2 litres of items; the 1.5-litre box beats the 2-litre one.
        let catalog = BoxCatalog::new()
            .with_box(
                BoxType::new("big", 200, 100, 100).with_empty_weight(200),
                1,
            )
            .with_box(
                BoxType::new("small", 150, 100, 100).with_empty_weight(100),
                1,
            );
        let items = vec![
            Item::new("p1", 100, 100, 40).with_weight(10),
            Item::new("p2", 100, 100, 40).with_weight(10),
            Item::new("p3", 100, 100, 40).with_weight(10),
        ];

        let packed = pack(&items, &catalog).unwrap();

        assert_eq!(packed.len(), 1);
        assert_eq!(packed[0].box_type().id(), "small");
        assert_packing_valid(&packed, &items, &catalog);
    }

    #[test]
    fn test_multiple_boxes_in_volume_order() {
        let catalog = BoxCatalog::new()
            .with_box(BoxType::new("large", 200, 200, 200), 1)
            .with_box(BoxType::new("medium", 100, 100, 100), 2);
        let items = vec![
            Item::new("block", 200, 200, 200).with_weight(100),
            Item::new("cube1", 100, 100, 100).with_weight(50),
            Item::new("cube2", 100, 100, 100).with_weight(50),
        ];

        let packed = pack(&items, &catalog).unwrap();

        assert_eq!(packed.len(), 3);
        assert_eq!(packed[0].box_type().id(), "large");
        assert_packing_valid(&packed, &items, &catalog);
    }

    #[test]
    fn test_keep_flat_item_is_never_stood_up() {
        let catalog = BoxCatalog::new().with_box(BoxType::new("box", 100, 100, 300), 1);
        // Flat: only the two footprint rotations are legal, so the slab keeps
        // its 20 depth even though standing it up would pack tighter.
        let items =
            vec![Item::new("slab", 100, 60, 20).with_rotation(Rotation::KeepFlat)];

        let packed = pack(&items, &catalog).unwrap();

        let p = &packed[0].items()[0];
        assert_eq!(p.depth(), 20);
    }
}

mod failure_modes {
    use super::*;

    #[test]
    fn test_quantity_exhaustion() {
        let catalog = BoxCatalog::new().with_box(BoxType::new("cube", 100, 100, 100), 3);
        let items: Vec<Item> = (0..5)
            .map(|i| Item::new(format!("c{i}"), 100, 100, 100))
            .collect();

        let err = pack(&items, &catalog).unwrap_err();
        assert!(matches!(err, Error::InsufficientBoxes { remaining: 2 }));
    }

    #[test]
    fn test_oversized_item() {
        let catalog = BoxCatalog::new().with_box(BoxType::new("cube", 100, 100, 100), 1);
        let err = pack(&[Item::new("girder", 400, 20, 20)], &catalog).unwrap_err();
        assert!(matches!(err, Error::ItemTooLarge { item } if item == "girder"));
    }

    #[test]
    fn test_rotation_policy_can_make_item_oversized() {
        let catalog = BoxCatalog::new().with_box(BoxType::new("box", 100, 100, 300), 1);
        // Fits only standing up, which the policy forbids.
        let flat = Item::new("pole", 250, 40, 40).with_rotation(Rotation::KeepFlat);

        let err = pack(&[flat], &catalog).unwrap_err();
        assert!(matches!(err, Error::ItemTooLarge { .. }));
    }

    #[test]
    fn test_unsatisfiable_constraint() {
        let catalog = BoxCatalog::new().with_box(BoxType::new("box", 300, 200, 100), 1);
        let item = Item::new("aloft", 10, 10, 10)
            .with_constraint(|_packed: &[PackedItem], _x: u32, _y: u32, z: u32| z >= 500);

        let err = pack(&[item], &catalog).unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation { item } if item == "aloft"));
    }

    #[test]
    fn test_no_partial_result_on_failure() {
        let catalog = BoxCatalog::new().with_box(BoxType::new("cube", 100, 100, 100), 1);
        let items = vec![
            Item::new("fits", 100, 100, 100),
            Item::new("also-fits", 100, 100, 100),
        ];

        // One box short: the call fails outright instead of returning the
        // box it managed to fill.
        assert!(pack(&items, &catalog).is_err());
    }
}

mod properties {
    use super::*;

    fn mixed_fixture() -> (Vec<Item>, BoxCatalog) {
        let catalog = BoxCatalog::new()
            .with_box(
                BoxType::new("hamper", 400, 300, 200)
                    .with_empty_weight(500)
                    .with_max_payload(5_000),
                2,
            )
            .with_box(
                BoxType::new("carton", 200, 150, 100)
                    .with_empty_weight(120)
                    .with_max_payload(2_000),
                4,
            );
        let items = vec![
            Item::new("tv", 390, 290, 120).with_weight(3_000),
            Item::new("ream", 300, 210, 50).with_weight(2_500),
            Item::new("book1", 190, 140, 40).with_weight(400),
            Item::new("book2", 190, 140, 40).with_weight(400),
            Item::new("mug", 90, 90, 90).with_weight(300),
            Item::new("cable", 150, 100, 30).with_weight(150),
            Item::new("pen", 140, 20, 15).with_weight(20),
        ];
        (items, catalog)
    }

    #[test]
    fn test_structural_invariants_hold() {
        let (items, catalog) = mixed_fixture();
        let packed = pack(&items, &catalog).unwrap();
        assert_packing_valid(&packed, &items, &catalog);
    }

    #[test]
    fn test_determinism() {
        let (items, catalog) = mixed_fixture();

        let first = pack(&items, &catalog).unwrap();
        let second = pack(&items, &catalog).unwrap();

        assert_eq!(positions(&first), positions(&second));
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn test_weight_balance_preserves_invariants() {
        let (items, catalog) = mixed_fixture();

        let plain = pack(&items, &catalog).unwrap();
        let balanced = pack_with_weight_balance(&items, &catalog).unwrap();

        assert_packing_valid(&balanced, &items, &catalog);
        assert!(balanced.len() <= plain.len());
        assert!(balanced.weight_variance() <= plain.weight_variance() + 1e-9);
    }

    #[test]
    fn test_rotation_closure() {
        // Relabelling the dimensions of a freely rotatable item must not
        // change where or how it is packed.
        let catalog = BoxCatalog::new().with_box(BoxType::new("box", 300, 300, 300), 1);

        let original = vec![Item::new("i", 200, 100, 50).with_rotation(Rotation::Any)];
        let relabelled = vec![Item::new("i", 100, 200, 50).with_rotation(Rotation::Any)];

        let a = pack(&original, &catalog).unwrap();
        let b = pack(&relabelled, &catalog).unwrap();

        assert_eq!(positions(&a), positions(&b));
    }
}

mod weight_balancing {
    use super::*;

    #[test]
    fn test_redistribution_lowers_variance() {
        let catalog = BoxCatalog::new()
            .with_box(BoxType::new("duo", 100, 100, 200).with_empty_weight(10), 2)
            .with_box(BoxType::new("solo", 100, 100, 100).with_empty_weight(5), 3);
        let items = vec![
            Item::new("h1", 100, 100, 100).with_weight(100),
            Item::new("h2", 100, 100, 100).with_weight(90),
            Item::new("l1", 100, 100, 100).with_weight(10),
        ];

        let plain = pack(&items, &catalog).unwrap();
        let balanced = pack_with_weight_balance(&items, &catalog).unwrap();

        assert_eq!(balanced.len(), plain.len());
        assert!(balanced.weight_variance() < plain.weight_variance());
        assert_packing_valid(&balanced, &items, &catalog);
    }

    #[test]
    fn test_redistribution_can_eliminate_a_box() {
        // Volume packing needs three boxes: the heavy item hogs one on its
        // own because of the payload limits. Rebalancing later discovers the
        // heavy and light items share a duo, freeing a box.
        let catalog = BoxCatalog::new()
            .with_box(
                BoxType::new("duo", 100, 100, 200)
                    .with_empty_weight(10)
                    .with_max_payload(200),
                2,
            )
            .with_box(
                BoxType::new("solo", 100, 100, 100)
                    .with_empty_weight(5)
                    .with_max_payload(300),
                2,
            );
        let items = vec![
            Item::new("h", 100, 100, 100).with_weight(180),
            Item::new("m", 100, 100, 100).with_weight(100),
            Item::new("s1", 100, 100, 100).with_weight(10),
            Item::new("s2", 100, 100, 100).with_weight(10),
        ];

        let plain = pack(&items, &catalog).unwrap();
        assert_eq!(plain.len(), 3);

        let balanced = pack_with_weight_balance(&items, &catalog).unwrap();

        assert_eq!(balanced.len(), 2);
        assert!(balanced.weight_variance() < plain.weight_variance());
        assert_packing_valid(&balanced, &items, &catalog);
    }

    #[test]
    fn test_balancing_single_box_is_identity() {
        let catalog = BoxCatalog::new().with_box(BoxType::new("box", 300, 200, 100), 1);
        let items = vec![
            Item::new("a", 300, 200, 50).with_weight(100),
            Item::new("b", 300, 200, 50).with_weight(900),
        ];

        let plain = pack(&items, &catalog).unwrap();
        let balanced = pack_with_weight_balance(&items, &catalog).unwrap();

        assert_eq!(positions(&plain), positions(&balanced));
    }
}

mod constraints {
    use super::*;

    #[test]
    fn test_constrained_item_stays_on_the_floor() {
        let catalog = BoxCatalog::new().with_box(BoxType::new("box", 100, 100, 200), 1);
        let items = vec![
            Item::new("base", 100, 100, 100)
                .with_weight(500)
                .with_constraint(|_packed: &[PackedItem], _x: u32, _y: u32, z: u32| z == 0),
            Item::new("top", 100, 100, 100).with_weight(100),
        ];

        let packed = pack(&items, &catalog).unwrap();

        assert_eq!(packed.len(), 1);
        assert_packing_valid(&packed, &items, &catalog);

        let base = packed[0]
            .items()
            .iter()
            .find(|p| p.item().id() == "base")
            .unwrap();
        let top = packed[0]
            .items()
            .iter()
            .find(|p| p.item().id() == "top")
            .unwrap();
        assert_eq!(base.z(), 0);
        assert_eq!(top.z(), 100);
    }

    #[test]
    fn test_constraint_sees_already_packed_items() {
        let catalog = BoxCatalog::new().with_box(BoxType::new("box", 200, 100, 100), 2);
        // The second item insists on being the first into its box.
        let items = vec![
            Item::new("a_first", 100, 100, 100).with_weight(50),
            Item::new("b_alone", 100, 100, 100)
                .with_weight(10)
                .with_constraint(|packed: &[PackedItem], _x: u32, _y: u32, _z: u32| {
                    packed.is_empty()
                }),
        ];

        // "a_first" sorts first and occupies the first box, so the predicate
        // pushes "b_alone" out into a box of its own.
        let packed = pack(&items, &catalog).unwrap();

        assert_eq!(packed.len(), 2);
        assert_packing_valid(&packed, &items, &catalog);
        let alone = packed
            .iter()
            .find(|b| b.items().iter().any(|p| p.item().id() == "b_alone"))
            .unwrap();
        assert_eq!(alone.item_count(), 1);
    }

    #[test]
    fn test_exhausted_stock_beats_constraint_classification() {
        // The only box is used up by the unconstrained item; the constrained
        // one is left over because of stock, not because of its predicate.
        let catalog = BoxCatalog::new().with_box(BoxType::new("S", 100, 100, 100), 1);
        let items = vec![
            Item::new("a-filler", 100, 100, 100),
            Item::new("b-constrained", 100, 100, 100).with_constraint(
                |_packed: &[PackedItem], _x: u32, _y: u32, z: u32| z == 0,
            ),
        ];

        let err = pack(&items, &catalog).unwrap_err();
        assert!(matches!(err, Error::InsufficientBoxes { remaining: 1 }));
    }
}
