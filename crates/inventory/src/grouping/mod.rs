//! Grouping engine: a pure, synchronous layer over an ordered list of line
//! items.
//!
//! Items sharing a [`GroupId`](crate::GroupId) form a group; the earliest
//! member in list order represents it. Nothing here performs IO or keeps
//! state between calls: every function recomputes from the snapshot it is
//! given.

pub mod display;
pub mod duplicate;
pub mod mutate;
pub mod partition;

pub use display::{DisplayMode, visible_items};
pub use duplicate::{duplicate_group, duplicate_item, duplicate_selected};
pub use mutate::{create_group_from_item, remove_group, resize_group, ungroup};
pub use partition::{
    Bucket, GroupInfo, GroupKey, GroupPartition, describe_group, display_number,
    partition_by_group,
};

#[cfg(test)]
mod proptest_tests {
    use std::collections::HashSet;

    use super::*;
    use crate::line_item::{GroupId, ItemAttributes, LineId, LineItem, NextId};
    use proptest::prelude::*;

    /// Items with ids 1..=n, each in one of three groups or standalone.
    fn arb_items() -> impl Strategy<Value = Vec<LineItem>> {
        prop::collection::vec(prop::option::of(0usize..3), 0..24).prop_map(|slots| {
            let groups = [
                GroupId::parse("alpha"),
                GroupId::parse("beta"),
                GroupId::parse("gamma"),
            ];
            slots
                .into_iter()
                .enumerate()
                .map(|(index, slot)| {
                    LineItem::new(LineId::new(index as u64 + 1), ItemAttributes::default())
                        .with_group(slot.and_then(|s| groups[s].clone()))
                })
                .collect()
        })
    }

    fn target() -> GroupId {
        GroupId::parse("alpha").expect("non-blank")
    }

    fn line_ids(items: &[LineItem]) -> Vec<LineId> {
        items.iter().map(|item| item.id).collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: every item lands in exactly one bucket.
        #[test]
        fn partition_is_total_and_disjoint(items in arb_items()) {
            let partition = partition_by_group(&items);
            let mut seen: Vec<LineId> = partition
                .buckets()
                .iter()
                .flat_map(|bucket| bucket.members.iter().map(|m| m.id))
                .collect();
            seen.sort();
            prop_assert_eq!(seen, line_ids(&items));
        }

        /// Property: each group has exactly one representative, its earliest member.
        #[test]
        fn exactly_one_representative_per_group(items in arb_items()) {
            let partition = partition_by_group(&items);
            for bucket in partition.buckets() {
                let firsts: Vec<LineId> = bucket
                    .members
                    .iter()
                    .filter(|m| describe_group(m, &partition).is_first_in_group)
                    .map(|m| m.id)
                    .collect();
                prop_assert_eq!(firsts, vec![bucket.members[0].id]);
                let earliest = items.iter().find(|i| bucket.members.iter().any(|m| m.id == i.id));
                prop_assert_eq!(earliest.map(|i| i.id), Some(bucket.members[0].id));
            }
        }

        /// Property: growing then shrinking back restores the count and the survivors.
        #[test]
        fn resize_round_trip_keeps_survivors(items in arb_items(), grow in 1usize..5) {
            let g = target();
            let original: Vec<LineId> = items.iter().filter(|i| i.in_group(&g)).map(|i| i.id).collect();
            let next = NextId::after(&items);

            let (grown, next) = resize_group(&g, original.len() + grow, &items, next).unwrap();
            let (back, _) = resize_group(&g, original.len(), &grown, next).unwrap();

            prop_assert_eq!(back, items);
        }

        /// Property: shrinking keeps exactly the earliest members and leaves others alone.
        #[test]
        fn shrink_keeps_prefix(items in arb_items(), keep in 0usize..4) {
            let g = target();
            let members: Vec<LineId> = items.iter().filter(|i| i.in_group(&g)).map(|i| i.id).collect();
            let keep = keep.min(members.len());
            let (out, next) = resize_group(&g, keep, &items, NextId::after(&items)).unwrap();

            let survivors: Vec<LineId> = out.iter().filter(|i| i.in_group(&g)).map(|i| i.id).collect();
            let expected: Vec<LineId> = members.iter().copied().take(keep).collect();
            prop_assert_eq!(survivors, expected);
            let others = |list: &[LineItem]| -> Vec<LineItem> {
                list.iter().filter(|i| !i.in_group(&g)).cloned().collect()
            };
            prop_assert_eq!(others(&out), others(&items));
            prop_assert_eq!(next, NextId::after(&items));
        }

        /// Property: duplicating one member of a real group copies all of its members.
        #[test]
        fn duplicate_of_group_member_copies_whole_group(items in arb_items()) {
            let g = target();
            let members: Vec<&LineItem> = items.iter().filter(|i| i.in_group(&g)).collect();
            prop_assume!(members.len() > 1);

            let selected = members[members.len() - 1];
            let (copies, next) = duplicate_selected(selected, &items, 1, NextId::after(&items)).unwrap();

            prop_assert_eq!(copies.len(), members.len());
            let groups: HashSet<Option<GroupId>> = copies.iter().map(|c| c.group_id.clone()).collect();
            prop_assert_eq!(groups.len(), 1);
            prop_assert!(!groups.contains(&Some(g)));
            prop_assert!(copies.iter().all(|c| c.uuid.is_none() && c.is_new));
            prop_assert_eq!(next.get(), NextId::after(&items).get() + members.len() as u64);
        }

        /// Property: ungroup clears the group and keeps every item in place.
        #[test]
        fn ungroup_clears_grouping(items in arb_items()) {
            let g = target();
            let out = ungroup(&g, &items);
            prop_assert!(out.iter().all(|i| !i.in_group(&g)));
            prop_assert_eq!(line_ids(&out), line_ids(&items));
        }

        /// Property: remove_group drops exactly the group's members.
        #[test]
        fn remove_group_is_exact(items in arb_items()) {
            let g = target();
            let out = remove_group(&g, &items);
            let expected: Vec<LineItem> = items.iter().filter(|i| !i.in_group(&g)).cloned().collect();
            prop_assert_eq!(out, expected);
        }

        /// Property: grouped display shows one row per bucket.
        #[test]
        fn grouped_display_has_one_row_per_bucket(items in arb_items()) {
            let partition = partition_by_group(&items);
            prop_assert_eq!(visible_items(&items, DisplayMode::Grouped).len(), partition.len());
        }
    }
}
