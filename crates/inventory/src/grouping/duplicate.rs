//! Duplication of standalone items and whole groups.
//!
//! Duplicates never carry a persistent identity: they are always new units.

use depot_core::{DomainError, DomainResult};

use super::partition::{describe_group, partition_by_group};
use crate::line_item::{GroupId, LineItem, NextId};

/// Copy every member of a group into a new group, one-to-one and in order.
pub fn duplicate_group(
    members: &[LineItem],
    new_group_id: &GroupId,
    start_id: NextId,
) -> DomainResult<(Vec<LineItem>, NextId)> {
    start_id.reserve(0, members.len())?;

    let mut cursor = start_id;
    let copies = members
        .iter()
        .map(|member| member.templated(cursor.take(), Some(new_group_id.clone())))
        .collect();
    Ok((copies, cursor))
}

/// Make `count` independent, ungrouped copies of a standalone item.
pub fn duplicate_item(
    item: &LineItem,
    count: usize,
    start_id: NextId,
) -> DomainResult<(Vec<LineItem>, NextId)> {
    if count == 0 {
        return Err(DomainError::validation("duplicate count must be at least 1"));
    }
    start_id.reserve(0, count)?;

    let mut cursor = start_id;
    let copies = (0..count).map(|_| item.templated(cursor.take(), None)).collect();
    Ok((copies, cursor))
}

/// Duplicate the item a user selected, `count` times.
///
/// A member of a real group stands for the whole group: every replica copies
/// all members under its own fresh group id. Anything else is duplicated as a
/// standalone item.
pub fn duplicate_selected(
    item: &LineItem,
    items: &[LineItem],
    count: usize,
    next_id: NextId,
) -> DomainResult<(Vec<LineItem>, NextId)> {
    if count == 0 {
        return Err(DomainError::validation("duplicate count must be at least 1"));
    }

    let partition = partition_by_group(items);
    let info = describe_group(item, &partition);

    let group_id = match info.group_id {
        Some(group_id) if info.is_group => group_id,
        _ => return duplicate_item(item, count, next_id),
    };

    let members: Vec<LineItem> = partition
        .members(&group_id)
        .iter()
        .map(|member| (*member).clone())
        .collect();

    let created = members.len().checked_mul(count).ok_or_else(|| {
        DomainError::validation(format!(
            "cannot duplicate a group of {} members {count} times",
            members.len()
        ))
    })?;
    let total = next_id.reserve(0, created)?;

    let mut cursor = next_id;
    let mut replicas = Vec::with_capacity(total);
    for _ in 0..count {
        let (copies, advanced) = duplicate_group(&members, &GroupId::generate(), cursor)?;
        replicas.extend(copies);
        cursor = advanced;
    }

    Ok((replicas, cursor))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use depot_core::RecordId;

    use crate::line_item::{ItemAttributes, LineId};

    fn persisted(id: u64, group: Option<&GroupId>) -> LineItem {
        LineItem::persisted(
            LineId::new(id),
            RecordId::new(),
            group.cloned(),
            ItemAttributes {
                item_code: Some(format!("CODE-{id}")),
                ..ItemAttributes::default()
            },
        )
    }

    #[test]
    fn duplicate_group_copies_members_in_order() {
        let g = GroupId::generate();
        let members = vec![persisted(1, Some(&g)), persisted(2, Some(&g))];
        let new_group = GroupId::generate();

        let (copies, next) = duplicate_group(&members, &new_group, NextId::new(20)).unwrap();
        assert_eq!(next, NextId::new(22));
        assert_eq!(copies.len(), 2);
        for (copy, original) in copies.iter().zip(&members) {
            assert!(copy.in_group(&new_group));
            assert_eq!(copy.uuid, None);
            assert!(copy.is_new);
            assert_eq!(copy.attributes, original.attributes);
        }
        assert_eq!(copies[0].id, LineId::new(20));
        assert_eq!(copies[1].id, LineId::new(21));
    }

    #[test]
    fn duplicate_item_makes_ungrouped_copies() {
        let original = persisted(1, None);
        let (copies, next) = duplicate_item(&original, 3, NextId::new(5)).unwrap();

        assert_eq!(next, NextId::new(8));
        assert!(copies.iter().all(|c| c.group_id.is_none() && c.uuid.is_none() && c.is_new));
    }

    #[test]
    fn duplicate_item_rejects_zero_count() {
        let err = duplicate_item(&persisted(1, None), 0, NextId::new(2)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn duplicating_one_member_duplicates_the_whole_group() {
        let g = GroupId::generate();
        let items = vec![
            persisted(1, Some(&g)),
            persisted(2, Some(&g)),
            persisted(3, Some(&g)),
            persisted(4, None),
        ];

        let (copies, next) = duplicate_selected(&items[1], &items, 2, NextId::new(10)).unwrap();
        assert_eq!(copies.len(), 6);
        assert_eq!(next, NextId::new(16));

        let groups: HashSet<GroupId> = copies.iter().filter_map(|c| c.group_id.clone()).collect();
        assert_eq!(groups.len(), 2);
        assert!(!groups.contains(&g));

        let original_records: HashSet<RecordId> = items.iter().filter_map(|i| i.uuid).collect();
        assert!(copies.iter().all(|c| c.uuid.is_none()));
        assert_eq!(original_records.len(), 4);
    }

    #[test]
    fn duplicating_a_group_an_unbounded_number_of_times_is_rejected() {
        let g = GroupId::generate();
        let items = vec![persisted(1, Some(&g)), persisted(2, Some(&g))];

        let err = duplicate_selected(&items[0], &items, usize::MAX, NextId::new(3)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn duplicate_item_rejects_unbounded_count() {
        let err = duplicate_item(&persisted(1, None), usize::MAX, NextId::new(2)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn duplicate_group_rejects_exhausted_ids() {
        let g = GroupId::generate();
        let members = vec![persisted(1, Some(&g)), persisted(2, Some(&g))];

        let err = duplicate_group(&members, &GroupId::generate(), NextId::new(u64::MAX)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn duplicating_a_group_of_one_treats_it_as_standalone() {
        let g = GroupId::generate();
        let items = vec![persisted(1, Some(&g))];

        let (copies, _) = duplicate_selected(&items[0], &items, 2, NextId::new(2)).unwrap();
        assert_eq!(copies.len(), 2);
        assert!(copies.iter().all(|c| c.group_id.is_none()));
    }
}
