//! Group mutation operations.
//!
//! All operations are pure: they take a snapshot and return a new one, never
//! touching their input. Operations that create items take the caller's
//! [`NextId`] cursor and return the advanced cursor.

use std::cmp::Ordering;

use depot_core::{DomainError, DomainResult};

use crate::line_item::{GroupId, LineItem, NextId};

/// Turn `item` into a fresh group of `group_size` members.
///
/// The first member keeps `item`'s persistent identity (`uuid`, `is_new`) so
/// the original backing row maps onto the group; the rest are new units.
/// A `group_size` of 1 yields a tagged group of one, which is still reported
/// as a non-group.
pub fn create_group_from_item(
    item: &LineItem,
    group_size: usize,
    next_id: NextId,
) -> DomainResult<(Vec<LineItem>, NextId)> {
    if group_size == 0 {
        return Err(DomainError::validation("group size must be at least 1"));
    }
    next_id.reserve(0, group_size)?;

    let group_id = GroupId::generate();
    let mut cursor = next_id;

    let mut first = item.templated(cursor.take(), Some(group_id.clone()));
    first.uuid = item.uuid;
    first.is_new = item.is_new;

    let mut members = Vec::with_capacity(group_size);
    members.push(first);
    members.extend((1..group_size).map(|_| item.templated(cursor.take(), Some(group_id.clone()))));

    Ok((members, cursor))
}

/// Change the member count of `group_id` to `new_size`.
///
/// - `0` removes the group.
/// - Growing appends copies of the first member right after the group's last
///   member.
/// - Shrinking keeps the earliest `new_size` members.
///
/// Items outside the group are never reordered or modified. A `group_id` that
/// matches no item leaves the list unchanged. Growth beyond what the list or
/// the id cursor can hold is rejected before anything is built.
pub fn resize_group(
    group_id: &GroupId,
    new_size: usize,
    items: &[LineItem],
    next_id: NextId,
) -> DomainResult<(Vec<LineItem>, NextId)> {
    let positions: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.in_group(group_id))
        .map(|(position, _)| position)
        .collect();

    let (Some(&first), Some(&last)) = (positions.first(), positions.last()) else {
        return Ok((items.to_vec(), next_id));
    };

    if new_size == 0 {
        return Ok((remove_group(group_id, items), next_id));
    }

    match new_size.cmp(&positions.len()) {
        Ordering::Equal => Ok((items.to_vec(), next_id)),
        Ordering::Greater => {
            let template = &items[first];
            let mut cursor = next_id;
            let added = new_size - positions.len();
            let total = next_id.reserve(items.len(), added)?;

            let mut out = Vec::with_capacity(total);
            out.extend_from_slice(&items[..=last]);
            out.extend((0..added).map(|_| template.templated(cursor.take(), Some(group_id.clone()))));
            out.extend_from_slice(&items[last + 1..]);
            Ok((out, cursor))
        }
        Ordering::Less => {
            let mut kept = 0;
            let out = items
                .iter()
                .filter(|item| {
                    if !item.in_group(group_id) {
                        return true;
                    }
                    kept += 1;
                    kept <= new_size
                })
                .cloned()
                .collect();
            Ok((out, next_id))
        }
    }
}

/// Drop every member of `group_id`, keeping the remaining order.
pub fn remove_group(group_id: &GroupId, items: &[LineItem]) -> Vec<LineItem> {
    items
        .iter()
        .filter(|item| !item.in_group(group_id))
        .cloned()
        .collect()
}

/// Dissolve `group_id` into independent items.
pub fn ungroup(group_id: &GroupId, items: &[LineItem]) -> Vec<LineItem> {
    items
        .iter()
        .map(|item| {
            if item.in_group(group_id) {
                item.clone().with_group(None)
            } else {
                item.clone()
            }
        })
        .collect()
}
