//! Partitioning of line items into groups, and per-item group metadata.

use std::collections::HashMap;

use serde::Serialize;

use depot_core::RecordId;

use crate::line_item::{GroupId, LineId, LineItem};

/// Key of one partition bucket.
///
/// Ungrouped items each get an `Individual` bucket. The key is scoped to a
/// single partitioning call and is never written back into an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Real(GroupId),
    Individual {
        /// Position of the item in the partitioned input; unique per call.
        position: usize,
        line: LineId,
        record: Option<RecordId>,
    },
}

impl GroupKey {
    pub fn is_real(&self) -> bool {
        matches!(self, GroupKey::Real(_))
    }
}

impl core::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GroupKey::Real(group_id) => write!(f, "{group_id}"),
            GroupKey::Individual {
                record: Some(record),
                ..
            } => write!(f, "individual-{record}"),
            GroupKey::Individual { line, .. } => write!(f, "individual-{line}"),
        }
    }
}

/// One bucket: a key and its members in input order.
#[derive(Debug, Clone)]
pub struct Bucket<'a> {
    pub key: GroupKey,
    pub members: Vec<&'a LineItem>,
}

/// Total, disjoint partition of a line-item list.
///
/// Buckets are ordered by first sight; members keep their input order.
#[derive(Debug, Clone, Default)]
pub struct GroupPartition<'a> {
    buckets: Vec<Bucket<'a>>,
    real: HashMap<GroupId, usize>,
}

impl<'a> GroupPartition<'a> {
    pub fn buckets(&self) -> &[Bucket<'a>] {
        &self.buckets
    }

    /// Number of buckets (real groups plus individual items).
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Members of a real group, empty if no item carries `group_id`.
    pub fn members(&self, group_id: &GroupId) -> &[&'a LineItem] {
        match self.real.get(group_id) {
            Some(&index) => &self.buckets[index].members,
            None => &[],
        }
    }

    /// Real groups with more than one member, in first-sight order.
    pub fn multi_member_groups(&self) -> impl Iterator<Item = (&GroupId, &[&'a LineItem])> {
        self.buckets.iter().filter_map(|bucket| match &bucket.key {
            GroupKey::Real(group_id) if bucket.members.len() > 1 => {
                Some((group_id, bucket.members.as_slice()))
            }
            _ => None,
        })
    }
}

/// Group metadata of a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupInfo {
    /// True only for real groups with more than one member.
    pub is_group: bool,
    pub group_size: usize,
    /// Whether the item is the group's representative (earliest in list order).
    pub is_first_in_group: bool,
    pub group_id: Option<GroupId>,
}

impl GroupInfo {
    fn standalone() -> Self {
        Self {
            is_group: false,
            group_size: 1,
            is_first_in_group: true,
            group_id: None,
        }
    }
}

/// Partition `items` by group.
pub fn partition_by_group(items: &[LineItem]) -> GroupPartition<'_> {
    let mut partition = GroupPartition::default();

    for (position, item) in items.iter().enumerate() {
        match &item.group_id {
            Some(group_id) => match partition.real.get(group_id) {
                Some(&index) => partition.buckets[index].members.push(item),
                None => {
                    partition.real.insert(group_id.clone(), partition.buckets.len());
                    partition.buckets.push(Bucket {
                        key: GroupKey::Real(group_id.clone()),
                        members: vec![item],
                    });
                }
            },
            None => partition.buckets.push(Bucket {
                key: GroupKey::Individual {
                    position,
                    line: item.id,
                    record: item.uuid,
                },
                members: vec![item],
            }),
        }
    }

    partition
}

/// Describe `item`'s group membership within `partition`.
///
/// Representative status is decided by [`LineId`], not by reference.
pub fn describe_group(item: &LineItem, partition: &GroupPartition<'_>) -> GroupInfo {
    let Some(group_id) = &item.group_id else {
        return GroupInfo::standalone();
    };

    let members = partition.members(group_id);
    let group_size = members.len().max(1);
    let is_first_in_group = members.first().is_none_or(|first| first.id == item.id);

    GroupInfo {
        is_group: group_size > 1,
        group_size,
        is_first_in_group,
        group_id: Some(group_id.clone()),
    }
}

/// 1-based ordinal of `item` among the displayed rows of `all_items`.
///
/// Displayed rows are standalone items and group representatives. Returns
/// `None` when `item` is not itself a displayed row.
pub fn display_number(
    item: &LineItem,
    all_items: &[LineItem],
    partition: &GroupPartition<'_>,
) -> Option<usize> {
    all_items
        .iter()
        .filter(|candidate| describe_group(candidate, partition).is_first_in_group)
        .position(|candidate| candidate.id == item.id)
        .map(|index| index + 1)
}
