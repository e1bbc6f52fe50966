//! Translation of an edited line-item list into backing-store writes.

use std::collections::HashSet;

use serde::Serialize;

use depot_core::RecordId;

use crate::line_item::LineItem;

/// Store writes needed to persist an edited list.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ChangeSet {
    /// Items without a backing row yet, in list order.
    pub inserts: Vec<LineItem>,
    /// Items whose backing row exists, in list order.
    pub updates: Vec<LineItem>,
    /// Backing rows no longer present in the list, in load order.
    pub deletes: Vec<RecordId>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

/// Plan the writes that turn `persisted` rows into `current`.
///
/// An item is an insert when it is new, has no record id, or names a record
/// that was never loaded.
pub fn plan_changes(persisted: &[RecordId], current: &[LineItem]) -> ChangeSet {
    let loaded: HashSet<RecordId> = persisted.iter().copied().collect();
    let mut kept = HashSet::with_capacity(current.len());
    let mut plan = ChangeSet::default();

    for item in current {
        match item.uuid {
            Some(record) if !item.is_new && loaded.contains(&record) => {
                kept.insert(record);
                plan.updates.push(item.clone());
            }
            _ => plan.inserts.push(item.clone()),
        }
    }

    plan.deletes = persisted
        .iter()
        .filter(|record| !kept.contains(*record))
        .copied()
        .collect();

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::{GroupId, ItemAttributes, LineId};

    fn row(id: u64, record: RecordId) -> LineItem {
        LineItem::persisted(LineId::new(id), record, None, ItemAttributes::default())
    }

    #[test]
    fn unchanged_list_is_all_updates() {
        let records = vec![RecordId::new(), RecordId::new()];
        let items = vec![row(1, records[0]), row(2, records[1])];

        let plan = plan_changes(&records, &items);
        assert_eq!(plan.updates, items);
        assert!(plan.inserts.is_empty());
        assert!(plan.deletes.is_empty());
    }

    #[test]
    fn removed_rows_become_deletes_and_new_items_inserts() {
        let records = vec![RecordId::new(), RecordId::new(), RecordId::new()];
        let fresh = LineItem::new(LineId::new(9), ItemAttributes::default());
        let items = vec![row(2, records[1]), fresh.clone()];

        let plan = plan_changes(&records, &items);
        assert_eq!(plan.inserts, vec![fresh]);
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.deletes, vec![records[0], records[2]]);
    }

    #[test]
    fn grouped_original_row_stays_an_update() {
        let record = RecordId::new();
        let group = GroupId::generate();
        let original = row(1, record).with_group(Some(group.clone()));
        let sibling = original.templated(LineId::new(2), Some(group));

        let plan = plan_changes(&[record], &[original.clone(), sibling.clone()]);
        assert_eq!(plan.updates, vec![original]);
        assert_eq!(plan.inserts, vec![sibling]);
        assert!(plan.deletes.is_empty());
    }

    #[test]
    fn unknown_record_is_inserted() {
        let stray = row(1, RecordId::new());
        let plan = plan_changes(&[], &[stray.clone()]);
        assert_eq!(plan.inserts, vec![stray]);
        assert!(!plan.is_empty());
    }
}
