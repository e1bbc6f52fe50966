//! Editing session for the line items of one inventory record.
//!
//! The grouping engine is pure; [`InventoryDraft`] is the stateful owner it
//! expects. It holds the current snapshot and the [`NextId`] cursor, and
//! `&mut self` serializes every mutation so the cursor is never read stale.

use serde::{Deserialize, Serialize};

use depot_core::{DomainError, DomainResult, InventoryId, RecordId, entity::first_duplicate_id};

use crate::changeset::{ChangeSet, plan_changes};
use crate::grouping::{self, DisplayMode, GroupInfo};
use crate::limits::InventoryLimits;
use crate::line_item::{GroupId, ItemAttributes, LineId, LineItem, NextId};

/// A line item as loaded from the backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLine {
    pub uuid: RecordId,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(flatten)]
    pub attributes: ItemAttributes,
}

/// In-memory working copy of an inventory record's line items.
#[derive(Debug, Clone)]
pub struct InventoryDraft {
    inventory_id: InventoryId,
    items: Vec<LineItem>,
    next_id: NextId,
    persisted: Vec<RecordId>,
    limits: InventoryLimits,
}

impl InventoryDraft {
    /// An empty draft for a record that has no stored lines yet.
    pub fn new(inventory_id: InventoryId, limits: InventoryLimits) -> Self {
        Self {
            inventory_id,
            items: Vec::new(),
            next_id: NextId::default(),
            persisted: Vec::new(),
            limits,
        }
    }

    /// Start editing previously stored lines, in stored order.
    pub fn load(inventory_id: InventoryId, rows: Vec<StoredLine>, limits: InventoryLimits) -> Self {
        let mut cursor = NextId::default();
        let persisted = rows.iter().map(|row| row.uuid).collect();
        let items = rows
            .into_iter()
            .map(|row| {
                let group_id = row.group_id.as_deref().and_then(GroupId::parse);
                LineItem::persisted(cursor.take(), row.uuid, group_id, row.attributes)
            })
            .collect::<Vec<_>>();

        tracing::debug!(%inventory_id, lines = items.len(), "loaded inventory draft");

        Self {
            inventory_id,
            items,
            next_id: cursor,
            persisted,
            limits,
        }
    }

    pub fn inventory_id(&self) -> InventoryId {
        self.inventory_id
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn next_id(&self) -> NextId {
        self.next_id
    }

    pub fn limits(&self) -> &InventoryLimits {
        &self.limits
    }

    pub fn get(&self, id: LineId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn position(&self, id: LineId) -> DomainResult<usize> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| DomainError::not_found(format!("line item {id}")))
    }

    fn commit(&mut self, items: Vec<LineItem>, next_id: NextId) {
        if cfg!(debug_assertions) {
            let duplicate = first_duplicate_id(&items);
            assert!(duplicate.is_none(), "line id handed out twice: {duplicate:?}");
        }
        debug_assert!(next_id >= self.next_id, "id cursor moved backwards");
        self.items = items;
        self.next_id = next_id;
    }

    /// Append a fresh, unsaved item.
    pub fn add_item(&mut self, attributes: ItemAttributes) -> LineId {
        let mut cursor = self.next_id;
        let id = cursor.take();
        let mut items = self.items.clone();
        items.push(LineItem::new(id, attributes));
        self.commit(items, cursor);

        tracing::debug!(inventory_id = %self.inventory_id, line = %id, "added line item");
        id
    }

    /// Delete a single item. Other members of its group are left in place.
    pub fn remove_item(&mut self, id: LineId) -> DomainResult<LineItem> {
        let position = self.position(id)?;
        let mut items = self.items.clone();
        let removed = items.remove(position);
        self.commit(items, self.next_id);

        tracing::debug!(inventory_id = %self.inventory_id, line = %id, "removed line item");
        Ok(removed)
    }

    /// Replace an item's attributes; on a grouped item the edit applies to
    /// every member of the group. Returns the number of items changed.
    pub fn update_item(&mut self, id: LineId, attributes: ItemAttributes) -> DomainResult<usize> {
        let position = self.position(id)?;
        let target = self.items[position].group_id.clone();

        let mut touched = 0;
        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let same_group = target.as_ref().is_some_and(|group| item.in_group(group));
                if index == position || same_group {
                    touched += 1;
                    LineItem {
                        attributes: attributes.clone(),
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        self.commit(items, self.next_id);

        tracing::debug!(inventory_id = %self.inventory_id, line = %id, touched, "updated line item");
        Ok(touched)
    }

    /// Replace a standalone item, in place, by a new group of `size` members.
    pub fn group_item(&mut self, id: LineId, size: usize) -> DomainResult<GroupId> {
        self.limits.check_group_size(size)?;
        let position = self.position(id)?;

        let already_grouped = {
            let partition = grouping::partition_by_group(&self.items);
            grouping::describe_group(&self.items[position], &partition).is_group
        };
        if already_grouped {
            return Err(DomainError::validation(format!(
                "line item {id} already belongs to a group"
            )));
        }

        let (members, cursor) =
            grouping::create_group_from_item(&self.items[position], size, self.next_id)?;
        let group_id = members[0]
            .group_id
            .clone()
            .ok_or_else(|| DomainError::invariant("created group has no group id"))?;

        let mut items = self.items.clone();
        items.splice(position..=position, members);
        self.commit(items, cursor);

        tracing::debug!(
            inventory_id = %self.inventory_id,
            line = %id,
            group = %group_id,
            size,
            "grouped line item"
        );
        Ok(group_id)
    }

    /// Set the member count of a group. Unknown groups are left untouched.
    pub fn resize_group(&mut self, group_id: &GroupId, new_size: usize) -> DomainResult<()> {
        self.limits.check_group_size(new_size)?;
        if !self.has_group(group_id) {
            tracing::warn!(inventory_id = %self.inventory_id, group = %group_id, "resize of unknown group ignored");
            return Ok(());
        }

        let (items, cursor) =
            grouping::resize_group(group_id, new_size, &self.items, self.next_id)?;
        self.commit(items, cursor);

        tracing::debug!(inventory_id = %self.inventory_id, group = %group_id, new_size, "resized group");
        Ok(())
    }

    /// Delete every member of a group. Returns how many items were removed.
    pub fn remove_group(&mut self, group_id: &GroupId) -> usize {
        let before = self.items.len();
        let items = grouping::remove_group(group_id, &self.items);
        let removed = before - items.len();
        if removed == 0 {
            tracing::warn!(inventory_id = %self.inventory_id, group = %group_id, "removal of unknown group ignored");
            return 0;
        }
        self.commit(items, self.next_id);

        tracing::debug!(inventory_id = %self.inventory_id, group = %group_id, removed, "removed group");
        removed
    }

    /// Dissolve a group into standalone items. Returns how many were released.
    pub fn ungroup(&mut self, group_id: &GroupId) -> usize {
        let released = self.items.iter().filter(|item| item.in_group(group_id)).count();
        if released == 0 {
            tracing::warn!(inventory_id = %self.inventory_id, group = %group_id, "ungroup of unknown group ignored");
            return 0;
        }
        let items = grouping::ungroup(group_id, &self.items);
        self.commit(items, self.next_id);

        tracing::debug!(inventory_id = %self.inventory_id, group = %group_id, released, "ungrouped");
        released
    }

    /// Duplicate the selected item (or its whole group) `count` times and
    /// append the copies. Returns the new items' ids.
    pub fn duplicate(&mut self, id: LineId, count: usize) -> DomainResult<Vec<LineId>> {
        self.limits.check_duplicate_count(count)?;
        let position = self.position(id)?;

        let (copies, cursor) =
            grouping::duplicate_selected(&self.items[position], &self.items, count, self.next_id)?;
        let ids: Vec<LineId> = copies.iter().map(|copy| copy.id).collect();

        let mut items = self.items.clone();
        items.extend(copies);
        self.commit(items, cursor);

        tracing::debug!(
            inventory_id = %self.inventory_id,
            line = %id,
            count,
            created = ids.len(),
            "duplicated line item"
        );
        Ok(ids)
    }

    fn has_group(&self, group_id: &GroupId) -> bool {
        self.items.iter().any(|item| item.in_group(group_id))
    }

    pub fn visible(&self, mode: DisplayMode) -> Vec<&LineItem> {
        grouping::visible_items(&self.items, mode)
    }

    pub fn describe(&self, id: LineId) -> DomainResult<GroupInfo> {
        let position = self.position(id)?;
        let partition = grouping::partition_by_group(&self.items);
        Ok(grouping::describe_group(&self.items[position], &partition))
    }

    /// Human-facing row number ("Item 3") of a displayed row.
    pub fn display_number(&self, id: LineId) -> Option<usize> {
        let item = self.get(id)?;
        let partition = grouping::partition_by_group(&self.items);
        grouping::display_number(item, &self.items, &partition)
    }

    /// Store writes that would persist the current snapshot.
    pub fn change_plan(&self) -> ChangeSet {
        plan_changes(&self.persisted, &self.items)
    }
}
