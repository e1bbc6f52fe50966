//! Inventory line-item grouping.
//!
//! This crate contains the rules for grouping, resizing, and duplicating the
//! line items of an inventory record, implemented as deterministic domain
//! logic (no IO, no HTTP, no storage). [`InventoryDraft`] is the stateful
//! editing session that owns a snapshot and its id cursor.

pub mod changeset;
pub mod grouping;
pub mod limits;
pub mod line_item;
pub mod session;

pub use changeset::{ChangeSet, plan_changes};
pub use grouping::{
    DisplayMode, GroupInfo, GroupKey, GroupPartition, create_group_from_item, describe_group,
    display_number, duplicate_group, duplicate_item, duplicate_selected, partition_by_group,
    remove_group, resize_group, ungroup, visible_items,
};
pub use limits::InventoryLimits;
pub use line_item::{GroupId, ItemAttributes, LineId, LineItem, NextId};
pub use session::{InventoryDraft, StoredLine};
