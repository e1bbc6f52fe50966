//! Read-only projections for list rendering.

use serde::{Deserialize, Serialize};

use super::partition::{describe_group, partition_by_group};
use crate::line_item::LineItem;

/// How line items are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Every item, including every group member, is its own row.
    #[default]
    Flat,
    /// One row per group (its representative) plus every standalone item.
    Grouped,
}

/// Items visible under `mode`, in list order.
pub fn visible_items(items: &[LineItem], mode: DisplayMode) -> Vec<&LineItem> {
    match mode {
        DisplayMode::Flat => items.iter().collect(),
        DisplayMode::Grouped => {
            let partition = partition_by_group(items);
            items
                .iter()
                .filter(|item| describe_group(item, &partition).is_first_in_group)
                .collect()
        }
    }
}
