use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use depot_core::{CompanyId, DomainError, DomainResult, Entity, RecordId, ValueObject};

/// Most line items a single list can hold in memory.
pub const MAX_LINE_ITEMS: usize = isize::MAX as usize / core::mem::size_of::<LineItem>();

/// Process-local identity of a line item.
///
/// Stable across re-renders so the UI can tell which row is "the same" one;
/// never persisted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(u64);

impl LineId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for LineId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Cursor of the caller-owned [`LineId`] counter.
///
/// Operations that create items take the current cursor by value and return
/// the advanced one; the owner stores it back.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NextId(u64);

impl NextId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// First cursor strictly greater than every id in `items` (1 for an empty list).
    pub fn after(items: &[LineItem]) -> Self {
        let max = items.iter().map(|item| item.id.get()).max().unwrap_or(0);
        Self(max + 1)
    }

    /// The id the next [`take`](Self::take) will hand out.
    pub fn peek(self) -> LineId {
        LineId(self.0)
    }

    pub fn take(&mut self) -> LineId {
        let id = LineId(self.0);
        self.0 += 1;
        id
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Check that `count` more items can be created on top of a list of
    /// `existing` items, and return the resulting list length.
    ///
    /// Both the list length and this cursor's id space must have room.
    pub fn reserve(self, existing: usize, count: usize) -> DomainResult<usize> {
        let total = existing
            .checked_add(count)
            .filter(|total| *total <= MAX_LINE_ITEMS)
            .ok_or_else(|| {
                DomainError::validation(format!("cannot hold {count} more line items"))
            })?;
        u64::try_from(count)
            .ok()
            .and_then(|count| self.0.checked_add(count))
            .ok_or_else(|| DomainError::validation(format!("line ids exhausted after {}", self.0)))?;
        Ok(total)
    }
}

impl Default for NextId {
    fn default() -> Self {
        Self(1)
    }
}

/// Identifier shared by every member of a line-item group.
///
/// Never blank: a blank or empty stored value means "not grouped" and is
/// represented as `None` on [`LineItem::group_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// A fresh, globally unique group identifier (UUIDv7).
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Wrap a stored value verbatim; blank input is "not grouped".
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for GroupId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        GroupId::parse(&raw).ok_or_else(|| serde::de::Error::custom("group id cannot be blank"))
    }
}

/// Stored group columns are often `""` rather than `null`.
fn blank_group_as_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<GroupId>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(GroupId::parse))
}

/// Domain attributes of a line item.
///
/// Carried opaquely by the grouping engine and copied wholesale whenever a
/// unit is duplicated or a group grows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemAttributes {
    pub company_uuid: Option<CompanyId>,
    pub item_code: Option<String>,
    pub unit: Option<String>,
    pub unit_value: Option<f64>,
    pub packaging_unit: Option<String>,
    pub cost: Option<f64>,
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub status: Option<String>,
}

impl ValueObject for ItemAttributes {}

/// One inventory unit belonging to a parent inventory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineId,
    #[serde(default)]
    pub uuid: Option<RecordId>,
    #[serde(default, deserialize_with = "blank_group_as_none")]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub is_new: bool,
    #[serde(flatten)]
    pub attributes: ItemAttributes,
}

impl LineItem {
    /// A fresh, unsaved, ungrouped item.
    pub fn new(id: LineId, attributes: ItemAttributes) -> Self {
        Self {
            id,
            uuid: None,
            group_id: None,
            is_new: true,
            attributes,
        }
    }

    /// An item backed by a persisted row.
    pub fn persisted(
        id: LineId,
        uuid: RecordId,
        group_id: Option<GroupId>,
        attributes: ItemAttributes,
    ) -> Self {
        Self {
            id,
            uuid: Some(uuid),
            group_id,
            is_new: false,
            attributes,
        }
    }

    /// Builder-style group assignment.
    pub fn with_group(mut self, group_id: Option<GroupId>) -> Self {
        self.group_id = group_id;
        self
    }

    pub fn in_group(&self, group_id: &GroupId) -> bool {
        self.group_id.as_ref() == Some(group_id)
    }

    /// Unsaved copy of this item's attributes under a new id and group.
    pub fn templated(&self, id: LineId, group_id: Option<GroupId>) -> Self {
        Self {
            id,
            uuid: None,
            group_id,
            is_new: true,
            attributes: self.attributes.clone(),
        }
    }
}

impl Entity for LineItem {
    type Id = LineId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
