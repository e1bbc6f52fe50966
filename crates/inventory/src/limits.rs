//! Size limits applied by the editing session.

use serde::{Deserialize, Serialize};

use depot_core::{DomainError, DomainResult};

pub const DEFAULT_MAX_GROUP_SIZE: usize = 1000;
pub const DEFAULT_MAX_DUPLICATE_COUNT: usize = 100;

/// Upper bounds on how many units a single edit may create.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryLimits {
    pub max_group_size: usize,
    pub max_duplicate_count: usize,
}

impl Default for InventoryLimits {
    fn default() -> Self {
        Self {
            max_group_size: DEFAULT_MAX_GROUP_SIZE,
            max_duplicate_count: DEFAULT_MAX_DUPLICATE_COUNT,
        }
    }
}

impl InventoryLimits {
    /// Read `DEPOT_MAX_GROUP_SIZE` and `DEPOT_MAX_DUPLICATE_COUNT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_group_size: read_limit(&lookup, "DEPOT_MAX_GROUP_SIZE", defaults.max_group_size),
            max_duplicate_count: read_limit(
                &lookup,
                "DEPOT_MAX_DUPLICATE_COUNT",
                defaults.max_duplicate_count,
            ),
        }
    }

    pub fn check_group_size(&self, size: usize) -> DomainResult<()> {
        if size > self.max_group_size {
            return Err(DomainError::validation(format!(
                "group size {size} exceeds the limit of {}",
                self.max_group_size
            )));
        }
        Ok(())
    }

    pub fn check_duplicate_count(&self, count: usize) -> DomainResult<()> {
        if count > self.max_duplicate_count {
            return Err(DomainError::validation(format!(
                "duplicate count {count} exceeds the limit of {}",
                self.max_duplicate_count
            )));
        }
        Ok(())
    }
}

fn read_limit(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> usize {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => value,
        _ => {
            tracing::warn!(key, value = %raw, default, "invalid limit; using default");
            default
        }
    }
}
