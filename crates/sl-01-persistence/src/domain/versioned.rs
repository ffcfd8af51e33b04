//! Height-stamped value history.

use serde::{Deserialize, Serialize};
use shared_types::BlockHeight;
use std::collections::BTreeMap;

/// Every version of one value, keyed by the height it became effective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    versions: BTreeMap<BlockHeight, T>,
}

impl<T> Default for Versioned<T> {
    fn default() -> Self {
        Self {
            versions: BTreeMap::new(),
        }
    }
}

impl<T> Versioned<T> {
    /// Value in effect at `height`: the latest version at or before it.
    pub fn at(&self, height: BlockHeight) -> Option<&T> {
        self.versions
            .range(..=height)
            .next_back()
            .map(|(_, value)| value)
    }

    /// Height of the newest version, if any.
    pub fn latest_height(&self) -> Option<BlockHeight> {
        self.versions.keys().next_back().copied()
    }

    /// Record `value` as effective from `height`.
    ///
    /// Returns the version previously stored at exactly `height`. Callers
    /// must reject writes below [`Versioned::latest_height`] first; history
    /// is immutable.
    pub fn put(&mut self, height: BlockHeight, value: T) -> Option<T> {
        self.versions.insert(height, value)
    }

    /// Put back what [`Versioned::put`] replaced.
    pub fn restore(&mut self, height: BlockHeight, previous: Option<T>) {
        match previous {
            Some(value) => {
                self.versions.insert(height, value);
            }
            None => {
                self.versions.remove(&height);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
