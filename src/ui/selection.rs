// SPDX-License-Identifier: MIT

//! Exactly-one-active selection among N items.
//!
//! Backs the sidebar section switch, navigation tabs, and the pricing
//! period toggle: exactly one active item at a time, transitions direct
//! and idempotent.

/// Tagged selection state over `len` items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    len: usize,
    active: usize,
}

impl Selection {
    /// A selection over `len` items with item 0 active.
    ///
    /// Panics if `len == 0`; an empty widget set has no selection state.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "selection over zero items");
        Self { len, active: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: [`Selection::new`] rejects `len == 0`, so a selection
    /// holds at least one item for its whole lifetime.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Index of the single active item.
    pub fn active(&self) -> usize {
        self.active
    }

    /// Activate `index`, deactivating whatever was active.
    ///
    /// Re-selecting the active item is a no-op; out-of-range indices are
    /// ignored rather than corrupting the state.
    pub fn select(&mut self, index: usize) {
        if index < self.len {
            self.active = index;
        }
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active == index
    }
}
