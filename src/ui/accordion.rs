// SPDX-License-Identifier: MIT

//! Accordion expand/collapse state.

/// Per-panel open/closed state for `len` accordion panels.
///
/// Panels toggle independently; opening one never closes another, and
/// toggling an open panel closes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accordion {
    open: Vec<bool>,
}

impl Accordion {
    /// An accordion set with all panels collapsed.
    pub fn new(len: usize) -> Self {
        Self {
            open: vec![false; len],
        }
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open.get(index).copied().unwrap_or(false)
    }

    /// Indices of the currently open panels, in order.
    pub fn open_panels(&self) -> Vec<usize> {
        self.open
            .iter()
            .enumerate()
            .filter_map(|(i, open)| open.then_some(i))
            .collect()
    }

    /// Toggle panel `index`; out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        if let Some(open) = self.open.get_mut(index) {
            *open = !*open;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_collapsed() {
        let a = Accordion::new(3);
        assert_eq!(a.open_panels(), Vec::<usize>::new());
    }

    #[test]
    fn test_toggle_opens_then_closes() {
        let mut a = Accordion::new(3);
        a.toggle(1);
        assert!(a.is_open(1));
        a.toggle(1);
        assert!(!a.is_open(1));
    }

    #[test]
    fn test_panels_toggle_independently() {
        let mut a = Accordion::new(3);
        a.toggle(0);
        a.toggle(2);
        assert!(a.is_open(0));
        assert!(a.is_open(2));
        assert_eq!(a.open_panels(), vec![0, 2]);

        // Closing one leaves the other open.
        a.toggle(0);
        assert!(!a.is_open(0));
        assert!(a.is_open(2));
    }

    #[test]
    fn test_out_of_range_ignored() {
        let mut a = Accordion::new(2);
        a.toggle(5);
        assert_eq!(a.open_panels(), Vec::<usize>::new());
    }
}
