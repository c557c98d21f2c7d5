// SPDX-License-Identifier: MIT

//! Circular slider index (testimonials).

/// Circular index over `len` slides, wrapping in both directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slider {
    len: usize,
    current: usize,
}

impl Slider {
    /// A slider over `len` slides starting at index 0.
    ///
    /// Panics if `len == 0`.
    pub fn new(len: usize) -> Self {
        assert!(len > 0, "slider over zero slides");
        Self { len, current: 0 }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Advance to the next slide, wrapping past the end.
    pub fn next(&mut self) -> usize {
        self.current = (self.current + 1) % self.len;
        self.current
    }

    /// Go back one slide, wrapping before the start.
    pub fn prev(&mut self) -> usize {
        self.current = (self.current + self.len - 1) % self.len;
        self.current
    }
}
