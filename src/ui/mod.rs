// SPDX-License-Identifier: MIT

//! Widget state models.
//!
//! The interactive widgets on the site (sidebar sections, tabs, sliders,
//! accordions, theme toggle, field validation) all reduce to small
//! synchronous state machines. They are modeled here free of any view
//! concern so the pages can bind them declaratively.

pub mod accordion;
pub mod selection;
pub mod slider;
pub mod theme;
pub mod validate;

pub use accordion::Accordion;
pub use selection::Selection;
pub use slider::Slider;
pub use theme::{Theme, ThemePreference};
