// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod identity;
pub mod members;
pub mod observer;

pub use identity::{IdentityService, Principal};
