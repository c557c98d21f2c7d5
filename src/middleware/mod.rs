// SPDX-License-Identifier: MIT

//! Request middleware.

pub mod security;
pub mod session;
