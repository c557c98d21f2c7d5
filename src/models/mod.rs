// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod profile;
pub mod session;

pub use profile::{ProfileDocument, Role, UserType};
pub use session::SessionUser;
