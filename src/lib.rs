// SPDX-License-Identifier: MIT

//! GymHub: membership site backend.
//!
//! This crate provides the session/role gate, the collection-to-table
//! rendering pipeline, and the member mutation flows for the GymHub
//! membership site. Authentication and document storage are delegated
//! to the identity provider and Firestore.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod render;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod ui;

use config::Config;
use db::FirestoreDb;
use services::IdentityService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub identity: IdentityService,
}
