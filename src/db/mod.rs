// SPDX-License-Identifier: MIT

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    // Declared by the site but served by 501 stubs for now.
    pub const PAYMENTS: &str = "payments";
    pub const CLASSES: &str = "classes";
    pub const MEMBERSHIP_PLANS: &str = "membership_plans";
    pub const TRAINERS: &str = "trainers";
    pub const CLASS_BOOKINGS: &str = "class_bookings";
}
