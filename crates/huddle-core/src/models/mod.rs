//! Data models for huddle entities.
//!
//! This module contains the data structures exchanged with the backend:
//!
//! - `Group`, `GroupFields`: collaboration groups and their editable fields
//! - `UserProfile`, `Registration`: user records and sign-up input
//! - `Activity`: entries in the user's recent-activity feed

pub mod activity;
pub mod group;
pub mod user;

pub use activity::Activity;
pub use group::{Group, GroupFields};
pub use user::{Registration, UserProfile};
