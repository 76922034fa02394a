//! Core library for huddle - a small group-collaboration app.
//!
//! This crate is the app's backend client. It owns the session credential,
//! attaches it to outgoing requests, and transparently renews an expired
//! session: the first rejected request starts a single refresh call,
//! concurrent rejections wait on that same call, and each rejected request
//! is replayed at most once. Callers see either a decoded payload or a typed
//! [`ApiError`]; [`ApiError::SessionExpired`] means the session is dead and
//! the user has to sign in again.
//!
//! UI concerns (screens, navigation, form rendering) live in the app layer;
//! it calls into this crate and reacts to the outcomes.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::Session;
pub use config::ClientConfig;
pub use models::{Activity, Group, GroupFields, Registration, UserProfile};
