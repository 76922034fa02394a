//! REST API client module for the huddle backend.
//!
//! This module provides the `ApiClient` for every backend operation the app
//! performs: session authentication, group CRUD and membership, and the
//! activity feed.
//!
//! The backend uses short-lived JWT bearer tokens minted at login and
//! renewed through a cookie-held refresh credential.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
