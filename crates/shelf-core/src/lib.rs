//! Core library for shelf.
//!
//! Everything that is not rendering lives here: configuration, logging, the
//! HTTP clients for the catalog and auth endpoints, the session store and its
//! storage tiers, the route guard, form validation, and the list view-state
//! machine with its query cache.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod storage;
pub mod validation;

pub use config::Config;
