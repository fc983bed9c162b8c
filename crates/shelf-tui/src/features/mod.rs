//! Feature slices: each owns its state, reducer helpers, and render code.

pub mod auth;
pub mod catalog;
pub mod toast;
