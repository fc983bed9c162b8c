//! Effect handlers for the TUI runtime.
//!
//! These functions perform I/O. They never touch UI state: each returns the
//! `UiEvent` describing its outcome, and the runtime feeds that back through
//! the reducer. Async handlers are spawned by the runtime and deliver their
//! event through the inbox.

pub mod auth;
pub mod catalog;

pub use auth::*;
pub use catalog::*;
