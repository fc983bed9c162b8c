//! Shared TUI plumbing: task lifecycle, latest-only request ids, text helpers.

mod field;
mod request_id;
mod task;
mod text;

pub use field::TextField;
pub use request_id::{LatestOnly, RequestId};
pub use task::{TaskCompleted, TaskId, TaskKind, TaskSeq, TaskStarted, TaskState, Tasks};
pub use text::{format_price, truncate_start_with_ellipsis, truncate_with_ellipsis};
