//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O and task spawning only (no direct UI mutations).
//!
//! Cancellation is initiated from the reducer via `UiEffect::CancelTask`; the
//! runtime calls `cancel()` on the token.

use shelf_core::auth::{Credentials, Registration, RememberPolicy, TokenPair};
use shelf_core::catalog::{FetchKey, SortSpec};
use tokio_util::sync::CancellationToken;

use crate::common::{RequestId, TaskId};

#[derive(Debug)]
pub enum UiEffect {
    Quit,

    /// Fetch one page of products; the result arrives as `ProductsLoaded`.
    FetchProducts { key: FetchKey },

    Login {
        task: TaskId,
        credentials: Credentials,
        remember: RememberPolicy,
    },
    Register {
        task: TaskId,
        registration: Registration,
        remember: RememberPolicy,
    },
    /// Exchange the stored refresh token for a new pair.
    SilentRefresh { task: TaskId },
    FetchUser { req: RequestId },
    ResetPassword { task: TaskId, email: String },

    SaveSession {
        tokens: TokenPair,
        remember: RememberPolicy,
    },
    /// Write a refreshed pair back into the tier that held the refresh token.
    SaveRefreshedSession { tokens: TokenPair },
    ClearSession,

    PersistSort { spec: SortSpec },

    CancelTask { token: Option<CancellationToken> },
}
