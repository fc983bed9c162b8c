//! UI events consumed by the reducer.
//!
//! Terminal input, timer ticks, and the results of every async effect arrive
//! here. Async results are delivered through the runtime inbox.

use crossterm::event::Event;
use shelf_core::api::ApiError;
use shelf_core::auth::{Registration, RememberPolicy, Route, Tier, TokenPair, User};
use shelf_core::catalog::{FetchKey, ProductPage};

use crate::common::{RequestId, TaskCompleted, TaskKind, TaskStarted};

#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick; drives debounce, toast expiry, and rendering.
    Tick,
    Frame {
        width: u16,
        height: u16,
    },
    Terminal(Event),

    /// First event of a run. `tier` is where the stored access token lives;
    /// `has_refresh_token` tells the reducer whether a silent refresh is worth
    /// attempting before routing.
    Init {
        requested: Route,
        tier: Option<Tier>,
        has_refresh_token: bool,
    },

    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },

    /// Products fetch finished. Latest-only gating lives in the list view.
    ProductsLoaded {
        key: FetchKey,
        result: Result<ProductPage, ApiError>,
    },

    LoginFinished {
        result: Result<TokenPair, ApiError>,
        remember: RememberPolicy,
    },
    RegisterFinished {
        result: Result<User, ApiError>,
        registration: Registration,
        remember: RememberPolicy,
    },
    SilentRefreshFinished {
        result: Result<TokenPair, ApiError>,
    },
    UserLoaded {
        req: RequestId,
        result: Result<User, ApiError>,
    },
    PasswordResetFinished {
        result: Result<(), ApiError>,
    },

    /// The session store changed; `tier` is where tokens now live, if anywhere.
    SessionChanged {
        tier: Option<Tier>,
    },
    SessionWriteFailed {
        error: String,
    },
}
