//! Application state composition.
//!
//! ```text
//! AppState
//! ├── tui: TuiState
//! │   ├── route: Route            (screen being shown)
//! │   ├── auth: AuthState         (session tier, current user)
//! │   ├── login: LoginForm        (login/register form)
//! │   ├── catalog: CatalogState   (products table)
//! │   ├── toasts: Toasts
//! │   ├── task_seq / tasks        (async task lifecycle)
//! └── overlay: Option<Overlay>    (modal overlays)
//! ```
//!
//! State is split so overlay handlers can get `&mut Overlay` while the reducer
//! still holds `&mut TuiState`.

use shelf_core::Config;
use shelf_core::auth::Route;
use shelf_core::catalog::{ListViewOptions, SortSpec};

use crate::common::{TaskSeq, Tasks};
use crate::features::auth::{AuthState, LoginForm};
use crate::features::catalog::CatalogState;
use crate::features::toast::Toasts;
use crate::overlays::Overlay;

pub struct AppState {
    pub tui: TuiState,
    pub overlay: Option<Overlay>,
}

impl AppState {
    pub fn new(options: ListViewOptions, sort: SortSpec) -> Self {
        Self {
            tui: TuiState::new(options, sort),
            overlay: None,
        }
    }

    pub fn from_config(config: &Config, sort: SortSpec) -> Self {
        Self::new(ListViewOptions::from_config(config), sort)
    }
}

pub struct TuiState {
    pub should_quit: bool,
    /// Screen being shown. Meaningless while `booting`.
    pub route: Route,
    /// True until the startup session check finishes.
    pub booting: bool,
    /// Route asked for at startup, resolved once booting ends.
    pub pending_route: Option<Route>,
    pub auth: AuthState,
    pub login: LoginForm,
    pub catalog: CatalogState,
    pub toasts: Toasts,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    pub spinner_frame: usize,
    pub viewport: (u16, u16),
}

impl TuiState {
    pub fn new(options: ListViewOptions, sort: SortSpec) -> Self {
        Self {
            should_quit: false,
            route: Route::login(),
            booting: true,
            pending_route: None,
            auth: AuthState::default(),
            login: LoginForm::default(),
            catalog: CatalogState::new(options, sort),
            toasts: Toasts::default(),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            spinner_frame: 0,
            viewport: (0, 0),
        }
    }
}
