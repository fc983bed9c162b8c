//! Authentication feature: session status, the login/register form, and the
//! handlers for login, registration, refresh, and password-reset results.

mod form;
mod render;
mod update;

use shelf_core::auth::{Tier, User};

pub use form::{FormAction, LoginField, LoginForm};
pub use render::{render_login, render_splash};
pub use update::{
    handle_login_finished, handle_password_reset_finished, handle_register_finished,
    handle_user_loaded,
};

use crate::common::LatestOnly;

/// What the UI knows about the current session. The tokens themselves stay in
/// the runtime's session store.
#[derive(Debug, Default)]
pub struct AuthState {
    /// Tier holding the access token, `None` when logged out.
    pub tier: Option<Tier>,
    pub user: Option<User>,
    /// Latest `/auth/me` request; older answers are dropped.
    pub user_req: LatestOnly,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.tier.is_some()
    }

    /// Forgets the user and any pending lookup.
    pub fn sign_out(&mut self) {
        self.tier = None;
        self.user = None;
        self.user_req.cancel();
    }
}
