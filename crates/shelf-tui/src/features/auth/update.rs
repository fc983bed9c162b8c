//! Auth feature reducer.
//!
//! Turns login, registration, user-lookup and reset results into effects and
//! toasts.

use shelf_core::api::ApiError;
use shelf_core::auth::{Registration, RememberPolicy, TokenPair, User};
use tracing::{debug, warn};

use super::AuthState;
use crate::common::{RequestId, TaskSeq};
use crate::effects::UiEffect;
use crate::mutations::StateMutation;

pub fn handle_login_finished(
    result: Result<TokenPair, ApiError>,
    remember: RememberPolicy,
) -> (Vec<UiEffect>, Vec<StateMutation>) {
    match result {
        Ok(tokens) => (
            vec![UiEffect::SaveSession { tokens, remember }],
            vec![StateMutation::success("You're signed in!")],
        ),
        Err(err) => {
            warn!(kind = %err.kind, "login failed: {err}");
            (
                vec![],
                vec![StateMutation::error(
                    err.message_or("Login failed. Try again!"),
                )],
            )
        }
    }
}

/// A successful registration logs in with the same email and password.
pub fn handle_register_finished(
    task_seq: &mut TaskSeq,
    result: Result<User, ApiError>,
    registration: &Registration,
    remember: RememberPolicy,
) -> (Vec<UiEffect>, Vec<StateMutation>) {
    match result {
        Ok(user) => {
            debug!(user_id = user.id, "registered");
            (
                vec![UiEffect::Login {
                    task: task_seq.next_id(),
                    credentials: registration.credentials(),
                    remember,
                }],
                vec![StateMutation::success("Account created! Logging you in...")],
            )
        }
        Err(err) => {
            warn!(kind = %err.kind, "registration failed: {err}");
            (
                vec![],
                vec![StateMutation::error(err.message_or("Registration failed."))],
            )
        }
    }
}

pub fn handle_user_loaded(
    auth: &mut AuthState,
    req: RequestId,
    result: Result<User, ApiError>,
) -> Vec<StateMutation> {
    if !auth.user_req.finish_if_active(req) {
        return vec![];
    }
    match result {
        Ok(user) => {
            auth.user = Some(user);
            vec![]
        }
        Err(err) => {
            warn!("fetching current user failed: {err}");
            vec![StateMutation::error("Failed to fetch user info")]
        }
    }
}

pub fn handle_password_reset_finished(result: Result<(), ApiError>) -> Vec<StateMutation> {
    match result {
        Ok(()) => vec![StateMutation::success("Check your email for a reset link!")],
        Err(err) => {
            warn!("password reset failed: {err}");
            vec![StateMutation::error("Couldn't send reset email.")]
        }
    }
}
