//! Auth and session handlers.
//!
//! Network calls are async and return the finished event. Session writes are
//! synchronous; they touch the storage tiers and report the resulting tier.

use std::future::Future;
use std::time::Duration;

use shelf_core::api::{ApiError, ApiErrorKind, ApiResult};
use shelf_core::auth::{
    AuthGateway, Credentials, Registration, RememberPolicy, SessionStore, TokenPair,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::common::RequestId;
use crate::events::UiEvent;

/// Simulated latency of the password reset request.
const RESET_DELAY: Duration = Duration::from_secs(1);

async fn with_cancel<T>(
    cancel: Option<CancellationToken>,
    fut: impl Future<Output = ApiResult<T>>,
) -> ApiResult<T> {
    let Some(token) = cancel else {
        return fut.await;
    };
    tokio::select! {
        biased;
        () = token.cancelled() => Err(ApiError::new(ApiErrorKind::Transport, "Cancelled")),
        result = fut => result,
    }
}

pub async fn login(
    gateway: AuthGateway,
    credentials: Credentials,
    remember: RememberPolicy,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    let result = with_cancel(cancel, gateway.login(&credentials)).await;
    UiEvent::LoginFinished { result, remember }
}

pub async fn register(
    gateway: AuthGateway,
    registration: Registration,
    remember: RememberPolicy,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    let result = with_cancel(cancel, gateway.register(&registration)).await;
    UiEvent::RegisterFinished {
        result,
        registration,
        remember,
    }
}

/// Exchanges the stored refresh token for a new pair.
pub async fn silent_refresh(gateway: AuthGateway, session: SessionStore) -> UiEvent {
    let result = match session.refresh_token() {
        Ok(Some((token, tier))) => {
            debug!(tier = ?tier, "attempting silent refresh");
            gateway.refresh(&token).await
        }
        Ok(None) => Err(ApiError::missing_credential("No refresh token stored")),
        Err(err) => Err(ApiError::missing_credential(format!(
            "Failed to read session: {err:#}"
        ))),
    };
    UiEvent::SilentRefreshFinished { result }
}

pub async fn fetch_user(gateway: AuthGateway, session: SessionStore, req: RequestId) -> UiEvent {
    let result = match session.access_token() {
        Ok(Some(token)) => gateway.me(&token).await,
        Ok(None) => Err(ApiError::missing_credential("Not signed in")),
        Err(err) => Err(ApiError::missing_credential(format!(
            "Failed to read session: {err:#}"
        ))),
    };
    UiEvent::UserLoaded { req, result }
}

/// No reset endpoint exists upstream; this only waits so the form shows its
/// busy state before confirming.
pub async fn reset_password(email: String, cancel: Option<CancellationToken>) -> UiEvent {
    debug!(len = email.len(), "password reset requested");
    let result = with_cancel(cancel, async {
        tokio::time::sleep(RESET_DELAY).await;
        Ok(())
    })
    .await;
    UiEvent::PasswordResetFinished { result }
}

pub fn save_session(session: &SessionStore, tokens: &TokenPair, remember: RememberPolicy) -> UiEvent {
    match session.save(tokens, remember) {
        Ok(()) => UiEvent::SessionChanged {
            tier: session.active_tier(),
        },
        Err(err) => {
            warn!("Failed to save session: {err:#}");
            UiEvent::SessionWriteFailed {
                error: format!("{err:#}"),
            }
        }
    }
}

pub fn save_refreshed_session(session: &SessionStore, tokens: &TokenPair) -> UiEvent {
    match session.save_refreshed(tokens) {
        Ok(Some(tier)) => UiEvent::SessionChanged { tier: Some(tier) },
        Ok(None) => UiEvent::SessionChanged {
            tier: session.active_tier(),
        },
        Err(err) => {
            warn!("Failed to store refreshed session: {err:#}");
            UiEvent::SessionChanged {
                tier: session.active_tier(),
            }
        }
    }
}

pub fn clear_session(session: &SessionStore) -> UiEvent {
    if let Err(err) = session.clear() {
        warn!("Failed to clear session: {err:#}");
    }
    UiEvent::SessionChanged {
        tier: session.active_tier(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shelf_core::auth::Tier;
    use shelf_core::storage::MemoryStorage;

    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(MemoryStorage::new()), Arc::new(MemoryStorage::new()))
    }

    fn tokens(access: &str) -> TokenPair {
        TokenPair {
            access_token: access.to_string(),
            refresh_token: format!("{access}-refresh"),
        }
    }

    #[test]
    fn test_save_session_reports_tier() {
        let session = store();
        let event = save_session(&session, &tokens("a"), RememberPolicy::Remember);
        assert!(matches!(
            event,
            UiEvent::SessionChanged {
                tier: Some(Tier::Persistent)
            }
        ));

        let event = save_session(&session, &tokens("b"), RememberPolicy::ThisSession);
        assert!(matches!(
            event,
            UiEvent::SessionChanged {
                tier: Some(Tier::Tab)
            }
        ));
    }

    #[test]
    fn test_save_refreshed_keeps_tier() {
        let session = store();
        save_session(&session, &tokens("a"), RememberPolicy::ThisSession);
        let event = save_refreshed_session(&session, &tokens("b"));
        assert!(matches!(
            event,
            UiEvent::SessionChanged {
                tier: Some(Tier::Tab)
            }
        ));
        assert_eq!(session.access_token().unwrap().as_deref(), Some("b"));
    }

    #[test]
    fn test_clear_session_logs_out() {
        let session = store();
        save_session(&session, &tokens("a"), RememberPolicy::Remember);
        let event = clear_session(&session);
        assert!(matches!(event, UiEvent::SessionChanged { tier: None }));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_silent_refresh_without_token() {
        let api = shelf_core::api::ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1))
            .unwrap();
        let event = silent_refresh(AuthGateway::new(api, 30), store()).await;
        let UiEvent::SilentRefreshFinished { result: Err(err) } = event else {
            panic!("expected failed refresh");
        };
        assert_eq!(err.kind, ApiErrorKind::MissingCredential);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_password_completes() {
        let event = reset_password("a@b.co".to_string(), None).await;
        assert!(matches!(
            event,
            UiEvent::PasswordResetFinished { result: Ok(()) }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_password_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let event = reset_password("a@b.co".to_string(), Some(token)).await;
        let UiEvent::PasswordResetFinished { result: Err(err) } = event else {
            panic!("expected cancellation");
        };
        assert_eq!(err.message, "Cancelled");
    }
}
