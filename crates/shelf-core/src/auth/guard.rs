//! Route table and the authentication gate in front of protected routes.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/login`. `from` records the protected route the user was bounced from.
    Login { from: Option<Box<Route>> },
    /// `/` (protected)
    Products,
    /// Anything else.
    NotFound { path: String },
}

impl Route {
    pub fn login() -> Self {
        Route::Login { from: None }
    }

    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };
        match normalized {
            "" | "/" => Route::Products,
            "/login" => Route::login(),
            other => Route::NotFound {
                path: other.to_string(),
            },
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Login { .. } => "/login",
            Route::Products => "/",
            Route::NotFound { path } => path,
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Products)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Resolves the route actually shown for `requested`.
///
/// Protected routes require a session; without one the result is the login
/// route carrying the original request. Everything else passes through.
pub fn guard(requested: Route, authenticated: bool) -> Route {
    if requested.is_protected() && !authenticated {
        return Route::Login {
            from: Some(Box::new(requested)),
        };
    }
    requested
}
