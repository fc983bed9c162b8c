//! Authentication: the HTTP gateway, the two-tier session store, and the route guard.

pub mod gateway;
pub mod guard;
pub mod session;

pub use gateway::{AuthGateway, Credentials, Registration, User};
pub use guard::{Route, guard};
pub use session::{
    ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, RememberPolicy, SessionStore, Tier, TokenPair,
};
