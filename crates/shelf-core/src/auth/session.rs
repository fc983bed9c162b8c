//! Access/refresh token storage across the persistent and tab-scoped tiers.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::{FileStorage, MemoryStorage, StorageTier};

pub const ACCESS_TOKEN_KEY: &str = "userToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

const TOKEN_KEYS: [&str; 2] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY];

/// Token pair as issued by `/auth/login` and `/auth/refresh`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Where a login stores its tokens ("remember me").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RememberPolicy {
    /// Persistent tier: survives restarts.
    Remember,
    /// Tab-scoped tier: gone when the process exits.
    ThisSession,
}

impl RememberPolicy {
    pub fn from_flag(remember: bool) -> Self {
        if remember {
            RememberPolicy::Remember
        } else {
            RememberPolicy::ThisSession
        }
    }

    fn tier(self) -> Tier {
        match self {
            RememberPolicy::Remember => Tier::Persistent,
            RememberPolicy::ThisSession => Tier::Tab,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Persistent,
    Tab,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::Persistent => "remembered",
            Tier::Tab => "this session",
        }
    }
}

/// Session tokens over two storage tiers. Reads check the persistent tier
/// first, then the tab tier. Cloning shares both tiers.
#[derive(Clone)]
pub struct SessionStore {
    persistent: Arc<dyn StorageTier>,
    tab: Arc<dyn StorageTier>,
}

impl SessionStore {
    pub fn new(persistent: Arc<dyn StorageTier>, tab: Arc<dyn StorageTier>) -> Self {
        Self { persistent, tab }
    }

    /// `storage.json` under SHELF_HOME plus a fresh in-memory tab tier.
    pub fn open_default() -> Self {
        Self::new(
            Arc::new(FileStorage::open_default()),
            Arc::new(MemoryStorage::new()),
        )
    }

    pub fn persistent_tier(&self) -> Arc<dyn StorageTier> {
        Arc::clone(&self.persistent)
    }

    fn tier(&self, tier: Tier) -> &dyn StorageTier {
        match tier {
            Tier::Persistent => self.persistent.as_ref(),
            Tier::Tab => self.tab.as_ref(),
        }
    }

    fn other(tier: Tier) -> Tier {
        match tier {
            Tier::Persistent => Tier::Tab,
            Tier::Tab => Tier::Persistent,
        }
    }

    /// Stores both tokens in the tier `policy` selects and clears the other
    /// tier, so exactly one tier holds a session.
    ///
    /// # Errors
    /// Returns an error if either tier cannot be written.
    pub fn save(&self, tokens: &TokenPair, policy: RememberPolicy) -> Result<()> {
        let target = policy.tier();
        self.write(target, tokens)?;
        self.tier(Self::other(target)).remove_all(&TOKEN_KEYS)?;
        debug!(tier = ?target, "session saved");
        Ok(())
    }

    /// Stores a refreshed pair back into the tier that held the refresh token.
    /// Returns the tier written, or `None` when no tier held one.
    ///
    /// # Errors
    /// Returns an error if the tier cannot be read or written.
    pub fn save_refreshed(&self, tokens: &TokenPair) -> Result<Option<Tier>> {
        let Some((_, tier)) = self.refresh_token()? else {
            return Ok(None);
        };
        self.write(tier, tokens)?;
        debug!(tier = ?tier, "refreshed session saved");
        Ok(Some(tier))
    }

    fn write(&self, tier: Tier, tokens: &TokenPair) -> Result<()> {
        self.tier(tier).set_all(&[
            (ACCESS_TOKEN_KEY, tokens.access_token.as_str()),
            (REFRESH_TOKEN_KEY, tokens.refresh_token.as_str()),
        ])
    }

    fn read(&self, key: &str) -> Result<Option<(String, Tier)>> {
        for tier in [Tier::Persistent, Tier::Tab] {
            if let Some(value) = self.tier(tier).get(key)?
                && !value.is_empty()
            {
                return Ok(Some((value, tier)));
            }
        }
        Ok(None)
    }

    /// # Errors
    /// Returns an error if a tier cannot be read.
    pub fn access_token(&self) -> Result<Option<String>> {
        Ok(self.read(ACCESS_TOKEN_KEY)?.map(|(token, _)| token))
    }

    /// # Errors
    /// Returns an error if a tier cannot be read.
    pub fn refresh_token(&self) -> Result<Option<(String, Tier)>> {
        self.read(REFRESH_TOKEN_KEY)
    }

    /// Tier currently holding the access token.
    pub fn active_tier(&self) -> Option<Tier> {
        self.read(ACCESS_TOKEN_KEY)
            .ok()
            .flatten()
            .map(|(_, tier)| tier)
    }

    /// True iff an access token is present in either tier. Unreadable storage
    /// counts as logged out.
    pub fn is_authenticated(&self) -> bool {
        match self.access_token() {
            Ok(token) => token.is_some(),
            Err(err) => {
                warn!("Treating session as logged out: {err:#}");
                false
            }
        }
    }

    /// Removes both tokens from both tiers.
    ///
    /// # Errors
    /// Returns an error if a tier cannot be written. Both tiers are attempted.
    pub fn clear(&self) -> Result<()> {
        let persistent = self.persistent.remove_all(&TOKEN_KEYS);
        let tab = self.tab.remove_all(&TOKEN_KEYS);
        persistent.and(tab)
    }
}
