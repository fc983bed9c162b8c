//! Saved sort column/direction for the products table.
//!
//! Stored in a storage tier under [`PREFERENCES_KEY`] as
//! `{"state":{"sortField":"price","sortOrder":"desc"},"version":0}`.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::sort::{SortField, SortOrder, SortSpec};
use crate::storage::StorageTier;

pub const PREFERENCES_KEY: &str = "products-table-preferences";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSort {
    sort_field: Option<SortField>,
    #[serde(default)]
    sort_order: SortOrder,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    state: StoredSort,
    #[serde(default)]
    version: u32,
}

/// Current sort preference plus the tier it is persisted to.
pub struct SortPreferences {
    spec: SortSpec,
    backend: Arc<dyn StorageTier>,
}

impl SortPreferences {
    /// Loads the saved sort. Missing or unreadable preferences fall back to
    /// the default (unsorted) spec.
    pub fn load(backend: Arc<dyn StorageTier>) -> Self {
        let spec = match read_spec(backend.as_ref()) {
            Ok(spec) => spec.unwrap_or_default(),
            Err(err) => {
                warn!("Ignoring saved sort preferences: {err:#}");
                SortSpec::default()
            }
        };
        Self { spec, backend }
    }

    pub fn spec(&self) -> SortSpec {
        self.spec
    }

    /// Records a new sort and writes it through when it changed.
    ///
    /// # Errors
    /// Returns an error if the backing tier cannot be written; the previous
    /// sort is kept in that case.
    pub fn update(&mut self, spec: SortSpec) -> Result<()> {
        if spec == self.spec {
            return Ok(());
        }
        let envelope = Envelope {
            state: StoredSort {
                sort_field: spec.field,
                sort_order: spec.order,
            },
            version: 0,
        };
        let json = serde_json::to_string(&envelope).context("Failed to serialize sort preferences")?;
        self.backend.set(PREFERENCES_KEY, &json)?;
        self.spec = spec;
        Ok(())
    }
}

fn read_spec(backend: &dyn StorageTier) -> Result<Option<SortSpec>> {
    let Some(raw) = backend.get(PREFERENCES_KEY)? else {
        return Ok(None);
    };
    let envelope: Envelope =
        serde_json::from_str(&raw).context("Failed to parse sort preferences")?;
    Ok(Some(SortSpec {
        field: envelope.state.sort_field,
        order: envelope.state.sort_order,
    }))
}
