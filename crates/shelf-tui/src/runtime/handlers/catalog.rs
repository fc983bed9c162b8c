use shelf_core::catalog::{FetchKey, ProductSource, SortPreferences, SortSpec};
use tracing::warn;

use crate::events::UiEvent;

/// Fetches one page. Pure async function - runtime spawns and sends result to inbox.
pub async fn fetch_products(source: ProductSource, key: FetchKey) -> UiEvent {
    let result = source.fetch_page(&key).await;
    UiEvent::ProductsLoaded { key, result }
}

/// Writes the sort preference through. Failure only costs the saved
/// preference, so it is logged and otherwise ignored.
pub fn persist_sort(preferences: &mut SortPreferences, spec: SortSpec) {
    if let Err(err) = preferences.update(spec) {
        warn!("Failed to save sort preferences: {err:#}");
    }
}
