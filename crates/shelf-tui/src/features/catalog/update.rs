//! Catalog feature reducer.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use shelf_core::api::ApiError;
use shelf_core::catalog::{FetchKey, ProductPage, SortField};

use super::{CatalogFocus, CatalogState};
use crate::effects::UiEffect;
use crate::mutations::StateMutation;

fn fetch(key: Option<FetchKey>) -> Vec<UiEffect> {
    key.map(|key| UiEffect::FetchProducts { key })
        .into_iter()
        .collect()
}

fn page_changed(catalog: &mut CatalogState, key: Option<FetchKey>) -> Vec<UiEffect> {
    catalog.cursor = 0;
    fetch(key)
}

/// Keys for the products screen. Screen-level keys (quit, help, logout,
/// add product) are handled by the caller before this.
pub fn handle_catalog_key(
    catalog: &mut CatalogState,
    key: KeyEvent,
    now: Instant,
) -> (Vec<UiEffect>, Vec<StateMutation>) {
    match catalog.focus {
        CatalogFocus::Search => (handle_search_key(catalog, key, now), vec![]),
        CatalogFocus::Table => handle_table_key(catalog, key, now),
    }
}

fn handle_search_key(catalog: &mut CatalogState, key: KeyEvent, now: Instant) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
            catalog.focus = CatalogFocus::Table;
        }
        _ => {
            if catalog.search.handle_key(key) {
                catalog.view.input_search(catalog.search.value(), now);
                catalog.cursor = 0;
            }
        }
    }
    vec![]
}

fn handle_table_key(
    catalog: &mut CatalogState,
    key: KeyEvent,
    now: Instant,
) -> (Vec<UiEffect>, Vec<StateMutation>) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let row_count = catalog.view.rows().len();

    let effects = match key.code {
        KeyCode::Char('/') => {
            catalog.focus = CatalogFocus::Search;
            vec![]
        }
        KeyCode::Char('u') if ctrl => {
            if catalog.search.is_empty() {
                vec![]
            } else {
                catalog.search.clear();
                catalog.view.input_search("", now);
                catalog.cursor = 0;
                vec![]
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            catalog.cursor = catalog.cursor.saturating_sub(1);
            vec![]
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if catalog.cursor + 1 < row_count {
                catalog.cursor += 1;
            }
            vec![]
        }
        KeyCode::Char(' ') => {
            if let Some(id) = catalog.selected_id() {
                catalog.view.toggle_row(id);
            }
            vec![]
        }
        KeyCode::Char('a') => {
            catalog.view.toggle_all();
            vec![]
        }
        KeyCode::Char(c @ '1'..='4') => {
            let idx = (c as usize) - ('1' as usize);
            let spec = catalog.view.toggle_sort(SortField::ALL[idx]);
            vec![UiEffect::PersistSort { spec }]
        }
        KeyCode::Char('0') => {
            let spec = catalog.view.reset_sort();
            vec![UiEffect::PersistSort { spec }]
        }
        KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l') => {
            let key = catalog.view.next_page(now);
            page_changed(catalog, key)
        }
        KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') => {
            let key = catalog.view.prev_page(now);
            page_changed(catalog, key)
        }
        KeyCode::Home | KeyCode::Char('g') => return jump_to(catalog, 1, now),
        KeyCode::End | KeyCode::Char('G') => {
            let last = catalog.view.window().map_or(1, |w| w.total_pages.max(1));
            return jump_to(catalog, last, now);
        }
        KeyCode::Char('r') => fetch(catalog.view.refresh(now)),
        _ => vec![],
    };
    (effects, vec![])
}

fn jump_to(
    catalog: &mut CatalogState,
    page: u32,
    now: Instant,
) -> (Vec<UiEffect>, Vec<StateMutation>) {
    if page == catalog.view.page() {
        return (vec![], vec![]);
    }
    match catalog.view.set_page(page, now) {
        Ok(key) => (page_changed(catalog, key), vec![]),
        Err(err) => (vec![], vec![StateMutation::error(err.message)]),
    }
}

/// Pasted text goes to the search box when it has focus.
pub fn handle_catalog_paste(catalog: &mut CatalogState, text: &str, now: Instant) {
    if catalog.focus == CatalogFocus::Search {
        catalog.search.paste(text);
        catalog.view.input_search(catalog.search.value(), now);
        catalog.cursor = 0;
    }
}

pub fn handle_products_loaded(
    catalog: &mut CatalogState,
    key: &FetchKey,
    result: Result<ProductPage, ApiError>,
    now: Instant,
) {
    if catalog.view.on_fetch_result(key, result, now) {
        catalog.clamp_cursor();
    }
}

/// Fires a settled search.
pub fn tick_catalog(catalog: &mut CatalogState, now: Instant) -> Vec<UiEffect> {
    fetch(catalog.view.tick(now))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use shelf_core::catalog::{ListStatus, ListViewOptions, Product, SortOrder, SortSpec};

    use super::*;

    fn options() -> ListViewOptions {
        ListViewOptions {
            limit: 2,
            debounce: Duration::from_millis(300),
            stale_after: Duration::from_secs(60),
            cache_gc: Duration::from_secs(300),
        }
    }

    fn product(id: u64, price: f64) -> Product {
        Product {
            id,
            title: format!("Product {id}"),
            description: String::new(),
            brand: "Acme".to_string(),
            sku: format!("SKU-{id}"),
            rating: 4.0,
            price,
            thumbnail: String::new(),
        }
    }

    fn page(ids: &[u64], skip: u32, total: u32) -> ProductPage {
        ProductPage {
            products: ids.iter().map(|id| product(*id, *id as f64)).collect(),
            total,
            skip,
            limit: 2,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn fetched_keys(effects: &[UiEffect]) -> Vec<FetchKey> {
        effects
            .iter()
            .filter_map(|e| match e {
                UiEffect::FetchProducts { key } => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    fn loaded_catalog(now: Instant) -> CatalogState {
        let mut catalog = CatalogState::new(options(), SortSpec::default());
        let key = catalog.view.start(now).unwrap();
        handle_products_loaded(&mut catalog, &key, Ok(page(&[1, 2], 0, 5)), now);
        catalog
    }

    #[test]
    fn test_typing_search_fetches_once_after_settle() {
        let now = Instant::now();
        let mut catalog = loaded_catalog(now);

        handle_catalog_key(&mut catalog, key(KeyCode::Char('/')), now);
        let mut effects = Vec::new();
        for (i, c) in "phone".chars().enumerate() {
            let at = now + Duration::from_millis(50 * i as u64);
            effects.extend(handle_catalog_key(&mut catalog, key(KeyCode::Char(c)), at).0);
            effects.extend(tick_catalog(&mut catalog, at));
        }
        assert!(fetched_keys(&effects).is_empty());

        let settled = tick_catalog(&mut catalog, now + Duration::from_secs(1));
        let keys = fetched_keys(&settled);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].search.as_deref(), Some("phone"));
        assert_eq!(keys[0].page, 1);
    }

    #[test]
    fn test_next_page_fetches_and_resets_cursor() {
        let now = Instant::now();
        let mut catalog = loaded_catalog(now);
        handle_catalog_key(&mut catalog, key(KeyCode::Down), now);
        assert_eq!(catalog.cursor, 1);

        let (effects, _) = handle_catalog_key(&mut catalog, key(KeyCode::Right), now);
        let keys = fetched_keys(&effects);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].offset(), 2);
        assert_eq!(catalog.cursor, 0);
        assert_eq!(catalog.view.status(), &ListStatus::Refreshing);
    }

    #[test]
    fn test_end_jumps_to_last_page() {
        let now = Instant::now();
        let mut catalog = loaded_catalog(now);
        let (effects, mutations) = handle_catalog_key(&mut catalog, key(KeyCode::End), now);
        assert!(mutations.is_empty());
        assert_eq!(catalog.view.page(), 3);
        assert_eq!(fetched_keys(&effects)[0].offset(), 4);
    }

    #[test]
    fn test_sort_keys_persist_spec() {
        let now = Instant::now();
        let mut catalog = loaded_catalog(now);

        let (effects, _) = handle_catalog_key(&mut catalog, key(KeyCode::Char('4')), now);
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::PersistSort { spec }] if *spec == SortSpec::new(SortField::Price, SortOrder::Asc)
        ));

        handle_catalog_key(&mut catalog, key(KeyCode::Char('4')), now);
        let ids: Vec<u64> = catalog.view.rows().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);

        let (effects, _) = handle_catalog_key(&mut catalog, key(KeyCode::Char('0')), now);
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::PersistSort { spec }] if spec.field.is_none()
        ));
    }

    #[test]
    fn test_space_and_a_toggle_selection() {
        let now = Instant::now();
        let mut catalog = loaded_catalog(now);

        handle_catalog_key(&mut catalog, key(KeyCode::Char(' ')), now);
        assert!(catalog.view.selection().contains(1));

        handle_catalog_key(&mut catalog, key(KeyCode::Char('a')), now);
        assert_eq!(catalog.view.selection().len(), 2);
    }

    #[test]
    fn test_typing_in_table_focus_does_not_search() {
        let now = Instant::now();
        let mut catalog = loaded_catalog(now);
        handle_catalog_key(&mut catalog, key(KeyCode::Char('x')), now);
        assert!(!catalog.view.is_debouncing());
        assert!(catalog.search.is_empty());
    }

    #[test]
    fn test_teardown_restores_applied_search() {
        let now = Instant::now();
        let mut catalog = loaded_catalog(now);
        catalog.focus = CatalogFocus::Search;
        handle_catalog_paste(&mut catalog, "lap", now);
        assert!(catalog.view.is_debouncing());

        catalog.teardown();
        assert!(!catalog.view.is_debouncing());
        assert!(catalog.search.is_empty());
        assert_eq!(catalog.focus, CatalogFocus::Table);
    }
}
