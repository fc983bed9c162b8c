//! Products table screen.
//!
//! Wraps the core list view-state machine with the bits only a terminal needs:
//! an editable search field, keyboard focus, and a row cursor.

mod render;
mod update;

use shelf_core::catalog::{ListView, ListViewOptions, SortSpec};

pub use render::render_catalog;
pub use update::{handle_catalog_key, handle_catalog_paste, handle_products_loaded, tick_catalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFocus {
    Table,
    Search,
}

#[derive(Debug)]
pub struct CatalogState {
    pub view: ListView,
    pub search: crate::common::TextField,
    pub focus: CatalogFocus,
    /// Index into the sorted rows of the shown page.
    pub cursor: usize,
}

impl CatalogState {
    pub fn new(options: ListViewOptions, sort: SortSpec) -> Self {
        Self {
            view: ListView::new(options).with_sort(sort),
            search: crate::common::TextField::default(),
            focus: CatalogFocus::Table,
            cursor: 0,
        }
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.view.rows().get(self.cursor).map(|p| p.id)
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.view.rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Leaves the screen; an unsettled search is dropped.
    pub fn teardown(&mut self) {
        self.view.teardown();
        self.search.set(self.view.search_input());
        self.focus = CatalogFocus::Table;
    }
}
