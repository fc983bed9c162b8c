use std::collections::HashSet;

/// Tri-state of the "select all" header checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheck {
    None,
    All,
    Indeterminate,
}

impl HeaderCheck {
    pub fn glyph(self) -> &'static str {
        match self {
            HeaderCheck::None => "[ ]",
            HeaderCheck::All => "[x]",
            HeaderCheck::Indeterminate => "[-]",
        }
    }
}

/// Checked product ids on the visible page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<u64>,
}

impl Selection {
    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn toggle(&mut self, id: u64) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// Selects every visible row, or clears them all when they are all selected already.
    pub fn toggle_all(&mut self, visible: &[u64]) {
        if self.all_selected(visible) {
            for id in visible {
                self.ids.remove(id);
            }
        } else {
            self.ids.extend(visible.iter().copied());
        }
    }

    fn all_selected(&self, visible: &[u64]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.ids.contains(id))
    }

    pub fn header(&self, visible: &[u64]) -> HeaderCheck {
        if self.all_selected(visible) {
            HeaderCheck::All
        } else if visible.iter().any(|id| self.ids.contains(id)) {
            HeaderCheck::Indeterminate
        } else {
            HeaderCheck::None
        }
    }
}
