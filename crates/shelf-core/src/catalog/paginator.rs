/// Maximum number of numbered page buttons shown at once.
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// Everything a pager control needs to render for one page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub current: u32,
    pub total_pages: u32,
    /// Numbered buttons, centred on `current` where possible.
    pub pages: Vec<u32>,
    pub has_prev: bool,
    pub has_next: bool,
    /// First and last item numbers shown (1-based, inclusive).
    pub first_item: u32,
    pub last_item: u32,
    pub total: u32,
}

impl PageWindow {
    pub fn new(current: u32, limit: u32, total: u32) -> Self {
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit);
        let current = current.clamp(1, total_pages.max(1));

        let half = MAX_VISIBLE_PAGES / 2;
        let mut start = current.saturating_sub(half).max(1);
        let end = start
            .saturating_add(MAX_VISIBLE_PAGES - 1)
            .min(total_pages);
        if end.saturating_sub(start) + 1 < MAX_VISIBLE_PAGES {
            start = end.saturating_sub(MAX_VISIBLE_PAGES - 1).max(1);
        }
        let pages = if total_pages == 0 {
            Vec::new()
        } else {
            (start..=end).collect()
        };

        let (first_item, last_item) = if total == 0 {
            (0, 0)
        } else {
            (
                (current - 1).saturating_mul(limit).saturating_add(1),
                current.saturating_mul(limit).min(total),
            )
        };

        Self {
            current,
            total_pages,
            pages,
            has_prev: current > 1,
            has_next: current < total_pages,
            first_item,
            last_item,
            total,
        }
    }

    /// "21-40 of 57"
    pub fn range_label(&self) -> String {
        format!("{}-{} of {}", self.first_item, self.last_item, self.total)
    }
}
