//! Client-side sorting of a loaded page.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::model::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Brand,
    Sku,
    Rating,
    Price,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Brand,
        SortField::Sku,
        SortField::Rating,
        SortField::Price,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortField::Brand => "Brand",
            SortField::Sku => "SKU",
            SortField::Rating => "Rating",
            SortField::Price => "Price",
        }
    }

    /// Parses the lowercase wire/CLI name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "brand" => Some(SortField::Brand),
            "sku" => Some(SortField::Sku),
            "rating" => Some(SortField::Rating),
            "price" => Some(SortField::Price),
            _ => None,
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortField::Brand => compare_text(&a.brand, &b.brand),
            SortField::Sku => compare_text(&a.sku, &b.sku),
            SortField::Rating => a.rating.total_cmp(&b.rating),
            SortField::Price => a.price.total_cmp(&b.price),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

/// Active sort column and direction. `field: None` keeps server order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub field: Option<SortField>,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self {
            field: Some(field),
            order,
        }
    }

    /// Same field flips direction; a different field starts ascending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == Some(field) {
            self.order = self.order.flipped();
        } else {
            self.field = Some(field);
            self.order = SortOrder::Asc;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Arrow for a column header, if that column is the active one.
    pub fn indicator(&self, field: SortField) -> Option<&'static str> {
        (self.field == Some(field)).then(|| self.order.arrow())
    }

    /// Stable sort of `products` into display order.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut rows: Vec<&Product> = products.iter().collect();
        if let Some(field) = self.field {
            rows.sort_by(|a, b| {
                let ord = field.compare(a, b);
                match self.order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }
        rows
    }
}

/// Case-insensitive first, then case-sensitive so "apple" and "Apple" have a fixed order.
fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a.to_lowercase().cmp(&b.to_lowercase());
    folded.then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, brand: &str, price: f64) -> Product {
        Product {
            id,
            title: format!("Item {id}"),
            description: String::new(),
            brand: brand.to_string(),
            sku: format!("SKU-{id}"),
            rating: 4.0,
            price,
            thumbnail: String::new(),
        }
    }

    fn ids(rows: &[&Product]) -> Vec<u64> {
        rows.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_toggle_new_field_asc_then_flips() {
        let mut spec = SortSpec::default();
        spec.toggle(SortField::Price);
        assert_eq!(spec, SortSpec::new(SortField::Price, SortOrder::Asc));
        spec.toggle(SortField::Price);
        assert_eq!(spec.order, SortOrder::Desc);
        spec.toggle(SortField::Price);
        assert_eq!(spec.order, SortOrder::Asc);
    }

    #[test]
    fn test_toggle_other_field_resets_to_asc() {
        let mut spec = SortSpec::new(SortField::Price, SortOrder::Desc);
        spec.toggle(SortField::Brand);
        assert_eq!(spec, SortSpec::new(SortField::Brand, SortOrder::Asc));
    }

    #[test]
    fn test_reset_returns_to_unsorted() {
        let mut spec = SortSpec::new(SortField::Sku, SortOrder::Desc);
        spec.reset();
        assert_eq!(spec.field, None);
        assert_eq!(spec.order, SortOrder::Asc);
    }

    #[test]
    fn test_numeric_sort_desc() {
        let items = vec![product(1, "a", 5.0), product(2, "b", 50.0), product(3, "c", 9.5)];
        let rows = SortSpec::new(SortField::Price, SortOrder::Desc).apply(&items);
        assert_eq!(ids(&rows), vec![2, 3, 1]);
    }

    #[test]
    fn test_text_sort_is_case_insensitive_with_missing_first() {
        let items = vec![
            product(1, "samsung", 1.0),
            product(2, "", 1.0),
            product(3, "Apple", 1.0),
            product(4, "apple", 1.0),
        ];
        let rows = SortSpec::new(SortField::Brand, SortOrder::Asc).apply(&items);
        assert_eq!(ids(&rows), vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_sort_is_stable_and_idempotent() {
        let items = vec![
            product(1, "b", 10.0),
            product(2, "a", 10.0),
            product(3, "c", 5.0),
            product(4, "d", 10.0),
        ];
        let spec = SortSpec::new(SortField::Price, SortOrder::Asc);
        let once = spec.apply(&items);
        assert_eq!(ids(&once), vec![3, 1, 2, 4]);

        let owned: Vec<Product> = once.into_iter().cloned().collect();
        let twice = spec.apply(&owned);
        assert_eq!(ids(&twice), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_desc_keeps_equal_items_in_original_order() {
        let items = vec![product(1, "x", 10.0), product(2, "y", 10.0)];
        let rows = SortSpec::new(SortField::Price, SortOrder::Desc).apply(&items);
        assert_eq!(ids(&rows), vec![1, 2]);
    }

    #[test]
    fn test_no_field_keeps_server_order() {
        let items = vec![product(3, "c", 1.0), product(1, "a", 2.0)];
        assert_eq!(ids(&SortSpec::default().apply(&items)), vec![3, 1]);
    }

    #[test]
    fn test_parse_field_names() {
        assert_eq!(SortField::parse("Price"), Some(SortField::Price));
        assert_eq!(SortField::parse("sku"), Some(SortField::Sku));
        assert_eq!(SortField::parse("title"), None);
    }
}
