use serde::{Deserialize, Serialize};

use crate::api::{ApiError, ApiResult};

/// One catalog item. `brand` and `sku` are missing for some items and
/// deserialize as empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub thumbnail: String,
}

/// One page of results as returned by `/products` and `/products/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u32,
    pub skip: u32,
    pub limit: u32,
}

impl ProductPage {
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.products.iter().map(|p| p.id)
    }
}

/// Identity of a page request. Two requests with equal keys are the same
/// request: the cache deduplicates on it and the view discards results for
/// any key other than the latest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub page: u32,
    pub limit: u32,
    /// Trimmed search text; `None` lists the whole catalog.
    pub search: Option<String>,
}

impl FetchKey {
    /// Validates and builds a key. Blank search text means "no search".
    pub fn new(page: u32, limit: u32, search: &str) -> ApiResult<Self> {
        if page < 1 {
            return Err(ApiError::invalid_request(format!(
                "Page must be at least 1 (got {page})"
            )));
        }
        if limit == 0 {
            return Err(ApiError::invalid_request("Limit must be greater than 0"));
        }
        if (page - 1).checked_mul(limit).is_none() {
            return Err(ApiError::invalid_request(format!(
                "Page {page} is out of range for limit {limit}"
            )));
        }
        let search = search.trim();
        Ok(Self {
            page,
            limit,
            search: (!search.is_empty()).then(|| search.to_string()),
        })
    }

    /// Number of items skipped before this page.
    pub fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}
