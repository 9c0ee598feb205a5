//! Product Finder port - paged catalog search.
//!
//! Ordering is the adapter's choice, but it must be stable across offsets
//! within one browsing session: asking for offset 3 after offset 0 never
//! repeats or skips an item.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::CollaboratorError;
use crate::domain::catalog::{Category, Gender, ProductPage};
use crate::domain::foundation::ValidationError;

/// Largest page a caller may ask for.
pub const MAX_PAGE_SIZE: usize = 50;

#[async_trait]
pub trait ProductFinder: Send + Sync {
    /// Returns the page `[offset, offset + limit)` of matching products and
    /// whether more remain after it.
    async fn find_products(&self, query: ProductQuery) -> Result<ProductPage, CollaboratorError>;
}

/// Search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Free text matched against product names; may be empty.
    pub query: String,
    pub category: Option<Category>,
    pub gender: Option<Gender>,
    pub limit: usize,
    /// Zero-based.
    pub offset: usize,
}

impl ProductQuery {
    /// Empty-text query filtered by category and gender.
    pub fn browse(category: Category, gender: Gender, limit: usize, offset: usize) -> Self {
        Self {
            query: String::new(),
            category: Some(category),
            gender: Some(gender),
            limit,
            offset,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.limit == 0 || self.limit > MAX_PAGE_SIZE {
            return Err(ValidationError::out_of_range(
                "limit",
                1,
                MAX_PAGE_SIZE as i64,
                self.limit as i64,
            ));
        }
        Ok(())
    }
}
