//! Catalog file records and the shared search policy.
//!
//! Catalog files are JSON or YAML, chosen by extension. Prices are whole
//! rupees on disk and become [`Price`] minor units on load.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tokio::fs;

use crate::domain::catalog::{Category, Gender, Product, ProductPage, StockLevel};
use crate::domain::foundation::{Price, Sku};
use crate::ports::{CollaboratorError, ProductQuery};

/// One product as written in the products file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub sku: Sku,
    pub name: String,
    pub category: Category,
    pub gender: Gender,
    /// Whole rupees.
    pub price: u64,
    pub image: String,
    pub delivery_estimate: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Product {
            sku: record.sku,
            name: record.name,
            category: record.category,
            gender: record.gender,
            price: Price::from_major(record.price),
            image: record.image,
            delivery_estimate: record.delivery_estimate,
            available: record.available,
        }
    }
}

/// Inventory file: SKU to stock split.
pub type InventoryRecords = HashMap<Sku, StockLevel>;

/// Reads and parses a JSON or YAML document.
pub async fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, CollaboratorError> {
    let raw = fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CollaboratorError::not_found(&path.display().to_string())
        } else {
            CollaboratorError::storage(format!("Failed to read {}: {}", path.display(), e))
        }
    })?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&raw).map_err(|e| {
            CollaboratorError::malformed_response(format!("{}: {}", path.display(), e))
        })
    } else {
        serde_json::from_str(&raw).map_err(|e| {
            CollaboratorError::malformed_response(format!("{}: {}", path.display(), e))
        })
    }
}

pub async fn load_products(path: &Path) -> Result<Vec<Product>, CollaboratorError> {
    let records: Vec<ProductRecord> = load_document(path).await?;
    Ok(records.into_iter().map(Product::from).collect())
}

/// Filters by category, gender and name substring, orders available items
/// first then by SKU, and slices out the requested page.
///
/// The order depends only on the product data, so consecutive offsets
/// over an unchanged catalog never repeat or skip an item.
pub fn search(products: &[Product], query: &ProductQuery) -> ProductPage {
    let needle = query.query.trim().to_lowercase();
    let mut matches: Vec<&Product> = products
        .iter()
        .filter(|p| query.category.map_or(true, |c| p.category == c))
        .filter(|p| query.gender.map_or(true, |g| p.gender.suits(g)))
        .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
        .collect();

    matches.sort_by(|a, b| {
        b.available
            .cmp(&a.available)
            .then_with(|| a.sku.as_str().cmp(b.sku.as_str()))
    });

    let end = query.offset.saturating_add(query.limit);
    ProductPage {
        items: matches
            .iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|p| (*p).clone())
            .collect(),
        has_more: matches.len() > end,
    }
}


#[cfg(test)]
mod tests {
    use super::sample::catalog;
    use super::*;

    fn skus(page: &ProductPage) -> Vec<&str> {
        page.items.iter().map(|p| p.sku.as_str()).collect()
    }

    #[test]
    fn filters_by_category_and_gender_with_unisex() {
        let page = search(
            &catalog(),
            &ProductQuery::browse(Category::Sports, Gender::Men, 10, 0),
        );
        assert_eq!(skus(&page), vec!["SP-02", "SP-03", "SP-05", "SP-01"]);
        assert!(!page.has_more);
    }

    #[test]
    fn unisex_request_sees_whole_category() {
        let page = search(
            &catalog(),
            &ProductQuery::browse(Category::Sports, Gender::Unisex, 10, 0),
        );
        assert_eq!(page.items.len(), 5);
    }

    #[test]
    fn pages_are_contiguous_and_stable() {
        let first = search(
            &catalog(),
            &ProductQuery::browse(Category::Sports, Gender::Men, 2, 0),
        );
        let second = search(
            &catalog(),
            &ProductQuery::browse(Category::Sports, Gender::Men, 2, 2),
        );
        assert_eq!(skus(&first), vec!["SP-02", "SP-03"]);
        assert!(first.has_more);
        assert_eq!(skus(&second), vec!["SP-05", "SP-01"]);
        assert!(!second.has_more);
    }

    #[test]
    fn offset_past_end_is_empty() {
        let page = search(
            &catalog(),
            &ProductQuery::browse(Category::Formal, Gender::Men, 3, 3),
        );
        assert!(page.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn text_query_matches_name_substring() {
        let mut query = ProductQuery::browse(Category::Sports, Gender::Unisex, 10, 0);
        query.query = "sp-04".to_string();
        let page = search(&catalog(), &query);
        assert_eq!(skus(&page), vec!["SP-04"]);
    }

    #[test]
    fn product_record_converts_rupees_to_minor_units() {
        let json = r#"{"sku":"X-1","name":"X","category":"boots","gender":"women",
            "price":2499,"image":"x.jpg","deliveryEstimate":"5 days"}"#;
        let record: ProductRecord = serde_json::from_str(json).unwrap();
        let product = Product::from(record);
        assert_eq!(product.price.minor_units(), 249_900);
        assert!(product.available);
    }
}
