//! Catalog and order log file locations

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::ConfigValidationError;

/// Where the catalog is read from and orders are appended to
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Product list (.json, .yaml or .yml)
    #[serde(default = "default_products_path")]
    pub products_path: PathBuf,

    /// Stock levels keyed by SKU
    #[serde(default = "default_inventory_path")]
    pub inventory_path: PathBuf,

    /// JSON Lines order log
    #[serde(default = "default_orders_path")]
    pub orders_path: PathBuf,
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for path in [&self.products_path, &self.inventory_path] {
            if !has_document_extension(path) {
                return Err(ConfigValidationError::UnsupportedCatalogFormat(
                    path.display().to_string(),
                ));
            }
        }
        if self.orders_path.as_os_str().is_empty() {
            return Err(ConfigValidationError::MissingRequired("CATALOG__ORDERS_PATH"));
        }
        Ok(())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            products_path: default_products_path(),
            inventory_path: default_inventory_path(),
            orders_path: default_orders_path(),
        }
    }
}

fn has_document_extension(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json" | "yaml" | "yml")
    )
}

fn default_products_path() -> PathBuf {
    PathBuf::from("data/products.json")
}

fn default_inventory_path() -> PathBuf {
    PathBuf::from("data/inventory.json")
}

fn default_orders_path() -> PathBuf {
    PathBuf::from("data/orders.jsonl")
}
