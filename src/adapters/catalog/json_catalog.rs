//! File-backed catalog store.
//!
//! Implements both `ProductFinder` and `AvailabilityChecker` over a
//! products file and an inventory file. Files are re-read on every call,
//! so edits show up without a restart and nothing is cached.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::catalog_data::{load_document, load_products, search, InventoryRecords};
use crate::domain::catalog::ProductPage;
use crate::ports::{
    AvailabilityChecker, AvailabilityReport, AvailabilityRequest, CollaboratorError,
    ProductFinder, ProductQuery,
};

#[derive(Debug, Clone)]
pub struct JsonCatalog {
    products_path: PathBuf,
    inventory_path: PathBuf,
}

impl JsonCatalog {
    pub fn new(products_path: impl AsRef<Path>, inventory_path: impl AsRef<Path>) -> Self {
        Self {
            products_path: products_path.as_ref().to_path_buf(),
            inventory_path: inventory_path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ProductFinder for JsonCatalog {
    async fn find_products(&self, query: ProductQuery) -> Result<ProductPage, CollaboratorError> {
        query.validate()?;
        let products = load_products(&self.products_path).await?;
        let page = search(&products, &query);
        tracing::debug!(
            category = ?query.category,
            gender = ?query.gender,
            offset = query.offset,
            returned = page.items.len(),
            has_more = page.has_more,
            "Catalog search"
        );
        Ok(page)
    }
}

#[async_trait]
impl AvailabilityChecker for JsonCatalog {
    async fn check_availability(
        &self,
        request: AvailabilityRequest,
    ) -> Result<AvailabilityReport, CollaboratorError> {
        request.validate()?;
        let inventory: InventoryRecords = load_document(&self.inventory_path).await?;

        let Some(stock) = inventory.get(&request.sku).copied() else {
            return Ok(AvailabilityReport::unknown_sku(&request.sku));
        };

        let name = load_products(&self.products_path)
            .await?
            .into_iter()
            .find(|p| p.sku == request.sku)
            .map(|p| p.name)
            .unwrap_or_else(|| request.sku.to_string());

        Ok(AvailabilityReport {
            ok: true,
            available: stock.covers(request.quantity),
            name,
            store_qty: stock.store_qty,
            stockroom_qty: stock.stockroom_qty,
        })
    }
}
