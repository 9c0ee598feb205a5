//! In-memory catalog for tests and demos.
//!
//! Same search policy as the file-backed catalog, plus hooks to inject
//! failures, slow down calls and count them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::catalog_data::search;
use crate::domain::catalog::{Product, ProductPage, StockLevel};
use crate::domain::foundation::Sku;
use crate::ports::{
    AvailabilityChecker, AvailabilityReport, AvailabilityRequest, CollaboratorError,
    ProductFinder, ProductQuery,
};

#[derive(Default, Clone)]
pub struct InMemoryCatalog {
    inner: Arc<Mutex<CatalogState>>,
}

#[derive(Default)]
struct CatalogState {
    products: Vec<Product>,
    stock: HashMap<Sku, StockLevel>,
    search_error: Option<CollaboratorError>,
    availability_error: Option<CollaboratorError>,
    delay: Option<Duration>,
    searches: Vec<ProductQuery>,
    availability_checks: Vec<AvailabilityRequest>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog where every product has `qty` units in the store.
    pub fn with_products(products: Vec<Product>, qty: u32) -> Self {
        let catalog = Self::new();
        for product in products {
            catalog.add_product(
                product,
                StockLevel {
                    store_qty: qty,
                    stockroom_qty: 0,
                },
            );
        }
        catalog
    }

    fn state(&self) -> MutexGuard<'_, CatalogState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_product(&self, product: Product, stock: StockLevel) {
        let mut state = self.state();
        state.stock.insert(product.sku.clone(), stock);
        state.products.push(product);
    }

    pub fn set_stock(&self, sku: &Sku, stock: StockLevel) {
        self.state().stock.insert(sku.clone(), stock);
    }

    /// Fail every search until cleared.
    pub fn fail_searches(&self, error: Option<CollaboratorError>) {
        self.state().search_error = error;
    }

    /// Fail every availability check until cleared.
    pub fn fail_availability(&self, error: Option<CollaboratorError>) {
        self.state().availability_error = error;
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        self.state().delay = delay;
    }

    pub fn search_count(&self) -> usize {
        self.state().searches.len()
    }

    pub fn searches(&self) -> Vec<ProductQuery> {
        self.state().searches.clone()
    }

    pub fn availability_count(&self) -> usize {
        self.state().availability_checks.len()
    }

    async fn pause(&self) {
        let delay = self.state().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl ProductFinder for InMemoryCatalog {
    async fn find_products(&self, query: ProductQuery) -> Result<ProductPage, CollaboratorError> {
        query.validate()?;
        self.pause().await;
        let mut state = self.state();
        state.searches.push(query.clone());
        if let Some(error) = state.search_error.clone() {
            return Err(error);
        }
        Ok(search(&state.products, &query))
    }
}

#[async_trait]
impl AvailabilityChecker for InMemoryCatalog {
    async fn check_availability(
        &self,
        request: AvailabilityRequest,
    ) -> Result<AvailabilityReport, CollaboratorError> {
        request.validate()?;
        self.pause().await;
        let mut state = self.state();
        state.availability_checks.push(request.clone());
        if let Some(error) = state.availability_error.clone() {
            return Err(error);
        }

        let Some(stock) = state.stock.get(&request.sku).copied() else {
            return Ok(AvailabilityReport::unknown_sku(&request.sku));
        };
        let name = state
            .products
            .iter()
            .find(|p| p.sku == request.sku)
            .map(|p| p.name.clone())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::catalog::catalog_data::sample::catalog;
    use crate::domain::catalog::{Category, Gender};
    use crate::domain::conversation::Pincode;

    #[tokio::test]
    async fn counts_searches_and_applies_policy() {
        let store = InMemoryCatalog::with_products(catalog(), 1);
        let page = store
            .find_products(ProductQuery::browse(Category::Sports, Gender::Women, 3, 0))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(store.search_count(), 1);
    }

    #[tokio::test]
    async fn injected_failure_is_returned() {
        let store = InMemoryCatalog::with_products(catalog(), 1);
        store.fail_availability(Some(CollaboratorError::unavailable("inventory down")));

        let request = AvailabilityRequest::new(
            Sku::new("SP-02").unwrap(),
            1,
            Pincode::parse("110001").unwrap(),
        )
        .unwrap();
        assert!(store.check_availability(request).await.is_err());
        assert_eq!(store.availability_count(), 1);
    }

    #[tokio::test]
    async fn out_of_stock_is_unavailable() {
        let store = InMemoryCatalog::with_products(catalog(), 0);
        let request = AvailabilityRequest::new(
            Sku::new("SP-02").unwrap(),
            1,
            Pincode::parse("110001").unwrap(),
        )
        .unwrap();
        let report = store.check_availability(request).await.unwrap();
        assert!(report.ok);
        assert!(!report.available);
    }
}
