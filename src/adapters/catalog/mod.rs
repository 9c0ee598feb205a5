//! Catalog Store adapters.
//!
//! Implementations of `ProductFinder` and `AvailabilityChecker`.
//!
//! ## Available Adapters
//!
//! - **JsonCatalog** - Products and inventory read from JSON/YAML files
//! - **InMemoryCatalog** - In-process catalog with failure injection (testing/demo)

mod catalog_data;
mod in_memory_catalog;
mod json_catalog;

pub use catalog_data::{load_products, search, ProductRecord};
pub use in_memory_catalog::InMemoryCatalog;
pub use json_catalog::JsonCatalog;
