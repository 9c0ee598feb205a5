//! Catalog domain module.
//!
//! Product records, the canonical category and gender vocabularies, result
//! pages and stock levels as the conversation sees them.

mod product;

pub use product::{Category, Gender, Product, ProductPage, StockLevel};
