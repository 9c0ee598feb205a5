//! Product records and the closed category/gender vocabularies.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Price, Sku};

/// Canonical footwear category.
///
/// Many user phrases map onto one of these (see the conversation
/// extractor); catalog files use the lowercase names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Formal,
    Sports,
    Casual,
    Sandals,
    Boots,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Formal,
        Category::Sports,
        Category::Casual,
        Category::Sandals,
        Category::Boots,
    ];

    /// Label used in replies ("formal shoes", "sports shoes", ...).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Formal => "formal shoes",
            Self::Sports => "sports shoes",
            Self::Casual => "casual shoes",
            Self::Sandals => "sandals",
            Self::Boots => "boots",
        }
    }

    /// Lowercase identifier, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Sports => "sports",
            Self::Casual => "casual",
            Self::Sandals => "sandals",
            Self::Boots => "boots",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical gender used for result filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
    Unisex,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Unisex => "unisex",
        }
    }

    /// True if a product tagged `self` should be shown to a shopper asking
    /// for `wanted`. Unisex products suit everyone and a unisex request
    /// sees the whole category.
    pub fn suits(&self, wanted: Gender) -> bool {
        *self == wanted || *self == Gender::Unisex || wanted == Gender::Unisex
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog product as shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub sku: Sku,
    pub name: String,
    pub category: Category,
    pub gender: Gender,
    pub price: Price,
    /// Image URL or file reference for product cards.
    pub image: String,
    /// Free text such as "3-5 days".
    pub delivery_estimate: String,
    pub available: bool,
}

impl Product {
    /// Caption for a product card: position, name, category, price and delivery.
    pub fn caption(&self, position: usize) -> String {
        format!(
            "{}. {}\nCategory: {} ({})\nPrice: {}\nDelivery: {}",
            position,
            self.name,
            self.category.label(),
            self.gender,
            self.price,
            self.delivery_estimate
        )
    }
}

/// One page of Product Finder results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub items: Vec<Product>,
    /// True if any products remain beyond this page.
    pub has_more: bool,
}

impl ProductPage {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// On-hand quantity of one SKU split across the two stock locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub store_qty: u32,
    pub stockroom_qty: u32,
}

impl StockLevel {
    pub fn total(&self) -> u32 {
        self.store_qty.saturating_add(self.stockroom_qty)
    }

    /// Combined stock across both locations meets the requested quantity.
    pub fn covers(&self, quantity: u32) -> bool {
        self.total() >= quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            sku: Sku::new("RUN-002").unwrap(),
            name: "Velocity Runner".to_string(),
            category: Category::Sports,
            gender: Gender::Men,
            price: Price::from_major(2499),
            image: "https://img.example/run-002.jpg".to_string(),
            delivery_estimate: "3-5 days".to_string(),
            available: true,
        }
    }

    #[test]
    fn category_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Sports).unwrap(), "\"sports\"");
        let parsed: Category = serde_json::from_str("\"boots\"").unwrap();
        assert_eq!(parsed, Category::Boots);
    }

    #[test]
    fn unisex_suits_everyone() {
        assert!(Gender::Unisex.suits(Gender::Men));
        assert!(Gender::Unisex.suits(Gender::Women));
        assert!(Gender::Women.suits(Gender::Unisex));
        assert!(!Gender::Women.suits(Gender::Men));
    }

    #[test]
    fn caption_carries_card_fields() {
        let caption = sample().caption(2);
        assert!(caption.starts_with("2. Velocity Runner"));
        assert!(caption.contains("sports shoes"));
        assert!(caption.contains("₹2499.00"));
        assert!(caption.contains("3-5 days"));
    }

    #[test]
    fn stock_level_sums_both_locations() {
        let stock = StockLevel {
            store_qty: 0,
            stockroom_qty: 1,
        };
        assert_eq!(stock.total(), 1);
        assert!(stock.covers(1));
        assert!(!stock.covers(2));
    }
}
