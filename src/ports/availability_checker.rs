//! Availability Checker port - stock check for one SKU at a pincode.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::CollaboratorError;
use crate::domain::conversation::Pincode;
use crate::domain::foundation::{Sku, ValidationError};

#[async_trait]
pub trait AvailabilityChecker: Send + Sync {
    /// Reports whether combined stock across locations meets the quantity.
    ///
    /// An unknown SKU is a report with `ok = false`, not an error.
    async fn check_availability(
        &self,
        request: AvailabilityRequest,
    ) -> Result<AvailabilityReport, CollaboratorError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    pub sku: Sku,
    pub quantity: u32,
    pub pincode: Pincode,
}

impl AvailabilityRequest {
    pub fn new(sku: Sku, quantity: u32, pincode: Pincode) -> Result<Self, ValidationError> {
        let request = Self {
            sku,
            quantity,
            pincode,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sku.as_str().trim().is_empty() {
            return Err(ValidationError::empty_field("sku"));
        }
        if self.quantity == 0 {
            return Err(ValidationError::out_of_range(
                "quantity",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityReport {
    /// False if the SKU is unknown to the inventory.
    pub ok: bool,
    pub available: bool,
    pub name: String,
    pub store_qty: u32,
    pub stockroom_qty: u32,
}

impl AvailabilityReport {
    pub fn unknown_sku(sku: &Sku) -> Self {
        Self {
            ok: false,
            available: false,
            name: sku.to_string(),
            store_qty: 0,
            stockroom_qty: 0,
        }
    }

    /// In stock and confirmed by the inventory.
    pub fn can_fulfil(&self) -> bool {
        self.ok && self.available
    }
}
