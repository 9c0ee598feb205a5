//! Order Recorder port - append-only order log.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::CollaboratorError;
use crate::domain::conversation::Pincode;
use crate::domain::foundation::{OrderId, Sku, Timestamp, ValidationError};

#[async_trait]
pub trait OrderRecorder: Send + Sync {
    /// Appends `order` to the record store.
    async fn record_order(&self, order: OrderRecord) -> Result<RecordAck, CollaboratorError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub sku: Sku,
    pub qty: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub items: Vec<OrderLine>,
    pub address: String,
    pub pincode: Pincode,
    pub placed_at: Timestamp,
}

impl OrderRecord {
    /// Single-line order for one unit of `sku`.
    pub fn single(
        order_id: OrderId,
        sku: Sku,
        address: impl Into<String>,
        pincode: Pincode,
    ) -> Result<Self, ValidationError> {
        let record = Self {
            order_id,
            items: vec![OrderLine { sku, qty: 1 }],
            address: address.into(),
            pincode,
            placed_at: Timestamp::now(),
        };
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.items.is_empty() {
            return Err(ValidationError::empty_field("items"));
        }
        if let Some(line) = self.items.iter().find(|line| line.qty == 0) {
            return Err(ValidationError::invalid_format(
                "items",
                format!("quantity for {} must be at least 1", line.sku),
            ));
        }
        if self.address.trim().is_empty() {
            return Err(ValidationError::empty_field("address"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordAck {
    pub ok: bool,
}
