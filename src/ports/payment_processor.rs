//! Payment Processor port.
//!
//! A declined payment is a receipt with `ok = false`; an `Err` means the
//! processor itself could not be reached or answered badly. The order
//! pipeline treats both as a payment failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::CollaboratorError;
use crate::domain::foundation::{OrderId, Price, ValidationError};

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn process_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentReceipt, CollaboratorError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub amount: Price,
    /// Fixed method tag, e.g. "UPI".
    pub method: String,
}

impl PaymentRequest {
    pub fn new(
        order_id: OrderId,
        amount: Price,
        method: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let request = Self {
            order_id,
            amount,
            method: method.into(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.order_id.as_str().is_empty() {
            return Err(ValidationError::empty_field("order_id"));
        }
        if self.amount.is_zero() {
            return Err(ValidationError::out_of_range("amount", 1, i64::MAX, 0));
        }
        if self.method.trim().is_empty() {
            return Err(ValidationError::empty_field("method"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub ok: bool,
    pub confirmation_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_processor_is_object_safe() {
        fn _accepts_dyn(_processor: &dyn PaymentProcessor) {}
    }

    #[test]
    fn zero_amount_is_rejected() {
        let result = PaymentRequest::new(OrderId::generate(), Price::from_minor(0), "UPI");
        assert!(result.is_err());
    }

    #[test]
    fn blank_method_is_rejected() {
        let result = PaymentRequest::new(OrderId::generate(), Price::from_major(10), "  ");
        assert!(matches!(result, Err(ValidationError::EmptyField { .. })));
    }
}
