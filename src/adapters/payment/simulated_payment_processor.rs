//! Simulated payment processor.
//!
//! Accepts every well-formed payment and returns a confirmation line.
//! `decline_all` flips it into a processor that declines everything, for
//! exercising the payment failure path end to end.

use async_trait::async_trait;

use crate::ports::{CollaboratorError, PaymentProcessor, PaymentReceipt, PaymentRequest};

#[derive(Debug, Clone, Default)]
pub struct SimulatedPaymentProcessor {
    decline_all: bool,
}

impl SimulatedPaymentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Processor that declines every payment.
    pub fn declining() -> Self {
        Self { decline_all: true }
    }

    pub fn with_decline_all(decline_all: bool) -> Self {
        Self { decline_all }
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedPaymentProcessor {
    async fn process_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentReceipt, CollaboratorError> {
        request.validate()?;

        if self.decline_all {
            tracing::debug!(order_id = %request.order_id, "Simulated payment declined");
            return Ok(PaymentReceipt {
                ok: false,
                confirmation_text: format!(
                    "Payment of {} for order {} was declined",
                    request.amount, request.order_id
                ),
            });
        }

        tracing::debug!(
            order_id = %request.order_id,
            amount = request.amount.minor_units(),
            method = %request.method,
            "Simulated payment accepted"
        );
        Ok(PaymentReceipt {
            ok: true,
            confirmation_text: format!(
                "Payment of {} via {} received for order {}",
                request.amount, request.method, request.order_id
            ),
        })
    }
}
