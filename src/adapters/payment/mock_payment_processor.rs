//! Mock payment processor for testing.
//!
//! Provides a configurable `PaymentProcessor` stand-in for unit and
//! integration tests. Supports:
//! - Declined receipts
//! - Error injection
//! - Call tracking

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::ports::{CollaboratorError, PaymentProcessor, PaymentReceipt, PaymentRequest};

/// Mock payment processor for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProcessor::new();
///
/// // Decline the next payments
/// mock.set_declined(true);
///
/// // Inject errors
/// mock.set_error(CollaboratorError::unavailable("gateway down"));
///
/// // Assert on calls
/// assert_eq!(mock.call_count(), 1);
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentProcessor {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Return `ok = false` receipts.
    declined: bool,

    /// Error to return on the next call (consumed).
    next_error: Option<CollaboratorError>,

    /// Requests seen, in order.
    calls: Vec<PaymentRequest>,
}

impl MockPaymentProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_declined(&self, declined: bool) {
        self.state().declined = declined;
    }

    /// Fail the next call only.
    pub fn set_error(&self, error: CollaboratorError) {
        self.state().next_error = Some(error);
    }

    pub fn calls(&self) -> Vec<PaymentRequest> {
        self.state().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }
}

#[async_trait]
impl PaymentProcessor for MockPaymentProcessor {
    async fn process_payment(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentReceipt, CollaboratorError> {
        let mut state = self.state();
        state.calls.push(request.clone());
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        Ok(PaymentReceipt {
            ok: !state.declined,
            confirmation_text: if state.declined {
                "mock payment declined".to_string()
            } else {
                format!("mock payment {} ok", request.order_id)
            },
        })
    }
}
