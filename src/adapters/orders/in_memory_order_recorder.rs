//! In-memory order log for tests and demos.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::ports::{CollaboratorError, OrderRecord, OrderRecorder, RecordAck};

#[derive(Default, Clone)]
pub struct InMemoryOrderRecorder {
    inner: Arc<Mutex<RecorderState>>,
}

#[derive(Default)]
struct RecorderState {
    orders: Vec<OrderRecord>,
    error: Option<CollaboratorError>,
    attempts: usize,
}

impl InMemoryOrderRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, RecorderState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fail every call until cleared.
    pub fn fail_with(&self, error: Option<CollaboratorError>) {
        self.state().error = error;
    }

    pub fn orders(&self) -> Vec<OrderRecord> {
        self.state().orders.clone()
    }

    /// Calls made, including failed ones.
    pub fn attempts(&self) -> usize {
        self.state().attempts
    }
}

#[async_trait]
impl OrderRecorder for InMemoryOrderRecorder {
    async fn record_order(&self, order: OrderRecord) -> Result<RecordAck, CollaboratorError> {
        order.validate()?;
        let mut state = self.state();
        state.attempts += 1;
        if let Some(error) = state.error.clone() {
            return Err(error);
        }
        state.orders.push(order);
        Ok(RecordAck { ok: true })
    }
}
