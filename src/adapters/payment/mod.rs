//! Payment Processor adapters.
//!
//! - **SimulatedPaymentProcessor** - Accepts (or, when configured, declines) every payment
//! - **MockPaymentProcessor** - Scriptable processor with call tracking for tests

mod mock_payment_processor;
mod simulated_payment_processor;

pub use mock_payment_processor::MockPaymentProcessor;
pub use simulated_payment_processor::SimulatedPaymentProcessor;
