//! # mobicomm-payments
//!
//! Payment execution for the MobiComm recharge flow.
//!
//! The flow hands a checkout state and a chosen method to the executor;
//! the executor checks its preconditions against the state (failing
//! closed on anything absent or malformed), assembles the transaction
//! record with a fresh advisory id, submits it in one call, and writes
//! the outcome back into the state for the receipt screen.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mobicomm_payments::{PaymentExecutor, PaymentMethod};
//!
//! let executor = PaymentExecutor::new(backend);
//! let receipt = executor
//!     .submit(&state, &PaymentMethod::Upi { app: Some("GPay".into()) })
//!     .await?;
//!
//! // best-effort, detached; failures are logged only
//! let request = PaymentExecutor::invoice_request(&receipt, "user@example.com")?;
//! executor.send_invoice_detached(request);
//! ```

mod error;
mod executor;
mod method;
mod transaction;

pub use error::{PaymentError, Result};
pub use executor::{PaymentExecutor, PaymentReceipt};
pub use method::PaymentMethod;
pub use transaction::{PLAN_VALIDITY_DAYS, TransactionId, TransactionRecord};
