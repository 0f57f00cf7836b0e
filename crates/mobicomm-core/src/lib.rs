//! # mobicomm-core
//!
//! Core domain model for the MobiComm recharge purchase flow.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Purchase Flow                          │
//! │  ┌─────────────┐  ┌──────────────┐  ┌─────────────────────┐  │
//! │  │  Identity   │  │   Checkout   │  │  RechargeBackend    │  │
//! │  │  + Plans    │──│    State     │──│    (Strategy)       │  │
//! │  └─────────────┘  └──────────────┘  └─────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `RechargeBackend` trait keeps the REST backend swappable (HTTP in
//! production, `MockBackend` in tests) without changing flow logic. The
//! `CheckoutState` channel carries identity, plan selection and the
//! transaction outcome across screens; reading an absent key is an
//! explicit failure, never a silent default.

pub mod backend;
pub mod checkout;
pub mod error;
pub mod identity;
pub mod plan;

pub use backend::{
    InvoiceRequest, MobileValidation, MockBackend, RechargeBackend, RechargeRequest,
};
pub use checkout::{CheckoutState, CheckoutStore, MemoryCheckoutStore, StateKey, TransactionFields};
pub use error::{RechargeError, Result};
pub use identity::{MobileNumber, SessionIdentity, SessionToken};
pub use plan::{Category, Plan, PlanSelection};
