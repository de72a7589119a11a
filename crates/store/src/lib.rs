//! Client-side core of the cassa point-of-sale tracker.
//!
//! The store is a thin client: it mirrors two remote collections
//! (transactions and service types) through a single cookie-carrying HTTP
//! transport, derives the dashboard aggregates from the transaction mirror,
//! and keeps the session state machine the navigation guard consults. The
//! remote API stays the system of record throughout; nothing here survives a
//! restart on purpose.

pub mod api;
pub mod nav;
pub mod resources;
pub mod session;
pub mod stats;

pub use api::{ApiClient, ApiError};
pub use nav::{NavDecision, Route, decide, navigate};
pub use resources::{
    FailurePolicy, InsertAt, Resource, ResourceStore, ServiceStore, TransactionStore,
};
pub use session::{Session, SessionState};
