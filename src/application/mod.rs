// Application layer - the session controller and its read models.
// Presentation code talks to ExchangeService (or SharedExchange when events
// may arrive concurrently) and never touches LedgerState directly.

pub mod error;
pub mod reporting;
pub mod service;
pub mod shared;

pub use error::*;
pub use reporting::*;
pub use service::*;
pub use shared::*;
