pub mod application;
pub mod cli;
pub mod domain;
pub mod io;

pub use application::{ExchangeService, SessionConfig, SharedExchange};
pub use domain::*;
