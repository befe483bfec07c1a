use thiserror::Error;

use crate::domain::{CatalogError, Cents, LedgerError, Shares};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Insufficient funds: order costs {required}, available {available}")]
    InsufficientFunds { required: Cents, available: Cents },

    #[error("Insufficient shares of {symbol}: requested {requested}, owned {owned}")]
    InsufficientShares {
        symbol: String,
        owned: Shares,
        requested: Shares,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds {
                required,
                available,
            } => AppError::InsufficientFunds {
                required,
                available,
            },
            LedgerError::InsufficientShares {
                symbol,
                owned,
                requested,
            } => AppError::InsufficientShares {
                symbol,
                owned,
                requested,
            },
        }
    }
}
