mod ledger;
mod money;
mod stock;
mod trade;

pub use ledger::*;
pub use money::*;
pub use stock::*;
pub use trade::*;
