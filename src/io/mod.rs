mod catalog;
mod export;

pub use catalog::*;
pub use export::*;
