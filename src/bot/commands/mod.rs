//! Discord command implementations.

/// Staff commands managing the GPT whitelist
pub mod whitelist;

pub use whitelist::*;
