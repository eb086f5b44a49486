//! Bitcoin nodes running Bitcoin Core

pub mod bitcoin_core;
pub mod defaults;
pub mod spec;
pub mod validation;

pub use bitcoin_core::BitcoinCore;
pub use spec::*;
