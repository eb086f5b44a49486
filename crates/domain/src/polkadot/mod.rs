//! Polkadot and its sister relay chains

pub mod defaults;
pub mod polkadot_node;
pub mod spec;
pub mod validation;

pub use polkadot_node::PolkadotNode;
pub use spec::*;
