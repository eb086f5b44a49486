//! Aptos validators and full nodes

pub mod aptos_node;
pub mod defaults;
pub mod spec;
pub mod validation;

pub use aptos_node::AptosNode;
pub use spec::*;
