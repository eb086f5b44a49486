//! Stacks nodes anchored to a Bitcoin node

pub mod defaults;
pub mod spec;
pub mod stacks_node;
pub mod validation;

pub use spec::*;
pub use stacks_node::StacksNode;
