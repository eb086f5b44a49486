//! Nodesmith shared kernel
//!
//! Ambient pieces used by every other crate: the operator configuration
//! layer and Kubernetes resource quantity parsing.

pub mod config;
pub mod quantity;

pub use quantity::{Quantity, QuantityError};
