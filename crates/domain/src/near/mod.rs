//! NEAR protocol nodes running nearcore

pub mod defaults;
pub mod nearcore;
pub mod spec;
pub mod validation;

pub use nearcore::Nearcore;
pub use spec::*;
