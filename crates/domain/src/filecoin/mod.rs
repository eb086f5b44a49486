//! Filecoin nodes running Lotus

pub mod defaults;
pub mod lotus;
pub mod spec;
pub mod validation;

pub use lotus::Lotus;
pub use spec::*;
