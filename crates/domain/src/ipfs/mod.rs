//! IPFS peers (kubo) and IPFS cluster peers

pub mod cluster;
pub mod defaults;
pub mod kubo;
pub mod spec;
pub mod validation;

pub use cluster::IpfsClusterService;
pub use kubo::Kubo;
pub use spec::*;
