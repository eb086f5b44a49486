//! Ethereum 2 (consensus layer) beacon nodes and validator clients
//!
//! Every client ships both a beacon node and a validator client; each is a
//! separate strategy keyed by workload.

pub mod defaults;
pub mod lighthouse;
pub mod nimbus;
pub mod prysm;
pub mod spec;
pub mod teku;
pub mod validation;

pub use spec::*;

use crate::rendering::{Layout, SECRET_PASSWORD, StrategyRegistry};
use crate::shared_kernel::RenderError;

/// Key of the keystore file in a keystore secret
pub const SECRET_KEYSTORE: &str = "keystore";

pub fn register_strategies(registry: &mut StrategyRegistry) {
    registry
        .register(teku::TekuBeaconNode)
        .register(teku::TekuValidator)
        .register(prysm::PrysmBeaconNode)
        .register(prysm::PrysmValidator)
        .register(lighthouse::LighthouseBeaconNode)
        .register(lighthouse::LighthouseValidator)
        .register(nimbus::NimbusBeaconNode)
        .register(nimbus::NimbusValidator);
}

/// Network a client joins; an empty one has nothing to select
fn network(network: &str) -> Result<&str, RenderError> {
    if network.is_empty() {
        return Err(RenderError::MissingField {
            field: "spec.network",
        });
    }
    Ok(network)
}

/// Keystore file and its password file
fn keystore_files(layout: &Layout<'_>, keystore: &Keystore) -> (String, String) {
    (
        layout.secret_file(&keystore.secret_name, SECRET_KEYSTORE),
        layout.secret_file(&keystore.secret_name, SECRET_PASSWORD),
    )
}
