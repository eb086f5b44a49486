//! Capability Matrix
//!
//! Static, read-only table of what every client supports: optional
//! subsystems, mandatory-on features, accepted log levels and the public
//! networks it can join. Built once on first access and never mutated.

use crate::clients::{ClientKey, Eth2Client, EthereumClient};
use crate::shared_kernel::{FieldError, FieldErrors, FieldPath};
use crate::verbosity::Verbosity;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Optional subsystems and behaviours a client may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Rpc,
    Ws,
    GraphQl,
    Rest,
    Grpc,
    Api,
    ProofOfWork,
    ProofOfAuthority,
    IstanbulBft,
    FixedDifficulty,
    FastSync,
    FullSync,
    LightSync,
    SnapSync,
    CheckpointSync,
    MultipleEth1Endpoints,
    MultipleBeaconEndpoints,
    WalletPassword,
}

/// Support level of a feature for one client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Support {
    #[default]
    Unsupported,
    Optional,
    Mandatory,
}

/// Capabilities of a single client
#[derive(Debug, Clone, Default)]
pub struct ClientCapabilities {
    features: HashMap<Feature, Support>,
    log_levels: Vec<Verbosity>,
    networks: Vec<&'static str>,
}

impl ClientCapabilities {
    fn new() -> Self {
        Self::default()
    }

    fn optional(mut self, features: &[Feature]) -> Self {
        for feature in features {
            self.features.insert(*feature, Support::Optional);
        }
        self
    }

    fn mandatory(mut self, features: &[Feature]) -> Self {
        for feature in features {
            self.features.insert(*feature, Support::Mandatory);
        }
        self
    }

    fn log_levels(mut self, levels: &[Verbosity]) -> Self {
        self.log_levels = levels.to_vec();
        self
    }

    fn networks(mut self, networks: &[&'static str]) -> Self {
        self.networks = networks.to_vec();
        self
    }

    pub fn support(&self, feature: Feature) -> Support {
        self.features.get(&feature).copied().unwrap_or_default()
    }

    pub fn supports(&self, feature: Feature) -> bool {
        self.support(feature) != Support::Unsupported
    }

    pub fn is_mandatory(&self, feature: Feature) -> bool {
        self.support(feature) == Support::Mandatory
    }

    pub fn supports_log_level(&self, level: Verbosity) -> bool {
        self.log_levels.contains(&level)
    }

    pub fn log_levels_supported(&self) -> &[Verbosity] {
        &self.log_levels
    }

    /// Whether the client can join a named public network.
    ///
    /// Clients without a network list accept any network name.
    pub fn supports_network(&self, network: &str) -> bool {
        self.networks.is_empty() || self.networks.contains(&network)
    }
}

use Feature::*;
use Verbosity as V;

const BESU_LOGS: &[Verbosity] = &[V::Off, V::Fatal, V::Error, V::Warn, V::Info, V::Debug, V::Trace, V::All];
const GETH_LOGS: &[Verbosity] = &[V::Off, V::Error, V::Warn, V::Info, V::Debug, V::Trace];
const PARITY_LOGS: &[Verbosity] = &[V::Error, V::Warn, V::Info, V::Debug, V::Trace];
const TEKU_LOGS: &[Verbosity] = &[V::Off, V::Fatal, V::Error, V::Warn, V::Info, V::Debug, V::Trace, V::All];
const PRYSM_LOGS: &[Verbosity] = &[V::Trace, V::Debug, V::Info, V::Warn, V::Error, V::Fatal, V::Panic];
const LIGHTHOUSE_LOGS: &[Verbosity] = &[V::Info, V::Debug, V::Trace, V::Warn, V::Error, V::Crit];
const NIMBUS_LOGS: &[Verbosity] = &[V::Trace, V::Debug, V::Info, V::Notice, V::Warn, V::Error, V::Fatal, V::None];
const GO_LOGS: &[Verbosity] = &[V::Error, V::Warn, V::Info, V::Debug];
const KUBO_LOGS: &[Verbosity] = &[V::Fatal, V::Panic, V::Error, V::Warn, V::Info, V::Debug];
const RUST_LOGS: &[Verbosity] = &[V::Error, V::Warn, V::Info, V::Debug, V::Trace];

static MATRIX: LazyLock<HashMap<ClientKey, ClientCapabilities>> = LazyLock::new(build_matrix);

static NO_CAPABILITIES: LazyLock<ClientCapabilities> = LazyLock::new(ClientCapabilities::default);

fn build_matrix() -> HashMap<ClientKey, ClientCapabilities> {
    let mut matrix = HashMap::new();

    // Ethereum execution clients
    matrix.insert(
        ClientKey::Ethereum(EthereumClient::Besu),
        ClientCapabilities::new()
            .optional(&[
                Rpc, Ws, GraphQl, ProofOfWork, ProofOfAuthority, IstanbulBft,
                FixedDifficulty, FastSync, FullSync,
            ])
            .log_levels(BESU_LOGS)
            .networks(&["mainnet", "ropsten", "rinkeby", "goerli", "sepolia", "classic", "mordor", "kotti"]),
    );
    matrix.insert(
        ClientKey::Ethereum(EthereumClient::Geth),
        ClientCapabilities::new()
            .optional(&[
                Rpc, Ws, GraphQl, ProofOfWork, ProofOfAuthority, FastSync, FullSync,
                LightSync, SnapSync,
            ])
            .log_levels(GETH_LOGS)
            .networks(&["mainnet", "ropsten", "rinkeby", "goerli", "sepolia"]),
    );
    matrix.insert(
        ClientKey::Ethereum(EthereumClient::Parity),
        ClientCapabilities::new()
            .optional(&[Rpc, Ws, ProofOfWork, ProofOfAuthority, FastSync, FullSync, LightSync])
            .log_levels(PARITY_LOGS)
            .networks(&["mainnet", "ropsten", "rinkeby", "goerli", "kovan", "classic", "mordor", "kotti"]),
    );

    // Ethereum 2 beacon nodes
    let eth2_networks: &[&'static str] = &["mainnet", "goerli", "prater", "sepolia", "holesky"];
    matrix.insert(
        ClientKey::BeaconNode(Eth2Client::Teku),
        ClientCapabilities::new()
            .optional(&[Rest, CheckpointSync, MultipleEth1Endpoints])
            .log_levels(TEKU_LOGS)
            .networks(eth2_networks),
    );
    matrix.insert(
        ClientKey::BeaconNode(Eth2Client::Prysm),
        ClientCapabilities::new()
            .mandatory(&[Rpc])
            .optional(&[Grpc, CheckpointSync, MultipleEth1Endpoints])
            .log_levels(PRYSM_LOGS)
            .networks(eth2_networks),
    );
    matrix.insert(
        ClientKey::BeaconNode(Eth2Client::Lighthouse),
        ClientCapabilities::new()
            .optional(&[Rest, CheckpointSync, MultipleEth1Endpoints])
            .log_levels(LIGHTHOUSE_LOGS)
            .networks(eth2_networks),
    );
    matrix.insert(
        ClientKey::BeaconNode(Eth2Client::Nimbus),
        ClientCapabilities::new()
            .optional(&[Rpc])
            .log_levels(NIMBUS_LOGS)
            .networks(eth2_networks),
    );

    // Ethereum 2 validator clients
    matrix.insert(
        ClientKey::Validator(Eth2Client::Teku),
        ClientCapabilities::new()
            .optional(&[MultipleBeaconEndpoints])
            .log_levels(TEKU_LOGS)
            .networks(eth2_networks),
    );
    matrix.insert(
        ClientKey::Validator(Eth2Client::Prysm),
        ClientCapabilities::new()
            .mandatory(&[WalletPassword])
            .log_levels(PRYSM_LOGS)
            .networks(eth2_networks),
    );
    matrix.insert(
        ClientKey::Validator(Eth2Client::Lighthouse),
        ClientCapabilities::new()
            .optional(&[MultipleBeaconEndpoints])
            .log_levels(LIGHTHOUSE_LOGS)
            .networks(eth2_networks),
    );
    matrix.insert(
        ClientKey::Validator(Eth2Client::Nimbus),
        ClientCapabilities::new()
            .log_levels(NIMBUS_LOGS)
            .networks(eth2_networks),
    );

    // Single-client protocols
    matrix.insert(
        ClientKey::Bitcoin,
        ClientCapabilities::new()
            .optional(&[Rpc])
            .networks(&["mainnet", "testnet"]),
    );
    matrix.insert(
        ClientKey::Filecoin,
        ClientCapabilities::new()
            .optional(&[Api])
            .log_levels(GO_LOGS)
            .networks(&["mainnet", "calibration", "devnet"]),
    );
    matrix.insert(
        ClientKey::IpfsPeer,
        ClientCapabilities::new().optional(&[Api]).log_levels(KUBO_LOGS),
    );
    matrix.insert(
        ClientKey::IpfsClusterPeer,
        ClientCapabilities::new().log_levels(GO_LOGS),
    );
    matrix.insert(
        ClientKey::Near,
        ClientCapabilities::new()
            .optional(&[Rpc])
            .networks(&["mainnet", "testnet", "betanet"]),
    );
    matrix.insert(
        ClientKey::Stacks,
        ClientCapabilities::new()
            .optional(&[Rpc])
            .networks(&["mainnet", "testnet"]),
    );
    matrix.insert(
        ClientKey::Aptos,
        ClientCapabilities::new()
            .optional(&[Api])
            .networks(&["devnet", "testnet", "mainnet"]),
    );
    matrix.insert(
        ClientKey::Polkadot,
        ClientCapabilities::new()
            .optional(&[Rpc, Ws, FullSync, FastSync])
            .log_levels(RUST_LOGS)
            .networks(&["polkadot", "kusama", "westend", "rococo"]),
    );

    matrix
}

/// Capabilities of a client; unknown clients support nothing
pub fn capabilities(key: ClientKey) -> &'static ClientCapabilities {
    MATRIX.get(&key).unwrap_or(&*NO_CAPABILITIES)
}

/// Checks a toggled feature against the matrix.
///
/// Enabling an unsupported feature and disabling a mandatory one are both
/// reported on `path`.
pub fn check_feature(
    errors: &mut FieldErrors,
    key: ClientKey,
    feature: Feature,
    enabled: bool,
    path: FieldPath,
    value: impl Serialize,
) {
    match capabilities(key).support(feature) {
        Support::Unsupported if enabled => errors.push(not_supported(key, path, value)),
        Support::Mandatory if !enabled => errors.push(FieldError::invalid(
            path,
            value,
            format!("can't be disabled in {} client", key.variant()),
        )),
        _ => {}
    }
}

/// Checks an optional log level against the client's accepted levels
pub fn check_log_level(
    errors: &mut FieldErrors,
    key: ClientKey,
    level: Option<Verbosity>,
    path: FieldPath,
) {
    if let Some(level) = level {
        if !capabilities(key).supports_log_level(level) {
            errors.push(not_supported(key, path, level));
        }
    }
}

/// Checks a public network name against the client's joinable networks
pub fn check_network(errors: &mut FieldErrors, key: ClientKey, network: &str, path: FieldPath) {
    if !network.is_empty() && !capabilities(key).supports_network(network) {
        errors.push(not_supported(key, path, network));
    }
}

/// The "not supported by <client> client" error
pub fn not_supported(key: ClientKey, path: FieldPath, value: impl Serialize) -> FieldError {
    FieldError::invalid(path, value, format!("not supported by {} client", key.variant()))
}
