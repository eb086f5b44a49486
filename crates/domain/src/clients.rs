//! Protocols, client implementations and the keys that identify them

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Blockchain protocol families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Ethereum,
    Ethereum2,
    Bitcoin,
    Filecoin,
    Ipfs,
    Near,
    Stacks,
    Aptos,
    Polkadot,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Ethereum => "ethereum",
            Protocol::Ethereum2 => "ethereum2",
            Protocol::Bitcoin => "bitcoin",
            Protocol::Filecoin => "filecoin",
            Protocol::Ipfs => "ipfs",
            Protocol::Near => "near",
            Protocol::Stacks => "stacks",
            Protocol::Aptos => "aptos",
            Protocol::Polkadot => "polkadot",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ethereum 1 execution clients
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum EthereumClient {
    #[default]
    Besu,
    Geth,
    Parity,
}

impl EthereumClient {
    pub fn as_str(&self) -> &'static str {
        match self {
            EthereumClient::Besu => "besu",
            EthereumClient::Geth => "geth",
            EthereumClient::Parity => "parity",
        }
    }
}

/// Ethereum 2 consensus clients, shared by beacon nodes and validators
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Eth2Client {
    #[default]
    Teku,
    Prysm,
    Lighthouse,
    Nimbus,
}

impl Eth2Client {
    pub fn as_str(&self) -> &'static str {
        match self {
            Eth2Client::Teku => "teku",
            Eth2Client::Prysm => "prysm",
            Eth2Client::Lighthouse => "lighthouse",
            Eth2Client::Nimbus => "nimbus",
        }
    }
}

/// Identifies one client implementation of one workload kind.
///
/// Protocols with a single implementation still get their own variant so
/// the strategy registry can be keyed uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKey {
    Ethereum(EthereumClient),
    BeaconNode(Eth2Client),
    Validator(Eth2Client),
    Bitcoin,
    Filecoin,
    IpfsPeer,
    IpfsClusterPeer,
    Near,
    Stacks,
    Aptos,
    Polkadot,
}

impl ClientKey {
    /// Every client the crate knows how to render
    pub const ALL: [ClientKey; 19] = [
        ClientKey::Ethereum(EthereumClient::Besu),
        ClientKey::Ethereum(EthereumClient::Geth),
        ClientKey::Ethereum(EthereumClient::Parity),
        ClientKey::BeaconNode(Eth2Client::Teku),
        ClientKey::BeaconNode(Eth2Client::Prysm),
        ClientKey::BeaconNode(Eth2Client::Lighthouse),
        ClientKey::BeaconNode(Eth2Client::Nimbus),
        ClientKey::Validator(Eth2Client::Teku),
        ClientKey::Validator(Eth2Client::Prysm),
        ClientKey::Validator(Eth2Client::Lighthouse),
        ClientKey::Validator(Eth2Client::Nimbus),
        ClientKey::Bitcoin,
        ClientKey::Filecoin,
        ClientKey::IpfsPeer,
        ClientKey::IpfsClusterPeer,
        ClientKey::Near,
        ClientKey::Stacks,
        ClientKey::Aptos,
        ClientKey::Polkadot,
    ];

    pub fn protocol(&self) -> Protocol {
        match self {
            ClientKey::Ethereum(_) => Protocol::Ethereum,
            ClientKey::BeaconNode(_) | ClientKey::Validator(_) => Protocol::Ethereum2,
            ClientKey::Bitcoin => Protocol::Bitcoin,
            ClientKey::Filecoin => Protocol::Filecoin,
            ClientKey::IpfsPeer | ClientKey::IpfsClusterPeer => Protocol::Ipfs,
            ClientKey::Near => Protocol::Near,
            ClientKey::Stacks => Protocol::Stacks,
            ClientKey::Aptos => Protocol::Aptos,
            ClientKey::Polkadot => Protocol::Polkadot,
        }
    }

    /// Client implementation name, as used in validation messages
    pub fn variant(&self) -> &'static str {
        match self {
            ClientKey::Ethereum(client) => client.as_str(),
            ClientKey::BeaconNode(client) | ClientKey::Validator(client) => client.as_str(),
            ClientKey::Bitcoin => "bitcoin-core",
            ClientKey::Filecoin => "lotus",
            ClientKey::IpfsPeer => "kubo",
            ClientKey::IpfsClusterPeer => "ipfs-cluster",
            ClientKey::Near => "nearcore",
            ClientKey::Stacks => "stacks-node",
            ClientKey::Aptos => "aptos-node",
            ClientKey::Polkadot => "polkadot",
        }
    }

    /// Workload kind, as used in render error messages
    pub fn workload(&self) -> &'static str {
        match self {
            ClientKey::Ethereum(_) => "ethereum node",
            ClientKey::BeaconNode(_) => "beacon node",
            ClientKey::Validator(_) => "validator",
            ClientKey::Bitcoin => "bitcoin node",
            ClientKey::Filecoin => "filecoin node",
            ClientKey::IpfsPeer => "ipfs peer",
            ClientKey::IpfsClusterPeer => "ipfs cluster peer",
            ClientKey::Near => "near node",
            ClientKey::Stacks => "stacks node",
            ClientKey::Aptos => "aptos node",
            ClientKey::Polkadot => "polkadot node",
        }
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.variant(), self.workload())
    }
}
