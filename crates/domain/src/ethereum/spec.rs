//! Ethereum network spec model

use crate::clients::EthereumClient;
use crate::resources::Resources;
use crate::verbosity::Verbosity;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Network identity used for private networks when picking image tags
pub const PRIVATE_NETWORK: &str = "private";

/// An Ethereum network: either a public network to join or a private one
/// described by its genesis block, plus the nodes that run it.
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "ethereum.nodesmith.io",
    version = "v1alpha1",
    kind = "Network",
    namespaced,
    shortname = "ethnet"
)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    /// Public network to join (`mainnet`, `goerli`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join: Option<String>,

    /// Consensus engine of a private network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus: Option<Consensus>,

    /// Network id of a private network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genesis: Option<Genesis>,

    #[serde(default)]
    pub highly_available: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology_key: Option<String>,

    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl NetworkSpec {
    /// Joined network name, or `private`
    pub fn network_name(&self) -> &str {
        self.join.as_deref().unwrap_or(PRIVATE_NETWORK)
    }

    pub fn is_private(&self) -> bool {
        self.join.is_none()
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.name == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Consensus {
    /// Proof of work (ethash)
    Pow,
    /// Proof of authority (clique)
    Poa,
    /// Istanbul BFT 2.0
    Ibft2,
}

impl Consensus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Consensus::Pow => "pow",
            Consensus::Poa => "poa",
            Consensus::Ibft2 => "ibft2",
        }
    }
}

impl fmt::Display for Consensus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    Fast,
    Full,
    Light,
    Snap,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::Fast => "fast",
            SyncMode::Full => "full",
            SyncMode::Light => "light",
            SyncMode::Snap => "snap",
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON-RPC API namespaces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Api {
    Admin,
    Clique,
    Debug,
    Eea,
    Eth,
    Ibft,
    Miner,
    Net,
    Perm,
    Plugins,
    Priv,
    Txpool,
    Web3,
}

impl Api {
    pub fn as_str(&self) -> &'static str {
        match self {
            Api::Admin => "admin",
            Api::Clique => "clique",
            Api::Debug => "debug",
            Api::Eea => "eea",
            Api::Eth => "eth",
            Api::Ibft => "ibft",
            Api::Miner => "miner",
            Api::Net => "net",
            Api::Perm => "perm",
            Api::Plugins => "plugins",
            Api::Priv => "priv",
            Api::Txpool => "txpool",
            Api::Web3 => "web3",
        }
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account imported into the node keystore, used for mining/signing
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportedAccount {
    pub private_key_secret_name: String,
    pub password_secret_name: String,
}

/// One node of the network
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<EthereumClient>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Node is a bootnode other nodes discover the network through
    #[serde(default)]
    pub bootnode: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_private_key_secret_name: Option<String>,

    /// enode URLs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bootnodes: Vec<String>,

    /// enode URLs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub static_nodes: Vec<String>,

    #[serde(default)]
    pub miner: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import: Option<ImportedAccount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2p_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_mode: Option<SyncMode>,

    #[serde(default)]
    pub rpc: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_port: Option<u16>,

    #[serde(default, rename = "rpcAPI", skip_serializing_if = "Option::is_none")]
    pub rpc_api: Option<Vec<Api>>,

    #[serde(default)]
    pub ws: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_port: Option<u16>,

    #[serde(default, rename = "wsAPI", skip_serializing_if = "Option::is_none")]
    pub ws_api: Option<Vec<Api>>,

    #[serde(default)]
    pub graphql: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql_port: Option<u16>,

    /// Virtual hosts allowed to reach rpc, ws and graphql servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors_domains: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Verbosity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

impl Node {
    pub fn client(&self) -> EthereumClient {
        self.client.unwrap_or_default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Genesis block of a private network
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Genesis {
    pub chain_id: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinbase: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mix_hash: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forks: Option<Forks>,

    /// Pre-funded accounts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<Account>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethash: Option<Ethash>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clique: Option<Clique>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ibft2: Option<Ibft2>,
}

/// Fork activation block numbers
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Forks {
    #[serde(default)]
    pub homestead: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dao: Option<u64>,
    #[serde(default)]
    pub eip150: u64,
    #[serde(default)]
    pub eip155: u64,
    #[serde(default)]
    pub eip158: u64,
    #[serde(default)]
    pub byzantium: u64,
    #[serde(default)]
    pub constantinople: u64,
    #[serde(default)]
    pub petersburg: u64,
    #[serde(default)]
    pub istanbul: u64,
    #[serde(default, rename = "muirglacier")]
    pub muir_glacier: u64,
    #[serde(default)]
    pub berlin: u64,
    #[serde(default)]
    pub london: u64,
}

impl Forks {
    /// Forks in activation order; `dao` is `None` when not scheduled
    pub fn in_order(&self) -> [(&'static str, Option<u64>); 12] {
        [
            ("homestead", Some(self.homestead)),
            ("dao", self.dao),
            ("eip150", Some(self.eip150)),
            ("eip155", Some(self.eip155)),
            ("eip158", Some(self.eip158)),
            ("byzantium", Some(self.byzantium)),
            ("constantinople", Some(self.constantinople)),
            ("petersburg", Some(self.petersburg)),
            ("istanbul", Some(self.istanbul)),
            ("muirglacier", Some(self.muir_glacier)),
            ("berlin", Some(self.berlin)),
            ("london", Some(self.london)),
        ]
    }
}

/// Pre-funded genesis account
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub storage: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ethash {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_difficulty: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Clique {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_period: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch_length: Option<u64>,

    #[serde(default)]
    pub signers: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ibft2 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_period: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_queue_limit: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_message_limit: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_messages_limit: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_messages_max_distance: Option<u64>,

    #[serde(default)]
    pub validators: Vec<String>,
}
