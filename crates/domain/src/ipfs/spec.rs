//! IPFS peer and cluster peer spec model

use crate::resources::Resources;
use crate::verbosity::Verbosity;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// IPFS peer
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "ipfs.nodesmith.io",
    version = "v1alpha1",
    kind = "Peer",
    namespaced,
    shortname = "ipfspeer"
)]
#[serde(rename_all = "camelCase")]
pub struct PeerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<Routing>,

    /// Configuration profiles applied on every start
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<Profile>,

    /// Configuration profiles applied when the repository is created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_profiles: Option<Vec<Profile>>,

    /// Secret holding the private network swarm key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swarm_key_secret_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Verbosity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Routing {
    #[default]
    Dht,
    DhtClient,
    DhtServer,
    None,
}

impl Routing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Routing::Dht => "dht",
            Routing::DhtClient => "dhtclient",
            Routing::DhtServer => "dhtserver",
            Routing::None => "none",
        }
    }
}

impl fmt::Display for Routing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kubo configuration profile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    Server,
    RandomPorts,
    DefaultDatastore,
    LocalDiscovery,
    Test,
    DefaultNetworking,
    Flatfs,
    Badgerds,
    LowPower,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Server => "server",
            Profile::RandomPorts => "random-ports",
            Profile::DefaultDatastore => "default-datastore",
            Profile::LocalDiscovery => "local-discovery",
            Profile::Test => "test",
            Profile::DefaultNetworking => "default-networking",
            Profile::Flatfs => "flatfs",
            Profile::Badgerds => "badgerds",
            Profile::LowPower => "lowpower",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// IPFS cluster peer, pinning through an IPFS peer API
#[derive(CustomResource, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "ipfs.nodesmith.io",
    version = "v1alpha1",
    kind = "ClusterPeer",
    namespaced,
    shortname = "clusterpeer"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterPeerSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Cluster peer id, paired with `privateKeySecretName`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_secret_name: Option<String>,

    /// Secret shared by every peer of the cluster
    pub cluster_secret_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus: Option<ClusterConsensus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted_peers: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bootstrap_peers: Vec<String>,

    /// IPFS peer API multiaddress
    pub peer_endpoint: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_factor_min: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_factor_max: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<Verbosity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClusterConsensus {
    #[default]
    Crdt,
    Raft,
}

impl ClusterConsensus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterConsensus::Crdt => "crdt",
            ClusterConsensus::Raft => "raft",
        }
    }
}

impl fmt::Display for ClusterConsensus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
