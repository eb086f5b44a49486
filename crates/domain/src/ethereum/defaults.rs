//! Ethereum network defaults

use super::chains::MAINNET;
use super::spec::{Api, Consensus, Genesis, NetworkSpec, Node, SyncMode};
use crate::capabilities::{Feature, capabilities};
use crate::clients::ClientKey;
use crate::defaults::{Defaulter, DefaultingContext};
use crate::resources::{ResourceDefaults, default_resources};
use crate::verbosity::Verbosity;

pub const DEFAULT_TOPOLOGY_KEY: &str = "topology.kubernetes.io/zone";

pub const DEFAULT_P2P_PORT: u16 = 30303;
pub const DEFAULT_RPC_PORT: u16 = 8545;
pub const DEFAULT_WS_PORT: u16 = 8546;
pub const DEFAULT_GRAPHQL_PORT: u16 = 8547;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_API: [Api; 3] = [Api::Web3, Api::Net, Api::Eth];

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
pub const ZERO_HASH: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";
pub const DEFAULT_DIFFICULTY: &str = "0x1";
pub const DEFAULT_GAS_LIMIT: &str = "0x47b760";
pub const DEFAULT_NONCE: &str = "0x0";
pub const DEFAULT_TIMESTAMP: &str = "0x0";

pub const DEFAULT_FIXED_DIFFICULTY: u64 = 1000;
pub const DEFAULT_BLOCK_PERIOD: u64 = 15;
pub const DEFAULT_EPOCH_LENGTH: u64 = 30000;
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 10;
pub const DEFAULT_MESSAGE_QUEUE_LIMIT: u64 = 1000;
pub const DEFAULT_DUPLICATE_MESSAGE_LIMIT: u64 = 100;
pub const DEFAULT_FUTURE_MESSAGES_LIMIT: u64 = 1000;
pub const DEFAULT_FUTURE_MESSAGES_MAX_DISTANCE: u64 = 10;

const RESOURCES: ResourceDefaults = ResourceDefaults {
    cpu: "2",
    cpu_limit: "3",
    memory: "4Gi",
    memory_limit: "6Gi",
    storage: "10Gi",
};

fn resource_defaults(join: Option<&str>) -> ResourceDefaults {
    match join {
        Some(MAINNET) => RESOURCES.with_storage("1Ti"),
        Some(_) => RESOURCES.with_storage("200Gi"),
        None => RESOURCES,
    }
}

impl Defaulter for NetworkSpec {
    fn apply_defaults(&mut self, ctx: &DefaultingContext) {
        self.apply_network_defaults(ctx, None);
    }

    fn apply_update_defaults(&mut self, ctx: &DefaultingContext, old: &Self) {
        self.apply_network_defaults(ctx, Some(old));
    }
}

impl NetworkSpec {
    /// Nodes already in `old` keep the storage class they were admitted with
    fn apply_network_defaults(&mut self, ctx: &DefaultingContext, old: Option<&Self>) {
        self.topology_key
            .get_or_insert_with(|| DEFAULT_TOPOLOGY_KEY.to_string());

        for node in &mut self.nodes {
            let join = self.join.as_deref();
            match old.and_then(|old| old.node(&node.name)) {
                Some(previous) => node
                    .apply_network_defaults(join, &ctx.admitted_with(previous.resources.as_ref())),
                None => node.apply_network_defaults(join, ctx),
            }
        }

        if let Some(genesis) = self.genesis.as_mut() {
            self.id.get_or_insert(genesis.chain_id);

            let fixed_difficulty = self.nodes.iter().all(|node| {
                capabilities(ClientKey::Ethereum(node.client())).supports(Feature::FixedDifficulty)
            });
            genesis.apply_defaults(self.consensus, fixed_difficulty);
        }
    }
}

impl Node {
    fn apply_network_defaults(&mut self, join: Option<&str>, ctx: &DefaultingContext) {
        let client = *self.client.get_or_insert_with(Default::default);

        self.p2p_port.get_or_insert(DEFAULT_P2P_PORT);
        self.sync_mode.get_or_insert(if join.is_some() {
            SyncMode::Full
        } else {
            SyncMode::Fast
        });
        self.logging.get_or_insert(Verbosity::Info);

        if self.rpc {
            self.rpc_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.rpc_port.get_or_insert(DEFAULT_RPC_PORT);
            self.rpc_api.get_or_insert_with(|| DEFAULT_API.to_vec());
        }

        if self.ws {
            self.ws_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.ws_port.get_or_insert(DEFAULT_WS_PORT);
            self.ws_api.get_or_insert_with(|| DEFAULT_API.to_vec());
        }

        if self.graphql {
            self.graphql_host.get_or_insert_with(|| DEFAULT_HOST.to_string());
            self.graphql_port.get_or_insert(DEFAULT_GRAPHQL_PORT);
        }

        if self.rpc || self.ws || self.graphql {
            self.hosts.get_or_insert_with(|| vec!["*".to_string()]);
            self.cors_domains.get_or_insert_with(|| vec!["*".to_string()]);
        }

        default_resources(&mut self.resources, &resource_defaults(join), ctx.storage_class());

        let network = join.unwrap_or(super::spec::PRIVATE_NETWORK);
        self.image
            .get_or_insert_with(|| ctx.image(ClientKey::Ethereum(client), network));
    }
}

impl Genesis {
    fn apply_defaults(&mut self, consensus: Option<Consensus>, fixed_difficulty: bool) {
        self.coinbase.get_or_insert_with(|| ZERO_ADDRESS.to_string());
        self.difficulty.get_or_insert_with(|| DEFAULT_DIFFICULTY.to_string());
        self.mix_hash.get_or_insert_with(|| ZERO_HASH.to_string());
        self.gas_limit.get_or_insert_with(|| DEFAULT_GAS_LIMIT.to_string());
        self.nonce.get_or_insert_with(|| DEFAULT_NONCE.to_string());
        self.timestamp.get_or_insert_with(|| DEFAULT_TIMESTAMP.to_string());
        self.forks.get_or_insert_with(Default::default);

        match consensus {
            Some(Consensus::Pow) => {
                let ethash = self.ethash.get_or_insert_with(Default::default);
                if fixed_difficulty {
                    ethash.fixed_difficulty.get_or_insert(DEFAULT_FIXED_DIFFICULTY);
                }
            }
            Some(Consensus::Poa) => {
                let clique = self.clique.get_or_insert_with(Default::default);
                clique.block_period.get_or_insert(DEFAULT_BLOCK_PERIOD);
                clique.epoch_length.get_or_insert(DEFAULT_EPOCH_LENGTH);
            }
            Some(Consensus::Ibft2) => {
                let ibft2 = self.ibft2.get_or_insert_with(Default::default);
                ibft2.block_period.get_or_insert(DEFAULT_BLOCK_PERIOD);
                ibft2.epoch_length.get_or_insert(DEFAULT_EPOCH_LENGTH);
                ibft2.request_timeout.get_or_insert(DEFAULT_REQUEST_TIMEOUT);
                ibft2.message_queue_limit.get_or_insert(DEFAULT_MESSAGE_QUEUE_LIMIT);
                ibft2
                    .duplicate_message_limit
                    .get_or_insert(DEFAULT_DUPLICATE_MESSAGE_LIMIT);
                ibft2.future_messages_limit.get_or_insert(DEFAULT_FUTURE_MESSAGES_LIMIT);
                ibft2
                    .future_messages_max_distance
                    .get_or_insert(DEFAULT_FUTURE_MESSAGES_MAX_DISTANCE);
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::EthereumClient;
    use crate::defaults::defaulted;

    fn joining(network: &str) -> NetworkSpec {
        NetworkSpec {
            join: Some(network.to_string()),
            nodes: vec![Node::named("node-1")],
            ..Default::default()
        }
    }

    fn private(consensus: Consensus) -> NetworkSpec {
        NetworkSpec {
            consensus: Some(consensus),
            genesis: Some(Genesis {
                chain_id: 55555,
                ..Default::default()
            }),
            nodes: vec![Node::named("node-1")],
            ..Default::default()
        }
    }

    #[test]
    fn test_joining_network_defaults() {
        let spec = defaulted(joining("rinkeby"), &DefaultingContext::default());
        let node = &spec.nodes[0];

        assert_eq!(node.p2p_port, Some(30303));
        assert_eq!(node.sync_mode, Some(SyncMode::Full));
        assert_eq!(node.client, Some(EthereumClient::Besu));
        assert_eq!(spec.topology_key.as_deref(), Some(DEFAULT_TOPOLOGY_KEY));
        assert_eq!(
            node.resources.as_ref().and_then(|r| r.storage.as_deref()),
            Some("200Gi")
        );
        assert!(spec.id.is_none());
    }

    #[test]
    fn test_private_network_defaults_genesis() {
        let spec = defaulted(private(Consensus::Pow), &DefaultingContext::default());
        let genesis = spec.genesis.as_ref().unwrap();

        assert_eq!(spec.id, Some(55555));
        assert_eq!(genesis.coinbase.as_deref(), Some(ZERO_ADDRESS));
        assert_eq!(genesis.gas_limit.as_deref(), Some("0x47b760"));
        assert_eq!(genesis.forks.as_ref().unwrap().dao, None);
        assert_eq!(
            genesis.ethash.as_ref().unwrap().fixed_difficulty,
            Some(DEFAULT_FIXED_DIFFICULTY)
        );
        assert_eq!(spec.nodes[0].sync_mode, Some(SyncMode::Fast));
    }

    #[test]
    fn test_fixed_difficulty_skipped_when_a_client_lacks_support() {
        let mut spec = private(Consensus::Pow);
        spec.nodes.push(Node {
            client: Some(EthereumClient::Geth),
            ..Node::named("node-2")
        });

        let spec = defaulted(spec, &DefaultingContext::default());
        let ethash = spec.genesis.unwrap().ethash.unwrap();
        assert_eq!(ethash.fixed_difficulty, None);
    }

    #[test]
    fn test_ibft2_defaults() {
        let spec = defaulted(private(Consensus::Ibft2), &DefaultingContext::default());
        let genesis = spec.genesis.unwrap();
        let ibft2 = genesis.ibft2.unwrap();

        assert!(genesis.ethash.is_none());
        assert_eq!(ibft2.block_period, Some(15));
        assert_eq!(ibft2.request_timeout, Some(10));
        assert_eq!(ibft2.duplicate_message_limit, Some(100));
        assert_eq!(ibft2.future_messages_max_distance, Some(10));
    }

    #[test]
    fn test_rpc_sub_defaults_only_when_enabled() {
        let mut spec = joining("mainnet");
        spec.nodes.push(Node {
            rpc: true,
            ..Node::named("node-2")
        });

        let spec = defaulted(spec, &DefaultingContext::default());
        let (off, on) = (&spec.nodes[0], &spec.nodes[1]);

        assert!(off.rpc_port.is_none() && off.rpc_host.is_none() && off.hosts.is_none());
        assert_eq!(on.rpc_port, Some(8545));
        assert_eq!(on.rpc_api.as_deref(), Some(&DEFAULT_API[..]));
        assert_eq!(on.hosts, Some(vec!["*".to_string()]));
        assert!(on.ws_port.is_none());
        assert_eq!(
            on.resources.as_ref().and_then(|r| r.storage.as_deref()),
            Some("1Ti")
        );
    }

    #[test]
    fn test_defaulting_is_idempotent() {
        let ctx = DefaultingContext::default();
        let once = defaulted(private(Consensus::Poa), &ctx);
        let twice = defaulted(once.clone(), &ctx);
        assert_eq!(once, twice);
    }
}
