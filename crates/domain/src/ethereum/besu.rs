//! Hyperledger Besu

use super::genesis::{self, GENESIS_FILE, GenesisFormat};
use super::spec::{Api, Consensus, NetworkSpec, Node};
use super::{STATIC_NODES_FILE, node_key_file, static_nodes_file};
use crate::clients::{ClientKey, EthereumClient};
use crate::rendering::{ArgBuilder, ClientStrategy, ConfigFile, FlagStyle, Layout, Workload};
use crate::shared_kernel::RenderError;

pub struct Besu;

const HOME: &str = "/opt/besu";

fn apis(apis: &Option<Vec<Api>>) -> Vec<String> {
    apis.iter()
        .flatten()
        .map(|api| api.as_str().to_ascii_uppercase())
        .collect()
}

impl Besu {
    fn render_args(&self, network: &NetworkSpec, node: &Node) -> Vec<String> {
        let layout = Layout::new(HOME);
        let mut args = ArgBuilder::new(FlagStyle::Joined);

        args.value("--data-path", layout.data_dir());
        match &network.join {
            Some(join) => {
                args.value("--network", join);
            }
            None => {
                args.value("--genesis-file", layout.config_file(GENESIS_FILE))
                    .opt("--network-id", network.id);
            }
        }

        args.opt("--p2p-port", node.p2p_port)
            .opt(
                "--sync-mode",
                node.sync_mode.map(|mode| mode.as_str().to_ascii_uppercase()),
            )
            .opt(
                "--logging",
                node.logging.map(|level| level.as_str().to_ascii_uppercase()),
            )
            .opt("--node-private-key-file", node_key_file(&layout, node))
            .list("--bootnodes", &node.bootnodes);

        if !node.static_nodes.is_empty() {
            args.value("--static-nodes-file", layout.config_file(STATIC_NODES_FILE));
        }

        let sealing = matches!(network.consensus, Some(Consensus::Poa | Consensus::Ibft2));
        if node.miner && !sealing {
            args.flag("--miner-enabled")
                .opt("--miner-coinbase", node.coinbase.as_deref());
        }

        if node.rpc {
            args.flag("--rpc-http-enabled")
                .opt("--rpc-http-host", node.rpc_host.as_deref())
                .opt("--rpc-http-port", node.rpc_port)
                .list("--rpc-http-api", &apis(&node.rpc_api))
                .list("--rpc-http-cors-origins", node.cors_domains.as_deref().unwrap_or_default());
        }

        if node.ws {
            args.flag("--rpc-ws-enabled")
                .opt("--rpc-ws-host", node.ws_host.as_deref())
                .opt("--rpc-ws-port", node.ws_port)
                .list("--rpc-ws-api", &apis(&node.ws_api));
        }

        if node.graphql {
            args.flag("--graphql-http-enabled")
                .opt("--graphql-http-host", node.graphql_host.as_deref())
                .opt("--graphql-http-port", node.graphql_port)
                .list(
                    "--graphql-http-cors-origins",
                    node.cors_domains.as_deref().unwrap_or_default(),
                );
        }

        if node.rpc || node.ws || node.graphql {
            args.list("--host-allowlist", node.hosts.as_deref().unwrap_or_default());
        }

        args.build()
    }
}

impl ClientStrategy for Besu {
    fn key(&self) -> ClientKey {
        ClientKey::Ethereum(EthereumClient::Besu)
    }

    fn command(&self) -> Vec<String> {
        vec!["besu".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        let (network, node) = workload.ethereum(self.key())?;
        Ok(self.render_args(network, node))
    }

    fn config_files(&self, workload: &Workload<'_>) -> Result<Vec<ConfigFile>, RenderError> {
        let (network, node) = workload.ethereum(self.key())?;
        let mut files = Vec::new();
        if let Some(content) = genesis::render(network, GenesisFormat::Besu) {
            files.push(ConfigFile::new(GENESIS_FILE, content));
        }
        files.extend(static_nodes_file(node));
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{DefaultingContext, defaulted};
    use crate::ethereum::spec::Genesis;

    fn render(network: NetworkSpec) -> crate::rendering::RenderedLaunchConfig {
        let network = defaulted(network, &DefaultingContext::default());
        let workload = Workload::Ethereum {
            network: &network,
            node: &network.nodes[0],
        };
        Besu.render(&workload).unwrap()
    }

    #[test]
    fn test_joined_network_args() {
        let config = render(NetworkSpec {
            join: Some("goerli".to_string()),
            nodes: vec![Node {
                rpc: true,
                bootnodes: vec!["enode://a@10.0.0.1:30303".to_string()],
                ..Node::named("node-1")
            }],
            ..Default::default()
        });

        assert_eq!(
            config.args,
            vec![
                "--data-path=/opt/besu/data",
                "--network=goerli",
                "--p2p-port=30303",
                "--sync-mode=FULL",
                "--logging=INFO",
                "--bootnodes=enode://a@10.0.0.1:30303",
                "--rpc-http-enabled",
                "--rpc-http-host=0.0.0.0",
                "--rpc-http-port=8545",
                "--rpc-http-api=WEB3,NET,ETH",
                "--rpc-http-cors-origins=*",
                "--host-allowlist=*",
            ]
        );
        assert_eq!(config.command, vec!["besu"]);
        assert_eq!(config.home_dir, HOME);
        assert!(config.config_files.is_empty());
        assert_eq!(config.image, "hyperledger/besu:23.4.4");
    }

    #[test]
    fn test_private_network_gets_genesis_file() {
        let config = render(NetworkSpec {
            consensus: Some(Consensus::Ibft2),
            genesis: Some(Genesis {
                chain_id: 2021,
                ..Default::default()
            }),
            nodes: vec![Node {
                node_private_key_secret_name: Some("node-1-key".to_string()),
                miner: true,
                ..Node::named("node-1")
            }],
            ..Default::default()
        });

        assert!(config.args.contains(&"--genesis-file=/opt/besu/config/genesis.json".to_string()));
        assert!(config.args.contains(&"--network-id=2021".to_string()));
        assert!(config
            .args
            .contains(&"--node-private-key-file=/opt/besu/secrets/node-1-key/key".to_string()));
        assert!(!config.args.iter().any(|arg| arg.starts_with("--miner")));
        assert!(config.config_file(GENESIS_FILE).is_some());
    }
}
