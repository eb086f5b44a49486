//! Go Ethereum

use super::chains::MAINNET;
use super::genesis::{self, GENESIS_FILE, GenesisFormat};
use super::spec::{Api, NetworkSpec, Node};
use super::{STATIC_NODES_FILE, import_files, node_key_file, static_nodes_file};
use crate::clients::{ClientKey, EthereumClient};
use crate::rendering::{
    ArgBuilder, ClientStrategy, ConfigFile, FlagStyle, InitStep, Layout, Workload,
};
use crate::shared_kernel::RenderError;
use crate::verbosity::Verbosity;

pub struct Geth;

const HOME: &str = "/home/ethereum";

fn verbosity(level: Verbosity) -> u8 {
    match level {
        Verbosity::Off => 0,
        Verbosity::Error => 1,
        Verbosity::Warn => 2,
        Verbosity::Debug => 4,
        Verbosity::Trace => 5,
        _ => 3,
    }
}

fn apis(apis: &Option<Vec<Api>>) -> Vec<&'static str> {
    apis.iter().flatten().map(Api::as_str).collect()
}

impl Geth {
    fn render_args(&self, network: &NetworkSpec, node: &Node) -> Vec<String> {
        let layout = Layout::new(HOME);
        let mut args = ArgBuilder::new(FlagStyle::Separate);

        args.value("--datadir", layout.data_dir());
        match network.join.as_deref() {
            Some(MAINNET) => {
                args.flag("--mainnet");
            }
            Some(join) => {
                args.flag(&format!("--{join}"));
            }
            None => {
                args.opt("--networkid", network.id);
            }
        }

        args.opt("--port", node.p2p_port)
            .opt("--syncmode", node.sync_mode)
            .opt("--verbosity", node.logging.map(verbosity))
            .opt("--nodekey", node_key_file(&layout, node))
            .list("--bootnodes", &node.bootnodes);

        if node.miner {
            args.flag("--mine").opt("--miner.etherbase", node.coinbase.as_deref());
            if let Some((_, password)) = import_files(&layout, node) {
                args.opt("--unlock", node.coinbase.as_deref())
                    .value("--password", password)
                    .flag("--allow-insecure-unlock");
            }
        }

        let cors = node.cors_domains.as_deref().unwrap_or_default();
        let hosts = node.hosts.as_deref().unwrap_or_default();

        if node.rpc {
            args.flag("--http")
                .opt("--http.addr", node.rpc_host.as_deref())
                .opt("--http.port", node.rpc_port)
                .list("--http.api", &apis(&node.rpc_api))
                .list("--http.corsdomain", cors)
                .list("--http.vhosts", hosts);
        }

        if node.ws {
            args.flag("--ws")
                .opt("--ws.addr", node.ws_host.as_deref())
                .opt("--ws.port", node.ws_port)
                .list("--ws.api", &apis(&node.ws_api))
                .list("--ws.origins", cors);
        }

        if node.graphql {
            args.flag("--graphql")
                .list("--graphql.corsdomain", cors)
                .list("--graphql.vhosts", hosts);
        }

        args.build()
    }
}

impl ClientStrategy for Geth {
    fn key(&self) -> ClientKey {
        ClientKey::Ethereum(EthereumClient::Geth)
    }

    fn command(&self) -> Vec<String> {
        vec!["geth".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        let (network, node) = workload.ethereum(self.key())?;
        Ok(self.render_args(network, node))
    }

    fn init_steps(&self, workload: &Workload<'_>) -> Result<Vec<InitStep>, RenderError> {
        let (network, node) = workload.ethereum(self.key())?;
        let layout = Layout::new(HOME);
        let data = layout.data_dir();
        let mut steps = Vec::new();

        if network.is_private() {
            steps.push(InitStep::new(
                "init-genesis",
                &["geth"],
                vec![
                    "init".to_string(),
                    "--datadir".to_string(),
                    data.clone(),
                    layout.config_file(GENESIS_FILE),
                ],
            ));
        }

        if let Some((key, password)) = import_files(&layout, node) {
            steps.push(InitStep::shell(
                "import-account",
                format!(
                    "ls {data}/keystore/* >/dev/null 2>&1 || geth account import --datadir {data} --password {password} {key}"
                ),
            ));
        }

        if !node.static_nodes.is_empty() {
            steps.push(InitStep::shell(
                "copy-static-nodes",
                format!(
                    "mkdir -p {data}/geth && cp {} {data}/geth/{STATIC_NODES_FILE}",
                    layout.config_file(STATIC_NODES_FILE)
                ),
            ));
        }

        Ok(steps)
    }

    fn config_files(&self, workload: &Workload<'_>) -> Result<Vec<ConfigFile>, RenderError> {
        let (network, node) = workload.ethereum(self.key())?;
        let mut files = Vec::new();
        if let Some(content) = genesis::render(network, GenesisFormat::Geth) {
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
    use crate::ethereum::spec::{Clique, Consensus, Genesis, ImportedAccount};

    const SIGNER: &str = "0xd2c21213027cbf4d46c16b55fa98e5252b048706";

    fn signer_network() -> NetworkSpec {
        defaulted(
            NetworkSpec {
                consensus: Some(Consensus::Poa),
                genesis: Some(Genesis {
                    chain_id: 4242,
                    clique: Some(Clique {
                        signers: vec![SIGNER.to_string()],
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                nodes: vec![Node {
                    client: Some(EthereumClient::Geth),
                    miner: true,
                    coinbase: Some(SIGNER.to_string()),
                    import: Some(ImportedAccount {
                        private_key_secret_name: "signer-key".to_string(),
                        password_secret_name: "signer-password".to_string(),
                    }),
                    ws: true,
                    ..Node::named("signer")
                }],
                ..Default::default()
            },
            &DefaultingContext::default(),
        )
    }

    #[test]
    fn test_private_signer_rendering() {
        let network = signer_network();
        let workload = Workload::Ethereum {
            network: &network,
            node: &network.nodes[0],
        };
        let config = Geth.render(&workload).unwrap();

        assert_eq!(
            config.args,
            vec![
                "--datadir",
                "/home/ethereum/data",
                "--networkid",
                "4242",
                "--port",
                "30303",
                "--syncmode",
                "fast",
                "--verbosity",
                "3",
                "--mine",
                "--miner.etherbase",
                SIGNER,
                "--unlock",
                SIGNER,
                "--password",
                "/home/ethereum/secrets/signer-password/password",
                "--allow-insecure-unlock",
                "--ws",
                "--ws.addr",
                "0.0.0.0",
                "--ws.port",
                "8546",
                "--ws.api",
                "web3,net,eth",
                "--ws.origins",
                "*",
            ]
        );

        let steps: Vec<&str> = config.init_steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(steps, vec!["init-genesis", "import-account"]);
        assert!(config.init_steps[1].args[0].contains("/home/ethereum/secrets/signer-key/key"));
        assert!(config.config_file(GENESIS_FILE).is_some());
    }

    #[test]
    fn test_public_network_flag() {
        let network = defaulted(
            NetworkSpec {
                join: Some("sepolia".to_string()),
                nodes: vec![Node {
                    client: Some(EthereumClient::Geth),
                    ..Node::named("node-1")
                }],
                ..Default::default()
            },
            &DefaultingContext::default(),
        );
        let workload = Workload::Ethereum {
            network: &network,
            node: &network.nodes[0],
        };
        let config = Geth.render(&workload).unwrap();

        assert!(config.args.contains(&"--sepolia".to_string()));
        assert!(config.init_steps.is_empty());
        assert!(config.config_files.is_empty());
    }
}
