//! OpenEthereum (formerly Parity Ethereum)

use super::genesis::{self, GENESIS_FILE, GenesisFormat};
use super::spec::{Api, NetworkSpec, Node, SyncMode};
use super::{import_files, node_key_file};
use crate::clients::{ClientKey, EthereumClient};
use crate::rendering::{
    ArgBuilder, ClientStrategy, ConfigFile, FlagStyle, InitStep, Layout, Workload,
};
use crate::shared_kernel::RenderError;

pub struct Parity;

const HOME: &str = "/home/openethereum";
const RESERVED_PEERS_FILE: &str = "reserved-peers";

/// OpenEthereum spells the wildcard interface `all`
fn interface(host: Option<&str>) -> Option<&str> {
    host.map(|host| if host == "0.0.0.0" { "all" } else { host })
}

fn apis(apis: &Option<Vec<Api>>) -> Vec<&'static str> {
    apis.iter().flatten().map(Api::as_str).collect()
}

impl Parity {
    fn chain(network: &NetworkSpec, layout: &Layout<'_>) -> String {
        match &network.join {
            Some(join) => join.clone(),
            None => layout.config_file(GENESIS_FILE),
        }
    }

    fn render_args(&self, network: &NetworkSpec, node: &Node) -> Vec<String> {
        let layout = Layout::new(HOME);
        let mut args = ArgBuilder::new(FlagStyle::Joined);

        args.value("--base-path", layout.data_dir())
            .value("--chain", Self::chain(network, &layout));
        if network.is_private() {
            args.opt("--network-id", network.id);
        }

        args.opt("--port", node.p2p_port)
            .opt("--logging", node.logging)
            .list("--bootnodes", &node.bootnodes);

        match node.sync_mode {
            Some(SyncMode::Full) => {
                args.flag("--no-warp");
            }
            Some(SyncMode::Light) => {
                args.flag("--light");
            }
            _ => {}
        }

        if !node.static_nodes.is_empty() {
            args.value("--reserved-peers", layout.config_file(RESERVED_PEERS_FILE));
        }

        if node.miner {
            args.opt("--author", node.coinbase.as_deref());
            if let Some((_, password)) = import_files(&layout, node) {
                args.opt("--engine-signer", node.coinbase.as_deref())
                    .value("--password", password);
            }
        }

        let cors = node.cors_domains.as_deref().unwrap_or_default();
        let hosts = node.hosts.as_deref().unwrap_or_default();

        if node.rpc {
            args.opt("--jsonrpc-interface", interface(node.rpc_host.as_deref()))
                .opt("--jsonrpc-port", node.rpc_port)
                .list("--jsonrpc-apis", &apis(&node.rpc_api))
                .list("--jsonrpc-cors", cors)
                .list("--jsonrpc-hosts", hosts);
        } else {
            args.flag("--no-jsonrpc");
        }

        if node.ws {
            args.opt("--ws-interface", interface(node.ws_host.as_deref()))
                .opt("--ws-port", node.ws_port)
                .list("--ws-apis", &apis(&node.ws_api))
                .list("--ws-origins", cors)
                .list("--ws-hosts", hosts);
        } else {
            args.flag("--no-ws");
        }

        args.build()
    }
}

impl ClientStrategy for Parity {
    fn key(&self) -> ClientKey {
        ClientKey::Ethereum(EthereumClient::Parity)
    }

    fn command(&self) -> Vec<String> {
        vec!["openethereum".to_string()]
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

        if let Some(key) = node_key_file(&layout, node) {
            steps.push(InitStep::shell(
                "copy-node-key",
                format!("mkdir -p {data}/network && cp {key} {data}/network/key"),
            ));
        }

        if let Some((key, password)) = import_files(&layout, node) {
            steps.push(InitStep::new(
                "import-account",
                &["openethereum"],
                vec![
                    "account".to_string(),
                    "import".to_string(),
                    format!("--base-path={data}"),
                    format!("--chain={}", Self::chain(network, &layout)),
                    format!("--password={password}"),
                    key,
                ],
            ));
        }

        Ok(steps)
    }

    fn config_files(&self, workload: &Workload<'_>) -> Result<Vec<ConfigFile>, RenderError> {
        let (network, node) = workload.ethereum(self.key())?;
        let mut files = Vec::new();
        if let Some(content) = genesis::render(network, GenesisFormat::Parity) {
            files.push(ConfigFile::new(GENESIS_FILE, content));
        }
        if !node.static_nodes.is_empty() {
            files.push(ConfigFile::new(RESERVED_PEERS_FILE, node.static_nodes.join("\n")));
        }
        Ok(files)
    }
}
