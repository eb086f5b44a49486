//! Parity polkadot client

use super::spec::NodeSpec;
use crate::clients::ClientKey;
use crate::rendering::{ArgBuilder, ClientStrategy, FlagStyle, Layout, SECRET_KEY, Workload};
use crate::shared_kernel::RenderError;

pub struct PolkadotNode;

const HOME: &str = "/polkadot";

impl PolkadotNode {
    fn render_args(&self, spec: &NodeSpec) -> Vec<String> {
        let layout = Layout::new(HOME);
        let mut args = ArgBuilder::new(FlagStyle::Separate);

        args.value("--base-path", layout.data_dir())
            .value("--chain", spec.network)
            .opt("--port", spec.p2p_port)
            .opt("--sync", spec.sync_mode)
            .opt("--log", spec.logging)
            .opt(
                "--node-key-file",
                spec.node_private_key_secret_name
                    .as_deref()
                    .map(|secret| layout.secret_file(secret, SECRET_KEY)),
            )
            .flag_if(spec.validator, "--validator");

        if spec.is_pruning() {
            args.opt("--blocks-pruning", spec.retained_blocks)
                .opt("--state-pruning", spec.retained_states);
        } else {
            args.value("--pruning", "archive");
        }

        if spec.rpc {
            args.flag("--rpc-external").opt("--rpc-port", spec.rpc_port);
        }
        if spec.ws {
            args.flag("--ws-external").opt("--ws-port", spec.ws_port);
        }
        if spec.rpc || spec.ws {
            args.list("--rpc-cors", spec.cors_domains.as_deref().unwrap_or_default());
        }

        match spec.telemetry_url.as_deref().filter(|_| spec.telemetry) {
            Some(url) => args.value("--telemetry-url", url),
            None => args.flag("--no-telemetry"),
        };

        if spec.prometheus {
            args.flag("--prometheus-external")
                .opt("--prometheus-port", spec.prometheus_port);
        } else {
            args.flag("--no-prometheus");
        }

        args.build()
    }
}

impl ClientStrategy for PolkadotNode {
    fn key(&self) -> ClientKey {
        ClientKey::Polkadot
    }

    fn command(&self) -> Vec<String> {
        vec!["polkadot".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        Ok(self.render_args(workload.polkadot(self.key())?))
    }
}
