//! nearcore (`neard`)

use super::spec::NodeSpec;
use crate::clients::ClientKey;
use crate::rendering::{ArgBuilder, ClientStrategy, FlagStyle, InitStep, Layout, SECRET_KEY, Workload};
use crate::shared_kernel::RenderError;

pub struct Nearcore;

const HOME: &str = "/home/near";

fn socket(host: Option<&str>, port: Option<u16>) -> Option<String> {
    Some(format!("{}:{}", host?, port?))
}

impl Nearcore {
    fn render_args(&self, spec: &NodeSpec) -> Vec<String> {
        let layout = Layout::new(HOME);
        let mut args = ArgBuilder::new(FlagStyle::Separate);

        args.value("--home", layout.data_dir())
            .flag("run")
            .opt("--network-addr", socket(spec.p2p_host.as_deref(), spec.p2p_port))
            .opt("--min-peers", spec.min_peers)
            .list("--boot-nodes", &spec.bootnodes)
            .flag_if(spec.archive, "--archive")
            .opt(
                "--rpc-prometheus-addr",
                socket(spec.prometheus_host.as_deref(), spec.prometheus_port),
            )
            .opt("--telemetry-url", spec.telemetry_url.as_deref());

        if spec.rpc {
            args.opt("--rpc-addr", socket(spec.rpc_host.as_deref(), spec.rpc_port));
        } else {
            args.flag("--disable-rpc");
        }

        args.build()
    }

    fn render_init_steps(&self, spec: &NodeSpec) -> Vec<InitStep> {
        let layout = Layout::new(HOME);
        let data = layout.data_dir();

        let mut steps = vec![InitStep::shell(
            "init-home",
            format!(
                "[ -f {data}/config.json ] || neard --home {data} init --chain-id {} --download-genesis --download-config",
                spec.network
            ),
        )];

        for (name, secret, file) in [
            ("copy-node-key", &spec.node_private_key_secret_name, "node_key.json"),
            ("copy-validator-key", &spec.validator_secret_name, "validator_key.json"),
        ] {
            if let Some(secret) = secret {
                steps.push(InitStep::new(
                    name,
                    &["cp"],
                    vec![layout.secret_file(secret, SECRET_KEY), format!("{data}/{file}")],
                ));
            }
        }

        steps
    }
}

impl ClientStrategy for Nearcore {
    fn key(&self) -> ClientKey {
        ClientKey::Near
    }

    fn command(&self) -> Vec<String> {
        vec!["neard".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        Ok(self.render_args(workload.near(self.key())?))
    }

    fn init_steps(&self, workload: &Workload<'_>) -> Result<Vec<InitStep>, RenderError> {
        Ok(self.render_init_steps(workload.near(self.key())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{DefaultingContext, defaulted};

    #[test]
    fn test_validator_node_rendering() {
        let spec = defaulted(
            NodeSpec {
                rpc: true,
                validator_secret_name: Some("validator-key".to_string()),
                ..Default::default()
            },
            &DefaultingContext::default(),
        );

        let config = Nearcore.render(&Workload::Near(&spec)).unwrap();
        assert_eq!(config.image, "nearprotocol/nearcore:1.35.0");
        assert_eq!(
            config.args,
            vec![
                "--home",
                "/home/near/data",
                "run",
                "--network-addr",
                "0.0.0.0:24567",
                "--min-peers",
                "5",
                "--rpc-prometheus-addr",
                "0.0.0.0:9615",
                "--telemetry-url",
                "https://explorer.mainnet.near.org/api/nodes",
                "--rpc-addr",
                "0.0.0.0:3030",
            ]
        );

        let steps: Vec<&str> = config.init_steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(steps, vec!["init-home", "copy-validator-key"]);
        assert_eq!(
            config.init_steps[1].args,
            vec!["/home/near/secrets/validator-key/key", "/home/near/data/validator_key.json"]
        );
    }

    #[test]
    fn test_rpc_disabled() {
        let spec = defaulted(NodeSpec::default(), &DefaultingContext::default());
        let config = Nearcore.render(&Workload::Near(&spec)).unwrap();
        assert_eq!(config.args.last().map(String::as_str), Some("--disable-rpc"));
    }
}
