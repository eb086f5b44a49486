//! Sigma Prime Lighthouse

use super::{keystore_files, network};
use crate::clients::{ClientKey, Eth2Client};
use crate::rendering::{ArgBuilder, ClientStrategy, FlagStyle, InitStep, Layout, Workload};
use crate::shared_kernel::RenderError;

const HOME: &str = "/home/lighthouse";

pub struct LighthouseBeaconNode;

impl ClientStrategy for LighthouseBeaconNode {
    fn key(&self) -> ClientKey {
        ClientKey::BeaconNode(Eth2Client::Lighthouse)
    }

    fn command(&self) -> Vec<String> {
        vec!["lighthouse".to_string(), "bn".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        let spec = workload.beacon_node(self.key())?;
        let layout = Layout::new(HOME);
        let mut args = ArgBuilder::new(FlagStyle::Separate);

        args.value("--network", network(&spec.network)?)
            .value("--datadir", layout.data_dir())
            .opt("--port", spec.p2p_port)
            .opt("--debug-level", spec.logging)
            .list("--eth1-endpoints", &spec.eth1_endpoints)
            .opt("--checkpoint-sync-url", spec.checkpoint_sync_url.as_deref());

        if spec.rest {
            // lighthouse accepts a single allowed origin
            args.flag("--http")
                .opt("--http-address", spec.rest_host.as_deref())
                .opt("--http-port", spec.rest_port)
                .list("--http-allow-origin", spec.cors_domains.as_deref().unwrap_or_default());
        }

        Ok(args.build())
    }
}

pub struct LighthouseValidator;

impl ClientStrategy for LighthouseValidator {
    fn key(&self) -> ClientKey {
        ClientKey::Validator(Eth2Client::Lighthouse)
    }

    fn command(&self) -> Vec<String> {
        vec!["lighthouse".to_string(), "vc".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        let spec = workload.validator(self.key())?;
        let layout = Layout::new(HOME);
        let mut args = ArgBuilder::new(FlagStyle::Separate);

        args.value("--network", network(&spec.network)?)
            .value("--datadir", layout.data_dir())
            .list("--beacon-nodes", &spec.beacon_endpoints)
            .opt("--graffiti", spec.graffiti.as_deref())
            .opt("--suggested-fee-recipient", spec.fee_recipient.as_deref())
            .opt("--debug-level", spec.logging);

        Ok(args.build())
    }

    fn init_steps(&self, workload: &Workload<'_>) -> Result<Vec<InitStep>, RenderError> {
        let spec = workload.validator(self.key())?;
        let layout = Layout::new(HOME);
        let data = layout.data_dir();

        let steps = spec
            .keystores
            .iter()
            .map(|keystore| {
                let (keys, password) = keystore_files(&layout, keystore);
                InitStep::shell(
                    format!("import-{}", keystore.secret_name),
                    format!(
                        "cat {password} | lighthouse account validator import --network {} --datadir {data} --keystore {keys} --reuse-password --stdin-inputs",
                        spec.network
                    ),
                )
            })
            .collect();

        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{DefaultingContext, defaulted};
    use crate::ethereum2::spec::{BeaconNodeSpec, Keystore, ValidatorSpec};

    #[test]
    fn test_beacon_node_http_api() {
        let spec = defaulted(
            BeaconNodeSpec {
                client: Eth2Client::Lighthouse,
                network: "sepolia".to_string(),
                rest: true,
                checkpoint_sync_url: Some("https://checkpoint.sepolia".to_string()),
                ..Default::default()
            },
            &DefaultingContext::default(),
        );

        let config = LighthouseBeaconNode.render(&Workload::BeaconNode(&spec)).unwrap();
        assert_eq!(config.command, vec!["lighthouse", "bn"]);
        assert_eq!(
            config.args,
            vec![
                "--network",
                "sepolia",
                "--datadir",
                "/home/lighthouse/data",
                "--port",
                "9000",
                "--debug-level",
                "info",
                "--checkpoint-sync-url",
                "https://checkpoint.sepolia",
                "--http",
                "--http-address",
                "0.0.0.0",
                "--http-port",
                "5052",
                "--http-allow-origin",
                "*",
            ]
        );
    }

    #[test]
    fn test_validator_import_step() {
        let spec = ValidatorSpec {
            client: Eth2Client::Lighthouse,
            network: "mainnet".to_string(),
            beacon_endpoints: vec!["http://bn:5052".to_string()],
            keystores: vec![Keystore {
                secret_name: "v1".to_string(),
                public_key: None,
            }],
            ..Default::default()
        };

        let config = LighthouseValidator.render(&Workload::Validator(&spec)).unwrap();
        assert_eq!(config.init_steps.len(), 1);
        let script = &config.init_steps[0].args[0];
        assert!(script.starts_with("cat /home/lighthouse/secrets/v1/password |"));
        assert!(script.contains("--keystore /home/lighthouse/secrets/v1/keystore"));
    }
}
