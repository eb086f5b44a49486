//! Status Nimbus

use super::{keystore_files, network};
use crate::clients::{ClientKey, Eth2Client};
use crate::rendering::{ArgBuilder, ClientStrategy, FlagStyle, InitStep, Layout, Workload};
use crate::shared_kernel::RenderError;

const HOME: &str = "/home/nimbus";

fn validators_dir(layout: &Layout<'_>) -> String {
    format!("{}/validators", layout.data_dir())
}

fn keystore_secrets_dir(layout: &Layout<'_>) -> String {
    format!("{}/validator-secrets", layout.data_dir())
}

pub struct NimbusBeaconNode;

impl ClientStrategy for NimbusBeaconNode {
    fn key(&self) -> ClientKey {
        ClientKey::BeaconNode(Eth2Client::Nimbus)
    }

    fn command(&self) -> Vec<String> {
        vec!["nimbus_beacon_node".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        let spec = workload.beacon_node(self.key())?;
        let layout = Layout::new(HOME);
        let mut args = ArgBuilder::new(FlagStyle::Joined);

        args.flag("--non-interactive")
            .value("--network", network(&spec.network)?)
            .value("--data-dir", layout.data_dir())
            .opt("--tcp-port", spec.p2p_port)
            .opt("--udp-port", spec.p2p_port)
            .opt("--log-level", spec.logging.map(|l| l.as_str().to_uppercase()))
            .repeat("--web3-url", &spec.eth1_endpoints);

        if spec.rpc {
            args.flag("--rpc")
                .opt("--rpc-address", spec.rpc_host.as_deref())
                .opt("--rpc-port", spec.rpc_port);
        }

        Ok(args.build())
    }
}

pub struct NimbusValidator;

impl ClientStrategy for NimbusValidator {
    fn key(&self) -> ClientKey {
        ClientKey::Validator(Eth2Client::Nimbus)
    }

    fn command(&self) -> Vec<String> {
        vec!["nimbus_validator_client".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        let spec = workload.validator(self.key())?;
        let layout = Layout::new(HOME);
        let mut args = ArgBuilder::new(FlagStyle::Joined);

        args.flag("--non-interactive")
            .value("--data-dir", layout.data_dir())
            .value("--validators-dir", validators_dir(&layout))
            .value("--secrets-dir", keystore_secrets_dir(&layout))
            .opt("--beacon-node", spec.beacon_endpoints.first())
            .opt("--graffiti", spec.graffiti.as_deref())
            .opt("--suggested-fee-recipient", spec.fee_recipient.as_deref())
            .opt("--log-level", spec.logging.map(|l| l.as_str().to_uppercase()));

        Ok(args.build())
    }

    /// Nimbus indexes keystores and their passwords by validator public key
    fn init_steps(&self, workload: &Workload<'_>) -> Result<Vec<InitStep>, RenderError> {
        let spec = workload.validator(self.key())?;
        let layout = Layout::new(HOME);
        let validators = validators_dir(&layout);
        let secrets = keystore_secrets_dir(&layout);

        let script = spec
            .keystores
            .iter()
            .filter_map(|keystore| {
                let public_key = keystore.public_key.as_deref()?;
                let (keys, password) = keystore_files(&layout, keystore);
                Some(format!(
                    "mkdir -p {validators}/{public_key} && cp {keys} {validators}/{public_key}/keystore.json && cp {password} {secrets}/{public_key}"
                ))
            })
            .collect::<Vec<_>>();

        if script.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![InitStep::shell(
            "copy-keystores",
            format!("mkdir -p {secrets} && {}", script.join(" && ")),
        )])
    }
}
