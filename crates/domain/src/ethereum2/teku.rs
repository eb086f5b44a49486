//! ConsenSys Teku

use super::{keystore_files, network};
use crate::clients::{ClientKey, Eth2Client};
use crate::rendering::{ArgBuilder, ClientStrategy, FlagStyle, Layout, Workload};
use crate::shared_kernel::RenderError;

const HOME: &str = "/opt/teku";
const COMMAND: &str = "/opt/teku/bin/teku";

pub struct TekuBeaconNode;

impl ClientStrategy for TekuBeaconNode {
    fn key(&self) -> ClientKey {
        ClientKey::BeaconNode(Eth2Client::Teku)
    }

    fn command(&self) -> Vec<String> {
        vec![COMMAND.to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        let spec = workload.beacon_node(self.key())?;
        let layout = Layout::new(HOME);
        let mut args = ArgBuilder::new(FlagStyle::Joined);

        args.value("--network", network(&spec.network)?)
            .value("--data-path", layout.data_dir())
            .opt("--p2p-port", spec.p2p_port)
            .opt("--logging", spec.logging.map(|l| l.as_str().to_uppercase()))
            .list("--eth1-endpoints", &spec.eth1_endpoints)
            .opt("--initial-state", spec.checkpoint_sync_url.as_deref());

        if spec.rest {
            args.flag("--rest-api-enabled=true")
                .opt("--rest-api-interface", spec.rest_host.as_deref())
                .opt("--rest-api-port", spec.rest_port)
                .list("--rest-api-host-allowlist", spec.hosts.as_deref().unwrap_or_default())
                .list("--rest-api-cors-origins", spec.cors_domains.as_deref().unwrap_or_default());
        }

        Ok(args.build())
    }
}

pub struct TekuValidator;

impl ClientStrategy for TekuValidator {
    fn key(&self) -> ClientKey {
        ClientKey::Validator(Eth2Client::Teku)
    }

    fn command(&self) -> Vec<String> {
        vec![COMMAND.to_string(), "vc".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        let spec = workload.validator(self.key())?;
        let layout = Layout::new(HOME);
        let mut args = ArgBuilder::new(FlagStyle::Joined);

        args.value("--network", network(&spec.network)?)
            .value("--data-path", layout.data_dir())
            .list("--beacon-node-api-endpoints", &spec.beacon_endpoints)
            .opt("--validators-graffiti", spec.graffiti.as_deref())
            .opt("--validators-proposer-default-fee-recipient", spec.fee_recipient.as_deref())
            .opt("--logging", spec.logging.map(|l| l.as_str().to_uppercase()))
            .repeat(
                "--validator-keys",
                spec.keystores.iter().map(|keystore| {
                    let (keystore, password) = keystore_files(&layout, keystore);
                    format!("{keystore}:{password}")
                }),
            );

        Ok(args.build())
    }
}
