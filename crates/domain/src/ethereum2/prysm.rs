//! Prysm

use super::{keystore_files, network};
use crate::clients::{ClientKey, Eth2Client};
use crate::rendering::{ArgBuilder, ClientStrategy, FlagStyle, InitStep, Layout, SECRET_PASSWORD, Workload};
use crate::shared_kernel::RenderError;

const HOME: &str = "/home/prysm";

/// Prysm selects networks with a bare flag, e.g. `--goerli`
fn network_flag(name: &str) -> Result<String, RenderError> {
    Ok(format!("--{}", network(name)?))
}

fn wallet_dir(layout: &Layout<'_>) -> String {
    format!("{}/prysm-wallet", layout.data_dir())
}

pub struct PrysmBeaconNode;

impl ClientStrategy for PrysmBeaconNode {
    fn key(&self) -> ClientKey {
        ClientKey::BeaconNode(Eth2Client::Prysm)
    }

    fn command(&self) -> Vec<String> {
        vec!["beacon-chain".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        let spec = workload.beacon_node(self.key())?;
        let layout = Layout::new(HOME);
        let mut args = ArgBuilder::new(FlagStyle::Separate);

        args.flag("--accept-terms-of-use")
            .value("--datadir", layout.data_dir())
            .flag(&network_flag(&spec.network)?)
            .opt("--p2p-tcp-port", spec.p2p_port)
            .opt("--p2p-udp-port", spec.p2p_port)
            .opt("--verbosity", spec.logging);

        if let Some((primary, fallbacks)) = spec.eth1_endpoints.split_first() {
            args.value("--http-web3provider", primary)
                .repeat("--fallback-web3provider", fallbacks);
        }

        if let Some(url) = &spec.checkpoint_sync_url {
            args.value("--checkpoint-sync-url", url)
                .value("--genesis-beacon-api-url", url);
        }

        if spec.rpc {
            args.opt("--rpc-host", spec.rpc_host.as_deref())
                .opt("--rpc-port", spec.rpc_port);
        }

        if spec.grpc {
            args.opt("--grpc-gateway-host", spec.grpc_host.as_deref())
                .opt("--grpc-gateway-port", spec.grpc_port)
                .list("--grpc-gateway-corsdomain", spec.cors_domains.as_deref().unwrap_or_default());
        } else {
            args.flag("--disable-grpc-gateway");
        }

        Ok(args.build())
    }
}

pub struct PrysmValidator;

impl ClientStrategy for PrysmValidator {
    fn key(&self) -> ClientKey {
        ClientKey::Validator(Eth2Client::Prysm)
    }

    fn command(&self) -> Vec<String> {
        vec!["validator".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        let spec = workload.validator(self.key())?;
        let layout = Layout::new(HOME);
        let mut args = ArgBuilder::new(FlagStyle::Separate);

        args.flag("--accept-terms-of-use")
            .value("--datadir", layout.data_dir())
            .flag(&network_flag(&spec.network)?)
            .opt("--beacon-rpc-provider", spec.beacon_endpoints.first())
            .opt("--graffiti", spec.graffiti.as_deref())
            .opt("--suggested-fee-recipient", spec.fee_recipient.as_deref())
            .opt("--verbosity", spec.logging)
            .value("--wallet-dir", wallet_dir(&layout))
            .opt(
                "--wallet-password-file",
                spec.wallet_password_secret
                    .as_deref()
                    .map(|secret| layout.secret_file(secret, SECRET_PASSWORD)),
            );

        Ok(args.build())
    }

    fn init_steps(&self, workload: &Workload<'_>) -> Result<Vec<InitStep>, RenderError> {
        let spec = workload.validator(self.key())?;
        let layout = Layout::new(HOME);
        let wallet = wallet_dir(&layout);
        let network = network_flag(&spec.network)?;
        let wallet_password = spec
            .wallet_password_secret
            .as_deref()
            .map(|secret| layout.secret_file(secret, SECRET_PASSWORD))
            .unwrap_or_default();

        let steps = spec
            .keystores
            .iter()
            .map(|keystore| {
                let (keys, password) = keystore_files(&layout, keystore);
                InitStep::new(
                    format!("import-{}", keystore.secret_name),
                    &["validator"],
                    vec![
                        "accounts".to_string(),
                        "import".to_string(),
                        "--accept-terms-of-use".to_string(),
                        network.clone(),
                        format!("--wallet-dir={wallet}"),
                        format!("--wallet-password-file={wallet_password}"),
                        format!("--keys-dir={keys}"),
                        format!("--account-password-file={password}"),
                    ],
                )
            })
            .collect();

        Ok(steps)
    }
}
