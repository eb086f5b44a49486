//! Bitcoin Core

use super::spec::{BitcoinNetwork, NodeSpec};
use crate::clients::ClientKey;
use crate::rendering::{ArgBuilder, ClientStrategy, EnvVar, FlagStyle, Layout, SECRET_PASSWORD, Workload};
use crate::shared_kernel::RenderError;

pub struct BitcoinCore;

const HOME: &str = "/home/bitcoin";

/// Environment variable holding the rpc user password
pub const RPC_PASSWORD_ENV: &str = "BITCOIN_RPC_PASSWORD";

impl BitcoinCore {
    fn render_args(&self, spec: &NodeSpec) -> Vec<String> {
        let layout = Layout::new(HOME);
        let mut args = ArgBuilder::new(FlagStyle::Joined);

        args.value("-datadir", layout.data_dir())
            .flag_if(spec.network == BitcoinNetwork::Testnet, "-testnet=1")
            .opt("-port", spec.p2p_port)
            .opt("-maxconnections", spec.max_connections)
            .flag_if(spec.tx_index, "-txindex=1")
            .flag_if(spec.coin_stats_index, "-coinstatsindex=1")
            .flag_if(!spec.wallet, "-disablewallet=1")
            .flag_if(spec.blocks_only, "-blocksonly=1");

        if spec.rpc {
            args.flag("-server=1")
                .opt("-rpcbind", spec.rpc_host.as_deref())
                .opt("-rpcport", spec.rpc_port)
                .value("-rpcallowip", "0.0.0.0/0");

            if let Some(user) = spec.rpc_users.first() {
                args.value("-rpcuser", &user.username)
                    .value("-rpcpassword", format!("$({RPC_PASSWORD_ENV})"));
                if !spec.rpc_whitelist.is_empty() {
                    args.value(
                        "-rpcwhitelist",
                        format!("{}:{}", user.username, spec.rpc_whitelist.join(",")),
                    )
                    .value("-rpcwhitelistdefault", 0);
                }
            }
        }

        args.build()
    }
}

impl ClientStrategy for BitcoinCore {
    fn key(&self) -> ClientKey {
        ClientKey::Bitcoin
    }

    fn command(&self) -> Vec<String> {
        vec!["bitcoind".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        Ok(self.render_args(workload.bitcoin(self.key())?))
    }

    fn env(&self, workload: &Workload<'_>) -> Result<Vec<EnvVar>, RenderError> {
        let spec = workload.bitcoin(self.key())?;
        Ok(spec
            .rpc_users
            .first()
            .filter(|_| spec.rpc)
            .map(|user| EnvVar::secret(RPC_PASSWORD_ENV, &user.password_secret_name, SECRET_PASSWORD))
            .into_iter()
            .collect())
    }
}
