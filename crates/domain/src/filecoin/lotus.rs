//! Lotus, configured through `LOTUS_*` environment variables

use super::spec::NodeSpec;
use crate::clients::ClientKey;
use crate::rendering::{ClientStrategy, EnvVar, Layout, Workload};
use crate::shared_kernel::RenderError;

pub struct Lotus;

const HOME: &str = "/home/filecoin";

fn tcp_multiaddr(host: &str, port: u16) -> String {
    format!("/ip4/{host}/tcp/{port}")
}

impl Lotus {
    fn render_env(&self, spec: &NodeSpec) -> Vec<EnvVar> {
        let layout = Layout::new(HOME);
        let mut env = vec![EnvVar::value("LOTUS_PATH", layout.data_dir())];

        if let (Some(host), Some(port)) = (spec.api_host.as_deref(), spec.api_port) {
            env.push(EnvVar::value(
                "LOTUS_API_LISTENADDRESS",
                format!("{}/http", tcp_multiaddr(host, port)),
            ));
        }
        if let Some(timeout) = spec.api_request_timeout {
            env.push(EnvVar::value("LOTUS_API_TIMEOUT", format!("{timeout}s")));
        }

        if let (Some(host), Some(port)) = (spec.p2p_host.as_deref(), spec.p2p_port) {
            env.push(EnvVar::value(
                "LOTUS_LIBP2P_LISTENADDRESSES",
                tcp_multiaddr(host, port),
            ));
        }

        if let Some(endpoint) = &spec.ipfs_peer_endpoint {
            env.push(EnvVar::value("LOTUS_CLIENT_USEIPFS", "true"));
            env.push(EnvVar::value("LOTUS_CLIENT_IPFSMADDR", endpoint));
            env.push(EnvVar::value(
                "LOTUS_CLIENT_IPFSONLINEMODE",
                spec.ipfs_online_mode.to_string(),
            ));
            env.push(EnvVar::value(
                "LOTUS_CLIENT_IPFSUSEFORRETRIEVAL",
                spec.ipfs_for_retrieval.to_string(),
            ));
        }

        if let Some(level) = spec.logging {
            env.push(EnvVar::value("GOLOG_LOG_LEVEL", level.as_str()));
        }

        env
    }
}

impl ClientStrategy for Lotus {
    fn key(&self) -> ClientKey {
        ClientKey::Filecoin
    }

    fn command(&self) -> Vec<String> {
        vec!["lotus".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        workload.filecoin(self.key())?;
        Ok(vec!["daemon".to_string()])
    }

    fn env(&self, workload: &Workload<'_>) -> Result<Vec<EnvVar>, RenderError> {
        Ok(self.render_env(workload.filecoin(self.key())?))
    }
}
