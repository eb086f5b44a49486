//! Kubo (go-ipfs)

use super::spec::PeerSpec;
use crate::clients::ClientKey;
use crate::rendering::{ClientStrategy, EnvVar, InitStep, Layout, SECRET_KEY, Workload};
use crate::shared_kernel::RenderError;

pub struct Kubo;

const HOME: &str = "/data/ipfs";

fn multiaddr(host: Option<&str>, port: Option<u16>) -> Option<String> {
    Some(format!("/ip4/{}/tcp/{}", host?, port?))
}

impl Kubo {
    fn render_init_steps(&self, spec: &PeerSpec) -> Vec<InitStep> {
        let layout = Layout::new(HOME);
        let data = layout.data_dir();
        let init_profiles = spec
            .init_profiles
            .iter()
            .flatten()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let init = if init_profiles.is_empty() {
            format!("[ -f {data}/config ] || ipfs init")
        } else {
            format!("[ -f {data}/config ] || ipfs init --profile {init_profiles}")
        };

        let mut config = Vec::new();
        if let Some(api) = multiaddr(spec.api_host.as_deref(), spec.api_port) {
            config.push(format!("ipfs config Addresses.API {api}"));
        }
        if let Some(gateway) = multiaddr(spec.gateway_host.as_deref(), spec.gateway_port) {
            config.push(format!("ipfs config Addresses.Gateway {gateway}"));
        }
        if let Some(routing) = spec.routing {
            config.push(format!("ipfs config Routing.Type {routing}"));
        }
        for profile in &spec.profiles {
            config.push(format!("ipfs config profile apply {profile}"));
        }
        if let Some(secret) = &spec.swarm_key_secret_name {
            config.push(format!(
                "cp {} {data}/swarm.key",
                layout.secret_file(secret, SECRET_KEY)
            ));
        }

        let mut steps = vec![InitStep::shell(
            "init-repo",
            format!("export IPFS_PATH={data} && {init}"),
        )];
        if !config.is_empty() {
            steps.push(InitStep::shell(
                "configure",
                format!("export IPFS_PATH={data} && {}", config.join(" && ")),
            ));
        }
        steps
    }
}

impl ClientStrategy for Kubo {
    fn key(&self) -> ClientKey {
        ClientKey::IpfsPeer
    }

    fn command(&self) -> Vec<String> {
        vec!["ipfs".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        workload.ipfs_peer(self.key())?;
        Ok(vec!["daemon".to_string(), "--migrate=true".to_string()])
    }

    fn env(&self, workload: &Workload<'_>) -> Result<Vec<EnvVar>, RenderError> {
        let spec = workload.ipfs_peer(self.key())?;
        let mut env = vec![EnvVar::value("IPFS_PATH", Layout::new(HOME).data_dir())];
        if let Some(level) = spec.logging {
            env.push(EnvVar::value("IPFS_LOGGING", level.as_str()));
        }
        if spec.swarm_key_secret_name.is_some() {
            env.push(EnvVar::value("LIBP2P_FORCE_PNET", "1"));
        }
        Ok(env)
    }

    fn init_steps(&self, workload: &Workload<'_>) -> Result<Vec<InitStep>, RenderError> {
        Ok(self.render_init_steps(workload.ipfs_peer(self.key())?))
    }
}
