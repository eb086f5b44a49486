//! IPFS Cluster service

use super::spec::ClusterPeerSpec;
use crate::clients::ClientKey;
use crate::rendering::{ArgBuilder, ClientStrategy, EnvVar, FlagStyle, InitStep, Layout, SECRET_KEY, Workload};
use crate::shared_kernel::RenderError;

pub struct IpfsClusterService;

const HOME: &str = "/data/ipfs-cluster";

/// Key of the shared secret in the cluster secret
pub const CLUSTER_SECRET_KEY: &str = "secret";

pub const REST_API_ADDRESS: &str = "/ip4/0.0.0.0/tcp/9094";

impl IpfsClusterService {
    fn render_env(&self, spec: &ClusterPeerSpec) -> Vec<EnvVar> {
        let mut env = vec![
            EnvVar::value("IPFS_CLUSTER_PATH", Layout::new(HOME).data_dir()),
            EnvVar::secret("CLUSTER_SECRET", &spec.cluster_secret_name, CLUSTER_SECRET_KEY),
            EnvVar::value("CLUSTER_IPFSHTTP_NODEMULTIADDRESS", &spec.peer_endpoint),
            EnvVar::value("CLUSTER_RESTAPI_HTTPLISTENMULTIADDRESS", REST_API_ADDRESS),
        ];

        if let Some(peers) = &spec.trusted_peers {
            env.push(EnvVar::value("CLUSTER_CRDT_TRUSTEDPEERS", peers.join(",")));
        }
        if let Some(min) = spec.replication_factor_min {
            env.push(EnvVar::value("CLUSTER_REPLICATIONFACTORMIN", min.to_string()));
        }
        if let Some(max) = spec.replication_factor_max {
            env.push(EnvVar::value("CLUSTER_REPLICATIONFACTORMAX", max.to_string()));
        }

        env
    }
}

impl ClientStrategy for IpfsClusterService {
    fn key(&self) -> ClientKey {
        ClientKey::IpfsClusterPeer
    }

    fn command(&self) -> Vec<String> {
        vec!["ipfs-cluster-service".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        let spec = workload.ipfs_cluster_peer(self.key())?;
        let mut args = ArgBuilder::new(FlagStyle::Separate);
        args.opt("--loglevel", spec.logging)
            .flag("daemon")
            .list("--bootstrap", &spec.bootstrap_peers);
        Ok(args.build())
    }

    fn env(&self, workload: &Workload<'_>) -> Result<Vec<EnvVar>, RenderError> {
        Ok(self.render_env(workload.ipfs_cluster_peer(self.key())?))
    }

    fn init_steps(&self, workload: &Workload<'_>) -> Result<Vec<InitStep>, RenderError> {
        let spec = workload.ipfs_cluster_peer(self.key())?;
        let layout = Layout::new(HOME);
        let data = layout.data_dir();
        let consensus = spec.consensus.unwrap_or_default();

        let mut steps = vec![InitStep::shell(
            "init-cluster",
            format!(
                "[ -f {data}/service.json ] || IPFS_CLUSTER_PATH={data} ipfs-cluster-service init --consensus {consensus}"
            ),
        )];

        if let (Some(id), Some(secret)) = (&spec.id, &spec.private_key_secret_name) {
            let key = layout.secret_file(secret, SECRET_KEY);
            steps.push(InitStep::shell(
                "write-identity",
                format!(
                    r#"printf '{{"id": "%s", "private_key": "%s"}}' {id} "$(cat {key})" > {data}/identity.json"#
                ),
            ));
        }

        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{DefaultingContext, defaulted};
    use crate::rendering::EnvSource;

    #[test]
    fn test_crdt_peer_with_identity() {
        let spec = defaulted(
            ClusterPeerSpec {
                id: Some("12D3KooWabc".to_string()),
                private_key_secret_name: Some("peer-key".to_string()),
                cluster_secret_name: "cluster-secret".to_string(),
                peer_endpoint: "/dns4/kubo/tcp/5001".to_string(),
                bootstrap_peers: vec!["/dns4/peer-0/tcp/9096/p2p/12D3KooWxyz".to_string()],
                ..Default::default()
            },
            &DefaultingContext::default(),
        );

        let config = IpfsClusterService
            .render(&Workload::IpfsClusterPeer(&spec))
            .unwrap();
        assert_eq!(config.image, "ipfs/ipfs-cluster:v1.0.6");
        assert_eq!(
            config.args,
            vec![
                "--loglevel",
                "info",
                "daemon",
                "--bootstrap",
                "/dns4/peer-0/tcp/9096/p2p/12D3KooWxyz",
            ]
        );
        assert_eq!(config.env_value("CLUSTER_CRDT_TRUSTEDPEERS"), Some("*"));
        assert_eq!(config.env_value("CLUSTER_REPLICATIONFACTORMIN"), Some("-1"));
        let secret = config.env.iter().find(|v| v.name == "CLUSTER_SECRET").unwrap();
        assert_eq!(
            secret.source,
            EnvSource::SecretKeyRef {
                secret: "cluster-secret".to_string(),
                key: "secret".to_string(),
            }
        );

        let steps: Vec<&str> = config.init_steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(steps, vec!["init-cluster", "write-identity"]);
        assert!(config.init_steps[1].args[0].contains(r#"{"id": "%s""#));
    }
}
