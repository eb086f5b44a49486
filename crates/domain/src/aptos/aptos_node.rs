//! aptos-node, driven by a rendered YAML node config

use super::spec::NodeSpec;
use crate::clients::ClientKey;
use crate::rendering::{ClientStrategy, ConfigFile, InitStep, Layout, SECRET_KEY, Workload};
use crate::shared_kernel::RenderError;
use serde_json::{Map, Value, json};

pub struct AptosNode;

const HOME: &str = "/opt/aptos";

pub const CONFIG_FILE: &str = "config.yaml";
pub const GENESIS_FILE: &str = "genesis.blob";
pub const WAYPOINT_FILE: &str = "waypoint.txt";

const NETWORKS_URL: &str = "https://raw.githubusercontent.com/aptos-labs/aptos-networks/main";

impl AptosNode {
    fn render_config(&self, spec: &NodeSpec) -> Result<String, RenderError> {
        let layout = Layout::new(HOME);
        let data = layout.data_dir();

        let waypoint = match &spec.waypoint {
            Some(waypoint) => json!({ "from_config": waypoint }),
            None => json!({ "from_file": format!("{data}/{WAYPOINT_FILE}") }),
        };

        let mut network = json!({
            "listen_address": format!("/ip4/0.0.0.0/tcp/{}", spec.p2p_port.unwrap_or_default()),
            "discovery_method": "onchain",
        });
        if let Some(secret) = &spec.node_private_key_secret_name {
            network["identity"] = json!({
                "type": "from_file",
                "path": layout.secret_file(secret, SECRET_KEY),
            });
        }
        if !spec.seed_peers.is_empty() {
            let seeds: Map<String, Value> = spec
                .seed_peers
                .iter()
                .map(|peer| {
                    (
                        peer.id.clone(),
                        json!({ "addresses": peer.addresses, "role": "Upstream" }),
                    )
                })
                .collect();
            network["seeds"] = Value::Object(seeds);
        }

        let mut config = json!({
            "base": {
                "role": if spec.validator { "validator" } else { "full_node" },
                "data_dir": data,
                "waypoint": waypoint,
            },
            "execution": {
                "genesis_file_location": format!("{data}/{GENESIS_FILE}"),
            },
            "api": {
                "enabled": spec.api,
            },
            "inspection_service": {
                "address": "0.0.0.0",
                "port": spec.metrics_port,
            },
        });

        if let (Some(host), Some(port)) = (&spec.api_host, spec.api_port) {
            config["api"]["address"] = json!(format!("{host}:{port}"));
        }

        if spec.validator {
            network["network_id"] = json!("validator");
            network["mutual_authentication"] = json!(true);
            config["validator_network"] = network;
        } else {
            network["network_id"] = json!("public");
            config["full_node_networks"] = json!([network]);
        }

        serde_yaml::to_string(&config).map_err(|e| RenderError::config_file(CONFIG_FILE, e))
    }
}

impl ClientStrategy for AptosNode {
    fn key(&self) -> ClientKey {
        ClientKey::Aptos
    }

    fn command(&self) -> Vec<String> {
        vec!["aptos-node".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        workload.aptos(self.key())?;
        Ok(vec!["-f".to_string(), Layout::new(HOME).config_file(CONFIG_FILE)])
    }

    fn init_steps(&self, workload: &Workload<'_>) -> Result<Vec<InitStep>, RenderError> {
        let spec = workload.aptos(self.key())?;
        let data = Layout::new(HOME).data_dir();
        let base = format!("{NETWORKS_URL}/{}", spec.network);

        let mut downloads = vec![format!(
            "curl -fsSL -o {data}/{GENESIS_FILE} {base}/{GENESIS_FILE}"
        )];
        if spec.waypoint.is_none() {
            downloads.push(format!(
                "curl -fsSL -o {data}/{WAYPOINT_FILE} {base}/{WAYPOINT_FILE}"
            ));
        }

        Ok(vec![InitStep::shell(
            "fetch-genesis",
            format!(
                "mkdir -p {data} && [ -f {data}/{GENESIS_FILE} ] || ({})",
                downloads.join(" && ")
            ),
        )])
    }

    fn config_files(&self, workload: &Workload<'_>) -> Result<Vec<ConfigFile>, RenderError> {
        let spec = workload.aptos(self.key())?;
        Ok(vec![ConfigFile::new(CONFIG_FILE, self.render_config(spec)?)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aptos::spec::{AptosNetwork, SeedPeer};
    use crate::defaults::{DefaultingContext, defaulted};

    #[test]
    fn test_full_node_config() {
        let spec = defaulted(
            NodeSpec {
                network: AptosNetwork::Testnet,
                api: true,
                seed_peers: vec![SeedPeer {
                    id: "0xpeer".to_string(),
                    addresses: vec!["/dns/seed/tcp/6182/noise-ik/0xkey/handshake/0".to_string()],
                }],
                ..Default::default()
            },
            &DefaultingContext::default(),
        );

        let config = AptosNode.render(&Workload::Aptos(&spec)).unwrap();
        assert_eq!(config.args, vec!["-f", "/opt/aptos/config/config.yaml"]);

        let content = &config.config_file(CONFIG_FILE).unwrap().content;
        let parsed: serde_yaml::Value = serde_yaml::from_str(content).unwrap();
        assert_eq!(parsed["base"]["role"].as_str(), Some("full_node"));
        assert_eq!(
            parsed["base"]["waypoint"]["from_file"].as_str(),
            Some("/opt/aptos/data/waypoint.txt")
        );
        assert_eq!(parsed["api"]["address"].as_str(), Some("0.0.0.0:8080"));
        let network = &parsed["full_node_networks"][0];
        assert_eq!(network["network_id"].as_str(), Some("public"));
        assert_eq!(network["listen_address"].as_str(), Some("/ip4/0.0.0.0/tcp/6182"));
        assert_eq!(network["seeds"]["0xpeer"]["role"].as_str(), Some("Upstream"));

        let script = &config.init_steps[0].args[0];
        assert!(script.contains("aptos-networks/main/testnet/genesis.blob"));
        assert!(script.contains("testnet/waypoint.txt"));
    }

    #[test]
    fn test_validator_config() {
        let spec = defaulted(
            NodeSpec {
                validator: true,
                waypoint: Some("0:abc".to_string()),
                peer_id: Some("0xpeer".to_string()),
                node_private_key_secret_name: Some("node-key".to_string()),
                ..Default::default()
            },
            &DefaultingContext::default(),
        );

        let config = AptosNode.render(&Workload::Aptos(&spec)).unwrap();
        let content = &config.config_file(CONFIG_FILE).unwrap().content;
        let parsed: serde_yaml::Value = serde_yaml::from_str(content).unwrap();

        assert_eq!(parsed["base"]["waypoint"]["from_config"].as_str(), Some("0:abc"));
        let network = &parsed["validator_network"];
        assert_eq!(network["mutual_authentication"].as_bool(), Some(true));
        assert_eq!(network["identity"]["path"].as_str(), Some("/opt/aptos/secrets/node-key/key"));
        assert!(!config.init_steps[0].args[0].contains(WAYPOINT_FILE));
    }
}
