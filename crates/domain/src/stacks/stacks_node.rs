//! stacks-node
//!
//! The rendered `config.toml` carries placeholders instead of secrets. An
//! init step copies it into the data directory, substituting each
//! placeholder with the secret-backed environment variable of the same name.
//! Placeholders sit inside TOML basic strings, so each value is escaped for
//! the string and then for the sed replacement. Secrets must be single-line.

use super::spec::NodeSpec;
use crate::clients::ClientKey;
use crate::rendering::{ClientStrategy, ConfigFile, EnvVar, InitStep, Layout, SECRET_KEY, SECRET_PASSWORD, Workload};
use crate::shared_kernel::RenderError;
use serde::Serialize;

pub struct StacksNode;

const HOME: &str = "/home/stacks";

pub const CONFIG_FILE: &str = "config.toml";
pub const BITCOIN_RPC_PASSWORD_ENV: &str = "BITCOIN_RPC_PASSWORD";
pub const SEED_PRIVATE_KEY_ENV: &str = "SEED_PRIVATE_KEY";

fn placeholder(env: &str) -> String {
    format!("__{env}__")
}

/// `esc VALUE`: `\` and `"` escaped for TOML, then `\`, `&` and `|` for sed
const ESCAPE_FN: &str = r#"esc() { printf '%s' "$1" | sed -e 's/[\\"]/\\&/g' -e 's/[\\&|]/\\&/g'; }"#;

#[derive(Serialize)]
struct Config<'a> {
    node: NodeSection,
    burnchain: BurnchainSection<'a>,
}

#[derive(Serialize)]
struct NodeSection {
    working_dir: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rpc_bind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    p2p_bind: Option<String>,
    miner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<String>,
    mine_microblocks: bool,
}

#[derive(Serialize)]
struct BurnchainSection<'a> {
    chain: &'static str,
    mode: &'static str,
    peer_host: &'a str,
    username: &'a str,
    password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rpc_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    peer_port: Option<u16>,
}

fn bind(host: Option<&str>, port: Option<u16>) -> Option<String> {
    Some(format!("{}:{}", host?, port?))
}

impl StacksNode {
    fn render_config(&self, spec: &NodeSpec) -> Result<String, RenderError> {
        let bitcoin = &spec.bitcoin_node;
        let config = Config {
            node: NodeSection {
                working_dir: Layout::new(HOME).data_dir(),
                rpc_bind: if spec.rpc {
                    bind(spec.rpc_host.as_deref(), spec.rpc_port)
                } else {
                    None
                },
                p2p_bind: bind(spec.p2p_host.as_deref(), spec.p2p_port),
                miner: spec.miner,
                seed: spec
                    .seed_private_key_secret_name
                    .as_ref()
                    .map(|_| placeholder(SEED_PRIVATE_KEY_ENV)),
                mine_microblocks: spec.mine_microblocks,
            },
            burnchain: BurnchainSection {
                chain: "bitcoin",
                mode: spec.network.burnchain_mode(),
                peer_host: &bitcoin.endpoint,
                username: &bitcoin.rpc_username,
                password: placeholder(BITCOIN_RPC_PASSWORD_ENV),
                rpc_port: bitcoin.rpc_port,
                peer_port: bitcoin.p2p_port,
            },
        };

        toml::to_string(&config).map_err(|e| RenderError::config_file(CONFIG_FILE, e))
    }
}

impl ClientStrategy for StacksNode {
    fn key(&self) -> ClientKey {
        ClientKey::Stacks
    }

    fn command(&self) -> Vec<String> {
        vec!["stacks-node".to_string()]
    }

    fn home_dir(&self) -> &'static str {
        HOME
    }

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError> {
        workload.stacks(self.key())?;
        let layout = Layout::new(HOME);
        Ok(vec![
            "start".to_string(),
            "--config".to_string(),
            format!("{}/{CONFIG_FILE}", layout.data_dir()),
        ])
    }

    fn env(&self, workload: &Workload<'_>) -> Result<Vec<EnvVar>, RenderError> {
        let spec = workload.stacks(self.key())?;
        let mut env = vec![EnvVar::secret(
            BITCOIN_RPC_PASSWORD_ENV,
            &spec.bitcoin_node.rpc_password_secret_name,
            SECRET_PASSWORD,
        )];
        if let Some(secret) = &spec.seed_private_key_secret_name {
            env.push(EnvVar::secret(SEED_PRIVATE_KEY_ENV, secret, SECRET_KEY));
        }
        Ok(env)
    }

    fn init_steps(&self, workload: &Workload<'_>) -> Result<Vec<InitStep>, RenderError> {
        let spec = workload.stacks(self.key())?;
        let layout = Layout::new(HOME);

        let mut substitutions = vec![BITCOIN_RPC_PASSWORD_ENV];
        if spec.seed_private_key_secret_name.is_some() {
            substitutions.push(SEED_PRIVATE_KEY_ENV);
        }
        let expressions = substitutions
            .iter()
            .map(|env| format!("-e \"s|{}|$(esc \"${env}\")|\"", placeholder(env)))
            .collect::<Vec<_>>()
            .join(" ");

        Ok(vec![InitStep::shell(
            "render-config",
            format!(
                "{ESCAPE_FN}\nmkdir -p {data} && sed {expressions} {template} > {data}/{CONFIG_FILE}",
                data = layout.data_dir(),
                template = layout.config_file(CONFIG_FILE),
            ),
        )])
    }

    fn config_files(&self, workload: &Workload<'_>) -> Result<Vec<ConfigFile>, RenderError> {
        let spec = workload.stacks(self.key())?;
        Ok(vec![ConfigFile::new(CONFIG_FILE, self.render_config(spec)?)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{DefaultingContext, defaulted};
    use crate::stacks::spec::{BitcoinNode, StacksNetwork};

    fn miner() -> NodeSpec {
        defaulted(
            NodeSpec {
                network: StacksNetwork::Testnet,
                rpc: true,
                miner: true,
                seed_private_key_secret_name: Some("seed".to_string()),
                bitcoin_node: BitcoinNode {
                    endpoint: "bitcoind".to_string(),
                    rpc_username: "stacks".to_string(),
                    rpc_password_secret_name: "bitcoin-rpc".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
            &DefaultingContext::default(),
        )
    }

    #[test]
    fn test_config_has_placeholders_only() {
        let spec = miner();
        let config = StacksNode.render(&Workload::Stacks(&spec)).unwrap();

        assert_eq!(config.args, vec!["start", "--config", "/home/stacks/data/config.toml"]);
        let content = &config.config_file(CONFIG_FILE).unwrap().content;
        let parsed: toml::Value = toml::from_str(content).unwrap();

        assert_eq!(parsed["node"]["rpc_bind"].as_str(), Some("0.0.0.0:20443"));
        assert_eq!(parsed["node"]["p2p_bind"].as_str(), Some("0.0.0.0:20444"));
        assert_eq!(parsed["node"]["seed"].as_str(), Some("__SEED_PRIVATE_KEY__"));
        assert_eq!(parsed["burnchain"]["mode"].as_str(), Some("xenon"));
        assert_eq!(parsed["burnchain"]["password"].as_str(), Some("__BITCOIN_RPC_PASSWORD__"));
        assert_eq!(parsed["burnchain"]["rpc_port"].as_integer(), Some(8332));
    }

    #[test]
    fn test_init_step_substitutes_secrets() {
        let spec = miner();
        let config = StacksNode.render(&Workload::Stacks(&spec)).unwrap();

        assert_eq!(config.env.len(), 2);
        let script = &config.init_steps[0].args[0];
        assert!(script.starts_with("esc() {"));
        assert!(script.contains(r#"-e "s|__BITCOIN_RPC_PASSWORD__|$(esc "$BITCOIN_RPC_PASSWORD")|""#));
        assert!(script.contains(r#"-e "s|__SEED_PRIVATE_KEY__|$(esc "$SEED_PRIVATE_KEY")|""#));
        assert!(script.ends_with("/home/stacks/config/config.toml > /home/stacks/data/config.toml"));
    }

    #[cfg(unix)]
    #[test]
    fn test_init_step_keeps_special_characters_in_secrets() {
        use std::fs;
        use std::process::Command;

        let spec = miner();
        let config = StacksNode.render(&Workload::Stacks(&spec)).unwrap();
        let template = &config.config_file(CONFIG_FILE).unwrap().content;
        assert!(template.contains(r#"password = "__BITCOIN_RPC_PASSWORD__""#));

        let root = std::env::temp_dir().join(format!("nodesmith-stacks-{}", std::process::id()));
        fs::create_dir_all(root.join("config")).unwrap();
        fs::write(root.join("config").join(CONFIG_FILE), template).unwrap();
        let script = config.init_steps[0].args[0].replace(HOME, root.to_str().unwrap());

        for password in ["p&ss", "a|b", "q\"uote", r"back\slash", "all&|\\\"'$(x)"] {
            let status = Command::new("/bin/sh")
                .arg("-c")
                .arg(&script)
                .env(BITCOIN_RPC_PASSWORD_ENV, password)
                .env(SEED_PRIVATE_KEY_ENV, "0xc0ffee")
                .status()
                .unwrap();
            assert!(status.success(), "script failed for {password:?}");

            let rendered = fs::read_to_string(root.join("data").join(CONFIG_FILE)).unwrap();
            let parsed: toml::Value = toml::from_str(&rendered).unwrap();
            assert_eq!(parsed["burnchain"]["password"].as_str(), Some(password));
            assert_eq!(parsed["node"]["seed"].as_str(), Some("0xc0ffee"));
        }

        fs::remove_dir_all(&root).ok();
    }
}
