//! Ethereum (execution layer) networks
//!
//! A `Network` describes either a public network to join or a private
//! network by its genesis block, plus the nodes running it. Each node is
//! rendered separately by the strategy of its client.

pub mod besu;
pub mod chains;
pub mod defaults;
pub mod genesis;
pub mod geth;
pub mod parity;
pub mod spec;
pub mod validation;

pub use besu::Besu;
pub use geth::Geth;
pub use parity::Parity;
pub use spec::*;

use crate::rendering::{ConfigFile, Layout, SECRET_KEY, SECRET_PASSWORD, StrategyRegistry};

pub const STATIC_NODES_FILE: &str = "static-nodes.json";

pub fn register_strategies(registry: &mut StrategyRegistry) {
    registry.register(Besu).register(Geth).register(Parity);
}

/// Node private key file, when the node has one
fn node_key_file(layout: &Layout<'_>, node: &Node) -> Option<String> {
    node.node_private_key_secret_name
        .as_deref()
        .map(|secret| layout.secret_file(secret, SECRET_KEY))
}

/// Files of the imported account: private key, then password
fn import_files(layout: &Layout<'_>, node: &Node) -> Option<(String, String)> {
    node.import.as_ref().map(|import| {
        (
            layout.secret_file(&import.private_key_secret_name, SECRET_KEY),
            layout.secret_file(&import.password_secret_name, SECRET_PASSWORD),
        )
    })
}

/// `static-nodes.json`, when the node has static peers
fn static_nodes_file(node: &Node) -> Option<ConfigFile> {
    if node.static_nodes.is_empty() {
        return None;
    }
    serde_json::to_string_pretty(&node.static_nodes)
        .ok()
        .map(|content| ConfigFile::new(STATIC_NODES_FILE, content))
}
