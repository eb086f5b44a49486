//! Default Resolver building blocks
//!
//! Every spec type implements [`Defaulter`]. Defaulting is append-only: a
//! field that is already set is never touched, so running it twice yields
//! the same spec as running it once.

use crate::clients::{ClientKey, Eth2Client, EthereumClient};
use crate::resources::Resources;
use nodesmith_shared::config::OperatorConfig;
use std::collections::HashMap;

/// Fills unset optional fields of a spec
pub trait Defaulter {
    fn apply_defaults(&mut self, ctx: &DefaultingContext);

    /// Defaults an update of `old`. Values fixed at admission, such as the
    /// storage class, come from `old` instead of the current operator config.
    fn apply_update_defaults(&mut self, ctx: &DefaultingContext, old: &Self);
}

/// Consumes a spec and returns its defaulted form
pub fn defaulted<T: Defaulter>(mut spec: T, ctx: &DefaultingContext) -> T {
    spec.apply_defaults(ctx);
    spec
}

/// Operator-level inputs to defaulting
#[derive(Debug, Clone, Default)]
pub struct DefaultingContext {
    pub images: ImageCatalog,
    pub storage_class: Option<String>,
}

impl DefaultingContext {
    pub fn from_config(config: &OperatorConfig) -> Self {
        let images = config
            .image_overrides
            .iter()
            .filter_map(|(key, image)| ImageKey::from_config_key(key).map(|key| (key, image)))
            .fold(ImageCatalog::builtin(), |catalog, (key, image)| {
                catalog.with_override(key, image.clone())
            });

        Self {
            images,
            storage_class: config.default_storage_class.clone(),
        }
    }

    /// Context for updating a spec admitted with `resources`
    pub fn admitted_with(&self, resources: Option<&Resources>) -> Self {
        Self {
            images: self.images.clone(),
            storage_class: resources.and_then(|r| r.storage_class.clone()),
        }
    }

    pub fn storage_class(&self) -> Option<&str> {
        self.storage_class.as_deref()
    }

    /// Image for a client joining `network`
    pub fn image(&self, key: ClientKey, network: &str) -> String {
        self.images.image_for(key, network)
    }
}

/// Container image families; beacon and validator binaries differ for some clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKey {
    Besu,
    Geth,
    Parity,
    Teku,
    PrysmBeacon,
    PrysmValidator,
    Lighthouse,
    NimbusBeacon,
    NimbusValidator,
    BitcoinCore,
    Lotus,
    Kubo,
    IpfsCluster,
    Nearcore,
    StacksNode,
    AptosNode,
    Polkadot,
}

impl ImageKey {
    pub const ALL: [ImageKey; 17] = [
        ImageKey::Besu,
        ImageKey::Geth,
        ImageKey::Parity,
        ImageKey::Teku,
        ImageKey::PrysmBeacon,
        ImageKey::PrysmValidator,
        ImageKey::Lighthouse,
        ImageKey::NimbusBeacon,
        ImageKey::NimbusValidator,
        ImageKey::BitcoinCore,
        ImageKey::Lotus,
        ImageKey::Kubo,
        ImageKey::IpfsCluster,
        ImageKey::Nearcore,
        ImageKey::StacksNode,
        ImageKey::AptosNode,
        ImageKey::Polkadot,
    ];

    /// Lowercase key used by `NODESMITH_IMAGE_<KEY>` overrides
    pub fn config_key(&self) -> &'static str {
        match self {
            ImageKey::Besu => "besu",
            ImageKey::Geth => "geth",
            ImageKey::Parity => "parity",
            ImageKey::Teku => "teku",
            ImageKey::PrysmBeacon => "prysm_beacon",
            ImageKey::PrysmValidator => "prysm_validator",
            ImageKey::Lighthouse => "lighthouse",
            ImageKey::NimbusBeacon => "nimbus_beacon",
            ImageKey::NimbusValidator => "nimbus_validator",
            ImageKey::BitcoinCore => "bitcoin_core",
            ImageKey::Lotus => "lotus",
            ImageKey::Kubo => "kubo",
            ImageKey::IpfsCluster => "ipfs_cluster",
            ImageKey::Nearcore => "nearcore",
            ImageKey::StacksNode => "stacks_node",
            ImageKey::AptosNode => "aptos_node",
            ImageKey::Polkadot => "polkadot",
        }
    }

    pub fn from_config_key(key: &str) -> Option<Self> {
        let key = key.to_ascii_lowercase();
        Self::ALL.into_iter().find(|k| k.config_key() == key)
    }

    pub fn for_client(key: ClientKey) -> Self {
        match key {
            ClientKey::Ethereum(EthereumClient::Besu) => ImageKey::Besu,
            ClientKey::Ethereum(EthereumClient::Geth) => ImageKey::Geth,
            ClientKey::Ethereum(EthereumClient::Parity) => ImageKey::Parity,
            ClientKey::BeaconNode(Eth2Client::Teku) | ClientKey::Validator(Eth2Client::Teku) => {
                ImageKey::Teku
            }
            ClientKey::BeaconNode(Eth2Client::Prysm) => ImageKey::PrysmBeacon,
            ClientKey::Validator(Eth2Client::Prysm) => ImageKey::PrysmValidator,
            ClientKey::BeaconNode(Eth2Client::Lighthouse)
            | ClientKey::Validator(Eth2Client::Lighthouse) => ImageKey::Lighthouse,
            ClientKey::BeaconNode(Eth2Client::Nimbus) => ImageKey::NimbusBeacon,
            ClientKey::Validator(Eth2Client::Nimbus) => ImageKey::NimbusValidator,
            ClientKey::Bitcoin => ImageKey::BitcoinCore,
            ClientKey::Filecoin => ImageKey::Lotus,
            ClientKey::IpfsPeer => ImageKey::Kubo,
            ClientKey::IpfsClusterPeer => ImageKey::IpfsCluster,
            ClientKey::Near => ImageKey::Nearcore,
            ClientKey::Stacks => ImageKey::StacksNode,
            ClientKey::Aptos => ImageKey::AptosNode,
            ClientKey::Polkadot => ImageKey::Polkadot,
        }
    }
}

const LOTUS_IMAGE: &str = "filecoin/lotus-all-in-one:v1.23.3";

fn builtin_image(key: ImageKey, network: &str) -> String {
    match key {
        ImageKey::Besu => "hyperledger/besu:23.4.4".to_string(),
        ImageKey::Geth => "ethereum/client-go:v1.12.2".to_string(),
        ImageKey::Parity => "openethereum/openethereum:v3.3.5".to_string(),
        ImageKey::Teku => "consensys/teku:23.9.0".to_string(),
        ImageKey::PrysmBeacon => "gcr.io/prysmaticlabs/prysm/beacon-chain:v4.0.8".to_string(),
        ImageKey::PrysmValidator => "gcr.io/prysmaticlabs/prysm/validator:v4.0.8".to_string(),
        ImageKey::Lighthouse => "sigp/lighthouse:v4.4.1".to_string(),
        ImageKey::NimbusBeacon => "statusim/nimbus-eth2:multiarch-v23.9.0".to_string(),
        ImageKey::NimbusValidator => {
            "statusim/nimbus-validator-client:multiarch-v23.9.0".to_string()
        }
        ImageKey::BitcoinCore => "ruimarinho/bitcoin-core:24.0.1".to_string(),
        ImageKey::Lotus => match network {
            "calibration" => format!("{LOTUS_IMAGE}-calibnet"),
            "devnet" => format!("{LOTUS_IMAGE}-debug"),
            _ => LOTUS_IMAGE.to_string(),
        },
        ImageKey::Kubo => "ipfs/kubo:v0.22.0".to_string(),
        ImageKey::IpfsCluster => "ipfs/ipfs-cluster:v1.0.6".to_string(),
        ImageKey::Nearcore => "nearprotocol/nearcore:1.35.0".to_string(),
        ImageKey::StacksNode => "blockstack/stacks-blockchain:2.4.0.0.0".to_string(),
        ImageKey::AptosNode => format!("aptoslabs/validator:{}", aptos_tag(network)),
        ImageKey::Polkadot => "parity/polkadot:v1.0.0".to_string(),
    }
}

fn aptos_tag(network: &str) -> &str {
    match network {
        "testnet" | "mainnet" => network,
        _ => "devnet",
    }
}

/// Built-in client images plus operator overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageCatalog {
    overrides: HashMap<ImageKey, String>,
}

impl ImageCatalog {
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Replaces the image of one family for every network
    pub fn with_override(mut self, key: ImageKey, image: impl Into<String>) -> Self {
        self.overrides.insert(key, image.into());
        self
    }

    pub fn image_for(&self, key: ClientKey, network: &str) -> String {
        let image_key = ImageKey::for_client(key);
        self.overrides
            .get(&image_key)
            .cloned()
            .unwrap_or_else(|| builtin_image(image_key, network))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_image_tag_follows_network() {
        let catalog = ImageCatalog::builtin();
        assert_eq!(
            catalog.image_for(ClientKey::Filecoin, "calibration"),
            "filecoin/lotus-all-in-one:v1.23.3-calibnet"
        );
        assert_eq!(
            catalog.image_for(ClientKey::Aptos, "testnet"),
            "aptoslabs/validator:testnet"
        );
    }

    #[test]
    fn test_beacon_and_validator_images_differ_for_prysm() {
        let catalog = ImageCatalog::builtin();
        assert_ne!(
            catalog.image_for(ClientKey::BeaconNode(Eth2Client::Prysm), "mainnet"),
            catalog.image_for(ClientKey::Validator(Eth2Client::Prysm), "mainnet")
        );
        assert_eq!(
            catalog.image_for(ClientKey::BeaconNode(Eth2Client::Teku), "mainnet"),
            catalog.image_for(ClientKey::Validator(Eth2Client::Teku), "mainnet")
        );
    }

    #[test]
    fn test_override_applies_to_every_network() {
        let catalog = ImageCatalog::builtin().with_override(ImageKey::Lotus, "registry.local/lotus:dev");
        assert_eq!(catalog.image_for(ClientKey::Filecoin, "mainnet"), "registry.local/lotus:dev");
        assert_eq!(catalog.image_for(ClientKey::Filecoin, "devnet"), "registry.local/lotus:dev");
    }

    #[test]
    fn test_context_from_operator_config() {
        let config = OperatorConfig {
            default_storage_class: Some("fast-ssd".to_string()),
            image_overrides: BTreeMap::from([
                ("geth".to_string(), "mirror/geth:pinned".to_string()),
                ("unknown".to_string(), "ignored:latest".to_string()),
            ]),
            ..Default::default()
        };

        let ctx = DefaultingContext::from_config(&config);
        assert_eq!(ctx.storage_class(), Some("fast-ssd"));
        assert_eq!(
            ctx.image(ClientKey::Ethereum(EthereumClient::Geth), "mainnet"),
            "mirror/geth:pinned"
        );
    }

    #[test]
    fn test_config_keys_round_trip() {
        for key in ImageKey::ALL {
            assert_eq!(ImageKey::from_config_key(key.config_key()), Some(key));
        }
        assert_eq!(ImageKey::from_config_key("PRYSM_BEACON"), Some(ImageKey::PrysmBeacon));
    }
}
