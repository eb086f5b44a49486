//! Client Strategy Registry
//!
//! Maps a [`ClientKey`] to the strategy that renders it. Built once with
//! every built-in strategy; lookups never mutate it.

use super::{ConfigFile, EnvVar, InitStep, RenderedLaunchConfig};
use crate::clients::ClientKey;
use crate::defaults::ImageCatalog;
use crate::resources::Resources;
use crate::shared_kernel::RenderError;
use crate::{aptos, bitcoin, ethereum, ethereum2, filecoin, ipfs, near, polkadot, stacks};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A defaulted spec ready to be rendered by one strategy
#[derive(Debug, Clone, Copy)]
pub enum Workload<'a> {
    /// One node of an Ethereum network
    Ethereum {
        network: &'a ethereum::NetworkSpec,
        node: &'a ethereum::Node,
    },
    BeaconNode(&'a ethereum2::BeaconNodeSpec),
    Validator(&'a ethereum2::ValidatorSpec),
    Bitcoin(&'a bitcoin::NodeSpec),
    Filecoin(&'a filecoin::NodeSpec),
    IpfsPeer(&'a ipfs::PeerSpec),
    IpfsClusterPeer(&'a ipfs::ClusterPeerSpec),
    Near(&'a near::NodeSpec),
    Stacks(&'a stacks::NodeSpec),
    Aptos(&'a aptos::NodeSpec),
    Polkadot(&'a polkadot::NodeSpec),
}

macro_rules! workload_accessor {
    ($(#[$meta:meta])* $name:ident, $variant:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $name(&self, strategy: ClientKey) -> Result<&'a $ty, RenderError> {
            match *self {
                Workload::$variant(spec) => Ok(spec),
                other => Err(RenderError::WorkloadMismatch {
                    strategy,
                    found: other.client_key(),
                }),
            }
        }
    };
}

impl<'a> Workload<'a> {
    pub fn client_key(&self) -> ClientKey {
        match self {
            Workload::Ethereum { node, .. } => ClientKey::Ethereum(node.client()),
            Workload::BeaconNode(spec) => ClientKey::BeaconNode(spec.client),
            Workload::Validator(spec) => ClientKey::Validator(spec.client),
            Workload::Bitcoin(_) => ClientKey::Bitcoin,
            Workload::Filecoin(_) => ClientKey::Filecoin,
            Workload::IpfsPeer(_) => ClientKey::IpfsPeer,
            Workload::IpfsClusterPeer(_) => ClientKey::IpfsClusterPeer,
            Workload::Near(_) => ClientKey::Near,
            Workload::Stacks(_) => ClientKey::Stacks,
            Workload::Aptos(_) => ClientKey::Aptos,
            Workload::Polkadot(_) => ClientKey::Polkadot,
        }
    }

    /// Image set on the spec, normally by defaulting
    pub fn image(&self) -> Option<&'a str> {
        match *self {
            Workload::Ethereum { node, .. } => node.image.as_deref(),
            Workload::BeaconNode(spec) => spec.image.as_deref(),
            Workload::Validator(spec) => spec.image.as_deref(),
            Workload::Bitcoin(spec) => spec.image.as_deref(),
            Workload::Filecoin(spec) => spec.image.as_deref(),
            Workload::IpfsPeer(spec) => spec.image.as_deref(),
            Workload::IpfsClusterPeer(spec) => spec.image.as_deref(),
            Workload::Near(spec) => spec.image.as_deref(),
            Workload::Stacks(spec) => spec.image.as_deref(),
            Workload::Aptos(spec) => spec.image.as_deref(),
            Workload::Polkadot(spec) => spec.image.as_deref(),
        }
    }

    /// Compute and storage resources, set by defaulting
    pub fn resources(&self) -> Option<&'a Resources> {
        match *self {
            Workload::Ethereum { node, .. } => node.resources.as_ref(),
            Workload::BeaconNode(spec) => spec.resources.as_ref(),
            Workload::Validator(spec) => spec.resources.as_ref(),
            Workload::Bitcoin(spec) => spec.resources.as_ref(),
            Workload::Filecoin(spec) => spec.resources.as_ref(),
            Workload::IpfsPeer(spec) => spec.resources.as_ref(),
            Workload::IpfsClusterPeer(spec) => spec.resources.as_ref(),
            Workload::Near(spec) => spec.resources.as_ref(),
            Workload::Stacks(spec) => spec.resources.as_ref(),
            Workload::Aptos(spec) => spec.resources.as_ref(),
            Workload::Polkadot(spec) => spec.resources.as_ref(),
        }
    }

    /// Network name used to pick image tags
    pub fn network(&self) -> &'a str {
        match *self {
            Workload::Ethereum { network, .. } => network.network_name(),
            Workload::BeaconNode(spec) => &spec.network,
            Workload::Validator(spec) => &spec.network,
            Workload::Bitcoin(spec) => spec.network.as_str(),
            Workload::Filecoin(spec) => spec.network.as_str(),
            Workload::IpfsPeer(_) | Workload::IpfsClusterPeer(_) => "",
            Workload::Near(spec) => spec.network.as_str(),
            Workload::Stacks(spec) => spec.network.as_str(),
            Workload::Aptos(spec) => spec.network.as_str(),
            Workload::Polkadot(spec) => spec.network.as_str(),
        }
    }

    /// The Ethereum network and node being rendered
    pub fn ethereum(
        &self,
        strategy: ClientKey,
    ) -> Result<(&'a ethereum::NetworkSpec, &'a ethereum::Node), RenderError> {
        match *self {
            Workload::Ethereum { network, node } => Ok((network, node)),
            other => Err(RenderError::WorkloadMismatch {
                strategy,
                found: other.client_key(),
            }),
        }
    }

    workload_accessor!(beacon_node, BeaconNode, ethereum2::BeaconNodeSpec);
    workload_accessor!(validator, Validator, ethereum2::ValidatorSpec);
    workload_accessor!(bitcoin, Bitcoin, bitcoin::NodeSpec);
    workload_accessor!(filecoin, Filecoin, filecoin::NodeSpec);
    workload_accessor!(ipfs_peer, IpfsPeer, ipfs::PeerSpec);
    workload_accessor!(ipfs_cluster_peer, IpfsClusterPeer, ipfs::ClusterPeerSpec);
    workload_accessor!(near, Near, near::NodeSpec);
    workload_accessor!(stacks, Stacks, stacks::NodeSpec);
    workload_accessor!(aptos, Aptos, aptos::NodeSpec);
    workload_accessor!(polkadot, Polkadot, polkadot::NodeSpec);
}

/// Renders one client variant.
///
/// `args`, `env`, `init_steps` and `config_files` are pure functions of the
/// defaulted workload; their output order is part of the contract.
pub trait ClientStrategy: Send + Sync {
    fn key(&self) -> ClientKey;

    fn command(&self) -> Vec<String>;

    fn home_dir(&self) -> &'static str;

    fn args(&self, workload: &Workload<'_>) -> Result<Vec<String>, RenderError>;

    fn env(&self, _workload: &Workload<'_>) -> Result<Vec<EnvVar>, RenderError> {
        Ok(Vec::new())
    }

    fn init_steps(&self, _workload: &Workload<'_>) -> Result<Vec<InitStep>, RenderError> {
        Ok(Vec::new())
    }

    fn config_files(&self, _workload: &Workload<'_>) -> Result<Vec<ConfigFile>, RenderError> {
        Ok(Vec::new())
    }

    /// Image from the spec, falling back to `images`
    fn image(&self, workload: &Workload<'_>, images: &ImageCatalog) -> String {
        workload
            .image()
            .map(str::to_string)
            .unwrap_or_else(|| images.image_for(self.key(), workload.network()))
    }

    /// Renders with the built-in image catalog
    fn render(&self, workload: &Workload<'_>) -> Result<RenderedLaunchConfig, RenderError> {
        self.render_with_images(workload, &ImageCatalog::builtin())
    }

    fn render_with_images(
        &self,
        workload: &Workload<'_>,
        images: &ImageCatalog,
    ) -> Result<RenderedLaunchConfig, RenderError> {
        let found = workload.client_key();
        if found != self.key() {
            return Err(RenderError::WorkloadMismatch {
                strategy: self.key(),
                found,
            });
        }

        Ok(RenderedLaunchConfig {
            image: self.image(workload, images),
            command: self.command(),
            args: self.args(workload)?,
            env: self.env(workload)?,
            home_dir: self.home_dir().to_string(),
            init_steps: self.init_steps(workload)?,
            config_files: self.config_files(workload)?,
        })
    }
}

/// Dispatch table from client key to strategy
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: HashMap<ClientKey, Arc<dyn ClientStrategy>>,
}

impl StrategyRegistry {
    /// Registry without any strategy
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Registry with every built-in strategy
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        ethereum::register_strategies(&mut registry);
        ethereum2::register_strategies(&mut registry);
        registry
            .register(bitcoin::BitcoinCore)
            .register(filecoin::Lotus)
            .register(ipfs::Kubo)
            .register(ipfs::IpfsClusterService)
            .register(near::Nearcore)
            .register(stacks::StacksNode)
            .register(aptos::AptosNode)
            .register(polkadot::PolkadotNode);
        registry
    }

    /// Adds a strategy, replacing any previous one for the same key
    pub fn register(&mut self, strategy: impl ClientStrategy + 'static) -> &mut Self {
        self.strategies.insert(strategy.key(), Arc::new(strategy));
        self
    }

    pub fn resolve(&self, key: ClientKey) -> Result<&dyn ClientStrategy, RenderError> {
        self.strategies
            .get(&key)
            .map(|strategy| strategy.as_ref())
            .ok_or_else(|| RenderError::unsupported(key))
    }

    /// Resolves the workload's strategy and renders it
    pub fn render(&self, workload: &Workload<'_>) -> Result<RenderedLaunchConfig, RenderError> {
        self.resolve(workload.client_key())?.render(workload)
    }

    pub fn contains(&self, key: ClientKey) -> bool {
        self.strategies.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self.strategies.keys().map(ToString::to_string).collect();
        keys.sort();
        f.debug_struct("StrategyRegistry").field("strategies", &keys).finish()
    }
}
