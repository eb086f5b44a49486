//! Manifest decoding
//!
//! A manifest is one Kubernetes-style document, YAML or JSON, whose
//! `apiVersion` and `kind` select the typed node resource it decodes into.

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::core::object::HasSpec;
use kube::core::TypeMeta;
use kube::{CustomResourceExt, Resource, ResourceExt};
use nodesmith_domain::{
    Compiler, Defaulter, Validate, ValidationError, Workload, aptos, bitcoin, ethereum, ethereum2,
    filecoin, ipfs, near, polkadot, stacks,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to decode manifest: {0}")]
    Decode(#[from] serde_yaml::Error),

    #[error("unknown resource kind {kind} in {api_version}")]
    UnknownKind { api_version: String, kind: String },

    #[error("can't update a {old} with a {new}")]
    KindMismatch { old: String, new: String },

    #[error(transparent)]
    Rejected(#[from] ValidationError),
}

/// One workload of a manifest with the name its objects are created under
#[derive(Debug, Clone, Copy)]
pub struct NamedWorkload<'a> {
    pub name: &'a str,
    pub node: Option<&'a str>,
    pub workload: Workload<'a>,
}

impl NamedWorkload<'_> {
    /// Object name: the resource name, suffixed by the node name for networks
    pub fn object_name(&self) -> String {
        match self.node {
            Some(node) => format!("{}-{}", self.name, node),
            None => self.name.to_string(),
        }
    }
}

/// Defaults and validates a resource's spec in place
fn admit_resource<K>(compiler: &Compiler, mut resource: K, old: Option<&K>) -> Result<K, ValidationError>
where
    K: HasSpec,
    K::Spec: Defaulter + Validate + Clone,
{
    let spec = compiler.admit(resource.spec().clone(), old.map(HasSpec::spec))?;
    *resource.spec_mut() = spec;
    Ok(resource)
}

macro_rules! manifests {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        /// A decoded node resource
        #[derive(Debug, Clone)]
        pub enum Manifest {
            $($variant($ty)),+
        }

        impl Manifest {
            /// Decodes a YAML or JSON document
            pub fn parse(input: &str) -> Result<Self, ManifestError> {
                let value: serde_yaml::Value = serde_yaml::from_str(input)?;
                let meta: TypeMeta = serde_yaml::from_value(value.clone())?;
                $(
                    if meta.api_version == <$ty as Resource>::api_version(&())
                        && meta.kind == <$ty as Resource>::kind(&())
                    {
                        debug!(kind = %meta.kind, api_version = %meta.api_version, "Manifest decoded");
                        return Ok(Manifest::$variant(serde_yaml::from_value(value)?));
                    }
                )+
                Err(ManifestError::UnknownKind {
                    api_version: meta.api_version,
                    kind: meta.kind,
                })
            }

            /// `<kind>.<group>` of the resource, e.g. `Node.bitcoin.nodesmith.io`
            pub fn kind(&self) -> String {
                match self {
                    $(Manifest::$variant(_) => format!(
                        "{}.{}",
                        <$ty as Resource>::kind(&()),
                        <$ty as Resource>::group(&())
                    )),+
                }
            }

            pub fn name(&self) -> String {
                match self {
                    $(Manifest::$variant(resource) => resource.name_any()),+
                }
            }

            pub fn namespace(&self) -> Option<String> {
                match self {
                    $(Manifest::$variant(resource) => resource.namespace()),+
                }
            }

            /// Defaults the spec and validates it against `old` on update
            pub fn admit(self, compiler: &Compiler, old: Option<&Manifest>) -> Result<Manifest, ManifestError> {
                match (self, old) {
                    $(
                        (Manifest::$variant(resource), None) => {
                            Ok(Manifest::$variant(admit_resource(compiler, resource, None)?))
                        }
                        (Manifest::$variant(resource), Some(Manifest::$variant(previous))) => {
                            Ok(Manifest::$variant(admit_resource(compiler, resource, Some(previous))?))
                        }
                    )+
                    (new, Some(old)) => Err(ManifestError::KindMismatch {
                        old: old.kind(),
                        new: new.kind(),
                    }),
                }
            }

            pub fn to_yaml(&self) -> Result<String, ManifestError> {
                let yaml = match self {
                    $(Manifest::$variant(resource) => serde_yaml::to_string(resource)?),+
                };
                Ok(yaml)
            }
        }

        /// Definitions of every node resource
        pub fn crds() -> Vec<CustomResourceDefinition> {
            vec![$(<$ty as CustomResourceExt>::crd()),+]
        }
    };
}

manifests! {
    EthereumNetwork => ethereum::Network,
    BeaconNode => ethereum2::BeaconNode,
    Validator => ethereum2::Validator,
    BitcoinNode => bitcoin::Node,
    FilecoinNode => filecoin::Node,
    IpfsPeer => ipfs::Peer,
    IpfsClusterPeer => ipfs::ClusterPeer,
    NearNode => near::Node,
    StacksNode => stacks::Node,
    AptosNode => aptos::Node,
    PolkadotNode => polkadot::Node,
}

impl Manifest {
    /// Workloads to render: one per node of an Ethereum network, one otherwise
    pub fn workloads(&self) -> Vec<NamedWorkload<'_>> {
        match self {
            Manifest::EthereumNetwork(network) => {
                let name = resource_name(network);
                network
                    .spec
                    .nodes
                    .iter()
                    .map(|node| NamedWorkload {
                        name,
                        node: Some(&node.name),
                        workload: Workload::Ethereum {
                            network: &network.spec,
                            node,
                        },
                    })
                    .collect()
            }
            Manifest::BeaconNode(r) => single(resource_name(r), Workload::BeaconNode(&r.spec)),
            Manifest::Validator(r) => single(resource_name(r), Workload::Validator(&r.spec)),
            Manifest::BitcoinNode(r) => single(resource_name(r), Workload::Bitcoin(&r.spec)),
            Manifest::FilecoinNode(r) => single(resource_name(r), Workload::Filecoin(&r.spec)),
            Manifest::IpfsPeer(r) => single(resource_name(r), Workload::IpfsPeer(&r.spec)),
            Manifest::IpfsClusterPeer(r) => {
                single(resource_name(r), Workload::IpfsClusterPeer(&r.spec))
            }
            Manifest::NearNode(r) => single(resource_name(r), Workload::Near(&r.spec)),
            Manifest::StacksNode(r) => single(resource_name(r), Workload::Stacks(&r.spec)),
            Manifest::AptosNode(r) => single(resource_name(r), Workload::Aptos(&r.spec)),
            Manifest::PolkadotNode(r) => single(resource_name(r), Workload::Polkadot(&r.spec)),
        }
    }
}

fn single<'a>(name: &'a str, workload: Workload<'a>) -> Vec<NamedWorkload<'a>> {
    vec![NamedWorkload {
        name,
        node: None,
        workload,
    }]
}

fn resource_name<K: Resource>(resource: &K) -> &str {
    resource.meta().name.as_deref().unwrap_or_default()
}
