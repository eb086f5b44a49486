//! Nodesmith Operator - collaborator-facing surface of the node compiler
//!
//! Decodes node manifests, admits them (Default then Validate, with
//! rejections mapped to Kubernetes `Status` causes) and assembles the
//! containers, volumes and claims that run each rendered client.

pub mod admission;
pub mod container;
pub mod manifest;
pub mod render;

pub use admission::{Admission, review};
pub use container::{ContainerFactory, ContainerFactoryConfig, WorkloadObjects};
pub use manifest::{Manifest, ManifestError, NamedWorkload, crds};
pub use render::{CompiledWorkload, render_manifest};
