//! Rendering of admitted manifests into workload objects

use crate::container::{ContainerFactory, WorkloadObjects, WorkloadRequest};
use crate::manifest::Manifest;
use nodesmith_domain::{Compiler, RenderError, RenderedLaunchConfig};
use tracing::{debug, info};

/// One rendered client and the objects that run it
#[derive(Debug, Clone)]
pub struct CompiledWorkload {
    pub name: String,
    pub launch: RenderedLaunchConfig,
    pub objects: WorkloadObjects,
}

/// Renders every workload of an admitted manifest.
///
/// Fails on the first workload whose client has no registered strategy.
pub fn render_manifest(
    compiler: &Compiler,
    factory: &ContainerFactory,
    manifest: &Manifest,
) -> Result<Vec<CompiledWorkload>, RenderError> {
    let namespace = manifest.namespace();

    manifest
        .workloads()
        .into_iter()
        .map(|named| {
            let name = named.object_name();
            let client = named.workload.client_key();
            let launch = compiler.render(&named.workload)?;
            debug!(%name, %client, args = launch.args.len(), "Workload rendered");

            let objects = factory.build(&WorkloadRequest {
                name: &name,
                namespace: namespace.as_deref(),
                client,
                launch: &launch,
                resources: named.workload.resources(),
            });
            info!(%name, %client, image = %launch.image, "Workload compiled");

            Ok(CompiledWorkload {
                name,
                launch,
                objects,
            })
        })
        .collect()
}
