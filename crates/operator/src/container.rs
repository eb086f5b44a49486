//! Container Factory
//!
//! Turns a rendered launch config into the Kubernetes objects that run it:
//! - main container and one init container per init step
//! - volumes and mounts for data, config files and secrets
//! - resource requirements from the defaulted spec
//! - the data volume claim and the config map holding rendered files

use k8s_openapi::api::core::v1::{
    ConfigMap, ConfigMapVolumeSource, Container, EnvVar as K8sEnvVar, EnvVarSource,
    PersistentVolumeClaim, PersistentVolumeClaimSpec, PersistentVolumeClaimVolumeSource, Pod,
    PodSpec, ResourceRequirements, SecretKeySelector, SecretVolumeSource, Volume, VolumeMount,
    VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use nodesmith_domain::{ClientKey, EnvSource, EnvVar, InitStep, RenderedLaunchConfig, Resources};
use std::collections::BTreeMap;

const DATA_VOLUME: &str = "data";
const CONFIG_VOLUME: &str = "config";

pub const LABEL_NAME: &str = "app.kubernetes.io/name";
pub const LABEL_MANAGED_BY: &str = "app.kubernetes.io/managed-by";
pub const LABEL_PROTOCOL: &str = "nodesmith.io/protocol";
pub const LABEL_CLIENT: &str = "nodesmith.io/client";

/// Base configuration applied to every workload
#[derive(Debug, Clone)]
pub struct ContainerFactoryConfig {
    /// Labels added to every object
    pub base_labels: BTreeMap<String, String>,
    pub image_pull_policy: String,
    /// Access mode of the data volume claim
    pub data_access_mode: String,
}

impl Default for ContainerFactoryConfig {
    fn default() -> Self {
        Self {
            base_labels: BTreeMap::from([(LABEL_MANAGED_BY.to_string(), "nodesmith".to_string())]),
            image_pull_policy: "IfNotPresent".to_string(),
            data_access_mode: "ReadWriteOnce".to_string(),
        }
    }
}

/// Objects describing one running client
#[derive(Debug, Clone)]
pub struct WorkloadObjects {
    /// Rendered config files, absent when the client has none
    pub config_map: Option<ConfigMap>,
    pub claim: PersistentVolumeClaim,
    pub pod: Pod,
}

/// Input of [`ContainerFactory::build`]
#[derive(Debug, Clone, Copy)]
pub struct WorkloadRequest<'a> {
    pub name: &'a str,
    pub namespace: Option<&'a str>,
    pub client: ClientKey,
    pub launch: &'a RenderedLaunchConfig,
    pub resources: Option<&'a Resources>,
}

#[derive(Debug, Clone, Default)]
pub struct ContainerFactory {
    config: ContainerFactoryConfig,
}

impl ContainerFactory {
    pub fn new(config: Option<ContainerFactoryConfig>) -> Self {
        Self {
            config: config.unwrap_or_default(),
        }
    }

    pub fn build(&self, request: &WorkloadRequest<'_>) -> WorkloadObjects {
        let launch = request.launch;
        let labels = self.build_labels(request);
        let meta = ObjectMeta {
            name: Some(request.name.to_string()),
            namespace: request.namespace.map(str::to_string),
            labels: Some(labels),
            ..Default::default()
        };

        let secrets = launch.mounted_secrets();
        let mounts = self.build_volume_mounts(launch, &secrets);
        let env = build_env(&launch.env);

        let container = Container {
            name: request.client.variant().to_string(),
            image: Some(launch.image.clone()),
            image_pull_policy: Some(self.config.image_pull_policy.clone()),
            command: Some(launch.command.clone()),
            args: Some(launch.args.clone()),
            env: Some(env.clone()),
            resources: request.resources.map(build_resources),
            volume_mounts: Some(mounts.clone()),
            working_dir: Some(launch.home_dir.clone()),
            ..Default::default()
        };

        let init_containers: Vec<Container> = launch
            .init_steps
            .iter()
            .map(|step| self.build_init_container(step, launch, &env, &mounts))
            .collect();

        let pod = Pod {
            metadata: meta.clone(),
            spec: Some(PodSpec {
                containers: vec![container],
                init_containers: (!init_containers.is_empty()).then_some(init_containers),
                volumes: Some(self.build_volumes(request.name, launch, &secrets)),
                ..Default::default()
            }),
            ..Default::default()
        };

        WorkloadObjects {
            config_map: build_config_map(&meta, launch),
            claim: self.build_claim(&meta, request.resources),
            pod,
        }
    }

    fn build_labels(&self, request: &WorkloadRequest<'_>) -> BTreeMap<String, String> {
        let mut labels = self.config.base_labels.clone();
        labels.insert(LABEL_NAME.to_string(), request.name.to_string());
        labels.insert(LABEL_PROTOCOL.to_string(), request.client.protocol().to_string());
        labels.insert(LABEL_CLIENT.to_string(), request.client.variant().to_string());
        labels
    }

    /// Init steps share the main container's image, environment and mounts
    fn build_init_container(
        &self,
        step: &InitStep,
        launch: &RenderedLaunchConfig,
        env: &[K8sEnvVar],
        mounts: &[VolumeMount],
    ) -> Container {
        Container {
            name: step.name.clone(),
            image: Some(launch.image.clone()),
            image_pull_policy: Some(self.config.image_pull_policy.clone()),
            command: Some(step.command.clone()),
            args: Some(step.args.clone()),
            env: Some(env.to_vec()),
            volume_mounts: Some(mounts.to_vec()),
            ..Default::default()
        }
    }

    fn build_volume_mounts(&self, launch: &RenderedLaunchConfig, secrets: &[String]) -> Vec<VolumeMount> {
        let layout = launch.layout();
        let mut mounts = vec![VolumeMount {
            name: DATA_VOLUME.to_string(),
            mount_path: layout.data_dir(),
            ..Default::default()
        }];

        if !launch.config_files.is_empty() {
            mounts.push(VolumeMount {
                name: CONFIG_VOLUME.to_string(),
                mount_path: layout.config_dir(),
                read_only: Some(true),
                ..Default::default()
            });
        }

        mounts.extend(secrets.iter().map(|secret| VolumeMount {
            name: secret_volume(secret),
            mount_path: format!("{}/{}", layout.secrets_dir(), secret),
            read_only: Some(true),
            ..Default::default()
        }));

        mounts
    }

    fn build_volumes(&self, name: &str, launch: &RenderedLaunchConfig, secrets: &[String]) -> Vec<Volume> {
        let mut volumes = vec![Volume {
            name: DATA_VOLUME.to_string(),
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: name.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }];

        if !launch.config_files.is_empty() {
            volumes.push(Volume {
                name: CONFIG_VOLUME.to_string(),
                config_map: Some(ConfigMapVolumeSource {
                    name: name.to_string(),
                    ..Default::default()
                }),
                ..Default::default()
            });
        }

        volumes.extend(secrets.iter().map(|secret| Volume {
            name: secret_volume(secret),
            secret: Some(SecretVolumeSource {
                secret_name: Some(secret.clone()),
                ..Default::default()
            }),
            ..Default::default()
        }));

        volumes
    }

    fn build_claim(&self, meta: &ObjectMeta, resources: Option<&Resources>) -> PersistentVolumeClaim {
        let storage = resources.and_then(|r| r.storage.clone());
        PersistentVolumeClaim {
            metadata: meta.clone(),
            spec: Some(PersistentVolumeClaimSpec {
                access_modes: Some(vec![self.config.data_access_mode.clone()]),
                storage_class_name: resources.and_then(|r| r.storage_class.clone()),
                resources: storage.map(|storage| VolumeResourceRequirements {
                    requests: Some(BTreeMap::from([("storage".to_string(), Quantity(storage))])),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

fn secret_volume(secret: &str) -> String {
    format!("secret-{secret}")
}

fn build_env(env: &[EnvVar]) -> Vec<K8sEnvVar> {
    env.iter()
        .map(|var| match &var.source {
            EnvSource::Value(value) => K8sEnvVar {
                name: var.name.clone(),
                value: Some(value.clone()),
                ..Default::default()
            },
            EnvSource::SecretKeyRef { secret, key } => K8sEnvVar {
                name: var.name.clone(),
                value_from: Some(EnvVarSource {
                    secret_key_ref: Some(SecretKeySelector {
                        name: secret.clone(),
                        key: key.clone(),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        })
        .collect()
}

fn build_resources(resources: &Resources) -> ResourceRequirements {
    let quantities = |entries: [(&str, &Option<String>); 2]| {
        let map: BTreeMap<String, Quantity> = entries
            .into_iter()
            .filter_map(|(name, value)| value.clone().map(|v| (name.to_string(), Quantity(v))))
            .collect();
        (!map.is_empty()).then_some(map)
    };

    ResourceRequirements {
        requests: quantities([("cpu", &resources.cpu), ("memory", &resources.memory)]),
        limits: quantities([("cpu", &resources.cpu_limit), ("memory", &resources.memory_limit)]),
        ..Default::default()
    }
}

fn build_config_map(meta: &ObjectMeta, launch: &RenderedLaunchConfig) -> Option<ConfigMap> {
    if launch.config_files.is_empty() {
        return None;
    }
    Some(ConfigMap {
        metadata: meta.clone(),
        data: Some(
            launch
                .config_files
                .iter()
                .map(|file| (file.name.clone(), file.content.clone()))
                .collect(),
        ),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodesmith_domain::ConfigFile;

    fn launch() -> RenderedLaunchConfig {
        RenderedLaunchConfig {
            image: "example/stacks-node:2.4".to_string(),
            command: vec!["stacks-node".to_string()],
            args: vec!["start".to_string()],
            env: vec![
                EnvVar::value("RUST_LOG", "info"),
                EnvVar::secret("SEED_PRIVATE_KEY", "seed", "key"),
            ],
            home_dir: "/home/stacks".to_string(),
            init_steps: vec![InitStep::shell(
                "render-config",
                "cp /home/stacks/config/config.toml /home/stacks/data && cat /home/stacks/secrets/bitcoin-rpc/password",
            )],
            config_files: vec![ConfigFile::new("config.toml", "[node]\n")],
        }
    }

    fn resources() -> Resources {
        Resources {
            cpu: Some("4".to_string()),
            cpu_limit: Some("8".to_string()),
            memory: Some("4Gi".to_string()),
            memory_limit: Some("8Gi".to_string()),
            storage: Some("100Gi".to_string()),
            storage_class: Some("fast-ssd".to_string()),
        }
    }

    fn build() -> WorkloadObjects {
        let launch = launch();
        let resources = resources();
        ContainerFactory::default().build(&WorkloadRequest {
            name: "stacks",
            namespace: Some("chains"),
            client: ClientKey::Stacks,
            launch: &launch,
            resources: Some(&resources),
        })
    }

    #[test]
    fn test_main_container_carries_launch_config() {
        let objects = build();
        let spec = objects.pod.spec.unwrap();
        let container = &spec.containers[0];

        assert_eq!(container.name, "stacks-node");
        assert_eq!(container.image.as_deref(), Some("example/stacks-node:2.4"));
        assert_eq!(container.args.as_deref(), Some(&["start".to_string()][..]));

        let env = container.env.as_ref().unwrap();
        assert_eq!(env[0].value.as_deref(), Some("info"));
        let secret = env[1].value_from.as_ref().unwrap().secret_key_ref.as_ref().unwrap();
        assert_eq!((secret.name.as_str(), secret.key.as_str()), ("seed", "key"));

        let requirements = container.resources.as_ref().unwrap();
        assert_eq!(requirements.limits.as_ref().unwrap()["memory"], Quantity("8Gi".to_string()));
    }

    #[test]
    fn test_init_containers_share_environment_and_mounts() {
        let spec = build().pod.spec.unwrap();
        let init = &spec.init_containers.as_ref().unwrap()[0];

        assert_eq!(init.name, "render-config");
        assert_eq!(init.env, spec.containers[0].env);
        assert_eq!(init.volume_mounts, spec.containers[0].volume_mounts);
    }

    #[test]
    fn test_volumes_cover_data_config_and_secrets() {
        let objects = build();
        let spec = objects.pod.spec.unwrap();

        let volumes: Vec<&str> = spec.volumes.as_ref().unwrap().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(volumes, vec!["data", "config", "secret-bitcoin-rpc"]);

        let mounts: Vec<&str> = spec.containers[0]
            .volume_mounts
            .as_ref()
            .unwrap()
            .iter()
            .map(|m| m.mount_path.as_str())
            .collect();
        assert_eq!(
            mounts,
            vec!["/home/stacks/data", "/home/stacks/config", "/home/stacks/secrets/bitcoin-rpc"]
        );

        let data = objects.config_map.unwrap().data.unwrap();
        assert_eq!(data["config.toml"], "[node]\n");
    }

    #[test]
    fn test_claim_requests_storage_and_class() {
        let claim = build().claim;
        assert_eq!(claim.metadata.namespace.as_deref(), Some("chains"));

        let spec = claim.spec.unwrap();
        assert_eq!(spec.storage_class_name.as_deref(), Some("fast-ssd"));
        let requests = spec.resources.unwrap().requests.unwrap();
        assert_eq!(requests["storage"], Quantity("100Gi".to_string()));
    }
}
