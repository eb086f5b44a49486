//! Nodesmith Operator - Main Entry Point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use nodesmith_domain::{Compiler, DefaultingContext};
use nodesmith_operator::{Admission, ContainerFactory, Manifest, crds, render_manifest, review};
use nodesmith_shared::config::{ConfigLoader, OperatorConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

/// Compiles blockchain node manifests into runnable Kubernetes workloads
#[derive(Parser, Debug)]
#[command(name = "nodesmith-operator")]
#[command(author = "Nodesmith Team")]
#[command(version)]
#[command(about = "Blockchain node spec compiler", long_about = None)]
struct Args {
    /// `.env` file loaded before the environment is read
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Log level, overrides NODESMITH_LOG_LEVEL
    #[arg(long, value_enum, global = true)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Default and validate a manifest, printing the admitted manifest
    Admit {
        /// Manifest to admit (YAML or JSON)
        #[arg(short, long)]
        file: PathBuf,

        /// Previously admitted manifest, for update validation
        #[arg(long)]
        old: Option<PathBuf>,
    },
    /// Admit a manifest and print it with the objects running each of its clients
    Compile {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(long)]
        old: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "yaml")]
        output: Output,
    },
    /// Print the custom resource definitions of every node kind
    Crds,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Output {
    Yaml,
    Json,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config = ConfigLoader::new(args.env_file.clone())
        .load_operator_config()
        .context("Failed to load operator configuration")?;

    init_tracing(args.log_level, &config);
    info!(namespace = %config.namespace, overrides = config.image_overrides.len(), "Operator configuration");

    let compiler = Compiler::with_defaults(DefaultingContext::from_config(&config));

    match args.command {
        Command::Admit { file, old } => {
            let (manifest, old) = read_manifests(&file, old.as_deref())?;
            match review(&compiler, manifest, old.as_ref())? {
                Admission::Allowed(admitted) => {
                    print!("{}", admitted.to_yaml()?);
                    Ok(ExitCode::SUCCESS)
                }
                Admission::Denied(status) => {
                    print!("{}", serde_yaml::to_string(&status)?);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Compile { file, old, output } => {
            let (manifest, old) = read_manifests(&file, old.as_deref())?;
            let admitted = match review(&compiler, manifest, old.as_ref())? {
                Admission::Allowed(admitted) => admitted,
                Admission::Denied(status) => {
                    print!("{}", serde_yaml::to_string(&status)?);
                    return Ok(ExitCode::FAILURE);
                }
            };

            let workloads = render_manifest(&compiler, &ContainerFactory::default(), &admitted)
                .with_context(|| format!("Failed to render {}", admitted.name()))?;

            let mut documents = vec![serde_yaml::from_str::<serde_json::Value>(&admitted.to_yaml()?)?];
            for workload in &workloads {
                let objects = &workload.objects;
                if let Some(config_map) = &objects.config_map {
                    documents.push(to_document("ConfigMap", config_map)?);
                }
                documents.push(to_document("PersistentVolumeClaim", &objects.claim)?);
                documents.push(to_document("Pod", &objects.pod)?);
            }
            print_documents(&documents, output)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Crds => {
            for crd in crds() {
                println!("---");
                print!("{}", serde_yaml::to_string(&crd)?);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(level: Option<LogLevel>, config: &OperatorConfig) {
    let level = match level {
        Some(LogLevel::Trace) => LevelFilter::TRACE,
        Some(LogLevel::Debug) => LevelFilter::DEBUG,
        Some(LogLevel::Info) => LevelFilter::INFO,
        Some(LogLevel::Warn) => LevelFilter::WARN,
        Some(LogLevel::Error) => LevelFilter::ERROR,
        None => config.log_level.parse().unwrap_or(LevelFilter::INFO),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn read_manifest(path: &Path) -> Result<Manifest> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Manifest::parse(&input).with_context(|| format!("Failed to decode {}", path.display()))
}

fn read_manifests(file: &Path, old: Option<&Path>) -> Result<(Manifest, Option<Manifest>)> {
    let manifest = read_manifest(file)?;
    let old = old.map(read_manifest).transpose()?;
    Ok((manifest, old))
}

/// Serializes a k8s-openapi object with its `apiVersion` and `kind`
fn to_document<T: Serialize>(kind: &str, object: &T) -> Result<serde_json::Value> {
    let mut value = serde_json::to_value(object)?;
    if let Some(map) = value.as_object_mut() {
        map.insert("apiVersion".to_string(), "v1".into());
        map.insert("kind".to_string(), kind.into());
    }
    Ok(value)
}

fn print_documents(documents: &[serde_json::Value], output: Output) -> Result<()> {
    match output {
        Output::Yaml => {
            for document in documents {
                println!("---");
                print!("{}", serde_yaml::to_string(document)?);
            }
        }
        Output::Json => {
            let list = serde_json::json!({ "apiVersion": "v1", "kind": "List", "items": documents });
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
    }
    Ok(())
}
