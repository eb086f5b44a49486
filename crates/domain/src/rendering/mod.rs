//! Rendering: launch configuration value objects and argument building
//!
//! A strategy turns a defaulted, validated spec into a
//! [`RenderedLaunchConfig`]. The orchestrator mounts data, config and
//! secrets under the strategy's home directory following [`Layout`].

pub mod registry;

pub use registry::{ClientStrategy, StrategyRegistry, Workload};

use serde::Serialize;
use std::fmt::Display;

/// Everything needed to start one client process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedLaunchConfig {
    pub image: String,
    pub command: Vec<String>,
    pub args: Vec<String>,
    pub env: Vec<EnvVar>,
    pub home_dir: String,
    pub init_steps: Vec<InitStep>,
    pub config_files: Vec<ConfigFile>,
}

impl RenderedLaunchConfig {
    pub fn layout(&self) -> Layout<'_> {
        Layout::new(&self.home_dir)
    }

    /// Literal value of an environment variable, if set as a literal
    pub fn env_value(&self, name: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|var| var.name == name)
            .and_then(EnvVar::literal)
    }

    pub fn config_file(&self, name: &str) -> Option<&ConfigFile> {
        self.config_files.iter().find(|file| file.name == name)
    }

    /// Secrets read as files under [`Layout::secrets_dir`], in first-use order.
    ///
    /// Secrets only referenced through environment variables are not listed.
    pub fn mounted_secrets(&self) -> Vec<String> {
        let prefix = format!("{}/", self.layout().secrets_dir());
        let texts = self
            .args
            .iter()
            .chain(self.init_steps.iter().flat_map(|step| step.args.iter()))
            .chain(self.config_files.iter().map(|file| &file.content));

        let mut secrets: Vec<String> = Vec::new();
        for text in texts {
            for (start, _) in text.match_indices(&prefix) {
                let rest = &text[start + prefix.len()..];
                let name: String = rest
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
                    .collect();
                if !name.is_empty() && !secrets.contains(&name) {
                    secrets.push(name);
                }
            }
        }
        secrets
    }
}

/// Where an environment variable's value comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EnvSource {
    Value(String),
    SecretKeyRef { secret: String, key: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvVar {
    pub name: String,
    pub source: EnvSource,
}

impl EnvVar {
    pub fn value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: EnvSource::Value(value.into()),
        }
    }

    pub fn secret(name: impl Into<String>, secret: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: EnvSource::SecretKeyRef {
                secret: secret.into(),
                key: key.into(),
            },
        }
    }

    pub fn literal(&self) -> Option<&str> {
        match &self.source {
            EnvSource::Value(value) => Some(value),
            EnvSource::SecretKeyRef { .. } => None,
        }
    }
}

/// One-shot preparation step run before the client process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitStep {
    pub name: String,
    pub command: Vec<String>,
    pub args: Vec<String>,
}

impl InitStep {
    pub fn new(name: impl Into<String>, command: &[&str], args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            command: command.iter().map(|c| c.to_string()).collect(),
            args,
        }
    }

    /// Step running a shell script
    pub fn shell(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self::new(name, &["/bin/sh", "-c"], vec![script.into()])
    }
}

/// Rendered configuration file, mounted under [`Layout::config_dir`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigFile {
    pub name: String,
    pub content: String,
}

impl ConfigFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Mount layout under a client's home directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout<'a> {
    home: &'a str,
}

pub const SECRET_KEY: &str = "key";
pub const SECRET_PASSWORD: &str = "password";

impl<'a> Layout<'a> {
    pub fn new(home: &'a str) -> Self {
        Self { home }
    }

    pub fn home(&self) -> &str {
        self.home
    }

    pub fn data_dir(&self) -> String {
        format!("{}/data", self.home)
    }

    pub fn config_dir(&self) -> String {
        format!("{}/config", self.home)
    }

    pub fn secrets_dir(&self) -> String {
        format!("{}/secrets", self.home)
    }

    pub fn config_file(&self, name: &str) -> String {
        format!("{}/{}", self.config_dir(), name)
    }

    /// Path of a secret key; each secret is mounted in its own directory
    pub fn secret_file(&self, secret: &str, key: &str) -> String {
        format!("{}/{}/{}", self.secrets_dir(), secret, key)
    }
}

/// How a strategy joins a flag and its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagStyle {
    /// `--flag value`
    Separate,
    /// `--flag=value`
    Joined,
}

/// Ordered argument list builder
#[derive(Debug, Clone)]
pub struct ArgBuilder {
    style: FlagStyle,
    args: Vec<String>,
}

impl ArgBuilder {
    pub fn new(style: FlagStyle) -> Self {
        Self {
            style,
            args: Vec::new(),
        }
    }

    /// Bare flag or positional argument
    pub fn flag(&mut self, flag: &str) -> &mut Self {
        self.args.push(flag.to_string());
        self
    }

    pub fn flag_if(&mut self, condition: bool, flag: &str) -> &mut Self {
        if condition {
            self.flag(flag);
        }
        self
    }

    pub fn value(&mut self, flag: &str, value: impl Display) -> &mut Self {
        match self.style {
            FlagStyle::Separate => {
                self.args.push(flag.to_string());
                self.args.push(value.to_string());
            }
            FlagStyle::Joined => self.args.push(format!("{flag}={value}")),
        }
        self
    }

    /// Value flag, skipped when the value is unset
    pub fn opt<T: Display>(&mut self, flag: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.value(flag, value);
        }
        self
    }

    /// Comma separated list, skipped when empty
    pub fn list<T: AsRef<str>>(&mut self, flag: &str, items: &[T]) -> &mut Self {
        self.list_with(flag, items, ",")
    }

    pub fn list_with<T: AsRef<str>>(&mut self, flag: &str, items: &[T], separator: &str) -> &mut Self {
        if !items.is_empty() {
            let joined = items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(separator);
            self.value(flag, joined);
        }
        self
    }

    /// One flag per item
    pub fn repeat<T: Display>(&mut self, flag: &str, items: impl IntoIterator<Item = T>) -> &mut Self {
        for item in items {
            self.value(flag, item);
        }
        self
    }

    pub fn build(&mut self) -> Vec<String> {
        std::mem::take(&mut self.args)
    }
}
