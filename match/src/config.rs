use log::warn;
use once_cell::sync::OnceCell;
use serde_derive::Deserialize;
use std::path::Path;
use std::sync::{Mutex, PoisonError};

static INSTANCE: OnceCell<Mutex<EngineConfig>> = OnceCell::new();

pub fn instance() -> &'static Mutex<EngineConfig> {
    INSTANCE.get_or_init(|| Mutex::new(EngineConfig::new()))
}

/// Snapshot of the process-wide configuration
pub fn current() -> EngineConfig {
    instance()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// What the book does when the outbound match stream is full
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Wait for the consumer; an undrained stream stalls matching
    #[default]
    Block,
    /// Drop the notification and count it
    Drop,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShardMode {
    /// One book consumes the orders of every asset
    #[default]
    Single,
    /// One book per asset behind a router
    PerAsset,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    pub inbound_capacity: usize,
    pub outbound_capacity: usize,
    pub overflow_policy: OverflowPolicy,
    pub sharding: ShardMode,
    /// Inbound capacity of each per-asset book
    pub shard_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        EngineConfig {
            inbound_capacity: 1024,
            outbound_capacity: 1024,
            overflow_policy: OverflowPolicy::Block,
            sharding: ShardMode::Single,
            shard_capacity: 256,
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Loads the configuration at `path` and installs it as the process-wide
    /// instance. Falls back to the defaults when the file cannot be read or
    /// parsed.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let config = match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(c) => c,
                Err(e) => {
                    warn!(
                        "Something went wrong parsing the engine config file {}, {:?}",
                        path.display(),
                        e
                    );
                    EngineConfig::new()
                }
            },
            Err(e) => {
                warn!(
                    "Something went wrong reading the engine config file {}, {:?}",
                    path.display(),
                    e
                );
                EngineConfig::new()
            }
        };
        config.install();
        config
    }

    /// Replaces the process-wide instance with this configuration
    pub fn install(&self) {
        *instance().lock().unwrap_or_else(PoisonError::into_inner) = self.clone();
    }
}
