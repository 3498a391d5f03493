use std::{fs, path::Path};

use anyhow::{Context, ensure};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_WORKERS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifyConfig {
    /// Upper bound on concurrently running decode+compare tasks in one batch.
    pub max_workers: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

impl VerifyConfig {
    pub fn load<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let config_serialized = fs::read(path).context("Couldn't read config")?;
        let config: Self =
            serde_json::from_slice(&config_serialized).context("Couldn't deserialize config")?;

        config.validate()?;
        Ok(config)
    }

    pub fn save<P>(&self, path: P) -> anyhow::Result<()>
    where
        P: AsRef<Path>,
    {
        let config_serialized =
            serde_json::to_string_pretty(self).context("Couldn't serialize config")?;
        fs::write(path, config_serialized).context("Couldn't write config")?;

        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.max_workers > 0, "max_workers must be at least 1");
        Ok(())
    }
}
