use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use serde::Serialize;

use crate::cli::Cli;
use crate::config::{DEFAULT_CONFIG_FILE, SnoopConfig};
use crate::error::{ConfigError, Result};

/// Options given on the command line. Unset options are skipped so they don't mask lower layers.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    headers: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    insecure: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    threads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fuel: Option<u64>,
}

impl From<&Cli> for CliOverrides {
    fn from(cli: &Cli) -> Self {
        Self {
            base_url: cli.domain.clone().filter(|domain| !domain.is_empty()),
            proxy: cli.proxy.clone().filter(|proxy| !proxy.is_empty()),
            headers: cli.headers.clone(),
            insecure: cli.insecure,
            threads: cli.threads,
            fuel: cli.fuel,
        }
    }
}

impl SnoopConfig {
    /// Load and validate configuration.
    ///
    /// `cwd` is where `snoop.config.json` is looked up when `--config` is not given.
    pub fn load(cli: &Cli, cwd: &Path) -> Result<Self> {
        let config: Self = Self::figment(cli, cwd)?
            .extract()
            .map_err(|e| ConfigError::Extract(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn figment(cli: &Cli, cwd: &Path) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = config_file(cli.config.as_deref(), cwd)? {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Json::file(path));
        }

        // SNOOP_BASE_URL, SNOOP_MAX_CALL_DEPTH, ...
        figment = figment.merge(
            Env::prefixed("SNOOP_")
                .map(|key| env_key_to_field(key.as_str()).into())
                .lowercase(false),
        );

        Ok(figment.merge(Serialized::defaults(CliOverrides::from(cli))))
    }
}

/// The config file to read: the explicit one (which must exist), else the default if present.
fn config_file(explicit: Option<&Path>, cwd: &Path) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(ConfigError::NotFound(path.to_path_buf()).into()),
        None => {
            let default_path = cwd.join(DEFAULT_CONFIG_FILE);
            Ok(default_path.is_file().then_some(default_path))
        }
    }
}

/// `MAX_CALL_DEPTH` -> `maxCallDepth`.
fn env_key_to_field(key: &str) -> String {
    let mut field = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = !field.is_empty();
        } else if upper {
            field.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            field.push(c.to_ascii_lowercase());
        }
    }
    field
}
