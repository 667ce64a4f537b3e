//! Deployment configuration file.
//!
//! ```toml
//! artifacts = "artifacts"
//! default-network = "sepolia"
//!
//! [networks.sepolia]
//! url = "https://eth-sepolia.g.alchemy.com/v2/<key>"
//! chain-id = 11155111
//! confirmations = 2
//! confirmation-timeout = "5m"
//!
//! [[contract]]
//! name = "IdentityAndAccessManagement"
//! ```

use {
    anyhow::{Context, Result, anyhow},
    serde::Deserialize,
    std::{
        collections::HashMap,
        fmt,
        path::{Path, PathBuf},
        time::Duration,
    },
    url::Url,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Build output directory containing the compiled contract artifacts.
    /// Relative paths are resolved against the directory of the config file.
    pub artifacts: Option<PathBuf>,

    /// Network used when none is selected explicitly.
    pub default_network: Option<String>,

    #[serde(default)]
    pub networks: HashMap<String, Network>,

    /// Contracts to deploy, in order.
    #[serde(rename = "contract", default)]
    pub contracts: Vec<Contract>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Network {
    /// RPC endpoint of a node on this network.
    pub url: Option<Url>,

    /// Chain id the node is expected to report. Defaults to the well known id
    /// for the network's name.
    pub chain_id: Option<u64>,

    /// Key of the deploying account. Prefer passing it through the
    /// environment instead of writing it into the file.
    pub private_key: Option<Secret>,

    /// Number of confirmations to wait for after inclusion.
    pub confirmations: Option<u64>,

    /// How long to wait for a transaction to be confirmed.
    #[serde(default, with = "humantime_serde")]
    pub confirmation_timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Contract {
    pub name: String,

    /// Constructor arguments in their string form.
    #[serde(default)]
    pub args: Vec<String>,
}

/// String that never shows up in logs.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SECRET")
    }
}

impl Config {
    /// Parses a configuration file. Relative `artifacts` paths are made
    /// relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("I/O error while reading {path:?}"))?;
        let mut config = Self::parse(&data).with_context(|| format!("invalid config {path:?}"))?;

        if let Some(dir) = path.parent() {
            config.artifacts = config.artifacts.take().map(|artifacts| {
                if artifacts.is_relative() {
                    dir.join(artifacts)
                } else {
                    artifacts
                }
            });
        }

        tracing::debug!(
            ?path,
            networks = config.networks.len(),
            contracts = config.contracts.len(),
            "loaded config file"
        );
        Ok(config)
    }

    pub fn parse(data: &str) -> Result<Self> {
        // Only the message: the full error quotes the offending line, which
        // could contain a private key.
        toml::from_str(data).map_err(|err| anyhow!("TOML error: {}", err.message()))
    }

    pub fn network(&self, name: &str) -> Option<&Network> {
        self.networks.get(name)
    }
}
