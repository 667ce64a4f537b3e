//! Combines command line arguments, the configuration file and built in
//! defaults into everything a run needs.
//!
//! Arguments (and their environment variables) take precedence over the
//! selected network of the configuration file, which takes precedence over
//! the defaults for well known networks.

use {
    crate::{arguments::Arguments, plan::Plan},
    anyhow::{Context, Result, anyhow},
    contracts::networks,
    ethrpc::SigningKey,
    std::path::{Path, PathBuf},
    url::Url,
};

/// Network used when neither the arguments nor the configuration file select
/// one.
pub const DEFAULT_NETWORK: &str = "hardhat";
/// Endpoint of a local development node.
pub const LOCAL_NODE_URL: &str = "http://127.0.0.1:8545";
/// Configuration file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "deploy.toml";
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

#[derive(Debug)]
pub struct Setup {
    pub network: String,
    pub connection: ethrpc::Config,
    pub artifacts: PathBuf,
    pub plan: Plan,
}

/// Loads the configuration file named by the arguments, or the default one
/// if it exists.
pub fn load_config(args: &Arguments) -> Result<configs::Config> {
    match &args.config {
        Some(path) => configs::Config::load(path),
        None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
            configs::Config::load(Path::new(DEFAULT_CONFIG_FILE))
        }
        None => Ok(Default::default()),
    }
}

pub fn resolve(args: &Arguments, config: configs::Config) -> Result<Setup> {
    let network = args
        .network
        .clone()
        .or(config.default_network)
        .unwrap_or_else(|| DEFAULT_NETWORK.to_string());
    let file = config.networks.get(&network).cloned().unwrap_or_default();
    let local = networks::is_local(&network);

    let rpc_url = match args.rpc_url.clone().or(file.url) {
        Some(url) => url,
        None if local => Url::parse(LOCAL_NODE_URL)?,
        None => return Err(anyhow!("no RPC URL configured for network {network}")),
    };
    let chain_id = args
        .chain_id
        .or(file.chain_id)
        .or_else(|| networks::chain_id(&network))
        .with_context(|| format!("unknown chain id for network {network}"))?;

    let private_key = args
        .private_key
        .as_deref()
        .or(file.private_key.as_ref().map(configs::Secret::expose));
    let signing_key = match private_key {
        Some(key) => key
            .parse::<SigningKey>()
            .with_context(|| format!("invalid private key for network {network}"))?,
        None if local => {
            let key = SigningKey::dev_account(0)?;
            tracing::info!(account = %key.address(), "using development account");
            key
        }
        None => return Err(anyhow!("no private key configured for network {network}")),
    };

    let mut connection = ethrpc::Config::new(rpc_url, signing_key, chain_id);
    if let Some(confirmations) = args.confirmations.or(file.confirmations) {
        anyhow::ensure!(
            confirmations > 0,
            "confirmations for network {network} must be at least 1"
        );
        connection.confirmations = confirmations;
    }
    if let Some(timeout) = args.confirmation_timeout.or(file.confirmation_timeout) {
        connection.confirmation_timeout = timeout;
    }

    let artifacts = args
        .artifacts
        .clone()
        .or(config.artifacts)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_DIR));

    let plan: Plan = if args.contracts.is_empty() {
        config.contracts.into_iter().map(Into::into).collect()
    } else {
        Plan::from_names(&args.contracts)
    };

    Ok(Setup {
        network,
        connection,
        artifacts,
        plan,
    })
}
