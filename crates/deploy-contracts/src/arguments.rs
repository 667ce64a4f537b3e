use {
    clap::Parser,
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
        time::Duration,
    },
    url::Url,
};

#[derive(Parser)]
#[clap(version, about = "Deploys compiled contracts to an Ethereum network")]
pub struct Arguments {
    /// Deployment configuration file. Defaults to `deploy.toml` in the working
    /// directory when that file exists.
    #[clap(long, env = "DEPLOY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Network to deploy to, as named in the configuration file. Well known
    /// names (`mainnet`, `sepolia`, `hardhat`, ...) work without one.
    #[clap(long, env)]
    pub network: Option<String>,

    /// The Ethereum node URL to connect to.
    #[clap(long, env)]
    pub rpc_url: Option<Url>,

    /// Hex encoded private key of the deploying account. Local development
    /// networks fall back to the first account of the standard development
    /// mnemonic.
    #[clap(long, env)]
    pub private_key: Option<String>,

    /// Chain id the node is expected to report.
    #[clap(long, env)]
    pub chain_id: Option<u64>,

    /// Directory containing the compiled contract artifacts.
    #[clap(long, env = "ARTIFACTS_DIR")]
    pub artifacts: Option<PathBuf>,

    /// Comma separated contracts to deploy, in order. Replaces the contracts
    /// of the configuration file.
    #[clap(long, env, value_delimiter = ',', value_parser = contract_name)]
    pub contracts: Vec<String>,

    /// Number of confirmations to wait for per deployment.
    #[clap(long, env)]
    pub confirmations: Option<u64>,

    /// Time in seconds to wait for a deployment to be confirmed.
    #[clap(long, env, value_parser = duration_from_seconds)]
    pub confirmation_timeout: Option<Duration>,

    #[clap(
        long,
        env,
        default_value = "warn,deploy_contracts=info,ethrpc=info,contracts=info"
    )]
    pub log_filter: String,

    /// Emit logs as JSON.
    #[clap(long, env)]
    pub use_json_logs: bool,
}

pub fn duration_from_seconds(s: &str) -> anyhow::Result<Duration> {
    Ok(Duration::try_from_secs_f64(s.parse()?)?)
}

/// Entry of a comma separated contract list, without surrounding whitespace.
fn contract_name(s: &str) -> anyhow::Result<String> {
    let name = s.trim();
    anyhow::ensure!(!name.is_empty(), "empty contract name");
    Ok(name.to_string())
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            config,
            network,
            rpc_url,
            private_key,
            chain_id,
            artifacts,
            contracts,
            confirmations,
            confirmation_timeout,
            log_filter,
            use_json_logs,
        } = self;

        display_option(f, "config", &config.as_ref().map(|path| path.display()))?;
        display_option(f, "network", network)?;
        display_option(f, "rpc_url", rpc_url)?;
        display_secret_option(f, "private_key", private_key)?;
        display_option(f, "chain_id", chain_id)?;
        display_option(f, "artifacts", &artifacts.as_ref().map(|path| path.display()))?;
        writeln!(f, "contracts: [{}]", contracts.join(", "))?;
        display_option(f, "confirmations", confirmations)?;
        writeln!(f, "confirmation_timeout: {confirmation_timeout:?}")?;
        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        Ok(())
    }
}

fn display_option(
    f: &mut Formatter<'_>,
    name: &str,
    option: &Option<impl Display>,
) -> fmt::Result {
    write!(f, "{name}: ")?;
    match option {
        Some(display) => writeln!(f, "{display}"),
        None => writeln!(f, "None"),
    }
}

fn display_secret_option<T>(
    f: &mut Formatter<'_>,
    name: &str,
    option: &Option<T>,
) -> fmt::Result {
    display_option(f, name, &option.as_ref().map(|_| "SECRET"))
}
