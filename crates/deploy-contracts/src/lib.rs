//! Deploys a plan of compiled contracts to an Ethereum network, one contract
//! at a time, reporting each address once its creation is confirmed.

pub mod arguments;
pub mod orchestrator;
pub mod plan;
pub mod setup;
pub mod traits;

pub use orchestrator::{Deployment, DeploymentError, Status, deploy_all};

use {
    crate::{
        arguments::Arguments,
        plan::Plan,
        traits::{ArtifactRegistry, NetworkConnector},
    },
    anyhow::{Context, Result},
    contracts::Artifacts,
    ethrpc::Connector,
    std::io::Write,
};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Runs a deployment as configured by `args` and returns the process exit
/// code. Deployed addresses go to stdout, errors to stderr.
pub async fn run(args: Arguments) -> u8 {
    let (plan, connector, registry) = match prepare(&args).await {
        Ok(Some(prepared)) => prepared,
        Ok(None) => return EXIT_SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return EXIT_FAILURE;
        }
    };

    execute(
        &plan,
        &connector,
        &registry,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await
}

/// Drives `task` on its own tokio task. A panic anywhere inside it becomes
/// [`EXIT_FAILURE`] instead of unwinding out of `main`.
pub async fn exit_code<F>(task: F) -> u8
where
    F: Future<Output = u8> + Send + 'static,
{
    match tokio::spawn(task).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: deployment aborted: {err}");
            EXIT_FAILURE
        }
    }
}

/// Resolves configuration, loads the artifacts and connects to the network.
/// Returns `None` when there is nothing to deploy.
async fn prepare(args: &Arguments) -> Result<Option<(Plan, Connector, Artifacts)>> {
    let config = setup::load_config(args)?;
    let setup = setup::resolve(args, config)?;
    if setup.plan.is_empty() {
        tracing::warn!(network = %setup.network, "no contracts configured, nothing to deploy");
        return Ok(None);
    }

    let registry = Artifacts::load(&setup.artifacts)?;
    tracing::debug!(root = ?registry.root(), artifacts = registry.len(), "loaded artifacts");

    let connector = Connector::connect(setup.connection)
        .await
        .with_context(|| format!("failed to connect to network {}", setup.network))?;
    tracing::info!(
        network = %setup.network,
        signer = %connector.signer(),
        contracts = setup.plan.len(),
        "deploying contracts"
    );

    Ok(Some((setup.plan, connector, registry)))
}

/// Deploys the plan, writing results to `out` and the error, if any, to
/// `err_out`. Returns the process exit code.
pub async fn execute(
    plan: &Plan,
    connector: &dyn NetworkConnector,
    registry: &dyn ArtifactRegistry,
    out: &mut impl Write,
    err_out: &mut impl Write,
) -> u8 {
    match deploy_all(plan, connector, registry, out).await {
        Ok(deployments) => {
            tracing::info!(count = deployments.len(), "all contracts deployed");
            EXIT_SUCCESS
        }
        Err(err) => {
            let _ = writeln!(err_out, "Error: {:#}", anyhow::Error::from(err));
            EXIT_FAILURE
        }
    }
}
