//! Sequential deployment of a plan.

use {
    crate::{
        plan::{Plan, Request},
        traits::{ArtifactRegistry, NetworkConnector},
    },
    alloy::primitives::{Address, TxHash},
    std::{
        fmt::{self, Display, Formatter},
        io::Write,
    },
};

/// Where a single request is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pending,
    Submitted,
    Confirmed,
    Failed,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        })
    }
}

/// A contract that was created and confirmed on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub contract: String,
    pub address: Address,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum DeploymentError {
    #[error("cannot deploy {contract}")]
    Artifact {
        contract: String,
        #[source]
        source: contracts::Error,
    },

    #[error("deployment of {contract} failed while {status}")]
    Network {
        contract: String,
        /// Last state the request reached before failing.
        status: Status,
        #[source]
        source: ethrpc::Error,
    },

    #[error("failed to report the deployment of {contract}")]
    Output {
        contract: String,
        #[source]
        source: std::io::Error,
    },
}

impl DeploymentError {
    /// Contract whose deployment failed.
    pub fn contract(&self) -> &str {
        match self {
            Self::Artifact { contract, .. }
            | Self::Network { contract, .. }
            | Self::Output { contract, .. } => contract,
        }
    }

    pub fn is_artifact_not_found(&self) -> bool {
        matches!(self, Self::Artifact { source, .. } if source.is_not_found())
    }
}

/// Deploys every contract of the plan, one after the other, writing a
/// `"<name> deployed to: <address>"` line to `out` as soon as a deployment is
/// confirmed.
///
/// The next contract is only submitted once the previous one is confirmed.
/// The first failure aborts the run: no later contract is attempted and no
/// results are returned, but lines already written stay written.
pub async fn deploy_all<W: Write>(
    plan: &Plan,
    connector: &dyn NetworkConnector,
    registry: &dyn ArtifactRegistry,
    out: &mut W,
) -> Result<Vec<Deployment>, DeploymentError> {
    let mut deployments = Vec::with_capacity(plan.len());
    for (index, request) in plan.iter().enumerate() {
        tracing::info!(%request, position = index + 1, total = plan.len(), "deploying");
        let deployment = match deploy(request, connector, registry).await {
            Ok(deployment) => deployment,
            Err(err) => {
                tracing::error!(
                    contract = %request.name,
                    status = %Status::Failed,
                    ?err,
                    "deployment failed"
                );
                return Err(err);
            }
        };

        writeln!(out, "{} deployed to: {}", deployment.contract, deployment.address)
            .and_then(|()| out.flush())
            .map_err(|source| DeploymentError::Output {
                contract: deployment.contract.clone(),
                source,
            })?;
        deployments.push(deployment);
    }
    Ok(deployments)
}

async fn deploy(
    request: &Request,
    connector: &dyn NetworkConnector,
    registry: &dyn ArtifactRegistry,
) -> Result<Deployment, DeploymentError> {
    let contract = request.name.as_str();
    let artifact_error = |source: contracts::Error| DeploymentError::Artifact {
        contract: contract.to_owned(),
        source,
    };
    let network_error = |status: Status| {
        move |source: ethrpc::Error| DeploymentError::Network {
            contract: contract.to_owned(),
            status,
            source,
        }
    };

    tracing::debug!(contract, status = %Status::Pending, "resolving artifact");
    let artifact = registry.resolve(contract).map_err(artifact_error)?;
    let args = artifact
        .encode_constructor_args(&request.args)
        .map_err(artifact_error)?;

    let tx_hash = connector
        .submit(&artifact, &args)
        .await
        .map_err(network_error(Status::Pending))?;
    tracing::info!(contract, status = %Status::Submitted, ?tx_hash, "waiting for confirmation");

    let confirmed = connector
        .confirm(tx_hash)
        .await
        .map_err(network_error(Status::Submitted))?;
    tracing::info!(
        contract,
        status = %Status::Confirmed,
        address = %confirmed.address,
        block = ?confirmed.block_number,
        gas_used = confirmed.gas_used,
        "contract deployed"
    );

    Ok(Deployment {
        contract: contract.to_owned(),
        address: confirmed.address,
        tx_hash: confirmed.tx_hash,
        block_number: confirmed.block_number,
        gas_used: confirmed.gas_used,
    })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::traits::{MockArtifactRegistry, MockNetworkConnector},
        alloy::{json_abi::JsonAbi, primitives::Bytes},
        contracts::ContractArtifact,
        ethrpc::Confirmed,
        mockall::{Sequence, predicate::eq},
    };

    fn artifact(name: &str) -> ContractArtifact {
        ContractArtifact::new(
            name,
            JsonAbi::default(),
            Bytes::from_static(&[0x60, 0x00, 0x60, 0x00, 0xf3]),
        )
    }

    fn confirmed(tx_hash: TxHash, address: Address) -> Confirmed {
        Confirmed {
            tx_hash,
            address,
            block_number: Some(1),
            gas_used: 53_000,
        }
    }

    /// Registry knowing every contract in `names`.
    fn registry(names: &'static [&'static str]) -> MockArtifactRegistry {
        let mut registry = MockArtifactRegistry::new();
        registry.expect_resolve().returning(move |name| {
            if names.iter().any(|known| *known == name) {
                Ok(artifact(name))
            } else {
                Err(contracts::Error::NotFound(name.to_string()))
            }
        });
        registry
    }

    /// Connector that deploys everything to a fresh address.
    fn connector() -> MockNetworkConnector {
        let mut connector = MockNetworkConnector::new();
        let mut submitted = 0u8;
        connector.expect_submit().returning(move |_, _| {
            submitted += 1;
            Ok(TxHash::with_last_byte(submitted))
        });
        let mut created = 0u8;
        connector.expect_confirm().returning(move |tx_hash| {
            created += 1;
            Ok(confirmed(tx_hash, Address::with_last_byte(created)))
        });
        connector
    }

    fn lines(out: &[u8]) -> Vec<String> {
        String::from_utf8(out.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn deploys_plan_in_order() {
        let plan = Plan::from_names(["A", "B", "C"]);
        let mut out = Vec::new();

        let deployments = deploy_all(&plan, &connector(), &registry(&["A", "B", "C"]), &mut out)
            .await
            .unwrap();

        let names: Vec<_> = deployments.iter().map(|d| d.contract.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert!(deployments.iter().all(|d| !d.address.is_zero()));
        assert_eq!(lines(&out).len(), 3);
    }

    #[tokio::test]
    async fn reports_deployments() {
        let identity = Address::repeat_byte(0xaa);
        let access = Address::repeat_byte(0xbb);
        let mut connector = MockNetworkConnector::new();
        connector
            .expect_submit()
            .withf(|artifact, _| artifact.name == "IdentityManagement")
            .returning(|_, _| Ok(TxHash::with_last_byte(1)));
        connector
            .expect_submit()
            .withf(|artifact, _| artifact.name == "AccessManagement")
            .returning(|_, _| Ok(TxHash::with_last_byte(2)));
        connector
            .expect_confirm()
            .with(eq(TxHash::with_last_byte(1)))
            .returning(move |tx_hash| Ok(confirmed(tx_hash, identity)));
        connector
            .expect_confirm()
            .with(eq(TxHash::with_last_byte(2)))
            .returning(move |tx_hash| Ok(confirmed(tx_hash, access)));
        let plan = Plan::from_names(["IdentityManagement", "AccessManagement"]);
        let mut out = Vec::new();

        let deployments = deploy_all(
            &plan,
            &connector,
            &registry(&["IdentityManagement", "AccessManagement"]),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(
            deployments,
            [
                Deployment {
                    contract: "IdentityManagement".to_string(),
                    address: identity,
                    tx_hash: TxHash::with_last_byte(1),
                    block_number: Some(1),
                    gas_used: 53_000,
                },
                Deployment {
                    contract: "AccessManagement".to_string(),
                    address: access,
                    tx_hash: TxHash::with_last_byte(2),
                    block_number: Some(1),
                    gas_used: 53_000,
                },
            ]
        );
        assert_eq!(
            lines(&out),
            [
                format!("IdentityManagement deployed to: {}", identity.to_checksum(None)),
                format!("AccessManagement deployed to: {}", access.to_checksum(None)),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_contract_is_not_submitted() {
        let mut connector = MockNetworkConnector::new();
        connector.expect_submit().never();
        connector.expect_confirm().never();
        let plan = Plan::from_names(["Unknown"]);
        let mut out = Vec::new();

        let err = deploy_all(&plan, &connector, &registry(&[]), &mut out)
            .await
            .unwrap_err();

        assert!(err.is_artifact_not_found());
        assert_eq!(err.contract(), "Unknown");
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn missing_artifact_stops_before_later_entries() {
        let mut registry = MockArtifactRegistry::new();
        registry
            .expect_resolve()
            .with(eq("A"))
            .times(1)
            .returning(|name| Ok(artifact(name)));
        registry
            .expect_resolve()
            .with(eq("Missing"))
            .times(1)
            .returning(|name| Err(contracts::Error::NotFound(name.to_string())));
        registry.expect_resolve().with(eq("C")).never();
        let mut connector = MockNetworkConnector::new();
        connector
            .expect_submit()
            .withf(|artifact, _| artifact.name == "A")
            .times(1)
            .returning(|_, _| Ok(TxHash::with_last_byte(1)));
        connector
            .expect_confirm()
            .times(1)
            .returning(|tx_hash| Ok(confirmed(tx_hash, Address::with_last_byte(1))));
        let plan = Plan::from_names(["A", "Missing", "C"]);
        let mut out = Vec::new();

        let err = deploy_all(&plan, &connector, &registry, &mut out)
            .await
            .unwrap_err();

        assert!(err.is_artifact_not_found());
        assert_eq!(err.contract(), "Missing");
        assert_eq!(lines(&out).len(), 1);
    }

    #[tokio::test]
    async fn network_failure_aborts_run() {
        let mut connector = MockNetworkConnector::new();
        connector
            .expect_submit()
            .withf(|artifact, _| artifact.name != "C")
            .times(2)
            .returning(|artifact, _| {
                Ok(TxHash::with_last_byte(if artifact.name == "A" { 1 } else { 2 }))
            });
        connector
            .expect_confirm()
            .with(eq(TxHash::with_last_byte(1)))
            .times(1)
            .returning(|tx_hash| Ok(confirmed(tx_hash, Address::with_last_byte(1))));
        connector
            .expect_confirm()
            .with(eq(TxHash::with_last_byte(2)))
            .times(1)
            .returning(|tx_hash| Err(ethrpc::Error::Reverted(tx_hash)));
        let plan = Plan::from_names(["A", "B", "C"]);
        let mut out = Vec::new();

        let err = deploy_all(&plan, &connector, &registry(&["A", "B", "C"]), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DeploymentError::Network {
                ref contract,
                status: Status::Submitted,
                source: ethrpc::Error::Reverted(_),
            } if contract == "B"
        ));
        assert_eq!(
            lines(&out),
            [format!("A deployed to: {}", Address::with_last_byte(1))]
        );
    }

    #[tokio::test]
    async fn confirmation_timeout_aborts_run() {
        let timeout = std::time::Duration::from_secs(300);
        let mut connector = MockNetworkConnector::new();
        connector.expect_submit().times(2).returning(|artifact, _| {
            Ok(TxHash::with_last_byte(if artifact.name == "IdentityManagement" {
                1
            } else {
                2
            }))
        });
        connector
            .expect_confirm()
            .with(eq(TxHash::with_last_byte(1)))
            .times(1)
            .returning(|tx_hash| Ok(confirmed(tx_hash, Address::with_last_byte(1))));
        connector
            .expect_confirm()
            .with(eq(TxHash::with_last_byte(2)))
            .times(1)
            .returning(move |tx_hash| Err(ethrpc::Error::Timeout { tx_hash, timeout }));
        let plan = Plan::from_names(["IdentityManagement", "AccessManagement", "Registry"]);
        let mut out = Vec::new();

        let err = deploy_all(
            &plan,
            &connector,
            &registry(&["IdentityManagement", "AccessManagement", "Registry"]),
            &mut out,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            DeploymentError::Network {
                ref contract,
                status: Status::Submitted,
                source: ethrpc::Error::Timeout { tx_hash, .. },
            } if contract == "AccessManagement" && tx_hash == TxHash::with_last_byte(2)
        ));
        assert_eq!(lines(&out).len(), 1);
    }

    #[tokio::test]
    async fn rejected_submission_fails_while_pending() {
        let mut connector = MockNetworkConnector::new();
        connector
            .expect_submit()
            .returning(|_, _| Err(ethrpc::Error::InsufficientFunds("balance 0".to_string())));
        connector.expect_confirm().never();
        let plan = Plan::from_names(["A"]);
        let mut out = Vec::new();

        let err = deploy_all(&plan, &connector, &registry(&["A"]), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DeploymentError::Network {
                status: Status::Pending,
                source: ethrpc::Error::InsufficientFunds(_),
                ..
            }
        ));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn invalid_constructor_args_are_not_submitted() {
        let mut connector = MockNetworkConnector::new();
        connector.expect_submit().never();
        let plan = Plan::new(vec![Request::new("A").with_args(["1"])]);
        let mut out = Vec::new();

        let err = deploy_all(&plan, &connector, &registry(&["A"]), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DeploymentError::Artifact {
                source: contracts::Error::ConstructorArgs { .. },
                ..
            }
        ));
        assert!(!err.is_artifact_not_found());
    }

    #[tokio::test]
    async fn submits_next_only_after_confirmation() {
        let mut seq = Sequence::new();
        let mut registry = MockArtifactRegistry::new();
        let mut connector = MockNetworkConnector::new();
        for (name, byte) in [("A", 1), ("B", 2)] {
            registry
                .expect_resolve()
                .with(eq(name))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|name| Ok(artifact(name)));
            connector
                .expect_submit()
                .withf(move |artifact, _| artifact.name == name)
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_, _| Ok(TxHash::with_last_byte(byte)));
            connector
                .expect_confirm()
                .with(eq(TxHash::with_last_byte(byte)))
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |tx_hash| {
                    Ok(confirmed(tx_hash, Address::with_last_byte(byte)))
                });
        }
        let plan = Plan::from_names(["A", "B"]);

        deploy_all(&plan, &connector, &registry, &mut Vec::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rerun_creates_new_contracts() {
        let plan = Plan::from_names(["IdentityManagement", "AccessManagement"]);
        let registry = registry(&["IdentityManagement", "AccessManagement"]);
        let connector = connector();

        let first = deploy_all(&plan, &connector, &registry, &mut Vec::new())
            .await
            .unwrap();
        let second = deploy_all(&plan, &connector, &registry, &mut Vec::new())
            .await
            .unwrap();

        for (first, second) in first.iter().zip(&second) {
            assert_eq!(first.contract, second.contract);
            assert_ne!(first.address, second.address);
        }
    }

    #[tokio::test]
    async fn empty_plan_does_nothing() {
        let mut out = Vec::new();
        let deployments = deploy_all(
            &Plan::default(),
            &MockNetworkConnector::new(),
            &MockArtifactRegistry::new(),
            &mut out,
        )
        .await
        .unwrap();
        assert!(deployments.is_empty());
        assert!(out.is_empty());
    }
}
