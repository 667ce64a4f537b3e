//! Boundaries between the deployment loop and the outside world.

use {
    alloy::primitives::{Address, Bytes, TxHash},
    contracts::{Artifacts, ContractArtifact},
    ethrpc::{Confirmed, Connector},
};

/// Looks up compiled contracts by name.
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactRegistry: Send + Sync {
    fn resolve(&self, name: &str) -> Result<ContractArtifact, contracts::Error>;
}

/// Creates contracts on the target network from a single account.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait NetworkConnector: Send + Sync {
    /// Account all deployments are signed with.
    fn signer(&self) -> Address;

    /// Sends the creation transaction for `artifact` with the already encoded
    /// constructor arguments appended to its bytecode.
    async fn submit(
        &self,
        artifact: &ContractArtifact,
        args: &Bytes,
    ) -> Result<TxHash, ethrpc::Error>;

    /// Resolves once the transaction is confirmed.
    async fn confirm(&self, tx_hash: TxHash) -> Result<Confirmed, ethrpc::Error>;

    async fn deploy(
        &self,
        artifact: &ContractArtifact,
        args: &Bytes,
    ) -> Result<Confirmed, ethrpc::Error> {
        let tx_hash = self.submit(artifact, args).await?;
        self.confirm(tx_hash).await
    }
}

impl ArtifactRegistry for Artifacts {
    fn resolve(&self, name: &str) -> Result<ContractArtifact, contracts::Error> {
        Artifacts::resolve(self, name)
    }
}

#[async_trait::async_trait]
impl NetworkConnector for Connector {
    fn signer(&self) -> Address {
        Connector::signer(self)
    }

    async fn submit(
        &self,
        artifact: &ContractArtifact,
        args: &Bytes,
    ) -> Result<TxHash, ethrpc::Error> {
        Connector::submit(self, artifact.deploy_code(args)).await
    }

    async fn confirm(&self, tx_hash: TxHash) -> Result<Confirmed, ethrpc::Error> {
        Connector::confirm(self, tx_hash).await
    }
}
