use {
    crate::{
        AlloyProvider,
        Config,
        Error,
        alloy::errors::{classify_confirmation_error, classify_submission_error},
    },
    alloy::{
        network::TransactionBuilder,
        primitives::{Address, Bytes, TxHash},
        providers::{PendingTransactionBuilder, Provider},
        rpc::types::TransactionRequest,
    },
    std::time::Duration,
};

/// On-chain outcome of a confirmed contract creation transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmed {
    pub tx_hash: TxHash,
    pub address: Address,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Submits contract creation transactions from a single signing account.
///
/// The account's nonce sequence is owned by the underlying provider, callers
/// are expected to wait for one transaction to confirm before submitting the
/// next one.
#[derive(Debug, Clone)]
pub struct Connector {
    provider: AlloyProvider,
    signer: Address,
    confirmations: u64,
    confirmation_timeout: Duration,
}

impl Connector {
    /// Connects to the configured node and verifies that it is on the
    /// configured chain.
    pub async fn connect(config: Config) -> Result<Self, Error> {
        let provider =
            crate::alloy::provider_with_signer(&config.rpc_url, &config.signing_key);
        Self::with_provider(provider, config).await
    }

    /// Like [`Connector::connect`] but with an already constructed provider.
    /// The provider is responsible for signing transactions from the
    /// configured account.
    pub async fn with_provider(provider: AlloyProvider, config: Config) -> Result<Self, Error> {
        let node = provider.get_chain_id().await?;
        if node != config.chain_id {
            return Err(Error::ChainMismatch {
                url: config.rpc_url,
                configured: config.chain_id,
                node,
            });
        }

        let signer = config.signing_key.address();
        tracing::debug!(chain_id = node, %signer, "connected to node");
        Ok(Self {
            provider,
            signer,
            confirmations: config.confirmations,
            confirmation_timeout: config.confirmation_timeout,
        })
    }

    /// Account deployments are sent from.
    pub fn signer(&self) -> Address {
        self.signer
    }

    /// Sends a contract creation transaction and returns as soon as the node
    /// accepted it.
    pub async fn submit(&self, code: Bytes) -> Result<TxHash, Error> {
        let tx = TransactionRequest::default()
            .from(self.signer)
            .with_deploy_code(code);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(classify_submission_error)?;
        Ok(*pending.tx_hash())
    }

    /// Waits until the transaction is included with the configured number of
    /// confirmations and returns the address of the created contract.
    pub async fn confirm(&self, tx_hash: TxHash) -> Result<Confirmed, Error> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .with_required_confirmations(self.confirmations)
            .with_timeout(Some(self.confirmation_timeout))
            .get_receipt()
            .await
            .map_err(|err| classify_confirmation_error(tx_hash, self.confirmation_timeout, err))?;

        if !receipt.status() {
            return Err(Error::Reverted(tx_hash));
        }
        let address = receipt
            .contract_address
            .ok_or(Error::MissingContractAddress(tx_hash))?;

        Ok(Confirmed {
            tx_hash,
            address,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}
