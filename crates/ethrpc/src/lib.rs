//! Connection to an Ethereum node used to submit contract creation
//! transactions and wait for their confirmation.

pub mod alloy;
mod connector;

pub use {
    self::alloy::wallet::{DEV_MNEMONIC, SigningKey},
    connector::{Confirmed, Connector},
};

use {
    ::alloy::{
        primitives::TxHash,
        providers::{DynProvider, PendingTransactionError},
        transports::TransportError,
    },
    std::time::Duration,
    url::Url,
};

pub type AlloyProvider = DynProvider;

/// Everything needed to talk to the target network. Built explicitly by the
/// caller; nothing in this crate reads the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint of the node to connect to.
    pub rpc_url: Url,
    /// Account that signs and pays for transactions.
    pub signing_key: SigningKey,
    /// Chain the node is expected to be on. Checked when connecting.
    pub chain_id: u64,
    /// Number of blocks (including the one with the transaction) required
    /// before a transaction counts as confirmed.
    pub confirmations: u64,
    /// How long to wait for confirmation before giving up.
    pub confirmation_timeout: Duration,
}

impl Config {
    pub const DEFAULT_CONFIRMATIONS: u64 = 1;
    pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(300);

    pub fn new(rpc_url: Url, signing_key: SigningKey, chain_id: u64) -> Self {
        Self {
            rpc_url,
            signing_key,
            chain_id,
            confirmations: Self::DEFAULT_CONFIRMATIONS,
            confirmation_timeout: Self::DEFAULT_CONFIRMATION_TIMEOUT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid signing key")]
    InvalidSigningKey,

    #[error("node at {url} is on chain {node}, but chain {configured} was configured")]
    ChainMismatch { url: Url, configured: u64, node: u64 },

    #[error("transaction rejected by the node: {0}")]
    Rejected(String),

    #[error("insufficient funds to pay for the transaction: {0}")]
    InsufficientFunds(String),

    #[error("transaction {tx_hash} was not confirmed within {timeout:?}")]
    Timeout { tx_hash: TxHash, timeout: Duration },

    #[error("transaction {0} reverted")]
    Reverted(TxHash),

    #[error("receipt of transaction {0} does not contain a contract address")]
    MissingContractAddress(TxHash),

    #[error("failed waiting for transaction {tx_hash}")]
    Confirmation {
        tx_hash: TxHash,
        #[source]
        source: PendingTransactionError,
    },

    #[error("rpc request failed")]
    Transport(#[from] TransportError),
}
