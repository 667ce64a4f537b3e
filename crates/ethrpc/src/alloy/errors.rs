use {
    crate::Error,
    alloy::{
        primitives::TxHash,
        providers::{PendingTransactionError, WatchTxError},
        transports::{RpcError, TransportError},
    },
    std::time::Duration,
};

/// Classifies a failure to get a transaction accepted by the node.
///
/// Nodes report the reason as a JSON-RPC error response. Gas estimation runs
/// before submission, so a reverting constructor or an empty account also
/// surface here rather than on confirmation.
pub fn classify_submission_error(err: TransportError) -> Error {
    match &err {
        RpcError::ErrorResp(payload) => {
            let message = payload.message.to_string();
            tracing::debug!(code = payload.code, %message, "node rejected transaction");
            if message.to_ascii_lowercase().contains("insufficient funds") {
                Error::InsufficientFunds(message)
            } else {
                Error::Rejected(message)
            }
        }
        _ => Error::Transport(err),
    }
}

/// Classifies a failure while waiting for a submitted transaction.
pub fn classify_confirmation_error(
    tx_hash: TxHash,
    timeout: Duration,
    err: PendingTransactionError,
) -> Error {
    match err {
        PendingTransactionError::TxWatcher(WatchTxError::Timeout) => {
            Error::Timeout { tx_hash, timeout }
        }
        err => Error::Confirmation {
            tx_hash,
            source: err,
        },
    }
}
