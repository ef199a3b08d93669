//! All errors that can occur while talking to a Soroban RPC node, including
//! simulation, submission and confirmation failures as well as configuration
//! and data conversion errors.

mod impls;

use std::borrow::Cow;

use crate::result::TransactionRecord;

/// Error type returned by every fallible operation of this crate. Use
/// [`Error::kind`] to find out which stage of the workflow failed.
#[derive(Debug)]
pub struct Error {
    repr: ErrorRepr,
}

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The simulation reported an error, returned no results, or requires
    /// archived ledger entries to be restored first.
    #[error("simulation failed")]
    Simulation,
    /// The network rejected the transaction when it was submitted.
    #[error("submission rejected")]
    SubmissionRejected,
    /// The transaction was included in a ledger but failed.
    #[error("transaction failed")]
    TransactionFailed,
    /// The transaction did not reach a final status in the allotted polls.
    #[error("timed out waiting for confirmation")]
    Timeout,
    /// An error occurred while performing an RPC request.
    #[error("{0}")]
    Rpc(#[from] RpcErrorCode),
    /// Configuration is missing or malformed.
    #[error("invalid configuration")]
    Config,
    /// An error from converting data (XDR, strkey, hex, UTF-8).
    #[error("data conversion")]
    DataConversion,
    /// An error that cannot be categorized into the other error kinds.
    #[error("other")]
    Other,
}

/// Failures coming from the RPC layer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RpcErrorCode {
    #[error("failed to connect to rpc service")]
    ConnectionFailure,
    #[error("rpc service returned an error")]
    ServerError,
    #[error("rpc service returned a response that could not be understood")]
    InvalidResponse,
    #[error("account could not be found on the network")]
    AccountNotFound,
    #[error("rpc service is not serving the configured network")]
    NetworkMismatch,
}

#[derive(Debug, thiserror::Error)]
enum ErrorRepr {
    #[error("{0}")]
    Simple(ErrorKind),
    #[error("{kind}: {message}")]
    Message {
        kind: ErrorKind,
        message: Cow<'static, str>,
    },
    #[error("{kind}: {error}")]
    Custom {
        kind: ErrorKind,
        #[source]
        error: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("{kind}: {message}: {error}")]
    Full {
        kind: ErrorKind,
        message: Cow<'static, str>,
        #[source]
        error: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("{kind}: {message}")]
    Detailed {
        kind: ErrorKind,
        message: Cow<'static, str>,
        details: Box<TransactionRecord>,
    },
}
