//! Wire types of the Soroban JSON-RPC methods consumed by this crate.
//!
//! Account lookup, simulation and network checks use the response types of
//! `stellar-rpc-client`, re-exported here. Submission and status queries are
//! bound directly, since `sendTransaction` must not wait for inclusion and
//! `getTransaction` needs the ledger and close time of the record.

use serde::{Deserialize, Serialize};

use crate::types::TxHash;

pub use stellar_rpc_client::{GetLedgerEntriesResponse, SimulateTransactionResponse};

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Serialize)]
pub(crate) struct Request<'a, P> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<P>,
}

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Response<T> {
    pub result: Option<T>,
    pub error: Option<ErrorObject>,
}

/// Error object of a JSON-RPC response.
#[derive(Clone, Debug, Deserialize, thiserror::Error)]
#[error("rpc error {code}: {message}")]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetHealthResponse {
    pub status: String,
    #[serde(default)]
    pub latest_ledger: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SendTransactionStatus {
    Pending,
    Duplicate,
    TryAgainLater,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTransactionResponse {
    pub status: SendTransactionStatus,
    pub hash: TxHash,
    /// Base64 `TransactionResult` explaining a rejection.
    #[serde(default)]
    pub error_result_xdr: Option<String>,
    #[serde(default)]
    pub diagnostic_events_xdr: Option<Vec<String>>,
    #[serde(default)]
    pub latest_ledger: u32,
}

impl SendTransactionResponse {
    /// The rejection payload, if the network refused the transaction outright.
    pub fn rejection(&self) -> Option<&str> {
        self.error_result_xdr.as_deref().filter(|xdr| !xdr.is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Success,
    NotFound,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransactionResponse {
    pub status: TransactionStatus,
    #[serde(default)]
    pub latest_ledger: u32,
    #[serde(default)]
    pub ledger: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub envelope_xdr: Option<String>,
    #[serde(default)]
    pub result_xdr: Option<String>,
    #[serde(default)]
    pub result_meta_xdr: Option<String>,
}

impl GetTransactionResponse {
    pub fn not_found() -> Self {
        Self {
            status: TransactionStatus::NotFound,
            latest_ledger: 0,
            ledger: None,
            created_at: None,
            envelope_xdr: None,
            result_xdr: None,
            result_meta_xdr: None,
        }
    }
}
