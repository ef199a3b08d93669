//! Result and record types produced by transactions sent to the network.

use stellar_xdr::curr::{
    Limits, ReadXdr, ScVal, TransactionEnvelope, TransactionMeta, TransactionResult,
};

use crate::rpc::types::{GetTransactionResponse, TransactionStatus};
use crate::types::TxHash;

pub type Result<T, E = crate::error::Error> = core::result::Result<T, E>;

/// Final record of a submitted transaction as reported by `getTransaction`.
/// The XDR payloads are kept base64 encoded; use the accessor methods to
/// decode the parts that are needed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct TransactionRecord {
    pub hash: TxHash,
    pub status: TransactionStatus,
    /// Ledger sequence the transaction was included in.
    pub ledger: Option<u32>,
    /// Close time of that ledger, as unix seconds in string form.
    pub created_at: Option<String>,
    pub envelope_xdr: Option<String>,
    pub result_xdr: Option<String>,
    pub result_meta_xdr: Option<String>,
}

impl TransactionRecord {
    pub(crate) fn from_response(hash: TxHash, response: GetTransactionResponse) -> Self {
        Self {
            hash,
            status: response.status,
            ledger: response.ledger,
            created_at: response.created_at,
            envelope_xdr: response.envelope_xdr,
            result_xdr: response.result_xdr,
            result_meta_xdr: response.result_meta_xdr,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, TransactionStatus::Success)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, TransactionStatus::Failed)
    }

    pub fn envelope(&self) -> Result<Option<TransactionEnvelope>> {
        decode(self.envelope_xdr.as_deref())
    }

    pub fn result(&self) -> Result<Option<TransactionResult>> {
        decode(self.result_xdr.as_deref())
    }

    pub fn meta(&self) -> Result<Option<TransactionMeta>> {
        decode(self.result_meta_xdr.as_deref())
    }

    /// Value returned by the invoked contract function, if the meta carries
    /// Soroban data.
    pub fn return_value(&self) -> Result<Option<ScVal>> {
        let value = match self.meta()? {
            Some(TransactionMeta::V3(meta)) => meta.soroban_meta.map(|m| m.return_value),
            _ => None,
        };
        Ok(value)
    }
}

fn decode<T: ReadXdr>(xdr: Option<&str>) -> Result<Option<T>> {
    match xdr {
        Some(xdr) if !xdr.is_empty() => Ok(Some(T::from_xdr_base64(xdr, Limits::none())?)),
        _ => Ok(None),
    }
}
