//! Building transactions, preparing them from a simulation and signing them
//! for a specific network.

use std::time::Duration;

use chrono::Utc;
use sha2::{Digest, Sha256};
use stellar_xdr::curr::{
    AccountEntry, Hash, HostFunction, InvokeHostFunctionOp, Limits, Memo, MuxedAccount,
    Operation, OperationBody, Preconditions, PublicKey, ReadXdr, SequenceNumber,
    SorobanAuthorizationEntry, SorobanTransactionData, TimeBounds, TimePoint, Transaction,
    TransactionEnvelope, TransactionExt, TransactionSignaturePayload,
    TransactionSignaturePayloadTaggedTransaction, TransactionV1Envelope, VecM, WriteXdr,
};

use crate::error::ErrorKind;
use crate::result::Result;
use crate::rpc::types::SimulateTransactionResponse;
use crate::types::KeyPair;

/// Builder for a transaction sourced from a freshly loaded account. The
/// transaction uses the account's next sequence number.
#[derive(Clone, Debug)]
pub struct TransactionBuilder {
    source: MuxedAccount,
    sequence: i64,
    base_fee: u32,
    timeout: Option<Duration>,
    operations: Vec<Operation>,
}

impl TransactionBuilder {
    pub fn new(account: &AccountEntry, base_fee: u32) -> Self {
        let PublicKey::PublicKeyTypeEd25519(key) = &account.account_id.0;
        Self {
            source: MuxedAccount::Ed25519(key.clone()),
            sequence: account.seq_num.0 + 1,
            base_fee,
            timeout: None,
            operations: Vec::new(),
        }
    }

    /// Append an operation invoking `host_function`.
    pub fn invoke(mut self, host_function: HostFunction) -> Self {
        self.operations.push(Operation {
            source_account: None,
            body: OperationBody::InvokeHostFunction(InvokeHostFunctionOp {
                host_function,
                auth: VecM::default(),
            }),
        });
        self
    }

    /// Bound how long the network will accept the transaction, counted from
    /// the moment it is built.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Transaction> {
        if self.operations.is_empty() {
            return Err(ErrorKind::Other.message("transaction has no operations"));
        }
        let fee = u32::try_from(self.operations.len())
            .ok()
            .and_then(|ops| self.base_fee.checked_mul(ops))
            .ok_or_else(|| ErrorKind::DataConversion.message("transaction fee overflows u32"))?;

        let cond = match self.timeout {
            Some(timeout) => {
                let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
                Preconditions::Time(TimeBounds {
                    min_time: TimePoint(0),
                    max_time: TimePoint(now + timeout.as_secs()),
                })
            }
            None => Preconditions::None,
        };

        Ok(Transaction {
            source_account: self.source,
            fee,
            seq_num: SequenceNumber(self.sequence),
            cond,
            memo: Memo::None,
            operations: self.operations.try_into()?,
            ext: TransactionExt::V0,
        })
    }
}

/// Apply a simulation to a transaction: attach the Soroban resource data,
/// raise the fee by the minimum resource fee and fill in the authorization
/// entries the invocation needs.
pub fn assemble(
    mut tx: Transaction,
    simulation: &SimulateTransactionResponse,
) -> Result<Transaction> {
    if let Some(error) = &simulation.error {
        return Err(ErrorKind::Simulation.message(error.clone()));
    }
    if let Some(preamble) = &simulation.restore_preamble {
        return Err(ErrorKind::Simulation.message(format!(
            "archived ledger entries must be restored first (restore fee {} stroops)",
            preamble.min_resource_fee
        )));
    }
    if simulation.transaction_data.is_empty() {
        return Err(ErrorKind::Simulation.message("simulation returned no transaction data"));
    }

    let data = SorobanTransactionData::from_xdr_base64(&simulation.transaction_data, Limits::none())?;
    tx.fee = u32::try_from(simulation.min_resource_fee)
        .ok()
        .and_then(|fee| tx.fee.checked_add(fee))
        .ok_or_else(|| ErrorKind::DataConversion.message("transaction fee overflows u32"))?;

    if let Some(result) = simulation.results.first().filter(|r| !r.auth.is_empty()) {
        let auth = result
            .auth
            .iter()
            .map(|entry| SorobanAuthorizationEntry::from_xdr_base64(entry, Limits::none()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut operations = tx.operations.to_vec();
        for op in operations.iter_mut() {
            if let OperationBody::InvokeHostFunction(invoke) = &mut op.body {
                if invoke.auth.is_empty() {
                    invoke.auth = auth.clone().try_into()?;
                }
            }
        }
        tx.operations = operations.try_into()?;
    }

    tx.ext = TransactionExt::V1(data);
    Ok(tx)
}

/// Network id used in signature payloads: the SHA-256 of the passphrase.
pub fn network_id(passphrase: &str) -> Hash {
    Hash(Sha256::digest(passphrase.as_bytes()).into())
}

/// Hash of the transaction as signed on the network named by `passphrase`.
pub fn transaction_hash(tx: &Transaction, passphrase: &str) -> Result<[u8; 32]> {
    let payload = TransactionSignaturePayload {
        network_id: network_id(passphrase),
        tagged_transaction: TransactionSignaturePayloadTaggedTransaction::Tx(tx.clone()),
    };
    let bytes = payload.to_xdr(Limits::none())?;
    Ok(Sha256::digest(bytes).into())
}

/// Sign `tx` for the network named by `passphrase`.
pub fn sign(tx: Transaction, key: &KeyPair, passphrase: &str) -> Result<TransactionEnvelope> {
    let hash = transaction_hash(&tx, passphrase)?;
    let signature = key.sign_hash(&hash)?;
    Ok(TransactionEnvelope::Tx(TransactionV1Envelope {
        tx,
        signatures: vec![signature].try_into()?,
    }))
}

/// Envelope without signatures, as accepted by simulation.
pub fn unsigned_envelope(tx: Transaction) -> TransactionEnvelope {
    TransactionEnvelope::Tx(TransactionV1Envelope {
        tx,
        signatures: VecM::default(),
    })
}
