//! Access to a Soroban RPC server.
//!
//! [`SorobanRpc`] is the seam between the contract layer and the network:
//! [`client::Client`] implements it over HTTP JSON-RPC, and tests implement it
//! with scripted responses.

pub mod client;
pub mod poll;
pub mod types;

use async_trait::async_trait;
use stellar_xdr::curr::{AccountEntry, AccountId, Transaction, TransactionEnvelope};

use crate::result::Result;
use crate::transaction;
use crate::types::TxHash;

use self::types::{GetTransactionResponse, SendTransactionResponse, SimulateTransactionResponse};

pub use self::client::Client;
pub use self::poll::{wait_for_transaction, PollConfig};

#[async_trait]
pub trait SorobanRpc: Send + Sync {
    /// Load the current ledger state of an account, including its sequence
    /// number.
    async fn get_account(&self, account_id: &AccountId) -> Result<AccountEntry>;

    async fn simulate_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SimulateTransactionResponse>;

    async fn send_transaction(&self, envelope: &TransactionEnvelope)
        -> Result<SendTransactionResponse>;

    async fn get_transaction(&self, hash: &TxHash) -> Result<GetTransactionResponse>;

    /// Simulate `tx` and return it with the resource data, fee and
    /// authorization entries the simulation reported.
    async fn prepare_transaction(&self, tx: Transaction) -> Result<Transaction> {
        let simulation = self
            .simulate_transaction(&transaction::unsigned_envelope(tx.clone()))
            .await?;
        transaction::assemble(tx, &simulation)
    }
}
