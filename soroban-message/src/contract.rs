//! Reading from and writing to a deployed contract.

use stellar_xdr::curr::{Limits, ReadXdr, ScVal, Transaction};

use crate::config::Config;
use crate::error::ErrorKind;
use crate::operations::Invocation;
use crate::result::{Result, TransactionRecord};
use crate::rpc::types::SendTransactionStatus;
use crate::rpc::{wait_for_transaction, SorobanRpc};
use crate::transaction::{self, TransactionBuilder};
use crate::types::{ContractId, KeyPair};
use crate::value::{decode_text, encode_text};

/// A deployed contract, reached through `rpc` and acting as the account of
/// `key`. The client, key and config are borrowed; build as many `Contract`
/// values over them as needed.
pub struct Contract<'a, C: ?Sized> {
    rpc: &'a C,
    key: &'a KeyPair,
    config: &'a Config,
}

impl<'a, C> Contract<'a, C>
where
    C: SorobanRpc + ?Sized,
{
    pub fn new(rpc: &'a C, key: &'a KeyPair, config: &'a Config) -> Self {
        Self { rpc, key, config }
    }

    /// Grab the current contract's identifier
    pub fn id(&self) -> &ContractId {
        &self.config.contract_id
    }

    /// Start an invocation of `function` on this contract.
    pub fn invocation(&self, function: &str) -> Invocation {
        Invocation::new(*self.id(), function)
    }

    /// Simulate a read-only invocation and return the value it produced.
    /// Nothing is signed or submitted.
    ///
    /// Fails with [`ErrorKind::Simulation`] if the simulation reports an
    /// error or comes back without results.
    pub async fn view(&self, invocation: &Invocation) -> Result<ScVal> {
        let tx = self.build(invocation, self.config.read_timeout).await?;
        let tx = self.rpc.prepare_transaction(tx).await?;

        let simulation = self
            .rpc
            .simulate_transaction(&transaction::unsigned_envelope(tx))
            .await?;
        if let Some(error) = simulation.error {
            return Err(ErrorKind::Simulation.message(error));
        }
        let result = simulation.results.first().ok_or_else(|| {
            ErrorKind::Simulation.message(format!(
                "simulation of {} returned no results",
                invocation.function()
            ))
        })?;

        Ok(ScVal::from_xdr_base64(&result.xdr, Limits::none())?)
    }

    /// Sign and submit an invocation, then wait for the network to confirm
    /// it.
    ///
    /// A synchronous rejection fails with [`ErrorKind::SubmissionRejected`]
    /// before any confirmation query is made. Afterwards the outcome is the
    /// one of [`wait_for_transaction`].
    pub async fn call(&self, invocation: &Invocation) -> Result<TransactionRecord> {
        let tx = self.build(invocation, self.config.write_timeout).await?;
        let tx = self.rpc.prepare_transaction(tx).await?;
        let envelope = transaction::sign(tx, self.key, &self.config.network_passphrase)?;

        let response = self.rpc.send_transaction(&envelope).await?;
        tracing::info!(
            target: "soroban_message",
            "submitted {} as {} with status {:?}",
            invocation.function(),
            response.hash.short(),
            response.status,
        );

        if let Some(result_xdr) = response.rejection() {
            return Err(ErrorKind::SubmissionRejected.message(format!(
                "transaction {} rejected: {result_xdr}",
                response.hash
            )));
        }
        match response.status {
            SendTransactionStatus::Pending | SendTransactionStatus::Duplicate => {}
            status @ (SendTransactionStatus::Error | SendTransactionStatus::TryAgainLater) => {
                return Err(ErrorKind::SubmissionRejected.message(format!(
                    "transaction {} rejected with status {status:?}",
                    response.hash
                )));
            }
        }

        wait_for_transaction(self.rpc, &response.hash, &self.config.poll).await
    }

    async fn build(
        &self,
        invocation: &Invocation,
        timeout: std::time::Duration,
    ) -> Result<Transaction> {
        let account = self.rpc.get_account(&self.key.account_id()).await?;
        tracing::debug!(
            target: "soroban_message",
            "building {} with sequence {}",
            invocation.function(),
            account.seq_num.0 + 1,
        );

        TransactionBuilder::new(&account, self.config.base_fee)
            .invoke(invocation.host_function()?)
            .timeout(timeout)
            .build()
    }
}

/// The message contract: one stored string, read with `get_message` and
/// replaced with `set_message`.
pub struct MessageContract<'a, C: ?Sized> {
    contract: Contract<'a, C>,
}

impl<'a, C> MessageContract<'a, C>
where
    C: SorobanRpc + ?Sized,
{
    pub const GET_MESSAGE: &'static str = "get_message";
    pub const SET_MESSAGE: &'static str = "set_message";

    pub fn new(rpc: &'a C, key: &'a KeyPair, config: &'a Config) -> Self {
        Self {
            contract: Contract::new(rpc, key, config),
        }
    }

    pub fn as_contract(&self) -> &Contract<'a, C> {
        &self.contract
    }

    /// Current message, or `None` when the stored value is not text.
    pub async fn get_message(&self) -> Result<Option<String>> {
        let invocation = self.contract.invocation(Self::GET_MESSAGE);
        let value = self.contract.view(&invocation).await?;
        Ok(decode_text(Some(&value)))
    }

    pub async fn set_message(&self, message: &str) -> Result<TransactionRecord> {
        let invocation = self
            .contract
            .invocation(Self::SET_MESSAGE)
            .arg(encode_text(message)?);
        self.contract.call(&invocation).await
    }
}
