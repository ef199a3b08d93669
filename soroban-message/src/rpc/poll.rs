use std::time::Duration;

use crate::error::ErrorKind;
use crate::result::{Result, TransactionRecord};
use crate::types::TxHash;

use super::types::TransactionStatus;
use super::SorobanRpc;

/// How often and how long to ask the network for the outcome of a submitted
/// transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    /// Pause between two consecutive `getTransaction` queries.
    pub interval: Duration,
    /// Number of queries made before giving up. Zero is treated as one.
    pub max_attempts: u32,
}

impl PollConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL, Self::DEFAULT_MAX_ATTEMPTS)
    }
}

/// Query the status of `hash` until it is terminal.
///
/// `SUCCESS` yields the record. `FAILED` yields a `TransactionFailed` error
/// carrying the record. `NOT_FOUND` is retried after `config.interval`, and
/// once `config.max_attempts` queries found nothing a `Timeout` error is
/// returned.
pub async fn wait_for_transaction<C>(
    rpc: &C,
    hash: &TxHash,
    config: &PollConfig,
) -> Result<TransactionRecord>
where
    C: SorobanRpc + ?Sized,
{
    let max_attempts = config.max_attempts.max(1);
    for attempt in 1..=max_attempts {
        let response = rpc.get_transaction(hash).await?;
        match response.status {
            TransactionStatus::Success => {
                tracing::info!(
                    target: "soroban_message",
                    "transaction {} succeeded in ledger {:?}",
                    hash.short(),
                    response.ledger,
                );
                return Ok(TransactionRecord::from_response(*hash, response));
            }
            TransactionStatus::Failed => {
                tracing::warn!(target: "soroban_message", "transaction {} failed", hash.short());
                return Err(ErrorKind::TransactionFailed.detailed(
                    format!("transaction {hash} failed"),
                    TransactionRecord::from_response(*hash, response),
                ));
            }
            TransactionStatus::NotFound => {
                tracing::debug!(
                    target: "soroban_message",
                    attempt,
                    max_attempts,
                    "transaction {} not found yet",
                    hash.short(),
                );
                if attempt < max_attempts {
                    tokio::time::sleep(config.interval).await;
                }
            }
        }
    }

    Err(ErrorKind::Timeout.message(format!(
        "transaction {hash} was not confirmed after {max_attempts} queries"
    )))
}
