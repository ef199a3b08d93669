use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use stellar_xdr::curr::{
    AccountEntry, AccountId, LedgerEntryData, LedgerKey, LedgerKeyAccount, Limits, PublicKey,
    ReadXdr, TransactionEnvelope, Uint256, WriteXdr,
};
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;
use url::Url;

use crate::error::{Error, ErrorKind, RpcErrorCode};
use crate::result::Result;
use crate::types::TxHash;

use super::types::{
    GetHealthResponse, GetLedgerEntriesResponse, GetTransactionResponse, Request, Response,
    SendTransactionResponse, SimulateTransactionResponse,
};
use super::SorobanRpc;

/// Client for a Soroban RPC server.
///
/// Account lookup, simulation and the network check go through
/// [`stellar_rpc_client::Client`]. Submission, status queries and the health
/// check are posted directly, and those requests are retried with a short
/// exponential backoff when the server cannot be reached.
pub struct Client {
    sdk: stellar_rpc_client::Client,
    http: reqwest::Client,
    url: Url,
    next_id: AtomicU64,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(url: Url) -> Result<Self> {
        let sdk = stellar_rpc_client::Client::new(url.as_str())
            .map_err(|e| ErrorKind::Config.full(format!("invalid rpc url {url}"), e))?;
        Ok(Self {
            sdk,
            http: reqwest::Client::new(),
            url,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn get_health(&self) -> Result<GetHealthResponse> {
        self.request("getHealth", None).await
    }

    /// Wait until the server reports itself healthy, giving up after a few
    /// seconds.
    pub async fn wait_for_rpc(&self) -> Result<()> {
        const ATTEMPTS: u32 = 10;
        for attempt in 1..=ATTEMPTS {
            match self.get_health().await {
                Ok(health) if health.status == "healthy" => return Ok(()),
                Ok(health) => {
                    tracing::debug!(target: "soroban_message", attempt, "rpc status is {:?}", health.status)
                }
                Err(err) => tracing::debug!(target: "soroban_message", attempt, "rpc not ready: {err}"),
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }

        Err(RpcErrorCode::ConnectionFailure.message(format!(
            "rpc server at {} did not become healthy",
            self.url
        )))
    }

    /// Check that the server serves the network named by `passphrase`.
    pub async fn verify_network(&self, passphrase: &str) -> Result<()> {
        let network = self
            .sdk
            .get_network()
            .await
            .map_err(|e| sdk_error("getNetwork", e))?;
        if network.passphrase != passphrase {
            return Err(RpcErrorCode::NetworkMismatch.message(format!(
                "rpc server at {} serves {:?}, expected {:?}",
                self.url, network.passphrase, passphrase
            )));
        }
        Ok(())
    }

    async fn request<R>(&self, method: &str, params: Option<Value>) -> Result<R>
    where
        R: DeserializeOwned,
    {
        // Exponential backoff starting w/ 10ms, capped at 2s, for maximum retry of 5 times:
        let retry_strategy = ExponentialBackoff::from_millis(10)
            .max_delay(Duration::from_secs(2))
            .map(jitter)
            .take(5);

        RetryIf::start(
            retry_strategy,
            || self.request_once(method, params.as_ref()),
            is_transient,
        )
        .await
    }

    async fn request_once<R>(&self, method: &str, params: Option<&Value>) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = Request {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        tracing::debug!(target: "soroban_message", method, id, "sending rpc request");

        let response = self
            .http
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(target: "soroban_message", method, "rpc request failed: {e}");
                RpcErrorCode::ConnectionFailure.custom(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcErrorCode::ServerError.message(format!(
                "{method} returned http status {status}"
            )));
        }

        let body: Response<R> = response
            .json()
            .await
            .map_err(|e| RpcErrorCode::InvalidResponse.custom(e))?;
        into_result(method, body)
    }
}

/// Only failures to reach the server are worth another attempt.
fn is_transient(err: &Error) -> bool {
    err.kind() == &ErrorKind::Rpc(RpcErrorCode::ConnectionFailure)
}

fn into_result<R>(method: &str, body: Response<R>) -> Result<R> {
    if let Some(error) = body.error {
        return Err(RpcErrorCode::ServerError.custom(error));
    }
    body.result.ok_or_else(|| {
        RpcErrorCode::InvalidResponse.message(format!("{method} returned no result"))
    })
}

fn sdk_error(method: &str, err: stellar_rpc_client::Error) -> Error {
    tracing::warn!(target: "soroban_message", method, "rpc request failed: {err}");
    ErrorKind::Rpc(RpcErrorCode::ServerError).full(format!("{method} failed"), err)
}

/// Pick the account out of a `getLedgerEntries` answer for its key.
fn account_from_entries(
    response: GetLedgerEntriesResponse,
    account_id: &AccountId,
) -> Result<AccountEntry> {
    let entry = response
        .entries
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| {
            let PublicKey::PublicKeyTypeEd25519(Uint256(bytes)) = &account_id.0;
            RpcErrorCode::AccountNotFound.message(format!(
                "account {} not found",
                stellar_strkey::ed25519::PublicKey(*bytes)
            ))
        })?;

    match LedgerEntryData::from_xdr_base64(&entry.xdr, Limits::none())? {
        LedgerEntryData::Account(account) => Ok(account),
        _ => Err(RpcErrorCode::InvalidResponse.message("ledger entry is not an account")),
    }
}

#[async_trait]
impl SorobanRpc for Client {
    async fn get_account(&self, account_id: &AccountId) -> Result<AccountEntry> {
        let key = LedgerKey::Account(LedgerKeyAccount {
            account_id: account_id.clone(),
        });
        let response = self
            .sdk
            .get_ledger_entries(&[key])
            .await
            .map_err(|e| sdk_error("getLedgerEntries", e))?;
        account_from_entries(response, account_id)
    }

    async fn simulate_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SimulateTransactionResponse> {
        self.sdk
            .simulate_transaction_envelope(envelope)
            .await
            .map_err(|e| sdk_error("simulateTransaction", e))
    }

    async fn send_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SendTransactionResponse> {
        let transaction = envelope.to_xdr_base64(Limits::none())?;
        self.request("sendTransaction", Some(json!({ "transaction": transaction })))
            .await
    }

    async fn get_transaction(&self, hash: &TxHash) -> Result<GetTransactionResponse> {
        self.request("getTransaction", Some(json!({ "hash": hash.to_string() })))
            .await
    }
}
