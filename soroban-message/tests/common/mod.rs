//! In-memory stand-in for a Soroban RPC server hosting the message contract.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde_json::json;
use soroban_message::rpc::types::{
    GetTransactionResponse, SendTransactionResponse, SendTransactionStatus,
    SimulateTransactionResponse, TransactionStatus,
};
use soroban_message::xdr::{
    AccountEntry, AccountEntryExt, AccountId, ExtensionPoint, HostFunction, LedgerFootprint,
    Limits, MuxedAccount, OperationBody, ScVal, SequenceNumber, SorobanResources,
    SorobanTransactionData, Thresholds, TransactionEnvelope, VecM, WriteXdr,
};
use soroban_message::{transaction, Config, KeyPair, PollConfig, Result, SorobanRpc, TxHash};

pub const RESOURCE_FEE: u32 = 5_000;

pub fn config() -> Config {
    Config::default().poll(PollConfig::new(Duration::from_millis(5), 5))
}

pub fn key() -> KeyPair {
    KeyPair::from_seed(rand::random())
}

/// What the scripted server answers.
#[derive(Clone, Debug)]
pub struct Script {
    /// Error reported by every simulation.
    pub simulation_error: Option<String>,
    /// Simulations of reads come back without results.
    pub empty_results: bool,
    /// Status returned by `sendTransaction` for a correctly signed envelope.
    pub send_status: SendTransactionStatus,
    pub error_result_xdr: Option<String>,
    /// Number of `NOT_FOUND` answers before the final status.
    pub pending_queries: u32,
    pub final_status: TransactionStatus,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            simulation_error: None,
            empty_results: false,
            send_status: SendTransactionStatus::Pending,
            error_result_xdr: None,
            pending_queries: 1,
            final_status: TransactionStatus::Success,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Calls {
    pub get_account: usize,
    pub simulate: usize,
    pub send: usize,
    pub get_transaction: usize,
}

struct Submitted {
    remaining: u32,
    message: Option<ScVal>,
    envelope_xdr: String,
}

struct State {
    script: Script,
    sequence: i64,
    message: ScVal,
    submitted: HashMap<TxHash, Submitted>,
    envelopes: Vec<TransactionEnvelope>,
    calls: Calls,
}

pub struct ScriptedRpc {
    passphrase: String,
    state: Mutex<State>,
}

impl ScriptedRpc {
    pub fn new(config: &Config, message: ScVal) -> Self {
        Self {
            passphrase: config.network_passphrase.clone(),
            state: Mutex::new(State {
                script: Script::default(),
                sequence: 100,
                message,
                submitted: HashMap::new(),
                envelopes: Vec::new(),
                calls: Calls::default(),
            }),
        }
    }

    pub fn with_script(self, script: Script) -> Self {
        self.state.lock().unwrap().script = script;
        self
    }

    pub fn calls(&self) -> Calls {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn sequence(&self) -> i64 {
        self.state.lock().unwrap().sequence
    }

    pub fn stored(&self) -> ScVal {
        self.state.lock().unwrap().message.clone()
    }

    /// Envelopes accepted by `sendTransaction`, in submission order.
    pub fn envelopes(&self) -> Vec<TransactionEnvelope> {
        self.state.lock().unwrap().envelopes.clone()
    }
}

fn invocation(envelope: &TransactionEnvelope) -> (String, Vec<ScVal>) {
    let TransactionEnvelope::Tx(envelope) = envelope else {
        panic!("expected a v1 envelope");
    };
    let OperationBody::InvokeHostFunction(op) = &envelope.tx.operations[0].body else {
        panic!("expected a host function invocation");
    };
    let HostFunction::InvokeContract(args) = &op.host_function else {
        panic!("expected a contract invocation");
    };
    let function = std::str::from_utf8(args.function_name.0.as_slice())
        .unwrap()
        .to_string();
    (function, args.args.to_vec())
}

fn transaction_data() -> SorobanTransactionData {
    SorobanTransactionData {
        ext: ExtensionPoint::V0,
        resources: SorobanResources {
            footprint: LedgerFootprint {
                read_only: VecM::default(),
                read_write: VecM::default(),
            },
            instructions: 2_000_000,
            read_bytes: 1_000,
            write_bytes: 500,
        },
        resource_fee: RESOURCE_FEE as i64,
    }
}

/// A `simulateTransaction` answer as the server puts it on the wire.
fn simulation(mut fields: serde_json::Value) -> SimulateTransactionResponse {
    fields["cost"] = json!({ "cpuInsns": "2000000", "memBytes": "1000" });
    fields["latestLedger"] = json!(10);
    serde_json::from_value(fields).unwrap()
}

#[async_trait]
impl SorobanRpc for ScriptedRpc {
    async fn get_account(&self, account_id: &AccountId) -> Result<AccountEntry> {
        let mut state = self.state.lock().unwrap();
        state.calls.get_account += 1;
        Ok(AccountEntry {
            account_id: account_id.clone(),
            balance: 100_000_000_000,
            seq_num: SequenceNumber(state.sequence),
            num_sub_entries: 0,
            inflation_dest: None,
            flags: 0,
            home_domain: Default::default(),
            thresholds: Thresholds([1, 0, 0, 0]),
            signers: VecM::default(),
            ext: AccountEntryExt::V0,
        })
    }

    async fn simulate_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SimulateTransactionResponse> {
        let mut state = self.state.lock().unwrap();
        state.calls.simulate += 1;
        if let Some(error) = &state.script.simulation_error {
            return Ok(simulation(json!({
                "error": error,
                "transactionData": "",
                "minResourceFee": "0",
                "results": [],
                "events": [],
            })));
        }

        let (function, _) = invocation(envelope);
        let returned = match function.as_str() {
            "get_message" => state.message.clone(),
            _ => ScVal::Void,
        };
        let results = if state.script.empty_results && function == "get_message" {
            json!([])
        } else {
            json!([{ "auth": [], "xdr": returned.to_xdr_base64(Limits::none()).unwrap() }])
        };

        Ok(simulation(json!({
            "transactionData": transaction_data().to_xdr_base64(Limits::none()).unwrap(),
            "minResourceFee": RESOURCE_FEE.to_string(),
            "results": results,
            "events": [],
        })))
    }

    async fn send_transaction(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SendTransactionResponse> {
        let mut state = self.state.lock().unwrap();
        state.calls.send += 1;

        let TransactionEnvelope::Tx(v1) = envelope else {
            panic!("expected a v1 envelope");
        };
        let hash = TxHash(transaction::transaction_hash(&v1.tx, &self.passphrase)?);
        let MuxedAccount::Ed25519(source) = &v1.tx.source_account else {
            panic!("expected a plain ed25519 source account");
        };

        let verifying = VerifyingKey::from_bytes(&source.0).unwrap();
        let signed = v1.signatures.iter().any(|sig| {
            let Ok(bytes) = <[u8; 64]>::try_from(sig.signature.0.as_slice()) else {
                return false;
            };
            verifying
                .verify(&hash.0, &Signature::from_bytes(&bytes))
                .is_ok()
        });
        if !signed || v1.tx.seq_num.0 != state.sequence + 1 {
            return Ok(SendTransactionResponse {
                status: SendTransactionStatus::Error,
                hash,
                // txBadAuth / txBadSeq are both non-empty result payloads
                error_result_xdr: Some("AAAAAAAAAGT////6AAAAAA==".into()),
                diagnostic_events_xdr: None,
                latest_ledger: 10,
            });
        }

        let response = SendTransactionResponse {
            status: state.script.send_status,
            hash,
            error_result_xdr: state.script.error_result_xdr.clone(),
            diagnostic_events_xdr: None,
            latest_ledger: 10,
        };
        if response.rejection().is_some()
            || matches!(
                response.status,
                SendTransactionStatus::Error | SendTransactionStatus::TryAgainLater
            )
        {
            return Ok(response);
        }

        state.sequence += 1;
        let (function, args) = invocation(envelope);
        let message = (function == "set_message").then(|| args[0].clone());
        let remaining = state.script.pending_queries;
        state.submitted.insert(
            hash,
            Submitted {
                remaining,
                message,
                envelope_xdr: envelope.to_xdr_base64(Limits::none()).unwrap(),
            },
        );
        state.envelopes.push(envelope.clone());
        Ok(response)
    }

    async fn get_transaction(&self, hash: &TxHash) -> Result<GetTransactionResponse> {
        let mut state = self.state.lock().unwrap();
        state.calls.get_transaction += 1;
        let final_status = state.script.final_status;

        let Some(submitted) = state.submitted.get_mut(hash) else {
            return Ok(GetTransactionResponse::not_found());
        };
        if submitted.remaining > 0 {
            submitted.remaining -= 1;
            return Ok(GetTransactionResponse::not_found());
        }

        let envelope_xdr = Some(submitted.envelope_xdr.clone());
        let message = submitted.message.take();
        if final_status == TransactionStatus::Success {
            if let Some(message) = message {
                state.message = message;
            }
        }
        Ok(GetTransactionResponse {
            status: final_status,
            latest_ledger: 12,
            ledger: Some(11),
            created_at: Some("1700000000".into()),
            envelope_xdr,
            result_xdr: None,
            result_meta_xdr: None,
        })
    }
}
