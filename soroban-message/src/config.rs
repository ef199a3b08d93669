//! Configuration of the client: which RPC server, network and contract to
//! talk to, the fee to bid and how to wait for confirmations.
//!
//! Everything except the signing secret has a testnet default. The secret
//! has no default and must come from `USER_SECRET`.

use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::error::ErrorKind;
use crate::result::Result;
use crate::rpc::PollConfig;
use crate::types::{ContractId, KeyPair};

/// URL to the testnet RPC server provided by the Stellar Development Foundation.
pub const RPC_URL: &str = "https://soroban-testnet.stellar.org";

/// Passphrase of the Stellar test network.
pub const NETWORK_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Message contract deployed on testnet for demonstrations.
pub const MESSAGE_CONTRACT_ID: &str = "CAJN25XAZLTZEVS7ZFLNZ3HWREJRQHKUU265CK67ED2ASJ22TDQ5Y4PL";

/// Base fee per operation, in stroops.
pub const BASE_FEE: u32 = 100;

pub const READ_TIMEOUT: Duration = Duration::from_secs(30);
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(60);

pub const SECRET_VAR: &str = "USER_SECRET";
pub const RPC_URL_VAR: &str = "SOROBAN_RPC_URL";
pub const CONTRACT_ID_VAR: &str = "MESSAGE_CONTRACT_ID";
pub const NETWORK_PASSPHRASE_VAR: &str = "SOROBAN_NETWORK_PASSPHRASE";
pub const BASE_FEE_VAR: &str = "SOROBAN_BASE_FEE";
pub const POLL_INTERVAL_VAR: &str = "SOROBAN_POLL_INTERVAL_MS";
pub const POLL_MAX_ATTEMPTS_VAR: &str = "SOROBAN_POLL_MAX_ATTEMPTS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub rpc_url: Url,
    pub contract_id: ContractId,
    pub network_passphrase: String,
    pub base_fee: u32,
    pub poll: PollConfig,
    /// Validity window of read transactions.
    pub read_timeout: Duration,
    /// Validity window of write transactions.
    pub write_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: Url::parse(RPC_URL).expect("url is hardcoded"),
            contract_id: ContractId::from_str(MESSAGE_CONTRACT_ID)
                .expect("contract id is hardcoded"),
            network_passphrase: NETWORK_PASSPHRASE.into(),
            base_fee: BASE_FEE,
            poll: PollConfig::default(),
            read_timeout: READ_TIMEOUT,
            write_timeout: WRITE_TIMEOUT,
        }
    }
}

impl Config {
    pub fn rpc_url(mut self, url: Url) -> Self {
        self.rpc_url = url;
        self
    }

    pub fn contract_id(mut self, contract_id: ContractId) -> Self {
        self.contract_id = contract_id;
        self
    }

    pub fn network_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.network_passphrase = passphrase.into();
        self
    }

    pub fn base_fee(mut self, base_fee: u32) -> Self {
        self.base_fee = base_fee;
        self
    }

    pub fn poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Load the configuration from the `SOROBAN_*` and `MESSAGE_CONTRACT_ID`
    /// environment variables, falling back to the testnet defaults for the
    /// ones that are not set.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = parse_var(&var, RPC_URL_VAR)? {
            config.rpc_url = url;
        }
        if let Some(contract_id) = parse_var(&var, CONTRACT_ID_VAR)? {
            config.contract_id = contract_id;
        }
        if let Some(passphrase) = var(NETWORK_PASSPHRASE_VAR).filter(|p| !p.is_empty()) {
            config.network_passphrase = passphrase;
        }
        if let Some(base_fee) = parse_var(&var, BASE_FEE_VAR)? {
            config.base_fee = base_fee;
        }
        if let Some(millis) = parse_var::<u64>(&var, POLL_INTERVAL_VAR)? {
            config.poll.interval = Duration::from_millis(millis);
        }
        if let Some(attempts) = parse_var(&var, POLL_MAX_ATTEMPTS_VAR)? {
            config.poll.max_attempts = attempts;
        }
        Ok(config)
    }
}

/// Load the signing key from `USER_SECRET`. There is no fallback key: a
/// missing or malformed secret is a configuration error.
pub fn key_from_env() -> Result<KeyPair> {
    key_from_var(std::env::var(SECRET_VAR).ok())
}

fn key_from_var(secret: Option<String>) -> Result<KeyPair> {
    let secret = secret
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ErrorKind::Config.message(format!("{SECRET_VAR} is not set")))?;
    KeyPair::from_secret(&secret)
        .map_err(|e| ErrorKind::Config.full(format!("{SECRET_VAR} is not a valid secret key"), e))
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(name) {
        Some(value) if !value.is_empty() => value
            .parse()
            .map(Some)
            .map_err(|err| ErrorKind::Config.full(format!("invalid value for {name}"), err)),
        _ => Ok(None),
    }
}
