//! Client for the message contract deployed on the Stellar network.
//!
//! Reads go through simulation only; writes are signed, submitted and then
//! confirmed by polling the RPC server. See [`MessageContract`].

pub mod config;
pub mod error;
pub mod operations;
pub mod result;
pub mod rpc;
pub mod transaction;
pub mod types;
pub mod value;

mod contract;

pub use config::Config;
pub use contract::{Contract, MessageContract};
pub use error::{Error, ErrorKind, RpcErrorCode};
pub use result::{Result, TransactionRecord};
pub use rpc::{Client, PollConfig, SorobanRpc};
pub use types::{ContractId, KeyPair, TxHash};
pub use value::{decode_text, encode_text, TextDecode};

/// XDR types used in this crate's API.
pub use stellar_xdr::curr as xdr;
