//! Types used across the crate to name contracts, transactions and the key
//! pair that signs them. XDR types are re-exported from `stellar_xdr` as-is.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use ed25519_dalek::{Signer as _, SigningKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use stellar_xdr::curr::{
    AccountId, DecoratedSignature, Hash, MuxedAccount, PublicKey, ScAddress, Signature,
    SignatureHint, Uint256,
};

use crate::error::{Error, ErrorKind};
use crate::result::Result;

/// Identifier of a deployed contract. Parsed from its strkey form, which
/// always starts with `C` and decodes to 32 bytes.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub struct ContractId(pub [u8; 32]);

impl ContractId {
    /// Address of this contract as used inside an invocation.
    pub fn address(&self) -> ScAddress {
        ScAddress::Contract(Hash(self.0))
    }
}

impl FromStr for ContractId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if !s.starts_with('C') {
            return Err(ErrorKind::DataConversion
                .message(format!("contract id must start with 'C', got {s:?}")));
        }
        let contract = stellar_strkey::Contract::from_string(s)
            .map_err(|e| ErrorKind::DataConversion.full(format!("invalid contract id {s:?}"), e))?;
        Ok(Self(contract.0))
    }
}

impl Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", stellar_strkey::Contract(self.0).to_string())
    }
}

impl Debug for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractId({self})")
    }
}

/// Hash of a transaction, displayed and transported as lowercase hex.
#[derive(Clone, Copy, Default, Hash, Eq, PartialEq)]
pub struct TxHash(pub [u8; 32]);

impl TxHash {
    /// Short prefix of the hash, handy for progress messages.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl FromStr for TxHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| ErrorKind::DataConversion.full(format!("invalid tx hash {s:?}"), e))?;
        Ok(Self(bytes))
    }
}

impl Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({self})")
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// An ed25519 key pair that signs transactions for one account.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Parse a secret seed in strkey form (`S...`).
    pub fn from_secret(secret: &str) -> Result<Self> {
        let sk = stellar_strkey::ed25519::PrivateKey::from_string(secret.trim())
            .map_err(|e| ErrorKind::DataConversion.full("invalid secret key", e))?;
        Ok(Self::from_seed(sk.0))
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The account address in strkey form (`G...`).
    pub fn public_key(&self) -> String {
        stellar_strkey::ed25519::PublicKey(self.public_key_bytes()).to_string()
    }

    pub fn account_id(&self) -> AccountId {
        AccountId(PublicKey::PublicKeyTypeEd25519(Uint256(
            self.public_key_bytes(),
        )))
    }

    pub fn muxed_account(&self) -> MuxedAccount {
        MuxedAccount::Ed25519(Uint256(self.public_key_bytes()))
    }

    /// Sign a 32 byte transaction hash, producing the decorated signature that
    /// goes into an envelope. The hint is the last four bytes of the public key.
    pub fn sign_hash(&self, hash: &[u8; 32]) -> Result<DecoratedSignature> {
        let public = self.public_key_bytes();
        let mut hint = [0u8; 4];
        hint.copy_from_slice(&public[28..]);

        let signature = self.signing_key.sign(hash);
        Ok(DecoratedSignature {
            hint: SignatureHint(hint),
            signature: Signature(signature.to_bytes().to_vec().try_into()?),
        })
    }
}

impl Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_key", &self.public_key())
            .finish()
    }
}
