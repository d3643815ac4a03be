//! Signer address recovery for Bitcoin signed messages.
//!
//! This crate provides pure Rust implementations of:
//! - Compact signature decoding (hex or base64) with header validation
//! - ECDSA public-key recovery over secp256k1
//! - SHA256d and HASH160 digests
//! - Base58Check and Bech32/Bech32m codecs
//! - Legacy, nested segwit and native segwit address derivation
//! - Signed-message verification against an address

pub mod address;
pub mod base58;
pub mod bech32;
pub mod error;
pub mod hash;
pub mod message;
pub mod network;
pub mod pubkey;
pub mod recovery;
pub mod signature;

pub use address::{
    derive, derive_from_signature, verify_message, Address, AddressKind, Derivation,
    DerivedAddresses,
};
pub use error::{DecodeError, EncodingError, Error, RecoveryError, Result};
pub use hash::hash160;
pub use message::signed_message_hash;
pub use network::{Network, NetworkParams, MAINNET, TESTNET};
pub use pubkey::PublicKey;
pub use recovery::{recover, recover_prehash};
pub use signature::CompactSignature;
