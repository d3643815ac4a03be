//! Error types for signature decoding, key recovery and address encoding.

use thiserror::Error;

/// Malformed caller input: hex, base64, signature framing, key bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Odd-length string or a non-hex digit.
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
    /// Not valid standard base64.
    #[error("invalid base64 string: {0}")]
    InvalidBase64(String),
    /// Compact signatures are exactly 65 bytes.
    #[error("invalid signature length: expected 65 bytes, got {0}")]
    InvalidLength(usize),
    /// Header byte outside 27..=34.
    #[error("invalid signature header byte: {0}")]
    InvalidHeader(u8),
    /// Bytes do not encode a point on secp256k1.
    #[error("invalid public key encoding ({0} bytes)")]
    InvalidPublicKey(usize),
}

/// The signature is well formed but no public key can be recovered from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    /// `r` or `s` is zero or not below the curve order.
    #[error("signature component {component} out of range: {value}")]
    ScalarOutOfRange {
        component: &'static str,
        value: String,
    },
    /// `r` plus the curve order is not below the field prime.
    #[error("R.x is not a valid field element: {0}")]
    InvalidFieldElement(String),
    /// No curve point has the reconstructed x coordinate.
    #[error("no curve point with x = {0}")]
    PointNotOnCurve(String),
    /// The reconstructed key does not verify the signature.
    #[error("no valid public key candidate for recovery id {0}")]
    NoValidCandidate(u8),
}

/// Address encoding and decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Only 20-byte witness programs are produced and accepted.
    #[error("invalid witness program length: {0}")]
    InvalidProgramLength(usize),
    /// Witness versions run from 0 to 16.
    #[error("invalid witness version: {0}")]
    InvalidWitnessVersion(u8),
    /// Base58Check checksum does not match the payload.
    #[error("invalid checksum")]
    ChecksumInvalid,
    /// Character outside the Base58 alphabet.
    #[error("invalid base58 character: {0}")]
    InvalidBase58Char(char),
    /// Structurally broken Bech32 string.
    #[error("invalid bech32 encoding: {0}")]
    InvalidBech32(String),
    /// Decoded payload has an unexpected shape.
    #[error("invalid address format: {0}")]
    InvalidFormat(String),
    /// Address belongs to another network.
    #[error("address network mismatch: expected {expected}, got {got}")]
    NetworkMismatch { expected: String, got: String },
}

/// Any failure on the message-to-addresses path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Recovery(#[from] RecoveryError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
