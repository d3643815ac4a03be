//! SHA256 and HASH160 digests.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Bitcoin's double SHA256: SHA256(SHA256(data)).
///
/// Used for Base58Check checksums and the signed-message digest.
#[inline]
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut result = [0u8; 32];
    result.copy_from_slice(&second);
    result
}

/// Single SHA256 hash.
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let hash = Sha256::digest(data);
    let mut result = [0u8; 32];
    result.copy_from_slice(&hash);
    result
}

/// RIPEMD160(SHA256(data)), the 20-byte identifier behind every address type.
#[inline]
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let hash = Ripemd160::digest(sha256(data));
    let mut result = [0u8; 20];
    result.copy_from_slice(&hash);
    result
}
