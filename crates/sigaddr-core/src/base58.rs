//! Base58 and Base58Check encoding.

use crate::error::EncodingError;
use crate::hash::double_sha256;

const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const CHECKSUM_LEN: usize = 4;

/// Longest Base58Check string accepted for decoding. Addresses are at most 35.
pub const MAX_ENCODED_LEN: usize = 100;

/// Encode raw bytes as Base58. Each leading zero byte becomes a leading `1`.
pub fn encode(input: &[u8]) -> String {
    let leading_zeros = input.iter().take_while(|&&b| b == 0).count();

    // Little-endian base-58 digits
    let mut digits: Vec<u8> = Vec::with_capacity(input.len() * 138 / 100 + 1);
    for &byte in &input[leading_zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            let temp = (*digit as u32) * 256 + carry;
            *digit = (temp % 58) as u8;
            carry = temp / 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut result = String::with_capacity(leading_zeros + digits.len());
    for _ in 0..leading_zeros {
        result.push('1');
    }
    for &digit in digits.iter().rev() {
        result.push(BASE58_ALPHABET[digit as usize] as char);
    }
    result
}

/// Decode a Base58 string into raw bytes.
pub fn decode(input: &str) -> Result<Vec<u8>, EncodingError> {
    let mut result = Vec::new();

    // Count leading '1's (they become leading zeros)
    let leading_zeros = input.chars().take_while(|&c| c == '1').count();

    for c in input.chars().skip(leading_zeros) {
        let value = BASE58_ALPHABET
            .iter()
            .position(|&x| x as char == c)
            .ok_or(EncodingError::InvalidBase58Char(c))? as u32;

        // Multiply result by 58 and add value
        let mut carry = value;
        for byte in result.iter_mut().rev() {
            let temp = (*byte as u32) * 58 + carry;
            *byte = (temp & 0xFF) as u8;
            carry = temp >> 8;
        }

        while carry > 0 {
            result.insert(0, (carry & 0xFF) as u8);
            carry >>= 8;
        }
    }

    let mut final_result = vec![0u8; leading_zeros];
    final_result.extend(result);

    Ok(final_result)
}

/// Base58Check: `version || payload || first 4 bytes of SHA256d(version || payload)`.
pub fn check_encode(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN);
    data.push(version);
    data.extend_from_slice(payload);
    let checksum = double_sha256(&data);
    data.extend_from_slice(&checksum[..CHECKSUM_LEN]);
    encode(&data)
}

/// Inverse of [`check_encode`]. Returns the version byte and the payload.
pub fn check_decode(input: &str) -> Result<(u8, Vec<u8>), EncodingError> {
    if input.len() > MAX_ENCODED_LEN {
        return Err(EncodingError::InvalidFormat(format!(
            "base58check input too long: {} chars",
            input.len()
        )));
    }
    let decoded = decode(input)?;

    if decoded.len() < 1 + CHECKSUM_LEN {
        return Err(EncodingError::InvalidFormat(format!(
            "base58check data too short: {} bytes",
            decoded.len()
        )));
    }

    let (data, checksum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    if checksum != &double_sha256(data)[..CHECKSUM_LEN] {
        return Err(EncodingError::ChecksumInvalid);
    }

    Ok((data[0], data[1..].to_vec()))
}
