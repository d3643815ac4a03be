//! Bech32 / Bech32m segwit address encoding (BIP173, BIP350).

use crate::error::EncodingError;

const BECH32_CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

const BECH32_CONST: u32 = 1;
const BECH32M_CONST: u32 = 0x2bc830a3;

const CHECKSUM_LEN: usize = 6;
const MAX_LENGTH: usize = 90;

/// Witness program length accepted by this codec (P2WPKH).
pub const WITNESS_PROGRAM_LEN: usize = 20;

/// Checksum variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// BIP173, witness version 0
    Bech32,
    /// BIP350, witness versions 1 to 16
    Bech32m,
}

impl Variant {
    fn for_witness_version(version: u8) -> Self {
        if version == 0 {
            Variant::Bech32
        } else {
            Variant::Bech32m
        }
    }

    fn constant(self) -> u32 {
        match self {
            Variant::Bech32 => BECH32_CONST,
            Variant::Bech32m => BECH32M_CONST,
        }
    }
}

/// Encode a segwit address: `hrp || "1" || version || program (5-bit) || checksum`.
pub fn encode_segwit(hrp: &str, witness_version: u8, program: &[u8]) -> Result<String, EncodingError> {
    if witness_version > 16 {
        return Err(EncodingError::InvalidWitnessVersion(witness_version));
    }
    if program.len() != WITNESS_PROGRAM_LEN {
        return Err(EncodingError::InvalidProgramLength(program.len()));
    }
    if hrp.is_empty() || !hrp.bytes().all(|b| (33..=126).contains(&b)) {
        return Err(EncodingError::InvalidBech32(format!("invalid human-readable part: {:?}", hrp)));
    }

    let hrp = hrp.to_lowercase();
    let mut data = Vec::with_capacity(1 + (program.len() * 8 + 4) / 5 + CHECKSUM_LEN);
    data.push(witness_version);
    data.extend(convert_bits(program, 8, 5, true)?);

    let checksum = create_checksum(&hrp, &data, Variant::for_witness_version(witness_version));

    let mut result = String::with_capacity(hrp.len() + 1 + data.len() + CHECKSUM_LEN);
    result.push_str(&hrp);
    result.push('1');
    for &value in data.iter().chain(checksum.iter()) {
        result.push(BECH32_CHARSET[value as usize] as char);
    }
    Ok(result)
}

/// Decode a segwit address for the expected human-readable part.
///
/// Returns the witness version and the witness program.
pub fn decode_segwit(expected_hrp: &str, address: &str) -> Result<(u8, Vec<u8>), EncodingError> {
    let (hrp, data, variant) = decode(address)?;

    if hrp != expected_hrp.to_lowercase() {
        return Err(EncodingError::InvalidBech32(format!("unexpected human-readable part: {}", hrp)));
    }
    if data.is_empty() {
        return Err(EncodingError::InvalidFormat("empty witness data".into()));
    }

    let witness_version = data[0];
    if witness_version > 16 {
        return Err(EncodingError::InvalidWitnessVersion(witness_version));
    }
    if variant != Variant::for_witness_version(witness_version) {
        return Err(EncodingError::InvalidBech32(format!(
            "witness version {} must not use {:?}",
            witness_version, variant
        )));
    }

    let program = convert_bits(&data[1..], 5, 8, false)?;
    if program.len() != WITNESS_PROGRAM_LEN {
        return Err(EncodingError::InvalidProgramLength(program.len()));
    }

    Ok((witness_version, program))
}

/// Split a Bech32 string into lowercase hrp, 5-bit data without checksum, and variant.
fn decode(input: &str) -> Result<(String, Vec<u8>, Variant), EncodingError> {
    if input.len() > MAX_LENGTH {
        return Err(EncodingError::InvalidBech32(format!("too long: {} characters", input.len())));
    }
    let has_lower = input.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = input.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(EncodingError::InvalidBech32("mixed case".into()));
    }

    let input_lower = input.to_lowercase();

    // Find separator
    let sep_pos = input_lower
        .rfind('1')
        .ok_or_else(|| EncodingError::InvalidBech32("no separator found".into()))?;

    if sep_pos == 0 || sep_pos + 1 + CHECKSUM_LEN > input_lower.len() {
        return Err(EncodingError::InvalidBech32("invalid separator position".into()));
    }

    let hrp = &input_lower[..sep_pos];
    if !hrp.bytes().all(|b| (33..=126).contains(&b)) {
        return Err(EncodingError::InvalidBech32(format!("invalid human-readable part: {:?}", hrp)));
    }
    let data_part = &input_lower[sep_pos + 1..];

    let mut data = Vec::with_capacity(data_part.len());
    for c in data_part.chars() {
        let idx = BECH32_CHARSET
            .iter()
            .position(|&x| x as char == c)
            .ok_or_else(|| EncodingError::InvalidBech32(format!("invalid character: {}", c)))?;
        data.push(idx as u8);
    }

    let checksum = bech32_polymod(&hrp_expand(hrp), &data);
    let variant = if checksum == BECH32_CONST {
        Variant::Bech32
    } else if checksum == BECH32M_CONST {
        Variant::Bech32m
    } else {
        return Err(EncodingError::InvalidBech32("invalid checksum".into()));
    };

    data.truncate(data.len() - CHECKSUM_LEN);

    Ok((hrp.to_string(), data, variant))
}

fn create_checksum(hrp: &str, data: &[u8], variant: Variant) -> [u8; CHECKSUM_LEN] {
    let mut values = Vec::with_capacity(data.len() + CHECKSUM_LEN);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0u8; CHECKSUM_LEN]);

    let polymod = bech32_polymod(&hrp_expand(hrp), &values) ^ variant.constant();

    let mut checksum = [0u8; CHECKSUM_LEN];
    for (i, value) in checksum.iter_mut().enumerate() {
        *value = ((polymod >> (5 * (5 - i))) & 31) as u8;
    }
    checksum
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let mut result = Vec::with_capacity(hrp.len() * 2 + 1);

    for b in hrp.bytes() {
        result.push(b >> 5);
    }
    result.push(0);
    for b in hrp.bytes() {
        result.push(b & 31);
    }

    result
}

fn bech32_polymod(hrp: &[u8], data: &[u8]) -> u32 {
    const GEN: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

    let mut chk: u32 = 1;

    for &value in hrp.iter().chain(data.iter()) {
        let top = chk >> 25;
        chk = ((chk & 0x1ffffff) << 5) ^ (value as u32);
        for (i, &g) in GEN.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }

    chk
}

/// Regroup bits, e.g. 8-bit bytes into 5-bit words.
fn convert_bits(data: &[u8], from_bits: u8, to_bits: u8, pad: bool) -> Result<Vec<u8>, EncodingError> {
    let mut acc: u32 = 0;
    let mut bits: u8 = 0;
    let mut result = Vec::with_capacity(data.len() * from_bits as usize / to_bits as usize + 1);
    let max_value = (1u32 << to_bits) - 1;

    for &value in data {
        if (value as u32) >> from_bits != 0 {
            return Err(EncodingError::InvalidBech32("invalid value in data".into()));
        }
        acc = (acc << from_bits) | (value as u32);
        bits += from_bits;

        while bits >= to_bits {
            bits -= to_bits;
            result.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            result.push(((acc << (to_bits - bits)) & max_value) as u8);
        }
    } else if bits >= from_bits || ((acc << (to_bits - bits)) & max_value) != 0 {
        return Err(EncodingError::InvalidBech32("invalid padding".into()));
    }

    Ok(result)
}
