//! 65-byte compact recoverable signatures.
//!
//! Layout: one header byte, then `r` and `s` as 32-byte big-endian integers.
//! The header encodes the recovery id and whether the signer's key was
//! serialized compressed:
//!
//! | header | recovery id | key form     |
//! |--------|-------------|--------------|
//! | 27–30  | 0–3         | uncompressed |
//! | 31–34  | 0–3         | compressed   |

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::DecodeError;

/// Total size of a compact signature.
pub const COMPACT_SIGNATURE_LEN: usize = 65;

const HEADER_UNCOMPRESSED: u8 = 27;
const HEADER_COMPRESSED: u8 = 31;
const HEADER_MAX: u8 = 34;

/// Recovery id (0–3) and key compression decoded from a header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub recovery_id: u8,
    pub compressed: bool,
}

impl Header {
    /// Decode a header byte. Only 27–34 are accepted.
    pub fn decode(byte: u8) -> Result<Self, DecodeError> {
        match byte {
            HEADER_UNCOMPRESSED..=30 => Ok(Header {
                recovery_id: byte - HEADER_UNCOMPRESSED,
                compressed: false,
            }),
            HEADER_COMPRESSED..=HEADER_MAX => Ok(Header {
                recovery_id: byte - HEADER_COMPRESSED,
                compressed: true,
            }),
            _ => Err(DecodeError::InvalidHeader(byte)),
        }
    }

    /// Header byte for this recovery id and compression flag.
    pub fn encode(&self) -> u8 {
        let base = if self.compressed { HEADER_COMPRESSED } else { HEADER_UNCOMPRESSED };
        base + (self.recovery_id & 3)
    }

    /// Bit 0 of the recovery id: R.y is odd.
    pub fn y_is_odd(&self) -> bool {
        self.recovery_id & 1 == 1
    }

    /// Bit 1 of the recovery id: R.x = r + n.
    pub fn x_overflowed(&self) -> bool {
        self.recovery_id & 2 == 2
    }
}

/// A decoded compact signature. Range checks on `r` and `s` happen during recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactSignature {
    header: Header,
    r: [u8; 32],
    s: [u8; 32],
}

impl CompactSignature {
    /// Assemble a signature from its parts. No range checks are made.
    pub fn new(header: Header, r: [u8; 32], s: [u8; 32]) -> Self {
        CompactSignature { header, r, s }
    }

    /// Parse the raw 65-byte form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != COMPACT_SIGNATURE_LEN {
            return Err(DecodeError::InvalidLength(bytes.len()));
        }

        let header = Header::decode(bytes[0])?;
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[1..33]);
        s.copy_from_slice(&bytes[33..65]);

        Ok(CompactSignature { header, r, s })
    }

    /// Parse a hex string without `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, DecodeError> {
        let bytes = hex::decode(s).map_err(|e| DecodeError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Parse standard base64, the form produced by Bitcoin Core's `signmessage`.
    pub fn from_base64(s: &str) -> Result<Self, DecodeError> {
        let bytes = STANDARD
            .decode(s.trim())
            .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Accept either encoding. A 130-digit hex string is hex; anything else is base64.
    pub fn parse(s: &str) -> Result<Self, DecodeError> {
        let s = s.trim();
        if s.len() == COMPACT_SIGNATURE_LEN * 2 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Self::from_hex(s)
        } else {
            Self::from_base64(s)
        }
    }

    /// Raw 65-byte form: header, `r`, `s`.
    pub fn to_bytes(&self) -> [u8; COMPACT_SIGNATURE_LEN] {
        let mut out = [0u8; COMPACT_SIGNATURE_LEN];
        out[0] = self.header.encode();
        out[1..33].copy_from_slice(&self.r);
        out[33..].copy_from_slice(&self.s);
        out
    }

    /// Lowercase hex of [`CompactSignature::to_bytes`].
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Standard base64, as `signmessage` prints it.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Decoded header byte.
    pub fn header(&self) -> Header {
        self.header
    }

    /// Recovery id 0–3.
    pub fn recovery_id(&self) -> u8 {
        self.header.recovery_id
    }

    /// Whether the header marks the signer key as compressed.
    pub fn is_compressed(&self) -> bool {
        self.header.compressed
    }

    /// Big-endian `r`.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// Big-endian `s`.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }
}

impl core::str::FromStr for CompactSignature {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
