//! secp256k1 public keys and their SEC1 serialization.

use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, FieldBytes};

use crate::error::DecodeError;

/// Length of a compressed SEC1 key.
pub const COMPRESSED_LEN: usize = 33;
/// Length of an uncompressed SEC1 key.
pub const UNCOMPRESSED_LEN: usize = 65;

/// A point on secp256k1 plus its preferred serialization.
///
/// Coordinates are big-endian and zero-padded. Every constructor checks the
/// curve equation, so a `PublicKey` value is always a valid, non-identity point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    x: [u8; 32],
    y: [u8; 32],
    compressed: bool,
}

impl PublicKey {
    /// Build a key from affine coordinates.
    pub fn from_coordinates(x: [u8; 32], y: [u8; 32], compressed: bool) -> Result<Self, DecodeError> {
        let encoded = EncodedPoint::from_affine_coordinates(
            &FieldBytes::from(x),
            &FieldBytes::from(y),
            false,
        );
        let point: Option<AffinePoint> = AffinePoint::from_encoded_point(&encoded).into();
        match point {
            Some(_) => Ok(PublicKey { x, y, compressed }),
            None => Err(DecodeError::InvalidPublicKey(UNCOMPRESSED_LEN)),
        }
    }

    /// Parse a 33-byte compressed or 65-byte uncompressed SEC1 key.
    pub fn from_sec1(bytes: &[u8]) -> Result<Self, DecodeError> {
        let compressed = match bytes.len() {
            COMPRESSED_LEN => true,
            UNCOMPRESSED_LEN => false,
            len => return Err(DecodeError::InvalidPublicKey(len)),
        };
        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|_| DecodeError::InvalidPublicKey(bytes.len()))?;
        let point: Option<AffinePoint> = AffinePoint::from_encoded_point(&encoded).into();
        let point = point.ok_or(DecodeError::InvalidPublicKey(bytes.len()))?;

        Self::from_affine(&point, compressed).ok_or(DecodeError::InvalidPublicKey(bytes.len()))
    }

    /// Parse a hex-encoded SEC1 key.
    pub fn from_hex(s: &str) -> Result<Self, DecodeError> {
        let bytes = hex::decode(s).map_err(|e| DecodeError::InvalidHex(e.to_string()))?;
        Self::from_sec1(&bytes)
    }

    /// `None` for the point at infinity.
    pub(crate) fn from_affine(point: &AffinePoint, compressed: bool) -> Option<Self> {
        let encoded = point.to_encoded_point(false);
        let mut x = [0u8; 32];
        let mut y = [0u8; 32];
        x.copy_from_slice(encoded.x()?);
        y.copy_from_slice(encoded.y()?);
        Some(PublicKey { x, y, compressed })
    }

    /// Big-endian X coordinate.
    pub fn x(&self) -> &[u8; 32] {
        &self.x
    }

    /// Big-endian Y coordinate.
    pub fn y(&self) -> &[u8; 32] {
        &self.y
    }

    /// Preferred serialization: compressed or not.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Same point with a different preferred serialization.
    pub fn with_compression(self, compressed: bool) -> Self {
        PublicKey { compressed, ..self }
    }

    /// `0x02`/`0x03` by Y parity, then X.
    pub fn serialize_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let mut out = [0u8; COMPRESSED_LEN];
        out[0] = 0x02 | (self.y[31] & 1);
        out[1..].copy_from_slice(&self.x);
        out
    }

    /// `0x04`, then X, then Y.
    pub fn serialize_uncompressed(&self) -> [u8; UNCOMPRESSED_LEN] {
        let mut out = [0u8; UNCOMPRESSED_LEN];
        out[0] = 0x04;
        out[1..33].copy_from_slice(&self.x);
        out[33..].copy_from_slice(&self.y);
        out
    }

    /// Serialize with an explicit compression choice.
    pub fn serialize_as(&self, compressed: bool) -> Vec<u8> {
        if compressed {
            self.serialize_compressed().to_vec()
        } else {
            self.serialize_uncompressed().to_vec()
        }
    }

    /// Serialize in the key's preferred form.
    pub fn serialize(&self) -> Vec<u8> {
        self.serialize_as(self.compressed)
    }

    /// Hex of [`PublicKey::serialize`].
    pub fn to_hex(&self) -> String {
        hex::encode(self.serialize())
    }
}

impl core::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const G_COMPRESSED: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const G_UNCOMPRESSED: &str = "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798\
                                  483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";

    #[test]
    fn test_from_sec1_compressed() {
        let pk = PublicKey::from_hex(G_COMPRESSED).unwrap();
        assert!(pk.is_compressed());
        assert_eq!(hex::encode(pk.serialize_uncompressed()), G_UNCOMPRESSED);
        assert_eq!(pk.to_hex(), G_COMPRESSED);
    }

    #[test]
    fn test_from_sec1_uncompressed() {
        let pk = PublicKey::from_hex(G_UNCOMPRESSED).unwrap();
        assert!(!pk.is_compressed());
        assert_eq!(hex::encode(pk.serialize_compressed()), G_COMPRESSED);
        assert_eq!(pk.serialize().len(), UNCOMPRESSED_LEN);
    }

    #[test]
    fn test_odd_y_prefix() {
        let pk = PublicKey::from_hex(
            "0350270751e2d40d1fd1bf977a2bbf2fe85fa39e85a7cdc64909ad4df4f151af7e",
        )
        .unwrap();
        assert_eq!(pk.serialize_compressed()[0], 0x03);
        assert_eq!(pk.y()[31] & 1, 1);
    }

    #[test]
    fn test_with_compression() {
        let pk = PublicKey::from_hex(G_COMPRESSED).unwrap().with_compression(false);
        assert_eq!(hex::encode(pk.serialize()), G_UNCOMPRESSED);
        assert_eq!(pk.serialize_as(true), pk.serialize_compressed().to_vec());
    }

    #[test]
    fn test_from_coordinates_rejects_off_curve() {
        let pk = PublicKey::from_hex(G_UNCOMPRESSED).unwrap();
        let mut y = *pk.y();
        y[31] ^= 1;
        assert!(PublicKey::from_coordinates(*pk.x(), *pk.y(), true).is_ok());
        assert_eq!(
            PublicKey::from_coordinates(*pk.x(), y, true),
            Err(DecodeError::InvalidPublicKey(UNCOMPRESSED_LEN))
        );
    }

    #[test]
    fn test_from_sec1_rejects_bad_lengths() {
        assert_eq!(
            PublicKey::from_sec1(&[0x02; 32]),
            Err(DecodeError::InvalidPublicKey(32))
        );
        assert!(matches!(PublicKey::from_hex("02zz"), Err(DecodeError::InvalidHex(_))));
    }
}
