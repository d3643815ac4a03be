//! ECDSA public-key recovery from compact signatures.
//!
//! Given digest `e` and signature `(r, s, recovery_id)`:
//!
//! 1. `R.x = r`, or `r + n` when bit 1 of the recovery id is set.
//! 2. `R` is the curve point with that x whose y parity equals bit 0.
//! 3. `Q = r⁻¹ · (s·R − e·G)`.
//! 4. `Q` must verify `(r, s)` over `e`.
//!
//! The header fixes the recovery id, so only one candidate is built.

use k256::elliptic_curve::ops::Reduce;
use k256::elliptic_curve::point::{AffineCoordinates, DecompressPoint};
use k256::elliptic_curve::subtle::Choice;
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, FieldBytes, ProjectivePoint, Scalar, U256};

use crate::error::{RecoveryError, Result};
use crate::message::signed_message_hash;
use crate::pubkey::PublicKey;
use crate::signature::CompactSignature;

/// secp256k1 group order `n`, big-endian.
const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B,
    0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// secp256k1 field prime `p`, big-endian.
const FIELD_PRIME: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFC, 0x2F,
];

/// Recover the signer's public key from a Bitcoin signed message.
///
/// Returns the key and the compression flag from the signature header. The
/// key's preferred serialization is set to the same flag.
pub fn recover(message: &str, sig: &CompactSignature) -> Result<(PublicKey, bool)> {
    let digest = signed_message_hash(message);
    recover_prehash(&digest, sig)
}

/// Recover from an already computed 32-byte digest.
pub fn recover_prehash(digest: &[u8; 32], sig: &CompactSignature) -> Result<(PublicKey, bool)> {
    let header = sig.header();
    let r = parse_scalar("r", sig.r())?;
    let s = parse_scalar("s", sig.s())?;
    let e = <Scalar as Reduce<U256>>::reduce_bytes(&FieldBytes::from(*digest));

    let big_r = reconstruct_r(sig.r(), header.x_overflowed(), header.y_is_odd())?;

    // r is non-zero, so the inverse exists
    let r_inv: Option<Scalar> = r.invert().into();
    let r_inv = r_inv.ok_or(RecoveryError::NoValidCandidate(header.recovery_id))?;

    let q = (ProjectivePoint::from(big_r) * s - ProjectivePoint::GENERATOR * e) * r_inv;

    if !verifies(&q, &r, &s, &e) {
        log::warn!(
            "recovered key for recovery id {} does not verify the signature",
            header.recovery_id
        );
        return Err(RecoveryError::NoValidCandidate(header.recovery_id).into());
    }

    let public_key = PublicKey::from_affine(&q.to_affine(), header.compressed)
        .ok_or(RecoveryError::NoValidCandidate(header.recovery_id))?;

    log::debug!(
        "recovered public key {} (recovery id {}, compressed: {})",
        public_key,
        header.recovery_id,
        header.compressed
    );

    Ok((public_key, header.compressed))
}

/// `1 <= value < n`, otherwise `ScalarOutOfRange`.
fn parse_scalar(component: &'static str, bytes: &[u8; 32]) -> Result<Scalar, RecoveryError> {
    let out_of_range = || RecoveryError::ScalarOutOfRange {
        component,
        value: hex::encode(bytes),
    };

    let scalar: Option<Scalar> = Scalar::from_repr(FieldBytes::from(*bytes)).into();
    let scalar = scalar.ok_or_else(out_of_range)?;
    if bool::from(scalar.is_zero()) {
        return Err(out_of_range());
    }
    Ok(scalar)
}

/// Rebuild the nonce point `R` from `r` and the recovery id bits.
fn reconstruct_r(r: &[u8; 32], overflowed: bool, y_is_odd: bool) -> Result<AffinePoint, RecoveryError> {
    let x = if overflowed {
        add_be(r, &CURVE_ORDER).ok_or_else(|| RecoveryError::InvalidFieldElement(format!("{} + n", hex::encode(r))))?
    } else {
        *r
    };

    if x >= FIELD_PRIME {
        return Err(RecoveryError::InvalidFieldElement(hex::encode(x)));
    }

    let point: Option<AffinePoint> =
        AffinePoint::decompress(&FieldBytes::from(x), Choice::from(y_is_odd as u8)).into();
    point.ok_or_else(|| RecoveryError::PointNotOnCurve(hex::encode(x)))
}

/// ECDSA verification: `x(e·s⁻¹·G + r·s⁻¹·Q) mod n == r`.
fn verifies(q: &ProjectivePoint, r: &Scalar, s: &Scalar, e: &Scalar) -> bool {
    if *q == ProjectivePoint::IDENTITY {
        return false;
    }

    let s_inv: Option<Scalar> = s.invert().into();
    let s_inv = match s_inv {
        Some(inv) => inv,
        None => return false,
    };

    let u1 = *e * s_inv;
    let u2 = *r * s_inv;
    let point = ProjectivePoint::GENERATOR * u1 + *q * u2;
    if point == ProjectivePoint::IDENTITY {
        return false;
    }

    let x = point.to_affine().x();
    <Scalar as Reduce<U256>>::reduce_bytes(&x) == *r
}

/// 256-bit big-endian addition. `None` on carry out.
fn add_be(a: &[u8; 32], b: &[u8; 32]) -> Option<[u8; 32]> {
    let mut out = [0u8; 32];
    let mut carry = 0u16;
    for i in (0..32).rev() {
        let sum = a[i] as u16 + b[i] as u16 + carry;
        out[i] = (sum & 0xFF) as u8;
        carry = sum >> 8;
    }
    if carry == 0 {
        Some(out)
    } else {
        None
    }
}
