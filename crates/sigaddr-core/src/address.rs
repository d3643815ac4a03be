//! Address derivation from a public key, address parsing, and message verification.
//!
//! Supports:
//! - Legacy P2PKH - Base58Check of the key hash, 1... (mainnet) or m/n... (testnet)
//! - Nested SegWit P2SH-P2WPKH - Base58Check of the hash of `OP_0 <20-byte key hash>`, 3... or 2...
//! - Native SegWit P2WPKH - Bech32 witness v0 program, bc1q... or tb1q...

use crate::base58;
use crate::bech32;
use crate::error::{EncodingError, Result};
use crate::hash::hash160;
use crate::network::{Network, NetworkParams};
use crate::pubkey::PublicKey;
use crate::recovery::recover;
use crate::signature::CompactSignature;

/// Address kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// P2PKH: OP_DUP OP_HASH160 <20-byte-hash> OP_EQUALVERIFY OP_CHECKSIG
    Legacy,
    /// P2SH wrapping a P2WPKH redeem script
    NestedSegwit,
    /// P2WPKH: OP_0 <20-byte-hash>
    NativeSegwit,
}

impl AddressKind {
    pub const ALL: [AddressKind; 3] = [
        AddressKind::Legacy,
        AddressKind::NestedSegwit,
        AddressKind::NativeSegwit,
    ];

    /// Get the display name for this address kind.
    pub fn name(&self) -> &'static str {
        match self {
            AddressKind::Legacy => "Legacy",
            AddressKind::NestedSegwit => "Nested SegWit",
            AddressKind::NativeSegwit => "SegWit",
        }
    }
}

/// An encoded address tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    Legacy(String),
    NestedSegwit(String),
    NativeSegwit(String),
}

impl Address {
    pub fn kind(&self) -> AddressKind {
        match self {
            Address::Legacy(_) => AddressKind::Legacy,
            Address::NestedSegwit(_) => AddressKind::NestedSegwit,
            Address::NativeSegwit(_) => AddressKind::NativeSegwit,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Address::Legacy(s) | Address::NestedSegwit(s) | Address::NativeSegwit(s) => s,
        }
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three addresses of one key on one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAddresses {
    pub legacy: String,
    pub nested_segwit: String,
    pub native_segwit: String,
}

impl DerivedAddresses {
    pub fn get(&self, kind: AddressKind) -> &str {
        match kind {
            AddressKind::Legacy => &self.legacy,
            AddressKind::NestedSegwit => &self.nested_segwit,
            AddressKind::NativeSegwit => &self.native_segwit,
        }
    }

    /// Addresses in legacy, nested, native order.
    pub fn iter(&self) -> impl Iterator<Item = Address> + '_ {
        [
            Address::Legacy(self.legacy.clone()),
            Address::NestedSegwit(self.nested_segwit.clone()),
            Address::NativeSegwit(self.native_segwit.clone()),
        ]
        .into_iter()
    }
}

/// Full pipeline output: recovered key plus its addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    pub public_key: PublicKey,
    pub compressed: bool,
    pub addresses: DerivedAddresses,
}

/// The P2WPKH redeem script `OP_0 PUSH20 <hash>` wrapped by nested segwit.
pub fn p2wpkh_redeem_script(key_hash: &[u8; 20]) -> [u8; 22] {
    let mut script = [0u8; 22];
    script[0] = 0x00; // OP_0
    script[1] = 0x14; // Push 20 bytes
    script[2..].copy_from_slice(key_hash);
    script
}

/// Derive legacy, nested segwit and native segwit addresses for `pk`.
///
/// `compressed` selects the key serialization that gets hashed.
pub fn derive(pk: &PublicKey, compressed: bool, net: &NetworkParams) -> Result<DerivedAddresses> {
    let key_hash = hash160(&pk.serialize_as(compressed));

    let legacy = base58::check_encode(net.p2pkh_version, &key_hash);
    let native_segwit = bech32::encode_segwit(net.bech32_hrp, 0, &key_hash)?;

    // Second HASH160 pass over the wrapping script, not the key
    let script_hash = hash160(&p2wpkh_redeem_script(&key_hash));
    let nested_segwit = base58::check_encode(net.p2sh_version, &script_hash);

    log::debug!(
        "derived {} addresses for {}: {} {} {}",
        net.name,
        hex::encode(key_hash),
        legacy,
        nested_segwit,
        native_segwit
    );

    Ok(DerivedAddresses {
        legacy,
        nested_segwit,
        native_segwit,
    })
}

/// Recover the signer of `message` and derive its addresses on `net`.
///
/// The key is serialized as the signature header says.
pub fn derive_from_signature(message: &str, sig: &CompactSignature, net: &NetworkParams) -> Result<Derivation> {
    let (public_key, compressed) = recover(message, sig)?;
    let addresses = derive(&public_key, compressed, net)?;
    Ok(Derivation {
        public_key,
        compressed,
        addresses,
    })
}

/// A decoded address: its kind and the 20-byte hash it commits to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    pub kind: AddressKind,
    pub hash: [u8; 20],
}

/// Decode an address on `net`.
///
/// A P2SH address decodes as `NestedSegwit`; whether its script really is a
/// P2WPKH redeem script is only known once a key is at hand.
pub fn parse(address: &str, net: &NetworkParams) -> Result<ParsedAddress> {
    let trimmed = address.trim();
    let lower = trimmed.to_lowercase();

    if lower.starts_with(&format!("{}1", net.bech32_hrp)) {
        let (version, program) = bech32::decode_segwit(net.bech32_hrp, trimmed)?;
        if version != 0 {
            return Err(EncodingError::InvalidWitnessVersion(version).into());
        }
        return Ok(ParsedAddress {
            kind: AddressKind::NativeSegwit,
            hash: to_hash(&program)?,
        });
    }

    // Segwit address of another built-in network
    if let Some(other) = Network::ALL
        .iter()
        .map(|n| n.params())
        .find(|p| p.bech32_hrp != net.bech32_hrp && lower.starts_with(&format!("{}1", p.bech32_hrp)))
    {
        return Err(EncodingError::NetworkMismatch {
            expected: net.name.into(),
            got: other.name.into(),
        }
        .into());
    }

    let (version, payload) = base58::check_decode(trimmed)?;

    let kind = if version == net.p2pkh_version {
        AddressKind::Legacy
    } else if version == net.p2sh_version {
        AddressKind::NestedSegwit
    } else {
        return Err(EncodingError::NetworkMismatch {
            expected: net.name.into(),
            got: format!("version byte 0x{:02x}", version),
        }
        .into());
    };

    Ok(ParsedAddress {
        kind,
        hash: to_hash(&payload)?,
    })
}

fn to_hash(payload: &[u8]) -> Result<[u8; 20], EncodingError> {
    if payload.len() != 20 {
        return Err(EncodingError::InvalidFormat(format!(
            "expected a 20-byte hash, got {} bytes",
            payload.len()
        )));
    }
    let mut hash = [0u8; 20];
    hash.copy_from_slice(payload);
    Ok(hash)
}

/// Check that `sig` over `message` was made by the key behind `address`.
///
/// Every address kind is checked against the key serialization chosen by
/// the signature header, the same form [`derive_from_signature`] hashes. An
/// address derived from a signature therefore always verifies with it.
pub fn verify_message(
    address: &str,
    message: &str,
    sig: &CompactSignature,
    net: &NetworkParams,
) -> Result<bool> {
    let parsed = parse(address, net)?;
    let (public_key, compressed) = recover(message, sig)?;

    let key_hash = hash160(&public_key.serialize_as(compressed));
    let matches = match parsed.kind {
        AddressKind::Legacy | AddressKind::NativeSegwit => key_hash == parsed.hash,
        AddressKind::NestedSegwit => hash160(&p2wpkh_redeem_script(&key_hash)) == parsed.hash,
    };

    if !matches {
        log::debug!("signature does not match {} address {}", parsed.kind.name(), address.trim());
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::network::{MAINNET, TESTNET};

    const G_COMPRESSED: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const KEY_ONE_SIG_COMPRESSED: &str = "20f01d6b9018ab421dd410404cb869072065522bf85734008f105cf385a023a80fd0024df727c41511fd9e42744171da90d454c5bee9a51aeac0a9c2e5d7b20ff0";
    const KEY_ONE_SIG_UNCOMPRESSED: &str = "1cf01d6b9018ab421dd410404cb869072065522bf85734008f105cf385a023a80fd0024df727c41511fd9e42744171da90d454c5bee9a51aeac0a9c2e5d7b20ff0";

    fn key_one() -> PublicKey {
        PublicKey::from_hex(G_COMPRESSED).unwrap()
    }

    #[test]
    fn test_derive_mainnet_compressed() {
        let addrs = derive(&key_one(), true, &MAINNET).unwrap();
        assert_eq!(addrs.legacy, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
        assert_eq!(addrs.nested_segwit, "3JvL6Ymt8MVWiCNHC7oWU6nLeHNJKLZGLN");
        assert_eq!(addrs.native_segwit, "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
    }

    #[test]
    fn test_derive_mainnet_uncompressed() {
        let addrs = derive(&key_one(), false, &MAINNET).unwrap();
        assert_eq!(addrs.legacy, "1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm");
    }

    #[test]
    fn test_derive_testnet() {
        let addrs = derive(&key_one(), true, &TESTNET).unwrap();
        assert_eq!(addrs.legacy, "mrCDrCybB6J1vRfbwM5hemdJz73FwDBC8r");
        assert_eq!(addrs.nested_segwit, "2NAUYAHhujozruyzpsFRP63mbrdaU5wnEpN");
        assert_eq!(addrs.native_segwit, "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx");
    }

    #[test]
    fn test_networks_and_kinds_distinct() {
        for compressed in [true, false] {
            let main = derive(&key_one(), compressed, &MAINNET).unwrap();
            let test = derive(&key_one(), compressed, &TESTNET).unwrap();

            for kind in AddressKind::ALL {
                assert_ne!(main.get(kind), test.get(kind));
            }
            for addrs in [&main, &test] {
                assert_ne!(addrs.legacy, addrs.nested_segwit);
                assert_ne!(addrs.legacy, addrs.native_segwit);
                assert_ne!(addrs.nested_segwit, addrs.native_segwit);
            }
        }
    }

    #[test]
    fn test_iter_tags_kinds() {
        let addrs = derive(&key_one(), true, &MAINNET).unwrap();
        let tagged: Vec<Address> = addrs.iter().collect();
        assert_eq!(tagged.len(), 3);
        for (address, kind) in tagged.iter().zip(AddressKind::ALL) {
            assert_eq!(address.kind(), kind);
            assert_eq!(address.as_str(), addrs.get(kind));
        }
    }

    #[test]
    fn test_redeem_script() {
        let hash = [0xab; 20];
        let script = p2wpkh_redeem_script(&hash);
        assert_eq!(script[0], 0x00);
        assert_eq!(script[1], 0x14);
        assert_eq!(&script[2..], &hash);
    }

    #[test]
    fn test_derive_from_signature() {
        let sig = CompactSignature::from_hex(KEY_ONE_SIG_COMPRESSED).unwrap();
        let derivation = derive_from_signature("hello", &sig, &MAINNET).unwrap();
        assert!(derivation.compressed);
        assert_eq!(derivation.public_key.to_hex(), G_COMPRESSED);
        assert_eq!(derivation.addresses.legacy, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
    }

    #[test]
    fn test_parse_addresses() {
        let parsed = parse("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH", &MAINNET).unwrap();
        assert_eq!(parsed.kind, AddressKind::Legacy);
        assert_eq!(hex::encode(parsed.hash), "751e76e8199196d454941c45d1b3a323f1433bd6");

        let parsed = parse("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy", &MAINNET).unwrap();
        assert_eq!(parsed.kind, AddressKind::NestedSegwit);

        let parsed = parse("BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4", &MAINNET).unwrap();
        assert_eq!(parsed.kind, AddressKind::NativeSegwit);
        assert_eq!(hex::encode(parsed.hash), "751e76e8199196d454941c45d1b3a323f1433bd6");
    }

    #[test]
    fn test_parse_network_mismatch() {
        assert!(matches!(
            parse("mrCDrCybB6J1vRfbwM5hemdJz73FwDBC8r", &MAINNET),
            Err(Error::Encoding(EncodingError::NetworkMismatch { .. }))
        ));
        assert!(matches!(
            parse("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4", &TESTNET),
            Err(Error::Encoding(EncodingError::NetworkMismatch { .. }))
        ));
    }

    #[test]
    fn test_parse_rejects_non_v0_program() {
        assert!(matches!(
            parse("bc1pw508d6qejxtdg4y5r3zarvary0c5xw7kj9wkru", &MAINNET),
            Err(Error::Encoding(EncodingError::InvalidWitnessVersion(1)))
        ));
    }

    #[test]
    fn test_parse_invalid_checksum() {
        assert!(matches!(
            parse("1BvBMSEYstWetqTFn5Au4m4GFg7xJaNVN3", &MAINNET),
            Err(Error::Encoding(EncodingError::ChecksumInvalid))
        ));
    }

    #[test]
    fn test_verify_message_compressed() {
        let sig = CompactSignature::from_hex(KEY_ONE_SIG_COMPRESSED).unwrap();
        for address in [
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH",
            "3JvL6Ymt8MVWiCNHC7oWU6nLeHNJKLZGLN",
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4",
        ] {
            assert!(verify_message(address, "hello", &sig, &MAINNET).unwrap(), "{}", address);
        }

        assert!(!verify_message("1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm", "hello", &sig, &MAINNET).unwrap());
        assert!(!verify_message("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH", "hello!", &sig, &MAINNET).unwrap());
    }

    #[test]
    fn test_verify_message_uncompressed() {
        let sig = CompactSignature::from_hex(KEY_ONE_SIG_UNCOMPRESSED).unwrap();
        for address in [
            "1EHNa6Q4Jz2uvNExL497mE43ikXhwF6kZm",
            "33q2i3GDkpHFAXnD3UdBsKhxzg7pvwAqtN",
            "bc1qjxeyh7049zzn99s2c6r6hvp4zfa362997dpu0h",
        ] {
            assert!(verify_message(address, "hello", &sig, &MAINNET).unwrap(), "{}", address);
        }

        // Compressed-key addresses belong to the other header form
        for address in [
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH",
            "3JvL6Ymt8MVWiCNHC7oWU6nLeHNJKLZGLN",
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4",
        ] {
            assert!(!verify_message(address, "hello", &sig, &MAINNET).unwrap(), "{}", address);
        }
    }
}
