//! Serializable derivation results for JS callers.

use serde::{Deserialize, Serialize};
use sigaddr_core::{derive, CompactSignature, Derivation, DerivedAddresses, Network, Result};
use wasm_bindgen::prelude::*;

/// One key's three addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSet {
    pub legacy: String,
    pub nested_segwit: String,
    pub native_segwit: String,
}

impl From<DerivedAddresses> for AddressSet {
    fn from(addresses: DerivedAddresses) -> Self {
        AddressSet {
            legacy: addresses.legacy,
            nested_segwit: addresses.nested_segwit,
            native_segwit: addresses.native_segwit,
        }
    }
}

/// Addresses recovered from one signed message on one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivationReport {
    /// Network name.
    pub network: String,
    /// Whether the signature header marks the key as compressed.
    pub compressed: bool,
    /// Hex of the recovered key in its header-selected serialization.
    pub public_key: String,
    /// Signature re-encoded as base64, the `signmessage` form.
    pub signature: String,
    /// Addresses of the header-selected serialization. These verify with the signature.
    pub addresses: AddressSet,
    /// Addresses of the compressed serialization, the form wallets use.
    /// Equal to `addresses` when the header is compressed.
    pub compressed_addresses: AddressSet,
}

impl DerivationReport {
    pub fn new(network: Network, sig: &CompactSignature, derivation: Derivation) -> Result<Self> {
        let compressed_addresses = if derivation.compressed {
            derivation.addresses.clone()
        } else {
            derive(&derivation.public_key, true, network.params())?
        };

        Ok(DerivationReport {
            network: network.name().to_string(),
            compressed: derivation.compressed,
            public_key: derivation.public_key.to_hex(),
            signature: sig.to_base64(),
            addresses: derivation.addresses.into(),
            compressed_addresses: compressed_addresses.into(),
        })
    }

    /// Convert to JS value.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigaddr_core::derive_from_signature;

    #[test]
    fn test_report_from_derivation() {
        let sig = CompactSignature::from_hex(
            "1bd7b51e76aa6bb85e4940063e66f5c348f8bdf7e86cb17dfc4002c94b17cfa31a6a6d77bfca235e66b005f5c638f298610b4a2b13ff7d26df03c9f1327a5d485c",
        )
        .unwrap();
        let derivation =
            derive_from_signature("verify: HelloHunW8", &sig, Network::Mainnet.params()).unwrap();

        let report = DerivationReport::new(Network::Mainnet, &sig, derivation).unwrap();
        assert_eq!(report.network, "mainnet");
        assert!(!report.compressed);
        assert!(report.public_key.starts_with("04"));
        assert_eq!(report.addresses.legacy, "1GdDCvtJzooKEAFemQV1rpeZu8ArXy9M3y");
        assert_eq!(report.compressed_addresses.legacy, "1EjPjq73yjKCdSFBUwKpRLSHV5ioPnyTFN");
        assert_eq!(
            report.compressed_addresses.native_segwit,
            "bc1qj60pvvrgwythmfuypmsz5y6mflsrvhugacffd0"
        );
        assert_eq!(
            report.signature,
            "G9e1Hnaqa7heSUAGPmb1w0j4vffobLF9/EACyUsXz6Maam13v8ojXmawBfXGOPKYYQtKKxP/fSbfA8nxMnpdSFw="
        );
    }

    #[test]
    fn test_compressed_header_reports_one_set() {
        let sig = CompactSignature::from_hex(
            "1fd7b51e76aa6bb85e4940063e66f5c348f8bdf7e86cb17dfc4002c94b17cfa31a6a6d77bfca235e66b005f5c638f298610b4a2b13ff7d26df03c9f1327a5d485c",
        )
        .unwrap();
        let derivation =
            derive_from_signature("verify: HelloHunW8", &sig, Network::Mainnet.params()).unwrap();

        let report = DerivationReport::new(Network::Mainnet, &sig, derivation).unwrap();
        assert!(report.compressed);
        assert_eq!(report.addresses, report.compressed_addresses);
        assert_eq!(report.addresses.nested_segwit, "3F5BkZ3X6KSLqpkbkxkoB1JpYjf17GHU1F");
    }
}
