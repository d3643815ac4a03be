//! JS entry points for signed-message address derivation.

use sigaddr_core::{derive_from_signature, CompactSignature, Network};
use wasm_bindgen::prelude::*;

use crate::report::DerivationReport;

/// Parse a network name, rejecting unknown ones.
fn parse_network(network: &str) -> Result<Network, String> {
    Network::from_str(network).ok_or_else(|| format!("Invalid network: {}", network))
}

/// Recover the signer and build the report for one network.
///
/// Kept free of `JsValue` so it runs in native tests.
pub fn build_report(message: &str, signature: &str, network: &str) -> Result<DerivationReport, String> {
    let net = parse_network(network)?;
    let sig = CompactSignature::parse(signature).map_err(|e| format!("Invalid signature: {}", e))?;
    let derivation = derive_from_signature(message, &sig, net.params())
        .map_err(|e| format!("Derivation failed: {}", e))?;
    DerivationReport::new(net, &sig, derivation).map_err(|e| format!("Derivation failed: {}", e))
}

/// Derive the legacy, nested segwit and native segwit addresses of a message signer.
///
/// The report carries the header-selected address set and the compressed-key set.
///
/// # Arguments
/// * `message` - The signed message text
/// * `signature` - 65-byte compact signature as hex or base64
/// * `network` - The network ("mainnet" or "testnet")
#[wasm_bindgen]
pub fn derive_addresses(message: &str, signature: &str, network: &str) -> Result<JsValue, JsValue> {
    build_report(message, signature, network)
        .map_err(|e| JsValue::from_str(&e))?
        .to_js()
}

/// Check a signed message against an address.
#[wasm_bindgen]
pub fn verify_message(address: &str, message: &str, signature: &str, network: &str) -> Result<bool, JsValue> {
    let net = parse_network(network).map_err(|e| JsValue::from_str(&e))?;
    let sig = CompactSignature::parse(signature)
        .map_err(|e| JsValue::from_str(&format!("Invalid signature: {}", e)))?;

    sigaddr_core::verify_message(address, message, &sig, net.params())
        .map_err(|e| JsValue::from_str(&format!("{}", e)))
}
