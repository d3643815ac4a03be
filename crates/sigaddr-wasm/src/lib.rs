//! WebAssembly bindings for signed-message address derivation.
//!
//! This crate provides JavaScript-accessible APIs for:
//! - Recovering a message signer's addresses on mainnet or testnet
//! - Verifying a signed message against an address

use wasm_bindgen::prelude::*;

pub mod report;
pub mod verifier;

// Re-export main types for JS access
pub use report::{AddressSet, DerivationReport};
pub use verifier::{derive_addresses, verify_message};

/// Initialize the WASM module with better panic messages.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Log to the browser console.
#[wasm_bindgen]
pub fn console_log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}
