//! Bitcoin network parameter sets.

/// Version bytes and Bech32 prefix for one network.
///
/// Instances are plain values. Derivation takes them by reference, so a
/// caller can build its own set (regtest, signet) without touching the
/// built-in constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkParams {
    /// Short network name.
    pub name: &'static str,
    /// Version byte for P2PKH addresses.
    pub p2pkh_version: u8,
    /// Version byte for P2SH addresses.
    pub p2sh_version: u8,
    /// Bech32 human-readable part.
    pub bech32_hrp: &'static str,
}

impl NetworkParams {
    pub const fn new(
        name: &'static str,
        p2pkh_version: u8,
        p2sh_version: u8,
        bech32_hrp: &'static str,
    ) -> Self {
        NetworkParams {
            name,
            p2pkh_version,
            p2sh_version,
            bech32_hrp,
        }
    }
}

/// Bitcoin mainnet.
pub const MAINNET: NetworkParams = NetworkParams::new("mainnet", 0x00, 0x05, "bc");

/// Bitcoin testnet3.
pub const TESTNET: NetworkParams = NetworkParams::new("testnet", 0x6f, 0xc4, "tb");

/// Bitcoin network selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    /// Bitcoin mainnet
    #[default]
    Mainnet,
    /// Bitcoin testnet3
    Testnet,
}

impl Network {
    /// All selectable networks, mainnet first.
    pub const ALL: [Network; 2] = [Network::Mainnet, Network::Testnet];

    /// Parameter set for this network.
    pub fn params(&self) -> &'static NetworkParams {
        match self {
            Network::Mainnet => &MAINNET,
            Network::Testnet => &TESTNET,
        }
    }

    /// Parse network from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Some(Network::Mainnet),
            "testnet" | "testnet3" | "test" => Some(Network::Testnet),
            _ => None,
        }
    }

    /// Get network name as string.
    pub fn name(&self) -> &'static str {
        self.params().name
    }
}

impl core::fmt::Display for Network {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params() {
        assert_eq!(Network::Mainnet.params().p2pkh_version, 0x00);
        assert_eq!(Network::Mainnet.params().p2sh_version, 0x05);
        assert_eq!(Network::Mainnet.params().bech32_hrp, "bc");

        assert_eq!(Network::Testnet.params().p2pkh_version, 0x6f);
        assert_eq!(Network::Testnet.params().p2sh_version, 0xc4);
        assert_eq!(Network::Testnet.params().bech32_hrp, "tb");
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!(Network::from_str("mainnet"), Some(Network::Mainnet));
        assert_eq!(Network::from_str("MAINNET"), Some(Network::Mainnet));
        assert_eq!(Network::from_str("testnet3"), Some(Network::Testnet));
        assert_eq!(Network::from_str("test"), Some(Network::Testnet));
        assert_eq!(Network::from_str("invalid"), None);
    }

    #[test]
    fn test_default_and_display() {
        assert_eq!(Network::default(), Network::Mainnet);
        assert_eq!(Network::Testnet.to_string(), "testnet");
    }

    #[test]
    fn test_custom_params() {
        let regtest = NetworkParams::new("regtest", 0x6f, 0xc4, "bcrt");
        assert_eq!(regtest.bech32_hrp, "bcrt");
        assert_ne!(regtest, TESTNET);
    }
}
