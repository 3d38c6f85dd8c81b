//! Debugger configuration and network presets
//!
//! Settings can be loaded from JSON config files, environment variables or
//! passed programmatically; none of them affect consensus semantics. The
//! per-network chain parameters feed external collaborators (address
//! rendering, remote UTXO endpoints) and are carried here for completeness.

use crate::constants::DEFAULT_HISTORY_DEPTH;
use crate::types::Network;
use serde::{Deserialize, Serialize};

/// Per-network chain parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    pub name: String,
    /// Base58 prefix for P2PKH addresses
    pub pubkey_prefix: u8,
    /// Base58 prefix for P2SH addresses
    pub script_prefix: u8,
    /// WIF private key prefix
    pub private_key_prefix: u8,
    /// P2P message start bytes
    pub magic: u32,
    pub default_port: u16,
    pub default_electrum_port: u16,
}

impl ChainParams {
    pub fn mainnet() -> Self {
        ChainParams {
            name: "mainnet".to_string(),
            pubkey_prefix: 0x00,
            script_prefix: 0x05,
            private_key_prefix: 0x80,
            magic: 0xe3e1_f3e8,
            default_port: 7332,
            default_electrum_port: 50012,
        }
    }

    pub fn testnet() -> Self {
        ChainParams {
            name: "testnet".to_string(),
            pubkey_prefix: 0x6f,
            script_prefix: 0xc4,
            private_key_prefix: 0xef,
            magic: 0xf4e5_f3f4,
            default_port: 17332,
            default_electrum_port: 50012,
        }
    }

    pub fn regtest() -> Self {
        ChainParams {
            name: "regtest".to_string(),
            pubkey_prefix: 0x6f,
            script_prefix: 0xc4,
            private_key_prefix: 0xef,
            magic: 0xda_b5bf_fa,
            default_port: 18444,
            default_electrum_port: 50012,
        }
    }

    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Mainnet => ChainParams::mainnet(),
            Network::Testnet => ChainParams::testnet(),
            Network::Regtest => ChainParams::regtest(),
        }
    }
}

fn default_history_depth() -> u32 {
    DEFAULT_HISTORY_DEPTH as u32
}

/// Debugger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Network preset (address prefixes, magic, default remote endpoint)
    #[serde(default)]
    pub network: Network,

    /// Execute discouraged/disabled opcodes as NOPs for exploration
    #[serde(default)]
    pub allow_disabled_opcodes: bool,

    /// Cap on the rewind buffer
    #[serde(default = "default_history_depth")]
    pub history_depth: u32,
}

impl Default for DebugConfig {
    fn default() -> Self {
        DebugConfig {
            network: Network::Mainnet,
            allow_disabled_opcodes: false,
            history_depth: default_history_depth(),
        }
    }
}

impl DebugConfig {
    pub fn chain_params(&self) -> ChainParams {
        ChainParams::for_network(self.network)
    }
}
