//! Core transaction types for script verification

use crate::constants::{REF_SIZE, SEQUENCE_FINAL};
use crate::crypto;
use crate::script::Script;
use serde::{Deserialize, Serialize};

/// 256-bit hash
pub type Hash = [u8; 32];

/// Byte string type (stack elements, raw script bytes)
pub type ByteString = Vec<u8>;

/// A 36-byte outpoint reference: 32-byte txid + 4-byte little-endian index.
pub type Ref = Vec<u8>;

/// Reference to a specific output of a prior transaction.
///
/// The txid is stored as-is (no display reversal).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: Hash,
    pub index: u32,
}

impl OutPoint {
    pub fn new(txid: Hash, index: u32) -> Self {
        OutPoint { txid, index }
    }

    /// The null outpoint used by coinbase inputs.
    pub fn null() -> Self {
        OutPoint {
            txid: [0u8; 32],
            index: 0xffff_ffff,
        }
    }

    pub fn is_null(&self) -> bool {
        self.index == 0xffff_ffff
    }

    /// Serialize to the 36-byte reference form used by the reference opcodes.
    pub fn to_ref(&self) -> Ref {
        let mut r = Vec::with_capacity(REF_SIZE);
        r.extend_from_slice(&self.txid);
        r.extend_from_slice(&self.index.to_le_bytes());
        r
    }

    /// Parse a 36-byte reference back into an outpoint.
    pub fn from_ref(r: &[u8]) -> Option<Self> {
        if r.len() != REF_SIZE {
            return None;
        }
        let mut txid = [0u8; 32];
        txid.copy_from_slice(&r[..32]);
        let index = u32::from_le_bytes([r[32], r[33], r[34], r[35]]);
        Some(OutPoint { txid, index })
    }
}

/// Transaction input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    pub script_sig: Script,
    pub sequence: u32,
}

impl TransactionInput {
    pub fn is_final(&self) -> bool {
        self.sequence == SEQUENCE_FINAL
    }
}

/// Transaction output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    /// Value in photons
    pub value: i64,
    pub script_pubkey: Script,
}

/// Radiant transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: i32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}

impl Default for Transaction {
    fn default() -> Self {
        Transaction {
            version: 2,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }
}

impl Transaction {
    pub fn is_null(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }

    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].prevout.is_null()
    }

    /// Total output value.
    pub fn value_out(&self) -> i64 {
        self.outputs.iter().map(|o| o.value).sum()
    }

    /// Transaction id: double SHA-256 of the wire serialization.
    pub fn txid(&self) -> Hash {
        crypto::hash256(&crate::serialization::serialize_tx(self))
    }
}

/// UTXO being spent by an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Value in photons
    pub value: i64,
    pub script_pubkey: Script,
    /// Block height (0 if unconfirmed)
    pub height: u32,
    pub is_coinbase: bool,
}

impl Default for Coin {
    fn default() -> Self {
        Coin {
            value: 0,
            script_pubkey: Script::new(),
            height: 0,
            is_coinbase: false,
        }
    }
}

impl Coin {
    pub fn new(value: i64, script_pubkey: Script) -> Self {
        Coin {
            value,
            script_pubkey,
            height: 0,
            is_coinbase: false,
        }
    }
}

/// Radiant network selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
}

impl Default for Network {
    fn default() -> Self {
        Network::Mainnet
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
            Network::Regtest => write!(f, "regtest"),
        }
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Network::Mainnet),
            "testnet" | "test" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            other => Err(format!("unknown network: {other}")),
        }
    }
}

/// Builder for assembling transactions in tests and tooling.
#[derive(Debug, Default)]
pub struct TxBuilder {
    tx: Transaction,
}

impl TxBuilder {
    pub fn new() -> Self {
        TxBuilder {
            tx: Transaction::default(),
        }
    }

    pub fn version(mut self, version: i32) -> Self {
        self.tx.version = version;
        self
    }

    pub fn lock_time(mut self, lock_time: u32) -> Self {
        self.tx.lock_time = lock_time;
        self
    }

    pub fn input(mut self, prevout: OutPoint, script_sig: Script, sequence: u32) -> Self {
        self.tx.inputs.push(TransactionInput {
            prevout,
            script_sig,
            sequence,
        });
        self
    }

    pub fn output(mut self, value: i64, script_pubkey: Script) -> Self {
        self.tx.outputs.push(TransactionOutput {
            value,
            script_pubkey,
        });
        self
    }

    pub fn build(self) -> Transaction {
        self.tx
    }
}
