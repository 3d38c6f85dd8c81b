//! Signature-hash computation
//!
//! BIP143-style preimage with a mandatory FORKID flag, as deployed on
//! Radiant. The three sub-hashes (prevouts, sequences, outputs) are
//! computed once per transaction and reused for every input.
//!
//! Reference: https://github.com/bitcoin/bips/blob/master/bip-0143.mediawiki

use crate::crypto::hash256;
use crate::error::{Result, ScriptError};
use crate::script::Script;
use crate::serialization::write_varint;
use crate::types::{Hash, Transaction};

/// SIGHASH_ALL base selector
pub const SIGHASH_ALL: u32 = 0x01;
/// SIGHASH_NONE base selector
pub const SIGHASH_NONE: u32 = 0x02;
/// SIGHASH_SINGLE base selector
pub const SIGHASH_SINGLE: u32 = 0x03;
/// FORKID flag; mandatory for Radiant signatures
pub const SIGHASH_FORKID: u32 = 0x40;
/// ANYONECANPAY flag
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Default sighash type used on this network
pub const SIGHASH_DEFAULT: u32 = SIGHASH_ALL | SIGHASH_FORKID;

/// Wraps a raw sighash type, preserving its exact value for preimage
/// serialization. Behavior derives from `base_type()` and the two flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SighashType(pub u32);

impl SighashType {
    pub fn from_byte(byte: u8) -> Self {
        SighashType(byte as u32)
    }

    /// Base selector (low 5 bits).
    pub fn base_type(&self) -> u32 {
        self.0 & 0x1f
    }

    pub fn has_fork_id(&self) -> bool {
        self.0 & SIGHASH_FORKID != 0
    }

    pub fn has_anyone_can_pay(&self) -> bool {
        self.0 & SIGHASH_ANYONECANPAY != 0
    }

    pub fn is_single(&self) -> bool {
        self.base_type() == SIGHASH_SINGLE
    }

    pub fn is_none(&self) -> bool {
        self.base_type() == SIGHASH_NONE
    }

    /// Raw value as serialized into the preimage tail.
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Sub-hashes computed once per transaction and shared across inputs.
#[derive(Debug, Clone)]
pub struct PrecomputedSighashParts {
    /// Double-SHA256 over all (txid || index_le) pairs
    pub hash_prevouts: Hash,
    /// Double-SHA256 over all sequence numbers
    pub hash_sequence: Hash,
    /// Double-SHA256 over all serialized outputs
    pub hash_outputs: Hash,
}

impl PrecomputedSighashParts {
    pub fn compute(tx: &Transaction) -> Self {
        let mut prevouts = Vec::with_capacity(tx.inputs.len() * 36);
        for input in &tx.inputs {
            prevouts.extend_from_slice(&input.prevout.txid);
            prevouts.extend_from_slice(&input.prevout.index.to_le_bytes());
        }

        let mut sequences = Vec::with_capacity(tx.inputs.len() * 4);
        for input in &tx.inputs {
            sequences.extend_from_slice(&input.sequence.to_le_bytes());
        }

        let mut outputs = Vec::with_capacity(tx.outputs.len() * 34);
        for output in &tx.outputs {
            outputs.extend_from_slice(&output.value.to_le_bytes());
            write_varint(&mut outputs, output.script_pubkey.len() as u64);
            outputs.extend_from_slice(output.script_pubkey.as_bytes());
        }

        PrecomputedSighashParts {
            hash_prevouts: hash256(&prevouts),
            hash_sequence: hash256(&sequences),
            hash_outputs: hash256(&outputs),
        }
    }
}

/// Assemble the byte-exact sighash preimage for one input.
///
/// Layout: version | hashPrevouts | hashSequence | outpoint | scriptCode
/// (length-prefixed) | amount | sequence | hashOutputs | locktime |
/// hashType. Any deviation fails signature checks, so this function is the
/// single source of truth for the wire layout.
pub fn sighash_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    amount: i64,
    hash_type: SighashType,
    precomputed: Option<&PrecomputedSighashParts>,
) -> Result<Vec<u8>> {
    if input_index >= tx.inputs.len() {
        return Err(ScriptError::InvalidTxInputIndex);
    }

    let anyone_can_pay = hash_type.has_anyone_can_pay();
    let single = hash_type.is_single();
    let none = hash_type.is_none();

    let computed;
    let parts = match precomputed {
        Some(p) => p,
        None => {
            computed = PrecomputedSighashParts::compute(tx);
            &computed
        }
    };

    let mut preimage = Vec::with_capacity(160 + script_code.len());

    // 1. nVersion
    preimage.extend_from_slice(&tx.version.to_le_bytes());

    // 2. hashPrevouts
    if anyone_can_pay {
        preimage.extend_from_slice(&[0u8; 32]);
    } else {
        preimage.extend_from_slice(&parts.hash_prevouts);
    }

    // 3. hashSequence
    if anyone_can_pay || single || none {
        preimage.extend_from_slice(&[0u8; 32]);
    } else {
        preimage.extend_from_slice(&parts.hash_sequence);
    }

    // 4. outpoint
    let input = &tx.inputs[input_index];
    preimage.extend_from_slice(&input.prevout.txid);
    preimage.extend_from_slice(&input.prevout.index.to_le_bytes());

    // 5. scriptCode
    write_varint(&mut preimage, script_code.len() as u64);
    preimage.extend_from_slice(script_code.as_bytes());

    // 6. amount
    preimage.extend_from_slice(&amount.to_le_bytes());

    // 7. nSequence
    preimage.extend_from_slice(&input.sequence.to_le_bytes());

    // 8. hashOutputs
    if single {
        if input_index < tx.outputs.len() {
            let output = &tx.outputs[input_index];
            let mut data = Vec::with_capacity(34);
            data.extend_from_slice(&output.value.to_le_bytes());
            write_varint(&mut data, output.script_pubkey.len() as u64);
            data.extend_from_slice(output.script_pubkey.as_bytes());
            preimage.extend_from_slice(&hash256(&data));
        } else {
            preimage.extend_from_slice(&[0u8; 32]);
        }
    } else if none {
        preimage.extend_from_slice(&[0u8; 32]);
    } else {
        preimage.extend_from_slice(&parts.hash_outputs);
    }

    // 9. nLockTime
    preimage.extend_from_slice(&tx.lock_time.to_le_bytes());

    // 10. nHashType with the fork value mixed into the upper bits.
    // Radiant's fork value is 0, so the raw type serializes unchanged.
    let fork_value: u32 = 0;
    preimage.extend_from_slice(&(hash_type.raw() | (fork_value << 8)).to_le_bytes());

    Ok(preimage)
}

/// The 32-byte signature hash: double-SHA256 of the preimage.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    amount: i64,
    hash_type: SighashType,
    precomputed: Option<&PrecomputedSighashParts>,
) -> Result<Hash> {
    let preimage = sighash_preimage(tx, input_index, script_code, amount, hash_type, precomputed)?;
    Ok(hash256(&preimage))
}

/// Compute sighashes for every input, sharing the precomputed parts.
pub fn all_input_sighashes(
    tx: &Transaction,
    script_codes: &[&Script],
    amounts: &[i64],
    hash_type: SighashType,
) -> Result<Vec<Hash>> {
    if script_codes.len() != tx.inputs.len() || amounts.len() != tx.inputs.len() {
        return Err(ScriptError::InvalidTxInputIndex);
    }
    let parts = PrecomputedSighashParts::compute(tx);
    let mut result = Vec::with_capacity(tx.inputs.len());
    for (i, (code, &amount)) in script_codes.iter().zip(amounts.iter()).enumerate() {
        result.push(signature_hash(tx, i, code, amount, hash_type, Some(&parts))?);
    }
    Ok(result)
}
