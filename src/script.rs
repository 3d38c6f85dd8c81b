//! Script buffer
//!
//! An immutable ordered byte sequence with an opcode/push-data reader and
//! structural predicates. The reader returns push data exactly as encoded;
//! minimality enforcement belongs to the interpreter.

use crate::constants::{MAX_SCRIPT_ELEMENT_SIZE, REF_SIZE};
use crate::error::{Result, ScriptError};
use crate::opcodes::*;
use serde::{Deserialize, Serialize};

/// Sentinel for "no state separator present".
pub const NO_STATE_SEPARATOR: u32 = 0xffff_ffff;

/// Immutable script byte buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Script(Vec<u8>);

/// One decoded operation: the opcode byte and its inline push data, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOp {
    pub opcode: u8,
    pub data: Option<Vec<u8>>,
    /// Byte offset of the first byte after this operation.
    pub next: usize,
}

impl Script {
    pub fn new() -> Self {
        Script(Vec::new())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode the operation at byte offset `cursor`.
    ///
    /// Returns `Ok(None)` at end of script. Truncated push data or a
    /// reference opcode without its full 36-byte payload is `BadOpcode` /
    /// `InvalidReference` respectively; an oversized push is `PushSize`.
    pub fn get_op(&self, cursor: usize) -> Result<Option<ScriptOp>> {
        let bytes = &self.0;
        if cursor >= bytes.len() {
            return Ok(None);
        }

        let opcode = bytes[cursor];
        let mut pos = cursor + 1;

        // Inline push data (OP_0 carries none; 0x01-0x4e carry a payload).
        if opcode <= OP_PUSHDATA4 {
            let len = match opcode {
                OP_0 => 0usize,
                l @ 0x01..=0x4b => l as usize,
                OP_PUSHDATA1 => {
                    if pos >= bytes.len() {
                        return Err(ScriptError::BadOpcode);
                    }
                    let l = bytes[pos] as usize;
                    pos += 1;
                    l
                }
                OP_PUSHDATA2 => {
                    if pos + 2 > bytes.len() {
                        return Err(ScriptError::BadOpcode);
                    }
                    let l = u16::from_le_bytes([bytes[pos], bytes[pos + 1]]) as usize;
                    pos += 2;
                    l
                }
                _ => {
                    // OP_PUSHDATA4
                    if pos + 4 > bytes.len() {
                        return Err(ScriptError::BadOpcode);
                    }
                    let l = u32::from_le_bytes([
                        bytes[pos],
                        bytes[pos + 1],
                        bytes[pos + 2],
                        bytes[pos + 3],
                    ]) as usize;
                    pos += 4;
                    l
                }
            };

            if len > MAX_SCRIPT_ELEMENT_SIZE {
                return Err(ScriptError::PushSize);
            }
            if pos + len > bytes.len() {
                return Err(ScriptError::BadOpcode);
            }
            let data = bytes[pos..pos + len].to_vec();
            return Ok(Some(ScriptOp {
                opcode,
                data: Some(data),
                next: pos + len,
            }));
        }

        // Reference opcodes carry their 36-byte payload inline.
        if takes_reference_payload(opcode) {
            if pos + REF_SIZE > bytes.len() {
                return Err(ScriptError::InvalidReference);
            }
            let data = bytes[pos..pos + REF_SIZE].to_vec();
            return Ok(Some(ScriptOp {
                opcode,
                data: Some(data),
                next: pos + REF_SIZE,
            }));
        }

        Ok(Some(ScriptOp {
            opcode,
            data: None,
            next: pos,
        }))
    }

    /// Iterate all operations; stops silently on a malformed tail.
    pub fn ops(&self) -> ScriptOps<'_> {
        ScriptOps {
            script: self,
            cursor: 0,
        }
    }

    // ------------------------------------------------------------------
    // Structural predicates
    // ------------------------------------------------------------------

    /// P2PKH template: DUP HASH160 <20 bytes> EQUALVERIFY CHECKSIG.
    pub fn is_p2pkh(&self) -> bool {
        let b = &self.0;
        b.len() == 25
            && b[0] == OP_DUP
            && b[1] == OP_HASH160
            && b[2] == 0x14
            && b[23] == OP_EQUALVERIFY
            && b[24] == OP_CHECKSIG
    }

    /// P2SH template: HASH160 <20 bytes> EQUAL.
    pub fn is_p2sh(&self) -> bool {
        let b = &self.0;
        b.len() == 23 && b[0] == OP_HASH160 && b[1] == 0x14 && b[22] == OP_EQUAL
    }

    /// Provably unspendable: begins with OP_RETURN.
    pub fn is_unspendable(&self) -> bool {
        !self.0.is_empty() && self.0[0] == OP_RETURN
    }

    /// True if every operation is a push (data push or small integer).
    pub fn is_push_only(&self) -> bool {
        let mut cursor = 0;
        loop {
            match self.get_op(cursor) {
                Ok(Some(op)) => {
                    if !is_push_opcode(op.opcode) {
                        return false;
                    }
                    cursor = op.next;
                }
                Ok(None) => return true,
                Err(_) => return false,
            }
        }
    }

    /// Byte offset of the first OP_STATESEPARATOR, scanning structurally
    /// so separator bytes inside push data do not count.
    pub fn state_separator_index(&self) -> Option<usize> {
        let mut cursor = 0;
        while let Ok(Some(op)) = self.get_op(cursor) {
            if op.opcode == OP_STATESEPARATOR {
                return Some(cursor);
            }
            cursor = op.next;
        }
        None
    }

    pub fn has_state_separator(&self) -> bool {
        self.state_separator_index().is_some()
    }

    /// The bytes before the first state separator (empty if none).
    pub fn state_script(&self) -> Script {
        match self.state_separator_index() {
            Some(idx) => Script(self.0[..idx].to_vec()),
            None => Script::new(),
        }
    }

    /// The bytes after the first state separator (the whole script if none).
    pub fn code_script(&self) -> Script {
        match self.state_separator_index() {
            Some(idx) => Script(self.0[idx + 1..].to_vec()),
            None => self.clone(),
        }
    }

    /// The suffix starting at byte offset `offset` (for OP_CODESEPARATOR).
    pub fn suffix_from(&self, offset: usize) -> Script {
        Script(self.0[offset.min(self.0.len())..].to_vec())
    }

    /// Remove every occurrence of `needle` serialized as a push, matching
    /// whole operations only. Used to strip signatures from the script code
    /// before sighash computation.
    pub fn find_and_delete(&self, needle: &[u8]) -> Script {
        if needle.is_empty() {
            return self.clone();
        }
        let mut out = Vec::with_capacity(self.0.len());
        let mut cursor = 0;
        loop {
            match self.get_op(cursor) {
                Ok(Some(op)) => {
                    let is_match = op
                        .data
                        .as_deref()
                        .map(|d| d == needle && is_push_data_opcode(op.opcode))
                        .unwrap_or(false);
                    if !is_match {
                        out.extend_from_slice(&self.0[cursor..op.next]);
                    }
                    cursor = op.next;
                }
                _ => break,
            }
        }
        // Preserve any malformed tail verbatim.
        out.extend_from_slice(&self.0[cursor..]);
        Script(out)
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    /// Append a bare opcode byte.
    pub fn push_opcode(mut self, opcode: u8) -> Self {
        self.0.push(opcode);
        self
    }

    /// Append `data` with the most compact push prefix.
    pub fn push_data(mut self, data: &[u8]) -> Self {
        match data.len() {
            0 => self.0.push(OP_0),
            l if l <= 0x4b => {
                self.0.push(l as u8);
                self.0.extend_from_slice(data);
            }
            l if l <= 0xff => {
                self.0.push(OP_PUSHDATA1);
                self.0.push(l as u8);
                self.0.extend_from_slice(data);
            }
            l if l <= 0xffff => {
                self.0.push(OP_PUSHDATA2);
                self.0.extend_from_slice(&(l as u16).to_le_bytes());
                self.0.extend_from_slice(data);
            }
            l => {
                self.0.push(OP_PUSHDATA4);
                self.0.extend_from_slice(&(l as u32).to_le_bytes());
                self.0.extend_from_slice(data);
            }
        }
        self
    }

    /// Append an integer using the smallest encoding (small-integer opcode
    /// where possible, else a minimal script-number push).
    pub fn push_int(self, n: i64) -> Self {
        match n {
            0 => self.push_opcode(OP_0),
            -1 => self.push_opcode(OP_1NEGATE),
            1..=16 => self.push_opcode(OP_1 + (n as u8) - 1),
            _ => {
                let encoded = crate::scriptnum::encode(n);
                self.push_data(&encoded)
            }
        }
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn from_hex(s: &str) -> std::result::Result<Self, hex::FromHexError> {
        Ok(Script(hex::decode(s)?))
    }

    /// Render as space-separated opcode names with hex-encoded pushes.
    pub fn to_asm(&self) -> String {
        let mut parts = Vec::new();
        let mut cursor = 0;
        loop {
            match self.get_op(cursor) {
                Ok(Some(op)) => {
                    match &op.data {
                        Some(d) if op.opcode != OP_0 && is_push_data_opcode(op.opcode) => {
                            parts.push(hex::encode(d));
                        }
                        Some(d) if takes_reference_payload(op.opcode) => {
                            parts.push(format!("{} {}", name(op.opcode), hex::encode(d)));
                        }
                        _ => parts.push(name(op.opcode).to_string()),
                    }
                    cursor = op.next;
                }
                Ok(None) => break,
                Err(_) => {
                    parts.push("[error]".to_string());
                    break;
                }
            }
        }
        parts.join(" ")
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl From<&[u8]> for Script {
    fn from(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Iterator over a script's operations.
pub struct ScriptOps<'a> {
    script: &'a Script,
    cursor: usize,
}

impl Iterator for ScriptOps<'_> {
    type Item = ScriptOp;

    fn next(&mut self) -> Option<ScriptOp> {
        match self.script.get_op(self.cursor) {
            Ok(Some(op)) => {
                self.cursor = op.next;
                Some(op)
            }
            _ => None,
        }
    }
}

/// True if `data` was pushed with the most compact possible encoding
/// (BIP62 rules, applied by the interpreter under MINIMALDATA).
pub fn is_minimal_push(opcode: u8, data: &[u8]) -> bool {
    match data.len() {
        0 => opcode == OP_0,
        1 => {
            let b = data[0];
            if (1..=16).contains(&b) {
                return false; // should have used OP_1..OP_16
            }
            if b == 0x81 {
                return false; // should have used OP_1NEGATE
            }
            opcode == 0x01
        }
        l if l <= 0x4b => opcode as usize == l,
        l if l <= 0xff => opcode == OP_PUSHDATA1,
        l if l <= 0xffff => opcode == OP_PUSHDATA2,
        _ => opcode == OP_PUSHDATA4,
    }
}
