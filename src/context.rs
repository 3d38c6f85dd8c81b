//! Execution context for introspection and reference tracking
//!
//! Immutable after construction from `(tx, input_coins, input_index)`. Every
//! input UTXO script and every output script is walked once, extracting the
//! reference sets by kind, the first state-separator offset and the
//! code-script hash, so each introspection opcode is a pure cached read.

use crate::crypto::hash256;
use crate::error::{Result, ScriptError};
use crate::opcodes::*;
use crate::script::Script;
use crate::types::{Coin, Hash, Ref, Transaction};
use std::collections::HashSet;

/// Per-script summary of references and state-separator structure.
#[derive(Debug, Clone, Default)]
pub struct ScriptSummary {
    /// Value of the enclosing UTXO/output, for aggregation queries
    pub value: i64,
    pub push_refs: HashSet<Ref>,
    pub require_refs: HashSet<Ref>,
    pub disallow_sibling_refs: HashSet<Ref>,
    pub singleton_refs: HashSet<Ref>,
    /// Byte offset of the first OP_STATESEPARATOR, `None` if absent
    pub state_separator_index: Option<usize>,
    /// Double-SHA256 of the code-script view
    pub code_script_hash: Hash,
}

impl ScriptSummary {
    /// Walk a script once and classify its reference payloads. Reference
    /// sets derive solely from the script bytes; execution order never
    /// adds to them.
    pub fn compute(script: &Script, value: i64) -> Self {
        let mut summary = ScriptSummary {
            value,
            ..Default::default()
        };

        let mut cursor = 0;
        while let Ok(Some(op)) = script.get_op(cursor) {
            match op.opcode {
                OP_PUSHINPUTREF => {
                    if let Some(data) = &op.data {
                        summary.push_refs.insert(data.clone());
                    }
                }
                OP_REQUIREINPUTREF => {
                    if let Some(data) = &op.data {
                        summary.require_refs.insert(data.clone());
                    }
                }
                OP_DISALLOWPUSHINPUTREFSIBLING => {
                    if let Some(data) = &op.data {
                        summary.disallow_sibling_refs.insert(data.clone());
                    }
                }
                OP_PUSHINPUTREFSINGLETON => {
                    if let Some(data) = &op.data {
                        summary.singleton_refs.insert(data.clone());
                    }
                }
                OP_STATESEPARATOR => {
                    if summary.state_separator_index.is_none() {
                        summary.state_separator_index = Some(cursor);
                    }
                }
                _ => {}
            }
            cursor = op.next;
        }

        summary.code_script_hash = hash256(code_script_view(script, summary.state_separator_index).as_bytes());
        summary
    }

    /// All references declared by this script, regardless of kind.
    pub fn all_refs(&self) -> impl Iterator<Item = &Ref> {
        self.push_refs
            .iter()
            .chain(self.singleton_refs.iter())
    }
}

fn code_script_view(script: &Script, sep: Option<usize>) -> Script {
    match sep {
        Some(idx) => script.suffix_from(idx + 1),
        None => script.clone(),
    }
}

fn state_script_view(script: &Script, sep: Option<usize>) -> Script {
    match sep {
        Some(idx) => Script::from_bytes(script.as_bytes()[..idx].to_vec()),
        None => Script::new(),
    }
}

/// Precomputed per-transaction context backing the introspection,
/// state-separator, reference and aggregation opcodes.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    tx: Transaction,
    input_coins: Vec<Coin>,
    input_index: usize,
    input_summaries: Vec<ScriptSummary>,
    output_summaries: Vec<ScriptSummary>,
    /// Union of carried references over all input UTXO scripts
    input_refs: HashSet<Ref>,
    /// Union of carried references over all output scripts
    output_refs: HashSet<Ref>,
}

impl ExecutionContext {
    pub fn new(tx: Transaction, input_coins: Vec<Coin>, input_index: usize) -> Self {
        let input_summaries: Vec<ScriptSummary> = input_coins
            .iter()
            .map(|coin| ScriptSummary::compute(&coin.script_pubkey, coin.value))
            .collect();
        let output_summaries: Vec<ScriptSummary> = tx
            .outputs
            .iter()
            .map(|out| ScriptSummary::compute(&out.script_pubkey, out.value))
            .collect();

        let mut input_refs = HashSet::new();
        for summary in &input_summaries {
            for r in summary.all_refs() {
                input_refs.insert(r.clone());
            }
        }
        let mut output_refs = HashSet::new();
        for summary in &output_summaries {
            for r in summary.all_refs() {
                output_refs.insert(r.clone());
            }
        }

        ExecutionContext {
            tx,
            input_coins,
            input_index,
            input_summaries,
            output_summaries,
            input_refs,
            output_refs,
        }
    }

    /// Context for exercising scripts without a real spending transaction.
    pub fn minimal() -> Self {
        ExecutionContext::new(Transaction::default(), Vec::new(), 0)
    }

    // ------------------------------------------------------------------
    // Transaction-level queries
    // ------------------------------------------------------------------

    pub fn tx(&self) -> &Transaction {
        &self.tx
    }

    pub fn input_index(&self) -> usize {
        self.input_index
    }

    pub fn tx_version(&self) -> i32 {
        self.tx.version
    }

    pub fn tx_locktime(&self) -> u32 {
        self.tx.lock_time
    }

    pub fn tx_input_count(&self) -> usize {
        self.tx.inputs.len()
    }

    pub fn tx_output_count(&self) -> usize {
        self.tx.outputs.len()
    }

    fn coin(&self, index: usize) -> Result<&Coin> {
        self.input_coins
            .get(index)
            .ok_or(ScriptError::InvalidTxInputIndex)
    }

    fn input_summary(&self, index: usize) -> Result<&ScriptSummary> {
        self.input_summaries
            .get(index)
            .ok_or(ScriptError::InvalidTxInputIndex)
    }

    fn output_summary(&self, index: usize) -> Result<&ScriptSummary> {
        self.output_summaries
            .get(index)
            .ok_or(ScriptError::InvalidTxOutputIndex)
    }

    // ------------------------------------------------------------------
    // Per-input queries
    // ------------------------------------------------------------------

    pub fn utxo_value(&self, index: usize) -> Result<i64> {
        Ok(self.coin(index)?.value)
    }

    pub fn utxo_bytecode(&self, index: usize) -> Result<&Script> {
        Ok(&self.coin(index)?.script_pubkey)
    }

    pub fn outpoint_txid(&self, index: usize) -> Result<Hash> {
        self.tx
            .inputs
            .get(index)
            .map(|i| i.prevout.txid)
            .ok_or(ScriptError::InvalidTxInputIndex)
    }

    pub fn outpoint_index(&self, index: usize) -> Result<u32> {
        self.tx
            .inputs
            .get(index)
            .map(|i| i.prevout.index)
            .ok_or(ScriptError::InvalidTxInputIndex)
    }

    pub fn input_bytecode(&self, index: usize) -> Result<&Script> {
        self.tx
            .inputs
            .get(index)
            .map(|i| &i.script_sig)
            .ok_or(ScriptError::InvalidTxInputIndex)
    }

    pub fn input_sequence(&self, index: usize) -> Result<u32> {
        self.tx
            .inputs
            .get(index)
            .map(|i| i.sequence)
            .ok_or(ScriptError::InvalidTxInputIndex)
    }

    // ------------------------------------------------------------------
    // Per-output queries
    // ------------------------------------------------------------------

    pub fn output_value(&self, index: usize) -> Result<i64> {
        self.tx
            .outputs
            .get(index)
            .map(|o| o.value)
            .ok_or(ScriptError::InvalidTxOutputIndex)
    }

    pub fn output_bytecode(&self, index: usize) -> Result<&Script> {
        self.tx
            .outputs
            .get(index)
            .map(|o| &o.script_pubkey)
            .ok_or(ScriptError::InvalidTxOutputIndex)
    }

    // ------------------------------------------------------------------
    // State-separator queries
    // ------------------------------------------------------------------

    /// Separator byte index of an input's UTXO script, or the absent
    /// sentinel 0xffffffff.
    pub fn state_separator_index_utxo(&self, index: usize) -> Result<u32> {
        Ok(self
            .input_summary(index)?
            .state_separator_index
            .map(|i| i as u32)
            .unwrap_or(crate::script::NO_STATE_SEPARATOR))
    }

    pub fn state_separator_index_output(&self, index: usize) -> Result<u32> {
        Ok(self
            .output_summary(index)?
            .state_separator_index
            .map(|i| i as u32)
            .unwrap_or(crate::script::NO_STATE_SEPARATOR))
    }

    pub fn code_script_utxo(&self, index: usize) -> Result<Script> {
        let summary = self.input_summary(index)?;
        Ok(code_script_view(
            &self.coin(index)?.script_pubkey,
            summary.state_separator_index,
        ))
    }

    pub fn code_script_output(&self, index: usize) -> Result<Script> {
        let summary = self.output_summary(index)?;
        let script = self
            .tx
            .outputs
            .get(index)
            .map(|o| &o.script_pubkey)
            .ok_or(ScriptError::InvalidTxOutputIndex)?;
        Ok(code_script_view(script, summary.state_separator_index))
    }

    pub fn state_script_utxo(&self, index: usize) -> Result<Script> {
        let summary = self.input_summary(index)?;
        Ok(state_script_view(
            &self.coin(index)?.script_pubkey,
            summary.state_separator_index,
        ))
    }

    pub fn state_script_output(&self, index: usize) -> Result<Script> {
        let summary = self.output_summary(index)?;
        let script = self
            .tx
            .outputs
            .get(index)
            .map(|o| &o.script_pubkey)
            .ok_or(ScriptError::InvalidTxOutputIndex)?;
        Ok(state_script_view(script, summary.state_separator_index))
    }

    // ------------------------------------------------------------------
    // Reference queries
    // ------------------------------------------------------------------

    pub fn input_refs(&self) -> &HashSet<Ref> {
        &self.input_refs
    }

    pub fn output_refs(&self) -> &HashSet<Ref> {
        &self.output_refs
    }

    pub fn input_summaries(&self) -> &[ScriptSummary] {
        &self.input_summaries
    }

    pub fn output_summaries(&self) -> &[ScriptSummary] {
        &self.output_summaries
    }

    /// Number of input UTXO scripts carrying `r`.
    pub fn ref_input_carrier_count(&self, r: &[u8]) -> u32 {
        self.input_summaries
            .iter()
            .filter(|s| s.push_refs.contains(r) || s.singleton_refs.contains(r))
            .count() as u32
    }

    /// Number of output scripts carrying `r`.
    pub fn ref_output_carrier_count(&self, r: &[u8]) -> u32 {
        self.output_summaries
            .iter()
            .filter(|s| s.push_refs.contains(r) || s.singleton_refs.contains(r))
            .count() as u32
    }

    // ------------------------------------------------------------------
    // Aggregation queries
    // ------------------------------------------------------------------

    pub fn ref_value_sum_utxos(&self, r: &[u8]) -> i64 {
        self.input_summaries
            .iter()
            .filter(|s| s.push_refs.contains(r) || s.singleton_refs.contains(r))
            .map(|s| s.value)
            .sum()
    }

    pub fn ref_value_sum_outputs(&self, r: &[u8]) -> i64 {
        self.output_summaries
            .iter()
            .filter(|s| s.push_refs.contains(r) || s.singleton_refs.contains(r))
            .map(|s| s.value)
            .sum()
    }

    pub fn ref_output_count_utxos(&self, r: &[u8]) -> u32 {
        self.ref_input_carrier_count(r)
    }

    pub fn ref_output_count_outputs(&self, r: &[u8]) -> u32 {
        self.ref_output_carrier_count(r)
    }

    pub fn ref_output_count_zero_valued_utxos(&self, r: &[u8]) -> u32 {
        self.input_summaries
            .iter()
            .filter(|s| s.value == 0 && (s.push_refs.contains(r) || s.singleton_refs.contains(r)))
            .count() as u32
    }

    pub fn ref_output_count_zero_valued_outputs(&self, r: &[u8]) -> u32 {
        self.output_summaries
            .iter()
            .filter(|s| s.value == 0 && (s.push_refs.contains(r) || s.singleton_refs.contains(r)))
            .count() as u32
    }

    // ------------------------------------------------------------------
    // Code-script-hash aggregation
    // ------------------------------------------------------------------

    pub fn code_script_hash_value_sum_utxos(&self, csh: &[u8]) -> i64 {
        self.input_summaries
            .iter()
            .filter(|s| s.code_script_hash[..] == *csh)
            .map(|s| s.value)
            .sum()
    }

    pub fn code_script_hash_value_sum_outputs(&self, csh: &[u8]) -> i64 {
        self.output_summaries
            .iter()
            .filter(|s| s.code_script_hash[..] == *csh)
            .map(|s| s.value)
            .sum()
    }

    pub fn code_script_hash_output_count_utxos(&self, csh: &[u8]) -> u32 {
        self.input_summaries
            .iter()
            .filter(|s| s.code_script_hash[..] == *csh)
            .count() as u32
    }

    pub fn code_script_hash_output_count_outputs(&self, csh: &[u8]) -> u32 {
        self.output_summaries
            .iter()
            .filter(|s| s.code_script_hash[..] == *csh)
            .count() as u32
    }

    pub fn code_script_hash_zero_valued_count_utxos(&self, csh: &[u8]) -> u32 {
        self.input_summaries
            .iter()
            .filter(|s| s.value == 0 && s.code_script_hash[..] == *csh)
            .count() as u32
    }

    pub fn code_script_hash_zero_valued_count_outputs(&self, csh: &[u8]) -> u32 {
        self.output_summaries
            .iter()
            .filter(|s| s.value == 0 && s.code_script_hash[..] == *csh)
            .count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OutPoint, TxBuilder};

    fn ref_bytes(tag: u8) -> Vec<u8> {
        let mut r = vec![tag; 32];
        r.extend_from_slice(&[0, 0, 0, 0]);
        r
    }

    fn script_with_push_ref(r: &[u8]) -> Script {
        let mut bytes = vec![OP_PUSHINPUTREF];
        bytes.extend_from_slice(r);
        bytes.push(OP_DROP);
        Script::from_bytes(bytes)
    }

    fn context_with_one_ref(r: &[u8], value: i64) -> ExecutionContext {
        let tx = TxBuilder::new()
            .input(OutPoint::new([9; 32], 0), Script::new(), 0xffff_ffff)
            .output(value, script_with_push_ref(r))
            .build();
        let coins = vec![Coin::new(value, script_with_push_ref(r))];
        ExecutionContext::new(tx, coins, 0)
    }

    #[test]
    fn test_summary_extracts_refs() {
        let r = ref_bytes(0xaa);
        let summary = ScriptSummary::compute(&script_with_push_ref(&r), 500);
        assert!(summary.push_refs.contains(&r));
        assert_eq!(summary.value, 500);
        assert!(summary.state_separator_index.is_none());
    }

    #[test]
    fn test_summary_singleton_and_require() {
        let r = ref_bytes(0xbb);
        let mut bytes = vec![OP_PUSHINPUTREFSINGLETON];
        bytes.extend_from_slice(&r);
        bytes.push(OP_REQUIREINPUTREF);
        bytes.extend_from_slice(&ref_bytes(0xcc));
        let summary = ScriptSummary::compute(&Script::from_bytes(bytes), 0);
        assert!(summary.singleton_refs.contains(&r));
        assert!(summary.require_refs.contains(&ref_bytes(0xcc)));
        assert!(summary.push_refs.is_empty());
    }

    #[test]
    fn test_summary_state_separator() {
        let mut bytes = vec![OP_1, OP_STATESEPARATOR, OP_DUP];
        let summary = ScriptSummary::compute(&Script::from_bytes(bytes.clone()), 0);
        assert_eq!(summary.state_separator_index, Some(1));

        // Only the first separator counts.
        bytes.push(OP_STATESEPARATOR);
        let summary2 = ScriptSummary::compute(&Script::from_bytes(bytes), 0);
        assert_eq!(summary2.state_separator_index, Some(1));
    }

    #[test]
    fn test_input_refs_union() {
        let r = ref_bytes(0xaa);
        let ctx = context_with_one_ref(&r, 1000);
        assert!(ctx.input_refs().contains(&r));
        assert!(ctx.output_refs().contains(&r));
    }

    #[test]
    fn test_value_sums_and_counts() {
        let r = ref_bytes(0xdd);
        let other = ref_bytes(0xee);
        let tx = TxBuilder::new()
            .input(OutPoint::new([9; 32], 0), Script::new(), 0xffff_ffff)
            .input(OutPoint::new([9; 32], 1), Script::new(), 0xffff_ffff)
            .output(100, script_with_push_ref(&r))
            .output(250, script_with_push_ref(&r))
            .output(70, script_with_push_ref(&other))
            .build();
        let coins = vec![
            Coin::new(10, script_with_push_ref(&r)),
            Coin::new(20, Script::new()),
        ];
        let ctx = ExecutionContext::new(tx, coins, 0);

        assert_eq!(ctx.ref_value_sum_utxos(&r), 10);
        assert_eq!(ctx.ref_value_sum_outputs(&r), 350);
        assert_eq!(ctx.ref_output_count_utxos(&r), 1);
        assert_eq!(ctx.ref_output_count_outputs(&r), 2);
        assert_eq!(ctx.ref_output_count_outputs(&other), 1);
        assert_eq!(ctx.ref_value_sum_outputs(&ref_bytes(0x00)), 0);
    }

    #[test]
    fn test_zero_valued_counts() {
        let r = ref_bytes(0x11);
        let tx = TxBuilder::new()
            .input(OutPoint::new([9; 32], 0), Script::new(), 0xffff_ffff)
            .output(0, script_with_push_ref(&r))
            .output(5, script_with_push_ref(&r))
            .build();
        let ctx = ExecutionContext::new(tx, vec![Coin::default()], 0);
        assert_eq!(ctx.ref_output_count_zero_valued_outputs(&r), 1);
        assert_eq!(ctx.ref_output_count_outputs(&r), 2);
    }

    #[test]
    fn test_code_script_hash_aggregation() {
        // Two outputs share a code script but differ in their state script.
        let code = vec![OP_DUP, OP_HASH160, OP_DROP, OP_DROP, OP_1];
        let mut s1 = vec![0x01, 0xaa, OP_STATESEPARATOR];
        s1.extend_from_slice(&code);
        let mut s2 = vec![0x01, 0xbb, OP_STATESEPARATOR];
        s2.extend_from_slice(&code);

        let tx = TxBuilder::new()
            .input(OutPoint::new([9; 32], 0), Script::new(), 0xffff_ffff)
            .output(100, Script::from_bytes(s1))
            .output(50, Script::from_bytes(s2))
            .output(7, Script::from_bytes(vec![OP_RETURN]))
            .build();
        let ctx = ExecutionContext::new(tx, vec![Coin::default()], 0);

        let csh = hash256(&code);
        assert_eq!(ctx.code_script_hash_value_sum_outputs(&csh), 150);
        assert_eq!(ctx.code_script_hash_output_count_outputs(&csh), 2);
        assert_eq!(ctx.code_script_hash_output_count_utxos(&csh), 0);
    }

    #[test]
    fn test_out_of_range_indexes() {
        let ctx = ExecutionContext::minimal();
        assert_eq!(ctx.utxo_value(0), Err(ScriptError::InvalidTxInputIndex));
        assert_eq!(ctx.output_value(0), Err(ScriptError::InvalidTxOutputIndex));
        assert_eq!(
            ctx.state_separator_index_utxo(3),
            Err(ScriptError::InvalidTxInputIndex)
        );
    }

    #[test]
    fn test_state_script_slicing() {
        let bytes = vec![0x01, 0x99, OP_STATESEPARATOR, OP_DUP];
        let tx = TxBuilder::new()
            .input(OutPoint::new([9; 32], 0), Script::new(), 0xffff_ffff)
            .output(1, Script::from_bytes(bytes.clone()))
            .build();
        let ctx = ExecutionContext::new(tx, vec![Coin::default()], 0);
        assert_eq!(
            ctx.state_script_output(0).unwrap().as_bytes(),
            &bytes[..2]
        );
        assert_eq!(ctx.code_script_output(0).unwrap().as_bytes(), &[OP_DUP]);
        assert_eq!(ctx.state_separator_index_output(0).unwrap(), 2);
    }
}
