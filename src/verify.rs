//! Two-phase script verification
//!
//! Runs the unlocking script, transfers the stack to the locking script,
//! applies the P2SH redeem-script and clean-stack post-checks governed by
//! flags, and reports a classified outcome per input.

use crate::constants::MAX_SCRIPT_SIZE;
use crate::context::ExecutionContext;
use crate::error::ScriptError;
use crate::flags::*;
use crate::interpreter::Interpreter;
use crate::script::Script;
use crate::scriptnum;
use crate::signature::SignatureChecker;
use crate::types::{ByteString, Coin, Transaction};

/// Result of verifying one input's script pair.
#[derive(Debug, Clone)]
pub struct VerifyOutcome {
    pub success: bool,
    pub error: ScriptError,
    /// Human-readable message derived from the error kind
    pub error_message: String,
    /// Executed non-push opcodes
    pub op_count: usize,
    /// Byte offset at termination, for the debugger display
    pub pc: usize,
    pub final_stack: Vec<ByteString>,
    pub final_altstack: Vec<ByteString>,
}

impl VerifyOutcome {
    fn failure(error: ScriptError) -> Self {
        VerifyOutcome {
            success: false,
            error,
            error_message: error.to_string(),
            op_count: 0,
            pc: 0,
            final_stack: Vec::new(),
            final_altstack: Vec::new(),
        }
    }

    fn from_interpreter(vm: &Interpreter) -> Self {
        let state = vm.state();
        VerifyOutcome {
            success: state.success,
            error: state.error,
            error_message: state.error.to_string(),
            op_count: state.op_count,
            pc: state.pc,
            final_stack: state.stack.clone(),
            final_altstack: state.altstack.clone(),
        }
    }

    pub fn stack_size(&self) -> usize {
        self.final_stack.len()
    }
}

/// Verify a single input's unlocking/locking script pair.
///
/// `context` feeds the introspection and reference opcodes; pass `None`
/// only for context-free script exploration (those opcodes then fail with
/// `IntrospectionContextUnavailable`).
#[allow(clippy::too_many_arguments)]
pub fn verify_script(
    script_sig: &Script,
    script_pubkey: &Script,
    tx: &Transaction,
    input_index: usize,
    amount: i64,
    flags: u32,
    context: Option<ExecutionContext>,
) -> VerifyOutcome {
    if script_sig.len() > MAX_SCRIPT_SIZE || script_pubkey.len() > MAX_SCRIPT_SIZE {
        return VerifyOutcome::failure(ScriptError::ScriptSize);
    }

    if flags & SCRIPT_VERIFY_SIGPUSHONLY != 0 && !script_sig.is_push_only() {
        return VerifyOutcome::failure(ScriptError::SigPushOnly);
    }

    let is_p2sh = flags & SCRIPT_VERIFY_P2SH != 0 && script_pubkey.is_p2sh();
    // P2SH spends must be push-only regardless of SIGPUSHONLY, else the
    // redeem-script stack would be forgeable.
    if is_p2sh && !script_sig.is_push_only() {
        return VerifyOutcome::failure(ScriptError::SigPushOnly);
    }

    let checker = SignatureChecker::real(tx.clone(), input_index, amount);

    let mut vm = Interpreter::new(
        script_sig.clone(),
        script_pubkey.clone(),
        flags,
        checker.clone(),
        context.clone(),
    );
    vm.run();
    let mut outcome = VerifyOutcome::from_interpreter(&vm);
    if !outcome.success {
        return outcome;
    }

    if is_p2sh {
        // Re-derive the unlocking stack; the top element is the serialized
        // redeem script, the rest feed its execution.
        let mut sig_vm = Interpreter::new(
            script_sig.clone(),
            Script::new(),
            flags,
            checker.clone(),
            context.clone(),
        );
        while !sig_vm.is_done() {
            sig_vm.step();
        }
        let mut stack = sig_vm.state().stack.clone();
        let Some(redeem_bytes) = stack.pop() else {
            return VerifyOutcome::failure(ScriptError::InvalidStackOperation);
        };
        let redeem_script = Script::from_bytes(redeem_bytes);

        let mut redeem_vm = Interpreter::new(
            Script::new(),
            redeem_script,
            flags,
            checker,
            context,
        )
        .with_initial_stack(stack);
        redeem_vm.run();
        outcome = VerifyOutcome::from_interpreter(&redeem_vm);
        if !outcome.success {
            return outcome;
        }
    }

    if flags & SCRIPT_VERIFY_CLEANSTACK != 0 && outcome.final_stack.len() != 1 {
        outcome.success = false;
        outcome.error = ScriptError::CleanStack;
        outcome.error_message = outcome.error.to_string();
        return outcome;
    }

    outcome
}

/// Verify every input of a transaction against its UTXOs, returning one
/// outcome per input without short-circuiting.
pub fn verify_transaction(
    tx: &Transaction,
    utxos: &[(Script, i64)],
    flags: u32,
) -> Vec<VerifyOutcome> {
    if tx.inputs.len() != utxos.len() {
        return vec![VerifyOutcome::failure(ScriptError::Unknown)];
    }

    let coins: Vec<Coin> = utxos
        .iter()
        .map(|(script, value)| Coin::new(*value, script.clone()))
        .collect();

    let mut results = Vec::with_capacity(tx.inputs.len());
    for (i, (script_pubkey, amount)) in utxos.iter().enumerate() {
        let context = ExecutionContext::new(tx.clone(), coins.clone(), i);
        let outcome = verify_script(
            &tx.inputs[i].script_sig,
            script_pubkey,
            tx,
            i,
            *amount,
            flags,
            Some(context),
        );
        results.push(outcome);
    }
    results
}

/// Convenience check used by callers that only need the boolean: the top
/// of a final stack coerces to true.
pub fn stack_top_is_true(stack: &[ByteString]) -> bool {
    stack.last().map(|v| scriptnum::to_bool(v)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::*;
    use crate::types::{OutPoint, TxBuilder};

    fn single_input_tx(script_sig: Script) -> Transaction {
        TxBuilder::new()
            .version(2)
            .input(OutPoint::new([0x11; 32], 0), script_sig, 0xffff_ffff)
            .output(100_000, Script::new())
            .build()
    }

    #[test]
    fn test_arithmetic_lock() {
        let sig = Script::from_bytes(vec![OP_5]);
        let pubkey = Script::from_bytes(vec![OP_3, OP_ADD, OP_8, OP_NUMEQUAL]);
        let tx = single_input_tx(sig.clone());
        let outcome = verify_script(&sig, &pubkey, &tx, 0, 50_000, 0, None);
        assert!(outcome.success);
        assert_eq!(outcome.error, ScriptError::Ok);
    }

    #[test]
    fn test_false_top_fails() {
        let sig = Script::from_bytes(vec![OP_0]);
        let pubkey = Script::new();
        let tx = single_input_tx(sig.clone());
        let outcome = verify_script(&sig, &pubkey, &tx, 0, 100_000, 0, None);
        assert!(!outcome.success);
        assert_eq!(outcome.error, ScriptError::EvalFalse);
    }

    #[test]
    fn test_sig_push_only() {
        let sig = Script::from_bytes(vec![OP_1, OP_DUP]);
        let pubkey = Script::from_bytes(vec![OP_DROP]);
        let tx = single_input_tx(sig.clone());
        let outcome = verify_script(
            &sig,
            &pubkey,
            &tx,
            0,
            0,
            SCRIPT_VERIFY_SIGPUSHONLY,
            None,
        );
        assert!(!outcome.success);
        assert_eq!(outcome.error, ScriptError::SigPushOnly);
    }

    #[test]
    fn test_cleanstack() {
        // Two elements remain after success.
        let sig = Script::from_bytes(vec![OP_1, OP_1]);
        let pubkey = Script::new();
        let tx = single_input_tx(sig.clone());
        let outcome = verify_script(
            &sig,
            &pubkey,
            &tx,
            0,
            0,
            SCRIPT_VERIFY_CLEANSTACK,
            None,
        );
        assert!(!outcome.success);
        assert_eq!(outcome.error, ScriptError::CleanStack);

        let sig_ok = Script::from_bytes(vec![OP_1]);
        let tx_ok = single_input_tx(sig_ok.clone());
        let outcome =
            verify_script(&sig_ok, &pubkey, &tx_ok, 0, 0, SCRIPT_VERIFY_CLEANSTACK, None);
        assert!(outcome.success);
    }

    #[test]
    fn test_p2sh_spend() {
        // Redeem script: OP_2 OP_EQUAL; unlocking pushes 2 and the
        // serialized redeem script.
        let redeem = Script::from_bytes(vec![OP_2, OP_EQUAL]);
        let redeem_hash = crate::crypto::hash160(redeem.as_bytes());

        let script_pubkey = Script::new()
            .push_opcode(OP_HASH160)
            .push_data(&redeem_hash)
            .push_opcode(OP_EQUAL);
        assert!(script_pubkey.is_p2sh());

        let script_sig = Script::new()
            .push_opcode(OP_2)
            .push_data(redeem.as_bytes());

        let tx = single_input_tx(script_sig.clone());
        let outcome = verify_script(
            &script_sig,
            &script_pubkey,
            &tx,
            0,
            0,
            SCRIPT_VERIFY_P2SH,
            None,
        );
        assert!(outcome.success, "error: {}", outcome.error_message);
    }

    #[test]
    fn test_p2sh_wrong_redeem_value() {
        let redeem = Script::from_bytes(vec![OP_2, OP_EQUAL]);
        let redeem_hash = crate::crypto::hash160(redeem.as_bytes());
        let script_pubkey = Script::new()
            .push_opcode(OP_HASH160)
            .push_data(&redeem_hash)
            .push_opcode(OP_EQUAL);
        let script_sig = Script::new()
            .push_opcode(OP_3)
            .push_data(redeem.as_bytes());
        let tx = single_input_tx(script_sig.clone());
        let outcome = verify_script(
            &script_sig,
            &script_pubkey,
            &tx,
            0,
            0,
            SCRIPT_VERIFY_P2SH,
            None,
        );
        assert!(!outcome.success);
    }

    #[test]
    fn test_p2sh_requires_push_only_sig() {
        let redeem = Script::from_bytes(vec![OP_1]);
        let redeem_hash = crate::crypto::hash160(redeem.as_bytes());
        let script_pubkey = Script::new()
            .push_opcode(OP_HASH160)
            .push_data(&redeem_hash)
            .push_opcode(OP_EQUAL);
        let script_sig = Script::new()
            .push_opcode(OP_1)
            .push_opcode(OP_DROP)
            .push_data(redeem.as_bytes());
        let tx = single_input_tx(script_sig.clone());
        let outcome = verify_script(
            &script_sig,
            &script_pubkey,
            &tx,
            0,
            0,
            SCRIPT_VERIFY_P2SH,
            None,
        );
        assert!(!outcome.success);
        assert_eq!(outcome.error, ScriptError::SigPushOnly);
    }

    #[test]
    fn test_verify_transaction_per_input() {
        let tx = TxBuilder::new()
            .version(2)
            .input(
                OutPoint::new([0x01; 32], 0),
                Script::from_bytes(vec![OP_1]),
                0xffff_ffff,
            )
            .input(
                OutPoint::new([0x02; 32], 0),
                Script::from_bytes(vec![OP_0]),
                0xffff_ffff,
            )
            .output(150_000, Script::new())
            .build();

        let utxos = vec![(Script::new(), 100_000i64), (Script::new(), 100_000i64)];
        let results = verify_transaction(&tx, &utxos, 0);
        assert_eq!(results.len(), 2);
        assert!(results[0].success);
        assert!(!results[1].success);
    }

    #[test]
    fn test_verify_transaction_utxo_mismatch() {
        let tx = single_input_tx(Script::from_bytes(vec![OP_1]));
        let results = verify_transaction(&tx, &[], 0);
        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
    }
}
