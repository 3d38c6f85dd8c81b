//! # rxdvm
//!
//! Step-debuggable interpreter for the Radiant script language: a
//! UTXO-based stack machine derived from Bitcoin Script with re-enabled
//! splice/arithmetic opcodes, 64-bit integers, native transaction
//! introspection, reference tracking, a state-separator mechanism, and the
//! BLAKE3/KangarooTwelve hash opcodes.
//!
//! The crate verifies an unlocking/locking script pair against a spending
//! transaction and its UTXO context, producing either a success verdict or
//! a precisely classified failure, and exposes a step/rewind interface for
//! interactive debugging.
//!
//! ## Usage
//!
//! ```rust
//! use rxdvm::opcodes::*;
//! use rxdvm::script::Script;
//! use rxdvm::types::{OutPoint, TxBuilder};
//! use rxdvm::verify::verify_script;
//!
//! let script_sig = Script::from_bytes(vec![OP_5]);
//! let script_pubkey = Script::from_bytes(vec![OP_3, OP_ADD, OP_8, OP_NUMEQUAL]);
//! let tx = TxBuilder::new()
//!     .input(OutPoint::new([0x11; 32], 0), script_sig.clone(), 0xffffffff)
//!     .output(100_000, Script::new())
//!     .build();
//!
//! let outcome = verify_script(&script_sig, &script_pubkey, &tx, 0, 50_000, 0, None);
//! assert!(outcome.success);
//! ```
//!
//! For interactive debugging, drive an [`interpreter::Interpreter`]
//! directly: `step()` executes one opcode, `rewind()` undoes it, and
//! `state()` exposes the stacks, condition stack and program counter.

pub mod config;
pub mod constants;
pub mod context;
pub mod crypto;
pub mod error;
pub mod flags;
pub mod interpreter;
pub mod opcodes;
pub mod script;
pub mod scriptnum;
pub mod serialization;
pub mod sighash;
pub mod signature;
pub mod types;
pub mod verify;

pub use config::DebugConfig;
pub use context::ExecutionContext;
pub use error::{Result, ScriptError};
pub use interpreter::{Interpreter, Phase, VmState};
pub use script::Script;
pub use signature::SignatureChecker;
pub use types::{Coin, Network, OutPoint, Transaction, TxBuilder};
pub use verify::{verify_script, verify_transaction, VerifyOutcome};

/// Convenience facade bundling a configuration with the verification and
/// debugging entry points. All methods delegate to the module functions.
#[derive(Debug, Clone, Default)]
pub struct ScriptEngine {
    config: DebugConfig,
}

impl ScriptEngine {
    pub fn new(config: DebugConfig) -> Self {
        ScriptEngine { config }
    }

    pub fn config(&self) -> &DebugConfig {
        &self.config
    }

    /// Verify one input's script pair.
    pub fn verify_script(
        &self,
        script_sig: &Script,
        script_pubkey: &Script,
        tx: &Transaction,
        input_index: usize,
        amount: i64,
        flags: u32,
        context: Option<ExecutionContext>,
    ) -> VerifyOutcome {
        verify::verify_script(script_sig, script_pubkey, tx, input_index, amount, flags, context)
    }

    /// Verify every input of a transaction, one outcome per input.
    pub fn verify_transaction(
        &self,
        tx: &Transaction,
        utxos: &[(Script, i64)],
        flags: u32,
    ) -> Vec<VerifyOutcome> {
        verify::verify_transaction(tx, utxos, flags)
    }

    /// Build a stepping interpreter honoring the engine configuration.
    pub fn debugger(
        &self,
        script_sig: Script,
        script_pubkey: Script,
        flags: u32,
        checker: SignatureChecker,
        context: Option<ExecutionContext>,
    ) -> Interpreter {
        Interpreter::new(script_sig, script_pubkey, flags, checker, context)
            .with_history_depth(self.config.history_depth as usize)
            .with_allow_disabled_opcodes(self.config.allow_disabled_opcodes)
    }

    /// Signature hash for one input.
    pub fn signature_hash(
        &self,
        tx: &Transaction,
        input_index: usize,
        script_code: &Script,
        amount: i64,
        hash_type: u32,
    ) -> Result<types::Hash> {
        sighash::signature_hash(
            tx,
            input_index,
            script_code,
            amount,
            sighash::SighashType(hash_type),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::*;

    #[test]
    fn test_engine_verify() {
        let engine = ScriptEngine::default();
        let sig = Script::from_bytes(vec![OP_1]);
        let tx = TxBuilder::new()
            .input(OutPoint::new([0; 32], 0), sig.clone(), 0xffff_ffff)
            .output(1000, Script::new())
            .build();
        let outcome = engine.verify_script(&sig, &Script::new(), &tx, 0, 1000, 0, None);
        assert!(outcome.success);
    }

    #[test]
    fn test_engine_debugger_honors_config() {
        let engine = ScriptEngine::new(DebugConfig {
            allow_disabled_opcodes: true,
            history_depth: 4,
            ..DebugConfig::default()
        });
        let mut vm = engine.debugger(
            Script::new(),
            Script::from_bytes(vec![OP_NOP5, OP_1]),
            crate::flags::SCRIPT_VERIFY_DISCOURAGE_UPGRADABLE_NOPS,
            SignatureChecker::Dummy,
            None,
        );
        assert!(vm.run());
    }
}
