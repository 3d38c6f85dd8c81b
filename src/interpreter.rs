//! Step-debuggable script interpreter
//!
//! A stack + altstack + condition-stack machine executing the unlocking
//! script followed by the locking script. Every `step()` snapshots the
//! live state into a bounded history so the caller can `rewind()`;
//! `run()` drives stepping to completion.

use crate::constants::{
    DEFAULT_HISTORY_DEPTH, MAX_OPS_PER_SCRIPT, MAX_PUBKEYS_PER_MULTISIG, MAX_SCRIPT_ELEMENT_SIZE,
    MAX_STACK_SIZE,
};
use crate::context::ExecutionContext;
use crate::crypto;
use crate::error::{Result, ScriptError};
use crate::flags::*;
use crate::opcodes::*;
use crate::script::{is_minimal_push, Script};
use crate::scriptnum;
use crate::signature::{is_valid_pubkey, is_valid_signature_encoding, SignatureChecker};
use crate::sighash::SighashType;
use crate::types::{ByteString, Ref};
use std::collections::HashSet;

/// Which of the two scripts is executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unlocking,
    Locking,
}

/// Complete mutable interpreter state; snapshotted per step for rewind.
#[derive(Debug, Clone)]
pub struct VmState {
    pub stack: Vec<ByteString>,
    pub altstack: Vec<ByteString>,
    /// Branch outcomes of enclosing IF/NOTIF blocks
    pub cond_stack: Vec<bool>,
    pub phase: Phase,
    /// Byte offset into the current phase's script
    pub pc: usize,
    /// Opcode ordinal, for display
    pub op_index: usize,
    /// Executed non-push opcodes, counted against the op budget
    pub op_count: usize,
    /// Start offset of the covered script code (after OP_CODESEPARATOR)
    pub code_separator: usize,
    pub done: bool,
    pub success: bool,
    pub error: ScriptError,
    // Running reference sets, for display in the debugger
    pub push_refs: HashSet<Ref>,
    pub require_refs: HashSet<Ref>,
    pub singleton_refs: HashSet<Ref>,
}

impl VmState {
    fn initial(phase: Phase) -> Self {
        VmState {
            stack: Vec::new(),
            altstack: Vec::new(),
            cond_stack: Vec::new(),
            phase,
            pc: 0,
            op_index: 0,
            op_count: 0,
            code_separator: 0,
            done: false,
            success: false,
            error: ScriptError::Ok,
            push_refs: HashSet::new(),
            require_refs: HashSet::new(),
            singleton_refs: HashSet::new(),
        }
    }

    /// True while no entry in the condition stack is false.
    fn executing(&self) -> bool {
        self.cond_stack.iter().all(|&b| b)
    }
}

/// The stepping interpreter.
pub struct Interpreter {
    script_sig: Script,
    script_pubkey: Script,
    flags: u32,
    checker: SignatureChecker,
    context: Option<ExecutionContext>,
    history_depth: usize,
    /// Pass executed NOPs where DISCOURAGE_UPGRADABLE_NOPS would fail them
    allow_disabled: bool,
    initial_stack: Vec<ByteString>,
    state: VmState,
    history: Vec<VmState>,
}

impl Interpreter {
    pub fn new(
        script_sig: Script,
        script_pubkey: Script,
        flags: u32,
        checker: SignatureChecker,
        context: Option<ExecutionContext>,
    ) -> Self {
        let mut vm = Interpreter {
            script_sig,
            script_pubkey,
            flags,
            checker,
            context,
            history_depth: DEFAULT_HISTORY_DEPTH,
            allow_disabled: false,
            initial_stack: Vec::new(),
            state: VmState::initial(Phase::Unlocking),
            history: Vec::new(),
        };
        vm.reset();
        vm
    }

    /// Seed the stack before the first step (used for P2SH redeem-script
    /// execution and ad-hoc script evaluation).
    pub fn with_initial_stack(mut self, stack: Vec<ByteString>) -> Self {
        self.initial_stack = stack;
        self.reset();
        self
    }

    pub fn with_history_depth(mut self, depth: usize) -> Self {
        self.history_depth = depth.max(1);
        self
    }

    pub fn with_allow_disabled_opcodes(mut self, allow: bool) -> Self {
        self.allow_disabled = allow;
        self
    }

    /// Drop all execution state and return to the initial position.
    pub fn reset(&mut self) {
        // An empty unlocking script starts execution in the locking phase.
        let phase = if self.script_sig.is_empty() {
            Phase::Locking
        } else {
            Phase::Unlocking
        };
        self.state = VmState::initial(phase);
        self.state.stack = self.initial_stack.clone();
        self.history.clear();
    }

    pub fn state(&self) -> &VmState {
        &self.state
    }

    pub fn error(&self) -> ScriptError {
        self.state.error
    }

    pub fn is_done(&self) -> bool {
        self.state.done
    }

    pub fn is_at_start(&self) -> bool {
        self.history.is_empty()
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    pub fn context(&self) -> Option<&ExecutionContext> {
        self.context.as_ref()
    }

    fn current_script(&self) -> &Script {
        match self.state.phase {
            Phase::Unlocking => &self.script_sig,
            Phase::Locking => &self.script_pubkey,
        }
    }

    /// Script bytes covered by signature checks: the current script from
    /// the last executed OP_CODESEPARATOR to its end.
    fn script_code(&self) -> Script {
        self.current_script().suffix_from(self.state.code_separator)
    }

    fn save_history(&mut self) {
        if self.history.len() >= self.history_depth {
            self.history.remove(0);
        }
        self.history.push(self.state.clone());
    }

    fn fail(&mut self, error: ScriptError) -> bool {
        self.state.done = true;
        self.state.success = false;
        self.state.error = error;
        false
    }

    /// Execute one opcode and advance. Returns true while execution can
    /// continue; termination (success or failure) is reflected in the
    /// state and `error()`.
    pub fn step(&mut self) -> bool {
        if self.state.done {
            return false;
        }

        self.save_history();

        // End of current script?
        if self.state.pc >= self.current_script().len() {
            // Condition stack must be balanced at every script boundary.
            if !self.state.cond_stack.is_empty() {
                return self.fail(ScriptError::UnbalancedConditional);
            }
            if self.state.phase == Phase::Unlocking {
                self.state.phase = Phase::Locking;
                self.state.pc = 0;
                self.state.code_separator = 0;
                return true;
            }
            self.state.done = true;
            self.state.success = !self.state.stack.is_empty()
                && scriptnum::to_bool(self.state.stack.last().unwrap());
            if !self.state.success {
                self.state.error = ScriptError::EvalFalse;
            }
            return false;
        }

        let op = match self.current_script().get_op(self.state.pc) {
            Ok(Some(op)) => op,
            Ok(None) => unreachable!("pc bounds checked above"),
            Err(e) => return self.fail(e),
        };

        match self.execute_opcode(op.opcode, op.data.as_deref()) {
            Ok(()) => {}
            Err(e) => return self.fail(e),
        }

        self.state.pc = op.next;
        self.state.op_index += 1;

        // Combined stack depth cap applies after every step.
        if self.state.stack.len() + self.state.altstack.len() > MAX_STACK_SIZE {
            return self.fail(ScriptError::StackSize);
        }

        true
    }

    /// Execute to completion.
    pub fn run(&mut self) -> bool {
        while self.step() {}
        self.state.success
    }

    /// Undo the most recent step. Returns false at the start of history.
    pub fn rewind(&mut self) -> bool {
        match self.history.pop() {
            Some(prev) => {
                self.state = prev;
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Stack helpers
    // ------------------------------------------------------------------

    fn need(&self, depth: usize) -> Result<()> {
        if self.state.stack.len() < depth {
            Err(ScriptError::InvalidStackOperation)
        } else {
            Ok(())
        }
    }

    fn pop(&mut self) -> Result<ByteString> {
        self.state
            .stack
            .pop()
            .ok_or(ScriptError::InvalidStackOperation)
    }

    fn pop_num(&mut self) -> Result<i64> {
        let bytes = self.pop()?;
        if self.flags & SCRIPT_VERIFY_MINIMALDATA != 0 && !scriptnum::is_minimally_encoded(&bytes) {
            return Err(ScriptError::MinimalData);
        }
        scriptnum::decode(&bytes)
    }

    fn push(&mut self, data: ByteString) -> Result<()> {
        if data.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(ScriptError::PushSize);
        }
        self.state.stack.push(data);
        Ok(())
    }

    fn push_num(&mut self, n: i64) -> Result<()> {
        self.push(scriptnum::encode(n))
    }

    fn push_bool(&mut self, b: bool) -> Result<()> {
        self.push(if b { vec![1] } else { vec![] })
    }

    fn peek(&self, from_top: usize) -> Result<&ByteString> {
        let len = self.state.stack.len();
        if from_top >= len {
            return Err(ScriptError::InvalidStackOperation);
        }
        Ok(&self.state.stack[len - 1 - from_top])
    }

    fn count_op(&mut self) -> Result<()> {
        self.state.op_count += 1;
        if self.state.op_count > MAX_OPS_PER_SCRIPT {
            return Err(ScriptError::OpCount);
        }
        Ok(())
    }

    fn context_ref(&self) -> Result<&ExecutionContext> {
        self.context
            .as_ref()
            .ok_or(ScriptError::IntrospectionContextUnavailable)
    }

    fn pop_index(&mut self) -> Result<usize> {
        self.pop_index_or(ScriptError::InvalidTxInputIndex)
    }

    fn pop_output_index(&mut self) -> Result<usize> {
        self.pop_index_or(ScriptError::InvalidTxOutputIndex)
    }

    fn pop_index_or(&mut self, err: ScriptError) -> Result<usize> {
        let n = self.pop_num()?;
        if n < 0 {
            return Err(err);
        }
        Ok(n as usize)
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    fn execute_opcode(&mut self, opcode: u8, data: Option<&[u8]>) -> Result<()> {
        let executing = self.state.executing();

        // OP_VERIF/OP_VERNOTIF invalidate the script even inside an
        // unexecuted branch.
        if opcode == OP_VERIF || opcode == OP_VERNOTIF {
            return Err(ScriptError::BadOpcode);
        }

        // Conditional opcodes maintain the condition stack in every branch.
        match opcode {
            OP_IF | OP_NOTIF => {
                let mut branch = false;
                if executing {
                    self.count_op()?;
                    let cond = self.pop()?;
                    if self.flags & SCRIPT_VERIFY_MINIMALIF != 0
                        && !(cond.is_empty() || cond == [1])
                    {
                        return Err(ScriptError::MinimalIf);
                    }
                    branch = scriptnum::to_bool(&cond);
                    if opcode == OP_NOTIF {
                        branch = !branch;
                    }
                }
                self.state.cond_stack.push(branch);
                return Ok(());
            }
            OP_ELSE => {
                if executing {
                    self.count_op()?;
                }
                match self.state.cond_stack.last_mut() {
                    Some(top) => *top = !*top,
                    None => return Err(ScriptError::UnbalancedConditional),
                }
                return Ok(());
            }
            OP_ENDIF => {
                if executing {
                    self.count_op()?;
                }
                if self.state.cond_stack.pop().is_none() {
                    return Err(ScriptError::UnbalancedConditional);
                }
                return Ok(());
            }
            _ => {}
        }

        // Skipped opcodes do not touch the stacks or the op budget.
        if !executing {
            return Ok(());
        }

        // Push family
        if is_push_data_opcode(opcode) {
            let bytes = data.unwrap_or(&[]);
            if self.flags & SCRIPT_VERIFY_MINIMALDATA != 0 && !is_minimal_push(opcode, bytes) {
                return Err(ScriptError::MinimalData);
            }
            return self.push(bytes.to_vec());
        }
        match opcode {
            OP_1NEGATE => return self.push(vec![0x81]),
            n @ OP_1..=OP_16 => return self.push(vec![n - OP_1 + 1]),
            _ => {}
        }

        self.count_op()?;

        match opcode {
            // ----------------------------------------------------------
            // Control
            // ----------------------------------------------------------
            OP_NOP => {}
            OP_NOP1 | OP_NOP4 | OP_NOP5 | OP_NOP6 | OP_NOP7 | OP_NOP8 | OP_NOP9 | OP_NOP10 => {
                if self.flags & SCRIPT_VERIFY_DISCOURAGE_UPGRADABLE_NOPS != 0
                    && !self.allow_disabled
                {
                    return Err(ScriptError::DisabledOpcode);
                }
            }
            OP_VER | OP_RESERVED | OP_RESERVED1 | OP_RESERVED2 => {
                return Err(ScriptError::BadOpcode);
            }
            OP_VERIFY => {
                self.need(1)?;
                let top = self.pop()?;
                if !scriptnum::to_bool(&top) {
                    return Err(ScriptError::Verify);
                }
            }
            OP_RETURN => return Err(ScriptError::OpReturn),

            // ----------------------------------------------------------
            // Stack
            // ----------------------------------------------------------
            OP_TOALTSTACK => {
                let v = self.pop()?;
                self.state.altstack.push(v);
            }
            OP_FROMALTSTACK => {
                let v = self
                    .state
                    .altstack
                    .pop()
                    .ok_or(ScriptError::InvalidAltstackOperation)?;
                self.push(v)?;
            }
            OP_2DROP => {
                self.need(2)?;
                self.pop()?;
                self.pop()?;
            }
            OP_2DUP => {
                self.need(2)?;
                let a = self.peek(1)?.clone();
                let b = self.peek(0)?.clone();
                self.push(a)?;
                self.push(b)?;
            }
            OP_3DUP => {
                self.need(3)?;
                let a = self.peek(2)?.clone();
                let b = self.peek(1)?.clone();
                let c = self.peek(0)?.clone();
                self.push(a)?;
                self.push(b)?;
                self.push(c)?;
            }
            OP_2OVER => {
                self.need(4)?;
                let a = self.peek(3)?.clone();
                let b = self.peek(2)?.clone();
                self.push(a)?;
                self.push(b)?;
            }
            OP_2ROT => {
                self.need(6)?;
                let len = self.state.stack.len();
                let a = self.state.stack.remove(len - 6);
                let b = self.state.stack.remove(len - 6);
                self.state.stack.push(a);
                self.state.stack.push(b);
            }
            OP_2SWAP => {
                self.need(4)?;
                let len = self.state.stack.len();
                self.state.stack.swap(len - 4, len - 2);
                self.state.stack.swap(len - 3, len - 1);
            }
            OP_IFDUP => {
                self.need(1)?;
                let top = self.peek(0)?.clone();
                if scriptnum::to_bool(&top) {
                    self.push(top)?;
                }
            }
            OP_DEPTH => {
                let depth = self.state.stack.len() as i64;
                self.push_num(depth)?;
            }
            OP_DROP => {
                self.pop()?;
            }
            OP_DUP => {
                self.need(1)?;
                let top = self.peek(0)?.clone();
                self.push(top)?;
            }
            OP_NIP => {
                self.need(2)?;
                let len = self.state.stack.len();
                self.state.stack.remove(len - 2);
            }
            OP_OVER => {
                self.need(2)?;
                let v = self.peek(1)?.clone();
                self.push(v)?;
            }
            OP_PICK | OP_ROLL => {
                self.need(1)?;
                let n = self.pop_num()?;
                if n < 0 || n as usize >= self.state.stack.len() {
                    return Err(ScriptError::InvalidStackOperation);
                }
                let idx = self.state.stack.len() - 1 - n as usize;
                let v = if opcode == OP_ROLL {
                    self.state.stack.remove(idx)
                } else {
                    self.state.stack[idx].clone()
                };
                self.push(v)?;
            }
            OP_ROT => {
                self.need(3)?;
                let len = self.state.stack.len();
                let v = self.state.stack.remove(len - 3);
                self.state.stack.push(v);
            }
            OP_SWAP => {
                self.need(2)?;
                let len = self.state.stack.len();
                self.state.stack.swap(len - 1, len - 2);
            }
            OP_TUCK => {
                self.need(2)?;
                let top = self.peek(0)?.clone();
                let len = self.state.stack.len();
                self.state.stack.insert(len - 2, top);
            }

            // ----------------------------------------------------------
            // Splice
            // ----------------------------------------------------------
            OP_CAT => {
                self.need(2)?;
                let b = self.pop()?;
                let mut a = self.pop()?;
                if a.len() + b.len() > MAX_SCRIPT_ELEMENT_SIZE {
                    return Err(ScriptError::PushSize);
                }
                a.extend_from_slice(&b);
                self.push(a)?;
            }
            OP_SPLIT => {
                self.need(2)?;
                let pos = self.pop_num()?;
                let data = self.pop()?;
                if pos < 0 || pos as usize > data.len() {
                    return Err(ScriptError::InvalidStackOperation);
                }
                let pos = pos as usize;
                let right = data[pos..].to_vec();
                let left = data[..pos].to_vec();
                self.push(left)?;
                self.push(right)?;
            }
            OP_NUM2BIN => {
                self.need(2)?;
                let size = self.pop_num()?;
                let raw = self.pop()?;
                if size < 0 || size as usize > MAX_SCRIPT_ELEMENT_SIZE {
                    return Err(ScriptError::PushSize);
                }
                let size = size as usize;
                let mut v = scriptnum::minimize(&raw)?;
                if v.len() > size {
                    return Err(ScriptError::ImpossibleEncoding);
                }
                if v.len() < size {
                    let sign = v.last().map(|b| b & 0x80).unwrap_or(0);
                    if let Some(last) = v.last_mut() {
                        *last &= 0x7f;
                    }
                    while v.len() < size - 1 {
                        v.push(0);
                    }
                    v.push(sign);
                }
                self.push(v)?;
            }
            OP_BIN2NUM => {
                self.need(1)?;
                let raw = self.pop()?;
                let v = scriptnum::minimize(&raw)?;
                self.push(v)?;
            }
            OP_SIZE => {
                self.need(1)?;
                let len = self.peek(0)?.len() as i64;
                self.push_num(len)?;
            }
            OP_REVERSEBYTES => {
                self.need(1)?;
                let mut v = self.pop()?;
                v.reverse();
                self.push(v)?;
            }

            // ----------------------------------------------------------
            // Bitwise
            // ----------------------------------------------------------
            OP_INVERT => {
                self.need(1)?;
                let mut v = self.pop()?;
                for b in v.iter_mut() {
                    *b = !*b;
                }
                self.push(v)?;
            }
            OP_AND | OP_OR | OP_XOR => {
                self.need(2)?;
                let b = self.pop()?;
                let mut a = self.pop()?;
                if a.len() != b.len() {
                    return Err(ScriptError::InvalidStackOperation);
                }
                for (x, y) in a.iter_mut().zip(b.iter()) {
                    match opcode {
                        OP_AND => *x &= y,
                        OP_OR => *x |= y,
                        _ => *x ^= y,
                    }
                }
                self.push(a)?;
            }
            OP_EQUAL | OP_EQUALVERIFY => {
                self.need(2)?;
                let b = self.pop()?;
                let a = self.pop()?;
                let equal = a == b;
                self.push_bool(equal)?;
                if opcode == OP_EQUALVERIFY {
                    self.pop()?;
                    if !equal {
                        return Err(ScriptError::EqualVerify);
                    }
                }
            }

            // ----------------------------------------------------------
            // Arithmetic
            // ----------------------------------------------------------
            OP_1ADD => {
                let n = self.pop_num()?;
                self.push_num(n.wrapping_add(1))?;
            }
            OP_1SUB => {
                let n = self.pop_num()?;
                self.push_num(n.wrapping_sub(1))?;
            }
            OP_2MUL => {
                let n = self.pop_num()?;
                self.push_num(n.wrapping_mul(2))?;
            }
            OP_2DIV => {
                let n = self.pop_num()?;
                self.push_num(n / 2)?;
            }
            OP_NEGATE => {
                let n = self.pop_num()?;
                self.push_num(n.wrapping_neg())?;
            }
            OP_ABS => {
                let n = self.pop_num()?;
                self.push_num(if n < 0 { n.wrapping_neg() } else { n })?;
            }
            OP_NOT => {
                let n = self.pop_num()?;
                self.push_num(i64::from(n == 0))?;
            }
            OP_0NOTEQUAL => {
                let n = self.pop_num()?;
                self.push_num(i64::from(n != 0))?;
            }
            OP_ADD => {
                self.need(2)?;
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.push_num(a.wrapping_add(b))?;
            }
            OP_SUB => {
                self.need(2)?;
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.push_num(a.wrapping_sub(b))?;
            }
            OP_MUL => {
                self.need(2)?;
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.push_num(a.wrapping_mul(b))?;
            }
            OP_DIV => {
                self.need(2)?;
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                if b == 0 {
                    return Err(ScriptError::DivByZero);
                }
                self.push_num(a.wrapping_div(b))?;
            }
            OP_MOD => {
                self.need(2)?;
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                if b == 0 {
                    return Err(ScriptError::ModByZero);
                }
                self.push_num(a.wrapping_rem(b))?;
            }
            OP_LSHIFT | OP_RSHIFT => {
                self.need(2)?;
                let count = self.pop_num()?;
                let data = self.pop()?;
                if count < 0 {
                    return Err(ScriptError::InvalidNumberRange);
                }
                let shifted = shift_bytes(&data, count as usize, opcode == OP_LSHIFT);
                self.push(shifted)?;
            }
            OP_BOOLAND => {
                self.need(2)?;
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.push_num(i64::from(a != 0 && b != 0))?;
            }
            OP_BOOLOR => {
                self.need(2)?;
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.push_num(i64::from(a != 0 || b != 0))?;
            }
            OP_NUMEQUAL | OP_NUMEQUALVERIFY => {
                self.need(2)?;
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                let equal = a == b;
                self.push_num(i64::from(equal))?;
                if opcode == OP_NUMEQUALVERIFY {
                    self.pop()?;
                    if !equal {
                        return Err(ScriptError::NumEqualVerify);
                    }
                }
            }
            OP_NUMNOTEQUAL => {
                self.need(2)?;
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.push_num(i64::from(a != b))?;
            }
            OP_LESSTHAN => {
                self.need(2)?;
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.push_num(i64::from(a < b))?;
            }
            OP_GREATERTHAN => {
                self.need(2)?;
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.push_num(i64::from(a > b))?;
            }
            OP_LESSTHANOREQUAL => {
                self.need(2)?;
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.push_num(i64::from(a <= b))?;
            }
            OP_GREATERTHANOREQUAL => {
                self.need(2)?;
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.push_num(i64::from(a >= b))?;
            }
            OP_MIN => {
                self.need(2)?;
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.push_num(a.min(b))?;
            }
            OP_MAX => {
                self.need(2)?;
                let b = self.pop_num()?;
                let a = self.pop_num()?;
                self.push_num(a.max(b))?;
            }
            OP_WITHIN => {
                self.need(3)?;
                let max = self.pop_num()?;
                let min = self.pop_num()?;
                let x = self.pop_num()?;
                self.push_num(i64::from(min <= x && x < max))?;
            }

            // ----------------------------------------------------------
            // Crypto
            // ----------------------------------------------------------
            OP_RIPEMD160 => {
                let v = self.pop()?;
                self.push(crypto::ripemd160(&v).to_vec())?;
            }
            OP_SHA1 => {
                let v = self.pop()?;
                self.push(crypto::sha1(&v).to_vec())?;
            }
            OP_SHA256 => {
                let v = self.pop()?;
                self.push(crypto::sha256(&v).to_vec())?;
            }
            OP_HASH160 => {
                let v = self.pop()?;
                self.push(crypto::hash160(&v).to_vec())?;
            }
            OP_HASH256 => {
                let v = self.pop()?;
                self.push(crypto::hash256(&v).to_vec())?;
            }
            OP_SHA512_256 => {
                let v = self.pop()?;
                self.push(crypto::sha512_256(&v).to_vec())?;
            }
            OP_HASH512_256 => {
                let v = self.pop()?;
                self.push(crypto::hash512_256(&v).to_vec())?;
            }
            OP_BLAKE3 => {
                let v = self.pop()?;
                if v.len() > crypto::Blake3::CHUNK_LEN {
                    return Err(ScriptError::PushSize);
                }
                self.push(crypto::blake3_hash(&v).to_vec())?;
            }
            OP_K12 => {
                let v = self.pop()?;
                if v.len() > crypto::K12::MAX_INPUT {
                    return Err(ScriptError::PushSize);
                }
                self.push(crypto::k12_hash(&v).to_vec())?;
            }
            OP_CODESEPARATOR => {
                // Subsequent signature checks cover the script from here.
                self.state.code_separator = self.state.pc + 1;
            }
            OP_CHECKSIG | OP_CHECKSIGVERIFY => {
                self.need(2)?;
                let pubkey = self.pop()?;
                let sig = self.pop()?;

                self.check_signature_encoding(&sig)?;
                self.check_pubkey_encoding(&pubkey)?;

                let script_code = self.script_code().find_and_delete(&sig);
                let ok = self.checker.check_sig(&sig, &pubkey, &script_code);

                if !ok && self.flags & SCRIPT_VERIFY_NULLFAIL != 0 && !sig.is_empty() {
                    return Err(ScriptError::SigNullFail);
                }

                self.push_bool(ok)?;
                if opcode == OP_CHECKSIGVERIFY {
                    self.pop()?;
                    if !ok {
                        return Err(ScriptError::CheckSigVerify);
                    }
                }
            }
            OP_CHECKMULTISIG | OP_CHECKMULTISIGVERIFY => {
                self.execute_checkmultisig(opcode == OP_CHECKMULTISIGVERIFY)?;
            }
            OP_CHECKDATASIG | OP_CHECKDATASIGVERIFY => {
                self.need(3)?;
                let pubkey = self.pop()?;
                let message = self.pop()?;
                let sig = self.pop()?;

                // Data signatures carry no sighash byte; only the DER
                // structure is checked.
                if !sig.is_empty()
                    && self.flags
                        & (SCRIPT_VERIFY_DERSIG | SCRIPT_VERIFY_STRICTENC | SCRIPT_VERIFY_LOW_S)
                        != 0
                    && !is_valid_signature_encoding(&sig)
                {
                    return Err(ScriptError::SigDer);
                }
                self.check_pubkey_encoding(&pubkey)?;

                let ok = self.checker.check_data_sig(&sig, &pubkey, &message);

                if !ok && self.flags & SCRIPT_VERIFY_NULLFAIL != 0 && !sig.is_empty() {
                    return Err(ScriptError::SigNullFail);
                }

                self.push_bool(ok)?;
                if opcode == OP_CHECKDATASIGVERIFY {
                    self.pop()?;
                    if !ok {
                        return Err(ScriptError::CheckSigVerify);
                    }
                }
            }

            // ----------------------------------------------------------
            // Locktime
            // ----------------------------------------------------------
            OP_CHECKLOCKTIMEVERIFY => {
                if self.flags & SCRIPT_VERIFY_CHECKLOCKTIMEVERIFY == 0 {
                    if self.flags & SCRIPT_VERIFY_DISCOURAGE_UPGRADABLE_NOPS != 0
                        && !self.allow_disabled
                    {
                        return Err(ScriptError::DisabledOpcode);
                    }
                } else {
                    self.need(1)?;
                    let n = scriptnum::decode(self.peek(0)?)?;
                    if n < 0 {
                        return Err(ScriptError::NegativeLocktime);
                    }
                    if !self.checker.check_lock_time(n) {
                        return Err(ScriptError::UnsatisfiedLocktime);
                    }
                }
            }
            OP_CHECKSEQUENCEVERIFY => {
                if self.flags & SCRIPT_VERIFY_CHECKSEQUENCEVERIFY == 0 {
                    if self.flags & SCRIPT_VERIFY_DISCOURAGE_UPGRADABLE_NOPS != 0
                        && !self.allow_disabled
                    {
                        return Err(ScriptError::DisabledOpcode);
                    }
                } else {
                    self.need(1)?;
                    let n = scriptnum::decode(self.peek(0)?)?;
                    if n < 0 {
                        return Err(ScriptError::NegativeLocktime);
                    }
                    // Bit 31 set opts this operand out of the check.
                    if n & (crate::constants::SEQUENCE_LOCKTIME_DISABLE_FLAG as i64) == 0
                        && !self.checker.check_sequence(n)
                    {
                        return Err(ScriptError::UnsatisfiedLocktime);
                    }
                }
            }

            // ----------------------------------------------------------
            // Introspection
            // ----------------------------------------------------------
            OP_INPUTINDEX => {
                let idx = self.context_ref()?.input_index() as i64;
                self.push_num(idx)?;
            }
            OP_ACTIVEBYTECODE => {
                self.context_ref()?;
                let code = self.script_code().into_bytes();
                self.push(code)?;
            }
            OP_TXVERSION => {
                let v = self.context_ref()?.tx_version() as i64;
                self.push_num(v)?;
            }
            OP_TXINPUTCOUNT => {
                let n = self.context_ref()?.tx_input_count() as i64;
                self.push_num(n)?;
            }
            OP_TXOUTPUTCOUNT => {
                let n = self.context_ref()?.tx_output_count() as i64;
                self.push_num(n)?;
            }
            OP_TXLOCKTIME => {
                let n = self.context_ref()?.tx_locktime() as i64;
                self.push_num(n)?;
            }
            OP_UTXOVALUE => {
                self.context_ref()?;
                let idx = self.pop_index()?;
                let value = self.context_ref()?.utxo_value(idx)?;
                self.push_num(value)?;
            }
            OP_UTXOBYTECODE => {
                self.context_ref()?;
                let idx = self.pop_index()?;
                let script = self.context_ref()?.utxo_bytecode(idx)?.clone();
                self.push(script.into_bytes())?;
            }
            OP_OUTPOINTTXHASH => {
                self.context_ref()?;
                let idx = self.pop_index()?;
                let txid = self.context_ref()?.outpoint_txid(idx)?;
                self.push(txid.to_vec())?;
            }
            OP_OUTPOINTINDEX => {
                self.context_ref()?;
                let idx = self.pop_index()?;
                let n = self.context_ref()?.outpoint_index(idx)? as i64;
                self.push_num(n)?;
            }
            OP_INPUTBYTECODE => {
                self.context_ref()?;
                let idx = self.pop_index()?;
                let script = self.context_ref()?.input_bytecode(idx)?.clone();
                self.push(script.into_bytes())?;
            }
            OP_INPUTSEQUENCENUMBER => {
                self.context_ref()?;
                let idx = self.pop_index()?;
                let n = self.context_ref()?.input_sequence(idx)? as i64;
                self.push_num(n)?;
            }
            OP_OUTPUTVALUE => {
                self.context_ref()?;
                let idx = self.pop_output_index()?;
                let value = self.context_ref()?.output_value(idx)?;
                self.push_num(value)?;
            }
            OP_OUTPUTBYTECODE => {
                self.context_ref()?;
                let idx = self.pop_output_index()?;
                let script = self.context_ref()?.output_bytecode(idx)?.clone();
                self.push(script.into_bytes())?;
            }

            // ----------------------------------------------------------
            // State separator
            // ----------------------------------------------------------
            OP_STATESEPARATOR => {
                // Structural marker; executing it in an unlocking script
                // is a placement error, otherwise a no-op.
                if self.state.phase == Phase::Unlocking {
                    return Err(ScriptError::InvalidStateSeparatorLocation);
                }
            }
            OP_STATESEPARATORINDEX_UTXO => {
                self.context_ref()?;
                let idx = self.pop_index()?;
                let sep = self.context_ref()?.state_separator_index_utxo(idx)?;
                self.push_num(sep as i64)?;
            }
            OP_STATESEPARATORINDEX_OUTPUT => {
                self.context_ref()?;
                let idx = self.pop_output_index()?;
                let sep = self.context_ref()?.state_separator_index_output(idx)?;
                self.push_num(sep as i64)?;
            }
            OP_CODESCRIPTBYTECODE_UTXO => {
                self.context_ref()?;
                let idx = self.pop_index()?;
                let script = self.context_ref()?.code_script_utxo(idx)?;
                self.push(script.into_bytes())?;
            }
            OP_CODESCRIPTBYTECODE_OUTPUT => {
                self.context_ref()?;
                let idx = self.pop_output_index()?;
                let script = self.context_ref()?.code_script_output(idx)?;
                self.push(script.into_bytes())?;
            }
            OP_STATESCRIPTBYTECODE_UTXO => {
                self.context_ref()?;
                let idx = self.pop_index()?;
                let script = self.context_ref()?.state_script_utxo(idx)?;
                self.push(script.into_bytes())?;
            }
            OP_STATESCRIPTBYTECODE_OUTPUT => {
                self.context_ref()?;
                let idx = self.pop_output_index()?;
                let script = self.context_ref()?.state_script_output(idx)?;
                self.push(script.into_bytes())?;
            }

            // ----------------------------------------------------------
            // References
            // ----------------------------------------------------------
            OP_PUSHINPUTREF => {
                let r = reference_payload(data)?;
                self.state.push_refs.insert(r.clone());
                self.push(r)?;
            }
            OP_REQUIREINPUTREF => {
                let r = reference_payload(data)?;
                let ctx = self.context_ref()?;
                if !ctx.input_refs().contains(&r) {
                    return Err(ScriptError::ReferenceNotFound);
                }
                self.state.require_refs.insert(r);
            }
            OP_DISALLOWPUSHINPUTREF => {
                let r = reference_payload(data)?;
                let ctx = self.context_ref()?;
                // The reference must not appear anywhere else in the
                // transaction; the validated input's own UTXO script is
                // exempt.
                let own = ctx.input_index();
                let foreign_input = ctx
                    .input_summaries()
                    .iter()
                    .enumerate()
                    .any(|(i, s)| i != own && (s.push_refs.contains(&r) || s.singleton_refs.contains(&r)));
                if foreign_input || ctx.ref_output_carrier_count(&r) > 0 {
                    return Err(ScriptError::InvalidReference);
                }
                self.push(r)?;
            }
            OP_DISALLOWPUSHINPUTREFSIBLING => {
                let r = reference_payload(data)?;
                self.push(r)?;
            }
            OP_PUSHINPUTREFSINGLETON => {
                let r = reference_payload(data)?;
                let ctx = self.context_ref()?;
                if ctx.ref_input_carrier_count(&r) != 1 || ctx.ref_output_carrier_count(&r) != 1 {
                    return Err(ScriptError::SingletonMismatch);
                }
                self.state.singleton_refs.insert(r.clone());
                self.push(r)?;
            }

            // ----------------------------------------------------------
            // Aggregation
            // ----------------------------------------------------------
            OP_REFVALUESUM_UTXOS => {
                self.context_ref()?;
                let r = self.pop_reference()?;
                let sum = self.context_ref()?.ref_value_sum_utxos(&r);
                self.push_num(sum)?;
            }
            OP_REFVALUESUM_OUTPUTS => {
                self.context_ref()?;
                let r = self.pop_reference()?;
                let sum = self.context_ref()?.ref_value_sum_outputs(&r);
                self.push_num(sum)?;
            }
            OP_REFOUTPUTCOUNT_UTXOS => {
                self.context_ref()?;
                let r = self.pop_reference()?;
                let count = self.context_ref()?.ref_output_count_utxos(&r);
                self.push_num(count as i64)?;
            }
            OP_REFOUTPUTCOUNT_OUTPUTS => {
                self.context_ref()?;
                let r = self.pop_reference()?;
                let count = self.context_ref()?.ref_output_count_outputs(&r);
                self.push_num(count as i64)?;
            }
            OP_REFOUTPUTCOUNTZEROVALUED_UTXOS => {
                self.context_ref()?;
                let r = self.pop_reference()?;
                let count = self.context_ref()?.ref_output_count_zero_valued_utxos(&r);
                self.push_num(count as i64)?;
            }
            OP_REFOUTPUTCOUNTZEROVALUED_OUTPUTS => {
                self.context_ref()?;
                let r = self.pop_reference()?;
                let count = self.context_ref()?.ref_output_count_zero_valued_outputs(&r);
                self.push_num(count as i64)?;
            }
            OP_CODESCRIPTHASHVALUESUM_UTXOS => {
                self.context_ref()?;
                let csh = self.pop_code_script_hash()?;
                let sum = self.context_ref()?.code_script_hash_value_sum_utxos(&csh);
                self.push_num(sum)?;
            }
            OP_CODESCRIPTHASHVALUESUM_OUTPUTS => {
                self.context_ref()?;
                let csh = self.pop_code_script_hash()?;
                let sum = self.context_ref()?.code_script_hash_value_sum_outputs(&csh);
                self.push_num(sum)?;
            }
            OP_CODESCRIPTHASHOUTPUTCOUNT_UTXOS => {
                self.context_ref()?;
                let csh = self.pop_code_script_hash()?;
                let count = self.context_ref()?.code_script_hash_output_count_utxos(&csh);
                self.push_num(count as i64)?;
            }
            OP_CODESCRIPTHASHOUTPUTCOUNT_OUTPUTS => {
                self.context_ref()?;
                let csh = self.pop_code_script_hash()?;
                let count = self
                    .context_ref()?
                    .code_script_hash_output_count_outputs(&csh);
                self.push_num(count as i64)?;
            }
            OP_CODESCRIPTHASHZEROVALUEDOUTPUTCOUNT_UTXOS => {
                self.context_ref()?;
                let csh = self.pop_code_script_hash()?;
                let count = self
                    .context_ref()?
                    .code_script_hash_zero_valued_count_utxos(&csh);
                self.push_num(count as i64)?;
            }
            OP_CODESCRIPTHASHZEROVALUEDOUTPUTCOUNT_OUTPUTS => {
                self.context_ref()?;
                let csh = self.pop_code_script_hash()?;
                let count = self
                    .context_ref()?
                    .code_script_hash_zero_valued_count_outputs(&csh);
                self.push_num(count as i64)?;
            }

            _ => return Err(ScriptError::BadOpcode),
        }

        Ok(())
    }

    fn pop_reference(&mut self) -> Result<Ref> {
        let r = self.pop()?;
        if r.len() != crate::constants::REF_SIZE {
            return Err(ScriptError::InvalidReference);
        }
        Ok(r)
    }

    fn pop_code_script_hash(&mut self) -> Result<ByteString> {
        let h = self.pop()?;
        if h.len() != 32 {
            return Err(ScriptError::InvalidStackOperation);
        }
        Ok(h)
    }

    fn check_signature_encoding(&self, sig: &[u8]) -> Result<()> {
        if sig.is_empty() {
            return Ok(());
        }
        if self.flags & (SCRIPT_VERIFY_DERSIG | SCRIPT_VERIFY_STRICTENC | SCRIPT_VERIFY_LOW_S) != 0
            && !is_valid_signature_encoding(sig)
        {
            return Err(ScriptError::SigDer);
        }
        if self.flags & SCRIPT_VERIFY_STRICTENC != 0 {
            let hash_type = SighashType::from_byte(*sig.last().unwrap());
            let base = hash_type.base_type();
            if !(crate::sighash::SIGHASH_ALL..=crate::sighash::SIGHASH_SINGLE).contains(&base) {
                return Err(ScriptError::SigHashType);
            }
            if self.flags & SCRIPT_ENABLE_SIGHASH_FORKID != 0 && !hash_type.has_fork_id() {
                return Err(ScriptError::MustUseForkId);
            }
        }
        Ok(())
    }

    fn check_pubkey_encoding(&self, pubkey: &[u8]) -> Result<()> {
        if self.flags & SCRIPT_VERIFY_STRICTENC != 0 && !is_valid_pubkey(pubkey) {
            return Err(ScriptError::PubkeyType);
        }
        Ok(())
    }

    fn execute_checkmultisig(&mut self, verify: bool) -> Result<()> {
        self.need(1)?;
        let key_count = self.pop_num()?;
        if key_count < 0 || key_count as usize > MAX_PUBKEYS_PER_MULTISIG {
            return Err(ScriptError::PubkeyCount);
        }
        let key_count = key_count as usize;

        // Each key counts toward the op budget.
        self.state.op_count += key_count;
        if self.state.op_count > MAX_OPS_PER_SCRIPT {
            return Err(ScriptError::OpCount);
        }

        self.need(key_count)?;
        let mut pubkeys = Vec::with_capacity(key_count);
        for _ in 0..key_count {
            pubkeys.push(self.pop()?);
        }
        // Popping yields top-first; matching walks keys bottom-first.
        pubkeys.reverse();

        self.need(1)?;
        let sig_count = self.pop_num()?;
        if sig_count < 0 || sig_count as usize > key_count {
            return Err(ScriptError::SigCount);
        }
        let sig_count = sig_count as usize;

        self.need(sig_count)?;
        let mut sigs = Vec::with_capacity(sig_count);
        for _ in 0..sig_count {
            sigs.push(self.pop()?);
        }
        sigs.reverse();

        // Historical off-by-one: one extra element is consumed.
        let dummy = self.pop()?;
        if self.flags & SCRIPT_VERIFY_NULLDUMMY != 0 && !dummy.is_empty() {
            return Err(ScriptError::SigNullDummy);
        }

        let mut script_code = self.script_code();
        for sig in &sigs {
            script_code = script_code.find_and_delete(sig);
        }

        // Signatures must appear in key order; keys that fail one
        // comparison are never retried.
        let mut ok = true;
        let mut isig = 0;
        let mut ikey = 0;
        let mut sigs_remaining = sig_count;
        let mut keys_remaining = key_count;
        while sigs_remaining > 0 {
            if sigs_remaining > keys_remaining {
                ok = false;
                break;
            }
            let sig = &sigs[isig];
            let pubkey = &pubkeys[ikey];

            self.check_signature_encoding(sig)?;
            self.check_pubkey_encoding(pubkey)?;

            if self.checker.check_sig(sig, pubkey, &script_code) {
                isig += 1;
                sigs_remaining -= 1;
            }
            ikey += 1;
            keys_remaining -= 1;
        }

        if !ok && self.flags & SCRIPT_VERIFY_NULLFAIL != 0 && sigs.iter().any(|s| !s.is_empty()) {
            return Err(ScriptError::SigNullFail);
        }

        self.push_bool(ok)?;
        if verify {
            self.pop()?;
            if !ok {
                return Err(ScriptError::CheckMultiSigVerify);
            }
        }
        Ok(())
    }
}

/// Reference opcodes carry their payload inline; the reader guarantees the
/// width, this guards the impossible case of a missing payload.
fn reference_payload(data: Option<&[u8]>) -> Result<Ref> {
    match data {
        Some(d) if d.len() == crate::constants::REF_SIZE => Ok(d.to_vec()),
        _ => Err(ScriptError::InvalidReference),
    }
}

/// Length-preserving bit shift over a byte string, big-endian within each
/// byte: shifting left moves bits toward byte 0's high bit. Bits shifted
/// past either end are discarded; vacated positions fill with zero.
fn shift_bytes(data: &[u8], count: usize, left: bool) -> Vec<u8> {
    let len = data.len();
    if len == 0 {
        return Vec::new();
    }
    let full = count / 8;
    let bits = (count % 8) as u32;
    let mut out = vec![0u8; len];

    if full >= len {
        return out;
    }

    for i in 0..len {
        if left {
            let src = i + full;
            if src < len {
                out[i] |= data[src] << bits;
            }
            if bits > 0 && src + 1 < len {
                out[i] |= data[src + 1] >> (8 - bits);
            }
        } else {
            let src = i as isize - full as isize;
            if src >= 0 {
                out[i] |= data[src as usize] >> bits;
            }
            if bits > 0 && src - 1 >= 0 {
                out[i] |= data[(src - 1) as usize] << (8 - bits);
            }
        }
    }
    out
}
