//! Introspection, state-separator and reference opcodes end-to-end

use rxdvm::context::ExecutionContext;
use rxdvm::error::ScriptError;
use rxdvm::interpreter::Interpreter;
use rxdvm::opcodes::*;
use rxdvm::script::Script;
use rxdvm::signature::SignatureChecker;
use rxdvm::types::{Coin, OutPoint, Transaction, TxBuilder};

fn two_input_tx() -> Transaction {
    TxBuilder::new()
        .version(2)
        .lock_time(77)
        .input(
            OutPoint::new([0x01; 32], 5),
            Script::from_bytes(vec![OP_1]),
            0xffff_fffe,
        )
        .input(
            OutPoint::new([0x02; 32], 9),
            Script::from_bytes(vec![OP_2]),
            0xffff_ffff,
        )
        .output(30_000, Script::from_bytes(vec![OP_DUP]))
        .output(40_000, Script::from_bytes(vec![OP_DROP]))
        .output(50_000, Script::new())
        .build()
}

fn context_for(tx: &Transaction, input_index: usize) -> ExecutionContext {
    let coins = vec![
        Coin::new(111_000, Script::from_bytes(vec![OP_RETURN])),
        Coin::new(222_000, Script::new()),
    ];
    ExecutionContext::new(tx.clone(), coins, input_index)
}

fn run_with_context(script: Script, ctx: ExecutionContext) -> (bool, ScriptError) {
    let mut vm = Interpreter::new(
        Script::new(),
        script,
        0,
        SignatureChecker::Dummy,
        Some(ctx),
    );
    let ok = vm.run();
    (ok, vm.error())
}

fn expect_ok(script: Script, ctx: ExecutionContext) {
    let (ok, err) = run_with_context(script, ctx);
    assert!(ok, "expected success, got {err:?}");
}

#[test]
fn input_index() {
    let tx = two_input_tx();
    expect_ok(
        Script::from_bytes(vec![OP_INPUTINDEX, OP_0, OP_NUMEQUAL]),
        context_for(&tx, 0),
    );
    expect_ok(
        Script::from_bytes(vec![OP_INPUTINDEX, OP_1, OP_NUMEQUAL]),
        context_for(&tx, 1),
    );
}

#[test]
fn transaction_wide_queries() {
    let tx = two_input_tx();
    expect_ok(
        Script::from_bytes(vec![OP_TXINPUTCOUNT, OP_2, OP_NUMEQUAL]),
        context_for(&tx, 0),
    );
    expect_ok(
        Script::from_bytes(vec![OP_TXOUTPUTCOUNT, OP_3, OP_NUMEQUAL]),
        context_for(&tx, 0),
    );
    expect_ok(
        Script::from_bytes(vec![OP_TXVERSION, OP_2, OP_NUMEQUAL]),
        context_for(&tx, 0),
    );
    expect_ok(
        Script::new()
            .push_opcode(OP_TXLOCKTIME)
            .push_int(77)
            .push_opcode(OP_NUMEQUAL),
        context_for(&tx, 0),
    );
}

#[test]
fn utxo_queries() {
    let tx = two_input_tx();
    expect_ok(
        Script::new()
            .push_opcode(OP_0)
            .push_opcode(OP_UTXOVALUE)
            .push_int(111_000)
            .push_opcode(OP_NUMEQUAL),
        context_for(&tx, 0),
    );
    expect_ok(
        Script::new()
            .push_opcode(OP_0)
            .push_opcode(OP_UTXOBYTECODE)
            .push_data(&[OP_RETURN])
            .push_opcode(OP_EQUAL),
        context_for(&tx, 0),
    );
}

#[test]
fn outpoint_queries() {
    let tx = two_input_tx();
    expect_ok(
        Script::new()
            .push_opcode(OP_0)
            .push_opcode(OP_OUTPOINTTXHASH)
            .push_data(&[0x01; 32])
            .push_opcode(OP_EQUAL),
        context_for(&tx, 0),
    );
    expect_ok(
        Script::new()
            .push_opcode(OP_1)
            .push_opcode(OP_OUTPOINTINDEX)
            .push_int(9)
            .push_opcode(OP_NUMEQUAL),
        context_for(&tx, 0),
    );
}

#[test]
fn input_and_output_queries() {
    let tx = two_input_tx();
    expect_ok(
        Script::new()
            .push_opcode(OP_1)
            .push_opcode(OP_INPUTBYTECODE)
            .push_data(&[OP_2])
            .push_opcode(OP_EQUAL),
        context_for(&tx, 0),
    );
    expect_ok(
        Script::new()
            .push_opcode(OP_1)
            .push_opcode(OP_INPUTSEQUENCENUMBER)
            .push_int(0xffff_ffff)
            .push_opcode(OP_NUMEQUAL),
        context_for(&tx, 0),
    );
    expect_ok(
        Script::new()
            .push_opcode(OP_1)
            .push_opcode(OP_OUTPUTVALUE)
            .push_int(40_000)
            .push_opcode(OP_NUMEQUAL),
        context_for(&tx, 0),
    );
    expect_ok(
        Script::new()
            .push_opcode(OP_0)
            .push_opcode(OP_OUTPUTBYTECODE)
            .push_data(&[OP_DUP])
            .push_opcode(OP_EQUAL),
        context_for(&tx, 0),
    );
}

#[test]
fn out_of_range_index_classification() {
    let tx = two_input_tx();
    let (ok, err) = run_with_context(
        Script::from_bytes(vec![OP_16, OP_UTXOVALUE]),
        context_for(&tx, 0),
    );
    assert!(!ok);
    assert_eq!(err, ScriptError::InvalidTxInputIndex);

    let (ok, err) = run_with_context(
        Script::from_bytes(vec![OP_16, OP_OUTPUTVALUE]),
        context_for(&tx, 0),
    );
    assert!(!ok);
    assert_eq!(err, ScriptError::InvalidTxOutputIndex);
}

#[test]
fn missing_context_fails_all_introspection() {
    for op in [
        OP_INPUTINDEX,
        OP_TXVERSION,
        OP_TXINPUTCOUNT,
        OP_TXOUTPUTCOUNT,
        OP_TXLOCKTIME,
    ] {
        let mut vm = Interpreter::new(
            Script::new(),
            Script::from_bytes(vec![op]),
            0,
            SignatureChecker::Dummy,
            None,
        );
        assert!(!vm.run());
        assert_eq!(vm.error(), ScriptError::IntrospectionContextUnavailable);
    }
}

// ---------------------------------------------------------------------
// State separator
// ---------------------------------------------------------------------

fn stateful_output_script() -> Script {
    // state: push [0x99]; code: OP_DUP OP_DROP OP_1
    Script::from_bytes(vec![
        0x01,
        0x99,
        OP_STATESEPARATOR,
        OP_DUP,
        OP_DROP,
        OP_1,
    ])
}

#[test]
fn state_separator_indexes() {
    let tx = TxBuilder::new()
        .input(OutPoint::new([0x04; 32], 0), Script::new(), 0xffff_ffff)
        .output(10, stateful_output_script())
        .build();
    let coins = vec![Coin::new(500, stateful_output_script())];
    let ctx = ExecutionContext::new(tx, coins, 0);

    // Both the UTXO and output separators sit at byte offset 2.
    expect_ok(
        Script::from_bytes(vec![OP_0, OP_STATESEPARATORINDEX_UTXO, OP_2, OP_NUMEQUAL]),
        ctx.clone(),
    );
    expect_ok(
        Script::from_bytes(vec![OP_0, OP_STATESEPARATORINDEX_OUTPUT, OP_2, OP_NUMEQUAL]),
        ctx,
    );
}

#[test]
fn code_and_state_script_views() {
    let tx = TxBuilder::new()
        .input(OutPoint::new([0x04; 32], 0), Script::new(), 0xffff_ffff)
        .output(10, stateful_output_script())
        .build();
    let coins = vec![Coin::new(500, stateful_output_script())];
    let ctx = ExecutionContext::new(tx, coins, 0);

    expect_ok(
        Script::new()
            .push_opcode(OP_0)
            .push_opcode(OP_CODESCRIPTBYTECODE_OUTPUT)
            .push_data(&[OP_DUP, OP_DROP, OP_1])
            .push_opcode(OP_EQUAL),
        ctx.clone(),
    );
    expect_ok(
        Script::new()
            .push_opcode(OP_0)
            .push_opcode(OP_STATESCRIPTBYTECODE_OUTPUT)
            .push_data(&[0x01, 0x99])
            .push_opcode(OP_EQUAL),
        ctx.clone(),
    );
    expect_ok(
        Script::new()
            .push_opcode(OP_0)
            .push_opcode(OP_CODESCRIPTBYTECODE_UTXO)
            .push_data(&[OP_DUP, OP_DROP, OP_1])
            .push_opcode(OP_EQUAL),
        ctx,
    );
}

#[test]
fn absent_separator_yields_sentinel_and_empty_state() {
    let tx = TxBuilder::new()
        .input(OutPoint::new([0x04; 32], 0), Script::new(), 0xffff_ffff)
        .output(10, Script::from_bytes(vec![OP_1]))
        .build();
    let ctx = ExecutionContext::new(tx, vec![Coin::default()], 0);

    expect_ok(
        Script::new()
            .push_opcode(OP_0)
            .push_opcode(OP_STATESEPARATORINDEX_OUTPUT)
            .push_int(0xffff_ffff)
            .push_opcode(OP_NUMEQUAL),
        ctx.clone(),
    );
    expect_ok(
        Script::new()
            .push_opcode(OP_0)
            .push_opcode(OP_STATESCRIPTBYTECODE_OUTPUT)
            .push_opcode(OP_0)
            .push_opcode(OP_EQUAL),
        ctx,
    );
}

// ---------------------------------------------------------------------
// References
// ---------------------------------------------------------------------

fn ref_bytes(tag: u8, index: u32) -> Vec<u8> {
    let mut r = vec![tag; 32];
    r.extend_from_slice(&index.to_le_bytes());
    r
}

fn script_with_ref(opcode: u8, r: &[u8]) -> Script {
    let mut bytes = vec![opcode];
    bytes.extend_from_slice(r);
    Script::from_bytes(bytes)
}

#[test]
fn require_input_ref() {
    let r = ref_bytes(0xaa, 0);
    let carrier = script_with_ref(OP_PUSHINPUTREF, &r);

    let tx = TxBuilder::new()
        .input(OutPoint::new([0x0a; 32], 0), Script::new(), 0xffff_ffff)
        .output(10, Script::new())
        .build();
    let ctx = ExecutionContext::new(tx.clone(), vec![Coin::new(5, carrier)], 0);

    // Present in an input UTXO: succeeds and pushes nothing.
    let script = script_with_ref(OP_REQUIREINPUTREF, &r).push_opcode(OP_1);
    expect_ok(script, ctx);

    // Absent: ReferenceNotFound.
    let ctx_empty = ExecutionContext::new(tx, vec![Coin::default()], 0);
    let script = script_with_ref(OP_REQUIREINPUTREF, &r).push_opcode(OP_1);
    let (ok, err) = run_with_context(script, ctx_empty);
    assert!(!ok);
    assert_eq!(err, ScriptError::ReferenceNotFound);
}

#[test]
fn push_input_ref_pushes_payload() {
    let r = ref_bytes(0xbb, 1);
    let tx = TxBuilder::new()
        .input(OutPoint::new([0x0a; 32], 0), Script::new(), 0xffff_ffff)
        .output(10, Script::new())
        .build();
    let ctx = ExecutionContext::new(tx, vec![Coin::default()], 0);

    let script = script_with_ref(OP_PUSHINPUTREF, &r)
        .push_data(&r)
        .push_opcode(OP_EQUAL);
    expect_ok(script, ctx);
}

#[test]
fn singleton_requires_one_each_side() {
    let r = ref_bytes(0xcc, 2);
    let carrier = script_with_ref(OP_PUSHINPUTREFSINGLETON, &r);

    // Exactly one carrier on each side: succeeds.
    let tx = TxBuilder::new()
        .input(OutPoint::new([0x0a; 32], 0), Script::new(), 0xffff_ffff)
        .output(10, carrier.clone())
        .build();
    let ctx = ExecutionContext::new(tx, vec![Coin::new(5, carrier.clone())], 0);
    let script = script_with_ref(OP_PUSHINPUTREFSINGLETON, &r).push_opcode(OP_DROP).push_opcode(OP_1);
    expect_ok(script, ctx);

    // Two output carriers: SingletonMismatch.
    let tx2 = TxBuilder::new()
        .input(OutPoint::new([0x0a; 32], 0), Script::new(), 0xffff_ffff)
        .output(10, carrier.clone())
        .output(20, carrier.clone())
        .build();
    let ctx2 = ExecutionContext::new(tx2, vec![Coin::new(5, carrier)], 0);
    let script = script_with_ref(OP_PUSHINPUTREFSINGLETON, &r).push_opcode(OP_DROP).push_opcode(OP_1);
    let (ok, err) = run_with_context(script, ctx2);
    assert!(!ok);
    assert_eq!(err, ScriptError::SingletonMismatch);
}

#[test]
fn disallow_push_input_ref() {
    let r = ref_bytes(0xdd, 3);
    let carrier = script_with_ref(OP_PUSHINPUTREF, &r);

    // The reference appears in an output: disallowed.
    let tx = TxBuilder::new()
        .input(OutPoint::new([0x0a; 32], 0), Script::new(), 0xffff_ffff)
        .output(10, carrier)
        .build();
    let ctx = ExecutionContext::new(tx.clone(), vec![Coin::default()], 0);
    let script = script_with_ref(OP_DISALLOWPUSHINPUTREF, &r)
        .push_opcode(OP_DROP)
        .push_opcode(OP_1);
    let (ok, err) = run_with_context(script, ctx);
    assert!(!ok);
    assert_eq!(err, ScriptError::InvalidReference);

    // Nowhere else in the transaction: allowed.
    let tx_clean = TxBuilder::new()
        .input(OutPoint::new([0x0a; 32], 0), Script::new(), 0xffff_ffff)
        .output(10, Script::new())
        .build();
    let ctx_clean = ExecutionContext::new(tx_clean, vec![Coin::default()], 0);
    let script = script_with_ref(OP_DISALLOWPUSHINPUTREF, &r)
        .push_opcode(OP_DROP)
        .push_opcode(OP_1);
    expect_ok(script, ctx_clean);
}

#[test]
fn truncated_reference_payload() {
    let mut bytes = vec![OP_PUSHINPUTREF];
    bytes.extend_from_slice(&[0xee; 20]);
    let (ok, err) = run_with_context(
        Script::from_bytes(bytes),
        ExecutionContext::minimal(),
    );
    assert!(!ok);
    assert_eq!(err, ScriptError::InvalidReference);
}

// ---------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------

#[test]
fn ref_value_sums_and_counts() {
    let r = ref_bytes(0x77, 0);
    let carrier = script_with_ref(OP_PUSHINPUTREF, &r);

    let tx = TxBuilder::new()
        .input(OutPoint::new([0x0a; 32], 0), Script::new(), 0xffff_ffff)
        .output(100, carrier.clone())
        .output(250, carrier.clone())
        .output(0, carrier.clone())
        .build();
    let ctx = ExecutionContext::new(tx, vec![Coin::new(30, carrier)], 0);

    expect_ok(
        Script::new()
            .push_data(&r)
            .push_opcode(OP_REFVALUESUM_OUTPUTS)
            .push_int(350)
            .push_opcode(OP_NUMEQUAL),
        ctx.clone(),
    );
    expect_ok(
        Script::new()
            .push_data(&r)
            .push_opcode(OP_REFVALUESUM_UTXOS)
            .push_int(30)
            .push_opcode(OP_NUMEQUAL),
        ctx.clone(),
    );
    expect_ok(
        Script::new()
            .push_data(&r)
            .push_opcode(OP_REFOUTPUTCOUNT_OUTPUTS)
            .push_int(3)
            .push_opcode(OP_NUMEQUAL),
        ctx.clone(),
    );
    expect_ok(
        Script::new()
            .push_data(&r)
            .push_opcode(OP_REFOUTPUTCOUNTZEROVALUED_OUTPUTS)
            .push_int(1)
            .push_opcode(OP_NUMEQUAL),
        ctx,
    );
}

#[test]
fn code_script_hash_aggregation() {
    let code = vec![OP_DUP, OP_DROP, OP_1];
    let mut s1 = vec![0x01, 0xaa, OP_STATESEPARATOR];
    s1.extend_from_slice(&code);
    let mut s2 = vec![0x01, 0xbb, OP_STATESEPARATOR];
    s2.extend_from_slice(&code);

    let tx = TxBuilder::new()
        .input(OutPoint::new([0x0a; 32], 0), Script::new(), 0xffff_ffff)
        .output(100, Script::from_bytes(s1))
        .output(50, Script::from_bytes(s2))
        .build();
    let ctx = ExecutionContext::new(tx, vec![Coin::default()], 0);

    let csh = rxdvm::crypto::hash256(&code);
    expect_ok(
        Script::new()
            .push_data(&csh)
            .push_opcode(OP_CODESCRIPTHASHVALUESUM_OUTPUTS)
            .push_int(150)
            .push_opcode(OP_NUMEQUAL),
        ctx.clone(),
    );
    expect_ok(
        Script::new()
            .push_data(&csh)
            .push_opcode(OP_CODESCRIPTHASHOUTPUTCOUNT_OUTPUTS)
            .push_int(2)
            .push_opcode(OP_NUMEQUAL),
        ctx,
    );
}
