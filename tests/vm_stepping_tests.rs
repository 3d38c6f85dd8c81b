//! Step, rewind and reset behavior of the debugger interface

use rxdvm::interpreter::{Interpreter, Phase};
use rxdvm::opcodes::*;
use rxdvm::script::Script;
use rxdvm::signature::SignatureChecker;

fn vm_for(script: Vec<u8>) -> Interpreter {
    Interpreter::new(
        Script::new(),
        Script::from_bytes(script),
        0,
        SignatureChecker::Dummy,
        None,
    )
}

#[test]
fn step_through_script() {
    let mut vm = vm_for(vec![OP_1, OP_2, OP_ADD]);

    assert!(!vm.is_done());
    assert!(vm.is_at_start());

    assert!(vm.step());
    assert_eq!(vm.state().stack.len(), 1);

    assert!(vm.step());
    assert_eq!(vm.state().stack.len(), 2);

    assert!(vm.step());
    assert_eq!(vm.state().stack.len(), 1);

    assert!(!vm.step());
    assert!(vm.is_done());
    assert!(vm.state().success);
}

#[test]
fn rewind_restores_previous_state() {
    let mut vm = vm_for(vec![OP_1, OP_2, OP_ADD]);

    vm.step();
    vm.step();
    assert_eq!(vm.state().stack.len(), 2);

    assert!(vm.rewind());
    assert_eq!(vm.state().stack.len(), 1);

    assert!(vm.rewind());
    assert_eq!(vm.state().stack.len(), 0);
    assert!(vm.is_at_start());
    assert!(!vm.rewind());
}

#[test]
fn rewind_symmetry_is_bit_exact() {
    let script = vec![
        OP_1, OP_2, OP_ADD, OP_DUP, OP_3, OP_NUMEQUAL, OP_VERIFY, OP_1,
    ];
    for k in 1..=6 {
        let mut vm = vm_for(script.clone());
        let initial = vm.state().clone();

        for _ in 0..k {
            vm.step();
        }
        for _ in 0..k {
            assert!(vm.rewind());
        }

        let rewound = vm.state();
        assert_eq!(rewound.stack, initial.stack);
        assert_eq!(rewound.altstack, initial.altstack);
        assert_eq!(rewound.cond_stack, initial.cond_stack);
        assert_eq!(rewound.pc, initial.pc);
        assert_eq!(rewound.op_index, initial.op_index);
        assert_eq!(rewound.op_count, initial.op_count);
        assert_eq!(rewound.done, initial.done);
        assert_eq!(rewound.success, initial.success);
        assert_eq!(rewound.error, initial.error);
    }
}

#[test]
fn reset_returns_to_start() {
    let mut vm = vm_for(vec![OP_1, OP_2, OP_ADD]);
    vm.run();
    assert!(vm.is_done());

    vm.reset();
    assert!(!vm.is_done());
    assert!(vm.is_at_start());
    assert!(vm.state().stack.is_empty());

    // A reset VM runs again to the same verdict.
    assert!(vm.run());
}

#[test]
fn phase_transition_on_script_boundary() {
    let mut vm = Interpreter::new(
        Script::from_bytes(vec![OP_5]),
        Script::from_bytes(vec![OP_3, OP_ADD]),
        0,
        SignatureChecker::Dummy,
        None,
    );
    assert_eq!(vm.state().phase, Phase::Unlocking);

    vm.step(); // OP_5
    assert_eq!(vm.state().phase, Phase::Unlocking);

    vm.step(); // boundary: hand the stack to the locking script
    assert_eq!(vm.state().phase, Phase::Locking);
    assert_eq!(vm.state().pc, 0);
    assert_eq!(vm.state().stack.len(), 1);

    assert!(vm.run());
}

#[test]
fn empty_unlocking_script_starts_in_locking_phase() {
    let vm = Interpreter::new(
        Script::new(),
        Script::from_bytes(vec![OP_1]),
        0,
        SignatureChecker::Dummy,
        None,
    );
    assert_eq!(vm.state().phase, Phase::Locking);
}

#[test]
fn rewind_across_phase_boundary() {
    let mut vm = Interpreter::new(
        Script::from_bytes(vec![OP_5]),
        Script::from_bytes(vec![OP_3, OP_ADD]),
        0,
        SignatureChecker::Dummy,
        None,
    );
    vm.step(); // OP_5
    vm.step(); // boundary
    vm.step(); // OP_3
    assert_eq!(vm.state().phase, Phase::Locking);

    vm.rewind();
    vm.rewind();
    assert_eq!(vm.state().phase, Phase::Unlocking);
    assert_eq!(vm.state().stack.len(), 1);
}

#[test]
fn failing_step_reports_error_not_panic() {
    // Malformed push data: declared length runs past the script end.
    let mut vm = vm_for(vec![0x05, 0x01]);
    assert!(!vm.run());
    assert!(vm.is_done());
    assert!(!vm.state().success);
    assert_ne!(vm.error(), rxdvm::ScriptError::Ok);
}

#[test]
fn history_ring_respects_cap() {
    let script: Vec<u8> = std::iter::repeat(OP_NOP).take(30).chain([OP_1]).collect();
    let mut vm = Interpreter::new(
        Script::new(),
        Script::from_bytes(script),
        0,
        SignatureChecker::Dummy,
        None,
    )
    .with_history_depth(5);
    vm.run();
    assert!(vm.history_depth() <= 5);

    // Rewind stops once the ring is exhausted.
    let mut rewinds = 0;
    while vm.rewind() {
        rewinds += 1;
    }
    assert!(rewinds <= 5);
}
