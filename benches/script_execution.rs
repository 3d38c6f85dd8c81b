//! Script execution benchmarks

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rxdvm::interpreter::Interpreter;
use rxdvm::opcodes::*;
use rxdvm::script::Script;
use rxdvm::signature::SignatureChecker;

fn bench_arithmetic(c: &mut Criterion) {
    let script = Script::from_bytes(vec![
        OP_1, OP_2, OP_ADD, OP_3, OP_MUL, OP_DUP, OP_ADD, OP_9, OP_2MUL, OP_NUMEQUAL,
    ]);
    c.bench_function("arithmetic_script", |b| {
        b.iter(|| {
            let mut vm = Interpreter::new(
                Script::new(),
                black_box(script.clone()),
                0,
                SignatureChecker::Dummy,
                None,
            );
            vm.run()
        })
    });
}

fn bench_hash_opcodes(c: &mut Criterion) {
    let script = Script::new()
        .push_data(&[0xabu8; 512])
        .push_opcode(OP_BLAKE3)
        .push_opcode(OP_DROP)
        .push_opcode(OP_1);
    c.bench_function("blake3_512b", |b| {
        b.iter(|| {
            let mut vm = Interpreter::new(
                Script::new(),
                black_box(script.clone()),
                0,
                SignatureChecker::Dummy,
                None,
            );
            vm.run()
        })
    });

    let script = Script::new()
        .push_data(&[0xabu8; 512])
        .push_opcode(OP_K12)
        .push_opcode(OP_DROP)
        .push_opcode(OP_1);
    c.bench_function("k12_512b", |b| {
        b.iter(|| {
            let mut vm = Interpreter::new(
                Script::new(),
                black_box(script.clone()),
                0,
                SignatureChecker::Dummy,
                None,
            );
            vm.run()
        })
    });
}

fn bench_stepping_overhead(c: &mut Criterion) {
    let script: Vec<u8> = std::iter::repeat(OP_NOP).take(200).chain([OP_1]).collect();
    let script = Script::from_bytes(script);
    c.bench_function("step_200_nops", |b| {
        b.iter(|| {
            let mut vm = Interpreter::new(
                Script::new(),
                black_box(script.clone()),
                0,
                SignatureChecker::Dummy,
                None,
            )
            .with_history_depth(16);
            vm.run()
        })
    });
}

criterion_group!(
    benches,
    bench_arithmetic,
    bench_hash_opcodes,
    bench_stepping_overhead
);
criterion_main!(benches);
