//! # Instruction Semantics
//!
//! Runs small listings end to end and checks exit codes and final stacks.

use cmavm_core::core::Status;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::TestContext;

#[test]
fn test_add_exits_with_sum() {
    assert_eq!(TestContext::new().exit_code("loadc 3\nloadc 4\nadd\nhalt\n"), 7);
}

#[test]
fn test_jumpz_taken_branch() {
    let source = "loadc 0\njumpz 4\nloadc 1\nhalt\nloadc 2\nhalt\n";
    assert_eq!(TestContext::new().exit_code(source), 2);
}

#[test]
fn test_jumpz_not_taken_and_jumpnz() {
    let ctx = TestContext::new();
    assert_eq!(ctx.exit_code("loadc 5\njumpz 4\nloadc 1\nhalt\nloadc 2\nhalt\n"), 1);
    assert_eq!(ctx.exit_code("loadc 5\njumpnz 4\nloadc 1\nhalt\nloadc 2\nhalt\n"), 2);
}

#[rstest]
#[case("add", 17, 5, 22)]
#[case("sub", 17, 5, 12)]
#[case("mul", -4, 6, -24)]
#[case("div", -17, 5, -3)]
#[case("mod", -17, 5, 3)]
#[case("mod", 17, -5, -3)]
#[case("and", 12, 10, 8)]
#[case("or", 12, 10, 14)]
#[case("xor", 12, 10, 6)]
#[case("eq", 3, 3, 1)]
#[case("neq", 3, 3, 0)]
#[case("le", 2, 3, 1)]
#[case("leq", 3, 3, 1)]
#[case("gr", 2, 3, 0)]
#[case("geq", 2, 3, 0)]
#[case("add", i32::MAX, 1, i32::MIN)]
fn test_binary_operators(#[case] op: &str, #[case] a: i32, #[case] b: i32, #[case] expected: i32) {
    let source = format!("loadc {a}\nloadc {b}\n{op}\nhalt\n");
    assert_eq!(TestContext::new().exit_code(&source), expected);
}

#[rstest]
#[case("neg", 5, -5)]
#[case("neg", i32::MIN, i32::MIN)]
#[case("not", 0, 1)]
#[case("not", 7, 0)]
fn test_unary_operators(#[case] op: &str, #[case] a: i32, #[case] expected: i32) {
    let source = format!("loadc {a}\n{op}\nhalt\n");
    assert_eq!(TestContext::new().exit_code(&source), expected);
}

#[test]
fn test_halt_with_operand_ignores_the_stack() {
    let machine = TestContext::new().machine_after("loadc 9\nhalt 3\n");
    assert_eq!(machine.status(), &Status::Halted(3));
    assert_eq!(machine.stack(), &[9]);
}

#[test]
fn test_halt_without_operand_keeps_the_exit_value() {
    let machine = TestContext::new().machine_after("loadc 9\nhalt\n");
    assert_eq!(machine.status(), &Status::Halted(9));
    assert_eq!(machine.stack(), &[9]);
}

#[rstest]
#[case("loadc 1\nloadc 2\nloadc 3\nslide 2\nhalt", &[3])]
#[case("loadc 1\nloadc 2\nloadc 3\nslide 1 2\nhalt", &[2, 3])]
#[case("loadc 1\nloadc 2\nslide 0 2\nhalt", &[1, 2])]
#[case("loadc 1\nloadc 2\nloadc 3\npop 2\nhalt", &[1])]
#[case("loadc 4\ndup\nhalt", &[4, 4])]
#[case("loadc 7\nalloc 3\nhalt 0", &[7, 0, 0, 0])]
#[case("nop\nloadc 1\nhalt", &[1])]
fn test_stack_shaping(#[case] source: &str, #[case] expected: &[i32]) {
    let machine = TestContext::new().machine_after(source);
    assert!(matches!(machine.status(), Status::Halted(_)));
    assert_eq!(machine.stack(), expected);
}

#[test]
fn test_absolute_load_and_store() {
    // S[0] = 5; S[1] = 8; storea copies the top into S[0] and keeps it.
    let source = "loadc 5\nloadc 8\nstorea 0\nloada 0\nhalt\n";
    let machine = TestContext::new().machine_after(source);
    assert_eq!(machine.stack(), &[8, 8, 8]);
}

#[test]
fn test_indirect_load_and_store_of_blocks() {
    let source = "\
        alloc 2         # S[0], S[1]
        loadc 10
        loadc 20
        loadc 0         # address of S[0]
        store 2         # S[0..2] = [10, 20]; values stay
        pop 2
        loadc 0
        load 2          # push S[0], S[1]
        add
        halt
";
    assert_eq!(TestContext::new().exit_code(source), 30);
}

#[test]
fn test_zero_width_load_consumes_the_address() {
    let machine = TestContext::new().machine_after("loadc 1\nloadc 0\nload 0\nhalt");
    assert_eq!(machine.stack(), &[1]);
}

#[test]
fn test_jump_table() {
    let listing = |index: i32| {
        format!(
            "\
        loadc {index}
        jumpi table
table:  jump case0
        jump case1
case0:  halt 10
case1:  halt 20
"
        )
    };
    let ctx = TestContext::new();
    assert_eq!(ctx.exit_code(&listing(0)), 10);
    assert_eq!(ctx.exit_code(&listing(1)), 20);
}

#[test]
fn test_countdown_loop() {
    let source = "\
        loadc 0         # S[0] accumulator
        loadc 5         # S[1] counter
loop:   loada 1
        jumpz done
        loada 0
        loada 1
        add
        storea 0
        pop
        loada 1
        loadc 1
        sub
        storea 1
        pop
        jump loop
done:   loada 0
        halt
";
    assert_eq!(TestContext::new().exit_code(source), 15);
}

#[test]
fn test_label_as_constant_enables_indirect_call() {
    let source = "loadc f\ncall\nhalt\nf: loadc 9\nreturn 1\n";
    assert_eq!(TestContext::new().exit_code(source), 9);
}

#[test]
fn test_stepping_a_halted_machine_is_a_no_op() {
    let ctx = TestContext::new();
    let program = ctx.assemble("halt 4\nloadc 1\n");
    let mut machine = ctx.machine_after("halt 4\nloadc 1\n");
    let before = machine.stats.steps;
    assert!(machine.step(&program).is_ok());
    assert_eq!(machine.stats.steps, before);
    assert_eq!(machine.depth(), 0);
}
