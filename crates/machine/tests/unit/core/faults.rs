//! # Runtime Faults
//!
//! Each fault class, the pc and instruction it is attributed to, the
//! machine state it leaves behind, and the guarantee that nothing executes
//! after it.

use cmavm_core::common::constants::DEFAULT_HEAP_BASE;
use cmavm_core::common::{AccessType, FaultKind, RuntimeFault, Word};
use cmavm_core::core::Status;
use cmavm_core::isa::{BinaryOp, Instruction};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::TestContext;

#[test]
fn test_add_on_empty_stack() {
    let fault = TestContext::new().fault("add\nhalt\n");
    assert_eq!(
        fault,
        RuntimeFault {
            kind: FaultKind::StackUnderflow {
                needed: 2,
                available: 0
            },
            pc: 0,
            instruction: Some(Instruction::Binary(BinaryOp::Add)),
            stack_depth: 0,
        }
    );
}

#[rstest]
#[case::pop_too_many("loadc 1\npop 2\nhalt")]
#[case::slide_too_deep("loadc 1\nloadc 2\nslide 2 1\nhalt")]
#[case::store_without_cells("loadc 0\nstore 1\nhalt")]
#[case::dup_empty("dup\nhalt")]
#[case::jumpz_empty("jumpz 0")]
#[case::new_empty("new\nhalt")]
#[case::halt_empty("halt")]
#[case::indirect_call_empty("call\nhalt")]
fn test_underflow_cases(#[case] source: &str) {
    assert!(matches!(
        TestContext::new().fault_kind(source),
        FaultKind::StackUnderflow { .. }
    ));
}

#[rstest]
#[case::push_past_limit("loadc 1\nloadc 2\nloadc 3\nloadc 4\nhalt", 3)]
#[case::dup_past_limit("loadc 1\ndup\ndup\nhalt", 2)]
#[case::alloc_past_limit("alloc 5\nhalt 0", 4)]
#[case::load_past_limit("loadc 0\nload 3\nhalt", 2)]
#[case::call_frame_past_limit("loadc 1\ncall 2\nhalt", 2)]
fn test_overflow_cases(#[case] source: &str, #[case] limit: usize) {
    assert_eq!(
        TestContext::new()
            .with_stack_limit(limit)
            .fault_kind(source),
        FaultKind::StackOverflow { limit }
    );
}

#[test]
fn test_unbounded_recursion_overflows() {
    let fault = TestContext::new()
        .with_stack_limit(64)
        .fault("f: call f\n");
    assert_eq!(fault.kind, FaultKind::StackOverflow { limit: 64 });
    assert_eq!(fault.stack_depth, 64);
}

#[rstest]
#[case("div")]
#[case("mod")]
fn test_division_by_zero(#[case] op: &str) {
    let source = format!("loadc 7\nloadc 0\n{op}\nhalt");
    let fault = TestContext::new().fault(&source);
    assert_eq!(fault.kind, FaultKind::ArithmeticError);
    assert_eq!(fault.pc, 2);
}

#[test]
fn test_computed_jump_out_of_range() {
    let source = "loadc 7\njumpi 2\nhalt 0\nhalt 1\n";
    assert_eq!(
        TestContext::new().fault_kind(source),
        FaultKind::InvalidJumpTarget { target: 9, len: 4 }
    );
    let negative = "loadc -3\njumpi 2\nhalt 0\nhalt 1\n";
    assert_eq!(
        TestContext::new().fault_kind(negative),
        FaultKind::InvalidJumpTarget { target: -1, len: 4 }
    );
}

#[test]
fn test_indirect_call_out_of_range() {
    assert_eq!(
        TestContext::new().fault_kind("loadc 50\ncall\n"),
        FaultKind::InvalidJumpTarget { target: 50, len: 2 }
    );
}

#[test]
fn test_falling_off_the_end() {
    let fault = TestContext::new().fault("loadc 1\nloadc 2\n");
    assert_eq!(fault.kind, FaultKind::InvalidJumpTarget { target: 2, len: 2 });
    assert_eq!(fault.instruction, None);
    assert_eq!(fault.stack_depth, 2);
}

#[test]
fn test_empty_program_faults_immediately() {
    let fault = TestContext::new().fault("# nothing\n");
    assert_eq!(fault.kind, FaultKind::InvalidJumpTarget { target: 0, len: 0 });
}

#[test]
fn test_nothing_executes_after_a_fault() {
    let ctx = TestContext::new();
    let program = ctx.assemble("loadc 1\nloadc 0\ndiv\nloadc 5\nhalt");
    let mut machine = ctx.machine_after("loadc 1\nloadc 0\ndiv\nloadc 5\nhalt");
    let Status::Faulted(first) = machine.status().clone() else {
        panic!("machine should have faulted");
    };
    assert_eq!(machine.step(&program), Err(first));
    assert_eq!(machine.pc(), 2);
    assert_eq!(machine.stats.steps, 2);
    assert_eq!(machine.stack(), &[1, 0]);
}

#[rstest]
#[case::div_by_zero("loadc 1\nloadc 0\ndiv", 16, &[1, 0], 0)]
#[case::mod_by_zero("loadc 1\nloadc 0\nmod", 16, &[1, 0], 0)]
#[case::add_underflow("loadc 1\nadd", 16, &[1], 0)]
#[case::store_second_cell_invalid("loadc 5\nloadc 6\nloadc 1\nstore 2", 16, &[5, 6, 1], 0)]
#[case::load_own_address("loadc 7\nloadc 1\nload 2", 16, &[7, 1], 0)]
#[case::storea_above_top("loadc 3\nstorea 100", 16, &[3], 0)]
#[case::new_exhausted("loadc 9\nnew", 2, &[9], 0)]
#[case::new_negative("loadc -1\nnew", 16, &[-1], 0)]
#[case::new_after_allocation("loadc 2\nnew\nloadc 5\nnew", 3, &[DEFAULT_HEAP_BASE, 5], 2)]
#[case::jumpi_out_of_range("loadc 7\njumpi 0", 16, &[7], 0)]
#[case::indirect_call_out_of_range("loadc 50\ncall", 16, &[50], 0)]
#[case::return_without_frame("loadc 1\nreturn 1", 16, &[1], 0)]
fn test_faulting_instruction_changes_nothing(
    #[case] source: &str,
    #[case] heap_limit: usize,
    #[case] stack: &[Word],
    #[case] heap_cells: usize,
) {
    let machine = TestContext::new()
        .with_heap_limit(heap_limit)
        .machine_after(source);
    let Status::Faulted(fault) = machine.status() else {
        panic!("machine should have faulted, status {:?}", machine.status());
    };
    assert_eq!(machine.stack(), stack);
    assert_eq!(fault.stack_depth, stack.len());
    assert_eq!(machine.heap(), vec![0; heap_cells].as_slice());
    assert_eq!(machine.call_depth(), 0);
    assert_eq!(machine.pc(), fault.pc);
}

#[test]
fn test_partial_store_writes_no_cell() {
    let fault = TestContext::new().fault("loadc 5\nloadc 6\nloadc 1\nstore 2\nhalt");
    assert_eq!(
        fault.kind,
        FaultKind::InvalidMemoryAccess {
            address: 2,
            access: AccessType::Write
        }
    );
    assert_eq!(fault.stack_depth, 3);
}

#[test]
fn test_fault_display_names_the_instruction() {
    let fault = TestContext::new().fault("loadc 1\nloadc 0\nmod\nhalt");
    assert_eq!(
        fault.to_string(),
        "division by zero at pc 2 `mod` (stack depth 2)"
    );
}
