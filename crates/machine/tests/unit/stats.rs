//! # Execution Statistics Tests

use cmavm_core::stats::STATS_SECTIONS;
use pretty_assertions::assert_eq;

use crate::common::TestContext;

#[test]
fn test_instruction_mix_counts() {
    let source = "\
        loadc 2         # load/store
        dup             # stack
        mul             # alu
        jump next       # branch
next:   call f          # call
        nop             # other
        halt            # other
f:      loadc 1         # load/store
        new             # heap
        pop             # stack
        return 0        # call
";
    let machine = TestContext::new().machine_after(source);
    let s = &machine.stats;
    assert_eq!(s.steps, 11);
    assert_eq!(s.inst_load_store, 2);
    assert_eq!(s.inst_alu, 1);
    assert_eq!(s.inst_branch, 1);
    assert_eq!(s.inst_call, 2);
    assert_eq!(s.inst_heap, 1);
    assert_eq!(s.inst_stack, 2);
    assert_eq!(s.inst_other, 2);
    assert_eq!(s.calls, 1);
    assert_eq!(s.returns, 1);
    assert_eq!(s.heap_cells, 1);
}

#[test]
fn test_peak_stack_depth() {
    let machine = TestContext::new().machine_after("alloc 5\npop 4\nloadc 1\nhalt");
    assert_eq!(machine.stats.peak_stack_depth, 5);
}

#[test]
fn test_faulting_instruction_is_not_counted() {
    let machine = TestContext::new().machine_after("loadc 1\nadd\n");
    assert_eq!(machine.stats.steps, 1);
}

#[test]
fn test_full_report_has_every_section() {
    let machine = TestContext::new().machine_after("halt 0");
    let report = machine.stats.render_sections(&[]);
    for header in ["C-MACHINE EXECUTION STATISTICS", "INSTRUCTION MIX", "FRAMES", "MEMORY"] {
        assert!(report.contains(header), "missing {header}");
    }
    assert!(report.contains("vm_steps                 1"));
    assert_eq!(STATS_SECTIONS.len(), 4);
}
