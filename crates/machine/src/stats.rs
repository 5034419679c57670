//! Execution statistics collection and reporting.
//!
//! This module tracks what a run of the C-Machine did. It provides:
//! 1. **Summary:** Executed steps, host time, and derived throughput.
//! 2. **Instruction mix:** Counts by opcode category.
//! 3. **Frames:** Calls, returns, and the deepest call nesting reached.
//! 4. **Memory:** Peak operand stack depth and heap cells allocated.

use std::fmt::Write;
use std::time::Instant;

use crate::isa::Category;

/// Execution statistics for a single run.
#[derive(Clone, Debug)]
pub struct ExecStats {
    start_time: Instant,
    /// Instructions executed (faulting instructions are not counted).
    pub steps: u64,

    /// Count of `loadc`, `load*` and `store*` instructions.
    pub inst_load_store: u64,
    /// Count of arithmetic, logic and comparison instructions.
    pub inst_alu: u64,
    /// Count of jumps.
    pub inst_branch: u64,
    /// Count of `call`, `enter` and `return`.
    pub inst_call: u64,
    /// Count of `new`.
    pub inst_heap: u64,
    /// Count of `pop`, `dup`, `slide` and `alloc`.
    pub inst_stack: u64,
    /// Count of `nop` and `halt`.
    pub inst_other: u64,

    /// Frames pushed by `call`.
    pub calls: u64,
    /// Frames popped by `return`.
    pub returns: u64,
    /// Deepest call nesting observed.
    pub peak_call_depth: usize,

    /// Largest operand stack depth observed after any instruction.
    pub peak_stack_depth: usize,
    /// Heap cells allocated by `new` over the whole run.
    pub heap_cells: usize,
}

impl Default for ExecStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            steps: 0,
            inst_load_store: 0,
            inst_alu: 0,
            inst_branch: 0,
            inst_call: 0,
            inst_heap: 0,
            inst_stack: 0,
            inst_other: 0,
            calls: 0,
            returns: 0,
            peak_call_depth: 0,
            peak_stack_depth: 0,
            heap_cells: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"instruction_mix"`, `"frames"`, `"memory"`.
/// Pass an empty slice to `render_sections` to include all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "instruction_mix", "frames", "memory"];

const RULE: &str = "----------------------------------------------------------";
const BANNER: &str = "==========================================================";

impl ExecStats {
    /// Records one executed instruction of the given category.
    pub const fn record(&mut self, category: Category) {
        self.steps += 1;
        match category {
            Category::LoadStore => self.inst_load_store += 1,
            Category::Alu => self.inst_alu += 1,
            Category::Branch => self.inst_branch += 1,
            Category::Call => self.inst_call += 1,
            Category::Heap => self.inst_heap += 1,
            Category::Stack => self.inst_stack += 1,
            Category::Other => self.inst_other += 1,
        }
    }

    /// Raises the peak stack and call depths if the current values exceed them.
    pub fn observe_depths(&mut self, stack_depth: usize, call_depth: usize) {
        self.peak_stack_depth = self.peak_stack_depth.max(stack_depth);
        self.peak_call_depth = self.peak_call_depth.max(call_depth);
    }

    /// Renders only the requested sections.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to render everything.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let steps = self.steps.max(1) as f64;
        let pct = |n: u64| (n as f64 / steps) * 100.0;
        let mut out = String::new();

        if want("summary") {
            let seconds = self.start_time.elapsed().as_secs_f64();
            let mips = if seconds > 0.0 {
                (self.steps as f64 / seconds) / 1_000_000.0
            } else {
                0.0
            };
            let _ = writeln!(out, "\n{BANNER}");
            let _ = writeln!(out, "C-MACHINE EXECUTION STATISTICS");
            let _ = writeln!(out, "{BANNER}");
            let _ = writeln!(out, "host_seconds             {seconds:.4} s");
            let _ = writeln!(out, "vm_steps                 {}", self.steps);
            let _ = writeln!(out, "vm_mips                  {mips:.2}");
            let _ = writeln!(out, "{RULE}");
        }
        if want("instruction_mix") {
            let _ = writeln!(out, "INSTRUCTION MIX");
            for (name, count) in [
                ("op.load_store", self.inst_load_store),
                ("op.alu", self.inst_alu),
                ("op.branch", self.inst_branch),
                ("op.call", self.inst_call),
                ("op.heap", self.inst_heap),
                ("op.stack", self.inst_stack),
                ("op.other", self.inst_other),
            ] {
                let _ = writeln!(out, "  {name:<21}{count} ({:.2}%)", pct(count));
            }
            let _ = writeln!(out, "{RULE}");
        }
        if want("frames") {
            let _ = writeln!(out, "FRAMES");
            let _ = writeln!(out, "  frames.calls         {}", self.calls);
            let _ = writeln!(out, "  frames.returns       {}", self.returns);
            let _ = writeln!(out, "  frames.peak_depth    {}", self.peak_call_depth);
            let _ = writeln!(out, "{RULE}");
        }
        if want("memory") {
            let _ = writeln!(out, "MEMORY");
            let _ = writeln!(out, "  stack.peak_depth     {}", self.peak_stack_depth);
            let _ = writeln!(out, "  heap.cells           {}", self.heap_cells);
        }
        let _ = writeln!(out, "{BANNER}");
        out
    }

    /// Prints only the requested statistics sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
