//! # Assembler Tests
//!
//! Grammar, label resolution, operand decoding and the line numbers attached
//! to every kind of parse error.

use cmavm_core::asm::{assemble, render_diagnostic};
use cmavm_core::common::{ParseError, ParseErrorKind};
use cmavm_core::isa::{BinaryOp, Instruction, UnaryOp};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ──────────────────────────────────────────────────────────
// Grammar
// ──────────────────────────────────────────────────────────

#[test]
fn test_full_listing_assembles() {
    let source = "\
# factorial of 5
        loadc 5
        call fact
        slide 1
        halt

fact:   loadr -2        # n
        loadc 1
        leq
        jumpz recurse
        loadc 1
        return 1
recurse:
        loadr -2
        loadr -2
        loadc 1
        sub
        call fact
        slide 1
        mul
        return 1
";
    let program = assemble(source).unwrap();
    assert_eq!(program.len(), 18);
    assert_eq!(program.fetch(1), Some(Instruction::Call(Some(4))));
    assert_eq!(program.fetch(7), Some(Instruction::JumpZ(10)));
    assert_eq!(program.fetch(14), Some(Instruction::Call(Some(4))));
    assert_eq!(program.fetch(16), Some(Instruction::Binary(BinaryOp::Mul)));
}

#[test]
fn test_crlf_line_endings() {
    let program = assemble("loadc 1\r\nneg\r\nhalt\r\n").unwrap();
    assert_eq!(
        program.instructions(),
        &[
            Instruction::LoadC(1),
            Instruction::Unary(UnaryOp::Neg),
            Instruction::Halt(None)
        ]
    );
}

#[test]
fn test_labels_are_not_part_of_the_program() {
    let with_labels = assemble("a: loadc 1\nb:\nc: jump a\n").unwrap();
    let without = assemble("loadc 1\njump 0\n").unwrap();
    assert_eq!(with_labels, without);
}

#[test]
fn test_label_and_instruction_share_a_line() {
    let program = assemble("start: loadc 2\n       jumpnz start").unwrap();
    assert_eq!(program.fetch(1), Some(Instruction::JumpNz(0)));
}

#[rstest]
#[case("loadc +5", Instruction::LoadC(5))]
#[case("loadc -2147483648", Instruction::LoadC(i32::MIN))]
#[case("loada 3", Instruction::LoadA(3))]
#[case("storea -1", Instruction::StoreA(-1))]
#[case("loadrc -3", Instruction::LoadRc(-3))]
#[case("loadr 1", Instruction::LoadR(1))]
#[case("storer 2", Instruction::StoreR(2))]
#[case("load 3", Instruction::Load(3))]
#[case("store 0", Instruction::Store(0))]
#[case("pop 4", Instruction::Pop(4))]
#[case("slide 3 2", Instruction::Slide { drop: 3, keep: 2 })]
#[case("alloc 0", Instruction::Alloc(0))]
#[case("enter 8", Instruction::Enter(8))]
#[case("return 2", Instruction::Return(2))]
#[case("halt -1", Instruction::Halt(Some(-1)))]
#[case("new", Instruction::New)]
#[case("dup", Instruction::Dup)]
#[case("nop", Instruction::Nop)]
#[case("XOR", Instruction::Binary(BinaryOp::Xor))]
#[case("Geq", Instruction::Binary(BinaryOp::Geq))]
#[case("not", Instruction::Unary(UnaryOp::Not))]
fn test_operand_decoding(#[case] source: &str, #[case] expected: Instruction) {
    let program = assemble(source).unwrap();
    assert_eq!(program.instructions(), &[expected]);
}

// ──────────────────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────────────────

fn error_of(source: &str) -> ParseError {
    assemble(source).expect_err("listing should not assemble")
}

#[test]
fn test_unresolved_label_reports_the_referencing_line() {
    let err = error_of("loadc 0\n\n# comment\njumpz nowhere\nhalt\n");
    assert_eq!(
        err,
        ParseError::new(4, ParseErrorKind::UnresolvedLabel("nowhere".to_string()))
    );
}

#[test]
fn test_duplicate_label_reports_the_second_definition() {
    let err = error_of("loop: nop\n jump loop\nloop: halt\n");
    assert_eq!(
        err,
        ParseError::new(3, ParseErrorKind::DuplicateLabel("loop".to_string()))
    );
}

#[test]
fn test_duplicate_label_on_one_line() {
    let err = error_of("x: x: halt");
    assert_eq!(err.kind, ParseErrorKind::DuplicateLabel("x".to_string()));
}

#[test]
fn test_unknown_mnemonic_is_reported_before_operand_errors() {
    // Line 1 has a bad operand, line 2 an unknown mnemonic; pass 1 sees line 2 first.
    let err = error_of("jump missing\nfetch 1\n");
    assert_eq!(
        err,
        ParseError::new(2, ParseErrorKind::UnknownMnemonic("fetch".to_string()))
    );
}

#[test]
fn test_invalid_label_name() {
    let err = error_of("halt 0\n9lives: halt 1\n");
    assert_eq!(
        err,
        ParseError::new(2, ParseErrorKind::InvalidLabel("9lives".to_string()))
    );
}

#[rstest]
#[case::missing_value("loadc", "loadc")]
#[case::extra_operand("dup 1", "dup")]
#[case::too_many_for_slide("slide 1 2 3", "slide")]
#[case::label_as_offset("loadr frame", "loadr")]
#[case::negative_count("alloc -2", "alloc")]
#[case::negative_return("return -1", "return")]
#[case::word_overflow("loadc 2147483648", "loadc")]
#[case::target_past_end("jump 1", "jump")]
#[case::negative_target("call -4", "call")]
#[case::garbage_token("loadc 1x", "loadc")]
fn test_malformed_operands(#[case] source: &str, #[case] expected_mnemonic: &str) {
    let err = error_of(source);
    assert_eq!(err.line, 1);
    match err.kind {
        ParseErrorKind::MalformedOperand { mnemonic, .. } => assert_eq!(mnemonic, expected_mnemonic),
        other => panic!("expected MalformedOperand, got {other:?}"),
    }
}

#[test]
fn test_error_display_includes_line() {
    let err = error_of("nop\nnop\nbogus\n");
    assert_eq!(err.to_string(), "line 3: unknown mnemonic `bogus`");
}

#[test]
fn test_rendered_diagnostic_quotes_source() {
    let source = "loadc 1\njump away\n";
    let err = error_of(source);
    let text = render_diagnostic("t.cma", source, &err);
    assert!(text.contains("label `away` is never defined"));
    assert!(text.contains("t.cma:2"));
    assert!(text.contains("2 | jump away"));
}
