//! Two-pass listing assembler.
//!
//! Pass 1 walks the listing once, assigning each instruction-bearing line the
//! next address and binding every label to the address of the instruction
//! that follows it. Pass 2 decodes operands against the opcode's signature,
//! resolving label references through the table built by pass 1. Either pass
//! stops at the first error; no partial program is ever returned.

use tracing::debug;

use super::labels::{LabelTable, is_valid_name};
use super::lexer::tokenize;
use crate::common::{ParseError, ParseErrorKind, Word};
use crate::isa::{Instruction, Opcode, OperandKind, OperandSpec, Presence, Program};

/// Most operands any signature declares (`slide q m`).
const MAX_OPERANDS: usize = 2;

/// An instruction whose mnemonic is known but whose operands are still raw text.
#[derive(Debug)]
struct Pending<'a> {
    line: usize,
    opcode: Opcode,
    operands: Vec<&'a str>,
}

/// Assembles a listing into a program.
///
/// # Arguments
///
/// * `source` - The listing text. Lines may end in `\n` or `\r\n`.
///
/// # Returns
///
/// The assembled program, or the first error encountered with its 1-based line.
///
/// # Errors
///
/// * `DuplicateLabel`, `InvalidLabel`, `UnknownMnemonic` from pass 1.
/// * `UnresolvedLabel`, `MalformedOperand` from pass 2.
pub fn assemble(source: &str) -> Result<Program, ParseError> {
    let mut labels = LabelTable::new();
    let mut pending = Vec::new();

    for (idx, text) in source.lines().enumerate() {
        let line = tokenize(idx + 1, text)?;
        if line.is_blank() {
            continue;
        }
        for name in &line.labels {
            labels
                .define(name, pending.len())
                .map_err(|kind| ParseError::new(line.number, kind))?;
        }
        if let Some(mnemonic) = line.mnemonic {
            let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| {
                ParseError::new(
                    line.number,
                    ParseErrorKind::UnknownMnemonic(mnemonic.to_string()),
                )
            })?;
            pending.push(Pending {
                line: line.number,
                opcode,
                operands: line.operands,
            });
        }
    }

    let len = pending.len();
    let instructions = pending
        .iter()
        .map(|p| decode(p, &labels, len).map_err(|kind| ParseError::new(p.line, kind)))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        instructions = instructions.len(),
        labels = labels.len(),
        "assembled listing"
    );
    Ok(Program::new(instructions))
}

/// Operand values after resolution, one slot per signature entry.
struct Operands {
    mnemonic: &'static str,
    slots: [Option<Word>; MAX_OPERANDS],
}

impl Operands {
    fn word(&self, slot: usize) -> Result<Word, ParseErrorKind> {
        self.slots
            .get(slot)
            .copied()
            .flatten()
            .ok_or_else(|| malformed(self.mnemonic, "missing operand".to_string()))
    }

    /// Operands of kind `Count` and `Target` are non-negative after resolution.
    fn index(&self, slot: usize) -> Result<usize, ParseErrorKind> {
        let value = self.word(slot)?;
        usize::try_from(value)
            .map_err(|_| malformed(self.mnemonic, format!("`{value}` is negative")))
    }

    fn optional_index(&self, slot: usize) -> Result<Option<usize>, ParseErrorKind> {
        match self.slots.get(slot).copied().flatten() {
            Some(_) => self.index(slot).map(Some),
            None => Ok(None),
        }
    }
}

fn malformed(mnemonic: &'static str, reason: String) -> ParseErrorKind {
    ParseErrorKind::MalformedOperand { mnemonic, reason }
}

fn decode(pending: &Pending<'_>, labels: &LabelTable, len: usize) -> Result<Instruction, ParseErrorKind> {
    let opcode = pending.opcode;
    let mnemonic = opcode.mnemonic();
    let signature = opcode.signature();
    let required = signature
        .iter()
        .filter(|spec| spec.presence == Presence::Required)
        .count();
    let given = pending.operands.len();

    if given < required || given > signature.len() {
        let expected = if required == signature.len() {
            format!("{required}")
        } else {
            format!("{required} to {}", signature.len())
        };
        return Err(malformed(
            mnemonic,
            format!("expected {expected} operand(s), found {given}"),
        ));
    }

    let mut slots = [None; MAX_OPERANDS];
    for (idx, (slot, spec)) in slots.iter_mut().zip(signature).enumerate() {
        *slot = match pending.operands.get(idx) {
            Some(token) => Some(resolve(*spec, token, mnemonic, labels, len)?),
            None => match spec.presence {
                Presence::Defaulted(value) => Some(value),
                Presence::Optional | Presence::Required => None,
            },
        };
    }
    let ops = Operands { mnemonic, slots };

    let inst = match opcode {
        Opcode::LoadC => Instruction::LoadC(ops.word(0)?),
        Opcode::Load => Instruction::Load(ops.index(0)?),
        Opcode::Store => Instruction::Store(ops.index(0)?),
        Opcode::LoadA => Instruction::LoadA(ops.word(0)?),
        Opcode::StoreA => Instruction::StoreA(ops.word(0)?),
        Opcode::LoadRc => Instruction::LoadRc(ops.word(0)?),
        Opcode::LoadR => Instruction::LoadR(ops.word(0)?),
        Opcode::StoreR => Instruction::StoreR(ops.word(0)?),
        Opcode::Pop => Instruction::Pop(ops.index(0)?),
        Opcode::Dup => Instruction::Dup,
        Opcode::Slide => Instruction::Slide {
            drop: ops.index(0)?,
            keep: ops.index(1)?,
        },
        Opcode::Alloc => Instruction::Alloc(ops.index(0)?),
        Opcode::New => Instruction::New,
        Opcode::Binary(op) => Instruction::Binary(op),
        Opcode::Unary(op) => Instruction::Unary(op),
        Opcode::Jump => Instruction::Jump(ops.index(0)?),
        Opcode::JumpZ => Instruction::JumpZ(ops.index(0)?),
        Opcode::JumpNz => Instruction::JumpNz(ops.index(0)?),
        Opcode::JumpI => Instruction::JumpI(ops.index(0)?),
        Opcode::Nop => Instruction::Nop,
        Opcode::Call => Instruction::Call(ops.optional_index(0)?),
        Opcode::Enter => Instruction::Enter(ops.index(0)?),
        Opcode::Return => Instruction::Return(ops.index(0)?),
        Opcode::Halt => Instruction::Halt(ops.slots[0]),
    };
    Ok(inst)
}

/// Parses a signed decimal literal. `None` if the token is not numeric at all.
fn parse_literal(token: &str) -> Option<Result<Word, String>> {
    let digits = token.strip_prefix(['-', '+']).unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(
        token
            .parse::<Word>()
            .map_err(|_| format!("`{token}` does not fit in a machine word")),
    )
}

fn resolve(
    spec: OperandSpec,
    token: &str,
    mnemonic: &'static str,
    labels: &LabelTable,
    len: usize,
) -> Result<Word, ParseErrorKind> {
    let value = match parse_literal(token) {
        Some(literal) => literal.map_err(|reason| malformed(mnemonic, reason))?,
        None => match spec.kind {
            OperandKind::Value | OperandKind::Target if is_valid_name(token) => {
                let addr = labels.resolve(token)?;
                Word::try_from(addr).map_err(|_| {
                    malformed(mnemonic, format!("address of `{token}` does not fit in a machine word"))
                })?
            }
            OperandKind::Value | OperandKind::Target => {
                return Err(malformed(
                    mnemonic,
                    format!("expected an integer or label, found `{token}`"),
                ));
            }
            OperandKind::Offset | OperandKind::Count => {
                return Err(malformed(
                    mnemonic,
                    format!("expected an integer, found `{token}`"),
                ));
            }
        },
    };

    match spec.kind {
        OperandKind::Count if value < 0 => Err(malformed(
            mnemonic,
            format!("count `{value}` is negative"),
        )),
        OperandKind::Target if !usize::try_from(value).is_ok_and(|addr| addr < len) => {
            Err(malformed(
                mnemonic,
                format!("target `{token}` outside program of {len} instructions"),
            ))
        }
        _ => Ok(value),
    }
}
