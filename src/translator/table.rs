//! The opcode to constructor table used by the [Translator](super::Translator).

use std::collections::HashMap;

use nom::{
    IResult,
    character::complete::{digit1, one_of},
    combinator::{all_consuming, map_res, opt, recognize},
    sequence::pair,
};

use crate::error::{ParseError, ParseErrorKind};
use crate::instruction::{OpCode, Operation, Register};

use super::token::Word;

/// Maximum edit distance for a "did you mean" suggestion.
const SUGGESTION_DISTANCE: usize = 2;

/// The operands of a single instruction, already checked to be of the right count.
pub struct Operands<'a> {
    opcode: OpCode,
    line: usize,
    words: &'a [Word<'a>],
}

impl<'a> Operands<'a> {
    /// The operand at `index` as a register.
    pub fn register(&self, index: usize) -> Result<Register, ParseError> {
        let word = &self.words[index];

        word.text.parse::<Register>().map_err(|()| ParseError::new(
            self.line,
            word.span.clone(),
            ParseErrorKind::InvalidRegister {
                opcode: self.opcode,
                token: word.text.to_string(),
                suggestion: closest(word.text, Register::ALL.iter().map(Register::name))
                    .and_then(|name| name.parse::<Register>().ok()),
            },
        ))
    }

    /// The operand at `index` as a signed 32-bit integer literal.
    pub fn integer(&self, index: usize) -> Result<i32, ParseError> {
        let word = &self.words[index];

        parse_integer(word.text).ok_or_else(|| ParseError::new(
            self.line,
            word.span.clone(),
            ParseErrorKind::InvalidInteger {
                opcode: self.opcode,
                token: word.text.to_string(),
            },
        ))
    }

    /// The operand at `index` as a label reference.
    pub fn label(&self, index: usize) -> String {
        self.words[index].text.to_string()
    }
}

type Constructor = fn(&Operands) -> Result<Operation, ParseError>;

/// Describes how to build the instruction for one opcode.
#[derive(Clone, Copy)]
pub struct Entry {
    pub opcode: OpCode,
    /// Number of operands the opcode takes.
    pub arity: usize,
    constructor: Constructor,
}

/// Lookup table from opcode mnemonics to instruction constructors.
///
/// The table is stateless once built. Build it once and hand it to every
/// [Translator](super::Translator) that needs it.
#[derive(Clone)]
pub struct InstructionTable {
    entries: HashMap<&'static str, Entry>,
}

impl Default for InstructionTable {
    fn default() -> Self {
        InstructionTable::new()
    }
}

fn add(operands: &Operands) -> Result<Operation, ParseError> {
    Ok(Operation::Add { result: operands.register(0)?, source: operands.register(1)? })
}

fn sub(operands: &Operands) -> Result<Operation, ParseError> {
    Ok(Operation::Subtract { result: operands.register(0)?, source: operands.register(1)? })
}

fn mul(operands: &Operands) -> Result<Operation, ParseError> {
    Ok(Operation::Multiply { result: operands.register(0)?, source: operands.register(1)? })
}

fn div(operands: &Operands) -> Result<Operation, ParseError> {
    Ok(Operation::Divide { result: operands.register(0)?, source: operands.register(1)? })
}

fn mov(operands: &Operands) -> Result<Operation, ParseError> {
    Ok(Operation::Move { register: operands.register(0)?, value: operands.integer(1)? })
}

fn out(operands: &Operands) -> Result<Operation, ParseError> {
    Ok(Operation::Out { register: operands.register(0)? })
}

fn jnz(operands: &Operands) -> Result<Operation, ParseError> {
    Ok(Operation::JumpNotZero { register: operands.register(0)?, target: operands.label(1) })
}

impl InstructionTable {
    /// Creates a table containing all seven SML opcodes.
    pub fn new() -> InstructionTable {
        let mut table = InstructionTable {
            entries: HashMap::new(),
        };

        table.insert(OpCode::Add, 2, add);
        table.insert(OpCode::Subtract, 2, sub);
        table.insert(OpCode::Multiply, 2, mul);
        table.insert(OpCode::Divide, 2, div);
        table.insert(OpCode::Move, 2, mov);
        table.insert(OpCode::Out, 1, out);
        table.insert(OpCode::JumpNotZero, 2, jnz);

        table
    }

    fn insert(&mut self, opcode: OpCode, arity: usize, constructor: Constructor) {
        self.entries.insert(opcode.mnemonic(), Entry { opcode, arity, constructor });
    }

    pub fn get(&self, mnemonic: &str) -> Option<&Entry> {
        self.entries.get(mnemonic)
    }

    /// The mnemonics of all opcodes in the table.
    pub fn mnemonics(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Builds the operation for `opcode` from its operand words.
    ///
    /// # Parameters
    /// - `line`: The line number reported in errors.
    /// - `opcode`: The opcode word.
    /// - `operands`: The words following the opcode.
    ///
    /// # Errors
    /// [UnknownOpcode](ParseErrorKind::UnknownOpcode), [ArityMismatch](ParseErrorKind::ArityMismatch),
    /// [InvalidRegister](ParseErrorKind::InvalidRegister) or
    /// [InvalidInteger](ParseErrorKind::InvalidInteger).
    pub fn create(&self, line: usize, opcode: &Word, operands: &[Word]) -> Result<Operation, ParseError> {
        let entry = self.get(opcode.text).ok_or_else(|| ParseError::new(
            line,
            opcode.span.clone(),
            ParseErrorKind::UnknownOpcode {
                opcode: opcode.text.to_string(),
                suggestion: closest(opcode.text, self.mnemonics()),
            },
        ))?;

        if operands.len() != entry.arity {
            let span = match (operands.first(), operands.last()) {
                (Some(first), Some(last)) => first.span.start..last.span.end,
                _ => opcode.span.clone(),
            };

            return Err(ParseError::new(line, span, ParseErrorKind::ArityMismatch {
                opcode: entry.opcode,
                expected: entry.arity,
                got: operands.len(),
            }));
        }

        (entry.constructor)(&Operands {
            opcode: entry.opcode,
            line,
            words: operands,
        })
    }
}

fn integer_literal(input: &str) -> IResult<&str, i32> {
    map_res(
        recognize(pair(opt(one_of("+-")), digit1)),
        |literal: &str| literal.parse::<i32>(),
    )(input)
}

/// Parses a whole token as a decimal integer with an optional sign.
///
/// Returns `None` if the token has any other characters or the value does not fit in an `i32`.
pub fn parse_integer(token: &str) -> Option<i32> {
    all_consuming(integer_literal)(token)
        .ok()
        .map(|(_, value)| value)
}

/// Finds the candidate closest to `token`, if any is close enough to be worth suggesting.
///
/// A candidate that differs only in letter case always wins.
fn closest<'c, I>(token: &str, candidates: I) -> Option<&'c str>
where
    I: IntoIterator<Item = &'c str>,
{
    let candidates: Vec<&'c str> = candidates.into_iter().collect();

    if let Some(candidate) = candidates.iter().copied().find(|c| c.eq_ignore_ascii_case(token)) {
        return Some(candidate);
    }

    candidates
        .into_iter()
        .map(|candidate| (edit_distance::edit_distance(token, candidate), candidate))
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .min()
        .map(|(_, candidate)| candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translator::token::words;

    fn create(line: &str) -> Result<Operation, ParseError> {
        let words = words(line);
        InstructionTable::new().create(1, &words[0], &words[1..])
    }

    fn kind(line: &str) -> ParseErrorKind {
        create(line).unwrap_err().kind
    }

    #[test]
    fn test_create_all_opcodes() {
        use Register::*;

        assert_eq!(create("add EAX EBX"), Ok(Operation::Add { result: EAX, source: EBX }));
        assert_eq!(create("sub ECX EDX"), Ok(Operation::Subtract { result: ECX, source: EDX }));
        assert_eq!(create("mul ESP EBP"), Ok(Operation::Multiply { result: ESP, source: EBP }));
        assert_eq!(create("div ESI EDI"), Ok(Operation::Divide { result: ESI, source: EDI }));
        assert_eq!(create("mov EAX -12"), Ok(Operation::Move { register: EAX, value: -12 }));
        assert_eq!(create("out EBX"), Ok(Operation::Out { register: EBX }));
        assert_eq!(
            create("jnz EAX f3"),
            Ok(Operation::JumpNotZero { register: EAX, target: "f3".into() }),
        );
    }

    #[test]
    fn test_unknown_opcode() {
        assert_eq!(
            kind("mvo EAX 1"),
            ParseErrorKind::UnknownOpcode { opcode: "mvo".into(), suggestion: Some("mov") },
        );
        assert_eq!(
            kind("ADD EAX EBX"),
            ParseErrorKind::UnknownOpcode { opcode: "ADD".into(), suggestion: Some("add") },
        );
        assert_eq!(
            kind("halt"),
            ParseErrorKind::UnknownOpcode { opcode: "halt".into(), suggestion: None },
        );
    }

    #[test]
    fn test_arity_mismatch() {
        assert_eq!(
            kind("out EAX EBX"),
            ParseErrorKind::ArityMismatch { opcode: OpCode::Out, expected: 1, got: 2 },
        );
        assert_eq!(
            kind("add EAX"),
            ParseErrorKind::ArityMismatch { opcode: OpCode::Add, expected: 2, got: 1 },
        );

        let err = create("jnz").unwrap_err();
        assert_eq!(err.span, 0..3);

        let err = create("mov EAX 1 2").unwrap_err();
        assert_eq!(err.span, 4..11);
    }

    #[test]
    fn test_invalid_register() {
        assert_eq!(
            kind("add eax EBX"),
            ParseErrorKind::InvalidRegister {
                opcode: OpCode::Add,
                token: "eax".into(),
                suggestion: Some(Register::EAX),
            },
        );

        let err = create("add EAX R1").unwrap_err();
        assert_eq!(err.span, 8..10);
        assert_eq!(err.kind, ParseErrorKind::InvalidRegister {
            opcode: OpCode::Add,
            token: "R1".into(),
            suggestion: None,
        });
    }

    #[test]
    fn test_invalid_integer() {
        for literal in &["2147483648", "-2147483649", "1.5", "0x10", "five", "-", "1-"] {
            assert_eq!(
                kind(&format!("mov EAX {}", literal)),
                ParseErrorKind::InvalidInteger { opcode: OpCode::Move, token: literal.to_string() },
            );
        }
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("0"), Some(0));
        assert_eq!(parse_integer("+7"), Some(7));
        assert_eq!(parse_integer("-7"), Some(-7));
        assert_eq!(parse_integer("2147483647"), Some(i32::MAX));
        assert_eq!(parse_integer("-2147483648"), Some(i32::MIN));
        assert_eq!(parse_integer("2147483648"), None);
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("12a"), None);
    }

    #[test]
    fn test_jnz_target_is_not_validated() {
        // Labels are resolved at run time, so any word is accepted here.
        assert!(create("jnz EAX 123").is_ok());
    }

    #[test]
    fn test_mnemonics() {
        let mut mnemonics: Vec<_> = InstructionTable::new().mnemonics().collect();
        mnemonics.sort();

        assert_eq!(mnemonics, vec!["add", "div", "jnz", "mov", "mul", "out", "sub"]);
    }
}
