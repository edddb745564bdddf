//! Error types for translation and execution.
//!
//! Errors fall into three groups:
//! - [ParseError]s are structural problems in the source text that abort the translation.
//! - [LabelError]s come from the [label table](crate::label_table::LabelTable). A duplicate label
//!   during translation is recovered from, an unknown label during execution is not.
//! - [ExecutionError]s abort a run of the [machine](crate::machine::Machine).

use std::error::Error;
use std::fmt;

use itertools::Itertools;
use logos::Span;

use crate::instruction::{OpCode, Register};
use crate::overflow::Bound;

/// The reason why a line of source code could not be turned into an instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseErrorKind {
    /// The first token after the optional label is not a known opcode.
    UnknownOpcode {
        opcode: String,
        /// The closest known opcode, if there is one close enough.
        suggestion: Option<&'static str>,
    },

    /// The opcode was given the wrong number of operands.
    ArityMismatch {
        opcode: OpCode,
        expected: usize,
        got: usize,
    },

    /// An operand that should name a register does not.
    InvalidRegister {
        opcode: OpCode,
        token: String,
        suggestion: Option<Register>,
    },

    /// An operand that should be an integer literal is not one or does not fit in 32 bits.
    InvalidInteger {
        opcode: OpCode,
        token: String,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseErrorKind::UnknownOpcode { opcode, suggestion } => {
                write!(f, "unknown instruction '{}'", opcode)?;

                if let Some(suggestion) = suggestion {
                    write!(f, ", did you mean '{}'?", suggestion)?;
                }

                Ok(())
            }
            ParseErrorKind::ArityMismatch { opcode, expected, got } => write!(
                f,
                "'{}' instructions take exactly {} {}, got {}",
                opcode,
                expected,
                if *expected == 1 { "operand" } else { "operands" },
                got,
            ),
            ParseErrorKind::InvalidRegister { opcode, token, suggestion } => {
                write!(f, "illegal arguments passed for '{}': '{}' is not a register", opcode, token)?;

                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean '{}'?)", suggestion)?;
                }

                write!(f, ", permitted register values are: {}", Register::ALL.iter().join(", "))
            }
            ParseErrorKind::InvalidInteger { opcode, token } => write!(
                f,
                "illegal arguments passed for '{}': '{}' is not an acceptable integer value, \
                 values stored in registers must be between {} and {} inclusive",
                opcode,
                token,
                Bound::Minimum,
                Bound::Maximum,
            ),
        }
    }
}

/// A structural error in the source text.
///
/// Translation stops at the first one of these. Whatever was translated before the error is left
/// in the program and the label table.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    /// The line number of the error location, starting from 1.
    pub line: usize,
    /// Byte range of the offending token within the line.
    pub span: Span,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: usize, span: Span, kind: ParseErrorKind) -> ParseError {
        ParseError { line, span, kind }
    }

    /// The column number of the error location, starting from 1.
    pub fn column(&self) -> usize {
        self.span.start + 1
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "at line {} col {}: {}", self.line, self.column(), self.kind)
    }
}

impl Error for ParseError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LabelError {
    /// The label is already bound to `address`.
    DuplicateLabel { label: String, address: usize },

    /// No address has been registered for the label.
    UnknownLabel { label: String },
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LabelError::DuplicateLabel { label, address } => {
                write!(f, "duplicate label '{}', already bound to address {}", label, address)
            }
            LabelError::UnknownLabel { label } => write!(f, "the label '{}' does not exist", label),
        }
    }
}

impl Error for LabelError {}

/// An arithmetic result that does not fit into a signed 32-bit register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverflowError {
    pub opcode: OpCode,
    /// The register that would have received the result.
    pub result: Register,
    pub source: Register,
    /// The value of the result register before the operation.
    pub value1: i32,
    /// The value of the source register.
    pub value2: i32,
    /// The limit that was crossed.
    pub bound: Bound,
}

impl fmt::Display for OverflowError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let limit = match self.bound {
            Bound::Maximum => "maximum",
            Bound::Minimum => "minimum",
        };

        write!(
            f,
            "the combination of values {} and {} stored in the registers {} and {} using the opcode '{}' \
             cannot be performed: this would lead to a value {} in the {} register, the {} value which \
             can be stored is {}",
            self.value1,
            self.value2,
            self.result,
            self.source,
            self.opcode,
            self.bound.direction(),
            self.result,
            limit,
            self.bound,
        )
    }
}

impl Error for OverflowError {}

/// An error that aborts a run of the machine.
#[derive(Clone, Debug, PartialEq)]
pub enum ExecutionError {
    ArithmeticOverflow(OverflowError),

    /// The divisor register of a `div` instruction held zero.
    DivisionByZero { register: Register },

    /// A `jnz` instruction jumped to a label that is not in the label table.
    UnknownLabel(LabelError),
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExecutionError::ArithmeticOverflow(err) => fmt::Display::fmt(err, f),
            ExecutionError::DivisionByZero { register } => write!(
                f,
                "attempt to divide by zero in the register {}, check that {} has been set",
                register, register,
            ),
            ExecutionError::UnknownLabel(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl Error for ExecutionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ExecutionError::ArithmeticOverflow(err) => Some(err),
            ExecutionError::DivisionByZero { .. } => None,
            ExecutionError::UnknownLabel(err) => Some(err),
        }
    }
}

impl From<OverflowError> for ExecutionError {
    fn from(err: OverflowError) -> ExecutionError {
        ExecutionError::ArithmeticOverflow(err)
    }
}

impl From<LabelError> for ExecutionError {
    fn from(err: LabelError) -> ExecutionError {
        ExecutionError::UnknownLabel(err)
    }
}
