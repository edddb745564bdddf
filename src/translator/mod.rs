//! Translation from SML source text into a [Program] and a [LabelTable].
//!
//! Each line holds at most one instruction:
//!
//! ```text
//! [label:] opcode operand*
//! ```
//!
//! Tokens are separated by whitespace. Blank lines and lines that contain only a label are
//! skipped.

pub mod table;
pub mod token;

pub use self::table::InstructionTable;

use slog::{o, trace, warn, Discard, Logger};

use crate::error::{LabelError, ParseError};
use crate::instruction::Instruction;
use crate::label_table::LabelTable;
use crate::program::Program;

use self::token::{label_definition, words};

/// The recoverable problems found while translating a source text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationReport {
    /// Number of instructions appended to the program.
    pub instructions: usize,

    /// Labels that were already bound when their line was translated, with their line numbers.
    /// The instruction on such a line is kept, the label binding is discarded.
    pub duplicate_labels: Vec<(usize, LabelError)>,
}

impl TranslationReport {
    /// True if the source text translated without any recoverable problems.
    pub fn is_clean(&self) -> bool {
        self.duplicate_labels.is_empty()
    }
}

/// Translates source lines into instructions using an [InstructionTable].
pub struct Translator<'t> {
    table: &'t InstructionTable,
    logger: Logger,
}

impl<'t> Translator<'t> {
    pub fn new(table: &'t InstructionTable) -> Translator<'t> {
        Translator::with_logger(table, None)
    }

    pub fn with_logger<L>(table: &'t InstructionTable, logger: L) -> Translator<'t>
    where
        L: Into<Option<Logger>>,
    {
        let mut translator = Translator {
            table,
            logger: Logger::root(Discard, o!()),
        };

        translator.set_logger(logger);
        translator
    }

    pub fn set_logger<L>(&mut self, logger: L)
    where
        L: Into<Option<Logger>>,
    {
        self.logger = logger
            .into()
            .unwrap_or(Logger::root(Discard, o!()))
            .new(o!("stage" => "translation"));
    }

    /// Translates a single line of source code.
    ///
    /// # Returns
    /// The instruction on the line, or `None` if the line holds no opcode.
    ///
    /// # Errors
    /// A [ParseError] reported at line 1.
    pub fn parse_line(&self, line: &str) -> Result<Option<Instruction>, ParseError> {
        self.parse_line_at(line, 1)
    }

    fn parse_line_at(&self, line: &str, line_number: usize) -> Result<Option<Instruction>, ParseError> {
        let words = words(line);

        let (label, rest) = match words.split_first() {
            None => return Ok(None),
            Some((first, rest)) => match label_definition(first.text) {
                Some(label) => (Some(label.to_string()), rest),
                None => (None, &words[..]),
            },
        };

        let (opcode, operands) = match rest.split_first() {
            None => return Ok(None),
            Some(split) => split,
        };

        let operation = self.table.create(line_number, opcode, operands)?;

        Ok(Some(Instruction::new(label, operation)))
    }

    /// Translates `source` into `program` and `labels`.
    ///
    /// See [Translator::translate_lines].
    pub fn translate(
        &self,
        source: &str,
        labels: &mut LabelTable,
        program: &mut Program,
    ) -> Result<TranslationReport, ParseError> {
        self.translate_lines(source.lines(), labels, program)
    }

    /// Translates the lines of a source text into `program` and `labels`.
    ///
    /// Both are emptied before the first line is read. A label is bound to the address of the
    /// instruction on its own line.
    ///
    /// # Errors
    /// The first structural [ParseError]. Translation stops there and the instructions and labels
    /// of the preceding lines stay in `program` and `labels`. Duplicate labels are not errors,
    /// they are listed in the returned [TranslationReport].
    pub fn translate_lines<I, S>(
        &self,
        lines: I,
        labels: &mut LabelTable,
        program: &mut Program,
    ) -> Result<TranslationReport, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels.reset();
        program.clear();

        let mut report = TranslationReport::default();

        for (index, line) in lines.into_iter().enumerate() {
            let line_number = index + 1;

            let instruction = match self.parse_line_at(line.as_ref(), line_number)? {
                Some(instruction) => instruction,
                None => continue,
            };

            let address = program.len();

            if let Some(ref label) = instruction.label {
                if let Err(err) = labels.add_label(label.as_str(), address) {
                    warn!(self.logger, "discarding duplicate label";
                        "line" => line_number, "label" => label.as_str(), "address" => address);
                    report.duplicate_labels.push((line_number, err));
                }
            }

            trace!(self.logger, "translated"; "address" => address, "instruction" => %instruction);

            program.push(instruction);
            report.instructions += 1;
        }

        Ok(report)
    }
}
