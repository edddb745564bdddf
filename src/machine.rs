//! [Machine] for executing translated [programs](crate::program::Program).

use slog::{debug, error, o, trace, Discard, Logger};

use crate::error::{ExecutionError, ParseError};
use crate::instruction::ProgramCounterUpdate;
use crate::label_table::LabelTable;
use crate::program::Program;
use crate::registers::Registers;
use crate::translator::{TranslationReport, Translator};

/// Interface to the device receiving the values of `out` instructions.
pub trait Output {
    /// Called when an `out` instruction is executed.
    ///
    /// # Parameters
    /// - `value`: The value of the register specified in the instruction.
    fn output(&mut self, value: i32);
}

impl<O: Output + ?Sized> Output for &mut O {
    fn output(&mut self, value: i32) {
        (**self).output(value)
    }
}

/// An output handler that prints every value as a decimal number on its own line of the
/// standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdIo;

impl Output for StdIo {
    fn output(&mut self, value: i32) {
        println!("{}", value);
    }
}

/// An output handler for testing purposes.
///
/// Appends every value to a buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestIo {
    values: Vec<i32>,
}

impl TestIo {
    pub fn new() -> TestIo {
        TestIo { values: Vec::new() }
    }

    /// The values written so far, oldest first.
    pub fn values(&self) -> &[i32] {
        &self.values[..]
    }

    pub fn into_values(self) -> Vec<i32> {
        self.values
    }
}

impl Output for TestIo {
    fn output(&mut self, value: i32) {
        self.values.push(value);
    }
}

/// The machine contains all neccessary context for executing an SML program
/// and an interface for doing output.
#[derive(Clone, Debug)]
pub struct Machine<IO> {
    /// The eight work registers.
    pub registers: Registers,

    /// Labels of the loaded program. Consulted by `jnz`.
    pub labels: LabelTable,

    /// The loaded program.
    pub program: Program,

    /// Receives the values of `out` instructions.
    pub io: IO,

    /// Address of the next instruction to be executed.
    pc: usize,

    logger: Logger,
}

impl<IO> Machine<IO>
where
    IO: Output,
{
    /// Create a new machine with an empty program.
    ///
    /// # Parameters
    /// - `io`: An [output handler](Output).
    pub fn new(io: IO) -> Machine<IO> {
        Machine::with_logger(io, None)
    }

    pub fn with_logger<L>(io: IO, logger: L) -> Machine<IO>
    where
        L: Into<Option<Logger>>,
    {
        let mut machine = Machine {
            registers: Registers::new(),
            labels: LabelTable::new(),
            program: Program::new(),
            io,
            pc: 0,
            logger: Logger::root(Discard, o!()),
        };

        machine.set_logger(logger);
        machine
    }

    pub fn set_logger<L>(&mut self, logger: L)
    where
        L: Into<Option<Logger>>,
    {
        self.logger = logger
            .into()
            .unwrap_or(Logger::root(Discard, o!()))
            .new(o!("stage" => "execution"));
    }

    /// Address of the next instruction to be executed.
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Translates `source` into the program and labels of this machine, replacing the previous
    /// ones.
    ///
    /// # Errors
    /// The first structural [ParseError]. The program is then only partially loaded and should
    /// not be executed.
    pub fn load(&mut self, translator: &Translator, source: &str) -> Result<TranslationReport, ParseError> {
        translator.translate(source, &mut self.labels, &mut self.program)
    }

    /// Executes the loaded program from the first instruction until the program counter moves
    /// past the last one.
    ///
    /// The registers are zeroed and the program counter is reset before the first instruction,
    /// so a program can be run any number of times.
    ///
    /// # Returns
    /// The number of instructions executed.
    ///
    /// # Errors
    /// The first [ExecutionError] raised by an instruction. The registers and the program counter
    /// are left as they were when the failing instruction was fetched.
    pub fn execute(&mut self) -> Result<usize, ExecutionError> {
        self.registers.clear();
        self.pc = 0;

        debug!(self.logger, "starting execution"; "instructions" => self.program.len());

        // Instructions borrow the machine mutably, so the program is moved out for the run.
        let program = std::mem::take(&mut self.program);
        let result = self.run(&program);
        self.program = program;

        match result {
            Ok(executed) => {
                debug!(self.logger, "execution finished"; "executed" => executed);
            }
            Err(ref err) => {
                error!(self.logger, "execution aborted"; "address" => self.pc, "error" => %err);
            }
        }

        result
    }

    fn run(&mut self, program: &Program) -> Result<usize, ExecutionError> {
        let mut executed = 0;

        while let Some(ins) = program.get(self.pc) {
            trace!(self.logger, "execute"; "address" => self.pc, "instruction" => %ins);

            let update = ins.execute(self)?;
            executed += 1;

            self.pc = match update {
                ProgramCounterUpdate::Normal => self.pc + 1,
                ProgramCounterUpdate::Jump(address) => address,
            };
        }

        Ok(executed)
    }
}
