//! types for representing instructions and their parts

use std::fmt;
use std::str::FromStr;

use crate::error::{ExecutionError, OverflowError};
use crate::machine::{Machine, Output};
use crate::overflow::{self, check_overflow, Bound, OverflowPredicate};

/// The eight work registers of the SML machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Register {
    EAX,
    EBX,
    ECX,
    EDX,
    ESP,
    EBP,
    ESI,
    EDI,
}

impl Register {
    /// All registers in enumeration order.
    pub const ALL: [Register; 8] = [
        Register::EAX,
        Register::EBX,
        Register::ECX,
        Register::EDX,
        Register::ESP,
        Register::EBP,
        Register::ESI,
        Register::EDI,
    ];

    pub fn index(&self) -> usize {
        match self {
            Register::EAX => 0,
            Register::EBX => 1,
            Register::ECX => 2,
            Register::EDX => 3,
            Register::ESP => 4,
            Register::EBP => 5,
            Register::ESI => 6,
            Register::EDI => 7,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Register::EAX => "EAX",
            Register::EBX => "EBX",
            Register::ECX => "ECX",
            Register::EDX => "EDX",
            Register::ESP => "ESP",
            Register::EBP => "EBP",
            Register::ESI => "ESI",
            Register::EDI => "EDI",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Register {
    type Err = ();

    fn from_str(s: &str) -> Result<Register, ()> {
        Register::ALL
            .iter()
            .copied()
            .find(|register| register.name() == s)
            .ok_or(())
    }
}

/// Operation mnemonics of the SML language.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpCode {
    /// Adds the second register into the first one.
    Add,

    /// Subtracts the second register from the first one.
    Subtract,

    /// Multiplies the first register by the second one.
    Multiply,

    /// Divides the first register by the second one, truncating toward zero.
    Divide,

    /// Stores a literal integer into a register.
    Move,

    /// Sends the value of a register to the output sink.
    Out,

    /// Jumps to a label if a register is not zero.
    JumpNotZero,
}

impl OpCode {
    /// All opcodes, in the order they are listed in the instruction table.
    pub const ALL: [OpCode; 7] = [
        OpCode::Add,
        OpCode::Subtract,
        OpCode::Multiply,
        OpCode::Divide,
        OpCode::Move,
        OpCode::Out,
        OpCode::JumpNotZero,
    ];

    /// The textual form of the opcode as it appears in source code.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            OpCode::Add => "add",
            OpCode::Subtract => "sub",
            OpCode::Multiply => "mul",
            OpCode::Divide => "div",
            OpCode::Move => "mov",
            OpCode::Out => "out",
            OpCode::JumpNotZero => "jnz",
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// The typed operands of an instruction, one variant per opcode.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Add { result: Register, source: Register },
    Subtract { result: Register, source: Register },
    Multiply { result: Register, source: Register },
    Divide { result: Register, source: Register },
    Move { register: Register, value: i32 },
    Out { register: Register },
    JumpNotZero { register: Register, target: String },
}

impl Operation {
    pub fn opcode(&self) -> OpCode {
        match self {
            Operation::Add { .. } => OpCode::Add,
            Operation::Subtract { .. } => OpCode::Subtract,
            Operation::Multiply { .. } => OpCode::Multiply,
            Operation::Divide { .. } => OpCode::Divide,
            Operation::Move { .. } => OpCode::Move,
            Operation::Out { .. } => OpCode::Out,
            Operation::JumpNotZero { .. } => OpCode::JumpNotZero,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let opcode = self.opcode();

        match self {
            Operation::Add { result, source }
            | Operation::Subtract { result, source }
            | Operation::Multiply { result, source }
            | Operation::Divide { result, source } => {
                write!(f, "{} {} {}", opcode, result, source)
            }
            Operation::Move { register, value } => write!(f, "{} {} {}", opcode, register, value),
            Operation::Out { register } => write!(f, "{} {}", opcode, register),
            Operation::JumpNotZero { register, target } => {
                write!(f, "{} {} {}", opcode, register, target)
            }
        }
    }
}

/// Tells the machine where to continue after an instruction has been executed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProgramCounterUpdate {
    /// Continue with the instruction at the next address.
    Normal,

    /// Continue with the instruction at the given absolute address.
    Jump(usize),
}

/// A single SML instruction with an optional label.
///
/// Instructions are immutable once built. Two instructions are equal when their labels, opcodes
/// and operands are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub label: Option<String>,
    pub operation: Operation,
}

impl Instruction {
    pub fn new(label: Option<String>, operation: Operation) -> Instruction {
        Instruction { label, operation }
    }

    pub fn opcode(&self) -> OpCode {
        self.operation.opcode()
    }

    /// Executes the instruction in the context of `machine`.
    ///
    /// # Returns
    /// [ProgramCounterUpdate::Jump] if the instruction transfers control, otherwise
    /// [ProgramCounterUpdate::Normal].
    ///
    /// # Errors
    /// - [ExecutionError::ArithmeticOverflow] if `add`, `sub`, `mul` or `div` produce a value
    ///   outside of the signed 32-bit range. The registers are left untouched.
    /// - [ExecutionError::DivisionByZero] if the divisor register of `div` is zero.
    /// - [ExecutionError::UnknownLabel] if `jnz` jumps to a label that was never registered.
    pub fn execute<IO>(&self, machine: &mut Machine<IO>) -> Result<ProgramCounterUpdate, ExecutionError>
    where
        IO: Output,
    {
        match self.operation {
            Operation::Add { result, source } => {
                arithmetic(machine, OpCode::Add, result, source, i32::wrapping_add, overflow::add_overflows)?;
            }
            Operation::Subtract { result, source } => {
                arithmetic(machine, OpCode::Subtract, result, source, i32::wrapping_sub, overflow::sub_overflows)?;
            }
            Operation::Multiply { result, source } => {
                arithmetic(machine, OpCode::Multiply, result, source, i32::wrapping_mul, overflow::mul_overflows)?;
            }
            Operation::Divide { result, source } => {
                let dividend = machine.registers.get(result);
                let divisor = machine.registers.get(source);

                if divisor == 0 {
                    return Err(ExecutionError::DivisionByZero { register: source });
                }

                // i32::MIN / -1 is the only quotient that does not fit.
                let quotient = dividend.checked_div(divisor).ok_or(OverflowError {
                    opcode: OpCode::Divide,
                    result,
                    source,
                    value1: dividend,
                    value2: divisor,
                    bound: Bound::Maximum,
                })?;

                machine.registers.set(result, quotient);
            }
            Operation::Move { register, value } => {
                machine.registers.set(register, value);
            }
            Operation::Out { register } => {
                let value = machine.registers.get(register);
                machine.io.output(value);
            }
            Operation::JumpNotZero { register, ref target } => {
                if machine.registers.get(register) != 0 {
                    let address = machine.labels.get_address(target)?;
                    return Ok(ProgramCounterUpdate::Jump(address));
                }
            }
        }

        Ok(ProgramCounterUpdate::Normal)
    }
}

fn arithmetic<IO>(
    machine: &mut Machine<IO>,
    opcode: OpCode,
    result: Register,
    source: Register,
    operation: fn(i32, i32) -> i32,
    overflows: OverflowPredicate,
) -> Result<(), ExecutionError> {
    let value1 = machine.registers.get(result);
    let value2 = machine.registers.get(source);
    let value = operation(value1, value2);

    check_overflow(opcode, (result, value1), (source, value2), value, overflows)?;

    machine.registers.set(result, value);

    Ok(())
}

impl From<Operation> for Instruction {
    fn from(operation: Operation) -> Instruction {
        Instruction { label: None, operation }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(ref label) = self.label {
            write!(f, "{}: ", label)?;
        }

        write!(f, "{}", self.operation)
    }
}
