use std::fmt;
use std::iter::FromIterator;

use itertools::Itertools;

use crate::instruction::Instruction;

/// An ordered sequence of instructions. The position of an instruction is its address.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn new() -> Program {
        Program::default()
    }

    /// Appends an instruction and returns its address.
    pub fn push(&mut self, instruction: Instruction) -> usize {
        self.instructions.push(instruction);
        self.instructions.len() - 1
    }

    pub fn get(&self, address: usize) -> Option<&Instruction> {
        self.instructions.get(address)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn clear(&mut self) {
        self.instructions.clear();
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions[..]
    }

    pub fn iter(&self) -> std::slice::Iter<Instruction> {
        self.instructions.iter()
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<I>(iter: I) -> Self
        where I: IntoIterator<Item = Instruction>
    {
        Program {
            instructions: Vec::from_iter(iter),
        }
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

/// One instruction per line, in address order.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.instructions.iter().join("\n"))
    }
}

#[test]
fn test_push_returns_address() {
    use crate::instruction::{Operation, Register};

    let mut program = Program::new();

    let first = program.push(Operation::Move { register: Register::EAX, value: 1 }.into());
    let second = program.push(Operation::Out { register: Register::EAX }.into());

    assert_eq!((first, second), (0, 1));
    assert_eq!(program.len(), 2);
    assert_eq!(program.to_string(), "mov EAX 1\nout EAX");
    assert_eq!(program.get(1).map(|ins| ins.to_string()), Some("out EAX".to_string()));
    assert!(program.get(2).is_none());

    program.clear();
    assert!(program.is_empty());
}
