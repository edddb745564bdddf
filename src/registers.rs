//! The register bank of the SML machine.

use std::fmt;

use itertools::Itertools;

use crate::instruction::Register;

/// Array containing values for all the eight work registers.
///
/// Every register always holds a value. A fresh or [cleared](Registers::clear) bank holds zero in
/// every register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Registers {
    r: [i32; 8],
}

impl Registers {
    pub fn new() -> Registers {
        Registers::default()
    }

    pub fn get(&self, register: Register) -> i32 {
        self.r[register.index()]
    }

    pub fn set(&mut self, register: Register, value: i32) {
        self.r[register.index()] = value;
    }

    /// Sets every register to zero.
    pub fn clear(&mut self) {
        self.r = [0; 8];
    }

    /// Iterates over all registers and their values in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (Register, i32)> + '_ {
        Register::ALL.iter().map(move |&register| (register, self.get(register)))
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.iter().map(|(register, value)| format!("{} = {}", register, value)).join(", ")
        )
    }
}
