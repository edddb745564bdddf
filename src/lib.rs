//! A crate for translating and executing programs written in SML, a small assembly language for
//! an imaginary register machine.
//!
//! The machine has eight signed 32-bit work registers (`EAX`, `EBX`, `ECX`, `EDX`, `ESP`, `EBP`,
//! `ESI`, `EDI`) and understands seven instructions:
//!
//! | Instruction       | Effect                                             |
//! |-------------------|----------------------------------------------------|
//! | `add R S`         | `R = R + S`                                        |
//! | `sub R S`         | `R = R - S`                                        |
//! | `mul R S`         | `R = R * S`                                        |
//! | `div R S`         | `R = R / S`, truncated toward zero                 |
//! | `mov R n`         | `R = n`                                            |
//! | `out R`           | writes the value of `R` to the output              |
//! | `jnz R label`     | continues at `label` if `R` is not zero            |
//!
//! Arithmetic that leaves the 32-bit range stops the program with an error instead of wrapping.
//!
//! Currently this crate provides the functionality to:
//! - Translate SML source text into a [Program](program::Program) and a
//!   [LabelTable](label_table::LabelTable).
//! - Execute the program on a [Machine](machine::Machine).
//!
//! # Example
//! ```
//! use sml::{
//!     machine::{Machine, TestIo},
//!     translator::{InstructionTable, Translator},
//! };
//!
//! // Counts down from three and outputs each value.
//! let source = r#"
//!         mov EAX 3
//!         mov EBX 1
//!     f:  out EAX
//!         sub EAX EBX
//!         jnz EAX f
//! "#;
//!
//! let table = InstructionTable::new();
//! let translator = Translator::new(&table);
//!
//! let mut machine = Machine::new(TestIo::new());
//! machine.load(&translator, source)
//!     .expect("could not translate the program");
//!
//! machine.execute()
//!     .expect("an error occured while executing the program");
//!
//! assert_eq!(machine.io.values(), &[3, 2, 1]);
//! ```
//!
//! # Executables
//!
//! ## `smlrun`
//!
//! Translates and executes a source file, printing the output of `out` instructions to the
//! standard output. Built with the `smlrun` feature.
//!
//! ```text
//! $ smlrun --registers countdown.sml
//! 3
//! 2
//! 1
//! [EAX = 0, EBX = 1, ECX = 0, EDX = 0, ESP = 0, EBP = 0, ESI = 0, EDI = 0]
//! ```

pub mod error;
pub mod instruction;
pub mod label_table;
pub mod machine;
pub mod overflow;
pub mod program;
pub mod registers;
pub mod translator;
