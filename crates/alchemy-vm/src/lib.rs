//! Alchemy VM: instructions over packed values.

pub mod arith;
pub mod error;
pub mod instruction;

pub use arith::{add, add_by_kind};
pub use error::InstructionError;
pub use instruction::{execute, Instruction, Opcode};
