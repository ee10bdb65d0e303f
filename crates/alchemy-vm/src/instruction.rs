//! Instruction numbering and evaluation.

use crate::arith;
use crate::error::InstructionError;
use alchemy_core::value::Value;
use std::fmt;

/// Binary instruction opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Add = 0,
}

impl Opcode {
    pub fn name(self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = InstructionError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(Opcode::Add),
            other => Err(InstructionError::UnknownOpcode(other)),
        }
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        op as u8
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stateless binary instruction over two values.
///
/// Non-applicable operands produce `Value::INVALID`; there is no other
/// error channel.
pub trait Instruction {
    const OPCODE: Opcode;

    fn evaluate(lhs: Value, rhs: Value) -> Value;
}

/// `ADD`: numeric addition with promotion.
pub struct Add;

impl Instruction for Add {
    const OPCODE: Opcode = Opcode::Add;

    #[inline]
    fn evaluate(lhs: Value, rhs: Value) -> Value {
        arith::add(lhs, rhs)
    }
}

/// Evaluate `op` on two operands.
#[inline]
pub fn execute(op: Opcode, lhs: Value, rhs: Value) -> Value {
    match op {
        Opcode::Add => Add::evaluate(lhs, rhs),
    }
}

/// Decode a raw opcode byte, then evaluate it.
pub fn execute_raw(byte: u8, lhs: Value, rhs: Value) -> Result<Value, InstructionError> {
    let op = Opcode::try_from(byte)?;
    Ok(execute(op, lhs, rhs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip() {
        assert_eq!(Opcode::try_from(0u8), Ok(Opcode::Add));
        assert_eq!(u8::from(Opcode::Add), 0);
        assert_eq!(Add::OPCODE, Opcode::Add);
        assert_eq!(Opcode::Add.to_string(), "ADD");
    }

    #[test]
    fn test_unknown_opcode() {
        let err = Opcode::try_from(0x2a).unwrap_err();
        assert_eq!(err, InstructionError::UnknownOpcode(0x2a));
        assert_eq!(err.to_string(), "unknown opcode 0x2a");
    }

    #[test]
    fn test_execute_add() {
        let r = execute(Opcode::Add, Value::from(40i32), Value::from(2i32));
        assert_eq!(r.as_int(), Some(42));
    }

    #[test]
    fn test_execute_raw() {
        let r = execute_raw(0, Value::from(1u32), Value::from(1u32)).unwrap();
        assert_eq!(r.as_uint(), Some(2));
        assert!(execute_raw(9, Value::null(), Value::null()).is_err());
    }
}
