//! VM error types.

/// Errors raised while decoding instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InstructionError {
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),
}
