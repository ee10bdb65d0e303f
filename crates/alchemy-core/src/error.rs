//! Value error types.

use crate::type_id::TypeId;

pub type Result<T> = std::result::Result<T, ValueError>;

/// Errors surfaced by the checked value APIs.
///
/// Operations that only need to say "not applicable" (arithmetic on
/// non-numbers) use the `INVALID_TYPE` sentinel value instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    /// A checked conversion asked for a variant the value does not hold.
    #[error("expected {expected} value, found {found}")]
    TypeMismatch { expected: TypeId, found: TypeId },

    /// A checked conversion asked for a reference; `found` is the primitive kind held.
    #[error("expected reference, found {found}")]
    NotReference { found: TypeId },

    /// A short-layout word whose sub-tag is not one of the defined tags.
    #[error("corrupt short-layout tag in value {bits:#018x}")]
    CorruptTag { bits: u64 },
}
