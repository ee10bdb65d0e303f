//! Primitive type descriptors.

use std::fmt;

/// Identifies one of the primitive value kinds.
///
/// Wraps a raw `u32` so any number can be carried around (a `Value` may hold a
/// descriptor for a type this enumeration does not know about), but only the
/// associated constants below are meaningful. `INVALID` is zero and the default.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const INVALID: TypeId = TypeId(0);
    pub const TYPE: TypeId = TypeId(1);
    pub const NULL: TypeId = TypeId(2);
    pub const BOOL: TypeId = TypeId(3);
    pub const INT: TypeId = TypeId(4);
    pub const UINT: TypeId = TypeId(5);
    pub const FLOAT: TypeId = TypeId(6);
    pub const DOUBLE: TypeId = TypeId(7);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        TypeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// False only for `INVALID`.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Short lowercase name of a raw type id; `"(invalid)"` for anything undefined.
    pub const fn name_of(raw: u32) -> &'static str {
        match raw {
            1 => "type",
            2 => "null",
            3 => "bool",
            4 => "int",
            5 => "uint",
            6 => "float",
            7 => "double",
            _ => "(invalid)",
        }
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        Self::name_of(self.0)
    }
}

impl From<u32> for TypeId {
    #[inline]
    fn from(raw: u32) -> Self {
        TypeId(raw)
    }
}

impl From<TypeId> for u32 {
    #[inline]
    fn from(id: TypeId) -> Self {
        id.0
    }
}

impl From<TypeId> for bool {
    #[inline]
    fn from(id: TypeId) -> Self {
        id.is_valid()
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({}:{})", self.0, self.name())
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
