//! Packed 64-bit value representation.
//!
//! The layout is selected by the top 16 bits of the word:
//!
//! | top 16 bits     | layout    | payload                                         |
//! |-----------------|-----------|-------------------------------------------------|
//! | `0xffff`        | short     | 32-bit tag `0xffff000N` + 32-bit value          |
//! | `0x0000`        | reference | 48-bit address of externally owned heap data    |
//! | anything else   | double    | raw IEEE-754 bits + `2^48`                      |
//!
//! Short tags (upper 32 bits):
//!   0xffff0000 = type descriptor (payload: TypeId)
//!   0xffff0001 = null            (payload: 0)
//!   0xffff0002 = bool            (payload: 0 or 1)
//!   0xffff0003 = int             (payload: i32)
//!   0xffff0004 = uint            (payload: u32)
//!   0xffff0005 = float           (payload: f32 bits)
//!
//! Doubles whose raw top 16 bits are `0xfffe` or `0xffff` (negative NaNs with
//! specific payloads) bias into the short and reference bands respectively.
//! They are stored as-is; use [`Value::is_colliding_double`] to detect them.

use crate::error::ValueError;
use crate::type_id::TypeId;
use crate::visit::Unpacked;
use std::fmt;

pub const LAYOUT_MASK: u64 = 0xFFFF_0000_0000_0000;
pub const SHORT_LAYOUT: u64 = 0xFFFF_0000_0000_0000;
pub const REFERENCE_LAYOUT: u64 = 0x0000_0000_0000_0000;

/// Bits holding a short-layout tag, and how far they are shifted.
pub const SHORT_TAG_SHIFT: u32 = 32;
/// Lower 32 bits: short-layout payload.
pub const SHORT_PAYLOAD_MASK: u64 = 0x0000_0000_FFFF_FFFF;
/// Lower 48 bits: reference address.
pub const REFERENCE_MASK: u64 = 0x0000_FFFF_FFFF_FFFF;

/// Bias added to the raw bits of a double (`2^48`).
pub const DOUBLE_ENCODING_OFFSET: u64 = 0x0001_0000_0000_0000;

pub const TYPE_ID_TAG: u32 = 0xFFFF_0000;
pub const NULL_TAG: u32 = 0xFFFF_0001;
pub const BOOL_TAG: u32 = 0xFFFF_0002;
pub const INT_TAG: u32 = 0xFFFF_0003;
pub const UINT_TAG: u32 = 0xFFFF_0004;
pub const FLOAT_TAG: u32 = 0xFFFF_0005;

const fn short(tag: u32, payload: u32) -> u64 {
    ((tag as u64) << SHORT_TAG_SHIFT) | payload as u64
}

pub const INVALID_TYPE: u64 = short(TYPE_ID_TAG, TypeId::INVALID.0);
pub const TYPE_TYPE: u64 = short(TYPE_ID_TAG, TypeId::TYPE.0);
pub const NULL_TYPE: u64 = short(TYPE_ID_TAG, TypeId::NULL.0);
pub const BOOL_TYPE: u64 = short(TYPE_ID_TAG, TypeId::BOOL.0);
pub const INT_TYPE: u64 = short(TYPE_ID_TAG, TypeId::INT.0);
pub const UINT_TYPE: u64 = short(TYPE_ID_TAG, TypeId::UINT.0);
pub const FLOAT_TYPE: u64 = short(TYPE_ID_TAG, TypeId::FLOAT.0);
pub const DOUBLE_TYPE: u64 = short(TYPE_ID_TAG, TypeId::DOUBLE.0);

pub const NULL_VALUE: u64 = short(NULL_TAG, 0);
pub const TRUE_VALUE: u64 = short(BOOL_TAG, 1);
pub const FALSE_VALUE: u64 = short(BOOL_TAG, 0);

/// Address of heap data owned by someone else (the VM's heap manager).
///
/// Only the low 48 bits are kept. A `Value` never dereferences or frees it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Reference(u64);

impl Reference {
    #[inline]
    pub fn new(addr: usize) -> Self {
        let addr = addr as u64;
        debug_assert!(
            addr & !REFERENCE_MASK == 0,
            "reference {addr:#x} exceeds 48-bit address space"
        );
        Reference(addr & REFERENCE_MASK)
    }

    #[inline]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self::new(ptr as usize)
    }

    #[inline]
    pub fn addr(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn as_ptr<T>(self) -> *const T {
        self.0 as usize as *const T
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A tagged value packed into 8 bytes.
///
/// Equality and hashing compare the raw word.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Value(u64);

impl Default for Value {
    #[inline]
    fn default() -> Self {
        Value::null()
    }
}

impl Value {
    /// The sentinel returned by operations whose operands were not applicable.
    pub const INVALID: Value = Value(INVALID_TYPE);
    pub const NULL: Value = Value(NULL_VALUE);
    pub const TRUE: Value = Value(TRUE_VALUE);
    pub const FALSE: Value = Value(FALSE_VALUE);

    // ---- Constructors ----

    /// Wrap a raw 64-bit pattern. No validation is done.
    #[inline]
    pub const fn from_raw_bits(bits: u64) -> Self {
        Value(bits)
    }

    /// Create a type descriptor value.
    #[inline]
    pub const fn from_type_id(id: TypeId) -> Self {
        Value(short(TYPE_ID_TAG, id.0))
    }

    /// Create a null value.
    #[inline]
    pub const fn null() -> Self {
        Value(NULL_VALUE)
    }

    /// Create a boolean value.
    #[inline]
    pub const fn from_bool(b: bool) -> Self {
        if b {
            Value(TRUE_VALUE)
        } else {
            Value(FALSE_VALUE)
        }
    }

    /// Create a signed 32-bit integer value.
    #[inline]
    pub const fn from_int(i: i32) -> Self {
        Value(short(INT_TAG, i as u32))
    }

    /// Create an unsigned 32-bit integer value.
    #[inline]
    pub const fn from_uint(u: u32) -> Self {
        Value(short(UINT_TAG, u))
    }

    /// Create a 32-bit float value. NaN payloads are kept.
    #[inline]
    pub fn from_float(f: f32) -> Self {
        Value(short(FLOAT_TAG, f.to_bits()))
    }

    /// Store a double in the biased double layout.
    #[inline]
    pub fn from_double(d: f64) -> Self {
        Value(encode_double(d))
    }

    /// Create a reference to externally owned heap data.
    #[inline]
    pub fn from_reference(r: Reference) -> Self {
        Value(REFERENCE_LAYOUT | r.0)
    }

    // ---- Setters ----

    /// Overwrite with a type descriptor.
    #[inline]
    pub fn set_type_id(&mut self, id: TypeId) {
        *self = Self::from_type_id(id);
    }

    /// Overwrite with null.
    #[inline]
    pub fn set_null(&mut self) {
        self.0 = NULL_VALUE;
    }

    /// Overwrite with a boolean.
    #[inline]
    pub fn set_bool(&mut self, b: bool) {
        *self = Self::from_bool(b);
    }

    /// Overwrite with `true`.
    #[inline]
    pub fn set_true(&mut self) {
        self.0 = TRUE_VALUE;
    }

    /// Overwrite with `false`.
    #[inline]
    pub fn set_false(&mut self) {
        self.0 = FALSE_VALUE;
    }

    /// Overwrite with a signed integer.
    #[inline]
    pub fn set_int(&mut self, i: i32) {
        *self = Self::from_int(i);
    }

    /// Overwrite with an unsigned integer.
    #[inline]
    pub fn set_uint(&mut self, u: u32) {
        *self = Self::from_uint(u);
    }

    /// Overwrite with a 32-bit float.
    #[inline]
    pub fn set_float(&mut self, f: f32) {
        *self = Self::from_float(f);
    }

    /// Overwrite with a double.
    #[inline]
    pub fn set_double(&mut self, d: f64) {
        *self = Self::from_double(d);
    }

    /// Overwrite with a reference.
    #[inline]
    pub fn set_reference(&mut self, r: Reference) {
        *self = Self::from_reference(r);
    }

    // ---- Layout checks ----

    /// Top 16 bits are `0xffff`.
    #[inline]
    pub const fn is_short_layout(&self) -> bool {
        (self.0 & LAYOUT_MASK) == SHORT_LAYOUT
    }

    /// Top 16 bits are `0x0000`.
    #[inline]
    pub const fn is_reference_layout(&self) -> bool {
        (self.0 & LAYOUT_MASK) == REFERENCE_LAYOUT
    }

    /// Neither the short nor the reference band.
    #[inline]
    pub const fn is_double_layout(&self) -> bool {
        !self.is_short_layout() && !self.is_reference_layout()
    }

    /// Upper 32 bits. Only meaningful in short layout.
    #[inline]
    pub(crate) const fn tag(&self) -> u32 {
        (self.0 >> SHORT_TAG_SHIFT) as u32
    }

    #[inline]
    const fn payload(&self) -> u32 {
        (self.0 & SHORT_PAYLOAD_MASK) as u32
    }

    /// True if `d` lands outside the double band once biased.
    #[inline]
    pub fn is_colliding_double(d: f64) -> bool {
        d.to_bits() >= 0xFFFE_0000_0000_0000
    }

    // ---- Type checks ----

    /// Returns true if this holds a type descriptor.
    #[inline]
    pub const fn is_type_id(&self) -> bool {
        self.tag() == TYPE_ID_TAG
    }

    /// Returns true if this is null.
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.tag() == NULL_TAG
    }

    /// Returns true if this is a boolean.
    #[inline]
    pub const fn is_bool(&self) -> bool {
        self.tag() == BOOL_TAG
    }

    /// Exactly the `true` word.
    #[inline]
    pub const fn is_true(&self) -> bool {
        self.0 == TRUE_VALUE
    }

    /// Exactly the `false` word.
    #[inline]
    pub const fn is_false(&self) -> bool {
        self.0 == FALSE_VALUE
    }

    /// Returns true if this is a signed integer.
    #[inline]
    pub const fn is_int(&self) -> bool {
        self.tag() == INT_TAG
    }

    /// Returns true if this is an unsigned integer.
    #[inline]
    pub const fn is_uint(&self) -> bool {
        self.tag() == UINT_TAG
    }

    /// Returns true if this is a 32-bit float.
    #[inline]
    pub const fn is_float(&self) -> bool {
        self.tag() == FLOAT_TAG
    }

    /// Returns true if this is a reference (any word in the reference band).
    #[inline]
    pub const fn is_reference(&self) -> bool {
        self.is_reference_layout()
    }

    /// Returns true if this is a double (any word in the double band).
    #[inline]
    pub const fn is_double(&self) -> bool {
        self.is_double_layout()
    }

    /// Int, uint, float or double.
    #[inline]
    pub const fn is_numeric(&self) -> bool {
        self.is_int() || self.is_uint() || self.is_float() || self.is_double()
    }

    /// False only for the `INVALID_TYPE` sentinel.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 != INVALID_TYPE
    }

    /// Type descriptor of the current variant.
    ///
    /// References always report `INVALID`: their type lives in heap metadata
    /// this crate cannot see. Corrupt short tags also report `INVALID`.
    pub const fn get_type(&self) -> TypeId {
        if self.is_short_layout() {
            match self.tag() {
                TYPE_ID_TAG => TypeId::TYPE,
                NULL_TAG => TypeId::NULL,
                BOOL_TAG => TypeId::BOOL,
                INT_TAG => TypeId::INT,
                UINT_TAG => TypeId::UINT,
                FLOAT_TAG => TypeId::FLOAT,
                _ => TypeId::INVALID,
            }
        } else if self.is_reference_layout() {
            TypeId::INVALID
        } else {
            TypeId::DOUBLE
        }
    }

    // ---- Unchecked accessors ----
    //
    // Callers must check the matching predicate first. Reading the wrong
    // variant yields garbage (and trips a debug assertion).

    #[inline]
    pub fn get_type_id(&self) -> TypeId {
        debug_assert!(self.is_type_id());
        TypeId(self.payload())
    }

    #[inline]
    pub fn get_null(&self) {
        debug_assert!(self.is_null());
    }

    #[inline]
    pub fn get_bool(&self) -> bool {
        debug_assert!(self.is_bool());
        self.0 == TRUE_VALUE
    }

    #[inline]
    pub fn get_int(&self) -> i32 {
        debug_assert!(self.is_int());
        self.payload() as i32
    }

    #[inline]
    pub fn get_uint(&self) -> u32 {
        debug_assert!(self.is_uint());
        self.payload()
    }

    #[inline]
    pub fn get_float(&self) -> f32 {
        debug_assert!(self.is_float());
        f32::from_bits(self.payload())
    }

    #[inline]
    pub fn get_reference(&self) -> Reference {
        debug_assert!(self.is_reference());
        Reference(self.0 & REFERENCE_MASK)
    }

    #[inline]
    pub fn get_double(&self) -> f64 {
        debug_assert!(self.is_double());
        decode_double(self.0)
    }

    // ---- Checked accessors ----

    #[inline]
    pub fn as_type_id(&self) -> Option<TypeId> {
        self.is_type_id().then(|| self.get_type_id())
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        self.is_bool().then(|| self.get_bool())
    }

    #[inline]
    pub fn as_int(&self) -> Option<i32> {
        self.is_int().then(|| self.get_int())
    }

    #[inline]
    pub fn as_uint(&self) -> Option<u32> {
        self.is_uint().then(|| self.get_uint())
    }

    #[inline]
    pub fn as_float(&self) -> Option<f32> {
        self.is_float().then(|| self.get_float())
    }

    #[inline]
    pub fn as_reference(&self) -> Option<Reference> {
        self.is_reference().then(|| self.get_reference())
    }

    #[inline]
    pub fn as_double(&self) -> Option<f64> {
        self.is_double().then(|| self.get_double())
    }

    #[inline]
    pub const fn raw_bits(&self) -> u64 {
        self.0
    }
}

/// Raw double bits plus the bias. Integer arithmetic, so every pattern survives.
#[inline]
pub fn encode_double(d: f64) -> u64 {
    d.to_bits().wrapping_add(DOUBLE_ENCODING_OFFSET)
}

#[inline]
pub fn decode_double(bits: u64) -> f64 {
    f64::from_bits(bits.wrapping_sub(DOUBLE_ENCODING_OFFSET))
}

// ---- Native conversions ----

macro_rules! impl_from_native {
    ($($ty:ty => $ctor:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(v: $ty) -> Self {
                    Value::$ctor(v)
                }
            }
        )*
    };
}

impl_from_native! {
    TypeId => from_type_id,
    bool => from_bool,
    i32 => from_int,
    u32 => from_uint,
    f32 => from_float,
    f64 => from_double,
    Reference => from_reference,
}

impl From<()> for Value {
    #[inline]
    fn from(_: ()) -> Self {
        Value::null()
    }
}

macro_rules! impl_try_from_value {
    ($($ty:ty => $as:ident, $expected:expr);* $(;)?) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = ValueError;

                #[inline]
                fn try_from(v: Value) -> crate::error::Result<Self> {
                    v.$as().ok_or(ValueError::TypeMismatch {
                        expected: $expected,
                        found: v.get_type(),
                    })
                }
            }
        )*
    };
}

impl_try_from_value! {
    TypeId => as_type_id, TypeId::TYPE;
    bool => as_bool, TypeId::BOOL;
    i32 => as_int, TypeId::INT;
    u32 => as_uint, TypeId::UINT;
    f32 => as_float, TypeId::FLOAT;
    f64 => as_double, TypeId::DOUBLE;
}

impl TryFrom<Value> for Reference {
    type Error = ValueError;

    #[inline]
    fn try_from(v: Value) -> crate::error::Result<Self> {
        v.as_reference().ok_or(ValueError::NotReference {
            found: v.get_type(),
        })
    }
}

impl TryFrom<Value> for () {
    type Error = ValueError;

    fn try_from(v: Value) -> crate::error::Result<Self> {
        if v.is_null() {
            Ok(())
        } else {
            Err(ValueError::TypeMismatch {
                expected: TypeId::NULL,
                found: v.get_type(),
            })
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unpack() {
            Ok(Unpacked::TypeId(id)) => write!(f, "Type({id})"),
            Ok(Unpacked::Null) => write!(f, "Null"),
            Ok(Unpacked::Bool(b)) => write!(f, "Bool({b})"),
            Ok(Unpacked::Int(i)) => write!(f, "Int({i})"),
            Ok(Unpacked::UInt(u)) => write!(f, "UInt({u})"),
            Ok(Unpacked::Float(x)) => write!(f, "Float({x:?})"),
            Ok(Unpacked::Reference(r)) => write!(f, "Reference({r:?})"),
            Ok(Unpacked::Double(d)) => write!(f, "Double({d:?})"),
            Err(_) => write!(f, "Corrupt({:#018x})", self.0),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unpack() {
            Ok(Unpacked::TypeId(id)) => write!(f, "{id}"),
            Ok(Unpacked::Null) => write!(f, "null"),
            Ok(Unpacked::Bool(b)) => write!(f, "{b}"),
            Ok(Unpacked::Int(i)) => write!(f, "{i}"),
            Ok(Unpacked::UInt(u)) => write!(f, "{u}"),
            Ok(Unpacked::Float(x)) => write!(f, "{x}"),
            Ok(Unpacked::Reference(r)) => write!(f, "{r:?}"),
            Ok(Unpacked::Double(d)) => write!(f, "{d}"),
            Err(_) => write!(f, "<corrupt {:#018x}>", self.0),
        }
    }
}
