//! Arithmetic over packed values with binary numeric promotion.
//!
//! Operand kinds are ordered `Int < UInt < Float < Double`; a mixed pair is
//! computed in the wider of the two native types and re-wrapped in that kind.
//! Integer sums wrap on overflow. Any non-numeric operand yields
//! [`Value::INVALID`].
//!
//! Double results go through [`Value::from_double`] unchanged, so they share
//! its band collision: a NaN sum whose payload puts `0xfffe` or `0xffff` in
//! the top 16 bits (for instance a negative quiet NaN float widened to f64)
//! comes back in the short or reference band and is no longer numeric. NaNs
//! are not canonicalised. Check the native sum with
//! [`Value::is_colliding_double`] or the result with `is_numeric` when that
//! matters; `decode_double` on the raw word still restores the sum's bits.

use alchemy_core::type_id::TypeId;
use alchemy_core::value::{Reference, Value};
use alchemy_core::visit::Visitor;

/// Native types that take part in promotion.
pub trait Numeric: Copy {
    /// Kind a result of this type is stored as.
    const KIND: TypeId;
}

impl Numeric for i32 {
    const KIND: TypeId = TypeId::INT;
}
impl Numeric for u32 {
    const KIND: TypeId = TypeId::UINT;
}
impl Numeric for f32 {
    const KIND: TypeId = TypeId::FLOAT;
}
impl Numeric for f64 {
    const KIND: TypeId = TypeId::DOUBLE;
}

/// Addition in the promoted type of `Self` and `Rhs`.
pub trait PromotedAdd<Rhs: Numeric>: Numeric {
    fn promoted_add(self, rhs: Rhs) -> Value;
}

macro_rules! promoted_add {
    ($($lhs:ty, $rhs:ty => $ctor:ident(|$l:ident, $r:ident| $body:expr);)*) => {
        $(
            impl PromotedAdd<$rhs> for $lhs {
                #[inline]
                fn promoted_add(self, rhs: $rhs) -> Value {
                    let ($l, $r) = (self, rhs);
                    Value::$ctor($body)
                }
            }
        )*
    };
}

promoted_add! {
    i32, i32 => from_int(|l, r| l.wrapping_add(r));
    i32, u32 => from_uint(|l, r| (l as u32).wrapping_add(r));
    i32, f32 => from_float(|l, r| l as f32 + r);
    i32, f64 => from_double(|l, r| l as f64 + r);

    u32, i32 => from_uint(|l, r| l.wrapping_add(r as u32));
    u32, u32 => from_uint(|l, r| l.wrapping_add(r));
    u32, f32 => from_float(|l, r| l as f32 + r);
    u32, f64 => from_double(|l, r| l as f64 + r);

    f32, i32 => from_float(|l, r| l + r as f32);
    f32, u32 => from_float(|l, r| l + r as f32);
    f32, f32 => from_float(|l, r| l + r);
    f32, f64 => from_double(|l, r| l as f64 + r);

    f64, i32 => from_double(|l, r| l + r as f64);
    f64, u32 => from_double(|l, r| l + r as f64);
    f64, f32 => from_double(|l, r| l + r as f64);
    f64, f64 => from_double(|l, r| l + r);
}

/// Left operand kinds that can be added to any numeric right operand.
pub trait AddOperand:
    PromotedAdd<i32> + PromotedAdd<u32> + PromotedAdd<f32> + PromotedAdd<f64>
{
}

impl<T> AddOperand for T where
    T: PromotedAdd<i32> + PromotedAdd<u32> + PromotedAdd<f32> + PromotedAdd<f64>
{
}

/// Decodes the left operand, then dispatches on the right one.
struct AddLhs {
    rhs: Value,
}

impl AddLhs {
    #[inline]
    fn with<L: AddOperand>(self, lhs: L) -> Value {
        self.rhs.apply(AddRhs(lhs))
    }
}

impl Visitor for AddLhs {
    type Output = Value;

    fn visit_type_id(self, _: TypeId) -> Value {
        Value::INVALID
    }
    fn visit_null(self) -> Value {
        Value::INVALID
    }
    fn visit_bool(self, _: bool) -> Value {
        Value::INVALID
    }
    fn visit_int(self, i: i32) -> Value {
        self.with(i)
    }
    fn visit_uint(self, u: u32) -> Value {
        self.with(u)
    }
    fn visit_float(self, f: f32) -> Value {
        self.with(f)
    }
    fn visit_reference(self, _: Reference) -> Value {
        Value::INVALID
    }
    fn visit_double(self, d: f64) -> Value {
        self.with(d)
    }
}

struct AddRhs<L>(L);

impl<L: AddOperand> Visitor for AddRhs<L> {
    type Output = Value;

    fn visit_type_id(self, _: TypeId) -> Value {
        Value::INVALID
    }
    fn visit_null(self) -> Value {
        Value::INVALID
    }
    fn visit_bool(self, _: bool) -> Value {
        Value::INVALID
    }
    fn visit_int(self, i: i32) -> Value {
        self.0.promoted_add(i)
    }
    fn visit_uint(self, u: u32) -> Value {
        self.0.promoted_add(u)
    }
    fn visit_float(self, f: f32) -> Value {
        self.0.promoted_add(f)
    }
    fn visit_reference(self, _: Reference) -> Value {
        Value::INVALID
    }
    fn visit_double(self, d: f64) -> Value {
        self.0.promoted_add(d)
    }
}

/// Add two values, dispatching on both native payloads through [`Value::apply`].
#[inline]
pub fn add(lhs: Value, rhs: Value) -> Value {
    lhs.apply(AddLhs { rhs })
}

/// Add two values by enumerating the numeric kind pairs.
///
/// Agrees with [`add`] for every well-formed operand pair. Corrupt short
/// tags report `INVALID` here instead of reaching the visitor fallback.
pub fn add_by_kind(lhs: Value, rhs: Value) -> Value {
    match (lhs.get_type(), rhs.get_type()) {
        (TypeId::INT, TypeId::INT) => lhs.get_int().promoted_add(rhs.get_int()),
        (TypeId::INT, TypeId::UINT) => lhs.get_int().promoted_add(rhs.get_uint()),
        (TypeId::INT, TypeId::FLOAT) => lhs.get_int().promoted_add(rhs.get_float()),
        (TypeId::INT, TypeId::DOUBLE) => lhs.get_int().promoted_add(rhs.get_double()),

        (TypeId::UINT, TypeId::INT) => lhs.get_uint().promoted_add(rhs.get_int()),
        (TypeId::UINT, TypeId::UINT) => lhs.get_uint().promoted_add(rhs.get_uint()),
        (TypeId::UINT, TypeId::FLOAT) => lhs.get_uint().promoted_add(rhs.get_float()),
        (TypeId::UINT, TypeId::DOUBLE) => lhs.get_uint().promoted_add(rhs.get_double()),

        (TypeId::FLOAT, TypeId::INT) => lhs.get_float().promoted_add(rhs.get_int()),
        (TypeId::FLOAT, TypeId::UINT) => lhs.get_float().promoted_add(rhs.get_uint()),
        (TypeId::FLOAT, TypeId::FLOAT) => lhs.get_float().promoted_add(rhs.get_float()),
        (TypeId::FLOAT, TypeId::DOUBLE) => lhs.get_float().promoted_add(rhs.get_double()),

        (TypeId::DOUBLE, TypeId::INT) => lhs.get_double().promoted_add(rhs.get_int()),
        (TypeId::DOUBLE, TypeId::UINT) => lhs.get_double().promoted_add(rhs.get_uint()),
        (TypeId::DOUBLE, TypeId::FLOAT) => lhs.get_double().promoted_add(rhs.get_float()),
        (TypeId::DOUBLE, TypeId::DOUBLE) => lhs.get_double().promoted_add(rhs.get_double()),

        _ => Value::INVALID,
    }
}

/// Result kind of adding `lhs` and `rhs`, or `INVALID` if either is not numeric.
pub fn promoted_kind(lhs: TypeId, rhs: TypeId) -> TypeId {
    let rank = |t: TypeId| match t {
        TypeId::INT => Some(0),
        TypeId::UINT => Some(1),
        TypeId::FLOAT => Some(2),
        TypeId::DOUBLE => Some(3),
        _ => None,
    };
    match (rank(lhs), rank(rhs)) {
        (Some(a), Some(b)) => {
            if a >= b {
                lhs
            } else {
                rhs
            }
        }
        _ => TypeId::INVALID,
    }
}
