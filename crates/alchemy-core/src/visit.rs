//! Static dispatch over the native payload of a [`Value`].

use crate::error::{Result, ValueError};
use crate::type_id::TypeId;
use crate::value::{
    Reference, Value, BOOL_TAG, FLOAT_TAG, INT_TAG, NULL_TAG, TYPE_ID_TAG, UINT_TAG,
};

/// One method per native payload type. Implementors are consumed by
/// [`Value::apply`], which calls exactly one method.
pub trait Visitor {
    type Output;

    fn visit_type_id(self, id: TypeId) -> Self::Output;
    fn visit_null(self) -> Self::Output;
    fn visit_bool(self, b: bool) -> Self::Output;
    fn visit_int(self, i: i32) -> Self::Output;
    fn visit_uint(self, u: u32) -> Self::Output;
    fn visit_float(self, f: f32) -> Self::Output;
    fn visit_reference(self, r: Reference) -> Self::Output;
    fn visit_double(self, d: f64) -> Self::Output;
}

/// A decoded value, for callers that prefer `match` over a visitor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Unpacked {
    TypeId(TypeId),
    Null,
    Bool(bool),
    Int(i32),
    UInt(u32),
    Float(f32),
    Reference(Reference),
    Double(f64),
}

impl Unpacked {
    pub fn accept<V: Visitor>(self, visitor: V) -> V::Output {
        match self {
            Unpacked::TypeId(id) => visitor.visit_type_id(id),
            Unpacked::Null => visitor.visit_null(),
            Unpacked::Bool(b) => visitor.visit_bool(b),
            Unpacked::Int(i) => visitor.visit_int(i),
            Unpacked::UInt(u) => visitor.visit_uint(u),
            Unpacked::Float(f) => visitor.visit_float(f),
            Unpacked::Reference(r) => visitor.visit_reference(r),
            Unpacked::Double(d) => visitor.visit_double(d),
        }
    }
}

impl From<Unpacked> for Value {
    fn from(u: Unpacked) -> Self {
        match u {
            Unpacked::TypeId(id) => Value::from_type_id(id),
            Unpacked::Null => Value::null(),
            Unpacked::Bool(b) => Value::from_bool(b),
            Unpacked::Int(i) => Value::from_int(i),
            Unpacked::UInt(x) => Value::from_uint(x),
            Unpacked::Float(f) => Value::from_float(f),
            Unpacked::Reference(r) => Value::from_reference(r),
            Unpacked::Double(d) => Value::from_double(d),
        }
    }
}

impl Value {
    /// Decode the current variant.
    ///
    /// Never panics. A short-layout word with an undefined tag is reported
    /// as [`ValueError::CorruptTag`].
    pub fn unpack(&self) -> Result<Unpacked> {
        if self.is_short_layout() {
            match self.tag() {
                TYPE_ID_TAG => Ok(Unpacked::TypeId(self.get_type_id())),
                NULL_TAG => Ok(Unpacked::Null),
                BOOL_TAG => Ok(Unpacked::Bool(self.get_bool())),
                INT_TAG => Ok(Unpacked::Int(self.get_int())),
                UINT_TAG => Ok(Unpacked::UInt(self.get_uint())),
                FLOAT_TAG => Ok(Unpacked::Float(self.get_float())),
                _ => Err(ValueError::CorruptTag {
                    bits: self.raw_bits(),
                }),
            }
        } else if self.is_reference_layout() {
            Ok(Unpacked::Reference(self.get_reference()))
        } else {
            Ok(Unpacked::Double(self.get_double()))
        }
    }

    /// Call the visitor method matching the current variant with its native payload.
    ///
    /// A corrupt short tag is logged and treated as null. Debug builds (and
    /// the `strict-tags` feature) panic instead.
    #[inline]
    pub fn apply<V: Visitor>(self, visitor: V) -> V::Output {
        match self.unpack() {
            Ok(unpacked) => unpacked.accept(visitor),
            Err(err) => {
                corrupt_tag(err);
                visitor.visit_null()
            }
        }
    }
}

#[cold]
#[inline(never)]
fn corrupt_tag(err: ValueError) {
    log::error!("{err}; treating it as null");
    if cfg!(any(debug_assertions, feature = "strict-tags")) {
        panic!("{err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records which arm ran.
    struct Name;

    impl Visitor for Name {
        type Output = String;

        fn visit_type_id(self, id: TypeId) -> String {
            format!("type:{id}")
        }
        fn visit_null(self) -> String {
            "null".into()
        }
        fn visit_bool(self, b: bool) -> String {
            format!("bool:{b}")
        }
        fn visit_int(self, i: i32) -> String {
            format!("int:{i}")
        }
        fn visit_uint(self, u: u32) -> String {
            format!("uint:{u}")
        }
        fn visit_float(self, f: f32) -> String {
            format!("float:{f}")
        }
        fn visit_reference(self, r: Reference) -> String {
            format!("ref:{:#x}", r.addr())
        }
        fn visit_double(self, d: f64) -> String {
            format!("double:{d}")
        }
    }

    #[test]
    fn test_apply_each_arm() {
        assert_eq!(Value::from(TypeId::INT).apply(Name), "type:int");
        assert_eq!(Value::null().apply(Name), "null");
        assert_eq!(Value::from(false).apply(Name), "bool:false");
        assert_eq!(Value::from(-7i32).apply(Name), "int:-7");
        assert_eq!(Value::from(7u32).apply(Name), "uint:7");
        assert_eq!(Value::from(0.5f32).apply(Name), "float:0.5");
        assert_eq!(
            Value::from(Reference::new(0x1000)).apply(Name),
            "ref:0x1000"
        );
        assert_eq!(Value::from(2.25f64).apply(Name), "double:2.25");
    }

    #[test]
    fn test_unpack_corrupt_tag() {
        let v = Value::from_raw_bits(0xFFFF_00AB_0000_0001);
        assert_eq!(
            v.unpack(),
            Err(ValueError::CorruptTag {
                bits: 0xFFFF_00AB_0000_0001
            })
        );
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "strict-tags"))]
    #[should_panic(expected = "corrupt short-layout tag")]
    fn test_apply_corrupt_tag_panics() {
        Value::from_raw_bits(0xFFFF_0006_0000_0000).apply(Name);
    }

    #[test]
    #[cfg(not(any(debug_assertions, feature = "strict-tags")))]
    fn test_apply_corrupt_tag_falls_back_to_null() {
        assert_eq!(Value::from_raw_bits(0xFFFF_0006_0000_0000).apply(Name), "null");
    }

    #[test]
    fn test_unpacked_into_value() {
        for v in [
            Value::from(TypeId::BOOL),
            Value::null(),
            Value::from(true),
            Value::from(1i32),
            Value::from(1u32),
            Value::from(1.0f32),
            Value::from(Reference::new(8)),
            Value::from(1.0f64),
        ] {
            assert_eq!(Value::from(v.unpack().unwrap()), v);
        }
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_unpack_never_panics(bits in any::<u64>()) {
            let v = Value::from_raw_bits(bits);
            match v.unpack() {
                Ok(u) => prop_assert_eq!(Value::from(u).get_type(), v.get_type()),
                Err(_) => {
                    prop_assert!(v.is_short_layout());
                    prop_assert_eq!(v.get_type(), TypeId::INVALID);
                }
            }
        }
    }
}
