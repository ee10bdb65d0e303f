//! Alchemy core types: the packed 64-bit value and its type descriptors.

pub mod error;
pub mod type_id;
pub mod value;
pub mod visit;

pub use error::ValueError;
pub use type_id::TypeId;
pub use value::{Reference, Value};
pub use visit::{Unpacked, Visitor};
