#![no_main]

use alchemy_core::value::Value;
use alchemy_vm::arith::{add, add_by_kind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|words: (u64, u64)| {
    let lhs = Value::from_raw_bits(words.0);
    let rhs = Value::from_raw_bits(words.1);
    // Corrupt words take the visitor's panic path in debug builds; skip them.
    if lhs.unpack().is_err() || rhs.unpack().is_err() {
        return;
    }
    assert_eq!(add(lhs, rhs).raw_bits(), add_by_kind(lhs, rhs).raw_bits());
});
