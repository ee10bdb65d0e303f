#![no_main]

use alchemy_core::value::Value;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|bits: u64| {
    // Decoding must never panic on any word; corrupt tags are reported, not hit.
    let v = Value::from_raw_bits(bits);
    let layouts =
        v.is_short_layout() as u8 + v.is_reference_layout() as u8 + v.is_double_layout() as u8;
    assert_eq!(layouts, 1);
    let _ = v.get_type();
    let _ = v.is_numeric();
    if v.unpack().is_err() {
        assert!(v.is_short_layout());
    }
    let _ = format!("{v:?} {v}");
});
