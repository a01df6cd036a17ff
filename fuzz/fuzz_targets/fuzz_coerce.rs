//! Fuzz target for operand coercion.
//!
//! Goal: coercion **never panics** and always produces a list for `in`.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_coerce
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use policheck_types::{Operator, Value};

#[derive(Arbitrary, Debug)]
struct CoerceInput {
    operator: String,
    raw: String,
}

fuzz_target!(|input: CoerceInput| {
    if input.raw.len() > 4096 || input.operator.len() > 16 {
        return;
    }

    let op = Operator::parse(&input.operator);
    let value = policheck_domain::coerce(&input.raw, &op);
    if op == Operator::In {
        assert!(matches!(value, Value::List(_)));
    }
});
