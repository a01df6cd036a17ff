//! Fuzz target for policy and user file parsing.
//!
//! Goal: the importers should **never panic** on any input.
//! They may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_import
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use policheck_store::Format;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        for format in [Format::Json, Format::Csv] {
            let _ = policheck_store::parse_policies(text, format);
            let _ = policheck_store::parse_users(text, format);
        }
    }
});
