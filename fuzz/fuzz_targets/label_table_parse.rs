//! Fuzz target for label table parsing.
//!
//! Run with:
//!   cargo +nightly fuzz run label_table_parse

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = imgcurate::dataset::fuzz_parse_label_table(data);
});
