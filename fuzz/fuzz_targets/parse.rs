#![no_main]

use gettext_po::{parse, ParseOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&[u8], bool)| {
    let (data, validation) = input;
    let _ = parse(data, &ParseOptions::new().with_validation(validation));
});
