#![no_main]

use gettext_po::{compile, parse, CompileOptions, ParseOptions};
use gettext_po_fuzz::{create_table, FuzzEntry};
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|input: (Vec<FuzzEntry>, u8)| {
    let (entries, fold_length) = input;
    let table = create_table(entries);
    let options = CompileOptions::new().with_fold_length(usize::from(fold_length));

    let po = compile(&table, &options).unwrap();
    let text = String::from_utf8(po).unwrap();
    let parsed = parse(text.as_str(), &ParseOptions::new()).unwrap();
    assert_eq!(parsed, table);
});
