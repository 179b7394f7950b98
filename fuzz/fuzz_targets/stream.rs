#![no_main]

use gettext_po::{parse, ParseOptions, PoStream, StreamOptions};
use gettext_po_fuzz::split_chunks;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|input: (&str, Vec<usize>, u16)| {
    let (text, splits, initial_threshold) = input;
    // A declared charset may only be visible to one of the parsers.
    if text.to_lowercase().contains("charset") {
        return;
    }
    let parse_options = ParseOptions::new().with_default_charset("utf-8");

    let expected = parse(text.as_bytes(), &parse_options);
    let options = StreamOptions::new()
        .with_parse_options(parse_options)
        .with_initial_threshold(usize::from(initial_threshold));
    let mut stream = PoStream::new(options);
    let actual = split_chunks(text.as_bytes(), &splits)
        .into_iter()
        .try_for_each(|chunk| stream.push(chunk))
        .and_then(|()| stream.finish());

    match (expected, actual) {
        (Ok(expected), Ok(actual)) => assert_eq!(actual, expected),
        (Err(expected), Err(actual)) => assert_eq!(actual.to_string(), expected.to_string()),
        (expected, actual) => panic!("parse gave {expected:?}, stream gave {actual:?}"),
    }
});
