// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! One-shot parsing of PO documents.

use log::debug;

use crate::charset::{format_charset, sniff_charset, DEFAULT_CHARSET};
use crate::codec::{Codec, EncodingRs};
use crate::error::Result;
use crate::lexer::Lexer;
use crate::normalize::finalize;
use crate::table::TranslationTable;

/// A PO document, either already decoded or as raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(text: &'a str) -> Self {
        Input::Text(text)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(text: &'a String) -> Self {
        Input::Text(text)
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Input<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Input::Bytes(bytes)
    }
}

/// Options for [`parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Charset of byte input which does not declare one. Defaults to
    /// `iso-8859-1`.
    pub default_charset: String,
    /// Reject duplicate entries and wrong numbers of plural forms.
    /// Defaults to `false`.
    pub validation: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            default_charset: String::from(DEFAULT_CHARSET),
            validation: false,
        }
    }
}

impl ParseOptions {
    pub fn new() -> ParseOptions {
        ParseOptions::default()
    }

    pub fn with_default_charset(mut self, default_charset: impl Into<String>) -> ParseOptions {
        self.default_charset = default_charset.into();
        self
    }

    pub fn with_validation(mut self, validation: bool) -> ParseOptions {
        self.validation = validation;
        self
    }
}

/// Parse a PO document.
///
/// Text input is taken as is and the table gets the charset `utf-8`.
/// Byte input is decoded with the charset declared in its header, or
/// with [`ParseOptions::default_charset`].
///
/// # Examples
///
/// ```
/// use gettext_po::{parse, ParseOptions};
///
/// let po = b"msgid \"\"\n\
///            msgstr \"Content-Type: text/plain; charset=iso-8859-1\\n\"\n\
///            \n\
///            msgid \"cafe\"\n\
///            msgstr \"caf\xe9\"\n";
///
/// let table = parse(po, &ParseOptions::new()).unwrap();
/// assert_eq!(table.charset, "iso-8859-1");
/// assert_eq!(table.get("", "cafe").unwrap().msgstr, ["café"]);
/// ```
pub fn parse<'a>(input: impl Into<Input<'a>>, options: &ParseOptions) -> Result<TranslationTable> {
    parse_with(input, options, &EncodingRs)
}

/// Like [`parse`], but decodes byte input with `codec`.
pub fn parse_with<'a, C: Codec>(
    input: impl Into<Input<'a>>,
    options: &ParseOptions,
    codec: &C,
) -> Result<TranslationTable> {
    match input.into() {
        Input::Text(text) => {
            let mut parser = Parser::for_text(options);
            parser.feed(text)?;
            parser.finish()
        }
        Input::Bytes(bytes) => {
            let mut parser = Parser::for_bytes(bytes, options);
            let text = parser.decode(bytes, codec)?;
            parser.feed(&text)?;
            parser.finish()
        }
    }
}

/// A lexer together with the charset of its input.
#[derive(Debug)]
pub(crate) struct Parser {
    charset: String,
    validation: bool,
    lexer: Lexer,
}

impl Parser {
    pub(crate) fn for_text(options: &ParseOptions) -> Parser {
        Parser {
            charset: String::from("utf-8"),
            validation: options.validation,
            lexer: Lexer::new(),
        }
    }

    /// Prepare a parser for bytes starting with `head`.
    ///
    /// The charset is taken from the header found in `head`.
    pub(crate) fn for_bytes(head: &[u8], options: &ParseOptions) -> Parser {
        let default = format_charset(&options.default_charset, DEFAULT_CHARSET);
        let text = String::from_utf8_lossy(head);
        let charset = match sniff_charset(&text) {
            Some(declared) => {
                let charset = format_charset(declared, &default);
                debug!("Found charset {declared:?}, decoding as {charset}");
                charset
            }
            None => default,
        };
        Parser {
            charset,
            validation: options.validation,
            lexer: Lexer::new(),
        }
    }

    pub(crate) fn charset(&self) -> &str {
        &self.charset
    }

    pub(crate) fn decode<C: Codec>(&self, bytes: &[u8], codec: &C) -> Result<String> {
        if self.charset == "utf-8" {
            Ok(String::from_utf8_lossy(bytes).into_owned())
        } else {
            codec.decode(bytes, &self.charset)
        }
    }

    pub(crate) fn feed(&mut self, text: &str) -> Result<()> {
        self.lexer.feed(text)
    }

    pub(crate) fn finish(self) -> Result<TranslationTable> {
        finalize(self.lexer.finish()?, self.charset, self.validation)
    }
}
