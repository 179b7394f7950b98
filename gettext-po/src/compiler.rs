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

//! Rendering of a [`TranslationTable`] as PO text.

use indexmap::IndexMap;
use log::debug;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::OnceLock;

use crate::charset::{content_type_charset, format_charset, normalize_content_type, DEFAULT_CHARSET};
use crate::codec::{Codec, EncodingRs};
use crate::error::Result;
use crate::fold::fold_line;
use crate::headers::{self, CONTENT_TYPE};
use crate::table::{Comments, Entry, TranslationTable, Translations};

/// The order entries are written in.
#[derive(Clone, Copy, Default)]
pub enum SortOrder {
    /// The order of the translation table.
    #[default]
    Insertion,
    /// Sorted by `msgid`.
    ByMsgid,
    /// Sorted with a custom comparison.
    Custom(fn(&Entry, &Entry) -> Ordering),
}

impl fmt::Debug for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Insertion => f.write_str("Insertion"),
            SortOrder::ByMsgid => f.write_str("ByMsgid"),
            SortOrder::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Options for [`compile`].
#[derive(Clone, Debug)]
pub struct CompileOptions {
    /// Maximum number of characters in a string line, `0` to only break
    /// lines after newlines. Defaults to 76.
    pub fold_length: usize,
    /// Escape backslashes, quotes, tabs and carriage returns. Newlines
    /// are always escaped. Defaults to `true`.
    pub escape_characters: bool,
    pub sort: SortOrder,
    /// Line terminator. Defaults to `"\n"`.
    pub eol: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            fold_length: 76,
            escape_characters: true,
            sort: SortOrder::Insertion,
            eol: String::from("\n"),
        }
    }
}

impl CompileOptions {
    pub fn new() -> CompileOptions {
        CompileOptions::default()
    }

    pub fn with_fold_length(mut self, fold_length: usize) -> CompileOptions {
        self.fold_length = fold_length;
        self
    }

    pub fn with_escape_characters(mut self, escape_characters: bool) -> CompileOptions {
        self.escape_characters = escape_characters;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> CompileOptions {
        self.sort = sort;
        self
    }

    pub fn with_eol(mut self, eol: impl Into<String>) -> CompileOptions {
        self.eol = eol.into();
        self
    }
}

/// Compile a translation table into PO bytes.
///
/// The output is encoded in the charset of the table, or the charset
/// declared by its `Content-Type` header, or UTF-8.
///
/// # Examples
///
/// ```
/// use gettext_po::{compile, CompileOptions, Entry, TranslationTable};
///
/// let mut table = TranslationTable::new("utf-8");
/// table.insert(Entry::singular("cat", "chat"));
/// let po = compile(&table, &CompileOptions::new()).unwrap();
/// assert_eq!(
///     String::from_utf8(po).unwrap(),
///     "msgid \"\"\nmsgstr \"\"\n\nmsgid \"cat\"\nmsgstr \"chat\"\n"
/// );
/// ```
pub fn compile(table: &TranslationTable, options: &CompileOptions) -> Result<Vec<u8>> {
    compile_with(table, options, &EncodingRs)
}

/// Like [`compile`], but encodes the output with `codec`.
pub fn compile_with<C: Codec>(
    table: &TranslationTable,
    options: &CompileOptions,
    codec: &C,
) -> Result<Vec<u8>> {
    let compiler = Compiler::new(table, options);
    let text = compiler.render();
    debug!(
        "Compiled {} entries as {}",
        table.entries().count(),
        compiler.charset
    );
    match compiler.charset.as_str() {
        "utf-8" | "ascii" => Ok(text.into_bytes()),
        charset => codec.encode(&text, charset),
    }
}

struct Compiler<'a> {
    table: &'a TranslationTable,
    options: &'a CompileOptions,
    /// Headers with canonical names and a normalized charset.
    headers: IndexMap<String, String>,
    /// The output charset.
    charset: String,
}

impl<'a> Compiler<'a> {
    fn new(table: &'a TranslationTable, options: &'a CompileOptions) -> Compiler<'a> {
        let mut headers = headers::canonicalize(&table.headers);
        let declared = headers
            .get(CONTENT_TYPE)
            .and_then(|content_type| content_type_charset(content_type))
            .map(String::from);
        let charset = match (table.charset.as_str(), declared) {
            ("", Some(declared)) => declared,
            ("", None) => String::from("utf-8"),
            (charset, _) => String::from(charset),
        };
        if let Some(content_type) = headers.get_mut(CONTENT_TYPE) {
            *content_type = normalize_content_type(content_type);
        }

        Compiler {
            table,
            options,
            headers,
            charset: format_charset(&charset, DEFAULT_CHARSET),
        }
    }

    fn render(&self) -> String {
        let mut blocks = vec![self.header_block()];
        for entry in self.section(&self.table.translations) {
            blocks.push(self.block(entry, false));
        }
        for entry in self.section(&self.table.obsolete) {
            blocks.push(self.block(entry, true));
        }

        let eol = &self.options.eol;
        let mut text = blocks.join(&format!("{eol}{eol}"));
        text.push_str(eol);
        text
    }

    /// The entry with an empty msgid carrying the headers. The
    /// `Content-Type` line is never folded, so its charset can be sniffed
    /// when the output is parsed again.
    fn header_block(&self) -> String {
        let comments = self.table.header_comments.clone().or_else(|| {
            self.table
                .get("", "")
                .and_then(|entry| entry.comments.clone())
        });
        let mut lines = Vec::new();
        if let Some(comments) = &comments {
            lines.extend(self.comment_lines(comments));
        }
        lines.push(self.string("msgid", "", false));

        let value = escape(
            &headers::generate_header(&self.headers),
            self.options.escape_characters,
        );
        let msgstr = if self.options.fold_length > 0 {
            fold_line(&value, 0)
                .into_iter()
                .flat_map(|field| {
                    if field.starts_with(CONTENT_TYPE) {
                        vec![field]
                    } else {
                        fold_line(field, self.options.fold_length)
                    }
                })
                .collect()
        } else {
            self.fold(&value)
        };
        lines.push(self.quoted("msgstr", &msgstr, false));

        lines.join(&self.options.eol)
    }

    /// Flatten a section, skipping any header entry.
    fn section<'t>(&self, section: &'t Translations) -> Vec<&'t Entry> {
        let mut entries: Vec<&Entry> = section
            .iter()
            .flat_map(|(msgctxt, entries)| {
                entries
                    .iter()
                    .filter(move |(msgid, _)| !(msgctxt.is_empty() && msgid.is_empty()))
                    .map(|(_, entry)| entry)
            })
            .collect();
        match self.options.sort {
            SortOrder::Insertion => {}
            SortOrder::ByMsgid => entries.sort_by(|a, b| a.msgid.cmp(&b.msgid)),
            SortOrder::Custom(compare) => entries.sort_by(|a, b| compare(a, b)),
        }
        entries
    }

    fn block(&self, entry: &Entry, obsolete: bool) -> String {
        let mut lines = Vec::new();
        if let Some(comments) = &entry.comments {
            lines.extend(self.comment_lines(comments));
        }

        if let Some(msgctxt) = entry.msgctxt.as_deref().filter(|msgctxt| !msgctxt.is_empty()) {
            lines.push(self.string("msgctxt", msgctxt, obsolete));
        }
        lines.push(self.string("msgid", &entry.msgid, obsolete));

        match entry.msgid_plural.as_deref() {
            Some(msgid_plural) if !msgid_plural.is_empty() => {
                lines.push(self.string("msgid_plural", msgid_plural, obsolete));
                for (idx, msgstr) in entry.msgstr.iter().enumerate() {
                    lines.push(self.string(&format!("msgstr[{idx}]"), msgstr, obsolete));
                }
            }
            _ => {
                let msgstr = entry.msgstr.first().map(String::as_str).unwrap_or_default();
                lines.push(self.string("msgstr", msgstr, obsolete));
            }
        }

        lines.join(&self.options.eol)
    }

    fn comment_lines(&self, comments: &Comments) -> Vec<String> {
        static LINE_BREAK: OnceLock<Regex> = OnceLock::new();

        let line_break = LINE_BREAK.get_or_init(|| Regex::new(r"\r?\n|\r").unwrap());
        let categories = [
            ("# ", &comments.translator),
            ("#: ", &comments.reference),
            ("#. ", &comments.extracted),
            ("#, ", &comments.flag),
            ("#| ", &comments.previous),
        ];

        let mut lines = Vec::new();
        for (prefix, value) in categories {
            if let Some(value) = value {
                lines.extend(line_break.split(value).map(|line| format!("{prefix}{line}")));
            }
        }
        lines
    }

    /// Render `key "value"`, folded over several lines if needed.
    fn string(&self, key: &str, value: &str, obsolete: bool) -> String {
        let value = escape(value, self.options.escape_characters);
        self.quoted(key, &self.fold(&value), obsolete)
    }

    fn fold<'v>(&self, value: &'v str) -> Vec<&'v str> {
        if self.options.fold_length > 0 || self.options.escape_characters {
            fold_line(value, self.options.fold_length)
        } else {
            vec![value]
        }
    }

    /// Render `key` followed by the quoted `lines`.
    fn quoted(&self, key: &str, lines: &[&str], obsolete: bool) -> String {
        let eol = &self.options.eol;
        let (key, eol) = if obsolete {
            (format!("#~ {key}"), format!("{eol}#~ "))
        } else {
            (String::from(key), eol.clone())
        };

        match lines {
            [] => format!("{key} \"\""),
            [line] => format!("{key} \"{line}\""),
            lines => format!("{key} \"\"{eol}\"{}\"", lines.join(&format!("\"{eol}\""))),
        }
    }
}

/// Escape a value for a quoted PO string. Newlines are escaped even if
/// `all` is false.
fn escape(value: &str, all: bool) -> String {
    let mut escaped = String::with_capacity(value.len());
    for chr in value.chars() {
        match chr {
            '\n' => escaped.push_str("\\n"),
            '\\' if all => escaped.push_str("\\\\"),
            '"' if all => escaped.push_str("\\\""),
            '\t' if all => escaped.push_str("\\t"),
            '\r' if all => escaped.push_str("\\r"),
            chr => escaped.push(chr),
        }
    }
    escaped
}
