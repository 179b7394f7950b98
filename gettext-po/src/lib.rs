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

//! Parse and compile Gettext PO catalogs.
//!
//! A PO document is parsed into a [`TranslationTable`]: the header
//! fields, plus every entry indexed by its context and its `msgid`.
//! The table can be edited and compiled back into PO bytes. Documents
//! can be parsed in one go with [`parse`], or chunk by chunk with a
//! [`PoStream`].
//!
//! Byte input is decoded with the charset declared in its
//! `Content-Type` header.
//!
//! # Examples
//!
//! ```
//! use gettext_po::{compile, parse, CompileOptions, Entry, ParseOptions};
//!
//! let po = "msgid \"\"\n\
//!           msgstr \"\"\n\
//!           \"Language: fr\\n\"\n\
//!           \n\
//!           msgid \"cat\"\n\
//!           msgstr \"chat\"\n";
//!
//! let mut table = parse(po, &ParseOptions::new()).unwrap();
//! assert_eq!(table.headers["Language"], "fr");
//! assert_eq!(table.get("", "cat").unwrap().msgstr, ["chat"]);
//!
//! table.insert(Entry::singular("dog", "chien"));
//! let output = compile(&table, &CompileOptions::new()).unwrap();
//! assert_eq!(
//!     String::from_utf8(output).unwrap(),
//!     "msgid \"\"\n\
//!      msgstr \"Language: fr\\n\"\n\
//!      \n\
//!      msgid \"cat\"\n\
//!      msgstr \"chat\"\n\
//!      \n\
//!      msgid \"dog\"\n\
//!      msgstr \"chien\"\n"
//! );
//! ```

pub mod charset;
pub mod codec;
pub mod compiler;
pub mod consolidate;
mod error;
pub mod fold;
pub mod headers;
pub mod lexer;
pub mod normalize;
pub mod parser;
pub mod po_file;
pub mod stream;
mod table;

pub use codec::{Codec, EncodingRs};
pub use compiler::{compile, compile_with, CompileOptions, SortOrder};
pub use error::{Error, Result};
pub use parser::{parse, parse_with, Input, ParseOptions};
pub use stream::{parse_reader, PoStream, StreamOptions};
pub use table::{Comments, Entry, TranslationTable, Translations};
