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

//! Reading and writing PO files.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use crate::compiler::{compile, CompileOptions};
use crate::error::Result;
use crate::parser::{self, ParseOptions};
use crate::stream::{parse_reader, StreamOptions};
use crate::table::TranslationTable;

/// Read and parse the PO file at `path`.
pub fn parse(path: &Path, options: &ParseOptions) -> Result<TranslationTable> {
    let bytes = fs::read(path)?;
    parser::parse(bytes.as_slice(), options)
}

/// Parse the PO file at `path` without reading it into memory first.
pub fn parse_streaming(path: &Path, options: StreamOptions) -> Result<TranslationTable> {
    let file = File::open(path)?;
    parse_reader(BufReader::new(file), options)
}

/// Compile `table` and write it to `path`.
pub fn write(table: &TranslationTable, path: &Path, options: &CompileOptions) -> Result<()> {
    let bytes = compile(table, options)?;
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::table::Entry;
    use polib::catalog::Catalog;
    use polib::message::Message;
    use polib::metadata::CatalogMetadata;
    use pretty_assertions::assert_eq;

    fn german_table() -> TranslationTable {
        let mut table = TranslationTable::new("utf-8");
        for (key, value) in [
            ("Project-Id-Version", "Demo 1.0"),
            ("Language", "de"),
            ("MIME-Version", "1.0"),
            ("Content-Type", "text/plain; charset=utf-8"),
            ("Content-Transfer-Encoding", "8bit"),
            ("Plural-Forms", "nplurals=2; plural=(n != 1);"),
        ] {
            table.headers.insert(String::from(key), String::from(value));
        }
        table.insert(Entry::singular("Hello", "Hallo"));
        table.insert(Entry::singular("File", "Datei").with_context("menu"));
        table.insert(Entry::singular(
            "A message which is long enough to be folded over more than a single line in the file",
            "Eine Nachricht, die lang genug ist, um in der Datei über mehr als eine Zeile umbrochen zu werden",
        ));
        table
    }

    #[test]
    fn write_then_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("de.po");
        let table = german_table();

        write(&table, &path, &CompileOptions::new()).unwrap();
        let options = ParseOptions::new().with_validation(true);
        assert_eq!(parse(&path, &options).unwrap(), table);
        assert_eq!(
            parse_streaming(&path, StreamOptions::new().with_parse_options(options)).unwrap(),
            table
        );
    }

    #[test]
    fn parse_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse(&dir.path().join("missing.po"), &ParseOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Io(_)), "{err}");
    }

    #[test]
    fn polib_reads_compiled_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("de.po");
        write(&german_table(), &path, &CompileOptions::new()).unwrap();

        let catalog = polib::po_file::parse(&path).unwrap();
        let msgstr = |msgctxt, msgid| {
            catalog
                .find_message(msgctxt, msgid, None)
                .and_then(|message| message.msgstr().ok())
                .map(String::from)
        };
        assert_eq!(msgstr(None, "Hello"), Some(String::from("Hallo")));
        assert_eq!(msgstr(Some("menu"), "File"), Some(String::from("Datei")));
        assert_eq!(
            msgstr(
                None,
                "A message which is long enough to be folded over more than a single line in the file"
            ),
            Some(String::from(
                "Eine Nachricht, die lang genug ist, um in der Datei über mehr als eine Zeile umbrochen zu werden"
            ))
        );
    }

    #[test]
    fn parse_file_written_by_polib() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fr.po");

        let mut metadata = CatalogMetadata::new();
        metadata.language = String::from("fr");
        metadata.content_type = String::from("text/plain; charset=UTF-8");
        let mut catalog = Catalog::new(metadata);
        for (msgid, msgstr) in [("Hello", "Bonjour"), ("Goodbye \"friend\"", "Au revoir « ami »")] {
            let message = Message::build_singular()
                .with_msgid(String::from(msgid))
                .with_msgstr(String::from(msgstr))
                .done();
            catalog.append_or_update(message);
        }
        polib::po_file::write(&catalog, &path).unwrap();

        let table = parse(&path, &ParseOptions::new()).unwrap();
        assert_eq!(table.charset, "utf-8");
        assert_eq!(table.get("", "Hello").unwrap().msgstr, ["Bonjour"]);
        assert_eq!(
            table.get("", "Goodbye \"friend\"").unwrap().msgstr,
            ["Au revoir « ami »"]
        );
    }
}
