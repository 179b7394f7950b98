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

//! Build entries from key-value pairs and fold them into a
//! [`TranslationTable`].

use crate::consolidate::{classify, join, pair, KeyValue};
use crate::error::{Error, Result};
use crate::headers;
use crate::lexer::{Keyword, Token};
use crate::table::{Comments, Entry, TranslationTable};

/// An entry together with its `#~` status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub entry: Entry,
    pub obsolete: bool,
}

/// Group key-value pairs into entries.
///
/// A `msgid` opens a new entry and picks up the context (and its
/// comments) declared by a preceding `msgctxt`. `msgid_plural` and
/// `msgstr` keys extend the open entry; `msgstr` values are kept in the
/// order they appear, whatever their index.
pub fn build_entries(pairs: Vec<KeyValue>, validation: bool) -> Result<Vec<RawEntry>> {
    let mut entries: Vec<RawEntry> = Vec::new();
    let mut context: Option<String> = None;
    let mut context_comments: Option<Comments> = None;

    for KeyValue {
        keyword,
        value,
        obsolete,
        comments,
    } in pairs
    {
        match keyword {
            Keyword::Msgctxt => {
                context = Some(value);
                context_comments = comments;
                continue;
            }
            Keyword::Msgid => {
                let entry = Entry {
                    msgctxt: context.take().filter(|msgctxt| !msgctxt.is_empty()),
                    msgid: value,
                    msgid_plural: None,
                    msgstr: Vec::new(),
                    comments: context_comments.take().or(comments),
                };
                entries.push(RawEntry { entry, obsolete });
                continue;
            }
            Keyword::MsgidPlural => {
                if let Some(RawEntry { entry, .. }) = entries.last_mut() {
                    if validation && entry.msgid_plural.is_some() {
                        return Err(Error::DuplicatePlural {
                            msgid: entry.msgid.clone(),
                            msgctxt: String::from(entry.context()),
                        });
                    }
                    entry.msgid_plural = Some(value);
                    if entry.comments.is_none() {
                        entry.comments = comments;
                    }
                }
            }
            Keyword::Msgstr => {
                if let Some(RawEntry { entry, .. }) = entries.last_mut() {
                    entry.msgstr.push(value);
                    if entry.comments.is_none() {
                        entry.comments = comments;
                    }
                }
            }
        }
        context = None;
        context_comments = None;
    }

    Ok(entries)
}

/// Fold entries into a translation table.
///
/// Obsolete entries go to [`TranslationTable::obsolete`]. The first
/// active entry with an empty context and an empty msgid is the header:
/// its translation is parsed into [`TranslationTable::headers`] and it
/// is not stored as a translation.
///
/// With `validation`, duplicate entries and entries with the wrong
/// number of translations are errors. Without it, a later duplicate
/// replaces the earlier one.
pub fn normalize(
    entries: Vec<RawEntry>,
    charset: impl Into<String>,
    validation: bool,
) -> Result<TranslationTable> {
    let mut table = TranslationTable::new(charset);
    let mut nplurals = 1;
    let mut header_seen = false;

    for RawEntry { entry, obsolete } in entries {
        if obsolete {
            table.insert_obsolete(entry);
            continue;
        }

        let is_header = entry.context().is_empty() && entry.msgid.is_empty();
        if is_header && !header_seen {
            header_seen = true;
            let header = entry.msgstr.first().map(String::as_str).unwrap_or_default();
            table.headers = headers::parse_header(header);
            nplurals = headers::nplurals(&table.headers, nplurals);
            table.header_comments = entry.comments;
            continue;
        }

        if validation {
            if is_header || table.get(entry.context(), &entry.msgid).is_some() {
                return Err(Error::DuplicateEntry {
                    msgctxt: String::from(entry.context()),
                    msgid: entry.msgid,
                });
            }
            validate_count(&entry, nplurals)?;
        }
        table.insert(entry);
    }

    Ok(table)
}

fn validate_count(entry: &Entry, nplurals: usize) -> Result<()> {
    let (name, expected) = match entry.msgid_plural.as_deref() {
        Some(msgid_plural) if !msgid_plural.is_empty() => (msgid_plural, nplurals),
        _ => (entry.msgid.as_str(), 1),
    };
    if entry.msgstr.len() != expected {
        return Err(Error::PluralCount {
            entry: String::from(name),
            msgctxt: String::from(entry.context()),
            expected,
            found: entry.msgstr.len(),
        });
    }
    Ok(())
}

/// Run the lexer output through every pass and build the table.
pub(crate) fn finalize(
    tokens: Vec<Token>,
    charset: impl Into<String>,
    validation: bool,
) -> Result<TranslationTable> {
    let pairs = pair(classify(join(tokens)));
    let entries = build_entries(pairs, validation)?;
    normalize(entries, charset, validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn table(text: &str, validation: bool) -> Result<TranslationTable> {
        let mut lexer = Lexer::new();
        lexer.feed(text)?;
        finalize(lexer.finish()?, "utf-8", validation)
    }

    const HEADER: &str = "msgid \"\"\n\
                          msgstr \"\"\n\
                          \"Language: fr\\n\"\n\
                          \"Plural-Forms: nplurals=2; plural=(n > 1);\\n\"\n\n";

    #[test]
    fn normalize_simple_entry() {
        let table = table("msgid \"cat\"\nmsgstr \"chat\"\n", true).unwrap();
        assert_eq!(table.get("", "cat"), Some(&Entry::singular("cat", "chat")));
        assert!(table.headers.is_empty());
        assert!(table.obsolete.is_empty());
    }

    #[test]
    fn normalize_header_is_not_a_translation() {
        let table = table(&format!("# Header comment\n{HEADER}msgid \"a\"\nmsgstr \"b\"\n"), true)
            .unwrap();
        assert_eq!(table.headers["Language"], "fr");
        assert_eq!(table.nplurals(), 2);
        assert_eq!(table.get("", ""), None);
        assert_eq!(
            table.header_comments,
            Some(Comments {
                translator: Some(String::from("Header comment")),
                ..Comments::default()
            })
        );
    }

    #[test]
    fn normalize_context() {
        let table = table(
            "msgctxt \"menu\"\nmsgid \"File\"\nmsgstr \"Fichier\"\n\nmsgid \"File\"\nmsgstr \"Dossier\"\n",
            true,
        )
        .unwrap();
        assert_eq!(
            table.get("menu", "File"),
            Some(&Entry::singular("File", "Fichier").with_context("menu"))
        );
        assert_eq!(table.get("", "File"), Some(&Entry::singular("File", "Dossier")));
    }

    #[test]
    fn normalize_empty_context_is_default_context() {
        let table = table("msgctxt \"\"\nmsgid \"a\"\nmsgstr \"b\"\n", false).unwrap();
        assert_eq!(table.get("", "a"), Some(&Entry::singular("a", "b")));
    }

    #[test]
    fn normalize_context_comments_win() {
        let table = table(
            "#. from context\nmsgctxt \"c\"\n# from msgid\nmsgid \"a\"\nmsgstr \"b\"\n",
            false,
        )
        .unwrap();
        let comments = table.get("c", "a").unwrap().comments.clone().unwrap();
        assert_eq!(comments.extracted.as_deref(), Some("from context"));
        assert_eq!(comments.translator, None);
    }

    #[test]
    fn normalize_obsolete_entries() {
        let table = table(
            "msgid \"a\"\nmsgstr \"b\"\n\n#, fuzzy\n#~ msgid \"old\"\n#~ msgstr \"\"\n#~ \"vieux\"\n",
            true,
        )
        .unwrap();
        assert_eq!(table.get("", "old"), None);
        assert_eq!(
            table.get_obsolete("", "old"),
            Some(&Entry::singular("old", "vieux").with_comments(Comments {
                flag: Some(String::from("fuzzy")),
                ..Comments::default()
            }))
        );
    }

    #[test]
    fn normalize_plural_entry() {
        let table = table(
            &format!(
                "{HEADER}msgid \"cat\"\nmsgid_plural \"cats\"\nmsgstr[0] \"chat\"\nmsgstr[1] \"chats\"\n"
            ),
            true,
        )
        .unwrap();
        assert_eq!(
            table.get("", "cat"),
            Some(&Entry::plural(
                "cat",
                "cats",
                vec![String::from("chat"), String::from("chats")]
            ))
        );
    }

    #[test]
    fn normalize_msgstr_keeps_encounter_order() {
        let table = table(
            "msgid \"cat\"\nmsgid_plural \"cats\"\nmsgstr[1] \"chats\"\nmsgstr[0] \"chat\"\n",
            false,
        )
        .unwrap();
        assert_eq!(table.get("", "cat").unwrap().msgstr, ["chats", "chat"]);
    }

    #[test]
    fn normalize_plural_count_mismatch() {
        let text = format!("{HEADER}msgid \"cat\"\nmsgid_plural \"cats\"\nmsgstr[0] \"chat\"\n");
        let err = table(&text, true).unwrap_err();
        assert!(
            matches!(
                err,
                Error::PluralCount {
                    expected: 2,
                    found: 1,
                    ..
                }
            ),
            "{err}"
        );
        assert_eq!(
            err.to_string(),
            "Plural forms range error: Expected to find 2 forms but got 1 for entry \"cats\" in \"\" context."
        );

        let table = table(&text, false).unwrap();
        assert_eq!(table.get("", "cat").unwrap().msgstr, ["chat"]);
    }

    #[test]
    fn normalize_plural_count_defaults_to_one() {
        let text = "msgid \"cat\"\nmsgid_plural \"cats\"\nmsgstr[0] \"chat\"\nmsgstr[1] \"chats\"\n";
        assert!(matches!(
            table(text, true),
            Err(Error::PluralCount { expected: 1, found: 2, .. })
        ));
    }

    #[test]
    fn normalize_singular_needs_one_msgstr() {
        let err = table("msgid \"a\"\n", true).unwrap_err();
        assert!(matches!(err, Error::PluralCount { expected: 1, found: 0, .. }), "{err}");
    }

    #[test]
    fn normalize_duplicate_entries() {
        let text = "msgctxt \"c\"\nmsgid \"a\"\nmsgstr \"1\"\n\nmsgctxt \"c\"\nmsgid \"a\"\nmsgstr \"2\"\n";
        let err = table(text, true).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Duplicate msgid error: entry \"a\" in \"c\" context has already been declared."
        );

        let table = table(text, false).unwrap();
        assert_eq!(table.get("c", "a").unwrap().msgstr, ["2"]);
    }

    #[test]
    fn normalize_second_header_entry() {
        let text = format!("{HEADER}msgid \"\"\nmsgstr \"again\"\n");
        assert!(matches!(table(&text, true), Err(Error::DuplicateEntry { .. })));
        let table = table(&text, false).unwrap();
        assert_eq!(table.get("", "").unwrap().msgstr, ["again"]);
        assert_eq!(table.headers["Language"], "fr");
    }

    #[test]
    fn normalize_duplicate_plural() {
        let text = "msgid \"a\"\nmsgid_plural \"b\"\nmsgid_plural \"c\"\nmsgstr[0] \"x\"\n";
        assert!(matches!(table(text, true), Err(Error::DuplicatePlural { .. })));
        let table = table(text, false).unwrap();
        assert_eq!(table.get("", "a").unwrap().msgid_plural.as_deref(), Some("c"));
    }

    #[test]
    fn build_entries_ignores_values_before_msgid() {
        let pairs = vec![KeyValue {
            keyword: Keyword::Msgstr,
            value: String::from("orphan"),
            obsolete: false,
            comments: None,
        }];
        assert_eq!(build_entries(pairs, true).unwrap(), vec![]);
    }
}
