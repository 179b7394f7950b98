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

//! The in-memory translation table produced by the parser and consumed
//! by the compiler.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::headers;

/// Comments attached to an entry, grouped by their `#` prefix.
///
/// Every field may span several lines. Categories which did not occur
/// in the input are `None`, never an empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comments {
    /// `# ` comments written by translators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translator: Option<String>,
    /// `#: ` source references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// `#. ` comments extracted from the source code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted: Option<String>,
    /// `#, ` flags such as `fuzzy`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    /// `#| ` previous msgid values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

impl Comments {
    /// True if no comment category is set.
    pub fn is_empty(&self) -> bool {
        self.translator.is_none()
            && self.reference.is_none()
            && self.extracted.is_none()
            && self.flag.is_none()
            && self.previous.is_none()
    }
}

/// A single catalog entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msgctxt: Option<String>,
    pub msgid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msgid_plural: Option<String>,
    /// Translations in the order they appeared in the input. Plural
    /// entries have one string per plural form.
    #[serde(default)]
    pub msgstr: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Comments>,
}

impl Entry {
    /// Build an entry with a single translation.
    pub fn singular(msgid: impl Into<String>, msgstr: impl Into<String>) -> Entry {
        Entry {
            msgid: msgid.into(),
            msgstr: vec![msgstr.into()],
            ..Entry::default()
        }
    }

    /// Build an entry with one translation per plural form.
    pub fn plural(
        msgid: impl Into<String>,
        msgid_plural: impl Into<String>,
        msgstr: Vec<String>,
    ) -> Entry {
        Entry {
            msgid: msgid.into(),
            msgid_plural: Some(msgid_plural.into()),
            msgstr,
            ..Entry::default()
        }
    }

    pub fn with_context(mut self, msgctxt: impl Into<String>) -> Entry {
        self.msgctxt = Some(msgctxt.into());
        self
    }

    pub fn with_comments(mut self, comments: Comments) -> Entry {
        self.comments = Some(comments);
        self
    }

    /// The context bucket of the entry, `""` when it has no `msgctxt`.
    pub fn context(&self) -> &str {
        self.msgctxt.as_deref().unwrap_or_default()
    }
}

/// Entries indexed by context and then by msgid.
pub type Translations = IndexMap<String, IndexMap<String, Entry>>;

/// A parsed PO catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationTable {
    /// Normalized name of the charset the catalog was decoded from.
    #[serde(default)]
    pub charset: String,
    /// Header fields in the order they were declared.
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    /// Comments found above the header entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_comments: Option<Comments>,
    pub translations: Translations,
    /// Entries commented out with `#~`.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub obsolete: Translations,
}

impl TranslationTable {
    pub fn new(charset: impl Into<String>) -> TranslationTable {
        TranslationTable {
            charset: charset.into(),
            ..TranslationTable::default()
        }
    }

    /// Look up an active entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use gettext_po::{Entry, TranslationTable};
    ///
    /// let mut table = TranslationTable::new("utf-8");
    /// table.insert(Entry::singular("File", "Fichier").with_context("menu"));
    /// assert_eq!(table.get("menu", "File").unwrap().msgstr, ["Fichier"]);
    /// assert!(table.get("", "File").is_none());
    /// ```
    pub fn get(&self, msgctxt: &str, msgid: &str) -> Option<&Entry> {
        self.translations.get(msgctxt)?.get(msgid)
    }

    /// Look up an obsolete entry.
    pub fn get_obsolete(&self, msgctxt: &str, msgid: &str) -> Option<&Entry> {
        self.obsolete.get(msgctxt)?.get(msgid)
    }

    /// Insert an active entry, returning the entry it replaced.
    pub fn insert(&mut self, entry: Entry) -> Option<Entry> {
        insert_into(&mut self.translations, entry)
    }

    /// Insert an obsolete entry, returning the entry it replaced.
    pub fn insert_obsolete(&mut self, entry: Entry) -> Option<Entry> {
        insert_into(&mut self.obsolete, entry)
    }

    /// Iterate over the active entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.translations.values().flat_map(|entries| entries.values())
    }

    /// Number of plural forms declared by the `Plural-Forms` header.
    pub fn nplurals(&self) -> usize {
        headers::nplurals(&self.headers, 1)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| Error::Configuration(format!("Could not serialize table: {err}")))
    }

    /// Read a table from its JSON form.
    ///
    /// A document without a `translations` map is rejected with
    /// [`Error::Configuration`].
    pub fn from_json(json: &str) -> Result<TranslationTable> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|err| Error::Configuration(format!("Invalid table JSON: {err}")))?;
        if !value.get("translations").is_some_and(|t| t.is_object()) {
            return Err(Error::Configuration(String::from("No translations found")));
        }
        serde_json::from_value(value)
            .map_err(|err| Error::Configuration(format!("Invalid table JSON: {err}")))
    }
}

fn insert_into(section: &mut Translations, entry: Entry) -> Option<Entry> {
    section
        .entry(entry.context().to_owned())
        .or_default()
        .insert(entry.msgid.clone(), entry)
}
