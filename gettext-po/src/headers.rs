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

//! The header entry: the `msgstr` of the entry with an empty `msgid`.
//!
//! See <https://www.gnu.org/software/gettext/manual/html_node/Header-Entry.html>.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

pub const PLURAL_FORMS: &str = "Plural-Forms";
pub const CONTENT_TYPE: &str = "Content-Type";

/// Header names with their standard spelling.
const KNOWN_HEADERS: [&str; 10] = [
    "Project-Id-Version",
    "Report-Msgid-Bugs-To",
    "POT-Creation-Date",
    "PO-Revision-Date",
    "Last-Translator",
    "Language-Team",
    "Language",
    CONTENT_TYPE,
    "Content-Transfer-Encoding",
    PLURAL_FORMS,
];

/// Return the standard spelling of a known header name, or `key`
/// itself.
pub fn canonical_key(key: &str) -> &str {
    for known in KNOWN_HEADERS {
        if known.eq_ignore_ascii_case(key) {
            return known;
        }
    }
    key
}

/// Parse a header block into key-value pairs.
///
/// # Examples
///
/// ```
/// use gettext_po::headers::parse_header;
///
/// let headers = parse_header("content-type: text/plain; charset=utf-8\nX-Generator: vim\n");
/// assert_eq!(
///     headers.into_iter().collect::<Vec<_>>(),
///     vec![
///         (String::from("Content-Type"), String::from("text/plain; charset=utf-8")),
///         (String::from("X-Generator"), String::from("vim")),
///     ]
/// );
/// ```
pub fn parse_header(text: &str) -> IndexMap<String, String> {
    let mut headers = IndexMap::new();
    for line in text.split('\n') {
        let (key, value) = line.split_once(':').unwrap_or((line, ""));
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        headers.insert(String::from(canonical_key(key)), String::from(value.trim()));
    }
    headers
}

/// Render headers back into a header block.
///
/// Headers with an empty name are skipped. Every line, including the
/// last, ends with a newline.
///
/// ```
/// use gettext_po::headers::generate_header;
/// use indexmap::IndexMap;
///
/// let mut headers = IndexMap::new();
/// headers.insert(String::from("Language"), String::from(" fr "));
/// headers.insert(String::from("MIME-Version"), String::from("1.0"));
/// assert_eq!(generate_header(&headers), "Language: fr\nMIME-Version: 1.0\n");
/// assert_eq!(generate_header(&IndexMap::new()), "");
/// ```
pub fn generate_header(headers: &IndexMap<String, String>) -> String {
    headers
        .iter()
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| format!("{key}: {}\n", value.trim()))
        .collect()
}

/// Copy `headers` with every known key in its standard spelling.
pub fn canonicalize(headers: &IndexMap<String, String>) -> IndexMap<String, String> {
    headers
        .iter()
        .map(|(key, value)| (String::from(canonical_key(key)), value.clone()))
        .collect()
}

/// Read `nplurals` from the `Plural-Forms` header.
///
/// Returns `fallback` if the header is missing, unparsable, or
/// declares zero forms.
///
/// ```
/// use gettext_po::headers::{nplurals, parse_header};
///
/// let headers = parse_header("Plural-Forms: nplurals=3; plural=(n%10==1 ? 0 : n ? 1 : 2);");
/// assert_eq!(nplurals(&headers, 1), 3);
/// assert_eq!(nplurals(&parse_header(""), 1), 1);
/// ```
pub fn nplurals(headers: &IndexMap<String, String>, fallback: usize) -> usize {
    static RE: OnceLock<Regex> = OnceLock::new();

    let re = RE.get_or_init(|| Regex::new(r"nplurals\s*=\s*(\d+)").unwrap());
    headers
        .get(PLURAL_FORMS)
        .and_then(|forms| re.captures(forms))
        .and_then(|captures| captures[1].parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(fallback)
}
