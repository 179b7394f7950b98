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

//! Charset name handling.

use regex::Regex;
use std::sync::OnceLock;

/// The charset assumed for byte input without a charset declaration.
pub const DEFAULT_CHARSET: &str = "iso-8859-1";

/// Normalize a charset name.
///
/// Names are lower-cased and common aliases are spelled out. The
/// placeholder `charset` (as found in freshly generated POT files)
/// becomes `default`.
///
/// # Examples
///
/// ```
/// use gettext_po::charset::format_charset;
///
/// assert_eq!(format_charset("UTF8", "iso-8859-1"), "utf-8");
/// assert_eq!(format_charset("WIN1257", "iso-8859-1"), "windows-1257");
/// assert_eq!(format_charset("Latin_2", "iso-8859-1"), "iso-8859-2");
/// assert_eq!(format_charset("US-ASCII", "iso-8859-1"), "ascii");
/// assert_eq!(format_charset("CHARSET", "iso-8859-1"), "iso-8859-1");
/// ```
pub fn format_charset(charset: &str, default: &str) -> String {
    static RULES: OnceLock<[(Regex, &'static str); 4]> = OnceLock::new();

    let rules = RULES.get_or_init(|| {
        [
            (Regex::new(r"^utf[-_]?(\d+)$").unwrap(), "utf-$1"),
            (
                Regex::new(r"^win(?:dows)?[-_]?(\d+)$").unwrap(),
                "windows-$1",
            ),
            (Regex::new(r"^latin[-_]?(\d+)$").unwrap(), "iso-8859-$1"),
            (Regex::new(r"^(?:us[-_]?)?ascii$").unwrap(), "ascii"),
        ]
    });

    let mut name = charset.trim().to_lowercase();
    for (re, replacement) in rules {
        name = re.replace(&name, *replacement).into_owned();
    }
    if name == "charset" {
        return String::from(default);
    }
    name
}

/// Find the charset declared in the header of a PO document.
///
/// Only the text before the second `msgid` (or `msgctxt`) line is
/// searched, so that a `charset=` inside an ordinary message cannot be
/// picked up. The returned name is not normalized.
///
/// # Examples
///
/// ```
/// use gettext_po::charset::sniff_charset;
///
/// let po = "msgid \"\"\n\
///           msgstr \"Content-Type: text/plain; charset=KOI8-R\\n\"\n\
///           \n\
///           msgid \"a\"\n\
///           msgstr \"b\"\n";
/// assert_eq!(sniff_charset(po), Some("KOI8-R"));
/// ```
pub fn sniff_charset(text: &str) -> Option<&str> {
    static MSGID: OnceLock<Regex> = OnceLock::new();
    static NEXT_ENTRY: OnceLock<Regex> = OnceLock::new();
    static CHARSET: OnceLock<Regex> = OnceLock::new();

    let msgid = MSGID.get_or_init(|| Regex::new(r"(?im)^\s*msgid").unwrap());
    let next_entry = NEXT_ENTRY.get_or_init(|| Regex::new(r"(?im)^\s*(?:msgid|msgctxt)").unwrap());
    let charset = CHARSET.get_or_init(|| {
        Regex::new(r#"(?im)[; ]charset\s*=\s*([\w-]+)(?:[\s;]|\\n)*"\s*$"#).unwrap()
    });

    let first = msgid.find(text)?;
    let header = match next_entry.find(&text[first.end()..]) {
        Some(next) => &text[..first.end() + next.start()],
        None => text,
    };
    charset
        .captures(header)
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str())
}

/// Extract the `charset` parameter of a `Content-Type` header value.
pub fn content_type_charset(content_type: &str) -> Option<&str> {
    content_type_param()
        .captures(content_type)
        .and_then(|captures| captures.get(2))
        .map(|name| name.as_str())
}

/// Rewrite the `charset` parameter of a `Content-Type` header value
/// in normalized form.
///
/// ```
/// use gettext_po::charset::normalize_content_type;
///
/// assert_eq!(
///     normalize_content_type("text/plain; charset=UTF8"),
///     "text/plain; charset=utf-8"
/// );
/// assert_eq!(normalize_content_type("text/plain"), "text/plain");
/// ```
pub fn normalize_content_type(content_type: &str) -> String {
    content_type_param()
        .replace(content_type, |captures: &regex::Captures| {
            format!(
                "{}{}",
                &captures[1],
                format_charset(&captures[2], DEFAULT_CHARSET)
            )
        })
        .into_owned()
}

fn content_type_param() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)(;\s*charset\s*=\s*)"?([^;"\s]+)"?"#).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_charset_passes_unknown_names() {
        assert_eq!(format_charset("KOI8-R", DEFAULT_CHARSET), "koi8-r");
        assert_eq!(format_charset(" utf-8 ", DEFAULT_CHARSET), "utf-8");
        assert_eq!(format_charset("windows_1252", DEFAULT_CHARSET), "windows-1252");
        assert_eq!(format_charset("ascii", DEFAULT_CHARSET), "ascii");
    }

    #[test]
    fn format_charset_placeholder_uses_default() {
        assert_eq!(format_charset("charset", "utf-8"), "utf-8");
    }

    #[test]
    fn sniff_charset_without_msgid() {
        assert_eq!(sniff_charset("# just a comment\n"), None);
    }

    #[test]
    fn sniff_charset_header_only() {
        let po = "msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=utf-8\\n\"\n";
        assert_eq!(sniff_charset(po), Some("utf-8"));
    }

    #[test]
    fn sniff_charset_ignores_later_entries() {
        let po = "msgid \"\"\n\
                  msgstr \"Language: de\\n\"\n\
                  \n\
                  msgid \"x\"\n\
                  msgstr \"Content-Type: text/plain; charset=koi8-r\\n\"\n";
        assert_eq!(sniff_charset(po), None);
    }

    #[test]
    fn sniff_charset_before_context() {
        let po = "msgid \"\"\n\
                  msgstr \"Content-Type: text/plain; charset=windows-1251\\n\"\n\
                  msgctxt \"menu\"\n\
                  msgid \"x\"\n";
        assert_eq!(sniff_charset(po), Some("windows-1251"));
    }

    #[test]
    fn content_type_charset_extracts_parameter() {
        assert_eq!(
            content_type_charset("text/plain; charset=ISO-8859-2"),
            Some("ISO-8859-2")
        );
        assert_eq!(content_type_charset("text/plain"), None);
    }
}
