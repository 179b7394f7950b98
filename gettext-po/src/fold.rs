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

//! Splitting of escaped string values into PO lines.

/// A possible place to end a line: right after `chr`.
#[derive(Debug, Clone, Copy)]
struct Cut {
    /// Byte offset after `chr`.
    end: usize,
    chr: char,
    /// False if `chr` is a backslash which starts an escape sequence.
    safe: bool,
}

/// Split an escaped string value into lines of at most `max_len`
/// characters.
///
/// A line always ends after the first `\n` escape it contains.
/// Otherwise, unless the rest of the value fits, the line is broken
/// after the last whitespace, or else after the last punctuation
/// character. A `max_len` of zero only breaks after `\n` escapes.
///
/// Lines are never split inside an escape sequence, so a line can be
/// one character longer than `max_len`. Concatenating the lines gives
/// back `text`.
///
/// # Examples
///
/// ```
/// use gettext_po::fold::fold_line;
///
/// assert_eq!(fold_line("Hello world", 76), ["Hello world"]);
/// assert_eq!(fold_line(r"One\nTwo", 76), [r"One\n", "Two"]);
/// assert_eq!(fold_line("Hello world", 8), ["Hello ", "world"]);
/// assert_eq!(fold_line(r"One\nTwo\n", 0), [r"One\n", r"Two\n"]);
/// ```
pub fn fold_line(text: &str, max_len: usize) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(line_end(rest, max_len));
        lines.push(line);
        rest = tail;
    }
    lines
}

/// Byte length of the first line of the non-empty `text`.
fn line_end(text: &str, max_len: usize) -> usize {
    let mut cuts: Vec<Cut> = Vec::new();
    let mut escaped = false;
    for (offset, chr) in text.char_indices() {
        if max_len > 0 && cuts.len() >= max_len && !escaped {
            break;
        }
        let end = offset + chr.len_utf8();
        if escaped && chr == 'n' {
            return end;
        }
        escaped = !escaped && chr == '\\';
        cuts.push(Cut {
            end,
            chr,
            safe: !escaped,
        });
    }
    let Some(last) = cuts.last() else {
        return text.len();
    };

    if last.end < text.len() {
        if let Some(i) = cuts.iter().rposition(|cut| cut.chr.is_whitespace()) {
            if cuts[..i].iter().any(|cut| !cut.chr.is_whitespace()) {
                return cuts[i].end;
            }
        }
        if let Some(i) = cuts
            .iter()
            .rposition(|cut| cut.safe && is_punctuation(cut.chr))
        {
            if cuts[..i].iter().any(|cut| !is_punctuation(cut.chr)) {
                return cuts[i].end;
            }
        }
    }

    last.end
}

/// ASCII punctuation and digits.
fn is_punctuation(chr: char) -> bool {
    matches!(chr, '\x21'..='\x2f' | '0'..='9' | '\x5b'..='\x60' | '\x7b'..='\x7e')
}
