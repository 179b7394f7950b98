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

//! Passes over the lexer output which turn tokens into key-value
//! pairs.
//!
//! Each pass consumes a token list and returns a new one:
//!
//! 1. [`join`] merges adjacent strings and adjacent comment lines,
//! 2. [`classify`] splits comments into their categories,
//! 3. [`pair`] attaches strings and comments to their keys.

use crate::lexer::{Keyword, Token};
use crate::table::Comments;

/// A key together with its (concatenated) string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub keyword: Keyword,
    pub value: String,
    pub obsolete: bool,
    /// The comment block right above the key, if any.
    pub comments: Option<Comments>,
}

/// Merge runs of string tokens and runs of comment tokens.
///
/// Strings are concatenated, comment lines are joined with a newline.
pub fn join(tokens: Vec<Token>) -> Vec<Token> {
    let mut joined: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let merged = match (joined.last_mut(), &token) {
            (Some(Token::Str { value: last, .. }), Token::Str { value, .. }) => {
                last.push_str(value);
                true
            }
            (Some(Token::Comment(last)), Token::Comment(raw)) => {
                last.push('\n');
                last.push_str(raw);
                true
            }
            _ => false,
        };
        if !merged {
            joined.push(token);
        }
    }
    joined
}

/// Replace every raw comment with its structured form.
pub fn classify(tokens: Vec<Token>) -> Vec<Token> {
    tokens
        .into_iter()
        .map(|token| match token {
            Token::Comment(raw) => Token::StructuredComment(parse_comment(&raw)),
            token => token,
        })
        .collect()
}

/// Split a (possibly multi-line) raw comment into its categories.
///
/// # Examples
///
/// ```
/// use gettext_po::consolidate::parse_comment;
/// use gettext_po::Comments;
///
/// assert_eq!(
///     parse_comment(" Hello\n: src/lib.rs:1 \n, fuzzy\n~"),
///     Comments {
///         translator: Some(String::from("Hello")),
///         reference: Some(String::from("src/lib.rs:1")),
///         flag: Some(String::from("fuzzy")),
///         ..Comments::default()
///     }
/// );
/// ```
pub fn parse_comment(raw: &str) -> Comments {
    let mut translator = Vec::new();
    let mut reference = Vec::new();
    let mut extracted = Vec::new();
    let mut flag = Vec::new();
    let mut previous = Vec::new();

    for line in raw.split('\n') {
        let mut chars = line.chars();
        match chars.next() {
            Some(':') => reference.push(chars.as_str().trim()),
            Some('.') => extracted.push(chars.as_str().trim_start()),
            Some(',') => flag.push(chars.as_str().trim_start()),
            Some('|') => previous.push(chars.as_str().trim_start()),
            // Obsolete markers were handled by the lexer.
            Some('~') => {}
            _ => translator.push(line.trim_start()),
        }
    }

    Comments {
        translator: join_lines(&translator),
        reference: join_lines(&reference),
        extracted: join_lines(&extracted),
        flag: join_lines(&flag),
        previous: join_lines(&previous),
    }
}

fn join_lines(lines: &[&str]) -> Option<String> {
    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Attach string values and comments to keys.
///
/// Every string up to the next key is appended to the value of the
/// current key. Strings before the first key are dropped. A comment is
/// attached to a key only if it immediately precedes the key.
pub fn pair(tokens: Vec<Token>) -> Vec<KeyValue> {
    let mut pairs: Vec<KeyValue> = Vec::new();
    let mut comment: Option<Comments> = None;

    for token in tokens {
        match token {
            Token::Key { keyword, obsolete } => {
                pairs.push(KeyValue {
                    keyword,
                    value: String::new(),
                    obsolete,
                    comments: comment.take(),
                });
            }
            Token::Str { value, .. } => {
                comment = None;
                if let Some(last) = pairs.last_mut() {
                    last.value.push_str(&value);
                }
            }
            Token::StructuredComment(comments) => {
                comment = (!comments.is_empty()).then_some(comments);
            }
            Token::Comment(raw) => {
                let comments = parse_comment(&raw);
                comment = (!comments.is_empty()).then_some(comments);
            }
        }
    }

    pairs
}
