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

//! Character level scanner for PO text.
//!
//! The lexer is a small state machine which turns PO text into a flat
//! list of comment, key and string tokens. It keeps its state between
//! calls to [`Lexer::feed`], so the input can arrive in pieces split at
//! arbitrary characters.

use regex::Regex;
use std::mem;
use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::table::Comments;

/// The keywords of the PO grammar.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Keyword {
    Msgctxt,
    Msgid,
    MsgidPlural,
    /// Both `msgstr` and `msgstr[N]`. The index is not kept: plural
    /// translations are stored in the order they appear.
    Msgstr,
}

impl Keyword {
    /// Parse a key token, `None` if it is not a PO keyword.
    ///
    /// ```
    /// use gettext_po::lexer::Keyword;
    ///
    /// assert_eq!(Keyword::from_name("msgstr[2]"), Some(Keyword::Msgstr));
    /// assert_eq!(Keyword::from_name("msgid_plural"), Some(Keyword::MsgidPlural));
    /// assert_eq!(Keyword::from_name("msgstr[]"), None);
    /// assert_eq!(Keyword::from_name("MSGID"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Keyword> {
        static RE: OnceLock<Regex> = OnceLock::new();

        let re = RE.get_or_init(|| {
            Regex::new(r"^(?:msgctxt|msgid(?:_plural)?|msgstr(?:\[[0-9]+\])?)$").unwrap()
        });
        if !re.is_match(name) {
            return None;
        }
        Some(match name {
            "msgctxt" => Keyword::Msgctxt,
            "msgid" => Keyword::Msgid,
            "msgid_plural" => Keyword::MsgidPlural,
            _ => Keyword::Msgstr,
        })
    }
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// The raw text of a comment line, without the leading `#`.
    Comment(String),
    /// A comment after it has been split into its categories.
    StructuredComment(Comments),
    /// A keyword. Keys found right after a `#~` marker are obsolete.
    Key { keyword: Keyword, obsolete: bool },
    /// An unescaped string literal and the quote it was written with.
    Str { value: String, quote: char },
}

#[derive(Debug)]
enum State {
    /// Between tokens.
    None,
    /// Inside a `#` line.
    Comment(String),
    /// Inside an unquoted key.
    Key {
        name: String,
        obsolete: bool,
        line: usize,
    },
    /// Inside a quoted string.
    Str {
        value: String,
        quote: char,
        escaped: bool,
    },
    /// Between tokens after a `#~` marker.
    Obsolete,
}

/// Incremental PO scanner.
///
/// # Examples
///
/// ```
/// use gettext_po::lexer::{Keyword, Lexer, Token};
///
/// let mut lexer = Lexer::new();
/// lexer.feed("msgid \"ca").unwrap();
/// lexer.feed("t\"\n").unwrap();
/// assert_eq!(
///     lexer.finish().unwrap(),
///     vec![
///         Token::Key { keyword: Keyword::Msgid, obsolete: false },
///         Token::Str { value: String::from("cat"), quote: '"' },
///     ]
/// );
/// ```
#[derive(Debug)]
pub struct Lexer {
    state: State,
    tokens: Vec<Token>,
    line: usize,
}

impl Default for Lexer {
    fn default() -> Self {
        Lexer::new()
    }
}

impl Lexer {
    pub fn new() -> Lexer {
        Lexer {
            state: State::None,
            tokens: Vec::new(),
            line: 1,
        }
    }

    /// The current 1-based line number.
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Scan the next piece of input.
    pub fn feed(&mut self, chunk: &str) -> Result<()> {
        for chr in chunk.chars() {
            if chr == '\n' {
                self.line += 1;
            }
            self.scan(chr)?;
        }
        Ok(())
    }

    /// End the input and return the tokens.
    ///
    /// A token which is still open is kept as it is, except for a key,
    /// which must be a valid keyword.
    pub fn finish(mut self) -> Result<Vec<Token>> {
        match mem::replace(&mut self.state, State::None) {
            State::None | State::Obsolete => {}
            State::Comment(raw) => self.tokens.push(Token::Comment(raw)),
            State::Str { value, quote, .. } => self.tokens.push(Token::Str { value, quote }),
            State::Key {
                name,
                obsolete,
                line,
            } => self.push_key(name, obsolete, line)?,
        }
        Ok(self.tokens)
    }

    fn scan(&mut self, chr: char) -> Result<()> {
        match self.state {
            State::None | State::Obsolete => {
                let obsolete = matches!(self.state, State::Obsolete);
                if chr == '"' || chr == '\'' {
                    self.state = State::Str {
                        value: String::new(),
                        quote: chr,
                        escaped: false,
                    };
                } else if chr == '#' {
                    self.state = State::Comment(String::new());
                } else if !is_whitespace(chr) {
                    self.state = State::Key {
                        name: String::from(chr),
                        obsolete,
                        line: self.line,
                    };
                }
            }
            State::Comment(ref mut raw) => {
                if chr == '\n' {
                    let raw = mem::take(raw);
                    self.tokens.push(Token::Comment(raw));
                    self.state = State::None;
                } else if chr == '~' && raw.is_empty() {
                    // `#~` comments out an obsolete entry: the rest of
                    // the line is scanned as regular tokens.
                    self.tokens.push(Token::Comment(String::from("~")));
                    self.state = State::Obsolete;
                } else if chr != '\r' {
                    raw.push(chr);
                }
            }
            State::Str {
                ref mut value,
                quote,
                ref mut escaped,
            } => {
                if *escaped {
                    value.push(match chr {
                        't' => '\t',
                        'n' => '\n',
                        'r' => '\r',
                        _ => chr,
                    });
                    *escaped = false;
                } else if chr == quote {
                    let value = mem::take(value);
                    self.tokens.push(Token::Str { value, quote });
                    self.state = State::None;
                } else if chr == '\\' {
                    *escaped = true;
                } else {
                    value.push(chr);
                }
            }
            State::Key {
                ref mut name,
                obsolete,
                line,
            } => {
                if is_key_char(chr) {
                    name.push(chr);
                } else {
                    let name = mem::take(name);
                    self.state = State::None;
                    self.push_key(name, obsolete, line)?;
                    // The character ending the key starts the next token.
                    return self.scan(chr);
                }
            }
        }
        Ok(())
    }

    fn push_key(&mut self, name: String, obsolete: bool, line: usize) -> Result<()> {
        match Keyword::from_name(&name) {
            Some(keyword) => {
                self.tokens.push(Token::Key { keyword, obsolete });
                Ok(())
            }
            None => Err(Error::Grammar { key: name, line }),
        }
    }
}

/// Whitespace, including a byte order mark.
fn is_whitespace(chr: char) -> bool {
    chr.is_whitespace() || chr == '\u{feff}'
}

fn is_key_char(chr: char) -> bool {
    chr.is_ascii_alphanumeric() || matches!(chr, '_' | '-' | '[' | ']')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(keyword: Keyword) -> Token {
        Token::Key {
            keyword,
            obsolete: false,
        }
    }

    fn obsolete_key(keyword: Keyword) -> Token {
        Token::Key {
            keyword,
            obsolete: true,
        }
    }

    fn string(value: &str) -> Token {
        Token::Str {
            value: String::from(value),
            quote: '"',
        }
    }

    fn comment(raw: &str) -> Token {
        Token::Comment(String::from(raw))
    }

    fn lex(text: &str) -> Result<Vec<Token>> {
        let mut lexer = Lexer::new();
        lexer.feed(text)?;
        lexer.finish()
    }

    #[test]
    fn lex_empty() {
        assert_eq!(lex("").unwrap(), vec![]);
        assert_eq!(lex(" \n\t\r\n").unwrap(), vec![]);
    }

    #[test]
    fn lex_entry() {
        assert_eq!(
            lex("msgid \"cat\"\nmsgstr \"chat\"\n").unwrap(),
            vec![
                key(Keyword::Msgid),
                string("cat"),
                key(Keyword::Msgstr),
                string("chat"),
            ]
        );
    }

    #[test]
    fn lex_ignores_whitespace_layout() {
        assert_eq!(
            lex("msgid\"a\"msgstr\n\n   \"b\"").unwrap(),
            lex("msgid \"a\"\nmsgstr \"b\"\n").unwrap()
        );
    }

    #[test]
    fn lex_multiline_string_tokens() {
        assert_eq!(
            lex("msgid \"\"\n\"Hello, \"\n\"world\"\n").unwrap(),
            vec![
                key(Keyword::Msgid),
                string(""),
                string("Hello, "),
                string("world"),
            ]
        );
    }

    #[test]
    fn lex_escapes() {
        assert_eq!(
            lex(r#"msgid "a\tb\nc\rd\"e\\f\x""#).unwrap(),
            vec![key(Keyword::Msgid), string("a\tb\nc\rd\"e\\fx")]
        );
    }

    #[test]
    fn lex_single_quotes() {
        assert_eq!(
            lex("msgid 'it\"s'").unwrap(),
            vec![
                key(Keyword::Msgid),
                Token::Str {
                    value: String::from("it\"s"),
                    quote: '\''
                },
            ]
        );
    }

    #[test]
    fn lex_skips_byte_order_mark() {
        assert_eq!(
            lex("\u{feff}msgid \"a\"").unwrap(),
            vec![key(Keyword::Msgid), string("a")]
        );
    }

    #[test]
    fn lex_comments() {
        assert_eq!(
            lex("# translator\r\n#: src/main.rs:10\nmsgid \"a\"").unwrap(),
            vec![
                comment(" translator"),
                comment(": src/main.rs:10"),
                key(Keyword::Msgid),
                string("a"),
            ]
        );
    }

    #[test]
    fn lex_obsolete_entry() {
        assert_eq!(
            lex("#~ msgid \"a\"\n#~ msgstr \"b\"\n").unwrap(),
            vec![
                comment("~"),
                obsolete_key(Keyword::Msgid),
                string("a"),
                comment("~"),
                obsolete_key(Keyword::Msgstr),
                string("b"),
            ]
        );
    }

    #[test]
    fn lex_tilde_inside_comment() {
        assert_eq!(lex("# ~ not obsolete\n").unwrap(), vec![comment(" ~ not obsolete")]);
    }

    #[test]
    fn lex_plural_keys() {
        assert_eq!(
            lex("msgid_plural \"cats\"\nmsgstr[0] \"chat\"\nmsgstr[1] \"chats\"").unwrap(),
            vec![
                key(Keyword::MsgidPlural),
                string("cats"),
                key(Keyword::Msgstr),
                string("chat"),
                key(Keyword::Msgstr),
                string("chats"),
            ]
        );
    }

    #[test]
    fn lex_invalid_key() {
        let err = lex("msgid \"a\"\nmsgstr \"b\"\nfoo \"c\"\n").unwrap_err();
        assert_eq!(err.line_number(), Some(3));
        assert!(
            err.to_string()
                .starts_with("Error parsing PO data: Invalid key name \"foo\" at line 3."),
            "{err}"
        );
    }

    #[test]
    fn lex_unescaped_quote_is_grammar_error() {
        let err = lex("msgid \"say \"hi\"\"\n").unwrap_err();
        assert!(matches!(err, Error::Grammar { ref key, line: 1 } if key == "hi"), "{err}");
    }

    #[test]
    fn lex_invalid_key_at_end_of_input() {
        assert!(lex("msgid \"a\" msgsrt").is_err());
        assert_eq!(
            lex("msgid \"a\" msgstr").unwrap(),
            vec![key(Keyword::Msgid), string("a"), key(Keyword::Msgstr)]
        );
    }

    #[test]
    fn lex_keeps_open_tokens() {
        assert_eq!(
            lex("# last\nmsgid \"unterminated").unwrap(),
            vec![comment(" last"), key(Keyword::Msgid), string("unterminated")]
        );
    }

    #[test]
    fn lex_counts_lines() {
        let mut lexer = Lexer::new();
        lexer.feed("msgid \"a\"\nmsgstr\n\"b\"\n").unwrap();
        assert_eq!(lexer.line_number(), 4);
    }

    #[test]
    fn lex_in_pieces() {
        let text = "#, fuzzy\nmsgctxt \"m\"\nmsgid \"a\\\"b\"\nmsgstr[0] 'x'\n#~ msgid \"old\"\n";
        let expected = lex(text).unwrap();
        for split in 0..text.len() {
            let mut lexer = Lexer::new();
            lexer.feed(&text[..split]).unwrap();
            lexer.feed(&text[split..]).unwrap();
            assert_eq!(lexer.finish().unwrap(), expected, "split at {split}");
        }
    }
}
