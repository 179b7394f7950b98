use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Error parsing PO data: Invalid key name \"{key}\" at line {line}. \
         This can be caused by an unescaped quote character in a msgid or msgstr value."
    )]
    Grammar { key: String, line: usize },
    #[error(
        "Duplicate msgid error: entry \"{msgid}\" in \"{msgctxt}\" context has already been declared."
    )]
    DuplicateEntry { msgid: String, msgctxt: String },
    #[error(
        "Multiple msgid_plural error: entry \"{msgid}\" in \"{msgctxt}\" context has multiple msgid_plural declarations."
    )]
    DuplicatePlural { msgid: String, msgctxt: String },
    #[error(
        "Plural forms range error: Expected to find {expected} forms but got {found} for entry \"{entry}\" in \"{msgctxt}\" context."
    )]
    PluralCount {
        entry: String,
        msgctxt: String,
        expected: usize,
        found: usize,
    },
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Unknown charset: {0:?}")]
    UnknownCharset(String),
    #[error("The PO stream was aborted by an earlier error")]
    Aborted,
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The input line a grammar error was found on.
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Error::Grammar { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
