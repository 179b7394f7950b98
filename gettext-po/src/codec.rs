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

//! Conversion between bytes and text in a named charset.

use encoding_rs::Encoding;
use log::warn;

use crate::error::{Error, Result};

/// A byte-encoding service.
///
/// Charset names passed in have already been through
/// [`format_charset`](crate::charset::format_charset).
pub trait Codec {
    /// Decode `bytes` written in `charset`.
    fn decode(&self, bytes: &[u8], charset: &str) -> Result<String>;

    /// Encode `text` into `charset`.
    fn encode(&self, text: &str, charset: &str) -> Result<Vec<u8>>;
}

/// The default [`Codec`], backed by `encoding_rs`.
///
/// Charset names are resolved as WHATWG encoding labels. This means
/// that `iso-8859-1` and `ascii` are handled as `windows-1252`, which
/// is a superset of both.
#[derive(Clone, Copy, Debug, Default)]
pub struct EncodingRs;

impl Codec for EncodingRs {
    fn decode(&self, bytes: &[u8], charset: &str) -> Result<String> {
        let encoding = Encoding::for_label(charset.as_bytes())
            .ok_or_else(|| Error::UnknownCharset(String::from(charset)))?;
        let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
        if had_errors {
            warn!("Malformed {} input replaced while decoding", encoding.name());
        }
        Ok(text.into_owned())
    }

    fn encode(&self, text: &str, charset: &str) -> Result<Vec<u8>> {
        let encoding = Encoding::for_label(charset.as_bytes()).ok_or_else(|| {
            Error::Configuration(format!("Cannot encode output as unknown charset {charset:?}"))
        })?;
        if encoding.output_encoding() != encoding {
            return Err(Error::Configuration(format!(
                "Cannot encode output as {}",
                encoding.name()
            )));
        }
        let (bytes, _, had_errors) = encoding.encode(text);
        if had_errors {
            warn!(
                "Characters without a {} representation were replaced",
                encoding.name()
            );
        }
        Ok(bytes.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decode_latin1() {
        assert_eq!(EncodingRs.decode(b"caf\xe9", "iso-8859-1").unwrap(), "café");
    }

    #[test]
    fn decode_unknown_charset() {
        let err = EncodingRs.decode(b"abc", "klingon").unwrap_err();
        assert!(matches!(err, Error::UnknownCharset(ref name) if name == "klingon"));
    }

    #[test]
    fn encode_cyrillic() {
        assert_eq!(
            EncodingRs.encode("Привет", "windows-1251").unwrap(),
            b"\xcf\xf0\xe8\xe2\xe5\xf2"
        );
    }

    #[test]
    fn encode_utf16_is_rejected() {
        let err = EncodingRs.encode("a", "utf-16le").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)), "{err}");
    }
}
