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

//! Incremental parsing of PO bytes which arrive in chunks.
//!
//! The first bytes are buffered until enough of the document is known
//! to find the charset declared in its header. After that, every chunk
//! is decoded and scanned as soon as it arrives. The table is built
//! when the input ends.

use log::debug;
use std::io::{self, Read, Write};
use std::mem;

use crate::codec::{Codec, EncodingRs};
use crate::error::{Error, Result};
use crate::parser::{ParseOptions, Parser};
use crate::table::TranslationTable;

/// Options for [`PoStream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOptions {
    pub parse: ParseOptions,
    /// Number of bytes to buffer before the charset is detected.
    /// Defaults to 2048.
    pub initial_threshold: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        StreamOptions {
            parse: ParseOptions::default(),
            initial_threshold: 2048,
        }
    }
}

impl StreamOptions {
    pub fn new() -> StreamOptions {
        StreamOptions::default()
    }

    pub fn with_parse_options(mut self, parse: ParseOptions) -> StreamOptions {
        self.parse = parse;
        self
    }

    pub fn with_initial_threshold(mut self, initial_threshold: usize) -> StreamOptions {
        self.initial_threshold = initial_threshold;
        self
    }
}

#[derive(Debug)]
enum State {
    /// Collecting bytes until the charset can be detected.
    Buffering(Vec<u8>),
    /// Scanning chunks. `carry` holds trailing non-ASCII bytes of the
    /// last chunk, which may be an incomplete character.
    Streaming { parser: Parser, carry: Vec<u8> },
    /// An error was returned, further input is refused.
    Failed,
}

/// A push parser for PO bytes.
///
/// # Examples
///
/// ```
/// use gettext_po::{PoStream, StreamOptions};
///
/// let mut stream = PoStream::new(StreamOptions::new());
/// stream.push(b"msgid \"cat\"\nmsg").unwrap();
/// stream.push(b"str \"chat\"\n").unwrap();
/// let table = stream.finish().unwrap();
/// assert_eq!(table.get("", "cat").unwrap().msgstr, ["chat"]);
/// ```
#[derive(Debug)]
pub struct PoStream<C = EncodingRs> {
    options: StreamOptions,
    codec: C,
    state: State,
}

impl PoStream<EncodingRs> {
    pub fn new(options: StreamOptions) -> PoStream<EncodingRs> {
        PoStream::with_codec(options, EncodingRs)
    }
}

impl<C: Codec> PoStream<C> {
    /// Create a stream which decodes its input with `codec`.
    pub fn with_codec(options: StreamOptions, codec: C) -> PoStream<C> {
        PoStream {
            options,
            codec,
            state: State::Buffering(Vec::new()),
        }
    }

    /// Feed the next chunk of input.
    ///
    /// After an error, the stream is failed and every further call
    /// returns [`Error::Aborted`].
    pub fn push(&mut self, chunk: &[u8]) -> Result<()> {
        if chunk.is_empty() {
            return match self.state {
                State::Failed => Err(Error::Aborted),
                _ => Ok(()),
            };
        }
        let result = self.step(chunk);
        if result.is_err() {
            self.state = State::Failed;
        }
        result
    }

    /// End the input and build the table.
    ///
    /// A table is returned even if no input was pushed.
    pub fn finish(self) -> Result<TranslationTable> {
        let (mut parser, rest) = match self.state {
            State::Failed => return Err(Error::Aborted),
            State::Buffering(buffer) => (Parser::for_bytes(&buffer, &self.options.parse), buffer),
            State::Streaming { parser, carry } => (parser, carry),
        };
        if !rest.is_empty() {
            let text = parser.decode(&rest, &self.codec)?;
            parser.feed(&text)?;
        }
        parser.finish()
    }

    fn step(&mut self, chunk: &[u8]) -> Result<()> {
        let mut bytes = match &mut self.state {
            State::Failed => return Err(Error::Aborted),
            State::Buffering(buffer) => {
                buffer.extend_from_slice(chunk);
                if buffer.len() < self.options.initial_threshold {
                    return Ok(());
                }
                let buffer = mem::take(buffer);
                let parser = Parser::for_bytes(&buffer, &self.options.parse);
                debug!(
                    "Buffered {} bytes, streaming as {}",
                    buffer.len(),
                    parser.charset()
                );
                self.state = State::Streaming {
                    parser,
                    carry: Vec::new(),
                };
                buffer
            }
            State::Streaming { carry, .. } => {
                let mut bytes = mem::take(carry);
                bytes.extend_from_slice(chunk);
                bytes
            }
        };

        let State::Streaming { parser, carry } = &mut self.state else {
            return Ok(());
        };
        let complete = bytes.len() - bytes.iter().rev().take_while(|&&b| b >= 0x80).count();
        if complete < bytes.len() {
            *carry = bytes.split_off(complete);
            debug!("Carrying {} bytes to the next chunk", carry.len());
        }
        if !bytes.is_empty() {
            let text = parser.decode(&bytes, &self.codec)?;
            parser.feed(&text)?;
        }
        Ok(())
    }
}

impl<C: Codec> Write for PoStream<C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.push(buf)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Parse everything `reader` produces with a [`PoStream`].
pub fn parse_reader<R: Read>(mut reader: R, options: StreamOptions) -> Result<TranslationTable> {
    let mut stream = PoStream::new(options);
    let mut buffer = [0; 8192];
    loop {
        let len = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(len) => len,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        stream.push(&buffer[..len])?;
    }
    stream.finish()
}
