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

//! Utility to inspect and reformat Gettext PO files.

use anyhow::Context as _;
use clap::Parser;
use gettext_po::{
    compile, po_file, CompileOptions, ParseOptions, SortOrder, StreamOptions, TranslationTable,
};
use log::info;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "warn"));
    match Command::parse() {
        Command::Json { po_file, input } => {
            let table = read_table(&po_file, &input)?;
            print_json(&table)?;
        }
        Command::Format {
            po_file,
            output,
            input,
            format,
        } => {
            let table = read_table(&po_file, &input)?;
            let bytes = compile(&table, &format.options())
                .with_context(|| format!("Could not compile {:?}", &po_file))?;
            match output {
                Some(output) => fs::write(&output, bytes)
                    .with_context(|| format!("Could not write {:?}", &output))?,
                None => io::stdout().write_all(&bytes)?,
            }
        }
    }

    Ok(())
}

#[derive(Clone, Debug, Parser)]
#[command(version, about)]
enum Command {
    /// Print the translation table of a PO file as JSON.
    Json {
        po_file: PathBuf,
        #[command(flatten)]
        input: InputArgs,
    },
    /// Parse a PO file and compile it again.
    Format {
        po_file: PathBuf,
        /// Where to write the result. Defaults to standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        format: FormatArgs,
    },
}

#[derive(Clone, Debug, clap::Args)]
struct InputArgs {
    /// Charset of files which do not declare one.
    #[arg(long, default_value = gettext_po::charset::DEFAULT_CHARSET)]
    default_charset: String,
    /// Reject duplicate entries and wrong numbers of plural forms.
    #[arg(long)]
    validate: bool,
    /// Parse the file chunk by chunk.
    #[arg(long)]
    stream: bool,
}

#[derive(Clone, Debug, clap::Args)]
struct FormatArgs {
    /// Maximum line length, 0 to only break lines after newlines.
    #[arg(long, default_value_t = 76)]
    fold_length: usize,
    /// Only escape newlines in strings.
    #[arg(long)]
    no_escape: bool,
    /// Sort entries by msgid.
    #[arg(long)]
    sort: bool,
    /// Write CRLF line endings.
    #[arg(long)]
    crlf: bool,
}

impl InputArgs {
    fn options(&self) -> ParseOptions {
        ParseOptions::new()
            .with_default_charset(self.default_charset.as_str())
            .with_validation(self.validate)
    }
}

impl FormatArgs {
    fn options(&self) -> CompileOptions {
        let options = CompileOptions::new()
            .with_fold_length(self.fold_length)
            .with_escape_characters(!self.no_escape);
        let options = if self.sort {
            options.with_sort(SortOrder::ByMsgid)
        } else {
            options
        };
        if self.crlf {
            options.with_eol("\r\n")
        } else {
            options
        }
    }
}

fn read_table(path: &Path, input: &InputArgs) -> anyhow::Result<TranslationTable> {
    let options = input.options();
    let table = if input.stream {
        po_file::parse_streaming(path, StreamOptions::new().with_parse_options(options))
    } else {
        po_file::parse(path, &options)
    }
    .with_context(|| format!("Could not parse {:?}", &path))?;
    info!(
        "Read {} entries from {} ({})",
        table.entries().count(),
        path.display(),
        table.charset
    );
    Ok(table)
}

#[allow(clippy::print_stdout)]
fn print_json(table: &TranslationTable) -> anyhow::Result<()> {
    let json = table.to_json().context("Could not convert table to JSON")?;
    println!("{json}");
    Ok(())
}
