// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use streamini::read::{entries, read_file};
use streamini::settings::{KeyCase, Settings};
use clap::Parser as ClapParser;
use std::path::PathBuf;
use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;


#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Print pairs as they are decoded (default: collect all values
    /// first, then print them grouped by key)
    #[clap(short, long, value_parser)]
    stream: bool,
    /// Separator between section name segments and the key; empty
    /// to join them directly
    #[clap(long, value_parser, default_value = ".")]
    separator: String,
    /// How to case unquoted names: lower, upper or keep
    #[clap(long, value_parser, default_value = "lower")]
    casing: String,
    /// Value recorded for keys without a value
    #[clap(long, value_parser)]
    flag_value: Option<String>,
    /// Path to the input file
    #[clap(value_parser, required(true))]
    input_path: PathBuf,
}

fn settings(args: &Args) -> Result<Settings> {
    let casing = match args.casing.as_str() {
        "lower" => KeyCase::LowerCase,
        "upper" => KeyCase::UpperCase,
        "keep" => KeyCase::CaseSensitive,
        other => bail!("unknown casing {other:?}, expecting lower, upper or keep"),
    };
    let settings = Settings::default().with_casing(casing);
    let settings = if args.separator.is_empty() {
        settings.without_separator()
    } else {
        settings.with_separator(&args.separator)
    };
    Ok(match &args.flag_value {
        Some(v) if v.is_empty() => settings.with_empty_flag_value(),
        Some(v) => settings.with_flag_value(v),
        None => settings,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let settings = settings(&args)?;

    if args.stream {

        // Print each pair as soon as the decoder has it; on error,
        // what came before stays printed.

        let fh = std::fs::File::open(&args.input_path)
            .with_context(|| format!("opening {:?}", args.input_path))?;
        let mut count = 0;
        for e in entries(&settings, fh) {
            let e = e.with_context(|| format!("reading {:?}", args.input_path))?;
            println!("{e}");
            count += 1;
        }
        println!("; {count} pairs");

    } else {

        let values = read_file(&settings, &args.input_path)?;
        for (key, vs) in values.iter() {
            for v in vs {
                println!("{key} = {v:?}");
            }
        }
        println!("; {} keys", values.len());

    }
    Ok(())
}
