// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Entry points: decode INI input from bytes, strings, files, or any
//! `Read`, into a [Recorder](crate::value::Recorder) or as a lazy
//! stream of entries.
//!
//! On error, whatever a recorder received before the error is
//! incomplete and should be discarded; the functions returning
//! `Values` do that themselves.

use crate::buffered_chars::{CharSource, Utf8Source};
use crate::context::Origin;
use crate::parse::{DecodeError, Decoder};
use crate::settings::{Settings, DEFAULT_SETTINGS};
use crate::value::{Entry, Recorder, Values};
use genawaiter::rc::Gen;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
#[error("{origin}: {err}")]
pub struct ReadErrorWithLocation {
    pub origin: Origin,
    #[source]
    pub err: DecodeError,
}

trait In<T> {
    fn within(self, origin: impl FnOnce() -> Origin) -> Result<T, ReadErrorWithLocation>;
}

impl<T, E: Into<DecodeError>> In<T> for Result<T, E> {
    fn within(self, origin: impl FnOnce() -> Origin) -> Result<T, ReadErrorWithLocation> {
        self.map_err(|e| ReadErrorWithLocation { origin: origin(), err: e.into() })
    }
}

/// Decode UTF-8 input from `fh` into `dst`.
pub fn read(
    settings: &Settings,
    fh: impl Read,
    dst: &mut dyn Recorder
) -> Result<(), DecodeError> {
    Decoder::new(Utf8Source::new(fh), settings).run(dst)
}

/// Decode `s` into `dst`, without going through bytes.
pub fn read_str(
    settings: &Settings,
    s: &str,
    dst: &mut dyn Recorder
) -> Result<(), DecodeError> {
    Decoder::new(CharSource(s.chars()), settings).run(dst)
}

/// Decode `b` with `DEFAULT_SETTINGS`, adding to `out` if given. Gives
/// no map at all on error.
pub fn read_ini(b: &[u8], out: Option<Values>) -> Result<Values, DecodeError> {
    let mut out = out.unwrap_or_default();
    read(&DEFAULT_SETTINGS, b, &mut out)?;
    Ok(out)
}

pub fn read_named(
    settings: &Settings,
    name: &str,
    fh: impl Read
) -> Result<Values, ReadErrorWithLocation> {
    let mut out = Values::new();
    read(settings, fh, &mut out).within(|| Origin::named(name))?;
    Ok(out)
}

pub fn read_file(
    settings: &Settings,
    path: &Path
) -> Result<Values, ReadErrorWithLocation> {
    let fh = File::open(path).within(|| Origin::file(path))?;
    let mut out = Values::new();
    read(settings, fh, &mut out).within(|| Origin::file(path))?;
    debug!(path = %path.display(), keys = out.len(), "read file");
    Ok(out)
}

/// Lazily decode `fh`, yielding each pair as soon as its key is
/// complete. After an error, nothing more is yielded.
pub fn entries<R: Read>(
    settings: &Settings,
    fh: R
) -> impl Iterator<Item = Result<Entry, DecodeError>> {
    let settings = settings.clone();
    Gen::new(|co| async move {
        let mut dec = Decoder::new(Utf8Source::new(fh), &settings);
        let mut pending: Vec<Entry> = Vec::new();
        loop {
            let r = dec.step(&mut pending);
            for e in pending.drain(..) {
                co.yield_(Ok(e)).await;
            }
            match r {
                Ok(true) => {}
                Ok(false) => return,
                Err(e) => {
                    co.yield_(Err(e)).await;
                    return;
                }
            }
        }
    }).into_iter()
}
