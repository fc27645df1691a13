// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A streaming decoder for INI files, with the following features:
//!
//! * `[section name]` headers whose space separated segments, joined
//!   by a configurable separator ("." by default), prefix all
//!   following keys. Quoted segments (`[remote "origin"]`) keep
//!   their case and may contain escapes.
//!
//! * `key = value` pairs, where values can be plain (trailing
//!   whitespace trimmed), `"quoted"` with backslash escapes
//!   (`\n`, `\t`, `\xHH`, `\uHHHH`, `\UHHHHHHHH`, ...) and doubled
//!   quotes, or `` `raw` `` with only doubled backquotes special.
//!
//! * Keys without a value, recorded with a flag value ("1" by
//!   default), so they can be used as booleans.
//!
//! * `;` and `#` comments, optional lower- or upper-casing of
//!   unquoted keys.
//!
//! * Streaming: input is consumed one character at a time from any
//!   `Read`, and each pair is passed on as soon as it's complete,
//!   either to a [Recorder](value::Recorder) or through the
//!   [entries](read::entries) iterator.
//!
//! * Precise error reporting: syntax errors carry line and column and
//!   a structured cause; truncated input is never mistaken for a
//!   complete document.
//!
//! Keys may occur any number of times; [Values](value::Values)
//! collects all of their values in order.

pub mod buffered_chars;
pub mod classify;
pub mod context;
pub mod parse;
pub mod pos;
pub mod read;
pub mod settings;
pub mod value;
