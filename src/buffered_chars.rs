// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Get characters one at a time, with one character of lookahead,
//! from anything that yields chars natively or implements `Read`.

use std::io::{self, Read};
use utf8::BufReadDecoder;

/// Something the decoder can pull characters from. `Ok(None)` means
/// end of input; any `Err` is a hard failure.
pub trait RuneSource {
    fn read_rune(&mut self) -> io::Result<Option<char>>;
}

impl<S: RuneSource + ?Sized> RuneSource for &mut S {
    fn read_rune(&mut self) -> io::Result<Option<char>> {
        (**self).read_rune()
    }
}

/// Native path: the input already consists of chars (e.g. `str::chars`).
#[derive(Debug, Clone)]
pub struct CharSource<I>(pub I);

impl<I: Iterator<Item = char>> RuneSource for CharSource<I> {
    fn read_rune(&mut self) -> io::Result<Option<char>> {
        Ok(self.0.next())
    }
}

/// Byte path: decodes UTF-8 from a `Read`, substituting U+FFFD for
/// invalid or truncated sequences.
pub struct Utf8Source<R: Read> {
    inp: BufReadDecoder<io::BufReader<R>>,
    chunk: String,
    at: usize,
}

impl<R: Read> Utf8Source<R> {
    pub fn new(fh: R) -> Self {
        Utf8Source {
            inp: BufReadDecoder::new(io::BufReader::new(fh)),
            chunk: String::new(),
            at: 0,
        }
    }
}

impl<R: Read> RuneSource for Utf8Source<R> {
    fn read_rune(&mut self) -> io::Result<Option<char>> {
        loop {
            if let Some(c) = self.chunk[self.at..].chars().next() {
                self.at += c.len_utf8();
                return Ok(Some(c))
            }
            match self.inp.next_lossy() {
                None => return Ok(None),
                Some(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                Some(Err(e)) => return Err(e),
                Some(Ok(s)) => {
                    self.chunk.clear();
                    self.chunk.push_str(s);
                    self.at = 0;
                }
            }
        }
    }
}

/// One-character lookahead over a `RuneSource`. End of input is
/// sticky: once seen, the source is never asked again.
pub struct Runes<S> {
    src: S,
    peeked: Option<io::Result<Option<char>>>,
    eof: bool,
}

impl<S: RuneSource> Runes<S> {
    pub fn new(src: S) -> Self {
        Runes { src, peeked: None, eof: false }
    }

    fn read(&mut self) -> io::Result<Option<char>> {
        if self.eof {
            return Ok(None)
        }
        let r = self.src.read_rune();
        if let Ok(None) = r {
            self.eof = true;
        }
        r
    }

    /// Consume the next character, returning the peeked one (or its
    /// deferred error) first if there is one.
    pub fn next_rune(&mut self) -> io::Result<Option<char>> {
        if let Some(r) = self.peeked.take() {
            return r
        }
        self.read()
    }

    /// Look at the next character without consuming it. Returns
    /// `None` both at end of input and if reading failed; in the
    /// latter case the error is kept and returned by the following
    /// `next_rune`.
    pub fn peek_rune(&mut self) -> Option<char> {
        if self.peeked.is_none() {
            self.peeked = Some(self.read());
        }
        match &self.peeked {
            Some(Ok(c)) => *c,
            _ => None
        }
    }
}
