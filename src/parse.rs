// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Translating a character stream into key/value pairs. The decoder
//! is a state machine driven one state at a time by
//! [Decoder::step](Decoder::step); every key it completes is handed to
//! a [Recorder](crate::value::Recorder) right away. See
//! [read](../read/index.html) for the convenient entry points.

use crate::buffered_chars::{RuneSource, Runes};
use crate::classify::{self, Escape, EQUALS, ESCAPE, NEWLINE, QUOTE,
                      RAW_QUOTE, SECTION_CLOSE, SECTION_OPEN};
use crate::pos::{Pos, Tracker};
use crate::settings::{push_char, KeyCase, Settings};
use crate::value::Recorder;
use thiserror::Error;
use tracing::{debug, trace};

fn closing_of(c: &char) -> char {
    classify::closing(*c)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    #[error("unclosed '{0}', expecting '{}'", closing_of(.0))]
    Unclosed(char),
    #[error("encountered invalid character {0:?}")]
    BadChar(char),
    #[error("not a hex digit: {0:?}")]
    NotHex(char),
    #[error("raw string not accepted in section")]
    SectionRawString,
    #[error("section missing closing ]")]
    UnclosedSection,
    #[error("key is empty")]
    EmptyKey,
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid code point {0:#x}")]
    InvalidCodePoint(u32),
    #[error("decoded text is not valid UTF-8")]
    InvalidUtf8,
}

impl Cause {
    /// A line feed where a section name is expected.
    pub const BAD_NEWLINE: Cause = Cause::BadChar('\n');

    pub fn at(self, pos: Pos, desc: Option<&'static str>) -> SyntaxError {
        SyntaxError { pos, cause: self, desc }
    }
}

/// A problem with the document itself, located at the character
/// where it was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub pos: Pos,
    pub cause: Cause,
    pub desc: Option<&'static str>,
}

impl SyntaxError {
    pub fn line(&self) -> u32 {
        self.pos.line
    }

    pub fn col(&self) -> u32 {
        self.pos.col
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("ini: syntax error at {}: {}",
                                 self.pos, self.cause))?;
        if let Some(desc) = self.desc {
            f.write_fmt(format_args!(" -- {}", desc))?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("{0}")]
    Syntax(#[from] SyntaxError),
    #[error("ini: read failed: {0}")]
    IO(#[from] std::io::Error),
    #[error("ini: internal error: {0}")]
    Internal(&'static str),
}

impl DecodeError {
    pub fn syntax(&self) -> Option<&SyntaxError> {
        match self {
            DecodeError::Syntax(e) => Some(e),
            _ => None
        }
    }

    /// Whether the input ended in the middle of something: an open
    /// string, section, or escape.
    pub fn is_truncation(&self) -> bool {
        matches!(self.syntax().map(|e| &e.cause),
                 Some(Cause::Unclosed(_))
                 | Some(Cause::UnclosedSection)
                 | Some(Cause::UnexpectedEof))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Element,
    SectionOpen,
    Subsection,
    QuotedSubsection,
    Key,
    ValueSeparator,
    Value,
    StringValue,
    RawValue,
    Comment,
}

// What read_until does with the characters it passes over.
#[derive(Debug, Clone, Copy)]
enum Keep {
    Nothing,
    Verbatim,
    Cased,
}

type Next = Result<Option<State>, DecodeError>;

/// One decoding session over one input. Not reusable: once `step`
/// has returned `Ok(false)` or an error, the session is over.
pub struct Decoder<S> {
    runes: Runes<S>,
    tracker: Tracker,
    current: char,
    eof: bool,

    // Bytes rather than a String since `\x` escapes write single
    // bytes; text is validated when it's handed out.
    buffer: Vec<u8>,
    prefix: Vec<u8>,
    key: String,

    sep: Vec<u8>,
    casing: KeyCase,
    flag: String,

    state: Option<State>,
    emitted: usize,
}

impl<S: RuneSource> Decoder<S> {
    pub fn new(src: S, settings: &Settings) -> Self {
        Decoder {
            runes: Runes::new(src),
            tracker: Tracker::new(),
            current: '\0',
            eof: false,
            buffer: Vec::with_capacity(64),
            prefix: Vec::with_capacity(32),
            key: String::new(),
            sep: settings.separator.as_str().as_bytes().to_vec(),
            casing: settings.casing,
            flag: settings.flag_value.as_str().to_string(),
            state: Some(State::Start),
            emitted: 0,
        }
    }

    /// Position of the most recently consumed character.
    pub fn pos(&self) -> Pos {
        self.tracker.pos()
    }

    /// Number of pairs handed to the recorder so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Run one state. Returns whether there is more to do.
    pub fn step(&mut self, dst: &mut dyn Recorder) -> Result<bool, DecodeError> {
        let state = match self.state {
            Some(state) => state,
            None => return Ok(false)
        };
        trace!(?state, pos = %self.pos(), "step");
        match self.dispatch(state, dst) {
            Ok(next) => {
                self.state = next;
                Ok(next.is_some())
            }
            Err(e) => {
                self.state = None;
                debug!(pos = %self.pos(), error = %e, "decoding failed");
                Err(e)
            }
        }
    }

    /// Run to the end of input or the first error.
    pub fn run(mut self, dst: &mut dyn Recorder) -> Result<(), DecodeError> {
        while self.step(dst)? {}
        debug!(emitted = self.emitted, lines = self.pos().line, "decoding finished");
        Ok(())
    }

    fn dispatch(&mut self, state: State, dst: &mut dyn Recorder) -> Next {
        match state {
            State::Start => self.start(),
            State::Element => self.element(),
            State::SectionOpen => self.section_open(),
            State::Subsection => self.subsection(),
            State::QuotedSubsection => self.quoted_subsection(),
            State::Key => self.read_key(dst),
            State::ValueSeparator => self.value_separator(dst),
            State::Value => self.value(dst),
            State::StringValue => self.string_value(dst),
            State::RawValue => self.raw_value(dst),
            State::Comment => self.comment(),
        }
    }

    // ---- reading ------------------------------------------------------

    fn next_rune(&mut self) -> Result<Option<char>, DecodeError> {
        if self.eof {
            return Ok(None)
        }
        match self.runes.next_rune()? {
            Some(c) => {
                self.current = c;
                self.tracker.consumed(c);
                Ok(Some(c))
            }
            None => {
                self.eof = true;
                Ok(None)
            }
        }
    }

    // Move on by one character; false at end of input.
    fn advance(&mut self) -> Result<bool, DecodeError> {
        Ok(self.next_rune()?.is_some())
    }

    fn peek(&mut self) -> Option<char> {
        if self.eof {
            None
        } else {
            self.runes.peek_rune()
        }
    }

    // Consume characters up to and including the first one matching
    // `stop`, which is left in `current`. Returns false if the input
    // ended first.
    fn read_until(
        &mut self,
        stop: impl Fn(char) -> bool,
        keep: Keep
    ) -> Result<bool, DecodeError> {
        loop {
            match self.next_rune()? {
                None => return Ok(false),
                Some(c) if stop(c) => return Ok(true),
                Some(c) => match keep {
                    Keep::Nothing => {}
                    Keep::Verbatim => push_char(&mut self.buffer, c),
                    Keep::Cased => self.casing.push(&mut self.buffer, c),
                }
            }
        }
    }

    // Skip whitespace starting at `current`; with `newlines` false
    // only horizontal whitespace. Returns false if the input ended.
    fn skip_space(&mut self, newlines: bool) -> Result<bool, DecodeError> {
        let is_space: fn(char) -> bool =
            if newlines { classify::is_space } else { classify::is_horiz_space };
        if is_space(self.current) {
            self.read_until(|c| !is_space(c), Keep::Nothing)
        } else {
            Ok(true)
        }
    }

    fn fail(&self, cause: Cause, desc: &'static str) -> DecodeError {
        DecodeError::Syntax(cause.at(self.pos(), Some(desc)))
    }

    fn buffered_text(&self, what: &'static str) -> Result<&str, DecodeError> {
        std::str::from_utf8(&self.buffer)
            .map_err(|_| self.fail(Cause::InvalidUtf8, what))
    }

    fn record(&mut self, dst: &mut dyn Recorder, value: &str) {
        trace!(key = %self.key, value, "emit");
        dst.add(&self.key, value);
        self.emitted += 1;
    }

    fn record_flag(&mut self, dst: &mut dyn Recorder) {
        let flag = std::mem::take(&mut self.flag);
        self.record(dst, &flag);
        self.flag = flag;
    }

    fn record_buffer(&mut self, dst: &mut dyn Recorder) -> Result<(), DecodeError> {
        let value = self.buffered_text("value is not valid UTF-8")?;
        trace!(key = %self.key, value, "emit");
        dst.add(&self.key, value);
        self.emitted += 1;
        Ok(())
    }

    // Resolve the escape sequence whose backslash is `current`.
    fn read_escape(&mut self) -> Result<(), DecodeError> {
        let c = match self.next_rune()? {
            Some(c) => c,
            None => return Err(self.fail(Cause::UnexpectedEof,
                                         "encountered EOF after escape character"))
        };
        let esc = classify::escape(c);
        match esc {
            Escape::Char(r) => push_char(&mut self.buffer, r),
            Escape::Byte => {
                let n = self.read_hex(esc.hex_len())?;
                self.buffer.push((n & 0xFF) as u8);
            }
            Escape::Unicode(_) => {
                let n = self.read_hex(esc.hex_len())?;
                match char::from_u32(n) {
                    Some(r) => push_char(&mut self.buffer, r),
                    None => return Err(self.fail(Cause::InvalidCodePoint(n),
                                                 "escape does not name a character"))
                }
            }
        }
        Ok(())
    }

    fn read_hex(&mut self, len: usize) -> Result<u32, DecodeError> {
        let mut n: u32 = 0;
        for _ in 0..len {
            let c = match self.next_rune()? {
                Some(c) => c,
                None => return Err(self.fail(Cause::UnexpectedEof, "expected hex code"))
            };
            match classify::hex_digit(c) {
                Some(d) => n = n << 4 | d,
                None => return Err(self.fail(Cause::NotHex(c), "expected hex code"))
            }
        }
        Ok(n)
    }

    // Separate the next section name segment from the previous one.
    fn add_prefix_sep(&mut self) {
        if self.buffer.is_empty() || self.buffer.ends_with(&self.sep) {
            return
        }
        self.buffer.extend_from_slice(&self.sep);
    }

    // ---- states -------------------------------------------------------

    fn start(&mut self) -> Next {
        if self.advance()? {
            Ok(Some(State::Element))
        } else {
            Ok(None)
        }
    }

    fn element(&mut self) -> Next {
        self.buffer.clear();
        if self.eof {
            return Ok(None)
        }
        let c = self.current;
        if c == SECTION_OPEN {
            Ok(Some(State::SectionOpen))
        } else if classify::is_comment_start(c) {
            Ok(Some(State::Comment))
        } else if classify::is_space(c) {
            if self.skip_space(true)? {
                Ok(Some(State::Element))
            } else {
                Ok(None)
            }
        } else {
            Ok(Some(State::Key))
        }
    }

    fn comment(&mut self) -> Next {
        if self.read_until(|c| c == NEWLINE, Keep::Nothing)? {
            Ok(Some(State::Element))
        } else {
            Ok(None)
        }
    }

    fn section_open(&mut self) -> Next {
        if self.current != SECTION_OPEN {
            return Err(DecodeError::Internal("section header without opening bracket"))
        }
        if self.advance()? {
            Ok(Some(State::Subsection))
        } else {
            Err(self.fail(Cause::UnclosedSection, "encountered EOF inside section name"))
        }
    }

    fn subsection(&mut self) -> Next {
        const EOF_DESC: &str = "encountered EOF inside section name";
        self.add_prefix_sep();
        match self.current {
            SECTION_CLOSE => {
                // replace, never append to, the previous prefix
                self.prefix.clear();
                self.prefix.extend_from_slice(&self.buffer);
                trace!(prefix = %String::from_utf8_lossy(&self.prefix), "section");
                if self.advance()? {
                    Ok(Some(State::Element))
                } else {
                    Ok(None)
                }
            }
            RAW_QUOTE => Err(self.fail(Cause::SectionRawString,
                                       "raw strings are not allowed in section names")),
            QUOTE => Ok(Some(State::QuotedSubsection)),
            ' ' | '\t' => {
                if self.skip_space(false)? {
                    Ok(Some(State::Subsection))
                } else {
                    Err(self.fail(Cause::UnclosedSection, EOF_DESC))
                }
            }
            NEWLINE => Err(self.fail(Cause::BAD_NEWLINE,
                                     "section headings may not contain unquoted newlines")),
            c if classify::is_space(c) => Err(self.fail(Cause::BadChar(c),
                                                        "expected section name")),
            c => {
                self.casing.push(&mut self.buffer, c);
                if self.read_until(classify::is_section_end, Keep::Cased)? {
                    Ok(Some(State::Subsection))
                } else {
                    Err(self.fail(Cause::UnclosedSection, EOF_DESC))
                }
            }
        }
    }

    fn quoted_subsection(&mut self) -> Next {
        if !self.read_until(classify::is_string_stop, Keep::Verbatim)? {
            return Err(self.fail(Cause::Unclosed(QUOTE),
                                 "encountered EOF inside quoted section name"))
        }
        match self.current {
            QUOTE => {
                if self.peek() == Some(QUOTE) {
                    push_char(&mut self.buffer, QUOTE);
                    self.advance()?;
                    return Ok(Some(State::QuotedSubsection))
                }
                if self.advance()? {
                    Ok(Some(State::Subsection))
                } else {
                    Err(self.fail(Cause::UnclosedSection,
                                  "encountered EOF inside section name"))
                }
            }
            ESCAPE => {
                self.read_escape()?;
                Ok(Some(State::QuotedSubsection))
            }
            _ => Err(DecodeError::Internal("quoted section name stopped early"))
        }
    }

    fn read_key(&mut self, dst: &mut dyn Recorder) -> Next {
        match self.current {
            EQUALS => return Err(self.fail(Cause::EmptyKey, "keys may not be blank")),
            c @ (QUOTE | RAW_QUOTE) => return Err(self.fail(Cause::BadChar(c),
                                                            "keys may not be quoted strings")),
            c => {
                self.buffer.extend_from_slice(&self.prefix);
                self.casing.push(&mut self.buffer, c);
            }
        }

        let terminated = self.read_until(classify::is_key_end, Keep::Cased)?;
        self.key = self.buffered_text("key is not valid UTF-8")?.to_string();
        self.buffer.clear();

        if !terminated {
            self.record_flag(dst);
            return Ok(None)
        }
        Ok(Some(State::ValueSeparator))
    }

    fn value_separator(&mut self, dst: &mut dyn Recorder) -> Next {
        if !self.skip_space(false)? {
            self.record_flag(dst);
            return Ok(None)
        }

        // Aside from whitespace, only a newline, '=' or a comment may
        // follow a key.
        match self.current {
            NEWLINE => {
                self.record_flag(dst);
                if self.advance()? {
                    Ok(Some(State::Element))
                } else {
                    Ok(None)
                }
            }
            EQUALS => {
                if self.advance()? {
                    Ok(Some(State::Value))
                } else {
                    self.record(dst, "");
                    Ok(None)
                }
            }
            c if classify::is_comment_start(c) => {
                self.record_flag(dst);
                Ok(Some(State::Comment))
            }
            c => Err(self.fail(Cause::BadChar(c),
                               "expected either =, newline, or a comment"))
        }
    }

    fn value(&mut self, dst: &mut dyn Recorder) -> Next {
        if !self.skip_space(false)? {
            self.record(dst, "");
            return Ok(None)
        }

        match self.current {
            NEWLINE => {
                self.record(dst, "");
                if self.advance()? {
                    Ok(Some(State::Element))
                } else {
                    Ok(None)
                }
            }
            QUOTE => Ok(Some(State::StringValue)),
            RAW_QUOTE => Ok(Some(State::RawValue)),
            c if classify::is_comment_start(c) => {
                self.record(dst, "");
                Ok(Some(State::Comment))
            }
            c => {
                push_char(&mut self.buffer, c);
                let more = self.read_until(classify::is_value_end, Keep::Verbatim)?;
                let len = self.buffered_text("value is not valid UTF-8")?
                    .trim_end()
                    .len();
                self.buffer.truncate(len);
                self.record_buffer(dst)?;
                if more {
                    Ok(Some(State::Element))
                } else {
                    Ok(None)
                }
            }
        }
    }

    fn string_value(&mut self, dst: &mut dyn Recorder) -> Next {
        if !self.read_until(classify::is_string_stop, Keep::Verbatim)? {
            return Err(self.fail(Cause::Unclosed(QUOTE), "encountered EOF inside string"))
        }
        match self.current {
            QUOTE => {
                if self.peek() == Some(QUOTE) {
                    push_char(&mut self.buffer, QUOTE);
                    self.advance()?;
                    return Ok(Some(State::StringValue))
                }
                self.record_buffer(dst)?;
                if self.advance()? {
                    Ok(Some(State::Element))
                } else {
                    Ok(None)
                }
            }
            ESCAPE => {
                self.read_escape()?;
                Ok(Some(State::StringValue))
            }
            _ => Err(DecodeError::Internal("string value stopped early"))
        }
    }

    fn raw_value(&mut self, dst: &mut dyn Recorder) -> Next {
        if !self.read_until(|c| c == RAW_QUOTE, Keep::Verbatim)? {
            return Err(self.fail(Cause::Unclosed(RAW_QUOTE),
                                 "encountered EOF inside raw string"))
        }
        if self.peek() == Some(RAW_QUOTE) {
            push_char(&mut self.buffer, RAW_QUOTE);
            self.advance()?;
            return Ok(Some(State::RawValue))
        }
        self.record_buffer(dst)?;
        if self.advance()? {
            Ok(Some(State::Element))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffered_chars::CharSource;
    use crate::settings::DEFAULT_SETTINGS;
    use crate::value::Entry;

    fn decode(s: &str) -> Result<Vec<Entry>, DecodeError> {
        let mut out = Vec::new();
        Decoder::new(CharSource(s.chars()), &DEFAULT_SETTINGS).run(&mut out)?;
        Ok(out)
    }

    fn pairs(s: &str) -> Vec<(String, String)> {
        decode(s).unwrap().into_iter().map(|e| (e.key, e.value)).collect()
    }

    fn cause(s: &str) -> Cause {
        decode(s).unwrap_err().syntax().expect("syntax error").cause.clone()
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("\n\t\n;empty\n\t\n\t").unwrap().is_empty());
    }

    #[test]
    fn emits_in_document_order() {
        assert_eq!(pairs("k = left\nk = `center`\nk = \"right\""),
                   [("k".to_string(), "left".to_string()),
                    ("k".to_string(), "center".to_string()),
                    ("k".to_string(), "right".to_string())]);
    }

    #[test]
    fn stepping_after_the_end_does_nothing() {
        let mut out: Vec<Entry> = Vec::new();
        let mut d = Decoder::new(CharSource("a\n".chars()), &DEFAULT_SETTINGS);
        while d.step(&mut out).unwrap() {}
        assert!(!d.step(&mut out).unwrap());
        assert_eq!(d.emitted(), 1);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn prefix_is_replaced() {
        assert_eq!(pairs("[a b]\n[c]\nk"),
                   [("c.k".to_string(), "1".to_string())]);
    }

    #[test]
    fn error_causes() {
        assert_eq!(cause("= v"), Cause::EmptyKey);
        assert_eq!(cause("\"k\" = v"), Cause::BadChar('"'));
        assert_eq!(cause("key spaced"), Cause::BadChar('s'));
        assert_eq!(cause("[a `b`]"), Cause::SectionRawString);
        assert_eq!(cause("[a\nb]"), Cause::BAD_NEWLINE);
        assert_eq!(cause("[\u{0C}]"), Cause::BadChar('\u{0C}'));
        assert_eq!(cause("[abc"), Cause::UnclosedSection);
        assert_eq!(cause("k = \"abc"), Cause::Unclosed('"'));
        assert_eq!(cause("k = `abc"), Cause::Unclosed('`'));
        assert_eq!(cause("k = \"\\x1"), Cause::UnexpectedEof);
        assert_eq!(cause("k = \"\\xg0\""), Cause::NotHex('g'));
        assert_eq!(cause("k = \"\\uD800\""), Cause::InvalidCodePoint(0xD800));
        assert_eq!(cause("k = \"\\xff\""), Cause::InvalidUtf8);
        assert_eq!(cause("[s \"q\\"), Cause::UnexpectedEof);
    }

    #[test]
    fn messages() {
        let e = decode("a\nb = \"\\xZZ\"").unwrap_err();
        assert_eq!(e.to_string(),
                   "ini: syntax error at 2:8: not a hex digit: 'Z' -- expected hex code");
        assert_eq!(Cause::Unclosed('[').to_string(), "unclosed '[', expecting ']'");
        assert!(e.syntax().is_some());
        assert!(!e.is_truncation());
        assert!(decode("k = `abc").unwrap_err().is_truncation());
    }
}
