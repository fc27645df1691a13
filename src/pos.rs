// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

/// Position of the most recently consumed character. Both line and
/// col are 1-based; col 0 means nothing has been consumed on the
/// first line yet.
///
/// A line feed moves to the next line and is itself reported at
/// column 1 of that line, as is the first character following it.

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Pos {
    pub line: u32,
    pub col: u32,
}

impl Pos {
    pub const START: Pos = Pos { line: 1, col: 0 };
}

impl Default for Pos {
    fn default() -> Self {
        Pos::START
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{}:{}", self.line, self.col))
    }
}

/// Tracks the position while characters are being consumed.
#[derive(Debug, Copy, Clone)]
pub(crate) struct Tracker {
    pos: Pos,
    after_newline: bool,
}

impl Tracker {
    pub(crate) fn new() -> Self {
        Tracker { pos: Pos::START, after_newline: false }
    }

    pub(crate) fn pos(&self) -> Pos {
        self.pos
    }

    pub(crate) fn consumed(&mut self, c: char) {
        if c == '\n' {
            self.pos = Pos { line: self.pos.line + 1, col: 1 };
            self.after_newline = true;
        } else if self.after_newline {
            // first character on the line shares column 1 with the
            // line feed that opened it
            self.after_newline = false;
        } else {
            self.pos.col += 1;
        }
    }
}
