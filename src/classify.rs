// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Character classes of the INI syntax, and the pieces of escape
//! decoding that don't need the input stream.

pub const SECTION_OPEN: char = '[';
pub const SECTION_CLOSE: char = ']';
pub const QUOTE: char = '"';
pub const RAW_QUOTE: char = '`';
pub const NEWLINE: char = '\n';
pub const SEMICOLON: char = ';';
pub const HASH: char = '#';
pub const EQUALS: char = '=';
pub const ESCAPE: char = '\\';

/// Space, tab and carriage return. Carriage returns are ignored
/// everywhere outside of quoted and raw strings.
pub fn is_horiz_space(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r'
}

/// Any whitespace, including line feeds; skipped between elements.
pub fn is_space(c: char) -> bool {
    c.is_whitespace()
}

pub fn is_comment_start(c: char) -> bool {
    c == HASH || c == SEMICOLON
}

pub fn is_key_end(c: char) -> bool {
    c == EQUALS || is_comment_start(c) || is_space(c)
}

pub fn is_section_end(c: char) -> bool {
    matches!(c, ' ' | '\t' | NEWLINE | QUOTE | SECTION_CLOSE)
}

pub fn is_value_end(c: char) -> bool {
    c == NEWLINE || is_comment_start(c)
}

/// Stops of a quoted string: the closing quote or an escape.
pub fn is_string_stop(c: char) -> bool {
    c == QUOTE || c == ESCAPE
}

/// The closing counterpart of an opening delimiter; delimiters without
/// a distinct partner close themselves.
pub fn closing(opening: char) -> char {
    match opening {
        '{' => '}',
        '(' => ')',
        '[' => ']',
        '<' => '>',
        c => c
    }
}

/// What follows a backslash inside a quoted string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// Resolves directly to this character.
    Char(char),
    /// `\xHH`: two hex digits giving one raw byte.
    Byte,
    /// `\uHHHH` or `\UHHHHHHHH`: that many hex digits giving a
    /// code point.
    Unicode(u8),
}

impl Escape {
    /// Number of hex digits that have to follow, if any.
    pub fn hex_len(self) -> usize {
        match self {
            Escape::Char(_) => 0,
            Escape::Byte => 2,
            Escape::Unicode(n) => n as usize,
        }
    }
}

pub fn escape(c: char) -> Escape {
    match c {
        '0' => Escape::Char('\0'),
        'a' => Escape::Char('\x07'),
        'b' => Escape::Char('\x08'),
        'f' => Escape::Char('\x0C'),
        'n' => Escape::Char('\n'),
        'r' => Escape::Char('\r'),
        't' => Escape::Char('\t'),
        'v' => Escape::Char('\x0B'),
        'x' => Escape::Byte,
        'u' => Escape::Unicode(4),
        'U' => Escape::Unicode(8),
        // anything else, including quotes and backslashes, stands
        // for itself
        c => Escape::Char(c),
    }
}

/// The value of one hex digit, either case.
pub fn hex_digit(c: char) -> Option<u32> {
    match c {
        '0'..='9' => Some(c as u32 - '0' as u32),
        'a'..='f' => Some(c as u32 - 'a' as u32 + 10),
        'A'..='F' => Some(c as u32 - 'A' as u32 + 10),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes() {
        let resolved: String = "0abfnrtv"
            .chars()
            .map(|c| match escape(c) {
                Escape::Char(c) => c,
                e => panic!("unexpected {e:?}"),
            })
            .collect();
        assert_eq!(resolved, "\0\x07\x08\x0C\n\r\t\x0B");
        assert_eq!(escape('"'), Escape::Char('"'));
        assert_eq!(escape('\\'), Escape::Char('\\'));
        assert_eq!(escape(';'), Escape::Char(';'));
        assert_eq!(escape('j'), Escape::Char('j'));
        assert_eq!(escape('x').hex_len(), 2);
        assert_eq!(escape('u').hex_len(), 4);
        assert_eq!(escape('U').hex_len(), 8);
    }

    #[test]
    fn hex_digits() {
        assert_eq!(hex_digit('0'), Some(0));
        assert_eq!(hex_digit('9'), Some(9));
        assert_eq!(hex_digit('a'), Some(10));
        assert_eq!(hex_digit('F'), Some(15));
        assert_eq!(hex_digit('g'), None);
        assert_eq!(hex_digit('😀'), None);
        assert_eq!(hex_digit('٣'), None);
    }

    #[test]
    fn closing_pairs() {
        assert_eq!(closing('['), ']');
        assert_eq!(closing('<'), '>');
        assert_eq!(closing('"'), '"');
        assert_eq!(closing('`'), '`');
    }

    #[test]
    fn terminators() {
        assert!(is_key_end('='));
        assert!(is_key_end('\u{2003}'));
        assert!(!is_key_end('-'));
        assert!(is_section_end('"'));
        assert!(!is_section_end('\r'));
        assert!(is_value_end(';'));
        assert!(!is_value_end(' '));
        assert!(is_horiz_space('\r'));
        assert!(!is_horiz_space('\n'));
    }
}
