// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Settings for reading (decoding) INI data. A `Settings` value holds
//! no decoding state and can be shared freely between readers.

use kstring::KString;

/// How unquoted parts of keys and section names are cased. Quoted
/// section names are never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyCase {
    /// Lower-case unquoted key segments; the zero-configuration
    /// default.
    #[default]
    LowerCase,
    UpperCase,
    /// Keep keys as written.
    CaseSensitive,
}

impl KeyCase {
    /// Append `c` to `out`, cased one character to one: characters
    /// without a single-character mapping stay as they are ('ß' is not
    /// upper-cased), except 'İ', which lower-cases to 'i'.
    pub(crate) fn push(self, out: &mut Vec<u8>, c: char) {
        push_char(out, self.fold(c))
    }

    pub(crate) fn fold(self, c: char) -> char {
        match self {
            // U+0130 is the only char lower-casing to more than one;
            // the first of them is its simple mapping
            KeyCase::LowerCase => c.to_lowercase().next().unwrap_or(c),
            KeyCase::UpperCase => {
                let mut up = c.to_uppercase();
                match (up.next(), up.next()) {
                    (Some(u), None) => u,
                    _ => c
                }
            }
            KeyCase::CaseSensitive => c,
        }
    }
}

pub(crate) fn push_char(out: &mut Vec<u8>, c: char) {
    let mut tmp = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
}

/// The string put between a section name and a key, and between the
/// space separated segments of a section name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Separator {
    /// "."
    #[default]
    Dot,
    /// Any string; the empty string means `Dot`.
    Custom(KString),
    /// Segments are joined without anything in between.
    Disabled,
}

impl Separator {
    pub fn as_str(&self) -> &str {
        match self {
            Separator::Dot => ".",
            Separator::Custom(s) if s.is_empty() => ".",
            Separator::Custom(s) => s.as_str(),
            Separator::Disabled => "",
        }
    }
}

/// The value recorded for keys without a `= value` clause, so that they
/// can be used as boolean flags.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlagValue {
    /// "1"
    #[default]
    One,
    /// Any string; the empty string means `One`.
    Custom(KString),
    /// Flags get the empty string.
    Empty,
}

pub const TRUE: &str = "1";

impl FlagValue {
    pub fn as_str(&self) -> &str {
        match self {
            FlagValue::One => TRUE,
            FlagValue::Custom(s) if s.is_empty() => TRUE,
            FlagValue::Custom(s) => s.as_str(),
            FlagValue::Empty => "",
        }
    }
}

/// `Settings::default()` lower-cases keys, like a configuration that
/// names nothing; `DEFAULT_SETTINGS`, used by the convenience readers,
/// keeps keys case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    pub separator: Separator,
    pub casing: KeyCase,
    pub flag_value: FlagValue,
}

pub const DEFAULT_SETTINGS: Settings = Settings {
    separator: Separator::Dot,
    casing: KeyCase::CaseSensitive,
    flag_value: FlagValue::One,
};

impl Settings {
    pub fn with_separator(mut self, sep: &str) -> Self {
        self.separator = Separator::Custom(KString::from_ref(sep));
        self
    }

    pub fn without_separator(mut self) -> Self {
        self.separator = Separator::Disabled;
        self
    }

    pub fn with_casing(mut self, casing: KeyCase) -> Self {
        self.casing = casing;
        self
    }

    pub fn with_flag_value(mut self, value: &str) -> Self {
        self.flag_value = FlagValue::Custom(KString::from_ref(value));
        self
    }

    pub fn with_empty_flag_value(mut self) -> Self {
        self.flag_value = FlagValue::Empty;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_fall_back() {
        let s = Settings::default().with_separator("").with_flag_value("");
        assert_eq!(s.separator.as_str(), ".");
        assert_eq!(s.flag_value.as_str(), "1");
        let s = s.without_separator().with_empty_flag_value();
        assert_eq!(s.separator.as_str(), "");
        assert_eq!(s.flag_value.as_str(), "");
    }

    #[test]
    fn defaults_differ_in_casing() {
        assert_eq!(Settings::default().casing, KeyCase::LowerCase);
        assert_eq!(DEFAULT_SETTINGS.casing, KeyCase::CaseSensitive);
        assert_eq!(Settings::default().separator, DEFAULT_SETTINGS.separator);
    }

    #[test]
    fn casing_pushes() {
        let mut out = Vec::new();
        KeyCase::UpperCase.push(&mut out, 'ß');
        KeyCase::LowerCase.push(&mut out, 'Ä');
        KeyCase::CaseSensitive.push(&mut out, 'q');
        assert_eq!(out, "ßäq".as_bytes());
    }

    #[test]
    fn folding_is_one_char_to_one() {
        assert_eq!(KeyCase::LowerCase.fold('İ'), 'i');
        assert_eq!(KeyCase::UpperCase.fold('ß'), 'ß');
        assert_eq!(KeyCase::UpperCase.fold('ﬀ'), 'ﬀ');
        assert_eq!(KeyCase::UpperCase.fold('ǆ'), 'Ǆ');
        assert_eq!(KeyCase::LowerCase.fold('Σ'), 'σ');
        assert_eq!(KeyCase::CaseSensitive.fold('İ'), 'İ');
    }
}
