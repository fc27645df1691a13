// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Where an input came from (other than the position within it), for
//! error messages.

use std::{fmt::{Display, Formatter}, path::{Path, PathBuf}};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    File(PathBuf),
    /// A stream without a path, e.g. "stdin".
    Named(String),
}

impl Origin {
    pub fn file(path: &Path) -> Self {
        Origin::File(path.to_path_buf())
    }

    pub fn named(name: &str) -> Self {
        Origin::Named(name.to_string())
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Origin::File(path) => f.write_fmt(format_args!("{:?}", path)),
            Origin::Named(name) => f.write_fmt(format_args!("({})", name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Origin::file(Path::new("a/b.ini")).to_string(), "\"a/b.ini\"");
        assert_eq!(Origin::named("stdin").to_string(), "(stdin)");
    }
}
