/*
** This file is a part of xmltok (streaming XML tokenizer)
** Copyright (C) 2025 Gurer Ozen
**
** xmltok is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::fmt::Display;

/// A position in the decoded character stream.
///
/// This struct is returned from the
/// [location()](crate::Decoder::location) method and is attached to
/// every [DecodeError](crate::DecodeError). It gives you the position
/// of the last consumed character.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Location {
    /// Number of characters consumed so far.
    pub chars: usize,
    /// Current line, starting from 1. Lines are separated by the newline character.
    pub row: usize,
    /// How many characters after the last newline character.
    pub column: usize,
}

impl Location {
    /// Creates a new location at the beginning of the input stream.
    ///
    /// This constructor is made public in case if you store the
    /// location in somewhere and need a default.
    pub fn new() -> Self {
        Location {
            chars: 0,
            row: 1,
            column: 0,
        }
    }

    pub(super) fn advance(&mut self, c: char) {
        self.chars += 1;
        if c == '\n' {
            self.row += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::new()
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "row: {} col: {}", self.row, self.column)
    }
}
