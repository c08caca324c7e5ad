/*
** This file is a part of xmltok (streaming XML tokenizer)
** Copyright (C) 2025 Gurer Ozen
**
** xmltok is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use crate::arena::DEFAULT_ATTR_CAPACITY;

pub const DEFAULT_BUFFER_CAPACITY: usize = 1000;

/// Settings of a [Decoder](crate::Decoder).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DecoderOptions {
    /// Return the contents of comments. Otherwise comment tokens are empty.
    /// Disabled by default.
    pub read_comment: bool,

    /// Return the contents of directives. Otherwise directive tokens are empty.
    /// Disabled by default.
    pub read_directive: bool,

    /// Initial number of attribute slots.
    pub attr_capacity: usize,

    /// Initial size of the text buffer in bytes.
    pub buffer_capacity: usize,
}

impl DecoderOptions {
    pub fn new() -> Self {
        DecoderOptions {
            read_comment: false,
            read_directive: false,
            attr_capacity: DEFAULT_ATTR_CAPACITY,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }

    pub fn read_comment(mut self, enabled: bool) -> Self {
        self.read_comment = enabled;
        self
    }

    pub fn read_directive(mut self, enabled: bool) -> Self {
        self.read_directive = enabled;
        self
    }
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self::new()
    }
}
