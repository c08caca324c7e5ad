/*
** This file is a part of xmltok (streaming XML tokenizer)
** Copyright (C) 2025 Gurer Ozen
**
** xmltok is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::error::Error;
use std::fmt::Display;

/// Error type for identifiers which cannot form a [Name](super::Name).
///
/// The argument is a static description of the problem.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct BadName(pub &'static str);

impl Display for BadName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid identifier: {}", self.0)
    }
}

impl Error for BadName {}

pub(super) mod description {
    pub(in super::super) const EMPTY: &str = "name is empty";
    pub(in super::super) const EMPTY_LOCAL: &str = "namespace prefix without a local name";
    pub(in super::super) const EMPTY_PREFIX: &str = "namespace separator without a prefix";
    pub(in super::super) const MULTIPLE_SEPARATORS: &str =
        "only one namespace separator is allowed";
}
