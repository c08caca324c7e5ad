/*
** This file is a part of xmltok (streaming XML tokenizer)
** Copyright (C) 2025 Gurer Ozen
**
** xmltok is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::collections::TryReserveError;
use std::error::Error;
use std::fmt::Display;

/// Error type for memory allocation failures.
///
/// The attribute arena returns this error when the global allocator
/// cannot grow its backing storage. Best action is to abort decoding.
///
/// Details about the failed allocation are not included, the request
/// size is always a fraction of the current arena capacity.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NoMemory;

impl Display for NoMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "not enough memory")
    }
}

impl Error for NoMemory {}

impl From<TryReserveError> for NoMemory {
    fn from(_: TryReserveError) -> Self {
        NoMemory
    }
}
