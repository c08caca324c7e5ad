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
use std::fmt::Write;

use crate::BadName;
use crate::Location;
use crate::NoMemory;

/// Category of a [DecodeError].
#[derive(Debug)]
pub enum ErrorKind {
    /// A character which violates the grammar at the current position.
    UnexpectedChar(char),

    /// The input ended inside a token.
    ///
    /// The end of input at a token boundary is not an error, the decoder
    /// returns `Ok(None)` for it.
    UnexpectedEof,

    /// A comment or processing instruction reached `>` without its closing sequence.
    ///
    /// The argument describes the expected ending.
    ClosedTooEarly(&'static str),

    /// An identifier cannot be turned into a name, like `<foo:>`.
    BadName(BadName),

    /// The attribute buffer could not grow.
    NoMemory,

    /// The character source failed.
    Io(std::io::Error),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::UnexpectedChar(c) => write!(f, "unexpected char {c:?}"),
            ErrorKind::UnexpectedEof => write!(f, "unexpected EOF"),
            ErrorKind::ClosedTooEarly(msg) => write!(f, "{msg}"),
            ErrorKind::BadName(err) => err.fmt(f),
            ErrorKind::NoMemory => write!(f, "not enough memory"),
            ErrorKind::Io(err) => write!(f, "read error: {err}"),
        }
    }
}

/// Error returned from [Decoder::token()](crate::Decoder::token).
///
/// Every error is terminal for the current call. The error message combines
/// the kind, a description of what the decoder was reading, and the
/// location:
///
/// ```text
/// unexpected char '>' on chardata at row: 3 col: 5
/// ```
#[derive(Debug)]
pub struct DecodeError {
    kind: ErrorKind,
    context: String,
    location: Location,
}

impl DecodeError {
    pub(crate) fn new(kind: ErrorKind, location: Location) -> Self {
        DecodeError {
            kind,
            context: String::new(),
            location,
        }
    }

    // Context phrases are appended from the innermost production outwards.
    pub(crate) fn within(mut self, context: impl Display) -> Self {
        let _ = write!(self.context, "{context}");
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Description of the grammar production which failed, may be empty.
    pub fn context(&self) -> &str {
        self.context.trim_start_matches([',', ' '])
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn is_unexpected_eof(&self) -> bool {
        matches!(self.kind, ErrorKind::UnexpectedEof)
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{} at {}", self.kind, self.context, self.location)
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(err) => Some(err),
            ErrorKind::BadName(err) => Some(err),
            ErrorKind::NoMemory => Some(&NoMemory),
            _ => None,
        }
    }
}

pub(super) mod description {
    pub(in super::super) const COMMENT_CLOSED_EARLY: &str =
        "comment closed too early, must end in '-->'";
    pub(in super::super) const PROC_INST_CLOSED_EARLY: &str =
        "proc inst closed too early, must end in '?>'";
}

pub(super) mod context {
    pub(in super::super) const ON_CHARDATA: &str = " on chardata";
    pub(in super::super) const READING_IDENTIFIER: &str = " reading identifier";
    pub(in super::super) const EXPECTED_COMMENT: &str = ", expected '<!--'";
    pub(in super::super) const EXPECTED_TAG_IDENTIFIER: &str = ", expected tag identifier";
    pub(in super::super) const EXPECTED_ATTRIBUTE_IDENTIFIER: &str =
        ", expected attribute identifier";
    pub(in super::super) const EXPECTED_SELF_CLOSE: &str = ", expected '>' for self-close tag";
    pub(in super::super) const EXPECTED_CLOSING_TAG: &str = ", expected closing tag";
}
