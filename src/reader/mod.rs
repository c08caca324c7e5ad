/*
** This file is a part of xmltok (streaming XML tokenizer)
** Copyright (C) 2025 Gurer Ozen
**
** xmltok is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod location;

use std::io;
use std::io::BufRead;
use std::str::Chars;

pub use location::Location;

/// A sequential source of decoded characters.
///
/// The decoder does not do any character set handling by itself, it
/// consumes whatever the source yields. `Ok(None)` signals the end of
/// the input. Errors are passed to the caller as they are, there are
/// no retries.
pub trait CharSource {
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

impl CharSource for Chars<'_> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        Ok(self.next())
    }
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        (**self).next_char()
    }
}

/// Decodes UTF-8 characters from a buffered byte reader.
///
/// Invalid or truncated sequences are reported as
/// [InvalidData](std::io::ErrorKind::InvalidData) errors.
pub struct Utf8Source<R> {
    inner: R,
}

impl<R: BufRead> Utf8Source<R> {
    pub fn new(inner: R) -> Self {
        Utf8Source { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let c = match self.inner.fill_buf()?.first() {
            Some(&c) => c,
            None => return Ok(None),
        };
        self.inner.consume(1);
        Ok(Some(c))
    }
}

fn sequence_len(c: u8) -> Option<usize> {
    if c & 0x80 == 0 {
        Some(1)
    } else if c & 0xe0 == 0xc0 {
        Some(2)
    } else if c & 0xf0 == 0xe0 {
        Some(3)
    } else if c & 0xf8 == 0xf0 {
        Some(4)
    } else {
        None
    }
}

fn invalid_utf8(msg: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

impl<R: BufRead> CharSource for Utf8Source<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        let first = match self.next_byte()? {
            Some(c) => c,
            None => return Ok(None),
        };
        if first < 0x80 {
            return Ok(Some(first as char));
        }

        let len = sequence_len(first).ok_or_else(|| invalid_utf8("invalid UTF-8 prefix byte"))?;
        let mut buf = [first, 0, 0, 0];
        for slot in buf[1..len].iter_mut() {
            *slot = self
                .next_byte()?
                .ok_or_else(|| invalid_utf8("truncated UTF-8 sequence"))?;
        }
        // from_utf8 also rejects overlong sequences and surrogates
        let s = std::str::from_utf8(&buf[..len]).map_err(|_| invalid_utf8("invalid UTF-8 sequence"))?;
        Ok(s.chars().next())
    }
}

/// Character reader which keeps track of the current position.
pub struct RuneReader<S> {
    source: S,
    location: Location,
}

impl<S: CharSource> RuneReader<S> {
    pub fn new(source: S) -> Self {
        RuneReader {
            source,
            location: Location::new(),
        }
    }

    /// Reads the next character, `None` at the end of the input.
    ///
    /// The end of the input does not move the location.
    pub fn next(&mut self) -> io::Result<Option<char>> {
        let c = self.source.next_char()?;
        if let Some(c) = c {
            self.location.advance(c);
        }
        Ok(c)
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn into_source(self) -> S {
        self.source
    }
}
