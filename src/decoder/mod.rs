/*
** This file is a part of xmltok (streaming XML tokenizer)
** Copyright (C) 2025 Gurer Ozen
**
** xmltok is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod error;
mod options;

use std::io::BufReader;
use std::io::Read;
use std::iter::FusedIterator;
use std::mem;
use std::str::Chars;
use std::sync::Arc;

use crate::AttrArena;
use crate::BadName;
use crate::Name;
use crate::NameInterner;
use crate::OwnedToken;
use crate::StartTag;
use crate::Token;
use crate::names::NAMESPACE_SEPARATOR;
use crate::reader::CharSource;
use crate::reader::Location;
use crate::reader::RuneReader;
use crate::reader::Utf8Source;

pub use error::DecodeError;
pub use error::ErrorKind;
use error::context;
use error::description;
pub use options::DecoderOptions;

enum State {
    Idle,
    // Character data ended with a '<', the next call continues the tag.
    StartedTag,
    // The last start tag closed itself, the next call emits its close tag.
    PendingClose(Arc<Name>),
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '-' || c == '_'
}

/// Pull based XML tokenizer.
///
/// The decoder reads characters from a source and returns one [Token] per
/// [token()](Decoder::token) call. Tokens borrow the buffers of the decoder,
/// which are reused for the next token, so decoding does not allocate per
/// token once the buffers are warmed up. Tag and attribute names are
/// interned, and the same spelling always gives the same [Arc]`<`[Name]`>`.
///
/// The decoder does not check that close tags match the open tags.
///
/// # Examples
///
/// ```
/// use xmltok::{Decoder, Token};
///
/// let mut decoder = Decoder::from_text("<msg id='1'>hello</msg>");
/// let mut text = String::new();
/// while let Some(token) = decoder.token()? {
///     match token {
///         Token::StartTag(tag) => assert_eq!(tag.attr("id"), Some("1")),
///         Token::CharData(data) => text.push_str(data),
///         _ => (),
///     }
/// }
/// assert_eq!(text, "hello");
/// # Ok::<(), xmltok::DecodeError>(())
/// ```
pub struct Decoder<S> {
    reader: RuneReader<S>,
    options: DecoderOptions,
    state: State,
    buffer: String,
    attrs: AttrArena,
    names: NameInterner,
}

impl<R: Read> Decoder<Utf8Source<BufReader<R>>> {
    /// Creates a decoder for UTF-8 encoded bytes from a reader.
    pub fn new(reader: R) -> Self {
        Self::with_source(Utf8Source::new(BufReader::new(reader)))
    }
}

impl<'a> Decoder<Chars<'a>> {
    pub fn from_text(text: &'a str) -> Self {
        Self::with_source(text.chars())
    }
}

impl<S: CharSource> Decoder<S> {
    pub fn with_source(source: S) -> Self {
        Self::with_options(source, DecoderOptions::new())
    }

    pub fn with_options(source: S, options: DecoderOptions) -> Self {
        Decoder {
            reader: RuneReader::new(source),
            options,
            state: State::Idle,
            buffer: String::with_capacity(options.buffer_capacity),
            attrs: AttrArena::with_capacity(options.attr_capacity),
            names: NameInterner::new(),
        }
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Enables returning the comment contents. Takes effect from the next token.
    pub fn set_read_comment(&mut self, enabled: bool) {
        self.options.read_comment = enabled;
    }

    /// Enables returning the directive contents. Takes effect from the next token.
    pub fn set_read_directive(&mut self, enabled: bool) {
        self.options.read_directive = enabled;
    }

    /// Returns the position of the last consumed character.
    pub fn location(&self) -> Location {
        self.reader.location()
    }

    /// Resolves a spelling to the name the decoder uses for it.
    ///
    /// Useful for comparing token names with [Arc::ptr_eq] instead of
    /// comparing the strings.
    pub fn intern(&mut self, spelling: &str) -> Result<Arc<Name>, BadName> {
        self.names.intern(spelling)
    }

    pub fn names(&self) -> &NameInterner {
        &self.names
    }

    /// Decodes the next token from the current position.
    ///
    /// Returns `Ok(None)` when the input ends at a token boundary. The
    /// returned token is only valid until the next call, use
    /// [Token::into_owned()] to keep it. After an error the state of the
    /// decoder is unspecified.
    pub fn token(&mut self) -> Result<Option<Token<'_>>, DecodeError> {
        let result = self.next_token();
        match &result {
            Ok(Some(token)) => log::trace!(target: "xmltok::decoder", "token: {token:?}"),
            Ok(None) => log::trace!(target: "xmltok::decoder", "end of input"),
            Err(err) => log::debug!(target: "xmltok::decoder", "decode error: {err}"),
        }
        result
    }

    /// Returns an iterator which copies every remaining token.
    ///
    /// The iterator stops after the first error.
    pub fn owned_tokens(&mut self) -> OwnedTokens<'_, S> {
        OwnedTokens {
            decoder: self,
            done: false,
        }
    }

    fn next_token(&mut self) -> Result<Option<Token<'_>>, DecodeError> {
        match mem::replace(&mut self.state, State::Idle) {
            State::PendingClose(name) => return Ok(Some(Token::CloseTag(name))),
            State::StartedTag => return self.angle_start().map(Some),
            State::Idle => (),
        }
        let c = match self.read()? {
            Some(c) => c,
            None => return Ok(None),
        };
        match c {
            '<' => self.angle_start().map(Some),
            '>' => Err(self.unexpected(c)),
            _ => self.char_data(c).map(Some),
        }
    }

    fn error(&self, kind: ErrorKind) -> DecodeError {
        DecodeError::new(kind, self.reader.location())
    }

    fn unexpected(&self, c: char) -> DecodeError {
        self.error(ErrorKind::UnexpectedChar(c))
    }

    fn read(&mut self) -> Result<Option<char>, DecodeError> {
        self.reader.next().map_err(|err| self.error(ErrorKind::Io(err)))
    }

    // Like read(), but the input must not end here.
    fn next_char(&mut self) -> Result<char, DecodeError> {
        match self.read()? {
            Some(c) => Ok(c),
            None => Err(self.error(ErrorKind::UnexpectedEof)),
        }
    }

    // Returns the first non whitespace character.
    fn skip_space(&mut self) -> Result<char, DecodeError> {
        loop {
            let c = self.next_char()?;
            if !c.is_whitespace() {
                return Ok(c);
            }
        }
    }

    fn char_data(&mut self, first: char) -> Result<Token<'_>, DecodeError> {
        self.buffer.clear();
        let mut space = first.is_whitespace();
        self.buffer.push(if space { ' ' } else { first });
        while let Some(c) = self.read()? {
            match c {
                '<' => {
                    self.state = State::StartedTag;
                    break;
                }
                '>' => return Err(self.unexpected(c).within(context::ON_CHARDATA)),
                _ if c.is_whitespace() => {
                    if !space {
                        space = true;
                        self.buffer.push(' ');
                    }
                }
                _ => {
                    space = false;
                    self.buffer.push(c);
                }
            }
        }
        Ok(Token::CharData(&self.buffer))
    }

    // The '<' is consumed, next character decides the kind of the token.
    fn angle_start(&mut self) -> Result<Token<'_>, DecodeError> {
        let c = self.next_char()?;
        match c {
            '/' => self.close_tag(),
            '!' => self.markup(),
            '?' => self.proc_inst(),
            _ if c.is_ascii_alphabetic() => self.start_tag(c),
            _ => Err(self.unexpected(c)),
        }
    }

    // <foo> or <foo bar="baz" biz='x' boz> or <foo/>
    fn start_tag(&mut self, first: char) -> Result<Token<'_>, DecodeError> {
        self.attrs.reset();
        let (name, last) = self
            .read_identifier(first, false)
            .map_err(|err| err.within(context::EXPECTED_TAG_IDENTIFIER))?;
        let mut pending = match last {
            '>' => return Ok(self.emit_start_tag(name)),
            '/' => Some(last),
            _ => None,
        };

        loop {
            let mut last = match pending.take() {
                Some(c) => c,
                None => self
                    .skip_space()
                    .map_err(|err| err.within(context::EXPECTED_ATTRIBUTE_IDENTIFIER))?,
            };

            if last == '/' {
                last = self
                    .next_char()
                    .map_err(|err| err.within(context::EXPECTED_SELF_CLOSE))?;
                if last != '>' {
                    return Err(self.unexpected(last).within(context::EXPECTED_SELF_CLOSE));
                }
                self.state = State::PendingClose(Arc::clone(&name));
            }
            if last == '>' {
                return Ok(self.emit_start_tag(name));
            }
            if !last.is_ascii_alphabetic() {
                return Err(self
                    .unexpected(last)
                    .within(format_args!(" on tag <{name}>")));
            }

            let (attr_name, mut last) = self
                .read_identifier(last, true)
                .map_err(|err| err.within(format_args!(" for attribute on tag <{name}>")))?;
            if last.is_whitespace() {
                last = self.skip_space().map_err(|err| {
                    err.within(format_args!(" for attribute {attr_name} on tag <{name}>"))
                })?;
            }
            // Attributes without a value look like <foo bar> or <foo bar baz="1">
            if !(matches!(last, '=' | '>' | '/') || last.is_ascii_alphabetic()) {
                return Err(self
                    .unexpected(last)
                    .within(format_args!(" for attribute {attr_name} on tag <{name}>")));
            }
            self.attrs
                .add(Arc::clone(&attr_name))
                .map_err(|_| self.error(ErrorKind::NoMemory))?;
            if last != '=' {
                pending = Some(last);
                continue;
            }

            // Values must be quoted
            let quote = self.skip_space().map_err(|err| {
                err.within(format_args!(" after attribute {attr_name} on tag <{name}>"))
            })?;
            if quote != '"' && quote != '\'' {
                return Err(self.unexpected(quote).within(format_args!(
                    ", expected value for attribute {attr_name} on tag <{name}>"
                )));
            }
            self.read_string(quote).map_err(|err| {
                err.within(format_args!(" reading attribute {attr_name} value on tag <{name}>"))
            })?;
            self.attrs.set_value(&self.buffer);
        }
    }

    fn emit_start_tag(&mut self, name: Arc<Name>) -> Token<'_> {
        Token::StartTag(StartTag::new(name, self.attrs.get()))
    }

    // Reads into the buffer until the closing quote. There is no escaping
    // with backslashes or entities like &quot;
    fn read_string(&mut self, quote: char) -> Result<(), DecodeError> {
        self.buffer.clear();
        loop {
            let c = self.next_char()?;
            if c == quote {
                return Ok(());
            }
            self.buffer.push(c);
        }
    }

    // </foo>
    fn close_tag(&mut self) -> Result<Token<'_>, DecodeError> {
        let first = self
            .skip_space()
            .map_err(|err| err.within(context::EXPECTED_CLOSING_TAG))?;
        if !first.is_ascii_alphabetic() {
            return Err(self.unexpected(first).within(context::EXPECTED_CLOSING_TAG));
        }
        let (name, mut last) = self
            .read_identifier(first, false)
            .map_err(|err| err.within(context::EXPECTED_CLOSING_TAG))?;
        if last.is_whitespace() {
            last = self
                .skip_space()
                .map_err(|err| err.within(format_args!(" on closing tag </{name}>")))?;
        }
        if last != '>' {
            return Err(self
                .unexpected(last)
                .within(format_args!(", expected '>' for closing tag </{name}>")));
        }
        Ok(Token::CloseTag(name))
    }

    // <!-- --> or <! >
    fn markup(&mut self) -> Result<Token<'_>, DecodeError> {
        self.buffer.clear();
        let c = self.next_char()?;
        if c != '-' {
            return self.directive(c);
        }
        let c = self.next_char()?;
        if c != '-' {
            return Err(self.unexpected(c).within(context::EXPECTED_COMMENT));
        }
        self.comment()
    }

    fn comment(&mut self) -> Result<Token<'_>, DecodeError> {
        let capture = self.options.read_comment;
        // Counts all dashes, not just the ones right before '>'
        let mut dashes = 0;
        loop {
            let c = self.next_char()?;
            match c {
                '-' => dashes += 1,
                '>' if dashes >= 2 => {
                    if !capture {
                        return Ok(Token::Comment(""));
                    }
                    // strip the closing "--"
                    let end = self
                        .buffer
                        .char_indices()
                        .rev()
                        .nth(1)
                        .map_or(0, |(pos, _)| pos);
                    self.buffer.truncate(end);
                    return Ok(Token::Comment(&self.buffer));
                }
                '>' => {
                    return Err(
                        self.error(ErrorKind::ClosedTooEarly(description::COMMENT_CLOSED_EARLY))
                    );
                }
                _ => (),
            }
            if capture {
                self.buffer.push(c);
            }
        }
    }

    // <? ?>
    fn proc_inst(&mut self) -> Result<Token<'_>, DecodeError> {
        let mut question_mark = false;
        loop {
            let c = self.next_char()?;
            if c == '>' {
                if question_mark {
                    return Ok(Token::ProcInst);
                }
                return Err(self.error(ErrorKind::ClosedTooEarly(
                    description::PROC_INST_CLOSED_EARLY,
                )));
            }
            question_mark = c == '?';
        }
    }

    // <! > or <! [] > or <! {} >, the first character is already consumed
    fn directive(&mut self, first: char) -> Result<Token<'_>, DecodeError> {
        let capture = self.options.read_directive;
        let mut c = first;
        loop {
            // looping because []{}[]{}
            while c == '[' || c == '{' {
                let target = if c == '[' { ']' } else { '}' };
                if capture {
                    self.buffer.push(c);
                }
                loop {
                    c = self
                        .next_char()
                        .map_err(|err| err.within(format_args!(", expected {target:?}")))?;
                    if c == target {
                        break;
                    }
                    if capture {
                        self.buffer.push(c);
                    }
                }
            }
            if c == '>' {
                if !capture {
                    return Ok(Token::Directive(""));
                }
                return Ok(Token::Directive(&self.buffer));
            }
            if capture {
                self.buffer.push(c);
            }
            c = self.next_char()?;
        }
    }

    // Reads the name of a tag or an attribute, and returns it with the
    // character which ended it. Attribute names can also end with '='.
    fn read_identifier(
        &mut self,
        first: char,
        is_attribute: bool,
    ) -> Result<(Arc<Name>, char), DecodeError> {
        self.buffer.clear();
        self.buffer.push(first);
        let mut prev = first;
        let mut found_separator = false;
        let last = loop {
            let c = self.next_char()?;
            match c {
                NAMESPACE_SEPARATOR if !found_separator => found_separator = true,
                _ if is_identifier_char(c) => (),
                '>' => break c,
                _ if c.is_whitespace() || c == '/' || (c == '=' && is_attribute) => {
                    if !prev.is_ascii_alphabetic() {
                        return Err(self.unexpected(prev).within(context::READING_IDENTIFIER));
                    }
                    break c;
                }
                _ => return Err(self.unexpected(c).within(context::READING_IDENTIFIER)),
            }
            self.buffer.push(c);
            prev = c;
        };

        let name = self.names.intern(&self.buffer).map_err(|err| {
            self.error(ErrorKind::BadName(err))
                .within(context::READING_IDENTIFIER)
        })?;
        Ok((name, last))
    }
}

/// Iterator returned from [Decoder::owned_tokens()].
pub struct OwnedTokens<'d, S> {
    decoder: &'d mut Decoder<S>,
    done: bool,
}

impl<S: CharSource> Iterator for OwnedTokens<'_, S> {
    type Item = Result<OwnedToken, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.decoder.token() {
            Ok(Some(token)) => Some(Ok(token.into_owned())),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<S: CharSource> FusedIterator for OwnedTokens<'_, S> {}

#[cfg(test)]
mod tests;

mod nocompile;
