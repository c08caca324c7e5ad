/*
** This file is a part of xmltok (streaming XML tokenizer)
** Copyright (C) 2025 Gurer Ozen
**
** xmltok is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::sync::Arc;

use crate::Attr;
use crate::Name;

/// An opening tag like `<foo>` or `<foo bar="baz">`.
///
/// Attributes are kept in the order they were written. Repeated attribute
/// names are not detected.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StartTag<'a> {
    name: Arc<Name>,
    attrs: Option<&'a [Attr]>,
}

impl<'a> StartTag<'a> {
    pub(crate) fn new(name: Arc<Name>, attrs: Option<&'a [Attr]>) -> Self {
        StartTag { name, attrs }
    }

    pub fn name(&self) -> &Arc<Name> {
        &self.name
    }

    /// Returns the attributes of the tag, an empty slice if there are none.
    pub fn attrs(&self) -> &'a [Attr] {
        self.attrs.unwrap_or_default()
    }

    pub fn has_attrs(&self) -> bool {
        self.attrs.is_some()
    }

    /// Returns the value of the first attribute with the given local name.
    pub fn attr(&self, local: &str) -> Option<&'a str> {
        self.attrs()
            .iter()
            .find(|attr| attr.name.local() == local)
            .map(|attr| attr.value.as_str())
    }
}

/// An XML token returned from the [Decoder](crate::Decoder).
///
/// ```text
/// StartTag:  <foo> or <foo/>
/// CloseTag:  </foo>, also generated after <foo/>
/// CharData:  any text outside of angle brackets
/// Comment:   <!-- foo -->
/// ProcInst:  <? foo ?>
/// Directive: <! foo >
/// ```
///
/// Tokens borrow the buffers of the decoder and are only valid until the
/// next [token()](crate::Decoder::token) call. Use
/// [into_owned()](Token::into_owned) for the unlikely case when a token
/// must be stored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token<'a> {
    StartTag(StartTag<'a>),

    /// A closing tag, either written or implied by a self closing tag.
    CloseTag(Arc<Name>),

    /// Text content with every whitespace run replaced by a single space.
    CharData(&'a str),

    /// Contents of a comment, or an empty string unless
    /// [read_comment](crate::DecoderOptions::read_comment) is enabled.
    Comment(&'a str),

    /// A processing instruction. The contents are skipped.
    ProcInst,

    /// Contents of a directive, or an empty string unless
    /// [read_directive](crate::DecoderOptions::read_directive) is enabled.
    ///
    /// Directives are not processed, this is the raw text within `<! ... >`.
    Directive(&'a str),
}

impl Token<'_> {
    /// Copies the token into a new instance which does not borrow the decoder.
    pub fn into_owned(self) -> OwnedToken {
        match self {
            Token::StartTag(tag) => OwnedToken::StartTag {
                attrs: tag.attrs().to_vec(),
                name: tag.name,
            },
            Token::CloseTag(name) => OwnedToken::CloseTag(name),
            Token::CharData(data) => OwnedToken::CharData(data.to_string()),
            Token::Comment(data) => OwnedToken::Comment(data.to_string()),
            Token::ProcInst => OwnedToken::ProcInst,
            Token::Directive(data) => OwnedToken::Directive(data.to_string()),
        }
    }

    /// Returns the tag name for start and close tags.
    pub fn name(&self) -> Option<&Arc<Name>> {
        match self {
            Token::StartTag(tag) => Some(tag.name()),
            Token::CloseTag(name) => Some(name),
            _ => None,
        }
    }
}

/// An independent copy of a [Token].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OwnedToken {
    StartTag { name: Arc<Name>, attrs: Vec<Attr> },
    CloseTag(Arc<Name>),
    CharData(String),
    Comment(String),
    ProcInst,
    Directive(String),
}

impl OwnedToken {
    pub fn as_token(&self) -> Token<'_> {
        match self {
            OwnedToken::StartTag { name, attrs } => {
                let attrs = if attrs.is_empty() {
                    None
                } else {
                    Some(attrs.as_slice())
                };
                Token::StartTag(StartTag::new(Arc::clone(name), attrs))
            }
            OwnedToken::CloseTag(name) => Token::CloseTag(Arc::clone(name)),
            OwnedToken::CharData(data) => Token::CharData(data),
            OwnedToken::Comment(data) => Token::Comment(data),
            OwnedToken::ProcInst => Token::ProcInst,
            OwnedToken::Directive(data) => Token::Directive(data),
        }
    }
}

impl From<Token<'_>> for OwnedToken {
    fn from(token: Token<'_>) -> Self {
        token.into_owned()
    }
}
