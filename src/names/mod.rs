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

use std::fmt::Display;
use std::sync::Arc;

use rustc_hash::FxHashMap;

pub use error::BadName;
use error::description;

/// Character separating the namespace prefix from the local name.
pub const NAMESPACE_SEPARATOR: char = ':';

/// An identifier from a tag or an attribute, like `foo` and `bar` in `<foo bar="baz">`.
///
/// Names are interned by the [Decoder](crate::Decoder), every occurrence of the same
/// spelling during one decoding session resolves to the same shared instance. This
/// makes [Arc::ptr_eq] a valid fast path for comparisons, while the regular value
/// equality works as well.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Name {
    space: Option<Box<str>>,
    local: Box<str>,
}

impl Name {
    pub fn new(space: Option<&str>, local: &str) -> Self {
        Name {
            space: space.map(Box::from),
            local: Box::from(local),
        }
    }

    /// Returns the identifier name without the XML namespace.
    ///
    /// For example `<a:b>` generates the local name "b" with namespace "a".
    /// This method will return "b".
    pub fn local(&self) -> &str {
        &self.local
    }

    /// Returns the XML namespace prefix of the identifier.
    ///
    /// For example `<a:b>` generates the local name "b" with namespace "a".
    /// This method will return "a". Names without a prefix return an empty string.
    pub fn space(&self) -> &str {
        self.space.as_deref().unwrap_or("")
    }

    pub fn prefix(&self) -> Option<&str> {
        self.space.as_deref()
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.space {
            Some(space) => write!(f, "{}{}{}", space, NAMESPACE_SEPARATOR, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

fn split(spelling: &str) -> Result<Name, BadName> {
    if spelling.is_empty() {
        return Err(BadName(description::EMPTY));
    }
    match spelling.split_once(NAMESPACE_SEPARATOR) {
        None => Ok(Name::new(None, spelling)),
        Some((space, local)) => {
            if local.contains(NAMESPACE_SEPARATOR) {
                return Err(BadName(description::MULTIPLE_SEPARATORS));
            }
            if space.is_empty() {
                return Err(BadName(description::EMPTY_PREFIX));
            }
            if local.is_empty() {
                return Err(BadName(description::EMPTY_LOCAL));
            }
            Ok(Name::new(Some(space), local))
        }
    }
}

/// Cache of the canonical [Name] for each identifier spelling.
///
/// The key is the raw spelling including the namespace separator, so a
/// lookup hit never has to split the identifier again.
#[derive(Debug, Default)]
pub struct NameInterner {
    names: FxHashMap<Box<str>, Arc<Name>>,
}

impl NameInterner {
    pub fn new() -> Self {
        NameInterner {
            names: FxHashMap::default(),
        }
    }

    /// Returns the shared name for the spelling, creating it on the first use.
    pub fn intern(&mut self, spelling: &str) -> Result<Arc<Name>, BadName> {
        if let Some(name) = self.names.get(spelling) {
            return Ok(Arc::clone(name));
        }
        let name = Arc::new(split(spelling)?);
        log::trace!(target: "xmltok::names", "new name: {name}");
        self.names.insert(Box::from(spelling), Arc::clone(&name));
        Ok(name)
    }

    pub fn get(&self, spelling: &str) -> Option<&Arc<Name>> {
        self.names.get(spelling)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
