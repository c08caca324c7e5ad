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

use std::cmp;
use std::sync::Arc;

use crate::Name;

pub use error::NoMemory;

pub const DEFAULT_ATTR_CAPACITY: usize = 30;

/// A tag attribute like `<foo bar="baz">`.
///
/// This will store an attribute with name "bar" and value "baz". The value
/// is an empty string for attributes without a value like `<foo bar>`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Attr {
    pub name: Arc<Name>,
    pub value: String,
}

impl Attr {
    pub fn new(name: Arc<Name>, value: &str) -> Self {
        Attr {
            name,
            value: value.to_string(),
        }
    }
}

/// A reusable buffer for the attributes of the current start tag.
///
/// The arena is rewound for every start tag without releasing its
/// storage. Attribute slots keep their value strings, so a document
/// with similar tags stops allocating after the first few tags.
///
#[derive(Debug)]
pub struct AttrArena {
    attrs: Vec<Attr>,
    pos: usize,
}

impl AttrArena {
    pub fn new() -> AttrArena {
        Self::with_capacity(DEFAULT_ATTR_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> AttrArena {
        AttrArena {
            attrs: Vec::with_capacity(capacity),
            pos: 0,
        }
    }

    /// Rewinds the arena, the storage is kept for the next tag.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    /// Appends an attribute with an empty value.
    pub fn add(&mut self, name: Arc<Name>) -> Result<(), NoMemory> {
        if self.pos < self.attrs.len() {
            let attr = &mut self.attrs[self.pos];
            attr.name = name;
            attr.value.clear();
        } else {
            if self.attrs.len() == self.attrs.capacity() {
                self.grow()?;
            }
            self.attrs.push(Attr {
                name,
                value: String::new(),
            });
        }
        self.pos += 1;
        Ok(())
    }

    /// Sets the value of the last added attribute.
    pub fn set_value(&mut self, value: &str) {
        if self.pos > 0 {
            let attr = &mut self.attrs[self.pos - 1];
            attr.value.clear();
            attr.value.push_str(value);
        }
    }

    /// Returns the attributes added since the last reset and rewinds the arena.
    ///
    /// Returns `None` if there are no attributes.
    pub fn get(&mut self) -> Option<&[Attr]> {
        let len = self.pos;
        self.pos = 0;
        if len == 0 {
            None
        } else {
            Some(&self.attrs[..len])
        }
    }

    pub fn len(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }

    pub fn capacity(&self) -> usize {
        self.attrs.capacity()
    }

    // Grows by 2/3 instead of doubling, most tags have a handful of attributes.
    fn grow(&mut self) -> Result<(), NoMemory> {
        let extra = cmp::max(self.attrs.capacity() * 2 / 3, 1);
        self.attrs.try_reserve_exact(extra)?;
        Ok(())
    }
}

impl Default for AttrArena {
    fn default() -> Self {
        Self::new()
    }
}


/// # Must not compile tests
///
/// Returned attributes cannot be used after the arena is refilled:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use std::sync::Arc;
/// use xmltok::{AttrArena, Name};
/// let mut arena = AttrArena::new();
/// arena.add(Arc::new(Name::new(None, "first")))?;
/// let attrs = arena.get();
/// arena.add(Arc::new(Name::new(None, "second")))?;
/// println!("{:?}", attrs);
/// # Ok(())
/// # }
/// ```
#[cfg(doctest)]
struct MustNotCompileTests;
