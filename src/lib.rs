/*
** This file is a part of xmltok (streaming XML tokenizer)
** Copyright (C) 2025 Gurer Ozen
**
** xmltok is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! Streaming pull tokenizer for a practical subset of XML.
//!
//! The [Decoder] returns one [Token] at a time and reuses the same
//! buffers for every token, tag and attribute names are interned. This
//! saves most of the allocations and copying of tree building parsers
//! when the document is turned into application structures by hand.
//!
//! Decoding a document into structs:
//! ```
//! use xmltok::{Decoder, Token};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Msg {
//!     id: String,
//!     desc: String,
//!     contents: String,
//! }
//!
//! let data = r#"
//!     <msg id="123" desc="flying mammal">
//!         Bat
//!     </msg>
//!     <msg id="456" desc="baseball item">
//!         Bat
//!     </msg>
//! "#;
//!
//! let mut msgs = Vec::new();
//! let mut msg = Msg::default();
//! let mut decoder = Decoder::new(data.as_bytes());
//! // Decoding completes when None is returned.
//! while let Some(token) = decoder.token()? {
//!     match token {
//!         Token::StartTag(tag) => {
//!             assert_eq!(tag.name().local(), "msg");
//!             for attr in tag.attrs() {
//!                 match attr.name.local() {
//!                     "id" => msg.id = attr.value.clone(),
//!                     "desc" => msg.desc = attr.value.clone(),
//!                     _ => (),
//!                 }
//!             }
//!         }
//!         Token::CloseTag(name) => {
//!             assert_eq!(name.local(), "msg");
//!             msgs.push(std::mem::take(&mut msg));
//!         }
//!         Token::CharData(data) => msg.contents = data.to_string(),
//!         other => panic!("unexpected token: {:?}", other),
//!     }
//! }
//!
//! assert_eq!(msgs.len(), 2);
//! assert_eq!(msgs[0].id, "123");
//! assert_eq!(msgs[0].desc, "flying mammal");
//! assert_eq!(msgs[0].contents, " Bat ");
//! assert_eq!(msgs[1].desc, "baseball item");
//! # Ok::<(), xmltok::DecodeError>(())
//! ```

mod arena;
mod decoder;
mod names;
mod reader;
mod token;

pub use arena::Attr;
pub use arena::AttrArena;
pub use arena::NoMemory;

pub use names::BadName;
pub use names::NAMESPACE_SEPARATOR;
pub use names::Name;
pub use names::NameInterner;

pub use reader::CharSource;
pub use reader::Location;
pub use reader::RuneReader;
pub use reader::Utf8Source;

pub use token::OwnedToken;
pub use token::StartTag;
pub use token::Token;

pub use decoder::DecodeError;
pub use decoder::Decoder;
pub use decoder::DecoderOptions;
pub use decoder::ErrorKind;
pub use decoder::OwnedTokens;
