/*
** This file is a part of xmltok (streaming XML tokenizer)
** Copyright (C) 2025 Gurer Ozen
**
** xmltok is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

/// # Must not compile tests
///
/// Returned token cannot be used after the next token call:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use xmltok::Decoder;
/// let mut decoder = Decoder::from_text("<a x='1'><b y='2'>");
/// let first = decoder.token()?;
/// let _second = decoder.token()?;
/// println!("{:?}", first);
/// # Ok(())
/// # }
/// ```
///
/// Attributes of a start tag cannot outlive the next start tag:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use xmltok::{Decoder, Token};
/// let mut decoder = Decoder::from_text("<a x='1'><b y='2'>");
/// let attrs = match decoder.token()? {
///     Some(Token::StartTag(tag)) => tag.attrs(),
///     _ => return Ok(()),
/// };
/// decoder.token()?;
/// println!("{:?}", attrs);
/// # Ok(())
/// # }
/// ```
///
/// Returned token cannot outlive the decoder:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use xmltok::{Decoder, Token};
/// let token: Option<Token>;
/// {
///     let mut decoder = Decoder::from_text("text");
///     token = decoder.token()?;
/// }
/// println!("{:?}", token);
/// # Ok(())
/// # }
/// ```
///
/// Copies can be kept:
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use xmltok::Decoder;
/// let mut decoder = Decoder::from_text("<a x='1'><b y='2'>");
/// let first = decoder.token()?.map(|token| token.into_owned());
/// let _second = decoder.token()?;
/// println!("{:?}", first);
/// # Ok(())
/// # }
/// ```
#[cfg(doctest)]
struct MustNotCompileTests;
