/*
** This file is a part of xmltok (streaming XML tokenizer)
** Copyright (C) 2025 Gurer Ozen
**
** xmltok is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::io;
use std::io::Read;

use proptest::prelude::*;

use super::*;
use crate::Attr;

fn name(spelling: &str) -> Arc<Name> {
    NameInterner::new().intern(spelling).unwrap()
}

fn start(spelling: &str, attrs: &[(&str, &str)]) -> OwnedToken {
    OwnedToken::StartTag {
        name: name(spelling),
        attrs: attrs
            .iter()
            .map(|(attr, value)| Attr::new(name(attr), value))
            .collect(),
    }
}

fn close(spelling: &str) -> OwnedToken {
    OwnedToken::CloseTag(name(spelling))
}

fn text(data: &str) -> OwnedToken {
    OwnedToken::CharData(data.to_string())
}

fn decode_all<S: CharSource>(mut decoder: Decoder<S>) -> Vec<OwnedToken> {
    decoder.owned_tokens().collect::<Result<_, _>>().unwrap()
}

fn decode(input: &str) -> Vec<OwnedToken> {
    decode_all(Decoder::from_text(input))
}

fn decode_error(input: &str) -> DecodeError {
    let mut decoder = Decoder::from_text(input);
    loop {
        match decoder.token() {
            Ok(Some(_)) => continue,
            Ok(None) => panic!("no error for {:?}", input),
            Err(err) => return err,
        }
    }
}

#[test]
fn tokens() {
    let input = "\n\t<a>\n\t<foo > <!-- asd --> </bar>\n\t    <foo class=\"start\">asd\n\t\
                 <! whatever [<>][<>]{<>}[<>]{<>} >\n\t<!><? whatever ?> qwe 123 .\n\t\
                 </  lol:foo    ><yay attr=\"123\"/>\n\t";
    let expected = vec![
        text(" "),
        start("a", &[]),
        text(" "),
        start("foo", &[]),
        text(" "),
        OwnedToken::Comment(String::new()),
        text(" "),
        close("bar"),
        text(" "),
        start("foo", &[("class", "start")]),
        text("asd "),
        OwnedToken::Directive(String::new()),
        text(" "),
        OwnedToken::Directive(String::new()),
        OwnedToken::ProcInst,
        text(" qwe 123 . "),
        close("lol:foo"),
        start("yay", &[("attr", "123")]),
        close("yay"),
        text(" "),
    ];
    assert_eq!(decode(input), expected);
}

#[test]
fn end_of_input() {
    let mut decoder = Decoder::from_text("");
    assert!(decoder.token().unwrap().is_none());
    assert!(decoder.token().unwrap().is_none());

    let mut decoder = Decoder::from_text("just text");
    assert_eq!(decoder.token().unwrap(), Some(Token::CharData("just text")));
    assert!(decoder.token().unwrap().is_none());
}

#[test]
fn optional_comment() {
    let input = "<!--\n\t--- foo ---\n\t-->";
    let test_cases = [(true, "\n\t--- foo ---\n\t"), (false, "")];
    for (read_comment, want) in test_cases {
        let options = DecoderOptions::new().read_comment(read_comment);
        let mut decoder = Decoder::with_options(input.chars(), options);
        assert_eq!(decoder.token().unwrap(), Some(Token::Comment(want)));
    }
}

#[test]
fn optional_directive() {
    let input = "<!ENTITY\n\t[<bar>\n\t</bar>]\n\t>";
    let test_cases = [(true, "ENTITY\n\t[<bar>\n\t</bar>]\n\t"), (false, "")];
    for (read_directive, want) in test_cases {
        let options = DecoderOptions::new().read_directive(read_directive);
        let mut decoder = Decoder::with_options(input.chars(), options);
        assert_eq!(decoder.token().unwrap(), Some(Token::Directive(want)));
        assert!(decoder.token().unwrap().is_none());
    }
}

#[test]
fn directive_brackets() {
    let mut decoder = Decoder::from_text("<!ENTITY [<bar></bar>]>");
    decoder.set_read_directive(true);
    assert_eq!(
        decoder.token().unwrap(),
        Some(Token::Directive("ENTITY [<bar></bar>]"))
    );
    assert!(decoder.token().unwrap().is_none());

    assert_eq!(
        decode("<!ENTITY [<bar></bar>]>"),
        vec![OwnedToken::Directive(String::new())]
    );

    let mut decoder = Decoder::from_text("<!X {a>b}[c>d]{<>} end><![x]>");
    decoder.set_read_directive(true);
    assert_eq!(
        decoder.token().unwrap(),
        Some(Token::Directive("X {a>b}[c>d]{<>} end"))
    );
    assert_eq!(decoder.token().unwrap(), Some(Token::Directive("[x]")));
}

#[test]
fn doctype() {
    let mut decoder = Decoder::from_text("<!DOCTYPE html><html>");
    decoder.set_read_directive(true);
    assert_eq!(
        decoder.token().unwrap(),
        Some(Token::Directive("DOCTYPE html"))
    );
    assert_eq!(decoder.token().unwrap().unwrap().into_owned(), start("html", &[]));
}

#[test]
fn comment_closing() {
    let mut decoder = Decoder::from_text("<!---->");
    decoder.set_read_comment(true);
    assert_eq!(decoder.token().unwrap(), Some(Token::Comment("")));

    // dashes do not have to be right before the '>'
    let mut decoder = Decoder::from_text("<!-- - - >");
    decoder.set_read_comment(true);
    assert_eq!(decoder.token().unwrap(), Some(Token::Comment(" - ")));

    let mut decoder = Decoder::from_text("<!-- caf\u{e9}-->");
    decoder.set_read_comment(true);
    assert_eq!(decoder.token().unwrap(), Some(Token::Comment(" caf\u{e9}")));
}

#[test]
fn comment_option_can_change() {
    let mut decoder = Decoder::from_text("<!--a--><!--b-->");
    assert_eq!(decoder.token().unwrap(), Some(Token::Comment("")));
    decoder.set_read_comment(true);
    assert!(decoder.options().read_comment);
    assert_eq!(decoder.token().unwrap(), Some(Token::Comment("b")));
}

#[test]
fn proc_inst_is_never_captured() {
    let options = DecoderOptions::new().read_comment(true).read_directive(true);
    let mut decoder = Decoder::with_options("<?xml version='1.0'?><??>".chars(), options);
    assert_eq!(decoder.token().unwrap(), Some(Token::ProcInst));
    assert_eq!(decoder.token().unwrap(), Some(Token::ProcInst));
    assert!(decoder.token().unwrap().is_none());
}

#[test]
fn errors() {
    let test_cases = [
        ("start colon", "<:foo>", "unexpected char ':' at"),
        ("multi colon", "<f:o:o>", "unexpected char ':' reading identifier"),
        ("bad comment open", "<!- -->", "unexpected char ' ', expected '<!--'"),
        (
            "bad comment close",
            "<!-- ->",
            "comment closed too early, must end in '-->'",
        ),
        (
            "bad proc inst close",
            "<? foo >",
            "proc inst closed too early, must end in '?>'",
        ),
        (
            "early EOF at tag",
            "<asd",
            "unexpected EOF, expected tag identifier at",
        ),
        ("early EOF at comment", "<!-- asd --", "unexpected EOF at"),
        ("early EOF at angle", "text<", "unexpected EOF at"),
        ("lone close angle", "a>b", "unexpected char '>' on chardata"),
        (
            "naked value",
            "<foo bar=baz>",
            "unexpected char 'b', expected value for attribute bar on tag <foo>",
        ),
        (
            "open value",
            "<foo bar='baz>",
            "unexpected EOF reading attribute bar value on tag <foo>",
        ),
        (
            "bad attribute start",
            "<foo %>",
            "unexpected char '%' on tag <foo>",
        ),
        (
            "symbol ending identifier",
            "<foo- >",
            "unexpected char '-' reading identifier, expected tag identifier",
        ),
        (
            "bad self close",
            "<foo/ >",
            "unexpected char ' ', expected '>' for self-close tag",
        ),
        (
            "bad close tag",
            "</1>",
            "unexpected char '1', expected closing tag",
        ),
        (
            "close tag attribute",
            "</foo bar>",
            "unexpected char 'b', expected '>' for closing tag </foo>",
        ),
        ("early EOF at close tag", "</foo", "unexpected EOF"),
        ("open bracket", "<![abc>", "unexpected EOF, expected ']'"),
        ("open brace", "<!{abc>", "unexpected EOF, expected '}'"),
        ("bad angle", "< foo>", "unexpected char ' ' at"),
    ];

    for (desc, input, want) in test_cases {
        let err = decode_error(input);
        assert!(
            err.to_string().contains(want),
            "{}: '{}' want '{}'",
            desc,
            err,
            want
        );
    }
}

#[test]
fn error_kinds() {
    assert!(matches!(
        decode_error("<f:o:o>").kind(),
        ErrorKind::UnexpectedChar(':')
    ));
    assert!(matches!(
        decode_error("<foo:>").kind(),
        ErrorKind::BadName(BadName(_))
    ));
    assert!(matches!(
        decode_error("<!-->").kind(),
        ErrorKind::ClosedTooEarly(_)
    ));
    assert!(decode_error("<a b='").is_unexpected_eof());
    assert!(!decode_error(">").is_unexpected_eof());
}

#[test]
fn empty_local_name() {
    let err = decode_error("<foo:>");
    assert_eq!(
        err.to_string(),
        "invalid identifier: namespace prefix without a local name \
         reading identifier, expected tag identifier at row: 1 col: 6"
    );
    assert_eq!(err.context(), "reading identifier, expected tag identifier");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn second_separator() {
    let err = decode_error("<f:o:o>");
    assert_eq!(
        err.to_string(),
        "unexpected char ':' reading identifier, expected tag identifier at row: 1 col: 5"
    );
}

#[test]
fn error_line_number() {
    let input = "\n\t<foo>\n\t\tba>r\n\t</foo>\n\t";
    let mut decoder = Decoder::from_text(input);

    // 1. CharData
    // 2. <foo>
    // 3. error!
    for _ in 0..2 {
        decoder.token().unwrap();
    }
    let err = decoder.token().unwrap_err();
    assert_eq!(
        err.to_string(),
        "unexpected char '>' on chardata at row: 3 col: 5"
    );
    assert_eq!(err.location().row, 3);
    assert_eq!(err.location().column, 5);
    assert_eq!(err.context(), "on chardata");
}

#[test]
fn top_level_close_angle() {
    let err = decode_error(">");
    assert_eq!(err.to_string(), "unexpected char '>' at row: 1 col: 1");
    assert_eq!(err.context(), "");
}

#[test]
fn self_closing() {
    assert_eq!(decode("<foo/>"), vec![start("foo", &[]), close("foo")]);
    assert_eq!(
        decode("<foo/><bar/>x"),
        vec![
            start("foo", &[]),
            close("foo"),
            start("bar", &[]),
            close("bar"),
            text("x"),
        ]
    );
    assert_eq!(
        decode("<a b/><c d='1' />"),
        vec![
            start("a", &[("b", "")]),
            close("a"),
            start("c", &[("d", "1")]),
            close("c"),
        ]
    );
    assert_eq!(
        decode("<x:y/>"),
        vec![start("x:y", &[]), close("x:y")]
    );
}

#[test]
fn self_closing_reads_nothing() {
    let mut decoder = Decoder::from_text("<foo/>");
    decoder.token().unwrap();
    let location = decoder.location();
    assert_eq!(decoder.token().unwrap().unwrap().into_owned(), close("foo"));
    assert_eq!(decoder.location(), location);
    assert!(decoder.token().unwrap().is_none());
}

#[test]
fn whitespace_collapse() {
    assert_eq!(decode(" \n\t a   b "), vec![text(" a b ")]);
    assert_eq!(decode("\u{a0}x\u{2003} y"), vec![text(" x y")]);
    assert_eq!(
        decode("<p>  one\n\n  two  </p>"),
        vec![start("p", &[]), text(" one two "), close("p")]
    );
}

#[test]
fn no_tag_matching() {
    assert_eq!(decode("<a></b>"), vec![start("a", &[]), close("b")]);
    assert_eq!(decode("</b></b>"), vec![close("b"), close("b")]);
}

#[test]
fn namespaces() {
    let mut decoder = Decoder::from_text("<lol:foo xml:lang='en'></ lol:foo >");
    match decoder.token().unwrap() {
        Some(Token::StartTag(tag)) => {
            assert_eq!(tag.name().local(), "foo");
            assert_eq!(tag.name().space(), "lol");
            let attr = &tag.attrs()[0];
            assert_eq!(attr.name.local(), "lang");
            assert_eq!(attr.name.space(), "xml");
            assert_eq!(tag.attr("lang"), Some("en"));
        }
        other => panic!("unexpected token {:?}", other),
    }
    assert_eq!(decoder.token().unwrap().unwrap().into_owned(), close("lol:foo"));
}

#[test]
fn attributes() {
    assert_eq!(decode("<foo bar>"), vec![start("foo", &[("bar", "")])]);
    assert_eq!(
        decode("<foo bar baz=\"1\" qux>"),
        vec![start("foo", &[("bar", ""), ("baz", "1"), ("qux", "")])]
    );
    assert_eq!(
        decode("<foo a = '1'\n\tb=\"2\"c='3'>"),
        vec![start("foo", &[("a", "1"), ("b", "2"), ("c", "3")])]
    );
    assert_eq!(
        decode("<foo a='1' a='2'>"),
        vec![start("foo", &[("a", "1"), ("a", "2")])]
    );
    assert_eq!(
        decode("<a v=\"x &amp; 'y' <z>\" w='\"'>"),
        vec![start("a", &[("v", "x &amp; 'y' <z>"), ("w", "\"")])]
    );
    assert_eq!(
        decode("<data-set x_y='' a-b='c'>"),
        vec![start("data-set", &[("x_y", ""), ("a-b", "c")])]
    );
}

#[test]
fn single_letter_names() {
    assert_eq!(
        decode("<a b c='d' ></ a >"),
        vec![start("a", &[("b", ""), ("c", "d")]), close("a")]
    );
}

#[test]
fn attributes_are_not_carried_over() {
    assert_eq!(
        decode("<a x='1'><b><c y='2'/>"),
        vec![
            start("a", &[("x", "1")]),
            start("b", &[]),
            start("c", &[("y", "2")]),
            close("c"),
        ]
    );
}

#[test]
fn many_attributes() {
    let mut input = String::from("<big");
    let mut expected = Vec::new();
    for i in 0..100 {
        input.push_str(&format!(" a{}='{}'", "x".repeat(i % 7 + 1), i));
        expected.push((format!("a{}", "x".repeat(i % 7 + 1)), i.to_string()));
    }
    input.push_str("/>");
    let tokens = decode(&input);
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        OwnedToken::StartTag { attrs, .. } => {
            assert_eq!(attrs.len(), 100);
            for (attr, (attr_name, value)) in attrs.iter().zip(expected.iter()) {
                assert_eq!(attr.name.local(), attr_name);
                assert_eq!(&attr.value, value);
            }
        }
        other => panic!("unexpected token {:?}", other),
    }
}

#[test]
fn names_are_interned() {
    let mut decoder = Decoder::from_text("<foo a='1'><foo a='2'></foo>");
    let first = match decoder.token().unwrap() {
        Some(Token::StartTag(tag)) => (Arc::clone(tag.name()), Arc::clone(&tag.attrs()[0].name)),
        other => panic!("unexpected token {:?}", other),
    };
    let second = match decoder.token().unwrap() {
        Some(Token::StartTag(tag)) => (Arc::clone(tag.name()), Arc::clone(&tag.attrs()[0].name)),
        other => panic!("unexpected token {:?}", other),
    };
    assert!(Arc::ptr_eq(&first.0, &second.0));
    assert!(Arc::ptr_eq(&first.1, &second.1));

    let closing = decoder.token().unwrap().unwrap().into_owned();
    assert_eq!(closing, close("foo"));
    if let OwnedToken::CloseTag(closing) = closing {
        assert!(Arc::ptr_eq(&closing, &first.0));
    }

    let foo = decoder.intern("foo").unwrap();
    assert!(Arc::ptr_eq(&foo, &first.0));
    assert_eq!(decoder.names().len(), 2);
}

#[test]
fn attribute_arena_reuse() {
    let mut decoder = Decoder::from_text("<a x='1' y='2'><b z='3'>");
    let first = decoder.token().unwrap().unwrap().into_owned();
    let second = decoder.token().unwrap().unwrap().into_owned();
    assert_eq!(first, start("a", &[("x", "1"), ("y", "2")]));
    assert_eq!(second, start("b", &[("z", "3")]));
}

#[test]
fn copy_independence() {
    let input = "<a k='v'>one<!--c--><b/>two<!d></a>";
    let options = DecoderOptions::new().read_comment(true).read_directive(true);
    let mut decoder = Decoder::with_options(input.chars(), options);
    let mut copies = Vec::new();
    while let Some(token) = decoder.token().unwrap() {
        copies.push(token.into_owned());
    }

    let mut decoder = Decoder::with_options(input.chars(), options);
    for copy in &copies {
        let token = decoder.token().unwrap().unwrap();
        assert_eq!(token, copy.as_token());
    }
    assert!(decoder.token().unwrap().is_none());
    assert_eq!(copies[2], OwnedToken::Comment("c".to_string()));
    assert_eq!(copies[6], OwnedToken::Directive("d".to_string()));
}

#[test]
fn owned_tokens_stop_after_error() {
    let mut decoder = Decoder::from_text("<a>b>c");
    let mut tokens = decoder.owned_tokens();
    assert_eq!(tokens.next().unwrap().unwrap(), start("a", &[]));
    assert!(tokens.next().unwrap().is_err());
    assert!(tokens.next().is_none());
    assert!(tokens.next().is_none());
}

#[test]
fn byte_reader() {
    let input = "<p title='\u{e7}ay'>\u{11f}\u{fc}\u{15f}  \u{1f600}</p>";
    let decoder = Decoder::new(input.as_bytes());
    assert_eq!(
        decode_all(decoder),
        vec![
            start("p", &[("title", "\u{e7}ay")]),
            text("\u{11f}\u{fc}\u{15f} \u{1f600}"),
            close("p"),
        ]
    );
}

#[test]
fn invalid_utf8() {
    let mut decoder = Decoder::new(&b"<a>\xff</a>"[..]);
    decoder.token().unwrap();
    let err = decoder.token().unwrap_err();
    match err.kind() {
        ErrorKind::Io(err) => assert_eq!(err.kind(), io::ErrorKind::InvalidData),
        other => panic!("unexpected error kind {:?}", other),
    }
}

struct FailingReader;

impl io::Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("broken pipe"))
    }
}

#[test]
fn read_errors_propagate() {
    let mut decoder = Decoder::new(FailingReader);
    let err = decoder.token().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Io(_)));
    assert!(err.to_string().starts_with("read error: broken pipe at"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn read_errors_inside_chardata() {
    let source = "text".as_bytes().chain(FailingReader);
    let mut decoder = Decoder::new(source);
    let err = decoder.token().unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::Io(_)));
    assert_eq!(err.location().column, 4);
}

fn collapse(s: &str) -> String {
    let mut out = String::new();
    let mut space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !space {
                out.push(' ');
            }
            space = true;
        } else {
            out.push(c);
            space = false;
        }
    }
    out
}

proptest! {
    #[test]
    fn chardata_whitespace_runs(input in "[a-z0-9 \t\r\n.,]{1,64}") {
        let mut decoder = Decoder::from_text(&input);
        let expected = collapse(&input);
        prop_assert_eq!(decoder.token().unwrap(), Some(Token::CharData(expected.as_str())));
        prop_assert!(decoder.token().unwrap().is_none());
    }

    #[test]
    fn copies_survive_later_tokens(
        parts in prop::collection::vec(
            prop::sample::select(vec![
                "<a>", "</a>", "<b x='1'>", "<c y=\"two\" z/>", "text", "  ",
                "<!--note-->", "<?pi?>", "<!DOCTYPE x [<!ENTITY e 'v'>]>", "<n:s/>",
            ]),
            0..24,
        )
    ) {
        let input = parts.concat();
        let options = DecoderOptions::new().read_comment(true).read_directive(true);

        let mut decoder = Decoder::with_options(input.chars(), options);
        let mut copies = Vec::new();
        let mut snapshots = Vec::new();
        while let Some(token) = decoder.token().unwrap() {
            snapshots.push(format!("{:?}", token));
            copies.push(token.into_owned());
        }

        for (copy, snapshot) in copies.iter().zip(snapshots.iter()) {
            prop_assert_eq!(&format!("{:?}", copy.as_token()), snapshot);
        }
    }
}
