/*
** This file is a part of xmltok (streaming XML tokenizer)
** Copyright (C) 2025 Gurer Ozen
**
** xmltok is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::stdin;
use std::process::ExitCode;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use rustc_hash::FxHashSet;

use xmltok::DecodeError;
use xmltok::Decoder;
use xmltok::DecoderOptions;
use xmltok::Location;
use xmltok::Name;
use xmltok::Token;
use xmltok::Utf8Source;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

fn print_version() {
    println!("xmltok-lint (xmltok) v{}", VERSION);
}

fn print_usage() {
    println!(
        concat!(
            "Usage: xmltok-lint [OPTIONS] [FILE.xml...]\n",
            "This tool tokenizes XML documents and checks the tag nesting.\n",
            "Options:\n",
            "  -s, --stat           Overall statistics\n",
            "  -c, --count          Tag counts\n",
            "  -d, --dump           Print every token\n",
            "  -b, --buffer <SIZE>  File read buffer size in bytes (default: {})\n",
            "      --comments       Read the contents of comments\n",
            "      --directives     Read the contents of directives\n",
            "  -h, --help           Display this help message and exit\n",
            "  -v, --version        Display the version and exit\n",
            "Set RUST_LOG=xmltok=trace to see the decoder at work."
        ),
        DEFAULT_BUFFER_SIZE
    );
}

#[derive(Default)]
struct Stats {
    level: usize,
    max_depth: usize,
    nr_tags: usize,
    nr_cdata_size: usize,
    nr_comments: usize,
    nr_directives: usize,
    nr_proc_insts: usize,
}

struct Handler {
    do_stats: bool,
    do_tag_count: bool,
    do_dump: bool,
    stats: Stats,
    tag_stack: Vec<Arc<Name>>,
    tag_map: FxHashMap<Arc<Name>, usize>,
}

impl Handler {
    fn new(do_stats: bool, do_tag_count: bool, do_dump: bool) -> Self {
        Handler {
            do_stats,
            do_tag_count,
            do_dump,
            stats: Stats::default(),
            tag_stack: Vec::new(),
            tag_map: FxHashMap::default(),
        }
    }

    fn handle_token(&mut self, token: &Token<'_>) -> Result<(), String> {
        if self.do_dump {
            println!("{:?}", token);
        }
        match token {
            Token::StartTag(tag) => {
                self.stats.nr_tags += 1;
                self.stats.level += 1;
                self.stats.max_depth = self.stats.max_depth.max(self.stats.level);
                if self.do_tag_count {
                    *self.tag_map.entry(Arc::clone(tag.name())).or_insert(0) += 1;
                }
                let mut seen = FxHashSet::default();
                for attr in tag.attrs() {
                    if !seen.insert(&attr.name) {
                        return Err(format!("duplicate attribute: '{}'", attr.name));
                    }
                }
                self.tag_stack.push(Arc::clone(tag.name()));
            }
            Token::CloseTag(name) => {
                let Some(start_name) = self.tag_stack.pop() else {
                    return Err(format!("end tag without a start tag: '{}'", name));
                };
                self.stats.level -= 1;
                // interned names share the pointer, the comparison is a fallback
                if !Arc::ptr_eq(&start_name, name) && start_name != *name {
                    return Err(format!(
                        "end tag mismatch: expected '{}', got '{}'",
                        start_name, name
                    ));
                }
            }
            Token::CharData(data) => self.stats.nr_cdata_size += data.len(),
            Token::Comment(_) => self.stats.nr_comments += 1,
            Token::Directive(_) => self.stats.nr_directives += 1,
            Token::ProcInst => self.stats.nr_proc_insts += 1,
        }
        Ok(())
    }

    fn finish(&self) -> Result<(), String> {
        match self.tag_stack.last() {
            Some(name) => Err(format!("unclosed tag: '{}'", name)),
            None => Ok(()),
        }
    }

    fn report(&mut self) {
        if self.do_stats {
            let stats = &self.stats;
            println!("Tag pairs: {}, max depth: {}", stats.nr_tags, stats.max_depth);
            println!(
                "Comments: {}, directives: {}, processing instructions: {}",
                stats.nr_comments, stats.nr_directives, stats.nr_proc_insts
            );
            println!(
                "Total size of character data: {} bytes.",
                stats.nr_cdata_size
            );
        }
        if self.do_tag_count {
            println!("Tag counts:");
            let mut counts: Vec<_> = self.tag_map.iter().collect();
            counts.sort_by(|a, b| a.0.cmp(b.0));
            for (tag, count) in counts {
                println!("  {}: {}", tag, count);
            }
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.stats = Stats::default();
        self.tag_stack.clear();
        self.tag_map.clear();
    }
}

enum LinterError {
    IoError(std::io::Error),
    DecodeError(DecodeError),
    WellFormedness(String, Location),
}

impl From<std::io::Error> for LinterError {
    fn from(err: std::io::Error) -> Self {
        LinterError::IoError(err)
    }
}

impl From<DecodeError> for LinterError {
    fn from(err: DecodeError) -> Self {
        LinterError::DecodeError(err)
    }
}

struct Linter {
    handler: Handler,
    options: DecoderOptions,
    buffer_size: usize,
}

impl Linter {
    fn new(handler: Handler, options: DecoderOptions, buffer_size: usize) -> Self {
        Linter {
            handler,
            options,
            buffer_size,
        }
    }

    fn parse_file(&mut self, file: &str, is_stream: bool) -> Result<(), LinterError> {
        let f: Box<dyn Read> = if is_stream {
            Box::new(stdin())
        } else {
            Box::new(File::open(file)?)
        };
        let source = Utf8Source::new(BufReader::with_capacity(self.buffer_size, f));
        let mut decoder = Decoder::with_options(source, self.options);
        while let Some(token) = decoder.token()? {
            if let Err(msg) = self.handler.handle_token(&token) {
                return Err(LinterError::WellFormedness(msg, decoder.location()));
            }
        }
        self.handler
            .finish()
            .map_err(|msg| LinterError::WellFormedness(msg, decoder.location()))
    }

    fn lint_file(&mut self, file: &str, is_stream: bool) -> bool {
        self.handler.reset();
        match self.parse_file(file, is_stream) {
            Ok(()) => {
                self.handler.report();
                true
            }
            Err(LinterError::IoError(e)) => {
                eprintln!("Error reading file '{}': {}", file, e);
                false
            }
            Err(LinterError::DecodeError(e)) => {
                eprintln!("Syntax error in file '{}': {}", file, e);
                false
            }
            Err(LinterError::WellFormedness(msg, location)) => {
                eprintln!(
                    "Well-formedness error in file '{}' at line {} column {}: {}",
                    file, location.row, location.column, msg
                );
                false
            }
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args();

    let mut files = Vec::new();
    let mut do_stats = false;
    let mut do_tag_count = false;
    let mut do_dump = false;
    let mut options = DecoderOptions::new();
    let mut buffer_size = DEFAULT_BUFFER_SIZE;

    // Skip the first argument (program name)
    args.next();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-s" | "--stat" => {
                do_stats = true;
            }
            "-c" | "--count" => {
                do_tag_count = true;
            }
            "-cs" | "-sc" => {
                do_stats = true;
                do_tag_count = true;
            }
            "-d" | "--dump" => {
                do_dump = true;
            }
            "--comments" => {
                options.read_comment = true;
            }
            "--directives" => {
                options.read_directive = true;
            }
            "-b" | "--buffer" => {
                let Some(size) = args.next() else {
                    eprintln!("Missing buffer size");
                    return ExitCode::FAILURE;
                };
                match size.parse::<usize>() {
                    Ok(size) if size > 0 => buffer_size = size,
                    _ => {
                        eprintln!("Invalid buffer size");
                        return ExitCode::FAILURE;
                    }
                }
            }
            "-h" | "--help" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            "-v" | "--version" => {
                print_version();
                return ExitCode::SUCCESS;
            }
            _ => {
                files.push(arg);
            }
        }
    }

    let handler = Handler::new(do_stats, do_tag_count, do_dump);
    let mut linter = Linter::new(handler, options, buffer_size);
    if files.is_empty() {
        if !linter.lint_file("stdin", true) {
            return ExitCode::FAILURE;
        }
    } else {
        for file in files {
            if !linter.lint_file(&file, false) {
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
