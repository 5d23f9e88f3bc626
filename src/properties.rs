//! Support for the flat `.properties` key/value format.
//!
//! This is the on-disk strategy for bundle loading: one file per locale
//! level, named after the qualified bundle name. The dialect follows the
//! classic runtime format: `#`/`!` comments, backslash line continuations,
//! `=`/`:`/whitespace key terminators, and `\t \n \r \f \\ \uXXXX` escapes.

use std::fs::File;
use std::io::{BufRead, BufWriter, Cursor, Read, Write};
use std::path::Path;

use indoc::indoc;

use crate::{error::Error, types::LevelData};

/// File extension appended to a path-mapped qualified name when probing the
/// flat-file strategy. Load-bearing for interoperability with existing
/// resource layouts.
pub const FILE_EXTENSION: &str = ".properties";

/// Represents one parsed `.properties` file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    /// All key-value pairs in file order.
    pub pairs: Vec<Pair>,
}

/// A single key-value pair in a `.properties` file.
///
/// Keys and values are stored unescaped; escaping is applied on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub key: String,
    pub value: String,
}

impl Format {
    /// Parse from a raw byte stream with BOM detection (UTF-8 passthrough,
    /// UTF-16 decoded). This is the entry point bundle resolution uses on
    /// streams handed out by a resource opener.
    pub fn from_encoded_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(reader);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::from_str(&decoded)
    }

    /// Parse a legacy latin-1 encoded stream. Historical `.properties`
    /// files are ISO-8859-1; a BOM still takes precedence when present.
    pub fn from_latin1_reader<R: Read>(reader: R) -> Result<Self, Error> {
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .encoding(Some(encoding_rs::WINDOWS_1252))
            .bom_override(true)
            .build(reader);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        Self::from_str(&decoded)
    }
}

impl Format {
    /// Parse from a buffered reader of already-decoded text.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let natural_lines = reader.lines().collect::<Result<Vec<_>, _>>()?;

        let mut pairs = Vec::new();
        let mut iter = natural_lines.iter();

        while let Some(line) = iter.next() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            // Join continuation lines: an odd number of trailing backslashes
            // means the logical line continues on the next natural line.
            let mut logical = trimmed.to_string();
            while ends_with_continuation(&logical) {
                logical.pop();
                match iter.next() {
                    Some(next) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }

            let (raw_key, raw_value) = split_key_value(&logical);
            pairs.push(Pair {
                key: unescape(raw_key)?,
                value: unescape(raw_value)?,
            });
        }

        Ok(Format { pairs })
    }

    /// Parse from a string.
    pub fn from_str(s: &str) -> Result<Self, Error> {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from already-decoded bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Parse a file, decoding a BOM if one is present.
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path).map_err(Error::Io)?;
        Self::from_encoded_reader(file)
    }

    /// Write to any writer (file, memory, etc.), prefixed with a
    /// generated-file header comment.
    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::new();

        content.push_str(indoc! {"
            # This file is automatically generated by resbundle.
            # Do not edit it manually, as your changes will be overwritten.

        "});

        for pair in &self.pairs {
            content.push_str(&pair.to_string());
            content.push('\n');
        }

        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }

    /// Write to a file path.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        self.to_writer(BufWriter::new(file))
    }
}

impl From<Format> for LevelData {
    fn from(value: Format) -> Self {
        value.pairs.into_iter().map(|p| (p.key, p.value)).collect()
    }
}

impl From<LevelData> for Format {
    fn from(value: LevelData) -> Self {
        Format {
            pairs: value
                .iter()
                .map(|(k, v)| Pair {
                    key: k.to_string(),
                    value: v.to_string(),
                })
                .collect(),
        }
    }
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Splits a logical line at the first unescaped `=`, `:`, or whitespace.
/// Whitespace around an explicit separator is consumed; the value keeps its
/// trailing whitespace.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                return (&line[..i], line[i + 1..].trim_start());
            }
            c if c.is_whitespace() => {
                let key = &line[..i];
                let rest = line[i..].trim_start();
                // "key value" and "key = value" both terminate the key at
                // the first whitespace run.
                return match rest.strip_prefix(['=', ':']) {
                    Some(after) => (key, after.trim_start()),
                    None => (key, rest),
                };
            }
            _ => {}
        }
    }
    (line, "")
}

/// Resolves `\t \n \r \f \\ \uXXXX` escapes. An unknown escape drops the
/// backslash; a malformed `\u` sequence is a parse error.
fn unescape(s: &str) -> Result<String, Error> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 || !hex.chars().all(|h| h.is_ascii_hexdigit()) {
                    return Err(Error::Parse(format!("invalid unicode escape `\\u{}`", hex)));
                }
                let code = u32::from_str_radix(&hex, 16)
                    .map_err(|_| Error::Parse(format!("invalid unicode escape `\\u{}`", hex)))?;
                match char::from_u32(code) {
                    Some(ch) => out.push(ch),
                    None => {
                        return Err(Error::Parse(format!(
                            "unicode escape `\\u{}` is not a valid scalar value",
                            hex
                        )));
                    }
                }
            }
            Some(other) => out.push(other),
            None => break,
        }
    }
    Ok(out)
}

fn escape(s: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{000C}' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' if is_key => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || i == 0 => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", escape(&self.key, true), escape(&self.value, false))
    }
}
