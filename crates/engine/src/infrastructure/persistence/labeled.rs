//! Line-oriented text implementation of the labeled field ports.
//!
//! ```text
//! powercount 2
//! powername "Boot"
//! type "levchk"
//! division #12
//! ```
//!
//! Strings are double-quoted with `\"`, `\\` and `\n` escapes; dbrefs use
//! `#-1` for none. Blank lines and leading indentation are ignored.

use std::io::{BufRead, Write};

use divscope_domain::{format_optional_dbref, parse_optional_dbref, Dbref};

use super::PersistenceError;
use crate::infrastructure::ports::{LabeledReader, LabeledWriter};

struct Field {
    label: String,
    value: String,
    line: usize,
}

pub struct TextLabeledReader<R> {
    input: R,
    line: usize,
    peeked: Option<Field>,
}

impl<R: BufRead> TextLabeledReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line: 0,
            peeked: None,
        }
    }

    fn next_field(&mut self) -> Result<Option<Field>, PersistenceError> {
        if let Some(field) = self.peeked.take() {
            return Ok(Some(field));
        }
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.input.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let trimmed = buf.trim();
            if trimmed.is_empty() {
                continue;
            }
            let (label, value) = trimmed
                .split_once(char::is_whitespace)
                .map(|(l, v)| (l, v.trim_start()))
                .unwrap_or((trimmed, ""));
            return Ok(Some(Field {
                label: label.to_string(),
                value: value.to_string(),
                line: self.line,
            }));
        }
    }

    fn expect(&mut self, label: &str) -> Result<Field, PersistenceError> {
        match self.next_field()? {
            Some(field) if field.label == label => Ok(field),
            Some(field) => Err(PersistenceError::UnexpectedLabel {
                expected: label.to_string(),
                found: field.label,
                line: field.line,
            }),
            None => Err(PersistenceError::UnexpectedEof {
                expected: label.to_string(),
                line: self.line,
            }),
        }
    }
}

impl<R: BufRead> LabeledReader for TextLabeledReader<R> {
    fn peek_label(&mut self) -> Result<Option<String>, PersistenceError> {
        if self.peeked.is_none() {
            self.peeked = self.next_field()?;
        }
        Ok(self.peeked.as_ref().map(|f| f.label.clone()))
    }

    fn read_number(&mut self, label: &str) -> Result<i64, PersistenceError> {
        let field = self.expect(label)?;
        field
            .value
            .parse()
            .map_err(|e| PersistenceError::malformed(label, field.line, e))
    }

    fn read_string(&mut self, label: &str) -> Result<String, PersistenceError> {
        let field = self.expect(label)?;
        unquote(&field.value).map_err(|e| PersistenceError::malformed(label, field.line, e))
    }

    fn read_dbref(&mut self, label: &str) -> Result<Option<Dbref>, PersistenceError> {
        let field = self.expect(label)?;
        parse_optional_dbref(&field.value)
            .map_err(|e| PersistenceError::malformed(label, field.line, e))
    }
}

pub struct TextLabeledWriter<W> {
    out: W,
}

impl<W: Write> TextLabeledWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn flush(&mut self) -> Result<(), PersistenceError> {
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> LabeledWriter for TextLabeledWriter<W> {
    fn write_number(&mut self, label: &str, value: i64) -> Result<(), PersistenceError> {
        writeln!(self.out, "{} {}", label, value)?;
        Ok(())
    }

    fn write_string(&mut self, label: &str, value: &str) -> Result<(), PersistenceError> {
        writeln!(self.out, "{} {}", label, quote(value))?;
        Ok(())
    }

    fn write_dbref(&mut self, label: &str, value: Option<Dbref>) -> Result<(), PersistenceError> {
        writeln!(self.out, "{} {}", label, format_optional_dbref(value))?;
        Ok(())
    }
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn unquote(raw: &str) -> Result<String, String> {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| format!("expected a quoted string, got {}", raw))?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => return Err("dangling escape at end of string".to_string()),
        }
    }
    Ok(out)
}
