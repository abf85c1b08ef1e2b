// src/repository/parsers/plist.rs

//! XML property list parser
//!
//! Repodata stores its package index as an XML plist. This parser reads the
//! full value grammar (`dict`, `array`, `string`, `integer`, `real`, `true`,
//! `false`, `data`, `date`) so unknown keys never trip it up, even though the
//! checker only looks at a handful of string lists.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;

/// A parsed property list value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i128),
    Real(f64),
    Bool(bool),
    /// Base64 payload, kept as written
    Data(String),
    /// ISO 8601 timestamp, kept as written
    Date(String),
    Array(Vec<Value>),
    Dict(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Dict(map) => Some(map),
            _ => None,
        }
    }

    /// Short name of the value's type for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Bool(_) => "bool",
            Value::Data(_) => "data",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Dict(_) => "dict",
        }
    }
}

/// Parse an XML plist document into its root value
pub fn parse(xml: &str) -> Result<Value> {
    let mut parser = PlistReader::new(xml);

    match parser.next()? {
        Token::Start(tag) if tag == "plist" => {}
        other => return Err(parser.unexpected(&other, "<plist>")),
    }

    let token = parser.next()?;
    let root = parser.value(token)?;

    match parser.next()? {
        Token::End(tag) if tag == "plist" => Ok(root),
        other => Err(parser.unexpected(&other, "</plist>")),
    }
}

/// Owned view of the XML events the grammar cares about
#[derive(Debug)]
enum Token {
    Start(String),
    Empty(String),
    End(String),
    Text(String),
    Eof,
}

struct PlistReader<'a> {
    reader: Reader<&'a [u8]>,
    buf: Vec<u8>,
}

impl<'a> PlistReader<'a> {
    fn new(xml: &'a str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    fn next(&mut self) -> Result<Token> {
        loop {
            self.buf.clear();
            let token = match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) => Token::Start(tag_name(e.name().as_ref())),
                Ok(Event::Empty(e)) => Token::Empty(tag_name(e.name().as_ref())),
                Ok(Event::End(e)) => Token::End(tag_name(e.name().as_ref())),
                Ok(Event::Text(e)) => Token::Text(
                    e.unescape()
                        .map_err(|e| Error::ParseError(format!("Invalid plist text: {}", e)))?
                        .into_owned(),
                ),
                Ok(Event::CData(e)) => {
                    Token::Text(String::from_utf8_lossy(&e.into_inner()).into_owned())
                }
                Ok(Event::Eof) => Token::Eof,
                // Declaration, doctype, comments, processing instructions
                Ok(_) => continue,
                Err(e) => {
                    return Err(Error::ParseError(format!(
                        "Malformed plist at byte {}: {}",
                        self.reader.buffer_position(),
                        e
                    )))
                }
            };
            return Ok(token);
        }
    }

    fn value(&mut self, token: Token) -> Result<Value> {
        match token {
            Token::Start(tag) => match tag.as_str() {
                "dict" => self.dict(),
                "array" => self.array(),
                "string" => Ok(Value::String(self.text("string")?)),
                "data" => Ok(Value::Data(self.text("data")?)),
                "date" => Ok(Value::Date(self.text("date")?)),
                "integer" => parse_integer(&self.text("integer")?),
                "real" => {
                    let text = self.text("real")?;
                    text.trim()
                        .parse()
                        .map(Value::Real)
                        .map_err(|_| Error::ParseError(format!("Invalid plist real: {}", text)))
                }
                "true" | "false" => {
                    self.text(&tag)?;
                    Ok(Value::Bool(tag == "true"))
                }
                _ => Err(Error::ParseError(format!("Unknown plist element <{}>", tag))),
            },
            Token::Empty(tag) => match tag.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "string" => Ok(Value::String(String::new())),
                "data" => Ok(Value::Data(String::new())),
                "array" => Ok(Value::Array(Vec::new())),
                "dict" => Ok(Value::Dict(BTreeMap::new())),
                _ => Err(Error::ParseError(format!("Unknown plist element <{}/>", tag))),
            },
            other => Err(self.unexpected(&other, "a plist value")),
        }
    }

    fn dict(&mut self) -> Result<Value> {
        let mut map = BTreeMap::new();
        loop {
            match self.next()? {
                Token::End(tag) if tag == "dict" => return Ok(Value::Dict(map)),
                Token::Start(tag) if tag == "key" => {
                    let key = self.text("key")?;
                    let token = self.next()?;
                    let value = self.value(token)?;
                    map.insert(key, value);
                }
                other => return Err(self.unexpected(&other, "<key> or </dict>")),
            }
        }
    }

    fn array(&mut self) -> Result<Value> {
        let mut items = Vec::new();
        loop {
            match self.next()? {
                Token::End(tag) if tag == "array" => return Ok(Value::Array(items)),
                token => items.push(self.value(token)?),
            }
        }
    }

    /// Collect character data up to the closing tag
    fn text(&mut self, tag: &str) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.next()? {
                Token::Text(text) => out.push_str(&text),
                Token::End(end) if end == tag => return Ok(out),
                other => return Err(self.unexpected(&other, &format!("</{}>", tag))),
            }
        }
    }

    fn unexpected(&self, token: &Token, expected: &str) -> Error {
        Error::ParseError(format!(
            "Unexpected {:?} at byte {}, expected {}",
            token,
            self.reader.buffer_position(),
            expected
        ))
    }
}

fn tag_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

fn parse_integer(text: &str) -> Result<Value> {
    let trimmed = text.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => i128::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };
    parsed
        .map(Value::Integer)
        .map_err(|_| Error::ParseError(format!("Invalid plist integer: {}", text)))
}
