//! XML-RPC response parser.

use crate::error::ParseError;
use crate::{Fault, Value};

use iso8601::datetime;
use xml::common::Position;
use xml::name::OwnedName;
use xml::reader::{EventReader, XmlEvent};
use xml::ParserConfig;

use std::collections::BTreeMap;
use std::io::Read;

pub type ParseResult<T> = Result<T, ParseError>;

/// A decoded `<methodResponse>`: either the returned values in order, or the server's `<fault>`.
pub type Response = Result<Vec<Value>, Fault>;

pub struct Parser<R: Read> {
    reader: EventReader<R>,
}

impl<R: Read> Parser<R> {
    pub fn new(reader: R) -> Self {
        Parser {
            reader: EventReader::new_with_config(
                reader,
                ParserConfig::new().cdata_to_characters(true),
            ),
        }
    }

    /// Reads an `XmlEvent` from a reader, disposing events we want to ignore.
    ///
    /// When encountering a new element, returns an `Err` if it has any attributes.
    fn pull_event(&mut self) -> ParseResult<XmlEvent> {
        loop {
            let event = self.reader.next()?;
            match event {
                XmlEvent::StartDocument { .. }
                | XmlEvent::Comment(_)
                | XmlEvent::Whitespace(_)
                | XmlEvent::ProcessingInstruction { .. } => continue, // skip these
                XmlEvent::StartElement {
                    ref attributes,
                    ref name,
                    ..
                } => {
                    if !attributes.is_empty() {
                        return self.expected(format!("tag <{}> without attributes", name));
                    }
                }
                _ => {}
            }

            return Ok(event);
        }
    }

    /// Expects an opening tag like `<tag>` without attributes (and a local name without namespaces).
    fn expect_open(&mut self, tag: &str) -> ParseResult<()> {
        match self.pull_event()? {
            XmlEvent::StartElement { ref name, .. } if name == &OwnedName::local(tag) => Ok(()),
            _ => self.expected(format!("<{}>", tag)),
        }
    }

    /// Expects a closing tag like `</tag>` with a local name without namespaces.
    fn expect_close(&mut self, tag: &str) -> ParseResult<()> {
        match self.pull_event()? {
            XmlEvent::EndElement { ref name } if name == &OwnedName::local(tag) => Ok(()),
            _ => self.expected(format!("</{}>", tag)),
        }
    }

    /// Builds and returns an `Err(UnexpectedXml)`.
    fn expected<T, E: ToString>(&self, expected: E) -> ParseResult<T> {
        Err(ParseError::UnexpectedXml {
            expected: expected.to_string(),
            position: self.reader.position(),
        })
    }

    fn invalid_value(&self, for_type: &'static str, found: String) -> ParseError {
        ParseError::InvalidValue {
            for_type,
            found,
            position: self.reader.position(),
        }
    }

    pub fn parse_response(&mut self) -> ParseResult<Response> {
        // <methodResponse>
        self.expect_open("methodResponse")?;

        // <fault> / <params>
        let response = match self.pull_event()? {
            XmlEvent::StartElement { ref name, .. } if name == &OwnedName::local("fault") => {
                let value = self.parse_value()?;
                let fault = match Fault::from_value(&value) {
                    Some(fault) => fault,
                    None => {
                        return self.expected(
                            "<fault> struct with int faultCode and string faultString",
                        )
                    }
                };
                self.expect_close("fault")?;
                Err(fault)
            }
            XmlEvent::StartElement { ref name, .. } if name == &OwnedName::local("params") => {
                let mut values = Vec::new();
                loop {
                    match self.pull_event()? {
                        XmlEvent::EndElement { ref name } if name == &OwnedName::local("params") => {
                            break
                        }
                        XmlEvent::StartElement { ref name, .. }
                            if name == &OwnedName::local("param") =>
                        {
                            values.push(self.parse_value()?);
                            self.expect_close("param")?;
                        }
                        _ => return self.expected("<param> or </params>"),
                    }
                }

                if values.is_empty() {
                    return Err(ParseError::NoValues);
                }
                Ok(values)
            }
            _ => return self.expected("<fault> or <params>"),
        };

        // </methodResponse>
        self.expect_close("methodResponse")?;

        Ok(response)
    }

    pub fn parse_value(&mut self) -> ParseResult<Value> {
        // <value>
        self.expect_open("value")?;

        self.parse_value_body()
    }

    /// Parses the contents of a `<value>` element whose opening tag was already consumed, up to
    /// and including `</value>`.
    ///
    /// An empty `<value></value>` is an empty string.
    fn parse_value_body(&mut self) -> ParseResult<Value> {
        let value = match self.pull_event()? {
            XmlEvent::StartElement { ref name, .. } => {
                if name == &OwnedName::local("struct") {
                    self.parse_struct()?
                } else if name == &OwnedName::local("array") {
                    self.parse_array()?
                } else if name == &OwnedName::local("nil") {
                    self.expect_close("nil")?;
                    Value::Nil
                } else if name == &OwnedName::local("string") {
                    Value::String(self.parse_text("string")?)
                } else if name == &OwnedName::local("base64") {
                    let data = self.parse_text("base64")?;
                    let decoded = base64::decode(data.trim())
                        .map_err(|_| self.invalid_value("base64", data.clone()))?;
                    Value::Base64(decoded)
                } else {
                    self.parse_scalar(name)?
                }
            }
            XmlEvent::Characters(string) => Value::String(string),
            XmlEvent::EndElement { ref name } if name == &OwnedName::local("value") => {
                return Ok(Value::String(String::new()));
            }
            _ => return self.expected("type tag or characters"),
        };

        // </value>
        self.expect_close("value")?;

        Ok(value)
    }

    /// Reads the (possibly empty) character content of `<tag>` including its close tag.
    fn parse_text(&mut self, tag: &str) -> ParseResult<String> {
        match self.pull_event()? {
            XmlEvent::Characters(string) => {
                self.expect_close(tag)?;
                Ok(string)
            }
            XmlEvent::EndElement { ref name } if name == &OwnedName::local(tag) => {
                Ok(String::new())
            }
            _ => self.expected(format!("characters or </{}>", tag)),
        }
    }

    fn parse_scalar(&mut self, name: &OwnedName) -> ParseResult<Value> {
        // All other types expect raw characters...
        let data = match self.pull_event()? {
            XmlEvent::Characters(string) => string,
            _ => return self.expected("characters"),
        };

        // ...and a corresponding close tag
        self.expect_close(&name.local_name)?;

        let value = match &*name.local_name {
            "i4" | "int" => Value::Int(
                data.parse::<i32>()
                    .map_err(|_| self.invalid_value("integer", data.clone()))?,
            ),
            "i8" => Value::Int64(
                data.parse::<i64>()
                    .map_err(|_| self.invalid_value("i8", data.clone()))?,
            ),
            "boolean" => match &*data {
                "0" => Value::Bool(false),
                "1" => Value::Bool(true),
                _ => return Err(self.invalid_value("boolean", data)),
            },
            "double" => Value::Double(
                data.parse::<f64>()
                    .map_err(|_| self.invalid_value("double", data.clone()))?,
            ),
            "dateTime.iso8601" => Value::DateTime(
                datetime(&data).map_err(|_| self.invalid_value("dateTime.iso8601", data.clone()))?,
            ),
            _ => return self.expected("valid type tag or characters"),
        };

        Ok(value)
    }

    fn parse_struct(&mut self) -> ParseResult<Value> {
        let mut members = BTreeMap::new();
        loop {
            match self.pull_event()? {
                XmlEvent::EndElement { ref name } if name == &OwnedName::local("struct") => break,
                XmlEvent::StartElement { ref name, .. } if name == &OwnedName::local("member") => {
                    // <name>NAME</name>
                    self.expect_open("name")?;
                    let name = self.parse_text("name")?;

                    let value = self.parse_value()?;

                    // </member>
                    self.expect_close("member")?;

                    members.insert(name, value);
                }
                _ => return self.expected("</struct> or <member>"),
            }
        }

        Ok(Value::Struct(members))
    }

    fn parse_array(&mut self) -> ParseResult<Value> {
        let mut elements: Vec<Value> = Vec::new();
        self.expect_open("data")?;
        loop {
            match self.pull_event()? {
                XmlEvent::EndElement { ref name } if name == &OwnedName::local("data") => break,
                XmlEvent::StartElement { ref name, .. } if name == &OwnedName::local("value") => {
                    elements.push(self.parse_value_body()?);
                }
                _ => return self.expected("</data> or <value>"),
            }
        }
        self.expect_close("array")?;

        Ok(Value::Array(elements))
    }
}

/// Parses a response from an XML reader.
pub fn parse_response<R: Read>(reader: R) -> ParseResult<Response> {
    Parser::new(reader).parse_response()
}
