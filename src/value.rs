//! Contains the different types of values understood by XML-RPC.

use crate::utils::{escape_xml, format_datetime};

use base64::encode;
use iso8601::DateTime;

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};

/// The possible XML-RPC values.
///
/// Call arguments are passed as a slice of `Value`s, and the invoker hands back a single `Value`
/// decoded from the server's response.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `<i4>` or `<int>`, 32-bit signed integer.
    Int(i32),
    /// `<i8>`, 64-bit signed integer.
    ///
    /// This is an XMLRPC extension and may not be supported by all clients / servers.
    Int64(i64),
    /// `<boolean>`, 0 == `false`, 1 == `true`.
    Bool(bool),
    /// `<string>`
    String(String),
    /// `<double>`. NaN and the infinities cannot be encoded.
    Double(f64),
    /// `<dateTime.iso8601>`, an ISO 8601 formatted date/time value.
    DateTime(DateTime),
    /// `<base64>`, base64-encoded binary data.
    Base64(Vec<u8>),

    /// `<struct>`, a mapping of named values.
    Struct(BTreeMap<String, Value>),
    /// `<array>`, a list of arbitrary (heterogeneous) values.
    Array(Vec<Value>),

    /// `<nil/>`, the empty (Unit) value.
    ///
    /// This is an XMLRPC [extension][ext] and may not be supported by all clients / servers.
    ///
    /// [ext]: https://web.archive.org/web/20050911054235/http://ontosys.com/xml-rpc/extensions.php
    Nil,
}

impl Value {
    /// Formats this `Value` as an XML `<value>` element.
    pub fn write_as_xml<W: Write>(&self, fmt: &mut W) -> io::Result<()> {
        write!(fmt, "<value>")?;

        match *self {
            Value::Int(i) => {
                write!(fmt, "<i4>{}</i4>", i)?;
            }
            Value::Int64(i) => {
                write!(fmt, "<i8>{}</i8>", i)?;
            }
            Value::Bool(b) => {
                write!(fmt, "<boolean>{}</boolean>", if b { "1" } else { "0" })?;
            }
            Value::String(ref s) => {
                write!(fmt, "<string>{}</string>", escape_xml(s))?;
            }
            Value::Double(d) => {
                // XML-RPC doubles have no spelling for NaN or the infinities
                if !d.is_finite() {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("cannot encode non-finite double {}", d),
                    ));
                }
                write!(fmt, "<double>{}</double>", d)?;
            }
            Value::DateTime(ref date_time) => {
                write!(
                    fmt,
                    "<dateTime.iso8601>{}</dateTime.iso8601>",
                    format_datetime(date_time)
                )?;
            }
            Value::Base64(ref data) => {
                write!(fmt, "<base64>{}</base64>", encode(data))?;
            }
            Value::Struct(ref map) => {
                write!(fmt, "<struct>")?;
                for (name, value) in map {
                    write!(fmt, "<member><name>{}</name>", escape_xml(name))?;
                    value.write_as_xml(fmt)?;
                    write!(fmt, "</member>")?;
                }
                write!(fmt, "</struct>")?;
            }
            Value::Array(ref array) => {
                write!(fmt, "<array><data>")?;
                for value in array {
                    value.write_as_xml(fmt)?;
                }
                write!(fmt, "</data></array>")?;
            }
            Value::Nil => {
                write!(fmt, "<nil/>")?;
            }
        }

        write!(fmt, "</value>")?;
        Ok(())
    }

    /// Returns the value as an `i32` if it is an `<int>`.
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the value as an `i64` if it is an `<int>` or an `<i8>`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i64::from(i)),
            Value::Int64(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Value::String(ref s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Double(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match *self {
            Value::Array(ref array) => Some(array),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match *self {
            Value::Struct(ref map) => Some(map),
            _ => None,
        }
    }
}

/// Renders the value in a compact, human-readable notation (`[20, 8]`, `{"sum": 8}`).
impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Int64(i) => write!(f, "{}", i),
            Value::Bool(b) => write!(f, "{}", b),
            Value::String(ref s) => write!(f, "{:?}", s),
            Value::Double(d) => write!(f, "{}", d),
            Value::DateTime(ref date_time) => write!(f, "{}", format_datetime(date_time)),
            Value::Base64(ref data) => write!(f, "<base64 {}>", encode(data)),
            Value::Struct(ref map) => {
                write!(f, "{{")?;
                for (i, (name, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", name, value)?;
                }
                write!(f, "}}")
            }
            Value::Array(ref array) => {
                write!(f, "[")?;
                for (i, value) in array.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            Value::Nil => write!(f, "nil"),
        }
    }
}

impl From<i32> for Value {
    fn from(other: i32) -> Self {
        Value::Int(other)
    }
}

impl From<i64> for Value {
    fn from(other: i64) -> Self {
        Value::Int64(other)
    }
}

impl From<bool> for Value {
    fn from(other: bool) -> Self {
        Value::Bool(other)
    }
}

impl From<String> for Value {
    fn from(other: String) -> Self {
        Value::String(other)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(other: &'a str) -> Self {
        Value::String(other.to_string())
    }
}

impl From<f64> for Value {
    fn from(other: f64) -> Self {
        Value::Double(other)
    }
}

impl From<DateTime> for Value {
    fn from(other: DateTime) -> Self {
        Value::DateTime(other)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(other: Vec<T>) -> Self {
        Value::Array(other.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(other: BTreeMap<String, T>) -> Self {
        Value::Struct(other.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}
