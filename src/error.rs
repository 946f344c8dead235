//! Defines error types used by this library.

use crate::Fault;

use xml::common::TextPosition;
use xml::reader::Error as XmlError;

use std::error::Error as StdError;
use std::io;

/// Boxed error returned by [`Transport`](crate::Transport) implementations.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// A call could not be completed.
///
/// Every failure is terminal for the call it belongs to. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The connection could not be established, or broke while sending the request or receiving
    /// the response.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The server answered with an HTTP status of 400 or above. The body was not parsed.
    #[error("HTTP error {status} ({reason})")]
    ProtocolFault {
        /// The numeric HTTP status code.
        status: u16,
        /// The reason phrase that goes with `status`.
        reason: String,
    },

    /// The response body is not a well-formed `<methodResponse>`.
    #[error("decode error: {0}")]
    Decode(#[from] ParseError),

    /// The server sent a `<fault>` response.
    #[error("server fault: {0}")]
    Fault(#[from] Fault),

    /// The request body could not be written.
    #[error("could not encode request: {0}")]
    Encode(#[source] io::Error),
}

impl Error {
    /// Returns the `Fault` if the server answered with a `<fault>` response.
    pub fn fault(&self) -> Option<&Fault> {
        match *self {
            Error::Fault(ref fault) => Some(fault),
            _ => None,
        }
    }

    /// Returns the HTTP status if the call was rejected at the HTTP level.
    pub fn status(&self) -> Option<u16> {
        match *self {
            Error::ProtocolFault { status, .. } => Some(status),
            _ => None,
        }
    }
}

/// Result alias for calls made by this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Describes possible errors that can occur when parsing a response.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Error while parsing (malformed?) XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] XmlError),

    /// Could not parse the given CDATA as XML-RPC value.
    ///
    /// For example, `<value><int>AAA</int></value>` describes an invalid value.
    #[error("invalid value for type '{for_type}' at {position}: {found}")]
    InvalidValue {
        /// The type for which an invalid value was supplied (eg. `int` or `dateTime.iso8601`).
        for_type: &'static str,
        /// The value we encountered, as a string.
        found: String,
        /// The position of the invalid value inside the XML document.
        position: TextPosition,
    },

    /// Found an unexpected tag, attribute, etc.
    #[error("unexpected XML at {position} (expected {expected})")]
    UnexpectedXml {
        /// A short description of the kind of data that was expected.
        expected: String,
        /// The position of the unexpected data inside the XML document.
        position: TextPosition,
    },

    /// The response contained a `<params>` element without any `<param>`.
    #[error("response contains no values")]
    NoValues,
}
