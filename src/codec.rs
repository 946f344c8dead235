//! The envelope codec: turns a `Request` into a request body and a response body into values.

use crate::parser::{self, ParseResult, Response};
use crate::Request;

use mime::Mime;

use std::io::{self, Read};

/// Serialization capability used by the [`Invoker`](crate::Invoker).
///
/// The default implementation is [`XmlCodec`]. Tests and unusual servers can substitute their own.
pub trait Codec {
    /// The media type sent in the `Content-Type` header.
    fn media_type(&self) -> Mime;

    /// Serializes the method name and the ordered argument list into a call envelope.
    fn encode_call(&self, request: &Request) -> io::Result<Vec<u8>>;

    /// Decodes a complete response envelope.
    fn decode_response<R: Read>(&self, body: R) -> ParseResult<Response>;
}

/// Plain XML-RPC: `<methodCall>` out, `<methodResponse>` in, sent as `text/xml`.
#[derive(Clone, Copy, Debug, Default)]
pub struct XmlCodec;

impl Codec for XmlCodec {
    fn media_type(&self) -> Mime {
        mime::TEXT_XML
    }

    fn encode_call(&self, request: &Request) -> io::Result<Vec<u8>> {
        let mut body = Vec::new();
        request.write_as_xml(&mut body)?;
        Ok(body)
    }

    fn decode_response<R: Read>(&self, body: R) -> ParseResult<Response> {
        parser::parse_response(body)
    }
}
