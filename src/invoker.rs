//! The remote call invoker.

use crate::codec::{Codec, XmlCodec};
use crate::endpoint::{Credentials, Endpoint};
use crate::error::{Error, ParseError, Result};
use crate::parser::Response;
use crate::transport::{Post, Reply, Transport};
use crate::{Request, Value};

use log::{debug, trace, warn};

use std::io::Read;

/// Performs calls through a [`Transport`], encoding and decoding them with a [`Codec`].
///
/// An `Invoker` holds no per-call state, so one instance can serve any number of calls, including
/// calls made concurrently from several threads.
#[derive(Clone, Debug)]
pub struct Invoker<T, C = XmlCodec> {
    transport: T,
    codec: C,
}

impl<T> Invoker<T> {
    /// Creates an invoker that speaks plain XML-RPC over `transport`.
    pub fn new(transport: T) -> Self {
        Invoker::with_codec(transport, XmlCodec)
    }
}

#[cfg(feature = "http")]
impl Invoker<crate::transport::http::HttpTransport> {
    /// Creates an invoker backed by a fresh reqwest client.
    pub fn http() -> Result<Self> {
        let transport = crate::transport::http::HttpTransport::new().map_err(Error::Transport)?;
        Ok(Invoker::new(transport))
    }

    /// Like [`Invoker::http`], but accepts any server certificate.
    ///
    /// Meant for test servers with self-signed certificates.
    pub fn http_insecure() -> Result<Self> {
        let transport =
            crate::transport::http::HttpTransport::insecure().map_err(Error::Transport)?;
        Ok(Invoker::new(transport))
    }
}

impl<T, C: Codec> Invoker<T, C> {
    pub fn with_codec(transport: T, codec: C) -> Self {
        Invoker { transport, codec }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Encodes `request` and assembles the URL and headers for `endpoint`.
    pub(crate) fn prepare(
        &self,
        endpoint: &Endpoint,
        request: &Request,
    ) -> Result<(String, Vec<(&'static str, String)>, Vec<u8>)> {
        let body = self.codec.encode_call(request).map_err(Error::Encode)?;
        let headers = endpoint.headers(self.codec.media_type().as_ref());
        let url = endpoint.url();

        debug!(
            "calling {} at {} with {} argument(s){}",
            request.method(),
            url,
            request.args().len(),
            if endpoint.credentials().is_some() { " (authenticated)" } else { "" }
        );
        trace!("request body: {}", String::from_utf8_lossy(&body));

        Ok((url, headers, body))
    }

    /// Decodes a successful response body and picks the returned value.
    pub(crate) fn finish(&self, body: &[u8]) -> Result<Value> {
        trace!("response body: {}", String::from_utf8_lossy(body));
        first_value(self.codec.decode_response(body)?)
    }
}

impl<T: Transport, C: Codec> Invoker<T, C> {
    /// Performs `request` against `endpoint` and returns the first value of the response.
    ///
    /// # Errors
    ///
    /// * [`Error::Transport`] if the exchange itself fails.
    /// * [`Error::ProtocolFault`] if the server answers with a status of 400 or above. The
    ///   response body is not read in that case.
    /// * [`Error::Decode`] if the body is not a valid response envelope.
    /// * [`Error::Fault`] if the server sent a `<fault>` response.
    pub fn call(&self, endpoint: &Endpoint, request: &Request) -> Result<Value> {
        let (url, headers, body) = self.prepare(endpoint, request)?;

        let reply = self
            .transport
            .transmit(Post {
                url: &url,
                headers: &headers,
                body,
                timeout: endpoint.timeout(),
            })
            .map_err(Error::Transport)?;

        let mut stream = check_status(reply)?;

        let mut body = Vec::new();
        stream
            .read_to_end(&mut body)
            .map_err(|e| Error::Transport(e.into()))?;

        self.finish(&body)
    }

    /// Calls `method` with positional `args`.
    pub fn invoke(&self, endpoint: &Endpoint, method: &str, args: &[Value]) -> Result<Value> {
        self.call(endpoint, &Request::with_args(method, args))
    }
}

/// Turns an HTTP error status into [`Error::ProtocolFault`], handing back the unread body
/// otherwise.
pub(crate) fn check_status<S>(reply: Reply<S>) -> Result<S> {
    debug!("server answered {} {}", reply.status, reply.reason);

    if reply.is_error() {
        warn!("call rejected with HTTP {} ({})", reply.status, reply.reason);
        return Err(Error::ProtocolFault {
            status: reply.status,
            reason: reply.reason,
        });
    }

    Ok(reply.body)
}

/// Only the first returned value is handed to the caller; the rest are dropped.
fn first_value(response: Response) -> Result<Value> {
    let values = response?;
    values
        .into_iter()
        .next()
        .ok_or_else(|| Error::Decode(ParseError::NoValues))
}

/// Calls `method` on `server:port` over HTTPS and returns the first value of the response.
///
/// When `credentials` is `Some`, an `Authorization: Basic ...` header is sent. A new client and a
/// new connection are used for every call.
///
/// ```no_run
/// use xmlrpcall::{call, Credentials, Value};
///
/// let reversed = call(
///     "localhost",
///     1638,
///     Some(Credentials::new("nabla", "nabla")),
///     "authenticated_example.reverse",
///     &[Value::from(8), Value::from(20)],
/// )?;
/// println!("{}", reversed);
/// # Ok::<(), xmlrpcall::Error>(())
/// ```
#[cfg(feature = "http")]
pub fn call(
    server: &str,
    port: u16,
    credentials: Option<Credentials>,
    method: &str,
    args: &[Value],
) -> Result<Value> {
    let endpoint = Endpoint::new(server, port).with_optional_credentials(credentials);
    Invoker::http()?.invoke(&endpoint, method, args)
}
