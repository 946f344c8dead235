use crate::error::BoxError;

use std::io::Read;
use std::time::Duration;

/// One HTTP `POST`, fully prepared by the [`Invoker`](crate::Invoker).
#[derive(Debug)]
pub struct Post<'a> {
    /// Absolute URL, always ending in the root path.
    pub url: &'a str,
    /// Request headers, including `Content-Type` and the optional `Authorization`.
    pub headers: &'a [(&'static str, String)],
    /// The encoded call envelope.
    pub body: Vec<u8>,
    /// Upper bound for the whole exchange, if the endpoint sets one.
    pub timeout: Option<Duration>,
}

/// What came back for a [`Post`]: the status line and a body that has not been read yet.
#[derive(Debug)]
pub struct Reply<S> {
    pub status: u16,
    pub reason: String,
    pub body: S,
}

impl<S> Reply<S> {
    /// `true` for 4xx and 5xx responses.
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Request and response transport abstraction.
///
/// The `Transport` trait sends a prepared [`Post`] to a server and returns the status line along
/// with the response body as a stream. The body is only read when the status indicates success.
///
/// The most commonly used transport is HTTPS through reqwest: If the `http` feature is enabled (it
/// is by default), [`http::HttpTransport`] implements this trait.
///
/// You can implement this trait for your own types if you want to customize how requests are sent,
/// or to answer calls from memory in tests.
pub trait Transport {
    /// The response stream returned by `transmit`.
    type Stream: Read;

    /// Sends the request and returns the server's reply.
    ///
    /// # Errors
    ///
    /// If the exchange fails (connection refused, DNS failure, timeout, ...), the error should be
    /// returned as a boxed error. The invoker surfaces it as
    /// [`Error::Transport`](crate::Error::Transport).
    fn transmit(&self, post: Post<'_>) -> Result<Reply<Self::Stream>, BoxError>;
}

impl<'t, T: Transport + ?Sized> Transport for &'t T {
    type Stream = T::Stream;

    fn transmit(&self, post: Post<'_>) -> Result<Reply<Self::Stream>, BoxError> {
        (**self).transmit(post)
    }
}

/// Provides the reqwest-backed transport.
///
/// This module will be disabled if the `http` feature is not enabled.
#[cfg(feature = "http")]
pub mod http {
    use super::{Post, Reply, Transport};
    use crate::error::BoxError;

    use log::{trace, warn};
    use reqwest::blocking::{Client, RequestBuilder, Response};
    use reqwest::redirect::Policy;
    use reqwest::StatusCode;

    /// Sends calls with a blocking reqwest `Client`.
    ///
    /// Idle connections are not pooled, so every call opens its own connection. Redirects are not
    /// followed: a `3xx` reply is handed to the invoker like any other.
    #[derive(Clone, Debug)]
    pub struct HttpTransport {
        client: Client,
        accept_invalid_certs: bool,
    }

    impl HttpTransport {
        /// Builds a transport that verifies server certificates.
        pub fn new() -> Result<Self, BoxError> {
            HttpTransport::with_cert_verification(true)
        }

        /// Builds a transport that accepts any server certificate, including self-signed and
        /// expired ones.
        ///
        /// Only use this against test servers you control.
        pub fn insecure() -> Result<Self, BoxError> {
            HttpTransport::with_cert_verification(false)
        }

        pub fn with_cert_verification(verify: bool) -> Result<Self, BoxError> {
            let builder = Client::builder()
                .pool_max_idle_per_host(0)
                .redirect(Policy::none());
            if !verify {
                warn!("server certificates will not be verified");
            }
            let client = accept_invalid_certs(builder, !verify)?.build()?;
            Ok(HttpTransport {
                client,
                accept_invalid_certs: !verify,
            })
        }

        /// Uses an existing client, e.g. one configured with extra root certificates.
        ///
        /// The client should be built with `redirect(Policy::none())`, otherwise a redirect turns
        /// the call into a request to another URL.
        pub fn with_client(client: Client) -> Self {
            HttpTransport {
                client,
                accept_invalid_certs: false,
            }
        }

        /// `true` if server certificates are not verified.
        pub fn accepts_invalid_certs(&self) -> bool {
            self.accept_invalid_certs
        }
    }

    #[cfg(feature = "tls")]
    fn accept_invalid_certs(
        builder: reqwest::blocking::ClientBuilder,
        accept: bool,
    ) -> Result<reqwest::blocking::ClientBuilder, BoxError> {
        Ok(builder.danger_accept_invalid_certs(accept))
    }

    #[cfg(not(feature = "tls"))]
    fn accept_invalid_certs(
        builder: reqwest::blocking::ClientBuilder,
        accept: bool,
    ) -> Result<reqwest::blocking::ClientBuilder, BoxError> {
        if accept {
            return Err("certificate options need the `tls` feature".into());
        }
        Ok(builder)
    }

    /// The reason phrase the server sent, or the canonical one for `status` if the server used
    /// the standard phrase.
    ///
    /// hyper only keeps the phrase from the status line when it differs from the canonical one.
    pub fn reason_phrase(status: StatusCode, extensions: &hyper::http::Extensions) -> String {
        match extensions.get::<hyper::ext::ReasonPhrase>() {
            Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
            None => status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    /// Appends the prepared headers to a `RequestBuilder`.
    pub fn build_headers(mut builder: RequestBuilder, post: &Post<'_>) -> RequestBuilder {
        // NB: `Host` and `Content-Length` are added by reqwest.
        for (name, value) in post.headers {
            builder = builder.header(*name, value.as_str());
        }
        builder
    }

    impl Transport for HttpTransport {
        type Stream = Response;

        fn transmit(&self, post: Post<'_>) -> Result<Reply<Self::Stream>, BoxError> {
            let mut builder = build_headers(self.client.post(post.url), &post);
            if let Some(timeout) = post.timeout {
                builder = builder.timeout(timeout);
            }

            let response = builder.body(post.body).send()?;
            let status = response.status();
            trace!("{} answered {}", post.url, status);

            Ok(Reply {
                status: status.as_u16(),
                reason: reason_phrase(status, response.extensions()),
                body: response,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses() {
        let reply = |status| Reply {
            status,
            reason: String::new(),
            body: (),
        };

        assert!(!reply(200).is_error());
        assert!(!reply(399).is_error());
        assert!(reply(400).is_error());
        assert!(reply(503).is_error());
    }

    #[cfg(feature = "http")]
    #[test]
    fn reason_phrase_prefers_the_servers() {
        use self::http::reason_phrase;
        use reqwest::StatusCode;

        let mut extensions = hyper::http::Extensions::new();
        assert_eq!(reason_phrase(StatusCode::NOT_FOUND, &extensions), "Not Found");
        assert_eq!(reason_phrase(StatusCode::from_u16(499).unwrap(), &extensions), "");

        extensions.insert(hyper::ext::ReasonPhrase::from_static(b"No Such Endpoint"));
        assert_eq!(reason_phrase(StatusCode::NOT_FOUND, &extensions), "No Such Endpoint");
    }

    #[cfg(all(feature = "http", feature = "tls"))]
    #[test]
    fn certificate_verification_is_opt_out() {
        assert!(!self::http::HttpTransport::new().unwrap().accepts_invalid_certs());
        assert!(self::http::HttpTransport::insecure().unwrap().accepts_invalid_certs());
    }
}
