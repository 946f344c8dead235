//! Asynchronous calls, enabled with the `async` feature.

use crate::codec::Codec;
use crate::endpoint::Endpoint;
use crate::error::{BoxError, Error, Result};
use crate::invoker::{check_status, Invoker};
use crate::transport::http::reason_phrase;
use crate::transport::{Post, Reply};
use crate::{Request, Value};

use futures::future::{BoxFuture, FutureExt};
use reqwest::redirect::Policy;

/// Builds an async client with the same settings as
/// [`HttpTransport`](crate::http::HttpTransport): no idle connections and no redirects.
///
/// Clients built elsewhere should also use `redirect(Policy::none())`, otherwise a redirect turns
/// the call into a request to another URL.
pub fn client(accept_invalid_certs: bool) -> Result<reqwest::Client, BoxError> {
    let builder = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .redirect(Policy::none());

    #[cfg(feature = "tls")]
    let builder = builder.danger_accept_invalid_certs(accept_invalid_certs);
    #[cfg(not(feature = "tls"))]
    if accept_invalid_certs {
        return Err("certificate options need the `tls` feature".into());
    }

    Ok(builder.build()?)
}

impl Invoker<reqwest::Client> {
    /// Creates an invoker backed by an async reqwest client that verifies certificates.
    pub fn http_async() -> Result<Self> {
        Ok(Invoker::new(client(false).map_err(Error::Transport)?))
    }
}

/// The asynchronous counterpart of [`Transport`](crate::Transport).
///
/// The body is fetched in a separate step so that error replies can be rejected without reading
/// it.
pub trait AsyncTransport: Sync {
    /// The unread response body.
    type Body: Send;

    /// Sends the request and resolves to the server's reply.
    fn transmit<'a>(&'a self, post: Post<'a>) -> BoxFuture<'a, Result<Reply<Self::Body>, BoxError>>;

    /// Reads the whole body of a successful reply.
    fn read_body(&self, body: Self::Body) -> BoxFuture<'_, Result<Vec<u8>, BoxError>>;
}

impl AsyncTransport for reqwest::Client {
    type Body = reqwest::Response;

    fn transmit<'a>(&'a self, post: Post<'a>) -> BoxFuture<'a, Result<Reply<Self::Body>, BoxError>> {
        let mut builder = self.post(post.url);
        for (name, value) in post.headers {
            builder = builder.header(*name, value.as_str());
        }
        if let Some(timeout) = post.timeout {
            builder = builder.timeout(timeout);
        }
        let send = builder.body(post.body).send();

        async move {
            let response = send.await?;
            let status = response.status();
            Ok::<_, BoxError>(Reply {
                status: status.as_u16(),
                reason: reason_phrase(status, response.extensions()),
                body: response,
            })
        }
        .boxed()
    }

    fn read_body(&self, body: Self::Body) -> BoxFuture<'_, Result<Vec<u8>, BoxError>> {
        async move { Ok::<_, BoxError>(body.bytes().await?.to_vec()) }.boxed()
    }
}

impl<T: AsyncTransport, C: Codec + Sync> Invoker<T, C> {
    /// Performs `request` without blocking the current thread.
    ///
    /// Same semantics as [`Invoker::call`], including not touching the body of an error reply.
    pub async fn call_async(&self, endpoint: &Endpoint, request: &Request<'_>) -> Result<Value> {
        let (url, headers, body) = self.prepare(endpoint, request)?;

        let reply = self
            .transport()
            .transmit(Post {
                url: &url,
                headers: &headers,
                body,
                timeout: endpoint.timeout(),
            })
            .await
            .map_err(Error::Transport)?;

        let body = check_status(reply)?;
        let body = self
            .transport()
            .read_body(body)
            .await
            .map_err(Error::Transport)?;

        self.finish(&body)
    }

    /// Calls `method` with positional `args` without blocking the current thread.
    pub async fn invoke_async(
        &self,
        endpoint: &Endpoint,
        method: &str,
        args: &[Value],
    ) -> Result<Value> {
        self.call_async(endpoint, &Request::with_args(method, args))
            .await
    }
}
