//! Single-shot XML-RPC calls.
//!
//! The `xmlrpcall` crate sends one [XML-RPC][spec] method call to a server over HTTPS, optionally
//! with HTTP Basic credentials, and returns the first value of the response.
//!
//! ```no_run
//! use xmlrpcall::{call, Value};
//!
//! let args = [Value::from(5), Value::from(3)];
//! let result = call("localhost", 1638, None, "public_example.sumAndDifference", &args)?;
//! assert_eq!(result, Value::from(vec![8, 2]));
//! # Ok::<(), xmlrpcall::Error>(())
//! ```
//!
//! For more control, build an [`Endpoint`] and hand it to an [`Invoker`]. Both the [`Transport`]
//! and the envelope [`Codec`] are pluggable.
//!
//! [spec]: http://xmlrpc.scripting.com/spec.html

mod codec;
mod endpoint;
mod error;
mod fault;
mod invoker;
#[cfg(feature = "async")]
mod nonblocking;
mod parser;
mod request;
mod transport;
mod utils;
mod value;

pub use codec::{Codec, XmlCodec};
pub use endpoint::{Credentials, Endpoint, Scheme, DEFAULT_USER_AGENT, ROOT_PATH};
pub use error::{BoxError, Error, ParseError, Result};
pub use fault::Fault;
pub use invoker::Invoker;
#[cfg(feature = "http")]
pub use invoker::call;
#[cfg(feature = "async")]
pub use nonblocking::{client as async_client, AsyncTransport};
pub use parser::{ParseResult, Response};
pub use request::Request;
pub use transport::{Post, Reply, Transport};
pub use value::Value;

#[cfg(feature = "http")]
pub use transport::http;
