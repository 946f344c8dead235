//! Where and how a call is sent.

use std::fmt;
use std::time::Duration;

/// Path every call is posted to.
pub const ROOT_PATH: &str = "/";

/// The `User-Agent` sent unless the endpoint overrides it.
pub const DEFAULT_USER_AGENT: &str = concat!("Rust xmlrpcall/", env!("CARGO_PKG_VERSION"));

/// HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The value of the `Authorization` header: `Basic base64(username:password)`.
    pub fn header_value(&self) -> String {
        format!(
            "Basic {}",
            base64::encode(format!("{}:{}", self.username, self.password))
        )
    }
}

// Keep the password out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// URL scheme used to reach the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Scheme {
    /// Plain HTTP. Credentials travel in the clear.
    Http,
    #[default]
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// The server a call goes to, plus the per-call connection settings.
///
/// ```
/// use std::time::Duration;
/// use xmlrpcall::{Credentials, Endpoint};
///
/// let endpoint = Endpoint::new("localhost", 1638)
///     .with_credentials(Credentials::new("nabla", "nabla"))
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(endpoint.url(), "https://localhost:1638/");
/// ```
#[derive(Clone, Debug)]
pub struct Endpoint {
    host: String,
    port: u16,
    scheme: Scheme,
    credentials: Option<Credentials>,
    timeout: Option<Duration>,
    user_agent: String,
}

impl Endpoint {
    /// An HTTPS endpoint without credentials.
    pub fn new<H: Into<String>>(host: H, port: u16) -> Self {
        Endpoint {
            host: host.into(),
            port,
            scheme: Scheme::default(),
            credentials: None,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets or clears the credentials.
    pub fn with_optional_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Limits the whole exchange (connect, send, receive). Without it the transport default
    /// applies.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The full URL a call is posted to. IPv6 literals are bracketed.
    pub fn url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("{}://[{}]:{}{}", self.scheme.as_str(), self.host, self.port, ROOT_PATH)
        } else {
            format!("{}://{}:{}{}", self.scheme.as_str(), self.host, self.port, ROOT_PATH)
        }
    }

    /// The headers sent with every call to this endpoint.
    ///
    /// `Content-Type` is always present; `Authorization` only when credentials are set.
    pub fn headers(&self, media_type: &str) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Content-Type", media_type.to_string()),
            ("User-Agent", self.user_agent.clone()),
        ];
        if let Some(ref credentials) = self.credentials {
            headers.push(("Authorization", credentials.header_value()));
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_header() {
        assert_eq!(
            Credentials::new("user", "pass").header_value(),
            "Basic dXNlcjpwYXNz"
        );
        assert_eq!(
            Credentials::new("nabla", "nabla").header_value(),
            "Basic bmFibGE6bmFibGE="
        );
    }

    #[test]
    fn authorization_only_with_credentials() {
        let anonymous = Endpoint::new("localhost", 1638);
        assert!(anonymous
            .headers("text/xml")
            .iter()
            .all(|(name, _)| *name != "Authorization"));

        let headers = anonymous
            .with_credentials(Credentials::new("user", "pass"))
            .headers("text/xml");
        assert!(headers.contains(&("Content-Type", "text/xml".to_string())));
        assert!(headers.contains(&("Authorization", "Basic dXNlcjpwYXNz".to_string())));
    }

    #[test]
    fn builds_urls() {
        assert_eq!(Endpoint::new("localhost", 1638).url(), "https://localhost:1638/");
        assert_eq!(
            Endpoint::new("127.0.0.1", 8000).with_scheme(Scheme::Http).url(),
            "http://127.0.0.1:8000/"
        );
        assert_eq!(Endpoint::new("::1", 443).url(), "https://[::1]:443/");
    }

    #[test]
    fn debug_hides_password() {
        let debug = format!("{:?}", Credentials::new("user", "hunter2"));
        assert!(debug.contains("user"));
        assert!(!debug.contains("hunter2"));
    }
}
