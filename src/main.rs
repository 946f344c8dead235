//! `xmlrpcall`: perform one XML-RPC call and print the returned value.

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::debug;

use std::time::Duration;

use xmlrpcall::{Credentials, Endpoint, Invoker, Scheme, Value};

#[derive(Parser, Debug)]
#[command(name = "xmlrpcall")]
#[command(version, about = "Perform a single XML-RPC call and print the result", long_about = None)]
struct Cli {
    /// Username for HTTP Basic authentication
    #[arg(short = 'u', long = "user", env = "XMLRPCALL_USER")]
    user: Option<String>,

    /// Password for HTTP Basic authentication
    #[arg(
        short = 'p',
        long = "password",
        env = "XMLRPCALL_PASSWORD",
        hide_env_values = true
    )]
    password: Option<String>,

    /// Talk plain HTTP instead of HTTPS
    #[arg(long = "plain-http")]
    plain_http: bool,

    /// Accept invalid server certificates (self-signed, expired, wrong host)
    #[arg(short = 'k', long = "insecure")]
    insecure: bool,

    /// Give up after this many seconds
    #[arg(short = 't', long = "timeout", value_name = "SECS")]
    timeout: Option<u64>,

    /// Server host name or address
    server: String,

    /// Server port
    port: u16,

    /// Method name, usually `package.function`
    method: String,

    /// Method arguments: true/false, integers and floats are typed, anything else is a string
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl Cli {
    fn credentials(&self) -> Result<Option<Credentials>> {
        match (&self.user, &self.password) {
            (Some(user), password) => Ok(Some(Credentials::new(
                user.as_str(),
                password.as_deref().unwrap_or_default(),
            ))),
            (None, Some(_)) => bail!("a password was given without a user"),
            (None, None) => Ok(None),
        }
    }

    fn endpoint(&self) -> Result<Endpoint> {
        let mut endpoint = Endpoint::new(self.server.as_str(), self.port)
            .with_optional_credentials(self.credentials()?);
        if self.plain_http {
            endpoint = endpoint.with_scheme(Scheme::Http);
        }
        if let Some(secs) = self.timeout {
            endpoint = endpoint.with_timeout(Duration::from_secs(secs));
        }
        Ok(endpoint)
    }
}

/// Types a command-line argument by its spelling.
fn parse_arg(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i32>() {
        return Value::Int(i);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Int64(i);
    }
    match raw.parse::<f64>() {
        Ok(d) if d.is_finite() => Value::Double(d),
        _ => Value::from(raw),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let endpoint = cli.endpoint()?;
    let args: Vec<Value> = cli.args.iter().map(|raw| parse_arg(raw)).collect();
    debug!("parsed arguments: {:?}", args);

    let invoker = if cli.insecure {
        Invoker::http_insecure()
    } else {
        Invoker::http()
    }
    .context("could not set up the HTTP client")?;
    let result = invoker
        .invoke(&endpoint, &cli.method, &args)
        .with_context(|| format!("call to {} at {} failed", cli.method, endpoint.url()))?;

    println!("{}", result);
    Ok(())
}
