//! A tiny HTTP/1.1 server that records every request and answers from a handler.

#![allow(dead_code)] // not every test binary uses every helper

use xmlrpcall::{Endpoint, Scheme};

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// A request as the server saw it. Header names are lowercased.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// The raw `<value>...</value>` of every `<param>`, in order.
    pub fn params(&self) -> Vec<String> {
        self.body
            .split("<param>")
            .skip(1)
            .filter_map(|chunk| chunk.split("</param>").next())
            .map(str::to_string)
            .collect()
    }

    /// The `<i4>` arguments of the call.
    pub fn int_params(&self) -> Vec<i32> {
        self.params()
            .iter()
            .filter_map(|p| {
                p.trim_start_matches("<value><i4>")
                    .trim_end_matches("</i4></value>")
                    .parse()
                    .ok()
            })
            .collect()
    }
}

/// What the server sends back.
pub struct Canned {
    pub status: u16,
    pub reason: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl Canned {
    pub fn status<S: Into<String>>(status: u16, reason: &'static str, body: S) -> Self {
        Canned {
            status,
            reason,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn ok<S: Into<String>>(body: S) -> Self {
        Canned::status(200, "OK", body)
    }

    /// Adds a header besides the fixed `Content-Type`, `Content-Length` and `Connection`.
    pub fn with_header<S: Into<String>>(mut self, name: &'static str, value: S) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// A response envelope with a single `<param>` holding `value` (a `<value>` element).
    pub fn value(value: &str) -> Self {
        Canned::ok(format!(
            "<?xml version='1.0'?>\n<methodResponse>\n<params>\n<param>\n{}\n</param>\n</params>\n</methodResponse>\n",
            value
        ))
    }

    /// A single `<array>` of the given `<value>` elements.
    pub fn array(values: &[String]) -> Self {
        Canned::value(&format!(
            "<value><array><data>{}</data></array></value>",
            values.concat()
        ))
    }
}

pub struct StubServer {
    port: u16,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl StubServer {
    /// Binds to an ephemeral port on localhost and serves every connection on its own thread.
    pub fn start<F>(handler: F) -> StubServer
    where
        F: Fn(&Recorded) -> Canned + Send + Sync + 'static,
    {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("could not bind stub server");
        let port = listener.local_addr().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let handler = Arc::new(handler);

        let log = requests.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let stream = match stream {
                    Ok(stream) => stream,
                    Err(_) => continue,
                };
                let handler = handler.clone();
                let log = log.clone();
                thread::spawn(move || serve(stream, &*handler, &log));
            }
        });

        StubServer { port, requests }
    }

    /// A plain-HTTP endpoint pointing at this server.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new("127.0.0.1", self.port).with_scheme(Scheme::Http)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve<F>(stream: TcpStream, handler: &F, log: &Mutex<Vec<Recorded>>)
where
    F: Fn(&Recorded) -> Canned,
{
    let mut reader = BufReader::new(stream.try_clone().unwrap());

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(n, _)| n == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).unwrap();

    let recorded = Recorded {
        method,
        path,
        headers,
        body: String::from_utf8(body).unwrap(),
    };
    let canned = handler(&recorded);
    log.lock().unwrap().push(recorded);

    let mut stream = stream;
    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n",
        canned.status,
        canned.reason,
        canned.body.len()
    );
    for (name, value) in &canned.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str("\r\n");
    stream.write_all(head.as_bytes()).unwrap();
    stream.write_all(canned.body.as_bytes()).unwrap();
    stream.flush().unwrap();
}

/// Answers every call with the reversed argument list.
pub fn reverse(request: &Recorded) -> Canned {
    let mut params = request.params();
    params.reverse();
    Canned::array(&params)
}

/// Answers `[a, b]` with `[a + b, a - b]`.
pub fn sum_and_difference(request: &Recorded) -> Canned {
    let ints = request.int_params();
    Canned::array(&[
        format!("<value><int>{}</int></value>", ints[0] + ints[1]),
        format!("<value><int>{}</int></value>", ints[0] - ints[1]),
    ])
}
