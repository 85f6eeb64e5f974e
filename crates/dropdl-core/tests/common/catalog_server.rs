//! Minimal HTTP/1.1 server that serves canned catalog pages for integration
//! tests.
//!
//! Routes are an exact match on the request target (path plus query string).
//! Unknown targets get 404; a route registered with a non-200 status (e.g.
//! 400 past the last index page) returns that status with an empty body.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

/// Response for one route.
#[derive(Debug, Clone)]
pub struct CannedPage {
    pub status: u32,
    pub body: String,
    /// Answer the first N hits with 503 before serving the page (exercises
    /// retry behavior in callers).
    pub fail_first: usize,
}

impl CannedPage {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            fail_first: 0,
        }
    }

    pub fn status(status: u32) -> Self {
        Self {
            status,
            body: String::new(),
            fail_first: 0,
        }
    }

    pub fn flaky(mut self, fail_first: usize) -> Self {
        self.fail_first = fail_first;
        self
    }
}

/// Starts a server in a background thread serving `routes`. Returns the base
/// URL without a trailing slash (e.g. "http://127.0.0.1:12345"). The server
/// runs until the process exits.
pub fn start(routes: HashMap<String, CannedPage>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    let hits: Arc<Mutex<HashMap<String, usize>>> = Arc::new(Mutex::new(HashMap::new()));
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&hits);
            thread::spawn(move || handle(stream, &routes, &hits));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, CannedPage>,
    hits: &Mutex<HashMap<String, usize>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let target = match parse_request_target(request) {
        Some(t) => t,
        None => {
            let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\n\r\n");
            return;
        }
    };

    let (status_line, body) = match routes.get(target) {
        Some(page) => {
            let mut hits = hits.lock().unwrap();
            let count = hits.entry(target.to_string()).or_insert(0);
            *count += 1;
            if *count <= page.fail_first {
                (status_text(503), String::new())
            } else {
                (status_text(page.status), page.body.clone())
            }
        }
        None => (status_text(404), String::new()),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status_line,
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body.as_bytes());
}

/// Returns the request target of a GET request, or None for other methods.
fn parse_request_target(request: &str) -> Option<&str> {
    let first = request.lines().next()?;
    let mut parts = first.split_whitespace();
    let method = parts.next()?;
    if !method.eq_ignore_ascii_case("GET") {
        return None;
    }
    parts.next()
}

fn status_text(status: u32) -> String {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "",
    };
    format!("{} {}", status, reason)
}
