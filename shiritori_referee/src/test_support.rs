// One-shot HTTP stub for exercising the `ureq` clients in unit tests.

use std::net::SocketAddr;
use std::thread::{self, JoinHandle};

use tiny_http::{Response, Server};

/// What the stub received.
pub struct Captured {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Answer exactly one request with `status` and `body`, then exit. Join the
/// handle to see the request.
pub fn serve_once(status: u16, body: &str) -> (SocketAddr, JoinHandle<Captured>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let body = body.to_string();
    let handle = thread::spawn(move || {
        let mut request = server.recv().unwrap();
        let mut received = String::new();
        request.as_reader().read_to_string(&mut received).unwrap();
        let captured = Captured {
            method: request.method().to_string(),
            path: request.url().to_string(),
            headers: request
                .headers()
                .iter()
                .map(|h| (h.field.to_string(), h.value.to_string()))
                .collect(),
            body: received,
        };
        let _ = request.respond(Response::from_string(body).with_status_code(status));
        captured
    });
    (addr, handle)
}
