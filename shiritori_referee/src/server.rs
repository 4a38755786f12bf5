// Webhook HTTP server.
//
// Architecture: one `tiny_http::Server` shared by a fixed pool of worker
// threads. Each worker polls `recv_timeout` so it can notice the
// `keep_running` flag (cleared by `ServerHandle::stop`) between requests,
// and handles each request to completion on its own thread. Requests for
// different rooms run in parallel; requests for the same room serialize on
// that room's lock inside `Referee::handle_event`.
//
// Routes:
// - `POST /webhook`: body is an `InboundEvent`. If a webhook token is
//   configured, `X-Shiritori-Token` must match (401 otherwise; compared in
//   constant time). Malformed
//   JSON is a 400. Otherwise 200 with `WebhookAck { reply }`.
// - `GET /healthz`: 200 with `HealthStatus`.
// - anything else: 404.

use std::io::{self, Cursor, Read};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use serde::Serialize;
use shiritori_protocol::{HealthStatus, InboundEvent, WebhookAck};
use subtle::ConstantTimeEq;
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, warn};

use crate::config::RefereeConfig;
use crate::referee::Referee;

/// Header carrying the webhook shared secret.
pub const WEBHOOK_TOKEN_HEADER: &str = "X-Shiritori-Token";

/// Largest webhook body accepted.
const MAX_BODY_BYTES: u64 = 64 * 1024;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

type HttpResponse = Response<Cursor<Vec<u8>>>;

/// Handle returned by `start_server` to control the running server.
pub struct ServerHandle {
    keep_running: Arc<AtomicBool>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl ServerHandle {
    /// Signal the workers to stop and wait for them to finish.
    pub fn stop(self) {
        self.keep_running.store(false, Ordering::SeqCst);
        self.wait();
    }

    /// Block until every worker exits.
    pub fn wait(self) {
        for worker in self.workers {
            let _ = worker.join();
        }
    }
}

/// Start the webhook server on background threads. Returns a handle for
/// stopping it and the bound address (port 0 picks a free port).
pub fn start_server(
    config: &RefereeConfig,
    referee: Arc<Referee>,
) -> io::Result<(ServerHandle, SocketAddr)> {
    let server = Server::http(format!("{}:{}", config.host, config.port)).map_err(io::Error::other)?;
    let addr = server
        .server_addr()
        .to_ip()
        .ok_or_else(|| io::Error::other("webhook server is not bound to an IP address"))?;

    let server = Arc::new(server);
    let keep_running = Arc::new(AtomicBool::new(true));
    let token = config.webhook_token.clone();

    let workers = (0..config.workers.max(1))
        .map(|i| {
            let server = Arc::clone(&server);
            let referee = Arc::clone(&referee);
            let keep_running = Arc::clone(&keep_running);
            let token = token.clone();
            thread::Builder::new()
                .name(format!("webhook-{i}"))
                .spawn(move || worker_loop(&server, &referee, token.as_deref(), &keep_running))
        })
        .collect::<io::Result<Vec<_>>>()?;

    Ok((
        ServerHandle {
            keep_running,
            workers,
        },
        addr,
    ))
}

fn worker_loop(server: &Server, referee: &Referee, token: Option<&str>, keep_running: &AtomicBool) {
    while keep_running.load(Ordering::SeqCst) {
        match server.recv_timeout(POLL_INTERVAL) {
            Ok(Some(request)) => handle_request(referee, token, request),
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "webhook listener failed");
                break;
            }
        }
    }
}

fn handle_request(referee: &Referee, token: Option<&str>, mut request: Request) {
    let method = request.method().clone();
    let path = path_of(request.url()).to_string();
    let response = match (&method, path.as_str()) {
        (Method::Post, "/webhook") => webhook(referee, token, &mut request),
        (Method::Get, "/healthz") => json_response(
            200,
            &HealthStatus {
                status: "ok".into(),
                rooms: referee.room_count(),
                words: referee.word_count(),
            },
        ),
        _ => text_response(404, "not found"),
    };
    debug!(%method, path = %path, status = response.status_code().0, "request handled");
    if let Err(e) = request.respond(response) {
        warn!(error = %e, "failed to write response");
    }
}

fn webhook(referee: &Referee, token: Option<&str>, request: &mut Request) -> HttpResponse {
    if let Some(expected) = token {
        let presented = request
            .headers()
            .iter()
            .find(|h| h.field.equiv(WEBHOOK_TOKEN_HEADER))
            .map(|h| h.value.as_str());
        if !token_matches(presented, expected) {
            return text_response(401, "unauthorized");
        }
    }

    let mut body = String::new();
    if let Err(e) = request
        .as_reader()
        .take(MAX_BODY_BYTES)
        .read_to_string(&mut body)
    {
        return text_response(400, &format!("unreadable body: {e}"));
    }

    let event: InboundEvent = match serde_json::from_str(&body) {
        Ok(event) => event,
        Err(e) => return text_response(400, &format!("malformed event: {e}")),
    };

    let reply = referee.handle_event(&event).map(|m| m.text);
    json_response(200, &WebhookAck { reply })
}

/// Whether the presented webhook token equals the configured one. Equal
/// lengths compare in constant time.
fn token_matches(presented: Option<&str>, expected: &str) -> bool {
    presented.is_some_and(|p| bool::from(p.as_bytes().ct_eq(expected.as_bytes())))
}

/// Request path without the query string.
fn path_of(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

fn json_response<T: Serialize>(status: u16, value: &T) -> HttpResponse {
    match serde_json::to_string(value) {
        Ok(json) => with_content_type(Response::from_string(json), "application/json")
            .with_status_code(status),
        Err(e) => text_response(500, &format!("serialization failed: {e}")),
    }
}

fn text_response(status: u16, text: &str) -> HttpResponse {
    with_content_type(Response::from_string(text), "text/plain; charset=utf-8")
        .with_status_code(status)
}

fn with_content_type(response: HttpResponse, content_type: &str) -> HttpResponse {
    match Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}
