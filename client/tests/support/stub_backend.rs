//! Stub code-lab backend served by Actix over a real socket.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix spawns its server with `spawn_local`. Replies are scripted per path
//! and every request body is recorded for later assertions. Dropping the
//! harness stops the server.

use std::collections::HashMap;
use std::future::Future;
use std::net::TcpListener;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

#[derive(Debug, Clone)]
struct StubReply {
    status: u16,
    body: String,
    delay: Option<Duration>,
}

/// One request observed by the stub.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) path: String,
    pub(crate) body: Value,
}

#[derive(Debug, Default)]
struct StubState {
    replies: Mutex<HashMap<String, StubReply>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Running stub backend.
pub(crate) struct StubBackend {
    base_url: String,
    server: ServerHandle,
    state: web::Data<StubState>,
}

impl StubBackend {
    /// Base URL with a trailing slash.
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Answer `path` (without leading slash) with `status` and a JSON body.
    pub(crate) fn reply(&self, path: &str, status: u16, body: Value) {
        self.reply_raw(path, status, &body.to_string());
    }

    /// Answer `path` with an arbitrary body.
    pub(crate) fn reply_raw(&self, path: &str, status: u16, body: &str) {
        self.script(path, StubReply {
            status,
            body: body.to_owned(),
            delay: None,
        });
    }

    /// Answer `path` only after `delay`.
    pub(crate) fn reply_slowly(&self, path: &str, delay: Duration, body: Value) {
        self.script(path, StubReply {
            status: 200,
            body: body.to_string(),
            delay: Some(delay),
        });
    }

    fn script(&self, path: &str, reply: StubReply) {
        lock(&self.state.replies).insert(path.to_owned(), reply);
    }

    /// Every request received so far.
    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state.requests).clone()
    }

    /// Bodies posted to `path`, in arrival order.
    pub(crate) fn bodies_for(&self, path: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .map(|request| request.body)
            .collect()
    }
}

async fn respond(
    request: HttpRequest,
    body: web::Bytes,
    state: web::Data<StubState>,
) -> HttpResponse {
    let path = request.path().trim_start_matches('/').to_owned();
    let parsed = serde_json::from_slice(&body).unwrap_or(Value::Null);
    lock(&state.requests).push(RecordedRequest {
        path: path.clone(),
        body: parsed,
    });

    let reply = lock(&state.replies).get(&path).cloned();
    let Some(reply) = reply else {
        return HttpResponse::NotFound().body("no stub for path");
    };
    if let Some(delay) = reply.delay {
        tokio::time::sleep(delay).await;
    }
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status)
        .content_type("application/json")
        .body(reply.body)
}

async fn spawn_stub_backend() -> Result<StubBackend, String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let state = web::Data::new(StubState::default());
    let server_state = state.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .default_service(web::to(respond))
    })
    .disable_signals()
    .workers(1)
    .shutdown_timeout(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok(StubBackend {
        base_url: format!("http://{addr}/"),
        server: handle,
        state,
    })
}

/// Runtime, local task set and stub server for one test.
pub(crate) struct StubHarness {
    runtime: Runtime,
    local: LocalSet,
    backend: StubBackend,
}

impl StubHarness {
    /// Start a fresh stub backend.
    pub(crate) fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");
        let local = LocalSet::new();
        let backend = local
            .block_on(&runtime, spawn_stub_backend())
            .expect("stub backend should start");
        Self {
            runtime,
            local,
            backend,
        }
    }

    /// The running stub.
    pub(crate) fn backend(&self) -> &StubBackend {
        &self.backend
    }

    /// Drive `operation` to completion alongside the server.
    pub(crate) fn run<'a, F, Fut>(&'a self, operation: F) -> Fut::Output
    where
        F: FnOnce(&'a StubBackend) -> Fut,
        Fut: Future,
    {
        self.local.block_on(&self.runtime, operation(&self.backend))
    }
}

impl Drop for StubHarness {
    fn drop(&mut self) {
        let server = self.backend.server.clone();
        self.local.block_on(&self.runtime, async move {
            server.stop(true).await;
        });
    }
}
