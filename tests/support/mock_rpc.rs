use std::{
    collections::VecDeque,
    convert::Infallible,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use anyhow::{Context, Result};
use bytes::Bytes;
use hyper::service::{make_service_fn, service_fn};
use hyper::{body, Body, Request, Response, Server, StatusCode};
use regex::Regex;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// What the server does with a path no route matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// 200 with an empty body.
    Blank,
    /// 404, and the path is recorded as unhandled.
    Unhandled,
}

/// One request the server received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Bytes,
}

struct Route {
    pattern: Regex,
    responses: Mutex<VecDeque<Bytes>>,
}

impl Route {
    /// Pops the next queued body; the last one is served forever once the
    /// queue is down to it.
    fn next_body(&self) -> Bytes {
        let mut queue = self.responses.lock().expect("mock route poisoned");
        if queue.len() > 1 {
            queue.pop_front().unwrap_or_default()
        } else {
            queue.front().cloned().unwrap_or_default()
        }
    }
}

/// Path-pattern router replaying canned bodies. Routes match in registration
/// order; the first match wins.
#[derive(Clone)]
pub struct MockRouter {
    routes: Arc<Vec<Route>>,
    fallback: Fallback,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    unhandled: Arc<Mutex<Vec<String>>>,
}

impl MockRouter {
    pub fn new(fallback: Fallback) -> Self {
        Self {
            routes: Arc::new(Vec::new()),
            fallback,
            hits: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            unhandled: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Registers `pattern` (matched against the request path) with the
    /// bodies to replay, in order.
    pub fn route<I, B>(mut self, pattern: &str, responses: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        let pattern = Regex::new(pattern).expect("mock route pattern must compile");
        let responses = responses.into_iter().map(Into::into).collect();
        Arc::get_mut(&mut self.routes)
            .expect("routes are registered before the server starts")
            .push(Route {
                pattern,
                responses: Mutex::new(responses),
            });
        self
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("mock requests poisoned").clone()
    }

    pub fn unhandled(&self) -> Vec<String> {
        self.unhandled.lock().expect("mock unhandled poisoned").clone()
    }

    fn respond(&self, path: &str) -> (StatusCode, Bytes) {
        if let Some(route) = self.routes.iter().find(|route| route.pattern.is_match(path)) {
            return (StatusCode::OK, route.next_body());
        }

        match self.fallback {
            Fallback::Blank => (StatusCode::OK, Bytes::new()),
            Fallback::Unhandled => {
                self.unhandled
                    .lock()
                    .expect("mock unhandled poisoned")
                    .push(path.to_owned());
                (StatusCode::NOT_FOUND, Bytes::from(format!("unhandled path {path}")))
            }
        }
    }
}

pub struct MockRpcServer {
    url: String,
    router: MockRouter,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl MockRpcServer {
    pub async fn start(router: MockRouter) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind mock RPC listener")?;
        let addr = listener
            .local_addr()
            .context("failed to read mock listener address")?;
        let std_listener = listener
            .into_std()
            .context("failed to convert mock listener")?;
        std_listener
            .set_nonblocking(true)
            .context("failed to set mock listener non-blocking")?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let service_router = router.clone();
        let make_service = make_service_fn(move |_| {
            let router = service_router.clone();
            async move {
                Ok::<_, Infallible>(service_fn(move |req| serve_request(router.clone(), req)))
            }
        });

        let server = Server::from_tcp(std_listener)
            .context("failed to build mock HTTP server")?
            .serve(make_service);
        let graceful = server.with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });

        let handle = tokio::spawn(async move {
            if let Err(err) = graceful.await {
                eprintln!("mock RPC server stopped: {err}");
            }
        });

        Ok(Self {
            url: format!("http://{}", addr),
            router,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn router(&self) -> &MockRouter {
        &self.router
    }

    pub fn hits(&self) -> usize {
        self.router.hits()
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

async fn serve_request(router: MockRouter, req: Request<Body>) -> Result<Response<Body>, Infallible> {
    router.hits.fetch_add(1, Ordering::SeqCst);

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let query = req.uri().query().map(str::to_owned);

    let bytes = match body::to_bytes(req.into_body()).await {
        Ok(bytes) => bytes,
        Err(err) => {
            let mut response = Response::new(Body::from(format!("failed to read body: {err}")));
            *response.status_mut() = StatusCode::BAD_REQUEST;
            return Ok(response);
        }
    };

    router
        .requests
        .lock()
        .expect("mock requests poisoned")
        .push(RecordedRequest {
            method,
            path: path.clone(),
            query,
            body: bytes,
        });

    let (status, body) = router.respond(&path);
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        hyper::header::CONTENT_TYPE,
        hyper::header::HeaderValue::from_static("application/json"),
    );
    Ok(response)
}
