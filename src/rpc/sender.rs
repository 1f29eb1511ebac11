//! The HTTP boundary of the client. [`RpcClient`](crate::rpc::RpcClient)
//! talks to the node only through an [`HttpSender`], so callers can swap in
//! their own transport and tests can stub the network.

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;
use futures::future::BoxFuture;
use hyper::client::HttpConnector;
use hyper::header::{HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use hyper::{Body, Client, Request};
use hyper_tls::HttpsConnector;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

pub use hyper::Method;

/// A fully built request handed to the sender.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Bytes>,
}

/// Status and body of a completed exchange. Any status is a completed
/// exchange; classifying it is the client's job.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait HttpSender: Send + Sync {
    /// Performs exactly one exchange. Errors mean no response was obtained.
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>>;
}

/// Default sender backed by a pooled `hyper` client with TLS support.
#[derive(Debug, Clone)]
pub struct HyperSender {
    client: Client<HttpsConnector<HttpConnector>>,
    request_timeout: Duration,
    user_agent: HeaderValue,
}

impl HyperSender {
    pub fn new(request_timeout: Duration, user_agent: &str) -> Result<Self> {
        if request_timeout.is_zero() {
            return Err(anyhow!("request_timeout must be greater than 0"));
        }
        let user_agent =
            HeaderValue::from_str(user_agent).context("failed to build User-Agent header")?;

        let client = Client::builder().build::<_, Body>(HttpsConnector::new());

        Ok(Self {
            client,
            request_timeout,
            user_agent,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest { method, url, body } = request;

        let request = Request::builder()
            .method(method)
            .uri(url.as_str())
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, self.user_agent.clone())
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .context("failed to build HTTP request")?;

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .context("failed to send request")?;
            let status = response.status().as_u16();
            let body = hyper::body::to_bytes(response.into_body())
                .await
                .context("failed to read response body")?;
            Ok::<_, anyhow::Error>(HttpResponse { status, body })
        };

        timeout(self.request_timeout, exchange)
            .await
            .map_err(|_| anyhow!("request timed out after {:?}", self.request_timeout))?
    }
}

impl HttpSender for HyperSender {
    fn send(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse>> {
        Box::pin(self.execute(request))
    }
}
