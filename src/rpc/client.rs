//! RPC transport for Tezos nodes. Houses [`RpcClient`], which owns the base
//! URL, chain segment and injected [`HttpSender`], builds request URLs from
//! paths plus ordered query options, and classifies every exchange as
//! success, RPC failure or transport failure.

use crate::rpc::endpoint::{join_path, DecodeResponse, Endpoint, Scope};
use crate::rpc::error::{excerpt, parse_error_envelope, RpcError};
use crate::rpc::options::QueryOptions;
use crate::rpc::sender::{HttpRequest, HttpResponse, HttpSender, HyperSender, Method};
use crate::runtime::config::ClientConfig;
use anyhow::{Context, Result};
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;
use tokio::time::Instant;
use url::Url;

/// Typed client for a node's RPC interface.
///
/// Cloning is cheap and clones share the sender. The client keeps no
/// per-call state, so one instance can serve any number of concurrent calls.
#[derive(Clone)]
pub struct RpcClient {
    base_url: Arc<Url>,
    chain: Arc<str>,
    sender: Arc<dyn HttpSender>,
}

impl fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcClient")
            .field("base_url", &self.base_url.as_str())
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}

impl RpcClient {
    /// Client for `url` on the main chain with default timeouts.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let config = ClientConfig::builder().rpc_url(url).build()?;
        Self::from_config(&config)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let sender = HyperSender::new(config.request_timeout(), config.user_agent())
            .context("failed to build HTTP sender")?;
        Self::with_sender(config, Arc::new(sender))
    }

    /// Builds a client that sends every request through `sender`.
    pub fn with_sender(config: &ClientConfig, sender: Arc<dyn HttpSender>) -> Result<Self> {
        config.validate()?;
        let base_url = Url::parse(config.rpc_url())
            .with_context(|| format!("invalid rpc_url '{}'", config.rpc_url()))?;

        Ok(Self {
            base_url: Arc::new(base_url),
            chain: Arc::from(config.chain()),
            sender,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn chain(&self) -> &str {
        &self.chain
    }

    /// Issues one request for `path` below `/chains/<chain>` and returns the
    /// body of a successful response verbatim.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: &QueryOptions,
    ) -> Result<Bytes, RpcError> {
        self.request_with_body(method, path, options, None).await
    }

    /// Like [`RpcClient::request`] with an optional request body.
    pub async fn request_with_body(
        &self,
        method: Method,
        path: &str,
        options: &QueryOptions,
        body: Option<Bytes>,
    ) -> Result<Bytes, RpcError> {
        let scoped = join_path(&format!("/chains/{}", self.chain), path);
        self.execute(method, &scoped, options, body).await
    }

    /// Issues one request for a node-level `path` (no chain segment), such
    /// as `/version` or `/monitor/active_chains`.
    pub async fn request_node(
        &self,
        method: Method,
        path: &str,
        options: &QueryOptions,
        body: Option<Bytes>,
    ) -> Result<Bytes, RpcError> {
        let path = join_path("", path);
        self.execute(method, &path, options, body).await
    }

    /// Runs a typed endpoint: validates the input, resolves a cycle into a
    /// block hash where the endpoint allows it, performs the request and
    /// decodes the response. Every failure carries the endpoint's
    /// description.
    pub async fn call<E: Endpoint>(&self, input: &E) -> Result<E::Output> {
        input.validate().with_context(|| input.describe())?;

        let path = match input.scope() {
            Scope::BlockOrCycle { blockhash, cycle } if cycle != 0 => {
                let block = self
                    .resolve_block_hash(cycle, blockhash)
                    .await
                    .with_context(|| input.describe())?;
                join_path(&format!("/blocks/{block}"), &input.resource())
            }
            _ => self.static_path(input).with_context(|| input.describe())?,
        };

        self.dispatch(input, &path).await
    }

    /// Runs an endpoint whose block is already known. Used by the cycle
    /// resolver, which must not recurse into resolution itself.
    pub(crate) async fn call_direct<E: Endpoint>(&self, input: &E) -> Result<E::Output> {
        input.validate().with_context(|| input.describe())?;
        let path = self.static_path(input).with_context(|| input.describe())?;
        self.dispatch(input, &path).await
    }

    /// Path below `/chains/<chain>` (or below the root for node scope) for
    /// endpoints whose block is known without resolving a cycle.
    fn static_path<E: Endpoint>(&self, input: &E) -> Result<String, RpcError> {
        let resource = input.resource();
        match input.scope() {
            Scope::Node | Scope::Chain => Ok(join_path("", &resource)),
            Scope::Block(block) => Ok(join_path(&format!("/blocks/{block}"), &resource)),
            Scope::BlockOrCycle { blockhash, cycle: 0 } => {
                Ok(join_path(&format!("/blocks/{blockhash}"), &resource))
            }
            Scope::BlockOrCycle { cycle, .. } => Err(RpcError::validation(format!(
                "cycle {cycle} must be resolved to a block hash first"
            ))),
        }
    }

    async fn dispatch<E: Endpoint>(&self, input: &E, path: &str) -> Result<E::Output> {
        let body = input.body().with_context(|| input.describe())?;
        let method = input.method();
        let options = input.query();

        let response = match input.scope() {
            Scope::Node => self.request_node(method, path, &options, body).await,
            _ => self.request_with_body(method, path, &options, body).await,
        }
        .with_context(|| input.describe())?;

        E::Output::decode_response(response).with_context(|| input.describe())
    }

    fn build_url(&self, path: &str, options: &QueryOptions) -> Result<Url, RpcError> {
        let raw = format!("{}{}", self.base_url(), path);
        let mut url = Url::parse(&raw).map_err(|err| {
            RpcError::validation(format!("cannot build request URL from '{raw}': {err}"))
        })?;
        // Parsing must not rewrite the path: no dot segments, no query or
        // fragment smuggled in through an identifier.
        let expected = format!("{}{}", self.base_url.path().trim_end_matches('/'), path);
        if url.path() != expected || url.query().is_some() || url.fragment().is_some() {
            return Err(RpcError::validation(format!(
                "request path '{path}' does not map onto a single resource"
            )));
        }
        if !options.is_empty() {
            url.set_query(Some(&options.to_query_string()));
        }
        Ok(url)
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        options: &QueryOptions,
        body: Option<Bytes>,
    ) -> Result<Bytes, RpcError> {
        let url = self.build_url(path, options)?;
        let start = Instant::now();

        tracing::trace!(method = %method, url = %url, "sending rpc request");

        let response = self
            .sender
            .send(HttpRequest {
                method: method.clone(),
                url,
                body,
            })
            .await
            .map_err(|err| {
                tracing::warn!(
                    method = %method,
                    path,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    error = %err,
                    "rpc transport failure"
                );
                RpcError::transport(err)
            })?;

        let status = response.status;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match classify(response) {
            Ok(body) => {
                tracing::debug!(
                    method = %method,
                    path,
                    status,
                    elapsed_ms,
                    bytes = body.len(),
                    "rpc request completed"
                );
                Ok(body)
            }
            Err(err) => {
                tracing::warn!(
                    method = %method,
                    path,
                    status,
                    elapsed_ms,
                    error = %err,
                    "rpc request rejected by node"
                );
                Err(err)
            }
        }
    }
}

/// Turns a completed exchange into either the success body or an RPC error.
/// The error envelope wins over the status code: a 200 carrying the
/// envelope is still a failure.
fn classify(response: HttpResponse) -> Result<Bytes, RpcError> {
    if let Some(errors) = parse_error_envelope(&response.body) {
        return Err(RpcError::Rpc {
            status: response.status,
            errors,
            body: excerpt(&response.body),
        });
    }

    if !response.is_success() {
        return Err(RpcError::Rpc {
            status: response.status,
            errors: Vec::new(),
            body: excerpt(&response.body),
        });
    }

    Ok(response.body)
}
