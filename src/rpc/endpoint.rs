//! Typed endpoint descriptors. Each RPC endpoint is an input struct that
//! implements [`Endpoint`], naming its path and options along with the shape
//! its response decodes into.
//! [`RpcClient::call`](crate::rpc::RpcClient::call) drives any of them through
//! the same validate -> resolve -> request -> decode pipeline.

use crate::rpc::error::RpcError;
use crate::rpc::options::QueryOptions;
use crate::rpc::sender::Method;
use crate::rpc::validate::Validate;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

/// Where a resource sits in the node's URL space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope<'a> {
    /// `/<resource>`; no chain segment.
    Node,
    /// `/chains/<chain>/<resource>`.
    Chain,
    /// `/chains/<chain>/blocks/<block>/<resource>`.
    Block(Cow<'a, str>),
    /// Block-scoped, where the block is either given directly or derived
    /// from a cycle through the cycle resolver.
    BlockOrCycle { blockhash: &'a str, cycle: u64 },
}

impl<'a> Scope<'a> {
    pub fn block(id: &'a str) -> Self {
        Scope::Block(Cow::Borrowed(id))
    }
}

pub trait Endpoint: Validate + Send + Sync {
    type Output: DecodeResponse + Send;

    fn method(&self) -> Method {
        Method::GET
    }

    fn scope(&self) -> Scope<'_>;

    /// Path below the scope, without a leading slash. May be empty.
    fn resource(&self) -> String;

    fn query(&self) -> QueryOptions {
        QueryOptions::new()
    }

    fn body(&self) -> Result<Option<Bytes>, RpcError> {
        Ok(None)
    }

    /// The `failed to ...` prefix attached to every error of this call.
    fn describe(&self) -> String;
}

/// Conversion from a successful response body into an endpoint's output.
pub trait DecodeResponse: Sized {
    fn decode_response(body: Bytes) -> Result<Self, RpcError>;
}

impl<T: DeserializeOwned> DecodeResponse for T {
    fn decode_response(body: Bytes) -> Result<Self, RpcError> {
        serde_json::from_slice(&body).map_err(|err| RpcError::decode(err, &body))
    }
}

/// Response body handed back verbatim, for endpoints whose payload is
/// consumed as-is (scripts, storage, big map values, raw context bytes).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RawBody(Bytes);

impl RawBody {
    pub fn new(bytes: Bytes) -> Self {
        Self(bytes)
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Parses the body as JSON on demand.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RpcError> {
        serde_json::from_slice(&self.0).map_err(|err| RpcError::decode(err, &self.0))
    }
}

impl DecodeResponse for RawBody {
    fn decode_response(body: Bytes) -> Result<Self, RpcError> {
        Ok(Self(body))
    }
}

impl Deref for RawBody {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for RawBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(text) => f.debug_tuple("RawBody").field(&text).finish(),
            None => f.debug_tuple("RawBody").field(&self.0.len()).finish(),
        }
    }
}

/// Joins a scope prefix and resource without doubling or dangling slashes.
pub(crate) fn join_path(prefix: &str, resource: &str) -> String {
    let resource = resource.trim_start_matches('/');
    match (prefix.is_empty(), resource.is_empty()) {
        (true, true) => "/".to_owned(),
        (true, false) => format!("/{resource}"),
        (false, true) => prefix.to_owned(),
        (false, false) => format!("{prefix}/{resource}"),
    }
}
