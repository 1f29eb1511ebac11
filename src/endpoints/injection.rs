use crate::rpc::client::RpcClient;
use crate::rpc::endpoint::{Endpoint, Scope};
use crate::rpc::error::RpcError;
use crate::rpc::options::QueryOptions;
use crate::rpc::sender::Method;
use crate::rpc::validate::{self, Validate};
use anyhow::Result;
use bytes::Bytes;

/// Injects an already forged and signed operation, given as hex. The node
/// answers with the operation hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionOperationInput {
    pub operation: String,
    /// Target chain; the node's default when empty.
    pub chain: String,
    /// Return as soon as the operation is queued instead of after
    /// prevalidation.
    pub is_async: bool,
}

impl Validate for InjectionOperationInput {
    fn validate(&self) -> Result<(), RpcError> {
        validate::require("operation", &self.operation)?;
        if !self.operation.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RpcError::validation("operation must be hex encoded"));
        }
        Ok(())
    }
}

impl Endpoint for InjectionOperationInput {
    type Output = String;

    fn method(&self) -> Method {
        Method::POST
    }

    fn scope(&self) -> Scope<'_> {
        Scope::Node
    }

    fn resource(&self) -> String {
        "injection/operation".to_owned()
    }

    fn query(&self) -> QueryOptions {
        let mut options = QueryOptions::new();
        options
            .push_str("chain", &self.chain)
            .push_flag("async", self.is_async);
        options
    }

    fn body(&self) -> Result<Option<Bytes>, RpcError> {
        serde_json::to_vec(&self.operation)
            .map(|body| Some(Bytes::from(body)))
            .map_err(|err| RpcError::validation(format!("cannot encode operation: {err}")))
    }

    fn describe(&self) -> String {
        "failed to inject operation".to_owned()
    }
}

impl RpcClient {
    pub async fn inject_operation(&self, input: InjectionOperationInput) -> Result<String> {
        self.call(&input).await
    }
}
