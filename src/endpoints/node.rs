//! Node-level resources, served outside any `/chains/<chain>` prefix.

use crate::rpc::client::RpcClient;
use crate::rpc::endpoint::{Endpoint, Scope};
use crate::rpc::error::RpcError;
use crate::rpc::validate::Validate;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub version: NodeVersion,
    pub network_version: NetworkVersion,
    pub commit_info: CommitInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeVersion {
    pub major: i64,
    pub minor: i64,
    pub additional_info: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkVersion {
    pub chain_name: String,
    pub distributed_db_version: i64,
    pub p2p_version: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    pub commit_hash: String,
    pub commit_date: String,
}

/// One chain the node is currently following. Test chains report their
/// protocol and expiration; stopped chains report only `stopping`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveChain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopping: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionInput;

impl Validate for VersionInput {
    fn validate(&self) -> Result<(), RpcError> {
        Ok(())
    }
}

impl Endpoint for VersionInput {
    type Output = Version;

    fn scope(&self) -> Scope<'_> {
        Scope::Node
    }

    fn resource(&self) -> String {
        "version".to_owned()
    }

    fn describe(&self) -> String {
        "failed to get version".to_owned()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveChainsInput;

impl Validate for ActiveChainsInput {
    fn validate(&self) -> Result<(), RpcError> {
        Ok(())
    }
}

impl Endpoint for ActiveChainsInput {
    type Output = Vec<ActiveChain>;

    fn scope(&self) -> Scope<'_> {
        Scope::Node
    }

    fn resource(&self) -> String {
        "monitor/active_chains".to_owned()
    }

    fn describe(&self) -> String {
        "failed to get active chains".to_owned()
    }
}

impl RpcClient {
    pub async fn version(&self) -> Result<Version> {
        self.call(&VersionInput).await
    }

    pub async fn active_chains(&self) -> Result<Vec<ActiveChain>> {
        self.call(&ActiveChainsInput).await
    }
}
