use crate::codec::numeric_string;
use crate::rpc::client::RpcClient;
use crate::rpc::endpoint::{Endpoint, Scope};
use crate::rpc::error::RpcError;
use crate::rpc::validate::{self, Validate};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Identifies a block either by hash, by level, or as the current head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockId {
    Head,
    Level(i64),
    Hash(String),
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockId::Head => f.write_str("head"),
            BlockId::Level(level) => write!(f, "{level}"),
            BlockId::Hash(hash) => f.write_str(hash),
        }
    }
}

impl From<i64> for BlockId {
    fn from(level: i64) -> Self {
        BlockId::Level(level)
    }
}

impl From<&str> for BlockId {
    fn from(hash: &str) -> Self {
        BlockId::Hash(hash.to_owned())
    }
}

impl From<String> for BlockId {
    fn from(hash: String) -> Self {
        BlockId::Hash(hash)
    }
}

/// A block as returned by `../blocks/<block_id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub protocol: String,
    pub chain_id: String,
    pub hash: String,
    pub header: BlockHeader,
    pub metadata: BlockMetadata,
    #[serde(default)]
    pub operations: Vec<Vec<serde_json::Value>>,
}

impl Block {
    pub fn level(&self) -> i64 {
        self.header.level
    }

    /// Cycle of the block, when the metadata carries level information.
    pub fn cycle(&self) -> Option<i64> {
        self.metadata.level.as_ref().map(|level| level.cycle)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub level: i64,
    pub proto: u32,
    pub predecessor: String,
    pub timestamp: DateTime<Utc>,
    pub validation_pass: u32,
    pub operations_hash: String,
    pub fitness: Vec<String>,
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_of_work_nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_nonce_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Unparsed protocol data, as carried by shell-only headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockMetadata {
    pub protocol: String,
    pub next_protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baker: Option<String>,
    /// Newer protocols renamed `level` to `level_info`.
    #[serde(default, alias = "level_info", skip_serializing_if = "Option::is_none")]
    pub level: Option<LevelInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_period_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed_gas: Option<String>,
    #[serde(default)]
    pub balance_updates: Vec<BalanceUpdate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: i64,
    #[serde(default)]
    pub level_position: i64,
    pub cycle: i64,
    pub cycle_position: i64,
    #[serde(default)]
    pub expected_commitment: bool,
}

/// One entry of a block's `balance_updates`. `change` is signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceUpdate {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<i64>,
    #[serde(with = "numeric_string")]
    pub change: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInput {
    pub block: BlockId,
}

impl BlockInput {
    pub fn new(block: impl Into<BlockId>) -> Self {
        Self {
            block: block.into(),
        }
    }
}

impl Validate for BlockInput {
    fn validate(&self) -> Result<(), RpcError> {
        match &self.block {
            BlockId::Hash(hash) => validate::require("block", hash),
            BlockId::Level(level) if *level < 0 => Err(RpcError::validation(format!(
                "block level must not be negative, got {level}"
            ))),
            _ => Ok(()),
        }
    }
}

impl Endpoint for BlockInput {
    type Output = Block;

    fn scope(&self) -> Scope<'_> {
        Scope::Block(Cow::Owned(self.block.to_string()))
    }

    fn resource(&self) -> String {
        String::new()
    }

    fn describe(&self) -> String {
        format!("failed to get block '{}'", self.block)
    }
}

/// The current head of the chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadInput;

impl Validate for HeadInput {
    fn validate(&self) -> Result<(), RpcError> {
        Ok(())
    }
}

impl Endpoint for HeadInput {
    type Output = Block;

    fn scope(&self) -> Scope<'_> {
        Scope::block("head")
    }

    fn resource(&self) -> String {
        String::new()
    }

    fn describe(&self) -> String {
        "failed to get head block".to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationHashesInput {
    pub blockhash: String,
}

impl Validate for OperationHashesInput {
    fn validate(&self) -> Result<(), RpcError> {
        validate::require("blockhash", &self.blockhash)
    }
}

impl Endpoint for OperationHashesInput {
    type Output = Vec<Vec<String>>;

    fn scope(&self) -> Scope<'_> {
        Scope::block(&self.blockhash)
    }

    fn resource(&self) -> String {
        "operation_hashes".to_owned()
    }

    fn describe(&self) -> String {
        "failed to get operation hashes".to_owned()
    }
}

impl RpcClient {
    pub async fn block(&self, block: impl Into<BlockId>) -> Result<Block> {
        self.call(&BlockInput::new(block)).await
    }

    pub async fn head(&self) -> Result<Block> {
        self.call(&HeadInput).await
    }

    /// Operation hashes grouped by validation pass.
    pub async fn operation_hashes(&self, blockhash: impl Into<String>) -> Result<Vec<Vec<String>>> {
        self.call(&OperationHashesInput {
            blockhash: blockhash.into(),
        })
        .await
    }
}
