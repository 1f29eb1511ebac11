use crate::rpc::client::RpcClient;
use crate::rpc::endpoint::{Endpoint, Scope};
use crate::rpc::error::RpcError;
use crate::rpc::options::QueryOptions;
use crate::rpc::validate::{self, Validate};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One baking slot. `estimated_time` is omitted by the node for past levels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BakingRight {
    pub level: i64,
    pub delegate: String,
    pub priority: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorsingRight {
    pub level: i64,
    pub delegate: String,
    pub slots: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<DateTime<Utc>>,
}

/// Baking rights at a block, narrowed by the optional filters. Options are
/// sent as `cycle`, `delegate`, `level`, `max_priority`, `all`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BakingRightsInput {
    pub blockhash: String,
    pub level: u64,
    pub cycle: u64,
    pub delegate: String,
    pub max_priority: u32,
    /// Return every slot of every baker instead of just the best one.
    pub all: bool,
}

impl Validate for BakingRightsInput {
    fn validate(&self) -> Result<(), RpcError> {
        validate::require("blockhash", &self.blockhash)
    }
}

impl Endpoint for BakingRightsInput {
    type Output = Vec<BakingRight>;

    fn scope(&self) -> Scope<'_> {
        Scope::block(&self.blockhash)
    }

    fn resource(&self) -> String {
        "helpers/baking_rights".to_owned()
    }

    fn query(&self) -> QueryOptions {
        let mut options = QueryOptions::new();
        options
            .push_int("cycle", self.cycle)
            .push_str("delegate", &self.delegate)
            .push_int("level", self.level)
            .push_int("max_priority", self.max_priority)
            .push_flag("all", self.all);
        options
    }

    fn describe(&self) -> String {
        "failed to get baking rights".to_owned()
    }
}

/// Endorsing rights at a block. Options are sent as `cycle`, `delegate`,
/// `level`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndorsingRightsInput {
    pub blockhash: String,
    pub level: u64,
    pub cycle: u64,
    pub delegate: String,
}

impl Validate for EndorsingRightsInput {
    fn validate(&self) -> Result<(), RpcError> {
        validate::require("blockhash", &self.blockhash)
    }
}

impl Endpoint for EndorsingRightsInput {
    type Output = Vec<EndorsingRight>;

    fn scope(&self) -> Scope<'_> {
        Scope::block(&self.blockhash)
    }

    fn resource(&self) -> String {
        "helpers/endorsing_rights".to_owned()
    }

    fn query(&self) -> QueryOptions {
        let mut options = QueryOptions::new();
        options
            .push_int("cycle", self.cycle)
            .push_str("delegate", &self.delegate)
            .push_int("level", self.level);
        options
    }

    fn describe(&self) -> String {
        "failed to get endorsing rights".to_owned()
    }
}

impl RpcClient {
    pub async fn baking_rights(&self, input: BakingRightsInput) -> Result<Vec<BakingRight>> {
        self.call(&input).await
    }

    pub async fn endorsing_rights(&self, input: EndorsingRightsInput) -> Result<Vec<EndorsingRight>> {
        self.call(&input).await
    }
}
