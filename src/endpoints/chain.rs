//! Resources scoped to a chain rather than to one of its blocks.

use crate::endpoints::block::BlockHeader;
use crate::rpc::client::RpcClient;
use crate::rpc::endpoint::{Endpoint, Scope};
use crate::rpc::error::{NodeError, RpcError};
use crate::rpc::options::QueryOptions;
use crate::rpc::validate::Validate;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub block: BlockHeader,
    pub save_point: i64,
    pub caboose: i64,
    pub history_mode: String,
}

/// A block the node refused, with the errors that invalidated it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidBlock {
    pub block: String,
    pub level: i64,
    #[serde(default)]
    pub errors: Vec<NodeError>,
}

macro_rules! chain_endpoint {
    ($name:ident, $resource:literal, $output:ty, $what:literal) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl Validate for $name {
            fn validate(&self) -> Result<(), RpcError> {
                Ok(())
            }
        }

        impl Endpoint for $name {
            type Output = $output;

            fn scope(&self) -> Scope<'_> {
                Scope::Chain
            }

            fn resource(&self) -> String {
                $resource.to_owned()
            }

            fn describe(&self) -> String {
                concat!("failed to get ", $what).to_owned()
            }
        }
    };
}

chain_endpoint!(ChainIdInput, "chain_id", String, "chain id");
chain_endpoint!(CheckpointInput, "checkpoint", Checkpoint, "checkpoint");
chain_endpoint!(InvalidBlocksInput, "invalid_blocks", Vec<InvalidBlock>, "invalid blocks");

/// Block hashes walking back from the given (or current) heads, one list per
/// requested head. Options are sent as `length`, then one `head` per entry,
/// then `min_date`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlocksInput {
    pub length: u32,
    pub head: Vec<String>,
    /// Unix timestamp; blocks older than this are omitted.
    pub min_date: u64,
}

impl Validate for BlocksInput {
    fn validate(&self) -> Result<(), RpcError> {
        Ok(())
    }
}

impl Endpoint for BlocksInput {
    type Output = Vec<Vec<String>>;

    fn scope(&self) -> Scope<'_> {
        Scope::Chain
    }

    fn resource(&self) -> String {
        "blocks".to_owned()
    }

    fn query(&self) -> QueryOptions {
        let mut options = QueryOptions::new();
        options
            .push_int("length", self.length)
            .push_each("head", self.head.iter().map(String::as_str))
            .push_int("min_date", self.min_date);
        options
    }

    fn describe(&self) -> String {
        "failed to get blocks".to_owned()
    }
}

impl RpcClient {
    pub async fn chain_id(&self) -> Result<String> {
        self.call(&ChainIdInput).await
    }

    pub async fn checkpoint(&self) -> Result<Checkpoint> {
        self.call(&CheckpointInput).await
    }

    pub async fn invalid_blocks(&self) -> Result<Vec<InvalidBlock>> {
        self.call(&InvalidBlocksInput).await
    }

    pub async fn blocks(&self, input: BlocksInput) -> Result<Vec<Vec<String>>> {
        self.call(&input).await
    }
}
