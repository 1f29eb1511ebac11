use crate::codec::numeric_string;
use crate::rpc::client::RpcClient;
use crate::rpc::endpoint::{Endpoint, RawBody, Scope};
use crate::rpc::error::RpcError;
use crate::rpc::options::QueryOptions;
use crate::rpc::sender::Method;
use crate::rpc::validate::{self, Validate};
use anyhow::Result;
use bytes::Bytes;
use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};

/// Protocol constants at a block. Amounts the node renders as strings are
/// decoded to integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constants {
    pub proof_of_work_nonce_size: i64,
    pub nonce_length: i64,
    pub max_revelations_per_block: i64,
    pub max_operation_data_length: i64,
    #[serde(default)]
    pub max_proposals_per_delegate: i64,
    pub preserved_cycles: i64,
    pub blocks_per_cycle: i64,
    pub blocks_per_commitment: i64,
    pub blocks_per_roll_snapshot: i64,
    pub blocks_per_voting_period: i64,
    #[serde(with = "numeric_string::vec")]
    pub time_between_blocks: Vec<i64>,
    pub endorsers_per_block: i64,
    #[serde(with = "numeric_string")]
    pub hard_gas_limit_per_operation: i64,
    #[serde(with = "numeric_string")]
    pub hard_gas_limit_per_block: i64,
    #[serde(with = "numeric_string")]
    pub proof_of_work_threshold: i64,
    #[serde(with = "numeric_string")]
    pub tokens_per_roll: i64,
    pub michelson_maximum_type_size: i64,
    #[serde(with = "numeric_string")]
    pub seed_nonce_revelation_tip: i64,
    pub origination_size: i64,
    #[serde(with = "numeric_string")]
    pub block_security_deposit: i64,
    #[serde(with = "numeric_string")]
    pub endorsement_security_deposit: i64,
    #[serde(default, with = "numeric_string::vec")]
    pub baking_reward_per_endorsement: Vec<i64>,
    #[serde(default, with = "numeric_string::vec")]
    pub endorsement_reward: Vec<i64>,
    #[serde(with = "numeric_string")]
    pub cost_per_byte: i64,
    #[serde(with = "numeric_string")]
    pub hard_storage_limit_per_operation: i64,
    #[serde(default, with = "numeric_string::option")]
    pub test_chain_duration: Option<i64>,
    #[serde(default)]
    pub quorum_min: i64,
    #[serde(default)]
    pub quorum_max: i64,
    #[serde(default)]
    pub min_proposal_quorum: i64,
    #[serde(default)]
    pub initial_endorsers: i64,
    #[serde(default, with = "numeric_string::option")]
    pub delay_per_missing_endorsement: Option<i64>,
}

/// Seed nonce status at a level. The node answers `{}` once the nonce has
/// been forgotten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Nonces {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub forgotten: bool,
}

impl<'de> Deserialize<'de> for Nonces {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Wire {
            nonce: Option<String>,
            hash: Option<String>,
        }

        let wire = Wire::deserialize(deserializer)?;
        match (wire.nonce, wire.hash) {
            (Some(_), Some(_)) => Err(D::Error::custom(
                "nonce status carries both a revealed nonce and a hash",
            )),
            (None, None) => Ok(Nonces {
                forgotten: true,
                ..Nonces::default()
            }),
            (nonce, hash) => Ok(Nonces {
                nonce,
                hash,
                forgotten: false,
            }),
        }
    }
}

/// Raw cycle record stored in the context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleInfo {
    pub random_seed: String,
    pub roll_snapshot: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantsInput {
    pub blockhash: String,
}

impl ConstantsInput {
    pub fn new(blockhash: impl Into<String>) -> Self {
        Self {
            blockhash: blockhash.into(),
        }
    }
}

impl Validate for ConstantsInput {
    fn validate(&self) -> Result<(), RpcError> {
        validate::require("blockhash", &self.blockhash)
    }
}

impl Endpoint for ConstantsInput {
    type Output = Constants;

    fn scope(&self) -> Scope<'_> {
        Scope::block(&self.blockhash)
    }

    fn resource(&self) -> String {
        "context/constants".to_owned()
    }

    fn describe(&self) -> String {
        "failed to get constants".to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoncesInput {
    pub blockhash: String,
    pub level: u64,
}

impl Validate for NoncesInput {
    fn validate(&self) -> Result<(), RpcError> {
        validate::require("blockhash", &self.blockhash)?;
        validate::require_nonzero("level", self.level)
    }
}

impl Endpoint for NoncesInput {
    type Output = Nonces;

    fn scope(&self) -> Scope<'_> {
        Scope::block(&self.blockhash)
    }

    fn resource(&self) -> String {
        format!("context/nonces/{}", self.level)
    }

    fn describe(&self) -> String {
        format!("failed to get nonces at level '{}'", self.level)
    }
}

/// Raw context bytes, optionally bounded by `depth`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBytesInput {
    pub blockhash: String,
    pub depth: u32,
}

impl Validate for RawBytesInput {
    fn validate(&self) -> Result<(), RpcError> {
        validate::require("blockhash", &self.blockhash)
    }
}

impl Endpoint for RawBytesInput {
    type Output = RawBody;

    fn scope(&self) -> Scope<'_> {
        Scope::block(&self.blockhash)
    }

    fn resource(&self) -> String {
        "context/raw/bytes".to_owned()
    }

    fn query(&self) -> QueryOptions {
        let mut options = QueryOptions::new();
        options.push_int("depth", self.depth);
        options
    }

    fn describe(&self) -> String {
        "failed to get raw bytes".to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInput {
    pub blockhash: String,
}

impl Validate for SeedInput {
    fn validate(&self) -> Result<(), RpcError> {
        validate::require("blockhash", &self.blockhash)
    }
}

impl Endpoint for SeedInput {
    type Output = String;

    fn method(&self) -> Method {
        Method::POST
    }

    fn scope(&self) -> Scope<'_> {
        Scope::block(&self.blockhash)
    }

    fn resource(&self) -> String {
        "context/seed".to_owned()
    }

    fn body(&self) -> Result<Option<Bytes>, RpcError> {
        Ok(Some(Bytes::from_static(b"{}")))
    }

    fn describe(&self) -> String {
        "failed to get seed".to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleInfoInput {
    pub blockhash: String,
    pub cycle: u64,
}

impl CycleInfoInput {
    pub fn new(blockhash: impl Into<String>, cycle: u64) -> Self {
        Self {
            blockhash: blockhash.into(),
            cycle,
        }
    }
}

impl Validate for CycleInfoInput {
    fn validate(&self) -> Result<(), RpcError> {
        validate::require("blockhash", &self.blockhash)
    }
}

impl Endpoint for CycleInfoInput {
    type Output = CycleInfo;

    fn scope(&self) -> Scope<'_> {
        Scope::block(&self.blockhash)
    }

    fn resource(&self) -> String {
        format!("context/raw/json/cycle/{}", self.cycle)
    }

    fn describe(&self) -> String {
        format!("failed to get cycle info '{}'", self.cycle)
    }
}

/// A big map value looked up by its script expression hash. Id 0 is the
/// first big map ever allocated; negative ids name temporary maps that
/// never reach the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigMapInput {
    pub blockhash: String,
    pub big_map_id: i64,
    pub script_expression: String,
}

impl Validate for BigMapInput {
    fn validate(&self) -> Result<(), RpcError> {
        validate::require("blockhash", &self.blockhash)?;
        if self.big_map_id < 0 {
            return Err(RpcError::validation(format!(
                "big_map_id must not be negative, got {}",
                self.big_map_id
            )));
        }
        validate::require("script_expression", &self.script_expression)
    }
}

impl Endpoint for BigMapInput {
    type Output = RawBody;

    fn scope(&self) -> Scope<'_> {
        Scope::block(&self.blockhash)
    }

    fn resource(&self) -> String {
        format!(
            "context/big_maps/{}/{}",
            self.big_map_id, self.script_expression
        )
    }

    fn describe(&self) -> String {
        format!("failed to get big map '{}'", self.big_map_id)
    }
}

impl RpcClient {
    pub async fn constants(&self, blockhash: impl Into<String>) -> Result<Constants> {
        self.call(&ConstantsInput::new(blockhash)).await
    }

    pub async fn nonces(&self, input: NoncesInput) -> Result<Nonces> {
        self.call(&input).await
    }

    pub async fn raw_bytes(&self, input: RawBytesInput) -> Result<RawBody> {
        self.call(&input).await
    }

    pub async fn seed(&self, blockhash: impl Into<String>) -> Result<String> {
        self.call(&SeedInput {
            blockhash: blockhash.into(),
        })
        .await
    }

    pub async fn cycle_info(&self, blockhash: impl Into<String>, cycle: u64) -> Result<CycleInfo> {
        self.call(&CycleInfoInput::new(blockhash, cycle)).await
    }

    pub async fn big_map(&self, input: BigMapInput) -> Result<RawBody> {
        self.call(&input).await
    }
}
