use crate::codec::{numeric_string, NumericString};
use crate::rpc::client::RpcClient;
use crate::rpc::endpoint::{Endpoint, RawBody, Scope};
use crate::rpc::error::RpcError;
use crate::rpc::validate::{self, Validate};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contract state at a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub balance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delegate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<serde_json::Value>,
    #[serde(
        default,
        with = "numeric_string::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub counter: Option<i64>,
}

/// Entrypoint name to parameter type, in Micheline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrypoints {
    #[serde(default)]
    pub entrypoints: BTreeMap<String, serde_json::Value>,
}

/// Every contract endpoint is keyed by a block and a contract id; they differ
/// only in the resource below `context/contracts/<id>` and the output.
macro_rules! contract_endpoint {
    ($(#[$meta:meta])* $name:ident, $suffix:literal, $output:ty, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub blockhash: String,
            pub contract_id: String,
        }

        impl $name {
            pub fn new(blockhash: impl Into<String>, contract_id: impl Into<String>) -> Self {
                Self {
                    blockhash: blockhash.into(),
                    contract_id: contract_id.into(),
                }
            }
        }

        impl Validate for $name {
            fn validate(&self) -> Result<(), RpcError> {
                validate::require("blockhash", &self.blockhash)?;
                validate::require("contract_id", &self.contract_id)
            }
        }

        impl Endpoint for $name {
            type Output = $output;

            fn scope(&self) -> Scope<'_> {
                Scope::block(&self.blockhash)
            }

            fn resource(&self) -> String {
                format!(concat!("context/contracts/{}", $suffix), self.contract_id)
            }

            fn describe(&self) -> String {
                format!(concat!("failed to get ", $what, " '{}'"), self.contract_id)
            }
        }
    };
}

contract_endpoint!(ContractInput, "", Contract, "contract");
contract_endpoint!(ContractBalanceInput, "/balance", String, "balance for contract");
contract_endpoint!(ContractCounterInput, "/counter", NumericString, "counter for contract");
contract_endpoint!(ContractDelegateInput, "/delegate", String, "delegate for contract");
contract_endpoint!(
    ContractEntrypointsInput,
    "/entrypoints",
    Entrypoints,
    "entrypoints for contract"
);
contract_endpoint!(
    /// Public key revealed by the contract's manager.
    ContractManagerKeyInput,
    "/manager_key",
    String,
    "manager for contract"
);
contract_endpoint!(
    /// Michelson script in its JSON form, returned verbatim.
    ContractScriptInput,
    "/script",
    RawBody,
    "script for contract"
);
contract_endpoint!(
    /// Michelson storage in its JSON form, returned verbatim.
    ContractStorageInput,
    "/storage",
    RawBody,
    "storage for contract"
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractsInput {
    pub blockhash: String,
}

impl Validate for ContractsInput {
    fn validate(&self) -> Result<(), RpcError> {
        validate::require("blockhash", &self.blockhash)
    }
}

impl Endpoint for ContractsInput {
    type Output = Vec<String>;

    fn scope(&self) -> Scope<'_> {
        Scope::block(&self.blockhash)
    }

    fn resource(&self) -> String {
        "context/contracts".to_owned()
    }

    fn describe(&self) -> String {
        "failed to get contracts".to_owned()
    }
}

/// Type of a single entrypoint's parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractEntrypointInput {
    pub blockhash: String,
    pub contract_id: String,
    pub entrypoint: String,
}

impl Validate for ContractEntrypointInput {
    fn validate(&self) -> Result<(), RpcError> {
        validate::require("blockhash", &self.blockhash)?;
        validate::require("contract_id", &self.contract_id)?;
        validate::require("entrypoint", &self.entrypoint)
    }
}

impl Endpoint for ContractEntrypointInput {
    type Output = serde_json::Value;

    fn scope(&self) -> Scope<'_> {
        Scope::block(&self.blockhash)
    }

    fn resource(&self) -> String {
        format!(
            "context/contracts/{}/entrypoints/{}",
            self.contract_id, self.entrypoint
        )
    }

    fn describe(&self) -> String {
        format!(
            "failed to get entrypoint '{}' for contract '{}'",
            self.entrypoint, self.contract_id
        )
    }
}

impl RpcClient {
    pub async fn contracts(&self, blockhash: impl Into<String>) -> Result<Vec<String>> {
        self.call(&ContractsInput {
            blockhash: blockhash.into(),
        })
        .await
    }

    pub async fn contract(&self, input: ContractInput) -> Result<Contract> {
        self.call(&input).await
    }

    /// Spendable balance in mutez, as the decimal string the node returns.
    pub async fn contract_balance(&self, input: ContractBalanceInput) -> Result<String> {
        self.call(&input).await
    }

    pub async fn contract_counter(&self, input: ContractCounterInput) -> Result<i64> {
        self.call(&input).await.map(NumericString::get)
    }

    pub async fn contract_delegate(&self, input: ContractDelegateInput) -> Result<String> {
        self.call(&input).await
    }

    pub async fn contract_entrypoints(&self, input: ContractEntrypointsInput) -> Result<Entrypoints> {
        self.call(&input).await
    }

    pub async fn contract_entrypoint(
        &self,
        input: ContractEntrypointInput,
    ) -> Result<serde_json::Value> {
        self.call(&input).await
    }

    pub async fn contract_manager_key(&self, input: ContractManagerKeyInput) -> Result<String> {
        self.call(&input).await
    }

    pub async fn contract_script(&self, input: ContractScriptInput) -> Result<RawBody> {
        self.call(&input).await
    }

    pub async fn contract_storage(&self, input: ContractStorageInput) -> Result<RawBody> {
        self.call(&input).await
    }
}
