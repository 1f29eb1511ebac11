use crate::codec::{numeric_string, NumericString};
use crate::rpc::client::RpcClient;
use crate::rpc::endpoint::{Endpoint, Scope};
use crate::rpc::error::RpcError;
use crate::rpc::options::QueryOptions;
use crate::rpc::validate::{self, Validate};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Full delegate record at a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegate {
    pub balance: String,
    pub frozen_balance: String,
    #[serde(default)]
    pub frozen_balance_by_cycle: Vec<FrozenBalanceByCycle>,
    pub staking_balance: String,
    #[serde(default)]
    pub delegated_contracts: Vec<String>,
    pub delegated_balance: String,
    pub deactivated: bool,
    pub grace_period: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voting_power: Option<i64>,
}

/// Frozen amounts of one cycle in a delegate's `frozen_balance_by_cycle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenBalanceByCycle {
    pub cycle: i64,
    #[serde(alias = "deposits", with = "numeric_string")]
    pub deposit: i64,
    #[serde(with = "numeric_string")]
    pub fees: i64,
    #[serde(with = "numeric_string")]
    pub rewards: i64,
}

/// Frozen deposits, fees and rewards recorded for one cycle in the raw
/// context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenBalance {
    #[serde(with = "numeric_string")]
    pub deposits: i64,
    #[serde(with = "numeric_string")]
    pub fees: i64,
    #[serde(with = "numeric_string")]
    pub rewards: i64,
}

/// Delegate endpoints keyed by a block and a public key hash.
macro_rules! delegate_endpoint {
    ($(#[$meta:meta])* $name:ident, $suffix:literal, $output:ty, $what:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub blockhash: String,
            pub delegate: String,
        }

        impl $name {
            pub fn new(blockhash: impl Into<String>, delegate: impl Into<String>) -> Self {
                Self {
                    blockhash: blockhash.into(),
                    delegate: delegate.into(),
                }
            }
        }

        impl Validate for $name {
            fn validate(&self) -> Result<(), RpcError> {
                validate::require("blockhash", &self.blockhash)?;
                validate::require("delegate", &self.delegate)
            }
        }

        impl Endpoint for $name {
            type Output = $output;

            fn scope(&self) -> Scope<'_> {
                Scope::block(&self.blockhash)
            }

            fn resource(&self) -> String {
                format!(concat!("context/delegates/{}", $suffix), self.delegate)
            }

            fn describe(&self) -> String {
                format!(concat!("failed to get delegate '{}'", $what), self.delegate)
            }
        }
    };
}

delegate_endpoint!(DelegateInput, "", Delegate, "");
delegate_endpoint!(DelegateBalanceInput, "/balance", String, " balance");
delegate_endpoint!(
    /// Whether the delegate has been deactivated for inactivity.
    DelegateDeactivatedInput,
    "/deactivated",
    bool,
    " activation status"
);
delegate_endpoint!(
    DelegateDelegatedBalanceInput,
    "/delegated_balance",
    String,
    " delegated balance"
);
delegate_endpoint!(
    DelegateDelegatedContractsInput,
    "/delegated_contracts",
    Vec<String>,
    " delegated contracts"
);
delegate_endpoint!(
    DelegateFrozenBalanceInput,
    "/frozen_balance",
    String,
    " frozen balance"
);
delegate_endpoint!(
    DelegateFrozenBalanceByCycleInput,
    "/frozen_balance_by_cycle",
    Vec<FrozenBalanceByCycle>,
    " frozen balance at cycle"
);
delegate_endpoint!(
    /// Cycle at which the delegate will be deactivated if it stays idle.
    DelegateGracePeriodInput,
    "/grace_period",
    i64,
    " grace period"
);
delegate_endpoint!(
    DelegateStakingBalanceInput,
    "/staking_balance",
    String,
    " staking balance"
);
delegate_endpoint!(
    /// Rolls counted for voting.
    DelegateVotingPowerInput,
    "/voting_power",
    i64,
    " voting power"
);

/// Lists delegates, optionally filtered by activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelegatesInput {
    pub blockhash: String,
    pub active: bool,
    pub inactive: bool,
}

impl Validate for DelegatesInput {
    fn validate(&self) -> Result<(), RpcError> {
        validate::require("blockhash", &self.blockhash)
    }
}

impl Endpoint for DelegatesInput {
    type Output = Vec<String>;

    fn scope(&self) -> Scope<'_> {
        Scope::block(&self.blockhash)
    }

    fn resource(&self) -> String {
        "context/delegates".to_owned()
    }

    fn query(&self) -> QueryOptions {
        let mut options = QueryOptions::new();
        options
            .push_flag("active", self.active)
            .push_flag("inactive", self.inactive);
        options
    }

    fn describe(&self) -> String {
        "failed to get delegates".to_owned()
    }
}

/// Staking balance at a block, or at the snapshot block of a cycle. Exactly
/// one of `blockhash` and `cycle` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StakingBalanceInput {
    pub blockhash: String,
    pub cycle: u64,
    pub delegate: String,
}

impl Validate for StakingBalanceInput {
    fn validate(&self) -> Result<(), RpcError> {
        validate::blockhash_xor_cycle(&self.blockhash, self.cycle)?;
        validate::require("delegate", &self.delegate)
    }
}

impl Endpoint for StakingBalanceInput {
    type Output = NumericString;

    fn scope(&self) -> Scope<'_> {
        Scope::BlockOrCycle {
            blockhash: &self.blockhash,
            cycle: self.cycle,
        }
    }

    fn resource(&self) -> String {
        format!("context/delegates/{}/staking_balance", self.delegate)
    }

    fn describe(&self) -> String {
        format!("could not get staking balance for '{}'", self.delegate)
    }
}

/// Frozen balance a delegate holds for `cycle`, read at that cycle's
/// snapshot block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrozenBalanceInput {
    pub cycle: u64,
    pub delegate: String,
}

impl Validate for FrozenBalanceInput {
    fn validate(&self) -> Result<(), RpcError> {
        validate::require_nonzero("cycle", self.cycle)?;
        validate::require("delegate", &self.delegate)
    }
}

impl Endpoint for FrozenBalanceInput {
    type Output = FrozenBalance;

    fn scope(&self) -> Scope<'_> {
        Scope::BlockOrCycle {
            blockhash: "",
            cycle: self.cycle,
        }
    }

    fn resource(&self) -> String {
        format!(
            "context/raw/json/contracts/index/{}/frozen_balance/{}",
            self.delegate, self.cycle
        )
    }

    fn describe(&self) -> String {
        format!(
            "failed to get frozen balance for '{}' at cycle '{}'",
            self.delegate, self.cycle
        )
    }
}

impl RpcClient {
    pub async fn delegates(&self, input: DelegatesInput) -> Result<Vec<String>> {
        self.call(&input).await
    }

    pub async fn delegate(&self, input: DelegateInput) -> Result<Delegate> {
        self.call(&input).await
    }

    pub async fn delegate_balance(&self, input: DelegateBalanceInput) -> Result<String> {
        self.call(&input).await
    }

    pub async fn delegate_deactivated(&self, input: DelegateDeactivatedInput) -> Result<bool> {
        self.call(&input).await
    }

    pub async fn delegate_delegated_balance(
        &self,
        input: DelegateDelegatedBalanceInput,
    ) -> Result<String> {
        self.call(&input).await
    }

    pub async fn delegate_delegated_contracts(
        &self,
        input: DelegateDelegatedContractsInput,
    ) -> Result<Vec<String>> {
        self.call(&input).await
    }

    pub async fn delegate_frozen_balance(
        &self,
        input: DelegateFrozenBalanceInput,
    ) -> Result<String> {
        self.call(&input).await
    }

    pub async fn delegate_frozen_balance_by_cycle(
        &self,
        input: DelegateFrozenBalanceByCycleInput,
    ) -> Result<Vec<FrozenBalanceByCycle>> {
        self.call(&input).await
    }

    pub async fn delegate_grace_period(&self, input: DelegateGracePeriodInput) -> Result<i64> {
        self.call(&input).await
    }

    pub async fn delegate_staking_balance(
        &self,
        input: DelegateStakingBalanceInput,
    ) -> Result<String> {
        self.call(&input).await
    }

    pub async fn delegate_voting_power(&self, input: DelegateVotingPowerInput) -> Result<i64> {
        self.call(&input).await
    }

    /// Staking balance in mutez; resolves `cycle` to its snapshot block first.
    pub async fn staking_balance(&self, input: StakingBalanceInput) -> Result<i64> {
        self.call(&input).await.map(NumericString::get)
    }

    pub async fn frozen_balance(&self, input: FrozenBalanceInput) -> Result<FrozenBalance> {
        self.call(&input).await
    }
}
