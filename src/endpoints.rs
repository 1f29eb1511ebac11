//! Typed endpoint surface. Each submodule groups the input structs and
//! response types of one area of the node's RPC tree and adds the matching
//! named methods to [`RpcClient`](crate::rpc::RpcClient).

pub mod block;
pub mod chain;
pub mod context;
pub mod contract;
pub mod delegate;
pub mod injection;
pub mod node;
pub mod rights;

pub use block::{
    BalanceUpdate, Block, BlockHeader, BlockId, BlockInput, BlockMetadata, HeadInput, LevelInfo,
    OperationHashesInput,
};
pub use chain::{BlocksInput, ChainIdInput, Checkpoint, CheckpointInput, InvalidBlock, InvalidBlocksInput};
pub use context::{
    BigMapInput, Constants, ConstantsInput, CycleInfo, CycleInfoInput, Nonces, NoncesInput,
    RawBytesInput, SeedInput,
};
pub use contract::{
    Contract, ContractBalanceInput, ContractCounterInput, ContractDelegateInput,
    ContractEntrypointInput, ContractEntrypointsInput, ContractInput, ContractManagerKeyInput,
    ContractScriptInput, ContractStorageInput, ContractsInput, Entrypoints,
};
pub use delegate::{
    Delegate, DelegateBalanceInput, DelegateDeactivatedInput, DelegateDelegatedBalanceInput,
    DelegateDelegatedContractsInput, DelegateFrozenBalanceByCycleInput, DelegateFrozenBalanceInput,
    DelegateGracePeriodInput, DelegateInput, DelegateStakingBalanceInput, DelegateVotingPowerInput,
    DelegatesInput, FrozenBalance, FrozenBalanceByCycle, FrozenBalanceInput, StakingBalanceInput,
};
pub use injection::InjectionOperationInput;
pub use node::{ActiveChain, ActiveChainsInput, Version, VersionInput};
pub use rights::{BakingRight, BakingRightsInput, EndorsingRight, EndorsingRightsInput};
