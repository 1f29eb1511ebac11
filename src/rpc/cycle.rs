//! Cycle indirection. Endpoints that accept either a block hash or a cycle
//! are served at the block holding that cycle's roll snapshot; this module
//! finds it.

use crate::endpoints::block::{BlockId, BlockInput, HeadInput};
use crate::endpoints::context::{ConstantsInput, CycleInfoInput};
use crate::rpc::client::RpcClient;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Snapshot descriptor for one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub random_seed: String,
    pub roll_snapshot: i64,
    /// Hash of the block at which the cycle's roll snapshot was taken.
    pub block_hash: String,
}

impl RpcClient {
    /// Returns `blockhash` untouched when `cycle` is zero; otherwise the hash
    /// of the cycle's snapshot block, ignoring `blockhash`.
    pub async fn resolve_block_hash(&self, cycle: u64, blockhash: &str) -> Result<String> {
        if cycle == 0 {
            return Ok(blockhash.to_owned());
        }

        let snapshot = self
            .cycle(cycle)
            .await
            .with_context(|| format!("failed to get cycle: {cycle}"))?;
        Ok(snapshot.block_hash)
    }

    /// Fetches the snapshot descriptor of `cycle`. Nothing is cached; every
    /// call reads head, constants and the cycle record afresh.
    pub async fn cycle(&self, cycle: u64) -> Result<Cycle> {
        let wanted = i64::try_from(cycle)
            .with_context(|| format!("cycle {cycle} does not fit the node's cycle range"))?;

        let head = self.call_direct(&HeadInput).await?;
        let constants = self
            .call_direct(&ConstantsInput::new(head.hash.clone()))
            .await?;

        let current = head.cycle().with_context(|| {
            format!("head block '{}' does not report its cycle", head.hash)
        })?;
        if wanted > current + constants.preserved_cycles - 1 {
            bail!(
                "could not get cycle '{cycle}': request is in the future (head is at cycle {current})"
            );
        }

        let info_block = if wanted < current {
            let first_level = wanted * constants.blocks_per_cycle + 1;
            self.call_direct(&BlockInput::new(BlockId::Level(first_level)))
                .await?
                .hash
        } else {
            head.hash.clone()
        };

        let info = self
            .call_direct(&CycleInfoInput::new(info_block, cycle))
            .await?;

        let level = snapshot_level(
            wanted,
            info.roll_snapshot,
            constants.preserved_cycles,
            constants.blocks_per_cycle,
            constants.blocks_per_roll_snapshot,
        );
        tracing::debug!(cycle, roll_snapshot = info.roll_snapshot, level, "resolved snapshot level");

        let snapshot_block = self
            .call_direct(&BlockInput::new(BlockId::Level(level)))
            .await?;

        Ok(Cycle {
            random_seed: info.random_seed,
            roll_snapshot: info.roll_snapshot,
            block_hash: snapshot_block.hash,
        })
    }
}

/// Level of the block holding the roll snapshot used for `cycle`, never
/// below the first level.
fn snapshot_level(
    cycle: i64,
    roll_snapshot: i64,
    preserved_cycles: i64,
    blocks_per_cycle: i64,
    blocks_per_roll_snapshot: i64,
) -> i64 {
    let level = (cycle - preserved_cycles - 2) * blocks_per_cycle
        + (roll_snapshot + 1) * blocks_per_roll_snapshot;
    level.max(1)
}
