//! Planet upgrades: three branches, each with its own multiplier ladder.
//!
//! Stats are never mutated incrementally. Buying a rank bumps the branch
//! counter and recomputes everything from the base table, so the same
//! upgrade state always yields the same stats regardless of purchase order.

use crate::command::EngineError;
use crate::config::GameConfig;
use crate::planet::{Planet, base_stats};
use serde::{Deserialize, Serialize};

/// The three upgrade branches. The index doubles as the slot in
/// [`crate::planet::UpgradeState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeBranch {
    Defense,
    Range,
    Speed,
}

impl UpgradeBranch {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Per-rank multiplier on the branch's own stat, in percent.
const BRANCH_STAT_PCT: [u64; 3] = [120, 125, 150];

/// Every rank in any branch also compounds energy cap and growth by this
/// much, in percent.
const ENERGY_PCT: u64 = 120;

/// Cost of buying rank `r+1` (0-indexed current rank `r`), as a percentage
/// of the planet's silver cap.
fn rank_cost_pct(current_rank: u8) -> u64 {
    20 * (u64::from(current_rank) + 1)
}

/// Multiply `value` by `pct`% `times` times, truncating each step.
fn compound(value: u64, pct: u64, times: u8) -> u64 {
    let mut out = u128::from(value);
    for _ in 0..times {
        out = out * u128::from(pct) / 100;
    }
    out as u64
}

/// Recompute a planet's current stats from its base table row and upgrade
/// state. Energy and silver balances are untouched; only caps, rates, and
/// combat stats change.
pub fn recompute_stats(planet: &mut Planet) {
    let base = base_stats(planet.level, planet.space_type, planet.resource);
    let ranks = planet.upgrades.0;
    let total = planet.upgrades.total();

    planet.energy_cap = compound(base.energy_cap, ENERGY_PCT, total);
    planet.energy_growth = compound(base.energy_growth, ENERGY_PCT, total);
    planet.silver_cap = base.silver_cap;
    planet.silver_growth = base.silver_growth;
    planet.defense = compound(
        base.defense,
        BRANCH_STAT_PCT[UpgradeBranch::Defense.index()],
        ranks[UpgradeBranch::Defense.index()],
    );
    planet.range = compound(
        base.range,
        BRANCH_STAT_PCT[UpgradeBranch::Range.index()],
        ranks[UpgradeBranch::Range.index()],
    );
    planet.speed = compound(
        base.speed,
        BRANCH_STAT_PCT[UpgradeBranch::Speed.index()],
        ranks[UpgradeBranch::Speed.index()],
    );
}

/// Buy one rank of `branch` on an already-current planet. Validates rank
/// ceilings and silver before touching anything.
pub fn apply_upgrade(
    planet: &mut Planet,
    branch: UpgradeBranch,
    config: &GameConfig,
) -> Result<u8, EngineError> {
    let rank = planet.upgrades.0[branch.index()];
    if rank >= config.max_branch_rank
        || planet.upgrades.total() >= planet.space_type.max_total_upgrades()
    {
        return Err(EngineError::MaxUpgradeLevel);
    }
    let cost = planet.silver_cap * rank_cost_pct(rank) / 100;
    if cost > planet.silver {
        return Err(EngineError::InsufficientSilver {
            requested: cost,
            available: planet.silver,
        });
    }

    planet.silver -= cost;
    planet.silver_spent += cost;
    planet.upgrades.0[branch.index()] = rank + 1;
    recompute_stats(planet);
    Ok(rank + 1)
}
