//! The lazy update engine.
//!
//! A planet's canonical state is only ever as fresh as its `last_updated`
//! stamp. [`update_planet`] folds in everything that happened since: the
//! continuous energy/silver growth of each quiet sub-interval, and the
//! discrete effect of each due arrival at its exact arrival time, in
//! `(arrival_time, id)` order. Because every step is evaluated in Q64.64
//! with truncation, an observer who refreshes once a week lands on exactly
//! the same bits as one who refreshes every second.

use crate::arrival::Arrival;
use crate::command::EngineError;
use crate::config::GameConfig;
use crate::fixed::{Fix, Timestamp, exp_neg};
use crate::id::PlayerId;
use crate::planet::Planet;

/// Exponents past this point evaluate to zero; used to keep the
/// `4 * growth * dt / cap` ratio out of fixed-point range checks.
const EXP_SATURATION: u128 = 45;

/// What a single arrival did to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalEffect {
    /// Friendly reinforcement: energy and silver added, clamped at caps.
    Reinforced,
    /// Hostile force absorbed by the defenders.
    Repelled {
        /// Defense-adjusted energy the defenders lost.
        damage: u64,
    },
    /// Hostile force broke through; ownership flipped.
    Captured {
        /// Owner before the flip (possibly the unowned sentinel).
        previous: PlayerId,
    },
}

// ---------------------------------------------------------------------------
// Continuous growth
// ---------------------------------------------------------------------------

/// Closed-form logistic growth of `energy` toward `cap` over `dt` seconds:
///
/// `E' = cap * E / (E + (cap - E) * e^(-4 * growth * dt / cap))`
///
/// The rate tapers as energy nears the cap; an overpopulated planet
/// (energy above cap, from conquest surplus) decays toward the cap along
/// the same curve. Zero energy and zero growth are fixed points.
pub fn logistic_energy(energy: u64, cap: u64, growth: u64, dt: u64) -> u64 {
    if energy == 0 || growth == 0 || dt == 0 || cap == 0 || energy == cap {
        return energy;
    }
    let num = 4u128 * u128::from(growth) * u128::from(dt);
    let decay = if num >= EXP_SATURATION * u128::from(cap) {
        Fix::ZERO
    } else {
        // num < 45 * cap, so the u64 cast cannot truncate.
        exp_neg(Fix::from_num(num as u64) / Fix::from_num(cap))
    };
    // Division-first form of the logistic solution: algebraically the
    // same as cap*E / (E + (cap-E)*decay), but every intermediate stays
    // inside Q64.64 integer range for any u64 energy.
    let e = Fix::from_num(energy.min(i64::MAX as u64));
    let c = Fix::from_num(cap);
    let denom = Fix::ONE + (c - e) / e * decay;
    let next: u64 = (c / denom).to_num();
    // Truncation must not let growth run backwards or overshoot.
    if energy < cap {
        next.clamp(energy, cap)
    } else {
        next.clamp(cap, energy)
    }
}

/// Linear silver accrual, clamped at the cap.
pub fn linear_silver(silver: u64, cap: u64, growth: u64, dt: u64) -> u64 {
    let earned = u128::from(growth) * u128::from(dt);
    let total = u128::from(silver).saturating_add(earned);
    total.min(u128::from(cap)) as u64
}

/// Advance a planet's continuous state to `to` and stamp it. Unowned
/// planets are frozen in time: pirates neither breed nor mine.
fn advance_growth(planet: &mut Planet, to: Timestamp, config: &GameConfig) {
    let dt = to.saturating_sub(planet.last_updated);
    planet.last_updated = to;
    if dt == 0 || !planet.is_owned() {
        return;
    }
    let dt_eff = (u128::from(dt) * u128::from(config.time_factor_hundredths) / 100)
        .min(u128::from(u64::MAX)) as u64;
    planet.energy = logistic_energy(
        planet.energy,
        planet.energy_cap,
        planet.energy_growth,
        dt_eff,
    );
    planet.silver = linear_silver(
        planet.silver,
        planet.silver_cap,
        planet.silver_growth,
        dt_eff,
    );
}

// ---------------------------------------------------------------------------
// Discrete arrival effects
// ---------------------------------------------------------------------------

/// Defense-adjusted strength of a hostile force: `floor(arriving * 100 /
/// defense)`. A defense above 100 blunts attacks; below 100 amplifies them.
/// Saturates below the fixed-point integer range so conquest surpluses can
/// always be fed back through the growth curve.
pub fn hostile_force(arriving: u64, defense: u64) -> u64 {
    (u128::from(arriving) * 100 / u128::from(defense.max(1))).min(i64::MAX as u128) as u64
}

/// Apply one arrival to its destination (conquest resolution).
pub fn apply_arrival(planet: &mut Planet, arrival: &Arrival) -> ArrivalEffect {
    if arrival.player == planet.owner {
        // Reinforcement clamps at the cap but never shrinks an
        // overpopulated planet.
        let reinforced = planet
            .energy_cap
            .min(planet.energy.saturating_add(arrival.energy_arriving));
        planet.energy = planet.energy.max(reinforced);
        planet.silver = planet
            .silver_cap
            .min(planet.silver.saturating_add(arrival.silver_moved));
        return ArrivalEffect::Reinforced;
    }

    // Hostile. Silver aboard a hostile fleet is lost with the fleet.
    let force = hostile_force(arrival.energy_arriving, planet.defense);
    let empty_capture =
        planet.owner.is_unowned() && planet.energy == 0 && arrival.energy_arriving > 0;
    if force > planet.energy || empty_capture {
        let previous = planet.owner;
        planet.owner = arrival.player;
        planet.energy = force - planet.energy;
        ArrivalEffect::Captured { previous }
    } else {
        planet.energy -= force;
        ArrivalEffect::Repelled { damage: force }
    }
}

// ---------------------------------------------------------------------------
// The update itself
// ---------------------------------------------------------------------------

/// Bring a planet current as of `now`, interleaving growth with the due
/// arrivals in `(arrival_time, id)` order. `due` must contain exactly the
/// arrivals with `arrival_time <= now`, already removed from the queue.
///
/// Idempotent: a second call with the same `now` (and an empty `due`) is a
/// no-op. Fails with [`EngineError::ClockRegression`] before mutating
/// anything if `now` precedes `last_updated`.
pub fn update_planet(
    planet: &mut Planet,
    mut due: Vec<Arrival>,
    now: Timestamp,
    config: &GameConfig,
) -> Result<Vec<(Arrival, ArrivalEffect)>, EngineError> {
    if now < planet.last_updated {
        return Err(EngineError::ClockRegression {
            now,
            last_updated: planet.last_updated,
        });
    }
    due.sort_by_key(Arrival::sort_key);

    let mut applied = Vec::with_capacity(due.len());
    for arrival in due {
        debug_assert!(arrival.arrival_time <= now);
        // Arrivals can never predate the destination's last materialization:
        // the move that enqueued them brought it current first.
        let boundary = arrival.arrival_time.max(planet.last_updated);
        advance_growth(planet, boundary, config);
        let effect = apply_arrival(planet, &arrival);
        applied.push((arrival, effect));
    }
    advance_growth(planet, now, config);
    Ok(applied)
}
