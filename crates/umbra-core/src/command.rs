//! The command processor: validates and applies player-issued actions.
//!
//! Every command follows the same shape: advance the engine clock, bring
//! each touched planet current through the lazy update engine, run all
//! validations, and only then mutate the store and/or enqueue an arrival.
//! A failed validation returns a typed error and leaves no partial command
//! effect behind (materialized time is not a command effect; it is the
//! same state any observer would have computed).

use crate::arrival::Arrival;
use crate::config::GameConfig;
use crate::event::{EngineEvent, EventLog};
use crate::fixed::{Fix, Timestamp, pow2_neg};
use crate::id::{ArrivalId, PlanetId, PlayerId};
use crate::lazy::{self, ArrivalEffect};
use crate::planet::{Planet, PlanetDescriptor, PlanetLevel};
use crate::query::{ArrivalSnapshot, PlanetSnapshot};
use crate::radius::WorldRadius;
use crate::store::PlanetStore;
use crate::upgrade::{self, UpgradeBranch};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A rejected command. Every failure is a local validation failure: the
/// engine's invariants hold before and after, and nothing is retried
/// internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("clock regression: now={now} is before last update {last_updated}")]
    ClockRegression { now: Timestamp, last_updated: Timestamp },

    #[error("only the owner can perform operations on a planet")]
    NotOwner,

    #[error("planet is already owned or initialized")]
    AlreadyOwned,

    #[error("tried to move more silver than what exists: {requested} > {available}")]
    InsufficientSilver { requested: u64, available: u64 },

    #[error("tried to move more energy than what exists: {requested} > {available}")]
    InsufficientEnergy { requested: u64, available: u64 },

    #[error("not enough forces to make the move")]
    NoForceArrives,

    #[error("attempting to move out of bounds")]
    OutOfRange,

    #[error("upgrade branch is already at its maximum rank")]
    MaxUpgradeLevel,

    #[error("not a valid homeworld")]
    InvalidHomeworld,

    #[error("no such location in the universe: {0}")]
    UnknownPlanet(PlanetId),
}

// ---------------------------------------------------------------------------
// External collaborators
// ---------------------------------------------------------------------------

/// The coordinate/identity generator: resolves a planet id to its immutable
/// coordinate-derived attributes. The engine trusts the descriptor and
/// never changes it once the planet has been touched.
pub trait PlanetProvider: std::fmt::Debug {
    fn descriptor(&self, id: &PlanetId) -> Option<PlanetDescriptor>;
}

// ---------------------------------------------------------------------------
// Move math
// ---------------------------------------------------------------------------

/// Energy that survives a trip of `dist` from a planet with `range`:
/// `floor(moved * 2^(-dist/range) - overhead% * dest_cap)`, or `None` if
/// nothing (or less) would land.
pub fn decayed_arrival(
    moved: u64,
    dist: u64,
    range: u64,
    dest_cap: u64,
    overhead_pct: u64,
) -> Option<u64> {
    let factor = pow2_neg(Fix::from_num(dist) / Fix::from_num(range.max(1)));
    let landed = Fix::from_num(moved) * factor;
    let overhead = Fix::from_num(dest_cap) * Fix::from_num(overhead_pct) / Fix::from_num(100);
    if landed <= overhead {
        return None;
    }
    let arriving: u64 = (landed - overhead).to_num();
    (arriving > 0).then_some(arriving)
}

/// Transit duration for `dist` at `speed`: `floor(dist * 100 / speed)`.
pub fn travel_time(dist: u64, speed: u64) -> u64 {
    (u128::from(dist) * 100 / u128::from(speed.max(1))) as u64
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// A validated move request. `max_distance` is the distance bound the
/// caller claims; the engine checks it against the actual coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOrder {
    pub player: PlayerId,
    pub from: PlanetId,
    pub to: PlanetId,
    pub max_distance: u64,
    pub energy: u64,
    pub silver: u64,
    pub now: Timestamp,
}

/// What an accepted move produced: the updated origin and the queued
/// arrival.
#[derive(Debug, Clone)]
pub struct MoveReceipt {
    pub origin: PlanetSnapshot,
    pub arrival: ArrivalSnapshot,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The deterministic economy engine. Owns the planet store, the arrival
/// queues, the world radius, and the event buffer; consumes descriptors
/// from an external [`PlanetProvider`] and timestamps from the caller's
/// monotonic clock.
#[derive(Debug)]
pub struct Engine {
    pub(crate) config: GameConfig,
    pub(crate) store: PlanetStore,
    pub(crate) radius: WorldRadius,
    /// Highest `now` any command has carried. Commands may not go back.
    pub(crate) clock: Timestamp,
    /// One homeworld per player, forever.
    pub(crate) homeworlds: HashMap<PlayerId, PlanetId>,
    pub(crate) events: EventLog,
    pub(crate) provider: Box<dyn PlanetProvider>,
}

impl Engine {
    /// Create an engine over an empty universe.
    pub fn new(config: GameConfig, provider: Box<dyn PlanetProvider>) -> Self {
        let radius = WorldRadius::new(config.initial_world_radius);
        Self {
            config,
            store: PlanetStore::new(),
            radius,
            clock: 0,
            homeworlds: HashMap::new(),
            events: EventLog::new(),
            provider,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Current world radius.
    pub fn world_radius(&self) -> u64 {
        self.radius.get()
    }

    /// Number of planets touched so far.
    pub fn touched_planets(&self) -> usize {
        self.store.len()
    }

    /// Take all buffered events, oldest first.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain()
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Claim an untouched level-0 planet as `player`'s one and only
    /// homeworld.
    pub fn initialize_player(
        &mut self,
        player: PlayerId,
        planet_id: PlanetId,
        now: Timestamp,
    ) -> Result<PlanetSnapshot, EngineError> {
        self.advance_clock(now)?;
        if player.is_unowned() || self.homeworlds.contains_key(&player) {
            return Err(EngineError::InvalidHomeworld);
        }
        if self.store.contains(&planet_id) {
            return Err(EngineError::AlreadyOwned);
        }
        let desc = self
            .provider
            .descriptor(&planet_id)
            .ok_or(EngineError::UnknownPlanet(planet_id))?;
        if desc.level != PlanetLevel(0) {
            return Err(EngineError::InvalidHomeworld);
        }
        if !self.radius.covers(desc.dist_from_origin()) {
            return Err(EngineError::OutOfRange);
        }

        let mut planet = Planet::from_descriptor(&desc, now);
        planet.claim_homeworld(player, &self.config);
        let snapshot = PlanetSnapshot::from(&planet);
        self.store.insert(planet);
        self.homeworlds.insert(player, planet_id);
        self.events.record(EngineEvent::PlayerInitialized {
            player,
            planet: planet_id,
            time: now,
        });
        Ok(snapshot)
    }

    /// Send energy (and optionally silver) from one planet to another.
    /// Deducts from the origin immediately; the decayed remainder lands as
    /// an arrival after the transit time. Irrevocable once accepted.
    pub fn move_fleet(&mut self, order: MoveOrder) -> Result<MoveReceipt, EngineError> {
        self.advance_clock(order.now)?;
        self.touch(&order.from, order.now)?;
        self.touch(&order.to, order.now)?;

        let from_desc = self
            .provider
            .descriptor(&order.from)
            .ok_or(EngineError::UnknownPlanet(order.from))?;
        let to_desc = self
            .provider
            .descriptor(&order.to)
            .ok_or(EngineError::UnknownPlanet(order.to))?;

        let Some(origin) = self.store.get(&order.from) else {
            return Err(EngineError::UnknownPlanet(order.from));
        };
        if origin.owner != order.player {
            return Err(EngineError::NotOwner);
        }
        if order.silver > origin.silver {
            return Err(EngineError::InsufficientSilver {
                requested: order.silver,
                available: origin.silver,
            });
        }
        if order.energy > origin.energy {
            return Err(EngineError::InsufficientEnergy {
                requested: order.energy,
                available: origin.energy,
            });
        }

        let dist = from_desc.distance_to(&to_desc);
        if dist > order.max_distance || dist > origin.range {
            return Err(EngineError::OutOfRange);
        }
        // Destinations must sit inside the world radius; touching a
        // qualifying high-level planet above already expanded it.
        if !self.radius.covers(to_desc.dist_from_origin()) {
            return Err(EngineError::OutOfRange);
        }

        let Some(destination) = self.store.get(&order.to) else {
            return Err(EngineError::UnknownPlanet(order.to));
        };
        let arriving = decayed_arrival(
            order.energy,
            dist,
            origin.range,
            destination.energy_cap,
            self.config.overhead_pct,
        )
        .ok_or(EngineError::NoForceArrives)?;
        let arrival_time = order.now + travel_time(dist, origin.speed);

        // All checks passed; apply.
        let Some(origin) = self.store.get_mut(&order.from) else {
            return Err(EngineError::UnknownPlanet(order.from));
        };
        origin.energy -= order.energy;
        origin.silver -= order.silver;
        let origin_snapshot = PlanetSnapshot::from(&*origin);

        let arrival = Arrival {
            id: ArrivalId(0), // assigned by the store
            player: order.player,
            from: order.from,
            to: order.to,
            energy_arriving: arriving,
            silver_moved: order.silver,
            departure_time: order.now,
            arrival_time,
        };
        let id = self.store.enqueue(arrival.clone());
        self.events.record(EngineEvent::ArrivalQueued {
            arrival: id,
            from: order.from,
            to: order.to,
            player: order.player,
            arrival_time,
        });

        Ok(MoveReceipt {
            origin: origin_snapshot,
            arrival: ArrivalSnapshot {
                id,
                player: order.player,
                from: order.from,
                to: order.to,
                energy_arriving: arriving,
                silver_moved: order.silver,
                departure_time: order.now,
                arrival_time,
            },
        })
    }

    /// Buy one rank of an upgrade branch on an owned planet.
    pub fn upgrade_planet(
        &mut self,
        player: PlayerId,
        planet_id: PlanetId,
        branch: UpgradeBranch,
        now: Timestamp,
    ) -> Result<PlanetSnapshot, EngineError> {
        self.advance_clock(now)?;
        self.touch(&planet_id, now)?;
        let Some(planet) = self.store.get_mut(&planet_id) else {
            return Err(EngineError::UnknownPlanet(planet_id));
        };
        if planet.owner != player {
            return Err(EngineError::NotOwner);
        }
        let rank = upgrade::apply_upgrade(planet, branch, &self.config)?;
        let snapshot = PlanetSnapshot::from(&*planet);
        self.events.record(EngineEvent::PlanetUpgraded {
            planet: planet_id,
            branch,
            rank,
            time: now,
        });
        Ok(snapshot)
    }

    /// Bring a planet current and durably write the result back. No other
    /// side effect; idempotent at a fixed `now`.
    pub fn refresh_planet(
        &mut self,
        planet_id: PlanetId,
        now: Timestamp,
    ) -> Result<PlanetSnapshot, EngineError> {
        self.advance_clock(now)?;
        self.touch(&planet_id, now)?;
        match self.store.get(&planet_id) {
            Some(planet) => Ok(PlanetSnapshot::from(planet)),
            None => Err(EngineError::UnknownPlanet(planet_id)),
        }
    }

    // -----------------------------------------------------------------------
    // Read-only queries
    // -----------------------------------------------------------------------

    /// Compute a planet's state as of `now` without writing anything back.
    /// Untouched planets are reported as the descriptor would materialize
    /// them.
    pub fn planet(
        &self,
        planet_id: &PlanetId,
        now: Timestamp,
    ) -> Result<PlanetSnapshot, EngineError> {
        match self.store.get(planet_id) {
            Some(planet) => {
                let mut scratch = planet.clone();
                let due = self
                    .store
                    .arrivals(planet_id)
                    .into_iter()
                    .filter(|a| a.is_due(now))
                    .collect();
                lazy::update_planet(&mut scratch, due, now, &self.config)?;
                Ok(PlanetSnapshot::from(&scratch))
            }
            None => {
                let desc = self
                    .provider
                    .descriptor(planet_id)
                    .ok_or(EngineError::UnknownPlanet(*planet_id))?;
                Ok(PlanetSnapshot::from(&Planet::from_descriptor(&desc, now)))
            }
        }
    }

    /// Pending arrivals for a destination, in application order.
    pub fn arrivals(&self, planet_id: &PlanetId) -> Vec<ArrivalSnapshot> {
        self.store
            .arrivals(planet_id)
            .iter()
            .map(ArrivalSnapshot::from)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Reject commands whose `now` precedes anything already observed.
    fn advance_clock(&mut self, now: Timestamp) -> Result<(), EngineError> {
        if now < self.clock {
            return Err(EngineError::ClockRegression {
                now,
                last_updated: self.clock,
            });
        }
        self.clock = now;
        Ok(())
    }

    /// Ensure a planet exists (materializing it from its descriptor and
    /// expanding the world radius for qualifying levels) and bring it
    /// current as of `now`.
    fn touch(&mut self, planet_id: &PlanetId, now: Timestamp) -> Result<(), EngineError> {
        if !self.store.contains(planet_id) {
            let desc = self
                .provider
                .descriptor(planet_id)
                .ok_or(EngineError::UnknownPlanet(*planet_id))?;
            if desc.level.0 >= self.config.radius_expand_min_level {
                let old_radius = self.radius.get();
                if self.radius.expand(desc.dist_from_origin()) {
                    self.events.record(EngineEvent::RadiusExpanded {
                        old_radius,
                        new_radius: self.radius.get(),
                    });
                }
            }
            // A freshly materialized planet is already current and has no
            // queued arrivals.
            self.store.insert(Planet::from_descriptor(&desc, now));
            return Ok(());
        }

        let last_updated = match self.store.get(planet_id) {
            Some(planet) => planet.last_updated,
            None => return Err(EngineError::UnknownPlanet(*planet_id)),
        };
        if now < last_updated {
            return Err(EngineError::ClockRegression { now, last_updated });
        }
        let due = self.store.take_due(planet_id, now);
        let Some(planet) = self.store.get_mut(planet_id) else {
            return Err(EngineError::UnknownPlanet(*planet_id));
        };
        let applied = lazy::update_planet(planet, due, now, &self.config)?;
        for (arrival, effect) in applied {
            self.events.record(EngineEvent::ArrivalApplied {
                arrival: arrival.id,
                planet: *planet_id,
                time: arrival.arrival_time,
            });
            if let ArrivalEffect::Captured { previous } = effect {
                self.events.record(EngineEvent::PlanetConquered {
                    planet: *planet_id,
                    previous,
                    conqueror: arrival.player,
                    time: arrival.arrival_time,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decay_matches_reference_computation() {
        // dist == range halves the fleet before overhead.
        let arriving = decayed_arrival(50_000, 100, 100, 100_000, 5).unwrap();
        assert_eq!(arriving, 50_000 / 2 - 5_000);

        // dist == 0 costs only the overhead.
        let arriving = decayed_arrival(50_000, 0, 100, 100_000, 5).unwrap();
        assert_eq!(arriving, 45_000);
    }

    #[test]
    fn decay_bit_exact_for_fractional_exponent() {
        // Reference: floor(P * 2^(-100/177) - 0.05 * cap), evaluated with
        // the same fixed-point primitives the engine uses.
        let p = 50_000u64;
        let cap = 300_000u64;
        let factor = pow2_neg(Fix::from_num(100) / Fix::from_num(177));
        let reference: u64 = (Fix::from_num(p) * factor
            - Fix::from_num(cap) * Fix::from_num(5) / Fix::from_num(100))
        .to_num();
        assert_eq!(decayed_arrival(p, 100, 177, cap, 5), Some(reference));
        // Sanity-check against the f64 value of the same formula.
        let approx = 50_000.0 * 2f64.powf(-100.0 / 177.0) - 15_000.0;
        assert!((reference as f64 - approx).abs() < 2.0);
    }

    #[test]
    fn decay_rejects_swamped_moves() {
        // 100 energy over dist 100 cannot outweigh 5% of a 100k cap.
        assert_eq!(decayed_arrival(100, 100, 100, 100_000, 5), None);
    }

    #[test]
    fn travel_time_floors() {
        assert_eq!(travel_time(100, 75), 133);
        assert_eq!(travel_time(0, 75), 0);
        assert_eq!(travel_time(100, 100), 100);
    }
}
