//! Read-only snapshot types returned by commands and queries.
//!
//! All snapshots are owned copies -- no references into the store -- and
//! mirror the observable state shape: the full planet attribute list plus
//! the ordered pending-arrival view.

use crate::arrival::Arrival;
use crate::fixed::Timestamp;
use crate::id::{ArrivalId, PlanetId, PlayerId};
use crate::planet::{Planet, PlanetLevel, PlanetResource, SpaceType, UpgradeState};
use serde::{Deserialize, Serialize};

/// A planet's observable state at some instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetSnapshot {
    pub id: PlanetId,
    pub owner: PlayerId,
    pub level: PlanetLevel,
    pub space_type: SpaceType,
    pub resource: PlanetResource,

    pub energy: u64,
    pub energy_cap: u64,
    pub energy_growth: u64,
    pub silver: u64,
    pub silver_cap: u64,
    pub silver_growth: u64,

    pub range: u64,
    pub speed: u64,
    pub defense: u64,

    pub upgrades: UpgradeState,
    pub silver_spent: u64,
    pub hat_level: u8,

    pub last_updated: Timestamp,
    pub created_at: Timestamp,
}

impl From<&Planet> for PlanetSnapshot {
    fn from(planet: &Planet) -> Self {
        Self {
            id: planet.id,
            owner: planet.owner,
            level: planet.level,
            space_type: planet.space_type,
            resource: planet.resource,
            energy: planet.energy,
            energy_cap: planet.energy_cap,
            energy_growth: planet.energy_growth,
            silver: planet.silver,
            silver_cap: planet.silver_cap,
            silver_growth: planet.silver_growth,
            range: planet.range,
            speed: planet.speed,
            defense: planet.defense,
            upgrades: planet.upgrades,
            silver_spent: planet.silver_spent,
            hat_level: planet.hat_level,
            last_updated: planet.last_updated,
            created_at: planet.created_at,
        }
    }
}

/// One pending arrival as observers see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalSnapshot {
    pub id: ArrivalId,
    pub player: PlayerId,
    pub from: PlanetId,
    pub to: PlanetId,
    pub energy_arriving: u64,
    pub silver_moved: u64,
    pub departure_time: Timestamp,
    pub arrival_time: Timestamp,
}

impl From<&Arrival> for ArrivalSnapshot {
    fn from(arrival: &Arrival) -> Self {
        Self {
            id: arrival.id,
            player: arrival.player,
            from: arrival.from,
            to: arrival.to,
            energy_arriving: arrival.energy_arriving,
            silver_moved: arrival.silver_moved,
            departure_time: arrival.departure_time,
            arrival_time: arrival.arrival_time,
        }
    }
}
