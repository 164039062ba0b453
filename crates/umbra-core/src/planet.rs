//! Planet records and the coordinate-derived inputs they are built from.
//!
//! A planet "exists" once it has been referenced by a command; creation
//! copies the immutable [`PlanetDescriptor`] supplied by the external
//! coordinate/identity generator into a mutable [`Planet`] record, whose
//! stats start from a per-level base table scaled by space type.

use crate::config::GameConfig;
use crate::fixed::{Timestamp, isqrt};
use crate::id::{PlanetId, PlayerId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Planet level, ordinal 0 through 8. Bigger levels mean bigger caps,
/// longer range, and a pirate garrison at first touch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PlanetLevel(pub u8);

impl PlanetLevel {
    /// The highest level in the universe.
    pub const MAX: PlanetLevel = PlanetLevel(8);

    /// Construct from a raw ordinal; `None` above [`PlanetLevel::MAX`].
    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::MAX.0).then_some(Self(level))
    }

    /// Index into per-level tables.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Where in the universe a planet sits; scales its base stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceType {
    /// Sheltered space. Unmodified stats.
    Nebula,
    /// Regular space. Stronger stats, weaker defense.
    Space,
    /// The deep. Strongest stats, weakest defense.
    DeepSpace,
}

impl SpaceType {
    /// `(stat_pct, defense_pct)` multipliers applied to the per-level base
    /// stats.
    pub fn multipliers(self) -> (u64, u64) {
        match self {
            SpaceType::Nebula => (100, 100),
            SpaceType::Space => (125, 50),
            SpaceType::DeepSpace => (150, 25),
        }
    }

    /// Ceiling on the sum of all three upgrade branch ranks.
    pub fn max_total_upgrades(self) -> u8 {
        match self {
            SpaceType::Nebula => 3,
            SpaceType::Space => 4,
            SpaceType::DeepSpace => 5,
        }
    }
}

/// What a planet produces besides energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanetResource {
    /// Energy only.
    None,
    /// A silver mine: nonzero silver cap and growth.
    Silver,
}

// ---------------------------------------------------------------------------
// Base stats
// ---------------------------------------------------------------------------

/// The raw per-level stat row before space-type scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetStats {
    pub energy_cap: u64,
    pub energy_growth: u64,
    pub range: u64,
    pub speed: u64,
    pub defense: u64,
    pub silver_cap: u64,
    pub silver_growth: u64,
    /// Pirate garrison at first touch, as a percentage of energy cap.
    pub barbarian_pct: u64,
}

/// Base stats for levels 0 through 8. Caps are sized so that
/// `energy_cap * energy` products stay inside Q64.64 integer range even
/// under overpopulation.
pub const BASE_STATS: [PlanetStats; 9] = [
    PlanetStats {
        energy_cap: 100_000,
        energy_growth: 417,
        range: 160,
        speed: 75,
        defense: 400,
        silver_cap: 50_000,
        silver_growth: 0,
        barbarian_pct: 0,
    },
    PlanetStats {
        energy_cap: 300_000,
        energy_growth: 833,
        range: 177,
        speed: 75,
        defense: 400,
        silver_cap: 100_000,
        silver_growth: 56,
        barbarian_pct: 1,
    },
    PlanetStats {
        energy_cap: 1_000_000,
        energy_growth: 1_250,
        range: 315,
        speed: 75,
        defense: 300,
        silver_cap: 500_000,
        silver_growth: 167,
        barbarian_pct: 2,
    },
    PlanetStats {
        energy_cap: 3_000_000,
        energy_growth: 1_667,
        range: 591,
        speed: 75,
        defense: 300,
        silver_cap: 2_500_000,
        silver_growth: 417,
        barbarian_pct: 3,
    },
    PlanetStats {
        energy_cap: 10_000_000,
        energy_growth: 2_083,
        range: 1_025,
        speed: 75,
        defense: 200,
        silver_cap: 12_000_000,
        silver_growth: 833,
        barbarian_pct: 4,
    },
    PlanetStats {
        energy_cap: 30_000_000,
        energy_growth: 2_500,
        range: 1_734,
        speed: 75,
        defense: 200,
        silver_cap: 50_000_000,
        silver_growth: 1_667,
        barbarian_pct: 5,
    },
    PlanetStats {
        energy_cap: 100_000_000,
        energy_growth: 2_917,
        range: 2_838,
        speed: 75,
        defense: 200,
        silver_cap: 100_000_000,
        silver_growth: 2_778,
        barbarian_pct: 7,
    },
    PlanetStats {
        energy_cap: 200_000_000,
        energy_growth: 3_333,
        range: 4_414,
        speed: 75,
        defense: 200,
        silver_cap: 200_000_000,
        silver_growth: 2_778,
        barbarian_pct: 10,
    },
    PlanetStats {
        energy_cap: 300_000_000,
        energy_growth: 3_750,
        range: 6_306,
        speed: 75,
        defense: 200,
        silver_cap: 300_000_000,
        silver_growth: 2_778,
        barbarian_pct: 20,
    },
];

/// The per-level base stats scaled by space type. Any planet can store
/// silver (upgrades are paid on-planet), but only mines accrue it.
pub fn base_stats(
    level: PlanetLevel,
    space_type: SpaceType,
    resource: PlanetResource,
) -> PlanetStats {
    let row = BASE_STATS[level.index()];
    let (stat_pct, defense_pct) = space_type.multipliers();
    let scale = |v: u64| v * stat_pct / 100;
    let mine = matches!(resource, PlanetResource::Silver);
    PlanetStats {
        energy_cap: scale(row.energy_cap),
        energy_growth: scale(row.energy_growth),
        range: scale(row.range),
        speed: scale(row.speed),
        defense: (row.defense * defense_pct / 100).max(1),
        silver_cap: scale(row.silver_cap),
        silver_growth: if mine { scale(row.silver_growth) } else { 0 },
        barbarian_pct: row.barbarian_pct,
    }
}

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// The immutable coordinate-derived inputs for one planet, supplied by the
/// external coordinate/identity generator and trusted once first seen.
///
/// Coordinates must stay within `|x|, |y| < 2^31` so squared distances fit
/// in the engine's integer square root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetDescriptor {
    pub id: PlanetId,
    pub x: i64,
    pub y: i64,
    pub level: PlanetLevel,
    pub space_type: SpaceType,
    pub resource: PlanetResource,
    /// Raw noise-field sample at the coordinates; informational only once
    /// level and space type are derived.
    pub perlin: u32,
}

impl PlanetDescriptor {
    /// Euclidean distance to another descriptor, floored.
    pub fn distance_to(&self, other: &PlanetDescriptor) -> u64 {
        let dx = (self.x - other.x).unsigned_abs() as u128;
        let dy = (self.y - other.y).unsigned_abs() as u128;
        isqrt(dx * dx + dy * dy)
    }

    /// Euclidean distance from the universe origin, floored. Compared
    /// against the world radius.
    pub fn dist_from_origin(&self) -> u64 {
        let x = self.x.unsigned_abs() as u128;
        let y = self.y.unsigned_abs() as u128;
        isqrt(x * x + y * y)
    }
}

// ---------------------------------------------------------------------------
// Planet
// ---------------------------------------------------------------------------

/// Per-branch upgrade ranks: `[defense, range, speed]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeState(pub [u8; 3]);

impl UpgradeState {
    /// Sum of all branch ranks.
    pub fn total(&self) -> u8 {
        self.0.iter().sum()
    }
}

/// The canonical mutable record for one planet. Owned by the planet store;
/// mutated only through the lazy update engine and the command processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
    pub id: PlanetId,
    pub level: PlanetLevel,
    pub space_type: SpaceType,
    pub resource: PlanetResource,
    pub owner: PlayerId,

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

impl Planet {
    /// Materialize a planet from its descriptor at first touch. Unowned
    /// planets of level 1+ start with a pirate garrison proportional to
    /// their cap; level-0 planets start empty.
    pub fn from_descriptor(desc: &PlanetDescriptor, now: Timestamp) -> Self {
        let stats = base_stats(desc.level, desc.space_type, desc.resource);
        let energy = stats.energy_cap * stats.barbarian_pct / 100;
        Self {
            id: desc.id,
            level: desc.level,
            space_type: desc.space_type,
            resource: desc.resource,
            owner: PlayerId::UNOWNED,
            energy,
            energy_cap: stats.energy_cap,
            energy_growth: stats.energy_growth,
            silver: 0,
            silver_cap: stats.silver_cap,
            silver_growth: stats.silver_growth,
            range: stats.range,
            speed: stats.speed,
            defense: stats.defense,
            upgrades: UpgradeState::default(),
            silver_spent: 0,
            hat_level: 0,
            last_updated: now,
            created_at: now,
        }
    }

    /// Claim this planet as a homeworld: sets the owner and seeds starting
    /// energy from the config.
    pub fn claim_homeworld(&mut self, player: PlayerId, config: &GameConfig) {
        self.owner = player;
        self.energy = self.energy_cap * config.homeworld_energy_pct / 100;
        self.silver = 0;
    }

    /// Whether any player owns this planet.
    pub fn is_owned(&self) -> bool {
        !self.owner.is_unowned()
    }
}
