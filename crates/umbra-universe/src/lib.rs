//! Universe generation for the Umbra economy engine.
//!
//! A reference implementation of the engine's external coordinate/identity
//! collaborator: every coordinate pair hashes to a 32-byte location id, and
//! a location is a planet only if its hash clears the rarity threshold.
//! Level, space type, and resource are derived from the hash and from a
//! smooth integer noise field, so any two miners sweeping the same seed
//! discover byte-identical planets.
//!
//! The engine never sees any of this; it consumes discovered planets
//! through the [`umbra_core::command::PlanetProvider`] trait, which a
//! [`Universe`] implements over its discovery registry.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use umbra_core::command::PlanetProvider;
use umbra_core::id::PlanetId;
use umbra_core::planet::{PlanetDescriptor, PlanetLevel, PlanetResource, SpaceType};

/// Coordinates past this bound are outside the universe. Keeps squared
/// distances inside the engine's integer square root.
pub const COORD_BOUND: i64 = 1 << 31;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Knobs for one universe. Two universes with the same config contain the
/// same planets at the same coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseConfig {
    /// Seed folded into every location hash.
    pub seed: u64,

    /// One in `planet_rarity` locations holds a planet.
    pub planet_rarity: u16,

    /// Noise values below this are nebula.
    pub perlin_threshold_1: u32,

    /// Noise values below this (but at or above the first threshold) are
    /// regular space; everything else is deep space.
    pub perlin_threshold_2: u32,

    /// One in `silver_rarity` planets of level 1+ is a silver mine.
    pub silver_rarity: u8,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            planet_rarity: 16,
            perlin_threshold_1: 15,
            perlin_threshold_2: 17,
            silver_rarity: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Location hashing
// ---------------------------------------------------------------------------

/// The location hash: SHA-256 over the seed and the coordinates. The digest
/// doubles as the planet id and as the entropy for level and resource.
pub fn location_hash(seed: u64, x: i64, y: i64) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(x.to_le_bytes());
    hasher.update(y.to_le_bytes());
    hasher.finalize().into()
}

fn hash_u16(hash: &[u8; 32], offset: usize) -> u16 {
    u16::from_le_bytes([hash[offset], hash[offset + 1]])
}

fn hash_u32(hash: &[u8; 32], offset: usize) -> u32 {
    u32::from_le_bytes([
        hash[offset],
        hash[offset + 1],
        hash[offset + 2],
        hash[offset + 3],
    ])
}

/// Level thresholds, descending. A level-entropy draw below the i-th entry
/// qualifies for level i; each step up is 4x rarer.
const LEVEL_THRESHOLDS: [u32; 9] = [
    u32::MAX >> 2,
    u32::MAX >> 4,
    u32::MAX >> 6,
    u32::MAX >> 8,
    u32::MAX >> 10,
    u32::MAX >> 12,
    u32::MAX >> 14,
    u32::MAX >> 16,
    u32::MAX >> 18,
];

fn level_from_hash(hash: &[u8; 32]) -> PlanetLevel {
    let draw = hash_u32(hash, 4);
    let level = LEVEL_THRESHOLDS
        .iter()
        .rposition(|&t| draw < t)
        .unwrap_or(0);
    PlanetLevel(level as u8)
}

// ---------------------------------------------------------------------------
// Noise field
// ---------------------------------------------------------------------------

/// Lattice spacing of the noise field.
const NOISE_CELL: i64 = 64;

/// Range of the noise output: 0..=NOISE_SCALE.
const NOISE_SCALE: u32 = 32;

/// Pseudo-random lattice value at a grid corner, in 0..=NOISE_SCALE.
fn lattice_value(seed: u64, gx: i64, gy: i64) -> u32 {
    let hash = location_hash(seed ^ 0x6e6f_6973_65, gx, gy);
    hash_u32(&hash, 0) % (NOISE_SCALE + 1)
}

/// Smooth integer noise in 0..=NOISE_SCALE: bilinear interpolation between
/// the four surrounding lattice corners, all in integer arithmetic.
pub fn noise_at(seed: u64, x: i64, y: i64) -> u32 {
    let gx = x.div_euclid(NOISE_CELL);
    let gy = y.div_euclid(NOISE_CELL);
    let fx = x.rem_euclid(NOISE_CELL) as u64;
    let fy = y.rem_euclid(NOISE_CELL) as u64;
    let cell = NOISE_CELL as u64;

    let v00 = u64::from(lattice_value(seed, gx, gy));
    let v10 = u64::from(lattice_value(seed, gx + 1, gy));
    let v01 = u64::from(lattice_value(seed, gx, gy + 1));
    let v11 = u64::from(lattice_value(seed, gx + 1, gy + 1));

    let top = v00 * (cell - fx) + v10 * fx;
    let bottom = v01 * (cell - fx) + v11 * fx;
    let blended = top * (cell - fy) + bottom * fy;
    (blended / (cell * cell)) as u32
}

// ---------------------------------------------------------------------------
// Universe
// ---------------------------------------------------------------------------

/// A seeded universe plus the registry of planets discovered so far.
///
/// Mining is how the registry fills: sweeping coordinates is the player
/// client's job (and the test suite's), and every discovered descriptor is
/// immutable from then on.
#[derive(Debug, Default)]
pub struct Universe {
    config: UniverseConfig,
    discovered: HashMap<PlanetId, PlanetDescriptor>,
}

impl Universe {
    pub fn new(config: UniverseConfig) -> Self {
        Self {
            config,
            discovered: HashMap::new(),
        }
    }

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    /// Number of planets discovered so far.
    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    /// Compute the descriptor at a coordinate pair without registering it.
    /// `None` if the location holds no planet (or is out of bounds).
    pub fn descriptor_at(&self, x: i64, y: i64) -> Option<PlanetDescriptor> {
        if x.abs() >= COORD_BOUND || y.abs() >= COORD_BOUND {
            return None;
        }
        let hash = location_hash(self.config.seed, x, y);
        let rarity_draw = hash_u16(&hash, 0);
        if u32::from(rarity_draw) >= u32::from(u16::MAX) / u32::from(self.config.planet_rarity.max(1))
        {
            return None;
        }

        let level = level_from_hash(&hash);
        let perlin = noise_at(self.config.seed, x, y);
        let space_type = if perlin < self.config.perlin_threshold_1 {
            SpaceType::Nebula
        } else if perlin < self.config.perlin_threshold_2 {
            SpaceType::Space
        } else {
            SpaceType::DeepSpace
        };
        let resource = if level.0 >= 1 && hash[8] % self.config.silver_rarity.max(1) == 0 {
            PlanetResource::Silver
        } else {
            PlanetResource::None
        };

        Some(PlanetDescriptor {
            id: PlanetId(hash),
            x,
            y,
            level,
            space_type,
            resource,
            perlin,
        })
    }

    /// Mine one location: compute its descriptor and register the discovery.
    pub fn mine(&mut self, x: i64, y: i64) -> Option<PlanetDescriptor> {
        let desc = self.descriptor_at(x, y)?;
        self.discovered.insert(desc.id, desc);
        Some(desc)
    }

    /// Sweep a square chunk, registering everything found. Returns the
    /// discovered descriptors in scan order.
    pub fn mine_chunk(&mut self, left: i64, bottom: i64, side: i64) -> Vec<PlanetDescriptor> {
        let mut found = Vec::new();
        for y in bottom..bottom + side {
            for x in left..left + side {
                if let Some(desc) = self.mine(x, y) {
                    found.push(desc);
                }
            }
        }
        found
    }
}

impl PlanetProvider for Universe {
    fn descriptor(&self, id: &PlanetId) -> Option<PlanetDescriptor> {
        self.discovered.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic() {
        assert_eq!(location_hash(7, 10, -3), location_hash(7, 10, -3));
        assert_ne!(location_hash(7, 10, -3), location_hash(7, 10, 3));
        assert_ne!(location_hash(7, 10, -3), location_hash(8, 10, -3));
    }

    #[test]
    fn mining_is_deterministic() {
        let mut a = Universe::new(UniverseConfig::default());
        let mut b = Universe::new(UniverseConfig::default());
        let found_a = a.mine_chunk(0, 0, 32);
        let found_b = b.mine_chunk(0, 0, 32);
        assert_eq!(found_a, found_b);
    }

    #[test]
    fn rarity_thins_the_universe() {
        let mut universe = Universe::new(UniverseConfig::default());
        let found = universe.mine_chunk(0, 0, 64);
        // 4096 locations at 1-in-16 rarity: expect planets, but far fewer
        // than locations.
        assert!(!found.is_empty());
        assert!(found.len() < 1_024);
        assert_eq!(universe.discovered_count(), found.len());
    }

    #[test]
    fn different_seeds_make_different_universes() {
        let mut a = Universe::new(UniverseConfig::default());
        let mut b = Universe::new(UniverseConfig {
            seed: 99,
            ..UniverseConfig::default()
        });
        let ids_a: Vec<_> = a.mine_chunk(0, 0, 32).iter().map(|d| d.id).collect();
        let ids_b: Vec<_> = b.mine_chunk(0, 0, 32).iter().map(|d| d.id).collect();
        assert_ne!(ids_a, ids_b);
    }

    #[test]
    fn noise_is_smooth_between_neighbors() {
        // Within one lattice cell the blend changes by at most the corner
        // spread per step; adjacent samples stay close.
        for x in 0..63 {
            let here = noise_at(0, x, 10);
            let next = noise_at(0, x + 1, 10);
            assert!(here.abs_diff(next) <= 2, "jump at x={x}: {here} -> {next}");
        }
    }

    #[test]
    fn noise_stays_in_range() {
        for x in -100..100 {
            for y in -100..100 {
                assert!(noise_at(3, x * 13, y * 7) <= NOISE_SCALE);
            }
        }
    }

    #[test]
    fn out_of_bounds_is_empty_space() {
        let universe = Universe::new(UniverseConfig::default());
        assert!(universe.descriptor_at(COORD_BOUND, 0).is_none());
        assert!(universe.descriptor_at(0, -COORD_BOUND).is_none());
    }

    #[test]
    fn provider_serves_only_discovered_planets() {
        let mut universe = Universe::new(UniverseConfig::default());
        let found = universe.mine_chunk(0, 0, 48);
        let first = found.first().copied().expect("chunk should hold a planet");

        let undiscovered_hash = location_hash(42, 1, 1);
        assert!(universe.descriptor(&PlanetId(undiscovered_hash)).is_none());
        assert_eq!(universe.descriptor(&first.id), Some(first));
    }

    #[test]
    fn engine_runs_on_a_mined_universe() {
        use umbra_core::command::Engine;
        use umbra_core::config::GameConfig;
        use umbra_core::id::PlayerId;

        let mut universe = Universe::new(UniverseConfig::default());
        let found = universe.mine_chunk(0, 0, 96);
        let homeworld = found
            .iter()
            .find(|d| d.level == PlanetLevel(0) && d.space_type == SpaceType::Nebula)
            .copied()
            .expect("a level-0 nebula planet in the starting chunk");

        let mut engine = Engine::new(GameConfig::default(), Box::new(universe));
        let player = PlayerId([9; 20]);
        let snapshot = engine.initialize_player(player, homeworld.id, 100).unwrap();
        assert_eq!(snapshot.owner, player);
        assert!(snapshot.energy > 0);

        let later = engine.refresh_planet(homeworld.id, 10_000).unwrap();
        assert!(later.energy > snapshot.energy);
    }
}
