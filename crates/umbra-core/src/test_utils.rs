//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so the same
//! fixtures serve `#[cfg(test)]` modules here and the scenario tests in the
//! integration-tests crate.

use crate::command::{Engine, PlanetProvider};
use crate::config::GameConfig;
use crate::id::{PlanetId, PlayerId};
use crate::planet::{PlanetDescriptor, PlanetLevel, PlanetResource, SpaceType};
use std::collections::HashMap;

/// A planet id with every byte set to `n`. Ordering follows `n`.
pub fn pid(n: u8) -> PlanetId {
    PlanetId([n; 32])
}

/// A player id with every byte set to `n`. `n` must be nonzero (zero is
/// the unowned sentinel).
pub fn player(n: u8) -> PlayerId {
    debug_assert!(n != 0, "player(0) is the unowned sentinel");
    PlayerId([n; 20])
}

/// A nebula descriptor with no silver at the given coordinates and level.
pub fn descriptor(n: u8, x: i64, y: i64, level: u8) -> PlanetDescriptor {
    PlanetDescriptor {
        id: pid(n),
        x,
        y,
        level: PlanetLevel::new(level).unwrap_or(PlanetLevel::MAX),
        space_type: SpaceType::Nebula,
        resource: PlanetResource::None,
        perlin: 0,
    }
}

/// Like [`descriptor`], but a silver mine.
pub fn silver_descriptor(n: u8, x: i64, y: i64, level: u8) -> PlanetDescriptor {
    PlanetDescriptor {
        resource: PlanetResource::Silver,
        ..descriptor(n, x, y, level)
    }
}

/// An in-memory descriptor table standing in for the external
/// coordinate/identity generator.
#[derive(Debug, Default)]
pub struct FixtureProvider {
    descriptors: HashMap<PlanetId, PlanetDescriptor>,
}

impl FixtureProvider {
    pub fn new(descriptors: Vec<PlanetDescriptor>) -> Self {
        Self {
            descriptors: descriptors.into_iter().map(|d| (d.id, d)).collect(),
        }
    }

    pub fn add(&mut self, desc: PlanetDescriptor) {
        self.descriptors.insert(desc.id, desc);
    }
}

impl PlanetProvider for FixtureProvider {
    fn descriptor(&self, id: &PlanetId) -> Option<PlanetDescriptor> {
        self.descriptors.get(id).copied()
    }
}

/// An engine with the default config over the given fixture descriptors.
pub fn test_engine(descriptors: Vec<PlanetDescriptor>) -> Engine {
    Engine::new(GameConfig::default(), Box::new(FixtureProvider::new(descriptors)))
}

/// An engine with a custom config over the given fixture descriptors.
pub fn test_engine_with_config(
    config: GameConfig,
    descriptors: Vec<PlanetDescriptor>,
) -> Engine {
    Engine::new(config, Box::new(FixtureProvider::new(descriptors)))
}
