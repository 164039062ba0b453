//! Deterministic state hashing for desync detection.
//!
//! Two engines that were fed the same command sequence must agree on this
//! hash bit-for-bit; a mismatch means an implementation diverged. FNV-1a
//! over canonically-ordered state; fast, not cryptographic.

use crate::command::Engine;
use crate::planet::Planet;

/// Incremental FNV-1a (64-bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x100_0000_01b3;

    /// Start a new hash.
    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    /// Feed bytes into the hash.
    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= u64::from(b);
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    /// Feed a u64 into the hash.
    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    /// Finalize and return the hash value.
    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

fn write_planet(hash: &mut StateHash, planet: &Planet) {
    hash.write(&planet.id.0);
    hash.write(&planet.owner.0);
    hash.write(&[planet.level.0, planet.hat_level]);
    hash.write_u64(planet.energy);
    hash.write_u64(planet.energy_cap);
    hash.write_u64(planet.energy_growth);
    hash.write_u64(planet.silver);
    hash.write_u64(planet.silver_cap);
    hash.write_u64(planet.silver_growth);
    hash.write_u64(planet.range);
    hash.write_u64(planet.speed);
    hash.write_u64(planet.defense);
    hash.write(&planet.upgrades.0);
    hash.write_u64(planet.silver_spent);
    hash.write_u64(planet.last_updated);
    hash.write_u64(planet.created_at);
}

impl Engine {
    /// Hash the full canonical state: planets and queues in id order, plus
    /// the world radius, clock, and homeworld registry.
    pub fn state_hash(&self) -> u64 {
        let mut hash = StateHash::new();
        for id in self.store.sorted_ids() {
            if let Some(planet) = self.store.get(&id) {
                write_planet(&mut hash, planet);
            }
            for arrival in self.store.arrivals(&id) {
                hash.write_u64(arrival.id.0);
                hash.write(&arrival.player.0);
                hash.write(&arrival.from.0);
                hash.write_u64(arrival.energy_arriving);
                hash.write_u64(arrival.silver_moved);
                hash.write_u64(arrival.departure_time);
                hash.write_u64(arrival.arrival_time);
            }
        }
        hash.write_u64(self.radius.get());
        hash.write_u64(self.clock);
        let mut homeworlds: Vec<_> = self.homeworlds.iter().collect();
        homeworlds.sort();
        for (player, planet) in homeworlds {
            hash.write(&player.0);
            hash.write(&planet.0);
        }
        hash.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let mut a = StateHash::new();
        a.write_u64(42);
        a.write(b"planet");
        let mut b = StateHash::new();
        b.write_u64(42);
        b.write(b"planet");
        assert_eq!(a.finish(), b.finish());
    }

    #[test]
    fn hash_differs_on_input_and_order() {
        let mut a = StateHash::new();
        a.write_u64(1);
        a.write_u64(2);
        let mut b = StateHash::new();
        b.write_u64(2);
        b.write_u64(1);
        assert_ne!(a.finish(), b.finish());
    }
}
