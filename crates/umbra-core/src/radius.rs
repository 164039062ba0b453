//! The world radius: a single monotonic boundary shared by the universe.

use serde::{Deserialize, Serialize};

/// The boundary beyond which destinations cannot yet be targeted. Expands
/// as distant high-level planets are touched; never shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldRadius(u64);

impl WorldRadius {
    /// Start the universe at the given radius.
    pub fn new(initial: u64) -> Self {
        Self(initial)
    }

    /// Current radius.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Grow to cover `candidate` if it lies beyond the current boundary.
    /// Returns `true` if the radius changed.
    pub fn expand(&mut self, candidate: u64) -> bool {
        if candidate > self.0 {
            self.0 = candidate;
            true
        } else {
            false
        }
    }

    /// Whether a point at `dist` from the origin is inside the boundary.
    pub fn covers(self, dist: u64) -> bool {
        dist <= self.0
    }
}
