use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a planet: the 32-byte hash of its coordinates, supplied by the
/// external coordinate/identity generator. Opaque to the engine; `Ord` gives
/// the canonical iteration order used for state hashing.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlanetId(pub [u8; 32]);

/// Identifies a player. A 20-byte account identifier; authentication happens
/// outside the engine, which only ever compares these for ownership checks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub [u8; 20]);

impl PlayerId {
    /// The "unowned" sentinel. A planet owned by this id belongs to no one
    /// (or to the neutral pirates seeded at first touch).
    pub const UNOWNED: PlayerId = PlayerId([0; 20]);

    /// Whether this is the unowned sentinel.
    pub fn is_unowned(&self) -> bool {
        *self == Self::UNOWNED
    }
}

/// Identifies a queued arrival. Monotonically increasing per engine; ties on
/// arrival time are broken by this id, giving insertion order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ArrivalId(pub u64);

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for b in bytes {
        write!(f, "{b:02x}")?;
    }
    Ok(())
}

impl fmt::Debug for PlanetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlanetId(")?;
        write_hex(f, &self.0)?;
        write!(f, ")")
    }
}

impl fmt::Display for PlanetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId(")?;
        write_hex(f, &self.0)?;
        write!(f, ")")
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}
