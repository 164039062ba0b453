//! Fleets in transit.
//!
//! An [`Arrival`] is created when a move is accepted and destroyed exactly
//! once, when the lazy update engine applies it to its destination. The
//! arriving energy is decayed at enqueue time and never re-evaluated, so a
//! fleet's strength is fixed the moment it departs.

use crate::fixed::Timestamp;
use crate::id::{ArrivalId, PlanetId, PlayerId};
use serde::{Deserialize, Serialize};

/// A scheduled transfer of energy and silver between two planets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrival {
    pub id: ArrivalId,
    /// The player who issued the move. Decides friendly vs hostile at
    /// application time, against the destination's owner *then*.
    pub player: PlayerId,
    pub from: PlanetId,
    pub to: PlanetId,
    /// Energy that will land, already decayed for distance and overhead.
    pub energy_arriving: u64,
    pub silver_moved: u64,
    pub departure_time: Timestamp,
    pub arrival_time: Timestamp,
}

impl Arrival {
    /// Ordering key: arrival time, ties broken by event id (insertion
    /// order). Applying due arrivals in this order is what makes a late
    /// observer converge on the same state as a prompt one.
    pub fn sort_key(&self) -> (Timestamp, ArrivalId) {
        (self.arrival_time, self.id)
    }

    /// Whether this arrival lands at or before `now`.
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.arrival_time <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{pid, player};

    fn arrival(id: u64, arrival_time: Timestamp) -> Arrival {
        Arrival {
            id: ArrivalId(id),
            player: player(1),
            from: pid(1),
            to: pid(2),
            energy_arriving: 1_000,
            silver_moved: 0,
            departure_time: 0,
            arrival_time,
        }
    }

    #[test]
    fn sorts_by_time_then_id() {
        let mut list = vec![arrival(2, 50), arrival(1, 50), arrival(0, 10)];
        list.sort_by_key(Arrival::sort_key);
        assert_eq!(list[0].id, ArrivalId(0));
        assert_eq!(list[1].id, ArrivalId(1));
        assert_eq!(list[2].id, ArrivalId(2));
    }

    #[test]
    fn due_is_inclusive() {
        let a = arrival(0, 100);
        assert!(!a.is_due(99));
        assert!(a.is_due(100));
        assert!(a.is_due(101));
    }
}
