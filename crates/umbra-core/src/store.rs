//! The planet store: exclusive owner of all canonical planet state.
//!
//! One record per touched planet, one pending-arrival list per destination,
//! and the monotonic arrival-id counter. Everything else in the engine
//! reaches planet state through id lookups here; no component holds a
//! reference into the store's internals.

use crate::arrival::Arrival;
use crate::fixed::Timestamp;
use crate::id::{ArrivalId, PlanetId};
use crate::planet::Planet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical storage for planets and their pending arrivals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanetStore {
    planets: HashMap<PlanetId, Planet>,
    /// Pending arrivals keyed by destination planet. Kept unsorted; readers
    /// order by [`Arrival::sort_key`].
    queues: HashMap<PlanetId, Vec<Arrival>>,
    next_arrival: u64,
}

impl PlanetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the planet has been touched (exists in canonical state).
    pub fn contains(&self, id: &PlanetId) -> bool {
        self.planets.contains_key(id)
    }

    pub fn get(&self, id: &PlanetId) -> Option<&Planet> {
        self.planets.get(id)
    }

    pub fn get_mut(&mut self, id: &PlanetId) -> Option<&mut Planet> {
        self.planets.get_mut(id)
    }

    /// Insert a freshly materialized planet. Panics in debug builds if the
    /// planet was already touched; creation must happen exactly once.
    pub fn insert(&mut self, planet: Planet) {
        debug_assert!(!self.planets.contains_key(&planet.id));
        self.planets.insert(planet.id, planet);
    }

    /// Number of touched planets.
    pub fn len(&self) -> usize {
        self.planets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
    }

    /// Allocate the next arrival id and enqueue the arrival on its
    /// destination's list.
    pub fn enqueue(&mut self, mut arrival: Arrival) -> ArrivalId {
        let id = ArrivalId(self.next_arrival);
        self.next_arrival += 1;
        arrival.id = id;
        self.queues.entry(arrival.to).or_default().push(arrival);
        id
    }

    /// Pending arrivals for a destination, ordered by `(arrival_time, id)`.
    pub fn arrivals(&self, id: &PlanetId) -> Vec<Arrival> {
        let mut list = self.queues.get(id).cloned().unwrap_or_default();
        list.sort_by_key(Arrival::sort_key);
        list
    }

    /// Remove and return the arrivals due at or before `now` for a
    /// destination, ordered by `(arrival_time, id)`. Each arrival is
    /// returned exactly once.
    pub fn take_due(&mut self, id: &PlanetId, now: Timestamp) -> Vec<Arrival> {
        let Some(queue) = self.queues.get_mut(id) else {
            return Vec::new();
        };
        let mut due: Vec<Arrival> = Vec::new();
        queue.retain(|a| {
            if a.is_due(now) {
                due.push(a.clone());
                false
            } else {
                true
            }
        });
        due.sort_by_key(Arrival::sort_key);
        due
    }

    /// Touched planet ids in canonical (bytewise) order.
    pub fn sorted_ids(&self) -> Vec<PlanetId> {
        let mut ids: Vec<PlanetId> = self.planets.keys().copied().collect();
        ids.sort();
        ids
    }
}
