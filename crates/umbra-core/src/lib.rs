//! Umbra Core -- a deterministic, lazily-evaluated strategy-game economy.
//!
//! A sparse universe of planets accrues energy and silver over time and
//! exchanges fleets through timed arrival events. Nothing ticks: a planet's
//! state is materialized on demand by replaying growth curves and due
//! arrivals since its last materialization, and every curve is evaluated in
//! Q64.64 fixed-point with truncating rounding, so independent observers
//! agree bit-for-bit no matter when (or whether) they look.
//!
//! # Command Flow
//!
//! Every call on [`command::Engine`] follows the same shape:
//!
//! 1. **Clock** -- reject timestamps that run backwards.
//! 2. **Materialize** -- bring each touched planet current via the lazy
//!    update engine, applying due arrivals in `(arrival_time, id)` order.
//! 3. **Validate** -- ownership, balances, distance, range, world radius.
//! 4. **Apply** -- mutate the store and/or enqueue a new arrival.
//!
//! A failed validation returns a typed [`command::EngineError`] and leaves
//! no partial command effect behind.
//!
//! # Key Types
//!
//! - [`command::Engine`] -- the command processor and query surface.
//! - [`store::PlanetStore`] -- canonical planet records and per-destination
//!   arrival queues.
//! - [`lazy`] -- the lazy update engine: logistic energy growth, linear
//!   silver accrual, conquest resolution.
//! - [`planet::PlanetDescriptor`] -- immutable coordinate-derived inputs
//!   from the external [`command::PlanetProvider`].
//! - [`radius::WorldRadius`] -- the monotonic universe boundary.
//! - [`fixed::Fix`] -- Q64.64 fixed-point type for deterministic math.
//! - [`serialize`] -- versioned snapshot support via bitcode.

pub mod arrival;
pub mod command;
pub mod config;
pub mod event;
pub mod fixed;
pub mod hash;
pub mod id;
pub mod lazy;
pub mod planet;
pub mod query;
pub mod radius;
pub mod serialize;
pub mod store;
pub mod upgrade;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
