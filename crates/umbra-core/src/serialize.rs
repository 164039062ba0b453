//! Versioned binary snapshots of the full engine state.
//!
//! Provides binary serialization via `bitcode` with a versioned header, so
//! a long-running universe can be parked on disk and restored bit-exactly.
//! The event buffer is transient and deliberately not part of a snapshot;
//! the provider is external and must be supplied again at restore time.

use crate::command::{Engine, PlanetProvider};
use crate::config::GameConfig;
use crate::event::EventLog;
use crate::fixed::Timestamp;
use crate::id::{PlanetId, PlayerId};
use crate::radius::WorldRadius;
use crate::store::PlanetStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Magic number identifying an engine snapshot ("UMBR").
const SNAPSHOT_MAGIC: u32 = 0x554D_4252;

/// Current snapshot format version.
const FORMAT_VERSION: u16 = 1;

/// Errors from snapshot encoding.
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

/// Errors from snapshot decoding.
#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("invalid magic number: expected 0x{SNAPSHOT_MAGIC:08X}, got 0x{0:08X}")]
    BadMagic(u32),

    #[error("unsupported format version: expected {FORMAT_VERSION}, got {0}")]
    UnsupportedVersion(u16),

    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

/// Everything a universe needs to resume exactly where it left off.
#[derive(Serialize, Deserialize)]
struct WorldSnapshot {
    magic: u32,
    version: u16,
    config: GameConfig,
    store: PlanetStore,
    radius: WorldRadius,
    clock: Timestamp,
    homeworlds: HashMap<PlayerId, PlanetId>,
}

impl Engine {
    /// Serialize the engine state to a binary blob.
    pub fn snapshot(&self) -> Result<Vec<u8>, SerializeError> {
        let snapshot = WorldSnapshot {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
            config: self.config.clone(),
            store: self.store.clone(),
            radius: self.radius,
            clock: self.clock,
            homeworlds: self.homeworlds.clone(),
        };
        bitcode::serialize(&snapshot).map_err(|e| SerializeError::Encode(e.to_string()))
    }

    /// Restore an engine from a snapshot, reattaching the external
    /// descriptor provider.
    pub fn restore(
        data: &[u8],
        provider: Box<dyn PlanetProvider>,
    ) -> Result<Self, DeserializeError> {
        let snapshot: WorldSnapshot =
            bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
        if snapshot.magic != SNAPSHOT_MAGIC {
            return Err(DeserializeError::BadMagic(snapshot.magic));
        }
        if snapshot.version != FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(snapshot.version));
        }
        Ok(Engine {
            config: snapshot.config,
            store: snapshot.store,
            radius: snapshot.radius,
            clock: snapshot.clock,
            homeworlds: snapshot.homeworlds,
            events: EventLog::new(),
            provider,
        })
    }
}
