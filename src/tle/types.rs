//! TLE data types and communication structures

use bevy::prelude::*;
use chrono::{DateTime, Utc};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
    mpsc::{Receiver, Sender},
};

use crate::config::TraceConfig;
use crate::orbital::SatelliteRecord;

/// Raw name + two element lines, as found in a TLE text feed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementSet {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

/// Generation counter shared between the registry and the fetch worker.
///
/// Every group load takes a fresh token; only the newest token is current, so
/// results of superseded loads can be dropped wherever they surface.
#[derive(Clone, Debug, Default)]
pub struct LoadTracker {
    current: Arc<AtomicU64>,
}

impl LoadTracker {
    /// Start a new load, invalidating every token handed out before.
    pub fn begin(&self) -> LoadToken {
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        LoadToken {
            generation,
            current: Arc::clone(&self.current),
        }
    }

    /// Invalidate outstanding tokens without starting a load.
    pub fn cancel(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }
}

/// Handle for one group load
#[derive(Clone, Debug)]
pub struct LoadToken {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl LoadToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}

/// Commands for the TLE fetcher worker thread
#[derive(Debug)]
pub enum FetchCommand {
    FetchGroup {
        token: LoadToken,
        group: String,
        url: String,
        epoch_anchored: bool,
        trace: TraceConfig,
        /// Trace start for groups that are not epoch-anchored
        requested_at: DateTime<Utc>,
    },
}

/// Results from the TLE fetcher worker thread
pub enum FetchResultMsg {
    /// Records are fully built off the main thread, ready to swap in
    GroupLoaded {
        token: LoadToken,
        group: String,
        records: Vec<SatelliteRecord>,
        rejected: usize,
    },
    GroupFailure {
        token: LoadToken,
        group: String,
        error: String,
    },
}

/// Resource containing channels for communicating with the TLE worker thread
#[derive(Resource)]
pub struct FetchChannels {
    pub cmd_tx: Sender<FetchCommand>,
    pub res_rx: Arc<Mutex<Receiver<FetchResultMsg>>>,
}
