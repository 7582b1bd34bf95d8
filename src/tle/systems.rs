//! TLE processing systems

use bevy::prelude::*;

use crate::constellation::ConstellationRegistry;
use crate::constellation::landing::LandingStations;
use crate::tle::types::{FetchChannels, FetchResultMsg};

/// System to drain fetch results into the constellation registry
pub fn process_fetch_results_system(
    mut registry: ResMut<ConstellationRegistry>,
    mut landing: ResMut<LandingStations>,
    fetch: Option<Res<FetchChannels>>,
) {
    let Some(fetch) = fetch else { return };
    let Ok(guard) = fetch.res_rx.lock() else {
        return;
    };
    while let Ok(msg) = guard.try_recv() {
        match msg {
            FetchResultMsg::GroupLoaded {
                token,
                group,
                records,
                rejected,
            } => {
                if registry.finish_load(&token, &group, records, rejected) {
                    landing.refresh(&group);
                }
            }
            FetchResultMsg::GroupFailure {
                token,
                group,
                error,
            } => {
                if registry.fail_load(&token, &group, &error) {
                    error!("[TLE DISPATCH] group={} failed: {}", group, error);
                }
            }
        }
    }
}
