//! TLE fetching functionality

use crate::config::TraceConfig;
use crate::orbital::SatelliteRecord;
use crate::tle::parser::parse_element_sets;
use crate::tle::types::{ElementSet, FetchChannels, FetchCommand, FetchResultMsg};
use anyhow::Result;
use bevy::log::{debug, error, info, warn};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

/// Parse element sets into records with precomputed traces.
///
/// Bad sets are logged and counted, never fatal. Epoch-anchored traces start
/// at each record's epoch, the others at `now`.
pub fn build_records(
    element_sets: &[ElementSet],
    epoch_anchored: bool,
    trace: &TraceConfig,
    now: DateTime<Utc>,
) -> (Vec<SatelliteRecord>, usize) {
    let mut records = Vec::with_capacity(element_sets.len());
    let mut rejected = 0;
    let start = (!epoch_anchored).then_some(now);

    for set in element_sets {
        match SatelliteRecord::from_element_set(set, epoch_anchored) {
            Ok(mut record) => {
                record.refresh_trace(trace.duration_minutes, trace.step_minutes, start);
                records.push(record);
            }
            Err(e) => {
                warn!("[SGP4] {}", e);
                rejected += 1;
            }
        }
    }
    (records, rejected)
}

/// Start the background TLE worker thread
pub fn start_tle_worker() -> FetchChannels {
    let (cmd_tx, cmd_rx) = mpsc::channel::<FetchCommand>();
    let (res_tx, res_rx) = mpsc::channel::<FetchResultMsg>();

    thread::spawn(move || {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!("[TLE] failed to start tokio runtime: {}", e);
                return;
            }
        };
        rt.block_on(async move {
            let client = reqwest::Client::new();

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    FetchCommand::FetchGroup {
                        token,
                        group,
                        url,
                        epoch_anchored,
                        trace,
                        requested_at,
                    } => {
                        if !token.is_current() {
                            debug!("[TLE GROUP] group={} superseded before fetch", group);
                            continue;
                        }

                        let msg = match fetch_group(&client, &url).await {
                            Ok(element_sets) => {
                                info!(
                                    "[TLE GROUP] group={} fetched {} element sets",
                                    group,
                                    element_sets.len()
                                );
                                if !token.is_current() {
                                    debug!("[TLE GROUP] group={} superseded, skipping parse", group);
                                    continue;
                                }
                                let (records, rejected) = build_records(
                                    &element_sets,
                                    epoch_anchored,
                                    &trace,
                                    requested_at,
                                );
                                FetchResultMsg::GroupLoaded {
                                    token,
                                    group,
                                    records,
                                    rejected,
                                }
                            }
                            Err(e) => {
                                warn!("[TLE GROUP] group={} url={} FAILURE: {}", group, url, e);
                                FetchResultMsg::GroupFailure {
                                    token,
                                    group,
                                    error: e.to_string(),
                                }
                            }
                        };

                        let stale = match &msg {
                            FetchResultMsg::GroupLoaded { token, .. }
                            | FetchResultMsg::GroupFailure { token, .. } => !token.is_current(),
                        };
                        if stale {
                            debug!("[TLE GROUP] dropping result of superseded load");
                            continue;
                        }
                        let _ = res_tx.send(msg);
                    }
                }
            }
        });
    });

    FetchChannels {
        cmd_tx,
        res_rx: Arc::new(Mutex::new(res_rx)),
    }
}

async fn fetch_group(client: &reqwest::Client, url: &str) -> Result<Vec<ElementSet>> {
    let resp = client
        .get(url)
        .header("accept", "text/plain")
        .send()
        .await?;
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        anyhow::bail!("HTTP {} for {}", status, url);
    }

    let element_sets = parse_element_sets(&body);
    if element_sets.is_empty() {
        let sample: String = body.lines().take(3).collect::<Vec<_>>().join("\\n");
        anyhow::bail!("no element sets in response. Sample: {}", sample);
    }
    Ok(element_sets)
}
