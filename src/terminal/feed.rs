//! Live terminal track feeds
//!
//! Endpoints serve a JSON array (or `{ "results": [...] }`) of objects with
//! `lat|latitude`, `lon|longitude` and optional `alt|altitude` (metres), `id`
//! and `source`. Field types are tolerated loosely: numbers may arrive as
//! strings, ids as numbers.

use std::sync::{
    Arc, Mutex,
    mpsc::{self, Receiver, Sender},
};
use std::thread;

use anyhow::Result;
use bevy::prelude::*;
use serde_json::Value;
use thiserror::Error;

use crate::terminal::simulator::TerminalCategory;

#[derive(Debug, Error)]
pub enum FeedFormatError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected an array of tracks or an object with a `results` array")]
    UnexpectedShape,

    #[error("track {index}: missing {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("track {index}: {field} {value} out of range")]
    OutOfRange {
        index: usize,
        field: &'static str,
        value: f64,
    },
}

/// One validated track from a feed
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRecord {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub altitude_m: Option<f64>,
    pub id: Option<String>,
    pub source: Option<String>,
}

impl TrackRecord {
    /// Validate the track at position `index` of a feed.
    pub fn from_value(value: &Value, index: usize) -> Result<Self, FeedFormatError> {
        let latitude_deg = get_f64(value, "lat")
            .or_else(|| get_f64(value, "latitude"))
            .ok_or(FeedFormatError::MissingField {
                index,
                field: "latitude",
            })?;
        let longitude_deg = get_f64(value, "lon")
            .or_else(|| get_f64(value, "longitude"))
            .ok_or(FeedFormatError::MissingField {
                index,
                field: "longitude",
            })?;

        if !latitude_deg.is_finite() || latitude_deg.abs() > 90.0 {
            return Err(FeedFormatError::OutOfRange {
                index,
                field: "latitude",
                value: latitude_deg,
            });
        }
        if !longitude_deg.is_finite() || longitude_deg.abs() > 180.0 {
            return Err(FeedFormatError::OutOfRange {
                index,
                field: "longitude",
                value: longitude_deg,
            });
        }

        let altitude_m = get_f64(value, "alt")
            .or_else(|| get_f64(value, "altitude"))
            .filter(|alt| alt.is_finite());

        Ok(Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
            id: get_id(value),
            source: get_string(value, "source").filter(|s| !s.is_empty()),
        })
    }
}

/// Split a feed body into its track objects.
pub fn parse_track_feed(body: &str) -> Result<Vec<Value>, FeedFormatError> {
    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(FeedFormatError::UnexpectedShape),
        },
        _ => Err(FeedFormatError::UnexpectedShape),
    }
}

fn get_string(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

fn get_f64(value: &Value, key: &str) -> Option<f64> {
    match value.get(key) {
        Some(Value::Number(num)) => num.as_f64(),
        Some(Value::String(val)) => val.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn get_id(value: &Value) -> Option<String> {
    match value.get("id") {
        Some(Value::String(val)) if !val.is_empty() => Some(val.clone()),
        Some(Value::Number(num)) => Some(num.to_string()),
        _ => None,
    }
}

pub enum FeedCommand {
    Fetch {
        category: TerminalCategory,
        url: String,
    },
}

pub enum FeedResult {
    Tracks {
        category: TerminalCategory,
        url: String,
        tracks: Vec<Value>,
    },
    Error {
        category: TerminalCategory,
        url: String,
        error: String,
    },
}

#[derive(Resource)]
pub struct FeedChannels {
    pub cmd_tx: Sender<FeedCommand>,
    pub res_rx: Arc<Mutex<Receiver<FeedResult>>>,
}

/// Start the background worker that fetches live track feeds
pub fn start_feed_worker() -> FeedChannels {
    let (cmd_tx, cmd_rx) = mpsc::channel::<FeedCommand>();
    let (res_tx, res_rx) = mpsc::channel::<FeedResult>();

    thread::spawn(move || {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!("[TRACK FEED] failed to start tokio runtime: {}", e);
                return;
            }
        };
        rt.block_on(async move {
            let client = reqwest::Client::new();

            while let Ok(cmd) = cmd_rx.recv() {
                let FeedCommand::Fetch { category, url } = cmd;
                let msg = match fetch_tracks(&client, &url).await {
                    Ok(tracks) => FeedResult::Tracks {
                        category,
                        url,
                        tracks,
                    },
                    Err(e) => FeedResult::Error {
                        category,
                        url,
                        error: e.to_string(),
                    },
                };
                let _ = res_tx.send(msg);
            }
        });
    });

    FeedChannels {
        cmd_tx,
        res_rx: Arc::new(Mutex::new(res_rx)),
    }
}

async fn fetch_tracks(client: &reqwest::Client, url: &str) -> Result<Vec<Value>> {
    let resp = client
        .get(url)
        .header("accept", "application/json")
        .send()
        .await?;
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        anyhow::bail!("HTTP {} for {}", status, url);
    }
    Ok(parse_track_feed(&body)?)
}
