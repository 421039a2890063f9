//! Periodic publication of the active object's sky position.
//!
//! Every tick the active object is re-resolved and a small JSON record is
//! rewritten at a well-known path for the telescope control loop to read.
//! When no valid position exists a sentinel record with the same schema is
//! written instead, so consumers always find the file. Write failures are
//! transient: logged, surfaced on the status line, never fatal to the loop.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Sender};
use objinfo::{ObjectPosition, Resolver};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::error::PublishError;
use crate::status::{self, StatusCallback};

/// Placeholder written in every field of a sentinel record.
pub const SENTINEL: &str = "-";

/// Name of the published status file.
pub const STATUS_FILE_NAME: &str = "rtcoor.data";

/// Shared cell naming the active object; the control thread writes it on
/// selection, the publisher thread reads it each tick.
pub type ActiveTarget = Arc<Mutex<Option<String>>>;

/// Outcome of one publish tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A full position record was written.
    Published,
    /// The sentinel record was written (no selection, object unresolved,
    /// or position undefined).
    PublishedSentinel,
}

/// Resolve the status file location: `QMAN_RTCOOR` when set, else the
/// shared-memory mount when present, else the working directory.
pub fn status_file_path() -> PathBuf {
    if let Ok(path) = std::env::var("QMAN_RTCOOR") {
        return PathBuf::from(path);
    }
    let shm = Path::new("/dev/shm");
    if shm.exists() {
        shm.join(STATUS_FILE_NAME)
    } else {
        PathBuf::from(STATUS_FILE_NAME)
    }
}

/// Periodic position publisher.
pub struct PositionPublisher {
    resolver: Arc<dyn Resolver + Send + Sync>,
    target: ActiveTarget,
    path: PathBuf,
    period: Duration,
    status: StatusCallback,
}

impl PositionPublisher {
    pub fn new(
        resolver: Arc<dyn Resolver + Send + Sync>,
        target: ActiveTarget,
        path: PathBuf,
        period: Duration,
        status: StatusCallback,
    ) -> Self {
        Self {
            resolver,
            target,
            path,
            period,
            status,
        }
    }

    /// Run one tick: resolve the active object for "now" and rewrite the
    /// status file.
    pub fn publish_once(&self) -> Result<TickOutcome, PublishError> {
        let name = self.target.lock().unwrap().clone();
        let record = match name {
            Some(name) => {
                let position = self.resolver.resolve(&name, OffsetDateTime::now_utc());
                position_record(&position)
            }
            None => sentinel_record(),
        };

        let outcome = if record["ra"] == json!(SENTINEL) {
            TickOutcome::PublishedSentinel
        } else {
            TickOutcome::Published
        };

        let text = serde_json::to_string(&record)?;
        let temp = self.path.with_extension("data.tmp");
        fs::write(&temp, text)?;
        fs::rename(&temp, &self.path)?;
        Ok(outcome)
    }

    /// Spawn the tick loop on its own thread.
    pub fn spawn(self) -> PublisherHandle {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let thread = std::thread::spawn(move || {
            let ticker = tick(self.period);
            loop {
                select! {
                    recv(ticker) -> _ => match self.publish_once() {
                        Ok(outcome) => debug!("position published: {:?}", outcome),
                        Err(e) => {
                            warn!("status publish failed: {e}");
                            (self.status)(&status::stamp(&format!("Error: {e}")));
                        }
                    },
                    recv(stop_rx) -> _ => break,
                }
            }
        });
        PublisherHandle {
            stop: stop_tx,
            thread,
        }
    }
}

/// Stops the publish loop when asked (or when dropped).
pub struct PublisherHandle {
    stop: Sender<()>,
    thread: JoinHandle<()>,
}

impl PublisherHandle {
    /// Stop the loop and wait for the thread to finish.
    pub fn stop(self) {
        drop(self.stop);
        if let Err(e) = self.thread.join() {
            warn!("publisher thread panicked: {:?}", e);
        }
    }
}

/// Build the published record for a resolved position, or the sentinel
/// when the position is incomplete.
fn position_record(position: &ObjectPosition) -> Value {
    let (Some(eq), Some(horizon)) = (position.equatorial, position.horizon) else {
        return sentinel_record();
    };
    let dec_sex = objinfo::sexagesimal::degrees(eq.dec_deg);
    let dec_degrees_part = dec_sex.split_whitespace().next().unwrap_or(SENTINEL);
    json!({
        "ra": round_to(eq.ra_deg, 5),
        "dec": round_to(eq.dec_deg, 5),
        "dec_sex": dec_degrees_part,
        "ha": round_to(horizon.ha_deg, 5),
        "ha_sex": objinfo::sexagesimal::hours_signed(horizon.ha_deg),
        "alt": round_to(horizon.alt_deg, 1),
        "az": round_to(horizon.az_deg, 1),
        "objname": position.name,
    })
}

/// The placeholder record published when no valid position exists. Same
/// schema as the full record, every value the placeholder string.
pub fn sentinel_record() -> Value {
    json!({
        "ra": SENTINEL,
        "dec": SENTINEL,
        "dec_sex": SENTINEL,
        "ha": SENTINEL,
        "ha_sex": SENTINEL,
        "alt": SENTINEL,
        "az": SENTINEL,
        "objname": SENTINEL,
    })
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
