//! Learned layer isolated on a worker thread with a per-query timeout.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, warn};

use crate::core::LatLon;
use crate::error::{OracleError, Result};

use super::learned::{Assessment, LearnedLayer};

struct AssessRequest {
    at: LatLon,
    /// Caller stops waiting at this instant
    deadline: Instant,
    reply: Sender<std::result::Result<Assessment, OracleError>>,
}

/// Runs a [`LearnedLayer`] on a dedicated thread.
///
/// Callers wait at most `timeout` per query; a late answer is discarded and
/// the query reports [`OracleError::Timeout`]. Queued queries whose caller
/// has already given up are skipped without being assessed, so a slow spell
/// leaves no backlog behind. The worker exits once this handle is dropped
/// and its current query finishes.
pub struct TimedLearnedLayer {
    requests: Sender<AssessRequest>,
    timeout: Duration,
}

impl TimedLearnedLayer {
    pub fn spawn<L: LearnedLayer + 'static>(layer: L, timeout: Duration) -> Result<Self> {
        let (requests, inbox) = crossbeam_channel::unbounded();

        thread::Builder::new()
            .name("learned-layer".into())
            .spawn(move || worker_loop(layer, inbox))?;

        Ok(Self { requests, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn worker_loop<L: LearnedLayer>(layer: L, inbox: Receiver<AssessRequest>) {
    debug!("[LearnedLayer] worker started");
    let mut skipped = 0usize;
    for request in inbox.iter() {
        if Instant::now() >= request.deadline {
            skipped += 1;
            continue;
        }
        if skipped > 0 {
            debug!("[LearnedLayer] skipped {} expired queries", skipped);
            skipped = 0;
        }
        let result = layer.assess(request.at);
        // Caller may have given up already
        let _ = request.reply.send(result);
    }
    debug!("[LearnedLayer] worker exiting");
}

impl LearnedLayer for TimedLearnedLayer {
    fn assess(&self, at: LatLon) -> std::result::Result<Assessment, OracleError> {
        let (reply, answer) = crossbeam_channel::bounded(1);
        let deadline = Instant::now() + self.timeout;
        self.requests
            .send(AssessRequest {
                at,
                deadline,
                reply,
            })
            .map_err(|_| OracleError::Unavailable("worker stopped".into()))?;

        match answer.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "[LearnedLayer] no answer for ({:.5}, {:.5}) within {:?}",
                    at.lat, at.lon, self.timeout
                );
                Err(OracleError::Timeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(OracleError::Unavailable("worker dropped the request".into()))
            }
        }
    }
}
