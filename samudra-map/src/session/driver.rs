//! Async driver for a navigation session.

use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{FailureReason, NavEvent, NavigationSession, SessionState};

/// Drive `session` to completion, sending every event to `events`.
///
/// Each step runs on tokio's blocking pool, since it may wait on a slow
/// obstacle oracle, so other tasks on the runtime keep making progress. The
/// token is raced against every step and every poll interval; once it fires
/// the session emits a final `failed` event with reason `cancelled` and
/// stops. A step still in flight at that point finishes in the background
/// and its result is discarded. A closed receiver is treated as
/// cancellation, without the final event.
pub async fn run(
    mut session: NavigationSession,
    events: mpsc::Sender<NavEvent>,
    cancel: CancellationToken,
) -> SessionState {
    let poll_interval = session.config().poll_interval;

    loop {
        if cancel.is_cancelled() {
            finish_cancelled(&mut session, &events).await;
            break;
        }

        let worker = tokio::task::spawn_blocking(move || {
            let step = session.step();
            (session, step)
        });
        let (returned, step) = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("[Session] cancelled during a step");
                let _ = events
                    .send(NavEvent::Failed {
                        reason: FailureReason::Cancelled,
                    })
                    .await;
                return SessionState::Failed(FailureReason::Cancelled);
            }
            joined = worker => match joined {
                Ok(done) => done,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => {
                    warn!("[Session] step aborted: {}", e);
                    return SessionState::Failed(FailureReason::Cancelled);
                }
            },
        };
        session = returned;

        for event in step.events {
            if events.send(event).await.is_err() {
                debug!("[Session] event receiver dropped, stopping");
                session.cancel();
                return session.state();
            }
        }

        if session.is_finished() {
            break;
        }

        if step.suspend {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    finish_cancelled(&mut session, &events).await;
                    break;
                }
                _ = tokio::time::sleep(poll_interval) => {}
            }
        }
    }

    session.state()
}

async fn finish_cancelled(session: &mut NavigationSession, events: &mpsc::Sender<NavEvent>) {
    if let Some(event) = session.cancel() {
        let _ = events.send(event).await;
    }
}

/// Spawn [`run`] on the current tokio runtime.
///
/// Returns the task handle and the receiving end of the event stream.
pub fn spawn(
    session: NavigationSession,
    cancel: CancellationToken,
    buffer: usize,
) -> (JoinHandle<SessionState>, mpsc::Receiver<NavEvent>) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    let handle = tokio::spawn(run(session, tx, cancel));
    (handle, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LatLon;
    use crate::cost::{CostMode, CostModel};
    use crate::graph::{GeoGraph, LatticeSpec};
    use crate::oracle::{FnOracle, ObstacleOracle, OpenWater};
    use crate::session::{NavContext, SessionConfig, TransitRequest};
    use std::sync::Arc;
    use std::time::Duration;

    fn create_test_session() -> NavigationSession {
        create_session_with(Arc::new(OpenWater), Duration::from_millis(500))
    }

    fn create_session_with(
        oracle: Arc<dyn ObstacleOracle>,
        poll_interval: Duration,
    ) -> NavigationSession {
        let graph = GeoGraph::lattice(
            &LatticeSpec {
                lat_min: 10.0,
                lat_max: 10.1,
                lon_min: 70.0,
                lon_max: 70.1,
                resolution_deg: 0.01,
            },
            None,
        )
        .unwrap();
        let ctx = NavContext::new(
            Arc::new(graph),
            Arc::new(CostModel::default()),
            oracle,
        );
        NavigationSession::new(
            ctx,
            TransitRequest {
                start: LatLon::new(10.0, 70.0),
                goal: LatLon::new(10.1, 70.1),
                mode: CostMode::PlainDistance,
            },
            SessionConfig {
                poll_interval,
                ..SessionConfig::default()
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_to_arrival() {
        let (handle, mut rx) = spawn(create_test_session(), CancellationToken::new(), 16);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }

        assert_eq!(handle.await.unwrap(), SessionState::Arrived);
        assert_eq!(events.first().map(NavEvent::kind), Some("init"));
        assert_eq!(events.last(), Some(&NavEvent::Done {}));
        assert_eq!(
            events.iter().filter(|e| e.kind() == "progress").count(),
            11
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_interval_paces_progress() {
        let start = tokio::time::Instant::now();
        let (handle, mut rx) = spawn(create_test_session(), CancellationToken::new(), 16);
        while rx.recv().await.is_some() {}
        handle.await.unwrap();

        // One suspension per traversed node
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(5500), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(6000), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_transit() {
        let cancel = CancellationToken::new();
        let (handle, mut rx) = spawn(create_test_session(), cancel.clone(), 16);

        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            if matches!(event, NavEvent::Progress { step: 3, .. }) {
                cancel.cancel();
            }
            events.push(event);
        }

        assert_eq!(
            handle.await.unwrap(),
            SessionState::Failed(FailureReason::Cancelled)
        );
        assert_eq!(
            events.last(),
            Some(&NavEvent::Failed {
                reason: FailureReason::Cancelled
            })
        );
        assert_eq!(events.iter().filter(|e| e.kind() == "progress").count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_start() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (handle, mut rx) = spawn(create_test_session(), cancel, 4);

        assert_eq!(
            rx.recv().await,
            Some(NavEvent::Failed {
                reason: FailureReason::Cancelled
            })
        );
        assert_eq!(rx.recv().await, None);
        assert_eq!(
            handle.await.unwrap(),
            SessionState::Failed(FailureReason::Cancelled)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_receiver_stops_session() {
        let (handle, rx) = spawn(create_test_session(), CancellationToken::new(), 1);
        drop(rx);

        assert_eq!(
            handle.await.unwrap(),
            SessionState::Failed(FailureReason::Cancelled)
        );
    }

    // Wall clock on a single-threaded runtime: a step that blocks the
    // runtime thread would hold up every other session.
    #[tokio::test]
    async fn test_slow_oracle_does_not_stall_other_sessions() {
        let slow_oracle = FnOracle(|_: LatLon| {
            std::thread::sleep(Duration::from_millis(100));
            false
        });
        let slow_cancel = CancellationToken::new();
        let (slow_handle, mut slow_rx) = spawn(
            create_session_with(Arc::new(slow_oracle), Duration::from_millis(5)),
            slow_cancel.clone(),
            16,
        );

        let started = std::time::Instant::now();
        let (fast_handle, mut fast_rx) = spawn(
            create_session_with(Arc::new(OpenWater), Duration::from_millis(5)),
            CancellationToken::new(),
            16,
        );
        while fast_rx.recv().await.is_some() {}
        assert_eq!(fast_handle.await.unwrap(), SessionState::Arrived);
        let elapsed = started.elapsed();
        assert!(elapsed < Duration::from_millis(800), "{:?}", elapsed);

        // The slow session is still scanning its first route
        slow_cancel.cancel();
        let cancelled_at = std::time::Instant::now();
        let mut last = None;
        while let Some(event) = slow_rx.recv().await {
            last = Some(event);
        }
        assert_eq!(
            last,
            Some(NavEvent::Failed {
                reason: FailureReason::Cancelled
            })
        );
        assert_eq!(
            slow_handle.await.unwrap(),
            SessionState::Failed(FailureReason::Cancelled)
        );
        assert!(cancelled_at.elapsed() < Duration::from_millis(500));
    }
}
