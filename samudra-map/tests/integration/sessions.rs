//! Live sessions driven on tokio's paused clock.

use std::sync::Arc;
use std::time::Duration;

use samudra_map::core::LatLon;
use samudra_map::cost::CostMode;
use samudra_map::navigator::Navigator;
use samudra_map::oracle::{ObstacleEngine, RuleLayer, Sighting, SightingsLayer};
use samudra_map::session::{self, NavEvent, SessionConfig, SessionState, TransitRequest};
use tokio_util::sync::CancellationToken;

use super::common::{context, tiny_lattice};

fn navigator_with_sightings(sightings: Vec<Sighting>) -> Navigator {
    let engine = ObstacleEngine::new(RuleLayer::new())
        .with_learned(Arc::new(SightingsLayer::new(sightings)));
    Navigator::new(
        context(tiny_lattice(), Arc::new(engine)),
        SessionConfig {
            poll_interval: Duration::from_millis(250),
            ..SessionConfig::default()
        },
    )
}

fn transit(start: LatLon, goal: LatLon) -> TransitRequest {
    TransitRequest {
        start,
        goal,
        mode: CostMode::PlainDistance,
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_sessions_share_one_graph() {
    let navigator = navigator_with_sightings(Vec::new());
    let requests = [
        transit(LatLon::new(10.0, 70.0), LatLon::new(12.0, 72.0)),
        transit(LatLon::new(12.0, 70.0), LatLon::new(10.0, 72.0)),
        transit(LatLon::new(11.0, 70.0), LatLon::new(11.0, 72.0)),
    ];

    let mut running = Vec::new();
    for request in requests {
        let session = navigator.begin_transit(request);
        running.push(session::spawn(session, CancellationToken::new(), 8));
    }

    for (handle, mut rx) in running {
        let mut steps = Vec::new();
        let mut kinds = Vec::new();
        while let Some(event) = rx.recv().await {
            if let NavEvent::Progress { step, .. } = event {
                steps.push(step);
            }
            kinds.push(event.kind());
        }
        assert_eq!(handle.await.unwrap(), SessionState::Arrived);
        assert_eq!(kinds.first(), Some(&"init"));
        assert_eq!(kinds.last(), Some(&"done"));
        // Progress steps are strictly ordered within a session
        assert!(steps.windows(2).all(|w| w[1] == w[0] + 1));
        assert_eq!(steps.first(), Some(&1));
    }
}

#[tokio::test(start_paused = true)]
async fn test_sighting_on_route_is_avoided_from_the_start() {
    let navigator = navigator_with_sightings(vec![Sighting {
        lat: 11.0,
        lon: 71.0,
        radius_km: 5.0,
        confidence: 0.9,
    }]);
    let session = navigator.begin_transit(transit(LatLon::new(10.0, 70.0), LatLon::new(12.0, 72.0)));
    let (handle, mut rx) = session::spawn(session, CancellationToken::new(), 8);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert_eq!(handle.await.unwrap(), SessionState::Arrived);
    assert!(matches!(
        events[0],
        NavEvent::Init {
            status: samudra_map::RouteStatus::Rerouted,
            ..
        }
    ));
    assert!(!events.iter().any(|e| matches!(
        e,
        NavEvent::Progress { lat, lon, .. } if (*lat - 11.0).abs() < 1e-9 && (*lon - 71.0).abs() < 1e-9
    )));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_oracle_queries_and_emissions() {
    let navigator = navigator_with_sightings(Vec::new());
    let session = navigator.begin_transit(transit(LatLon::new(10.0, 70.0), LatLon::new(12.0, 72.0)));
    let cancel = CancellationToken::new();
    let (handle, mut rx) = session::spawn(session, cancel.clone(), 8);

    assert!(matches!(rx.recv().await, Some(NavEvent::Init { .. })));
    assert!(matches!(rx.recv().await, Some(NavEvent::Progress { step: 1, .. })));
    cancel.cancel();

    let rest: Vec<NavEvent> = {
        let mut rest = Vec::new();
        while let Some(event) = rx.recv().await {
            rest.push(event);
        }
        rest
    };
    assert_eq!(rest.last().map(NavEvent::kind), Some("failed"));
    assert!(rest.len() <= 2);
    assert!(matches!(
        handle.await.unwrap(),
        SessionState::Failed(samudra_map::session::FailureReason::Cancelled)
    ));
}
