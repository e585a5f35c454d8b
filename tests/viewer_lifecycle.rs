mod common;

use std::time::{Duration, Instant};

use serde_json::json;
use table_viewer::supervisor::ports::probe_port_pair;
use table_viewer::supervisor::SupervisorPhase;
use table_viewer::{GraphicViewer, PokerViewer, RenderError, ViewerConfig};

use common::{heads_up_snapshot, viewer_config, wait_until_refused, SseClient};

#[tokio::test]
async fn renders_reach_current_and_late_viewers() {
    let mut viewer = GraphicViewer::spawn(viewer_config(2, 1)).await.unwrap();
    assert_eq!(viewer.phase(), SupervisorPhase::Running);

    let page = reqwest::get(viewer.url().clone())
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    for id in ["player-0", "player-1", "card-1-0", "street-commit-1", "pot-text"] {
        assert!(page.contains(&format!(r#"id="{id}""#)), "page lacks #{id}");
    }

    let events = viewer.url().join("events").unwrap();
    let mut early = SseClient::connect(events.as_str()).await;
    assert_eq!(early.next_config().await, json!({}));

    viewer.render(&heads_up_snapshot()).await.unwrap();
    let config = early.next_config().await;
    assert_eq!(config["action"], 0);
    assert_eq!(config["pot"], 10);
    assert_eq!(config["hole_cards"], json!([["A♥"], ["A♣"]]));
    assert_eq!(config["prev_action"], json!([1, 10, false]));

    let mut late = SseClient::connect(events.as_str()).await;
    assert_eq!(late.next_config().await, config);

    viewer.close().await.unwrap();
}

#[tokio::test]
async fn renders_arrive_in_order() {
    let mut viewer = GraphicViewer::spawn(viewer_config(3, 2)).await.unwrap();
    let events = viewer.url().join("events").unwrap();
    let mut client = SseClient::connect(events.as_str()).await;
    assert_eq!(client.next_config().await, json!({}));

    let mut snapshot = heads_up_snapshot();
    for pot in [10, 20, 30, 40] {
        snapshot.pot = pot;
        viewer.render(&snapshot).await.unwrap();
    }

    // intermediate frames may be skipped, never reordered
    let mut last = 0;
    while last < 40 {
        let pot = client.next_config().await["pot"].as_u64().unwrap();
        assert!(pot > last, "pot went from {last} to {pot}");
        last = pot;
    }
    viewer.close().await.unwrap();
}

#[tokio::test]
async fn close_is_idempotent_and_reaps_the_process() {
    let mut viewer = GraphicViewer::spawn(viewer_config(2, 2)).await.unwrap();
    let port = viewer.port();

    viewer.close().await.unwrap();
    assert!(viewer.is_closed());
    assert!(viewer.exit_status().is_some());
    assert!(viewer.pid().is_none());

    viewer.close().await.unwrap();
    viewer.render(&heads_up_snapshot()).await.unwrap();
    assert_eq!(viewer.phase(), SupervisorPhase::Closed);
    assert!(wait_until_refused(port).await);
}

#[tokio::test]
async fn repeated_construct_and_teardown_on_ephemeral_ports() {
    for round in 0..3 {
        let mut viewer = GraphicViewer::spawn(viewer_config(2 + round, 2))
            .await
            .unwrap_or_else(|err| panic!("round {round}: {err}"));
        viewer
            .render_with_pause(&heads_up_snapshot(), Duration::ZERO)
            .await
            .unwrap();
        PokerViewer::close(&mut viewer).await.unwrap();
        assert!(viewer.is_closed());
    }
}

#[tokio::test]
async fn honours_a_fixed_port() {
    let port = probe_port_pair("127.0.0.1").unwrap();
    let mut viewer = GraphicViewer::spawn(viewer_config(2, 2).with_port(port))
        .await
        .unwrap();
    assert_eq!(viewer.port(), port);
    assert_eq!(viewer.url().as_str(), format!("http://127.0.0.1:{port}/"));
    viewer.close().await.unwrap();
}

#[tokio::test]
async fn dropping_the_viewer_stops_the_process() {
    let viewer = GraphicViewer::spawn(viewer_config(2, 2)).await.unwrap();
    let port = viewer.port();
    drop(viewer);
    assert!(wait_until_refused(port).await);
}

#[tokio::test]
async fn missing_binary_is_an_initialization_error() {
    let config = ViewerConfig::new(2, 2, 5).with_server_binary("/nonexistent/table_viewer_server");
    assert!(matches!(
        GraphicViewer::spawn(config).await,
        Err(RenderError::Initialization { .. })
    ));
}

#[tokio::test]
async fn early_exit_fails_fast() {
    let assets = tempfile::tempdir().unwrap();
    let config = viewer_config(2, 2).with_asset_root(assets.path());

    let start = Instant::now();
    match GraphicViewer::spawn(config).await {
        Err(RenderError::Initialization { reason }) => {
            assert!(reason.contains("exited"), "unexpected reason: {reason}")
        }
        Err(other) => panic!("expected initialization error, got {other}"),
        Ok(_) => panic!("viewer started without assets"),
    }
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn missed_startup_deadline_kills_the_process_and_frees_both_ports() {
    let port = probe_port_pair("127.0.0.1").unwrap();
    let config = viewer_config(2, 2)
        .with_port(port)
        .with_startup_timeout(Duration::from_millis(1));

    match GraphicViewer::spawn(config).await {
        Err(RenderError::Initialization { reason }) => {
            assert!(reason.contains("not ready"), "unexpected reason: {reason}")
        }
        Err(other) => panic!("expected initialization error, got {other}"),
        Ok(_) => panic!("viewer became ready within 1ms"),
    }
    assert!(wait_until_refused(port).await);
    assert!(wait_until_refused(port + 1).await);
}

#[tokio::test]
async fn invalid_table_is_rejected_before_spawning() {
    assert!(matches!(
        GraphicViewer::spawn(viewer_config(1, 2)).await,
        Err(RenderError::Initialization { .. })
    ));
}
