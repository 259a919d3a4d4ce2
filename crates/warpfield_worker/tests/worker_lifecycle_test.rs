//! # Worker Lifecycle Integration Test
//!
//! Drives a real worker thread through the host handle: init, resize,
//! reveal, telemetry, pause/resume, wire messages and shutdown.

use std::thread::sleep;
use std::time::Duration;

use warpfield_core::{PixelSurface, RecordingSurface};
use warpfield_shared::{Config, ConfigPatch, ResizeRequest, WorkerEvent};
use warpfield_worker::{spawn, spawn_with_cadence, FixedRate, WorkerError, WorkerOptions};

fn options() -> WorkerOptions {
    WorkerOptions {
        seed: Some(99),
        ..WorkerOptions::default()
    }
}

fn quick_config() -> Config {
    Config {
        start_delay_ms: 0.0,
        ..Config::default()
    }
}

fn is_visible(event: &WorkerEvent) -> bool {
    matches!(event, WorkerEvent::Visible { .. })
}

/// Test: a started session reveals and reports once.
#[test]
fn test_session_reveals() {
    let host = spawn::<RecordingSurface>(options()).unwrap();
    host.init(RecordingSurface::new(0, 0), quick_config()).unwrap();
    host.resize(ResizeRequest::centered(640.0, 360.0, 1.0)).unwrap();

    let visible = host.events().wait_for(Duration::from_secs(15), is_visible);
    assert!(matches!(visible, Some(WorkerEvent::Visible { at }) if at > 0.0));

    let stats = host.shutdown().unwrap();
    assert_eq!(stats.sessions, 1);
    assert!(stats.ticks > 0);
    assert!(stats.events_sent >= 1);
}

/// Test: perf samples arrive roughly every 500 ms.
#[test]
fn test_perf_samples_arrive() {
    let host = spawn::<PixelSurface>(options()).unwrap();
    host.init(PixelSurface::new(160, 90), Config::default()).unwrap();

    let first = host
        .events()
        .wait_for(Duration::from_secs(3), |e| matches!(e, WorkerEvent::Perf { .. }));
    match first {
        Some(WorkerEvent::Perf { fps, at }) => {
            assert!(fps > 0.0 && fps.is_finite());
            assert!(at >= 500.0);
        }
        other => panic!("expected a perf sample, got {other:?}"),
    }
    host.shutdown().unwrap();
}

/// Test: pause stops the tick chain until resume.
#[test]
fn test_pause_and_resume() {
    let host = spawn::<RecordingSurface>(options()).unwrap();
    host.init(RecordingSurface::new(320, 240), Config::default()).unwrap();
    host.pause().unwrap();
    sleep(Duration::from_millis(250));
    let paused = host.shutdown().unwrap();
    // At most the tick(s) that ran before the pause landed.
    assert!(paused.ticks <= 2, "ticked {} times while paused", paused.ticks);

    let host = spawn::<RecordingSurface>(options()).unwrap();
    host.init(RecordingSurface::new(320, 240), Config::default()).unwrap();
    host.pause().unwrap();
    host.resume().unwrap();
    sleep(Duration::from_millis(250));
    let resumed = host.shutdown().unwrap();
    assert!(resumed.ticks > 2);
}

/// Test: JSON wire messages are decoded and routed; a wire init has no
/// surface and never starts a session.
#[test]
fn test_wire_messages() {
    let host = spawn::<RecordingSurface>(options()).unwrap();

    host.send_json(r#"{"type":"init","config":{"density":90}}"#).unwrap();
    host.send_json(r#"{"type":"ready","isReady":true}"#).unwrap();
    host.send_json(r#"{"type":"somethingNew","x":1}"#).unwrap();

    let err = host.send_json("{not json").unwrap_err();
    assert!(matches!(err, WorkerError::Protocol(_)));

    sleep(Duration::from_millis(50));
    let stats = host.shutdown().unwrap();
    assert_eq!(stats.sessions, 0);
    assert_eq!(stats.ticks, 0);
    assert_eq!(stats.messages, 3);
}

/// Test: config updates and re-init are accepted mid-run.
#[test]
fn test_config_update_and_reinit() {
    let host = spawn::<RecordingSurface>(options()).unwrap();
    host.init(RecordingSurface::new(320, 240), quick_config()).unwrap();
    host.update_config(ConfigPatch {
        speed: Some(400.0),
        reduce_motion: Some(true),
        ..ConfigPatch::default()
    })
    .unwrap();
    host.init(RecordingSurface::new(200, 200), quick_config()).unwrap();
    sleep(Duration::from_millis(100));

    let stats = host.shutdown().unwrap();
    assert_eq!(stats.sessions, 2);
    assert_eq!(stats.messages, 3);
}

/// Test: a fixed-rate cadence drives the same worker.
#[test]
fn test_fixed_rate_cadence() {
    let host = spawn_with_cadence::<RecordingSurface, _>(FixedRate::hz(120), options()).unwrap();
    host.init(RecordingSurface::new(320, 240), Config::default()).unwrap();
    sleep(Duration::from_millis(250));
    let stats = host.shutdown().unwrap();
    assert!(stats.ticks >= 5);
}
