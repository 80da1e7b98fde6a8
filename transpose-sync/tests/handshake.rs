mod common;

use transpose_sync::protocol::WindowKind;
use transpose_sync::{ReplicaEvent, WindowMessage, WindowPhase};

#[test]
fn ready_window_receives_exactly_one_snapshot() {
    let mut h = common::Harness::new();
    let mut monitor = h.open(WindowKind::TransposeMonitor);
    assert_eq!(h.broadcaster.registry().phase(WindowKind::TransposeMonitor), Some(WindowPhase::AwaitingReady));

    monitor.announce_ready().unwrap();
    h.pump(&common::make_state(vec![0, 2]));

    assert_eq!(h.broadcaster.registry().phase(WindowKind::TransposeMonitor), Some(WindowPhase::Ready));
    assert_eq!(monitor.poll().unwrap(), vec![ReplicaEvent::Updated]);
    assert_eq!(monitor.state().unwrap().transposes, vec![0, 2]);
}

#[test]
fn handshake_goes_only_to_the_new_window() {
    let mut h = common::Harness::new();
    let mut monitor = h.open(WindowKind::TransposeMonitor);
    monitor.announce_ready().unwrap();
    h.pump(&common::make_state(vec![1]));
    monitor.poll().unwrap();

    let mut viewer = h.open(WindowKind::SheetViewer);
    viewer.announce_ready().unwrap();
    h.pump(&common::make_state(vec![1]));

    assert!(monitor.poll().unwrap().is_empty());
    assert_eq!(viewer.poll().unwrap(), vec![ReplicaEvent::Updated]);
}

#[test]
fn repeated_ready_does_not_resend() {
    let mut h = common::Harness::new();
    let mut viewer = h.open(WindowKind::SheetViewer);
    viewer.announce_ready().unwrap();
    h.pump(&common::make_state(vec![]));

    // A misbehaving window signalling twice.
    h.broadcaster.handle_window(WindowKind::SheetViewer, WindowMessage::Ready, &common::make_state(vec![]));
    assert_eq!(viewer.poll().unwrap().len(), 1);
}

#[test]
fn failed_spawn_leaves_registry_empty() {
    let mut h = common::Harness::new();
    h.broadcaster.spawner_mut().fail_next = true;
    assert!(h.broadcaster.open(WindowKind::SheetViewer).is_err());
    assert!(h.broadcaster.registry().is_empty());

    // No retry happened; a later explicit open works.
    assert_eq!(h.broadcaster.spawner().spawned, 0);
    h.broadcaster.open(WindowKind::SheetViewer).unwrap();
    assert_eq!(h.broadcaster.spawner().spawned, 1);
}

#[test]
fn close_request_removes_handle() {
    let mut h = common::Harness::new();
    let mut viewer = h.open(WindowKind::SheetViewer);
    viewer.announce_ready().unwrap();
    h.pump(&common::make_state(vec![]));

    viewer.request_close().unwrap();
    h.pump(&common::make_state(vec![]));
    assert!(!h.broadcaster.registry().contains(WindowKind::SheetViewer));
    assert_eq!(h.broadcaster.broadcast(&common::make_state(vec![5])), 0);
}
