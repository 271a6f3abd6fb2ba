//! Integration tests for presence tracking, broadcast fan-out, and
//! stale-session expiry.

use std::sync::Arc;

use chrono::{Duration, Utc};

use caseflow_core::config::realtime::RealtimeConfig;
use caseflow_core::types::{SessionId, UserId};
use caseflow_entity::presence::{Activity, PresenceStatus, TargetKind};
use caseflow_realtime::broadcast::sink::{BroadcastSink, PRESENCE_TOPIC, user_queue};
use caseflow_realtime::message::types::{PresenceMessage, SessionEvent, UpdateStatus};
use caseflow_realtime::metrics::PresenceMetrics;
use caseflow_realtime::{MemoryPubSub, PresenceEngine, PresenceTracker};

fn tracker_with_pubsub() -> (Arc<MemoryPubSub>, PresenceTracker) {
    let config = RealtimeConfig::default();
    let pubsub = Arc::new(MemoryPubSub::new(64));
    let sink: Arc<dyn BroadcastSink> = pubsub.clone();
    let tracker = PresenceTracker::new(&config, sink, Arc::new(PresenceMetrics::new()));
    (pubsub, tracker)
}

fn sid(s: &str) -> SessionId {
    SessionId::new(s)
}

fn uid(s: &str) -> UserId {
    UserId::new(s)
}

#[test]
fn test_register_yields_single_online_user() {
    let (_pubsub, tracker) = tracker_with_pubsub();

    tracker.register_session(sid("s1"), uid("u1"), "alice");

    let PresenceMessage::Snapshot { users } = tracker.snapshot() else {
        panic!("expected snapshot");
    };
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].user_id, uid("u1"));
    assert_eq!(users[0].username, "alice");
    assert_eq!(users[0].status, PresenceStatus::Online);
    assert_eq!(users[0].activities.len(), 1);
    assert_eq!(users[0].activities[0].session_id, sid("s1"));
    assert!(users[0].activities[0].activity.is_idle());
}

#[test]
fn test_multi_session_aggregation() {
    let (_pubsub, tracker) = tracker_with_pubsub();

    tracker.register_session(sid("s1"), uid("u1"), "alice");
    tracker.register_session(sid("s2"), uid("u1"), "alice");

    let PresenceMessage::Snapshot { users } = tracker.snapshot() else {
        panic!("expected snapshot");
    };
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].activities.len(), 2);

    // removing one of two sessions keeps the user online
    tracker.remove_session(&sid("s1"));
    assert_eq!(tracker.status_of(&uid("u1")), PresenceStatus::Online);

    let PresenceMessage::Snapshot { users } = tracker.snapshot() else {
        panic!("expected snapshot");
    };
    assert_eq!(users[0].activities.len(), 1);
    assert_eq!(users[0].activities[0].session_id, sid("s2"));

    // removing the last session removes the user entirely
    tracker.remove_session(&sid("s2"));
    assert_eq!(tracker.status_of(&uid("u1")), PresenceStatus::Offline);

    let PresenceMessage::Snapshot { users } = tracker.snapshot() else {
        panic!("expected snapshot");
    };
    assert!(users.is_empty());
}

#[test]
fn test_unknown_ids_are_noops() {
    let (_pubsub, tracker) = tracker_with_pubsub();
    tracker.register_session(sid("s1"), uid("u1"), "alice");

    let before = tracker.snapshot();

    tracker.remove_session(&sid("does-not-exist"));
    tracker.handle_heartbeat(&sid("does-not-exist"));
    tracker.update_activity(&sid("does-not-exist"), Activity::viewing(TargetKind::Traveler, "T-1"));

    assert_eq!(tracker.snapshot(), before);
}

#[test]
fn test_activity_replaces_previous() {
    let (_pubsub, tracker) = tracker_with_pubsub();
    tracker.register_session(sid("s1"), uid("u1"), "alice");

    tracker.update_activity(&sid("s1"), Activity::viewing(TargetKind::Traveler, "TRV-1"));
    let editing = Activity::editing(TargetKind::Invoice, "INV-7").with_description("amount");
    tracker.update_activity(&sid("s1"), editing.clone());

    let PresenceMessage::Snapshot { users } = tracker.snapshot() else {
        panic!("expected snapshot");
    };
    assert_eq!(users[0].activities.len(), 1);
    assert_eq!(users[0].activities[0].activity, editing);
}

#[test]
fn test_broadcast_contract() {
    let (pubsub, tracker) = tracker_with_pubsub();
    let mut rx = pubsub.subscribe(PRESENCE_TOPIC);

    // registering emits exactly one connected update
    tracker.register_session(sid("s1"), uid("u1"), "alice");
    match rx.try_recv().expect("connected update") {
        PresenceMessage::Update {
            user_id,
            session_id,
            status,
            activity,
            ..
        } => {
            assert_eq!(user_id, uid("u1"));
            assert_eq!(session_id, sid("s1"));
            assert_eq!(status, UpdateStatus::Connected);
            assert!(activity.is_none());
        }
        other => panic!("unexpected message: {other:?}"),
    }
    assert!(rx.try_recv().is_err());

    tracker.register_session(sid("s2"), uid("u1"), "alice");
    rx.try_recv().expect("second connected update");

    // an activity update carries the exact activity value passed in
    let viewing = Activity::viewing(TargetKind::Dependent, "DEP-3");
    tracker.update_activity(&sid("s2"), viewing.clone());
    match rx.try_recv().expect("activity update") {
        PresenceMessage::Update {
            status, activity, ..
        } => {
            assert_eq!(status, UpdateStatus::Activity);
            assert_eq!(activity, Some(viewing));
        }
        other => panic!("unexpected message: {other:?}"),
    }

    // removing a non-last session emits nothing
    tracker.remove_session(&sid("s1"));
    assert!(rx.try_recv().is_err());

    // removing the last session emits exactly one offline update
    tracker.remove_session(&sid("s2"));
    match rx.try_recv().expect("offline update") {
        PresenceMessage::Update {
            user_id, status, ..
        } => {
            assert_eq!(user_id, uid("u1"));
            assert_eq!(status, UpdateStatus::Offline);
        }
        other => panic!("unexpected message: {other:?}"),
    }
    assert!(rx.try_recv().is_err());

    // heartbeats are never broadcast
    tracker.register_session(sid("s3"), uid("u1"), "alice");
    rx.try_recv().expect("connected update");
    tracker.handle_heartbeat(&sid("s3"));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_sweep_removes_silent_sessions() {
    let (pubsub, tracker) = tracker_with_pubsub();
    let mut rx = pubsub.subscribe(PRESENCE_TOPIC);

    tracker.register_session(sid("s1"), uid("u1"), "alice");
    rx.try_recv().expect("connected update");

    // within the 90s threshold nothing is evicted
    assert_eq!(tracker.expire_stale(Utc::now() + Duration::seconds(50)), 0);
    assert_eq!(tracker.online_user_count(), 1);

    // past the threshold the session and its user are gone
    assert_eq!(tracker.expire_stale(Utc::now() + Duration::seconds(120)), 1);
    assert_eq!(tracker.online_user_count(), 0);

    let PresenceMessage::Snapshot { users } = tracker.snapshot() else {
        panic!("expected snapshot");
    };
    assert!(users.is_empty());

    // eviction reuses the disconnect path, so the offline update fires
    match rx.try_recv().expect("offline update") {
        PresenceMessage::Update { status, .. } => assert_eq!(status, UpdateStatus::Offline),
        other => panic!("unexpected message: {other:?}"),
    }
}

#[test]
fn test_sweep_isolates_users() {
    let (_pubsub, tracker) = tracker_with_pubsub();

    tracker.register_session(sid("s1"), uid("u1"), "alice");
    tracker.register_session(sid("s2"), uid("u2"), "bob");

    let expired = tracker.expire_stale(Utc::now() + Duration::seconds(120));
    assert_eq!(expired, 2);
    assert_eq!(tracker.session_count(), 0);
}

#[test]
fn test_snapshot_delivered_to_private_queue() {
    let (pubsub, tracker) = tracker_with_pubsub();
    let mut queue = pubsub.subscribe(&user_queue("carol"));

    tracker.register_session(sid("s1"), uid("u1"), "alice");
    tracker.send_snapshot_to_user("carol");

    match queue.try_recv().expect("snapshot") {
        PresenceMessage::Snapshot { users } => {
            assert_eq!(users.len(), 1);
            assert_eq!(users[0].username, "alice");
        }
        other => panic!("unexpected message: {other:?}"),
    }
}

#[tokio::test]
async fn test_engine_dispatch_and_shutdown() {
    let engine = PresenceEngine::new(RealtimeConfig::default());
    let mut queue = engine.pubsub().subscribe(&user_queue("alice"));

    engine.handle_event(SessionEvent::Connected {
        session_id: sid("s1"),
        user_id: uid("u1"),
        username: "alice".to_string(),
    });
    assert_eq!(engine.tracker().online_user_count(), 1);

    // subscribing to the presence topic bootstraps the late joiner
    engine.handle_event(SessionEvent::Subscribed {
        session_id: sid("s1"),
        username: "alice".to_string(),
        destination: PRESENCE_TOPIC.to_string(),
    });
    assert!(matches!(
        queue.try_recv().expect("snapshot"),
        PresenceMessage::Snapshot { .. }
    ));

    // subscribing elsewhere does not
    engine.handle_event(SessionEvent::Subscribed {
        session_id: sid("s1"),
        username: "alice".to_string(),
        destination: "notifications:all".to_string(),
    });
    assert!(queue.try_recv().is_err());

    engine.handle_event(SessionEvent::Disconnected {
        session_id: sid("s1"),
    });
    assert_eq!(engine.tracker().online_user_count(), 0);

    let metrics = engine.metrics_snapshot();
    assert_eq!(metrics.sessions_opened, 1);
    assert_eq!(metrics.sessions_closed, 1);
    assert_eq!(metrics.snapshots_sent, 1);

    engine.shutdown().await.expect("shutdown");
}
