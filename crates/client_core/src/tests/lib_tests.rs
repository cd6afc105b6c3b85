use super::*;
use std::time::Duration;
use storage::MemoryStore;
use tokio::sync::broadcast::error::TryRecvError;

fn new_client(store: Arc<MemoryStore>) -> DiscoveryClient {
    DiscoveryClient::new(Arc::new(Catalog::builtin()), store)
}

async fn signed_in_client() -> (DiscoveryClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let mut client = new_client(store.clone());
    client
        .sign_in(Credentials::new("ada@example.com", "secret"))
        .await
        .expect("sign in");
    (client, store)
}

async fn drag(client: &mut DiscoveryClient, dx: f64, now: Instant) -> Option<GestureOutcome> {
    assert!(client.pointer_down(0, 200.0, 300.0));
    client.pointer_move(200.0 + dx, 310.0);
    client.pointer_up(now).await
}

fn drain(rx: &mut broadcast::Receiver<ClientEvent>) -> Vec<ClientEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return events,
            Err(TryRecvError::Lagged(_)) => continue,
        }
    }
}

#[tokio::test]
async fn accepting_drag_saves_once_then_advances_after_exit() {
    let (mut client, _store) = signed_in_client().await;
    let start = Instant::now();

    assert_eq!(drag(&mut client, 150.0, start).await, Some(GestureOutcome::Accept));
    assert_eq!(client.shortlist().len(), 1);
    assert_eq!(client.shortlist()[0].id, EventId(1));
    assert_eq!(client.cursor(), 0);
    assert!(client.has_pending_advance());

    assert_eq!(client.tick(start + Duration::from_millis(499)), 0);
    assert_eq!(client.cursor(), 0);

    assert_eq!(client.tick(start + EXIT_ANIMATION), 1);
    assert_eq!(client.cursor(), 1);
    assert!(!client.has_pending_advance());
    assert_eq!(client.visible_cards()[0].id, EventId(2));
}

#[tokio::test]
async fn rejecting_drag_advances_without_saving() {
    let (mut client, _store) = signed_in_client().await;
    let start = Instant::now();

    assert_eq!(drag(&mut client, -150.0, start).await, Some(GestureOutcome::Reject));
    assert!(client.shortlist().is_empty());
    assert!(client.activity().is_empty());

    client.tick(start + EXIT_ANIMATION);
    assert_eq!(client.cursor(), 1);
}

#[tokio::test]
async fn short_drag_snaps_back() {
    let (mut client, _store) = signed_in_client().await;
    let start = Instant::now();

    assert_eq!(drag(&mut client, 50.0, start).await, Some(GestureOutcome::Cancel));
    assert!(client.shortlist().is_empty());
    assert!(!client.has_pending_advance());
    assert!(client.card_transform().is_identity());
    assert_eq!(client.tick(start + Duration::from_secs(5)), 0);
    assert_eq!(client.cursor(), 0);
}

#[tokio::test]
async fn duplicate_release_does_not_advance_twice() {
    let (mut client, _store) = signed_in_client().await;
    let start = Instant::now();

    drag(&mut client, 150.0, start).await;
    assert_eq!(client.pointer_up(start).await, None);
    assert!(!client.pointer_down(0, 0.0, 0.0));
    assert!(!client.save_current(start).await);
    assert!(!client.reject_current(start).await);

    assert_eq!(client.tick(start + Duration::from_secs(2)), 1);
    assert_eq!(client.cursor(), 1);
    assert_eq!(client.shortlist().len(), 1);
}

#[tokio::test]
async fn only_the_top_card_can_be_dragged() {
    let (mut client, _store) = signed_in_client().await;
    assert!(!client.pointer_down(1, 0.0, 0.0));
    assert!(client.pointer_move(150.0, 0.0).is_none());
    assert_eq!(client.pointer_up(Instant::now()).await, None);
}

#[tokio::test]
async fn deck_wraps_after_the_last_card() {
    let (mut client, _store) = signed_in_client().await;
    let mut now = Instant::now();
    let total = client.catalog().len();

    for _ in 0..total - 1 {
        assert!(client.reject_current(now).await);
        now += EXIT_ANIMATION;
        client.tick(now);
    }
    assert_eq!(client.cursor(), total - 1);
    assert_eq!(client.visible_cards().len(), 1);

    assert!(client.save_current(now).await);
    now += EXIT_ANIMATION;
    client.tick(now);
    assert_eq!(client.cursor(), 0);
    assert_eq!(client.visible_cards().len(), 3);
}

#[tokio::test]
async fn sign_out_cancels_pending_advance() {
    let (mut client, store) = signed_in_client().await;
    let start = Instant::now();

    assert!(client.save_current(start).await);
    client.sign_out().await;

    assert!(!client.has_pending_advance());
    assert_eq!(client.tick(start + Duration::from_secs(1)), 0);
    assert_eq!(client.cursor(), 0);
    assert!(client.shortlist().is_empty());
    assert!(client.activity().is_empty());
    assert!(store
        .get(keys::CURRENT_USER)
        .await
        .expect("get")
        .is_none());
}

#[tokio::test]
async fn decisions_require_a_signed_in_user() {
    let store = Arc::new(MemoryStore::new());
    let mut client = new_client(store.clone());
    let now = Instant::now();

    assert!(!client.pointer_down(0, 0.0, 0.0));
    assert!(!client.save_current(now).await);
    assert!(!client.handle_key(KeyCommand::ArrowRight, now).await);
    assert!(client.profile(Utc::now()).is_none());
    assert!(store.is_empty());
}

#[tokio::test]
async fn restore_session_reloads_saved_shortlist() {
    let (mut client, store) = signed_in_client().await;
    let now = Instant::now();
    client.save_current(now).await;
    client.tick(now + EXIT_ANIMATION);
    client.save_current(now + EXIT_ANIMATION).await;

    let mut restored = new_client(store);
    let user = restored.restore_session().await.cloned().expect("session");
    assert_eq!(user.name, "ada");

    let ids: Vec<_> = restored.shortlist().iter().map(|event| event.id.0).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(restored.activity().len(), 2);
    assert_eq!(restored.activity()[0].event_id, EventId(2));
}

#[tokio::test]
async fn corrupt_session_counts_as_signed_out() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(keys::CURRENT_USER, "{\"id\":")
        .await
        .expect("seed");

    let mut client = new_client(store);
    assert!(client.restore_session().await.is_none());
    assert!(!client.is_signed_in());
}

#[tokio::test]
async fn sign_in_rejects_missing_email() {
    let store = Arc::new(MemoryStore::new());
    let mut client = new_client(store.clone());
    let err = client
        .sign_in(Credentials::new("", "secret"))
        .await
        .expect_err("no email");
    assert_eq!(err, SessionError::MissingEmail);
    assert!(!client.is_signed_in());
    assert!(store.is_empty());
}

#[tokio::test]
async fn arrow_keys_only_work_on_discover() {
    let (mut client, _store) = signed_in_client().await;
    let now = Instant::now();

    client.switch_view(View::Shortlist);
    assert!(!client.handle_key(KeyCommand::ArrowRight, now).await);
    assert!(client.shortlist().is_empty());

    client.switch_view(View::Discover);
    assert!(client.handle_key(KeyCommand::ArrowRight, now).await);
    assert_eq!(client.shortlist().len(), 1);

    client.tick(now + EXIT_ANIMATION);
    assert!(client.handle_key(KeyCommand::ArrowLeft, now + EXIT_ANIMATION).await);
    assert_eq!(client.shortlist().len(), 1);
}

#[tokio::test]
async fn decisions_are_broadcast() {
    let (mut client, _store) = signed_in_client().await;
    let mut rx = client.subscribe();
    let now = Instant::now();

    client.save_current(now).await;
    client.tick(now + EXIT_ANIMATION);

    let events = drain(&mut rx);
    assert!(matches!(
        events[0],
        ClientEvent::Decision {
            event_id: EventId(1),
            outcome: GestureOutcome::Accept
        }
    ));
    assert!(matches!(events[1], ClientEvent::ActivityRecorded(_)));
    assert!(matches!(
        events[2],
        ClientEvent::ShortlistChanged { count: 1, .. }
    ));
    assert_eq!(events[3], ClientEvent::CardAdvanced { cursor: 1 });
    assert_eq!(events.len(), 4);
}

#[tokio::test]
async fn removing_from_shortlist_updates_badges() {
    let (mut client, _store) = signed_in_client().await;
    let now = Instant::now();
    client.save_current(now).await;
    let tags_before = client.badges().tags;
    assert!(tags_before > 0);

    let mut rx = client.subscribe();
    assert!(client.remove_from_shortlist(EventId(1)).await);
    assert!(!client.remove_from_shortlist(EventId(1)).await);

    assert_eq!(client.badges(), NavigationBadges::default());
    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[1],
        ClientEvent::ShortlistChanged {
            count: 0,
            unique_tags: 0
        }
    );
}

#[tokio::test]
async fn app_state_restores_recent_view_only() {
    let (mut client, store) = signed_in_client().await;
    client.switch_view(View::Profile);
    client.save_app_state(10_000).await;

    let mut fresh = new_client(store.clone());
    assert_eq!(fresh.restore_app_state(10_000 + 59_000).await, Some(View::Profile));
    assert_eq!(fresh.current_view(), View::Profile);

    let mut stale = new_client(store);
    assert_eq!(stale.restore_app_state(10_000 + 3_600_000).await, None);
    assert_eq!(stale.current_view(), View::Discover);
}

#[tokio::test]
async fn status_summarises_the_session() {
    let (mut client, _store) = signed_in_client().await;
    client.save_current(Instant::now()).await;

    let status = client.status();
    assert!(status.signed_in);
    assert_eq!(status.current_view, View::Discover);
    assert_eq!(status.shortlist_count, 1);
    assert_eq!(status.unique_tags_count, client.unique_tags().len());

    let profile = client.profile(Utc::now()).expect("profile");
    assert_eq!(profile.display_name, "ada");
    assert_eq!(profile.total_events, 1);
}

#[tokio::test]
async fn clearing_the_shortlist_rewinds_the_deck() {
    let (mut client, store) = signed_in_client().await;
    let mut now = Instant::now();
    for _ in 0..3 {
        assert!(client.save_current(now).await);
        now += EXIT_ANIMATION;
        client.tick(now);
    }
    assert!(client.save_current(now).await);
    assert_eq!(client.cursor(), 3);
    let activity_before = client.activity().len();

    let mut rx = client.subscribe();
    client.clear_shortlist();

    assert_eq!(client.cursor(), 0);
    assert!(client.shortlist().is_empty());
    assert!(!client.has_pending_advance());
    assert!(client.card_transform().is_identity());
    assert_eq!(client.activity().len(), activity_before);
    assert_eq!(client.tick(now + Duration::from_secs(1)), 0);
    assert_eq!(client.cursor(), 0);
    assert_eq!(
        drain(&mut rx),
        vec![ClientEvent::ShortlistChanged {
            count: 0,
            unique_tags: 0
        }]
    );

    assert!(client.pointer_down(0, 0.0, 0.0));
    assert!(store
        .get(&keys::shortlist(client.current_user().expect("user").id))
        .await
        .expect("get")
        .is_some());
}

#[tokio::test]
async fn restore_session_keeps_an_active_session() {
    let (mut client, _store) = signed_in_client().await;
    let now = Instant::now();
    assert!(client.save_current(now).await);
    let signed_in = client.current_user().cloned().expect("user");

    let restored = client.restore_session().await.cloned().expect("session");
    assert_eq!(restored, signed_in);
    assert!(client.has_pending_advance());
    assert_eq!(client.shortlist().len(), 1);
    assert_eq!(client.activity().len(), 1);

    assert_eq!(client.tick(now + EXIT_ANIMATION), 1);
    assert_eq!(client.cursor(), 1);
}

#[tokio::test]
async fn snap_back_is_broadcast_as_cancel() {
    let (mut client, _store) = signed_in_client().await;
    let mut rx = client.subscribe();

    drag(&mut client, 40.0, Instant::now()).await;
    assert_eq!(
        drain(&mut rx),
        vec![ClientEvent::Decision {
            event_id: EventId(1),
            outcome: GestureOutcome::Cancel
        }]
    );
}
