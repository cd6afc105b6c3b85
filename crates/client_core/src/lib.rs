use std::{collections::BTreeMap, sync::Arc, time::Instant};

use chrono::{DateTime, Utc};
use shared::{
    catalog::Catalog,
    domain::{ActivityRecord, CurrentUser, Event, EventId, View},
};
use storage::{keys, load_json, save_json, KeyValueStore};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

pub mod activity;
pub mod aggregator;
pub mod deck;
pub mod gesture;
pub mod navigation;
pub mod profile;
pub mod scheduler;
pub mod session;
pub mod shortlist;

use aggregator::ShortlistAggregator;
use deck::CardDeck;
use gesture::{CardTransform, GestureInterpreter, GestureOutcome, SwipeDirection, EXIT_ANIMATION};
use navigation::KeyCommand;
use profile::{NavigationBadges, ProfileSummary};
use scheduler::{TaskHandle, TimerQueue};
use session::{Credentials, IdentityProvider, MockIdentityProvider, SessionError};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// Emitted on every release of the top card. `Cancel` means the card
    /// snapped back and the deck stays put.
    Decision {
        event_id: EventId,
        outcome: GestureOutcome,
    },
    ShortlistChanged {
        count: usize,
        unique_tags: usize,
    },
    ActivityRecorded(ActivityRecord),
    CardAdvanced {
        cursor: usize,
    },
    SessionChanged(Option<CurrentUser>),
    ViewChanged(View),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredAction {
    AdvanceDeck,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientStatus {
    pub signed_in: bool,
    pub current_view: View,
    pub cursor: usize,
    pub shortlist_count: usize,
    pub unique_tags_count: usize,
}

/// Everything the discover, shortlist and profile screens need, owned by the
/// UI loop. Store calls are awaited inline; the only deferred work is the
/// deck advance, fired from `tick`.
pub struct DiscoveryClient {
    catalog: Arc<Catalog>,
    store: Arc<dyn KeyValueStore>,
    identity: Arc<dyn IdentityProvider>,
    user: Option<CurrentUser>,
    aggregator: ShortlistAggregator,
    deck: CardDeck,
    gesture: GestureInterpreter,
    timers: TimerQueue<DeferredAction>,
    pending_advance: Option<TaskHandle>,
    view: View,
    events: broadcast::Sender<ClientEvent>,
}

impl DiscoveryClient {
    pub fn new(catalog: Arc<Catalog>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_identity_provider(catalog, store, Arc::new(MockIdentityProvider))
    }

    pub fn with_identity_provider(
        catalog: Arc<Catalog>,
        store: Arc<dyn KeyValueStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            catalog,
            aggregator: ShortlistAggregator::new(store.clone()),
            store,
            identity,
            user: None,
            deck: CardDeck::new(),
            gesture: GestureInterpreter::new(),
            timers: TimerQueue::new(),
            pending_advance: None,
            view: View::default(),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn status(&self) -> ClientStatus {
        let badges = self.badges();
        ClientStatus {
            signed_in: self.is_signed_in(),
            current_view: self.view,
            cursor: self.deck.cursor(),
            shortlist_count: badges.shortlist,
            unique_tags_count: badges.tags,
        }
    }

    // Session

    /// Picks up a user persisted by an earlier run. Unreadable data counts as
    /// signed out. An already signed-in session is left as is.
    pub async fn restore_session(&mut self) -> Option<&CurrentUser> {
        if self.user.is_some() {
            debug!("session already active; skipping restore");
            return self.user.as_ref();
        }
        let user = match load_json::<CurrentUser>(self.store.as_ref(), keys::CURRENT_USER).await {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "ignoring saved session");
                None
            }
        };
        let user = user?;
        info!(user_id = user.id.0, "restored session");
        self.attach(user).await;
        self.user.as_ref()
    }

    pub async fn sign_in(&mut self, credentials: Credentials) -> Result<CurrentUser, SessionError> {
        let user = self.identity.authenticate(&credentials, Utc::now())?;
        if self.user.is_some() {
            self.sign_out().await;
        }

        if let Err(err) = save_json(self.store.as_ref(), keys::CURRENT_USER, &user).await {
            warn!(error = %err, "failed to persist signed-in user");
        }
        info!(user_id = user.id.0, email = %user.email, "signed in");
        self.attach(user.clone()).await;
        Ok(user)
    }

    pub async fn sign_out(&mut self) {
        if let Err(err) = self.store.remove(keys::CURRENT_USER).await {
            warn!(error = %err, "failed to clear signed-in user");
        }
        self.aggregator.detach();
        self.reset_deck();
        self.view = View::default();

        if let Some(user) = self.user.take() {
            info!(user_id = user.id.0, "signed out");
        }
        self.emit(ClientEvent::SessionChanged(None));
        self.emit_shortlist_changed();
    }

    async fn attach(&mut self, user: CurrentUser) {
        self.aggregator.load_for(user.id).await;
        self.user = Some(user.clone());
        self.emit(ClientEvent::SessionChanged(Some(user)));
        self.emit_shortlist_changed();
    }

    // Cards and gestures

    pub fn visible_cards(&self) -> &[Event] {
        self.deck.visible(&self.catalog)
    }

    pub fn current_card(&self) -> Option<&Event> {
        self.deck.current(&self.catalog)
    }

    pub fn cursor(&self) -> usize {
        self.deck.cursor()
    }

    pub fn card_transform(&self) -> CardTransform {
        self.gesture.transform()
    }

    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance.is_some()
    }

    /// When the UI loop should call `tick` next, if anything is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_due()
    }

    pub fn pointer_down(&mut self, slot: usize, x: f64, y: f64) -> bool {
        if !self.is_signed_in() || self.current_card().is_none() {
            return false;
        }
        self.gesture.start(slot, x, y)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<CardTransform> {
        self.gesture.move_to(x, y)
    }

    /// Releases the drag. A decisive release saves or skips the top card and
    /// schedules the deck advance; a short drag snaps back.
    pub async fn pointer_up(&mut self, now: Instant) -> Option<GestureOutcome> {
        let outcome = self.gesture.end()?;
        match outcome.direction() {
            Some(direction) => self.decide(direction, now).await,
            None => {
                if let Some(event) = self.current_card() {
                    let event_id = event.id;
                    self.emit(ClientEvent::Decision { event_id, outcome });
                }
            }
        }
        Some(outcome)
    }

    pub async fn save_current(&mut self, now: Instant) -> bool {
        self.commit(SwipeDirection::Right, now).await
    }

    pub async fn reject_current(&mut self, now: Instant) -> bool {
        self.commit(SwipeDirection::Left, now).await
    }

    /// Arrow keys act on the top card, but only on the discover view.
    pub async fn handle_key(&mut self, key: KeyCommand, now: Instant) -> bool {
        if self.view != View::Discover {
            return false;
        }
        match key {
            KeyCommand::ArrowLeft => self.reject_current(now).await,
            KeyCommand::ArrowRight => self.save_current(now).await,
        }
    }

    /// Fires deferred work due at `now`. Returns how many actions ran.
    pub fn tick(&mut self, now: Instant) -> usize {
        let due = self.timers.take_due(now);
        for action in &due {
            match action {
                DeferredAction::AdvanceDeck => self.advance_deck(),
            }
        }
        due.len()
    }

    async fn commit(&mut self, direction: SwipeDirection, now: Instant) -> bool {
        if !self.is_signed_in() || self.current_card().is_none() {
            return false;
        }
        if !self.gesture.commit(direction) {
            debug!("decision ignored while a card is exiting");
            return false;
        }
        self.decide(direction, now).await;
        true
    }

    async fn decide(&mut self, direction: SwipeDirection, now: Instant) {
        let outcome = GestureOutcome::from(direction);
        if let Some(event) = self.current_card().cloned() {
            debug!(event_id = event.id.0, outcome = outcome.as_str(), "card decided");
            self.emit(ClientEvent::Decision {
                event_id: event.id,
                outcome,
            });
            if outcome == GestureOutcome::Accept {
                if let Some(record) = self.aggregator.add(&event).await {
                    self.emit(ClientEvent::ActivityRecorded(record));
                    self.emit_shortlist_changed();
                }
            }
        }

        self.cancel_pending_advance();
        let handle = self
            .timers
            .schedule(now, EXIT_ANIMATION, DeferredAction::AdvanceDeck);
        self.pending_advance = Some(handle);
    }

    fn advance_deck(&mut self) {
        self.pending_advance = None;
        self.gesture.finish_exit();
        let cursor = self.deck.advance(self.catalog.len());
        self.emit(ClientEvent::CardAdvanced { cursor });
    }

    fn reset_deck(&mut self) {
        self.cancel_pending_advance();
        self.deck.reset();
        self.gesture.reset();
    }

    fn cancel_pending_advance(&mut self) {
        if let Some(handle) = self.pending_advance.take() {
            if self.timers.cancel(handle) {
                debug!("cancelled pending deck advance");
            }
        }
    }

    // Shortlist

    pub fn shortlist(&self) -> &[Event] {
        self.aggregator.entries()
    }

    pub async fn remove_from_shortlist(&mut self, event_id: EventId) -> bool {
        let Some(record) = self.aggregator.remove(event_id).await else {
            return false;
        };
        self.emit(ClientEvent::ActivityRecorded(record));
        self.emit_shortlist_changed();
        true
    }

    /// Empties the shortlist and rewinds the deck to the first card. No
    /// activity is recorded and stored data is left alone.
    pub fn clear_shortlist(&mut self) {
        self.aggregator.clear();
        self.reset_deck();
        self.emit_shortlist_changed();
    }

    pub fn unique_tags(&self) -> Vec<String> {
        self.aggregator.unique_tags()
    }

    pub fn tag_counts(&self) -> BTreeMap<String, usize> {
        self.aggregator.tag_counts()
    }

    pub fn events_by_tag(&self) -> BTreeMap<String, Vec<&Event>> {
        self.aggregator.events_by_tag()
    }

    pub fn activity(&self) -> &[ActivityRecord] {
        self.aggregator.activity()
    }

    pub fn badges(&self) -> NavigationBadges {
        NavigationBadges::from_aggregator(&self.aggregator)
    }

    pub fn profile(&self, now: DateTime<Utc>) -> Option<ProfileSummary> {
        let user = self.user.as_ref()?;
        Some(ProfileSummary::build(user, &self.aggregator, now))
    }

    // Views

    pub fn current_view(&self) -> View {
        self.view
    }

    pub fn switch_view(&mut self, view: View) {
        if self.view == view {
            return;
        }
        self.view = view;
        self.emit(ClientEvent::ViewChanged(view));
    }

    pub async fn save_app_state(&self, now_ms: i64) {
        if let Err(err) = navigation::save_app_state(self.store.as_ref(), self.view, now_ms).await {
            warn!(error = %err, "failed to save app state");
        }
    }

    /// Switches back to the saved view if it is recent enough.
    pub async fn restore_app_state(&mut self, now_ms: i64) -> Option<View> {
        let snapshot = navigation::load_app_state(self.store.as_ref()).await?;
        let view = navigation::restorable_view(&snapshot, now_ms)?;
        self.switch_view(view);
        Some(view)
    }

    fn emit_shortlist_changed(&self) {
        let badges = self.badges();
        self.emit(ClientEvent::ShortlistChanged {
            count: badges.shortlist,
            unique_tags: badges.tags,
        });
    }

    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
