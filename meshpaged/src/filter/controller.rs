use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use shared::types::{Disposition, EntityId, InputEvent};
use crate::filter::debounce::Debouncer;
use crate::filter::index::SearchIndex;
use crate::filter::sink::{FilterEvent, MarkSink};

/// Applied-filter bookkeeping, evaluated once the input goes quiet.
pub struct FilterState<S> {
    /// None until the first evaluation, so even an empty first input applies
    applied: Option<String>,
    index: SearchIndex,
    marked: BTreeSet<EntityId>,
    sink: S,
}

impl<S: MarkSink> FilterState<S> {
    pub fn new(index: SearchIndex, sink: S) -> Self {
        Self {
            applied: None,
            index,
            marked: BTreeSet::new(),
            sink,
        }
    }

    /// Apply `raw` as the current filter and publish the resulting
    /// instructions as one batch. Returns false when it matches the filter
    /// already applied and nothing was published.
    pub fn apply(&mut self, raw: &str) -> bool {
        let candidate = raw.to_lowercase();
        if self.applied.as_deref() == Some(candidate.as_str()) {
            tracing::trace!("Filter {:?} already applied", candidate);
            return false;
        }

        let mut events: Vec<FilterEvent> = std::mem::take(&mut self.marked)
            .into_iter()
            .map(|id| FilterEvent::Mark { id, matched: false })
            .collect();

        if candidate.is_empty() {
            events.push(FilterEvent::ExitFiltering);
        } else {
            events.push(FilterEvent::EnterFiltering(candidate.clone()));
            for id in self.index.matching(&candidate) {
                self.marked.insert(id.clone());
                events.push(FilterEvent::Mark { id: id.clone(), matched: true });
            }
        }

        tracing::debug!("Applied filter {:?}: {} matches", candidate, self.marked.len());
        self.sink.publish(events);
        self.applied = Some(candidate);
        true
    }
}

/// Debounced filter over a fixed search index.
pub struct FilterController<S> {
    debouncer: Debouncer,
    state: Arc<Mutex<FilterState<S>>>,
}

impl<S: MarkSink> FilterController<S> {
    pub fn new(index: SearchIndex, sink: S, quiet_period: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(quiet_period),
            state: Arc::new(Mutex::new(FilterState::new(index, sink))),
        }
    }

    /// Schedule evaluation of `raw`, superseding any evaluation still pending.
    /// Must be called from within a Tokio runtime.
    pub fn on_input(&self, raw: impl Into<String>) {
        let raw = raw.into();
        let state = Arc::clone(&self.state);
        self.debouncer.arm(move || {
            lock(&state).apply(&raw);
        });
    }

    /// Feed a search box event. Submits are filtered like any other input
    /// and their default action is suppressed.
    pub fn handle(&self, event: InputEvent) -> Disposition {
        let prevent_default = matches!(event, InputEvent::Submit { .. });
        match event {
            InputEvent::KeyUp { value }
            | InputEvent::Click { value }
            | InputEvent::Submit { value } => self.on_input(value),
        }
        Disposition { prevent_default }
    }
}

fn lock<S>(state: &Mutex<FilterState<S>>) -> MutexGuard<'_, FilterState<S>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use pretty_assertions::assert_eq;
    use shared::types::{FilterSnapshot, HostEntry, LinkQuality, SearchEntry};
    use tokio::sync::{mpsc, watch};
    use crate::view::builder::ViewBuilder;
    use crate::view::ladder::Ladder;

    const QUIET: Duration = Duration::from_millis(200);

    fn index() -> SearchIndex {
        let router = EntityId::host("10.0.0.1", 0);
        [
            (EntityId::node("10.0.0.1"), "node-a"),
            (router.clone(), "router-7"),
            (EntityId::service(&router, 0), "admin"),
            (EntityId::node("10.0.0.2"), "node-b"),
        ]
        .into_iter()
        .map(|(id, key)| SearchEntry {
            id,
            search_key: key.to_string(),
        })
        .collect()
    }

    fn mark(id: EntityId, matched: bool) -> FilterEvent {
        FilterEvent::Mark { id, matched }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<FilterEvent>) -> Vec<FilterEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn applied<S>(controller: &FilterController<S>) -> Option<String> {
        lock(&controller.state).applied.clone()
    }

    #[test]
    fn test_apply_marks_substring_matches() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = FilterState::new(index(), tx);

        assert!(state.apply("Rout"));
        assert_eq!(
            drain(&mut rx),
            vec![
                FilterEvent::EnterFiltering("rout".to_string()),
                mark(EntityId::host("10.0.0.1", 0), true),
            ]
        );
        assert_eq!(state.applied.as_deref(), Some("rout"));
    }

    #[test]
    fn test_apply_clears_previous_marks_first() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = FilterState::new(index(), tx);

        state.apply("node");
        drain(&mut rx);

        state.apply("node-b");
        assert_eq!(
            drain(&mut rx),
            vec![
                mark(EntityId::node("10.0.0.1"), false),
                mark(EntityId::node("10.0.0.2"), false),
                FilterEvent::EnterFiltering("node-b".to_string()),
                mark(EntityId::node("10.0.0.2"), true),
            ]
        );

        state.apply("");
        assert_eq!(
            drain(&mut rx),
            vec![mark(EntityId::node("10.0.0.2"), false), FilterEvent::ExitFiltering]
        );
    }

    #[test]
    fn test_apply_same_value_is_noop() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = FilterState::new(index(), tx);

        assert!(state.apply("node"));
        drain(&mut rx);

        assert!(!state.apply("NODE"));
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_first_empty_input_exits_filtering() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = FilterState::new(index(), tx);

        assert!(state.apply(""));
        assert_eq!(drain(&mut rx), vec![FilterEvent::ExitFiltering]);
        assert!(!state.apply(""));
    }

    #[test]
    fn test_empty_index_has_no_matches() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut state = FilterState::new(SearchIndex::default(), tx);

        assert!(state.apply("node"));
        assert_eq!(drain(&mut rx), vec![FilterEvent::EnterFiltering("node".to_string())]);
    }

    #[test]
    fn test_watch_state_changes_once_per_apply() {
        let (tx, mut rx) = watch::channel(FilterSnapshot::default());
        let mut state = FilterState::new(index(), tx);

        state.apply("node");
        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert!(seen.filtering);
        assert_eq!(
            seen.matched.into_iter().collect::<Vec<_>>(),
            [EntityId::node("10.0.0.1"), EntityId::node("10.0.0.2")]
        );

        state.apply("node");
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_input_evaluates_once_with_last_value() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = FilterController::new(index(), tx, QUIET);

        controller.on_input("r");
        controller.on_input("ro");
        controller.on_input("rout");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(drain(&mut rx).is_empty());
        assert_eq!(applied(&controller), None);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(
            drain(&mut rx),
            vec![
                FilterEvent::EnterFiltering("rout".to_string()),
                mark(EntityId::host("10.0.0.1", 0), true),
            ]
        );
        assert_eq!(applied(&controller).as_deref(), Some("rout"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_value_transitions_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = FilterController::new(index(), tx, QUIET);

        controller.on_input("admin");
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(drain(&mut rx).len(), 2);

        controller.on_input("admin");
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_typed_then_erased_is_suppressed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = FilterController::new(index(), tx, QUIET);

        controller.on_input("node");
        tokio::time::sleep(Duration::from_millis(250)).await;
        drain(&mut rx);

        controller.on_input("node-");
        tokio::time::sleep(Duration::from_millis(50)).await;
        controller.on_input("node");
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_is_filtered_and_suppressed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = FilterController::new(index(), tx, QUIET);

        let disposition = controller.handle(InputEvent::Submit { value: "Node-B".to_string() });
        assert!(disposition.prevent_default);

        let disposition = controller.handle(InputEvent::KeyUp { value: "Node-B".to_string() });
        assert!(!disposition.prevent_default);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(
            drain(&mut rx),
            vec![
                FilterEvent::EnterFiltering("node-b".to_string()),
                mark(EntityId::node("10.0.0.2"), true),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_built_view_lan_host_marked_by_typing() {
        let ladder = Ladder::default();
        let links = vec![LinkQuality { address: "10.0.0.1".to_string(), etx: 0.5 }];
        let hosts = HashMap::from([(
            "10.0.0.1".to_string(),
            vec![
                HostEntry { hostname: "node-a".to_string(), alias: None },
                HostEntry { hostname: "Router-7".to_string(), alias: Some("10.1.1.7".to_string()) },
            ],
        )]);
        let view = ViewBuilder::new(&ladder, "local.mesh").build(&links, &hosts, &HashMap::new());

        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = FilterController::new(SearchIndex::from_view(&view), tx, QUIET);

        for typed in ["r", "ro", "rou", "rout"] {
            controller.handle(InputEvent::KeyUp { value: typed.to_string() });
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        tokio::time::sleep(Duration::from_millis(250)).await;

        assert_eq!(
            drain(&mut rx),
            vec![
                FilterEvent::EnterFiltering("rout".to_string()),
                mark(EntityId::host("10.0.0.1", 0), true),
            ]
        );
    }
}
