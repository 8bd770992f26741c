use tokio::sync::{mpsc, watch};
use shared::types::{EntityId, FilterSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    EnterFiltering(String),
    ExitFiltering,
    Mark { id: EntityId, matched: bool },
}

/// Receives the instructions of one filter evaluation, in order, as a batch.
pub trait MarkSink: Send + 'static {
    fn publish(&self, events: Vec<FilterEvent>);
}

/// Event stream; instructions are dropped once the receiver is gone.
impl MarkSink for mpsc::UnboundedSender<FilterEvent> {
    fn publish(&self, events: Vec<FilterEvent>) {
        for event in events {
            if self.send(event).is_err() {
                tracing::trace!("Filter event receiver closed");
                return;
            }
        }
    }
}

/// Folds each batch into the latest filter state in a single update, so
/// readers never see a half-applied filter.
impl MarkSink for watch::Sender<FilterSnapshot> {
    fn publish(&self, events: Vec<FilterEvent>) {
        self.send_modify(|s| {
            for event in events {
                match event {
                    FilterEvent::EnterFiltering(filter) => {
                        s.filtering = true;
                        s.filter = filter;
                    }
                    FilterEvent::ExitFiltering => {
                        s.filtering = false;
                        s.filter.clear();
                    }
                    FilterEvent::Mark { id, matched: true } => {
                        s.matched.insert(id);
                    }
                    FilterEvent::Mark { id, matched: false } => {
                        s.matched.remove(&id);
                    }
                }
            }
        });
    }
}
