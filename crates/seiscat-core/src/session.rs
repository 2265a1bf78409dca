//! Session context with explicit selection observers
//!
//! The workbench keeps one "current selection" (event and, optionally, one
//! of its hypocentres) that several views follow. The context is an
//! ordinary owned value passed to whoever needs it; views register as
//! observers and are called synchronously, in subscription order, whenever
//! the selection actually changes.

/// Currently selected catalog entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub evid: Option<i64>,
    pub hypid: Option<i64>,
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Receives selection changes
pub trait SelectionObserver {
    fn selection_changed(&mut self, previous: &Selection, current: &Selection);
}

impl<F> SelectionObserver for F
where
    F: FnMut(&Selection, &Selection),
{
    fn selection_changed(&mut self, previous: &Selection, current: &Selection) {
        self(previous, current)
    }
}

/// Per-analyst session state
pub struct SessionContext {
    analyst: String,
    selection: Selection,
    observers: Vec<(SubscriptionId, Box<dyn SelectionObserver>)>,
    next_id: u64,
}

impl SessionContext {
    pub fn new(analyst: impl Into<String>) -> Self {
        Self {
            analyst: analyst.into(),
            selection: Selection::default(),
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn analyst(&self) -> &str {
        &self.analyst
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn subscribe(&mut self, observer: Box<dyn SelectionObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Remove an observer; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Select an event; a different event clears the hypocentre selection
    pub fn select_event(&mut self, evid: i64) {
        let hypid = if self.selection.evid == Some(evid) {
            self.selection.hypid
        } else {
            None
        };
        self.update(Selection {
            evid: Some(evid),
            hypid,
        });
    }

    /// Select a hypocentre within the current event
    pub fn select_hypocentre(&mut self, hypid: i64) {
        self.update(Selection {
            evid: self.selection.evid,
            hypid: Some(hypid),
        });
    }

    pub fn clear(&mut self) {
        self.update(Selection::default());
    }

    fn update(&mut self, next: Selection) {
        if next == self.selection {
            return;
        }
        let previous = std::mem::replace(&mut self.selection, next);
        tracing::debug!(
            op = "selection_changed",
            analyst = self.analyst.as_str(),
            evid = ?next.evid,
            hypid = ?next.hypid,
            observers = self.observers.len(),
        );
        for (_, observer) in self.observers.iter_mut() {
            observer.selection_changed(&previous, &next);
        }
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("analyst", &self.analyst)
            .field("selection", &self.selection)
            .field("observers", &self.observers.len())
            .finish()
    }
}
