//! In-memory session registry with analysis-cycle fencing.
//!
//! Analysis is asynchronous: the client may start a new cycle or reset
//! while an older extraction is still in flight. The store hands out a
//! generation number at cycle start and refuses to install any result
//! carrying a stale generation, so late responses can never overwrite a
//! newer session.

use std::collections::HashMap;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{BusinessRule, DocumentContext, GenericItem};

use super::session::Session;

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<Uuid, Session>,
    generation: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new analysis cycle and return its generation. Every call
    /// invalidates all previously issued generations.
    pub fn begin_cycle(&mut self) -> u64 {
        self.generation += 1;
        debug!(generation = self.generation, "analysis cycle started");
        self.generation
    }

    /// Install an extraction result as a new session, unless a newer
    /// cycle has started since `generation` was issued.
    pub fn install(
        &mut self,
        generation: u64,
        context: DocumentContext,
        items: Vec<GenericItem>,
        rule: Option<BusinessRule>,
    ) -> Option<Uuid> {
        if generation != self.generation {
            warn!(
                stale = generation,
                current = self.generation,
                "dropping superseded extraction result"
            );
            return None;
        }
        let id = Uuid::new_v4();
        self.sessions.insert(id, Session::new(context, items, rule));
        Some(id)
    }

    pub fn get(&self, id: &Uuid) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    /// Discard a session and invalidate in-flight extractions, so a late
    /// result from before the reset cannot resurrect state.
    pub fn reset(&mut self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            self.generation += 1;
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentContext, LayoutType};

    fn context() -> DocumentContext {
        DocumentContext {
            detected_type: "Test".into(),
            app_title: "Test".into(),
            action_button_label: "Go".into(),
            summary_label: "Items".into(),
            layout: LayoutType::Form,
        }
    }

    #[test]
    fn install_with_current_generation_succeeds() {
        let mut store = SessionStore::new();
        let generation = store.begin_cycle();
        let id = store.install(generation, context(), vec![], None);
        assert!(id.is_some());
        assert_eq!(store.len(), 1);
        assert!(store.get(&id.unwrap()).is_some());
    }

    #[test]
    fn stale_generation_is_dropped() {
        let mut store = SessionStore::new();
        let old = store.begin_cycle();
        let new = store.begin_cycle();
        assert!(store.install(old, context(), vec![], None).is_none());
        assert!(store.is_empty());
        assert!(store.install(new, context(), vec![], None).is_some());
    }

    #[test]
    fn reset_invalidates_in_flight_generation() {
        let mut store = SessionStore::new();
        let generation = store.begin_cycle();
        let id = store.install(generation, context(), vec![], None).unwrap();

        // a second extraction from the same cycle is in flight
        assert!(store.reset(&id));
        assert!(store.get(&id).is_none());
        assert!(store.install(generation, context(), vec![], None).is_none());
    }

    #[test]
    fn reset_of_unknown_session_is_false() {
        let mut store = SessionStore::new();
        assert!(!store.reset(&Uuid::new_v4()));
    }

    #[test]
    fn multiple_sessions_coexist() {
        let mut store = SessionStore::new();
        let g1 = store.begin_cycle();
        let a = store.install(g1, context(), vec![], None).unwrap();
        let g2 = store.begin_cycle();
        let b = store.install(g2, context(), vec![], None).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }
}
