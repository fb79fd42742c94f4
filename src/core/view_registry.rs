/*
 * Registry of open view panes, mirroring the directory registry's shape:
 * dedup by id, optional single selection, clear for teardown. The registry
 * owns the sending side of the view command channel and hands a clone to
 * every view state it creates, so all outbound selection requests funnel
 * into one consumer.
 */
use std::sync::mpsc::{Receiver, Sender, channel};

use super::identity::ViewId;
use super::observable::{Observable, SubscriptionId};
use super::view_state::{DirectoryView, ViewCommand, ViewState};

#[derive(Debug, Clone, Default)]
pub struct ViewRegistryContents {
    pub views: Vec<ViewState>,
    pub selected: Option<ViewState>,
}

#[derive(Debug, Clone)]
pub struct ViewRegistry {
    state: Observable<ViewRegistryContents>,
    commands: Sender<ViewCommand>,
}

impl ViewRegistry {
    pub fn new(commands: Sender<ViewCommand>) -> Self {
        ViewRegistry {
            state: Observable::new(ViewRegistryContents::default()),
            commands,
        }
    }

    /* Convenience constructor wiring a fresh channel, mostly for tests. */
    pub fn with_channel() -> (Self, Receiver<ViewCommand>) {
        let (tx, rx) = channel();
        (Self::new(tx), rx)
    }

    pub fn snapshot(&self) -> ViewRegistryContents {
        self.state.snapshot()
    }

    pub fn subscribe(&self, listener: Box<dyn FnMut(&ViewRegistryContents)>) -> SubscriptionId {
        self.state.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    /*
     * Wraps the view in a new `ViewState` wired to the command channel and
     * appends it. Duplicate ids are not inserted again; the existing state
     * is returned.
     */
    pub fn add(&self, view: DirectoryView) -> ViewState {
        if let Some(existing) = self.get_by_id(&view.id) {
            log::debug!("ViewRegistry: ignoring duplicate view {}", view.id);
            return existing;
        }
        log::debug!("ViewRegistry: adding view {}", view.id);
        let state = ViewState::new(view, self.commands.clone());
        let result = state.clone();
        self.state.update(|c| c.views.push(state));
        result
    }

    /* Removes by id; clears the selection if it pointed at the removed view. */
    pub fn remove_by_id(&self, id: &ViewId) {
        let present = self.state.with_value(|c| c.views.iter().any(|v| v.id() == *id));
        if !present {
            return;
        }
        self.state.update(|c| {
            c.views.retain(|v| v.id() != *id);
            if c.selected.as_ref().is_some_and(|s| s.id() == *id) {
                c.selected = None;
            }
        });
    }

    pub fn get_by_id(&self, id: &ViewId) -> Option<ViewState> {
        self.state
            .with_value(|c| c.views.iter().find(|v| v.id() == *id).cloned())
    }

    /* Replaces any prior selection; an unknown id clears it. */
    pub fn select(&self, id: &ViewId) {
        self.state.update(|c| {
            c.selected = c.views.iter().find(|v| v.id() == *id).cloned();
        });
    }

    pub fn selected(&self) -> Option<ViewState> {
        self.state.with_value(|c| c.selected.clone())
    }

    pub fn clear(&self) {
        log::debug!("ViewRegistry: clearing");
        self.state.set(ViewRegistryContents::default());
    }

    pub fn len(&self) -> usize {
        self.state.with_value(|c| c.views.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::DirectoryId;
    use crate::core::view_state::ViewCommand;

    fn view(id: ViewId) -> DirectoryView {
        DirectoryView::new(id, DirectoryId::new_v4())
    }

    #[test]
    fn test_add_dedups_by_id() {
        let (registry, _rx) = ViewRegistry::with_channel();
        let id = ViewId::new_v4();

        registry.add(view(id));
        registry.add(view(id));

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_added_views_share_the_registry_channel() {
        let (registry, rx) = ViewRegistry::with_channel();
        let a = registry.add(view(ViewId::new_v4()));
        let b = registry.add(view(ViewId::new_v4()));

        a.request_selection("one.txt", vec!["one.txt".to_string()]);
        b.request_selection("two.txt", vec!["two.txt".to_string()]);

        let commands: Vec<ViewCommand> = rx.try_iter().collect();
        assert_eq!(commands.len(), 2);
        match &commands[0] {
            ViewCommand::SelectFiles { view, focused, .. } => {
                assert_eq!(*view, a.id());
                assert_eq!(focused, "one.txt");
            }
        }
    }

    #[test]
    fn test_remove_and_get() {
        let (registry, _rx) = ViewRegistry::with_channel();
        let a = ViewId::new_v4();
        let b = ViewId::new_v4();
        registry.add(view(a));
        registry.add(view(b));

        registry.remove_by_id(&a);

        assert!(registry.get_by_id(&a).is_none());
        assert!(registry.get_by_id(&b).is_some());
    }

    #[test]
    fn test_single_selection_semantics() {
        let (registry, _rx) = ViewRegistry::with_channel();
        let a = ViewId::new_v4();
        let b = ViewId::new_v4();
        registry.add(view(a));
        registry.add(view(b));

        registry.select(&a);
        registry.select(&b);
        assert_eq!(registry.selected().unwrap().id(), b);

        registry.remove_by_id(&b);
        assert!(registry.selected().is_none());
    }

    #[test]
    fn test_clear() {
        let (registry, _rx) = ViewRegistry::with_channel();
        registry.add(view(ViewId::new_v4()));
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.selected().is_none());
    }
}
