/*
 * Per-pane view state: which directory a pane looks at, its working path,
 * focus, and multi-selection. Two update pathways exist and are kept
 * strictly apart:
 *
 * - the internal `apply_*` operations mutate and publish local state, used
 *   when the change originates in this pane (or when the selection
 *   authority has approved a request and echoes it back);
 * - `request_selection` does not touch local state at all. It emits a
 *   `ViewCommand` onto the outbound channel for the selection authority to
 *   process; only a later `apply_selection` makes the change visible here.
 */
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;

use super::identity::{DirectoryId, ViewId};
use super::observable::{Observable, SubscriptionId};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectoryView {
    pub id: ViewId,
    pub directory: DirectoryId,
    #[serde(default)]
    pub working_dir: String,
    #[serde(default)]
    pub focused: String,
    #[serde(default)]
    pub selected: Vec<String>,
}

impl DirectoryView {
    pub fn new(id: ViewId, directory: DirectoryId) -> Self {
        DirectoryView {
            id,
            directory,
            working_dir: String::new(),
            focused: String::new(),
            selected: Vec::new(),
        }
    }
}

/*
 * Outbound commands published by views. Fire-and-forget: no acknowledgment
 * is awaited, the consumer applies the authoritative mutation later.
 */
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCommand {
    SelectFiles {
        view: ViewId,
        focused: String,
        selected: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct ViewState {
    state: Observable<DirectoryView>,
    commands: Sender<ViewCommand>,
}

impl ViewState {
    pub fn new(view: DirectoryView, commands: Sender<ViewCommand>) -> Self {
        ViewState {
            state: Observable::new(view),
            commands,
        }
    }

    pub fn id(&self) -> ViewId {
        self.state.with_value(|v| v.id)
    }

    pub fn directory(&self) -> DirectoryId {
        self.state.with_value(|v| v.directory)
    }

    pub fn snapshot(&self) -> DirectoryView {
        self.state.snapshot()
    }

    pub fn subscribe(&self, listener: Box<dyn FnMut(&DirectoryView)>) -> SubscriptionId {
        self.state.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    /* Internal pathway: the pane itself changed directory. */
    pub fn apply_working_dir(&self, working_dir: &str) {
        log::debug!("ViewState {}: working dir -> '{working_dir}'", self.id());
        self.state
            .update(|v| v.working_dir = working_dir.to_string());
    }

    /* Internal pathway: an authorized selection change is applied locally. */
    pub fn apply_selection(&self, focused: &str, selected: Vec<String>) {
        log::debug!(
            "ViewState {}: apply selection, focused '{focused}', {} selected",
            self.id(),
            selected.len()
        );
        self.state.update(|v| {
            v.focused = focused.to_string();
            v.selected = selected;
        });
    }

    /*
     * External pathway: asks the selection authority to select files in
     * this view. Local state stays untouched until the authority calls
     * `apply_selection`. A disconnected consumer only costs a log line;
     * the request is fire-and-forget by contract.
     */
    pub fn request_selection(&self, focused: &str, selected: Vec<String>) {
        let command = ViewCommand::SelectFiles {
            view: self.id(),
            focused: focused.to_string(),
            selected,
        };
        if self.commands.send(command).is_err() {
            log::warn!(
                "ViewState {}: selection consumer disconnected, request dropped",
                self.id()
            );
        }
    }
}
