//! Pane registry - owns the set of live panes
//!
//! Panes have a stable identity independent of their position in the layout
//! tree. The registry is the single owner of pane state (title, content
//! handle, closable flag, floating geometry); the tree only references panes
//! by id. Content mount/unmount notifications for the rendering collaborator
//! are queued here and drained by the host via the manager.

use std::collections::HashMap;

use crate::geometry::Rect;

/// Unique identifier for a pane
///
/// Pane ids survive serialization round-trips; freshly created panes never
/// reuse an id seen in a restored layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(pub u64);

/// Opaque handle to host-owned pane content (an editor, a tool view, ...)
///
/// The manager never interprets the handle; it only tracks which pane holds
/// which content and reports mount/unmount transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentId(pub u64);

/// A docked or floating content slot
#[derive(Debug, Clone)]
pub struct Pane {
    pub id: PaneId,
    pub title: String,
    pub content: Option<ContentId>,
    /// Whether the pane shows a close affordance. The manager additionally
    /// hides it while only one pane exists, regardless of this flag.
    pub closable: bool,
    /// Free geometry while detached from the tree; `None` while docked
    pub floating: Option<Rect>,
}

impl Pane {
    fn new(id: PaneId) -> Self {
        Self {
            id,
            title: String::new(),
            content: None,
            closable: true,
            floating: None,
        }
    }

    pub fn is_floating(&self) -> bool {
        self.floating.is_some()
    }
}

/// Content lifecycle notification for the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneEvent {
    ContentMounted { pane: PaneId, content: ContentId },
    ContentUnmounted { pane: PaneId, content: ContentId },
}

/// Monotonic id generator
///
/// Restoring a serialized layout reseeds the generator past the largest id
/// encountered so new ids never collide with restored ones.
#[derive(Debug, Clone)]
pub struct IdGen {
    next: u64,
}

impl IdGen {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Ensure future ids are strictly greater than `seen`
    pub fn reseed_past(&mut self, seen: u64) {
        if seen >= self.next {
            self.next = seen + 1;
        }
    }
}

impl Default for IdGen {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns all live panes and their content state
///
/// No operation panics: unknown ids are absorbed as no-ops returning
/// `None`/`false`, because stale ids are a normal outcome of UI races.
#[derive(Debug, Clone)]
pub struct PaneRegistry {
    panes: HashMap<PaneId, Pane>,
    ids: IdGen,
    events: Vec<PaneEvent>,
}

impl PaneRegistry {
    pub fn new() -> Self {
        Self {
            panes: HashMap::new(),
            ids: IdGen::new(),
            events: Vec::new(),
        }
    }

    /// Create a pane with a fresh id
    pub fn create(&mut self) -> PaneId {
        let id = PaneId(self.ids.next_id());
        self.panes.insert(id, Pane::new(id));
        id
    }

    /// Create a pane with a specific id (restore path)
    ///
    /// Returns `false` without touching anything if the id is already live.
    pub fn create_with_id(&mut self, id: PaneId) -> bool {
        if self.panes.contains_key(&id) {
            return false;
        }
        self.ids.reseed_past(id.0);
        self.panes.insert(id, Pane::new(id));
        true
    }

    pub fn get(&self, id: PaneId) -> Option<&Pane> {
        self.panes.get(&id)
    }

    pub fn get_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        self.panes.get_mut(&id)
    }

    pub fn contains(&self, id: PaneId) -> bool {
        self.panes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.panes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panes.is_empty()
    }

    /// Attach content to a pane, unmounting whatever it held before
    pub fn set_content(&mut self, id: PaneId, content: ContentId) {
        let Some(pane) = self.panes.get_mut(&id) else {
            return;
        };
        if pane.content == Some(content) {
            return;
        }
        if let Some(old) = pane.content.take() {
            self.events.push(PaneEvent::ContentUnmounted {
                pane: id,
                content: old,
            });
        }
        pane.content = Some(content);
        self.events.push(PaneEvent::ContentMounted { pane: id, content });
    }

    /// Detach a pane's content, if any
    pub fn clear_content(&mut self, id: PaneId) {
        let Some(pane) = self.panes.get_mut(&id) else {
            return;
        };
        if let Some(old) = pane.content.take() {
            self.events.push(PaneEvent::ContentUnmounted {
                pane: id,
                content: old,
            });
        }
    }

    pub fn set_title(&mut self, id: PaneId, title: &str) {
        if let Some(pane) = self.panes.get_mut(&id) {
            pane.title = title.to_string();
        }
    }

    /// Remove a pane entirely, unmounting its content first
    pub fn remove(&mut self, id: PaneId) -> bool {
        self.clear_content(id);
        self.panes.remove(&id).is_some()
    }

    /// Drain queued mount/unmount notifications
    pub fn take_events(&mut self) -> Vec<PaneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Remove every pane (unmounting content) and restart id generation,
    /// keeping queued events intact
    pub(crate) fn reset(&mut self) {
        let ids: Vec<PaneId> = self.panes.keys().copied().collect();
        for id in ids {
            self.clear_content(id);
        }
        self.panes.clear();
        self.ids = IdGen::new();
    }

    pub(crate) fn reseed_past(&mut self, seen: u64) {
        self.ids.reseed_past(seen);
    }
}

impl Default for PaneRegistry {
    fn default() -> Self {
        Self::new()
    }
}
