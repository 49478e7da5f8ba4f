//! Selection and editing-tool state shared with the layer click handlers.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trailmap_track::{Observable, ObservableId, Track};

/// Editing tools; while one is active it may own map clicks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tool {
    Routing,
    Waypoint,
    Scissors,
    Time,
    Merge,
    Extract,
    Elevation,
    Reduce,
    Clean,
    Style,
}

/// The currently active tool, shared between the UI and layer handlers.
#[derive(Clone, Debug, Default)]
pub struct ToolState(Rc<Cell<Option<Tool>>>);

impl ToolState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Tool> {
        self.0.get()
    }

    pub fn set(&self, tool: Option<Tool>) {
        self.0.set(tool);
    }

    pub fn is_active(&self, tool: Tool) -> bool {
        self.0.get() == Some(tool)
    }
}

pub trait SelectionService {
    /// Replace the selection with `track`.
    fn select(&self, track: &Observable<Track>);

    /// Extend the selection with `track`.
    fn add_select(&self, track: &Observable<Track>);
}

/// Ordered set of selected tracks.
#[derive(Default)]
pub struct Selection {
    selected: RefCell<Vec<Observable<Track>>>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Vec<Observable<Track>> {
        self.selected.borrow().clone()
    }

    pub fn selected_ids(&self) -> Vec<ObservableId> {
        self.selected.borrow().iter().map(Observable::id).collect()
    }

    pub fn is_selected(&self, track: &Observable<Track>) -> bool {
        self.selected.borrow().iter().any(|t| t.id() == track.id())
    }

    pub fn len(&self) -> usize {
        self.selected.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.selected.borrow_mut().clear();
    }
}

impl SelectionService for Selection {
    fn select(&self, track: &Observable<Track>) {
        let mut selected = self.selected.borrow_mut();
        selected.clear();
        selected.push(track.clone());
    }

    fn add_select(&self, track: &Observable<Track>) {
        if self.is_selected(track) {
            return;
        }
        self.selected.borrow_mut().push(track.clone());
    }
}
