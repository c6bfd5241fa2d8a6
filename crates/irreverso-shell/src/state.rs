//! Shell state store
//!
//! A single `AppState` mutated only through [`Shell::dispatch`]. The reducer
//! is pure: the same state and action always give the same next state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::timeline;

/// What the NUVE entity is doing on the core surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NuveState {
    #[default]
    Observing,
    Persistent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub year: i32,
    pub years_visited: BTreeSet<i32>,
    pub nuve_state: NuveState,
    pub menu_open: bool,
}

impl AppState {
    pub fn new(year: i32) -> Self {
        AppState {
            year,
            years_visited: BTreeSet::new(),
            nuve_state: NuveState::Observing,
            menu_open: false,
        }
    }

    pub fn has_visited(&self, year: i32) -> bool {
        self.years_visited.contains(&year)
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(timeline::PRESENT_YEAR)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    SetYear(i32),
    MarkVisited(i32),
    SetNuveState(NuveState),
    SetMenuOpen(bool),
    ToggleMenu,
}

/// Next state for `action`. Returns `None` when nothing changes.
pub fn reduce(state: &AppState, action: Action) -> Option<AppState> {
    let mut next = state.clone();
    match action {
        Action::SetYear(year) => next.year = year,
        Action::MarkVisited(year) => {
            next.years_visited.insert(year);
        }
        Action::SetNuveState(nuve) => next.nuve_state = nuve,
        Action::SetMenuOpen(open) => next.menu_open = open,
        Action::ToggleMenu => next.menu_open = !next.menu_open,
    }
    (next != *state).then_some(next)
}

/// Owner of the app state
#[derive(Debug, Default)]
pub struct Shell {
    state: AppState,
    revision: u64,
}

impl Shell {
    pub fn new(state: AppState) -> Self {
        Shell { state, revision: 0 }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Bumped on every dispatch that changed the state
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply one action. Returns whether the state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        match reduce(&self.state, action) {
            Some(next) => {
                self.state = next;
                self.revision += 1;
                tracing::trace!(?action, revision = self.revision, "shell state changed");
                true
            }
            None => false,
        }
    }

    /// Pick a year on the timeline: select it and remember the visit
    pub fn pick_year(&mut self, year: i32) -> bool {
        let selected = self.dispatch(Action::SetYear(year));
        let marked = self.dispatch(Action::MarkVisited(year));
        selected || marked
    }
}
