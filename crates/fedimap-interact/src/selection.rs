//! Selection state machine.
//!
//! Tap transitions return an ordered effect list instead of mutating the
//! renderer directly, so the rule "clear the previous selection's highlight
//! before applying the new one" is an observable, testable property.

use fedimap_graph::HostPair;
use serde::{Deserialize, Serialize};

/// What is currently selected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    /// Nothing selected.
    #[default]
    Empty,
    /// A node is selected.
    Node(String),
    /// An edge is selected.
    Edge(HostPair),
}

/// A highlightable target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Highlight {
    /// Node highlight.
    Node(String),
    /// Edge highlight.
    Edge(HostPair),
}

/// Events emitted toward the surrounding UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiEvent {
    /// A node became selected.
    NodeSelected {
        /// Selected host.
        host: String,
    },
    /// The already-selected node was tapped again (conventionally:
    /// navigate to the server).
    NodeActivated {
        /// Activated host.
        host: String,
    },
    /// An edge became selected.
    EdgeSelected {
        /// Selected edge endpoints.
        pair: HostPair,
    },
    /// The selection was cleared.
    SelectionCleared,
}

/// Ordered side effect of a transition; the renderer applies these in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Remove the highlight from a target.
    ClearHighlight(Highlight),
    /// Apply the selection highlight to a target.
    ApplyHighlight(Highlight),
    /// Emit a UI event.
    Emit(UiEvent),
}

/// Hover outcome. Hover is non-exclusive: the tooltip always shows, but the
/// hover highlight is suppressed on the currently selected target so the
/// selection animation is never re-triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverResponse {
    /// Show the tooltip for the hovered target.
    pub show_tooltip: bool,
    /// Apply the hover highlight (false when the target is selected).
    pub apply_hover_highlight: bool,
}

/// The selection state machine.
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    selection: Selection,
}

impl SelectionMachine {
    /// Start with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    fn current_highlight(&self) -> Option<Highlight> {
        match &self.selection {
            Selection::Empty => None,
            Selection::Node(host) => Some(Highlight::Node(host.clone())),
            Selection::Edge(pair) => Some(Highlight::Edge(pair.clone())),
        }
    }

    /// Tap on a node.
    ///
    /// Selecting a different node clears the previous highlight first;
    /// tapping the already-selected node activates it and returns to empty.
    pub fn tap_node(&mut self, host: &str) -> Vec<Effect> {
        if self.selection == Selection::Node(host.to_string()) {
            self.selection = Selection::Empty;
            return vec![
                Effect::ClearHighlight(Highlight::Node(host.to_string())),
                Effect::Emit(UiEvent::NodeActivated {
                    host: host.to_string(),
                }),
            ];
        }

        let mut effects = Vec::new();
        if let Some(previous) = self.current_highlight() {
            effects.push(Effect::ClearHighlight(previous));
        }
        effects.push(Effect::ApplyHighlight(Highlight::Node(host.to_string())));
        effects.push(Effect::Emit(UiEvent::NodeSelected {
            host: host.to_string(),
        }));
        self.selection = Selection::Node(host.to_string());
        effects
    }

    /// Tap on an edge.
    ///
    /// Always (re)selects; a second tap on the same edge does not toggle
    /// back to empty. The asymmetry with node taps is intentional.
    pub fn tap_edge(&mut self, a: &str, b: &str) -> Vec<Effect> {
        let pair = HostPair::new(a, b);

        let mut effects = Vec::new();
        if let Some(previous) = self.current_highlight() {
            effects.push(Effect::ClearHighlight(previous));
        }
        effects.push(Effect::ApplyHighlight(Highlight::Edge(pair.clone())));
        effects.push(Effect::Emit(UiEvent::EdgeSelected { pair: pair.clone() }));
        self.selection = Selection::Edge(pair);
        effects
    }

    /// Tap on the background: clear everything.
    pub fn tap_background(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if let Some(previous) = self.current_highlight() {
            effects.push(Effect::ClearHighlight(previous));
        }
        effects.push(Effect::Emit(UiEvent::SelectionCleared));
        self.selection = Selection::Empty;
        effects
    }

    /// Pointer entered a target.
    pub fn hover_enter(&self, target: &Highlight) -> HoverResponse {
        let is_selected = self.current_highlight().as_ref() == Some(target);
        HoverResponse {
            show_tooltip: true,
            apply_hover_highlight: !is_selected,
        }
    }

    /// Pointer left a target. The hover highlight is removed only where one
    /// was applied; the selection highlight stays untouched.
    pub fn hover_leave(&self, target: &Highlight) -> bool {
        self.current_highlight().as_ref() != Some(target)
    }
}
