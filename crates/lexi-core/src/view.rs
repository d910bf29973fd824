//! Viewer state machine.
//!
//! ```text
//! Idle ──submit──▶ Loading ──loaded──▶ Rendered | Empty
//!                     │
//!                     └──failed──▶ Error
//! Rendered ──click──▶ Loading
//! ```
//!
//! Every request gets a sequence number; results for anything but the most
//! recent request are ignored, so the last request wins. `Error` is only left
//! through a new user action.

use thiserror::Error;

use crate::expand::ExpansionRequest;
use crate::model::{GraphOutcome, SearchField};

/// Why a loaded graph has nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// No term entered.
    NoInput,
    /// The term matched no node.
    NoMatch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading { request: ExpansionRequest, seq: u64 },
    Rendered { request: ExpansionRequest, center: String },
    Empty { request: ExpansionRequest, reason: EmptyReason },
    Error { request: ExpansionRequest, message: String, retryable: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// New term, depth or search field.
    Submit(ExpansionRequest),
    /// A node of the rendered graph was clicked.
    NodeClicked(String),
    /// The request `seq` completed.
    Loaded { seq: u64, outcome: GraphOutcome },
    /// The request `seq` failed.
    Failed { seq: u64, message: String, retryable: bool },
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid view transition: {event} while {state}")]
pub struct TransitionError {
    pub state: &'static str,
    pub event: &'static str,
}

impl ViewState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Rendered { .. } => "rendered",
            Self::Empty { .. } => "empty",
            Self::Error { .. } => "error",
        }
    }

    /// The request behind the current state, if any.
    pub fn request(&self) -> Option<&ExpansionRequest> {
        match self {
            Self::Idle => None,
            Self::Loading { request, .. }
            | Self::Rendered { request, .. }
            | Self::Empty { request, .. }
            | Self::Error { request, .. } => Some(request),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

fn event_name(event: &ViewEvent) -> &'static str {
    match event {
        ViewEvent::Submit(_) => "submit",
        ViewEvent::NodeClicked(_) => "node click",
        ViewEvent::Loaded { .. } => "loaded",
        ViewEvent::Failed { .. } => "failed",
    }
}

/// Drives [`ViewState`] transitions and hands out request sequence numbers.
#[derive(Debug, Clone)]
pub struct Viewer {
    state: ViewState,
    next_seq: u64,
}

impl Default for Viewer {
    fn default() -> Self {
        Self {
            state: ViewState::Idle,
            next_seq: 1,
        }
    }
}

impl Viewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Sequence number of the in-flight request.
    pub fn pending(&self) -> Option<(u64, &ExpansionRequest)> {
        match &self.state {
            ViewState::Loading { request, seq } => Some((*seq, request)),
            _ => None,
        }
    }

    /// Apply an event. Stale results leave the state untouched.
    pub fn apply(&mut self, event: ViewEvent) -> Result<&ViewState, TransitionError> {
        let invalid = TransitionError {
            state: self.state.name(),
            event: event_name(&event),
        };

        let fresh = self.next_seq;
        let next = match (&self.state, event) {
            (_, ViewEvent::Submit(request)) => ViewState::Loading { request, seq: fresh },

            (ViewState::Rendered { request, .. }, ViewEvent::NodeClicked(id)) => ViewState::Loading {
                request: ExpansionRequest {
                    center: id,
                    depth: request.depth,
                    field: SearchField::Kanji,
                },
                seq: fresh,
            },

            (ViewState::Loading { request, seq }, ViewEvent::Loaded { seq: done, outcome }) => {
                if *seq != done {
                    return Ok(&self.state);
                }
                let request = request.clone();
                match outcome {
                    GraphOutcome::Found { center } => ViewState::Rendered { request, center },
                    GraphOutcome::NoMatch => ViewState::Empty {
                        request,
                        reason: EmptyReason::NoMatch,
                    },
                    GraphOutcome::EmptyInput => ViewState::Empty {
                        request,
                        reason: EmptyReason::NoInput,
                    },
                }
            }

            (ViewState::Loading { request, seq }, ViewEvent::Failed { seq: done, message, retryable }) => {
                if *seq != done {
                    return Ok(&self.state);
                }
                ViewState::Error {
                    request: request.clone(),
                    message,
                    retryable,
                }
            }

            // A late result for a request that was already settled.
            (_, ViewEvent::Loaded { seq, .. } | ViewEvent::Failed { seq, .. }) if seq < fresh => {
                return Ok(&self.state);
            }

            _ => return Err(invalid),
        };

        if next.is_loading() {
            self.next_seq += 1;
        }
        self.state = next;
        Ok(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Depth;

    fn submit(center: &str) -> ViewEvent {
        ViewEvent::Submit(ExpansionRequest::new(center, Depth::One, SearchField::Kanji))
    }

    fn found(seq: u64, center: &str) -> ViewEvent {
        ViewEvent::Loaded {
            seq,
            outcome: GraphOutcome::Found { center: center.into() },
        }
    }

    #[test]
    fn test_submit_load_render() {
        let mut viewer = Viewer::new();
        assert_eq!(viewer.state(), &ViewState::Idle);

        viewer.apply(submit("猫")).unwrap();
        let (seq, request) = viewer.pending().unwrap();
        assert_eq!(request.center, "猫");

        let state = viewer.apply(found(seq, "猫")).unwrap();
        assert!(matches!(state, ViewState::Rendered { center, .. } if center == "猫"));
    }

    #[test]
    fn test_node_click_recenters_with_same_depth() {
        let mut viewer = Viewer::new();
        viewer
            .apply(ViewEvent::Submit(ExpansionRequest::new("cat", Depth::Two, SearchField::Translation)))
            .unwrap();
        let (seq, _) = viewer.pending().unwrap();
        viewer.apply(found(seq, "猫")).unwrap();

        viewer.apply(ViewEvent::NodeClicked("犬".into())).unwrap();
        let (_, request) = viewer.pending().unwrap();
        assert_eq!(request.center, "犬");
        assert_eq!(request.depth, Depth::Two);
        assert_eq!(request.field, SearchField::Kanji);
    }

    #[test]
    fn test_empty_states_are_distinct() {
        let mut viewer = Viewer::new();
        viewer.apply(submit("")).unwrap();
        let (seq, _) = viewer.pending().unwrap();
        let state = viewer
            .apply(ViewEvent::Loaded { seq, outcome: GraphOutcome::EmptyInput })
            .unwrap();
        assert!(matches!(state, ViewState::Empty { reason: EmptyReason::NoInput, .. }));

        viewer.apply(submit("存在しない")).unwrap();
        let (seq, _) = viewer.pending().unwrap();
        let state = viewer
            .apply(ViewEvent::Loaded { seq, outcome: GraphOutcome::NoMatch })
            .unwrap();
        assert!(matches!(state, ViewState::Empty { reason: EmptyReason::NoMatch, .. }));
    }

    #[test]
    fn test_last_request_wins() {
        let mut viewer = Viewer::new();
        viewer.apply(submit("猫")).unwrap();
        let (first, _) = viewer.pending().unwrap();
        viewer.apply(submit("犬")).unwrap();
        let (second, _) = viewer.pending().unwrap();

        viewer.apply(found(first, "猫")).unwrap();
        assert!(viewer.state().is_loading());

        viewer.apply(found(second, "犬")).unwrap();
        assert!(matches!(viewer.state(), ViewState::Rendered { center, .. } if center == "犬"));

        // Settled already: the stale failure is dropped.
        viewer
            .apply(ViewEvent::Failed { seq: first, message: "late".into(), retryable: true })
            .unwrap();
        assert_eq!(viewer.state().name(), "rendered");
    }

    #[test]
    fn test_error_only_left_by_user_action() {
        let mut viewer = Viewer::new();
        viewer.apply(submit("猫")).unwrap();
        let (seq, _) = viewer.pending().unwrap();
        viewer
            .apply(ViewEvent::Failed { seq, message: "timeout".into(), retryable: true })
            .unwrap();
        assert_eq!(viewer.state().name(), "error");

        assert!(viewer.apply(ViewEvent::NodeClicked("犬".into())).is_err());
        assert!(viewer.apply(found(99, "猫")).is_err());
        assert_eq!(viewer.state().name(), "error");

        viewer.apply(submit("猫")).unwrap();
        assert!(viewer.state().is_loading());
    }

    #[test]
    fn test_click_requires_rendered_graph() {
        let mut viewer = Viewer::new();
        let err = viewer.apply(ViewEvent::NodeClicked("猫".into())).unwrap_err();
        assert_eq!(err.state, "idle");
        assert_eq!(err.event, "node click");
    }
}
