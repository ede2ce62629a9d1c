use serde::Serialize;

use crate::aggregates::Projections;
use crate::domain::vehicle::Vehicle;
use crate::pagination::PageWindow;

/// Lifecycle of the list view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Immutable snapshot the UI renders from.
///
/// Snapshots are rebuilt from controller state on every change and never
/// edited afterwards; intents go back through the controller.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub phase: Phase,
    pub records: Vec<Vehicle>,
    pub search: String,
    pub page: usize,
    pub page_count: usize,
    /// Records matching the search across all pages, as last reported by the server.
    pub total_count: usize,
    pub pages: PageWindow,
    pub error_message: Option<String>,
    /// Failure is transient and the last intent can be retried.
    pub retryable: bool,
    /// The credential is missing or was rejected; the UI should prompt for login.
    pub auth_required: bool,
    /// Derived from `records` only.
    pub projections: Projections,
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn is_empty(&self) -> bool {
        self.phase == Phase::Ready && self.records.is_empty()
    }
}
