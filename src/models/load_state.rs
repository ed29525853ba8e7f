use serde::Serialize;

/// Lifecycle of any fetch-driven view of remote data
///
/// `Idle -> Loading -> {Success, Failure}`. A retry re-enters `Loading` from `Failure`,
/// a refresh re-enters it from `Success`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Success,
    Failure(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadState::Failure(message) => Some(message),
            _ => None,
        }
    }
}
