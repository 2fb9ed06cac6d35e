use serde::{Deserialize, Serialize};

/// Snapshot of the simulated progress display. Reset at request start, ticked
/// while the request is outstanding, forced to 100 on completion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressState {
    pub percent: u8,
    pub label: String,
}
