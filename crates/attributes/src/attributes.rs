use serde::{Deserialize, Serialize};
use tasknet_core::{Importance, Progress};

/// Per-task attributes: optional name, optional description, optional
/// importance, and explicit progress. `progress` is only ever `Some`
/// for a concrete task — the task-system layer enforces that before
/// ever calling into this register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub name: Option<String>,
    pub description: Option<String>,
    pub importance: Option<Importance>,
    pub progress: Option<Progress>,
}
