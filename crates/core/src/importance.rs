use serde::{Deserialize, Serialize};

/// Per-task importance, ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    pub const MAX: Importance = Importance::High;

    pub const fn is_max(self) -> bool {
        matches!(self, Importance::High)
    }
}
