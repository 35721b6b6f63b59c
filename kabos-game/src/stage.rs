//! Difficulty tiers the player escapes through, in order.
use serde::{Deserialize, Serialize};

/// Ordered difficulty tier. Declaration order is the escape path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Easy,
    Medium,
    Hard,
}

impl Stage {
    /// Every stage in escape order.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];
    /// Number of stages a player must clear to win.
    pub const COUNT: usize = Self::ALL.len();

    /// Stage at `index` in the escape path, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
        }
    }

    /// Following stage, or `None` after `Hard`.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
