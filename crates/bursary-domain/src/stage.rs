//! Application pipeline stages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Position of an application in the approval pipeline.
///
/// Wire format: lowercase string (`"submitted"`, `"county"`, ...). Forward order is
/// `submitted → county → ministry → finance → disbursed`. Withdrawal is not a stage;
/// it is tracked separately by the application's soft-delete flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Submitted,
    County,
    Ministry,
    Finance,
    Disbursed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stage: {0}")]
pub struct UnknownStage(pub String);

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Submitted,
        Stage::County,
        Stage::Ministry,
        Stage::Finance,
        Stage::Disbursed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::County => "county",
            Self::Ministry => "ministry",
            Self::Finance => "finance",
            Self::Disbursed => "disbursed",
        }
    }

    /// The stage immediately before this one, or `None` for `Submitted`.
    pub fn predecessor(self) -> Option<Self> {
        match self {
            Self::Submitted => None,
            Self::County => Some(Self::Submitted),
            Self::Ministry => Some(Self::County),
            Self::Finance => Some(Self::Ministry),
            Self::Disbursed => Some(Self::Finance),
        }
    }

    /// The stage immediately after this one, or `None` for `Disbursed`.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Submitted => Some(Self::County),
            Self::County => Some(Self::Ministry),
            Self::Ministry => Some(Self::Finance),
            Self::Finance => Some(Self::Disbursed),
            Self::Disbursed => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| UnknownStage(s.to_owned()))
    }
}
