//! Bursary domain types.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a bursary's funds are split between successful applicants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationType {
    /// Every applicant receives `amount_per_student`.
    Fixed,
    /// Amounts are decided per applicant.
    Variable,
}

impl AllocationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Variable => "variable",
        }
    }
}

impl FromStr for AllocationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(Self::Fixed),
            "variable" => Ok(Self::Variable),
            other => Err(format!("unknown allocation type: {other}")),
        }
    }
}
