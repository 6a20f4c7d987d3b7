//! Role-driven approval workflow.
//!
//! The approval table maps the *name* of the acting admin's role to the stage an approval
//! moves the application to. It is independent of the level-based access checks
//! in [`crate::access`]: a `finance` admin outranks a `ward` admin, but may only ever move
//! applications to `disbursed`.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::principal::normalize_role_name;
use crate::stage::Stage;

/// Immutable mapping `acting role name → target stage`.
///
/// Lookups are case-insensitive; keys are stored normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalTable {
    targets: BTreeMap<String, Stage>,
}

impl ApprovalTable {
    /// The pipeline used in production:
    ///
    /// | role | target |
    /// |------|--------|
    /// | `ward` | `county` |
    /// | `county` | `ministry` |
    /// | `finance-assistant` | `finance` |
    /// | `finance` | `disbursed` |
    pub fn standard() -> Self {
        Self::from_entries([
            ("ward", Stage::County),
            ("county", Stage::Ministry),
            ("finance-assistant", Stage::Finance),
            ("finance", Stage::Disbursed),
        ])
    }

    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, Stage)>) -> Self {
        let targets = entries
            .into_iter()
            .map(|(role, stage)| (normalize_role_name(role), stage))
            .collect();
        Self { targets }
    }

    /// Stage an approval by `role` moves an application to, or `None` if the role may not approve.
    pub fn target_for(&self, role: &str) -> Option<Stage> {
        self.targets.get(&normalize_role_name(role)).copied()
    }

    /// Stage whose applications `role` is expected to review (the predecessor of its target).
    pub fn reviewing_stage(&self, role: &str) -> Option<Stage> {
        self.target_for(role).and_then(Stage::predecessor)
    }
}

impl Default for ApprovalTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// How strictly an approval checks the application's current stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePolicy {
    /// Move to the role's target regardless of the current stage.
    #[default]
    Lenient,
    /// Only move when the current stage is the immediate predecessor of the target.
    Sequential,
}

impl FromStr for StagePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "sequential" => Ok(Self::Sequential),
            other => Err(format!("unknown stage policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("role {role:?} may not approve applications")]
    Forbidden { role: String },
    #[error("application is at stage {current}, cannot move to {target}")]
    StageMismatch { current: Stage, target: Stage },
}

/// Compute the stage an approval by `acting_role` produces for an application at `current`.
pub fn transition(
    table: &ApprovalTable,
    policy: StagePolicy,
    current: Stage,
    acting_role: &str,
) -> Result<Stage, TransitionError> {
    let target = table
        .target_for(acting_role)
        .ok_or_else(|| TransitionError::Forbidden {
            role: acting_role.to_owned(),
        })?;

    match policy {
        StagePolicy::Lenient => Ok(target),
        StagePolicy::Sequential if target.predecessor() == Some(current) => Ok(target),
        StagePolicy::Sequential => Err(TransitionError::StageMismatch { current, target }),
    }
}
