//! Principal kinds and role naming.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which credential store an authenticated principal lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    Admin,
    Student,
}

impl PrincipalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrincipalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "student" => Ok(Self::Student),
            other => Err(format!("unknown principal kind: {other}")),
        }
    }
}

/// Role assigned to every self-registered student.
pub const STUDENT_ROLE: &str = "student";

/// Lowest admin role; required to read application details.
pub const WARD_ROLE: &str = "ward";

/// Role required to create or edit bursaries.
pub const COUNTY_ROLE: &str = "county";

/// Role names are compared trimmed and lower-cased.
pub fn normalize_role_name(name: &str) -> String {
    name.trim().to_lowercase()
}
