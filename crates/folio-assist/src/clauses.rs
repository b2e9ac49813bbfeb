//! Library of standard clauses the assistant can draft on request.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum StandardClause {
    #[strum(serialize = "confidentiality")]
    Confidentiality,
    #[strum(serialize = "liability_cap", serialize = "liability-cap", serialize = "liability cap")]
    LiabilityCap,
    #[strum(serialize = "force_majeure", serialize = "force-majeure", serialize = "force majeure")]
    ForceMajeure,
    #[strum(serialize = "termination")]
    Termination,
    #[strum(serialize = "arbitration")]
    Arbitration,
    #[strum(serialize = "indemnification")]
    Indemnification,
}

impl StandardClause {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s.trim()).ok()
    }

    /// Every clause in the library.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Display name.
    pub fn title(&self) -> &'static str {
        match self {
            StandardClause::Confidentiality => "Confidentiality",
            StandardClause::LiabilityCap => "Liability Cap",
            StandardClause::ForceMajeure => "Force Majeure",
            StandardClause::Termination => "Termination",
            StandardClause::Arbitration => "Arbitration",
            StandardClause::Indemnification => "Indemnification",
        }
    }

    /// Instruction that drafts this clause.
    pub fn instruction(&self) -> String {
        format!("Draft a standard clause: {}", self.title())
    }
}

impl std::fmt::Display for StandardClause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}
