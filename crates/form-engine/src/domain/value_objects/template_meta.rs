//! Template category and lifecycle status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed set of template categories
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    GuestFeedback,
    CheckIn,
    Reservation,
    Maintenance,
    Incident,
    Compliance,
    Staff,
    Event,
    #[default]
    Other,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 9] = [
        Self::GuestFeedback,
        Self::CheckIn,
        Self::Reservation,
        Self::Maintenance,
        Self::Incident,
        Self::Compliance,
        Self::Staff,
        Self::Event,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GuestFeedback => "guest_feedback",
            Self::CheckIn => "check_in",
            Self::Reservation => "reservation",
            Self::Maintenance => "maintenance",
            Self::Incident => "incident",
            Self::Compliance => "compliance",
            Self::Staff => "staff",
            Self::Event => "event",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown template category: {}", s))
    }
}

/// Template lifecycle status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl TemplateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            other => Err(format!("unknown template status: {}", other)),
        }
    }
}
