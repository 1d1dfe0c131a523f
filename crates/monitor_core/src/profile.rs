use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::payload::EventBody;

/// Job category served by one monitor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Harvester,
    Scan,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Harvester, Category::Scan];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Harvester => "harvester",
            Category::Scan => "scan",
        }
    }

    pub fn profile(self) -> DomainProfile {
        match self {
            Category::Harvester => DomainProfile::harvester(),
            Category::Scan => DomainProfile::scan(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "harvester" | "theharvester" => Ok(Category::Harvester),
            "scan" | "scanning" => Ok(Category::Scan),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

/// Which payload field carries the per-job summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryField {
    /// `opts_summary` string.
    OptsSummary,
    /// `tools` list, joined with ", ".
    ToolList,
}

/// Per-category rules: ownership gate and summary extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainProfile {
    pub category: Category,
    /// Lowercase category tags this monitor answers to.
    pub aliases: Vec<String>,
    /// When false every event on the channel is accepted.
    pub gated: bool,
    pub summary_field: SummaryField,
}

impl DomainProfile {
    pub fn harvester() -> Self {
        Self {
            category: Category::Harvester,
            aliases: vec!["theharvester".to_string(), "harvester".to_string()],
            gated: true,
            summary_field: SummaryField::OptsSummary,
        }
    }

    pub fn scan() -> Self {
        Self {
            category: Category::Scan,
            aliases: Vec::new(),
            gated: false,
            summary_field: SummaryField::ToolList,
        }
    }

    pub fn matches_alias(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.aliases
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(tag))
    }

    /// True when the body carries a field only this category produces.
    pub fn has_marker(&self, body: &EventBody) -> bool {
        match self.category {
            Category::Harvester => body.opts_summary.is_some() || body.meta.harvester_opts,
            Category::Scan => !body.tools.is_empty(),
        }
    }

    pub fn summary_of(&self, body: &EventBody) -> Option<String> {
        match self.summary_field {
            SummaryField::OptsSummary => body.opts_summary.clone(),
            SummaryField::ToolList if body.tools.is_empty() => None,
            SummaryField::ToolList => Some(body.tools.join(", ")),
        }
    }
}
