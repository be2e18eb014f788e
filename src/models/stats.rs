//! Filters for the dashboard's fixed views.
//!
//! Every filter value is optional. A missing, blank or `"All"` value means the
//! condition is left out of the query.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Value a dropdown sends when nothing is selected.
pub const ANY_FILTER_VALUE: &str = "All";

/// A filter value that actually narrows the result.
pub fn active_filter(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ANY_FILTER_VALUE))
}

/// Filters for the recent matches list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    /// e.g. "TEST", "ODI", "T20"
    pub match_format: Option<String>,
    /// e.g. "Complete", "In Progress"
    pub state: Option<String>,
}

impl MatchFilter {
    pub fn match_format(&self) -> Option<&str> {
        active_filter(self.match_format.as_deref())
    }

    pub fn state(&self) -> Option<&str> {
        active_filter(self.state.as_deref())
    }
}

/// Filters for the player list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    /// Substring of the player's name
    pub name: Option<String>,
    pub country: Option<String>,
    pub playing_role: Option<String>,
}

impl PlayerFilter {
    pub fn name(&self) -> Option<&str> {
        active_filter(self.name.as_deref())
    }

    pub fn country(&self) -> Option<&str> {
        active_filter(self.country.as_deref())
    }

    pub fn playing_role(&self) -> Option<&str> {
        active_filter(self.playing_role.as_deref())
    }
}

/// Which discipline a top-players list is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Specialty {
    #[default]
    Batting,
    Bowling,
}

impl Specialty {
    /// Column on `players` describing the player's style in this discipline.
    pub fn style_column(self) -> &'static str {
        match self {
            Self::Batting => "batting_style",
            Self::Bowling => "bowling_style",
        }
    }
}
