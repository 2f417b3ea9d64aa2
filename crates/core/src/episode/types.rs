//! Media record types shared with the library collaborator.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::code::{EpisodeCode, EpisodeCodeError};

/// Classification of an episode as delivered by the sync jobs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeType {
    /// Part of the regular season order.
    Regular,
    /// Special that belongs with the season (premieres, finales, movies).
    SignificantSpecial,
    /// Promotional or recap material. Ignored for season completeness.
    InsignificantSpecial,
}

impl EpisodeType {
    /// Returns the type as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            EpisodeType::Regular => "regular",
            EpisodeType::SignificantSpecial => "significant_special",
            EpisodeType::InsignificantSpecial => "insignificant_special",
        }
    }

    /// Parse the stored representation. Unknown values are treated as regular.
    pub fn from_db(value: &str) -> Self {
        match value {
            "significant_special" => EpisodeType::SignificantSpecial,
            "insignificant_special" => EpisodeType::InsignificantSpecial,
            _ => EpisodeType::Regular,
        }
    }

    /// Whether this episode uses the special segment letter in its code.
    pub fn is_special(&self) -> bool {
        !matches!(self, EpisodeType::Regular)
    }
}

/// A TV episode record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Episode {
    /// Stable identifier assigned by the library.
    pub id: u64,
    /// Owning show.
    pub show_id: u64,
    pub season: u32,
    pub number: u32,
    #[serde(rename = "type")]
    pub episode_type: EpisodeType,
    /// Original air date, frequently missing for freshly synced episodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airdate: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Episode {
    pub fn is_special(&self) -> bool {
        self.episode_type.is_special()
    }

    /// Whether this episode counts toward season completeness and runs.
    pub fn is_significant(&self) -> bool {
        self.episode_type != EpisodeType::InsignificantSpecial
    }

    /// Canonical episode code, e.g. `s01e05`.
    pub fn code(&self) -> String {
        EpisodeCode::generate(self.season, self.number, self.is_special())
    }
}

/// A movie record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// A TV show record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Show {
    pub id: u64,
    pub name: String,
}

impl Show {
    /// Stand-in for a show whose record is gone from the library.
    pub fn placeholder(id: u64) -> Self {
        Self {
            id,
            name: format!("Show {}", id),
        }
    }
}

/// Structured form of an episode code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EpisodeIdentity {
    pub season: u32,
    pub number: u32,
    pub is_special: bool,
}

impl EpisodeIdentity {
    pub fn new(season: u32, number: u32, is_special: bool) -> Self {
        Self {
            season,
            number,
            is_special,
        }
    }

    /// A regular (non-special) episode.
    pub fn regular(season: u32, number: u32) -> Self {
        Self::new(season, number, false)
    }

    /// A special episode.
    pub fn special(season: u32, number: u32) -> Self {
        Self::new(season, number, true)
    }

    /// Identity of a loaded episode record.
    pub fn of(episode: &Episode) -> Self {
        Self::new(episode.season, episode.number, episode.is_special())
    }

    /// Canonical lowercase code.
    pub fn code(&self) -> String {
        EpisodeCode::generate(self.season, self.number, self.is_special)
    }
}

impl fmt::Display for EpisodeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl FromStr for EpisodeIdentity {
    type Err = EpisodeCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EpisodeCode::parse(s)
    }
}
