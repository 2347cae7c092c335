//! Column table for the board game dataset.
//!
//! Every column the story touches is listed once in [`COLUMN_TYPES`], together
//! with its data type tag. Lookups accept either the raw CSV label
//! (`"Year Published"`) or the camel-case alias (`"yearPublished"`).

use crate::error::{Result, StoryError};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A column of the board game table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    Id,
    Name,
    YearPublished,
    MinPlayers,
    MaxPlayers,
    PlayTime,
    MinAge,
    UsersRated,
    RatingAverage,
    BggRank,
    ComplexityAverage,
    OwnedUsers,
    Mechanics,
    Domains,
    /// First entry of the domains list, derived during normalization.
    PrimaryDomain,
    /// Precomputed era label carried by the pre-binned tables.
    Bin,
}

impl Column {
    pub const ALL: [Column; 16] = [
        Column::Id,
        Column::Name,
        Column::YearPublished,
        Column::MinPlayers,
        Column::MaxPlayers,
        Column::PlayTime,
        Column::MinAge,
        Column::UsersRated,
        Column::RatingAverage,
        Column::BggRank,
        Column::ComplexityAverage,
        Column::OwnedUsers,
        Column::Mechanics,
        Column::Domains,
        Column::PrimaryDomain,
        Column::Bin,
    ];

    /// Exact header used by the CSV sources.
    pub fn label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Name => "Name",
            Self::YearPublished => "Year Published",
            Self::MinPlayers => "Min Players",
            Self::MaxPlayers => "Max Players",
            Self::PlayTime => "Play Time",
            Self::MinAge => "Min Age",
            Self::UsersRated => "Users Rated",
            Self::RatingAverage => "Rating Average",
            Self::BggRank => "BGG Rank",
            Self::ComplexityAverage => "Complexity Average",
            Self::OwnedUsers => "Owned Users",
            Self::Mechanics => "Mechanics",
            Self::Domains => "Domains",
            Self::PrimaryDomain => "Primary Domain",
            Self::Bin => "Bin",
        }
    }

    /// Camel-case alias used by the normalized records.
    pub fn alias(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::YearPublished => "yearPublished",
            Self::MinPlayers => "minPlayers",
            Self::MaxPlayers => "maxPlayers",
            Self::PlayTime => "playTime",
            Self::MinAge => "minAge",
            Self::UsersRated => "usersRated",
            Self::RatingAverage => "ratingAverage",
            Self::BggRank => "bggRank",
            Self::ComplexityAverage => "complexityAverage",
            Self::OwnedUsers => "ownedUsers",
            Self::Mechanics => "mechanics",
            Self::Domains => "domains",
            Self::PrimaryDomain => "primaryDomain",
            Self::Bin => "bin",
        }
    }

    /// Whether normalization produces a numeric field for this column.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Id
                | Self::YearPublished
                | Self::MinPlayers
                | Self::MaxPlayers
                | Self::PlayTime
                | Self::MinAge
                | Self::UsersRated
                | Self::RatingAverage
                | Self::BggRank
                | Self::ComplexityAverage
                | Self::OwnedUsers
        )
    }

    /// Resolve a raw label or camel-case alias.
    pub fn from_name(name: &str) -> Result<Column> {
        COLUMN_LOOKUP
            .get(name)
            .map(|(column, _)| *column)
            .ok_or_else(|| StoryError::UnknownColumn(name.to_string()))
    }

    /// Data type tag from the column table.
    pub fn tag(self) -> DataTypeTag {
        COLUMN_LOOKUP
            .get(self.label())
            .map(|(_, tag)| *tag)
            // Unreachable once `validate_column_table` has passed.
            .unwrap_or(DataTypeTag::Nominal)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a column's values behave on a visual channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataTypeTag {
    Ordinal,
    Quantitative,
    Nominal,
    Categorical,
    Field,
    Cyclic,
}

impl DataTypeTag {
    /// Discrete tags map to evenly spaced points.
    pub fn is_discrete(self) -> bool {
        matches!(self, Self::Categorical | Self::Ordinal)
    }

    /// Continuous tags go through skew-aware transform selection.
    pub fn is_continuous(self) -> bool {
        matches!(self, Self::Quantitative | Self::Field)
    }

    /// Nominal and cyclic columns are labels only.
    pub fn has_ordering_scale(self) -> bool {
        self.is_discrete() || self.is_continuous()
    }
}

/// Column → tag mapping. Tags are fixed, never inferred from data.
pub const COLUMN_TYPES: &[(Column, DataTypeTag)] = &[
    (Column::Id, DataTypeTag::Nominal),
    (Column::Name, DataTypeTag::Nominal),
    (Column::YearPublished, DataTypeTag::Quantitative),
    (Column::MinPlayers, DataTypeTag::Ordinal),
    (Column::MaxPlayers, DataTypeTag::Ordinal),
    (Column::PlayTime, DataTypeTag::Quantitative),
    (Column::MinAge, DataTypeTag::Ordinal),
    (Column::UsersRated, DataTypeTag::Quantitative),
    (Column::RatingAverage, DataTypeTag::Quantitative),
    (Column::BggRank, DataTypeTag::Field),
    (Column::ComplexityAverage, DataTypeTag::Quantitative),
    (Column::OwnedUsers, DataTypeTag::Quantitative),
    (Column::Mechanics, DataTypeTag::Nominal),
    (Column::Domains, DataTypeTag::Categorical),
    (Column::PrimaryDomain, DataTypeTag::Categorical),
    (Column::Bin, DataTypeTag::Ordinal),
];

// Keyed by both label and alias
static COLUMN_LOOKUP: Lazy<HashMap<&'static str, (Column, DataTypeTag)>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(COLUMN_TYPES.len() * 2);
    for &(column, tag) in COLUMN_TYPES {
        map.insert(column.label(), (column, tag));
        map.insert(column.alias(), (column, tag));
    }
    map
});

/// Classify a column by raw label or alias.
pub fn classify(name: &str) -> Result<DataTypeTag> {
    COLUMN_LOOKUP
        .get(name)
        .map(|(_, tag)| *tag)
        .ok_or_else(|| StoryError::UnknownColumn(name.to_string()))
}

/// Check that every known column has exactly one entry in [`COLUMN_TYPES`].
pub fn validate_column_table() -> Result<()> {
    let missing: Vec<String> = Column::ALL
        .iter()
        .filter(|column| COLUMN_TYPES.iter().filter(|(c, _)| c == *column).count() != 1)
        .map(|column| column.label().to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(StoryError::IncompleteSchema(missing))
    }
}
