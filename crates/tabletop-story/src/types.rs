use crate::schema::Column;
use serde::{Deserialize, Serialize};

/// One game as sourced: every field is the raw string from the table.
///
/// Missing columns load as empty strings. The pre-binned era tables only
/// carry a subset of the columns plus `Bin`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Year Published")]
    pub year_published: String,
    #[serde(rename = "Min Players")]
    pub min_players: String,
    #[serde(rename = "Max Players")]
    pub max_players: String,
    #[serde(rename = "Play Time")]
    pub play_time: String,
    #[serde(rename = "Min Age")]
    pub min_age: String,
    #[serde(rename = "Users Rated")]
    pub users_rated: String,
    #[serde(rename = "Rating Average")]
    pub rating_average: String,
    #[serde(rename = "BGG Rank")]
    pub bgg_rank: String,
    #[serde(rename = "Complexity Average")]
    pub complexity_average: String,
    #[serde(rename = "Owned Users")]
    pub owned_users: String,
    #[serde(rename = "Mechanics")]
    pub mechanics: String,
    /// `None` when the source table has no domains column at all.
    #[serde(rename = "Domains")]
    pub domains: Option<String>,
    #[serde(rename = "Bin")]
    pub bin: Option<String>,
}

impl RawRow {
    /// Raw string for a column, if the row carries one.
    pub fn get(&self, column: Column) -> Option<&str> {
        let value = match column {
            Column::Id => &self.id,
            Column::Name => &self.name,
            Column::YearPublished => &self.year_published,
            Column::MinPlayers => &self.min_players,
            Column::MaxPlayers => &self.max_players,
            Column::PlayTime => &self.play_time,
            Column::MinAge => &self.min_age,
            Column::UsersRated => &self.users_rated,
            Column::RatingAverage => &self.rating_average,
            Column::BggRank => &self.bgg_rank,
            Column::ComplexityAverage => &self.complexity_average,
            Column::OwnedUsers => &self.owned_users,
            Column::Mechanics => &self.mechanics,
            Column::Domains => return self.domains.as_deref(),
            Column::Bin => return self.bin.as_deref(),
            Column::PrimaryDomain => return None,
        };
        Some(value.as_str())
    }

    /// Set a column from a loaded table cell.
    pub fn set(&mut self, column: Column, value: String) {
        match column {
            Column::Id => self.id = value,
            Column::Name => self.name = value,
            Column::YearPublished => self.year_published = value,
            Column::MinPlayers => self.min_players = value,
            Column::MaxPlayers => self.max_players = value,
            Column::PlayTime => self.play_time = value,
            Column::MinAge => self.min_age = value,
            Column::UsersRated => self.users_rated = value,
            Column::RatingAverage => self.rating_average = value,
            Column::BggRank => self.bgg_rank = value,
            Column::ComplexityAverage => self.complexity_average = value,
            Column::OwnedUsers => self.owned_users = value,
            Column::Mechanics => self.mechanics = value,
            Column::Domains => self.domains = Some(value),
            Column::Bin => self.bin = Some(value),
            Column::PrimaryDomain => {}
        }
    }
}

/// A raw row extended with parsed numeric fields.
///
/// Unparseable numbers are `f64::NAN` and mean "no value" everywhere
/// downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRow {
    pub raw: RawRow,
    pub id: f64,
    pub year_published: f64,
    pub min_players: f64,
    pub max_players: f64,
    pub play_time: f64,
    pub min_age: f64,
    pub users_rated: f64,
    pub rating_average: f64,
    pub bgg_rank: f64,
    pub complexity_average: f64,
    pub owned_users: f64,
    pub primary_domain: String,
}

/// A single cell as seen by scales and key functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
}

impl FieldValue<'_> {
    /// Numeric view; text and NaN yield `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    /// Key used for discrete domains. `None` for NaN and empty text.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Self::Number(v) if v.is_nan() => None,
            Self::Number(v) => Some(crate::utils::format_number(*v)),
            Self::Text(s) if s.is_empty() => None,
            Self::Text(s) => Some((*s).to_string()),
        }
    }
}

impl NormalizedRow {
    /// Numeric value of a column; NaN for text columns or parse failures.
    pub fn number(&self, column: Column) -> f64 {
        match column {
            Column::Id => self.id,
            Column::YearPublished => self.year_published,
            Column::MinPlayers => self.min_players,
            Column::MaxPlayers => self.max_players,
            Column::PlayTime => self.play_time,
            Column::MinAge => self.min_age,
            Column::UsersRated => self.users_rated,
            Column::RatingAverage => self.rating_average,
            Column::BggRank => self.bgg_rank,
            Column::ComplexityAverage => self.complexity_average,
            Column::OwnedUsers => self.owned_users,
            _ => f64::NAN,
        }
    }

    /// Typed view of any column.
    pub fn value(&self, column: Column) -> FieldValue<'_> {
        if column.is_numeric() {
            return FieldValue::Number(self.number(column));
        }
        match column {
            Column::PrimaryDomain => FieldValue::Text(&self.primary_domain),
            other => FieldValue::Text(self.raw.get(other).unwrap_or("")),
        }
    }
}

/// A group of rows sharing one key.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRecord<'a> {
    /// Join identity across re-renders.
    pub key: String,
    pub count: usize,
    /// Grouping dimension values (composite keys only).
    pub dimensions: Vec<(Column, f64)>,
    /// Member with the lowest rank; first occurrence wins ties.
    pub representative: &'a NormalizedRow,
    /// Position of the representative in the grouped input.
    pub representative_index: usize,
}

impl AggregateRecord<'_> {
    /// Value of a grouping dimension, NaN when absent.
    pub fn dimension(&self, column: Column) -> f64 {
        self.dimensions
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| *v)
            .unwrap_or(f64::NAN)
    }
}
