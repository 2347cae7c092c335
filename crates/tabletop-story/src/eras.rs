//! Derivation of the pre-binned era tables from the full game table.

use crate::error::{Result, StoryError};
use crate::grouping::ThresholdBins;
use crate::schema::Column;
use crate::utils::parse_decimal;
use polars::prelude::*;
use tracing::debug;

/// Columns an era table keeps, in output order.
pub const ERA_COLUMNS: [Column; 7] = [
    Column::Name,
    Column::YearPublished,
    Column::BggRank,
    Column::UsersRated,
    Column::OwnedUsers,
    Column::ComplexityAverage,
    Column::Mechanics,
];

const SORT_KEY: &str = "__year";

/// Keep games published before `cutoff` (year 0 marks an unknown year and is
/// dropped), sort them by year, project the era columns and attach a `Bin`
/// label from `thresholds`.
pub fn prepare_era(games: &DataFrame, cutoff: f64, thresholds: &[f64]) -> Result<DataFrame> {
    build_era(games, cutoff, thresholds)
        .map_err(|e| StoryError::EraPreparationFailed(e.to_string()))
}

fn build_era(games: &DataFrame, cutoff: f64, thresholds: &[f64]) -> anyhow::Result<DataFrame> {
    let years = year_values(games)?;

    let mask_values: Vec<bool> = years
        .iter()
        .map(|year| matches!(year, Some(y) if *y != 0.0 && *y < cutoff))
        .collect();
    let mask = BooleanChunked::from_slice("mask".into(), &mask_values);

    let kept_years: Vec<Option<f64>> = years
        .iter()
        .zip(&mask_values)
        .filter(|(_, keep)| **keep)
        .map(|(year, _)| *year)
        .collect();

    let bins = ThresholdBins::new(Column::YearPublished, thresholds);
    let labels: Vec<Option<String>> = kept_years
        .iter()
        .map(|year| year.and_then(|y| bins.label_for(y)))
        .collect();

    let present: Vec<&str> = ERA_COLUMNS
        .iter()
        .map(|column| column.label())
        .filter(|label| games.column(label).is_ok())
        .collect();

    let mut era = games.filter(&mask)?.select(present)?;
    era.with_column(Series::new(Column::Bin.label().into(), labels))?;
    era.with_column(Series::new(SORT_KEY.into(), kept_years))?;
    let era = era
        .sort([SORT_KEY], SortMultipleOptions::default().with_maintain_order(true))?
        .drop(SORT_KEY)?;

    debug!(
        "Prepared era below {}: {} of {} games",
        cutoff,
        era.height(),
        games.height()
    );
    Ok(era)
}

/// Numeric years of every row; text columns are parsed leniently.
fn year_values(games: &DataFrame) -> anyhow::Result<Vec<Option<f64>>> {
    let label = Column::YearPublished.label();
    let column = games
        .column(label)
        .or_else(|_| games.column(Column::YearPublished.alias()))
        .map_err(|_| StoryError::ColumnNotFound(label.to_string()))?;

    let text = column.as_materialized_series().cast(&DataType::String)?;
    let years = text
        .str()?
        .into_iter()
        .map(|value| {
            let year = parse_decimal(value.unwrap_or(""));
            (!year.is_nan()).then_some(year)
        })
        .collect();
    Ok(years)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn games() -> DataFrame {
        df!(
            "ID" => [1i64, 2, 3, 4, 5],
            "Name" => ["Chess", "Undated", "Senet", "Catan", "Backgammon"],
            "Year Published" => [1475i64, 0, -3500, 1995, 1630],
            "Users Rated" => [1000i64, 5, 300, 90000, 2000],
            "BGG Rank" => [300i64, 20000, 9000, 400, 8000],
        )
        .unwrap()
    }

    #[test]
    fn test_early_era_filters_sorts_and_bins() {
        let era = prepare_era(&games(), 1800.0, &[-3500.0, 0.0, 1500.0, 1800.0]).unwrap();

        let names = era.column("Name").unwrap().as_materialized_series().clone();
        let names: Vec<Option<&str>> = names.str().unwrap().into_iter().collect();
        assert_eq!(names, vec![Some("Senet"), Some("Chess"), Some("Backgammon")]);

        let bins = era.column("Bin").unwrap().as_materialized_series().clone();
        let bins: Vec<Option<&str>> = bins.str().unwrap().into_iter().collect();
        assert_eq!(
            bins,
            vec![Some("[-3500, 0)"), Some("[0, 1500)"), Some("[1500, 1800)")]
        );

        // Only era columns plus the bin survive
        assert!(era.column("ID").is_err());
        assert!(era.column("BGG Rank").is_ok());
        assert!(era.column(SORT_KEY).is_err());
        assert!(era.column("Users Rated").is_ok());
    }

    #[test]
    fn test_extended_era_keeps_more() {
        let era = prepare_era(&games(), 2000.0, &[-3500.0, 1900.0, 2000.0]).unwrap();
        assert_eq!(era.height(), 4);
    }

    #[test]
    fn test_missing_year_column() {
        let df = df!("Name" => ["Chess"]).unwrap();
        let err = prepare_era(&df, 1800.0, &[0.0]).unwrap_err();
        assert_eq!(err.error_code(), "ERA_PREPARATION_FAILED");
        assert!(err.to_string().contains("Year Published"));
    }
}
