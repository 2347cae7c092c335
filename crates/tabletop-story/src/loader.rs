//! Table loading.
//!
//! Tables come from a [`DataSource`] as polars frames and are turned into
//! [`RawRow`]s by column label or camel-case alias. [`DataStore`] loads the
//! three tables once and keeps their normalized rows together with the
//! domain vocabulary.

use crate::config::{DataFiles, StoryConfig};
use crate::eras::prepare_era;
use crate::error::{Result, ResultExt, StoryError};
use crate::normalizer::normalize_all;
use crate::schema::Column;
use crate::types::{NormalizedRow, RawRow};
use crate::utils::split_list;
use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::{debug, info};

/// The three tables of the story, in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    EarlyEra,
    ExtendedEra,
    Games,
}

impl Table {
    pub const LOAD_ORDER: [Table; 3] = [Table::EarlyEra, Table::ExtendedEra, Table::Games];
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EarlyEra => "early era",
            Self::ExtendedEra => "extended era",
            Self::Games => "games",
        };
        f.write_str(name)
    }
}

/// Provides the source tables.
pub trait DataSource {
    fn read_table(&self, table: Table) -> Result<DataFrame>;
}

/// Reads each table from its CSV file.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    files: DataFiles,
}

impl CsvDataSource {
    pub fn new(files: DataFiles) -> Self {
        Self { files }
    }

    /// Read a CSV file with every column as text.
    ///
    /// Schema inference is disabled; numeric parsing happens per cell during
    /// normalization, so one malformed value cannot fail the whole table.
    pub fn read_csv(&self, path: std::path::PathBuf) -> Result<DataFrame> {
        debug!("Reading {}", path.display());
        let context = format!("Reading {}", path.display());
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_parse_options(
                CsvParseOptions::default()
                    .with_separator(self.files.separator)
                    .with_quote_char(Some(b'"')),
            )
            .try_into_reader_with_file_path(Some(path))
            .and_then(|reader| reader.finish())
            .context(context)
    }
}

impl DataSource for CsvDataSource {
    fn read_table(&self, table: Table) -> Result<DataFrame> {
        let path = match table {
            Table::EarlyEra => self.files.early_era_path(),
            Table::ExtendedEra => self.files.extended_era_path(),
            Table::Games => self.files.games_path(),
        };
        self.read_csv(path)
    }
}

/// Reads only the full table from `inner` and derives both era tables from
/// it with the configured cutoffs and thresholds.
#[derive(Debug, Clone)]
pub struct DerivedEraSource<S> {
    inner: S,
    early: (f64, Vec<f64>),
    extended: (f64, Vec<f64>),
}

impl<S: DataSource> DerivedEraSource<S> {
    pub fn new(inner: S, config: &StoryConfig) -> Self {
        Self {
            inner,
            early: (config.early_era_cutoff, config.early_era_thresholds.clone()),
            extended: (
                config.extended_era_cutoff,
                config.extended_era_thresholds.clone(),
            ),
        }
    }
}

impl<S: DataSource> DataSource for DerivedEraSource<S> {
    fn read_table(&self, table: Table) -> Result<DataFrame> {
        let games = self.inner.read_table(Table::Games)?;
        match table {
            Table::EarlyEra => prepare_era(&games, self.early.0, &self.early.1),
            Table::ExtendedEra => prepare_era(&games, self.extended.0, &self.extended.1),
            Table::Games => Ok(games),
        }
    }
}

/// Convert a frame into raw rows.
///
/// Each known column is looked up by label, then by alias, and cast to
/// strings. Columns the frame lacks load as empty strings; nulls become empty
/// strings as well.
pub fn rows_from_frame(df: &DataFrame) -> Result<Vec<RawRow>> {
    let mut rows = vec![RawRow::default(); df.height()];

    for column in Column::ALL {
        let Some(source) = df
            .column(column.label())
            .or_else(|_| df.column(column.alias()))
            .ok()
        else {
            continue;
        };

        let series = source
            .as_materialized_series()
            .cast(&DataType::String)
            .context(format!("Casting '{}' to text", column.label()))?;
        let values = series.str()?;

        for (row, value) in rows.iter_mut().zip(values.into_iter()) {
            row.set(column, value.unwrap_or("").to_string());
        }
    }

    Ok(rows)
}

/// Sorted distinct entries of every row's domains list.
pub fn domain_vocabulary(rows: &[NormalizedRow]) -> Vec<String> {
    let set: BTreeSet<&str> = rows
        .iter()
        .filter_map(|row| row.raw.domains.as_deref())
        .flat_map(split_list)
        .collect();
    set.into_iter().map(str::to_string).collect()
}

/// Normalized tables ready for rendering.
#[derive(Debug, Clone, Default)]
pub struct StoryData {
    pub early_era: Vec<NormalizedRow>,
    pub extended_era: Vec<NormalizedRow>,
    pub games: Vec<NormalizedRow>,
    /// Sorted distinct domains of the full table.
    pub domain_vocabulary: Vec<String>,
}

impl StoryData {
    /// Build from raw tables, in load order.
    ///
    /// Era rows without a rank of their own take it from the game of the
    /// same name in the full table.
    pub fn from_raw(early_era: &[RawRow], extended_era: &[RawRow], games: &[RawRow]) -> Self {
        let games = normalize_all(games);
        let domain_vocabulary = domain_vocabulary(&games);
        let mut early_era = normalize_all(early_era);
        let mut extended_era = normalize_all(extended_era);
        fill_ranks(&mut early_era, &games);
        fill_ranks(&mut extended_era, &games);
        Self {
            early_era,
            extended_era,
            games,
            domain_vocabulary,
        }
    }
}

/// Copy `BGG Rank` from `games` into era rows whose rank is missing.
///
/// The first game with a given name wins.
fn fill_ranks(era: &mut [NormalizedRow], games: &[NormalizedRow]) {
    let mut ranks: HashMap<&str, f64> = HashMap::new();
    for game in games.iter().filter(|g| !g.bgg_rank.is_nan()) {
        ranks.entry(game.raw.name.as_str()).or_insert(game.bgg_rank);
    }

    let mut filled = 0usize;
    for row in era.iter_mut().filter(|row| row.bgg_rank.is_nan()) {
        if let Some(rank) = ranks.get(row.raw.name.as_str()) {
            row.bgg_rank = *rank;
            filled += 1;
        }
    }
    debug!("Filled {} of {} era ranks from the games table", filled, era.len());
}

/// Loads the tables at most once.
#[derive(Debug, Default)]
pub struct DataStore {
    triggered: bool,
    data: Option<StoryData>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read all three tables in order. Returns `Ok(false)` without touching
    /// the source when a load was already triggered.
    ///
    /// A failed load still counts as triggered; there is no retry.
    pub fn load(&mut self, source: &dyn DataSource) -> Result<bool> {
        if self.triggered {
            debug!("Data load already triggered, skipping");
            return Ok(false);
        }
        self.triggered = true;

        let mut tables = Vec::with_capacity(Table::LOAD_ORDER.len());
        for table in Table::LOAD_ORDER {
            let df = source.read_table(table)?;
            let rows = rows_from_frame(&df).context(format!("Loading {table} table"))?;
            info!("Loaded {} table: {} rows", table, rows.len());
            tables.push(rows);
        }

        let data = StoryData::from_raw(&tables[0], &tables[1], &tables[2]);
        info!("Domain vocabulary: {} domains", data.domain_vocabulary.len());
        self.data = Some(data);
        Ok(true)
    }

    /// Install already-built data, marking the load as done.
    pub fn insert(&mut self, data: StoryData) {
        self.triggered = true;
        self.data = Some(data);
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    pub fn data(&self) -> Result<&StoryData> {
        self.data.as_ref().ok_or(StoryError::DataNotLoaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingSource {
        reads: Cell<usize>,
    }

    impl DataSource for CountingSource {
        fn read_table(&self, table: Table) -> Result<DataFrame> {
            self.reads.set(self.reads.get() + 1);
            let df = match table {
                Table::Games => df!(
                    "ID" => [1i64, 2, 3],
                    "Name" => ["Chess", "Go", "Catan"],
                    "Year Published" => [1475i64, -2200, 1995],
                    "Domains" => [Some("Strategy Games, Abstract Games"), Some("Abstract Games"), None],
                )?,
                _ => df!(
                    "Name" => ["Senet"],
                    "yearPublished" => [-3500i64],
                    "Bin" => ["[-3500, -2000)"],
                )?,
            };
            Ok(df)
        }
    }

    #[test]
    fn test_rows_from_frame_by_label_and_alias() {
        let df = df!(
            "Name" => ["Senet"],
            "yearPublished" => [-3500i64],
            "Rating Average" => [7.25f64],
        )
        .unwrap();
        let rows = rows_from_frame(&df).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Senet");
        assert_eq!(rows[0].year_published, "-3500");
        assert_eq!(rows[0].rating_average, "7.25");
        // Missing columns load empty
        assert_eq!(rows[0].min_players, "");
        assert_eq!(rows[0].domains, None);
    }

    #[test]
    fn test_load_once() {
        let source = CountingSource {
            reads: Cell::new(0),
        };
        let mut store = DataStore::new();
        assert!(matches!(store.data(), Err(StoryError::DataNotLoaded)));

        assert!(store.load(&source).unwrap());
        assert_eq!(source.reads.get(), 3);

        assert!(!store.load(&source).unwrap());
        assert_eq!(source.reads.get(), 3);

        let data = store.data().unwrap();
        assert_eq!(data.games.len(), 3);
        assert_eq!(data.early_era[0].year_published, -3500.0);
        assert_eq!(data.games[0].primary_domain, "Strategy Games");
        assert_eq!(data.games[2].raw.domains.as_deref(), Some(""));
    }

    #[test]
    fn test_domain_vocabulary_is_sorted_and_distinct() {
        let source = CountingSource {
            reads: Cell::new(0),
        };
        let mut store = DataStore::new();
        store.load(&source).unwrap();
        assert_eq!(
            store.data().unwrap().domain_vocabulary,
            vec!["Abstract Games".to_string(), "Strategy Games".to_string()]
        );
    }

    #[test]
    fn test_era_rows_take_rank_from_games() {
        let games = df!(
            "Name" => ["Senet", "Go", "Chess"],
            "Year Published" => ["-3500", "-2200", "1475"],
            "BGG Rank" => ["9000", "300", ""],
        )
        .unwrap();
        let era = df!(
            "Name" => ["Senet", "Go", "Chess", "Mancala"],
            "Year Published" => ["-3500", "-2200", "1475", "700"],
        )
        .unwrap();
        let games = rows_from_frame(&games).unwrap();
        let era = rows_from_frame(&era).unwrap();

        let data = StoryData::from_raw(&era, &era, &games);
        let ranks: Vec<f64> = data.early_era.iter().map(|r| r.bgg_rank).collect();
        assert_eq!(ranks[0], 9000.0);
        assert_eq!(ranks[1], 300.0);
        // Unranked or unknown games stay missing
        assert!(ranks[2].is_nan());
        assert!(ranks[3].is_nan());
    }

    #[test]
    fn test_derived_era_source() {
        let inner = CountingSource {
            reads: Cell::new(0),
        };
        let source = DerivedEraSource::new(inner, &StoryConfig::default());
        let early = rows_from_frame(&source.read_table(Table::EarlyEra).unwrap()).unwrap();
        let names: Vec<&str> = early.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Go", "Chess"]);
        assert_eq!(early[0].bin.as_deref(), Some("[-3500, -2000)"));
    }
}
