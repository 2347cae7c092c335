//! Per-step frame construction: grouped records and selected scales turned
//! into keyed marks, axes and legend entries.

use super::reconcile::Keyed;
use crate::config::StoryConfig;
use crate::grouping::{CompositeKey, FixedBin, KeyFn, ThresholdBins, display_label, group};
use crate::loader::StoryData;
use crate::navigation::{ChartKind, ExplorerSelection, Step};
use crate::scale::{
    CATEGORY10, ColorScale, ContinuousScale, DiscreteScale, NEUTRAL_FILL, Scale, ScaleSelector,
};
use crate::schema::Column;
use crate::types::{AggregateRecord, NormalizedRow};
use crate::utils::format_number;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fill of histogram bars.
pub const BAR_FILL: &str = CATEGORY10[0];

const BUBBLE_OPACITY: f64 = 0.7;
const POINT_OPACITY: f64 = 0.8;
const CONTINUOUS_TICKS: usize = 5;

/// Drawable attributes of one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualAttrs {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub fill: String,
    pub opacity: f64,
}

impl VisualAttrs {
    /// Collapsed state an element enters from and exits to: bars shrink onto
    /// the baseline, points shrink to nothing in place.
    pub fn neutral(&self, layer: ChartKind, baseline: f64) -> VisualAttrs {
        match layer {
            ChartKind::Histogram => VisualAttrs {
                y: baseline,
                height: 0.0,
                ..self.clone()
            },
            ChartKind::Scatter => VisualAttrs {
                radius: 0.0,
                opacity: 0.0,
                ..self.clone()
            },
        }
    }
}

/// Hover content of a mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub title: String,
    pub details: Vec<(String, String)>,
}

/// A keyed visual element with its target attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub key: String,
    pub layer: ChartKind,
    pub attrs: VisualAttrs,
    pub tooltip: Tooltip,
}

impl Keyed for Mark {
    fn key(&self) -> &str {
        &self.key
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub caption: String,
    /// Scale kind name, e.g. `"log"` or `"band"`.
    pub scale: String,
    pub ticks: Vec<Tick>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub fill: String,
}

/// Everything one render pass draws for a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub step: Step,
    pub layer: ChartKind,
    pub marks: Vec<Mark>,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub legend: Vec<LegendEntry>,
    /// Vertical coordinate of the zero line.
    pub baseline: f64,
}

/// Builds frames from loaded data under one configuration.
#[derive(Debug, Clone)]
pub struct FrameBuilder<'a> {
    config: &'a StoryConfig,
    selector: ScaleSelector,
}

impl<'a> FrameBuilder<'a> {
    pub fn new(config: &'a StoryConfig) -> Self {
        Self {
            config,
            selector: ScaleSelector::new(config.small_range_threshold),
        }
    }

    pub fn build(&self, step: Step, data: &StoryData, selection: &ExplorerSelection) -> Frame {
        let frame = match step {
            Step::EarlyEra => {
                self.histogram(step, &data.early_era, &self.config.early_era_thresholds)
            }
            Step::ExtendedEra => {
                self.histogram(step, &data.extended_era, &self.config.extended_era_thresholds)
            }
            Step::Bubbles => self.bubbles(&data.games, &data.domain_vocabulary),
            Step::Explorer => self.explorer(&data.games, selection, &data.domain_vocabulary),
        };
        debug!("Built frame for {} with {} marks", step, frame.marks.len());
        frame
    }

    fn baseline(&self) -> f64 {
        self.config.y_range()[0]
    }

    /// Bars of game counts per era bin. Rows without a precomputed label are
    /// binned by year with the era thresholds.
    pub fn histogram(&self, step: Step, rows: &[NormalizedRow], thresholds: &[f64]) -> Frame {
        let by_year = ThresholdBins::new(Column::YearPublished, thresholds);
        let key_fn = |row: &NormalizedRow| FixedBin.key(row).or_else(|| by_year.key(row));
        let records = group(rows, &key_fn);

        let labels: Vec<String> = records.iter().map(|r| r.key.clone()).collect();
        let x = DiscreteScale::band(labels, self.config.x_range(), self.config.band_padding);
        let max_count = records.iter().map(|r| r.count).max().unwrap_or(0);
        let y = ContinuousScale::linear([0.0, max_count as f64], self.config.y_range());
        let baseline = self.baseline();
        let bandwidth = x.bandwidth();

        let marks = records
            .iter()
            .filter_map(|record| {
                let left = x.map(&record.key)?;
                let top = y.map(record.count as f64)?;
                Some(Mark {
                    key: record.key.clone(),
                    layer: ChartKind::Histogram,
                    attrs: VisualAttrs {
                        x: left,
                        y: top,
                        width: bandwidth,
                        height: baseline - top,
                        radius: 0.0,
                        fill: BAR_FILL.to_string(),
                        opacity: 1.0,
                    },
                    tooltip: bin_tooltip(record),
                })
            })
            .collect();

        let x_ticks = x
            .domain
            .iter()
            .filter_map(|label| {
                Some(Tick {
                    position: x.map(label)? + bandwidth / 2.0,
                    label: display_label(label),
                })
            })
            .collect();

        Frame {
            step,
            layer: ChartKind::Histogram,
            marks,
            x_axis: AxisSpec {
                caption: Column::YearPublished.label().to_string(),
                scale: "band".to_string(),
                ticks: x_ticks,
            },
            y_axis: AxisSpec {
                caption: "Games".to_string(),
                scale: "linear".to_string(),
                ticks: continuous_ticks(&y),
            },
            legend: Vec::new(),
            baseline,
        }
    }

    /// One bubble per (year, min players, max players) group of dated games.
    pub fn bubbles(&self, rows: &[NormalizedRow], domain_vocabulary: &[String]) -> Frame {
        let key = CompositeKey::new([Column::YearPublished, Column::MinPlayers, Column::MaxPlayers]);
        let records = group(rows, &Dated(&key));

        let years: Vec<f64> = records.iter().map(|r| r.dimension(Column::YearPublished)).collect();
        let popularity: Vec<f64> = records.iter().map(|r| r.representative.users_rated).collect();
        let counts: Vec<f64> = records.iter().map(|r| r.count as f64).collect();

        let x = self.selector.continuous(&years, self.config.x_range());
        let y = self.selector.continuous(&popularity, self.config.y_range());
        let size = self.selector.size(&counts, self.config.bubble_radius);
        let color = ColorScale::for_column(
            &self.selector,
            rows,
            Column::PrimaryDomain,
            domain_vocabulary,
        );

        let marks = records
            .iter()
            .filter_map(|record| {
                let rep = record.representative;
                Some(Mark {
                    key: record.key.clone(),
                    layer: ChartKind::Scatter,
                    attrs: VisualAttrs {
                        x: x.map(record.dimension(Column::YearPublished))?,
                        y: y.map(rep.users_rated)?,
                        width: 0.0,
                        height: 0.0,
                        radius: size.map(record.count as f64)?,
                        fill: color
                            .color(rep.value(Column::PrimaryDomain))
                            .unwrap_or_else(|| NEUTRAL_FILL.to_string()),
                        opacity: BUBBLE_OPACITY,
                    },
                    tooltip: bubble_tooltip(record),
                })
            })
            .collect();

        Frame {
            step: Step::Bubbles,
            layer: ChartKind::Scatter,
            marks,
            x_axis: AxisSpec {
                caption: Column::YearPublished.label().to_string(),
                scale: x.kind.name().to_string(),
                ticks: continuous_ticks(&x),
            },
            y_axis: AxisSpec {
                caption: Column::UsersRated.label().to_string(),
                scale: y.kind.name().to_string(),
                ticks: continuous_ticks(&y),
            },
            legend: legend(&color),
            baseline: self.baseline(),
        }
    }

    /// One point per game, keyed by its identifier, on the selected columns.
    pub fn explorer(
        &self,
        rows: &[NormalizedRow],
        selection: &ExplorerSelection,
        domain_vocabulary: &[String],
    ) -> Frame {
        let x_range = self.config.x_range();
        let y_range = self.config.y_range();
        let x = self.selector.select(rows, selection.x, selection.x.tag(), x_range);
        let y = self.selector.select(rows, selection.y, selection.y.tag(), y_range);
        let color = ColorScale::for_column(&self.selector, rows, selection.color, domain_vocabulary);

        let marks = rows
            .iter()
            .filter_map(|row| {
                let key = row.raw.id.trim();
                if key.is_empty() {
                    return None;
                }
                Some(Mark {
                    key: key.to_string(),
                    layer: ChartKind::Scatter,
                    attrs: VisualAttrs {
                        x: x.map(row.value(selection.x))?,
                        y: y.map(row.value(selection.y))?,
                        width: 0.0,
                        height: 0.0,
                        radius: self.config.point_radius,
                        fill: color
                            .color(row.value(selection.color))
                            .unwrap_or_else(|| NEUTRAL_FILL.to_string()),
                        opacity: POINT_OPACITY,
                    },
                    tooltip: point_tooltip(row, selection),
                })
            })
            .collect();

        Frame {
            step: Step::Explorer,
            layer: ChartKind::Scatter,
            marks,
            x_axis: axis(selection.x, &x),
            y_axis: axis(selection.y, &y),
            legend: legend(&color),
            baseline: self.baseline(),
        }
    }
}

/// Composite key restricted to games with a known, non-zero year.
struct Dated<'k>(&'k CompositeKey);

impl KeyFn for Dated<'_> {
    fn key(&self, row: &NormalizedRow) -> Option<String> {
        let year = row.year_published;
        if year.is_nan() || year == 0.0 {
            return None;
        }
        self.0.key(row)
    }

    fn dimensions(&self, row: &NormalizedRow) -> Vec<(Column, f64)> {
        self.0.dimensions(row)
    }
}

fn axis(column: Column, scale: &Scale) -> AxisSpec {
    let ticks = match scale {
        Scale::Continuous(continuous) => continuous_ticks(continuous),
        Scale::Discrete(discrete) => discrete
            .domain
            .iter()
            .filter_map(|value| {
                Some(Tick {
                    position: discrete.map(value)? + discrete.bandwidth() / 2.0,
                    label: value.clone(),
                })
            })
            .collect(),
        Scale::Identity => Vec::new(),
    };
    AxisSpec {
        caption: column.label().to_string(),
        scale: scale.kind_name().to_string(),
        ticks,
    }
}

/// Evenly spaced ticks across the domain, one tick for a degenerate domain.
fn continuous_ticks(scale: &ContinuousScale) -> Vec<Tick> {
    let [d0, d1] = scale.domain;
    let values: Vec<f64> = if d0 == d1 {
        vec![d0]
    } else {
        (0..CONTINUOUS_TICKS)
            .map(|i| d0 + (d1 - d0) * i as f64 / (CONTINUOUS_TICKS - 1) as f64)
            .collect()
    };
    values
        .into_iter()
        .filter_map(|v| {
            Some(Tick {
                position: scale.map(v)?,
                label: format_tick(v),
            })
        })
        .collect()
}

fn format_tick(v: f64) -> String {
    format_number((v * 100.0).round() / 100.0)
}

fn legend(color: &ColorScale) -> Vec<LegendEntry> {
    color
        .legend()
        .into_iter()
        .map(|(label, fill)| LegendEntry { label, fill })
        .collect()
}

fn text_or_blank(value: Option<String>) -> String {
    value.unwrap_or_else(|| "n/a".to_string())
}

fn bin_tooltip(record: &AggregateRecord<'_>) -> Tooltip {
    let rep = record.representative;
    // Without a rank the representative is only the first game of the bin
    let caption = if rep.bgg_rank.is_nan() { "Example" } else { "Top ranked" };
    Tooltip {
        title: display_label(&record.key),
        details: vec![
            ("Games".to_string(), record.count.to_string()),
            (caption.to_string(), rep.raw.name.clone()),
        ],
    }
}

fn bubble_tooltip(record: &AggregateRecord<'_>) -> Tooltip {
    let rep = record.representative;
    let players = format!(
        "{} - {}",
        format_number(record.dimension(Column::MinPlayers)),
        format_number(record.dimension(Column::MaxPlayers))
    );
    Tooltip {
        title: rep.raw.name.clone(),
        details: vec![
            (
                Column::YearPublished.label().to_string(),
                format_number(record.dimension(Column::YearPublished)),
            ),
            ("Players".to_string(), players),
            ("Games".to_string(), record.count.to_string()),
            (
                Column::UsersRated.label().to_string(),
                text_or_blank(rep.value(Column::UsersRated).as_key()),
            ),
        ],
    }
}

fn point_tooltip(row: &NormalizedRow, selection: &ExplorerSelection) -> Tooltip {
    let mut columns: Vec<Column> = Vec::with_capacity(3);
    for column in [selection.x, selection.y, selection.color] {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    Tooltip {
        title: row.raw.name.clone(),
        details: columns
            .into_iter()
            .map(|column| {
                (
                    column.label().to_string(),
                    text_or_blank(row.value(column).as_key()),
                )
            })
            .collect(),
    }
}
