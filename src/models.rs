use serde::{Deserialize, Serialize};
use std::fmt;

/// Which chart is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Replication of the published single-panel graphic.
    Base,
    /// Improved chart, faceted by region.
    Regional,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Base => write!(f, "base"),
            Variant::Regional => write!(f, "regional"),
        }
    }
}

/// Inclusive year bounds. `end: None` leaves the upper side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: Option<i32>,
}

impl YearRange {
    pub fn from(start: i32) -> Self {
        Self { start, end: None }
    }

    pub fn between(start: i32, end: i32) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && self.end.is_none_or(|e| year <= e)
    }
}

/// Untyped table as read from the source file: one header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}

/// One (country, year) observation that survived normalization.
///
/// `life_exp` and `health_exp` are always finite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub country: String,
    pub year: i32,
    pub life_exp: f64,
    pub health_exp: f64,
    pub population: Option<f64>,
    pub region: Option<String>,
}

/// Rendering classification of a country, in precedence order.
///
/// The derived `Ord` follows declaration order, so a smaller value wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// The single country the chart is about (the United States in the published graphic).
    Focus,
    /// Named key countries, or the per-region largest spending change.
    Highlighted,
    /// Per-region top countries by mean life expectancy.
    TopN,
    Rest,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Focus,
        Category::Highlighted,
        Category::TopN,
        Category::Rest,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Focus => "focus",
            Category::Highlighted => "highlighted",
            Category::TopN => "top_n",
            Category::Rest => "rest",
        };
        f.write_str(s)
    }
}

/// A normalized record with its country's category attached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaggedRecord {
    #[serde(flatten)]
    pub record: Record,
    pub category: Category,
}

/// Explicit label position for one country, used verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManualLabel {
    pub country: String,
    pub x: f64,
    pub y: f64,
}

/// Final on-chart text label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelEntry {
    pub country: String,
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub category: Category,
    pub region: Option<String>,
}
