//! Raw table → typed, filtered, tagged rows.
//!
//! Rows whose year, life expectancy or health expenditure cannot be read as a
//! number are dropped without complaint, as are rows outside the year range.

use crate::models::{Category, RawTable, Record, TaggedRecord, YearRange};
use crate::regions::RegionTable;
use crate::resolve::ResolvedSchema;
use crate::storage::POSITIONAL_COLUMNS;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Schema for tables renamed with [`crate::storage::rename_positional`].
pub fn positional_schema() -> ResolvedSchema {
    let [country, _code, year, life_exp, health_exp, population, region] = POSITIONAL_COLUMNS;
    ResolvedSchema {
        entity: country.into(),
        year: year.into(),
        life_exp: life_exp.into(),
        health_exp: health_exp.into(),
        population: Some(population.into()),
        region: Some(region.into()),
    }
}

/// Lenient numeric coercion: anything unparseable or non-finite is missing.
pub fn coerce_number(cell: &str) -> Option<f64> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn coerce_year(cell: &str) -> Option<i32> {
    let s = cell.trim();
    s.parse::<i32>()
        .ok()
        .or_else(|| coerce_number(s).filter(|v| v.fract() == 0.0).map(|v| v as i32))
}

/// Column indexes for the resolved roles.
struct Columns {
    entity: usize,
    year: usize,
    life_exp: usize,
    health_exp: usize,
    population: Option<usize>,
    region: Option<usize>,
}

impl Columns {
    fn locate(table: &RawTable, schema: &ResolvedSchema) -> Option<Self> {
        Some(Self {
            entity: table.column_index(&schema.entity)?,
            year: table.column_index(&schema.year)?,
            life_exp: table.column_index(&schema.life_exp)?,
            health_exp: table.column_index(&schema.health_exp)?,
            population: schema.population.as_deref().and_then(|h| table.column_index(h)),
            region: schema.region.as_deref().and_then(|h| table.column_index(h)),
        })
    }
}

fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(|s| s.as_str()).unwrap_or("")
}

/// Rename, coerce, filter by year, drop incomplete rows, attach regions.
///
/// The region of a country is the first non-empty region cell among *all* of its
/// rows (including rows later filtered out), then the lookup table, then the
/// table's patch list.
pub fn normalize(
    table: &RawTable,
    schema: &ResolvedSchema,
    years: YearRange,
    regions: &RegionTable,
) -> Vec<Record> {
    let Some(cols) = Columns::locate(table, schema) else {
        return Vec::new();
    };

    let mut given_region: HashMap<&str, &str> = HashMap::new();
    if let Some(rc) = cols.region {
        for row in &table.rows {
            let r = cell(row, rc).trim();
            if !r.is_empty() {
                given_region.entry(cell(row, cols.entity)).or_insert(r);
            }
        }
    }

    let mut region_of: HashMap<&str, Option<String>> = HashMap::new();
    let mut out = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let country = cell(row, cols.entity);
        let Some(year) = coerce_year(cell(row, cols.year)) else {
            continue;
        };
        if !years.contains(year) {
            continue;
        }
        let (Some(life_exp), Some(health_exp)) = (
            coerce_number(cell(row, cols.life_exp)),
            coerce_number(cell(row, cols.health_exp)),
        ) else {
            continue;
        };
        let region = region_of
            .entry(country)
            .or_insert_with(|| regions.assign(country, given_region.get(country).copied()))
            .clone();
        out.push(Record {
            country: country.to_string(),
            year,
            life_exp,
            health_exp,
            population: cols.population.and_then(|c| coerce_number(cell(row, c))),
            region,
        });
    }
    debug!(
        "normalized {} of {} rows ({} dropped)",
        out.len(),
        table.rows.len(),
        table.rows.len() - out.len()
    );
    out
}

/// One entry of the tag precedence list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TagRule {
    /// Exactly this country.
    Entity { name: String, category: Category },
    /// Any country in the set.
    Members {
        names: BTreeSet<String>,
        category: Category,
    },
}

impl TagRule {
    fn category_for(&self, country: &str) -> Option<Category> {
        match self {
            TagRule::Entity { name, category } => (name == country).then_some(*category),
            TagRule::Members { names, category } => names.contains(country).then_some(*category),
        }
    }
}

/// Ordered tag rules; the first matching rule wins and unmatched countries are `Rest`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagRules {
    pub rules: Vec<TagRule>,
}

impl TagRules {
    pub fn new(rules: Vec<TagRule>) -> Self {
        Self { rules }
    }

    /// Focus entity first, then the named key list.
    pub fn focus_then_key(focus: Option<&str>, key: &[String]) -> Self {
        let mut rules = Vec::new();
        if let Some(name) = focus {
            rules.push(TagRule::Entity {
                name: name.to_string(),
                category: Category::Focus,
            });
        }
        rules.push(TagRule::Members {
            names: key.iter().cloned().collect(),
            category: Category::Highlighted,
        });
        Self { rules }
    }

    /// Computed selections: highlighted-by-change first, then top-N.
    pub fn highlighted_then_top<I, J>(highlighted: I, top: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        Self {
            rules: vec![
                TagRule::Members {
                    names: highlighted.into_iter().collect(),
                    category: Category::Highlighted,
                },
                TagRule::Members {
                    names: top.into_iter().collect(),
                    category: Category::TopN,
                },
            ],
        }
    }

    pub fn classify(&self, country: &str) -> Category {
        self.rules
            .iter()
            .find_map(|r| r.category_for(country))
            .unwrap_or(Category::Rest)
    }

    /// Attach the country's category to every row.
    pub fn tag(&self, records: Vec<Record>) -> Vec<TaggedRecord> {
        let mut cache: HashMap<String, Category> = HashMap::new();
        records
            .into_iter()
            .map(|record| {
                let category = *cache
                    .entry(record.country.clone())
                    .or_insert_with(|| self.classify(&record.country));
                TaggedRecord { record, category }
            })
            .collect()
    }
}
