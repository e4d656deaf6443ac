//! End-to-end data preparation for both chart variants.
//!
//! raw table → resolved columns → normalized, tagged rows → aggregates → labels.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::labels::LabelPlan;
use crate::models::{LabelEntry, RawTable, TaggedRecord, Variant};
use crate::normalize::{TagRules, normalize, positional_schema};
use crate::regions::RegionTable;
use crate::resolve::resolve_schema;
use crate::stats::{
    CountrySummary, Grouping, country_summaries, largest_health_exp_change, selected_countries,
    top_n_by_mean_life_exp,
};
use crate::storage::{load_csv, rename_positional};
use log::debug;
use std::path::Path;

/// Everything the chart composer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Prepared {
    pub variant: Variant,
    pub rows: Vec<TaggedRecord>,
    pub summaries: Vec<CountrySummary>,
    pub labels: Vec<LabelEntry>,
}

/// Load `path` and run [`prepare`].
pub fn load_and_prepare<P: AsRef<Path>>(
    path: P,
    cfg: &PipelineConfig,
) -> Result<Prepared, PipelineError> {
    let table = load_csv(path)?;
    debug!("read {} rows, {} columns", table.rows.len(), table.headers.len());
    prepare(table, cfg)
}

pub fn prepare(table: RawTable, cfg: &PipelineConfig) -> Result<Prepared, PipelineError> {
    cfg.validate()?;
    let regions = RegionTable::new(cfg.region_patches.clone()).with_entries(
        cfg.extra_regions
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );

    let (records, rules) = match cfg.variant {
        Variant::Base => {
            let schema = resolve_schema(&table.headers)?;
            let records = normalize(&table, &schema, cfg.years, &regions);
            let rules = TagRules::focus_then_key(cfg.focus.as_deref(), &cfg.key_countries);
            (records, rules)
        }
        Variant::Regional => {
            let table = rename_positional(table)?;
            let records = normalize(&table, &positional_schema(), cfg.years, &regions);
            let summaries = country_summaries(&records);
            let top = top_n_by_mean_life_exp(&summaries, cfg.top_n, Grouping::Region);
            let changed = largest_health_exp_change(&summaries, Grouping::Region);
            let rules = TagRules::highlighted_then_top(
                selected_countries(&changed),
                selected_countries(&top),
            );
            (records, rules)
        }
    };
    if records.is_empty() {
        return Err(PipelineError::EmptyTable);
    }

    let summaries = country_summaries(&records);
    let rows = rules.tag(records);
    let labels = LabelPlan::from_config(cfg).place(&rows);
    debug!(
        "{} variant: {} rows, {} countries, {} labels",
        cfg.variant,
        rows.len(),
        summaries.len(),
        labels.len()
    );
    Ok(Prepared {
        variant: cfg.variant,
        rows,
        summaries,
        labels,
    })
}
