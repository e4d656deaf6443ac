use crate::models::Record;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-country summary over all retained years.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountrySummary {
    pub country: String,
    pub region: Option<String>,
    pub count: usize,
    pub mean_life_exp: f64,
    pub min_life_exp: f64,
    pub max_life_exp: f64,
    pub min_health_exp: f64,
    pub max_health_exp: f64,
    pub latest_year: i32,
}

impl CountrySummary {
    /// Spread of health expenditure across the retained years.
    pub fn health_exp_range(&self) -> f64 {
        self.max_health_exp - self.min_health_exp
    }
}

/// How selections are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grouping {
    /// One group containing every country.
    All,
    /// One group per region; countries without a region share a `None` group.
    Region,
}

/// Countries selected from one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSelection {
    pub group: Option<String>,
    pub countries: Vec<String>,
}

/// Summaries in first-encountered country order.
pub fn country_summaries(records: &[Record]) -> Vec<CountrySummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut sums: Vec<(CountrySummary, f64)> = Vec::new();
    for r in records {
        match index.get(r.country.as_str()) {
            Some(&i) => {
                let (s, total) = &mut sums[i];
                s.count += 1;
                *total += r.life_exp;
                s.min_life_exp = s.min_life_exp.min(r.life_exp);
                s.max_life_exp = s.max_life_exp.max(r.life_exp);
                s.min_health_exp = s.min_health_exp.min(r.health_exp);
                s.max_health_exp = s.max_health_exp.max(r.health_exp);
                s.latest_year = s.latest_year.max(r.year);
            }
            None => {
                index.insert(r.country.as_str(), sums.len());
                sums.push((
                    CountrySummary {
                        country: r.country.clone(),
                        region: r.region.clone(),
                        count: 1,
                        mean_life_exp: 0.0,
                        min_life_exp: r.life_exp,
                        max_life_exp: r.life_exp,
                        min_health_exp: r.health_exp,
                        max_health_exp: r.health_exp,
                        latest_year: r.year,
                    },
                    r.life_exp,
                ));
            }
        }
    }
    sums.into_iter()
        .map(|(mut s, total)| {
            s.mean_life_exp = total / s.count as f64;
            s
        })
        .collect()
}

/// Split summaries into groups, keeping first-encountered order for both groups and members.
type Group<'a> = (Option<String>, Vec<&'a CountrySummary>);

fn grouped(summaries: &[CountrySummary], grouping: Grouping) -> Vec<Group<'_>> {
    let mut out: Vec<Group<'_>> = Vec::new();
    for s in summaries {
        let key = match grouping {
            Grouping::All => None,
            Grouping::Region => s.region.clone(),
        };
        match out.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(s),
            None => out.push((key, vec![s])),
        }
    }
    out
}

/// The `n` countries with the highest mean life expectancy per group.
///
/// Returns `min(n, group size)` countries per group, best first. Equal means keep
/// their first-encountered order.
pub fn top_n_by_mean_life_exp(
    summaries: &[CountrySummary],
    n: usize,
    grouping: Grouping,
) -> Vec<GroupSelection> {
    grouped(summaries, grouping)
        .into_iter()
        .map(|(group, mut members)| {
            members.sort_by(|a, b| b.mean_life_exp.total_cmp(&a.mean_life_exp));
            GroupSelection {
                group,
                countries: members
                    .into_iter()
                    .take(n)
                    .map(|s| s.country.clone())
                    .collect(),
            }
        })
        .collect()
}

/// Exactly one country per group: the largest health-expenditure range.
/// On ties the first-encountered country is kept.
pub fn largest_health_exp_change(
    summaries: &[CountrySummary],
    grouping: Grouping,
) -> Vec<GroupSelection> {
    grouped(summaries, grouping)
        .into_iter()
        .filter_map(|(group, members)| {
            let mut best: Option<&CountrySummary> = None;
            for s in members {
                if best.is_none_or(|b| s.health_exp_range() > b.health_exp_range()) {
                    best = Some(s);
                }
            }
            best.map(|s| GroupSelection {
                group,
                countries: vec![s.country.clone()],
            })
        })
        .collect()
}

/// Flatten selections into the list of selected country names.
pub fn selected_countries(selections: &[GroupSelection]) -> Vec<String> {
    selections
        .iter()
        .flat_map(|g| g.countries.iter().cloned())
        .collect()
}
