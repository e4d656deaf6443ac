//! Static label placement.
//!
//! There is no collision detection: a manual position, a per-country nudge or a
//! fixed offset from the country's latest observation decides where text goes.

use crate::config::{Nudge, Offset, OffsetException, PipelineConfig};
use crate::models::{Category, LabelEntry, ManualLabel, TaggedRecord, Variant};
use log::debug;
use std::collections::HashMap;

/// How the anchor point of a non-manual label is shifted.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// Vertical nudge for listed countries, none for the others.
    Nudged(Vec<Nudge>),
    /// Uniform offset with per-country exceptions.
    Offset {
        default: Offset,
        exceptions: Vec<OffsetException>,
    },
}

impl Placement {
    fn shift(&self, country: &str) -> (f64, f64) {
        match self {
            Placement::Nudged(nudges) => {
                let dy = nudges
                    .iter()
                    .find(|n| n.country == country)
                    .map_or(0.0, |n| n.dy);
                (0.0, dy)
            }
            Placement::Offset {
                default,
                exceptions,
            } => exceptions
                .iter()
                .find(|e| e.country == country)
                .map_or((default.dx, default.dy), |e| (e.dx, e.dy)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlan {
    pub labelled: Vec<Category>,
    pub manual: Vec<ManualLabel>,
    pub placement: Placement,
}

impl LabelPlan {
    pub fn from_config(cfg: &PipelineConfig) -> Self {
        let placement = match cfg.variant {
            Variant::Base => Placement::Nudged(cfg.nudges.clone()),
            Variant::Regional => Placement::Offset {
                default: cfg.offset,
                exceptions: cfg.offset_exceptions.clone(),
            },
        };
        Self {
            labelled: cfg.labelled.clone(),
            manual: cfg.manual_labels.clone(),
            placement,
        }
    }

    /// One label per labelled country that still has data, in first-encountered order.
    pub fn place(&self, rows: &[TaggedRecord]) -> Vec<LabelEntry> {
        let mut latest: Vec<&TaggedRecord> = Vec::new();
        let mut slot: HashMap<&str, usize> = HashMap::new();
        for t in rows.iter().filter(|t| self.labelled.contains(&t.category)) {
            match slot.get(t.record.country.as_str()) {
                Some(&i) => {
                    if t.record.year > latest[i].record.year {
                        latest[i] = t;
                    }
                }
                None => {
                    slot.insert(t.record.country.as_str(), latest.len());
                    latest.push(t);
                }
            }
        }

        let labels: Vec<LabelEntry> = latest
            .into_iter()
            .map(|t| {
                let r = &t.record;
                let (x, y) = match self.manual.iter().find(|m| m.country == r.country) {
                    Some(m) => (m.x, m.y),
                    None => {
                        let (dx, dy) = self.placement.shift(&r.country);
                        (r.health_exp + dx, r.life_exp + dy)
                    }
                };
                LabelEntry {
                    country: r.country.clone(),
                    x,
                    y,
                    text: r.country.clone(),
                    category: t.category,
                    region: r.region.clone(),
                }
            })
            .collect();
        debug!("placed {} labels", labels.len());
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;

    fn row(country: &str, year: i32, life_exp: f64, health_exp: f64, cat: Category) -> TaggedRecord {
        TaggedRecord {
            record: Record {
                country: country.into(),
                year,
                life_exp,
                health_exp,
                population: None,
                region: None,
            },
            category: cat,
        }
    }

    #[test]
    fn regional_default_offset() {
        let plan = LabelPlan::from_config(&PipelineConfig::regional());
        let labels = plan.place(&[row("United States", 2017, 79.0, 8000.0, Category::Highlighted)]);
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].x, 8600.0);
        assert_eq!(labels[0].y, 80.0);
        assert_eq!(labels[0].text, "United States");
    }

    #[test]
    fn regional_exception_offset() {
        let plan = LabelPlan::from_config(&PipelineConfig::regional());
        let labels = plan.place(&[row("Switzerland", 2017, 83.0, 7000.0, Category::Highlighted)]);
        assert_eq!(labels[0].x, 5200.0);
        assert!((labels[0].y - 84.2).abs() < 1e-9);
    }

    #[test]
    fn base_uses_latest_year_manual_and_nudge() {
        let plan = LabelPlan::from_config(&PipelineConfig::base());
        let rows = vec![
            row("Germany", 2016, 80.0, 5000.0, Category::Highlighted),
            row("Germany", 2015, 79.0, 4800.0, Category::Highlighted),
            row("Japan", 2015, 84.0, 4000.0, Category::Highlighted),
            row("United States", 2015, 78.8, 9500.0, Category::Focus),
            row("Chad", 2015, 50.0, 80.0, Category::Rest),
        ];
        let labels = plan.place(&rows);
        let names: Vec<&str> = labels.iter().map(|l| l.country.as_str()).collect();
        assert_eq!(names, vec!["Germany", "Japan", "United States"]);
        assert_eq!(labels[0].x, 5000.0);
        assert!((labels[0].y - 79.65).abs() < 1e-9);
        assert_eq!((labels[1].x, labels[1].y), (4400.0, 84.6));
        assert_eq!((labels[2].x, labels[2].y), (9500.0, 78.8));
        assert_eq!(labels[2].category, Category::Focus);
    }
}
