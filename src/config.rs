//! Data-side configuration for one chart build.
//!
//! Everything that the published graphic hard-codes (the focus country, the
//! key-country list, manual label positions, nudges, offsets, region patches)
//! lives here as plain data. Two presets mirror the two charts.

use crate::error::PipelineError;
use crate::models::{Category, ManualLabel, Variant, YearRange};
use crate::regions::RegionPatch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Vertical shift applied to one country's latest-year anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nudge {
    pub country: String,
    pub dy: f64,
}

/// Additive label offset on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

/// Country-specific offset replacing the default one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetException {
    pub country: String,
    pub dx: f64,
    pub dy: f64,
}

/// Most offset exceptions the regional label rule accepts.
pub const MAX_OFFSET_EXCEPTIONS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub variant: Variant,
    pub years: YearRange,
    /// Single country tagged [`Category::Focus`] (base chart).
    pub focus: Option<String>,
    /// Countries tagged [`Category::Highlighted`] by name (base chart).
    pub key_countries: Vec<String>,
    /// Countries kept per region by mean life expectancy (regional chart).
    pub top_n: usize,
    /// Categories that receive a text label.
    pub labelled: Vec<Category>,
    pub manual_labels: Vec<ManualLabel>,
    pub nudges: Vec<Nudge>,
    pub offset: Offset,
    pub offset_exceptions: Vec<OffsetException>,
    pub region_patches: Vec<RegionPatch>,
    /// Extra or corrected name → region entries.
    #[serde(default)]
    pub extra_regions: BTreeMap<String, String>,
}

impl PipelineConfig {
    /// Replication of the published chart: one focus line over a set of peers.
    pub fn base() -> Self {
        Self {
            variant: Variant::Base,
            years: YearRange::from(2000),
            focus: Some("United States".into()),
            key_countries: [
                "Japan",
                "Switzerland",
                "France",
                "Germany",
                "Canada",
                "United Kingdom",
                "Australia",
                "Sweden",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            top_n: 0,
            labelled: vec![Category::Focus, Category::Highlighted],
            manual_labels: vec![
                ManualLabel {
                    country: "Japan".into(),
                    x: 4400.0,
                    y: 84.6,
                },
                ManualLabel {
                    country: "Switzerland".into(),
                    x: 8200.0,
                    y: 83.9,
                },
            ],
            nudges: vec![
                Nudge {
                    country: "Germany".into(),
                    dy: -0.35,
                },
                Nudge {
                    country: "Canada".into(),
                    dy: 0.3,
                },
            ],
            offset: Offset { dx: 0.0, dy: 0.0 },
            offset_exceptions: Vec::new(),
            region_patches: Vec::new(),
            extra_regions: BTreeMap::new(),
        }
    }

    /// Improved chart: 2000–2017, faceted by region, computed highlights.
    pub fn regional() -> Self {
        Self {
            variant: Variant::Regional,
            years: YearRange::between(2000, 2017),
            focus: None,
            key_countries: Vec::new(),
            top_n: 10,
            labelled: vec![Category::Highlighted],
            manual_labels: Vec::new(),
            nudges: Vec::new(),
            offset: Offset { dx: 600.0, dy: 1.0 },
            offset_exceptions: vec![
                OffsetException {
                    country: "Switzerland".into(),
                    dx: -1800.0,
                    dy: 1.2,
                },
                OffsetException {
                    country: "Australia".into(),
                    dx: 300.0,
                    dy: -1.5,
                },
            ],
            region_patches: vec![RegionPatch::americas_split()],
            extra_regions: BTreeMap::new(),
        }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Base => Self::base(),
            Variant::Regional => Self::regional(),
        }
    }

    /// Load from a JSON file. The file must contain every field.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.offset_exceptions.len() > MAX_OFFSET_EXCEPTIONS {
            return Err(PipelineError::Config(format!(
                "at most {} offset exceptions allowed, got {}",
                MAX_OFFSET_EXCEPTIONS,
                self.offset_exceptions.len()
            )));
        }
        if let Some(end) = self.years.end
            && end < self.years.start
        {
            return Err(PipelineError::Config(format!(
                "year range end {} precedes start {}",
                end, self.years.start
            )));
        }
        Ok(())
    }
}
