//! healthspan
//!
//! Turns a country-year panel of health expenditure and life expectancy into a
//! layered comparative line chart. Pairs with the `healthspan` CLI.
//!
//! ### Pipeline
//! raw CSV → resolved columns → normalized, tagged rows → per-country aggregates
//! → label table → composed chart → SVG/PNG.
//!
//! Two variants are built from the same stages:
//! - **base**: replication of the published single-panel graphic (years ≥ 2000,
//!   one focus country with a value-driven color ramp, a named key list)
//! - **regional**: improved chart (2000–2017), top 10 countries per region by
//!   mean life expectancy, the largest spending change highlighted, faceted by region
//!
//! ### Example
//! ```no_run
//! use healthspan::{ChartTheme, PipelineConfig, pipeline, viz};
//!
//! let cfg = PipelineConfig::regional();
//! let prepared = pipeline::load_and_prepare("life-expectancy-vs-health-expenditure.csv", &cfg)?;
//! let theme = ChartTheme::regional();
//! let fonts = viz::register_theme_fonts(&theme, &viz::FontSource::standard());
//! let chart = viz::compose(&prepared, &theme);
//! viz::render(&chart, &theme, &fonts, "regional.svg", 1400, 1000)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod labels;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod regions;
pub mod resolve;
pub mod stats;
pub mod storage;
pub mod viz;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use models::{Category, LabelEntry, Record, TaggedRecord, Variant, YearRange};
pub use viz::ChartTheme;
