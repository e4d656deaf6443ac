//! Axis specifications with explicit ticks and tick-label formatting.

use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};

/// How the last tick is labelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TerminalLabel {
    /// Same format as every other tick.
    Plain,
    /// A fixed string, e.g. `"$10,000"`.
    Literal(String),
    /// The tick value formatted as dollars.
    Currency,
    /// The tick value followed by a unit word, e.g. `"85 years"`.
    Suffix(String),
}

/// Fixed domain plus explicit tick positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<f64>,
    pub terminal: TerminalLabel,
}

impl AxisSpec {
    /// Domain covering `values` with "nice" ticks (1, 2, 2.5 or 5 × 10^k steps).
    ///
    /// An empty or degenerate input gets a unit-wide domain around its value.
    pub fn fit<I>(values: I, target_ticks: usize, terminal: TerminalLabel) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (mut lo, mut hi) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if !lo.is_finite() {
            lo = 0.0;
            hi = 1.0;
        }
        if (hi - lo).abs() < f64::EPSILON {
            lo -= 0.5;
            hi += 0.5;
        }
        let step = nice_step((hi - lo) / target_ticks.max(1) as f64);
        let min = (lo / step).floor() * step;
        let max = (hi / step).ceil() * step;
        let n = ((max - min) / step).round() as usize;
        let ticks = (0..=n).map(|i| min + i as f64 * step).collect();
        Self {
            min,
            max,
            ticks,
            terminal,
        }
    }

    /// `(position, text)` for every tick inside the domain.
    pub fn tick_labels(&self) -> Vec<(f64, String)> {
        let inside: Vec<f64> = self
            .ticks
            .iter()
            .copied()
            .filter(|t| *t >= self.min - 1e-9 && *t <= self.max + 1e-9)
            .collect();
        let last = inside.len().saturating_sub(1);
        // One precision for the whole axis, enough for its finest tick.
        let decimals = inside.iter().map(|t| decimals_of(*t)).max().unwrap_or(0);
        inside
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                let text = if i == last {
                    match &self.terminal {
                        TerminalLabel::Plain => format_tick_with(t, decimals),
                        TerminalLabel::Literal(s) => s.clone(),
                        TerminalLabel::Currency => currency(t, decimals),
                        TerminalLabel::Suffix(unit) => {
                            format!("{} {}", format_tick_with(t, decimals), unit)
                        }
                    }
                } else {
                    format_tick_with(t, decimals)
                };
                (t, text)
            })
            .collect()
    }
}

fn nice_step(raw: f64) -> f64 {
    if !(raw.is_finite() && raw > 0.0) {
        return 1.0;
    }
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 2.5 {
        2.5
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * mag
}

const MAX_DECIMALS: usize = 4;

/// Fewest decimals that print `v` exactly, up to four.
fn decimals_of(v: f64) -> usize {
    (0..MAX_DECIMALS)
        .find(|&d| {
            let scaled = v * 10f64.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(MAX_DECIMALS)
}

/// Thousands separators on the integer part, `decimals` digits after the point.
pub fn format_tick_with(v: f64, decimals: usize) -> String {
    let digits = format!("{:.*}", decimals, v.abs());
    let (int, frac) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };
    let int = int
        .parse::<u64>()
        .map(|n| n.to_formatted_string(&Locale::en))
        .unwrap_or_else(|_| int.to_string());
    let negative = v < 0.0 && digits.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    match frac {
        Some(f) => format!("{sign}{int}.{f}"),
        None => format!("{sign}{int}"),
    }
}

/// Thousands separators; fractional values keep only the decimals they need.
pub fn format_tick(v: f64) -> String {
    format_tick_with(v, decimals_of(v))
}

fn currency(v: f64, decimals: usize) -> String {
    if v < 0.0 {
        format!("-${}", format_tick_with(-v, decimals))
    } else {
        format!("${}", format_tick_with(v, decimals))
    }
}

pub fn format_currency(v: f64) -> String {
    currency(v, decimals_of(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_ticks_with_literal_terminal() {
        let axis = AxisSpec {
            min: 0.0,
            max: 11000.0,
            ticks: vec![0.0, 2000.0, 4000.0, 6000.0, 8000.0, 10000.0],
            terminal: TerminalLabel::Literal("$10,000".into()),
        };
        let labels: Vec<String> = axis.tick_labels().into_iter().map(|(_, s)| s).collect();
        assert_eq!(labels, vec!["0", "2,000", "4,000", "6,000", "8,000", "$10,000"]);
    }

    #[test]
    fn fit_produces_nice_ticks() {
        let axis = AxisSpec::fit([120.0, 9300.0], 5, TerminalLabel::Currency);
        assert_eq!(axis.min, 0.0);
        assert_eq!(axis.max, 10000.0);
        assert_eq!(axis.ticks, vec![0.0, 2000.0, 4000.0, 6000.0, 8000.0, 10000.0]);
        assert_eq!(axis.tick_labels().last().unwrap().1, "$10,000");

        let axis = AxisSpec::fit([71.3, 83.9], 4, TerminalLabel::Suffix("years".into()));
        assert_eq!(axis.min, 70.0);
        assert_eq!(axis.max, 85.0);
        assert_eq!(axis.tick_labels().last().unwrap().1, "85 years");
    }

    #[test]
    fn degenerate_input() {
        let axis = AxisSpec::fit(std::iter::empty(), 5, TerminalLabel::Plain);
        assert!(axis.max > axis.min);
        let axis = AxisSpec::fit([5.0, 5.0], 5, TerminalLabel::Plain);
        assert!(axis.max > axis.min);
    }

    #[test]
    fn formatting() {
        assert_eq!(format_tick(12345.0), "12,345");
        assert_eq!(format_tick(72.5), "72.5");
        assert_eq!(format_currency(8000.0), "$8,000");
        assert_eq!(format_tick_with(-1234.5, 2), "-1,234.50");
    }

    #[test]
    fn quarter_steps_keep_two_decimals() {
        let axis = AxisSpec::fit([70.0, 71.0], 4, TerminalLabel::Plain);
        let labels: Vec<String> = axis.tick_labels().into_iter().map(|(_, s)| s).collect();
        assert_eq!(labels, vec!["70.00", "70.25", "70.50", "70.75", "71.00"]);

        let axis = AxisSpec::fit([70.0, 72.0], 4, TerminalLabel::Suffix("years".into()));
        let labels: Vec<String> = axis.tick_labels().into_iter().map(|(_, s)| s).collect();
        assert_eq!(labels, vec!["70.0", "70.5", "71.0", "71.5", "72.0 years"]);
    }
}
