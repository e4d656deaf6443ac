//! Immutable styling configuration handed to the composer and renderer.

use super::axis::{AxisSpec, TerminalLabel};
use crate::models::Category;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear interpolation, `t` clamped to `0..=1`.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

/// Microsoft Office (2013+) chart series palette, used for categorical region colors.
pub const OFFICE10: [Rgb; 10] = [
    Rgb(68, 114, 196),  // blue      (#4472C4)
    Rgb(237, 125, 49),  // orange    (#ED7D31)
    Rgb(165, 165, 165), // gray      (#A5A5A5)
    Rgb(255, 192, 0),   // gold      (#FFC000)
    Rgb(91, 155, 213),  // light blue(#5B9BD5)
    Rgb(112, 173, 71),  // green     (#70AD47)
    Rgb(38, 68, 120),   // dark blue (#264478)
    Rgb(158, 72, 14),   // dark org. (#9E480E)
    Rgb(99, 99, 99),    // dark gray (#636363)
    Rgb(153, 115, 0),   // brownish  (#997300)
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: Rgb,
    pub width: u32,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextSpec {
    pub color: Rgb,
    pub size: u32,
    pub bold: bool,
}

/// A web font family and the short alias it is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub alias: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

/// Free-floating text placed by fraction of the main area (0,0 = top left).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub style: TextSpec,
}

/// Color ramp for the focus line: color and opacity follow `value / max(value)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub low: Rgb,
    pub high: Rgb,
    /// Opacity never drops below this.
    pub min_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartTheme {
    pub heading_font: FontSpec,
    pub body_font: FontSpec,
    pub canvas: Rgb,
    /// Fill of the context rectangle behind the lines.
    pub panel: Rgb,
    pub rest: LineStyle,
    pub highlighted: LineStyle,
    pub top_n: LineStyle,
    pub focus: LineStyle,
    pub gradient: Gradient,
    /// Categorical colors, one per region in facet order.
    pub region_colors: Vec<Rgb>,
    pub focus_label: TextSpec,
    pub highlighted_label: TextSpec,
    pub muted_label: TextSpec,
    pub tick_label: TextSpec,
    pub title_text: TextSpec,
    pub subtitle_text: TextSpec,
    pub facet_title: TextSpec,
    pub footnote_text: TextSpec,
    /// Fixed axes of the single-panel chart; facets fit their own.
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub margins: Margins,
    pub header_px: u32,
    pub title: String,
    pub subtitle: String,
    pub annotations: Vec<Annotation>,
    pub footnote: Vec<String>,
    /// Share of the canvas height given to the main chart; the footnote panel gets the rest.
    pub main_height_ratio: f64,
    pub facet_columns: Option<usize>,
}

const INK: Rgb = Rgb(51, 48, 46);
const MUTED: Rgb = Rgb(128, 122, 116);

impl ChartTheme {
    /// Styling of the published single-panel graphic.
    pub fn base() -> Self {
        Self {
            heading_font: FontSpec {
                family: "Roboto Condensed".into(),
                alias: "heading".into(),
            },
            body_font: FontSpec {
                family: "Roboto".into(),
                alias: "body".into(),
            },
            canvas: Rgb(255, 241, 229),
            panel: Rgb(242, 223, 206),
            rest: LineStyle {
                color: Rgb(160, 150, 140),
                width: 1,
                opacity: 0.35,
            },
            highlighted: LineStyle {
                color: Rgb(110, 104, 98),
                width: 2,
                opacity: 0.8,
            },
            top_n: LineStyle {
                color: Rgb(110, 104, 98),
                width: 2,
                opacity: 0.6,
            },
            focus: LineStyle {
                color: Rgb(204, 0, 102),
                width: 4,
                opacity: 1.0,
            },
            gradient: Gradient {
                low: Rgb(255, 170, 200),
                high: Rgb(204, 0, 102),
                min_opacity: 0.35,
            },
            region_colors: OFFICE10.to_vec(),
            focus_label: TextSpec {
                color: Rgb(204, 0, 102),
                size: 16,
                bold: true,
            },
            highlighted_label: TextSpec {
                color: INK,
                size: 13,
                bold: true,
            },
            muted_label: TextSpec {
                color: MUTED,
                size: 12,
                bold: false,
            },
            tick_label: TextSpec {
                color: MUTED,
                size: 12,
                bold: false,
            },
            title_text: TextSpec {
                color: INK,
                size: 24,
                bold: true,
            },
            subtitle_text: TextSpec {
                color: INK,
                size: 15,
                bold: false,
            },
            facet_title: TextSpec {
                color: INK,
                size: 15,
                bold: true,
            },
            footnote_text: TextSpec {
                color: MUTED,
                size: 11,
                bold: false,
            },
            x_axis: AxisSpec {
                min: 0.0,
                max: 11000.0,
                ticks: vec![0.0, 2000.0, 4000.0, 6000.0, 8000.0, 10000.0],
                terminal: TerminalLabel::Literal("$10,000".into()),
            },
            y_axis: AxisSpec {
                min: 70.0,
                max: 85.0,
                ticks: vec![70.0, 75.0, 80.0, 85.0],
                terminal: TerminalLabel::Suffix("years".into()),
            },
            margins: Margins {
                top: 10,
                right: 120,
                bottom: 36,
                left: 60,
            },
            header_px: 70,
            title: "Americans spend more on health care but live shorter lives".into(),
            subtitle: "Life expectancy at birth vs. health expenditure per capita, 2000 onwards"
                .into(),
            annotations: vec![
                Annotation {
                    text: "Health spending per person (PPP, international $)".into(),
                    x: 0.55,
                    y: 0.97,
                    style: TextSpec {
                        color: MUTED,
                        size: 12,
                        bold: false,
                    },
                },
                Annotation {
                    text: "Each line traces one country year by year".into(),
                    x: 0.06,
                    y: 0.14,
                    style: TextSpec {
                        color: MUTED,
                        size: 12,
                        bold: false,
                    },
                },
            ],
            footnote: vec![
                "Source: World Bank, Our World in Data. Health expenditure in purchasing-power-parity dollars."
                    .into(),
            ],
            main_height_ratio: 0.92,
            facet_columns: None,
        }
    }

    /// Styling of the faceted regional chart.
    pub fn regional() -> Self {
        let base = Self::base();
        Self {
            canvas: Rgb(255, 255, 255),
            panel: Rgb(244, 244, 244),
            rest: LineStyle {
                color: Rgb(170, 170, 170),
                width: 1,
                opacity: 0.3,
            },
            top_n: LineStyle {
                color: Rgb(120, 120, 120),
                width: 2,
                opacity: 0.55,
            },
            highlighted: LineStyle {
                color: INK,
                width: 3,
                opacity: 1.0,
            },
            title: "Health spending and life expectancy by region, 2000–2017".into(),
            subtitle: "Top 10 countries by life expectancy per region; the largest spending increase is highlighted"
                .into(),
            annotations: Vec::new(),
            margins: Margins {
                top: 30,
                right: 90,
                bottom: 30,
                left: 50,
            },
            main_height_ratio: 0.94,
            ..base
        }
    }

    pub fn line_style(&self, category: Category) -> LineStyle {
        match category {
            Category::Focus => self.focus,
            Category::Highlighted => self.highlighted,
            Category::TopN => self.top_n,
            Category::Rest => self.rest,
        }
    }

    pub fn label_style(&self, category: Category) -> TextSpec {
        match category {
            Category::Focus => self.focus_label,
            Category::Highlighted => self.highlighted_label,
            Category::TopN | Category::Rest => self.muted_label,
        }
    }

    pub fn region_color(&self, idx: usize) -> Rgb {
        if self.region_colors.is_empty() {
            return OFFICE10[idx % OFFICE10.len()];
        }
        self.region_colors[idx % self.region_colors.len()]
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading theme {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing theme {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        let a = Rgb(0, 0, 0);
        let b = Rgb(200, 100, 50);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb(100, 50, 25));
        assert_eq!(a.lerp(b, 7.0), b);
    }

    #[test]
    fn styles_per_category() {
        let t = ChartTheme::base();
        assert!(t.focus.width > t.highlighted.width);
        assert!(t.highlighted.width > t.rest.width);
        assert!(t.rest.opacity < t.highlighted.opacity);
        assert!(t.label_style(Category::Focus).bold);
        assert!(!t.label_style(Category::Rest).bold);
        assert_eq!(t.region_color(11), OFFICE10[1]);
    }
}
