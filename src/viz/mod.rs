//! Chart composition and rendering to **SVG** or **PNG**.
//!
//! Composition turns prepared rows and labels into an ordered list of
//! [`Layer`] values per [`Panel`]; rendering walks that list front to back, so
//! later layers draw over earlier ones:
//!
//! 1. context rectangle over the full axis domain
//! 2. `Rest` lines, thin and faint
//! 3. mid-tier lines (`TopN`, then `Highlighted`)
//! 4. foreground lines (`Focus` uses a value-driven color and opacity ramp)
//! 5. text labels
//!
//! Axis ticks, facet titles, the header, free-floating annotations and the
//! footnote panel are drawn by the renderer around the layer stack.

pub mod axis;
pub mod fonts;
pub mod text;
pub mod theme;

pub use axis::{AxisSpec, TerminalLabel};
pub use fonts::{FontFaces, FontSource, register_theme_fonts};
pub use theme::{ChartTheme, Rgb, TextSpec};

use crate::models::{Category, LabelEntry, TaggedRecord, Variant};
use crate::pipeline::Prepared;
use anyhow::{Result, anyhow};
use log::info;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::collections::BTreeMap;
use std::path::Path;
use text::{estimate_text_width_px, wrap_to_width};
use theme::Margins;

/// One country's path through (health expenditure, life expectancy) space, ordered by year.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub country: String,
    pub color: Rgb,
    pub points: Vec<(f64, f64)>,
}

/// A single stroke of a ramped line.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub color: Rgb,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub style: TextSpec,
    pub heading_font: bool,
}

/// Drawable unit; a panel's layers are drawn in list order.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Background {
        x: (f64, f64),
        y: (f64, f64),
        color: Rgb,
    },
    Lines {
        category: Category,
        width: u32,
        opacity: f64,
        series: Vec<Series>,
    },
    Ramped {
        category: Category,
        width: u32,
        segments: Vec<Segment>,
    },
    Labels(Vec<Label>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelTitle {
    pub text: String,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: Option<PanelTitle>,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub margins: Margins,
    pub layers: Vec<Layer>,
}

/// A composed chart: a grid of panels above a footnote panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub subtitle: String,
    pub panels: Vec<Panel>,
    pub columns: usize,
    pub annotations: Vec<theme::Annotation>,
    pub footnote: Vec<String>,
    pub main_height_ratio: f64,
}

/// Color/opacity ramp for `points`, driven by each segment's end x value over the
/// largest x value in the series.
pub fn ramp_segments(points: &[(f64, f64)], gradient: &theme::Gradient) -> Vec<Segment> {
    let max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    points
        .windows(2)
        .map(|w| {
            let t = if max > 0.0 { (w[1].0 / max).clamp(0.0, 1.0) } else { 1.0 };
            Segment {
                from: w[0],
                to: w[1],
                color: gradient.low.lerp(gradient.high, t),
                opacity: t.max(gradient.min_opacity),
            }
        })
        .collect()
}

struct CountryPath {
    country: String,
    category: Category,
    points: Vec<(f64, f64)>,
}

/// Paths per country in first-encountered order, points sorted by year.
fn paths_by_country(rows: &[&TaggedRecord]) -> Vec<CountryPath> {
    let mut grouped: Vec<(&TaggedRecord, Vec<(i32, f64, f64)>)> = Vec::new();
    let mut slot: BTreeMap<&str, usize> = BTreeMap::new();
    for &t in rows {
        let r = &t.record;
        let i = match slot.get(r.country.as_str()) {
            Some(&i) => i,
            None => {
                slot.insert(r.country.as_str(), grouped.len());
                grouped.push((t, Vec::new()));
                grouped.len() - 1
            }
        };
        grouped[i].1.push((r.year, r.health_exp, r.life_exp));
    }
    grouped
        .into_iter()
        .map(|(first, mut pts)| {
            pts.sort_by_key(|p| p.0);
            CountryPath {
                country: first.record.country.clone(),
                category: first.category,
                points: pts.into_iter().map(|(_, x, y)| (x, y)).collect(),
            }
        })
        .collect()
}

fn in_domain(p: (f64, f64), x: &AxisSpec, y: &AxisSpec) -> bool {
    const EPS: f64 = 1e-9;
    p.0 >= x.min - EPS && p.0 <= x.max + EPS && p.1 >= y.min - EPS && p.1 <= y.max + EPS
}

/// Maximal runs of consecutive in-domain points. Points outside the fixed domain
/// break the line instead of being pinned to the panel border.
fn visible_runs(points: &[(f64, f64)], x: &AxisSpec, y: &AxisSpec) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut cur: Vec<(f64, f64)> = Vec::new();
    for &p in points {
        if in_domain(p, x, y) {
            cur.push(p);
        } else if !cur.is_empty() {
            runs.push(std::mem::take(&mut cur));
        }
    }
    if !cur.is_empty() {
        runs.push(cur);
    }
    runs
}

/// Build the layer stack for one panel.
fn panel_layers(
    rows: &[&TaggedRecord],
    labels: &[&LabelEntry],
    x_axis: &AxisSpec,
    y_axis: &AxisSpec,
    theme: &ChartTheme,
    region_color: Option<Rgb>,
) -> Vec<Layer> {
    let mut layers = vec![Layer::Background {
        x: (x_axis.min, x_axis.max),
        y: (y_axis.min, y_axis.max),
        color: theme.panel,
    }];

    let paths = paths_by_country(rows);
    for category in Category::ALL.iter().rev().copied() {
        let style = theme.line_style(category);
        let color = match (category, region_color) {
            (Category::TopN | Category::Highlighted, Some(c)) => c,
            _ => style.color,
        };
        let paths_in: Vec<&CountryPath> =
            paths.iter().filter(|p| p.category == category).collect();
        if category == Category::Focus {
            // The ramp is scaled over the whole path; only the visible strokes are kept.
            let segments: Vec<Segment> = paths_in
                .iter()
                .flat_map(|p| ramp_segments(&p.points, &theme.gradient))
                .filter(|seg| {
                    in_domain(seg.from, x_axis, y_axis) && in_domain(seg.to, x_axis, y_axis)
                })
                .collect();
            if segments.is_empty() {
                continue;
            }
            layers.push(Layer::Ramped {
                category,
                width: style.width,
                segments,
            });
        } else {
            let series: Vec<Series> = paths_in
                .iter()
                .flat_map(|p| {
                    visible_runs(&p.points, x_axis, y_axis)
                        .into_iter()
                        .map(move |points| Series {
                            country: p.country.clone(),
                            color,
                            points,
                        })
                })
                .collect();
            if series.is_empty() {
                continue;
            }
            layers.push(Layer::Lines {
                category,
                width: style.width,
                opacity: style.opacity,
                series,
            });
        }
    }

    if !labels.is_empty() {
        let texts = labels
            .iter()
            .map(|l| {
                let mut style = theme.label_style(l.category);
                if let (Category::Highlighted, Some(c)) = (l.category, region_color) {
                    style.color = c;
                }
                Label {
                    text: l.text.clone(),
                    x: l.x,
                    y: l.y,
                    style,
                    heading_font: l.category == Category::Focus,
                }
            })
            .collect();
        layers.push(Layer::Labels(texts));
    }
    layers
}

/// Widen the right margin so labels near the right edge are not clipped.
fn reserve_right_margin(
    base: Margins,
    labels: &[&LabelEntry],
    theme: &ChartTheme,
    x: &AxisSpec,
) -> Margins {
    let edge = x.min + 0.75 * (x.max - x.min);
    let widest = labels
        .iter()
        .filter(|l| l.x >= edge)
        .map(|l| estimate_text_width_px(&l.text, theme.label_style(l.category).size))
        .max()
        .unwrap_or(0);
    Margins {
        right: base.right.max(widest + 12),
        ..base
    }
}

/// Single panel with the theme's fixed axes.
pub fn compose_single(prepared: &Prepared, theme: &ChartTheme) -> Chart {
    let rows: Vec<&TaggedRecord> = prepared.rows.iter().collect();
    let labels: Vec<&LabelEntry> = prepared.labels.iter().collect();
    let layers = panel_layers(&rows, &labels, &theme.x_axis, &theme.y_axis, theme, None);
    Chart {
        title: theme.title.clone(),
        subtitle: theme.subtitle.clone(),
        panels: vec![Panel {
            title: None,
            x_axis: theme.x_axis.clone(),
            y_axis: theme.y_axis.clone(),
            margins: reserve_right_margin(theme.margins, &labels, theme, &theme.x_axis),
            layers,
        }],
        columns: 1,
        annotations: theme.annotations.clone(),
        footnote: theme.footnote.clone(),
        main_height_ratio: theme.main_height_ratio,
    }
}

/// Rows without a region are grouped under this facet.
pub const UNASSIGNED_REGION: &str = "Other";

/// One independently scaled panel per region, regions in alphabetical order.
pub fn compose_faceted(prepared: &Prepared, theme: &ChartTheme) -> Chart {
    let region_of = |r: &Option<String>| {
        r.clone()
            .unwrap_or_else(|| UNASSIGNED_REGION.to_string())
    };
    let mut rows_by: BTreeMap<String, Vec<&TaggedRecord>> = BTreeMap::new();
    for t in &prepared.rows {
        rows_by.entry(region_of(&t.record.region)).or_default().push(t);
    }
    let mut labels_by: BTreeMap<String, Vec<&LabelEntry>> = BTreeMap::new();
    for l in &prepared.labels {
        labels_by.entry(region_of(&l.region)).or_default().push(l);
    }

    let panels: Vec<Panel> = rows_by
        .iter()
        .enumerate()
        .map(|(idx, (region, rows))| {
            let labels = labels_by.get(region).cloned().unwrap_or_default();
            let xs = rows
                .iter()
                .map(|t| t.record.health_exp)
                .chain(labels.iter().map(|l| l.x));
            let ys = rows
                .iter()
                .map(|t| t.record.life_exp)
                .chain(labels.iter().map(|l| l.y));
            let x_axis = AxisSpec::fit(xs, 4, TerminalLabel::Currency);
            let y_axis = AxisSpec::fit(ys, 4, TerminalLabel::Suffix("years".into()));
            let color = theme.region_color(idx);
            let layers = panel_layers(rows, &labels, &x_axis, &y_axis, theme, Some(color));
            Panel {
                title: Some(PanelTitle {
                    text: region.clone(),
                    color,
                }),
                margins: reserve_right_margin(theme.margins, &labels, theme, &x_axis),
                x_axis,
                y_axis,
                layers,
            }
        })
        .collect();

    let columns = theme
        .facet_columns
        .unwrap_or_else(|| (panels.len() as f64).sqrt().ceil() as usize)
        .max(1);
    Chart {
        title: theme.title.clone(),
        subtitle: theme.subtitle.clone(),
        panels,
        columns,
        annotations: theme.annotations.clone(),
        footnote: theme.footnote.clone(),
        main_height_ratio: theme.main_height_ratio,
    }
}

/// Compose the chart that matches the prepared variant.
pub fn compose(prepared: &Prepared, theme: &ChartTheme) -> Chart {
    match prepared.variant {
        Variant::Base => compose_single(prepared, theme),
        Variant::Regional => compose_faceted(prepared, theme),
    }
}

/// Render to `out_path`; `.svg` selects the SVG backend, anything else the bitmap backend.
pub fn render<P: AsRef<Path>>(
    chart: &Chart,
    theme: &ChartTheme,
    fonts: &FontFaces,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    if chart.panels.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        // SVG carries the family name through to the viewer.
        let faces = Faces {
            heading: &fonts.heading_family,
            body: &fonts.body_family,
        };
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, chart, theme, &faces)?;
    } else {
        let faces = Faces {
            heading: &fonts.heading,
            body: &fonts.body,
        };
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, chart, theme, &faces)?;
    }
    info!("wrote chart to {}", out_path.display());
    Ok(())
}

/// Font family names as the active backend expects them.
struct Faces<'a> {
    heading: &'a str,
    body: &'a str,
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

fn text_style<'a>(family: &'a str, spec: &TextSpec) -> TextStyle<'a> {
    let style = if spec.bold {
        FontStyle::Bold
    } else {
        FontStyle::Normal
    };
    FontDesc::new(FontFamily::Name(family), spec.size as f64, style).color(&rgb(spec.color))
}

fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    chart: &Chart,
    theme: &ChartTheme,
    fonts: &Faces<'_>,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&rgb(theme.canvas))
        .map_err(|e| anyhow!("{:?}", e))?;

    let (_, root_h) = root.dim_in_pixel();
    let main_h = (root_h as f64 * chart.main_height_ratio.clamp(0.1, 1.0)).round() as i32;
    let (main, footer) = root.split_vertically(main_h);
    let (header, body) = main.split_vertically(theme.header_px as i32);

    draw_header(&header, chart, theme, fonts)?;

    let cols = chart.columns.max(1);
    let rows = chart.panels.len().div_ceil(cols);
    let cells = body.split_evenly((rows, cols));
    for (panel, cell) in chart.panels.iter().zip(cells.iter()) {
        draw_panel(cell, panel, theme, fonts)?;
    }

    let (main_w, main_px_h) = main.dim_in_pixel();
    for a in &chart.annotations {
        let pos = (
            (a.x * main_w as f64).round() as i32,
            (a.y * main_px_h as f64).round() as i32,
        );
        main.draw(&Text::new(a.text.clone(), pos, text_style(fonts.body, &a.style)))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    draw_footnote(&footer, &chart.footnote, theme, fonts)?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_header<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    chart: &Chart,
    theme: &ChartTheme,
    fonts: &Faces<'_>,
) -> Result<()> {
    let left = theme.margins.left as i32;
    area.draw(&Text::new(
        chart.title.clone(),
        (left, 10),
        text_style(fonts.heading, &theme.title_text),
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    if !chart.subtitle.is_empty() {
        let y = 10 + theme.title_text.size as i32 + 8;
        area.draw(&Text::new(
            chart.subtitle.clone(),
            (left, y),
            text_style(fonts.body, &theme.subtitle_text),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

fn draw_footnote<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    lines: &[String],
    theme: &ChartTheme,
    fonts: &Faces<'_>,
) -> Result<()> {
    let (w, _) = area.dim_in_pixel();
    let left = theme.margins.left;
    let size = theme.footnote_text.size;
    let max_px = w.saturating_sub(2 * left).max(size * 4);
    let style = text_style(fonts.body, &theme.footnote_text);
    let wrapped = lines.iter().flat_map(|l| wrap_to_width(l, size, max_px));
    for (i, line) in wrapped.enumerate() {
        let y = 4 + i as i32 * (size as i32 + 4);
        area.draw(&Text::new(line, (left as i32, y), style.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    theme: &ChartTheme,
    fonts: &Faces<'_>,
) -> Result<()> {
    let m = panel.margins;
    let (x, y) = (&panel.x_axis, &panel.y_axis);

    if let Some(title) = &panel.title {
        let spec = TextSpec {
            color: title.color,
            ..theme.facet_title
        };
        area.draw(&Text::new(
            title.text.clone(),
            (m.left as i32, 6),
            text_style(fonts.heading, &spec),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    // No mesh: axis lines, grid and default tick labels stay off.
    let mut chart = ChartBuilder::on(area)
        .margin_top(m.top)
        .margin_right(m.right)
        .margin_bottom(m.bottom)
        .margin_left(m.left)
        .build_cartesian_2d(x.min..x.max, y.min..y.max)
        .map_err(|e| anyhow!("{:?}", e))?;

    for layer in &panel.layers {
        match layer {
            Layer::Background { x, y, color } => {
                chart
                    .draw_series(std::iter::once(Rectangle::new(
                        [(x.0, y.0), (x.1, y.1)],
                        rgb(*color).filled(),
                    )))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
            Layer::Lines {
                width,
                opacity,
                series,
                ..
            } => {
                for s in series {
                    let style = rgb(s.color).mix(*opacity).stroke_width(*width);
                    chart
                        .draw_series(LineSeries::new(s.points.clone(), style))
                        .map_err(|e| anyhow!("{:?}", e))?;
                }
            }
            Layer::Ramped {
                width, segments, ..
            } => {
                chart
                    .draw_series(segments.iter().map(|seg| {
                        PathElement::new(
                            vec![seg.from, seg.to],
                            rgb(seg.color).mix(seg.opacity).stroke_width(*width),
                        )
                    }))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
            Layer::Labels(labels) => {
                for l in labels {
                    let family = if l.heading_font {
                        fonts.heading
                    } else {
                        fonts.body
                    };
                    let style = text_style(family, &l.style).pos(Pos::new(HPos::Left, VPos::Center));
                    chart
                        .draw_series(std::iter::once(Text::new(l.text.clone(), (l.x, l.y), style)))
                        .map_err(|e| anyhow!("{:?}", e))?;
                }
            }
        }
    }

    let tick = text_style(fonts.body, &theme.tick_label);
    for (v, s) in x.tick_labels() {
        let style = tick.pos(Pos::new(HPos::Center, VPos::Top));
        chart
            .draw_series(std::iter::once(
                EmptyElement::at((v, y.min)) + Text::new(s, (0, 6), style),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    for (v, s) in y.tick_labels() {
        let style = tick.pos(Pos::new(HPos::Right, VPos::Center));
        chart
            .draw_series(std::iter::once(
                EmptyElement::at((x.min, v)) + Text::new(s, (-6, 0), style),
            ))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;

    fn tagged(
        country: &str,
        region: &str,
        year: i32,
        le: f64,
        he: f64,
        cat: Category,
    ) -> TaggedRecord {
        TaggedRecord {
            record: Record {
                country: country.into(),
                year,
                life_exp: le,
                health_exp: he,
                population: None,
                region: Some(region.into()),
            },
            category: cat,
        }
    }

    #[test]
    fn ramp_follows_value_share() {
        let g = theme::Gradient {
            low: Rgb(0, 0, 0),
            high: Rgb(200, 0, 0),
            min_opacity: 0.3,
        };
        let segs = ramp_segments(&[(1000.0, 70.0), (2000.0, 71.0), (4000.0, 72.0)], &g);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].color, Rgb(100, 0, 0));
        assert!((segs[0].opacity - 0.5).abs() < 1e-9);
        assert_eq!(segs[1].color, Rgb(200, 0, 0));
        assert_eq!(segs[1].opacity, 1.0);

        let segs = ramp_segments(&[(0.0, 70.0), (100.0, 71.0), (4000.0, 72.0)], &g);
        assert_eq!(segs[0].opacity, 0.3);
    }

    #[test]
    fn layer_order_background_rest_mid_focus_labels() {
        let prepared = Prepared {
            variant: Variant::Base,
            rows: vec![
                tagged("United States", "Americas", 2001, 77.0, 5000.0, Category::Focus),
                tagged("United States", "Americas", 2000, 76.8, 4500.0, Category::Focus),
                tagged("Japan", "Asia", 2000, 81.0, 2000.0, Category::Highlighted),
                tagged("Mexico", "Americas", 2000, 74.0, 500.0, Category::Rest),
            ],
            summaries: Vec::new(),
            labels: vec![LabelEntry {
                country: "United States".into(),
                x: 5000.0,
                y: 77.0,
                text: "United States".into(),
                category: Category::Focus,
                region: None,
            }],
        };
        let chart = compose(&prepared, &ChartTheme::base());
        assert_eq!(chart.panels.len(), 1);
        let kinds: Vec<&str> = chart.panels[0]
            .layers
            .iter()
            .map(|l| match l {
                Layer::Background { .. } => "background",
                Layer::Lines { category: Category::Rest, .. } => "rest",
                Layer::Lines { .. } => "mid",
                Layer::Ramped { .. } => "focus",
                Layer::Labels(_) => "labels",
            })
            .collect();
        assert_eq!(kinds, vec!["background", "rest", "mid", "focus", "labels"]);

        // focus points are ordered by year
        match &chart.panels[0].layers[3] {
            Layer::Ramped { segments, .. } => {
                assert_eq!(segments.len(), 1);
                assert_eq!(segments[0].from, (4500.0, 76.8));
            }
            other => panic!("unexpected layer {other:?}"),
        }
    }

    #[test]
    fn fixed_domain_breaks_lines_instead_of_clamping() {
        let prepared = Prepared {
            variant: Variant::Base,
            rows: vec![
                tagged("Chad", "Africa", 2000, 47.6, 40.0, Category::Rest),
                tagged("Chad", "Africa", 2017, 53.7, 80.0, Category::Rest),
                tagged("Peru", "Americas", 2000, 71.0, 300.0, Category::Rest),
                tagged("Peru", "Americas", 2001, 69.0, 310.0, Category::Rest),
                tagged("Peru", "Americas", 2002, 72.0, 320.0, Category::Rest),
                tagged("Peru", "Americas", 2003, 72.5, 330.0, Category::Rest),
                tagged("United States", "Americas", 2000, 76.8, 4500.0, Category::Focus),
                tagged("United States", "Americas", 2001, 77.0, 11500.0, Category::Focus),
            ],
            summaries: Vec::new(),
            labels: Vec::new(),
        };
        let chart = compose(&prepared, &ChartTheme::base());
        let layers = &chart.panels[0].layers;

        let rest = layers.iter().find_map(|l| match l {
            Layer::Lines { category: Category::Rest, series, .. } => Some(series),
            _ => None,
        });
        let rest = rest.unwrap();
        assert!(rest.iter().all(|s| s.country != "Chad"));
        let peru: Vec<&Vec<(f64, f64)>> = rest
            .iter()
            .filter(|s| s.country == "Peru")
            .map(|s| &s.points)
            .collect();
        assert_eq!(
            peru,
            vec![&vec![(300.0, 71.0)], &vec![(320.0, 72.0), (330.0, 72.5)]]
        );

        // the only focus segment leaves the x domain
        assert!(!layers.iter().any(|l| matches!(l, Layer::Ramped { .. })));
    }

    #[test]
    fn facets_per_region_in_alphabetical_order() {
        let prepared = Prepared {
            variant: Variant::Regional,
            rows: vec![
                tagged("Spain", "Europe", 2000, 79.0, 1500.0, Category::Highlighted),
                tagged("Spain", "Europe", 2001, 79.5, 1600.0, Category::Highlighted),
                tagged("Kenya", "Africa", 2000, 55.0, 60.0, Category::TopN),
                tagged("Chad", "Africa", 2000, 48.0, 30.0, Category::Rest),
            ],
            summaries: Vec::new(),
            labels: Vec::new(),
        };
        let theme = ChartTheme::regional();
        let chart = compose(&prepared, &theme);
        let titles: Vec<&str> = chart
            .panels
            .iter()
            .map(|p| p.title.as_ref().map(|t| t.text.as_str()).unwrap_or(""))
            .collect();
        assert_eq!(titles, vec!["Africa", "Europe"]);
        assert_eq!(chart.columns, 2);
        assert_eq!(chart.panels[0].title.as_ref().unwrap().color, theme.region_color(0));

        // independently scaled axes
        assert!(chart.panels[0].y_axis.max < chart.panels[1].y_axis.min);
        assert!(chart.panels[0].y_axis.min <= 48.0);
        assert!(chart.panels[1].y_axis.min >= 70.0);

        // mid-tier lines take the region color
        let mid = chart.panels[0].layers.iter().find_map(|l| match l {
            Layer::Lines { category: Category::TopN, series, .. } => Some(series),
            _ => None,
        });
        assert_eq!(mid.unwrap()[0].color, theme.region_color(0));
    }
}
