use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use healthspan::pipeline::{self, Prepared};
use healthspan::viz::{self, ChartTheme, FontSource};
use healthspan::{PipelineConfig, Variant, storage};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "healthspan",
    version,
    about = "Chart life expectancy against health expenditure per capita"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prepare the data and draw the chart.
    Render(RenderArgs),
    /// Print (or save) the computed label table.
    Labels(TableArgs),
    /// Print (or save) per-country aggregates.
    Summary(TableArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum VariantArg {
    Base,
    Regional,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Base => Variant::Base,
            VariantArg::Regional => Variant::Regional,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct Source {
    /// Input CSV (country-year panel).
    #[arg(short, long)]
    input: PathBuf,
    /// Chart variant; ignored when --config is given.
    #[arg(long, value_enum, default_value_t = VariantArg::Base)]
    variant: VariantArg,
    /// Pipeline configuration as JSON, replacing the variant preset.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Source {
    fn config(&self) -> Result<PipelineConfig> {
        match &self.config {
            Some(p) => Ok(PipelineConfig::from_json_file(p)
                .with_context(|| format!("loading config {}", p.display()))?),
            None => Ok(PipelineConfig::for_variant(self.variant.into())),
        }
    }

    fn prepare(&self) -> Result<Prepared> {
        let cfg = self.config()?;
        let prepared = pipeline::load_and_prepare(&self.input, &cfg)
            .with_context(|| format!("preparing {}", self.input.display()))?;
        Ok(prepared)
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    source: Source,
    /// Chart output path (.svg or .png).
    #[arg(short, long)]
    out: PathBuf,
    /// Theme as JSON, replacing the variant's preset.
    #[arg(long)]
    theme: Option<PathBuf>,
    /// Width of the chart (default 1200).
    #[arg(long, default_value_t = 1200)]
    width: u32,
    /// Height of the chart (default 800).
    #[arg(long, default_value_t = 800)]
    height: u32,
    /// Directory searched first for `<Family>-Regular.ttf` / `<Family>-Bold.ttf`.
    #[arg(long)]
    font_dir: Option<PathBuf>,
    /// Never contact the web font service.
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Also save the normalized, tagged rows (format inferred from extension).
    #[arg(long)]
    rows: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TableArgs {
    #[command(flatten)]
    source: Source,
    /// Save to file instead of printing.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Labels(args) => cmd_labels(args),
        Command::Summary(args) => cmd_summary(args),
    }
}

fn out_format(path: &Path, explicit: Option<OutFormat>) -> Result<OutFormat> {
    if let Some(f) = explicit {
        return Ok(f);
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("csv")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Ok(OutFormat::Csv),
        "json" => Ok(OutFormat::Json),
        other => bail!("unsupported format: {}", other),
    }
}

fn fmt_num(v: f64) -> String {
    let s = format!("{:.2}", v);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let prepared = args.source.prepare()?;

    if let Some(path) = args.rows.as_ref() {
        match out_format(path, None)? {
            OutFormat::Csv => storage::save_records_csv(&prepared.rows, path)?,
            OutFormat::Json => storage::save_json(&prepared.rows, path)?,
        }
        eprintln!("Saved {} rows to {}", prepared.rows.len(), path.display());
    }

    let theme = match &args.theme {
        Some(p) => ChartTheme::from_json_file(p)?,
        None => match prepared.variant {
            Variant::Base => ChartTheme::base(),
            Variant::Regional => ChartTheme::regional(),
        },
    };
    let source = if args.offline {
        FontSource::offline(args.font_dir.clone())
    } else {
        FontSource {
            font_dir: args.font_dir.clone(),
            ..FontSource::standard()
        }
    };
    let fonts = viz::register_theme_fonts(&theme, &source);
    if fonts.degraded {
        eprintln!("Some fonts were unavailable; drawing with {}", viz::fonts::DEFAULT_FACE);
    }

    let chart = viz::compose(&prepared, &theme);
    viz::render(&chart, &theme, &fonts, &args.out, args.width, args.height)?;
    eprintln!("Wrote chart to {}", args.out.display());
    Ok(())
}

fn cmd_labels(args: TableArgs) -> Result<()> {
    let prepared = args.source.prepare()?;
    let labels = &prepared.labels;

    if let Some(path) = args.out.as_ref() {
        match out_format(path, args.format)? {
            OutFormat::Csv => storage::save_labels_csv(labels, path)?,
            OutFormat::Json => storage::save_json(labels, path)?,
        }
        eprintln!("Saved {} labels to {}", labels.len(), path.display());
        return Ok(());
    }
    if matches!(args.format, Some(OutFormat::Json)) {
        println!("{}", serde_json::to_string_pretty(labels)?);
        return Ok(());
    }
    for l in labels {
        println!(
            "{} • {}  x={} y={}  region={}",
            l.country,
            l.category,
            fmt_num(l.x),
            fmt_num(l.y),
            l.region.as_deref().unwrap_or("NA")
        );
    }
    Ok(())
}

fn cmd_summary(args: TableArgs) -> Result<()> {
    let prepared = args.source.prepare()?;
    let summaries = &prepared.summaries;

    if let Some(path) = args.out.as_ref() {
        match out_format(path, args.format)? {
            OutFormat::Csv => storage::save_summaries_csv(summaries, path)?,
            OutFormat::Json => storage::save_json(summaries, path)?,
        }
        eprintln!("Saved {} summaries to {}", summaries.len(), path.display());
        return Ok(());
    }
    if matches!(args.format, Some(OutFormat::Json)) {
        println!("{}", serde_json::to_string_pretty(summaries)?);
        return Ok(());
    }
    for s in summaries {
        println!(
            "{}  count={} latest={}  life_exp min={} max={} mean={}  health_exp min={} max={}",
            s.country,
            s.count,
            s.latest_year,
            fmt_num(s.min_life_exp),
            fmt_num(s.max_life_exp),
            fmt_num(s.mean_life_exp),
            fmt_num(s.min_health_exp),
            fmt_num(s.max_health_exp)
        );
    }
    Ok(())
}
