//! Font acquisition and registration.
//!
//! Each [`FontSpec`] family is looked up, in order, in a local font directory,
//! the on-disk cache, and the Google Fonts CSS2 service. The bytes are registered
//! with plotters under its alias. When a family cannot be obtained the
//! run continues with the default `sans-serif` face.
//!
//! The `ab_glyph` text path does not discover OS fonts, so the default face is
//! itself registered from the first well-known system font file that exists.

use super::theme::{ChartTheme, FontSpec};
use anyhow::{Context, Result, anyhow, bail};
use log::{debug, warn};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use plotters::style::{FontStyle, register_font};
use regex::Regex;
use reqwest::blocking::Client as HttpClient;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

pub const DEFAULT_FACE: &str = "sans-serif";

const SYSTEM_FALLBACKS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const CSS_ENDPOINT: &str = "https://fonts.googleapis.com/css2";

// Keep `-` unescaped; spaces become `+` afterwards.
const FAMILY_SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b' ');

/// Where fonts may come from.
#[derive(Debug, Clone, Default)]
pub struct FontSource {
    /// Directory searched first for `<Family>-Regular.ttf` / `<Family>-Bold.ttf`.
    pub font_dir: Option<PathBuf>,
    /// Cache directory for downloaded fonts; `None` disables caching.
    pub cache_dir: Option<PathBuf>,
    /// Allow fetching from the web font service.
    pub online: bool,
}

impl FontSource {
    /// Online, cached under the user cache directory.
    pub fn standard() -> Self {
        Self {
            font_dir: None,
            cache_dir: dirs::cache_dir().map(|d| d.join("healthspan").join("fonts")),
            online: true,
        }
    }

    pub fn offline(font_dir: Option<PathBuf>) -> Self {
        Self {
            font_dir,
            cache_dir: dirs::cache_dir().map(|d| d.join("healthspan").join("fonts")),
            online: false,
        }
    }
}

/// Faces to draw with, after registration.
///
/// `heading`/`body` are the plotters registration names used by the bitmap
/// backend. `heading_family`/`body_family` are the real family names written
/// into SVG output, where a viewer resolves them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFaces {
    pub heading: String,
    pub body: String,
    pub heading_family: String,
    pub body_family: String,
    /// At least one family fell back to [`DEFAULT_FACE`].
    pub degraded: bool,
}

impl FontFaces {
    /// Both roles on the default face, without touching any source.
    pub fn fallback() -> Self {
        ensure_default_face();
        Self {
            heading: DEFAULT_FACE.into(),
            body: DEFAULT_FACE.into(),
            heading_family: DEFAULT_FACE.into(),
            body_family: DEFAULT_FACE.into(),
            degraded: true,
        }
    }
}

fn registered() -> &'static Mutex<HashSet<String>> {
    static REGISTERED: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
    REGISTERED.get_or_init(|| Mutex::new(HashSet::new()))
}

fn is_registered(alias: &str) -> bool {
    registered().lock().map(|s| s.contains(alias)).unwrap_or(false)
}

fn mark_registered(alias: &str) {
    if let Ok(mut s) = registered().lock() {
        s.insert(alias.to_string());
    }
}

/// Register `regular` (and `bold`, or `regular` again) under `alias`.
fn register_family(alias: &str, regular: Vec<u8>, bold: Option<Vec<u8>>) -> Result<()> {
    // plotters keeps `&'static` font data for the lifetime of the process.
    let regular: &'static [u8] = Box::leak(regular.into_boxed_slice());
    let bold: &'static [u8] = match bold {
        Some(b) => Box::leak(b.into_boxed_slice()),
        None => regular,
    };
    register_font(alias, FontStyle::Normal, regular)
        .map_err(|_| anyhow!("invalid font data for {alias}"))?;
    register_font(alias, FontStyle::Bold, bold)
        .map_err(|_| anyhow!("invalid bold font data for {alias}"))?;
    mark_registered(alias);
    Ok(())
}

/// Register the default face once, from the first system font that exists.
fn ensure_default_face() {
    if is_registered(DEFAULT_FACE) {
        return;
    }
    for path in SYSTEM_FALLBACKS {
        if let Ok(bytes) = std::fs::read(path) {
            match register_family(DEFAULT_FACE, bytes, None) {
                Ok(()) => {
                    debug!("default face registered from {path}");
                    return;
                }
                Err(e) => debug!("skipping {path}: {e:#}"),
            }
        }
    }
    warn!("no system font found for {DEFAULT_FACE}; raster text may fail, SVG output is unaffected");
}

fn file_stem(family: &str) -> String {
    family.split_whitespace().collect::<Vec<_>>().join("")
}

fn read_pair(dir: &Path, family: &str) -> Option<(Vec<u8>, Option<Vec<u8>>)> {
    let stem = file_stem(family);
    let regular = std::fs::read(dir.join(format!("{stem}-Regular.ttf"))).ok()?;
    let bold = std::fs::read(dir.join(format!("{stem}-Bold.ttf"))).ok();
    Some((regular, bold))
}

fn write_cache(dir: &Path, family: &str, regular: &[u8], bold: Option<&[u8]>) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let stem = file_stem(family);
    std::fs::write(dir.join(format!("{stem}-Regular.ttf")), regular)?;
    if let Some(b) = bold {
        std::fs::write(dir.join(format!("{stem}-Bold.ttf")), b)?;
    }
    Ok(())
}

/// CSS2 request URL for the regular and bold weights of `family`.
pub fn css_url(family: &str) -> String {
    let enc = utf8_percent_encode(family.trim(), FAMILY_SAFE)
        .to_string()
        .replace(' ', "+");
    format!("{CSS_ENDPOINT}?family={enc}:wght@400;700")
}

/// Extract `(weight, url)` for every truetype `@font-face` block of a CSS2 response.
pub fn parse_font_faces(css: &str) -> Result<Vec<(u16, String)>> {
    let block = Regex::new(r"(?s)@font-face\s*\{(.*?)\}")?;
    let weight = Regex::new(r"font-weight:\s*(\d+)")?;
    let src = Regex::new(r"src:\s*url\(\s*'?([^)']+)'?\s*\)")?;
    let mut out = Vec::new();
    for cap in block.captures_iter(css) {
        let body = &cap[1];
        let Some(url) = src.captures(body).map(|c| c[1].to_string()) else {
            continue;
        };
        let w = weight
            .captures(body)
            .and_then(|c| c[1].parse::<u16>().ok())
            .unwrap_or(400);
        out.push((w, url));
    }
    Ok(out)
}

fn fetch_family(family: &str) -> Result<(Vec<u8>, Option<Vec<u8>>)> {
    let http = HttpClient::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        // A plain user agent gets truetype sources rather than woff2.
        .user_agent(concat!("healthspan/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building HTTP client")?;

    let url = css_url(family);
    let resp = http.get(&url).send().with_context(|| format!("GET {url}"))?;
    if !resp.status().is_success() {
        bail!("font service returned HTTP {} for {family}", resp.status());
    }
    let css = resp.text().context("reading font CSS")?;
    let faces = parse_font_faces(&css)?;

    let get = |u: &str| -> Result<Vec<u8>> {
        let r = http.get(u).send().with_context(|| format!("GET {u}"))?;
        if !r.status().is_success() {
            bail!("font download failed with HTTP {}", r.status());
        }
        Ok(r.bytes().context("reading font bytes")?.to_vec())
    };

    let regular_url = faces
        .iter()
        .find(|(w, _)| *w == 400)
        .or_else(|| faces.first())
        .map(|(_, u)| u.clone())
        .ok_or_else(|| anyhow!("no font sources for {family}"))?;
    let regular = get(&regular_url)?;
    let bold = match faces.iter().find(|(w, _)| *w >= 700) {
        Some((_, u)) => Some(get(u)?),
        None => None,
    };
    Ok((regular, bold))
}

fn acquire(spec: &FontSpec, source: &FontSource) -> Result<()> {
    if is_registered(&spec.alias) {
        return Ok(());
    }
    let local = source
        .font_dir
        .as_deref()
        .and_then(|d| read_pair(d, &spec.family))
        .or_else(|| {
            source
                .cache_dir
                .as_deref()
                .and_then(|d| read_pair(d, &spec.family))
        });
    let (regular, bold) = match local {
        Some(pair) => pair,
        None if source.online => {
            let pair = fetch_family(&spec.family)?;
            if let Some(dir) = source.cache_dir.as_deref()
                && let Err(e) = write_cache(dir, &spec.family, &pair.0, pair.1.as_deref())
            {
                debug!("font cache not written: {e:#}");
            }
            pair
        }
        None => bail!("{} not available offline", spec.family),
    };
    register_family(&spec.alias, regular, bold)
}

/// Register the theme's heading and body families, falling back per role.
pub fn register_theme_fonts(theme: &ChartTheme, source: &FontSource) -> FontFaces {
    let mut degraded = false;
    let mut resolve = |spec: &FontSpec| match acquire(spec, source) {
        Ok(()) => {
            debug!("font {} registered as {}", spec.family, spec.alias);
            (spec.alias.clone(), spec.family.clone())
        }
        Err(e) => {
            warn!(
                "font {} unavailable ({e:#}); using {DEFAULT_FACE}",
                spec.family
            );
            degraded = true;
            ensure_default_face();
            (DEFAULT_FACE.to_string(), DEFAULT_FACE.to_string())
        }
    };
    let (heading, heading_family) = resolve(&theme.heading_font);
    let (body, body_family) = resolve(&theme.body_font);
    FontFaces {
        heading,
        body,
        heading_family,
        body_family,
        degraded,
    }
}
