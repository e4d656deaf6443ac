use crate::error::PipelineError;
use crate::models::{LabelEntry, RawTable, TaggedRecord};
use crate::stats::CountrySummary;
use anyhow::Result;
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Canonical names for the seven-column positional layout, in order.
pub const POSITIONAL_COLUMNS: [&str; 7] = [
    "country",
    "code",
    "year",
    "life_exp",
    "health_exp",
    "population",
    "region",
];

/// Read a comma-separated file with a header row into an untyped table.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<RawTable, PipelineError> {
    let f = File::open(path)?;
    read_csv(f)
}

/// Same as [`load_csv`] for any reader. Short rows are accepted and padded on access.
pub fn read_csv<R: Read>(rdr: R) -> Result<RawTable, PipelineError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(rdr);
    let headers = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        rows.push(rec.iter().map(|c| c.to_string()).collect());
    }
    Ok(RawTable { headers, rows })
}

/// Replace the headers of a seven-column table with [`POSITIONAL_COLUMNS`].
pub fn rename_positional(mut table: RawTable) -> Result<RawTable, PipelineError> {
    if table.headers.len() != POSITIONAL_COLUMNS.len() {
        return Err(PipelineError::PositionalSchema {
            expected: POSITIONAL_COLUMNS.len(),
            found: table.headers.len(),
        });
    }
    table.headers = POSITIONAL_COLUMNS.iter().map(|s| s.to_string()).collect();
    Ok(table)
}

/// Save tagged rows as CSV with header.
pub fn save_records_csv<P: AsRef<Path>>(rows: &[TaggedRecord], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize((
        "country",
        "year",
        "life_exp",
        "health_exp",
        "population",
        "region",
        "category",
    ))?;
    for t in rows {
        let r = &t.record;
        wtr.serialize((
            &r.country,
            r.year,
            r.life_exp,
            r.health_exp,
            r.population,
            &r.region,
            t.category.to_string(),
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the label table as CSV with header.
pub fn save_labels_csv<P: AsRef<Path>>(labels: &[LabelEntry], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("country", "x", "y", "text", "category", "region"))?;
    for l in labels {
        wtr.serialize((
            &l.country,
            l.x,
            l.y,
            &l.text,
            l.category.to_string(),
            &l.region,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save per-country aggregates as CSV; the header comes from the field names.
pub fn save_summaries_csv<P: AsRef<Path>>(summaries: &[CountrySummary], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    for s in summaries {
        wtr.serialize(s)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save any serializable table as a pretty JSON array.
pub fn save_json<T: Serialize, P: AsRef<Path>>(items: &[T], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(items)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Record};
    use tempfile::tempdir;

    #[test]
    fn reads_short_rows() {
        let data = "Entity,Year,Value\nA,2000,1\nB,2001\n";
        let t = read_csv(data.as_bytes()).unwrap();
        assert_eq!(t.headers, vec!["Entity", "Year", "Value"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[1], vec!["B", "2001"]);
    }

    #[test]
    fn positional_rename_requires_seven_columns() {
        let t = read_csv("a,b,c\n1,2,3\n".as_bytes()).unwrap();
        match rename_positional(t) {
            Err(PipelineError::PositionalSchema { expected, found }) => {
                assert_eq!((expected, found), (7, 3));
            }
            other => panic!("unexpected: {other:?}"),
        }

        let t = read_csv("E,C,Y,L,H,P,R\nX,XXX,2000,70,100,1,Asia\n".as_bytes()).unwrap();
        let t = rename_positional(t).unwrap();
        assert_eq!(t.headers[3], "life_exp");
        assert_eq!(t.rows[0][6], "Asia");
    }

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let rows = vec![TaggedRecord {
            record: Record {
                country: "Germany".into(),
                year: 2000,
                life_exp: 78.0,
                health_exp: 2600.0,
                population: None,
                region: Some("Europe".into()),
            },
            category: Category::Highlighted,
        }];
        save_records_csv(&rows, &csvp).unwrap();
        save_json(&rows, &jsonp).unwrap();
        let text = std::fs::read_to_string(&csvp).unwrap();
        assert!(text.starts_with("country,year,life_exp"));
        assert!(text.contains("Germany,2000,78.0,2600.0,,Europe,highlighted"));
        assert!(jsonp.exists());
    }
}
