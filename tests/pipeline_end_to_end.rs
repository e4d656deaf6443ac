use healthspan::models::RawTable;
use healthspan::pipeline::{load_and_prepare, prepare};
use healthspan::storage::read_csv;
use healthspan::{Category, PipelineConfig, PipelineError, Variant};
use std::collections::BTreeSet;

const THREE_BY_THREE: &str = "\
Entity,Year,Life expectancy at birth,Health expenditure per capita
A,2000,70.0,1000
A,2001,71.0,1200
A,2002,72.0,1400
B,2000,75.0,3000
B,2001,75.0,3000
B,2002,75.0,3000
C,2000,60.0,500
C,2001,,550
C,2002,61.0,600
";

fn key_config(key: &[&str]) -> PipelineConfig {
    PipelineConfig {
        focus: None,
        key_countries: key.iter().map(|s| s.to_string()).collect(),
        manual_labels: Vec::new(),
        nudges: Vec::new(),
        ..PipelineConfig::base()
    }
}

fn table(csv: &str) -> RawTable {
    read_csv(csv.as_bytes()).unwrap()
}

#[test]
fn drops_only_the_incomplete_row() {
    let prepared = prepare(table(THREE_BY_THREE), &key_config(&["A", "B"])).unwrap();
    assert_eq!(prepared.rows.len(), 8);
    let count = |c: &str| prepared.rows.iter().filter(|t| t.record.country == c).count();
    assert_eq!(count("A"), 3);
    assert_eq!(count("B"), 3);
    assert_eq!(count("C"), 2);
    assert!(
        prepared
            .rows
            .iter()
            .all(|t| t.record.life_exp.is_finite() && t.record.health_exp.is_finite())
    );

    let labelled: Vec<&str> = prepared.labels.iter().map(|l| l.country.as_str()).collect();
    assert_eq!(labelled, vec!["A", "B"]);
    // latest-year anchor, no nudge
    assert_eq!((prepared.labels[0].x, prepared.labels[0].y), (1400.0, 72.0));
    assert_eq!((prepared.labels[1].x, prepared.labels[1].y), (3000.0, 75.0));
}

#[test]
fn country_without_rows_gets_no_label() {
    let csv = "\
Entity,Year,Life expectancy,Health expenditure per capita
A,2000,70,1000
D,1999,65,400
D,2000,n/a,410
";
    let prepared = prepare(table(csv), &key_config(&["A", "D"])).unwrap();
    assert_eq!(prepared.labels.len(), 1);
    assert_eq!(prepared.labels[0].country, "A");
}

#[test]
fn tags_are_per_country_with_precedence() {
    let cfg = PipelineConfig {
        focus: Some("A".into()),
        ..key_config(&["A", "B"])
    };
    let prepared = prepare(table(THREE_BY_THREE), &cfg).unwrap();
    for t in &prepared.rows {
        let expected = match t.record.country.as_str() {
            "A" => Category::Focus,
            "B" => Category::Highlighted,
            _ => Category::Rest,
        };
        assert_eq!(t.category, expected, "{}", t.record.country);
    }
}

#[test]
fn base_keeps_years_after_2017() {
    let csv = "\
Entity,Year,Life expectancy,Health expenditure per capita
A,1999,70,1000
A,2000,70,1000
A,2019,72,1500
";
    let prepared = prepare(table(csv), &key_config(&[])).unwrap();
    let years: Vec<i32> = prepared.rows.iter().map(|t| t.record.year).collect();
    assert_eq!(years, vec![2000, 2019]);
}

const POSITIONAL: &str = "\
Entity,Code,Year,Life expectancy,Health expenditure,Population,Continent
Germany,DEU,2000,78.0,2600,82000000,Europe
Germany,DEU,2017,81.0,5800,83000000,
Germany,DEU,2018,81.2,6000,83000000,
France,FRA,2000,79.0,2500,60000000,Europe
France,FRA,2017,82.5,4900,66000000,
Spain,ESP,2000,79.2,1500,40000000,
Spain,ESP,2017,83.0,3300,46000000,
United States,USA,2000,76.8,4500,282000000,
United States,USA,2017,78.5,10200,325000000,North America
Canada,CAN,2000,79.0,2500,31000000,
Canada,CAN,2017,82.0,5100,36000000,
Brazil,BRA,2000,70.0,500,175000000,
Brazil,BRA,2017,75.0,1400,207000000,South America
";

#[test]
fn regional_variant_end_to_end() {
    let cfg = PipelineConfig {
        top_n: 2,
        ..PipelineConfig::regional()
    };
    let prepared = prepare(table(POSITIONAL), &cfg).unwrap();
    assert_eq!(prepared.variant, Variant::Regional);
    assert!(prepared.rows.iter().all(|t| (2000..=2017).contains(&t.record.year)));

    let region = |c: &str| {
        prepared
            .rows
            .iter()
            .find(|t| t.record.country == c)
            .and_then(|t| t.record.region.clone())
    };
    // propagated from another row of the same country
    assert_eq!(region("Germany").as_deref(), Some("Europe"));
    // name table
    assert_eq!(region("Spain").as_deref(), Some("Europe"));
    // split patch
    assert_eq!(region("Canada").as_deref(), Some("North America"));
    assert_eq!(region("Brazil").as_deref(), Some("South America"));

    let category = |c: &str| {
        prepared
            .rows
            .iter()
            .find(|t| t.record.country == c)
            .map(|t| t.category)
    };
    // Europe: Germany has the largest spending change; Spain and France lead on mean
    assert_eq!(category("Germany"), Some(Category::Highlighted));
    assert_eq!(category("Spain"), Some(Category::TopN));
    assert_eq!(category("France"), Some(Category::TopN));
    assert_eq!(category("United States"), Some(Category::Highlighted));
    assert_eq!(category("Canada"), Some(Category::TopN));

    let highlighted: BTreeSet<&str> = prepared
        .labels
        .iter()
        .map(|l| l.country.as_str())
        .collect();
    assert_eq!(
        highlighted,
        BTreeSet::from(["Brazil", "Germany", "United States"])
    );
    let us = prepared
        .labels
        .iter()
        .find(|l| l.country == "United States")
        .unwrap();
    assert_eq!((us.x, us.y), (10800.0, 79.5));
}

#[test]
fn regional_requires_seven_columns() {
    let csv = "Entity,Year,Life expectancy,Health expenditure per capita\nA,2000,70,1000\n";
    let err = prepare(table(csv), &PipelineConfig::regional()).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::PositionalSchema {
            expected: 7,
            found: 4
        }
    ));
}

#[test]
fn empty_after_filtering_is_an_error() {
    let csv = "Entity,Year,Life expectancy,Health expenditure per capita\nA,1990,70,1000\n";
    let err = prepare(table(csv), &key_config(&[])).unwrap_err();
    assert!(matches!(err, PipelineError::EmptyTable));
}

#[test]
fn loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("panel.csv");
    std::fs::write(&path, THREE_BY_THREE).unwrap();
    let prepared = load_and_prepare(&path, &key_config(&["A", "B"])).unwrap();
    assert_eq!(prepared.summaries.len(), 3);
    let a = &prepared.summaries[0];
    assert_eq!((a.country.as_str(), a.count, a.latest_year), ("A", 3, 2002));
    assert!((a.mean_life_exp - 71.0).abs() < 1e-9);
}
