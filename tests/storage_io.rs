use healthspan::models::{Category, LabelEntry};
use healthspan::pipeline::prepare;
use healthspan::storage::{
    load_csv, read_csv, save_json, save_labels_csv, save_records_csv, save_summaries_csv,
};
use healthspan::{PipelineConfig, TaggedRecord};
use std::fs;

const PANEL: &str = "\
Entity,Year,Life expectancy,Health expenditure per capita
Japan,2000,81.1,1800
Japan,2017,84.1,4200
";

#[test]
fn load_trims_headers() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("in.csv");
    fs::write(&p, " Entity , Year ,Life expectancy\nJapan,2000,81\n").unwrap();
    let t = load_csv(&p).unwrap();
    assert_eq!(t.headers, vec!["Entity", "Year", "Life expectancy"]);
    assert_eq!(t.column_index("Year"), Some(1));
}

#[test]
fn tables_save_as_csv_and_json() {
    let table = read_csv(PANEL.as_bytes()).unwrap();
    let prepared = prepare(table, &PipelineConfig::base()).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let rows_csv = dir.path().join("rows.csv");
    save_records_csv(&prepared.rows, &rows_csv).unwrap();
    let text = fs::read_to_string(&rows_csv).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(text.contains("Japan,2017,84.1,4200.0,,Asia,highlighted"));

    let rows_json = dir.path().join("rows.json");
    save_json(&prepared.rows, &rows_json).unwrap();
    let back: Vec<TaggedRecord> =
        serde_json::from_str(&fs::read_to_string(&rows_json).unwrap()).unwrap();
    assert_eq!(back, prepared.rows);

    let summary_csv = dir.path().join("summary.csv");
    save_summaries_csv(&prepared.summaries, &summary_csv).unwrap();
    let text = fs::read_to_string(&summary_csv).unwrap();
    assert!(text.starts_with("country,region,count,mean_life_exp"));
    assert!(text.contains("Japan,Asia,2,"));
}

#[test]
fn label_table_csv() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("labels.csv");
    let labels = vec![LabelEntry {
        country: "United States".into(),
        x: 8600.0,
        y: 80.0,
        text: "United States".into(),
        category: Category::Highlighted,
        region: Some("North America".into()),
    }];
    save_labels_csv(&labels, &p).unwrap();
    let text = fs::read_to_string(&p).unwrap();
    assert_eq!(
        text,
        "country,x,y,text,category,region\n\
         United States,8600.0,80.0,United States,highlighted,North America\n"
    );
}
