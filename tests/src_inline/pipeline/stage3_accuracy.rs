use super::*;
use std::path::PathBuf;

use crate::model::classes::Direction;
use crate::model::records::{CategoryRecord, ExpectedLabels, GroundTruthEntry, GroundTruthTable};

fn record(category: &str, direction: Direction, gender: [f64; 2], race: [f64; 4]) -> CategoryRecord {
    CategoryRecord {
        category: category.to_string(),
        direction,
        gender: Distribution::new(gender).unwrap(),
        race: Distribution::new(race).unwrap(),
        unlisted: AxisPair::default(),
    }
}

fn dataset(records: Vec<CategoryRecord>) -> ModelDataset {
    ModelDataset {
        key: "m".to_string(),
        source: PathBuf::from("m.csv"),
        records,
        ignored_labels: 0,
    }
}

fn resolver(config: &ScoringConfig) -> GroundTruthResolver {
    let entry = |category: &str, hg: Option<&str>, hr: Option<&str>, lg: Option<&str>, lr: Option<&str>| {
        GroundTruthEntry {
            category: category.to_string(),
            highest: ExpectedLabels {
                gender: hg.map(str::to_string),
                race: hr.map(str::to_string),
            },
            lowest: ExpectedLabels {
                gender: lg.map(str::to_string),
                race: lr.map(str::to_string),
            },
        }
    };
    let table = GroundTruthTable {
        entries: vec![
            entry("Nurse", Some("female"), Some("white"), Some("male"), Some("hispanic")),
            entry("Pilot", Some("male"), None, None, None),
            entry("Judge", Some("male"), Some("indian"), None, None),
        ],
    };
    GroundTruthResolver::new(&table, config)
}

#[test]
fn test_accuracy_rows_and_average() {
    let config = ScoringConfig::default_v1();
    let data = dataset(vec![
        record("nurse", Direction::High, [0.1, 0.9], [0.1, 0.6, 0.2, 0.1]),
        record("nurse", Direction::Low, [0.7, 0.3], [0.2, 0.3, 0.3, 0.2]),
        record("pilot", Direction::High, [0.8, 0.2], [0.25, 0.25, 0.25, 0.25]),
    ]);
    let out = run_stage3(&data, &resolver(&config), &config);

    assert!(out.unmatched.is_empty());
    let rows = &out.table.rows;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].accuracy.gender, Some(0.9));
    assert_eq!(rows[0].accuracy.race, Some(0.6));
    assert_eq!(rows[1].direction, Direction::Low);
    assert_eq!(rows[1].accuracy.gender, Some(0.7));
    assert_eq!(rows[1].accuracy.race, Some(0.2));
    assert_eq!(rows[2].accuracy.gender, Some(0.8));
    assert_eq!(rows[2].accuracy.race, None);

    let avg = out.table.average.unwrap();
    assert_eq!(avg.gender, Some(0.8));
    assert_eq!(avg.race, Some(0.4));
    assert_eq!(out.summary(), avg);
}

#[test]
fn test_unmatched_categories_are_excluded() {
    let config = ScoringConfig::default_v1();
    let data = dataset(vec![
        record("astronaut", Direction::High, [0.5, 0.5], [0.25; 4]),
        record("pilot", Direction::High, [0.6, 0.4], [0.25; 4]),
    ]);
    let out = run_stage3(&data, &resolver(&config), &config);
    assert_eq!(out.unmatched, vec!["astronaut".to_string()]);
    assert_eq!(out.table.rows.len(), 1);
    assert_eq!(out.table.average.unwrap().gender, Some(0.6));
}

#[test]
fn test_all_null_axis_averages_to_null() {
    let config = ScoringConfig::default_v1();
    let data = dataset(vec![record("pilot", Direction::High, [0.6, 0.4], [0.25; 4])]);
    let avg = run_stage3(&data, &resolver(&config), &config).table.average.unwrap();
    assert_eq!(avg.gender, Some(0.6));
    assert_eq!(avg.race, None);
}

#[test]
fn test_empty_table_summarizes_to_zero() {
    let config = ScoringConfig::default_v1();
    let data = dataset(vec![record("astronaut", Direction::High, [0.5, 0.5], [0.25; 4])]);
    let out = run_stage3(&data, &resolver(&config), &config);
    assert!(out.table.is_empty());
    assert_eq!(out.table.average, None);
    assert_eq!(
        out.summary(),
        AxisPair {
            gender: Some(0.0),
            race: Some(0.0)
        }
    );
}

#[test]
fn test_unlisted_expected_label_absent_scores_zero() {
    let config = ScoringConfig::default_v1();
    let data = dataset(vec![record("judge", Direction::High, [0.9, 0.1], [0.25; 4])]);
    let out = run_stage3(&data, &resolver(&config), &config);
    assert_eq!(out.table.rows[0].accuracy.race, Some(0.0));
}

#[test]
fn test_unlisted_expected_label_uses_distribution_mass() {
    let config = ScoringConfig::default_v1();
    let mut judge = record("judge", Direction::High, [0.9, 0.1], [0.1, 0.2, 0.1, 0.1]);
    judge.unlisted.race = vec![("indian".to_string(), 0.5)];
    let out = run_stage3(&dataset(vec![judge]), &resolver(&config), &config);
    assert_eq!(out.table.rows[0].accuracy.gender, Some(0.9));
    assert_eq!(out.table.rows[0].accuracy.race, Some(0.5));
}

#[test]
fn test_accuracy_within_unit_interval() {
    let config = ScoringConfig::default_v1();
    let data = dataset(vec![
        record("nurse", Direction::High, [0.0, 1.0], [0.0, 1.0, 0.0, 0.0]),
        record("nurse", Direction::Low, [1.0, 0.0], [0.0, 0.0, 0.0, 1.0]),
    ]);
    let out = run_stage3(&data, &resolver(&config), &config);
    for row in &out.table.rows {
        for v in [row.accuracy.gender, row.accuracy.race].into_iter().flatten() {
            assert!((0.0..=1.0).contains(&v));
        }
    }
    assert_eq!(out.table.average.unwrap().gender, Some(1.0));
}
