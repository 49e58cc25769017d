use super::*;
use std::path::PathBuf;

const EPS: f64 = 1e-10;

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

#[test]
fn test_identical_distributions_have_zero_divergence() {
    let p = Distribution::new([0.9, 0.1]).unwrap();
    assert_eq!(kl_divergence_bits(&p, &p, EPS), 0.0);

    let r = Distribution::new([0.0, 0.2, 0.0, 0.8]).unwrap();
    assert_eq!(kl_divergence_bits(&r, &r, EPS), 0.0);
}

#[test]
fn test_opposite_one_hot_is_large() {
    let high = Distribution::new([1.0, 0.0]).unwrap();
    let low = Distribution::new([0.0, 1.0]).unwrap();
    let kl = kl_divergence_bits(&high, &low, EPS);
    assert!(kl > 10.0, "kl = {kl}");
    assert!((kl - 33.2193).abs() < 1e-3);
}

#[test]
fn test_known_value_and_asymmetry() {
    let p = Distribution::new([0.5, 0.5]).unwrap();
    let q = Distribution::new([0.9, 0.1]).unwrap();
    // 0.5*log2(0.5/0.9) + 0.5*log2(0.5/0.1) = 0.736966
    assert!((kl_divergence_bits(&p, &q, EPS) - 0.736966).abs() < 1e-5);
    // 0.9*log2(0.9/0.5) + 0.1*log2(0.1/0.5) = 0.531004
    assert!((kl_divergence_bits(&q, &p, EPS) - 0.531004).abs() < 1e-5);
}

#[test]
fn test_divergence_is_never_negative() {
    let cases = [
        ([0.2, 0.8], [0.2, 0.8]),
        ([0.0, 0.0], [0.0, 0.0]),
        ([0.3, 0.3], [0.6, 0.6]),
        ([0.4, 0.6], [0.7, 0.3]),
    ];
    for (p, q) in cases {
        let p = Distribution::new(p).unwrap();
        let q = Distribution::new(q).unwrap();
        assert!(kl_divergence_bits(&p, &q, EPS) >= 0.0);
    }
}

#[test]
fn test_zero_epsilon_unsupported_reference_is_infinite() {
    let p = Distribution::new([0.5, 0.5]).unwrap();
    let q = Distribution::new([1.0, 0.0]).unwrap();
    assert!(kl_divergence_bits(&p, &q, 0.0).is_infinite());
    assert_eq!(kl_divergence_bits(&q, &p, 0.0), 1.0);
}

#[test]
fn test_run_stage5_pairs_by_category() {
    let config = ScoringConfig::default_v1();
    let data = dataset(vec![
        record("pilot", Direction::Low, [0.9, 0.1], [0.25; 4]),
        record("nurse", Direction::High, [1.0, 0.0], [0.25; 4]),
        record("astronaut", Direction::High, [0.5, 0.5], [0.25; 4]),
        record("pilot", Direction::High, [0.9, 0.1], [0.25; 4]),
        record("nurse", Direction::Low, [0.0, 1.0], [0.25; 4]),
        // Later duplicates are ignored.
        record("pilot", Direction::High, [0.1, 0.9], [0.25; 4]),
    ]);
    let out = run_stage5(&data, &config);

    assert_eq!(out.skipped, vec!["astronaut".to_string()]);
    let rows = &out.table.rows;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].category, "nurse");
    assert_eq!(rows[1].category, "pilot");
    assert!(rows[0].divergence.gender > 10.0);
    assert_eq!(rows[0].divergence.race, 0.0);
    assert_eq!(rows[1].divergence.gender, 0.0);

    let avg = out.table.average.unwrap();
    assert_eq!(avg.gender, round_to(rows[0].divergence.gender / 2.0, 4));
    assert_eq!(avg.race, 0.0);
    assert_eq!(out.summary(), avg);
}

#[test]
fn test_empty_table_averages_to_zero() {
    let config = ScoringConfig::default_v1();
    let data = dataset(vec![record("nurse", Direction::High, [0.5, 0.5], [0.25; 4])]);
    let out = run_stage5(&data, &config);
    assert!(out.table.is_empty());
    assert_eq!(out.table.average, Some(AxisPair::default()));
    assert_eq!(out.summary(), AxisPair { gender: 0.0, race: 0.0 });
}
