use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn write_temp_config(contents: &str) -> std::path::PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("t2i_fairscore_config_{}_{}", std::process::id(), id));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.json");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_default_profile() {
    let config = ScoringConfig::default_v1();
    config.validate().unwrap();
    assert_eq!(config.decimals, 4);
    assert_eq!(config.entropy_epsilon, 1e-10);
    assert_eq!(config.kl_epsilon, 1e-10);
    assert_eq!(config.attributes, vec![Axis::Gender, Axis::Race]);
    assert_eq!(config.label_policy, LabelPolicy::Ignore);

    let keys = config.models.iter().map(|m| m.key.as_str()).collect::<Vec<_>>();
    assert_eq!(keys, vec!["flux-1.1-pro", "dalle3", "midjourney", "sdxl_turbo"]);
    let names = config
        .models
        .iter()
        .map(|m| m.display_name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["flux-1.1-pro", "dall-e-3", "midjourney", "sdxl-turbo"]);
    assert_eq!(config.models[3].file, "sdxl-turbo_distribution.csv");
}

#[test]
fn test_label_synonyms() {
    let config = ScoringConfig::default_v1();
    assert_eq!(config.canonical_gender("Male"), "man");
    assert_eq!(config.canonical_gender("FEMALE"), "woman");
    assert_eq!(config.canonical_gender("Woman"), "woman");
    assert_eq!(config.canonical_race("Hispanic"), "latino hispanic");
    assert_eq!(config.canonical_race("White"), "white");
    assert_eq!(config.canonical_race("Indian"), "indian");
}

#[test]
fn test_load_without_file_is_default() {
    let config = ScoringConfig::load(None).unwrap();
    assert_eq!(config.models.len(), 4);
}

#[test]
fn test_load_partial_override() {
    let path = write_temp_config(
        r#"{
            "decimals": 3,
            "label_policy": "reject",
            "models": [{"key": "m1", "file": "m1.csv", "display_name": "Model One"}]
        }"#,
    );
    let config = ScoringConfig::load(Some(&path)).unwrap();
    assert_eq!(config.decimals, 3);
    assert_eq!(config.label_policy, LabelPolicy::Reject);
    assert_eq!(config.models.len(), 1);
    assert_eq!(config.models[0].display_name, "Model One");
    assert_eq!(config.kl_epsilon, 1e-10);
    assert_eq!(config.race_classes, ClassSet::race_v1());
}

#[test]
fn test_load_rejects_invalid_config() {
    let unknown = write_temp_config(r#"{"decimal": 3}"#);
    assert!(matches!(
        ScoringConfig::load(Some(&unknown)),
        Err(ConfigError::Json(_))
    ));

    let empty = write_temp_config(r#"{"models": []}"#);
    assert!(matches!(
        ScoringConfig::load(Some(&empty)),
        Err(ConfigError::Invalid(_))
    ));

    let dup = write_temp_config(
        r#"{"models": [
            {"key": "a", "file": "a.csv", "display_name": "A"},
            {"key": "a", "file": "b.csv", "display_name": "B"}
        ]}"#,
    );
    assert!(matches!(
        ScoringConfig::load(Some(&dup)),
        Err(ConfigError::Invalid(_))
    ));

    let eps = write_temp_config(r#"{"kl_epsilon": -1.0}"#);
    assert!(matches!(
        ScoringConfig::load(Some(&eps)),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let path = std::path::Path::new("/nonexistent/t2i_fairscore/config.json");
    assert!(matches!(ScoringConfig::load(Some(path)), Err(ConfigError::Io(_))));
}
