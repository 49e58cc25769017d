use super::*;

const SAMPLE: &str = "\
category,highest_gender,highest_race,lowest_gender,lowest_race
Doctor,male,white,female,N/A
 Fast Food Worker ,,hispanic,n/a,black
";

#[test]
fn test_read_ground_truth() {
    let table = read_ground_truth(SAMPLE.as_bytes()).unwrap();
    assert_eq!(table.entries.len(), 2);

    let doctor = &table.entries[0];
    assert_eq!(doctor.category, "Doctor");
    assert_eq!(doctor.highest.gender.as_deref(), Some("male"));
    assert_eq!(doctor.highest.race.as_deref(), Some("white"));
    assert_eq!(doctor.lowest.gender.as_deref(), Some("female"));
    assert_eq!(doctor.lowest.race, None);

    let worker = &table.entries[1];
    assert_eq!(worker.category, " Fast Food Worker ");
    assert_eq!(worker.highest.gender, None);
    assert_eq!(worker.highest.race.as_deref(), Some("hispanic"));
    assert_eq!(worker.lowest.gender, None);
    assert_eq!(worker.lowest.race.as_deref(), Some("black"));
}

#[test]
fn test_missing_markers() {
    for marker in ["", "N/A", "na", "NaN", "null", "None", "  n/a  "] {
        assert_eq!(present(Some(marker.to_string())), None, "{marker:?}");
    }
    assert_eq!(present(Some(" woman ".to_string())).as_deref(), Some("woman"));
    assert_eq!(present(None), None);
}

#[test]
fn test_missing_file() {
    let err = load_ground_truth(Path::new("/nonexistent/t2i_fairscore/gt.csv")).unwrap_err();
    assert!(matches!(err, InputError::MissingInput(_)));
}

#[test]
fn test_misnamed_label_column_is_rejected() {
    let text = "\
category,highest_gendre,highest_race,lowest_gender,lowest_race
Doctor,male,white,female,N/A
";
    let err = read_ground_truth(text.as_bytes()).unwrap_err();
    assert!(matches!(err, InputError::MissingColumn("highest_gender")));
    assert_eq!(err.to_string(), "missing column 'highest_gender'");
}
