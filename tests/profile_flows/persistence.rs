use std::fs;

use tsuzuri::profile::{ItemStatus, ProfileItem, ProfileStore, UserProfile};
use tsuzuri::profile::types::CURRENT_VERSION;

#[test]
fn saved_profile_round_trips_through_the_store() {
    let tmp = tempfile::tempdir().unwrap();
    let store = ProfileStore::new(tmp.path().join("nested/profile.json"));
    let mut profile = UserProfile::new();
    profile
        .sensitive_topics
        .push(ProfileItem::new("家族の話", 0.7, ItemStatus::Inferred));
    profile.preferences.avoid_topics = vec!["体重".into()];

    store.save(&mut profile).unwrap();
    assert!(profile.updated_at.is_some());
    assert!(!tmp.path().join("nested/profile.json.tmp").exists());

    let loaded = store.load();
    assert!(loaded.warning.is_none());
    assert_eq!(loaded.profile, profile);
}

#[test]
fn corrupt_profile_is_backed_up_and_reset() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("profile.json");
    fs::write(&path, "{\"stable_facts\": [").unwrap();

    let loaded = ProfileStore::new(&path).load();

    assert_eq!(loaded.profile, UserProfile::new());
    let warning = loaded.warning.expect("corrupt profile should warn").to_string();
    assert!(warning.contains("backup created"));
    let backups: Vec<_> = fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("profile.json.bak."))
        .collect();
    assert_eq!(backups.len(), 1);
    assert_eq!(
        fs::read_to_string(backups[0].path()).unwrap(),
        "{\"stable_facts\": ["
    );
}

#[test]
fn legacy_document_without_version_is_stamped() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("profile.json");
    fs::write(
        &path,
        r#"{"stable_facts":[{"value":"在宅勤務","confidence":0.8,"status":"observed"}]}"#,
    )
    .unwrap();

    let loaded = ProfileStore::new(&path).load();

    assert!(loaded.warning.is_none());
    assert_eq!(loaded.profile.version, CURRENT_VERSION);
    assert_eq!(loaded.profile.stable_facts[0].value, "在宅勤務");
    assert!(loaded.profile.ongoing_topics.is_empty());
}
