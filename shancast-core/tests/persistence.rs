//! On-disk config and favorites.

use std::fs;

use shancast_core::{
    Config, FileStorage, Favorites, Storage,
    favorites::{DEFAULT_FAVORITES, FAVORITES_KEY},
};

#[test]
fn config_round_trips_through_toml() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("config.toml");

    let mut cfg = Config::default();
    cfg.set_api_key("KEY".into());
    cfg.default_city = "Lisbon".into();
    cfg.refresh_interval_secs = 120;
    cfg.save_to(&path).expect("save");

    let loaded = Config::load_from(&path).expect("load");
    assert_eq!(loaded, cfg);
}

#[test]
fn missing_config_file_gives_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let loaded = Config::load_from(&dir.path().join("absent.toml")).expect("load");
    assert_eq!(loaded, Config::default());
}

#[test]
fn broken_config_file_is_an_error_naming_the_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "refresh_interval_secs = \"soon\"").expect("write");

    let err = Config::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn favorites_seed_then_toggle_then_reload() {
    let dir = tempfile::tempdir().expect("temp dir");

    let mut favorites = Favorites::load(Box::new(FileStorage::new(dir.path())));
    assert_eq!(favorites.cities(), DEFAULT_FAVORITES);

    favorites.toggle("Tokyo").expect("toggle");

    let reloaded = Favorites::load(Box::new(FileStorage::new(dir.path())));
    assert_eq!(reloaded.cities(), ["London", "New York"]);

    let raw = fs::read_to_string(dir.path().join(format!("{FAVORITES_KEY}.json"))).expect("read");
    assert_eq!(raw, r#"["London","New York"]"#);
}

#[test]
fn corrupt_favorites_file_falls_back_to_seed() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut storage = FileStorage::new(dir.path());
    storage.set(FAVORITES_KEY, "[1, 2, 3]").expect("write");

    let favorites = Favorites::load(Box::new(storage));
    assert_eq!(favorites.cities(), DEFAULT_FAVORITES);
}
