use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::error::Error;
use crate::library::{Catalog, Track};

fn t(name: &str) -> Track {
    Track::new(name, format!("/music/{name}.ogg"), 1)
}

fn playlist(names: &[&str], shuffle: bool, repeat: bool) -> Playlist {
    let mut p = Playlist::new("test");
    for name in names {
        assert!(p.add_track(&t(name)));
    }
    p.set_shuffle(shuffle);
    p.set_repeat(repeat);
    p
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

#[test]
fn new_playlist_is_sequential_repeating_at_start() {
    let p = Playlist::new("calm");
    assert!(!p.shuffle());
    assert!(p.repeat());
    assert_eq!(p.cursor(), 0);
    assert!(p.is_empty());
    assert!(p.is_resolved());
}

#[test]
fn repeating_sequence_visits_every_index_then_wraps() {
    let mut rng = rng();
    for n in 1..=6 {
        let names: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut p = playlist(&refs, false, true);
        p.set_cursor(0);

        let mut visited = Vec::new();
        for _ in 0..n {
            assert!(p.next_track(&mut rng).is_some());
            visited.push(p.cursor());
        }
        let mut sorted = visited.clone();
        sorted.sort();
        assert_eq!(sorted, (0..n as i64).collect::<Vec<_>>(), "n = {n}");

        let wrapped = p.next_track(&mut rng).map(|t| t.name.clone());
        assert_eq!(p.cursor(), (1 % n) as i64);
        assert_eq!(wrapped.as_deref(), Some(refs[1 % n]));
    }
}

#[test]
fn repeating_from_last_wraps_to_first() {
    let mut p = playlist(&["a", "b", "c"], false, true);
    p.set_cursor(2);
    assert_eq!(p.next_track(&mut rng()).unwrap().name, "a");
    assert_eq!(p.cursor(), 0);
}

#[test]
fn non_repeating_exhaustion_is_sticky() {
    let mut rng = rng();
    for n in 1..=4 {
        let names: Vec<String> = (0..n).map(|i| format!("t{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut p = playlist(&refs, false, false);
        p.set_cursor(n as i64 - 1);

        assert!(p.next_track(&mut rng).is_none());
        assert!(p.cursor() >= n as i64);
        assert!(p.next_track(&mut rng).is_none());
        assert!(p.cursor() >= n as i64);
    }
}

#[test]
fn shuffle_never_runs_out_even_without_repeat() {
    let mut rng = rng();
    let mut p = playlist(&["a", "b", "c", "d"], true, false);
    for _ in 0..200 {
        assert!(p.next_track(&mut rng).is_some());
        assert!((0..4).contains(&p.cursor()));
        assert!(p.previous_track(&mut rng).is_some());
    }
}

#[test]
fn empty_playlist_yields_nothing() {
    let mut rng = rng();
    let mut p = Playlist::new("empty");
    assert!(p.next_track(&mut rng).is_none());
    assert!(p.previous_track(&mut rng).is_none());
    assert!(p.starting_track(&mut rng).is_none());
    assert!(p.current_track().is_none());
}

#[test]
fn current_track_falls_back_to_first_on_bad_cursor() {
    let mut p = playlist(&["a", "b"], false, true);
    p.set_cursor(-3);
    assert_eq!(p.current_track().unwrap().name, "a");
    p.set_cursor(9);
    assert_eq!(p.current_track().unwrap().name, "a");
    p.set_cursor(1);
    assert_eq!(p.current_track().unwrap().name, "b");
}

#[test]
fn previous_wraps_to_last_when_repeating() {
    let mut rng = rng();
    let mut p = playlist(&["a", "b", "c"], false, true);
    p.set_cursor(0);
    assert_eq!(p.previous_track(&mut rng).unwrap().name, "c");
    assert_eq!(p.previous_track(&mut rng).unwrap().name, "b");

    let mut p = playlist(&["a", "b", "c"], false, false);
    p.set_cursor(0);
    assert!(p.previous_track(&mut rng).is_none());
}

#[test]
fn previous_from_exhausted_cursor_returns_last() {
    let mut rng = rng();
    let mut p = playlist(&["a", "b", "c"], false, false);
    p.set_cursor(2);
    assert!(p.next_track(&mut rng).is_none());
    assert_eq!(p.previous_track(&mut rng).unwrap().name, "c");
}

#[test]
fn starting_track_keeps_valid_cursor_and_replaces_invalid_one() {
    let mut rng = rng();
    let mut p = playlist(&["a", "b", "c"], false, true);
    p.set_cursor(1);
    assert_eq!(p.starting_track(&mut rng).unwrap().name, "b");
    assert_eq!(p.cursor(), 1);

    p.set_cursor(17);
    assert!(p.starting_track(&mut rng).is_some());
    assert!((0..3).contains(&p.cursor()));
}

#[test]
fn resolve_keeps_unknown_names_but_skips_them() {
    let catalog = Catalog::new(vec![t("a"), t("c")]);
    let mut p: Playlist =
        serde_json::from_str(r#"{"name":"x","tracks":["a","b","c"]}"#).unwrap();
    assert!(!p.is_resolved());

    p.resolve(&catalog);
    assert_eq!(p.track_names(), &["a", "b", "c"]);
    let names: Vec<&str> = p.tracks().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["a", "c"]);
}

#[test]
fn add_and_remove_keep_names_and_tracks_in_step() {
    let mut p = playlist(&["a", "b"], false, true);
    assert!(!p.add_track(&t("a")));
    assert!(p.add_track(&t("c")));
    assert_eq!(p.len(), 3);
    assert_eq!(p.track_names().len(), 3);

    assert!(p.remove_track("b"));
    assert!(!p.remove_track("b"));
    assert_eq!(p.track_names(), &["a", "c"]);
    assert_eq!(p.tracks()[1].name, "c");
}

#[test]
fn json_shape_and_defaults() {
    let mut p = playlist(&["a"], true, false);
    p.set_cursor(4);
    let value: serde_json::Value = serde_json::to_value(&p).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "name": "test",
            "shuffle": true,
            "repeat": false,
            "currentIndex": 4,
            "tracks": ["a"],
        })
    );

    let bare: Playlist = serde_json::from_str(r#"{"name":"bare"}"#).unwrap();
    assert!(!bare.shuffle());
    assert!(!bare.repeat());
    assert_eq!(bare.cursor(), 0);
    assert!(bare.track_names().is_empty());
}

fn store(dir: &tempfile::TempDir) -> JsonPlaylistStore {
    JsonPlaylistStore::new(dir.path().join("playlists"), dir.path().join("active.txt"))
}

#[test]
fn file_names_are_sanitised() {
    assert_eq!(file_name_for("Night Drive #2"), "Night_Drive__2.json");
    assert_eq!(file_name_for("calm_1"), "calm_1.json");
}

#[test]
fn store_round_trips_playlists_and_skips_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);

    let mut p = playlist(&["a", "b"], false, true);
    p.set_cursor(1);
    store.save(&p).unwrap();
    std::fs::write(store.dir().join("broken.json"), "{ not json").unwrap();
    std::fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name(), "test");
    assert_eq!(loaded[0].cursor(), 1);
    assert_eq!(loaded[0].track_names(), &["a", "b"]);

    store.delete("test").unwrap();
    store.delete("test").unwrap();
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn store_tracks_active_name() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);

    assert_eq!(store.load_active_name().unwrap(), None);
    store.save_active_name(Some("calm")).unwrap();
    assert_eq!(store.load_active_name().unwrap().as_deref(), Some("calm"));
    store.save_active_name(None).unwrap();
    assert_eq!(store.load_active_name().unwrap(), None);
    store.save_active_name(None).unwrap();
}

#[test]
fn manager_creates_saves_and_reloads_resolved() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::new(vec![t("a"), t("b")]);

    let mut manager = PlaylistManager::new(store(&dir));
    let p = manager.create("calm").unwrap();
    p.add_track(&t("a"));
    p.add_track(&t("b"));
    manager.save("calm").unwrap();
    assert!(matches!(manager.create("calm"), Err(Error::DuplicatePlaylist(_))));

    let mut reloaded = PlaylistManager::new(store(&dir));
    assert_eq!(reloaded.load(&catalog), 1);
    let p = reloaded.get("calm").unwrap();
    assert!(p.is_resolved());
    assert_eq!(p.len(), 2);
    assert_eq!(reloaded.names().collect::<Vec<_>>(), vec!["calm"]);
}

#[test]
fn manager_delete_and_unknown_names() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = PlaylistManager::new(store(&dir));
    manager.create("gone").unwrap();

    assert!(manager.delete("gone").is_ok());
    assert!(matches!(manager.delete("gone"), Err(Error::UnknownPlaylist(_))));
    assert!(matches!(manager.save("gone"), Err(Error::UnknownPlaylist(_))));
    assert!(manager.is_empty());
    assert!(manager.store().load_all().unwrap().is_empty());
}

#[test]
fn extreme_saved_cursors_are_clamped_before_stepping() {
    let mut rng = rng();
    let catalog = Catalog::new(vec![t("a"), t("b")]);

    let mut high: Playlist = serde_json::from_str(&format!(
        r#"{{"name":"x","repeat":true,"currentIndex":{},"tracks":["a","b"]}}"#,
        i64::MAX
    ))
    .unwrap();
    high.resolve(&catalog);
    assert_eq!(high.next_track(&mut rng).unwrap().name, "a");
    assert_eq!(high.cursor(), 0);

    let mut low: Playlist = serde_json::from_str(&format!(
        r#"{{"name":"x","repeat":true,"currentIndex":{},"tracks":["a","b"]}}"#,
        i64::MIN
    ))
    .unwrap();
    low.resolve(&catalog);
    assert_eq!(low.previous_track(&mut rng).unwrap().name, "b");
    assert_eq!(low.cursor(), 1);

    high.set_cursor(i64::MAX);
    assert_eq!(high.previous_track(&mut rng).unwrap().name, "b");
    low.set_cursor(i64::MIN);
    assert_eq!(low.next_track(&mut rng).unwrap().name, "a");
}

#[test]
fn repeated_next_on_exhausted_playlist_keeps_cursor_bounded() {
    let mut rng = rng();
    let mut p = playlist(&["a", "b"], false, false);
    p.set_cursor(i64::MAX);
    for _ in 0..5 {
        assert!(p.next_track(&mut rng).is_none());
    }
    assert_eq!(p.cursor(), 2);
}

#[test]
fn record_loaded_updates_only_the_named_entry() {
    let mut p = playlist(&["a", "b"], false, true);
    p.record_loaded("b", Some(std::time::Duration::from_secs(3)));
    p.record_loaded("zzz", None);

    assert!(!p.tracks()[0].loaded);
    assert!(p.tracks()[1].loaded);
    assert_eq!(p.tracks()[1].duration, Some(std::time::Duration::from_secs(3)));
}
